//! Trading state container — app-owned, SDK-provided update logic.

use super::wire::LiveTick;
use super::{Trade, TradingConfig, TradingSession, TradingStats};
use crate::shared::{AccountId, SessionId, Symbol};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};

/// Number of recent trades kept in memory.
pub const RECENT_TRADES_CAP: usize = 100;

/// Active sessions, a rolling buffer of recent trades, and the latest tick
/// per symbol.
#[derive(Debug, Clone)]
pub struct TradingState {
    sessions: Vec<TradingSession>,
    trades: VecDeque<Trade>,
    max_trades: usize,
    ticks: HashMap<Symbol, LiveTick>,
    configs: HashMap<(AccountId, Symbol), TradingConfig>,
    stats: HashMap<AccountId, TradingStats>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for TradingState {
    fn default() -> Self {
        Self::new(RECENT_TRADES_CAP)
    }
}

impl TradingState {
    pub fn new(max_trades: usize) -> Self {
        Self {
            sessions: Vec::new(),
            trades: VecDeque::with_capacity(max_trades),
            max_trades,
            ticks: HashMap::new(),
            configs: HashMap::new(),
            stats: HashMap::new(),
            loading: false,
            error: None,
        }
    }

    // ── Sessions ─────────────────────────────────────────────────────────

    pub fn sessions(&self) -> &[TradingSession] {
        &self.sessions
    }

    pub fn active_sessions_count(&self) -> usize {
        self.sessions.len()
    }

    /// Sum of trades across the active sessions.
    pub fn total_active_trades(&self) -> u64 {
        self.sessions.iter().map(|s| s.total_trades as u64).sum()
    }

    /// Sum of profit across the active sessions.
    pub fn total_profit(&self) -> Decimal {
        self.sessions.iter().map(|s| s.total_profit).sum()
    }

    pub fn is_account_trading(&self, account_id: &AccountId) -> bool {
        self.sessions
            .iter()
            .any(|s| &s.account_id == account_id && s.is_active)
    }

    pub fn sessions_for_account(&self, account_id: &AccountId) -> Vec<&TradingSession> {
        self.sessions
            .iter()
            .filter(|s| &s.account_id == account_id)
            .collect()
    }

    pub fn replace_sessions(&mut self, sessions: Vec<TradingSession>) {
        self.sessions = sessions;
    }

    /// Drop every session belonging to `account_id`.
    pub fn remove_account_sessions(&mut self, account_id: &AccountId) {
        self.sessions.retain(|s| &s.account_id != account_id);
    }

    pub fn clear_sessions(&mut self) {
        self.sessions.clear();
    }

    /// Add a settled trade's profit to its session. Unknown sessions are ignored.
    pub fn update_session_profit(&mut self, session_id: &SessionId, profit: Decimal) -> bool {
        match self.sessions.iter_mut().find(|s| &s.id == session_id) {
            Some(session) => {
                session.total_profit += profit;
                session.total_trades += 1;
                true
            }
            None => false,
        }
    }

    // ── Trades ───────────────────────────────────────────────────────────

    /// Recent trades, newest first.
    pub fn trades(&self) -> &VecDeque<Trade> {
        &self.trades
    }

    pub fn latest_trade(&self) -> Option<&Trade> {
        self.trades.front()
    }

    /// Push a new trade, evicting the oldest if at capacity.
    pub fn add_trade(&mut self, trade: Trade) {
        if self.trades.len() >= self.max_trades {
            self.trades.pop_back();
        }
        self.trades.push_front(trade);
    }

    /// Replace all trades (e.g. from a REST fetch, already newest first).
    pub fn replace_trades(&mut self, trades: Vec<Trade>) {
        self.trades.clear();
        for trade in trades.into_iter().take(self.max_trades) {
            self.trades.push_back(trade);
        }
    }

    // ── Ticks ────────────────────────────────────────────────────────────

    pub fn update_live_tick(&mut self, tick: LiveTick) {
        self.ticks.insert(tick.symbol.clone(), tick);
    }

    pub fn tick(&self, symbol: &Symbol) -> Option<&LiveTick> {
        self.ticks.get(symbol)
    }

    pub fn ticks(&self) -> &HashMap<Symbol, LiveTick> {
        &self.ticks
    }

    // ── Configs / stats ──────────────────────────────────────────────────

    pub fn set_config(&mut self, account_id: AccountId, config: TradingConfig) {
        self.configs
            .insert((account_id, config.symbol.clone()), config);
    }

    pub fn config(&self, account_id: &AccountId, symbol: &Symbol) -> Option<&TradingConfig> {
        self.configs.get(&(account_id.clone(), symbol.clone()))
    }

    pub fn set_stats(&mut self, account_id: AccountId, stats: TradingStats) {
        self.stats.insert(account_id, stats);
    }

    pub fn stats(&self, account_id: &AccountId) -> Option<&TradingStats> {
        self.stats.get(account_id)
    }
}
