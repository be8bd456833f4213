//! `deriv-dash` — command-line front end for the trading dashboard backend.
//!
//! Reads `DASHBOARD_*` settings from the environment (or `.env`).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use deriv_dashboard::config::DashboardConfig;
use deriv_dashboard::dashboard::Dashboard;
use deriv_dashboard::shared::fmt::{
    format_compact_currency, format_currency, format_number, format_percentage,
    format_signed_currency,
};
use deriv_dashboard::shared::{AccountId, Symbol};
use deriv_dashboard::ws::{events, Kind, WsEvent};

#[derive(Parser, Debug)]
#[command(author, version, about = "Deriv trading dashboard client")]
struct Cli {
    /// Override the REST API base URL.
    #[arg(long, global = true, env = "DASHBOARD_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all accounts with balances.
    Accounts,

    /// Show one account and its stats.
    Account { id: String },

    /// Start trading an account on the given symbols (defaults to its own).
    Start {
        account: String,
        symbols: Vec<String>,
    },

    /// Stop trading an account.
    Stop { account: String },

    StartAll,

    StopAll,

    /// List active trading sessions.
    Sessions,

    /// Show recent trades.
    Trades {
        #[arg(short, long)]
        account: Option<String>,

        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show backend health.
    Health,

    /// Stream live events until Ctrl-C.
    Watch { symbols: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let overrides: Vec<(&str, String)> = cli
        .api_url
        .iter()
        .map(|url| ("DASHBOARD_API_URL", url.clone()))
        .collect();
    let config = DashboardConfig::from_env_with(&overrides).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::debug!(app = %config.app_name, api = %config.api_url, "starting");
    let dashboard = Dashboard::from_config(&config)?;

    match cli.command {
        Commands::Accounts => list_accounts(&dashboard).await?,
        Commands::Account { id } => show_account(&dashboard, &AccountId::new(id)).await?,
        Commands::Start { account, symbols } => {
            let id = AccountId::new(account);
            let mut symbols: Vec<Symbol> = symbols.into_iter().map(Symbol::new).collect();
            if symbols.is_empty() {
                symbols = dashboard.client().accounts().get(&id).await?.symbols;
            }
            let ack = dashboard.start_trading(&id, &symbols).await?;
            print_ack(ack.success, &ack.message)?;
        }
        Commands::Stop { account } => {
            let ack = dashboard.stop_trading(&AccountId::new(account)).await?;
            print_ack(ack.success, &ack.message)?;
        }
        Commands::StartAll => {
            let ack = dashboard.start_all_accounts().await?;
            print_ack(ack.success, &ack.message)?;
        }
        Commands::StopAll => {
            let ack = dashboard.stop_all_accounts().await?;
            print_ack(ack.success, &ack.message)?;
        }
        Commands::Sessions => {
            let sessions = dashboard.client().trading().active_sessions().await?;
            if sessions.is_empty() {
                println!("no active sessions");
            }
            for s in sessions {
                println!(
                    "{:<24} {:<16} {:<8} trades={:<5} profit={} streak={}",
                    s.id,
                    s.account_id,
                    s.symbol,
                    s.total_trades,
                    format_signed_currency(&s.total_profit, "USD"),
                    s.current_streak
                );
            }
        }
        Commands::Trades { account, limit } => {
            let account = account.map(AccountId::new);
            let trades = dashboard
                .client()
                .trading()
                .trades(account.as_ref(), limit)
                .await?;
            for t in trades {
                println!(
                    "{} {:<16} {:<8} {:<5} {:>10} {:>10} {}",
                    t.open_time.format("%Y-%m-%d %H:%M:%S"),
                    t.account_id,
                    t.symbol,
                    t.contract_type,
                    format_currency(&t.amount, "USD"),
                    format_signed_currency(&t.profit, "USD"),
                    t.status
                );
            }
        }
        Commands::Health => {
            let health = dashboard.client().system().health().await?;
            println!("status:    {}", health.status);
            println!("uptime:    {:.0}s", health.uptime);
            println!("accounts:  {}", health.connected_accounts);
            println!("sessions:  {}", health.active_sessions);
            println!("memory:    {:.1}%", health.memory_usage);
            println!("cpu:       {:.1}%", health.cpu_usage);
        }
        Commands::Watch { symbols } => watch(&dashboard, symbols).await?,
    }

    Ok(())
}

async fn list_accounts(dashboard: &Dashboard) -> Result<()> {
    dashboard.load_accounts().await?;
    let st = dashboard.accounts_state().read().await;
    for a in st.accounts() {
        println!(
            "{:<16} {:<24} {:>14} {}",
            a.id,
            a.name,
            format_currency(&a.balance, &a.currency),
            if a.is_active { "active" } else { "idle" }
        );
    }
    println!(
        "{} accounts, total balance {}",
        st.count(),
        format_currency(&st.total_balance(), "USD")
    );
    Ok(())
}

async fn show_account(dashboard: &Dashboard, id: &AccountId) -> Result<()> {
    let account = dashboard.client().accounts().get(id).await?;
    println!("{} ({})", account.name, account.id);
    println!("  balance:  {}", format_currency(&account.balance, &account.currency));
    println!("  token:    {}", account.masked_token());
    println!("  active:   {}", account.is_active);
    let symbols: Vec<String> = account.symbols.iter().map(|s| s.to_string()).collect();
    println!("  symbols:  {}", symbols.join(", "));

    if let Some(stats) = dashboard.load_account_stats(id).await {
        println!(
            "  trades:   {} ({} won, {} lost, win rate {})",
            stats.total_trades,
            stats.trades_won,
            stats.trades_lost,
            format_percentage(stats.win_rate, 1)
        );
        println!(
            "  today:    {}",
            format_signed_currency(&stats.today_pnl, &account.currency)
        );
        println!(
            "  average:  {}  drawdown: {}",
            format_number(&stats.average_trade_amount),
            format_compact_currency(&stats.max_drawdown, &account.currency)
        );
    }
    Ok(())
}

fn print_ack(success: bool, message: &str) -> Result<()> {
    if !success {
        bail!("rejected: {}", message);
    }
    println!("{}", message);
    Ok(())
}

async fn watch(dashboard: &Dashboard, symbols: Vec<String>) -> Result<()> {
    let mut ws = dashboard.client().ws_native()?;

    dashboard
        .on(events::TICK_RECEIVED, |ev| {
            if let WsEvent::Message(Kind::Tick(t)) = ev {
                println!("{:<8} {} (digit {})", t.symbol, t.quote, t.last_digit);
            }
        })
        .await;
    dashboard
        .on(events::TRADE_EXECUTED, |ev| {
            if let WsEvent::Message(Kind::TradeExecuted(t)) = ev {
                println!(
                    "trade    {} {} {} {}",
                    t.account_id,
                    t.symbol,
                    t.contract_type,
                    format_currency(&t.amount, "USD")
                );
            }
        })
        .await;
    dashboard
        .on(events::BALANCE_UPDATED, |ev| {
            if let WsEvent::Message(Kind::BalanceUpdated(b)) = ev {
                println!(
                    "balance  {} {} ({})",
                    b.account_id,
                    format_currency(&b.balance, &b.currency),
                    format_signed_currency(&b.change, &b.currency)
                );
            }
        })
        .await;
    for name in [
        events::CONNECTION_ESTABLISHED,
        events::CONNECTION_LOST,
        events::CONNECTION_FAILED,
    ] {
        dashboard.on(name, |ev| println!("-- {}", ev.name())).await;
    }

    ws.connect().await?;
    for symbol in symbols {
        dashboard
            .subscribe_to_symbol(&ws, Symbol::new(symbol), None)
            .await?;
    }
    dashboard.request_system_health(&ws)?;

    tokio::select! {
        _ = dashboard.run(&ws) => {
            tracing::warn!("event stream ended");
        }
        res = tokio::signal::ctrl_c() => {
            res.context("waiting for Ctrl-C")?;
        }
    }

    dashboard.disconnect(&mut ws).await?;
    Ok(())
}
