//! Subscription types, tracking, and matching.

use crate::shared::{AccountId, SessionId, Symbol};
use serde::{Deserialize, Serialize};

/// Parameters for a real-time subscription.
///
/// Untagged on the wire: the event name (`subscribe:symbol` /
/// `subscribe:session`) already says which variant the payload is.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(untagged)]
pub enum SubscribeParams {
    Symbol {
        symbol: Symbol,
        #[serde(
            rename = "accountId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        account_id: Option<AccountId>,
    },
    Session {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
}

/// Parameters for dropping a real-time subscription.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
#[serde(untagged)]
pub enum UnsubscribeParams {
    Symbol {
        symbol: Symbol,
    },
    Session {
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
}

/// Trait for subscription types that can be tracked and matched.
pub trait Subscription {
    fn to_subscribe_params(&self) -> SubscribeParams;
    fn to_unsubscribe_params(&self) -> UnsubscribeParams;
    fn matches_unsubscribe(&self, unsub: &UnsubscribeParams) -> bool;
    fn subscription_key(&self) -> String;
}

impl Subscription for SubscribeParams {
    fn to_subscribe_params(&self) -> SubscribeParams {
        self.clone()
    }

    fn to_unsubscribe_params(&self) -> UnsubscribeParams {
        match self {
            SubscribeParams::Symbol { symbol, .. } => UnsubscribeParams::Symbol {
                symbol: symbol.clone(),
            },
            SubscribeParams::Session { session_id } => UnsubscribeParams::Session {
                session_id: session_id.clone(),
            },
        }
    }

    /// A symbol unsubscribe drops the symbol for every account it was
    /// subscribed under.
    fn matches_unsubscribe(&self, unsub: &UnsubscribeParams) -> bool {
        match (self, unsub) {
            (
                SubscribeParams::Symbol { symbol: sub, .. },
                UnsubscribeParams::Symbol { symbol: unsub },
            ) => sub == unsub,
            (
                SubscribeParams::Session { session_id: sub },
                UnsubscribeParams::Session { session_id: unsub },
            ) => sub == unsub,
            _ => false,
        }
    }

    fn subscription_key(&self) -> String {
        match self {
            SubscribeParams::Symbol {
                symbol,
                account_id: Some(account),
            } => format!("symbol:{}:{}", symbol, account),
            SubscribeParams::Symbol {
                symbol,
                account_id: None,
            } => format!("symbol:{}", symbol),
            SubscribeParams::Session { session_id } => format!("session:{}", session_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_params_serialization() {
        let params = SubscribeParams::Symbol {
            symbol: Symbol::from("R_100"),
            account_id: Some(AccountId::from("acc_1")),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "symbol": "R_100", "accountId": "acc_1" })
        );

        let params = SubscribeParams::Symbol {
            symbol: Symbol::from("R_100"),
            account_id: None,
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "symbol": "R_100" })
        );
    }

    #[test]
    fn test_session_params_serialization() {
        let params = UnsubscribeParams::Session {
            session_id: SessionId::from("s1"),
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "sessionId": "s1" })
        );
    }

    #[test]
    fn test_untagged_deserialize_picks_variant() {
        let p: SubscribeParams = serde_json::from_str(r#"{"sessionId":"s9"}"#).unwrap();
        assert_eq!(
            p,
            SubscribeParams::Session {
                session_id: SessionId::from("s9")
            }
        );
        let p: SubscribeParams = serde_json::from_str(r#"{"symbol":"R_10"}"#).unwrap();
        assert!(matches!(p, SubscribeParams::Symbol { account_id: None, .. }));
    }

    #[test]
    fn test_symbol_unsubscribe_ignores_account() {
        let sub = SubscribeParams::Symbol {
            symbol: Symbol::from("R_100"),
            account_id: Some(AccountId::from("acc_1")),
        };
        assert!(sub.matches_unsubscribe(&UnsubscribeParams::Symbol {
            symbol: Symbol::from("R_100")
        }));
        assert!(!sub.matches_unsubscribe(&UnsubscribeParams::Symbol {
            symbol: Symbol::from("R_50")
        }));
    }

    #[test]
    fn test_matches_unsubscribe_cross_type_no_match() {
        let sub = SubscribeParams::Session {
            session_id: SessionId::from("R_100"),
        };
        let unsub = UnsubscribeParams::Symbol {
            symbol: Symbol::from("R_100"),
        };
        assert!(!sub.matches_unsubscribe(&unsub));
    }

    #[test]
    fn test_subscription_keys() {
        let with_account = SubscribeParams::Symbol {
            symbol: Symbol::from("R_100"),
            account_id: Some(AccountId::from("acc_1")),
        };
        let session = SubscribeParams::Session {
            session_id: SessionId::from("s1"),
        };
        assert_eq!(with_account.subscription_key(), "symbol:R_100:acc_1");
        assert_eq!(session.subscription_key(), "session:s1");
    }

    #[test]
    fn test_to_unsubscribe_params_roundtrip() {
        let sub = SubscribeParams::Session {
            session_id: SessionId::from("s1"),
        };
        let unsub = sub.to_unsubscribe_params();
        assert!(sub.matches_unsubscribe(&unsub));
    }
}
