use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Accepted, Block, SharedLedger};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Message {
    /// "What is your latest block?"
    QueryLatest,
    /// "Send me your whole chain."
    QueryAll,
    /// A chain (or just a head block) offered for replacement.
    ResponseBlockchain(Vec<Block>),
    ChainAccepted(Accepted),
    ChainRejected { reason: String },
}

/// Answer one peer message against `ledger`.
pub fn handle(ledger: &SharedLedger, msg: Message) -> Message {
    match msg {
        Message::QueryLatest => {
            debug!("P2P - query latest");
            Message::ResponseBlockchain(ledger.last_block().into_iter().collect())
        }
        Message::QueryAll => {
            debug!("P2P - query all");
            Message::ResponseBlockchain(ledger.chain())
        }
        Message::ResponseBlockchain(chain) => {
            info!("P2P - received chain of {} blocks", chain.len());
            match ledger.replace_chain(chain) {
                Ok(accepted) => Message::ChainAccepted(accepted),
                Err(e) => Message::ChainRejected {
                    reason: e.to_string(),
                },
            }
        }
        // Outcomes are replies, never requests.
        reply @ (Message::ChainAccepted(_) | Message::ChainRejected { .. }) => {
            debug!("P2P - ignoring unsolicited reply {reply:?}");
            Message::ChainRejected {
                reason: "unexpected message".to_string(),
            }
        }
    }
}
