use serde::{Deserialize, Serialize};

/// A transfer of some amount between two identifiers.
///
/// The node performs no ownership or economic checks: any sender and
/// recipient string and any amount are accepted as-is. A transaction has
/// no identity of its own; once mined it is identified by its position
/// inside a block's transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}
