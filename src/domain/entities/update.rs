use super::MessageRecord;
use serde::{Deserialize, Serialize};

/// Transport envelope, shaped like a Telegram `getUpdates` result entry.
/// Only `message` is classified; other update kinds arrive with it unset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRecord>,
}

impl Update {
    pub fn into_message(self) -> Option<MessageRecord> {
        self.message
    }
}
