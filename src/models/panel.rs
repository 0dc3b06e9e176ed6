//! JSON bodies exchanged between the panel client and the `/panel` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRequest {
    pub identifier: String,
    pub reason: String,
    /// Seconds since the Unix epoch; `None` bans permanently.
    pub unban_timestamp: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierQuery {
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbanRequest {
    /// `ban_id` of the record to remove.
    pub key: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickRequest {
    pub server_uid: String,
    pub player_uids: Vec<u64>,
}

/// One row of a `/panel/ban_search` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub ban_id: i32,
    pub identifier: String,
    #[serde(default)]
    pub reason: String,
    pub banned_on: Option<DateTime<Utc>>,
    pub unban_date: Option<DateTime<Utc>>,
}

impl BanRecord {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.unban_date {
            Some(date) => date > now,
            None => true,
        }
    }
}
