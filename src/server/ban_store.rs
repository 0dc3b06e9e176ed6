use chrono::{DateTime, Utc};
use log::debug;
use tokio::sync::RwLock;

use crate::models::panel::BanRecord;

pub const DEFAULT_BAN_REASON: &str = "You have been banned!";

/// In-process ban table. Identifiers are expected to be normalized already.
pub struct BanStore {
    table: RwLock<BanTable>,
}

#[derive(Default)]
struct BanTable {
    last_id: i32,
    records: Vec<BanRecord>,
}

impl Default for BanStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BanStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(BanTable::default()),
        }
    }

    pub async fn ban(
        &self,
        identifier: String,
        reason: String,
        unban_date: Option<DateTime<Utc>>,
    ) -> BanRecord {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let record = BanRecord {
            ban_id: table.last_id,
            identifier,
            reason,
            banned_on: Some(Utc::now()),
            unban_date,
        };
        table.records.push(record.clone());
        record
    }

    pub async fn search(&self, identifier: &str) -> Vec<BanRecord> {
        let table = self.table.read().await;
        table
            .records
            .iter()
            .filter(|record| record.identifier == identifier)
            .cloned()
            .collect()
    }

    /// Returns `false` when no record has this id.
    pub async fn unban(&self, ban_id: i32) -> bool {
        let mut table = self.table.write().await;
        let before = table.records.len();
        table.records.retain(|record| record.ban_id != ban_id);
        table.records.len() != before
    }

    /// Reason of the most recent active ban on any of `identifiers`.
    pub async fn active_ban(&self, identifiers: &[String], now: DateTime<Utc>) -> Option<String> {
        if identifiers.is_empty() {
            return None;
        }
        let table = self.table.read().await;
        let ban = table
            .records
            .iter()
            .rev()
            .filter(|record| identifiers.contains(&record.identifier))
            .find(|record| record.is_active(now))?;

        debug!(
            "<{}> has an active ban <{}>, expiry: {:?}",
            &ban.identifier, ban.ban_id, ban.unban_date
        );
        if ban.reason.is_empty() {
            Some(DEFAULT_BAN_REASON.to_string())
        } else {
            Some(ban.reason.clone())
        }
    }
}
