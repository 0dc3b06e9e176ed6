use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{info, warn};

use super::{
    gateway::{RequestGateway, Transport},
    page::{ids, BanRow, PanelPage},
};
use crate::models::{
    panel::{BanRecord, BanRequest, IdentifierQuery, KickRequest, LoginRequest, UnbanRequest},
    servers::PanelServerList,
};

pub const CONFIRM_BAN: &str = "Are you sure you wish to ban this identifier";
pub const BANNED: &str = "Banned";
pub const BAN_FAILED: &str = "Ban failed: ";
pub const KICK_QUEUED: &str = "Selected player(s) will be kicked on next bulk check";
pub const KICK_FAILED: &str = "Kick request failed";
pub const LOGGED_IN: &str = "Logged in";
pub const LOGIN_FAILED: &str = "Login Failure";
pub const SERVER_LIST_FAILED: &str = "Couldn't load the server list";

/// The panel's UI actions. Each reads the page, makes one gateway call and
/// writes the outcome back; none of them keeps state between calls.
pub struct PanelActions<T> {
    gateway: RequestGateway<T>,
}

impl<T: Transport> PanelActions<T> {
    pub fn new(gateway: RequestGateway<T>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &RequestGateway<T> {
        &self.gateway
    }

    pub async fn ban<P: PanelPage>(&self, page: &mut P) {
        let identifier = page.input_value(ids::BAN_IDENTIFIER);
        if identifier.is_empty() {
            return;
        }
        if !page.confirm(CONFIRM_BAN) {
            return;
        }

        let request = BanRequest {
            identifier,
            reason: page.input_value(ids::BAN_REASON),
            unban_timestamp: unban_timestamp(&page.input_value(ids::BAN_UNBAN_DATE)),
        };
        let message = match self.gateway.post("/panel/ban", &request).await {
            Ok(response) if response.is_ok() => {
                info!("Banned <{}>", &request.identifier);
                BANNED.to_string()
            }
            Ok(response) => {
                warn!("Ban of <{}> failed: {}", &request.identifier, response.status());
                format!("{}{}", BAN_FAILED, response.text())
            }
            Err(e) => {
                warn!("Ban of <{}> failed: {}", &request.identifier, &e);
                format!("{}{}", BAN_FAILED, e)
            }
        };
        page.set_text(ids::BAN_RESULT, &message);
    }

    /// Searches bans for the identifier input and re-renders the ban table.
    ///
    /// A failed search leaves the table as it was.
    pub async fn check_identifier<P: PanelPage>(&self, page: &mut P) {
        let identifier = page.input_value(ids::SEARCH_IDENTIFIER);
        if identifier.is_empty() {
            return;
        }

        let query = IdentifierQuery { identifier };
        let response = match self.gateway.post("/panel/ban_search", &query).await {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                warn!("Ban search failed: {} {}", response.status(), response.text());
                return;
            }
            Err(e) => {
                warn!("Ban search failed: {}", &e);
                return;
            }
        };
        let records: Vec<BanRecord> = match response.json() {
            Ok(records) => records,
            Err(e) => {
                warn!("Unexpected ban search response: {}", &e);
                return;
            }
        };

        let rows = records.into_iter().map(ban_row).collect();
        page.replace_rows(ids::BAN_TABLE, rows);
    }

    /// Removes a ban, then refreshes the search on success.
    pub async fn unban<P: PanelPage>(&self, page: &mut P, ban_id: i32) {
        let request = UnbanRequest { key: ban_id };
        match self.gateway.post("/panel/unban", &request).await {
            Ok(response) if response.is_ok() => {
                info!("Removed ban <{}>", ban_id);
                self.check_identifier(page).await;
            }
            Ok(response) => warn!("Unban of <{}> failed: {}", ban_id, response.status()),
            Err(e) => warn!("Unban of <{}> failed: {}", ban_id, &e),
        }
    }

    /// Queues a kick of every `players_to_kick` input on the given server.
    pub async fn kick<P: PanelPage>(&self, page: &mut P, server_uid: &str) {
        if server_uid.is_empty() {
            return;
        }

        let player_uids = match page
            .inputs_by_name(ids::PLAYERS_TO_KICK)
            .iter()
            .map(|value| value.trim().parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
        {
            Ok(player_uids) => player_uids,
            Err(e) => {
                warn!("Not a player uid: {}", &e);
                page.set_text(ids::KICK_MESSAGE, KICK_FAILED);
                return;
            }
        };

        let request = KickRequest {
            server_uid: server_uid.to_string(),
            player_uids,
        };
        let message = match self.gateway.post("/panel/kick", &request).await {
            Ok(response) if response.is_ok() => KICK_QUEUED,
            Ok(response) => {
                warn!("Kick request failed: {}", response.status());
                KICK_FAILED
            }
            Err(e) => {
                warn!("Kick request failed: {}", &e);
                KICK_FAILED
            }
        };
        page.set_text(ids::KICK_MESSAGE, message);
    }

    /// Loads every listed server, hidden ones included, with uids and players.
    pub async fn list_servers<P: PanelPage>(&self, page: &mut P) {
        let response = match self.gateway.post("/panel/servers", &()).await {
            Ok(response) if response.is_ok() => response,
            Ok(response) => {
                warn!("Server list failed: {}", response.status());
                page.set_text(ids::SERVER_LIST_MESSAGE, SERVER_LIST_FAILED);
                return;
            }
            Err(e) => {
                warn!("Server list failed: {}", &e);
                page.set_text(ids::SERVER_LIST_MESSAGE, SERVER_LIST_FAILED);
                return;
            }
        };
        match response.json::<PanelServerList>() {
            Ok(servers) => page.show_servers(ids::SERVER_LIST, servers),
            Err(e) => {
                warn!("Unexpected server list response: {}", &e);
                page.set_text(ids::SERVER_LIST_MESSAGE, SERVER_LIST_FAILED);
            }
        }
    }

    pub async fn login<P: PanelPage>(&self, page: &mut P) {
        let username = page.input_value(ids::USERNAME);
        if username.is_empty() {
            return;
        }

        let request = LoginRequest {
            username,
            password: page.input_value(ids::PASSWORD),
        };
        let message = match self.gateway.post("/panel/auth", &request).await {
            Ok(response) if response.is_ok() => LOGGED_IN,
            Ok(response) => {
                warn!("Login as <{}> failed: {}", &request.username, response.status());
                LOGIN_FAILED
            }
            Err(e) => {
                warn!("Login as <{}> failed: {}", &request.username, &e);
                LOGIN_FAILED
            }
        };
        page.set_text(ids::LOGIN_MESSAGE, message);
    }
}

/// `YYYY-MM-DD` to seconds at UTC midnight. Blank, malformed and pre-epoch dates mean
/// a permanent ban.
pub fn unban_timestamp(value: &str) -> Option<u64> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    u64::try_from(midnight.timestamp())
        .ok()
        .filter(|secs| *secs > 0)
}

pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(timestamp) => timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "None".to_string(),
    }
}

fn ban_row(record: BanRecord) -> BanRow {
    BanRow {
        cells: [
            record.identifier,
            format_timestamp(record.banned_on),
            format_timestamp(record.unban_date),
            record.reason,
        ],
        ban_id: record.ban_id,
    }
}
