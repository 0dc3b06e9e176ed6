use serde::{Deserialize, Serialize};

/// What a game server reports about itself on `/servers/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub description: Option<String>,
    pub map: String,
    pub playlist: String,
    #[serde(rename = "maxPlayers")]
    pub max_players: u32,
    #[serde(rename = "playerCount")]
    pub player_count: u32,
    /// Filled in from the peer address, whatever the server claims.
    #[serde(default)]
    pub ip: String,
    pub port: u16,
    pub key: String,
    #[serde(default, skip_serializing)]
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub uid: Option<u64>,
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// A player as sent by game servers in ban checks, and echoed back when banned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanIdentifiers {
    pub id: Option<u64>,
    #[serde(skip_serializing)]
    pub ip: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IsBannedRequest {
    pub uid: Option<String>,
    pub id: Option<u64>,
    pub ip: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkCheckRequest {
    pub uid: String,
    pub players: Vec<BanIdentifiers>,
}

#[derive(Debug, Default, Serialize)]
pub struct MasterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<ServerInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "bannedPlayers")]
    pub banned_players: Option<Vec<BanIdentifiers>>,
}

/// A listed server as the panel sees it, hidden or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedServer {
    pub uid: String,
    /// Only hidden servers carry one.
    pub token: Option<String>,
    pub server: ServerInfo,
    /// As reported by the last bulk check.
    pub players: Vec<Player>,
}

/// Body of `/panel/servers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelServerList {
    pub public: Vec<ManagedServer>,
    pub hidden: Vec<ManagedServer>,
}
