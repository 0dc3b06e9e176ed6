use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use tokio::{sync::RwLock, time::Instant};

use crate::models::servers::{ManagedServer, PanelServerList, Player, ServerInfo};

/// A listed game server and the moderation state attached to it.
#[derive(Debug, Clone)]
pub struct ServerEntry {
    pub uid: String,
    pub token: Option<String>,
    pub info: ServerInfo,
    pub players: Vec<Player>,
    /// Player uids to hand out on the next bulk check.
    pub kick_list: Vec<u64>,
    expires_at: Instant,
}

impl ServerEntry {
    fn identity(&self) -> (&str, u16, &str) {
        (&self.info.ip, self.info.port, &self.info.key)
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub uid: String,
    pub token: Option<String>,
}

/// Servers that posted themselves within the last `timeout`.
pub struct ServerList {
    timeout: Duration,
    entries: RwLock<Vec<ServerEntry>>,
}

impl ServerList {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Adds the server, or refreshes it if `ip:port:key` is already listed.
    ///
    /// A refresh keeps uid, token, players and pending kicks.
    pub async fn register(&self, info: ServerInfo) -> Registration {
        let now = Instant::now();
        let expires_at = now + self.timeout;
        let mut entries = self.entries.write().await;
        entries.retain(|entry| !entry.is_expired(now));

        let identity = (info.ip.as_str(), info.port, info.key.as_str());
        if let Some(entry) = entries.iter_mut().find(|entry| entry.identity() == identity) {
            debug!("Refreshing server <{}>", &entry.uid);
            entry.info = info;
            entry.expires_at = expires_at;
            return Registration {
                uid: entry.uid.clone(),
                token: entry.token.clone(),
            };
        }

        let uid = random_id();
        let token = if info.hidden { Some(random_id()) } else { None };
        info!("Listing server <{}> as <{}>", &info.name, &uid);
        entries.push(ServerEntry {
            uid: uid.clone(),
            token: token.clone(),
            info,
            players: Vec::new(),
            kick_list: Vec::new(),
            expires_at,
        });
        Registration { uid, token }
    }

    pub async fn public_servers(&self) -> Vec<ServerInfo> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|entry| !entry.info.hidden && !entry.is_expired(now))
            .map(|entry| entry.info.clone())
            .collect()
    }

    /// Every unexpired server with its uid and last known players, split by visibility.
    pub async fn managed_servers(&self) -> PanelServerList {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let mut list = PanelServerList::default();
        for entry in entries.iter().filter(|entry| !entry.is_expired(now)) {
            let managed = ManagedServer {
                uid: entry.uid.clone(),
                token: entry.token.clone(),
                server: entry.info.clone(),
                players: entry.players.clone(),
            };
            if entry.info.hidden {
                list.hidden.push(managed);
            } else {
                list.public.push(managed);
            }
        }
        list
    }

    pub async fn find_by_token(&self, token: &str) -> Option<ServerInfo> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|entry| entry.token.as_deref() == Some(token) && !entry.is_expired(now))
            .map(|entry| entry.info.clone())
    }

    pub async fn find_by_uid(&self, uid: &str) -> Option<ServerEntry> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|entry| entry.uid == uid && !entry.is_expired(now))
            .cloned()
    }

    pub async fn contains(&self, uid: &str) -> bool {
        self.find_by_uid(uid).await.is_some()
    }

    /// Queues kicks for the next bulk check. `false` if the server isn't listed.
    pub async fn queue_kicks(&self, uid: &str, player_uids: Vec<u64>) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries
            .iter_mut()
            .find(|entry| entry.uid == uid && !entry.is_expired(now))
        {
            Some(entry) => {
                for player_uid in player_uids {
                    if !entry.kick_list.contains(&player_uid) {
                        entry.kick_list.push(player_uid);
                    }
                }
                true
            }
            None => false,
        }
    }

    /// Replaces the player list and drains the pending kicks.
    pub async fn bulk_update(&self, uid: &str, players: Vec<Player>) -> Option<Vec<u64>> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.uid == uid && !entry.is_expired(now))?;
        entry.players = players;
        Some(std::mem::take(&mut entry.kick_list))
    }

    /// Drops expired servers, returning how many went away.
    pub async fn scrub(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !entry.is_expired(now));
        before - entries.len()
    }
}

fn random_id() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}
