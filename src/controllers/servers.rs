use std::{net::SocketAddr, sync::Arc};

use axum::{extract::ConnectInfo, Extension, Json};
use chrono::Utc;
use log::{debug, info};

use crate::{
    error::MasterServerError,
    models::servers::{
        BanIdentifiers, BulkCheckRequest, IsBannedRequest, MasterResponse, Player, ServerInfo,
        TokenQuery,
    },
    server::{ban_store::DEFAULT_BAN_REASON, identifier::format_ip},
    Context,
};

const KICK_REASON: &str = "Kicked from server";

pub async fn add(
    Extension(context): Extension<Arc<Context>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    Json(mut server): Json<ServerInfo>,
) -> Result<Json<MasterResponse>, MasterServerError> {
    if server.name.trim().is_empty() {
        return Err(MasterServerError::InvalidServer("empty name"));
    }
    if server.port == 0 {
        return Err(MasterServerError::InvalidServer("port 0"));
    }

    server.ip = peer
        .and_then(|ConnectInfo(addr)| format_ip(&addr.ip().to_string()))
        .unwrap_or_default();
    let registration = context.servers.register(server).await;

    Ok(Json(MasterResponse {
        success: true,
        uid: Some(registration.uid),
        token: registration.token,
        ..Default::default()
    }))
}

pub async fn list(Extension(context): Extension<Arc<Context>>) -> Json<MasterResponse> {
    let servers = context.servers.public_servers().await;
    Json(MasterResponse {
        success: true,
        servers: Some(servers),
        ..Default::default()
    })
}

pub async fn by_token(
    Extension(context): Extension<Arc<Context>>,
    Json(query): Json<TokenQuery>,
) -> Result<Json<MasterResponse>, MasterServerError> {
    let server = context
        .servers
        .find_by_token(&query.token)
        .await
        .ok_or(MasterServerError::ServerNotFound)?;
    Ok(Json(MasterResponse {
        success: true,
        server: Some(server),
        ..Default::default()
    }))
}

pub async fn is_banned(
    Extension(context): Extension<Arc<Context>>,
    Json(request): Json<IsBannedRequest>,
) -> Result<Json<MasterResponse>, MasterServerError> {
    match &request.uid {
        Some(uid) if context.servers.contains(uid).await => {}
        _ => return Err(MasterServerError::UnlistedServer),
    }

    let identifiers = identifiers_of(request.id, request.ip.as_deref());
    // `reason` is always present on the wire, banned or not.
    let reason = context.bans.active_ban(&identifiers, Utc::now()).await;
    debug!("isBanned {:?}: {:?}", &identifiers, &reason);

    Ok(Json(MasterResponse {
        success: true,
        banned: Some(reason.is_some()),
        reason: Some(reason.unwrap_or_else(|| DEFAULT_BAN_REASON.to_string())),
        ..Default::default()
    }))
}

/// Records the server's players, then reports who must leave: queued kicks first,
/// followed by every player with an active ban.
pub async fn bulk_check(
    Extension(context): Extension<Arc<Context>>,
    Json(request): Json<BulkCheckRequest>,
) -> Result<Json<MasterResponse>, MasterServerError> {
    let players = request
        .players
        .iter()
        .map(|player| Player {
            uid: player.id,
            ip: player.ip.clone(),
        })
        .collect();
    let kicks = context
        .servers
        .bulk_update(&request.uid, players)
        .await
        .ok_or(MasterServerError::UnlistedServer)?;
    if !kicks.is_empty() {
        info!("Handing {} kick(s) to server <{}>", kicks.len(), &request.uid);
    }

    let mut banned_players: Vec<BanIdentifiers> = kicks
        .into_iter()
        .map(|uid| BanIdentifiers {
            id: Some(uid),
            ip: None,
            reason: Some(KICK_REASON.to_string()),
        })
        .collect();

    let now = Utc::now();
    for mut player in request.players {
        let identifiers = identifiers_of(player.id, player.ip.as_deref());
        if let Some(reason) = context.bans.active_ban(&identifiers, now).await {
            player.reason = Some(reason);
            banned_players.push(player);
        }
    }

    Ok(Json(MasterResponse {
        success: true,
        banned_players: Some(banned_players),
        ..Default::default()
    }))
}

fn identifiers_of(id: Option<u64>, ip: Option<&str>) -> Vec<String> {
    id.map(|id| id.to_string())
        .into_iter()
        .chain(ip.and_then(format_ip))
        .collect()
}
