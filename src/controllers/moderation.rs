use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use chrono::{TimeZone, Utc};
use log::{debug, info};

use crate::{
    error::ModerationError,
    models::{
        auth::Claims,
        panel::{BanRecord, BanRequest, IdentifierQuery, KickRequest, UnbanRequest},
        servers::PanelServerList,
    },
    server::identifier::format_identifier,
    Context,
};

pub async fn ban(
    claims: Claims,
    Extension(context): Extension<Arc<Context>>,
    Json(ban): Json<BanRequest>,
) -> Result<StatusCode, ModerationError> {
    if ban.identifier.is_empty() {
        return Err(ModerationError::NoIdentifier);
    }
    let identifier =
        format_identifier(&ban.identifier).ok_or(ModerationError::InvalidIdentifier)?;

    let unban_date = match ban.unban_timestamp {
        Some(timestamp) => {
            let date = i64::try_from(timestamp)
                .ok()
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                .ok_or(ModerationError::InvalidUnbanDate)?;
            if date < Utc::now() {
                debug!("Rejecting ban of <{}>: expiry in the past", &identifier);
                return Err(ModerationError::ExpiryInPast);
            }
            Some(date)
        }
        None => None,
    };

    let record = context.bans.ban(identifier, ban.reason, unban_date).await;
    info!(
        "<{}> banned <{}> (ban <{}>, until {:?})",
        &claims.sub, &record.identifier, record.ban_id, record.unban_date
    );
    Ok(StatusCode::OK)
}

pub async fn ban_search(
    _claims: Claims,
    Extension(context): Extension<Arc<Context>>,
    Json(query): Json<IdentifierQuery>,
) -> Result<Json<Vec<BanRecord>>, ModerationError> {
    let identifier =
        format_identifier(&query.identifier).ok_or(ModerationError::InvalidIdentifier)?;
    let bans = context.bans.search(&identifier).await;
    debug!("Ban search for <{}>: {} record(s)", &identifier, bans.len());
    Ok(Json(bans))
}

pub async fn unban(
    claims: Claims,
    Extension(context): Extension<Arc<Context>>,
    Json(unban): Json<UnbanRequest>,
) -> Result<StatusCode, ModerationError> {
    if !context.bans.unban(unban.key).await {
        return Err(ModerationError::BanNotFound);
    }
    info!("<{}> removed ban <{}>", &claims.sub, unban.key);
    Ok(StatusCode::OK)
}

pub async fn kick(
    claims: Claims,
    Extension(context): Extension<Arc<Context>>,
    Json(kick): Json<KickRequest>,
) -> Result<StatusCode, ModerationError> {
    let count = kick.player_uids.len();
    if !context
        .servers
        .queue_kicks(&kick.server_uid, kick.player_uids)
        .await
    {
        return Err(ModerationError::ServerNotFound);
    }
    info!(
        "<{}> queued {} kick(s) on server <{}>",
        &claims.sub, count, &kick.server_uid
    );
    Ok(StatusCode::OK)
}

/// Public and hidden servers with their uids and players, for picking kick targets.
pub async fn server_list(
    _claims: Claims,
    Extension(context): Extension<Arc<Context>>,
) -> Json<PanelServerList> {
    let list = context.servers.managed_servers().await;
    debug!(
        "Panel server list: {} public, {} hidden",
        list.public.len(),
        list.hidden.len()
    );
    Json(list)
}
