use std::{sync::Arc, time::Duration};

use axum::{routing::post, Extension, Router};
use controllers::{auth, moderation, servers};
use models::auth::Keys;
use server::{ban_store::BanStore, server_list::ServerList};
use tower_http::cors::{Any, CorsLayer};

pub mod client;
pub mod controllers;
pub mod env;
pub mod error;
pub mod logger;
pub mod models;
pub mod server;

pub struct SessionSettings {
    pub max_age: cookie::time::Duration,
    pub secure: bool,
}

pub struct Context {
    pub username: String,
    pub password: String,
    pub keys: Keys,
    pub session: SessionSettings,
    pub bans: BanStore,
    pub servers: ServerList,
}

impl Context {
    pub fn new(
        username: String,
        password: String,
        keys: Keys,
        session: SessionSettings,
        server_timeout: Duration,
    ) -> Self {
        Self {
            username,
            password,
            keys,
            session,
            bans: BanStore::new(),
            servers: ServerList::new(server_timeout),
        }
    }
}

/// Panel routes are same-origin only; the master server routes are open to any origin.
pub fn router(context: Arc<Context>) -> Router {
    let panel = Router::new()
        .route("/panel/auth", post(auth::login_post))
        .route("/panel/logout", post(auth::logout))
        .route("/panel/ban", post(moderation::ban))
        .route("/panel/ban_search", post(moderation::ban_search))
        .route("/panel/unban", post(moderation::unban))
        .route("/panel/kick", post(moderation::kick))
        .route("/panel/servers", post(moderation::server_list));

    let master_server = Router::new()
        .route("/servers", post(servers::list))
        .route("/servers/add", post(servers::add))
        .route("/servers/byToken", post(servers::by_token))
        .route("/banlist/isBanned", post(servers::is_banned))
        .route("/banlist/bulkCheck", post(servers::bulk_check))
        .layer(CorsLayer::new().allow_origin(Any));

    panel.merge(master_server).layer(Extension(context))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::models::{panel::BanRecord, servers::PanelServerList};

    fn app() -> Router {
        let context = Context::new(
            "Admin".to_string(),
            "hunter2".to_string(),
            Keys::new(b"test secret"),
            SessionSettings {
                max_age: cookie::time::Duration::minutes(10),
                secure: false,
            },
            Duration::from_secs(60),
        );
        router(Arc::new(context))
    }

    async fn post_json(
        app: &Router,
        uri: &str,
        session: Option<&str>,
        body: Value,
    ) -> (StatusCode, Option<String>, Vec<u8>) {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(session) = session {
            request = request.header(header::COOKIE, session);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().to_string());
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, set_cookie, body.to_vec())
    }

    async fn login(app: &Router) -> String {
        let (status, set_cookie, _) = post_json(
            app,
            "/panel/auth",
            None,
            json!({ "username": "admin", "password": "hunter2" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let set_cookie = set_cookie.expect("login sets the session cookie");
        // `jwt=<token>; HttpOnly; ...` -> `jwt=<token>`
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = app();
        let (status, set_cookie, _) = post_json(
            &app,
            "/panel/auth",
            None,
            json!({ "username": "admin", "password": "hunter3" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(set_cookie.is_none());
    }

    #[tokio::test]
    async fn panel_routes_need_a_session() {
        let app = app();
        for uri in [
            "/panel/logout",
            "/panel/ban",
            "/panel/ban_search",
            "/panel/unban",
            "/panel/kick",
            "/panel/servers",
        ] {
            let (status, _, _) = post_json(&app, uri, None, json!({})).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        }
        let (status, _, _) = post_json(
            &app,
            "/panel/ban_search",
            Some("jwt=forged.token.value"),
            json!({ "identifier": "1" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ban_search_and_unban_round_trip() {
        let app = app();
        let session = login(&app).await;

        let (status, _, _) = post_json(
            &app,
            "/panel/ban",
            Some(&session),
            json!({ "identifier": "10.0.0.1", "reason": "aimbot", "unban_timestamp": null }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = post_json(
            &app,
            "/panel/ban_search",
            Some(&session),
            json!({ "identifier": "::ffff:10.0.0.1" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let records: Vec<BanRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reason, "aimbot");
        assert!(records[0].banned_on.is_some());
        assert!(records[0].unban_date.is_none());

        let key = records[0].ban_id;
        let (status, _, _) =
            post_json(&app, "/panel/unban", Some(&session), json!({ "key": key })).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _, _) =
            post_json(&app, "/panel/unban", Some(&session), json!({ "key": key })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ban_failures_are_plain_text() {
        let app = app();
        let session = login(&app).await;

        let cases = [
            (json!({ "identifier": "", "reason": "" }), "No identifier specified"),
            (json!({ "identifier": "not an id", "reason": "" }), "Invalid Identifier"),
            (
                json!({ "identifier": "5", "reason": "", "unban_timestamp": 1000 }),
                "Ban expiry date is in the past",
            ),
        ];
        for (body, message) in cases {
            let (status, _, body) = post_json(&app, "/panel/ban", Some(&session), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(String::from_utf8(body).unwrap(), message);
        }
    }

    #[tokio::test]
    async fn kicks_reach_the_next_bulk_check_once() {
        let app = app();
        let session = login(&app).await;

        let (status, _, body) = post_json(
            &app,
            "/servers/add",
            None,
            json!({
                "name": "EU 1", "description": null, "map": "mp_rr_desertlands",
                "playlist": "trios", "maxPlayers": 60, "playerCount": 2,
                "port": 37015, "key": "k3y"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let added: Value = serde_json::from_slice(&body).unwrap();
        let uid = added["uid"].as_str().unwrap().to_string();

        let (status, _, _) = post_json(
            &app,
            "/panel/kick",
            Some(&session),
            json!({ "server_uid": uid, "player_uids": [11, 12] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let check = json!({ "uid": uid, "players": [{ "id": 11 }, { "id": 12 }, { "id": 13 }] });
        let (status, _, body) = post_json(&app, "/banlist/bulkCheck", None, check.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            response["bannedPlayers"],
            json!([
                { "id": 11, "reason": "Kicked from server" },
                { "id": 12, "reason": "Kicked from server" }
            ])
        );

        let (_, _, body) = post_json(&app, "/banlist/bulkCheck", None, check).await;
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["bannedPlayers"], json!([]));
    }

    #[tokio::test]
    async fn kick_on_unknown_server_fails() {
        let app = app();
        let session = login(&app).await;
        let (status, _, body) = post_json(
            &app,
            "/panel/kick",
            Some(&session),
            json!({ "server_uid": "missing", "player_uids": [1] }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(String::from_utf8(body).unwrap(), "Could not find server");
    }

    #[tokio::test]
    async fn bulk_check_reports_banned_players() {
        let app = app();
        let session = login(&app).await;
        post_json(
            &app,
            "/panel/ban",
            Some(&session),
            json!({ "identifier": "77", "reason": "", "unban_timestamp": null }),
        )
        .await;
        let (_, _, body) = post_json(
            &app,
            "/servers/add",
            None,
            json!({
                "name": "NA 2", "description": null, "map": "mp_rr_olympus",
                "playlist": "duos", "maxPlayers": 40, "playerCount": 1,
                "port": 37016, "key": "other"
            }),
        )
        .await;
        let added: Value = serde_json::from_slice(&body).unwrap();
        let uid = added["uid"].as_str().unwrap();

        let (status, _, body) = post_json(
            &app,
            "/banlist/isBanned",
            None,
            json!({ "uid": uid, "id": 77 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["banned"], json!(true));
        assert_eq!(response["reason"], json!("You have been banned!"));

        let (_, _, body) = post_json(
            &app,
            "/banlist/bulkCheck",
            None,
            json!({ "uid": uid, "players": [{ "id": 76 }, { "id": 77 }] }),
        )
        .await;
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            response["bannedPlayers"],
            json!([{ "id": 77, "reason": "You have been banned!" }])
        );

        let (status, _, _) = post_json(
            &app,
            "/banlist/isBanned",
            None,
            json!({ "uid": "unlisted", "id": 77 }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn public_list_hides_hidden_servers() {
        let app = app();
        let (_, _, body) = post_json(
            &app,
            "/servers/add",
            None,
            json!({
                "name": "private", "description": null, "map": "m", "playlist": "p",
                "maxPlayers": 4, "playerCount": 0, "port": 40000, "key": "x", "hidden": true
            }),
        )
        .await;
        let added: Value = serde_json::from_slice(&body).unwrap();
        let token = added["token"].as_str().unwrap().to_string();

        let (_, _, body) = post_json(&app, "/servers", None, json!({})).await;
        let listed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed["servers"], json!([]));

        let (status, _, body) =
            post_json(&app, "/servers/byToken", None, json!({ "token": token })).await;
        assert_eq!(status, StatusCode::OK);
        let found: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(found["server"]["name"], json!("private"));
    }

    #[tokio::test]
    async fn logout_removes_the_session_cookie() {
        let app = app();
        let session = login(&app).await;

        let (status, set_cookie, _) =
            post_json(&app, "/panel/logout", Some(&session), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let set_cookie = set_cookie.expect("logout overwrites the session cookie");
        assert!(set_cookie.starts_with("jwt=;"), "{}", set_cookie);
        assert!(set_cookie.contains("Max-Age=0"), "{}", set_cookie);
    }

    #[tokio::test]
    async fn invalid_servers_are_not_listed() {
        let app = app();
        let cases = [
            json!({
                "name": "  ", "description": null, "map": "m", "playlist": "p",
                "maxPlayers": 4, "playerCount": 0, "port": 37015, "key": "x"
            }),
            json!({
                "name": "no port", "description": null, "map": "m", "playlist": "p",
                "maxPlayers": 4, "playerCount": 0, "port": 0, "key": "x"
            }),
        ];
        for body in cases {
            let (status, _, body) = post_json(&app, "/servers/add", None, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let response: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(response["success"], json!(false));
        }

        let (_, _, body) = post_json(&app, "/servers", None, json!({})).await;
        let listed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed["servers"], json!([]));
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let app = app();
        let (status, _, body) =
            post_json(&app, "/servers/byToken", None, json!({ "token": "nope" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["error"], json!("Server not found"));
    }

    #[tokio::test]
    async fn is_banned_always_carries_a_reason() {
        let app = app();
        let (_, _, body) = post_json(
            &app,
            "/servers/add",
            None,
            json!({
                "name": "clean", "description": null, "map": "m", "playlist": "p",
                "maxPlayers": 4, "playerCount": 0, "port": 37030, "key": "c"
            }),
        )
        .await;
        let added: Value = serde_json::from_slice(&body).unwrap();
        let uid = added["uid"].as_str().unwrap();

        let (status, _, body) = post_json(
            &app,
            "/banlist/isBanned",
            None,
            json!({ "uid": uid, "id": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(response["banned"], json!(false));
        assert_eq!(response["reason"], json!("You have been banned!"));
    }

    #[tokio::test]
    async fn panel_server_list_shows_uids_and_players() {
        let app = app();
        let session = login(&app).await;
        let mut uids = Vec::new();
        for (port, hidden) in [(37040, false), (37041, true)] {
            let (_, _, body) = post_json(
                &app,
                "/servers/add",
                None,
                json!({
                    "name": "s", "description": null, "map": "m", "playlist": "p",
                    "maxPlayers": 4, "playerCount": 1, "port": port, "key": "k",
                    "hidden": hidden
                }),
            )
            .await;
            let added: Value = serde_json::from_slice(&body).unwrap();
            uids.push(added["uid"].as_str().unwrap().to_string());
        }
        post_json(
            &app,
            "/banlist/bulkCheck",
            None,
            json!({ "uid": uids[1], "players": [{ "id": 5 }] }),
        )
        .await;

        let (status, _, body) = post_json(&app, "/panel/servers", Some(&session), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let list: PanelServerList = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.public.len(), 1);
        assert_eq!(list.public[0].uid, uids[0]);
        assert!(list.public[0].token.is_none());
        assert_eq!(list.hidden.len(), 1);
        assert_eq!(list.hidden[0].uid, uids[1]);
        assert!(list.hidden[0].token.is_some());
        assert_eq!(list.hidden[0].players.len(), 1);
        assert_eq!(list.hidden[0].players[0].uid, Some(5));
    }
}
