use std::sync::Arc;

use axum::{Extension, Json};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use cookie::SameSite;
use jsonwebtoken::{encode, Header};
use log::{info, warn};
use serde_json::{json, Value};

use crate::{
    error::LoginError,
    models::{
        auth::{Claims, SESSION_COOKIE},
        panel::LoginRequest,
    },
    Context,
};

pub async fn login_post(
    Json(credentials): Json<LoginRequest>,
    Extension(context): Extension<Arc<Context>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), LoginError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(LoginError::WrongCredentials);
    }

    let in_username = credentials.username.to_lowercase();
    let ref_username = context.username.to_lowercase();
    if in_username != ref_username || credentials.password != context.password {
        warn!("Failed panel login as <{}>", &credentials.username);
        return Err(LoginError::WrongCredentials);
    }

    let max_age = context.session.max_age;
    let claims = Claims::new(in_username, max_age);
    let token = encode(&Header::default(), &claims, &context.keys.encoding)
        .map_err(|_| LoginError::TokenCreation)?;

    let mut jwt = Cookie::new(SESSION_COOKIE, token);
    jwt.set_path("/");
    jwt.set_http_only(true);
    jwt.set_secure(context.session.secure);
    jwt.set_max_age(max_age);
    jwt.set_same_site(SameSite::Strict);
    let cookie_jar = jar.add(jwt);

    info!("<{}> logged into the panel", &claims.sub);
    Ok((cookie_jar, Json(json!({ "success": true }))))
}

pub async fn logout(claims: Claims, jar: CookieJar) -> (CookieJar, Json<Value>) {
    info!("<{}> logged out", &claims.sub);
    let mut jwt = Cookie::named(SESSION_COOKIE);
    jwt.set_path("/");
    (jar.remove(jwt), Json(json!({ "success": true })))
}
