use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, RequestParts},
    headers::Cookie,
    Extension, TypedHeader,
};
use cookie::time::{Duration, OffsetDateTime};
use jsonwebtoken::{decode, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::LoginError, Context};

pub const SESSION_COOKIE: &str = "jwt";

pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Session of a logged in panel operator, carried in the `jwt` cookie.
///
/// Extracting it from a request rejects with [`LoginError::InvalidToken`]
/// when the cookie is missing, forged or expired.
#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: String, max_age: Duration) -> Self {
        let expiration = OffsetDateTime::now_utc() + max_age;
        Self {
            sub: username,
            exp: expiration.unix_timestamp(),
        }
    }
}

#[async_trait]
impl<B> FromRequest<B> for Claims
where
    B: Send,
{
    type Rejection = LoginError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let ctx: Extension<Arc<Context>> = Extension::from_request(req)
            .await
            .map_err(|_| LoginError::ContextNotLoaded)?;

        let TypedHeader(cookies) = TypedHeader::<Cookie>::from_request(req)
            .await
            .map_err(|_| LoginError::InvalidToken)?;

        let token = cookies.get(SESSION_COOKIE).ok_or(LoginError::InvalidToken)?;

        let data = decode(token, &ctx.keys.decoding, &Validation::default())
            .map_err(|_| LoginError::InvalidToken)?;
        Ok(data.claims)
    }
}
