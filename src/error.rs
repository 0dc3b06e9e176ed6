use std::io;

use axum::{http::StatusCode, response::IntoResponse, Json};
use log::SetLoggerError;
use log4rs::config::runtime::ConfigErrors;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogInitError {
    #[error("Couldn't initialize logger config: {0}")]
    Config(#[from] ConfigErrors),
    #[error("Couldn't create logger: {0}")]
    Create(#[from] SetLoggerError),
    #[error("Couldn't open log file: {0}")]
    File(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Incorrect username and/or password")]
    WrongCredentials,
    #[error("Couldn't create token")]
    TokenCreation,
    #[error("Context wasn't loaded for some reason")]
    ContextNotLoaded,
    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for LoginError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            LoginError::WrongCredentials => StatusCode::UNAUTHORIZED,
            LoginError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            LoginError::ContextNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
            LoginError::InvalidToken => StatusCode::UNAUTHORIZED,
        };
        let msg = format!("{}", self);

        (status, Json(json!({ "success": false, "error": msg }))).into_response()
    }
}

/// Failures of the `/panel` moderation endpoints.
///
/// The body is plain text: the ban form shows it to the operator verbatim.
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("No identifier specified")]
    NoIdentifier,
    #[error("Invalid Identifier")]
    InvalidIdentifier,
    #[error("Invalid unban date")]
    InvalidUnbanDate,
    #[error("Ban expiry date is in the past")]
    ExpiryInPast,
    #[error("Ban not found")]
    BanNotFound,
    #[error("Could not find server")]
    ServerNotFound,
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ModerationError::NoIdentifier
            | ModerationError::InvalidIdentifier
            | ModerationError::InvalidUnbanDate
            | ModerationError::ExpiryInPast => StatusCode::BAD_REQUEST,
            ModerationError::BanNotFound | ModerationError::ServerNotFound => {
                StatusCode::NOT_FOUND
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[derive(Error, Debug)]
pub enum MasterServerError {
    #[error("Unlisted Server")]
    UnlistedServer,
    #[error("Server not found")]
    ServerNotFound,
    #[error("Invalid server: {0}")]
    InvalidServer(&'static str),
}

impl IntoResponse for MasterServerError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            MasterServerError::UnlistedServer => StatusCode::UNAUTHORIZED,
            MasterServerError::ServerNotFound => StatusCode::NOT_FOUND,
            MasterServerError::InvalidServer(_) => StatusCode::BAD_REQUEST,
        };
        let msg = format!("{}", self);

        (status, Json(json!({ "success": false, "error": msg }))).into_response()
    }
}
