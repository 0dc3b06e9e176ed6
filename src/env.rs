use log::{info, warn};
use std::{
    env::VarError,
    net::{Ipv4Addr, SocketAddr},
    num::{NonZeroU16, NonZeroU8},
    path::PathBuf,
    str::FromStr,
};

use reqwest::Url;

use crate::client::gateway::DEFAULT_ORIGIN;

/// Settings of the panel backend.
pub struct Environment {
    pub bind_addr: SocketAddr,
    pub session_minutes: NonZeroU8,
    pub secure_cookie: bool,
    pub server_timeout: NonZeroU16,
}

impl Environment {
    pub fn load() -> Self {
        info!("Loading environment variables...");
        let bind_addr = get_env(
            "PANEL_BIND",
            SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
        );
        let session_minutes = get_env("SESSION_MINUTES", NonZeroU8::new(10).unwrap());
        let secure_cookie = get_env("SECURE_COOKIE", true);
        let server_timeout = get_env("SERVER_TIMEOUT", NonZeroU16::new(30).unwrap());
        Self {
            bind_addr,
            session_minutes,
            secure_cookie,
            server_timeout,
        }
    }

    /// Read before the logger exists, so it can't warn about a bad value.
    pub fn log_file() -> PathBuf {
        std::env::var("PANEL_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs/ms_panel.log"))
    }
}

/// Settings of the terminal panel client.
pub struct ClientEnvironment {
    pub origin: Url,
    pub accept_invalid_certs: bool,
}

impl ClientEnvironment {
    pub fn load() -> Self {
        info!("Loading environment variables...");
        let origin = get_env("PANEL_ORIGIN", default_origin());
        let accept_invalid_certs = get_env("ACCEPT_INVALID_CERTS", false);
        Self {
            origin,
            accept_invalid_certs,
        }
    }

    pub fn log_file() -> PathBuf {
        std::env::var("CONSOLE_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs/panel_console.log"))
    }
}

fn default_origin() -> Url {
    // The constant is a well-formed URL.
    Url::parse(DEFAULT_ORIGIN).unwrap()
}

pub fn load_credentials() -> Result<(String, String), VarError> {
    info!("Loading credentials...");
    let username = std::env::var("ADMIN_USERNAME")?;
    let password = std::env::var("ADMIN_PASSWORD")?;
    Ok((username, password))
}

fn get_env<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(v) => match v.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "<{}>=<{}>: couldn't parse value, using default value",
                    key, &v
                );
                default
            }
        },
        Err(e) => {
            warn!("<{}>: couldn't get value: {}", key, &e);
            default
        }
    }
}
