//! The single choke point through which the panel talks to its backend.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::{
    cookie::{CookieStore, Jar},
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE},
    redirect::Policy,
    Method, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub const DEFAULT_ORIGIN: &str = "https://localhost";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Endpoint <{0}> is not a path on the panel origin")]
    InvalidEndpoint(String),
    #[error("Couldn't serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Couldn't parse response body: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// When cookies travel with a request, same meaning as `fetch`'s `credentials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    Omit,
    SameOrigin,
    Include,
}

#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub credentials: CredentialsMode,
    pub body: Vec<u8>,
}

/// Status and body exactly as the backend sent them.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Only 200 counts as success for the panel.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        serde_json::from_slice(&self.body).map_err(GatewayError::Deserialize)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

/// POSTs JSON to endpoints of one fixed origin.
///
/// Non-2xx statuses are returned like any other response; an `Err` only means the
/// request never produced a response.
pub struct RequestGateway<T> {
    origin: Url,
    transport: T,
}

impl<T: Transport> RequestGateway<T> {
    pub fn new(origin: Url, transport: T) -> Self {
        Self { origin, transport }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<GatewayResponse, GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(endpoint)?;
        let body = serde_json::to_vec(body).map_err(GatewayError::Serialize)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!("POST {} ({} bytes)", &url, body.len());
        let response = self
            .transport
            .send(GatewayRequest {
                method: Method::POST,
                url,
                headers,
                credentials: CredentialsMode::SameOrigin,
                body,
            })
            .await?;
        debug!("{} answered {}", endpoint, response.status());
        Ok(response)
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, GatewayError> {
        if !endpoint.starts_with('/') {
            return Err(GatewayError::InvalidEndpoint(endpoint.to_string()));
        }
        let url = self
            .origin
            .join(endpoint)
            .map_err(|_| GatewayError::InvalidEndpoint(endpoint.to_string()))?;
        // `//host/path` is a valid relative URL that leaves the origin.
        if url.origin() != self.origin.origin() {
            return Err(GatewayError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(url)
    }
}

/// `reqwest` transport with its own cookie jar.
///
/// Redirects are not followed, so every response reaches the caller untouched.
pub struct HttpTransport {
    client: reqwest::Client,
    origin: Url,
    jar: Arc<Jar>,
}

impl HttpTransport {
    pub fn new(origin: Url, accept_invalid_certs: bool) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            origin,
            jar: Arc::new(Jar::default()),
        })
    }

    fn with_credentials(&self, request: &GatewayRequest) -> bool {
        match request.credentials {
            CredentialsMode::Omit => false,
            CredentialsMode::SameOrigin => request.url.origin() == self.origin.origin(),
            CredentialsMode::Include => true,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let with_credentials = self.with_credentials(&request);
        let url = request.url;

        let mut builder = self
            .client
            .request(request.method, url.clone())
            .headers(request.headers)
            .body(request.body);
        if with_credentials {
            if let Some(cookies) = self.jar.cookies(&url) {
                builder = builder.header(COOKIE, cookies);
            }
        }

        let response = builder.send().await?;
        if with_credentials {
            let mut set_cookies = response.headers().get_all(SET_COOKIE).iter();
            self.jar.set_cookies(&mut set_cookies, &url);
        }

        let status = response.status();
        let body = response.bytes().await?;
        Ok(GatewayResponse::new(status, body.to_vec()))
    }
}
