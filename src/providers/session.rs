use crate::core::credentials::Credentials;
use crate::core::error::DeliveryError;
use crate::core::settings::ApiSettings;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct LoginRequest<'a> {
    phone: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

struct TokenPair {
    access: String,
    refresh: String,
}

impl From<TokenResponse> for TokenPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access: response.token,
            refresh: response.refresh_token,
        }
    }
}

/// HTTP client that owns the bearer-token session.
///
/// Requests go through [`SessionClient::send`], which attaches the access
/// token and, on a 401, exchanges the refresh token once and retries the
/// request once. Tokens live only in memory and never leave this type.
pub struct SessionClient {
    http: Client,
    base_url: String,
    login_path: String,
    refresh_path: String,
    tokens: Option<TokenPair>,
}

impl SessionClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            login_path: settings.login_path.clone(),
            refresh_path: settings.refresh_path.clone(),
            tokens: None,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_some()
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, self.login_path))
            .json(&LoginRequest {
                phone: credentials.identifier(),
                password: credentials.secret(),
            })
            .send()
            .await?;

        let tokens: TokenResponse = decode(response).await.map_err(DeliveryError::into_auth)?;
        self.tokens = Some(tokens.into());

        tracing::info!(identifier = credentials.identifier(), "Logged in");
        Ok(())
    }

    /// Sends the request produced by `build` and decodes a 200 body into `T`.
    ///
    /// `build` receives the shared client and the base URL, and may be called
    /// twice: once for the original attempt and once for the retry after a
    /// token refresh.
    pub async fn send<T, F>(&mut self, build: F) -> Result<T, DeliveryError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let response = self.dispatch(&build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return decode(response).await;
        }

        tracing::debug!("Access token rejected, refreshing session");
        self.refresh().await?;

        let response = self.dispatch(&build).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(DeliveryError::Auth(
                "access token rejected after refresh".to_string(),
            ));
        }
        decode(response).await
    }

    async fn dispatch<F>(&self, build: &F) -> Result<Response, DeliveryError>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let mut request = build(&self.http, &self.base_url);
        if let Some(tokens) = &self.tokens {
            request = request.bearer_auth(&tokens.access);
        }
        Ok(request.send().await?)
    }

    async fn refresh(&mut self) -> Result<(), DeliveryError> {
        let Some(refresh_token) = self.tokens.as_ref().map(|t| t.refresh.clone()) else {
            return Err(DeliveryError::Auth(
                "no refresh token, log in first".to_string(),
            ));
        };

        let response = self
            .http
            .post(format!("{}{}", self.base_url, self.refresh_path))
            .form(&[("refresh_token", refresh_token.as_str())])
            .send()
            .await?;

        // On failure the stale pair is kept; the next poll fails the same way
        // until credentials are supplied again.
        let tokens: TokenResponse = decode(response).await.map_err(DeliveryError::into_auth)?;
        self.tokens = Some(tokens.into());

        tracing::info!("Session tokens refreshed");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DeliveryError> {
    let status = response.status();
    let body = response.bytes().await?;

    if status == StatusCode::OK {
        return Ok(serde_json::from_slice(&body)?);
    }

    Err(match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(error) => DeliveryError::Api {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
        },
        Err(_) => DeliveryError::Api {
            status: status.as_u16(),
            code: i64::from(status.as_u16()),
            message: "unknown error".to_string(),
        },
    })
}
