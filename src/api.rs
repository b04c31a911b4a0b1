use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client, Proxy, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{API_BASE_URL, REQUEST_TIMEOUT},
    utils::random_user_agent,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EarningsResponse {
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    pub data: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub current_tier: String,
    #[serde(default)]
    pub points_balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub message: Option<String>,
    pub data: Option<AuthData>,
}

#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub token: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// The service is reached by raw host without strict cert pinning, so
/// certificate verification stays off.
pub fn build_http_client(proxy: Option<Proxy>) -> eyre::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let mut builder = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .danger_accept_invalid_certs(true)
        .user_agent(random_user_agent())
        .default_headers(headers);

    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, API_BASE_URL)
    }

    /// Tests point this at a local mock server.
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn connect(&self, token: &str) -> Result<MessageResponse, ApiError> {
        self.post(
            "/api/user/widget-connect",
            Some(token),
            &serde_json::json!({ "connected": true }),
        )
        .await
    }

    pub async fn get_earnings(&self, token: &str) -> Result<EarningsResponse, ApiError> {
        self.get("/api/stats/epoch-earnings", token).await
    }

    pub async fn get_user_info(&self, token: &str) -> Result<UserInfoResponse, ApiError> {
        self.get("/api/user/details", token).await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post("/api/user/register", None, &Credentials { email, password })
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post("/api/user/login", None, &Credentials { email, password })
            .await
    }

    pub async fn create_profile(
        &self,
        token: &str,
        payload: &Value,
    ) -> Result<MessageResponse, ApiError> {
        self.post("/api/user/profile-creation", Some(token), payload)
            .await
    }

    pub async fn confirm_referral(
        &self,
        token: &str,
        referral_code: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.post(
            "/api/access-code/referal",
            Some(token),
            &serde_json::json!({ "referral_code": referral_code }),
        )
        .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let request = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token);

        Self::execute(request).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let mut request = self.http.post(format!("{}{path}", self.base_url)).json(body);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        Self::execute(request).await
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}
