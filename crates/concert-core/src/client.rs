//! REST client for the concert API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::record::{normalize_payload, ConcertRecord, RawPayload};
use crate::session::UserSession;
use crate::validate::ConcertForm;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// `{status, id?, message?}` from the admin mutation endpoints.
#[derive(Debug, Deserialize)]
struct MutationReceipt {
    #[serde(default)]
    status: Option<String>,
    #[serde(default, deserialize_with = "crate::record::de_opt_id")]
    id: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

impl MutationReceipt {
    fn succeeded(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    fn rejection(self, fallback: &str) -> ApiError {
        ApiError::Rejected(self.message.unwrap_or_else(|| fallback.to_string()))
    }
}

/// `{success, user?, error?}` from the auth endpoints.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    user: Option<UserSession>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupBody<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch and normalize the full concert list. Tolerates both envelope
    /// shapes the API has shipped (see `record::RawPayload`).
    pub async fn fetch_concerts(&self) -> Result<Vec<ConcertRecord>, ApiError> {
        let resp = self
            .http
            .get(self.url("/api/concerts/get_concerts"))
            .send()
            .await?
            .error_for_status()?;
        let payload: RawPayload = decode(&resp.text().await?, "concert list")?;
        normalize_payload(payload)
    }

    /// Add or update a concert. The endpoint takes a multipart form and keys
    /// add-vs-update off the presence of `id`. Returns the saved record's id
    /// when the server reports one.
    pub async fn save_concert(&self, form: &ConcertForm) -> Result<Option<i64>, ApiError> {
        let mut parts = reqwest::multipart::Form::new()
            .text("name", form.name.trim().to_string())
            .text("date", form.date.trim().to_string())
            .text("time", form.time.trim().to_string())
            .text("location", form.location.trim().to_string())
            .text("details", form.details.trim().to_string())
            .text("genre", form.genre.trim().to_string())
            .text("price", form.price.trim().to_string())
            .text("status", form.status.as_str());
        if let Some(id) = form.id {
            parts = parts.text("id", id.to_string());
        }

        let resp = self
            .http
            .post(self.url("/api/concerts/add_or_update_concert"))
            .multipart(parts)
            .send()
            .await?
            .error_for_status()?;
        let receipt: MutationReceipt = decode(&resp.text().await?, "save receipt")?;
        if receipt.succeeded() {
            Ok(receipt.id.or(form.id))
        } else {
            Err(receipt.rejection("concert was not saved"))
        }
    }

    pub async fn delete_concert(&self, id: i64) -> Result<(), ApiError> {
        let resp = self
            .http
            .delete(self.url("/api/concerts/delete_concerts"))
            .query(&[("id", id)])
            .send()
            .await?
            .error_for_status()?;
        let receipt: MutationReceipt = decode(&resp.text().await?, "delete receipt")?;
        if receipt.succeeded() {
            Ok(())
        } else {
            Err(receipt.rejection("concert was not deleted"))
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserSession, ApiError> {
        self.auth("/api/auth/login", &LoginBody { email, password })
            .await
    }

    pub async fn signup(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSession, ApiError> {
        self.auth(
            "/api/auth/signup",
            &SignupBody {
                first_name,
                last_name,
                email,
                password,
            },
        )
        .await
    }

    async fn auth<B: Serialize>(&self, path: &str, body: &B) -> Result<UserSession, ApiError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let auth: AuthResponse = decode(&resp.text().await?, "auth response")?;
        if auth.success {
            auth.user
                .ok_or_else(|| ApiError::Format("auth success without a user record".into()))
        } else {
            Err(ApiError::Rejected(
                auth.error.unwrap_or_else(|| "authentication failed".into()),
            ))
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Format(format!("{what}: {e}")))
}
