// src/api/mod.rs — HTTP façade for the relay backend
//
// Single point of contact with the backend. Every call goes to the configured
// base URL, which persists across runs (a settings screen can point the whole
// app at an alternate backend instance). The façade does request/response
// marshaling only: non-2xx HTTP is a hard error, a 2xx body is parsed and
// normalized into an ApiOutcome for the caller to inspect.

pub mod types;

use std::path::PathBuf;
use std::sync::RwLock;

use serde_json::json;
use tracing::debug;

use crate::infra::errors::ProxydashError;
use types::{
    ApiOutcome, Envelope, LoginData, ModelStatsPage, ModelUsage, PaymentMethod, PaymentOrder,
    Period, SubscriptionPlan, UserProfile, UserStats,
};

/// Production backend origin, used when no override is stored.
pub const DEFAULT_BASE_URL: &str = "https://api.claudecode-relay.com";

const BASE_URL_FILE: &str = "backend_url";

pub struct ApiClient {
    client: reqwest::Client,
    base_url: RwLock<String>,
    storage_dir: PathBuf,
}

impl ApiClient {
    /// Build a client rooted at the given storage directory, picking up a
    /// previously persisted base-URL override if one exists.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        let storage_dir = storage_dir.into();
        let base_url = std::fs::read_to_string(storage_dir.join(BASE_URL_FILE))
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client: reqwest::Client::new(),
            base_url: RwLock::new(base_url),
            storage_dir,
        }
    }

    /// Active backend origin.
    pub fn base_url(&self) -> String {
        self.base_url.read().expect("base_url lock poisoned").clone()
    }

    /// Override the backend origin for all subsequent calls and persist it.
    /// The URL is not validated; a bad value simply makes later calls fail.
    pub fn set_base_url(&self, url: &str) -> Result<(), ProxydashError> {
        std::fs::create_dir_all(&self.storage_dir)?;
        std::fs::write(self.storage_dir.join(BASE_URL_FILE), url)?;
        *self.base_url.write().expect("base_url lock poisoned") = url.to_string();
        Ok(())
    }

    // ── Endpoints ───────────────────────────────────────────────────────────

    /// GET /api/claudeApi/sendCode — ask the backend to SMS a login code.
    /// Phone format is a caller concern; nothing is validated here.
    pub async fn send_code(&self, phone: &str) -> Result<ApiOutcome<String>, ProxydashError> {
        let url = format!("{}/api/claudeApi/sendCode", self.base_url());
        debug!(url, "GET");
        // query() percent-encodes, so a +-prefixed number arrives intact
        let response = self
            .client
            .get(&url)
            .query(&[("phone", phone)])
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// POST /api/claudeApi/login — exchange phone + SMS code for a token and
    /// profile. The login IP is best-effort; the backend only logs it.
    pub async fn login(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<ApiOutcome<LoginData>, ProxydashError> {
        let url = format!("{}/api/claudeApi/login", self.base_url());
        let body = json!({
            "phone": phone,
            "code": code,
            "loginIp": local_ip(),
        });
        self.post(&url, &body).await
    }

    /// GET /api/claudeApi/subscriptionPlans — full plan list, no pagination.
    pub async fn subscription_plans(
        &self,
    ) -> Result<ApiOutcome<Vec<SubscriptionPlan>>, ProxydashError> {
        let url = format!("{}/api/claudeApi/subscriptionPlans", self.base_url());
        self.get(&url).await
    }

    /// GET /api/claudeApi/userInfo/{id}
    pub async fn user_info(&self, user_id: &str) -> Result<ApiOutcome<UserProfile>, ProxydashError> {
        let url = format!("{}/api/claudeApi/userInfo/{user_id}", self.base_url());
        self.get(&url).await
    }

    /// GET /api/claudeApi/userStats/{id}
    pub async fn user_stats(&self, user_id: &str) -> Result<ApiOutcome<UserStats>, ProxydashError> {
        let url = format!("{}/api/claudeApi/userStats/{user_id}", self.base_url());
        self.get(&url).await
    }

    /// POST /api/claudeApi/userModelStats — per-model usage for one period.
    /// Surfaces the inner model list; the page's own `success` flag and period
    /// echo are metadata the dashboard never needed.
    pub async fn model_stats(
        &self,
        user_id: &str,
        period: Period,
    ) -> Result<ApiOutcome<Vec<ModelUsage>>, ProxydashError> {
        let url = format!("{}/api/claudeApi/userModelStats", self.base_url());
        let body = json!({ "apiId": user_id, "period": period });
        let outcome: ApiOutcome<ModelStatsPage> = self.post(&url, &body).await?;
        Ok(match outcome {
            ApiOutcome::Success(page) => ApiOutcome::Success(page.data),
            ApiOutcome::Failure { code, message } => ApiOutcome::Failure { code, message },
        })
    }

    /// POST /api/claudeApi/order/create — create a payment order. The returned
    /// `paymentUrl` is passed through unmodified for the caller to open.
    pub async fn create_order(
        &self,
        plan_id: i64,
        method: PaymentMethod,
        user_id: &str,
    ) -> Result<ApiOutcome<PaymentOrder>, ProxydashError> {
        let url = format!("{}/api/claudeApi/order/create", self.base_url());
        let body = json!({
            "subscriptionConfigId": plan_id,
            "type": method,
            "userId": user_id,
        });
        self.post(&url, &body).await
    }

    // ── Request plumbing ────────────────────────────────────────────────────

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<ApiOutcome<T>, ProxydashError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<ApiOutcome<T>, ProxydashError> {
        debug!(url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Non-2xx is a hard failure and the body is not inspected. On 2xx the
    /// envelope is parsed unconditionally and normalized into an outcome.
    async fn unwrap_envelope<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiOutcome<T>, ProxydashError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProxydashError::Http {
                status: status.as_u16(),
            });
        }
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.into_outcome())
    }
}

/// Best-effort local IP for the login payload. The original dashboard sent a
/// loopback placeholder when detection failed; so do we.
fn local_ip() -> String {
    local_ip_address::local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|_| "127.0.0.1".to_string())
}
