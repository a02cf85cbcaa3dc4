// src/api/types.rs — Wire types for the relay backend
//
// The backend is loosely typed: ids arrive as numbers or strings, most fields
// are nullable, and every response is wrapped in the same envelope. Everything
// here deserializes defensively with serde defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// The `{code, data, message, timestamp}` wrapper every endpoint returns.
///
/// The backend signals success with `code == 200` OR `code == 0` depending on
/// the endpoint. [`Envelope::into_outcome`] is the single place that convention
/// is interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    // default = "Option::default" keeps the derive from demanding T: Default
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Envelope normalized into a tagged result, built immediately after parsing
/// so the dual-code convention is checked exactly once.
#[derive(Debug, Clone)]
pub enum ApiOutcome<T> {
    Success(T),
    Failure { code: i64, message: String },
}

impl<T> Envelope<T> {
    pub fn into_outcome(self) -> ApiOutcome<T> {
        match (self.code, self.data) {
            (200 | 0, Some(data)) => ApiOutcome::Success(data),
            (code, _) => ApiOutcome::Failure {
                code,
                message: self.message.unwrap_or_default(),
            },
        }
    }
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Accepts a backend id sent as either a JSON number or a string.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::String(s) => s,
    })
}

/// Payload of a successful login: a session token plus the user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub user_info: UserProfile,
}

/// Backend-owned account/subscription record, keyed by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub subscription_type: Option<String>,
    #[serde(default)]
    pub subscription_status: Option<String>,
    /// Millisecond timestamps for the current subscription window.
    #[serde(default)]
    pub subscription_start: Option<i64>,
    #[serde(default)]
    pub subscription_end: Option<i64>,
    #[serde(default)]
    pub subscription_config: Option<SubscriptionConfig>,
}

/// Plan limits embedded in the profile record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionConfig {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub token_limit: Option<i64>,
    #[serde(default)]
    pub rate_limit_window_minutes: Option<i64>,
    #[serde(default)]
    pub rate_limit_requests: Option<i64>,
    #[serde(default)]
    pub concurrency_limit: Option<i64>,
    #[serde(default)]
    pub daily_cost_limit: Option<f64>,
    #[serde(default)]
    pub weekly_opus_cost_limit: Option<f64>,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub model_restricted: bool,
}

/// Real-time usage counters and limit state for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub request_count: i64,
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
    #[serde(default)]
    pub cache_write_tokens: i64,
    #[serde(default)]
    pub cache_read_tokens: i64,
    #[serde(default)]
    pub total_tokens: i64,
    #[serde(default)]
    pub total_cost: f64,
    /// Millisecond timestamp the current rate-limit window opened.
    #[serde(default)]
    pub window_start: Option<i64>,
    #[serde(default)]
    pub window_request_count: i64,
    #[serde(default)]
    pub allowed_models: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_clients: Option<Vec<String>>,
}

/// Read-only plan reference data. Fetched fresh per use, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub monthly_price: Option<f64>,
    #[serde(default)]
    pub token_limit: Option<i64>,
    #[serde(default)]
    pub rate_limit_window_minutes: Option<i64>,
    #[serde(default)]
    pub rate_limit_requests: Option<i64>,
    #[serde(default)]
    pub concurrency_limit: Option<i64>,
    #[serde(default)]
    pub daily_cost_limit: Option<f64>,
    #[serde(default)]
    pub weekly_opus_cost_limit: Option<f64>,
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub model_restricted: bool,
}

/// Per-model usage for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    pub model: String,
    #[serde(default)]
    pub requests: i64,
    #[serde(default)]
    pub input_tokens: i64,
    #[serde(default)]
    pub output_tokens: i64,
    #[serde(default)]
    pub cache_write_tokens: i64,
    #[serde(default)]
    pub cache_read_tokens: i64,
    #[serde(default)]
    pub total_tokens: i64,
    #[serde(default)]
    pub input_cost: f64,
    #[serde(default)]
    pub output_cost: f64,
    #[serde(default)]
    pub total_cost: f64,
    /// Pre-formatted display string for the total cost, e.g. "$1.25".
    #[serde(default)]
    pub total_cost_display: Option<String>,
}

/// Inner payload of the per-model stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStatsPage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<ModelUsage>,
    #[serde(default)]
    pub period: Option<String>,
}

/// Payment order descriptor. `payment_url` is handed to the user unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    #[serde(default)]
    pub order_no: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    pub payment_url: String,
}

/// Reporting period for per-model stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Monthly,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Daily => write!(f, "daily"),
            Period::Monthly => write!(f, "monthly"),
        }
    }
}

/// Payment channel accepted by the order endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum PaymentMethod {
    #[serde(rename = "alipay")]
    #[value(name = "alipay")]
    Alipay,
    #[serde(rename = "wechat-pay")]
    #[value(name = "wechat")]
    WechatPay,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Alipay => write!(f, "alipay"),
            PaymentMethod::WechatPay => write!(f, "wechat"),
        }
    }
}
