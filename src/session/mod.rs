// src/session/mod.rs — The authenticated session and its manager
//
// One SessionManager is built in main and passed by reference to every
// command; there is no global. It owns the façade and the store, holds the
// single in-memory Session, and mirrors every mutation to durable storage.

pub mod store;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::types::{ApiOutcome, UserProfile, UserStats};
use crate::api::ApiClient;
use crate::infra::errors::ProxydashError;
use store::SessionStore;

/// The authenticated user's cached identity, profile, and usage snapshot.
///
/// `id` and `phone` are set once at login and never overwritten; refreshes
/// replace only the `profile` and `stats` sub-records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub phone: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub auth_token: String,
    pub profile: Option<UserProfile>,
    pub stats: Option<UserStats>,
}

pub struct SessionManager {
    api: ApiClient,
    store: SessionStore,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            session: None,
        }
    }

    /// Rehydrate a previously persisted session, once at process start.
    /// A corrupt stored entry is discarded and we start unauthenticated.
    pub fn bootstrap(&mut self) {
        self.session = self.store.load();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current user id, or the precondition error every refresh shares.
    fn user_id(&self) -> Result<String, ProxydashError> {
        self.session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or(ProxydashError::NotAuthenticated)
    }

    // ── Backend selection (pass-throughs for the settings surface) ──────────

    pub fn backend(&self) -> String {
        self.api.base_url()
    }

    pub fn set_backend(&self, url: &str) -> Result<(), ProxydashError> {
        self.api.set_base_url(url)
    }

    // ── Authentication ──────────────────────────────────────────────────────

    /// Ask the backend to SMS a verification code.
    pub async fn request_code(&self, phone: &str) -> Result<(), ProxydashError> {
        match self.api.send_code(phone).await? {
            ApiOutcome::Success(_) => Ok(()),
            ApiOutcome::Failure { code, message } => Err(ProxydashError::backend(
                code,
                Some(message),
                "failed to send verification code",
            )),
        }
    }

    /// Exchange phone + code for a session. On success the session is
    /// enriched with a best-effort stats fetch — enrichment failure is logged
    /// and never fails the login — and persisted either way.
    pub async fn login(&mut self, phone: &str, code: &str) -> Result<(), ProxydashError> {
        let data = match self.api.login(phone, code).await? {
            ApiOutcome::Success(data) => data,
            ApiOutcome::Failure { code, message } => {
                return Err(ProxydashError::backend(code, Some(message), "login failed"));
            }
        };

        let profile = data.user_info;
        let mut session = Session {
            id: profile.id.clone(),
            phone: profile
                .phone
                .clone()
                .unwrap_or_else(|| phone.to_string()),
            display_name: profile
                .nickname
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| mask_phone(phone)),
            avatar_url: profile.avatar_url.clone(),
            auth_token: data.token,
            profile: Some(profile),
            stats: None,
        };

        match self.api.user_stats(&session.id).await {
            Ok(ApiOutcome::Success(stats)) => session.stats = Some(stats),
            Ok(ApiOutcome::Failure { code, message }) => {
                warn!(code, %message, "stats enrichment rejected, continuing without");
            }
            Err(e) => warn!("stats enrichment failed, continuing without: {e}"),
        }

        self.store.save(&session)?;
        self.session = Some(session);
        Ok(())
    }

    /// Drop the session from memory and storage. Idempotent.
    pub fn logout(&mut self) -> Result<(), ProxydashError> {
        self.session = None;
        self.store.clear()
    }

    // ── Refreshes ───────────────────────────────────────────────────────────

    /// Re-fetch the profile sub-record. All-or-nothing: any failure leaves
    /// the cached session untouched in memory and storage.
    pub async fn refresh_profile(&mut self) -> Result<(), ProxydashError> {
        let id = self.user_id()?;
        match self.api.user_info(&id).await? {
            ApiOutcome::Success(profile) => {
                let Some(session) = self.session.as_mut() else {
                    return Err(ProxydashError::NotAuthenticated);
                };
                apply_profile(session, profile);
                self.store.save(session)
            }
            ApiOutcome::Failure { code, message } => Err(ProxydashError::backend(
                code,
                Some(message),
                "failed to refresh profile",
            )),
        }
    }

    /// Re-fetch the usage-stats sub-record. Same contract as
    /// [`refresh_profile`](Self::refresh_profile).
    pub async fn refresh_stats(&mut self) -> Result<(), ProxydashError> {
        let id = self.user_id()?;
        match self.api.user_stats(&id).await? {
            ApiOutcome::Success(stats) => {
                let Some(session) = self.session.as_mut() else {
                    return Err(ProxydashError::NotAuthenticated);
                };
                session.stats = Some(stats);
                self.store.save(session)
            }
            ApiOutcome::Failure { code, message } => Err(ProxydashError::backend(
                code,
                Some(message),
                "failed to refresh usage stats",
            )),
        }
    }

    /// Refresh profile and stats with both requests in flight at once.
    /// Whichever halves succeed are applied; a partial failure is logged and
    /// still counts as success. Only a total failure is an error.
    pub async fn refresh_all(&mut self) -> Result<(), ProxydashError> {
        let id = self.user_id()?;
        let (profile_res, stats_res) =
            tokio::join!(self.api.user_info(&id), self.api.user_stats(&id));

        let Some(session) = self.session.as_mut() else {
            return Err(ProxydashError::NotAuthenticated);
        };

        let mut applied = false;
        let mut first_err: Option<ProxydashError> = None;

        match flatten(profile_res, "failed to refresh profile") {
            Ok(profile) => {
                apply_profile(session, profile);
                applied = true;
            }
            Err(e) => {
                warn!("profile half of refresh failed: {e}");
                first_err.get_or_insert(e);
            }
        }

        match flatten(stats_res, "failed to refresh usage stats") {
            Ok(stats) => {
                session.stats = Some(stats);
                applied = true;
            }
            Err(e) => {
                warn!("stats half of refresh failed: {e}");
                first_err.get_or_insert(e);
            }
        }

        if applied {
            self.store.save(session)?;
            Ok(())
        } else {
            Err(first_err.unwrap_or(ProxydashError::NotAuthenticated))
        }
    }
}

/// Merge a fresh profile into the session. Identity fields stay put; display
/// name and avatar fall back to the prior cached values when the new payload
/// omits them.
fn apply_profile(session: &mut Session, profile: UserProfile) {
    if let Some(nickname) = profile.nickname.clone().filter(|n| !n.is_empty()) {
        session.display_name = nickname;
    }
    if let Some(avatar) = profile.avatar_url.clone() {
        session.avatar_url = Some(avatar);
    }
    session.profile = Some(profile);
}

/// Collapse transport errors and application failures into one error, so the
/// two halves of refresh_all can be handled uniformly.
fn flatten<T>(
    result: Result<ApiOutcome<T>, ProxydashError>,
    fallback: &str,
) -> Result<T, ProxydashError> {
    match result? {
        ApiOutcome::Success(value) => Ok(value),
        ApiOutcome::Failure { code, message } => {
            Err(ProxydashError::backend(code, Some(message), fallback))
        }
    }
}

/// Fallback display name: keep the prefix and last four digits, mask the rest.
/// `13800138000` becomes `138****8000`.
fn mask_phone(phone: &str) -> String {
    if phone.is_ascii() && phone.len() >= 8 {
        format!("{}****{}", &phone[..3], &phone[phone.len() - 4..])
    } else {
        phone.to_string()
    }
}
