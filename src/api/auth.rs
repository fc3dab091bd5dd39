//! Auth Backend
//!
//! Thin client for a hosted Supabase (GoTrue) auth service, plus the
//! auth-state-change notification fan-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::models::{Session, User, UserUpdate};

/// Auth-state changes pushed to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    UserUpdated,
}

/// Payload of sign-up and sign-in. Sign-up returns no session while the
/// email address is still unconfirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub session: Option<Session>,
}

pub type AuthListener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

#[async_trait(?Send)]
pub trait AuthBackend: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;
    async fn sign_out(&self) -> Result<(), AuthError>;
    async fn reset_password_for_email(&self, email: &str) -> Result<(), AuthError>;
    async fn update_user(&self, update: &UserUpdate) -> Result<User, AuthError>;
    /// The signed-in user, `None` when there is no session
    async fn get_user(&self) -> Result<Option<User>, AuthError>;
    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription;
}

// ========================
// Listener Registry
// ========================

#[derive(Default)]
pub struct AuthListeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, AuthListener)>>,
}

impl AuthListeners {
    fn entries(&self) -> MutexGuard<'_, Vec<(u64, AuthListener)>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(self: &Arc<Self>, listener: AuthListener) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries().push((id, listener));
        Subscription {
            id,
            listeners: Arc::downgrade(self),
        }
    }

    /// Call every listener. The registry is not locked while they run, so a
    /// listener may subscribe or unsubscribe.
    pub fn emit(&self, event: AuthEvent, session: Option<&Session>) {
        let snapshot: Vec<AuthListener> = self.entries().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in snapshot {
            listener(event, session);
        }
    }

    fn remove(&self, id: u64) {
        self.entries().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Handle returned by `on_auth_state_change`
pub struct Subscription {
    id: u64,
    listeners: Weak<AuthListeners>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.remove(self.id);
        }
    }
}

// ========================
// Supabase Client
// ========================

const SESSION_STORAGE_KEY: &str = "sb-session";

#[derive(Serialize)]
struct CredentialsArgs<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Best message out of a GoTrue error body, which uses several shapes
fn error_from_body(status: u16, body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| format!("auth request failed with status {}", status));
    AuthError::with_status(message, status)
}

/// Sign-up answers with a session, or with a bare user awaiting confirmation
fn parse_auth_response(body: &str) -> Result<AuthResponse, AuthError> {
    if let Ok(session) = serde_json::from_str::<Session>(body) {
        return Ok(AuthResponse {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }
    serde_json::from_str::<User>(body)
        .map(|user| AuthResponse {
            user: Some(user),
            session: None,
        })
        .map_err(|e| AuthError::new(format!("unexpected auth response: {}", e)))
}

pub struct SupabaseAuth {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Mutex<Option<Session>>,
    listeners: Arc<AuthListeners>,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            session: Mutex::new(stored_session::load()),
            listeners: Arc::new(AuthListeners::default()),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn access_token(&self) -> Option<String> {
        self.session().as_ref().map(|s| s.access_token.clone())
    }

    fn set_session(&self, session: Option<Session>) {
        match &session {
            Some(s) => stored_session::save(s),
            None => stored_session::clear(),
        }
        *self.session() = session;
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.endpoint(path))
            .header("apikey", &self.anon_key);
        match self.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(&self.anon_key),
        }
    }

    /// Send and return the body text of a 2xx response
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, AuthError> {
        let response = builder
            .send()
            .await
            .map_err(|e| AuthError::new(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| AuthError::new(e.to_string()))?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_body(status.as_u16(), &body))
        }
    }

    fn adopt(&self, response: &AuthResponse) {
        if let Some(session) = &response.session {
            self.set_session(Some(session.clone()));
            self.listeners.emit(AuthEvent::SignedIn, Some(session));
        }
    }
}

#[async_trait(?Send)]
impl AuthBackend for SupabaseAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let builder = self
            .request(reqwest::Method::POST, "signup")
            .json(&CredentialsArgs { email, password });
        let response = parse_auth_response(&self.send(builder).await?)?;
        self.adopt(&response);
        Ok(response)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let builder = self
            .request(reqwest::Method::POST, "token?grant_type=password")
            .json(&CredentialsArgs { email, password });
        let response = parse_auth_response(&self.send(builder).await?)?;
        self.adopt(&response);
        Ok(response)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.access_token().is_some() {
            self.send(self.request(reqwest::Method::POST, "logout")).await?;
        }
        self.set_session(None);
        self.listeners.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<(), AuthError> {
        let builder = self
            .request(reqwest::Method::POST, "recover")
            .json(&EmailArgs { email });
        self.send(builder).await?;
        Ok(())
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<User, AuthError> {
        if self.access_token().is_none() {
            return Err(AuthError::new("Auth session missing!"));
        }
        let body = self.send(self.request(reqwest::Method::PUT, "user").json(update)).await?;
        let user: User = serde_json::from_str(&body).map_err(|e| AuthError::new(e.to_string()))?;

        let session = {
            let mut guard = self.session();
            if let Some(session) = guard.as_mut() {
                session.user = user.clone();
            }
            guard.clone()
        };
        if let Some(session) = &session {
            stored_session::save(session);
        }
        self.listeners.emit(AuthEvent::UserUpdated, session.as_ref());
        Ok(user)
    }

    async fn get_user(&self) -> Result<Option<User>, AuthError> {
        if self.access_token().is_none() {
            return Ok(None);
        }
        match self.send(self.request(reqwest::Method::GET, "user")).await {
            Ok(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| AuthError::new(e.to_string())),
            Err(err) if err.status == Some(401) => {
                log::info!("stored session rejected, signing out locally");
                self.set_session(None);
                self.listeners.emit(AuthEvent::SignedOut, None);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn on_auth_state_change(&self, listener: AuthListener) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

/// Session persistence in `localStorage`. A no-op outside the browser.
mod stored_session {
    use crate::models::Session;

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Option<Session> {
        let raw = storage()?.get_item(super::SESSION_STORAGE_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(session: &Session) {
        let (Some(storage), Ok(raw)) = (storage(), serde_json::to_string(session)) else {
            return;
        };
        if storage.set_item(super::SESSION_STORAGE_KEY, &raw).is_err() {
            log::warn!("could not persist auth session");
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn clear() {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(super::SESSION_STORAGE_KEY);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Option<Session> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(_session: &Session) {}

    #[cfg(not(target_arch = "wasm32"))]
    pub fn clear() {}
}
