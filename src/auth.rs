//! Auth State Store
//!
//! Mirrors the hosted auth service into reactive state. Every operation
//! resolves to a `Result`; failures also land in the store's `error` field
//! so forms can show them inline.

use std::future::Future;
use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::{AuthBackend, AuthEvent, AuthResponse};
use crate::error::AuthError;
use crate::models::{Session, User, UserUpdate};
use crate::router::{LOGIN_PATH, ROOT_PATH};

const DEFAULT_USER_NAME: &str = "用户";

#[derive(Clone, Debug, Default, Store)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Outcome of a route guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allowed,
    Redirect(&'static str),
}

#[derive(Clone, Copy)]
pub struct AuthStore {
    state: Store<AuthState>,
    backend: StoredValue<Arc<dyn AuthBackend>>,
}

impl AuthStore {
    /// Wrap a backend and follow its sign-in/sign-out notifications.
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        let state = Store::new(AuthState::default());
        // App-lifetime subscription; the handle is not kept.
        let _ = backend.on_auth_state_change(Arc::new(move |event: AuthEvent, session: Option<&Session>| {
            log::debug!("auth state change: {:?}", event);
            match (event, session) {
                (AuthEvent::SignedIn, Some(session)) | (AuthEvent::UserUpdated, Some(session)) => {
                    state.user().set(Some(session.user.clone()));
                }
                (AuthEvent::SignedOut, _) => state.user().set(None),
                _ => {}
            }
        }));
        Self {
            state,
            backend: StoredValue::new(backend),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.user().get()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading().get()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.user().with(Option::is_some)
    }

    /// Metadata name, else email local part, else a generic label
    pub fn user_name(&self) -> String {
        self.state
            .user()
            .with(|user| user.as_ref().and_then(User::display_name))
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
    }

    pub fn clear_error(&self) {
        self.state.error().set(None);
    }

    fn backend(&self) -> Arc<dyn AuthBackend> {
        self.backend.get_value()
    }

    /// Shared loading/error bookkeeping around one backend call
    async fn run<T>(
        &self,
        fallback: &str,
        call: impl Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        self.state.is_loading().set(true);
        self.state.error().set(None);
        let result = call.await.map_err(|mut err| {
            if err.message.trim().is_empty() {
                err.message = fallback.to_string();
            }
            err
        });
        self.state.is_loading().set(false);

        if let Err(err) = &result {
            log::warn!("{}: {}", fallback, err);
            self.state.error().set(Some(err.message.clone()));
        }
        result
    }

    /// Refresh the user from the backend. Never touches `error`.
    pub async fn get_current_user(&self) -> Result<Option<User>, AuthError> {
        match self.backend().get_user().await {
            Ok(user) => {
                self.state.user().set(user.clone());
                Ok(user)
            }
            Err(err) => {
                log::warn!("获取用户信息失败: {}", err);
                self.state.user().set(None);
                Err(err)
            }
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let backend = self.backend();
        let response = self.run("注册失败", backend.sign_up(email, password)).await?;
        if let Some(user) = &response.user {
            self.state.user().set(Some(user.clone()));
        }
        Ok(response)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let backend = self.backend();
        let response = self
            .run("登录失败", backend.sign_in_with_password(email, password))
            .await?;
        if let Some(user) = &response.user {
            self.state.user().set(Some(user.clone()));
        }
        Ok(response)
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let backend = self.backend();
        self.run("登出失败", backend.sign_out()).await?;
        self.state.user().set(None);
        Ok(())
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let backend = self.backend();
        self.run("密码重置邮件发送失败", backend.reset_password_for_email(email))
            .await
    }

    pub async fn update_user(&self, update: &UserUpdate) -> Result<User, AuthError> {
        let backend = self.backend();
        let user = self.run("更新用户信息失败", backend.update_user(update)).await?;
        self.state.user().set(Some(user.clone()));
        Ok(user)
    }

    // ========================
    // Route Guards
    // ========================

    /// Pages for signed-in users only
    pub fn require_auth(&self) -> GuardDecision {
        if self.is_authenticated() {
            GuardDecision::Allowed
        } else {
            GuardDecision::Redirect(LOGIN_PATH)
        }
    }

    /// Pages for anonymous users only (login, sign-up)
    pub fn require_guest(&self) -> GuardDecision {
        if self.is_authenticated() {
            GuardDecision::Redirect(ROOT_PATH)
        } else {
            GuardDecision::Allowed
        }
    }
}
