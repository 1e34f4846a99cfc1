//! Signed-in session persisted in a key-value store.
//!
//! The bearer token is stored raw under `token` and the user snapshot as JSON
//! under `user`. When the backend cannot be reached, sign-in succeeds with a
//! mock account built from the username.

use campus_eats_core::storage::{self, keys};
use campus_eats_core::{KeyValueStore, StoreError};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, Credentials, FallbackPolicy, MessageResponse, SignupRequest, User};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::fixtures;

/// The current user and their token, if any.
pub struct Session<S> {
    store: S,
    token: Option<SecretString>,
    user: Option<User>,
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the session persisted in `store`.
    ///
    /// An unreadable token or user snapshot counts as signed out.
    pub fn load(store: S) -> Self {
        let token = match store.get(keys::TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        };
        let user = storage::load_json(&store, keys::USER);

        Self { store, token, user }
    }

    /// Bearer token for user-scoped backend calls.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in and persist the token and user snapshot.
    ///
    /// The user snapshot is written first. If the token cannot be written the
    /// previous snapshot is put back, so a failed sign-in leaves the stored
    /// and in-memory session as they were.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session cannot be persisted.
    #[instrument(skip(self, api, credentials), fields(username = %credentials.username))]
    pub async fn login(
        &mut self,
        api: &ApiClient,
        policy: FallbackPolicy,
        credentials: &Credentials,
    ) -> Result<&User, StoreError> {
        let auth = policy
            .call_with(
                api.sign_in(credentials),
                || fixtures::mock_sign_in(&credentials.username),
                "sign in",
            )
            .await;

        let user = User::from(&auth);
        storage::save_json(&mut self.store, keys::USER, &user)?;

        let token_written = match &auth.token {
            Some(token) => self.store.set(keys::TOKEN, token.clone()),
            None => self.store.remove(keys::TOKEN),
        };
        if let Err(e) = token_written {
            self.restore_user_snapshot();
            return Err(e);
        }

        set_sentry_user(&user.id, Some(&user.email));
        info!(user_id = %user.id, "Signed in");

        self.token = auth.token.map(SecretString::from);
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    fn restore_user_snapshot(&mut self) {
        let restored = match &self.user {
            Some(previous) => storage::save_json(&mut self.store, keys::USER, previous),
            None => self.store.remove(keys::USER),
        };
        if let Err(e) = restored {
            warn!(error = %e, "Failed to restore user snapshot");
        }
    }

    /// Forget the token and user snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the snapshots cannot be removed.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.store.remove(keys::TOKEN)?;
        self.store.remove(keys::USER)?;
        self.token = None;
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "Signed out");
        }
        clear_sentry_user();
        Ok(())
    }
}

/// Register a new account. Does not sign in.
#[instrument(skip(api, request), fields(username = %request.username))]
pub async fn register(
    api: &ApiClient,
    policy: FallbackPolicy,
    request: &SignupRequest,
) -> MessageResponse {
    policy
        .call_with(
            api.sign_up(request),
            || MessageResponse::new("User registered successfully!"),
            "sign up",
        )
        .await
}

/// Copy a token out of a session so the session lock can be released.
#[must_use]
pub fn detach_token(token: Option<&SecretString>) -> Option<SecretString> {
    token.map(|t| SecretString::from(t.expose_secret().to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use campus_eats_core::MemoryStore;

    use super::*;
    use crate::config::ApiConfig;

    fn offline_client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
        })
        .unwrap()
    }

    fn credentials(username: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn test_offline_login_persists_mock_user() {
        let api = offline_client();
        let mut session = Session::load(MemoryStore::new());
        assert!(!session.is_signed_in());

        let user = session
            .login(&api, FallbackPolicy::Quiet, &credentials("priya"))
            .await
            .unwrap();
        assert_eq!(user.name, "Priya");
        assert_eq!(user.email, "priya@example.com");

        let restored = Session::load(session.store);
        assert_eq!(
            restored.token().map(|t| t.expose_secret()),
            Some(fixtures::MOCK_TOKEN)
        );
        assert_eq!(restored.user().unwrap().username, "priya");
    }

    #[tokio::test]
    async fn test_logout_removes_both_snapshots() {
        let api = offline_client();
        let mut session = Session::load(MemoryStore::new());
        session
            .login(&api, FallbackPolicy::Quiet, &credentials("dev"))
            .await
            .unwrap();

        session.logout().unwrap();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
        assert!(session.store.is_empty());
    }

    /// Memory store whose token writes always fail.
    #[derive(Default)]
    struct TokenWriteFails(MemoryStore);

    impl KeyValueStore for TokenWriteFails {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            if key == keys::TOKEN {
                return Err(StoreError::InvalidKey(key.to_string()));
            }
            self.0.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.remove(key)
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            self.0.clear()
        }
    }

    #[tokio::test]
    async fn test_failed_token_write_keeps_previous_session() {
        let api = offline_client();
        let mut store = TokenWriteFails::default();
        storage::save_json(
            &mut store,
            keys::USER,
            &User::from(&fixtures::mock_sign_in("old")),
        )
        .unwrap();
        let mut session = Session::load(store);

        let result = session
            .login(&api, FallbackPolicy::Quiet, &credentials("new"))
            .await;
        assert!(result.is_err());
        assert_eq!(session.user().unwrap().username, "old");
        assert!(session.token().is_none());

        let restored = Session::load(session.store);
        assert_eq!(restored.user().unwrap().username, "old");
        assert!(restored.token().is_none());
    }

    #[tokio::test]
    async fn test_failed_token_write_when_signed_out_stays_signed_out() {
        let api = offline_client();
        let mut session = Session::load(TokenWriteFails::default());

        let result = session
            .login(&api, FallbackPolicy::Quiet, &credentials("new"))
            .await;
        assert!(result.is_err());
        assert!(!session.is_signed_in());
        assert!(!Session::load(session.store).is_signed_in());
    }

    #[test]
    fn test_corrupt_user_snapshot_is_signed_out() {
        let session = Session::load(MemoryStore::with_entry(keys::USER, "{not json"));
        assert!(!session.is_signed_in());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::load(MemoryStore::with_entry(keys::TOKEN, "secret-token"));
        assert!(!format!("{session:?}").contains("secret-token"));
    }

    #[tokio::test]
    async fn test_offline_register_acknowledges() {
        let api = offline_client();
        let request = SignupRequest {
            username: "new".to_string(),
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
            name: None,
        };
        let response = register(&api, FallbackPolicy::Quiet, &request).await;
        assert_eq!(response.message, "User registered successfully!");
    }
}
