//! Session lifecycle on the client.
//!
//! [`AuthContext`] starts in [`AuthState::Loading`]. [`AuthContext::start`]
//! paints from the cached user right away, then asks the server who the
//! token belongs to. A rejected token clears the stored session and lands in
//! [`AuthState::Unauthenticated`]; an unreachable server keeps the cached
//! user so the app stays usable offline. There is no token refresh; an
//! expired session means logging in again.

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{AuthSession, Household, User};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

pub struct AuthContext {
    client: ApiClient,
    state: AuthState,
    household: Option<Household>,
}

impl AuthContext {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: AuthState::Loading,
            household: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The signed-in user's household, loaded after sign-in.
    pub fn household(&self) -> Option<&Household> {
        self.household.as_ref()
    }

    /// Adopt the cached session without contacting the server.
    pub fn restore_cached(&mut self) -> &AuthState {
        let store = self.client.store();
        let cached = match (store.token(), store.cached_user()) {
            (Ok(Some(_)), Ok(Some(user))) => Some(user),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "Failed to read cached session");
                None
            }
            _ => None,
        };
        self.state = match cached {
            Some(user) => AuthState::Authenticated(user),
            None => AuthState::Unauthenticated,
        };
        &self.state
    }

    /// Confirm the stored token with the server and refresh the cached user.
    pub async fn revalidate(&mut self) -> &AuthState {
        if !matches!(self.client.store().token(), Ok(Some(_))) {
            self.sign_out_locally();
            return &self.state;
        }

        match self.client.me().await {
            Ok(user) => {
                if let Err(e) = self.client.store().save_user(&user) {
                    tracing::warn!(error = %e, "Failed to cache user");
                }
                self.load_household(&user).await;
                self.state = AuthState::Authenticated(user);
            }
            Err(e @ (ClientError::Unauthorized(_) | ClientError::NotConfigured)) => {
                tracing::info!(error = %e, "Stored session is no longer valid");
                self.sign_out_locally();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not revalidate session, using cached user");
                if !self.state.is_authenticated() {
                    self.restore_cached();
                }
            }
        }
        &self.state
    }

    /// Cached paint followed by server revalidation.
    pub async fn start(&mut self) -> &AuthState {
        self.restore_cached();
        self.revalidate().await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        let session = self.client.login(email, password).await?;
        let user = self.adopt(session)?;
        self.load_household(&user).await;
        Ok(user)
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let session = self.client.register(name, email, password).await?;
        self.adopt(session)
    }

    pub fn logout(&mut self) {
        self.sign_out_locally();
        tracing::info!("Logged out");
    }

    fn adopt(&mut self, session: AuthSession) -> Result<User, ClientError> {
        self.client
            .store()
            .save_session(&session.token, &session.user)?;
        self.state = AuthState::Authenticated(session.user.clone());
        tracing::info!(user_id = session.user.id, "Signed in");
        Ok(session.user)
    }

    /// Household details are secondary; a failure here is only logged.
    async fn load_household(&mut self, user: &User) {
        self.household = None;
        if user.household_id.is_none() {
            return;
        }
        match self.client.my_household().await {
            Ok(household) => self.household = household,
            Err(e) => tracing::warn!(error = %e, "Failed to load household"),
        }
    }

    fn sign_out_locally(&mut self) {
        if let Err(e) = self.client.store().clear_session() {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        self.state = AuthState::Unauthenticated;
        self.household = None;
    }
}
