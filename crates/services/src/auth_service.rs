use std::sync::Arc;

use api::{ApiError, AuthStatus, Authenticator, Credentials, sanitize_next};
use tracing::info;

use crate::error::AuthError;

/// Login flow for the `/auth` page.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn Authenticator>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn Authenticator>) -> Self {
        Self { auth }
    }

    /// Sign in and keep the session cookie for later requests.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` without contacting the server when
    /// either field is blank, `AuthError::InvalidCredentials` when the server
    /// refuses them, and `AuthError::Api` for anything else.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
            remember,
        };
        match self.auth.login(&credentials).await {
            Ok(()) => {
                info!(email, "login succeeded");
                Ok(())
            }
            Err(ApiError::Unauthorized) => Err(AuthError::InvalidCredentials),
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError::Api` if the server cannot be reached.
    pub async fn check_auth(&self) -> Result<AuthStatus, AuthError> {
        Ok(self.auth.check_auth().await?)
    }

    /// Where to go after a successful login: `next` when it is a local path,
    /// otherwise the home page.
    #[must_use]
    pub fn landing_path(next: Option<&str>) -> &str {
        next.and_then(sanitize_next).unwrap_or("/")
    }
}
