use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{HttpApi, envelope, transport_error};
use crate::ports::{ApiError, AuthStatus, Authenticator, Credentials};

#[derive(Serialize)]
struct LoginForm<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remember: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct CheckAuthBody {
    #[serde(default)]
    authenticated: bool,
    username: Option<String>,
    email: Option<String>,
}

#[async_trait]
impl Authenticator for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let url = self.config.endpoint("api/login")?;
        let form = LoginForm {
            email: credentials.email.trim(),
            password: &credentials.password,
            remember: credentials.remember.then_some("on"),
        };
        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        // A 401 here means the credentials were wrong, not that a session expired.
        if status == StatusCode::UNAUTHORIZED {
            debug!("login rejected");
            return Err(ApiError::Unauthorized);
        }
        let text = response.text().await.map_err(transport_error)?;
        let _: IgnoredAny = envelope::decode(status.as_u16(), status.is_success(), &text)?;
        info!(email = %form.email, "signed in");
        Ok(())
    }

    async fn check_auth(&self) -> Result<AuthStatus, ApiError> {
        let url = self.config.endpoint("api/check-auth")?;
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(AuthStatus::default());
        }
        let body: CheckAuthBody = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(AuthStatus {
            authenticated: body.authenticated,
            username: body.username,
            email: body.email,
        })
    }
}
