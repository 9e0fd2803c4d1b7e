// Session authentication
//
// The array hands out long-lived API tokens (`POST auth/apitoken`) which
// are exchanged for a cookie-based session (`POST auth/session`). All
// later requests ride on that cookie.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ArrayClient;
use crate::error::Error;
use crate::models::{ApiTokenResponse, SessionInfo};

/// Credentials for opening a session on the array.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Pre-issued API token (preferred).
    ApiToken(SecretString),
    /// Username/password, exchanged for an API token first.
    Password {
        username: String,
        password: SecretString,
    },
}

impl ArrayClient {
    /// Exchange a username/password for the user's API token.
    ///
    /// `POST auth/apitoken`
    pub async fn obtain_api_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SecretString, Error> {
        let url = self.api_url(&["auth", "apitoken"])?;
        debug!(username, "requesting API token");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp: ApiTokenResponse = self.post(url, &body).await.map_err(reject_as_auth)?;
        Ok(SecretString::from(resp.api_token))
    }

    /// Open a session with an API token.
    ///
    /// `POST auth/session`. On success the session cookie is stored in the
    /// client's cookie jar and used for all subsequent requests.
    pub async fn login(&self, api_token: &SecretString) -> Result<SessionInfo, Error> {
        let url = self.api_url(&["auth", "session"])?;
        debug!("opening session at {url}");

        let body = json!({ "api_token": api_token.expose_secret() });
        let info: SessionInfo = self.post(url, &body).await.map_err(reject_as_auth)?;
        if self.owns_cookie_jar() && !self.has_session() {
            return Err(Error::Authentication {
                message: "array accepted the token but issued no session cookie".into(),
            });
        }

        debug!(username = ?info.username, "session established");
        Ok(info)
    }

    /// Open a session from either credential form.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<SessionInfo, Error> {
        match credentials {
            Credentials::ApiToken(token) => self.login(token).await,
            Credentials::Password { username, password } => {
                let token = self.obtain_api_token(username, password).await?;
                self.login(&token).await
            }
        }
    }

    /// End the current session.
    ///
    /// `DELETE auth/session`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url(&["auth", "session"])?;
        debug!("closing session at {url}");

        let _: serde_json::Value = self.delete(url).await?;
        debug!("logout complete");
        Ok(())
    }
}

/// The auth endpoints answer bad credentials with HTTP 400, not 401.
fn reject_as_auth(err: Error) -> Error {
    match err {
        Error::Api { status, message } if status < 500 => Error::Authentication {
            message: format!("HTTP {status}: {message}"),
        },
        Error::NotFound { message } => Error::Authentication { message },
        other => other,
    }
}
