// Array REST HTTP client
//
// Wraps `reqwest::Client` with versioned URL construction and translation
// of the array's error bodies. Endpoint groups (auth, hosts) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::cookie::Jar;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ArrayErrorEntry;
use crate::transport::TransportConfig;

/// REST API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "1.17";

const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the array's REST API.
///
/// All paths are rooted at `{base_url}/api/{api_version}/`. Session auth
/// is cookie based, so clients built through [`new`](Self::new) always
/// carry a cookie jar.
pub struct ArrayClient {
    http: reqwest::Client,
    base_url: Url,
    api_version: String,
    /// Kept so callers can tell whether a session cookie is present.
    cookie_jar: Option<Arc<Jar>>,
}

impl ArrayClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies).
    pub fn new(
        base_url: Url,
        api_version: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            api_version: api_version.into(),
            cookie_jar,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for cookie handling.
    pub fn with_client(http: reqwest::Client, base_url: Url, api_version: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            api_version: api_version.into(),
            cookie_jar: None,
        }
    }

    /// Whether the cookie jar currently holds a cookie for the array.
    pub fn has_session(&self) -> bool {
        use reqwest::cookie::CookieStore;

        self.cookie_jar
            .as_ref()
            .is_some_and(|jar| jar.cookies(&self.base_url).is_some())
    }

    pub(crate) fn owns_cookie_jar(&self) -> bool {
        self.cookie_jar.is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/{version}/{segments...}`.
    ///
    /// Each segment is percent-encoded, so host and volume names are
    /// passed verbatim.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .push(&self.api_version)
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with optional query parameters.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        parse_response(resp).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        parse_response(resp).await
    }

    /// Send a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {url} (no body)");

        let resp = self.http.post(url).send().await?;
        parse_response(resp).await
    }

    /// Send a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        parse_response(resp).await
    }

    /// Send a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        parse_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Decode a success body, or translate the array's error body.
///
/// Purity reports errors as `[{"ctx": "...", "msg": "..."}]`. Missing
/// objects come back as HTTP 400 with a "does not exist" message, so those
/// are mapped to [`Error::NotFound`] alongside plain 404s.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;
    trace!(%status, body_len = body.len(), "array response");

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: array_message(&body)
                .unwrap_or_else(|| "session expired or invalid API token".into()),
        });
    }

    if !status.is_success() {
        let message =
            array_message(&body).unwrap_or_else(|| format!("HTTP {status}: {}", preview(&body)));
        if status == StatusCode::NOT_FOUND || is_missing_object(&message) {
            return Err(Error::NotFound { message });
        }
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// Extract `"ctx: msg"` from the first entry of an array error body.
fn array_message(body: &str) -> Option<String> {
    let entries: Vec<ArrayErrorEntry> = serde_json::from_str(body).ok()?;
    let first = entries.into_iter().next()?;
    let msg = first.msg?;
    Some(match first.ctx {
        Some(ctx) if !ctx.is_empty() => format!("{ctx}: {msg}"),
        _ => msg,
    })
}

fn is_missing_object(message: &str) -> bool {
    message.to_ascii_lowercase().contains("does not exist")
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ArrayClient {
        ArrayClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://array.example.com").unwrap(),
            DEFAULT_API_VERSION,
        )
    }

    #[test]
    fn api_url_is_versioned() {
        let url = client().api_url(&["host", "h1"]).unwrap();
        assert_eq!(url.as_str(), "https://array.example.com/api/1.17/host/h1");
    }

    #[test]
    fn api_url_encodes_segments() {
        let url = client().api_url(&["host", "esx 01", "volume", "vol/a"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://array.example.com/api/1.17/host/esx%2001/volume/vol%2Fa"
        );
    }

    #[test]
    fn array_message_joins_ctx_and_msg() {
        let body = r#"[{"ctx": "h1", "msg": "Host does not exist."}]"#;
        assert_eq!(
            array_message(body).as_deref(),
            Some("h1: Host does not exist.")
        );
        assert!(is_missing_object("h1: Host does not exist."));
    }

    #[test]
    fn array_message_without_ctx() {
        let body = r#"[{"msg": "Invalid personality."}]"#;
        assert_eq!(array_message(body).as_deref(), Some("Invalid personality."));
        assert_eq!(array_message("not json"), None);
        assert_eq!(array_message("[]"), None);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(BODY_PREVIEW_CHARS + 10);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }
}
