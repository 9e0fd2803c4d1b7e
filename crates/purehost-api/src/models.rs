// Array API payload types
//
// Records returned by the `host` endpoints and the attribute bundle sent
// to them. Optional fields use `#[serde(default)]` because the array only
// includes personality, preferred-array, and CHAP data when the matching
// detail flag is requested.

use serde::{Deserialize, Serialize};

// ── Host ─────────────────────────────────────────────────────────────

/// Host record from `GET host/{name}`.
///
/// The base record carries the identity, initiator lists, and host group.
/// The remaining fields stay `None` unless the corresponding
/// [`HostDetail`] was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub iqn: Vec<String>,
    #[serde(default)]
    pub wwn: Vec<String>,
    #[serde(default)]
    pub nqn: Vec<String>,
    #[serde(default)]
    pub hgroup: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub preferred_array: Option<Vec<String>>,
    #[serde(default)]
    pub host_user: Option<String>,
    #[serde(default)]
    pub host_password: Option<String>,
    #[serde(default)]
    pub target_user: Option<String>,
    #[serde(default)]
    pub target_password: Option<String>,
}

/// One host-to-volume connection from `GET host/{name}/volume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConnection {
    /// Host name.
    pub name: String,
    /// Volume name.
    pub vol: String,
    #[serde(default)]
    pub lun: Option<u32>,
}

// ── Detail flags ─────────────────────────────────────────────────────

/// Optional detail projection for `GET host/{name}`.
///
/// Each flag makes the array include one field group the base record
/// leaves out. Sent as `?{flag}=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostDetail {
    PreferredArray,
    Personality,
    Chap,
}

impl HostDetail {
    /// The query parameter name the array expects.
    pub fn query_param(self) -> &'static str {
        match self {
            Self::PreferredArray => "preferred_array",
            Self::Personality => "personality",
            Self::Chap => "chap",
        }
    }
}

// ── Attribute bundle ─────────────────────────────────────────────────

/// Partial attribute bundle for `POST host/{name}` and `PUT host/{name}`.
///
/// Every field is optional and omitted from the JSON body when `None`.
/// The array replaces list fields wholesale, so a present list must be
/// the complete desired list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostAttributes {
    #[serde(rename = "iqnlist", skip_serializing_if = "Option::is_none")]
    pub iqn: Option<Vec<String>>,
    #[serde(rename = "wwnlist", skip_serializing_if = "Option::is_none")]
    pub wwn: Option<Vec<String>>,
    #[serde(rename = "nqnlist", skip_serializing_if = "Option::is_none")]
    pub nqn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_array: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

impl HostAttributes {
    /// `true` when no field is set (the bundle would serialize to `{}`).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `Some(self)` unless the bundle is empty.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// Body for renaming a host via `PUT host/{name}`.
#[derive(Debug, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub name: &'a str,
}

// ── Auth payloads ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTokenResponse {
    pub api_token: String,
}

/// Response to `POST auth/session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub username: Option<String>,
}

// ── Error body ───────────────────────────────────────────────────────

/// One entry of the array's error body: `[{"ctx": "h1", "msg": "..."}]`.
#[derive(Debug, Deserialize)]
pub(crate) struct ArrayErrorEntry {
    #[serde(default)]
    pub ctx: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_bundle_serializes_to_empty_object() {
        let attrs = HostAttributes::default();
        assert!(attrs.is_empty());
        assert_eq!(serde_json::to_value(&attrs).unwrap(), json!({}));
        assert!(attrs.non_empty().is_none());
    }

    #[test]
    fn bundle_uses_array_field_names() {
        let attrs = HostAttributes {
            iqn: Some(vec!["iqn.1994-05.com.redhat:abc".into()]),
            wwn: Some(vec![]),
            personality: Some("esxi".into()),
            ..HostAttributes::default()
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({
                "iqnlist": ["iqn.1994-05.com.redhat:abc"],
                "wwnlist": [],
                "personality": "esxi"
            })
        );
    }

    #[test]
    fn base_host_record_tolerates_missing_detail_fields() {
        let host: Host = serde_json::from_value(json!({
            "name": "h1",
            "iqn": ["iqn.a"],
            "wwn": [],
            "hgroup": null
        }))
        .unwrap();
        assert_eq!(host.name, "h1");
        assert!(host.nqn.is_empty());
        assert_eq!(host.personality, None);
        assert_eq!(host.preferred_array, None);
    }
}
