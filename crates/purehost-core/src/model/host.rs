// ── Declarative host model ──
//
// Desired and observed state of one array host, in declarative shape.
// `None` on any optional group means "not specified": create omits it and
// update leaves the array's value alone. `Some(vec![])` is an explicit
// empty list and does clear the array's list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use purehost_api::HostAttributes;

use super::personality::Personality;
use crate::error::CoreError;

/// Declarative description of a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostSpec {
    /// Host name; also the resource identity.
    pub name: String,

    /// iSCSI qualified names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iqn: Option<Vec<String>>,
    /// Fibre Channel worldwide names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wwn: Option<Vec<String>>,
    /// NVMe-oF qualified names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nqn: Option<Vec<String>>,
    /// Arrays this host prefers in a multi-array deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_array: Option<Vec<String>>,

    // CHAP. The passwords are write-only on the array; reads return a mask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,

    /// Host group membership as reported by the array. Accepted and
    /// round-tripped, never reconciled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hgroup: Option<String>,

    /// Volumes connected to this host. Derived from the connection list,
    /// never stored on the host record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected_volumes: Option<Vec<String>>,
}

/// One of the independently replaceable list groups on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IdentifierField {
    Iqn,
    Wwn,
    Nqn,
    PreferredArray,
}

impl IdentifierField {
    /// All groups, in the order they are applied.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

impl HostSpec {
    /// Spec with only a name; every optional group unspecified.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reject specs the array would choke on, before any remote call.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("name", "must not be empty"));
        }
        for field in IdentifierField::all() {
            if let Some(list) = self.identifiers(field) {
                check_entries(&field.to_string(), list)?;
            }
        }
        if let Some(ref volumes) = self.connected_volumes {
            check_entries("connected_volumes", volumes)?;
        }
        Ok(())
    }

    /// The list stored in one identifier group.
    pub fn identifiers(&self, field: IdentifierField) -> Option<&Vec<String>> {
        match field {
            IdentifierField::Iqn => self.iqn.as_ref(),
            IdentifierField::Wwn => self.wwn.as_ref(),
            IdentifierField::Nqn => self.nqn.as_ref(),
            IdentifierField::PreferredArray => self.preferred_array.as_ref(),
        }
    }

    /// Identifier groups present in this spec, as one create bundle.
    /// `None` when no group is specified.
    pub(crate) fn identifier_attributes(&self) -> Option<HostAttributes> {
        HostAttributes {
            iqn: self.iqn.clone(),
            wwn: self.wwn.clone(),
            nqn: self.nqn.clone(),
            preferred_array: self.preferred_array.clone(),
            ..HostAttributes::default()
        }
        .non_empty()
    }

    /// CHAP fields present in this spec, as one bundle.
    pub(crate) fn chap_attributes(&self) -> Option<HostAttributes> {
        HostAttributes {
            host_user: self.host_user.clone(),
            host_password: self.host_password.clone(),
            target_user: self.target_user.clone(),
            target_password: self.target_password.clone(),
            ..HostAttributes::default()
        }
        .non_empty()
    }

    /// CHAP fields specified here that differ from `previous`, as one bundle.
    pub(crate) fn chap_changes(&self, previous: &Self) -> Option<HostAttributes> {
        HostAttributes {
            host_user: changed(self.host_user.as_ref(), previous.host_user.as_ref()),
            host_password: changed(self.host_password.as_ref(), previous.host_password.as_ref()),
            target_user: changed(self.target_user.as_ref(), previous.target_user.as_ref()),
            target_password: changed(
                self.target_password.as_ref(),
                previous.target_password.as_ref(),
            ),
            ..HostAttributes::default()
        }
        .non_empty()
    }

    /// Connected-volume set specified here, if it differs from `previous`
    /// when both are compared as sets.
    pub(crate) fn volume_changes(&self, previous: &Self) -> Option<&Vec<String>> {
        let wanted = self.connected_volumes.as_ref()?;
        let before: Option<BTreeSet<&String>> =
            previous.connected_volumes.as_ref().map(|v| v.iter().collect());
        if before == Some(wanted.iter().collect()) {
            None
        } else {
            Some(wanted)
        }
    }
}

/// A one-group bundle replacing `field` with `list`.
pub(crate) fn identifier_bundle(field: IdentifierField, list: &[String]) -> HostAttributes {
    let list = Some(list.to_vec());
    match field {
        IdentifierField::Iqn => HostAttributes {
            iqn: list,
            ..HostAttributes::default()
        },
        IdentifierField::Wwn => HostAttributes {
            wwn: list,
            ..HostAttributes::default()
        },
        IdentifierField::Nqn => HostAttributes {
            nqn: list,
            ..HostAttributes::default()
        },
        IdentifierField::PreferredArray => HostAttributes {
            preferred_array: list,
            ..HostAttributes::default()
        },
    }
}

/// A bundle carrying only the personality.
pub(crate) fn personality_bundle(personality: Personality) -> HostAttributes {
    HostAttributes {
        personality: Some(personality.as_wire().to_owned()),
        ..HostAttributes::default()
    }
}

fn changed(desired: Option<&String>, previous: Option<&String>) -> Option<String> {
    match desired {
        Some(value) if previous != Some(value) => Some(value.clone()),
        _ => None,
    }
}

/// Lists are sets on the array: entries must be non-blank and distinct.
fn check_entries(field: &str, entries: &[String]) -> Result<(), CoreError> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(CoreError::validation(field, "entries must not be empty"));
    }
    let mut seen = BTreeSet::new();
    if let Some(dup) = entries.iter().find(|e| !seen.insert(e.as_str())) {
        return Err(CoreError::validation(field, format!("'{dup}' is listed more than once")));
    }
    Ok(())
}
