use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::CoreError;

/// Array-side protocol tuning profile for the host's operating system.
///
/// Wire form is the array's string (`"esxi"`, `"hitachi-vsp"`, ...);
/// [`Personality::None`] is the empty string and clears any tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr)]
pub enum Personality {
    #[strum(serialize = "")]
    None,
    #[strum(serialize = "aix")]
    Aix,
    #[strum(serialize = "esxi")]
    Esxi,
    #[strum(serialize = "hitachi-vsp")]
    HitachiVsp,
    #[strum(serialize = "hpux")]
    Hpux,
    #[strum(serialize = "oracle-vm-server")]
    OracleVmServer,
    #[strum(serialize = "solaris")]
    Solaris,
    #[strum(serialize = "vms")]
    Vms,
}

impl Personality {
    /// The array's string for this personality.
    pub fn as_wire(self) -> &'static str {
        self.into()
    }

    /// Parse a personality string, rejecting anything outside the fixed set.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::from_str(raw).map_err(|_| {
            let allowed: Vec<String> = Self::iter().map(|p| format!("{:?}", p.as_wire())).collect();
            CoreError::validation(
                "personality",
                format!("'{raw}' is not one of {}", allowed.join(", ")),
            )
        })
    }
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for Personality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for Personality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
