// ── Domain model ──
//
// Canonical representation of a host as the reconciler sees it. Built
// from array records on read and from spec files on the CLI side.

pub mod host;
pub mod personality;

pub use host::{HostSpec, IdentifierField};
pub use personality::Personality;
