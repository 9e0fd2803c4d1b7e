// purehost-core: Host reconciliation between declarative specs and the array.

pub mod array;
pub mod config;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use array::HostArray;
pub use config::{ArrayConfig, AuthCredentials, TlsVerification};
pub use error::{CoreError, ReconcileError};
pub use model::{HostSpec, IdentifierField, Personality};
pub use reconciler::{AppliedStep, HostReconciler, difference};
pub use session::ArraySession;

pub use purehost_api::Host;
