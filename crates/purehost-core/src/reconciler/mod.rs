// ── Host reconciler ──
//
// Moves one array host from its current state to a declared state with
// the fewest remote calls the diff implies. Every operation runs its
// remote calls one at a time, in order, and stops at the first failure.
// Nothing is retried and nothing is rolled back: a failed operation
// reports which mutations already landed via `ReconcileError::applied`.

mod diff;
#[cfg(test)]
mod fake;

use std::fmt;

use tracing::{debug, info, warn};

use purehost_api::{Host, HostConnection, HostDetail};

use crate::array::HostArray;
use crate::error::{CoreError, ReconcileError};
use crate::model::host::{identifier_bundle, personality_bundle};
use crate::model::{HostSpec, IdentifierField, Personality};

pub use diff::difference;

/// One remote mutation that has durably succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedStep {
    /// Host record created under this name.
    Created { name: String },
    Renamed { from: String, to: String },
    /// One identifier group replaced.
    Identifiers(IdentifierField),
    /// CHAP bundle written.
    Chap,
    Personality(Personality),
    Connected(String),
    Disconnected(String),
    /// Host record removed.
    Deleted,
}

impl fmt::Display for AppliedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { name } => write!(f, "created host {name}"),
            Self::Renamed { from, to } => write!(f, "renamed {from} to {to}"),
            Self::Identifiers(field) => write!(f, "set {field}"),
            Self::Chap => f.write_str("set CHAP credentials"),
            Self::Personality(p) => write!(f, "set personality '{p}'"),
            Self::Connected(vol) => write!(f, "connected volume {vol}"),
            Self::Disconnected(vol) => write!(f, "disconnected volume {vol}"),
            Self::Deleted => f.write_str("deleted host"),
        }
    }
}

/// Applied steps and current identity of an in-flight operation.
#[derive(Debug, Default)]
struct Progress {
    identity: Option<String>,
    applied: Vec<AppliedStep>,
}

impl Progress {
    fn tracking(id: &str) -> Self {
        Self {
            identity: Some(id.to_owned()),
            applied: Vec::new(),
        }
    }

    fn record(&mut self, step: AppliedStep) {
        debug!(%step, "applied");
        self.applied.push(step);
    }

    fn into_error(self, source: CoreError) -> ReconcileError {
        ReconcileError {
            identity: self.identity,
            applied: self.applied,
            source,
        }
    }
}

/// Lifecycle operations for array hosts.
///
/// Generic over the array so tests can drive it with a recording fake;
/// production code uses `HostReconciler<&ArrayClient>` via
/// [`ArraySession::hosts`](crate::ArraySession::hosts).
pub struct HostReconciler<A> {
    array: A,
}

impl<A: HostArray> HostReconciler<A> {
    pub fn new(array: A) -> Self {
        Self { array }
    }

    /// Create a host and converge it onto `desired`.
    ///
    /// Identifier groups ride along in the create call. CHAP, personality
    /// and volume connections follow as separate calls, each only when the
    /// spec sets them. Returns the state read back from the array.
    pub async fn create(&self, desired: &HostSpec) -> Result<HostSpec, ReconcileError> {
        desired.validate()?;
        let mut progress = Progress::default();
        match self.apply_create(desired, &mut progress).await {
            Ok(created) => {
                info!(name = %created.name, steps = progress.applied.len(), "host created");
                Ok(created)
            }
            Err(source) => Err(progress.into_error(source)),
        }
    }

    async fn apply_create(
        &self,
        desired: &HostSpec,
        progress: &mut Progress,
    ) -> Result<HostSpec, CoreError> {
        let identifiers = desired.identifier_attributes();
        let host = self
            .array
            .create_host(&desired.name, identifiers.as_ref())
            .await?;

        // The array may normalize the name; everything after uses its answer.
        let id = host.name;
        progress.identity = Some(id.clone());
        progress.record(AppliedStep::Created { name: id.clone() });

        if let Some(chap) = desired.chap_attributes() {
            self.array.set_host(&id, &chap).await?;
            progress.record(AppliedStep::Chap);
        }

        if let Some(personality) = desired.personality {
            self.array
                .set_host(&id, &personality_bundle(personality))
                .await?;
            progress.record(AppliedStep::Personality(personality));
        }

        for volume in desired.connected_volumes.iter().flatten() {
            self.array.connect_volume(&id, volume).await?;
            progress.record(AppliedStep::Connected(volume.clone()));
        }

        self.converged(&id, desired).await
    }

    /// Observed state of host `id`, or `None` when the array has no such
    /// host.
    ///
    /// Issues the base fetch, the connection listing, and one fetch per
    /// detail projection. A projection that fails for any reason other
    /// than the host disappearing fails the whole read.
    pub async fn read(&self, id: &str) -> Result<Option<HostSpec>, CoreError> {
        let Some(base) = present(self.array.get_host(id, None).await)? else {
            debug!(id, "host absent");
            return Ok(None);
        };
        let Some(connections) = present(self.array.list_connections(id).await)? else {
            return Ok(None);
        };

        let Some(preferred) = self.detail(id, HostDetail::PreferredArray).await? else {
            return Ok(None);
        };
        let Some(personality) = self.detail(id, HostDetail::Personality).await? else {
            return Ok(None);
        };
        let Some(chap) = self.detail(id, HostDetail::Chap).await? else {
            return Ok(None);
        };

        Ok(Some(observed(base, connections, preferred, personality, chap)))
    }

    async fn detail(&self, id: &str, detail: HostDetail) -> Result<Option<Host>, CoreError> {
        present(self.array.get_host(id, Some(detail)).await)
    }

    /// Converge host `id` from `previous` onto `desired`.
    ///
    /// Only groups that `desired` specifies and that differ from `previous`
    /// are sent. A rename happens first, and every later call in the same
    /// update addresses the new name.
    pub async fn update(
        &self,
        id: &str,
        previous: &HostSpec,
        desired: &HostSpec,
    ) -> Result<HostSpec, ReconcileError> {
        desired.validate()?;
        let mut progress = Progress::tracking(id);
        match self
            .apply_update(id, previous, desired, &mut progress)
            .await
        {
            Ok(updated) => {
                info!(name = %updated.name, steps = progress.applied.len(), "host updated");
                Ok(updated)
            }
            Err(source) => Err(progress.into_error(source)),
        }
    }

    async fn apply_update(
        &self,
        id: &str,
        previous: &HostSpec,
        desired: &HostSpec,
        progress: &mut Progress,
    ) -> Result<HostSpec, CoreError> {
        let mut id = id.to_owned();

        if desired.name != previous.name {
            let renamed = self.array.rename_host(&id, &desired.name).await?;
            progress.identity = Some(renamed.name.clone());
            progress.record(AppliedStep::Renamed {
                from: id,
                to: renamed.name.clone(),
            });
            id = renamed.name;
        }

        for field in IdentifierField::all() {
            if let Some(list) = desired.identifiers(field) {
                if previous.identifiers(field) != Some(list) {
                    self.array
                        .set_host(&id, &identifier_bundle(field, list))
                        .await?;
                    progress.record(AppliedStep::Identifiers(field));
                }
            }
        }

        if let Some(chap) = desired.chap_changes(previous) {
            self.array.set_host(&id, &chap).await?;
            progress.record(AppliedStep::Chap);
        }

        if let Some(personality) = desired.personality {
            if previous.personality != Some(personality) {
                self.array
                    .set_host(&id, &personality_bundle(personality))
                    .await?;
                progress.record(AppliedStep::Personality(personality));
            }
        }

        if let Some(wanted) = desired.volume_changes(previous) {
            // The live list is authoritative; connections may have been
            // made outside this reconciler.
            let current = volume_names(self.array.list_connections(&id).await?);
            for volume in difference(wanted, &current) {
                self.array.connect_volume(&id, &volume).await?;
                progress.record(AppliedStep::Connected(volume));
            }
            for volume in difference(&current, wanted) {
                self.array.disconnect_volume(&id, &volume).await?;
                progress.record(AppliedStep::Disconnected(volume));
            }
        }

        self.converged(&id, desired).await
    }

    /// Disconnect `connected_volumes` from host `id`, then delete it.
    ///
    /// The first failed disconnect aborts and the host is left in place.
    /// Deleting a host the array no longer has fails with
    /// [`CoreError::HostNotFound`].
    pub async fn delete(&self, id: &str, connected_volumes: &[String]) -> Result<(), ReconcileError> {
        let mut progress = Progress::tracking(id);
        match self.apply_delete(id, connected_volumes, &mut progress).await {
            Ok(()) => {
                info!(id, "host deleted");
                Ok(())
            }
            Err(source) => Err(progress.into_error(source)),
        }
    }

    async fn apply_delete(
        &self,
        id: &str,
        connected_volumes: &[String],
        progress: &mut Progress,
    ) -> Result<(), CoreError> {
        for volume in connected_volumes {
            self.array.disconnect_volume(id, volume).await?;
            progress.record(AppliedStep::Disconnected(volume.clone()));
        }

        self.array.delete_host(id).await.map_err(|e| {
            if matches!(e, purehost_api::Error::NotFound { .. }) {
                CoreError::HostNotFound { name: id.into() }
            } else {
                CoreError::from(e)
            }
        })?;
        progress.identity = None;
        progress.record(AppliedStep::Deleted);
        Ok(())
    }

    /// Like [`read`](Self::read), but a missing host is an error.
    pub async fn import(&self, id: &str) -> Result<HostSpec, CoreError> {
        self.read(id)
            .await?
            .ok_or_else(|| CoreError::HostNotFound { name: id.into() })
    }

    /// Final read after a mutation. Passwords are write-only on the array,
    /// so the values just sent replace whatever the read returned.
    async fn converged(&self, id: &str, desired: &HostSpec) -> Result<HostSpec, CoreError> {
        let mut state = self
            .read(id)
            .await?
            .ok_or_else(|| CoreError::HostNotFound { name: id.into() })?;
        if desired.host_password.is_some() {
            state.host_password.clone_from(&desired.host_password);
        }
        if desired.target_password.is_some() {
            state.target_password.clone_from(&desired.target_password);
        }
        Ok(state)
    }
}

/// `Ok(None)` when the array says the object does not exist.
fn present<T>(result: Result<T, purehost_api::Error>) -> Result<Option<T>, CoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e, purehost_api::Error::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn volume_names(connections: Vec<HostConnection>) -> Vec<String> {
    connections.into_iter().map(|c| c.vol).collect()
}

/// Merge the base record, connection list, and detail projections.
fn observed(
    base: Host,
    connections: Vec<HostConnection>,
    preferred: Host,
    personality: Host,
    chap: Host,
) -> HostSpec {
    let personality = match Personality::parse(personality.personality.as_deref().unwrap_or("")) {
        Ok(p) => Some(p),
        Err(e) => {
            warn!(host = %base.name, error = %e, "array reported unknown personality");
            None
        }
    };

    HostSpec {
        iqn: Some(base.iqn),
        wwn: Some(base.wwn),
        nqn: Some(base.nqn),
        preferred_array: Some(preferred.preferred_array.unwrap_or_default()),
        host_user: Some(chap.host_user.unwrap_or_default()),
        host_password: Some(chap.host_password.unwrap_or_default()),
        target_user: Some(chap.target_user.unwrap_or_default()),
        target_password: Some(chap.target_password.unwrap_or_default()),
        personality,
        hgroup: base.hgroup,
        connected_volumes: Some(volume_names(connections)),
        name: base.name,
    }
}
