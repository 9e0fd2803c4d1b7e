// In-memory array for reconciler tests. Records every call, masks CHAP
// passwords on read the way the array does, and can fail one chosen call.
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::future::{Future, ready};
use std::sync::Mutex;

use purehost_api::{Error, Host, HostAttributes, HostConnection, HostDetail};

use crate::array::HostArray;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    Create(String, Option<HostAttributes>),
    Get(String, Option<HostDetail>),
    Set(String, HostAttributes),
    Rename(String, String),
    Delete(String),
    ListConnections(String),
    Connect(String, String),
    Disconnect(String, String),
}

impl Call {
    pub(super) fn is_mutation(&self) -> bool {
        !matches!(self, Self::Get(..) | Self::ListConnections(..))
    }
}

#[derive(Default)]
struct State {
    hosts: BTreeMap<String, Host>,
    connections: BTreeMap<String, Vec<String>>,
    calls: Vec<Call>,
    fail_on: Option<Call>,
}

/// In-memory array that records every call and can fail one of them.
#[derive(Default)]
pub(super) struct FakeArray {
    state: Mutex<State>,
}

impl FakeArray {
    pub(super) fn with_host(host: Host, volumes: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state
                .connections
                .insert(host.name.clone(), volumes.iter().map(|v| (*v).to_owned()).collect());
            state.hosts.insert(host.name.clone(), host);
        }
        fake
    }

    pub(super) fn fail_on(self, call: Call) -> Self {
        self.state.lock().unwrap().fail_on = Some(call);
        self
    }

    pub(super) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(super) fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub(super) fn connected(&self, name: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .connections
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub(super) fn host(&self, name: &str) -> Option<Host> {
        self.state.lock().unwrap().hosts.get(name).cloned()
    }

    /// Record `call`, then run `op` against the state unless the call was
    /// marked to fail.
    fn handle<T>(
        &self,
        call: Call,
        op: impl FnOnce(&mut State) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        if state.fail_on.as_ref() == Some(&call) {
            return Err(Error::Api {
                status: 400,
                message: format!("injected failure on {call:?}"),
            });
        }
        op(&mut state)
    }
}

fn missing(name: &str) -> Error {
    Error::NotFound {
        message: format!("{name}: Host does not exist."),
    }
}

fn apply(host: &mut Host, attrs: &HostAttributes) {
    if let Some(ref v) = attrs.iqn {
        host.iqn.clone_from(v);
    }
    if let Some(ref v) = attrs.wwn {
        host.wwn.clone_from(v);
    }
    if let Some(ref v) = attrs.nqn {
        host.nqn.clone_from(v);
    }
    if attrs.preferred_array.is_some() {
        host.preferred_array.clone_from(&attrs.preferred_array);
    }
    if attrs.host_user.is_some() {
        host.host_user.clone_from(&attrs.host_user);
    }
    if attrs.host_password.is_some() {
        host.host_password.clone_from(&attrs.host_password);
    }
    if attrs.target_user.is_some() {
        host.target_user.clone_from(&attrs.target_user);
    }
    if attrs.target_password.is_some() {
        host.target_password.clone_from(&attrs.target_password);
    }
    if attrs.personality.is_some() {
        host.personality.clone_from(&attrs.personality);
    }
}

/// What the array returns for a base or detail fetch.
fn project(host: &Host, detail: Option<HostDetail>) -> Host {
    let mask = |p: &Option<String>| p.as_ref().map(|_| "****".to_owned());
    match detail {
        None => Host {
            name: host.name.clone(),
            iqn: host.iqn.clone(),
            wwn: host.wwn.clone(),
            nqn: host.nqn.clone(),
            hgroup: host.hgroup.clone(),
            ..Host::default()
        },
        Some(HostDetail::PreferredArray) => Host {
            name: host.name.clone(),
            preferred_array: Some(host.preferred_array.clone().unwrap_or_default()),
            ..Host::default()
        },
        Some(HostDetail::Personality) => Host {
            name: host.name.clone(),
            personality: host.personality.clone(),
            ..Host::default()
        },
        Some(HostDetail::Chap) => Host {
            name: host.name.clone(),
            host_user: host.host_user.clone(),
            host_password: mask(&host.host_password),
            target_user: host.target_user.clone(),
            target_password: mask(&host.target_password),
            ..Host::default()
        },
    }
}

fn connection(name: &str, volume: &str) -> HostConnection {
    HostConnection {
        name: name.to_owned(),
        vol: volume.to_owned(),
        lun: Some(1),
    }
}

impl HostArray for FakeArray {
    fn create_host(
        &self,
        name: &str,
        attributes: Option<&HostAttributes>,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        let call = Call::Create(name.to_owned(), attributes.cloned());
        ready(self.handle(call, |state| {
            if state.hosts.contains_key(name) {
                return Err(Error::Api {
                    status: 400,
                    message: format!("{name}: Host already exists."),
                });
            }
            let mut host = Host {
                name: name.to_owned(),
                ..Host::default()
            };
            if let Some(attrs) = attributes {
                apply(&mut host, attrs);
            }
            state.hosts.insert(name.to_owned(), host.clone());
            state.connections.insert(name.to_owned(), Vec::new());
            Ok(host)
        }))
    }

    fn get_host(
        &self,
        name: &str,
        detail: Option<HostDetail>,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        ready(self.handle(Call::Get(name.to_owned(), detail), |state| {
            state
                .hosts
                .get(name)
                .map(|h| project(h, detail))
                .ok_or_else(|| missing(name))
        }))
    }

    fn set_host(
        &self,
        name: &str,
        attributes: &HostAttributes,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        ready(self.handle(Call::Set(name.to_owned(), attributes.clone()), |state| {
            let host = state.hosts.get_mut(name).ok_or_else(|| missing(name))?;
            apply(host, attributes);
            Ok(host.clone())
        }))
    }

    fn rename_host(
        &self,
        name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        let call = Call::Rename(name.to_owned(), new_name.to_owned());
        ready(self.handle(call, |state| {
            let mut host = state.hosts.remove(name).ok_or_else(|| missing(name))?;
            host.name = new_name.to_owned();
            let volumes = state.connections.remove(name).unwrap_or_default();
            state.connections.insert(new_name.to_owned(), volumes);
            state.hosts.insert(new_name.to_owned(), host.clone());
            Ok(host)
        }))
    }

    fn delete_host(&self, name: &str) -> impl Future<Output = Result<Host, Error>> + Send {
        ready(self.handle(Call::Delete(name.to_owned()), |state| {
            if state.connections.get(name).is_some_and(|v| !v.is_empty()) {
                return Err(Error::Api {
                    status: 400,
                    message: format!("{name}: Host has connected volumes."),
                });
            }
            state.connections.remove(name);
            state.hosts.remove(name).ok_or_else(|| missing(name))
        }))
    }

    fn list_connections(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<HostConnection>, Error>> + Send {
        ready(self.handle(Call::ListConnections(name.to_owned()), |state| {
            if !state.hosts.contains_key(name) {
                return Err(missing(name));
            }
            Ok(state
                .connections
                .get(name)
                .map(|vols| vols.iter().map(|v| connection(name, v)).collect())
                .unwrap_or_default())
        }))
    }

    fn connect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send {
        let call = Call::Connect(name.to_owned(), volume.to_owned());
        ready(self.handle(call, |state| {
            let vols = state.connections.get_mut(name).ok_or_else(|| missing(name))?;
            if vols.iter().any(|v| v == volume) {
                return Err(Error::Api {
                    status: 400,
                    message: format!("{volume}: Connection already exists."),
                });
            }
            vols.push(volume.to_owned());
            Ok(connection(name, volume))
        }))
    }

    fn disconnect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send {
        let call = Call::Disconnect(name.to_owned(), volume.to_owned());
        ready(self.handle(call, |state| {
            let vols = state.connections.get_mut(name).ok_or_else(|| missing(name))?;
            let before = vols.len();
            vols.retain(|v| v != volume);
            if vols.len() == before {
                return Err(Error::NotFound {
                    message: format!("{volume}: Connection does not exist."),
                });
            }
            Ok(connection(name, volume))
        }))
    }
}
