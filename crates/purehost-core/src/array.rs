// ── Array collaborator seam ──
//
// The reconciler talks to the array only through `HostArray`. The real
// implementation is `purehost_api::ArrayClient`; tests substitute an
// in-memory recorder.

use std::future::Future;

use purehost_api::{ArrayClient, Error, Host, HostAttributes, HostConnection, HostDetail};

/// Host operations the reconciler needs from a storage array.
pub trait HostArray {
    fn create_host(
        &self,
        name: &str,
        attributes: Option<&HostAttributes>,
    ) -> impl Future<Output = Result<Host, Error>> + Send;

    fn get_host(
        &self,
        name: &str,
        detail: Option<HostDetail>,
    ) -> impl Future<Output = Result<Host, Error>> + Send;

    fn set_host(
        &self,
        name: &str,
        attributes: &HostAttributes,
    ) -> impl Future<Output = Result<Host, Error>> + Send;

    fn rename_host(
        &self,
        name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<Host, Error>> + Send;

    fn delete_host(&self, name: &str) -> impl Future<Output = Result<Host, Error>> + Send;

    fn list_connections(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<HostConnection>, Error>> + Send;

    fn connect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send;

    fn disconnect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send;
}

impl HostArray for ArrayClient {
    fn create_host(
        &self,
        name: &str,
        attributes: Option<&HostAttributes>,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        ArrayClient::create_host(self, name, attributes)
    }

    fn get_host(
        &self,
        name: &str,
        detail: Option<HostDetail>,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        ArrayClient::get_host(self, name, detail)
    }

    fn set_host(
        &self,
        name: &str,
        attributes: &HostAttributes,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        ArrayClient::set_host(self, name, attributes)
    }

    fn rename_host(
        &self,
        name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        ArrayClient::rename_host(self, name, new_name)
    }

    fn delete_host(&self, name: &str) -> impl Future<Output = Result<Host, Error>> + Send {
        ArrayClient::delete_host(self, name)
    }

    fn list_connections(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<HostConnection>, Error>> + Send {
        self.list_host_connections(name)
    }

    fn connect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send {
        self.connect_host(name, volume)
    }

    fn disconnect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send {
        self.disconnect_host(name, volume)
    }
}

impl<T: HostArray + Sync> HostArray for &T {
    fn create_host(
        &self,
        name: &str,
        attributes: Option<&HostAttributes>,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        (**self).create_host(name, attributes)
    }

    fn get_host(
        &self,
        name: &str,
        detail: Option<HostDetail>,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        (**self).get_host(name, detail)
    }

    fn set_host(
        &self,
        name: &str,
        attributes: &HostAttributes,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        (**self).set_host(name, attributes)
    }

    fn rename_host(
        &self,
        name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<Host, Error>> + Send {
        (**self).rename_host(name, new_name)
    }

    fn delete_host(&self, name: &str) -> impl Future<Output = Result<Host, Error>> + Send {
        (**self).delete_host(name)
    }

    fn list_connections(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<HostConnection>, Error>> + Send {
        (**self).list_connections(name)
    }

    fn connect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send {
        (**self).connect_volume(name, volume)
    }

    fn disconnect_volume(
        &self,
        name: &str,
        volume: &str,
    ) -> impl Future<Output = Result<HostConnection, Error>> + Send {
        (**self).disconnect_volume(name, volume)
    }
}
