// Host endpoints
//
// CRUD on `host/{name}` plus the volume-connection sub-resource
// `host/{name}/volume/{vol}`. Every call returns the array's record for
// the affected object.

use tracing::debug;

use crate::client::ArrayClient;
use crate::error::Error;
use crate::models::{Host, HostAttributes, HostConnection, HostDetail, RenameRequest};

impl ArrayClient {
    /// List all hosts on the array.
    ///
    /// `GET host`
    pub async fn list_hosts(&self) -> Result<Vec<Host>, Error> {
        let url = self.api_url(&["host"])?;
        debug!("listing hosts");
        self.get(url, &[]).await
    }

    /// Create a host, optionally with initial attributes.
    ///
    /// `POST host/{name}`. Pass `None` rather than an empty bundle when no
    /// attributes are set; the request is then sent without a body.
    pub async fn create_host(
        &self,
        name: &str,
        attributes: Option<&HostAttributes>,
    ) -> Result<Host, Error> {
        let url = self.api_url(&["host", name])?;
        debug!(name, with_attributes = attributes.is_some(), "creating host");
        match attributes {
            Some(attrs) => self.post(url, attrs).await,
            None => self.post_empty(url).await,
        }
    }

    /// Fetch a host, optionally with one detail projection.
    ///
    /// `GET host/{name}` or `GET host/{name}?{detail}=true`
    pub async fn get_host(&self, name: &str, detail: Option<HostDetail>) -> Result<Host, Error> {
        let url = self.api_url(&["host", name])?;
        debug!(name, ?detail, "fetching host");
        match detail {
            Some(detail) => self.get(url, &[(detail.query_param(), "true")]).await,
            None => self.get(url, &[]).await,
        }
    }

    /// Modify host attributes. List fields replace the array's lists.
    ///
    /// `PUT host/{name}`
    pub async fn set_host(&self, name: &str, attributes: &HostAttributes) -> Result<Host, Error> {
        let url = self.api_url(&["host", name])?;
        debug!(name, "setting host attributes");
        self.put(url, attributes).await
    }

    /// Rename a host. The returned record carries the new name.
    ///
    /// `PUT host/{name}` with `{"name": new_name}`
    pub async fn rename_host(&self, name: &str, new_name: &str) -> Result<Host, Error> {
        let url = self.api_url(&["host", name])?;
        debug!(name, new_name, "renaming host");
        self.put(url, &RenameRequest { name: new_name }).await
    }

    /// Delete a host. The array rejects this while volumes are connected.
    ///
    /// `DELETE host/{name}`
    pub async fn delete_host(&self, name: &str) -> Result<Host, Error> {
        let url = self.api_url(&["host", name])?;
        debug!(name, "deleting host");
        self.delete(url).await
    }

    /// List the volumes privately connected to a host.
    ///
    /// `GET host/{name}/volume`
    pub async fn list_host_connections(&self, name: &str) -> Result<Vec<HostConnection>, Error> {
        let url = self.api_url(&["host", name, "volume"])?;
        debug!(name, "listing host connections");
        self.get(url, &[]).await
    }

    /// Connect a volume to a host.
    ///
    /// `POST host/{name}/volume/{volume}`
    pub async fn connect_host(&self, name: &str, volume: &str) -> Result<HostConnection, Error> {
        let url = self.api_url(&["host", name, "volume", volume])?;
        debug!(name, volume, "connecting volume");
        self.post_empty(url).await
    }

    /// Disconnect a volume from a host.
    ///
    /// `DELETE host/{name}/volume/{volume}`
    pub async fn disconnect_host(&self, name: &str, volume: &str) -> Result<HostConnection, Error> {
        let url = self.api_url(&["host", name, "volume", volume])?;
        debug!(name, volume, "disconnecting volume");
        self.delete(url).await
    }
}
