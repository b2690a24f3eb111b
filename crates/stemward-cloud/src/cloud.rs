//! Cloud driver trait definition

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Cloud-specific properties taken from a stemcell manifest
pub type CloudProperties = serde_json::Map<String, serde_json::Value>;

/// Cloud driver abstraction
///
/// The lifecycle manager only ever creates and deletes stemcells; every
/// other IaaS concern (credentials, networking, retries, timeouts) stays
/// behind this boundary.
#[async_trait]
pub trait Cloud: Send + Sync {
    /// Upload the image at `image_path` and return the stemcell CID
    ///
    /// Implementations must never return an empty CID.
    async fn create_stemcell(
        &self,
        cloud_properties: &CloudProperties,
        image_path: &Path,
    ) -> Result<String>;

    /// Delete the stemcell identified by `cid`
    ///
    /// Returns [`CloudError::StemcellNotFound`](crate::CloudError::StemcellNotFound)
    /// when the IaaS no longer knows the CID.
    async fn delete_stemcell(&self, cid: &str) -> Result<()>;
}
