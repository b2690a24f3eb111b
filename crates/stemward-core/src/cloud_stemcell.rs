use crate::error::{Result, StemcellError};
use stemward_cloud::Cloud;
use stemward_state::{StemcellRecord, StemcellRepo};
use std::sync::Arc;

/// An uploaded stemcell bound to the repo and cloud that manage it
#[derive(Clone)]
pub struct CloudStemcell {
    record: StemcellRecord,
    repo: Arc<dyn StemcellRepo>,
    cloud: Arc<dyn Cloud>,
}

impl CloudStemcell {
    pub fn new(record: StemcellRecord, repo: Arc<dyn StemcellRepo>, cloud: Arc<dyn Cloud>) -> Self {
        Self { record, repo, cloud }
    }

    pub fn cid(&self) -> &str {
        &self.record.cid
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn version(&self) -> &str {
        &self.record.version
    }

    pub fn record(&self) -> &StemcellRecord {
        &self.record
    }

    /// Delete the stemcell from the cloud, then forget its record
    ///
    /// A failed cloud delete keeps the record so the same CID is retried
    /// next time. A CID the cloud no longer knows counts as deleted.
    pub async fn delete(&self) -> Result<()> {
        match self.cloud.delete_stemcell(self.cid()).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::warn!("Stemcell '{}' already gone from cloud: {}", self.cid(), err);
            }
            Err(source) => {
                return Err(StemcellError::DeleteFromCloud {
                    cid: self.cid().to_string(),
                    source,
                });
            }
        }

        self.repo
            .delete(&self.record)
            .await
            .map_err(|source| StemcellError::DeleteRecord {
                cid: self.cid().to_string(),
                source,
            })?;

        tracing::info!("Deleted stemcell {}", self.record);
        Ok(())
    }
}

impl std::fmt::Debug for CloudStemcell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudStemcell")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
