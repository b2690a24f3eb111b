use crate::cloud_stemcell::CloudStemcell;
use crate::error::{Result, StemcellError};
use crate::manifest::ExtractedStemcell;
use stemward_cloud::Cloud;
use stemward_events::{EventLogger, Stage, StepOutcome};
use stemward_state::{StemcellRecord, StemcellRepo};
use std::sync::Arc;

pub const UPLOAD_STAGE: &str = "uploading stemcell";
pub const UPLOAD_STEP: &str = "Uploading";

/// Reconciles stemcell records with the cloud
pub struct Manager {
    repo: Arc<dyn StemcellRepo>,
    cloud: Arc<dyn Cloud>,
    event_logger: EventLogger,
}

impl Manager {
    pub fn new(repo: Arc<dyn StemcellRepo>, cloud: Arc<dyn Cloud>, event_logger: EventLogger) -> Self {
        Self {
            repo,
            cloud,
            event_logger,
        }
    }

    fn cloud_stemcell(&self, record: StemcellRecord) -> CloudStemcell {
        CloudStemcell::new(record, Arc::clone(&self.repo), Arc::clone(&self.cloud))
    }

    /// The stemcell marked current; `None` on a fresh install
    pub async fn find_current(&self) -> Result<Option<CloudStemcell>> {
        let record = self
            .repo
            .find_current()
            .await
            .map_err(StemcellError::ReadRecord)?;

        Ok(record.map(|record| self.cloud_stemcell(record)))
    }

    /// Upload a stemcell unless one with the same name and version exists
    ///
    /// An existing record is reported as a skipped step and returned as is.
    pub async fn upload(&self, extracted: &ExtractedStemcell) -> Result<CloudStemcell> {
        let stage = self.event_logger.new_stage(UPLOAD_STAGE);
        stage.start();

        let manifest = extracted.manifest();
        let outcome = stage
            .perform_step(UPLOAD_STEP, || async move {
                let existing = self
                    .repo
                    .find(&manifest.name, &manifest.version)
                    .await
                    .map_err(StemcellError::FindExistingRecord)?;

                if let Some(record) = existing {
                    tracing::info!("Stemcell {} already uploaded", record);
                    return Ok(StepOutcome::skipped(
                        self.cloud_stemcell(record),
                        "Stemcell already uploaded",
                    ));
                }

                let cloud_properties = manifest
                    .cloud_properties()
                    .map_err(StemcellError::CloudProperties)?;

                let cid = self
                    .cloud
                    .create_stemcell(&cloud_properties, &manifest.image_path)
                    .await
                    .map_err(|source| StemcellError::CreateStemcell {
                        name: manifest.name.clone(),
                        version: manifest.version.clone(),
                        source,
                    })?;

                // the cloud stemcell is orphaned if this save fails
                let record = self
                    .repo
                    .save(&manifest.name, &manifest.version, &cid)
                    .await
                    .map_err(|source| {
                        tracing::warn!("Cloud stemcell {} has no record: {}", cid, source);
                        StemcellError::SaveRecord {
                            cid: cid.clone(),
                            stemcell: extracted.to_string(),
                            source,
                        }
                    })?;

                tracing::info!("Uploaded stemcell {}", record);
                Ok::<_, StemcellError>(StepOutcome::done(self.cloud_stemcell(record)))
            })
            .await?;

        stage.finish();
        Ok(outcome.into_value())
    }

    /// Every stemcell other than the current one, in repo order
    pub async fn find_unused(&self) -> Result<Vec<CloudStemcell>> {
        let records = self.repo.all().await.map_err(StemcellError::AllRecords)?;

        let current = self
            .repo
            .find_current()
            .await
            .map_err(StemcellError::CurrentRecord)?;

        let unused = records
            .into_iter()
            .filter(|record| current.as_ref().is_none_or(|current| current.id != record.id))
            .map(|record| self.cloud_stemcell(record))
            .collect();

        Ok(unused)
    }

    /// Delete unused stemcells one step at a time, stopping at the first failure
    ///
    /// Stemcells deleted before the failure stay deleted.
    pub async fn delete_unused(&self, stage: &Stage) -> Result<()> {
        let stemcells = self
            .find_unused()
            .await
            .map_err(|err| StemcellError::FindUnused(Box::new(err)))?;

        for stemcell in &stemcells {
            let step_name = format!("Deleting unused stemcell '{}'", stemcell.cid());
            stage
                .perform_step(&step_name, || async move {
                    stemcell
                        .delete()
                        .await
                        .map_err(|err| StemcellError::DeleteUnused {
                            cid: stemcell.cid().to_string(),
                            source: Box::new(err),
                        })?;
                    Ok::<_, StemcellError>(StepOutcome::done(()))
                })
                .await?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager").finish_non_exhaustive()
    }
}
