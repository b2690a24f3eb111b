use crate::manifest::ManifestError;
use stemward_cloud::CloudError;
use stemward_state::StateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StemcellError {
    #[error("Reading stemcell record: {0}")]
    ReadRecord(#[source] StateError),

    #[error("Finding existing stemcell record in repo: {0}")]
    FindExistingRecord(#[source] StateError),

    #[error("Getting cloud properties from stemcell manifest: {0}")]
    CloudProperties(#[source] ManifestError),

    #[error("Creating stemcell ({name} {version}): {source}")]
    CreateStemcell {
        name: String,
        version: String,
        source: CloudError,
    },

    #[error("Saving stemcell record in repo (cid={cid}, stemcell={stemcell}): {source}")]
    SaveRecord {
        cid: String,
        stemcell: String,
        source: StateError,
    },

    #[error("Getting all stemcell records: {0}")]
    AllRecords(#[source] StateError),

    #[error("Finding current stemcell record: {0}")]
    CurrentRecord(#[source] StateError),

    #[error("Finding unused stemcells: {0}")]
    FindUnused(#[source] Box<StemcellError>),

    #[error("Deleting stemcell '{cid}' from cloud: {source}")]
    DeleteFromCloud { cid: String, source: CloudError },

    #[error("Deleting stemcell record '{cid}': {source}")]
    DeleteRecord { cid: String, source: StateError },

    #[error("Deleting unused stemcell '{cid}': {source}")]
    DeleteUnused {
        cid: String,
        source: Box<StemcellError>,
    },
}

impl StemcellError {
    /// CID of the stemcell the error is about, when there is one
    pub fn cid(&self) -> Option<&str> {
        match self {
            StemcellError::SaveRecord { cid, .. }
            | StemcellError::DeleteFromCloud { cid, .. }
            | StemcellError::DeleteRecord { cid, .. }
            | StemcellError::DeleteUnused { cid, .. } => Some(cid),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StemcellError>;
