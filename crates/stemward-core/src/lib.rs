//! Stemcell lifecycle management
//!
//! Reconciles the local record of uploaded stemcells with what exists in
//! the cloud:
//!
//! - [`Manager::upload`] creates a stemcell at most once per `name/version`
//! - [`Manager::find_current`] / [`Manager::find_unused`] read the records
//! - [`Manager::delete_unused`] retires everything but the current stemcell
//!
//! Two windows are not closed here. A crash (or failed save) after the
//! cloud created a stemcell leaves an unrecorded remote stemcell, and a
//! failed record delete after a successful cloud delete leaves a record
//! pointing at nothing. The second one heals on the next run because the
//! cloud reports the CID as not found.

pub mod cloud_stemcell;
pub mod error;
pub mod manager;
pub mod manifest;

pub use cloud_stemcell::CloudStemcell;
pub use error::{Result, StemcellError};
pub use manager::Manager;
pub use manifest::{ExtractedStemcell, ManifestError, StemcellManifest};
