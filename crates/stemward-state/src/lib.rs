//! Stemcell record store
//!
//! Tracks which stemcells have been uploaded (and under which CID) and which
//! one is current. The [`StemcellRepo`] trait is what the lifecycle manager
//! consumes; [`JsonStemcellRepo`] persists it to `<state_dir>/state.json`.

pub mod error;
pub mod lock;
pub mod record;
pub mod repo;

pub use error::{Result, StateError};
pub use lock::StateLock;
pub use record::{StateFile, StemcellRecord};
pub use repo::{JsonStemcellRepo, StemcellRepo};
