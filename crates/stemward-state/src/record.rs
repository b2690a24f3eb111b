//! Persisted record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const STATE_VERSION: u32 = 1;

/// One uploaded stemcell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemcellRecord {
    /// Store-assigned record id
    pub id: String,

    pub name: String,

    pub version: String,

    /// CID returned by the cloud when the stemcell was created
    pub cid: String,
}

impl StemcellRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        cid: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            cid: cid.into(),
        }
    }

    /// Whether this record carries the given identity
    pub fn matches(&self, name: &str, version: &str) -> bool {
        self.name == name && self.version == version
    }
}

impl std::fmt::Display for StemcellRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} (cid={})", self.name, self.version, self.cid)
    }
}

/// Contents of `state.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Id of the current stemcell record, if any
    #[serde(default)]
    pub current_stemcell_id: Option<String>,

    /// Records in upload order
    #[serde(default)]
    pub stemcells: Vec<StemcellRecord>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            current_stemcell_id: None,
            stemcells: Vec::new(),
        }
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str, version: &str) -> Option<&StemcellRecord> {
        self.stemcells.iter().find(|r| r.matches(name, version))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StemcellRecord> {
        self.stemcells.iter().find(|r| r.id == id)
    }

    /// The current record; a marker pointing at a missing record reads as none
    pub fn current(&self) -> Option<&StemcellRecord> {
        self.current_stemcell_id
            .as_deref()
            .and_then(|id| self.find_by_id(id))
    }

    pub fn push(&mut self, record: StemcellRecord) {
        self.stemcells.push(record);
        self.updated_at = Utc::now();
    }

    /// Remove a record by id, clearing the current marker if it pointed there
    pub fn remove(&mut self, id: &str) -> Option<StemcellRecord> {
        let index = self.stemcells.iter().position(|r| r.id == id)?;
        let removed = self.stemcells.remove(index);
        if self.current_stemcell_id.as_deref() == Some(id) {
            self.current_stemcell_id = None;
        }
        self.updated_at = Utc::now();
        Some(removed)
    }

    pub fn set_current(&mut self, id: Option<String>) {
        self.current_stemcell_id = id;
        self.updated_at = Utc::now();
    }
}
