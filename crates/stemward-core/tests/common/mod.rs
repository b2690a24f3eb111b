#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use stemward_cloud::{Cloud, CloudError, CloudProperties};
use stemward_core::{ExtractedStemcell, Manager, StemcellManifest};
use stemward_events::{EventLogger, MemorySink};
use stemward_state::{StateError, StemcellRecord, StemcellRepo};

/// Cloud that hands out `cid-1`, `cid-2`, ... and records every call
#[derive(Default)]
pub struct FakeCloud {
    inner: Mutex<FakeCloudState>,
}

#[derive(Default)]
struct FakeCloudState {
    created: usize,
    create_calls: Vec<(CloudProperties, PathBuf)>,
    delete_calls: Vec<String>,
    fail_create: bool,
    fail_delete: HashSet<String>,
    gone: HashSet<String>,
}

impl FakeCloud {
    pub fn fail_create(&self) {
        self.inner.lock().unwrap().fail_create = true;
    }

    pub fn fail_delete(&self, cid: &str) {
        self.inner.lock().unwrap().fail_delete.insert(cid.to_string());
    }

    pub fn mark_gone(&self, cid: &str) {
        self.inner.lock().unwrap().gone.insert(cid.to_string());
    }

    pub fn create_calls(&self) -> Vec<(CloudProperties, PathBuf)> {
        self.inner.lock().unwrap().create_calls.clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().delete_calls.clone()
    }
}

#[async_trait]
impl Cloud for FakeCloud {
    async fn create_stemcell(
        &self,
        cloud_properties: &CloudProperties,
        image_path: &Path,
    ) -> stemward_cloud::Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .create_calls
            .push((cloud_properties.clone(), image_path.to_path_buf()));
        if inner.fail_create {
            return Err(CloudError::CpiError {
                error_type: "Bosh::Clouds::CloudError".to_string(),
                message: "fake-create-error".to_string(),
                ok_to_retry: false,
            });
        }
        inner.created += 1;
        Ok(format!("cid-{}", inner.created))
    }

    async fn delete_stemcell(&self, cid: &str) -> stemward_cloud::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_calls.push(cid.to_string());
        if inner.fail_delete.contains(cid) {
            return Err(CloudError::CommandFailed(format!("fake-delete-error {}", cid)));
        }
        if inner.gone.contains(cid) {
            return Err(CloudError::StemcellNotFound(cid.to_string()));
        }
        Ok(())
    }
}

/// In-memory repo with switchable failures
#[derive(Default)]
pub struct FakeRepo {
    inner: Mutex<FakeRepoState>,
}

#[derive(Default)]
pub struct FakeRepoState {
    pub records: Vec<StemcellRecord>,
    pub current: Option<String>,
    pub next_id: usize,
    pub fail_find: bool,
    pub fail_find_current: bool,
    pub fail_all: bool,
    pub fail_save: bool,
    pub fail_delete: bool,
}

fn fake_error(what: &str) -> StateError {
    StateError::Io(std::io::Error::other(format!("fake-{}-error", what)))
}

impl FakeRepo {
    pub fn configure(&self, f: impl FnOnce(&mut FakeRepoState)) {
        f(&mut self.inner.lock().unwrap());
    }

    pub fn records(&self) -> Vec<StemcellRecord> {
        self.inner.lock().unwrap().records.clone()
    }

    /// Insert a record directly, bypassing the cloud
    pub fn seed(&self, name: &str, version: &str, cid: &str) -> StemcellRecord {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let record = StemcellRecord::new(format!("record-{}", inner.next_id), name, version, cid);
        inner.records.push(record.clone());
        record
    }

    pub fn set_current(&self, record: &StemcellRecord) {
        self.inner.lock().unwrap().current = Some(record.id.clone());
    }
}

#[async_trait]
impl StemcellRepo for FakeRepo {
    async fn find_current(&self) -> stemward_state::Result<Option<StemcellRecord>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_find_current {
            return Err(fake_error("find-current"));
        }
        Ok(inner
            .current
            .as_ref()
            .and_then(|id| inner.records.iter().find(|r| &r.id == id))
            .cloned())
    }

    async fn find(&self, name: &str, version: &str) -> stemward_state::Result<Option<StemcellRecord>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_find {
            return Err(fake_error("find"));
        }
        Ok(inner.records.iter().find(|r| r.matches(name, version)).cloned())
    }

    async fn save(&self, name: &str, version: &str, cid: &str) -> stemward_state::Result<StemcellRecord> {
        if self.inner.lock().unwrap().fail_save {
            return Err(fake_error("save"));
        }
        Ok(self.seed(name, version, cid))
    }

    async fn all(&self) -> stemward_state::Result<Vec<StemcellRecord>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_all {
            return Err(fake_error("all"));
        }
        Ok(inner.records.clone())
    }

    async fn delete(&self, record: &StemcellRecord) -> stemward_state::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_delete {
            return Err(fake_error("delete"));
        }
        inner.records.retain(|r| r.id != record.id);
        if inner.current.as_deref() == Some(record.id.as_str()) {
            inner.current = None;
        }
        Ok(())
    }

    async fn update_current(&self, record_id: &str) -> stemward_state::Result<()> {
        self.inner.lock().unwrap().current = Some(record_id.to_string());
        Ok(())
    }

    async fn clear_current(&self) -> stemward_state::Result<()> {
        self.inner.lock().unwrap().current = None;
        Ok(())
    }
}

pub struct Fixture {
    pub repo: Arc<FakeRepo>,
    pub cloud: Arc<FakeCloud>,
    pub sink: Arc<MemorySink>,
    pub logger: EventLogger,
    pub manager: Manager,
}

impl Fixture {
    pub fn new() -> Self {
        let repo = Arc::new(FakeRepo::default());
        let cloud = Arc::new(FakeCloud::default());
        let sink = Arc::new(MemorySink::new());
        let logger = EventLogger::new(sink.clone());
        let manager = Manager::new(repo.clone(), cloud.clone(), logger.clone());
        Self {
            repo,
            cloud,
            sink,
            logger,
            manager,
        }
    }
}

/// Extracted stemcell with `cloud_properties: {x: 1}` and image `/tmp/img`
pub fn extracted(name: &str, version: &str) -> ExtractedStemcell {
    let manifest = StemcellManifest::parse(&format!(
        "name: {}\nversion: '{}'\ncloud_properties:\n  x: 1\n",
        name, version
    ))
    .unwrap()
    .with_image_path("/tmp/img");
    ExtractedStemcell::new(manifest, "/tmp/extracted")
}
