//! Extracted stemcell input
//!
//! An extracted stemcell is a directory holding a `stemcell.MF` manifest
//! and the `image` to upload. Unpacking the distribution tarball happens
//! before stemward sees it.

use serde::{Deserialize, Deserializer};
use stemward_cloud::CloudProperties;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_FILE: &str = "stemcell.MF";
pub const IMAGE_FILE: &str = "image";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Stemcell image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid cloud properties: {0}")]
    InvalidCloudProperties(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed `stemcell.MF`
#[derive(Debug, Clone, Deserialize)]
pub struct StemcellManifest {
    pub name: String,

    #[serde(deserialize_with = "version_string")]
    pub version: String,

    #[serde(default, rename = "cloud_properties")]
    raw_cloud_properties: serde_yaml::Value,

    #[serde(skip)]
    pub image_path: PathBuf,
}

/// Versions are often written unquoted (`version: 1.0`, `version: 3468`)
fn version_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "version must be a string or number, got {:?}",
            other
        ))),
    }
}

impl StemcellManifest {
    /// Parse manifest YAML; `image_path` is left empty
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn with_image_path(mut self, image_path: impl Into<PathBuf>) -> Self {
        self.image_path = image_path.into();
        self
    }

    /// Cloud properties as a string-keyed JSON map
    ///
    /// A missing section is an empty map; anything other than a mapping
    /// with string keys is an error.
    pub fn cloud_properties(&self) -> Result<CloudProperties, ManifestError> {
        let mapping = match &self.raw_cloud_properties {
            serde_yaml::Value::Null => return Ok(CloudProperties::new()),
            serde_yaml::Value::Mapping(mapping) => mapping,
            other => {
                return Err(ManifestError::InvalidCloudProperties(format!(
                    "expected a mapping, got {:?}",
                    other
                )));
            }
        };

        let mut properties = CloudProperties::new();
        for (key, value) in mapping {
            let key = key.as_str().ok_or_else(|| {
                ManifestError::InvalidCloudProperties(format!("non-string key {:?}", key))
            })?;
            let value = serde_json::to_value(value)
                .map_err(|e| ManifestError::InvalidCloudProperties(format!("{}: {}", key, e)))?;
            properties.insert(key.to_string(), value);
        }
        Ok(properties)
    }
}

/// A stemcell unpacked on local disk, ready for upload
#[derive(Debug, Clone)]
pub struct ExtractedStemcell {
    manifest: StemcellManifest,
    extracted_path: PathBuf,
}

impl ExtractedStemcell {
    pub fn new(manifest: StemcellManifest, extracted_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            extracted_path: extracted_path.into(),
        }
    }

    /// Read `<dir>/stemcell.MF` and point the manifest at `<dir>/image`
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        let image_path = dir.join(IMAGE_FILE);
        if !image_path.exists() {
            return Err(ManifestError::ImageNotFound(image_path));
        }

        let manifest = StemcellManifest::parse(&content)?.with_image_path(image_path);
        tracing::debug!(
            "Loaded stemcell manifest {}/{} from {}",
            manifest.name,
            manifest.version,
            dir.display()
        );
        Ok(Self::new(manifest, dir))
    }

    pub fn manifest(&self) -> &StemcellManifest {
        &self.manifest
    }

    pub fn extracted_path(&self) -> &Path {
        &self.extracted_path
    }
}

impl std::fmt::Display for ExtractedStemcell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} at {}",
            self.manifest.name,
            self.manifest.version,
            self.extracted_path.display()
        )
    }
}
