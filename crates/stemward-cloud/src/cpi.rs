//! CPI executable driver
//!
//! Each call spawns the configured CPI executable, writes one JSON request
//! to its stdin and reads one JSON response from its stdout.

use crate::cloud::{Cloud, CloudProperties};
use crate::error::{CloudError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Error type the CPI reports when a stemcell CID is unknown to the IaaS
const STEMCELL_NOT_FOUND: &str = "Bosh::Clouds::StemcellNotFound";

/// Context sent along with every CPI request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpiContext {
    pub director_uuid: String,
}

/// A single CPI request
#[derive(Debug, Clone, Serialize)]
pub struct CpiRequest {
    pub method: String,
    pub arguments: Vec<serde_json::Value>,
    pub context: CpiContext,
}

/// A single CPI response
#[derive(Debug, Clone, Deserialize)]
pub struct CpiResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,

    #[serde(default)]
    pub error: Option<CpiResponseError>,

    #[serde(default)]
    pub log: String,
}

/// Error block of a CPI response
#[derive(Debug, Clone, Deserialize)]
pub struct CpiResponseError {
    #[serde(rename = "type")]
    pub error_type: String,

    pub message: String,

    #[serde(default)]
    pub ok_to_retry: bool,
}

impl CpiResponse {
    /// Turn the response into its result value, mapping CPI errors
    pub fn into_result(self) -> Result<serde_json::Value> {
        if let Some(err) = self.error {
            if err.error_type == STEMCELL_NOT_FOUND {
                return Err(CloudError::StemcellNotFound(err.message));
            }
            return Err(CloudError::CpiError {
                error_type: err.error_type,
                message: err.message,
                ok_to_retry: err.ok_to_retry,
            });
        }

        Ok(self.result.unwrap_or(serde_json::Value::Null))
    }
}

/// Cloud driver backed by a CPI executable
pub struct CpiCloud {
    command: PathBuf,
    args: Vec<String>,
    context: CpiContext,
    timeout: Option<Duration>,
}

impl CpiCloud {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            context: CpiContext::default(),
            timeout: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_context(mut self, context: CpiContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run one CPI method and return its result value
    async fn call(&self, method: &str, arguments: Vec<serde_json::Value>) -> Result<serde_json::Value> {
        let request = CpiRequest {
            method: method.to_string(),
            arguments,
            context: self.context.clone(),
        };
        let payload = serde_json::to_vec(&request)?;

        tracing::debug!("Running CPI: {} {} ({})", self.command.display(), self.args.join(" "), method);

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CloudError::CommandFailed("CPI stdin unavailable".to_string()))?;
        // a CPI that exits without reading its request reports through its exit status
        match stdin.write_all(&payload).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                tracing::debug!("CPI closed stdin before reading the '{}' request", method);
            }
            Err(e) => return Err(e.into()),
        }
        drop(stdin);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| CloudError::Timeout(format!("CPI method '{}' exceeded {:?}", method, limit)))??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CloudError::CommandFailed(format!(
                "{} exited with {}: {}",
                method,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(CloudError::InvalidResponse(format!("empty response to '{}'", method)));
        }

        let response: CpiResponse = serde_json::from_str(stdout.trim())?;
        if !response.log.is_empty() {
            tracing::debug!("CPI log ({}): {}", method, response.log);
        }

        response.into_result()
    }
}

#[async_trait]
impl Cloud for CpiCloud {
    async fn create_stemcell(
        &self,
        cloud_properties: &CloudProperties,
        image_path: &Path,
    ) -> Result<String> {
        let result = self
            .call(
                "create_stemcell",
                vec![
                    serde_json::Value::String(image_path.display().to_string()),
                    serde_json::Value::Object(cloud_properties.clone()),
                ],
            )
            .await?;

        match result {
            serde_json::Value::String(cid) if cid.is_empty() => Err(CloudError::EmptyCid),
            serde_json::Value::String(cid) => {
                tracing::info!("Created stemcell {}", cid);
                Ok(cid)
            }
            other => Err(CloudError::InvalidResponse(format!(
                "create_stemcell returned {} instead of a CID",
                other
            ))),
        }
    }

    async fn delete_stemcell(&self, cid: &str) -> Result<()> {
        self.call("delete_stemcell", vec![serde_json::Value::String(cid.to_string())])
            .await?;
        tracing::info!("Deleted stemcell {}", cid);
        Ok(())
    }
}
