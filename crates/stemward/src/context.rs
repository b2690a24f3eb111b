use anyhow::Context as _;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stemward_cloud::{CpiCloud, CpiContext};
use stemward_config::StemwardConfig;
use stemward_core::Manager;
use stemward_events::EventLogger;
use stemward_state::JsonStemcellRepo;

const DEFAULT_DIRECTOR_UUID: &str = "stemward";

/// Everything a command needs, wired from the config file
pub struct Context {
    pub repo: Arc<JsonStemcellRepo>,
    pub event_logger: EventLogger,
    pub manager: Manager,
}

impl Context {
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => stemward_config::find_config_file()?,
        };
        let config = StemwardConfig::load(&path)
            .with_context(|| format!("Loading config {}", path.display()))?;

        let mut cloud = CpiCloud::new(&config.cpi.command)
            .with_args(config.cpi.args.clone())
            .with_context(CpiContext {
                director_uuid: config
                    .cpi
                    .director_uuid
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DIRECTOR_UUID.to_string()),
            });
        if let Some(secs) = config.cpi.timeout_secs {
            cloud = cloud.with_timeout(Duration::from_secs(secs));
        }

        let repo = Arc::new(JsonStemcellRepo::new(&config.state_dir));
        let event_logger = EventLogger::console();
        let manager = Manager::new(repo.clone(), Arc::new(cloud), event_logger.clone());

        tracing::debug!(
            "Using state dir {} and CPI {}",
            config.state_dir.display(),
            config.cpi.command.display()
        );

        Ok(Self {
            repo,
            event_logger,
            manager,
        })
    }
}
