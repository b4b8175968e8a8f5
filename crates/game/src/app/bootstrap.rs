use std::path::PathBuf;

use engine::LoopConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAP_ENV_VAR: &str = "TILEWALK_MAP";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tilewalk Startup ===");

    let map_override = parse_map_override(std::env::var(MAP_ENV_VAR).ok());
    if let Some(path) = &map_override {
        info!(map = %path.display(), env_var = MAP_ENV_VAR, "map_override");
    }
    let config = LoopConfig {
        map_override,
        ..LoopConfig::default()
    };

    AppWiring { config }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_map_override(raw: Option<String>) -> Option<PathBuf> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
