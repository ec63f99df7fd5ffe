use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

// Transport crates are chatty at debug; keep them at warn unless RUST_LOG says otherwise.
const DEPENDENCY_DIRECTIVES: &str = "hyper=warn,hyper_util=warn,reqwest=warn";

pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(default_level))
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{default_level},{DEPENDENCY_DIRECTIVES}")))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{DEPENDENCY_DIRECTIVES}")))
}
