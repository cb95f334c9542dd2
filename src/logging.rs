use anyhow::Context as _;

/// Our own events at `info`, dependencies only when they warn.
pub const DEFAULT_FILTER: &str = "newsdesk=info,warn";

pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("install log subscriber: {err}"))?;

    Ok(())
}
