use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "recipe_core=info,recipe_native=info";

/// Initialize logging to stderr
///
/// The level can be controlled via the RUST_LOG environment variable:
/// - RUST_LOG=recipe_core=debug  (token decode and request dispatch)
/// - RUST_LOG=warn               (failures only)
///
/// Tokens are never logged.
pub fn init() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Either this test installed the subscriber or another one did first
        let _ = init();
        assert!(init().is_err());
    }
}
