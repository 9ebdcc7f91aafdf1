use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "AE_INSTALL_LOG";

/// Diagnostics go to stderr so they never mix with the install messages on stdout.
///
/// Quiet by default; `AE_INSTALL_LOG=debug` shows every HTTP hop and extraction step.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
