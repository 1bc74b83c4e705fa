use helixis_core::config::{LogConfig, LogFormat};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HELIXIS_LOG";

/// Filter precedence: `HELIXIS_LOG`, then `-v` flags, then `log.level` from
/// config, then `warn`. Output goes to stderr.
pub fn init(verbose: u8, config: &LogConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, config.level.as_deref())));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(e) = installed {
        eprintln!("failed to initialise logging: {e}");
    }
}

fn default_directive(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
    .to_string()
}
