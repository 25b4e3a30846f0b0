use crate::config::Config;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Chatty dependencies, silenced below TRACE. WebSocket frames show up under `tungstenite`.
const NOISY_DEPENDENCIES: &[&str] = &[
    "sqlx",
    "sea_orm",
    "tower",
    "tracing",
    "hyper",
    "axum",
    "tungstenite",
];

pub struct Logger {}

impl Logger {
    /// Install a terminal logger at the configured level.
    ///
    /// Installing twice (tests, the seed binary reusing a process) only reports the error.
    pub fn init_logger(config: &Config) {
        if let Err(e) = TermLogger::init(
            config.log_level_filter,
            Self::log_config(config.log_level_filter),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ) {
            eprintln!("Failed to start simplelog: {e}");
        }
    }

    fn ignored_modules(level: LevelFilter) -> &'static [&'static str] {
        if level == LevelFilter::Trace {
            &[]
        } else {
            NOISY_DEPENDENCIES
        }
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        for module in Self::ignored_modules(level) {
            builder.add_filter_ignore_str(module);
        }
        builder.build()
    }
}
