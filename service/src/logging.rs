use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::ConfigBuilder;

/// Dependency modules whose records are dropped unless running at Trace.
const FILTERED_MODULES: &[&str] = &["tower", "hyper", "axum", "reqwest", "rustls", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs a terminal logger at the configured level.
    ///
    /// Trace shows everything, including the HTTP stack. Any other level keeps
    /// output to this workspace's own crates so that webhook verdicts are easy
    /// to follow in the console.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;
        let log_config = Self::build_log_config(Self::should_filter_dependencies(level));

        simplelog::TermLogger::init(
            level,
            log_config,
            simplelog::TerminalMode::Mixed,
            Self::color_choice(config),
        )?;

        log::info!(
            "Logging initialized at {level} for the {} environment",
            config.runtime_env
        );
        Ok(())
    }

    // No ANSI color codes in production.
    fn color_choice(config: &Config) -> simplelog::ColorChoice {
        if config.is_production() {
            simplelog::ColorChoice::Never
        } else {
            simplelog::ColorChoice::Auto
        }
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();
        builder.set_target_level(LevelFilter::Error);

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}
