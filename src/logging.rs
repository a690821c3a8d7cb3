//! Logger initialization
//!
//! Diagnostics go to stderr so they never mix with table output on stdout.

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode};

/// Map the number of `-v` flags to a level filter
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initialize the terminal logger; a second call is a no-op
pub fn initialize(verbosity: u8) {
    let _ = TermLogger::init(
        level_for_verbosity(verbosity),
        build_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build()
}
