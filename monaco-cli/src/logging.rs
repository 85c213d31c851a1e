//! Logger setup for the `monaco` binary

use log::LevelFilter;

/// Initialise `env_logger`.
///
/// `RUST_LOG` wins over the level picked from the command line.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    builder.format_timestamp(None);
    builder.parse_default_env();

    // A second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}
