//! Logger initialization.

use log::LevelFilter;
use std::io::Write;

/// Sets up `env_logger`.
///
/// `RUST_LOG` is read first; an explicit `level` from `--log-level`
/// overrides it. HTTP client internals are capped at `info`.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
    }
    if let Some(level) = level {
        builder.filter_level(level);
        builder.filter_module("langmap_core", level);
    }
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Already initialized (tests) is fine.
    let _ = builder.try_init();
}
