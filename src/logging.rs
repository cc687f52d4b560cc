//! Logging setup on top of the `log` facade and `env_logger`.
//!
//! `RUST_LOG` wins when set. Otherwise the level comes from the CLI:
//! `--quiet` logs errors only, the default is info, `-v` is debug and
//! `-vv` is trace.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Install the global logger. Calling it twice is harmless; the second call
/// leaves the first logger in place.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder);

    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at level {}", log::max_level());
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder) {
    builder.format(|buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        writeln!(
            buf,
            "{} {level_style}{:<5}{level_style:#} [{}] {}",
            buf.timestamp_seconds(),
            level,
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder) {
    builder.format(|buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        writeln!(buf, "{level_style}{:<5}{level_style:#} {}", level, record.args())
    });
}
