use chrono::Local;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m\x1b[1m", // red
        Level::Warn => "\x1b[33m\x1b[1m",  // yellow
        Level::Info => "\x1b[32m\x1b[1m",  // green
        Level::Debug => "\x1b[36m\x1b[1m", // cyan
        Level::Trace => "\x1b[90m\x1b[1m", // grey
    }
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{}{} {}\x1b[0m [{}:{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level_color(record.level()),
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args(),
        )
    });
    builder
}

/// Installs the coloured line logger. `RUST_LOG` overrides the default `info` filter.
pub fn init_logger() {
    builder().init();
}
