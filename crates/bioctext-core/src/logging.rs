//! Logging setup with indicatif integration
//!
//! All diagnostics go to stderr; stdout is reserved for extracted records.
//! In TTY mode log lines are routed through the `MultiProgress` so they do
//! not tear active progress bars.

use indicatif::MultiProgress;

fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

fn level_ansi(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "\x1b[31m",
        log::Level::Warn => "\x1b[33m",
        log::Level::Info => "\x1b[32m",
        log::Level::Debug => "\x1b[36m",
        log::Level::Trace => "\x1b[35m",
    }
}

/// Logger that prints through indicatif `MultiProgress` to avoid mixing
/// log lines with progress bars.
pub struct ProgressLogger {
    inner: env_logger::Logger,
    multi: MultiProgress,
}

impl log::Log for ProgressLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.inner.enabled(record.metadata()) {
            // ProgressLogger is only installed in TTY mode, so color is safe
            let line = format!(
                "[{}{}\x1b[0m] {}",
                level_ansi(record.level()),
                level_label(record.level()),
                record.args()
            );
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Initialize the `log` facade.
///
/// With a `MultiProgress` (TTY mode) a [`ProgressLogger`] is installed;
/// otherwise plain `env_logger` output without ANSI colors. The default
/// filter is `info` (`debug` with the debug flag), overridable via
/// `RUST_LOG`.
pub fn init_logging(debug: bool, multi: Option<&MultiProgress>) {
    use std::io::Write;

    let default_level = if debug { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);

    match multi {
        Some(multi) => {
            let inner = env_logger::Builder::from_env(env).build();
            let max_level = inner.filter();
            let logger = ProgressLogger {
                inner,
                multi: multi.clone(),
            };
            log::set_boxed_logger(Box::new(logger)).expect("failed to init logger");
            log::set_max_level(max_level);
        }
        None => {
            env_logger::Builder::from_env(env)
                .format(|buf, record| {
                    writeln!(buf, "[{}] {}", level_label(record.level()), record.args())
                })
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_fixed_width() {
        for level in [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ] {
            assert_eq!(level_label(level).len(), 5);
        }
    }
}
