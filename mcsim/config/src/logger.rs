use anyhow::{Context, Result};
use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record};

pub struct MinimalLogger;

static MINIMAL_LOGGER: MinimalLogger = MinimalLogger;

impl log::Log for MinimalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_string = match record.level() {
            Level::Error => record.level().to_string().red(),
            Level::Warn => record.level().to_string().yellow(),
            Level::Info => record.level().to_string().cyan(),
            Level::Debug => record.level().to_string().purple(),
            Level::Trace => record.level().to_string().normal(),
        };

        // Warnings and errors go to stderr
        if record.level() > LevelFilter::Warn {
            println!("{:<5} {}", level_string, record.args());
        } else {
            eprintln!("{:<5} {}", level_string, record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs the [`MinimalLogger`] as the global logger.
///
/// # Errors
///
/// Returns an error if another logger has already been installed.
pub fn init_logger(level: LevelFilter) -> Result<()> {
    log::set_logger(&MINIMAL_LOGGER)
        .map_err(|err| anyhow::anyhow!("{}", err))
        .context("Failed to install the minimal logger.")?;

    log::set_max_level(level);

    Ok(())
}
