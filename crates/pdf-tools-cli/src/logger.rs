use chrono::Local;
use log::{LevelFilter, Metadata, Record};

/// Timestamped stderr logger for the command line
pub struct CliLogger {
    max_level: LevelFilter,
}

impl CliLogger {
    pub fn new(verbose: bool) -> Self {
        Self {
            max_level: if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "{} {}",
            Local::now().format("%H:%M:%S%.3f"),
            format_record(record)
        );
    }

    fn flush(&self) {}
}

/// Level, originating module and message
fn format_record(record: &Record) -> String {
    format!("{:<5} [{}] {}", record.level(), record.target(), record.args())
}
