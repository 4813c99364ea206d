use core::str::FromStr;

use esp_println::println;
use log::{
    max_level, set_logger_racy, set_max_level_racy, trace, Level, LevelFilter, Log, Metadata,
    Record,
};

pub fn setup() {
    const LEVEL: Option<&'static str> = option_env!("ESP_LOG");

    // SAFETY:
    // This function must be called once at the beginning of execution.
    if unsafe { set_logger_racy(&SystemLogger) }.is_err() {
        // Nothing else to do; logging will not work.
        return;
    }

    let level = LEVEL
        .and_then(|level| LevelFilter::from_str(level).ok())
        .unwrap_or(LevelFilter::Info);

    // SAFETY: same single-call requirement as above.
    unsafe { set_max_level_racy(level) };

    trace!("Logger is ready");
}

/// Logger that prints records in the `E (12345) target: message` shape the
/// rest of the ESP tooling expects on the console.
struct SystemLogger;

impl Log for SystemLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let marker = match record.level() {
            Level::Error => 'E',
            Level::Warn => 'W',
            Level::Info => 'I',
            Level::Debug => 'D',
            Level::Trace => 'V',
        };

        let uptime_ms = esp_hal::time::now().duration_since_epoch().to_millis();

        println!("{} ({}) {}: {}", marker, uptime_ms, record.target(), record.args());
    }

    fn flush(&self) {}
}
