//! COM1 sink for the `log` facade.
use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;
use uart_16550::SerialPort;

use crate::hal::interrupt_free;

pub static SERIAL: Mutex<SerialPort> = Mutex::new(unsafe { SerialPort::new(0x3F8) });

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt_free(|| {
            let mut serial = SERIAL.lock();
            let _ = writeln!(serial, "[{:<5}] {}: {}", record.level(), record.target(), record.args());
        });
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Initialise COM1 and route `log` records to it. Calling it twice keeps the
/// first logger.
pub fn init_logging(level: LevelFilter) {
    interrupt_free(|| SERIAL.lock().init());
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
