//! joe: logchamp
//! joe: call it logchamp
//! joe: please

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

use colored::{Color, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::macros;

const LOG_FILE: &str = ".log";

struct Logger {
    file: Mutex<BufWriter<File>>,
}

impl Logger {
    fn new(filename: &str) -> io::Result<Self> {
        let file = File::options().append(true).create(true).open(filename)?;
        Ok(Self { file: Mutex::new(BufWriter::new(file)) })
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match metadata.target().split("::").next() {
            Some("yt_search_bot") => true,
            _ => metadata.level() <= Level::Info,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = time::OffsetDateTime::now_utc()
            .format(macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .unwrap_or_default();
        let target = record.target();
        let level = record.level().as_str();
        let args = record.args();

        let color = match record.level() {
            Level::Error => Color::BrightRed,
            Level::Warn => Color::BrightYellow,
            Level::Info => Color::BrightCyan,
            Level::Debug => Color::Magenta,
            Level::Trace => Color::Green,
        };

        println!("{} {} {args}", timestamp.color(Color::BrightBlack), level.color(color));

        if let Ok(mut file) = self.file.lock() {
            // nowhere left to report a failing log file
            let _ = writeln!(file, "{timestamp} [{target} {level}] {args}");
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[derive(Debug)]
pub enum InitError {
    File(io::Error),
    Logger(SetLoggerError),
}

impl From<io::Error> for InitError {
    fn from(value: io::Error) -> Self {
        Self::File(value)
    }
}

impl From<SetLoggerError> for InitError {
    fn from(value: SetLoggerError) -> Self {
        Self::Logger(value)
    }
}

pub fn init() -> Result<(), InitError> {
    log::set_boxed_logger(Box::new(Logger::new(LOG_FILE)?))?;
    log::set_max_level(LevelFilter::Debug);

    Ok(())
}
