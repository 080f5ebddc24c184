use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

pub const LOG_FILE_NAME: &str = "xmonsters.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
        }
    }
}

impl LogConfig {
    pub fn parse_level(value: &str) -> Result<LevelFilter, String> {
        value
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| format!("unknown log level '{}'", value.trim()))
    }
}

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

const HEADER_LINE: &str = "-------------------------------------------------------------------------------";
const HEADER_TITLE: &str = "XMonsters - hostile creature toggle";

/// Installs the file logger under `<data_dir>/log`. Later calls are no-ops.
pub fn init(data_dir: &Path, config: LogConfig) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let log_dir = data_dir.join("log");
    std::fs::create_dir_all(&log_dir)
        .map_err(|err| format!("log directory create failed: {}", err))?;

    let path = log_dir.join(LOG_FILE_NAME);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|err| format!("open log {} failed: {}", path.display(), err))?;
    if file.metadata().map(|m| m.len()).unwrap_or(0) == 0 {
        write_header(&mut file)?;
    }

    LOGGER
        .set(FileLogger {
            level: config.level,
            file: Mutex::new(file),
        })
        .map_err(|_| "log system already initialized".to_string())?;
    if let Some(logger) = LOGGER.get() {
        log::set_logger(logger).map_err(|err| format!("logger install failed: {}", err))?;
        log::set_max_level(config.level);
    }
    Ok(())
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            &format_timestamp(unix_timestamp()),
            record.level(),
            record.target(),
            &record.args().to_string(),
        );
        if record.level() <= log::Level::Warn {
            eprint!("{}", line);
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn format_line(timestamp: &str, level: log::Level, target: &str, message: &str) -> String {
    format!("{timestamp} [{level}] {target}: {message}\n")
}

fn write_header(file: &mut File) -> Result<(), String> {
    let timestamp = format_timestamp(unix_timestamp());
    writeln!(file, "{HEADER_LINE}\n{HEADER_TITLE}\n{LOG_FILE_NAME} - started {timestamp}")
        .map_err(|err| format!("header write failed: {}", err))
}

fn format_timestamp(ts: i64) -> String {
    let secs = ts.max(0);
    let (year, month, day) = civil_from_days(secs / 86_400);
    let seconds_of_day = secs % 86_400;
    format!(
        "{:02}.{:02}.{} {:02}:{:02}:{:02}",
        day,
        month,
        year,
        seconds_of_day / 3_600,
        (seconds_of_day % 3_600) / 60,
        seconds_of_day % 60
    )
}

fn unix_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = (yoe + era * 400 + if month <= 2 { 1 } else { 0 }) as i32;
    (year, month, day)
}
