/// Structured logging for the GDDP fetch client
///
/// Provides context-rich logging with component and product identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging for unattended runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Catalog,
    Selection,
    Submit,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Catalog => write!(f, "CATALOG"),
            Component::Selection => write!(f, "SELECT"),
            Component::Submit => write!(f, "SUBMIT"),
            Component::Config => write!(f, "CONFIG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. the service is simply not running locally
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, component: &Component, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp,
            level,
            component,
            subject_part,
            message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, subject_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

fn dispatch(level: LogLevel, component: Component, subject: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &component, subject, message);
        }
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, subject, message);
}

/// Log a warning message
pub fn warn(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, subject, message);
}

/// Log an error message
pub fn error(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, subject, message);
}

/// Log a debug message
pub fn debug(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, subject, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a catalog load failure based on the error message
pub fn classify_catalog_failure(error_message: &str) -> FailureType {
    // A refused connection almost always means the local service isn't up
    if error_message.contains("Connection refused") || error_message.contains("connection refused") {
        FailureType::Expected
    }
    // HTTP errors and unparseable bodies point at the service itself
    else if error_message.contains("HTTP error") || error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    else {
        FailureType::Unknown
    }
}

/// Classify a result submission failure
pub fn classify_submit_failure(error_message: &str) -> FailureType {
    if error_message.contains("HTTP error") || error_message.contains("timed out") {
        FailureType::Unexpected
    } else if error_message.contains("Write failed") {
        FailureType::Expected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a catalog failure with automatic classification
pub fn log_catalog_failure(url: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_catalog_failure(&error_msg);

    let message = format!(
        "Catalog load failed [{}]: {} (continuing with no products)",
        failure_type,
        error_msg
    );

    match failure_type {
        FailureType::Expected => warn(Component::Catalog, Some(url), &message),
        FailureType::Unexpected => error(Component::Catalog, Some(url), &message),
        FailureType::Unknown => warn(Component::Catalog, Some(url), &message),
    }
}

/// Log a submission failure with classification
pub fn log_submit_failure(product_id: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_submit_failure(&error_msg);

    let message = format!("Submission failed [{}]: {}", failure_type, error_msg);

    match failure_type {
        FailureType::Expected => warn(Component::Submit, Some(product_id), &message),
        FailureType::Unexpected | FailureType::Unknown => {
            error(Component::Submit, Some(product_id), &message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("info".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!(" WARN ".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_catalog_failure_classification() {
        let refused = "Request failed: error sending request: tcp connect error: Connection refused (os error 111)";
        assert_eq!(classify_catalog_failure(refused), FailureType::Expected);

        assert_eq!(classify_catalog_failure("HTTP error: 500"), FailureType::Unexpected);
        assert_eq!(classify_catalog_failure("Parse error: expected value"), FailureType::Unexpected);
        assert_eq!(classify_catalog_failure("something odd"), FailureType::Unknown);
    }

    #[test]
    fn test_submit_failure_classification() {
        assert_eq!(classify_submit_failure("HTTP error: 502"), FailureType::Unexpected);
        assert_eq!(classify_submit_failure("Write failed: permission denied"), FailureType::Expected);
        assert_eq!(classify_submit_failure("Request failed: reset"), FailureType::Unknown);
    }

    #[test]
    fn test_logging_before_init_is_a_noop() {
        // Must not panic when no logger has been installed in this process.
        debug(Component::System, None, "nothing listens yet");
    }
}
