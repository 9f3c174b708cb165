//! Structured logging for tcping
//!
//! Log entries carry a level, a logger name, structured fields and an
//! optional source location. They are rendered as human-readable console
//! lines, JSON objects or compact one-liners. Every entry is written to
//! stderr so that stdout only carries probe lines and the final report.

use crate::error::{AppError, Result};
use crate::models::{Config, ProbeOutcome, Target};
use crate::stats::{format_duration, PingResult};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Right-aligned level label in the level's color
    fn paint(&self) -> ColoredString {
        let label = format!("{:>5}", self.as_str());
        match self {
            LogLevel::Debug => label.as_str().cyan(),
            LogLevel::Info => label.as_str().green(),
            LogLevel::Warn => label.as_str().yellow(),
            LogLevel::Error => label.as_str().red(),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Console => "console",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(AppError::parse(format!(
                "Invalid log format: {} (expected console, json or compact)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub logger: String,
    pub message: String,
    pub fields: BTreeMap<String, Value>,
    pub location: Option<LogLocation>,
}

/// Source position of the `log_*!` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
}

/// Named logger with a level threshold and an output format
pub struct Logger {
    name: String,
    threshold: LogLevel,
    format: LogFormat,
    colored: bool,
    with_location: bool,
    session_id: Arc<RwLock<Option<String>>>,
}

impl Logger {
    /// `--debug` lowers the threshold to Debug and adds source locations,
    /// `--verbose` lowers it to Info, otherwise only warnings and above are
    /// emitted. An explicit log format wins over the console default.
    pub fn with_config(name: &str, config: &Config) -> Self {
        let threshold = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            name: name.to_string(),
            threshold,
            format: config.log_format.unwrap_or(LogFormat::Console),
            colored: config.enable_color,
            with_location: config.debug,
            session_id: Arc::new(RwLock::new(None)),
        }
    }

    /// Tag every later entry with `session_id`
    pub async fn set_session_id(&self, session_id: &str) {
        *self.session_id.write().await = Some(session_id.to_string());
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder {
            logger: self,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                logger: self.name.clone(),
                message: message.to_string(),
                fields: BTreeMap::new(),
                location: None,
            },
        }
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Format `entry`, `None` when it falls below the threshold
    async fn render(&self, mut entry: LogEntry) -> Option<String> {
        if entry.level < self.threshold {
            return None;
        }

        if let Some(session_id) = self.session_id.read().await.as_ref() {
            entry.fields.insert("session_id".to_string(), Value::String(session_id.clone()));
        }

        Some(match self.format {
            LogFormat::Console => self.console_line(&entry),
            LogFormat::Json => serde_json::to_string(&entry)
                .unwrap_or_else(|e| format!("{{\"error\":\"unserializable log entry: {}\"}}", e)),
            LogFormat::Compact => format!(
                "{} {} {}: {}",
                entry.timestamp.format("%H:%M:%S"),
                &entry.level.as_str()[..1],
                entry.logger,
                entry.message
            ),
        })
    }

    fn console_line(&self, entry: &LogEntry) -> String {
        let level = if self.colored {
            entry.level.paint().to_string()
        } else {
            format!("{:>5}", entry.level.as_str())
        };

        let mut line = format!(
            "{} {} [{}] {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            line.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.with_location {
            if let Some(location) = &entry.location {
                line.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        line
    }
}

/// Accumulates fields for one entry until [`log`](Self::log) writes it
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl LogEntryBuilder<'_> {
    /// Add a structured field; values that fail to serialize are skipped
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
        });
        self
    }

    /// Add the fields of one probe outcome
    pub fn outcome(self, outcome: &ProbeOutcome) -> Self {
        self.field("status", outcome.status.description())
            .field("elapsed_ms", outcome.elapsed_ms())
            .field("success", outcome.is_successful())
            .field("diagnostic", &outcome.diagnostic)
            .field("error", &outcome.error_message)
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    pub async fn log(self) {
        if let Some(line) = self.logger.render(self.entry).await {
            let _ = writeln!(io::stderr(), "{}", line);
        }
    }

    #[cfg(test)]
    async fn render(self) -> Option<String> {
        self.logger.render(self.entry).await
    }
}

/// Logger for resolution, probe and session events
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PROBE", config),
        }
    }

    pub async fn log_resolution(&self, raw: &str, target: &Target) {
        self.logger.debug(&format!("Resolved {} to {}", raw, target.address()))
            .field("input", raw)
            .field("protocol", target.protocol().as_str())
            .field("host", target.host())
            .field("port", target.port())
            .log()
            .await;
    }

    pub async fn log_session_start(&self, target: &Target, prober: &str) {
        self.logger.info(&format!("Probing {} with {} prober", target.address(), prober))
            .field("target", target.address())
            .field("prober", prober)
            .field("counter", target.counter())
            .field("interval", format_duration(target.interval()))
            .field("timeout", format_duration(target.timeout()))
            .log()
            .await;
    }

    /// Failed probes log at Info, successful ones at Debug
    pub async fn log_probe(&self, seq: u32, target: &Target, outcome: &ProbeOutcome) {
        let level = if outcome.is_successful() { LogLevel::Debug } else { LogLevel::Info };
        let message = format!("Probe {} to {}: {}", seq, target.address(), outcome.status.description());

        self.logger.log(level, &message)
            .field("seq", seq)
            .outcome(outcome)
            .log()
            .await;
    }

    pub async fn log_session_end(&self, result: &PingResult) {
        self.logger.info(&format!(
            "Session finished: {} responses, {} ok",
            result.counter(),
            result.success_counter()
        ))
            .field("counter", result.counter())
            .field("success_counter", result.success_counter())
            .field("failure_rate", result.failure_rate())
            .field("avg", format_duration(result.average()))
            .log()
            .await;
    }

    pub async fn log_error(&self, error: &AppError, context: Option<&str>) {
        let message = match context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.to_string(),
        };

        let mut builder = self.logger.error(&message).error_info(error);
        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }
        builder.log().await;
    }
}

/// Hands probe outcomes from the synchronous session callback to a task
/// that writes them through a [`ProbeLogger`]
pub struct ProbeLogForwarder {
    sender: mpsc::UnboundedSender<(u32, ProbeOutcome)>,
    task: JoinHandle<()>,
    undelivered: u32,
}

impl ProbeLogForwarder {
    pub fn spawn(logger: Arc<ProbeLogger>, target: Target) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<(u32, ProbeOutcome)>();
        let task = tokio::spawn(async move {
            while let Some((seq, outcome)) = receiver.recv().await {
                logger.log_probe(seq, &target, &outcome).await;
            }
        });

        Self {
            sender,
            task,
            undelivered: 0,
        }
    }

    pub fn send(&mut self, seq: u32, outcome: &ProbeOutcome) {
        if self.sender.send((seq, outcome.clone())).is_err() {
            self.undelivered += 1;
        }
    }

    /// Close the channel and wait until every queued outcome is written
    pub async fn finish(self) -> Result<()> {
        let Self { sender, task, undelivered } = self;
        drop(sender);

        task.await
            .map_err(|e| AppError::internal(format!("Probe log task failed: {}", e)))?;

        if undelivered > 0 {
            return Err(AppError::internal(format!(
                "{} probe outcomes were not logged",
                undelivered
            )));
        }
        Ok(())
    }
}

/// Creates loggers sharing one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name, &self.config);
        logger.set_session_id(&self.session_id).await;
        logger
    }

    pub async fn create_probe_logger(&self) -> ProbeLogger {
        let probe_logger = ProbeLogger::new(&self.config);
        probe_logger.logger.set_session_id(&self.session_id).await;
        probe_logger
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Log at Debug with the call site attached
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!())
            .log()
            .await
    };
}

/// Log at Error with the call site attached
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(&format!($($arg)*))
            .location(file!(), line!())
            .log()
            .await
    };
}
