//! Structured JSON-line logger
//!
//! - One line per event
//! - `event` first, then `severity`, then remaining keys sorted
//! - Written to stderr; a library never owns stdout
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug = 0,
    Info = 1,
    /// Non-fatal findings, such as extra fields
    Warn = 2,
    Error = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Logger;

impl Logger {
    /// Logs an event to stderr.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        // Logging never fails the caller
        let _ = Self::write_line(&mut io::stderr().lock(), severity, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Writes one formatted line to `writer` in a single call.
    pub fn write_line<W: Write>(
        writer: &mut W,
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
    ) -> io::Result<()> {
        let line = Self::format_line(severity, event, fields);
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }

    /// Formats an event as a JSON object followed by a newline.
    pub fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":");
        push_json_str(&mut line, event);
        line.push_str(",\"severity\":");
        push_json_str(&mut line, severity.as_str());
        for (key, value) in sorted {
            line.push(',');
            push_json_str(&mut line, key);
            line.push(':');
            push_json_str(&mut line, value);
        }
        line.push_str("}\n");
        line
    }
}

fn push_json_str(out: &mut String, s: &str) {
    // Serializing a &str cannot fail
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => out.push_str("\"\""),
    }
}
