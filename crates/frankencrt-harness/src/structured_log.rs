//! Structured logging for conformance runs.
//!
//! Provides:
//! - [`LogEntry`]: one JSONL record with required + optional fields.
//! - [`ArtifactIndex`]: links a run's log and reports with SHA-256 digests.
//! - [`LogEmitter`]: writes JSONL lines to a file or an in-memory buffer.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.
//! - [`validate_log_file`]: validates an entire JSONL file.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Group or check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skip,
}

impl Outcome {
    #[must_use]
    pub const fn from_failed(failed: u64) -> Self {
        if failed == 0 { Self::Pass } else { Self::Fail }
    }

    /// A group that checked nothing but skipped something is a skip, not a
    /// pass.
    #[must_use]
    pub const fn for_group(attempted: u64, failed: u64, skipped: u64) -> Self {
        if failed > 0 {
            Self::Fail
        } else if attempted == 0 && skipped > 0 {
            Self::Skip
        } else {
            Self::Pass
        }
    }
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Test group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Function under test, when the event concerns one call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Diagnostic context label active when the event was raised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// `file:line` of the check site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// NaN-sign policy in force (`ignore` or `enforce`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nan_preservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempted: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<u64>,
    /// Atomic scripts cut short.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_refs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            run_id: None,
            group: None,
            symbol: None,
            context: None,
            location: None,
            nan_preservation: None,
            outcome: None,
            attempted: None,
            failed: None,
            skipped: None,
            duration_ms: None,
            artifact_refs: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_run(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the diagnostic context. An empty label is left out.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = (!context.is_empty()).then_some(context);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_nan_preservation(mut self, policy: impl Into<String>) -> Self {
        self.nan_preservation = Some(policy.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Set the attempted/failed counts.
    #[must_use]
    pub fn with_counts(mut self, attempted: u64, failed: u64) -> Self {
        self.attempted = Some(attempted);
        self.failed = Some(failed);
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn with_skipped(mut self, skipped: u64) -> Self {
        self.skipped = Some(skipped);
        self
    }

    #[must_use]
    pub fn with_artifacts(mut self, refs: Vec<String>) -> Self {
        self.artifact_refs = Some(refs);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Artifact index
// ---------------------------------------------------------------------------

/// A single artifact entry in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Artifact index linking a run's log to its reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub index_version: u32,
    pub run_id: String,
    pub generated_utc: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            index_version: 1,
            run_id: run_id.into(),
            generated_utc: now_utc(),
            artifacts: Vec::new(),
        }
    }

    /// Add an entry with a precomputed digest.
    pub fn add(
        &mut self,
        path: impl Into<String>,
        kind: impl Into<String>,
        sha256: impl Into<String>,
    ) -> &mut Self {
        self.artifacts.push(ArtifactEntry {
            path: path.into(),
            kind: kind.into(),
            sha256: sha256.into(),
            size_bytes: None,
        });
        self
    }

    /// Hash the file at `path` and add it.
    pub fn add_file(&mut self, path: &Path, kind: impl Into<String>) -> std::io::Result<&mut Self> {
        let bytes = std::fs::read(path)?;
        self.artifacts.push(ArtifactEntry {
            path: path.display().to_string(),
            kind: kind.into(),
            sha256: sha256_hex(&bytes),
            size_bytes: Some(bytes.len() as u64),
        });
        Ok(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

/// Writes structured JSONL log entries to a file or buffer.
pub struct LogEmitter {
    writer: Box<dyn Write>,
    seq: u64,
    run_id: String,
}

impl std::fmt::Debug for LogEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEmitter")
            .field("seq", &self.seq)
            .field("run_id", &self.run_id)
            .finish_non_exhaustive()
    }
}

impl LogEmitter {
    /// Create an emitter that writes to a file.
    pub fn to_file(path: &Path, run_id: &str) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::to_writer(Box::new(std::io::BufWriter::new(file)), run_id))
    }

    /// Create an emitter that discards its output (for testing).
    #[must_use]
    pub fn to_buffer(run_id: &str) -> Self {
        Self::to_writer(Box::new(Vec::new()), run_id)
    }

    #[must_use]
    pub fn to_writer(writer: Box<dyn Write>, run_id: &str) -> Self {
        Self {
            writer,
            seq: 0,
            run_id: run_id.to_string(),
        }
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("frankencrt::{}::{:03}", self.run_id, self.seq)
    }

    /// Emit a bare entry with auto-generated trace_id and run_id.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        let trace_id = self.next_trace_id();
        let entry = LogEntry::new(&trace_id, level, event).with_run(&self.run_id);
        let line = serde_json::to_string(&entry).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{line}")?;
        Ok(entry)
    }

    /// Emit a populated entry, filling in trace_id and run_id when absent.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        if entry.run_id.is_none() {
            entry.run_id = Some(self.run_id.clone());
        }
        let line = serde_json::to_string(&entry).map_err(std::io::Error::other)?;
        writeln!(self.writer, "{line}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

fn check_enum(
    obj: &serde_json::Map<String, serde_json::Value>,
    field: &str,
    allowed: &[&str],
    line_number: usize,
    errors: &mut Vec<LogValidationError>,
) {
    if let Some(value) = obj.get(field).and_then(|v| v.as_str()) {
        if !allowed.contains(&value) {
            errors.push(LogValidationError {
                line_number,
                field: field.to_string(),
                message: format!("invalid {field}: '{value}'"),
            });
        }
    }
}

/// Validate a single JSONL line against the schema.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let mut errors = Vec::new();

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            errors.push(LogValidationError {
                line_number,
                field: "<json>".to_string(),
                message: format!("invalid JSON: {e}"),
            });
            return Err(errors);
        }
    };

    let Some(obj) = value.as_object() else {
        errors.push(LogValidationError {
            line_number,
            field: "<root>".to_string(),
            message: "expected JSON object".to_string(),
        });
        return Err(errors);
    };

    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(LogValidationError {
                line_number,
                field: field.to_string(),
                message: "required field missing".to_string(),
            });
        }
    }

    check_enum(obj, "level", &["trace", "debug", "info", "warn", "error"], line_number, &mut errors);
    check_enum(obj, "outcome", &["pass", "fail", "skip"], line_number, &mut errors);
    check_enum(obj, "nan_preservation", &["ignore", "enforce"], line_number, &mut errors);

    // Counts must be consistent when both are present.
    if let (Some(attempted), Some(failed)) = (
        obj.get("attempted").and_then(serde_json::Value::as_u64),
        obj.get("failed").and_then(serde_json::Value::as_u64),
    ) {
        if failed > attempted {
            errors.push(LogValidationError {
                line_number,
                field: "failed".to_string(),
                message: format!("failed ({failed}) exceeds attempted ({attempted})"),
            });
        }
    }

    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str()) {
        if !trace_id.contains("::") {
            errors.push(LogValidationError {
                line_number,
                field: "trace_id".to_string(),
                message: format!(
                    "trace_id should follow frankencrt::<run_id>::<seq> format, got: '{trace_id}'"
                ),
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value::<LogEntry>(value).map_err(|e| {
        vec![LogValidationError {
            line_number,
            field: "<deserialization>".to_string(),
            message: format!("failed to deserialize: {e}"),
        }]
    })
}

/// Validate an entire JSONL file.
///
/// Returns the non-blank line count and any validation errors found.
pub fn validate_log_file(path: &Path) -> Result<(usize, Vec<LogValidationError>), std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    let mut all_errors = Vec::new();
    let mut line_count = 0;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        line_count += 1;
        if let Err(errs) = validate_log_line(line, i + 1) {
            all_errors.extend(errs);
        }
    }

    Ok((line_count, all_errors))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// RFC 3339 UTC timestamp with millisecond precision.
#[must_use]
pub fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(duration.as_secs(), duration.subsec_millis())
}

/// Civil date from days since 1970-01-01 (proleptic Gregorian).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

fn format_utc(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        (secs % 86_400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_serializes_required_fields() {
        let entry = LogEntry::new("frankencrt::run-1::001", LogLevel::Info, "group_start");
        let json = entry.to_jsonl().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["trace_id"], "frankencrt::run-1::001");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "group_start");
        assert!(parsed.get("group").is_none());
        assert!(parsed.get("outcome").is_none());
    }

    #[test]
    fn log_entry_with_optional_fields() {
        let entry = LogEntry::new("frankencrt::run-1::002", LogLevel::Error, "check_failed")
            .with_group("math_pow")
            .with_symbol("pow")
            .with_context("FE_UPWARD ")
            .with_location("groups/math_pow.rs:40")
            .with_nan_preservation("enforce")
            .with_outcome(Outcome::Fail)
            .with_counts(10, 1)
            .with_duration_ms(2)
            .with_artifacts(vec!["target/report.json".to_string()])
            .with_details(serde_json::json!({"kind": "value_mismatch"}));

        let parsed: serde_json::Value = serde_json::from_str(&entry.to_jsonl().unwrap()).unwrap();
        assert_eq!(parsed["group"], "math_pow");
        assert_eq!(parsed["symbol"], "pow");
        assert_eq!(parsed["context"], "FE_UPWARD ");
        assert_eq!(parsed["nan_preservation"], "enforce");
        assert_eq!(parsed["outcome"], "fail");
        assert_eq!(parsed["attempted"], 10);
        assert_eq!(parsed["failed"], 1);
        assert!(parsed["artifact_refs"].is_array());
        assert_eq!(parsed["details"]["kind"], "value_mismatch");
    }

    #[test]
    fn empty_context_is_omitted() {
        let entry = LogEntry::new("frankencrt::r::001", LogLevel::Info, "x").with_context("");
        assert!(entry.context.is_none());
    }

    #[test]
    fn validate_valid_line() {
        let json = LogEntry::new("frankencrt::run-1::001", LogLevel::Info, "run_start")
            .to_jsonl()
            .unwrap();
        let result = validate_log_line(&json, 1);
        assert!(result.is_ok(), "valid line should pass: {result:?}");
    }

    #[test]
    fn validate_missing_required_field() {
        let json = r#"{"timestamp":"2026-01-01T00:00:00Z","level":"info","event":"test"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "trace_id"));
    }

    #[test]
    fn validate_invalid_enums() {
        let json = r#"{"timestamp":"t","trace_id":"a::b::c","level":"critical","event":"e","outcome":"maybe"}"#;
        let errors = validate_log_line(json, 3).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "level"));
        assert!(errors.iter().any(|e| e.field == "outcome"));
        assert!(errors.iter().all(|e| e.line_number == 3));
    }

    #[test]
    fn validate_inconsistent_counts() {
        let json = r#"{"timestamp":"t","trace_id":"a::b::c","level":"info","event":"group_end","attempted":1,"failed":2}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert_eq!(errors[0].field, "failed");
    }

    #[test]
    fn validate_invalid_json_and_trace_id() {
        let errors = validate_log_line("not json at all", 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "<json>"));
        let json = r#"{"timestamp":"t","trace_id":"no-separator","level":"info","event":"e"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "trace_id"));
    }

    #[test]
    fn artifact_index_serializes() {
        let mut idx = ArtifactIndex::new("run-001");
        idx.add("target/run.log.jsonl", "log", sha256_hex(b""));
        let parsed: serde_json::Value = serde_json::from_str(&idx.to_json().unwrap()).unwrap();
        assert_eq!(parsed["index_version"], 1);
        assert_eq!(parsed["run_id"], "run-001");
        assert_eq!(
            parsed["artifacts"][0]["sha256"],
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn emitter_generates_sequential_trace_ids() {
        let mut emitter = LogEmitter::to_buffer("run-42");
        let e1 = emitter.emit(LogLevel::Info, "start").unwrap();
        let e2 = emitter.emit(LogLevel::Info, "end").unwrap();
        assert_eq!(e1.trace_id, "frankencrt::run-42::001");
        assert_eq!(e2.trace_id, "frankencrt::run-42::002");
        assert_eq!(e1.run_id.as_deref(), Some("run-42"));
    }

    #[test]
    fn utc_formatting_handles_leap_years() {
        assert_eq!(format_utc(0, 0), "1970-01-01T00:00:00.000Z");
        // 2024-02-29T12:34:56Z
        assert_eq!(format_utc(1_709_210_096, 7), "2024-02-29T12:34:56.007Z");
        assert_eq!(format_utc(951_782_400, 0), "2000-02-29T00:00:00.000Z");
    }
}
