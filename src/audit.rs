/// Audit logging for firewall-mutating operations
///
/// This module provides structured logging of privileged operations:
/// block and unblock runs, plus wholesale watch-list replacements.
use crate::core::pipeline::RunSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Types of auditable events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    BlockRun,
    UnblockRun,
    ImportList,
    ExportList,
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Type of event
    pub event_type: EventType,

    /// Whether the operation succeeded
    pub success: bool,

    /// Additional structured data about the event
    pub details: serde_json::Value,

    /// Error message if operation failed
    pub error: Option<String>,
}

impl AuditEvent {
    /// Creates a new audit event
    pub fn new(
        event_type: EventType,
        success: bool,
        details: serde_json::Value,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            event_type,
            success,
            details,
            error,
        }
    }
}

/// Audit log writer
pub struct AuditLog {
    log_path: PathBuf,
}

impl AuditLog {
    /// Creates a new audit log instance
    ///
    /// # Errors
    ///
    /// Returns `Err` if state directory cannot be determined
    pub fn new() -> std::io::Result<Self> {
        let mut log_path = crate::utils::get_state_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "State directory not found")
        })?;
        log_path.push("audit.log");

        Ok(Self { log_path })
    }

    /// Appends an event to the audit log
    ///
    /// Events are written as JSON-lines format (one JSON object per line)
    ///
    /// # Errors
    ///
    /// Returns `Err` if file cannot be opened or written
    pub async fn log(&self, event: AuditEvent) -> std::io::Result<()> {
        let json = serde_json::to_string(&event)?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.sync_all().await?;

        Ok(())
    }

    /// Reads the most recent events from the log
    ///
    /// # Arguments
    ///
    /// * `count` - Maximum number of events to return
    ///
    /// # Errors
    ///
    /// Returns `Err` if file cannot be read
    pub async fn read_recent(&self, count: usize) -> std::io::Result<Vec<AuditEvent>> {
        let content = tokio::fs::read_to_string(&self.log_path).await?;

        let events: Vec<AuditEvent> = content
            .lines()
            .rev()
            .take(count)
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        Ok(events)
    }

    /// Returns the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

/// Logs a completed block or unblock run
pub async fn log_run(summary: &RunSummary) {
    if let Ok(audit) = AuditLog::new() {
        let event_type = match summary.direction {
            crate::core::firewall::Direction::Block => EventType::BlockRun,
            crate::core::firewall::Direction::Unblock => EventType::UnblockRun,
        };
        let success = summary.failures.is_empty() && !summary.cancelled;
        let error = if summary.failures.is_empty() {
            None
        } else {
            Some(format!("{} file(s) failed", summary.failures.len()))
        };

        let event = AuditEvent::new(
            event_type,
            success,
            serde_json::json!({
                "run_id": summary.id,
                "total": summary.total,
                "succeeded": summary.succeeded,
                "failed": summary.failures.len(),
                "skipped_roots": summary.skipped_roots.len(),
                "cancelled": summary.cancelled,
            }),
            error,
        );

        if let Err(e) = audit.log(event).await {
            tracing::warn!("Failed to write audit log: {}", e);
        }
    }
}

/// Logs a watch-list import
pub async fn log_import(path_count: usize, success: bool, error: Option<String>) {
    if let Ok(audit) = AuditLog::new() {
        let event = AuditEvent::new(
            EventType::ImportList,
            success,
            serde_json::json!({
                "path_count": path_count,
            }),
            error,
        );

        if let Err(e) = audit.log(event).await {
            tracing::warn!("Failed to write audit log: {}", e);
        }
    }
}

/// Logs a watch-list export
pub async fn log_export(path_count: usize, success: bool, error: Option<String>) {
    if let Ok(audit) = AuditLog::new() {
        let event = AuditEvent::new(
            EventType::ExportList,
            success,
            serde_json::json!({
                "path_count": path_count,
            }),
            error,
        );

        if let Err(e) = audit.log(event).await {
            tracing::warn!("Failed to write audit log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_audit_event_creation() {
        let event = AuditEvent::new(
            EventType::BlockRun,
            true,
            serde_json::json!({"total": 5}),
            None,
        );

        assert!(event.success);
        assert!(event.error.is_none());
        assert_eq!(event.details["total"], 5);
    }

    #[test]
    fn test_event_serialization() {
        let event = AuditEvent::new(
            EventType::ImportList,
            false,
            serde_json::json!({"path_count": 2}),
            Some("malformed document".to_string()),
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("import_list"));
        assert!(json.contains("malformed document"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"timestamp":"2024-01-01T00:00:00Z","event_type":"block_run","success":true,"details":{},"error":null}"#;
        let event: AuditEvent = serde_json::from_str(json).unwrap();

        assert!(event.success);
        assert!(matches!(event.event_type, EventType::BlockRun));
    }
}
