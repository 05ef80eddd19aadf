//! JSON report serialization

use super::AuditReport;

/// Serialize a report as pretty-printed JSON
pub fn to_json(report: &AuditReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written by [`to_json`]
pub fn from_json(json: &str) -> Result<AuditReport, serde_json::Error> {
    serde_json::from_str(json)
}
