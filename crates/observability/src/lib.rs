//! Tracing/logging setup shared by satchel binaries.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    tracing::init(format);
}

/// Output format for log lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line (machine-readable).
    #[default]
    Json,
    /// Human-readable single-line output.
    Compact,
}

/// Tracing configuration (filters, layers).
pub mod tracing;
