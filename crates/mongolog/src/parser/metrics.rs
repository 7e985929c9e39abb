use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use super::model::{InputFormat, ParseError};

/// Error categories for metrics recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricErrorType {
    /// Input did not match the grammar
    Grammar,
    /// Nesting guard tripped
    TooDeep,
    /// Line exceeded the configured size limit
    TooLarge,
    /// Non-UTF8 content encountered
    NonUtf8,
    /// Parser defect (stack underflow, missing value, wrong root)
    Internal,
}

impl From<&ParseError> for MetricErrorType {
    fn from(err: &ParseError) -> Self {
        match err {
            ParseError::GrammarMismatch { .. } => MetricErrorType::Grammar,
            ParseError::TooDeep { .. } => MetricErrorType::TooDeep,
            ParseError::LineTooLarge(..) => MetricErrorType::TooLarge,
            ParseError::NonUtf8 => MetricErrorType::NonUtf8,
            ParseError::IncompleteValue
            | ParseError::UnexpectedRootType { .. }
            | ParseError::StackUnderflow { .. } => MetricErrorType::Internal,
        }
    }
}

/// Forces the wrapped group onto its own 64-byte cache line so counters
/// updated from different threads do not share a line.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Per-format success counters (updated per line)
#[derive(Debug, Default)]
pub struct FormatMetrics {
    pub log_line: AtomicU64,
    pub document: AtomicU64,
}

#[derive(Debug, Default)]
pub struct TotalMetrics {
    pub lines_seen: AtomicU64,
    pub time_nanos: AtomicU64,
    pub count: AtomicU64,
}

/// Error counters by type
#[derive(Debug, Default)]
pub struct ErrorMetrics {
    pub grammar: AtomicU64,
    pub too_deep: AtomicU64,
    pub too_large: AtomicU64,
    pub non_utf8: AtomicU64,
    pub internal: AtomicU64,
}

/// Counters for a parsing run.
///
/// Groups are cache-aligned and every update uses `Ordering::Relaxed`;
/// `snapshot()` reads each counter independently, so totals may be
/// momentarily out of step with each other while a run is in progress.
#[derive(Debug, Default)]
pub struct ParsingMetrics {
    pub formats: CacheAligned<FormatMetrics>,
    pub totals: CacheAligned<TotalMetrics>,
    pub errors: CacheAligned<ErrorMetrics>,
}

impl ParsingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one non-blank input line, whatever its outcome.
    #[inline]
    pub fn record_line(&self) {
        self.totals.0.lines_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful parse
    #[inline]
    pub fn record_parse(&self, format: InputFormat, time_nanos: u64) {
        self.totals.0.count.fetch_add(1, Ordering::Relaxed);
        self.totals.0.time_nanos.fetch_add(time_nanos, Ordering::Relaxed);

        match format {
            InputFormat::LogLine => self.formats.0.log_line.fetch_add(1, Ordering::Relaxed),
            InputFormat::Document => self.formats.0.document.fetch_add(1, Ordering::Relaxed),
        };
    }

    #[inline]
    pub fn record_error(&self, error_type: MetricErrorType) {
        let counter = match error_type {
            MetricErrorType::Grammar => &self.errors.0.grammar,
            MetricErrorType::TooDeep => &self.errors.0.too_deep,
            MetricErrorType::TooLarge => &self.errors.0.too_large,
            MetricErrorType::NonUtf8 => &self.errors.0.non_utf8,
            MetricErrorType::Internal => &self.errors.0.internal,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_parsed = self.totals.0.count.load(Ordering::Relaxed);
        let total_time_ns = self.totals.0.time_nanos.load(Ordering::Relaxed);

        let grammar_errors = self.errors.0.grammar.load(Ordering::Relaxed);
        let too_deep = self.errors.0.too_deep.load(Ordering::Relaxed);
        let lines_too_large = self.errors.0.too_large.load(Ordering::Relaxed);
        let non_utf8_content = self.errors.0.non_utf8.load(Ordering::Relaxed);
        let internal_errors = self.errors.0.internal.load(Ordering::Relaxed);
        let total_errors =
            grammar_errors + too_deep + lines_too_large + non_utf8_content + internal_errors;

        let total_attempts = total_parsed + total_errors;

        MetricsSnapshot {
            lines_seen: self.totals.0.lines_seen.load(Ordering::Relaxed),
            log_lines_parsed: self.formats.0.log_line.load(Ordering::Relaxed),
            documents_parsed: self.formats.0.document.load(Ordering::Relaxed),

            total_parsed,
            avg_parse_time_us: if total_parsed > 0 {
                (total_time_ns as f64 / total_parsed as f64) / 1000.0
            } else {
                0.0
            },

            grammar_errors,
            too_deep,
            lines_too_large,
            non_utf8_content,
            internal_errors,
            total_errors,
            success_rate: if total_attempts > 0 {
                total_parsed as f64 / total_attempts as f64
            } else {
                1.0
            },
        }
    }
}

/// A read-only, serializable copy of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub lines_seen: u64,
    pub log_lines_parsed: u64,
    pub documents_parsed: u64,

    pub total_parsed: u64,
    pub avg_parse_time_us: f64,

    pub grammar_errors: u64,
    pub too_deep: u64,
    pub lines_too_large: u64,
    pub non_utf8_content: u64,
    pub internal_errors: u64,
    pub total_errors: u64,
    pub success_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_empty() {
        let metrics = ParsingMetrics::new();
        let snap = metrics.snapshot();

        assert_eq!(snap.total_parsed, 0);
        assert_eq!(snap.total_errors, 0);
        assert_eq!(snap.avg_parse_time_us, 0.0);
        assert_eq!(snap.success_rate, 1.0);
    }

    #[test]
    fn test_record_parse_counts_and_times() {
        let metrics = ParsingMetrics::new();

        metrics.record_parse(InputFormat::LogLine, 1000);
        metrics.record_parse(InputFormat::Document, 2000);

        let snap = metrics.snapshot();
        assert_eq!(snap.total_parsed, 2);
        assert_eq!(snap.log_lines_parsed, 1);
        assert_eq!(snap.documents_parsed, 1);

        // 3000ns over 2 parses = 1.5us
        assert!((snap.avg_parse_time_us - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_recording_and_success_rate() {
        let metrics = ParsingMetrics::new();
        for _ in 0..4 {
            metrics.record_line();
        }

        metrics.record_parse(InputFormat::LogLine, 100);
        metrics.record_parse(InputFormat::LogLine, 100);
        metrics.record_error(MetricErrorType::Grammar);
        metrics.record_error(MetricErrorType::NonUtf8);

        let snap = metrics.snapshot();
        assert_eq!(snap.lines_seen, 4);
        assert_eq!(snap.grammar_errors, 1);
        assert_eq!(snap.non_utf8_content, 1);
        assert_eq!(snap.total_errors, 2);
        assert_eq!(snap.success_rate, 0.5);
    }

    #[test]
    fn test_error_classification() {
        let mismatch = ParseError::GrammarMismatch { offset: 0, line: 1, column: 1, rule: "value" };
        assert_eq!(MetricErrorType::from(&mismatch), MetricErrorType::Grammar);
        assert_eq!(
            MetricErrorType::from(&ParseError::TooDeep { depth: 3, max: 2 }),
            MetricErrorType::TooDeep
        );
        assert_eq!(
            MetricErrorType::from(&ParseError::LineTooLarge(10, 5)),
            MetricErrorType::TooLarge
        );
        assert_eq!(
            MetricErrorType::from(&ParseError::StackUnderflow { stack: "values" }),
            MetricErrorType::Internal
        );
    }
}
