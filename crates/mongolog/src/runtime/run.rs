//! Run: read lines, parse each one, write JSON records.

use std::time::Instant;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::conf::{ParseMode, ParserConfig};
use crate::io::{self, LineSource, RecordSink};
use crate::parser::detector::detect_format;
use crate::parser::metrics::{MetricErrorType, MetricsSnapshot, ParsingMetrics};
use crate::parser::{DocumentParser, InputFormat, LineParser, LogLineParser, ParseError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseError,
    },
}

/// Both parsers, built once per run from the configured limits.
pub struct Pipeline {
    mode: ParseMode,
    skip_failures: bool,
    log_line: LogLineParser,
    document: DocumentParser,
    metrics: ParsingMetrics,
}

impl Pipeline {
    pub fn new(config: &ParserConfig) -> Self {
        let limits = config.limits();
        Self {
            mode: config.mode,
            skip_failures: config.skip_failures,
            log_line: LogLineParser::with_limits(limits),
            document: DocumentParser::with_limits(limits),
            metrics: ParsingMetrics::new(),
        }
    }

    fn parser_for(&self, raw: &[u8]) -> &dyn LineParser {
        let format = match self.mode {
            ParseMode::LogLine => InputFormat::LogLine,
            ParseMode::Document => InputFormat::Document,
            ParseMode::Auto => detect_format(raw),
        };
        match format {
            InputFormat::LogLine => &self.log_line,
            InputFormat::Document => &self.document,
        }
    }

    /// Drain `source` into `sink`. Blank lines are skipped without being
    /// counted; a failing line either aborts the run or is logged and
    /// skipped, depending on `skip_failures`.
    pub async fn process<R, W>(
        &self,
        source: &mut LineSource<R>,
        sink: &mut RecordSink<W>,
    ) -> Result<(), RunError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(raw) = source.next_line().await? {
            if raw.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            self.metrics.record_line();
            let line = source.line_number();

            let parser = self.parser_for(&raw);
            let started = Instant::now();
            match parser.parse(&raw) {
                Ok(record) => {
                    let elapsed = started.elapsed().as_nanos() as u64;
                    self.metrics.record_parse(record.format, elapsed);
                    sink.write_record(&record).await?;
                }
                Err(err) => {
                    self.metrics.record_error(MetricErrorType::from(&err));
                    if !self.skip_failures {
                        return Err(RunError::Parse { line, source: err });
                    }
                    if err.is_internal() {
                        warn!(line = line, format = parser.format().as_str(), "Parser defect: {}", err);
                    } else {
                        warn!(line = line, format = parser.format().as_str(), "Skipping line: {}", err);
                    }
                }
            }
        }
        sink.flush().await?;
        debug!("Wrote {} records", sink.written());
        Ok(())
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Open the configured input and output and run the pipeline over them.
pub async fn run(config: &ParserConfig) -> Result<MetricsSnapshot, RunError> {
    let mut source = io::open_source(config.input.as_deref()).await?;
    let mut sink = io::open_sink(config.output.as_deref(), config.pretty).await?;

    info!("Parsing input (mode: {})", config.mode);
    let pipeline = Pipeline::new(config);
    let outcome = pipeline.process(&mut source, &mut sink).await;
    // records written before an aborting line still reach the output
    sink.flush().await?;

    let snapshot = pipeline.metrics();
    info!(
        "Parsed {} of {} lines ({} failed, {:.2} us/line)",
        snapshot.total_parsed, snapshot.lines_seen, snapshot.total_errors, snapshot.avg_parse_time_us
    );
    outcome.map(|()| snapshot)
}
