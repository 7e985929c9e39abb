//! IO module: line input and JSON record output.

pub mod source;
pub mod sink;

pub use source::{open_source, BoxedSource, LineSource};
pub use sink::{open_sink, BoxedSink, RecordSink};
