use std::io;
use std::path::Path;

use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::parser::extjson::to_json_string;
use crate::parser::ParsedLine;

/// Writes parsed records as extended JSON, one record per line.
pub struct RecordSink<W> {
    writer: W,
    pretty: bool,
    written: u64,
}

pub type BoxedSink = RecordSink<Box<dyn AsyncWrite + Unpin + Send>>;

impl<W: AsyncWrite + Unpin> RecordSink<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self { writer, pretty, written: 0 }
    }

    pub async fn write_record(&mut self, record: &ParsedLine) -> io::Result<()> {
        let mut text = to_json_string(&record.value, self.pretty)?;
        text.push('\n');
        self.writer.write_all(text.as_bytes()).await?;
        self.written += 1;
        Ok(())
    }

    pub async fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// `None` or `-` writes stdout; anything else creates (truncates) the file.
pub async fn open_sink(path: Option<&Path>, pretty: bool) -> io::Result<BoxedSink> {
    let writer: Box<dyn AsyncWrite + Unpin + Send> = match path {
        None => Box::new(BufWriter::new(tokio::io::stdout())),
        Some(p) if p == Path::new("-") => Box::new(BufWriter::new(tokio::io::stdout())),
        Some(p) => {
            let file = tokio::fs::File::create(p).await.map_err(|e| {
                tracing::error!("Failed to create output {}: {}", p.display(), e);
                e
            })?;
            tracing::debug!("Writing to {}", p.display());
            Box::new(BufWriter::new(file))
        }
    };
    Ok(RecordSink::new(writer, pretty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_document, InputFormat};

    #[tokio::test]
    async fn test_write_record_one_per_line() {
        let mut sink = RecordSink::new(Vec::new(), false);
        for text in ["{ a: 1 }", "{ _id: ObjectId(\"54e792daf1845f045f4c000e\") }"] {
            let record = ParsedLine::new(InputFormat::Document, parse_document(text).unwrap());
            sink.write_record(&record).await.unwrap();
        }
        sink.flush().await.unwrap();
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "{\"a\":1}\n{\"_id\":{\"$oid\":\"54e792daf1845f045f4c000e\"}}\n"
        );
    }

    #[tokio::test]
    async fn test_open_sink_writes_file() {
        let path = std::env::temp_dir().join(format!("mongolog-sink-{}.jsonl", std::process::id()));
        let mut sink = open_sink(Some(&path), false).await.unwrap();
        let record = ParsedLine::new(InputFormat::Document, parse_document("[ MinKey ]").unwrap());
        sink.write_record(&record).await.unwrap();
        sink.flush().await.unwrap();
        drop(sink);

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.ok();
        assert_eq!(contents, "[{\"$minKey\":1}]\n");
    }
}
