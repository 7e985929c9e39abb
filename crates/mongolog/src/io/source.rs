use std::io;
use std::path::Path;

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Line-at-a-time reader over any buffered async input.
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: u64,
}

pub type BoxedSource = LineSource<Box<dyn AsyncBufRead + Unpin + Send>>;

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(4096),
            line_number: 0,
        }
    }

    /// Next line without its `\n` / `\r\n` terminator, or `None` at EOF.
    /// Bytes are passed through unchecked; UTF-8 is validated by the parser.
    pub async fn next_line(&mut self) -> io::Result<Option<Bytes>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(Bytes::copy_from_slice(&self.buf)))
    }

    /// 1-based number of the line last returned.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

/// `None` or `-` reads stdin; anything else opens the file.
pub async fn open_source(path: Option<&Path>) -> io::Result<BoxedSource> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match path {
        None => Box::new(BufReader::new(tokio::io::stdin())),
        Some(p) if p == Path::new("-") => Box::new(BufReader::new(tokio::io::stdin())),
        Some(p) => {
            let file = tokio::fs::File::open(p).await.map_err(|e| {
                tracing::error!("Failed to open input {}: {}", p.display(), e);
                e
            })?;
            tracing::debug!("Reading from {}", p.display());
            Box::new(BufReader::new(file))
        }
    };
    Ok(LineSource::new(reader))
}
