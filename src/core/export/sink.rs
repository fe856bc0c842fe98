//! Record sink
//!
//! Destination for exported lines. The first line of an export is the index
//! definition; every following line is one hit.

use crate::domain::ExportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Output buffer size
const WRITE_BUFFER_BYTES: usize = 1024 * 1024;

/// Line-oriented output for the export pipeline
#[async_trait]
pub trait RecordSink: Send {
    /// Write `line` followed by a newline
    async fn write_record(&mut self, line: &str) -> Result<(), ExportError>;

    /// Push buffered lines to the underlying output
    async fn flush(&mut self) -> Result<(), ExportError>;

    /// Lines, newline included, that have fully reached the underlying output
    ///
    /// Lines still held in a buffer are not counted.
    fn committed(&self) -> usize;
}

/// Writer that counts the bytes its inner writer has accepted
struct CountingWriter<W> {
    inner: W,
    accepted: u64,
}

impl<W: AsyncWrite + Unpin> AsyncWrite for CountingWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = &polled {
            this.accepted += *n as u64;
        }
        polled
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Newline-delimited JSON writer over any async output
///
/// Tracks the byte offset where each submitted line ends, so that after a
/// write error it can tell how many lines the output really holds.
pub struct JsonLinesSink<W> {
    writer: BufWriter<CountingWriter<W>>,
    submitted: u64,
    line_ends: VecDeque<u64>,
    committed: usize,
    failed: bool,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    /// Wrap an async writer
    pub fn new(writer: W) -> Self {
        let counting = CountingWriter {
            inner: writer,
            accepted: 0,
        };
        Self {
            writer: BufWriter::with_capacity(WRITE_BUFFER_BYTES, counting),
            submitted: 0,
            line_ends: VecDeque::new(),
            committed: 0,
            failed: false,
        }
    }

    /// Consume the sink and return the inner writer
    ///
    /// Unflushed data is discarded; call [`RecordSink::flush`] first.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().inner
    }

    fn accepted(&self) -> u64 {
        self.writer.get_ref().accepted
    }

    /// Move lines whose last byte has been accepted into the committed count
    fn settle(&mut self) {
        let accepted = self.accepted();
        while self.line_ends.front().is_some_and(|end| *end <= accepted) {
            self.line_ends.pop_front();
            self.committed += 1;
        }
    }

    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await
    }
}

impl JsonLinesSink<tokio::io::Stdout> {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl JsonLinesSink<File> {
    /// Sink writing to `path`, created or truncated
    ///
    /// # Errors
    ///
    /// Returns `SinkWriteFailed` if the file cannot be created.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let file = File::create(path).await.map_err(|e| {
            ExportError::SinkWriteFailed(format!("cannot create {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Writing export to file");
        Ok(Self::new(file))
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RecordSink for JsonLinesSink<W> {
    async fn write_record(&mut self, line: &str) -> Result<(), ExportError> {
        // A failed write may leave a partial line buffered; nothing may follow it
        if self.failed {
            return Err(ExportError::SinkWriteFailed(
                "output failed on an earlier write".to_string(),
            ));
        }

        let written = self.write_line(line).await;
        self.settle();
        match written {
            Ok(()) => {
                self.submitted += line.len() as u64 + 1;
                self.line_ends.push_back(self.submitted);
                self.settle();
                Ok(())
            }
            Err(e) => {
                self.failed = true;
                Err(ExportError::SinkWriteFailed(e.to_string()))
            }
        }
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        let flushed = self.writer.flush().await;
        self.settle();
        flushed.map_err(|e| ExportError::SinkWriteFailed(format!("flush failed: {e}")))
    }

    fn committed(&self) -> usize {
        let accepted = self.accepted();
        self.committed + self.line_ends.iter().take_while(|end| **end <= accepted).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lines_are_newline_terminated() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_record(r#"{"mappings":{}}"#).await.unwrap();
        sink.write_record(r#"{"_id":"1"}"#).await.unwrap();
        sink.flush().await.unwrap();

        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "{\"mappings\":{}}\n{\"_id\":\"1\"}\n");
    }

    /// Output that takes `limit` bytes and then fails every write
    struct LimitedWriter {
        written: Vec<u8>,
        limit: usize,
    }

    impl AsyncWrite for LimitedWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            let room = this.limit - this.written.len();
            if room == 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::Other,
                    "No space left on device",
                )));
            }
            let n = room.min(buf.len());
            this.written.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_committed_counts_flushed_lines_only() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_record("{}").await.unwrap();
        sink.write_record("{}").await.unwrap();
        assert_eq!(sink.committed(), 0);

        sink.flush().await.unwrap();
        assert_eq!(sink.committed(), 2);
    }

    #[tokio::test]
    async fn test_committed_after_output_fills_up() {
        let line = "x".repeat(99);
        let lines = WRITE_BUFFER_BYTES * 3 / 100;
        let mut sink = JsonLinesSink::new(LimitedWriter {
            written: Vec::new(),
            limit: WRITE_BUFFER_BYTES + WRITE_BUFFER_BYTES / 2 + 7,
        });

        let mut accepted = 0;
        let mut error = None;
        for _ in 0..lines {
            match sink.write_record(&line).await {
                Ok(()) => accepted += 1,
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }
        assert!(matches!(error, Some(ExportError::SinkWriteFailed(_))));
        assert!(sink.flush().await.is_err());
        assert!(sink.write_record(&line).await.is_err());

        let committed = sink.committed();
        let output = sink.into_inner().written;
        let complete = output.iter().filter(|b| **b == b'\n').count();
        assert_eq!(committed, complete);
        assert!(committed < accepted);
        assert_eq!(output.len(), WRITE_BUFFER_BYTES + WRITE_BUFFER_BYTES / 2 + 7);
    }

    #[tokio::test]
    async fn test_file_sink() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.ndjson");

        let mut sink = JsonLinesSink::create(&path).await.unwrap();
        sink.write_record("{}").await.unwrap();
        sink.flush().await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "{}\n");
    }

    #[tokio::test]
    async fn test_file_sink_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("export.ndjson");

        let result = JsonLinesSink::create(&path).await;
        assert!(matches!(result, Err(ExportError::SinkWriteFailed(_))));
    }
}
