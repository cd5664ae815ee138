use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use flate2::read::MultiGzDecoder;
use futures::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::error::IoError;

/// Lines buffered between the blocking decoder and the async consumer
const LINE_BUFFER: usize = 1024;

/// Longest accepted line, terminator excluded
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Async stream of text lines from a gzip-compressed file
///
/// Decompression runs on tokio's blocking pool and hands lines over a
/// bounded channel, so a slow consumer pauses the decoder. Invalid UTF-8 is
/// replaced rather than rejected. A read error, or a line longer than
/// [`MAX_LINE_LEN`], is yielded once as [`IoError::Read`] and ends the stream.
pub struct GzipLineStream {
    lines: mpsc::Receiver<Result<String, IoError>>,
    _decoder: JoinHandle<()>,
}

impl GzipLineStream {
    /// Open a gzip file and validate its header
    ///
    /// Fails with [`IoError::FileOpen`] when the file cannot be opened and
    /// with [`IoError::Decompress`] when it is not gzip data.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref().to_path_buf();
        let reader = tokio::task::spawn_blocking(move || open_decoder(&path))
            .await
            .map_err(|e| IoError::Io(io::Error::other(e)))??;
        Ok(Self::from_reader(reader))
    }

    /// Stream lines from an already-decoded reader
    pub fn from_reader<R>(mut reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);

        let decoder = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                let limit = MAX_LINE_LEN as u64 + 1;
                let item = match (&mut reader).take(limit).read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(n) if n > MAX_LINE_LEN && buf.last() != Some(&b'\n') => {
                        Err(IoError::Read(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("line exceeds {MAX_LINE_LEN} bytes"),
                        )))
                    }
                    Ok(_) => Ok(String::from_utf8_lossy(&buf).into_owned()),
                    Err(e) => Err(IoError::Read(e)),
                };
                let failed = item.is_err();
                if tx.blocking_send(item).is_err() || failed {
                    break;
                }
            }
        });

        Self {
            lines: rx,
            _decoder: decoder,
        }
    }
}

impl Stream for GzipLineStream {
    type Item = Result<String, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.lines.poll_recv(cx)
    }
}

fn open_decoder(path: &Path) -> Result<BufReader<MultiGzDecoder<File>>, IoError> {
    let file = File::open(path).map_err(|source| IoError::FileOpen {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = BufReader::new(MultiGzDecoder::new(file));
    reader.fill_buf().map_err(|source| IoError::Decompress {
        path: path.display().to_string(),
        source,
    })?;

    Ok(reader)
}
