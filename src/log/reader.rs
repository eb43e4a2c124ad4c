use crate::error::{Error, Result};
use crate::log::extract::{extract_time, extract_url};
use crate::log::record::UrlRecord;

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Pull-based stream of [`UrlRecord`]s, one per input line.
///
/// Lines are read on demand, so memory use does not grow with the file. The
/// final line is emitted even without a trailing newline. A read error (I/O,
/// corrupt gzip, invalid UTF-8) is yielded once and ends the stream.
pub struct LogRecords<R> {
    reader: R,
    buf: String,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> LogRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            done: false,
        }
    }

    /// Number of lines produced so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for LogRecords<R> {
    type Item = io::Result<UrlRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                let line = self.buf.trim_end_matches(['\n', '\r']);
                Some(Ok(UrlRecord::new(extract_url(line), extract_time(line))))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Open an access log, transparently decompressing gzip archives.
///
/// The file is opened eagerly so that an unreadable source fails here, before
/// any record is produced. The handle is owned by the returned stream and
/// closed when it is dropped.
pub fn open_log(path: &Path, is_compressed: bool) -> Result<LogRecords<Box<dyn BufRead>>> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::PermissionDenied => Error::Access {
            path: path.to_path_buf(),
        },
        _ => Error::Io(err),
    })?;

    tracing::debug!(path = %path.display(), is_compressed, "opened log file");

    let reader: Box<dyn BufRead> = if is_compressed {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(LogRecords::new(reader))
}
