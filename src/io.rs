use std::fs::File;
use std::io::{self, BufRead, BufReader};

use crate::error::Error;

/// Line-oriented input for `READ`. Opened once when the engine is
/// constructed and dropped with it; never reopened or seeked.
pub struct InputStream {
    reader: Box<dyn BufRead>,
}

impl InputStream {
    pub fn from_path(path: &str) -> Result<InputStream, Error> {
        let file = File::open(path).map_err(|source| Error::InvalidFile {
            path: path.to_string(),
            source,
        })?;
        Ok(InputStream {
            reader: Box::new(BufReader::new(file)),
        })
    }

    pub fn from_stdin() -> InputStream {
        InputStream {
            reader: Box::new(BufReader::new(io::stdin())),
        }
    }

    /// Wraps an already-buffered reader directly; used by tests to feed
    /// in-memory input without touching the filesystem or stdin.
    pub fn from_reader(reader: Box<dyn BufRead>) -> InputStream {
        InputStream { reader }
    }

    /// Reads one line, stripping a trailing newline. `Ok(None)` at
    /// end-of-stream.
    pub fn read_line(&mut self) -> Result<Option<String>, Error> {
        let mut line = String::new();
        let bytes = self
            .reader
            .read_line(&mut line)
            .map_err(|source| Error::InvalidFile {
                path: "<input>".to_string(),
                source,
            })?;
        if bytes == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
