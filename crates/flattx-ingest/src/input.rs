//! Line-oriented reading of delimited input files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flattx_model::{Delimiter, Header};

use crate::error::{IngestError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Open an input file for buffered line reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    Ok(BufReader::new(file))
}

/// The first line of an input file, raw and parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// Line exactly as read, without its terminator. Echoed to the output.
    pub raw: String,
    /// Field names. A leading UTF-8 BOM is not part of the first name.
    pub header: Header,
}

/// One data line as read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Text(String),
    /// Raw bytes of a line that failed UTF-8 decoding.
    NotUtf8 { bytes: Vec<u8>, valid_up_to: usize },
}

impl InputLine {
    /// The decoded text, if the line was valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::NotUtf8 { .. } => None,
        }
    }
}

/// Reads lines one at a time and tracks 1-based line numbers.
pub struct LineReader<R> {
    inner: R,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_number: 0,
        }
    }

    /// Number of the line most recently returned (0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line without its `\n` or `\r\n` terminator.
    ///
    /// Returns `Ok(None)` at end of input. A line that is not valid UTF-8 is
    /// returned as [`InputLine::NotUtf8`] with its raw bytes; only I/O failures
    /// are errors.
    pub fn next_line(&mut self) -> Result<Option<InputLine>> {
        let mut bytes = Vec::new();
        let read = self
            .inner
            .read_until(b'\n', &mut bytes)
            .map_err(|source| IngestError::LineRead {
                line_number: self.line_number + 1,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        Ok(Some(match String::from_utf8(bytes) {
            Ok(text) => InputLine::Text(text),
            Err(err) => InputLine::NotUtf8 {
                valid_up_to: err.utf8_error().valid_up_to(),
                bytes: err.into_bytes(),
            },
        }))
    }

    /// Read the header line. Returns `Ok(None)` for an empty input.
    ///
    /// Field names must be text, so a header that is not valid UTF-8 is an
    /// error.
    pub fn read_header(&mut self, delimiter: Delimiter) -> Result<Option<HeaderLine>> {
        let raw = match self.next_line()? {
            None => return Ok(None),
            Some(InputLine::Text(raw)) => raw,
            Some(InputLine::NotUtf8 { valid_up_to, .. }) => {
                return Err(IngestError::HeaderEncoding { valid_up_to });
            }
        };
        let header = Header::parse(raw.trim_start_matches(UTF8_BOM), delimiter);
        Ok(Some(HeaderLine { raw, header }))
    }
}
