//! Header and record types for delimited lines.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ModelError;

/// Field separator of the flat files.
///
/// Only `|` and `,` are accepted. The same restriction applies to the files
/// produced by the upstream export, so anything else is a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Delimiter {
    #[default]
    Pipe,
    Comma,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Self::Pipe => '|',
            Self::Comma => ',',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "|",
            Self::Comma => ",",
        }
    }
}

impl FromStr for Delimiter {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "|" => Ok(Self::Pipe),
            "," => Ok(Self::Comma),
            other => Err(ModelError::InvalidDelimiter(other.to_string())),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered field names taken from the first line of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    fields: Vec<String>,
}

impl Header {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Split a header line. Field names are kept exactly as written.
    pub fn parse(line: &str, delimiter: Delimiter) -> Self {
        Self::new(split_line(line, delimiter))
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One data line split into values, positionally matching a [`Header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Split a data line, keeping empty fields (including trailing ones).
    pub fn parse(line: &str, delimiter: Delimiter) -> Self {
        Self::new(split_line(line, delimiter))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [String] {
        &mut self.values
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn join(&self, delimiter: Delimiter) -> String {
        self.values.join(delimiter.as_str())
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}

fn split_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    line.split(delimiter.as_char()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_accepts_pipe_and_comma_only() {
        assert_eq!("|".parse::<Delimiter>(), Ok(Delimiter::Pipe));
        assert_eq!(",".parse::<Delimiter>(), Ok(Delimiter::Comma));
        assert_eq!(
            ";".parse::<Delimiter>(),
            Err(ModelError::InvalidDelimiter(";".to_string()))
        );
        assert!("||".parse::<Delimiter>().is_err());
    }

    #[test]
    fn record_keeps_trailing_empty_fields() {
        let record = Record::parse("1|x|", Delimiter::Pipe);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(2), Some(""));
        assert_eq!(record.join(Delimiter::Pipe), "1|x|");
    }

    #[test]
    fn header_fields() {
        let header = Header::parse("id|status|country", Delimiter::Pipe);
        assert_eq!(header.len(), 3);
        assert_eq!(header.field(2), Some("country"));
        assert_eq!(header.field(3), None);
    }

    #[test]
    fn comma_delimiter_splits_on_comma() {
        let record = Record::parse("a,b|c", Delimiter::Comma);
        assert_eq!(record.values(), ["a", "b|c"]);
    }
}
