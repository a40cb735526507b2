//! Base-set input from command-line operands and base files.
//!
//! Both sources accept `NAME` (enabled) and `NAME=VALUE` entries, where
//! `VALUE` is one of `1/0`, `on/off`, `true/false` or `yes/no` in any case.
//! Base files additionally understand `#define NAME` and `#undef NAME` lines
//! so a configuration header can be fed in directly; anything after the name
//! on such a line is ignored. Blank lines and lines starting with `#` or `//`
//! are skipped.

use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// One base-set entry: a flag name and whether the caller enables it.
pub type BaseEntry = (String, bool);

/// Where a base-set entry came from, for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Location {
    /// A positional command-line operand.
    Operand,
    /// A line of a base file (1-based).
    Line {
        /// Base file as given on the command line.
        path: String,
        /// Line number.
        line: usize,
    },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand => Ok(()),
            Self::Line { path, line } => write!(f, "{path}:{line}: "),
        }
    }
}

/// Error raised while collecting the base set.
#[derive(Debug, Error)]
pub enum BaseError {
    /// An entry carried a value that is not a recognised boolean.
    #[error(
        "{location}invalid value '{value}' for flag '{name}' \
         (expected 1/0, on/off, true/false or yes/no)"
    )]
    InvalidValue {
        /// Source of the entry.
        location: Location,
        /// Flag name.
        name: String,
        /// Rejected value.
        value: String,
    },
    /// An entry had no flag name.
    #[error("{location}missing flag name in '{entry}'")]
    MissingName {
        /// Source of the entry.
        location: Location,
        /// The raw entry.
        entry: String,
    },
    /// A base file could not be opened or read.
    #[error("failed to read base file '{path}': {source}")]
    Read {
        /// Base file as given on the command line.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Parses a boolean flag value.
pub fn parse_value(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "on" | "true" | "yes" => Some(true),
        "0" | "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parses a `NAME` or `NAME=VALUE` entry.
pub fn parse_entry(entry: &str, location: &Location) -> Result<BaseEntry, BaseError> {
    let (name, value) = match entry.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (entry.trim(), None),
    };

    if name.is_empty() {
        return Err(BaseError::MissingName {
            location: location.clone(),
            entry: entry.to_owned(),
        });
    }

    let enabled = match value {
        None => true,
        Some(value) => parse_value(value).ok_or_else(|| BaseError::InvalidValue {
            location: location.clone(),
            name: name.to_owned(),
            value: value.to_owned(),
        })?,
    };

    Ok((name.to_owned(), enabled))
}

/// Parses positional operands in order.
pub fn parse_operands<S: AsRef<str>>(operands: &[S]) -> Result<Vec<BaseEntry>, BaseError> {
    operands
        .iter()
        .map(|operand| parse_entry(operand.as_ref(), &Location::Operand))
        .collect()
}

/// Loads a base file; `-` reads standard input.
pub fn load_base_file(path: &OsStr) -> Result<Vec<BaseEntry>, BaseError> {
    let display = Path::new(path).display().to_string();

    if path == OsStr::new("-") {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        return read_base_entries(&mut reader, &display);
    }

    let file = File::open(path).map_err(|source| BaseError::Read {
        path: display.clone(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    read_base_entries(&mut reader, &display)
}

/// Reads base-set entries line by line from `reader`.
///
/// `path` is only used to label diagnostics.
pub fn read_base_entries<R: BufRead>(
    reader: &mut R,
    path: &str,
) -> Result<Vec<BaseEntry>, BaseError> {
    let mut buffer = Vec::new();
    let mut entries = Vec::new();
    let mut line = 0;

    loop {
        buffer.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|source| BaseError::Read {
                path: path.to_owned(),
                source,
            })?;
        if bytes_read == 0 {
            break;
        }
        line += 1;

        if buffer.last() == Some(&b'\n') {
            buffer.pop();
        }
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }

        let text = String::from_utf8_lossy(&buffer);
        let location = Location::Line {
            path: path.to_owned(),
            line,
        };
        if let Some(entry) = parse_line(text.trim(), &location)? {
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn parse_line(text: &str, location: &Location) -> Result<Option<BaseEntry>, BaseError> {
    if let Some(rest) = directive(text, "define") {
        return directive_name(rest, text, location).map(|name| Some((name, true)));
    }
    if let Some(rest) = directive(text, "undef") {
        return directive_name(rest, text, location).map(|name| Some((name, false)));
    }
    if text.is_empty() || text.starts_with('#') || text.starts_with("//") {
        return Ok(None);
    }
    parse_entry(text, location).map(Some)
}

fn directive<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix('#')?.trim_start().strip_prefix(keyword)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

fn directive_name(rest: &str, text: &str, location: &Location) -> Result<String, BaseError> {
    rest.split_whitespace()
        .next()
        .map(str::to_owned)
        .ok_or_else(|| BaseError::MissingName {
            location: location.clone(),
            entry: text.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<Vec<BaseEntry>, BaseError> {
        read_base_entries(&mut io::Cursor::new(text.as_bytes()), "base.cfg")
    }

    fn entry(name: &str, enabled: bool) -> BaseEntry {
        (name.to_owned(), enabled)
    }

    #[test]
    fn bare_name_is_enabled() {
        assert_eq!(
            parse_entry("MBEDTLS_ECP_C", &Location::Operand).expect("parses"),
            entry("MBEDTLS_ECP_C", true)
        );
    }

    #[test]
    fn value_words_are_case_insensitive() {
        let cases = [
            ("1", true),
            ("On", true),
            ("YES", true),
            ("off", false),
            ("False", false),
            ("0", false),
        ];
        for (value, expected) in cases {
            let parsed =
                parse_entry(&format!("A={value}"), &Location::Operand).expect("parses");
            assert_eq!(parsed, entry("A", expected), "{value}");
        }
    }

    #[test]
    fn invalid_value_names_the_flag() {
        let error = parse_entry("A=maybe", &Location::Operand).expect_err("invalid");
        assert_eq!(
            error.to_string(),
            "invalid value 'maybe' for flag 'A' (expected 1/0, on/off, true/false or yes/no)"
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        let error = parse_entry("=1", &Location::Operand).expect_err("no name");
        assert!(matches!(error, BaseError::MissingName { .. }));
    }

    #[test]
    fn file_skips_comments_and_blank_lines() {
        let entries =
            read("# header\n\n// MBEDTLS_MD_C\nMBEDTLS_ECP_C\r\nMBEDTLS_RSA_C = off\n")
                .expect("reads");
        assert_eq!(
            entries,
            [entry("MBEDTLS_ECP_C", true), entry("MBEDTLS_RSA_C", false)]
        );
    }

    #[test]
    fn file_accepts_define_and_undef() {
        let entries = read(concat!(
            "#define MBEDTLS_PK_PARSE_C\n",
            "#  define MBEDTLS_ECP_C /* curves */\n",
            "#undef MBEDTLS_RSA_C\n",
        ))
        .expect("reads");
        assert_eq!(
            entries,
            [
                entry("MBEDTLS_PK_PARSE_C", true),
                entry("MBEDTLS_ECP_C", true),
                entry("MBEDTLS_RSA_C", false)
            ]
        );
    }

    #[test]
    fn defined_keyword_prefix_is_a_comment() {
        let entries = read("#defined_elsewhere X\n").expect("reads");
        assert!(entries.is_empty());
    }

    #[test]
    fn file_errors_carry_line_numbers() {
        let error = read("A\n\nB=2\n").expect_err("invalid");
        assert_eq!(
            error.to_string(),
            "base.cfg:3: invalid value '2' for flag 'B' (expected 1/0, on/off, true/false or yes/no)"
        );
    }

    #[test]
    fn define_without_name_is_rejected() {
        let error = read("#define\n").expect_err("no name");
        assert!(matches!(
            error,
            BaseError::MissingName {
                location: Location::Line { line: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_base_file(OsStr::new("/nonexistent/flag-resolve/base.cfg"))
            .expect_err("missing");
        assert!(
            error
                .to_string()
                .starts_with("failed to read base file '/nonexistent/flag-resolve/base.cfg'")
        );
    }
}
