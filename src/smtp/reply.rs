//! SMTP reply parsing.
//!
//! Replies are one or more lines of the form `250-text` (continuation) or
//! `250 text` (final line), per RFC 5321 section 4.2. The parser is fed one
//! line at a time so it can sit behind any buffered reader.

use thiserror::Error;

/// Errors produced while parsing server reply lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplyParseError {
    /// The server sent an empty line where a reply was expected.
    #[error("empty reply line")]
    EmptyLine,

    /// The line does not start with a three-digit reply code.
    #[error("malformed reply line: {0:?}")]
    BadCode(String),

    /// A continuation line carried a different code than the first line.
    #[error("inconsistent reply codes in multiline reply ({first} then {next})")]
    CodeMismatch { first: u16, next: u16 },
}

/// A complete SMTP reply: the three-digit code and the joined text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub message: String,
}

impl Reply {
    /// Positive completion (2xx).
    pub fn is_positive(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Transient negative completion (4xx) - greylisting, tempfail.
    pub fn is_transient(&self) -> bool {
        (400..500).contains(&self.code)
    }

    /// Permanent negative completion (5xx).
    pub fn is_permanent(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// Incremental parser for (possibly multiline) SMTP replies.
///
/// Feed one line at a time; `Ok(Some(reply))` is returned once the final
/// line of the reply has been consumed.
#[derive(Debug, Default)]
pub struct ReplyParser {
    code: Option<u16>,
    lines: Vec<String>,
}

impl ReplyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one reply line (without the trailing CRLF).
    pub fn feed(&mut self, line: &str) -> Result<Option<Reply>, ReplyParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ReplyParseError::EmptyLine);
        }

        // The code is exactly three ASCII digits; checking bytes first keeps
        // the slicing below safe on arbitrary (non-ASCII) input
        let bytes = line.as_bytes();
        if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
            return Err(ReplyParseError::BadCode(line.to_string()));
        }
        let code: u16 = line[..3]
            .parse()
            .map_err(|_| ReplyParseError::BadCode(line.to_string()))?;
        if !(100..600).contains(&code) {
            return Err(ReplyParseError::BadCode(line.to_string()));
        }
        let rest = &line[3..];

        match self.code {
            None => self.code = Some(code),
            Some(first) if first != code => {
                return Err(ReplyParseError::CodeMismatch { first, next: code })
            }
            Some(_) => {}
        }

        // The 4th character decides: '-' continues the reply, ' ' (or end of
        // line) terminates it.
        let (is_final, text) = match rest.as_bytes().first() {
            Some(b'-') => (false, &rest[1..]),
            Some(b' ') => (true, &rest[1..]),
            None => (true, rest),
            Some(_) => return Err(ReplyParseError::BadCode(line.to_string())),
        };
        self.lines.push(text.to_string());

        if is_final {
            let reply = Reply {
                code,
                message: self.lines.join("\n"),
            };
            self.code = None;
            self.lines.clear();
            Ok(Some(reply))
        } else {
            Ok(None)
        }
    }
}
