//! Token-by-token serializer.
//!
//! The inverse of the grammar: explicit per-token calls emit escaped bytes
//! into an exclusively owned sink. Each call builds its fragment in memory
//! and writes it with a single `write_all`, so a failed write never leaves
//! a half-emitted escape behind it in the application's view.

use std::io::Write;

use crate::error::WriteError;
use crate::token::{Token, WordName};

/// Serializer over a byte sink.
///
/// Control words always get a trailing space delimiter: it is legal in
/// every position and keeps the encoder state-free, at the cost of one
/// byte a conforming reader must tolerate (and this crate's reader does).
pub struct Writer<W> {
    sink: W,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write a `{` group opener.
    pub fn group_start(&mut self) -> Result<(), WriteError> {
        self.sink.write_all(b"{")?;
        Ok(())
    }

    /// Write a `}` group closer.
    pub fn group_end(&mut self) -> Result<(), WriteError> {
        self.sink.write_all(b"}")?;
        Ok(())
    }

    /// Write a control word with an optional decimal parameter.
    ///
    /// Fails with [`WriteError::InvalidControlWordName`] unless `name` is
    /// 1–32 ASCII letters.
    pub fn control_word(&mut self, name: &str, parameter: Option<i32>) -> Result<(), WriteError> {
        validate_name(name)?;
        self.emit_control_word(name, parameter)
    }

    /// Write a starred (`\*\name`) control word.
    pub fn starred_control_word(
        &mut self,
        name: &str,
        parameter: Option<i32>,
    ) -> Result<(), WriteError> {
        validate_name(name)?;
        self.sink.write_all(b"\\*")?;
        self.emit_control_word(name, parameter)
    }

    /// Write literal text, escaping as needed.
    ///
    /// `{`, `}`, and `\` are written behind an escaping backslash. Every
    /// character above U+007F is written as `\u<decimal-codepoint>?`, the
    /// `?` being the mandated one-character fallback. Everything else is
    /// copied verbatim.
    pub fn span(&mut self, text: &str) -> Result<(), WriteError> {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '{' | '}' | '\\' => {
                    out.push('\\');
                    out.push(ch);
                }
                ch if u32::from(ch) > 127 => {
                    out.push_str("\\u");
                    out.push_str(&u32::from(ch).to_string());
                    out.push('?');
                }
                ch => out.push(ch),
            }
        }
        self.sink.write_all(out.as_bytes())?;
        Ok(())
    }

    /// Write a binary block: `\bin<N>`, the space delimiter, then exactly
    /// N raw unescaped bytes.
    pub fn binary(&mut self, data: &[u8]) -> Result<(), WriteError> {
        let declared = i32::try_from(data.len())
            .map_err(|_| WriteError::BinaryTooLarge { size: data.len() })?;
        self.emit_control_word("bin", Some(declared))?;
        self.sink.write_all(data)?;
        Ok(())
    }

    /// Write any token.
    pub fn write_token(&mut self, token: &Token) -> Result<(), WriteError> {
        match token {
            Token::GroupStart => self.group_start(),
            Token::GroupEnd => self.group_end(),
            Token::ControlWord {
                name,
                starred: true,
                parameter,
            } => self.starred_control_word(name.as_str(), *parameter),
            Token::ControlWord {
                name,
                starred: false,
                parameter,
            } => self.control_word(name.as_str(), *parameter),
            Token::Span(text) => self.span(text),
            Token::Binary(data) => self.binary(data),
        }
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Release the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit_control_word(&mut self, name: &str, parameter: Option<i32>) -> Result<(), WriteError> {
        let mut out = String::with_capacity(name.len() + 13);
        out.push('\\');
        out.push_str(name);
        if let Some(value) = parameter {
            out.push_str(&value.to_string());
        }
        out.push(' ');
        self.sink.write_all(out.as_bytes())?;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), WriteError> {
    let valid = !name.is_empty()
        && name.len() <= WordName::MAX_LEN
        && name.bytes().all(|b| b.is_ascii_alphabetic());
    if valid {
        Ok(())
    } else {
        Err(WriteError::InvalidControlWordName {
            name: name.to_owned(),
        })
    }
}
