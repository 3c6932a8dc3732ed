//! Hand-written recursive-descent token grammar.
//!
//! The scanner owns a lookahead cursor and consumes exactly one syntactic
//! unit per call, leaving the cursor positioned immediately after it. All
//! decisions are made on bounded lookahead; nothing is ever un-consumed.
//!
//! # Dispatch
//!
//! `next_token` looks at the next byte: end of stream or a NUL sentinel
//! terminates the document; `{`/`}` produce group tokens; bare CR/LF is
//! discarded; `\` introduces either a control word, a scalar escape
//! (folded into a span), or an escaped literal symbol (also a span);
//! everything else starts a span.
//!
//! Two control words get special handling here rather than in the word
//! rule itself: `bin<N>` switches into raw payload consumption, and
//! `u<codepoint>` is resolved during span parsing instead of surfacing as
//! a standalone token.

use std::io::Read;

use rtf_stream::Cursor;
use tracing::trace;

use crate::error::{ParseError, SyntaxErrorKind};
use crate::token::{Token, WordName};

/// Maximum number of decimal digits in a numeric parameter.
const MAX_PARAMETER_DIGITS: usize = 10;

fn is_ascii_letter(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

fn is_decimal_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// Recursive-descent tokenizer over a byte source.
///
/// Exclusively owns its cursor (and therefore the source). One token per
/// [`Scanner::next_token`] call; errors are fatal to the parse.
pub struct Scanner<R> {
    cursor: Cursor<R>,
}

impl<R: Read> Scanner<R> {
    pub fn new(source: R) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Create a scanner with an explicit initial buffer capacity.
    ///
    /// Token output never depends on the capacity; this exists for memory
    /// tuning and for exercising buffer growth in tests.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            cursor: Cursor::with_capacity(source, capacity),
        }
    }

    /// Absolute byte offset of the next unconsumed input byte.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Read the next token, or `None` at end of document.
    ///
    /// A NUL byte is treated as a document terminator and is not consumed,
    /// so repeated calls at the end keep returning `None`.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        loop {
            let Some(signal) = self.cursor.peek(0)? else {
                return Ok(None);
            };
            match signal {
                0 => return Ok(None),
                b'{' => return self.read_group_start().map(Some),
                b'}' => return self.read_group_end().map(Some),
                // Bare line breaks between tokens carry no content.
                b'\r' | b'\n' => self.cursor.discard(1)?,
                b'\\' => return self.dispatch_escape().map(Some),
                _ => return self.read_span().map(Some),
            }
        }
    }

    /// Consume a `{` and produce [`Token::GroupStart`].
    pub fn read_group_start(&mut self) -> Result<Token, ParseError> {
        if self.cursor.peek(0)? != Some(b'{') {
            return Err(self.fail(SyntaxErrorKind::ExpectedGroupStart));
        }
        self.cursor.discard(1)?;
        Ok(Token::GroupStart)
    }

    /// Consume a `}` and produce [`Token::GroupEnd`].
    pub fn read_group_end(&mut self) -> Result<Token, ParseError> {
        if self.cursor.peek(0)? != Some(b'}') {
            return Err(self.fail(SyntaxErrorKind::ExpectedGroupEnd));
        }
        self.cursor.discard(1)?;
        Ok(Token::GroupEnd)
    }

    /// Consume one control word: `\`, an optional `*`, 1–32 letters, an
    /// optional signed parameter of 1–10 digits, and a single space
    /// delimiter if one follows (any other delimiter byte is left for the
    /// next rule).
    pub fn read_control_word(&mut self) -> Result<Token, ParseError> {
        self.control_word(false)
    }

    /// Consume one literal text span, resolving escaped symbols and
    /// `\u<codepoint>` scalar escapes. Ends (without consuming) at `{`,
    /// `}`, or a backslash that starts a real control word; ends at end
    /// of stream.
    pub fn read_span(&mut self) -> Result<Token, ParseError> {
        let mut text: Vec<u8> = Vec::new();
        loop {
            let run = self
                .cursor
                .consume_until(|b| matches!(b, b'{' | b'}' | b'\\'))?;
            text.extend_from_slice(&run);

            if self.cursor.peek(0)? != Some(b'\\') {
                break; // `{`, `}`, or end of stream
            }
            match self.cursor.peek(1)? {
                // A dangling escape at end of stream: keep the backslash
                // literally rather than looping on an empty span.
                None => {
                    self.cursor.discard(1)?;
                    text.push(b'\\');
                    break;
                }
                Some(b'u') if self.peek_digit(2)? => self.read_scalar_escape(&mut text)?,
                // A control word follows; the span ends before it.
                Some(next) if is_ascii_letter(next) => break,
                Some(b'*') if self.cursor.peek(2)? == Some(b'\\') => break,
                // Escaped literal symbol: `\{`, `\}`, `\\`, and friends.
                Some(symbol) => {
                    text.push(symbol);
                    self.cursor.discard(2)?;
                }
            }
        }
        trace!(len = text.len(), "span");
        Ok(Token::Span(into_lossy_string(text)))
    }

    /// Dispatch a leading `\`: scalar escapes and escaped symbols belong
    /// to the span rule; letters and `*` start a control word, with the
    /// `bin` payload switch applied here.
    fn dispatch_escape(&mut self) -> Result<Token, ParseError> {
        match self.cursor.peek(1)? {
            Some(b'u') if self.peek_digit(2)? => self.read_span(),
            Some(next) if is_ascii_letter(next) || next == b'*' => {
                let word = self.read_control_word()?;
                if let Token::ControlWord {
                    name,
                    parameter: Some(declared),
                    ..
                } = &word
                {
                    if name.as_str() == "bin" {
                        return self.read_binary_payload(*declared);
                    }
                }
                Ok(word)
            }
            _ => self.read_span(),
        }
    }

    /// The worded part of the control word rule.
    ///
    /// `starred` is true while parsing the form after a leading `\*`. The
    /// format forbids a second nested `*`, so the recursion is exactly one
    /// level deep — a second star is a hard error, not a deeper descent.
    fn control_word(&mut self, starred: bool) -> Result<Token, ParseError> {
        if self.cursor.peek(0)? != Some(b'\\') {
            return Err(self.fail(SyntaxErrorKind::ExpectedControlWord));
        }
        self.cursor.discard(1)?;

        if self.cursor.peek(0)? == Some(b'*') {
            if starred {
                return Err(self.fail(SyntaxErrorKind::ExpectedControlWord));
            }
            self.cursor.discard(1)?;
            return self.control_word(true);
        }

        let letters = self
            .cursor
            .consume_while_limited(is_ascii_letter, WordName::MAX_LEN)?;
        let more_letters = matches!(self.cursor.peek(0)?, Some(b) if is_ascii_letter(b));
        if letters.is_empty() || more_letters {
            let name = into_lossy_string(letters);
            return Err(self.fail(SyntaxErrorKind::InvalidControlWordName { name }));
        }
        let name = WordName::new(into_lossy_string(letters))
            .map_err(|err| self.fail(SyntaxErrorKind::InvalidControlWordName { name: err.0 }))?;

        let parameter = self.read_parameter()?;

        if self.cursor.peek(0)? == Some(b' ') {
            // The single space delimiter belongs to the control word and
            // is never part of subsequent content.
            self.cursor.discard(1)?;
        }

        trace!(%name, starred, ?parameter, "control word");
        Ok(Token::ControlWord {
            name,
            starred,
            parameter,
        })
    }

    /// Optional signed decimal parameter: a sign and/or 1–10 digits.
    fn read_parameter(&mut self) -> Result<Option<i32>, ParseError> {
        let negative = match self.cursor.peek(0)? {
            Some(b'-') => {
                self.cursor.discard(1)?;
                true
            }
            Some(byte) if is_decimal_digit(byte) => false,
            _ => return Ok(None),
        };

        let digits = self
            .cursor
            .consume_while_limited(is_decimal_digit, MAX_PARAMETER_DIGITS)?;
        if digits.is_empty() {
            return Err(self.fail(SyntaxErrorKind::MissingNumericParameter));
        }

        // At most 10 digits, so the magnitude always fits an i64.
        let mut value = decimal_value(&digits);
        if negative {
            value = -value;
        }
        let value = i32::try_from(value)
            .map_err(|_| self.fail(SyntaxErrorKind::ParameterOutOfRange { value }))?;
        Ok(Some(value))
    }

    /// Consume exactly `declared` raw bytes after a `bin` control word.
    ///
    /// A non-positive declaration yields an empty payload; a stream that
    /// ends short of the declared length is a hard error.
    fn read_binary_payload(&mut self, declared: i32) -> Result<Token, ParseError> {
        let expected = usize::try_from(declared).unwrap_or(0);
        let data = self.cursor.consume(expected)?;
        if data.len() < expected {
            return Err(self.fail(SyntaxErrorKind::BinaryLengthMismatch {
                expected,
                found: data.len(),
            }));
        }
        trace!(len = data.len(), "binary payload");
        Ok(Token::Binary(data))
    }

    /// Decode one `\u<codepoint>` escape into `text`.
    ///
    /// The caller has already seen `\`, `u`, and at least one digit. The
    /// digits follow the parameter rules (1–10 digits, 32-bit range); a
    /// space delimiter is consumed like any control word delimiter; the
    /// single mandated ASCII fallback byte that follows the escape is
    /// skipped.
    fn read_scalar_escape(&mut self, text: &mut Vec<u8>) -> Result<(), ParseError> {
        self.cursor.discard(2)?; // `\u`
        let digits = self
            .cursor
            .consume_while_limited(is_decimal_digit, MAX_PARAMETER_DIGITS)?;
        let value = decimal_value(&digits);
        let scalar = i32::try_from(value)
            .map_err(|_| self.fail(SyntaxErrorKind::ParameterOutOfRange { value }))?;

        if self.cursor.peek(0)? == Some(b' ') {
            self.cursor.discard(1)?;
        }

        // Values outside Unicode scalar space decode to U+FFFD.
        let decoded = u32::try_from(scalar)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut utf8 = [0u8; 4];
        text.extend_from_slice(decoded.encode_utf8(&mut utf8).as_bytes());

        // Skip the fallback character readers without scalar support
        // would have rendered instead.
        if self.cursor.peek(0)?.is_some() {
            self.cursor.discard(1)?;
        }
        Ok(())
    }

    fn peek_digit(&mut self, index: usize) -> Result<bool, ParseError> {
        Ok(matches!(self.cursor.peek(index)?, Some(byte) if is_decimal_digit(byte)))
    }

    fn fail(&self, kind: SyntaxErrorKind) -> ParseError {
        ParseError::Syntax {
            kind,
            offset: self.cursor.position(),
        }
    }
}

/// Fold ASCII digits into their decimal value.
fn decimal_value(digits: &[u8]) -> i64 {
    digits
        .iter()
        .fold(0, |acc, d| acc * 10 + i64::from(d - b'0'))
}

/// Decode accumulated span bytes, replacing invalid UTF-8 with U+FFFD.
fn into_lossy_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
