//! Token data model.
//!
//! One case per token kind, carrying only the fields that kind actually
//! has; consumers match exhaustively. Tokens are ephemeral values with no
//! identity beyond a single production/consumption.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a control word name fails validation.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("invalid control word name: {0:?}")]
pub struct InvalidWordName(pub String);

/// A validated control word name: 1 to 32 ASCII letters.
///
/// The constructor is the only way in, so a `WordName` can never hold a
/// disallowed character.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct WordName(String);

impl WordName {
    /// Maximum name length in letters.
    pub const MAX_LEN: usize = 32;

    /// Validate and wrap a control word name.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidWordName> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.len() <= Self::MAX_LEN
            && name.bytes().all(|b| b.is_ascii_alphabetic());
        if valid {
            Ok(Self(name))
        } else {
            Err(InvalidWordName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for WordName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl FromStr for WordName {
    type Err = InvalidWordName;

    fn from_str(s: &str) -> Result<Self, InvalidWordName> {
        Self::new(s)
    }
}

impl fmt::Display for WordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for WordName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One syntactic unit of a document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// `{` — opens a nested group.
    GroupStart,
    /// `}` — closes the innermost group.
    GroupEnd,
    /// A named directive, optionally starred (`\*\name`) and optionally
    /// parameterized with a signed 32-bit decimal of at most 10 digits.
    ControlWord {
        name: WordName,
        starred: bool,
        parameter: Option<i32>,
    },
    /// A run of literal text with escapes and scalar escapes resolved.
    Span(String),
    /// An exact-length raw payload declared by a preceding `bin` word.
    Binary(Vec<u8>),
}

impl Token {
    /// Convenience constructor for an unstarred control word.
    pub fn control_word(name: &str, parameter: Option<i32>) -> Result<Self, InvalidWordName> {
        Ok(Self::ControlWord {
            name: WordName::new(name)?,
            starred: false,
            parameter,
        })
    }

    /// Convenience constructor for a starred (`\*`) control word.
    pub fn starred_control_word(
        name: &str,
        parameter: Option<i32>,
    ) -> Result<Self, InvalidWordName> {
        Ok(Self::ControlWord {
            name: WordName::new(name)?,
            starred: true,
            parameter,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupStart => f.write_str("group-start"),
            Self::GroupEnd => f.write_str("group-end"),
            Self::ControlWord {
                name,
                starred,
                parameter,
            } => {
                f.write_str(if *starred { "\\*\\" } else { "\\" })?;
                f.write_str(name)?;
                if let Some(value) = parameter {
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Self::Span(text) => write!(f, "span {text:?}"),
            Self::Binary(data) => write!(f, "binary <{} bytes>", data.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, WordName};
    use pretty_assertions::assert_eq;

    // === WordName validation ===

    #[test]
    fn accepts_ascii_letters() {
        let name = WordName::new("rtf").unwrap();
        assert_eq!(name.as_str(), "rtf");
        assert_eq!(name, "rtf");
    }

    #[test]
    fn accepts_mixed_case_up_to_limit() {
        assert!(WordName::new("AbCdEfGh").is_ok());
        assert!(WordName::new("a".repeat(32)).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(WordName::new("").is_err());
    }

    #[test]
    fn rejects_over_32_letters() {
        assert!(WordName::new("a".repeat(33)).is_err());
    }

    #[test]
    fn rejects_digits_and_symbols() {
        assert!(WordName::new("bin0").is_err());
        assert!(WordName::new("pa-r").is_err());
        assert!(WordName::new("f o").is_err());
        assert!(WordName::new("caf\u{e9}").is_err());
    }

    #[test]
    fn parses_from_str() {
        let name: WordName = "par".parse().unwrap();
        assert_eq!(name, "par");
        assert!("no2".parse::<WordName>().is_err());
    }

    // === Display ===

    #[test]
    fn display_forms() {
        assert_eq!(Token::GroupStart.to_string(), "group-start");
        assert_eq!(
            Token::control_word("rtf", Some(1)).unwrap().to_string(),
            "\\rtf1"
        );
        assert_eq!(
            Token::starred_control_word("generator", None)
                .unwrap()
                .to_string(),
            "\\*\\generator"
        );
        assert_eq!(Token::Span("a{b".into()).to_string(), "span \"a{b\"");
        assert_eq!(Token::Binary(vec![1, 2, 3]).to_string(), "binary <3 bytes>");
    }
}
