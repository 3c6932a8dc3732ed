//! Pull interface over a whole document.

use std::io::Read;

use crate::error::ParseError;
use crate::scanner::Scanner;
use crate::token::Token;

/// Forward-only, non-restartable token reader.
///
/// Adapts the one-token-at-a-time [`Scanner`] into a lazy sequence:
/// pull [`Reader::next_token`] (or iterate) until exhaustion. The reader
/// exclusively owns the scanner, cursor, and source; dropping it releases
/// them. No tokens are buffered beyond the one in flight.
///
/// Both `Ok(None)` and an error end the sequence: iteration yields the
/// error once and then fuses.
pub struct Reader<R> {
    scanner: Scanner<R>,
    finished: bool,
}

impl<R: Read> Reader<R> {
    pub fn new(source: R) -> Self {
        Self {
            scanner: Scanner::new(source),
            finished: false,
        }
    }

    /// Create a reader with an explicit initial buffer capacity.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            scanner: Scanner::with_capacity(source, capacity),
            finished: false,
        }
    }

    /// Read the next token, or `None` once the document has ended.
    ///
    /// After the end of the document — or after any error — every further
    /// call returns `Ok(None)`.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        if self.finished {
            return Ok(None);
        }
        match self.scanner.next_token() {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }

    /// Absolute byte offset of the next unconsumed input byte.
    pub fn position(&self) -> u64 {
        self.scanner.position()
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;
    use crate::token::Token;
    use pretty_assertions::assert_eq;

    fn control_word(name: &str, parameter: Option<i32>) -> Token {
        Token::control_word(name, parameter).unwrap()
    }

    #[test]
    fn collects_a_document() {
        let reader = Reader::new("{\\rtf1 }".as_bytes());
        let tokens: Vec<Token> = reader.map(Result::unwrap).collect();
        assert_eq!(
            tokens,
            vec![
                Token::GroupStart,
                control_word("rtf", Some(1)),
                Token::GroupEnd,
            ]
        );
    }

    #[test]
    fn next_token_is_stable_after_end() {
        let mut reader = Reader::new("{}".as_bytes());
        assert_eq!(reader.next_token().unwrap(), Some(Token::GroupStart));
        assert_eq!(reader.next_token().unwrap(), Some(Token::GroupEnd));
        assert_eq!(reader.next_token().unwrap(), None);
        assert_eq!(reader.next_token().unwrap(), None);
    }

    #[test]
    fn iteration_fuses_after_an_error() {
        let mut reader = Reader::new("\\bin9 x".as_bytes());
        assert!(reader.next().is_some_and(|item| item.is_err()));
        assert!(reader.next().is_none());
        assert_eq!(reader.next_token().unwrap(), None);
    }

    #[test]
    fn capacity_does_not_change_the_token_stream() {
        let doc = "{\\rtf1\\pard Plenty of literal content in this one\\par}";
        let small: Vec<Token> = Reader::with_capacity(doc.as_bytes(), 16)
            .map(Result::unwrap)
            .collect();
        let large: Vec<Token> = Reader::with_capacity(doc.as_bytes(), 1024)
            .map(Result::unwrap)
            .collect();
        assert_eq!(small, large);
    }
}
