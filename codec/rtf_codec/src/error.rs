//! Error types for the read and write sides.
//!
//! Malformed input surfaces as [`ParseError::Syntax`] with the byte offset
//! where the grammar gave up; it is fatal to the current parse — there is
//! no mid-token resynchronization. Source and sink I/O failures propagate
//! unchanged. Caller preconditions (zero buffer capacity, out-of-range
//! window offsets) are panics over in `rtf_stream`, deliberately outside
//! this taxonomy.

use std::io;

use thiserror::Error;

/// What the grammar found wrong with the input.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SyntaxErrorKind {
    /// A control word rule was entered on something other than `\`,
    /// or a second `*` appeared inside a starred form.
    #[error("expected a control word")]
    ExpectedControlWord,
    /// Zero letters after `\`, or a 33rd letter before a delimiter.
    #[error("invalid control word name: {name:?}")]
    InvalidControlWordName { name: String },
    /// A parameter sign with no digits after it.
    #[error("missing digits after numeric parameter sign")]
    MissingNumericParameter,
    /// A parameter whose 10 digits exceed the representable range.
    #[error("numeric parameter {value} is out of range")]
    ParameterOutOfRange { value: i64 },
    /// The stream ended inside a declared binary payload.
    #[error("binary data truncated: expected {expected} bytes, found {found}")]
    BinaryLengthMismatch { expected: usize, found: usize },
    /// A group-start rule was entered on something other than `{`.
    #[error("expected a group start ('{{')")]
    ExpectedGroupStart,
    /// A group-end rule was entered on something other than `}`.
    #[error("expected a group end ('}}')")]
    ExpectedGroupEnd,
}

/// An error raised while reading a document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed input. Fatal: treat the document read as terminated.
    #[error("{kind} at byte offset {offset}")]
    Syntax {
        kind: SyntaxErrorKind,
        /// Absolute byte offset at which the grammar detected the problem.
        offset: u64,
    },
    /// The underlying byte source failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An error raised while writing a document.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Control word names must be 1–32 ASCII letters.
    #[error("invalid control word name: {name:?}")]
    InvalidControlWordName { name: String },
    /// A binary payload longer than a numeric parameter can declare.
    #[error("binary payload of {size} bytes cannot be declared by a parameter")]
    BinaryTooLarge { size: usize },
    /// The underlying byte sink failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
