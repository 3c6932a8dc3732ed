//! Streaming token reader and writer for the RTF interchange syntax.
//!
//! The wire format is backslash-escaped and brace-delimited: `{`/`}` open
//! and close groups, control words look like
//! `\<1-32 ASCII letters><optional signed decimal><optional single space>`,
//! literal text is escaped with `\{`, `\}`, `\\`, inline binary rides on
//! `\bin<N>` followed by N raw bytes, and Unicode scalars are escaped as
//! `\u<decimal>` followed by one ASCII fallback character.
//!
//! Reading flows byte source → [`rtf_stream::Cursor`] → [`Scanner`] →
//! [`Token`] sequence, usually pulled through a [`Reader`]. Writing is the
//! inverse: per-token calls on a [`Writer`] emit escaped bytes into an
//! owned sink.
//!
//! This crate stops at the token layer on purpose. Groups are not matched
//! against each other, control words are not interpreted (beyond the
//! `bin`/`u` handling the token stream itself requires), and no document
//! model is built — that is the consumer's business.

mod error;
mod reader;
mod scanner;
mod token;
mod writer;

pub use error::{ParseError, SyntaxErrorKind, WriteError};
pub use reader::Reader;
pub use scanner::Scanner;
pub use token::{InvalidWordName, Token, WordName};
pub use writer::Writer;
