//! Buffered lookahead over a forward-only byte source.
//!
//! A [`Cursor`] wraps any [`std::io::Read`] source and presents it as a
//! randomly peekable, consumed-on-demand byte sequence. The grammar layer
//! above can peek arbitrarily far ahead without ever loading the whole
//! source into memory: the internal buffer grows with the maximum lookahead
//! distance actually used, not with the size of the document.
//!
//! Everything is synchronous and pull-based. A fill may block on the
//! underlying source; cancellation, if needed, belongs to the source
//! implementation supplied by the caller.

mod cursor;

pub use cursor::Cursor;
