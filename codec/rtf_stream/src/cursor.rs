//! Growable lookahead cursor over a byte source.
//!
//! The cursor keeps an explicit byte array with offset/length bookkeeping:
//! `buf[offset..length]` holds buffered-but-unconsumed data, everything
//! before `offset` has been handed out and is free to overwrite. Filling
//! first tops off unused tail capacity with a single read; once the buffer
//! is physically full the cursor either doubles its capacity or compacts
//! in place, depending on how much of the buffer the consumed prefix
//! occupies (see [`Cursor::peek`] for the exact policy). Memory therefore
//! stays proportional to the live lookahead distance.
//!
//! # End of Stream
//!
//! A source read returning zero bytes marks the source exhausted. That is
//! distinct from [`Cursor::is_eof`], which is only true once every buffered
//! byte has also been consumed.

use std::io::{self, Read};

/// Initial buffer capacity used by [`Cursor::new`].
const INITIAL_CAPACITY: usize = 1024;

/// Growable lookahead cursor over a forward-only byte source.
///
/// The cursor exclusively owns its source for its lifetime; dropping the
/// cursor (or [`Cursor::into_inner`]) releases it. A cursor must not be
/// shared across threads — every fill mutates the buffer in place.
///
/// # Invariant
///
/// `0 <= offset <= length <= buf.len()` at all times. `buf.len()` never
/// shrinks.
pub struct Cursor<R> {
    /// Explicit storage; `buf[offset..length]` is live buffered data.
    buf: Vec<u8>,
    /// Length of the consumed prefix.
    offset: usize,
    /// Length of valid buffered data.
    length: usize,
    /// The source has reported end of stream.
    exhausted: bool,
    /// Absolute stream offset of `buf[offset]` (bytes consumed so far).
    consumed: u64,
    source: R,
}

impl<R: Read> Cursor<R> {
    /// Create a cursor with the default initial capacity (1024 bytes).
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, INITIAL_CAPACITY)
    }

    /// Create a cursor with an explicit initial capacity.
    ///
    /// The capacity only sets the starting point: the buffer doubles on
    /// demand, so scan results never depend on the initial choice.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        assert!(capacity > 0, "cursor capacity must be non-zero");
        Self {
            buf: vec![0; capacity],
            offset: 0,
            length: 0,
            exhausted: false,
            consumed: 0,
            source,
        }
    }

    /// Returns the byte at lookahead `index` without consuming anything.
    ///
    /// Fills the buffer until the index is available or the source is
    /// exhausted. Returns `None` when `index` is at or past the end of the
    /// stream.
    pub fn peek(&mut self, index: usize) -> io::Result<Option<u8>> {
        loop {
            if self.offset + index < self.length {
                return Ok(Some(self.buf[self.offset + index]));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    /// Consume up to `count` bytes and return them as an owned copy.
    ///
    /// Fills until `count` bytes are available or the source ends; fewer
    /// than `count` bytes are returned only at end of stream. `count == 0`
    /// returns an empty vector immediately without touching the source.
    pub fn consume(&mut self, count: usize) -> io::Result<Vec<u8>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.require(count)?;
        let take = count.min(self.length - self.offset);
        let bytes = self.buf[self.offset..self.offset + take].to_vec();
        self.advance(take);
        Ok(bytes)
    }

    /// Skip up to `count` bytes without copying them out.
    ///
    /// Identical bounds and fill semantics to [`Cursor::consume`].
    pub fn discard(&mut self, count: usize) -> io::Result<()> {
        if count == 0 {
            return Ok(());
        }
        self.require(count)?;
        let take = count.min(self.length - self.offset);
        self.advance(take);
        Ok(())
    }

    /// Return up to `length` bytes starting at lookahead `offset` without
    /// moving the cursor.
    ///
    /// Fills only as far as needed to answer. `length == 0` returns an
    /// empty vector immediately.
    ///
    /// # Panics
    ///
    /// Panics when `offset` lands at or beyond the end of the stream —
    /// asking for a window that starts past the data is a caller bug, not
    /// a document condition.
    pub fn span(&mut self, offset: usize, length: usize) -> io::Result<Vec<u8>> {
        if length == 0 {
            return Ok(Vec::new());
        }
        self.require(offset + length)?;
        let available = self.length - self.offset;
        assert!(
            offset < available,
            "span offset {offset} is beyond the end of the stream"
        );
        let take = length.min(available - offset);
        let start = self.offset + offset;
        Ok(self.buf[start..start + take].to_vec())
    }

    /// Consume bytes while `pred` holds, returning the matched prefix.
    ///
    /// Stops at the first mismatch or at end of stream.
    pub fn consume_while(&mut self, pred: impl Fn(u8) -> bool) -> io::Result<Vec<u8>> {
        let mut index = 0;
        while let Some(byte) = self.peek(index)? {
            if !pred(byte) {
                break;
            }
            index += 1;
        }
        self.consume(index)
    }

    /// Consume bytes while `pred` holds, up to `max` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    pub fn consume_while_limited(
        &mut self,
        pred: impl Fn(u8) -> bool,
        max: usize,
    ) -> io::Result<Vec<u8>> {
        assert!(max > 0, "consume_while_limited requires a non-zero limit");
        let mut index = 0;
        while index < max {
            match self.peek(index)? {
                Some(byte) if pred(byte) => index += 1,
                _ => break,
            }
        }
        self.consume(index)
    }

    /// Consume bytes until `pred` matches, returning the unmatched prefix.
    ///
    /// The matching byte is left unconsumed. Consumes everything remaining
    /// if the predicate never matches.
    pub fn consume_until(&mut self, pred: impl Fn(u8) -> bool) -> io::Result<Vec<u8>> {
        self.consume_while(|byte| !pred(byte))
    }

    /// Consume bytes until `delimiter` is seen, returning the prefix.
    ///
    /// Searches the buffered window with `memchr` between fills. The
    /// delimiter is left unconsumed; consumes everything remaining if it
    /// never appears.
    pub fn consume_until_byte(&mut self, delimiter: u8) -> io::Result<Vec<u8>> {
        loop {
            if let Some(found) = memchr::memchr(delimiter, &self.buf[self.offset..self.length]) {
                return self.consume(found);
            }
            if self.exhausted {
                let rest = self.length - self.offset;
                return self.consume(rest);
            }
            self.fill()?;
        }
    }

    /// Consume bytes until `sequence` is found, returning the prefix.
    ///
    /// A straightforward sliding-window match against buffered lookahead;
    /// delimiter sequences are short, so this stays cheap. The sequence is
    /// left unconsumed; consumes everything remaining if it never appears.
    /// An empty `sequence` matches immediately.
    pub fn consume_until_sequence(&mut self, sequence: &[u8]) -> io::Result<Vec<u8>> {
        if sequence.is_empty() {
            return Ok(Vec::new());
        }
        let mut index = 0;
        while self.peek(index)?.is_some() {
            if self.matches_at(index, sequence)? {
                return self.consume(index);
            }
            index += 1;
        }
        self.consume(index)
    }

    /// True only when the source is exhausted and every buffered byte has
    /// been consumed.
    ///
    /// Distinct from "source exhausted but unread bytes remain buffered".
    /// Performs a fill when the buffered window is empty so the answer is
    /// definitive rather than "unknown yet".
    pub fn is_eof(&mut self) -> io::Result<bool> {
        while self.offset == self.length && !self.exhausted {
            self.fill()?;
        }
        Ok(self.exhausted && self.offset >= self.length)
    }

    /// Absolute stream offset of the next unconsumed byte.
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Number of buffered-but-unconsumed bytes.
    pub fn buffered(&self) -> usize {
        self.length - self.offset
    }

    /// Current physical buffer capacity.
    ///
    /// Exposed so callers (and tests) can observe the growth policy;
    /// capacity never shrinks.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Release the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Fill until at least `count` unconsumed bytes are buffered or the
    /// source is exhausted.
    fn require(&mut self, count: usize) -> io::Result<()> {
        while self.offset + count > self.length && !self.exhausted {
            self.fill()?;
        }
        Ok(())
    }

    /// Mark `n` buffered bytes as consumed.
    fn advance(&mut self, n: usize) {
        self.offset += n;
        self.consumed += n as u64;
    }

    /// Read more data from the source.
    ///
    /// Tops off unused tail capacity with one read. When the buffer is
    /// physically full: grow (double) only if the consumed prefix occupies
    /// at most half of current capacity, otherwise compact the unconsumed
    /// bytes to the front without growing. This amortizes copy cost while
    /// keeping memory proportional to live lookahead distance.
    fn fill(&mut self) -> io::Result<()> {
        if self.exhausted {
            return Ok(());
        }

        if self.length < self.buf.len() {
            let read = self.source.read(&mut self.buf[self.length..])?;
            if read == 0 {
                self.exhausted = true;
            }
            self.length += read;
            return Ok(());
        }

        let capacity = self.buf.len();
        if self.offset <= capacity / 2 {
            let mut grown = vec![0; capacity * 2];
            grown[..self.length - self.offset].copy_from_slice(&self.buf[self.offset..self.length]);
            self.buf = grown;
        } else {
            self.buf.copy_within(self.offset..self.length, 0);
        }
        self.length -= self.offset;
        self.offset = 0;

        self.fill()
    }

    /// Whether `sequence` is found at lookahead `index`.
    fn matches_at(&mut self, index: usize, sequence: &[u8]) -> io::Result<bool> {
        for (i, &expected) in sequence.iter().enumerate() {
            match self.peek(index + i)? {
                Some(byte) if byte == expected => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use pretty_assertions::assert_eq;
    use std::io::{self, Read};

    /// Test source that hands out at most `chunk` bytes per read, to
    /// exercise the fill loop against slow or fragmented sources.
    struct Chunked<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Chunked<'_> {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            let take = self.data.len().min(self.chunk).min(out.len());
            out[..take].copy_from_slice(&self.data[..take]);
            self.data = &self.data[take..];
            Ok(take)
        }
    }

    fn cursor(input: &str) -> Cursor<&[u8]> {
        Cursor::new(input.as_bytes())
    }

    // === Peek ===

    #[test]
    fn peek_is_indexed_lookahead() {
        let mut cursor = cursor("Testing");
        assert_eq!(cursor.peek(0).unwrap(), Some(b'T'));
        assert_eq!(cursor.peek(4).unwrap(), Some(b'i'));
    }

    #[test]
    fn peek_past_end_is_none() {
        let mut cursor = cursor("ab");
        assert_eq!(cursor.peek(2).unwrap(), None);
        assert_eq!(cursor.peek(100).unwrap(), None);
        // Earlier indices are still readable afterwards.
        assert_eq!(cursor.peek(0).unwrap(), Some(b'a'));
    }

    #[test]
    fn peek_after_discard_reindexes() {
        let mut cursor = cursor("Testing");
        assert_eq!(cursor.peek(0).unwrap(), Some(b'T'));
        cursor.discard(2).unwrap();
        assert_eq!(cursor.peek(0).unwrap(), Some(b's'));
    }

    // === Consume ===

    #[test]
    fn consume_returns_prefix_and_advances() {
        let mut cursor = cursor("Testing");
        assert_eq!(cursor.consume(4).unwrap(), b"Test");
        assert_eq!(cursor.peek(0).unwrap(), Some(b'i'));
    }

    #[test]
    fn consume_zero_is_empty_without_fill() {
        let mut cursor = cursor("abc");
        assert_eq!(cursor.consume(0).unwrap(), Vec::<u8>::new());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn consume_clamps_at_end_of_stream() {
        let mut cursor = cursor("abc");
        assert_eq!(cursor.consume(10).unwrap(), b"abc");
        assert!(cursor.is_eof().unwrap());
    }

    #[test]
    fn consume_tracks_absolute_position() {
        let mut cursor = cursor("hello world");
        cursor.consume(5).unwrap();
        cursor.discard(1).unwrap();
        assert_eq!(cursor.position(), 6);
        assert_eq!(cursor.peek(0).unwrap(), Some(b'w'));
    }

    // === Span ===

    #[test]
    fn span_reads_without_moving() {
        let mut cursor = cursor("Testing");
        assert_eq!(cursor.span(2, 4).unwrap(), b"stin");
        assert_eq!(cursor.peek(0).unwrap(), Some(b'T'));
    }

    #[test]
    fn span_is_relative_to_cursor() {
        let mut cursor = cursor("This is a test.");
        assert_eq!(cursor.span(5, 4).unwrap(), b"is a");
        assert_eq!(cursor.consume(4).unwrap(), b"This");
        assert_eq!(cursor.span(0, 4).unwrap(), b" is ");
    }

    #[test]
    fn span_across_line_breaks() {
        let mut cursor = cursor("This is a test.\r\nThis is another test.");
        cursor.consume(4).unwrap();
        assert_eq!(cursor.span(5, 15).unwrap(), b" test.\r\nThis is");
    }

    #[test]
    fn span_clamps_length_at_end_of_stream() {
        let mut cursor = cursor("abcdef");
        assert_eq!(cursor.span(4, 10).unwrap(), b"ef");
    }

    #[test]
    #[should_panic(expected = "beyond the end of the stream")]
    fn span_offset_past_end_panics() {
        let mut cursor = cursor("abc");
        let _ = cursor.span(3, 1);
    }

    // === consume_while / consume_until ===

    #[test]
    fn consume_while_stops_at_mismatch() {
        let mut cursor = cursor("This is a test\nrest");
        let text = cursor
            .consume_while(|b| b.is_ascii_alphabetic() || b == b' ')
            .unwrap();
        assert_eq!(text, b"This is a test");
        assert_eq!(cursor.peek(0).unwrap(), Some(b'\n'));
    }

    #[test]
    fn consume_while_limited_stops_at_limit() {
        let mut cursor = cursor("This is a test");
        let text = cursor
            .consume_while_limited(|b| b.is_ascii_alphabetic() || b == b' ', 9)
            .unwrap();
        assert_eq!(text, b"This is a");
    }

    #[test]
    fn consume_while_no_match_consumes_nothing() {
        let mut cursor = cursor("hello");
        assert_eq!(cursor.consume_while(|b| b == b'z').unwrap(), Vec::<u8>::new());
        assert_eq!(cursor.peek(0).unwrap(), Some(b'h'));
    }

    #[test]
    #[should_panic(expected = "non-zero limit")]
    fn consume_while_limited_zero_panics() {
        let mut cursor = cursor("abc");
        let _ = cursor.consume_while_limited(|_| true, 0);
    }

    #[test]
    fn consume_until_leaves_delimiter() {
        let mut cursor = cursor("key=value");
        assert_eq!(cursor.consume_until(|b| b == b'=').unwrap(), b"key");
        assert_eq!(cursor.peek(0).unwrap(), Some(b'='));
    }

    #[test]
    fn consume_until_byte_leaves_delimiter() {
        let mut cursor = cursor("hello world");
        assert_eq!(cursor.consume_until_byte(b' ').unwrap(), b"hello");
        assert_eq!(cursor.peek(0).unwrap(), Some(b' '));
    }

    #[test]
    fn consume_until_byte_takes_everything_when_absent() {
        let mut cursor = cursor("hello");
        assert_eq!(cursor.consume_until_byte(b'z').unwrap(), b"hello");
        assert!(cursor.is_eof().unwrap());
    }

    #[test]
    fn consume_until_byte_at_delimiter_consumes_nothing() {
        let mut cursor = cursor("xhello");
        assert_eq!(cursor.consume_until_byte(b'x').unwrap(), Vec::<u8>::new());
        assert_eq!(cursor.peek(0).unwrap(), Some(b'x'));
    }

    #[test]
    fn consume_until_sequence_stops_before_match() {
        let mut cursor = cursor("This is a test of the emergency broadcast system.");
        assert_eq!(cursor.consume_until_sequence(b"test").unwrap(), b"This is a ");
        assert_eq!(cursor.span(0, 4).unwrap(), b"test");
    }

    #[test]
    fn consume_until_sequence_takes_everything_when_absent() {
        let mut cursor = cursor("abcdef");
        assert_eq!(cursor.consume_until_sequence(b"xyz").unwrap(), b"abcdef");
        assert!(cursor.is_eof().unwrap());
    }

    #[test]
    fn consume_until_empty_sequence_is_empty() {
        let mut cursor = cursor("abc");
        assert_eq!(cursor.consume_until_sequence(b"").unwrap(), Vec::<u8>::new());
        assert_eq!(cursor.peek(0).unwrap(), Some(b'a'));
    }

    // === EOF ===

    #[test]
    fn eof_only_after_all_bytes_consumed() {
        let mut cursor = cursor("This is a test of the emergency broadcast system.");
        assert_eq!(cursor.consume(14).unwrap(), b"This is a test");
        assert!(!cursor.is_eof().unwrap());
        cursor.discard(1).unwrap();
        assert_eq!(cursor.consume(2).unwrap(), b"of");
        assert!(!cursor.is_eof().unwrap());
        assert_eq!(cursor.consume(25).unwrap(), b" the emergency broadcast ");
        assert!(!cursor.is_eof().unwrap());
        assert_eq!(cursor.span(0, 7).unwrap(), b"system.");
        assert!(!cursor.is_eof().unwrap());
        assert_eq!(cursor.consume(7).unwrap(), b"system.");
        assert!(cursor.is_eof().unwrap());
    }

    #[test]
    fn eof_is_stable() {
        let mut cursor = cursor("x");
        cursor.discard(1).unwrap();
        assert!(cursor.is_eof().unwrap());
        assert!(cursor.is_eof().unwrap());
        assert_eq!(cursor.peek(0).unwrap(), None);
        assert_eq!(cursor.consume(1).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn empty_source_is_eof() {
        let mut cursor = cursor("");
        assert!(cursor.is_eof().unwrap());
    }

    // === Growth policy ===

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_capacity_panics() {
        let _ = Cursor::with_capacity("abc".as_bytes(), 0);
    }

    #[test]
    fn grows_when_lookahead_exceeds_capacity() {
        let data = vec![b'a'; 64];
        let mut cursor = Cursor::with_capacity(data.as_slice(), 16);
        assert_eq!(cursor.peek(40).unwrap(), Some(b'a'));
        assert!(cursor.capacity() >= 41);
    }

    #[test]
    fn compacts_instead_of_growing_after_consumption() {
        // 12 of 16 bytes consumed: the prefix occupies more than half of
        // capacity, so the next fill must compact rather than grow.
        let data = vec![b'b'; 64];
        let mut cursor = Cursor::with_capacity(Chunked { data: &data, chunk: 16 }, 16);
        assert_eq!(cursor.peek(15).unwrap(), Some(b'b')); // buffer now full
        cursor.discard(12).unwrap();
        assert_eq!(cursor.peek(10).unwrap(), Some(b'b')); // forces a fill
        assert_eq!(cursor.capacity(), 16);
    }

    #[test]
    fn grows_when_prefix_is_small() {
        let data = vec![b'c'; 64];
        let mut cursor = Cursor::with_capacity(Chunked { data: &data, chunk: 16 }, 16);
        assert_eq!(cursor.peek(15).unwrap(), Some(b'c'));
        cursor.discard(2).unwrap();
        // Only 2 of 16 consumed: doubling is the right trade.
        assert_eq!(cursor.peek(20).unwrap(), Some(b'c'));
        assert_eq!(cursor.capacity(), 32);
    }

    #[test]
    fn chunked_source_fills_until_available() {
        let data: Vec<u8> = (0..=255).collect();
        let mut cursor = Cursor::new(Chunked { data: &data, chunk: 3 });
        assert_eq!(cursor.peek(200).unwrap(), Some(200));
        assert_eq!(cursor.consume(256).unwrap(), data);
        assert!(cursor.is_eof().unwrap());
    }

    #[test]
    fn results_do_not_depend_on_initial_capacity() {
        let text = "tattoo pre- cartel alcohol fluidity long-chain hydrocarbons \
                    human woman numinous carbon";
        let mut small = Cursor::with_capacity(text.as_bytes(), 16);
        let mut large = Cursor::with_capacity(text.as_bytes(), 1024);
        assert_eq!(small.consume(24).unwrap(), large.consume(24).unwrap());
        assert_eq!(small.span(3, 40).unwrap(), large.span(3, 40).unwrap());
        assert_eq!(
            small.consume_until_byte(b'h').unwrap(),
            large.consume_until_byte(b'h').unwrap()
        );
        assert_eq!(small.consume(1000).unwrap(), large.consume(1000).unwrap());
        assert!(small.is_eof().unwrap());
        assert!(large.is_eof().unwrap());
    }

    #[test]
    fn multibyte_content_is_byte_transparent() {
        let text = "মহিলার numinous কার্বন";
        let mut cursor = Cursor::with_capacity(text.as_bytes(), 16);
        assert_eq!(cursor.consume(text.len()).unwrap(), text.as_bytes());
        assert!(cursor.is_eof().unwrap());
    }

    // === Source release ===

    #[test]
    fn into_inner_returns_the_source() {
        let mut cursor = cursor("abc");
        cursor.discard(1).unwrap();
        let rest = cursor.into_inner();
        assert!(rest.is_empty()); // the slice source was drained into the buffer
    }

    // === Property tests ===

    mod proptest_capacity {
        use super::super::Cursor;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn consume_agrees_across_capacities(
                data in proptest::collection::vec(any::<u8>(), 0..512),
                capacity in 1usize..64,
                steps in proptest::collection::vec(1usize..32, 1..16),
            ) {
                let mut subject = Cursor::with_capacity(data.as_slice(), capacity);
                let mut reference = Cursor::with_capacity(data.as_slice(), 1024);
                for step in steps {
                    prop_assert_eq!(
                        subject.consume(step).unwrap(),
                        reference.consume(step).unwrap()
                    );
                }
                prop_assert_eq!(subject.is_eof().unwrap(), reference.is_eof().unwrap());
            }

            #[test]
            fn peek_matches_source_bytes(
                data in proptest::collection::vec(any::<u8>(), 0..256),
                capacity in 1usize..64,
            ) {
                let mut cursor = Cursor::with_capacity(data.as_slice(), capacity);
                for (i, &expected) in data.iter().enumerate() {
                    prop_assert_eq!(cursor.peek(i).unwrap(), Some(expected));
                }
                prop_assert_eq!(cursor.peek(data.len()).unwrap(), None);
            }
        }
    }
}
