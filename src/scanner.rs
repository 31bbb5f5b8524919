//! A hand-rolled cursor over TOML source text.
//!
//! `Scanner` holds the entire input and a byte offset into it, advancing on
//! request and tracking line/column for error reporting. It is deliberately
//! not a combinator: the decoder's structural rules (duplicate keys, table
//! redefinition, array homogeneity) need to inspect and backtrack over
//! already-scanned text in ways that don't fit a single forward pass.
//!
//! Positions are byte offsets, not codepoint offsets — TOML source is valid
//! UTF-8, and indexing by byte lets every other method stay a plain slice
//! operation.

use alloc::string::String;

use crate::error::DecodeError;

/// A cursor over `&str` source text with line/column tracking.
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'i> {
    input: &'i str,
    index: usize,
    line: usize,
    col: usize,
}

impl<'i> Scanner<'i> {
    pub(crate) fn new(input: &'i str) -> Self {
        Self {
            input,
            index: 0,
            line: 1,
            col: 0,
        }
    }

    /// `true` if the given literal occurs at the cursor.
    pub(crate) fn at_literal(&self, s: &str) -> bool {
        self.rest().as_bytes().starts_with(s.as_bytes())
    }

    /// `true` if the cursor has reached the end of input.
    pub(crate) fn at_end(&self) -> bool {
        self.index >= self.input.len()
    }

    /// The remaining, unscanned input.
    pub(crate) fn rest(&self) -> &'i str {
        &self.input[self.index..]
    }

    /// The number of bytes remaining.
    pub(crate) fn remaining_len(&self) -> usize {
        self.input.len() - self.index
    }

    /// The byte offset of the cursor, for use with [`Scanner::backtrack`].
    pub(crate) fn position(&self) -> usize {
        self.index
    }

    /// The next byte at the cursor, if any.
    pub(crate) fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    /// Advance past `n` bytes, returning the text advanced over.
    ///
    /// Panics if `n` does not land on a codepoint boundary; callers only
    /// ever pass lengths measured from this same input (e.g. from a prior
    /// `find`/tokenizer call), so this is an invariant, not a user error.
    pub(crate) fn advance(&mut self, n: usize) -> &'i str {
        let d = &self.input[self.index..self.index + n];
        let newlines = d.bytes().filter(|&b| b == b'\n').count();
        self.line += newlines;
        if newlines > 0 {
            let last_nl = d.rfind('\n').expect("newlines > 0");
            self.col = d[last_nl + 1..].chars().count();
        } else {
            self.col += d.chars().count();
        }
        self.index += n;
        d
    }

    /// Advance over a run of codepoints satisfying `pred`, returning the
    /// text advanced over.
    pub(crate) fn advance_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'i str {
        let mut n = 0;
        for c in self.rest().chars() {
            if pred(c) {
                n += c.len_utf8();
            } else {
                break;
            }
        }
        self.advance(n)
    }

    /// Advance through and including the next occurrence of `needle`. If
    /// `needle` does not occur again, advances to the end of input.
    pub(crate) fn advance_until(&mut self, needle: &str) -> &'i str {
        let n = match self.rest().find(needle) {
            Some(i) => i + needle.len(),
            None => self.remaining_len(),
        };
        self.advance(n)
    }

    /// Move the cursor back by `n` bytes, recomputing line/column from
    /// scratch for the rewound position.
    pub(crate) fn backtrack(&mut self, n: usize) {
        let target = self.index.saturating_sub(n);
        self.index = target;
        let consumed = &self.input[..target];
        self.line = 1 + consumed.bytes().filter(|&b| b == b'\n').count();
        let last_nl = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.col = consumed[last_nl..].chars().count();
    }

    /// Build a [`DecodeError`] positioned at the cursor.
    pub(crate) fn error(&self, message: impl Into<String>) -> DecodeError {
        DecodeError::new(message, self.line, self.col)
    }
}
