//! Byte-at-a-time input cursor with position tracking.
//!
//! [`Cursor`] keeps a single symbol of lookahead over any [`BufRead`]
//! source. The tracked [`TextPosition`] advances as each symbol is loaded,
//! so it always describes the symbol currently held by the cursor.
//! [`Cursor::match_token`] gives the parser bounded keyword lookahead with
//! full rollback when nothing matches.

use std::collections::VecDeque;
use std::io::{self, BufRead, ErrorKind};

/// Line and column of the current symbol, both starting at zero.
///
/// A line feed resets the column and bumps the line; every other byte bumps
/// the column. The first symbol of a document therefore sits at column 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPosition {
    pub line: u32,
    pub column: u32,
}

impl TextPosition {
    fn add(&mut self, byte: u8) {
        if byte == b'\n' {
            self.column = 0;
            self.line += 1;
        } else {
            self.column += 1;
        }
    }
}

/// Single-symbol lookahead cursor over a buffered reader.
pub struct Cursor<R: BufRead> {
    reader: R,
    /// Bytes returned to the stream by a failed `match_token`.
    pushback: VecDeque<u8>,
    current: Option<u8>,
    position: TextPosition,
}

impl<R: BufRead> Cursor<R> {
    /// Wraps a reader and loads the first symbol.
    pub fn new(reader: R) -> io::Result<Self> {
        let mut cursor = Self {
            reader,
            pushback: VecDeque::new(),
            current: None,
            position: TextPosition::default(),
        };
        cursor.load()?;
        Ok(cursor)
    }

    /// True while a symbol is available.
    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    /// The current symbol, or 0 once the input is exhausted.
    pub fn symbol(&self) -> u8 {
        self.current.unwrap_or(0)
    }

    /// Whether the current symbol is whitespace: tab, line feed, or space.
    /// Carriage return is not whitespace here; the grammar rejects it.
    pub fn is_space(&self) -> bool {
        matches!(self.current, Some(b'\t' | b'\n' | b' '))
    }

    /// Position of the current symbol.
    pub fn position(&self) -> TextPosition {
        self.position
    }

    /// Moves to the next symbol. Returns false at end of input; read
    /// failures propagate instead of masquerading as end of input.
    pub fn advance(&mut self) -> io::Result<bool> {
        if self.current.is_none() {
            return Ok(false);
        }
        self.load()
    }

    /// Skips over whitespace, stopping on the first non-space symbol.
    pub fn skip_spaces(&mut self) -> io::Result<()> {
        while self.is_space() {
            self.advance()?;
        }
        Ok(())
    }

    /// Tries to read one of `candidates` starting at the current symbol.
    ///
    /// With an `include` predicate, symbols are taken greedily while the
    /// predicate holds. Without one, leading whitespace is skipped and the
    /// token runs to the next whitespace or end of input.
    ///
    /// Returns the index of the matching candidate, leaving the cursor just
    /// past the token. On no match the cursor, consumed bytes, and position
    /// are all restored and `candidates.len()` is returned. An empty
    /// candidate list trivially matches at index 0.
    pub fn match_token(
        &mut self,
        candidates: &[&str],
        include: Option<&dyn Fn(u8) -> bool>,
    ) -> io::Result<usize> {
        if candidates.is_empty() {
            return Ok(0);
        }

        let origin_current = self.current;
        let origin_position = self.position;
        let mut consumed: Vec<u8> = Vec::new();

        if self.valid() {
            let mut buffer: Vec<u8> = Vec::new();
            match include {
                Some(predicate) => {
                    while self.valid() && predicate(self.symbol()) {
                        buffer.push(self.symbol());
                        if self.advance()? {
                            consumed.push(self.symbol());
                        }
                    }
                }
                None => {
                    while self.is_space() {
                        if self.advance()? {
                            consumed.push(self.symbol());
                        }
                    }
                    while self.valid() && !self.is_space() {
                        buffer.push(self.symbol());
                        if self.advance()? {
                            consumed.push(self.symbol());
                        }
                    }
                }
            }

            if let Ok(text) = std::str::from_utf8(&buffer) {
                if let Some(index) = candidates.iter().position(|c| *c == text) {
                    return Ok(index);
                }
            }
        }

        for byte in consumed.into_iter().rev() {
            self.pushback.push_front(byte);
        }
        self.current = origin_current;
        self.position = origin_position;
        Ok(candidates.len())
    }

    fn load(&mut self) -> io::Result<bool> {
        if let Some(byte) = self.pushback.pop_front() {
            self.position.add(byte);
            self.current = Some(byte);
            return Ok(true);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => {
                    self.current = None;
                    return Ok(false);
                }
                Ok(_) => {
                    self.position.add(buf[0]);
                    self.current = Some(buf[0]);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.current = None;
                    return Err(e);
                }
            }
        }
    }
}
