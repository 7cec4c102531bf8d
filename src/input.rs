// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::{self, Read};

use crate::TextPos;

/// A source of characters.
pub trait CharSource {
    /// Returns the next character or `None` at the end of input.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl CharSource for std::str::Chars<'_> {
    #[inline]
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

const CHUNK_SIZE: usize = 1024;

/// A UTF-8 decoding character source on top of [`Read`].
///
/// Bytes are read in chunks into an owned buffer that grows when a
/// character is split between two reads.
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    /// Creates a new source.
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader,
            buf: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        self.buf.drain(..self.pos);
        self.pos = 0;

        let len = self.buf.len();
        self.buf.resize(len + CHUNK_SIZE, 0);
        let n = loop {
            match self.reader.read(&mut self.buf[len..]) {
                Ok(n) => break n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.buf.truncate(len);
                    return Err(e);
                }
            }
        };

        self.buf.truncate(len + n);
        if n == 0 {
            self.eof = true;
        }

        Ok(())
    }
}

impl<R> std::fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ReaderSource")
            .field("buffered", &(self.buf.len() - self.pos))
            .field("eof", &self.eof)
            .finish()
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            let avail = &self.buf[self.pos..];
            if let Some(&first) = avail.first() {
                let width = utf8_width(first);
                if width == 0 {
                    return Err(invalid_utf8());
                }

                if avail.len() >= width {
                    let c = std::str::from_utf8(&avail[..width])
                        .map_err(|_| invalid_utf8())?
                        .chars()
                        .next();
                    self.pos += width;
                    return Ok(c);
                }
            }

            if self.eof {
                if avail.is_empty() {
                    return Ok(None);
                } else {
                    return Err(invalid_utf8());
                }
            }

            self.fill()?;
        }
    }
}

fn utf8_width(b: u8) -> usize {
    match b {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}

/// A character stream with line and column tracking.
///
/// CR and CRLF are normalized to LF.
/// After the end of input or a read failure only `None` is returned.
pub struct Input<'a> {
    source: Box<dyn CharSource + 'a>,
    lookahead: Option<Option<char>>,
    row: u32,
    col: u32,
    newline: bool,
    done: bool,
}

impl<'a> From<&'a str> for Input<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Input::new(text.chars())
    }
}

impl<'a> Input<'a> {
    /// Creates an input from any character source.
    pub fn new<S: CharSource + 'a>(source: S) -> Self {
        Input {
            source: Box::new(source),
            lookahead: None,
            row: 1,
            col: 0,
            newline: false,
            done: false,
        }
    }

    /// Creates an input from a UTF-8 byte stream.
    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        Input::new(ReaderSource::new(reader))
    }

    /// Returns the position of the most recently read character.
    ///
    /// At the end of input, this is the position right after the last character.
    #[inline]
    pub fn pos(&self) -> TextPos {
        TextPos::new(self.row, self.col)
    }

    /// Reads the next character.
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        if self.done {
            return Ok(None);
        }

        let c = match self.read_normalized() {
            Ok(c) => c,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        if self.newline {
            self.row += 1;
            self.col = 0;
            self.newline = false;
        }

        self.col += 1;
        match c {
            Some('\n') => self.newline = true,
            None => self.done = true,
            _ => {}
        }

        Ok(c)
    }

    fn read_normalized(&mut self) -> io::Result<Option<char>> {
        let c = match self.lookahead.take() {
            Some(c) => c,
            None => self.source.next_char()?,
        };

        if c == Some('\r') {
            let next = self.source.next_char()?;
            if next != Some('\n') {
                self.lookahead = Some(next);
            }

            return Ok(Some('\n'));
        }

        Ok(c)
    }
}

impl std::fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Input")
            .field("pos", &self.pos())
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(mut input: Input) -> Vec<(char, u32, u32)> {
        let mut list = Vec::new();
        while let Some(c) = input.next_char().unwrap() {
            let pos = input.pos();
            list.push((c, pos.row, pos.col));
        }
        list
    }

    #[test]
    fn positions() {
        assert_eq!(collect(Input::from("ab\ncd")), vec![
            ('a', 1, 1), ('b', 1, 2), ('\n', 1, 3), ('c', 2, 1), ('d', 2, 2),
        ]);
    }

    #[test]
    fn newlines_are_normalized() {
        assert_eq!(collect(Input::from("a\r\nb\rc")), vec![
            ('a', 1, 1), ('\n', 1, 2), ('b', 2, 1), ('\n', 2, 2), ('c', 3, 1),
        ]);
    }

    #[test]
    fn end_position() {
        let mut input = Input::from("ab");
        while input.next_char().unwrap().is_some() {}
        assert_eq!(input.pos(), TextPos::new(1, 3));
        // Stays at the end.
        assert_eq!(input.next_char().unwrap(), None);
        assert_eq!(input.pos(), TextPos::new(1, 3));
    }

    #[test]
    fn reader_multibyte() {
        let text = "é€𝄞x".repeat(500);
        let mut input = Input::from_reader(text.as_bytes());
        let mut s = String::new();
        while let Some(c) = input.next_char().unwrap() {
            s.push(c);
        }
        assert_eq!(s, text);
    }

    #[test]
    fn reader_invalid_utf8() {
        let data: &[u8] = &[b'a', 0xFF, b'b'];
        let mut input = Input::from_reader(data);
        assert_eq!(input.next_char().unwrap(), Some('a'));
        assert_eq!(input.next_char().unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(input.next_char().unwrap(), None);
    }

    #[test]
    fn reader_truncated_utf8() {
        let data: &[u8] = &[b'a', 0xE2, 0x82];
        let mut input = Input::from_reader(data);
        assert_eq!(input.next_char().unwrap(), Some('a'));
        assert!(input.next_char().is_err());
    }
}
