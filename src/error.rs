// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

/// A position in the parsed text.
///
/// Both values start at 1. Line breaks are counted after CR and CRLF were
/// normalized to LF.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextPos {
    /// A line number.
    pub row: u32,
    /// A column number, in characters.
    pub col: u32,
}

impl TextPos {
    /// Constructs a new `TextPos`.
    #[inline]
    pub fn new(row: u32, col: u32) -> Self {
        TextPos { row, col }
    }
}

impl fmt::Display for TextPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// A kind of a parsing error.
///
/// All kinds share the same [`ParseError`] type and differ only by the message key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// The current character is not allowed at this point of the grammar.
    UnexpectedCharacter,
    /// A specific literal character was required and a different one was found.
    ExpectedCharacter,
    /// A number has no digits or has a malformed exponent.
    FloatFormat,
    /// Trailing data after a complete value.
    EndOfStreamExpected,
    /// The underlying character source failed.
    Io,
}

impl ErrorKind {
    /// Returns the message key used to look up a localized message.
    pub fn key(&self) -> &'static str {
        match self {
            ErrorKind::UnexpectedCharacter => "character.unexpected",
            ErrorKind::ExpectedCharacter => "character.expected",
            ErrorKind::FloatFormat => "float.format",
            ErrorKind::EndOfStreamExpected => "end.of.stream.expected",
            ErrorKind::Io => "io.exception",
        }
    }
}

/// A parsing error.
///
/// Once constructed the error is immutable.
#[derive(Debug)]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
    pos: Option<TextPos>,
    cause: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ParseError {
    /// Creates a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>, pos: Option<TextPos>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            pos,
            cause: None,
        }
    }

    /// Creates a new error that wraps a source error.
    ///
    /// Wrapped errors have no position.
    pub fn with_cause<E>(kind: ErrorKind, message: impl Into<String>, cause: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        ParseError {
            kind,
            message: message.into(),
            pos: None,
            cause: Some(cause.into()),
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message key of the error kind.
    #[inline]
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    /// Returns the formatted, possibly localized, message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the position of the offending character.
    ///
    /// `None` when the error is not tied to a position, like an I/O failure.
    #[inline]
    pub fn pos(&self) -> Option<TextPos> {
        self.pos
    }

    /// Returns the line number or `-1`.
    pub fn line(&self) -> i64 {
        self.pos.map(|p| i64::from(p.row)).unwrap_or(-1)
    }

    /// Returns the column number or `-1`.
    pub fn column(&self) -> i64 {
        self.pos.map(|p| i64::from(p.col)).unwrap_or(-1)
    }

    /// Returns the wrapped source error, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{} at {}", self.message, pos),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.cause {
            Some(ref e) => Some(e.as_ref()),
            None => None,
        }
    }
}

/// An error reporting strategy.
///
/// Every error found by a parser goes through this single method.
/// Returning the error back aborts the parse and makes `parse()` return it.
/// Returning `Ok(())` accepts the error: the parser skips the malformed
/// part of the input and continues.
pub trait ErrorHandler {
    /// Handles an error.
    fn error(&mut self, e: ParseError) -> Result<(), ParseError>;
}

/// The default error handler. Aborts on the first error.
#[derive(Clone, Copy, Default, Debug)]
pub struct AbortOnError;

impl ErrorHandler for AbortOnError {
    #[inline]
    fn error(&mut self, e: ParseError) -> Result<(), ParseError> {
        Err(e)
    }
}

/// An error handler that reports errors as warnings and continues.
#[derive(Clone, Copy, Default, Debug)]
pub struct LogErrors;

impl ErrorHandler for LogErrors {
    fn error(&mut self, e: ParseError) -> Result<(), ParseError> {
        log::warn!("{}.", e);
        Ok(())
    }
}

/// Collects all errors and continues.
impl ErrorHandler for Vec<ParseError> {
    #[inline]
    fn error(&mut self, e: ParseError) -> Result<(), ParseError> {
        self.push(e);
        Ok(())
    }
}

impl<T: ErrorHandler + ?Sized> ErrorHandler for &mut T {
    #[inline]
    fn error(&mut self, e: ParseError) -> Result<(), ParseError> {
        (**self).error(e)
    }
}

impl<T: ErrorHandler + ?Sized> ErrorHandler for Box<T> {
    #[inline]
    fn error(&mut self, e: ParseError) -> Result<(), ParseError> {
        (**self).error(e)
    }
}

/// An error handler backed by a closure.
///
/// # Examples
///
/// ```
/// use svgmicro::{error_handler_fn, Parser, PathParser};
///
/// let mut count = 0;
/// {
///     let mut p = PathParser::new();
///     p.set_error_handler(error_handler_fn(|_| {
///         count += 1;
///         Ok(())
///     }));
///     p.parse("M 10 L 20 20 M 1").unwrap();
/// }
/// assert_eq!(count, 2);
/// ```
pub fn error_handler_fn<F>(f: F) -> FnErrorHandler<F>
where
    F: FnMut(ParseError) -> Result<(), ParseError>,
{
    FnErrorHandler(f)
}

/// See [`error_handler_fn`].
pub struct FnErrorHandler<F>(F);

impl<F> fmt::Debug for FnErrorHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("FnErrorHandler")
    }
}

impl<F> ErrorHandler for FnErrorHandler<F>
where
    F: FnMut(ParseError) -> Result<(), ParseError>,
{
    #[inline]
    fn error(&mut self, e: ParseError) -> Result<(), ParseError> {
        (self.0)(e)
    }
}
