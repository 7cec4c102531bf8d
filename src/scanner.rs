// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use std::io::{self, Read};

use crate::messages::Found;
use crate::{AbortOnError, ErrorHandler, ErrorKind, Input, Localizer, ParseError};

/// Why a grammar rule stopped early.
#[derive(Debug)]
pub(crate) enum Abort {
    /// The error handler rejected an error. The whole parse stops.
    Fatal(ParseError),
    /// The error handler accepted an error. The caller has to skip the malformed part.
    Recover,
}

pub(crate) type Step<T = ()> = Result<T, Abort>;

pub(crate) trait StepExt<T> {
    /// Turns an accepted error into `None`, keeping fatal ones.
    fn recoverable(self) -> Step<Option<T>>;
}

impl<T> StepExt<T> for Step<T> {
    #[inline]
    fn recoverable(self) -> Step<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(Abort::Recover) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Character classes used by the grammars.
pub(crate) trait CharExt {
    /// `[ \t\r\n]`
    fn is_svg_space(&self) -> bool;

    /// Checks that a character can start a number.
    fn is_number_start(&self) -> bool;

    /// Checks that a character can start an XML name.
    fn is_name_start(&self) -> bool;

    /// Checks that a character can be a part of an XML name.
    fn is_name_char(&self) -> bool;
}

impl CharExt for char {
    #[inline]
    fn is_svg_space(&self) -> bool {
        matches!(*self, ' ' | '\t' | '\r' | '\n')
    }

    #[inline]
    fn is_number_start(&self) -> bool {
        matches!(*self, '0'..='9' | '.' | '-' | '+')
    }

    fn is_name_start(&self) -> bool {
        matches!(*self,
            ':' | 'A'..='Z' | '_' | 'a'..='z'
            | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}'
        )
    }

    fn is_name_char(&self) -> bool {
        self.is_name_start()
            || matches!(*self,
                '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
            )
    }
}

/// A character cursor shared by all grammars.
///
/// Holds a single character of lookahead. `None` means the end of input.
pub(crate) struct Scanner<'a> {
    input: Input<'a>,
    current: Option<char>,
    errors: &'a mut dyn ErrorHandler,
    messages: &'a Localizer,
    io_error: Option<io::Error>,
}

impl<'a> Scanner<'a> {
    pub fn new(
        input: Input<'a>,
        errors: &'a mut dyn ErrorHandler,
        messages: &'a Localizer,
    ) -> Self {
        let mut s = Scanner {
            input,
            current: None,
            errors,
            messages,
            io_error: None,
        };
        s.read();
        s
    }

    #[inline]
    pub fn current(&self) -> Option<char> {
        self.current
    }

    #[inline]
    pub fn is_curr(&self, c: char) -> bool {
        self.current == Some(c)
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Advances to the next character.
    ///
    /// A read failure is remembered and the input is treated as ended.
    pub fn read(&mut self) {
        self.current = match self.input.next_char() {
            Ok(c) => c,
            Err(e) => {
                self.io_error = Some(e);
                None
            }
        };
    }

    pub fn skip_spaces(&mut self) {
        while let Some(c) = self.current {
            if !c.is_svg_space() {
                break;
            }

            self.read();
        }
    }

    /// Skips a list separator: spaces, an optional comma, spaces.
    ///
    /// Returns `true` when a comma was skipped.
    pub fn skip_comma_spaces(&mut self) -> bool {
        self.skip_spaces();
        if self.is_curr(',') {
            self.read();
            self.skip_spaces();
            return true;
        }

        false
    }

    /// Skips characters until `f` returns `true` or the input ends.
    pub fn skip_until<F: Fn(char) -> bool>(&mut self, f: F) {
        let start = self.input.pos();
        while let Some(c) = self.current {
            if f(c) {
                break;
            }

            self.read();
        }

        log::debug!("Skipped malformed data from {} to {}.", start, self.input.pos());
    }

    /// Consumes a required character.
    pub fn expect(&mut self, c: char) -> Step {
        if self.is_curr(c) {
            self.read();
            Ok(())
        } else {
            let found = Found(self.current);
            Err(self.error(ErrorKind::ExpectedCharacter, &[&c, &found]))
        }
    }

    /// Consumes a character if it's the current one.
    #[inline]
    pub fn consume(&mut self, c: char) -> bool {
        if self.is_curr(c) {
            self.read();
            true
        } else {
            false
        }
    }

    /// Reads an XML name.
    ///
    /// The current character has to be a name start character.
    pub fn name(&mut self) -> Step<String> {
        match self.current {
            Some(c) if c.is_name_start() => {
                let mut name = String::new();
                self.name_chars(&mut name);
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Appends name characters to `buf`.
    pub fn name_chars(&mut self, buf: &mut String) {
        while let Some(c) = self.current {
            if !c.is_name_char() {
                break;
            }

            buf.push(c);
            self.read();
        }
    }

    /// Matches one of the keywords, character by character.
    ///
    /// The longest keyword wins. Nothing is consumed twice: on a mismatch
    /// the already matched prefix is lost and the error points to the first
    /// unexpected character.
    pub fn keyword<T: Copy>(&mut self, words: &[(&str, T)]) -> Step<T> {
        let mut prefix = String::new();
        while let Some(c) = self.current {
            let len = prefix.len();
            let extends = words.iter().any(|(w, _)| {
                w.len() > len && w.starts_with(prefix.as_str()) && w[len..].starts_with(c)
            });

            if !extends {
                break;
            }

            prefix.push(c);
            self.read();
        }

        if let Some((_, v)) = words.iter().find(|(w, _)| *w == prefix) {
            return Ok(*v);
        }

        let len = prefix.len();
        let mut expected: Vec<char> = words
            .iter()
            .filter(|(w, _)| w.len() > len && w.starts_with(prefix.as_str()))
            .filter_map(|(w, _)| w[len..].chars().next())
            .collect();
        expected.sort_unstable();
        expected.dedup();

        let found = Found(self.current);
        match *expected.as_slice() {
            [c] => Err(self.error(ErrorKind::ExpectedCharacter, &[&c, &found])),
            _ => Err(self.error(ErrorKind::UnexpectedCharacter, &[&found])),
        }
    }

    /// Reports an unexpected current character.
    pub fn unexpected(&mut self) -> Abort {
        let found = Found(self.current);
        self.error(ErrorKind::UnexpectedCharacter, &[&found])
    }

    /// Reports trailing data when the input is not at its end.
    ///
    /// On recovery the rest of the input is skipped.
    pub fn expect_end(&mut self) -> Step {
        if self.at_end() {
            return Ok(());
        }

        let found = Found(self.current);
        match self.error(ErrorKind::EndOfStreamExpected, &[&found]) {
            Abort::Recover => {
                self.skip_until(|_| false);
                Ok(())
            }
            e => Err(e),
        }
    }

    /// Builds an error at the current position and passes it to the error handler.
    ///
    /// A pending read failure takes priority, since the grammar error
    /// is most likely its consequence.
    pub fn error(&mut self, kind: ErrorKind, args: &[&dyn Display]) -> Abort {
        let e = match self.io_error.take() {
            Some(io) => self.io_to_error(io),
            None => {
                let message = self.messages.format(kind.key(), args);
                ParseError::new(kind, message, Some(self.input.pos()))
            }
        };

        match self.errors.error(e) {
            Ok(()) => Abort::Recover,
            Err(e) => Abort::Fatal(e),
        }
    }

    fn io_to_error(&self, e: io::Error) -> ParseError {
        let message = self.messages.format(ErrorKind::Io.key(), &[&e]);
        ParseError::with_cause(ErrorKind::Io, message, e)
    }

    /// Converts the outcome of a grammar into the `parse()` result.
    pub fn finish(mut self, res: Step) -> Result<(), ParseError> {
        match res {
            Ok(()) | Err(Abort::Recover) => {
                if let Some(io) = self.io_error.take() {
                    let e = self.io_to_error(io);
                    self.errors.error(e)?;
                }

                Ok(())
            }
            Err(Abort::Fatal(e)) => Err(e),
        }
    }
}

/// Settings shared by all parsers: the error handler and the message catalog.
pub struct ParserBase<'e> {
    errors: Box<dyn ErrorHandler + 'e>,
    messages: Localizer,
}

impl Default for ParserBase<'_> {
    fn default() -> Self {
        ParserBase {
            errors: Box::new(AbortOnError),
            messages: Localizer::default(),
        }
    }
}

impl std::fmt::Debug for ParserBase<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ParserBase")
            .field("messages", &self.messages)
            .finish()
    }
}

impl<'e> ParserBase<'e> {
    pub(crate) fn scanner<'a>(&'a mut self, input: Input<'a>) -> Scanner<'a> {
        Scanner::new(input, &mut *self.errors, &self.messages)
    }

    /// Returns the message catalog.
    pub fn messages(&self) -> &Localizer {
        &self.messages
    }

    /// Returns the mutable message catalog.
    pub fn messages_mut(&mut self) -> &mut Localizer {
        &mut self.messages
    }
}

/// Methods shared by all parsers.
pub trait Parser<'e> {
    /// Returns the shared parser settings.
    fn base(&self) -> &ParserBase<'e>;

    /// Returns the mutable shared parser settings.
    fn base_mut(&mut self) -> &mut ParserBase<'e>;

    /// Parses a character stream.
    ///
    /// # Errors
    ///
    /// Returns the first error rejected by the error handler.
    /// With the default handler that is the first error.
    fn parse_input(&mut self, input: Input) -> Result<(), ParseError>;

    /// Parses a string.
    fn parse(&mut self, text: &str) -> Result<(), ParseError> {
        self.parse_input(Input::from(text))
    }

    /// Parses a UTF-8 byte stream.
    fn parse_reader<R: Read>(&mut self, reader: R) -> Result<(), ParseError>
    where
        Self: Sized,
    {
        self.parse_input(Input::from_reader(reader))
    }

    /// Replaces the error handler.
    ///
    /// The default one is [`AbortOnError`].
    fn set_error_handler<E: ErrorHandler + 'e>(&mut self, handler: E)
    where
        Self: Sized,
    {
        self.base_mut().errors = Box::new(handler);
    }

    /// Returns the locale used for error messages.
    fn locale<'a>(&'a self) -> &'a str
    where
        'e: 'a,
    {
        self.base().messages.locale()
    }

    /// Sets the locale used for error messages.
    fn set_locale(&mut self, locale: &str) {
        self.base_mut().messages.set_locale(locale);
    }

    /// Registers a localized message template.
    fn register_message(&mut self, locale: &str, key: &str, template: &str) {
        self.base_mut().messages.register(locale, key, template);
    }

    /// Formats a message in the current locale.
    fn format_message(&self, key: &str, args: &[&dyn Display]) -> String {
        self.base().messages.format(key, args)
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum Word { Min, Ms, S, H }

    const WORDS: &[(&str, Word)] = &[
        ("min", Word::Min), ("ms", Word::Ms), ("s", Word::S), ("h", Word::H),
    ];

    macro_rules! test_kw {
        ($name:ident, $text:expr, $result:expr, $rest:expr) => (
            #[test]
            fn $name() {
                let mut errors = AbortOnError;
                let messages = Localizer::new();
                let mut s = Scanner::new(Input::from($text), &mut errors, &messages);
                assert_eq!(s.keyword(WORDS).unwrap(), $result);
                assert_eq!(s.current(), $rest);
            }
        )
    }

    test_kw!(kw_1, "min", Word::Min, None);
    test_kw!(kw_2, "ms", Word::Ms, None);
    test_kw!(kw_3, "s ", Word::S, Some(' '));
    test_kw!(kw_4, "h1", Word::H, Some('1'));

    fn keyword_error(text: &str) -> ParseError {
        let mut errors = AbortOnError;
        let messages = Localizer::new();
        let mut s = Scanner::new(Input::from(text), &mut errors, &messages);
        match s.keyword(WORDS) {
            Err(Abort::Fatal(e)) => e,
            _ => panic!("an error expected"),
        }
    }

    #[test]
    fn kw_expected() {
        let e = keyword_error("mix");
        assert_eq!(e.kind(), ErrorKind::ExpectedCharacter);
        assert_eq!(e.to_string(), "expected 'n' instead of 'x' at 1:3");
    }

    #[test]
    fn kw_unexpected() {
        let e = keyword_error("mq");
        assert_eq!(e.kind(), ErrorKind::UnexpectedCharacter);
        assert_eq!(e.to_string(), "unexpected 'q' at 1:2");
    }

    #[test]
    fn comma_spaces() {
        let mut errors = AbortOnError;
        let messages = Localizer::new();
        let mut s = Scanner::new(Input::from(" \t, ,"), &mut errors, &messages);
        s.skip_comma_spaces();
        assert_eq!(s.current(), Some(','));
    }

    #[test]
    fn recover_and_skip() {
        let mut errors: Vec<ParseError> = Vec::new();
        let messages = Localizer::new();
        {
            let mut s = Scanner::new(Input::from("ab;c"), &mut errors, &messages);
            assert!(matches!(s.unexpected(), Abort::Recover));
            s.skip_until(|c| c == ';');
            assert_eq!(s.current(), Some(';'));
            assert!(s.expect_end().is_ok());
            assert!(s.at_end());
        }
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].kind(), ErrorKind::EndOfStreamExpected);
    }

    #[test]
    fn locale_accessors() {
        let mut p = crate::PathParser::new();
        assert_eq!(p.locale(), "en");
        p.set_locale("fr_CA");
        assert_eq!(p.locale(), "fr-CA");
        assert_eq!(p.format_message("character.unexpected", &[&"x"]), "unexpected x");
    }

    #[test]
    fn names() {
        assert!('_'.is_name_start());
        assert!('é'.is_name_start());
        assert!(!'1'.is_name_start());
        assert!('1'.is_name_char());
        assert!('-'.is_name_char());
        assert!(!'('.is_name_char());
    }
}
