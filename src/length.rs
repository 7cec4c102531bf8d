// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use crate::number::{scan_number, Exponent, FontUnit};
use crate::scanner::{CharExt, Scanner, Step, StepExt};
use crate::{DefaultHandler, ParseError, Parser, ParserBase};

/// List of all SVG length units.
///
/// `None` is never reported as an event, it only marks a unitless [`Length`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum LengthUnit {
    None,
    Em,
    Ex,
    Px,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
    Percent,
}

const UNITS: &[(&str, LengthUnit)] = &[
    ("em", LengthUnit::Em),
    ("ex", LengthUnit::Ex),
    ("px", LengthUnit::Px),
    ("in", LengthUnit::In),
    ("cm", LengthUnit::Cm),
    ("mm", LengthUnit::Mm),
    ("pt", LengthUnit::Pt),
    ("pc", LengthUnit::Pc),
];

/// A [`<length>`] events receiver.
///
/// [`<length>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeLength
pub trait LengthHandler {
    /// Called before a length.
    fn start_length(&mut self) {}

    /// Called with the numeric part of a length.
    fn length_value(&mut self, _value: f32) {}

    /// Called after the value when a unit is present.
    fn length_unit(&mut self, _unit: LengthUnit) {}

    /// Called after a length.
    fn end_length(&mut self) {}
}

/// A [`<list-of-lengths>`] events receiver.
///
/// Each element is reported through the [`LengthHandler`] methods.
///
/// [`<list-of-lengths>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeLengths
pub trait LengthListHandler: LengthHandler {
    /// Called once before the first length.
    fn start_length_list(&mut self) {}

    /// Called once after the last length.
    fn end_length_list(&mut self) {}
}

impl LengthHandler for DefaultHandler {}
impl LengthListHandler for DefaultHandler {}

/// Lengths are appended.
impl LengthHandler for Vec<Length> {
    fn length_value(&mut self, value: f32) {
        self.push(Length::new_number(f64::from(value)));
    }

    fn length_unit(&mut self, unit: LengthUnit) {
        if let Some(last) = self.last_mut() {
            last.unit = unit;
        }
    }
}

impl LengthListHandler for Vec<Length> {
    fn start_length_list(&mut self) {
        self.clear();
    }
}

impl<T: LengthHandler + ?Sized> LengthHandler for &mut T {
    fn start_length(&mut self) {
        (**self).start_length()
    }

    fn length_value(&mut self, value: f32) {
        (**self).length_value(value)
    }

    fn length_unit(&mut self, unit: LengthUnit) {
        (**self).length_unit(unit)
    }

    fn end_length(&mut self) {
        (**self).end_length()
    }
}

impl<T: LengthListHandler + ?Sized> LengthListHandler for &mut T {
    fn start_length_list(&mut self) {
        (**self).start_length_list()
    }

    fn end_length_list(&mut self) {
        (**self).end_length_list()
    }
}

/// A [`<length>`] parser.
///
/// Surrounding whitespace is allowed. Units are case-sensitive.
///
/// # Examples
///
/// ```
/// use svgmicro::{Length, LengthParser, LengthUnit, Parser};
///
/// let mut p = LengthParser::with_handler(Vec::new());
/// p.parse("5px").unwrap();
/// assert_eq!(p.handler(), &[Length::new(5.0, LengthUnit::Px)]);
/// ```
///
/// [`<length>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeLength
#[derive(Debug)]
pub struct LengthParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(LengthParser, LengthHandler, parse_length);

fn parse_length<H: LengthHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_length();
    s.skip_spaces();
    if length(s, h).recoverable()?.is_none() {
        s.skip_until(|_| false);
    }

    s.skip_spaces();
    s.expect_end()?;
    h.end_length();
    Ok(())
}

/// A [`<list-of-lengths>`] parser.
///
/// # Recovery
///
/// A malformed element is skipped up to the next separator.
/// Its `end_length` event is still reported.
///
/// [`<list-of-lengths>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeLengths
#[derive(Debug)]
pub struct LengthListParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(LengthListParser, LengthListHandler, parse_length_list);

fn parse_length_list<H: LengthListHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_length_list();
    s.skip_spaces();

    while !s.at_end() {
        h.start_length();
        if length(s, h).recoverable()?.is_none() {
            s.skip_until(|c| c.is_svg_space() || c == ',');
        }
        h.end_length();

        s.skip_comma_spaces();
    }

    h.end_length_list();
    Ok(())
}

/// Parses a number with an optional unit.
fn length<H: LengthHandler + ?Sized>(s: &mut Scanner, h: &mut H) -> Step {
    let (value, font_unit) = scan_number(s, Exponent::OrFontUnit)?;
    h.length_value(value);

    let unit = match font_unit {
        Some(FontUnit::Em) => Some(LengthUnit::Em),
        Some(FontUnit::Ex) => Some(LengthUnit::Ex),
        None => match s.current() {
            Some('%') => {
                s.read();
                Some(LengthUnit::Percent)
            }
            // `e` is still possible after an exponent, like in `1e0em`.
            Some('e') | Some('p') | Some('i') | Some('c') | Some('m') => Some(s.keyword(UNITS)?),
            _ => None,
        },
    };

    if let Some(unit) = unit {
        h.length_unit(unit);
    }

    Ok(())
}

/// Representation of the [`<length>`] type.
///
/// [`<length>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeLength
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Length {
    pub number: f64,
    pub unit: LengthUnit,
}

impl Length {
    /// Constructs a new length.
    #[inline]
    pub fn new(number: f64, unit: LengthUnit) -> Length {
        Length { number, unit }
    }

    /// Constructs a new length with `LengthUnit::None`.
    #[inline]
    pub fn new_number(number: f64) -> Length {
        Length {
            number,
            unit: LengthUnit::None,
        }
    }

    /// Constructs a new length with a zero number.
    #[inline]
    pub fn zero() -> Length {
        Length::new_number(0.0)
    }
}

impl Default for Length {
    #[inline]
    fn default() -> Self {
        Length::zero()
    }
}

impl FromStr for Length {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = LengthParser::with_handler(Vec::new());
        p.parse(text)?;
        Ok(p.into_handler().pop().unwrap_or_default())
    }
}

/// Representation of the [`<list-of-lengths>`] type.
///
/// [`<list-of-lengths>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeLengths
#[derive(Clone, PartialEq, Default, Debug)]
pub struct LengthList(pub Vec<Length>);

impl FromStr for LengthList {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = LengthListParser::with_handler(Vec::new());
        p.parse(text)?;
        Ok(LengthList(p.into_handler()))
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, TextPos};

    macro_rules! test_p {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Length::from_str($text).unwrap(), $result);
            }
        )
    }

    test_p!(parse_1,  "1",   Length::new(1.0, LengthUnit::None));
    test_p!(parse_2,  "1em", Length::new(1.0, LengthUnit::Em));
    test_p!(parse_3,  "1ex", Length::new(1.0, LengthUnit::Ex));
    test_p!(parse_4,  "1px", Length::new(1.0, LengthUnit::Px));
    test_p!(parse_5,  "1in", Length::new(1.0, LengthUnit::In));
    test_p!(parse_6,  "1cm", Length::new(1.0, LengthUnit::Cm));
    test_p!(parse_7,  "1mm", Length::new(1.0, LengthUnit::Mm));
    test_p!(parse_8,  "1pt", Length::new(1.0, LengthUnit::Pt));
    test_p!(parse_9,  "1pc", Length::new(1.0, LengthUnit::Pc));
    test_p!(parse_10, "1%",  Length::new(1.0, LengthUnit::Percent));
    test_p!(parse_11, "1e0", Length::new(1.0, LengthUnit::None));
    test_p!(parse_12, "1.0e0", Length::new(1.0, LengthUnit::None));
    test_p!(parse_13, "1.0e0em", Length::new(1.0, LengthUnit::Em));
    test_p!(parse_14, " -2.5ex ", Length::new(-2.5, LengthUnit::Ex));

    macro_rules! test_err {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Length::from_str($text).unwrap_err().to_string(), $result);
            }
        )
    }

    test_err!(err_1, "1mmx", "expected end of input instead of 'x' at 1:4");
    test_err!(err_2, "5pq", "unexpected 'q' at 1:3");
    test_err!(err_3, "5cx", "expected 'm' instead of 'x' at 1:3");
    test_err!(err_4, "", "invalid number, found end of input at 1:1");
    test_err!(err_5, "1 2", "expected end of input instead of '2' at 1:3");

    #[derive(Default)]
    struct Events(Vec<String>);

    impl LengthHandler for Events {
        fn start_length(&mut self) { self.0.push("start".to_string()); }
        fn length_value(&mut self, v: f32) { self.0.push(v.to_string()); }
        fn length_unit(&mut self, u: LengthUnit) { self.0.push(format!("{:?}", u)); }
        fn end_length(&mut self) { self.0.push("end".to_string()); }
    }

    impl LengthListHandler for Events {
        fn start_length_list(&mut self) { self.0.push("start list".to_string()); }
        fn end_length_list(&mut self) { self.0.push("end list".to_string()); }
    }

    #[test]
    fn events_with_unit() {
        let mut p = LengthParser::with_handler(Events::default());
        p.parse("5px").unwrap();
        assert_eq!(p.handler().0, &["start", "5", "Px", "end"]);
    }

    #[test]
    fn events_without_unit() {
        let mut p = LengthParser::with_handler(Events::default());
        p.parse("5").unwrap();
        assert_eq!(p.handler().0, &["start", "5", "end"]);
    }

    #[test]
    fn list_events() {
        let mut p = LengthListParser::with_handler(Events::default());
        p.parse("1, 2%").unwrap();
        assert_eq!(p.handler().0, &[
            "start list", "start", "1", "end", "start", "2", "Percent", "end", "end list",
        ]);
    }

    #[test]
    fn list_1() {
        let list = LengthList::from_str("10px 20% 50mm").unwrap();
        assert_eq!(list.0, vec![
            Length::new(10.0, LengthUnit::Px),
            Length::new(20.0, LengthUnit::Percent),
            Length::new(50.0, LengthUnit::Mm),
        ]);
    }

    #[test]
    fn list_2() {
        assert_eq!(LengthList::from_str("").unwrap().0, vec![]);
    }

    #[test]
    fn list_err() {
        let e = LengthList::from_str("1,,2").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::FloatFormat);
        assert_eq!(e.pos(), Some(TextPos::new(1, 3)));
    }

    #[test]
    fn list_recover() {
        let mut errors: Vec<ParseError> = Vec::new();
        let mut lengths: Vec<Length> = Vec::new();
        let mut events = Events::default();
        {
            let mut p = LengthListParser::with_handler(&mut lengths);
            p.set_error_handler(&mut errors);
            p.parse("1px 2qq 3em").unwrap();

            let mut p = LengthListParser::with_handler(&mut events);
            p.set_error_handler(crate::error_handler_fn(|_| Ok(())));
            p.parse("x").unwrap();
        }
        assert_eq!(errors.len(), 1);
        assert_eq!(lengths, vec![
            Length::new(1.0, LengthUnit::Px),
            Length::new(2.0, LengthUnit::None),
            Length::new(3.0, LengthUnit::Em),
        ]);
        assert_eq!(events.0, &["start list", "start", "end", "end list"]);
    }
}
