// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use crate::number::read_number;
use crate::scanner::{Scanner, Step, StepExt};
use crate::{DefaultHandler, ParseError, Parser, ParserBase};

/// List of all SVG angle units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum AngleUnit {
    Degrees,
    Gradians,
    Radians,
}

const UNITS: &[(&str, AngleUnit)] = &[
    ("deg", AngleUnit::Degrees),
    ("grad", AngleUnit::Gradians),
    ("rad", AngleUnit::Radians),
];

/// An [`<angle>`] events receiver.
///
/// [`<angle>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeAngle
pub trait AngleHandler {
    /// Called before the angle.
    fn start_angle(&mut self) {}

    /// Called with the numeric part.
    fn angle_value(&mut self, _value: f32) {}

    /// Called after the value when a unit is present.
    fn angle_unit(&mut self, _unit: AngleUnit) {}

    /// Called after the angle.
    fn end_angle(&mut self) {}
}

impl AngleHandler for DefaultHandler {}

impl<T: AngleHandler + ?Sized> AngleHandler for &mut T {
    fn start_angle(&mut self) {
        (**self).start_angle()
    }

    fn angle_value(&mut self, value: f32) {
        (**self).angle_value(value)
    }

    fn angle_unit(&mut self, unit: AngleUnit) {
        (**self).angle_unit(unit)
    }

    fn end_angle(&mut self) {
        (**self).end_angle()
    }
}

/// An [`<angle>`] parser.
///
/// # Examples
///
/// ```
/// use svgmicro::{Angle, AngleParser, AngleUnit, Parser};
///
/// let mut p = AngleParser::with_handler(Angle::default());
/// p.parse("100grad").unwrap();
/// assert_eq!(p.handler(), &Angle::new(100.0, AngleUnit::Gradians));
/// assert_eq!(p.handler().to_degrees(), 90.0);
/// ```
///
/// [`<angle>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeAngle
#[derive(Debug)]
pub struct AngleParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(AngleParser, AngleHandler, parse_angle);

fn parse_angle<H: AngleHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_angle();
    s.skip_spaces();
    if angle(s, h).recoverable()?.is_none() {
        s.skip_until(|_| false);
    }

    s.skip_spaces();
    s.expect_end()?;
    h.end_angle();
    Ok(())
}

fn angle<H: AngleHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.angle_value(read_number(s)?);

    if let Some('d') | Some('g') | Some('r') = s.current() {
        h.angle_unit(s.keyword(UNITS)?);
    }

    Ok(())
}

/// Representation of the [`<angle>`] type.
///
/// As a handler it keeps the last parsed angle.
///
/// [`<angle>`]: https://www.w3.org/TR/SVG11/types.html#DataTypeAngle
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Angle {
    pub number: f64,
    pub unit: AngleUnit,
}

impl Angle {
    /// Constructs a new angle.
    #[inline]
    pub fn new(number: f64, unit: AngleUnit) -> Angle {
        Angle { number, unit }
    }

    /// Converts angle to degrees.
    #[inline]
    pub fn to_degrees(&self) -> f64 {
        match self.unit {
            AngleUnit::Degrees => self.number,
            AngleUnit::Gradians => self.number * 180.0 / 200.0,
            AngleUnit::Radians => self.number.to_degrees(),
        }
    }
}

impl Default for Angle {
    #[inline]
    fn default() -> Self {
        Angle::new(0.0, AngleUnit::Degrees)
    }
}

impl AngleHandler for Angle {
    fn start_angle(&mut self) {
        *self = Angle::default();
    }

    fn angle_value(&mut self, value: f32) {
        self.number = f64::from(value);
    }

    fn angle_unit(&mut self, unit: AngleUnit) {
        self.unit = unit;
    }
}

impl FromStr for Angle {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = AngleParser::with_handler(Angle::default());
        p.parse(text)?;
        Ok(p.into_handler())
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_p {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Angle::from_str($text).unwrap(), $result);
            }
        )
    }

    test_p!(parse_1, "1",     Angle::new(1.0, AngleUnit::Degrees));
    test_p!(parse_2, "1deg",  Angle::new(1.0, AngleUnit::Degrees));
    test_p!(parse_3, "1grad", Angle::new(1.0, AngleUnit::Gradians));
    test_p!(parse_4, "1rad",  Angle::new(1.0, AngleUnit::Radians));
    test_p!(parse_5, " -.5e1rad ", Angle::new(-5.0, AngleUnit::Radians));

    macro_rules! test_err {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(Angle::from_str($text).unwrap_err().to_string(), $result);
            }
        )
    }

    test_err!(err_1, "1degq", "expected end of input instead of 'q' at 1:5");
    test_err!(err_2, "1dag",  "expected 'e' instead of 'a' at 1:3");
    test_err!(err_3, "1q",    "expected end of input instead of 'q' at 1:2");
    test_err!(err_4, "deg",   "invalid number, found 'd' at 1:1");

    #[derive(Default)]
    struct Events(Vec<String>);

    impl AngleHandler for Events {
        fn start_angle(&mut self) { self.0.push("start".to_string()); }
        fn angle_value(&mut self, v: f32) { self.0.push(v.to_string()); }
        fn angle_unit(&mut self, u: AngleUnit) { self.0.push(format!("{:?}", u)); }
        fn end_angle(&mut self) { self.0.push("end".to_string()); }
    }

    #[test]
    fn events() {
        let mut p = AngleParser::with_handler(Events::default());
        p.parse("45").unwrap();
        p.parse("3rad").unwrap();
        assert_eq!(p.handler().0, &["start", "45", "end", "start", "3", "Radians", "end"]);
    }

    #[test]
    fn recover() {
        let mut errors: Vec<ParseError> = Vec::new();
        let mut events = Events::default();
        {
            let mut p = AngleParser::with_handler(&mut events);
            p.set_error_handler(&mut errors);
            p.parse("1gx 2").unwrap();
        }
        assert_eq!(errors.len(), 1);
        assert_eq!(events.0, &["start", "1", "end"]);
    }

    #[test]
    fn to_degrees() {
        assert_eq!(Angle::new(200.0, AngleUnit::Gradians).to_degrees(), 180.0);
        assert!((Angle::new(std::f64::consts::PI, AngleUnit::Radians).to_degrees() - 180.0).abs() < 1e-9);
    }
}
