// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;
use std::time::Duration;

use crate::messages::Found;
use crate::scanner::{Scanner, Step, StepExt};
use crate::{DefaultHandler, ErrorKind, ParseError, Parser, ParserBase};

/// A timecount metric.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum ClockUnit {
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl ClockUnit {
    /// Returns the unit length in seconds.
    pub fn seconds(&self) -> f64 {
        match self {
            ClockUnit::Hours => 3600.0,
            ClockUnit::Minutes => 60.0,
            ClockUnit::Seconds => 1.0,
            ClockUnit::Milliseconds => 0.001,
        }
    }
}

const METRICS: &[(&str, ClockUnit)] = &[
    ("h", ClockUnit::Hours),
    ("min", ClockUnit::Minutes),
    ("s", ClockUnit::Seconds),
    ("ms", ClockUnit::Milliseconds),
];

// Fraction digits past this one are ignored.
const MAX_FRACTION_DIGITS: usize = 9;

/// A [clock value] events receiver.
///
/// The parser reports lexical parts only. Combining them is up to the handler,
/// see [`ClockProducer`].
///
/// [clock value]: https://www.w3.org/TR/SMIL2/smil-timing.html#Timing-ClockValueSyntax
pub trait ClockHandler {
    /// Called before the clock value.
    fn start_clock(&mut self) {}

    /// Called for a group of digits.
    ///
    /// `digits` is the number of digits in the group,
    /// which is needed to interpret a fraction.
    fn int_value(&mut self, _value: u32, _digits: usize) {}

    /// Called for each `:`.
    fn colon(&mut self) {}

    /// Called for the `.` before a fraction.
    fn dot(&mut self) {}

    /// Called for a timecount metric.
    fn clock_unit(&mut self, _unit: ClockUnit) {}

    /// Called after the clock value.
    fn end_clock(&mut self) {}
}

impl ClockHandler for DefaultHandler {}

impl<T: ClockHandler + ?Sized> ClockHandler for &mut T {
    fn start_clock(&mut self) {
        (**self).start_clock()
    }

    fn int_value(&mut self, value: u32, digits: usize) {
        (**self).int_value(value, digits)
    }

    fn colon(&mut self) {
        (**self).colon()
    }

    fn dot(&mut self) {
        (**self).dot()
    }

    fn clock_unit(&mut self, unit: ClockUnit) {
        (**self).clock_unit(unit)
    }

    fn end_clock(&mut self) {
        (**self).end_clock()
    }
}

/// A SMIL [clock value] parser.
///
/// Accepts full (`02:30:03`), partial (`02:33.5`) and timecount (`3.2h`) values.
///
/// [clock value]: https://www.w3.org/TR/SMIL2/smil-timing.html#Timing-ClockValueSyntax
#[derive(Debug)]
pub struct ClockParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(ClockParser, ClockHandler, parse_clock);

fn parse_clock<H: ClockHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_clock();
    s.skip_spaces();
    if clock(s, h).recoverable()?.is_none() {
        s.skip_until(|_| false);
    }

    s.skip_spaces();
    s.expect_end()?;
    h.end_clock();
    Ok(())
}

fn clock<H: ClockHandler>(s: &mut Scanner, h: &mut H) -> Step {
    let (value, digits) = integer(s)?;
    h.int_value(value, digits);

    if s.consume(':') {
        h.colon();
        // Without hours the first group holds minutes.
        let is_minutes = digits == 2 && value < 60;

        sexagesimal(s, h)?;
        if s.consume(':') {
            h.colon();
            sexagesimal(s, h)?;
        } else if !is_minutes {
            let found = Found(s.current());
            return Err(s.error(ErrorKind::ExpectedCharacter, &[&':', &found]));
        }

        fraction(s, h)
    } else {
        fraction(s, h)?;
        if let Some('h') | Some('m') | Some('s') = s.current() {
            h.clock_unit(s.keyword(METRICS)?);
        }

        Ok(())
    }
}

fn integer(s: &mut Scanner) -> Step<(u32, usize)> {
    let mut value = 0u32;
    let mut digits = 0;
    while let Some(d) = s.current().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(d);
        digits += 1;
        s.read();
    }

    if digits == 0 {
        return Err(s.unexpected());
    }

    Ok((value, digits))
}

/// Minutes or seconds: exactly two digits, from 00 to 59.
fn sexagesimal<H: ClockHandler>(s: &mut Scanner, h: &mut H) -> Step {
    let tens = match s.current().and_then(|c| c.to_digit(6)) {
        Some(d) => d,
        None => return Err(s.unexpected()),
    };
    s.read();

    let units = match s.current().and_then(|c| c.to_digit(10)) {
        Some(d) => d,
        None => return Err(s.unexpected()),
    };
    s.read();

    h.int_value(tens * 10 + units, 2);
    Ok(())
}

fn fraction<H: ClockHandler>(s: &mut Scanner, h: &mut H) -> Step {
    if !s.consume('.') {
        return Ok(());
    }

    h.dot();

    let mut value = 0u32;
    let mut digits = 0;
    let mut read_any = false;
    while let Some(d) = s.current().and_then(|c| c.to_digit(10)) {
        if digits < MAX_FRACTION_DIGITS {
            value = value * 10 + d;
            digits += 1;
        }

        read_any = true;
        s.read();
    }

    if !read_any {
        return Err(s.unexpected());
    }

    h.int_value(value, digits);
    Ok(())
}

/// A clock value in seconds.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use svgmicro::ClockValue;
///
/// assert_eq!(ClockValue::from_str("02:30:03").unwrap().seconds, 9003.0);
/// assert_eq!(ClockValue::from_str("45min").unwrap().seconds, 2700.0);
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct ClockValue {
    /// Duration in seconds.
    pub seconds: f64,
}

impl ClockValue {
    /// Converts the value into a `Duration`.
    ///
    /// Returns `None` for values that are negative, overflowing or not finite.
    pub fn to_duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.seconds).ok()
    }
}

impl FromStr for ClockValue {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = ClockParser::with_handler(ClockProducer::new());
        p.parse(text)?;
        Ok(p.handler().value())
    }
}

/// Assembles clock events into a [`ClockValue`].
#[derive(Clone, Default, Debug)]
pub struct ClockProducer {
    groups: Vec<u32>,
    fraction: Option<(u32, usize)>,
    after_dot: bool,
    colons: usize,
    unit: Option<ClockUnit>,
}

impl ClockProducer {
    /// Creates a new producer.
    pub fn new() -> Self {
        ClockProducer::default()
    }

    /// Returns the value of the last parsed clock.
    pub fn value(&self) -> ClockValue {
        let group = |i: usize| f64::from(self.groups.get(i).copied().unwrap_or(0));

        let fraction = match self.fraction {
            Some((value, digits)) => f64::from(value) / 10f64.powi(digits as i32),
            None => 0.0,
        };

        let seconds = match self.colons {
            0 => {
                let unit = self.unit.unwrap_or(ClockUnit::Seconds);
                (group(0) + fraction) * unit.seconds()
            }
            1 => group(0) * 60.0 + group(1) + fraction,
            _ => group(0) * 3600.0 + group(1) * 60.0 + group(2) + fraction,
        };

        ClockValue { seconds }
    }
}

impl ClockHandler for ClockProducer {
    fn start_clock(&mut self) {
        *self = ClockProducer::default();
    }

    fn int_value(&mut self, value: u32, digits: usize) {
        if self.after_dot {
            self.fraction = Some((value, digits));
        } else {
            self.groups.push(value);
        }
    }

    fn colon(&mut self) {
        self.colons += 1;
    }

    fn dot(&mut self) {
        self.after_dot = true;
    }

    fn clock_unit(&mut self, unit: ClockUnit) {
        self.unit = Some(unit);
    }
}
