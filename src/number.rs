// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use crate::messages::Found;
use crate::scanner::{Abort, Scanner, Step};
use crate::{ErrorKind, ParseError, ParserBase};

/// How the reader treats an `e` after the mantissa.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Exponent {
    /// Always an exponent.
    Number,
    /// A lowercase `e` followed by `m` or `x` ends the number and is the `em`/`ex` unit.
    OrFontUnit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum FontUnit {
    Em,
    Ex,
}

const MAX_MANTISSA_DIGITS: u32 = 9;
const MAX_EXPONENT_DIGITS: u32 = 3;

// Combined in `f64`, so the result is rounded to `f32` only once.
static POW10: [f64; 129] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9,
    1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16, 1e17, 1e18, 1e19,
    1e20, 1e21, 1e22, 1e23, 1e24, 1e25, 1e26, 1e27, 1e28, 1e29,
    1e30, 1e31, 1e32, 1e33, 1e34, 1e35, 1e36, 1e37, 1e38, 1e39,
    1e40, 1e41, 1e42, 1e43, 1e44, 1e45, 1e46, 1e47, 1e48, 1e49,
    1e50, 1e51, 1e52, 1e53, 1e54, 1e55, 1e56, 1e57, 1e58, 1e59,
    1e60, 1e61, 1e62, 1e63, 1e64, 1e65, 1e66, 1e67, 1e68, 1e69,
    1e70, 1e71, 1e72, 1e73, 1e74, 1e75, 1e76, 1e77, 1e78, 1e79,
    1e80, 1e81, 1e82, 1e83, 1e84, 1e85, 1e86, 1e87, 1e88, 1e89,
    1e90, 1e91, 1e92, 1e93, 1e94, 1e95, 1e96, 1e97, 1e98, 1e99,
    1e100, 1e101, 1e102, 1e103, 1e104, 1e105, 1e106, 1e107, 1e108, 1e109,
    1e110, 1e111, 1e112, 1e113, 1e114, 1e115, 1e116, 1e117, 1e118, 1e119,
    1e120, 1e121, 1e122, 1e123, 1e124, 1e125, 1e126, 1e127, 1e128,
];

/// Builds a float from an integer mantissa and a decimal exponent.
///
/// Exponents below -125 give zero and above 128 give an infinity.
pub fn build_float(mant: i32, exp: i32) -> f32 {
    if exp < -125 || mant == 0 {
        return 0.0;
    }

    if exp > 128 {
        return if mant > 0 {
            f32::INFINITY
        } else {
            f32::NEG_INFINITY
        };
    }

    let mant = f64::from(mant);
    let n = if exp >= 0 {
        mant * POW10[exp as usize]
    } else {
        mant / POW10[-exp as usize]
    };

    n as f32
}

#[inline]
fn digit(c: Option<char>) -> Option<i32> {
    c.and_then(|c| c.to_digit(10)).map(|d| d as i32)
}

fn float_error(s: &mut Scanner) -> Abort {
    let found = Found(s.current());
    s.error(ErrorKind::FloatFormat, &[&found])
}

/// Reads a `<number>` at the current position.
///
/// The current character must start a number. Stops at the first character
/// that can not continue it.
pub(crate) fn read_number(s: &mut Scanner) -> Step<f32> {
    scan_number(s, Exponent::Number).map(|(n, _)| n)
}

pub(crate) fn scan_number(s: &mut Scanner, exponent: Exponent) -> Step<(f32, Option<FontUnit>)> {
    let mut mant = 0i32;
    let mut mant_digits = 0;
    let mut mant_read = false;
    let mut exp = 0i32;
    let mut exp_digits = 0;
    let mut exp_adj = 0i32;

    let negative = s.is_curr('-');
    if negative || s.is_curr('+') {
        s.read();
    }

    match s.current() {
        Some('.') => {}
        Some(c) if c.is_ascii_digit() => {
            mant_read = true;
            while s.is_curr('0') {
                s.read();
            }

            while let Some(d) = digit(s.current()) {
                if mant_digits < MAX_MANTISSA_DIGITS {
                    mant_digits += 1;
                    mant = mant * 10 + d;
                } else {
                    exp_adj += 1;
                }

                s.read();
            }
        }
        _ => return Err(float_error(s)),
    }

    if s.is_curr('.') {
        s.read();
        if digit(s.current()).is_some() {
            if mant_digits == 0 {
                while s.is_curr('0') {
                    s.read();
                    exp_adj -= 1;
                }
            }

            while let Some(d) = digit(s.current()) {
                if mant_digits < MAX_MANTISSA_DIGITS {
                    mant_digits += 1;
                    mant = mant * 10 + d;
                    exp_adj -= 1;
                }

                s.read();
            }
        } else if !mant_read {
            return Err(float_error(s));
        }
    }

    let mut unit = None;
    if let Some(e) = s.current().filter(|c| *c == 'e' || *c == 'E') {
        s.read();
        let mut exp_negative = false;
        match s.current() {
            Some('m') if e == 'e' && exponent == Exponent::OrFontUnit => unit = Some(FontUnit::Em),
            Some('x') if e == 'e' && exponent == Exponent::OrFontUnit => unit = Some(FontUnit::Ex),
            Some(c) if c == '-' || c == '+' => {
                exp_negative = c == '-';
                s.read();
                if digit(s.current()).is_none() {
                    return Err(float_error(s));
                }
            }
            Some(c) if c.is_ascii_digit() => {}
            _ => return Err(float_error(s)),
        }

        if unit.is_some() {
            s.read();
        } else {
            while s.is_curr('0') {
                s.read();
            }

            while let Some(d) = digit(s.current()) {
                if exp_digits < MAX_EXPONENT_DIGITS {
                    exp_digits += 1;
                    exp = exp * 10 + d;
                }

                s.read();
            }

            if exp_negative {
                exp = -exp;
            }
        }
    }

    if negative {
        mant = -mant;
    }

    Ok((build_float(mant, exp + exp_adj), unit))
}

/// A standalone `<number>`.
///
/// Uses the same reader as all the grammars, so the result can differ
/// from `f32::from_str` in the last bits for inputs with more than
/// nine significant digits.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use svgmicro::Number;
///
/// assert_eq!(Number::from_str("-.5e1").unwrap(), Number(-5.0));
/// assert!(Number::from_str("1e").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Number(pub f32);

impl FromStr for Number {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut p = ParserBase::default();
        let mut n = 0.0;
        let res = {
            let mut s = p.scanner(text.into());
            let res = number_value(&mut s, &mut n);
            s.finish(res)
        };
        res.map(|_| Number(n))
    }
}

fn number_value(s: &mut Scanner, out: &mut f32) -> Step {
    s.skip_spaces();
    *out = read_number(s)?;
    s.skip_spaces();
    s.expect_end()
}
