// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use kurbo::{Affine, Vec2};

use crate::number::read_number;
use crate::scanner::{CharExt, Scanner, Step, StepExt};
use crate::{DefaultHandler, ParseError, Parser, ParserBase};

/// Transform list token.
///
/// Optional arguments are `None` when omitted in the source.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum TransformListToken {
    Matrix {
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        e: f32,
        f: f32,
    },
    Translate {
        tx: f32,
        ty: Option<f32>,
    },
    Scale {
        sx: f32,
        sy: Option<f32>,
    },
    Rotate {
        angle: f32,
        center: Option<(f32, f32)>,
    },
    SkewX {
        angle: f32,
    },
    SkewY {
        angle: f32,
    },
}

impl TransformListToken {
    /// Returns the affine map of the token.
    ///
    /// Angles are in degrees.
    pub fn to_affine(&self) -> Affine {
        match *self {
            TransformListToken::Matrix { a, b, c, d, e, f } => Affine::new([
                f64::from(a),
                f64::from(b),
                f64::from(c),
                f64::from(d),
                f64::from(e),
                f64::from(f),
            ]),
            TransformListToken::Translate { tx, ty } => {
                let ty = ty.unwrap_or(0.0);
                Affine::translate(Vec2::new(f64::from(tx), f64::from(ty)))
            }
            TransformListToken::Scale { sx, sy } => {
                let sy = sy.unwrap_or(sx);
                Affine::scale_non_uniform(f64::from(sx), f64::from(sy))
            }
            TransformListToken::Rotate { angle, center } => {
                let rotate = Affine::rotate(f64::from(angle).to_radians());
                match center {
                    Some((cx, cy)) => {
                        let c = Vec2::new(f64::from(cx), f64::from(cy));
                        Affine::translate(c) * rotate * Affine::translate(-c)
                    }
                    None => rotate,
                }
            }
            TransformListToken::SkewX { angle } => {
                let t = f64::from(angle).to_radians().tan();
                Affine::new([1.0, 0.0, t, 1.0, 0.0, 0.0])
            }
            TransformListToken::SkewY { angle } => {
                let t = f64::from(angle).to_radians().tan();
                Affine::new([1.0, t, 0.0, 1.0, 0.0, 0.0])
            }
        }
    }
}

/// A [`<transform-list>`] events receiver.
///
/// [`<transform-list>`]: https://www.w3.org/TR/SVG11/coords.html#TransformAttribute
pub trait TransformListHandler {
    /// Called once before any transform.
    fn start_transform_list(&mut self) {}

    /// Called for each transform function.
    fn transform(&mut self, _token: TransformListToken) {}

    /// Called once after the last transform.
    fn end_transform_list(&mut self) {}
}

impl TransformListHandler for DefaultHandler {}

impl TransformListHandler for Vec<TransformListToken> {
    fn start_transform_list(&mut self) {
        self.clear();
    }

    fn transform(&mut self, token: TransformListToken) {
        self.push(token);
    }
}

impl<T: TransformListHandler + ?Sized> TransformListHandler for &mut T {
    fn start_transform_list(&mut self) {
        (**self).start_transform_list()
    }

    fn transform(&mut self, token: TransformListToken) {
        (**self).transform(token)
    }

    fn end_transform_list(&mut self) {
        (**self).end_transform_list()
    }
}

/// A [`<transform-list>`] parser.
///
/// # Recovery
///
/// When the error handler accepts an error, everything up to and including
/// the next `)` is skipped and parsing continues with the next function.
///
/// # Examples
///
/// ```
/// use svgmicro::{Parser, TransformListParser, TransformListToken};
///
/// let mut p = TransformListParser::with_handler(Vec::new());
/// p.parse("translate(10,20) rotate(45)").unwrap();
/// assert_eq!(p.handler(), &[
///     TransformListToken::Translate { tx: 10.0, ty: Some(20.0) },
///     TransformListToken::Rotate { angle: 45.0, center: None },
/// ]);
/// ```
///
/// [`<transform-list>`]: https://www.w3.org/TR/SVG11/coords.html#TransformAttribute
#[derive(Debug)]
pub struct TransformListParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(TransformListParser, TransformListHandler, parse_transform_list);

fn parse_transform_list<H: TransformListHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_transform_list();
    transforms(s, h)?;
    s.expect_end()?;
    h.end_transform_list();
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Function {
    Matrix,
    Rotate,
    Translate,
    Scale,
    SkewX,
    SkewY,
}

const FUNCTIONS: &[(&str, Function)] = &[
    ("matrix", Function::Matrix),
    ("rotate", Function::Rotate),
    ("translate", Function::Translate),
    ("scale", Function::Scale),
    ("skewX", Function::SkewX),
    ("skewY", Function::SkewY),
];

/// Parses transform functions separated by comma-whitespace.
///
/// Stops at the first character that can not start a function name,
/// so the caller decides whether it's a terminator or trailing data.
pub(crate) fn transforms<H: TransformListHandler + ?Sized>(s: &mut Scanner, h: &mut H) -> Step {
    loop {
        s.skip_spaces();
        while s.consume(',') {
            s.skip_spaces();
        }

        match s.current() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Ok(()),
        }

        match transform(s).recoverable()? {
            Some(token) => h.transform(token),
            None => skip_transform(s),
        }
    }
}

fn skip_transform(s: &mut Scanner) {
    s.skip_until(|c| c == ')');
    s.read();
}

fn transform(s: &mut Scanner) -> Step<TransformListToken> {
    let func = s.keyword(FUNCTIONS)?;
    s.skip_spaces();
    s.expect('(')?;
    s.skip_spaces();

    let token = match func {
        Function::Matrix => TransformListToken::Matrix {
            a: list_number(s)?,
            b: list_number(s)?,
            c: list_number(s)?,
            d: list_number(s)?,
            e: list_number(s)?,
            f: read_number(s)?,
        },
        Function::Translate => {
            let tx = read_number(s)?;
            let ty = optional_number(s)?;
            TransformListToken::Translate { tx, ty }
        }
        Function::Scale => {
            let sx = read_number(s)?;
            let sy = optional_number(s)?;
            TransformListToken::Scale { sx, sy }
        }
        Function::Rotate => {
            let angle = read_number(s)?;
            let center = match optional_number(s)? {
                Some(cx) => {
                    s.skip_comma_spaces();
                    Some((cx, read_number(s)?))
                }
                None => None,
            };
            TransformListToken::Rotate { angle, center }
        }
        Function::SkewX => TransformListToken::SkewX {
            angle: read_number(s)?,
        },
        Function::SkewY => TransformListToken::SkewY {
            angle: read_number(s)?,
        },
    };

    s.skip_spaces();
    s.expect(')')?;
    Ok(token)
}

fn list_number(s: &mut Scanner) -> Step<f32> {
    let n = read_number(s)?;
    s.skip_comma_spaces();
    Ok(n)
}

/// Reads the next argument if there is one.
fn optional_number(s: &mut Scanner) -> Step<Option<f32>> {
    s.skip_spaces();
    if s.consume(',') {
        s.skip_spaces();
        return read_number(s).map(Some);
    }

    match s.current() {
        Some(c) if c.is_number_start() => read_number(s).map(Some),
        _ => Ok(None),
    }
}

/// Representation of the [`<transform>`] type.
///
/// [`<transform>`]: https://www.w3.org/TR/SVG11/coords.html#TransformAttribute
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    /// Constructs a new transform.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Transform { a, b, c, d, e, f }
    }

    /// Converts the transform into an affine map.
    pub fn to_affine(&self) -> Affine {
        Affine::new([self.a, self.b, self.c, self.d, self.e, self.f])
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }
}

impl From<Affine> for Transform {
    fn from(ts: Affine) -> Self {
        let [a, b, c, d, e, f] = ts.as_coeffs();
        Transform::new(a, b, c, d, e, f)
    }
}

impl FromStr for Transform {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = TransformListParser::with_handler(TransformProducer::new());
        p.parse(text)?;
        Ok(p.handler().to_transform())
    }
}

/// Composes transform events into a single transform.
///
/// Functions are multiplied in the order they appear, so the last one
/// is applied to the coordinates first.
#[derive(Clone, Copy, Debug)]
pub struct TransformProducer {
    ts: Affine,
}

impl Default for TransformProducer {
    fn default() -> Self {
        TransformProducer {
            ts: Affine::IDENTITY,
        }
    }
}

impl TransformProducer {
    /// Creates a new producer.
    pub fn new() -> Self {
        TransformProducer::default()
    }

    /// Returns the accumulated affine map.
    pub fn affine(&self) -> Affine {
        self.ts
    }

    /// Returns the accumulated transform.
    pub fn to_transform(&self) -> Transform {
        Transform::from(self.ts)
    }
}

impl TransformListHandler for TransformProducer {
    fn start_transform_list(&mut self) {
        self.ts = Affine::IDENTITY;
    }

    fn transform(&mut self, token: TransformListToken) {
        self.ts = self.ts * token.to_affine();
    }
}
