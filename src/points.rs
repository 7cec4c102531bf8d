// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::{BezPath, Point};

use crate::number::read_number;
use crate::scanner::{Abort, CharExt, Scanner, Step, StepExt};
use crate::{DefaultHandler, ParserBase};

/// A [`<list-of-points>`] events receiver.
///
/// [`<list-of-points>`]: https://www.w3.org/TR/SVG11/shapes.html#PointsBNF
pub trait PointsHandler {
    /// Called once before any point.
    fn start_points(&mut self) {}

    /// Called for each coordinate pair.
    fn point(&mut self, _x: f32, _y: f32) {}

    /// Called once after the last point.
    fn end_points(&mut self) {}
}

impl PointsHandler for DefaultHandler {}

impl PointsHandler for Vec<(f32, f32)> {
    fn start_points(&mut self) {
        self.clear();
    }

    fn point(&mut self, x: f32, y: f32) {
        self.push((x, y));
    }
}

impl<T: PointsHandler + ?Sized> PointsHandler for &mut T {
    fn start_points(&mut self) {
        (**self).start_points()
    }

    fn point(&mut self, x: f32, y: f32) {
        (**self).point(x, y)
    }

    fn end_points(&mut self) {
        (**self).end_points()
    }
}

/// A [`<list-of-points>`] parser.
///
/// Use it for the `points` attribute of the `polygon` and `polyline` elements.
///
/// # Errors
///
/// An odd number of coordinates is an error. Unlike renderers, which
/// ignore the last coordinate, the parser reports it.
///
/// # Examples
///
/// ```
/// use svgmicro::{Parser, PointsParser};
///
/// let mut p = PointsParser::with_handler(Vec::new());
/// p.parse("10 20, 30 40").unwrap();
/// assert_eq!(p.handler(), &[(10.0, 20.0), (30.0, 40.0)]);
/// ```
///
/// [`<list-of-points>`]: https://www.w3.org/TR/SVG11/shapes.html#PointsBNF
#[derive(Debug)]
pub struct PointsParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(PointsParser, PointsHandler, parse_points);

fn parse_points<H: PointsHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_points();
    s.skip_spaces();

    while !s.at_end() {
        match point(s).recoverable()? {
            Some((x, y)) => {
                h.point(x, y);
                if s.skip_comma_spaces() && s.at_end() {
                    // A trailing comma needs one more point.
                    if let Abort::Fatal(e) = s.unexpected() {
                        return Err(Abort::Fatal(e));
                    }
                }
            }
            None => {
                // Drop the malformed token.
                s.read();
                s.skip_until(|c| c.is_svg_space() || c == ',');
                s.skip_comma_spaces();
            }
        }
    }

    h.end_points();
    Ok(())
}

fn point(s: &mut Scanner) -> Step<(f32, f32)> {
    let x = read_number(s)?;
    s.skip_comma_spaces();
    let y = read_number(s)?;
    Ok((x, y))
}

/// Builds a polyline from points.
///
/// The first point starts the path and the others are connected by lines.
#[derive(Clone, Default, Debug)]
pub struct PolylineProducer {
    path: BezPath,
    closed: bool,
    empty: bool,
}

impl PolylineProducer {
    /// Creates a producer for the `polyline` element.
    pub fn new() -> Self {
        PolylineProducer::default()
    }

    /// Creates a producer for the `polygon` element, which closes the path.
    pub fn polygon() -> Self {
        PolylineProducer {
            closed: true,
            ..PolylineProducer::default()
        }
    }

    /// Returns the accumulated path.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Returns the accumulated path.
    pub fn into_path(self) -> BezPath {
        self.path
    }
}

impl PointsHandler for PolylineProducer {
    fn start_points(&mut self) {
        self.path = BezPath::new();
        self.empty = true;
    }

    fn point(&mut self, x: f32, y: f32) {
        let p = Point::new(f64::from(x), f64::from(y));
        if self.empty {
            self.path.move_to(p);
            self.empty = false;
        } else {
            self.path.line_to(p);
        }
    }

    fn end_points(&mut self) {
        if self.closed && !self.empty {
            self.path.close_path();
        }
    }
}
