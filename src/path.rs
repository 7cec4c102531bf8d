// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::{BezPath, Point, Vec2};

use crate::number::read_number;
use crate::scanner::{Abort, CharExt, Scanner, Step, StepExt};
use crate::{DefaultHandler, ParserBase};

/// Representation of the path segment.
///
/// Relative segments are kept relative. Implicit commands are emitted
/// as explicit ones: a repeated MoveTo becomes a LineTo.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PathSegment {
    MoveTo {
        abs: bool,
        x: f32,
        y: f32,
    },
    LineTo {
        abs: bool,
        x: f32,
        y: f32,
    },
    HorizontalLineTo {
        abs: bool,
        x: f32,
    },
    VerticalLineTo {
        abs: bool,
        y: f32,
    },
    CurveTo {
        abs: bool,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    },
    SmoothCurveTo {
        abs: bool,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    },
    Quadratic {
        abs: bool,
        x1: f32,
        y1: f32,
        x: f32,
        y: f32,
    },
    SmoothQuadratic {
        abs: bool,
        x: f32,
        y: f32,
    },
    EllipticalArc {
        abs: bool,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    },
    ClosePath {
        abs: bool,
    },
}

impl PathSegment {
    /// Returns the command letter of the segment.
    pub fn command(&self) -> char {
        let (abs, c) = match *self {
            PathSegment::MoveTo { abs, .. } => (abs, 'm'),
            PathSegment::LineTo { abs, .. } => (abs, 'l'),
            PathSegment::HorizontalLineTo { abs, .. } => (abs, 'h'),
            PathSegment::VerticalLineTo { abs, .. } => (abs, 'v'),
            PathSegment::CurveTo { abs, .. } => (abs, 'c'),
            PathSegment::SmoothCurveTo { abs, .. } => (abs, 's'),
            PathSegment::Quadratic { abs, .. } => (abs, 'q'),
            PathSegment::SmoothQuadratic { abs, .. } => (abs, 't'),
            PathSegment::EllipticalArc { abs, .. } => (abs, 'a'),
            PathSegment::ClosePath { abs } => (abs, 'z'),
        };

        if abs {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Checks that the segment uses absolute coordinates.
    pub fn is_abs(&self) -> bool {
        self.command().is_ascii_uppercase()
    }
}

/// A [path data] events receiver.
///
/// [path data]: https://www.w3.org/TR/SVG11/paths.html#PathData
pub trait PathHandler {
    /// Called once before any segment.
    fn start_path(&mut self) {}

    /// Called for each parsed segment.
    fn segment(&mut self, _segment: PathSegment) {}

    /// Called once after the last segment.
    fn end_path(&mut self) {}
}

impl PathHandler for DefaultHandler {}

impl PathHandler for Vec<PathSegment> {
    fn start_path(&mut self) {
        self.clear();
    }

    fn segment(&mut self, segment: PathSegment) {
        self.push(segment);
    }
}

impl<T: PathHandler + ?Sized> PathHandler for &mut T {
    fn start_path(&mut self) {
        (**self).start_path()
    }

    fn segment(&mut self, segment: PathSegment) {
        (**self).segment(segment)
    }

    fn end_path(&mut self) {
        (**self).end_path()
    }
}

/// A [path data] parser.
///
/// # Recovery
///
/// When the error handler accepts an error, the malformed command is
/// dropped and parsing continues from the next command letter.
/// A path that does not start with a MoveTo continues from the next MoveTo.
///
/// # Examples
///
/// ```
/// use svgmicro::{Parser, PathParser, PathSegment};
///
/// let mut p = PathParser::with_handler(Vec::new());
/// p.parse("M10-20l30.1.5.1-20z").unwrap();
///
/// assert_eq!(p.handler(), &[
///     PathSegment::MoveTo { abs: true, x: 10.0, y: -20.0 },
///     PathSegment::LineTo { abs: false, x: 30.1, y: 0.5 },
///     PathSegment::LineTo { abs: false, x: 0.1, y: -20.0 },
///     PathSegment::ClosePath { abs: false },
/// ]);
/// ```
///
/// [path data]: https://www.w3.org/TR/SVG11/paths.html#PathData
#[derive(Debug)]
pub struct PathParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(PathParser, PathHandler, parse_path);

#[inline]
fn is_cmd(c: char) -> bool {
    matches!(
        c,
        'M' | 'm' | 'Z' | 'z' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v'
            | 'C' | 'c' | 'S' | 's' | 'Q' | 'q' | 'T' | 't' | 'A' | 'a'
    )
}

fn parse_path<H: PathHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_path();
    s.skip_spaces();

    // The command used for implicit repetition.
    let mut prev_cmd: Option<char> = None;
    while !s.at_end() {
        let res = next_segment(s, &mut prev_cmd).recoverable()?;
        match res {
            Some(segment) => {
                h.segment(segment);
                segment_separator(s)?;
            }
            None => {
                if prev_cmd.is_none() {
                    s.skip_until(|c| c == 'M' || c == 'm');
                } else {
                    s.skip_until(is_cmd);
                }
            }
        }
    }

    h.end_path();
    Ok(())
}

fn next_segment(s: &mut Scanner, prev_cmd: &mut Option<char>) -> Step<PathSegment> {
    let cmd = match (s.current(), *prev_cmd) {
        (Some(c), None) if c == 'M' || c == 'm' => {
            s.read();
            c
        }
        (Some(c), Some(_)) if is_cmd(c) => {
            s.read();
            c
        }
        // Implicit repetition. Not allowed after ClosePath.
        (Some(c), Some(prev)) if c.is_number_start() && prev != 'Z' && prev != 'z' => prev,
        _ => return Err(s.unexpected()),
    };

    s.skip_spaces();

    let abs = cmd.is_ascii_uppercase();
    let segment = match cmd.to_ascii_lowercase() {
        'm' => PathSegment::MoveTo {
            abs,
            x: read_number(s)?,
            y: next_number(s)?,
        },
        'l' => PathSegment::LineTo {
            abs,
            x: read_number(s)?,
            y: next_number(s)?,
        },
        'h' => PathSegment::HorizontalLineTo { abs, x: read_number(s)? },
        'v' => PathSegment::VerticalLineTo { abs, y: read_number(s)? },
        'c' => PathSegment::CurveTo {
            abs,
            x1: read_number(s)?,
            y1: next_number(s)?,
            x2: next_number(s)?,
            y2: next_number(s)?,
            x: next_number(s)?,
            y: next_number(s)?,
        },
        's' => PathSegment::SmoothCurveTo {
            abs,
            x2: read_number(s)?,
            y2: next_number(s)?,
            x: next_number(s)?,
            y: next_number(s)?,
        },
        'q' => PathSegment::Quadratic {
            abs,
            x1: read_number(s)?,
            y1: next_number(s)?,
            x: next_number(s)?,
            y: next_number(s)?,
        },
        't' => PathSegment::SmoothQuadratic {
            abs,
            x: read_number(s)?,
            y: next_number(s)?,
        },
        'a' => PathSegment::EllipticalArc {
            abs,
            rx: read_number(s)?,
            ry: next_number(s)?,
            x_axis_rotation: next_number(s)?,
            large_arc: next_flag(s)?,
            sweep: next_flag(s)?,
            x: next_number(s)?,
            y: next_number(s)?,
        },
        _ => PathSegment::ClosePath { abs },
    };

    // An implicit command after MoveTo is LineTo.
    *prev_cmd = Some(match cmd {
        'M' => 'L',
        'm' => 'l',
        c => c,
    });

    Ok(segment)
}

fn next_number(s: &mut Scanner) -> Step<f32> {
    s.skip_comma_spaces();
    read_number(s)
}

/// Arc flags are single characters, so `11` is two flags and not a number.
fn next_flag(s: &mut Scanner) -> Step<bool> {
    s.skip_comma_spaces();
    let f = match s.current() {
        Some('0') => false,
        Some('1') => true,
        _ => return Err(s.unexpected()),
    };

    s.read();
    Ok(f)
}

/// Skips the separator after a segment. A comma has to be followed by a coordinate.
fn segment_separator(s: &mut Scanner) -> Step {
    if s.skip_comma_spaces() && !s.current().map_or(false, |c| c.is_number_start()) {
        return match s.unexpected() {
            Abort::Recover => Ok(()),
            e => Err(e),
        };
    }

    Ok(())
}

/// Builds a [`BezPath`] from path events.
///
/// Relative segments are resolved, smooth curves get their reflected
/// control points and arcs are converted into cubic curves.
#[derive(Clone, Default, Debug)]
pub struct PathProducer {
    path: BezPath,
    current: Point,
    subpath_start: Point,
    // The last control point of a cubic or a quadratic curve.
    prev_cubic: Option<Point>,
    prev_quad: Option<Point>,
    need_move: bool,
}

impl PathProducer {
    /// Creates a new producer.
    pub fn new() -> Self {
        PathProducer::default()
    }

    /// Returns the accumulated path.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Returns the accumulated path.
    pub fn into_path(self) -> BezPath {
        self.path
    }

    fn resolve(&self, abs: bool, x: f32, y: f32) -> Point {
        let p = Point::new(f64::from(x), f64::from(y));
        if abs {
            p
        } else {
            self.current + p.to_vec2()
        }
    }

    // A segment after ClosePath starts from the subpath start.
    fn ensure_moved(&mut self) {
        if self.need_move {
            self.path.move_to(self.current);
            self.need_move = false;
        }
    }
}

impl PathHandler for PathProducer {
    fn start_path(&mut self) {
        *self = PathProducer::default();
    }

    fn segment(&mut self, segment: PathSegment) {
        let mut prev_cubic = None;
        let mut prev_quad = None;

        if let PathSegment::MoveTo { abs, x, y } = segment {
            let p = self.resolve(abs, x, y);
            self.path.move_to(p);
            self.current = p;
            self.subpath_start = p;
            self.need_move = false;
            self.prev_cubic = None;
            self.prev_quad = None;
            return;
        }

        self.ensure_moved();

        match segment {
            PathSegment::LineTo { abs, x, y } => {
                let p = self.resolve(abs, x, y);
                self.path.line_to(p);
                self.current = p;
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = f64::from(x);
                let p = if abs {
                    Point::new(x, self.current.y)
                } else {
                    Point::new(self.current.x + x, self.current.y)
                };
                self.path.line_to(p);
                self.current = p;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = f64::from(y);
                let p = if abs {
                    Point::new(self.current.x, y)
                } else {
                    Point::new(self.current.x, self.current.y + y)
                };
                self.path.line_to(p);
                self.current = p;
            }
            PathSegment::CurveTo { abs, x1, y1, x2, y2, x, y } => {
                let p1 = self.resolve(abs, x1, y1);
                let p2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);
                self.path.curve_to(p1, p2, p);
                self.current = p;
                prev_cubic = Some(p2);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let p1 = reflect(self.prev_cubic, self.current);
                let p2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);
                self.path.curve_to(p1, p2, p);
                self.current = p;
                prev_cubic = Some(p2);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let p1 = self.resolve(abs, x1, y1);
                let p = self.resolve(abs, x, y);
                self.path.quad_to(p1, p);
                self.current = p;
                prev_quad = Some(p1);
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let p1 = reflect(self.prev_quad, self.current);
                let p = self.resolve(abs, x, y);
                self.path.quad_to(p1, p);
                self.current = p;
                prev_quad = Some(p1);
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let p = self.resolve(abs, x, y);
                let svg_arc = kurbo::SvgArc {
                    from: self.current,
                    to: p,
                    radii: Vec2::new(f64::from(rx), f64::from(ry)),
                    x_rotation: f64::from(x_axis_rotation).to_radians(),
                    large_arc,
                    sweep,
                };

                match kurbo::Arc::from_svg_arc(&svg_arc) {
                    Some(arc) => {
                        let path = &mut self.path;
                        arc.to_cubic_beziers(0.1, |p1, p2, p| {
                            path.curve_to(p1, p2, p);
                        });
                    }
                    None => {
                        self.path.line_to(p);
                    }
                }

                self.current = p;
            }
            PathSegment::ClosePath { .. } => {
                self.path.close_path();
                self.current = self.subpath_start;
                self.need_move = true;
            }
            PathSegment::MoveTo { .. } => {}
        }

        self.prev_cubic = prev_cubic;
        self.prev_quad = prev_quad;
    }
}

// The reflection of the previous control point, or the current point
// when the previous segment was of a different kind.
fn reflect(control: Option<Point>, current: Point) -> Point {
    match control {
        Some(c) => current + (current - c),
        None => current,
    }
}
