// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{PathHandler, PathSegment};

/// Writes path segments back as path data.
///
/// The output always has explicit commands separated by spaces,
/// so parsing it again reports the same segments.
///
/// # Examples
///
/// ```
/// use svgmicro::{Parser, PathParser, PathWriter};
///
/// let mut p = PathParser::with_handler(PathWriter::new());
/// p.parse("M10,20l30-40z").unwrap();
/// assert_eq!(p.handler().as_str(), "M 10 20 l 30 -40 z");
/// ```
#[derive(Clone, Default, Debug)]
pub struct PathWriter {
    buf: String,
}

impl PathWriter {
    /// Creates a new writer.
    pub fn new() -> Self {
        PathWriter::default()
    }

    /// Returns the written path data.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Returns the written path data.
    pub fn into_string(self) -> String {
        self.buf
    }

    /// Appends a segment.
    pub fn write_segment(&mut self, segment: &PathSegment) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }

        self.buf.push(segment.command());

        match *segment {
            PathSegment::MoveTo { x, y, .. }
            | PathSegment::LineTo { x, y, .. }
            | PathSegment::SmoothQuadratic { x, y, .. } => {
                self.write_nums(&[x, y]);
            }
            PathSegment::HorizontalLineTo { x, .. } => {
                self.write_nums(&[x]);
            }
            PathSegment::VerticalLineTo { y, .. } => {
                self.write_nums(&[y]);
            }
            PathSegment::CurveTo { x1, y1, x2, y2, x, y, .. } => {
                self.write_nums(&[x1, y1, x2, y2, x, y]);
            }
            PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
                self.write_nums(&[x2, y2, x, y]);
            }
            PathSegment::Quadratic { x1, y1, x, y, .. } => {
                self.write_nums(&[x1, y1, x, y]);
            }
            PathSegment::EllipticalArc {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => {
                self.write_nums(&[rx, ry, x_axis_rotation]);
                self.write_flag(large_arc);
                self.write_flag(sweep);
                self.write_nums(&[x, y]);
            }
            PathSegment::ClosePath { .. } => {}
        }
    }

    fn write_nums(&mut self, list: &[f32]) {
        for n in list {
            self.buf.push(' ');
            write_num(*n, &mut self.buf);
        }
    }

    fn write_flag(&mut self, flag: bool) {
        self.buf.push(' ');
        self.buf.push(if flag { '1' } else { '0' });
    }
}

impl PathHandler for PathWriter {
    fn start_path(&mut self) {
        self.buf.clear();
    }

    fn segment(&mut self, segment: PathSegment) {
        self.write_segment(&segment);
    }
}

fn write_num(num: f32, buf: &mut String) {
    // Integers are written without a fraction.
    if num.fract() == 0.0 && num.abs() < 1e9 {
        buf.push_str(&(num as i32).to_string());
    } else {
        buf.push_str(&num.to_string());
    }
}

/// Writes path segments as path data.
pub fn write_path(segments: &[PathSegment]) -> String {
    let mut w = PathWriter::new();
    for seg in segments {
        w.write_segment(seg);
    }

    w.into_string()
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use crate::PathParser;

    macro_rules! test {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                let mut p = PathParser::with_handler(Vec::new());
                p.parse($text).unwrap();
                assert_eq!(write_path(p.handler()), $result);
            }
        )
    }

    test!(write_1, "M 10 20 L 30 40", "M 10 20 L 30 40");
    test!(write_2, "m10-20 30,40", "m 10 -20 l 30 40");
    test!(write_3, "M1.5.5H-2V3.25", "M 1.5 0.5 H -2 V 3.25");
    test!(write_4, "M0 0C1 2 3 4 5 6S7 8 9 10", "M 0 0 C 1 2 3 4 5 6 S 7 8 9 10");
    test!(write_5, "M0 0q1 2 3 4t5 6", "M 0 0 q 1 2 3 4 t 5 6");
    test!(write_6, "M0 0A25 25 -30 0110 10z", "M 0 0 A 25 25 -30 0 1 10 10 z");
    test!(write_7, "", "");

    #[test]
    fn round_trip_random_values() {
        // xorshift32
        let mut state = 0x9E37_79B9u32;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            f32::from_bits(state)
        };

        let mut p = PathParser::with_handler(Vec::new());
        for _ in 0..50_000 {
            let (x, y) = (next(), next());
            if !x.is_finite() || !y.is_finite() {
                continue;
            }

            let seg = PathSegment::MoveTo { abs: true, x, y };
            let text = write_path(&[seg]);
            p.parse(&text).unwrap();
            assert_eq!(p.handler(), &[seg], "{}", text);
        }
    }

    #[test]
    fn round_trip_small_values() {
        let seg = PathSegment::MoveTo { abs: true, x: 7.613115e-10, y: f32::MIN_POSITIVE };
        let text = write_path(&[seg]);
        let mut p = PathParser::with_handler(Vec::new());
        p.parse(&text).unwrap();
        assert_eq!(p.handler(), &[seg]);
    }

    #[test]
    fn writer_as_handler() {
        let mut p = PathParser::with_handler(PathWriter::new());
        p.parse("M 1 2 Z").unwrap();
        assert_eq!(p.handler().as_str(), "M 1 2 Z");
        p.parse("M 3 4").unwrap();
        assert_eq!(p.into_handler().into_string(), "M 3 4");
    }
}
