// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::{self, Read};
use std::str::FromStr;

use svgmicro::*;

#[derive(Default)]
struct Events(Vec<String>);

impl Events {
    fn push(&mut self, s: impl Into<String>) {
        self.0.push(s.into());
    }
}

impl PathHandler for Events {
    fn start_path(&mut self) { self.push("start"); }
    fn segment(&mut self, seg: PathSegment) { self.push(format!("{:?}", seg)); }
    fn end_path(&mut self) { self.push("end"); }
}

impl PointsHandler for Events {
    fn start_points(&mut self) { self.push("start"); }
    fn point(&mut self, x: f32, y: f32) { self.push(format!("{} {}", x, y)); }
    fn end_points(&mut self) { self.push("end"); }
}

impl TransformListHandler for Events {
    fn start_transform_list(&mut self) { self.push("start"); }
    fn transform(&mut self, token: TransformListToken) { self.push(format!("{:?}", token)); }
    fn end_transform_list(&mut self) { self.push("end"); }
}

impl LengthHandler for Events {
    fn start_length(&mut self) { self.push("start"); }
    fn length_value(&mut self, v: f32) { self.push(v.to_string()); }
    fn length_unit(&mut self, u: LengthUnit) { self.push(format!("{:?}", u)); }
    fn end_length(&mut self) { self.push("end"); }
}

impl PreserveAspectRatioHandler for Events {
    fn start_preserve_aspect_ratio(&mut self) { self.push("start"); }
    fn defer(&mut self) { self.push("defer"); }
    fn align(&mut self, a: Align) { self.push(format!("{:?}", a)); }
    fn meet_or_slice(&mut self, v: MeetOrSlice) { self.push(format!("{:?}", v)); }
    fn end_preserve_aspect_ratio(&mut self) { self.push("end"); }
}

#[test]
fn path_events() {
    let mut p = PathParser::with_handler(Events::default());
    p.parse("M 10,10 L 20,20 Z").unwrap();
    assert_eq!(p.handler().0, &[
        "start",
        "MoveTo { abs: true, x: 10.0, y: 10.0 }",
        "LineTo { abs: true, x: 20.0, y: 20.0 }",
        "ClosePath { abs: true }",
        "end",
    ]);
}

#[test]
fn path_round_trip() {
    let text = "M10-20l30.5.5.1-20c1 2 3 4 5 6a25 25 -30 0110 10h5v-5q1 1 2 2t3 3s1 1 2 2z";
    let mut p = PathParser::with_handler(Vec::new());
    p.parse(text).unwrap();
    let segments = p.into_handler();

    let written = write_path(&segments);
    let mut p = PathParser::with_handler(Vec::new());
    p.parse(&written).unwrap();
    assert_eq!(p.handler(), &segments);
}

#[test]
fn path_missing_coordinate() {
    let e = PathParser::new().parse("M 10").unwrap_err();
    assert_eq!(e.kind(), ErrorKind::FloatFormat);
    assert_eq!(e.pos(), Some(TextPos::new(1, 5)));
    assert_eq!(e.line(), 1);
    assert_eq!(e.column(), 5);
}

#[test]
fn points_events() {
    let mut p = PointsParser::with_handler(Events::default());
    p.parse("1,2 3,4").unwrap();
    assert_eq!(p.handler().0, &["start", "1 2", "3 4", "end"]);
}

#[test]
fn transform_events() {
    let mut p = TransformListParser::with_handler(Events::default());
    p.parse("translate(10) scale(2, 3)").unwrap();
    assert_eq!(p.handler().0, &[
        "start",
        "Translate { tx: 10.0, ty: None }",
        "Scale { sx: 2.0, sy: Some(3.0) }",
        "end",
    ]);
}

#[test]
fn length_events() {
    let mut p = LengthParser::with_handler(Events::default());
    p.parse("12.5mm").unwrap();
    assert_eq!(p.handler().0, &["start", "12.5", "Mm", "end"]);

    let mut p = LengthParser::with_handler(Events::default());
    p.parse("-3").unwrap();
    assert_eq!(p.handler().0, &["start", "-3", "end"]);
}

#[test]
fn aspect_ratio_events() {
    let mut p = PreserveAspectRatioParser::with_handler(Events::default());
    p.parse("defer xMaxYMin slice").unwrap();
    assert_eq!(p.handler().0, &["start", "defer", "XMaxYMin", "Slice", "end"]);
}

#[test]
fn bracketing_with_recovery() {
    let mut errors: Vec<ParseError> = Vec::new();
    let mut events = Events::default();
    {
        let mut p = PointsParser::with_handler(&mut events);
        p.set_error_handler(&mut errors);
        p.parse("1,2 x 3,4").unwrap();
    }

    assert!(!errors.is_empty());
    assert_eq!(events.0.first().map(String::as_str), Some("start"));
    assert_eq!(events.0.last().map(String::as_str), Some("end"));
}

#[test]
fn no_end_event_on_abort() {
    let mut p = PathParser::with_handler(Events::default());
    assert!(p.parse("M 10 10 L x").is_err());
    assert_eq!(p.handler().0.first().map(String::as_str), Some("start"));
    assert!(!p.handler().0.iter().any(|e| e == "end"));
}

#[test]
fn parser_is_reusable() {
    let mut p = PathParser::with_handler(Vec::new());
    assert!(p.parse("M 1").is_err());
    p.parse("M 1 2").unwrap();
    assert_eq!(p.handler(), &[PathSegment::MoveTo { abs: true, x: 1.0, y: 2.0 }]);
}

#[test]
fn reader_input() {
    let mut p = TransformListParser::with_handler(TransformProducer::new());
    p.parse_reader("translate(10 20)\r\nscale(2)".as_bytes()).unwrap();
    let ts = p.handler().to_transform();
    assert_eq!((ts.a, ts.d, ts.e, ts.f), (2.0, 2.0, 10.0, 20.0));
}

#[test]
fn reader_position_after_crlf() {
    let e = PointsParser::new().parse_reader("1 2\r\n3 x".as_bytes()).unwrap_err();
    assert_eq!(e.pos(), Some(TextPos::new(2, 3)));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

#[test]
fn io_error() {
    let e = PathParser::new().parse_reader(FailingReader).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Io);
    assert_eq!(e.pos(), None);
    assert_eq!(e.line(), -1);
    assert_eq!(e.message(), "I/O error: disk on fire");
    assert!(e.cause().is_some());
}

#[test]
fn localized_messages() {
    let mut p = PreserveAspectRatioParser::new();
    p.register_message("fr", "character.unexpected", "caractère inattendu {0}");

    p.set_locale("fr_CA");
    let e = p.parse("Z").unwrap_err();
    assert_eq!(e.to_string(), "caractère inattendu 'Z' at 1:1");

    p.set_locale("de");
    let e = p.parse("Z").unwrap_err();
    assert_eq!(e.to_string(), "unexpected 'Z' at 1:1");
}

#[test]
fn root_message_override() {
    let mut p = PreserveAspectRatioParser::new();
    p.register_message("", "character.unexpected", "bad {0}");
    let e = p.parse("Z").unwrap_err();
    assert_eq!(e.message(), "bad 'Z'");
    assert_eq!(e.kind(), ErrorKind::UnexpectedCharacter);
}

#[test]
fn closure_error_handler() {
    let mut kinds = Vec::new();
    {
        let mut p = LengthListParser::new();
        p.set_error_handler(error_handler_fn(|e: ParseError| {
            kinds.push(e.kind());
            Ok(())
        }));
        p.parse("1px 2pq 3").unwrap();
    }
    assert_eq!(kinds, vec![ErrorKind::UnexpectedCharacter]);
}

#[test]
fn view_spec() {
    let v = ViewSpec::from_str(
        "svgView(viewBox(0,0,100,50);preserveAspectRatio(none);zoomAndPan(disable))",
    ).unwrap();
    assert_eq!(v.view_box, Some(kurbo_rect(0.0, 0.0, 100.0, 50.0)));
    assert_eq!(v.aspect_ratio.map(|a| a.align), Some(Align::None));
    assert_eq!(v.zoom_and_pan, Some(ZoomAndPan::Disable));
}

fn kurbo_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> kurbo::Rect {
    kurbo::Rect::new(x0, y0, x1, y1)
}

#[test]
fn clock_value() {
    let v = ClockValue::from_str("01:30.5").unwrap();
    assert_eq!(v.seconds, 90.5);
}

#[test]
fn angle_value() {
    let a = Angle::from_str("100grad").unwrap();
    assert_eq!(a.unit, AngleUnit::Gradians);
    assert!((a.to_degrees() - 90.0).abs() < 1e-9);
}
