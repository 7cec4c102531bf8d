// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use kurbo::Rect;

use crate::aspect_ratio::aspect_ratio;
use crate::messages::Found;
use crate::number::read_number;
use crate::scanner::{Abort, CharExt, Scanner, Step, StepExt};
use crate::transform::transforms;
use crate::{
    Align, AspectRatio, DefaultHandler, ErrorKind, MeetOrSlice, ParseError, Parser, ParserBase,
    PreserveAspectRatioHandler, Transform, TransformListHandler, TransformListToken,
    TransformProducer,
};

/// A `zoomAndPan` value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum ZoomAndPan {
    Magnify,
    Disable,
}

/// A [fragment identifier] events receiver.
///
/// The `preserveAspectRatio(...)` and `transform(...)` clauses of `svgView`
/// are reported through the supertraits.
///
/// [fragment identifier]: https://www.w3.org/TR/SVG11/linking.html#SVGFragmentIdentifiers
pub trait FragmentIdentifierHandler: PreserveAspectRatioHandler + TransformListHandler {
    /// Called before the fragment identifier.
    fn start_fragment_identifier(&mut self) {}

    /// Called for a bare name or an `xpointer(id('...'))` reference.
    fn id_reference(&mut self, _id: &str) {}

    /// Called for the `viewBox(...)` clause.
    fn view_box(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {}

    /// Called before the names of the `viewTarget(...)` clause.
    fn start_view_target(&mut self) {}

    /// Called for each name of the `viewTarget(...)` clause.
    fn view_target(&mut self, _name: &str) {}

    /// Called after the names of the `viewTarget(...)` clause.
    fn end_view_target(&mut self) {}

    /// Called for the `zoomAndPan(...)` clause.
    fn zoom_and_pan(&mut self, _value: ZoomAndPan) {}

    /// Called after the fragment identifier.
    fn end_fragment_identifier(&mut self) {}
}

impl FragmentIdentifierHandler for DefaultHandler {}

impl<T: FragmentIdentifierHandler + ?Sized> FragmentIdentifierHandler for &mut T {
    fn start_fragment_identifier(&mut self) {
        (**self).start_fragment_identifier()
    }

    fn id_reference(&mut self, id: &str) {
        (**self).id_reference(id)
    }

    fn view_box(&mut self, x: f32, y: f32, width: f32, height: f32) {
        (**self).view_box(x, y, width, height)
    }

    fn start_view_target(&mut self) {
        (**self).start_view_target()
    }

    fn view_target(&mut self, name: &str) {
        (**self).view_target(name)
    }

    fn end_view_target(&mut self) {
        (**self).end_view_target()
    }

    fn zoom_and_pan(&mut self, value: ZoomAndPan) {
        (**self).zoom_and_pan(value)
    }

    fn end_fragment_identifier(&mut self) {
        (**self).end_fragment_identifier()
    }
}

/// An SVG [fragment identifier] parser.
///
/// Accepts a bare name (`MyDrawing`), an `xpointer(id('MyDrawing'))`
/// reference and an `svgView(...)` specification. Clauses of `svgView`
/// can appear in any order and are separated by `;`.
///
/// # Recovery
///
/// A malformed `svgView` clause is skipped up to the next `;`.
///
/// # Examples
///
/// ```
/// use svgmicro::{FragmentIdentifierParser, Parser, ViewSpec, ZoomAndPan};
///
/// let mut p = FragmentIdentifierParser::with_handler(ViewSpec::default());
/// p.parse("svgView(viewBox(0,0,200,100);zoomAndPan(disable))").unwrap();
/// let view = p.into_handler();
/// assert_eq!(view.view_box, Some(kurbo::Rect::new(0.0, 0.0, 200.0, 100.0)));
/// assert_eq!(view.zoom_and_pan, Some(ZoomAndPan::Disable));
/// ```
///
/// [fragment identifier]: https://www.w3.org/TR/SVG11/linking.html#SVGFragmentIdentifiers
#[derive(Debug)]
pub struct FragmentIdentifierParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(
    FragmentIdentifierParser,
    FragmentIdentifierHandler,
    parse_fragment_identifier
);

fn parse_fragment_identifier<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_fragment_identifier();
    if fragment(s, h).recoverable()?.is_none() {
        s.skip_until(|_| false);
    }

    s.expect_end()?;
    h.end_fragment_identifier();
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Form {
    XPointer,
    SvgView,
}

fn fragment<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step {
    let (prefix, form) = match s.current() {
        None => return Ok(()),
        Some('x') => ("xpointer(", Form::XPointer),
        Some('s') => ("svgView(", Form::SvgView),
        Some(c) if c.is_name_start() => {
            let name = s.name()?;
            h.id_reference(&name);
            return Ok(());
        }
        Some(_) => return Err(s.unexpected()),
    };

    // Both prefixes are valid name starts, so a mismatch means a bare name.
    let mut name = String::new();
    for c in prefix.chars() {
        if s.is_curr(c) {
            name.push(c);
            s.read();
        } else {
            s.name_chars(&mut name);
            h.id_reference(&name);
            return Ok(());
        }
    }

    match form {
        Form::XPointer => xpointer(s, h),
        Form::SvgView => svg_view(s, h),
    }
}

/// Parses `id('name'))` after `xpointer(`.
fn xpointer<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step {
    s.keyword(&[("id(", ())])?;

    let quote = match s.current() {
        Some(q) if q == '\'' || q == '"' => q,
        c => {
            let found = Found(c);
            return Err(s.error(ErrorKind::ExpectedCharacter, &[&'\'', &found]));
        }
    };
    s.read();

    let id = s.name()?;
    h.id_reference(&id);

    s.expect(quote)?;
    s.expect(')')?;
    s.expect(')')
}

/// Parses the clauses and the closing parenthesis after `svgView(`.
fn svg_view<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step {
    if view_clauses(s, h)? {
        return Ok(());
    }

    s.expect(')')
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Clause {
    ViewBox,
    PreserveAspectRatio,
    Transform,
    ZoomAndPan,
    ViewTarget,
}

const CLAUSES: &[(&str, Clause)] = &[
    ("viewBox(", Clause::ViewBox),
    ("preserveAspectRatio(", Clause::PreserveAspectRatio),
    ("transform(", Clause::Transform),
    ("zoomAndPan(", Clause::ZoomAndPan),
    ("viewTarget(", Clause::ViewTarget),
];

/// Returns `true` when recovery skipped to the end of input.
fn view_clauses<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step<bool> {
    loop {
        if clause(s, h).recoverable()?.is_none() {
            s.skip_until(|c| c == ';');
            if s.at_end() {
                return Ok(true);
            }
        }

        if !s.consume(';') {
            return Ok(false);
        }

        while s.consume(';') {}

        if s.is_curr(')') || s.at_end() {
            return Ok(false);
        }
    }
}

fn clause<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step {
    match s.keyword(CLAUSES)? {
        Clause::ViewBox => {
            let x = read_number(s)?;
            s.expect(',')?;
            let y = read_number(s)?;
            s.expect(',')?;
            let w = read_number(s)?;
            s.expect(',')?;
            let height = read_number(s)?;
            s.expect(')')?;
            h.view_box(x, y, w, height);
        }
        Clause::PreserveAspectRatio => {
            h.start_preserve_aspect_ratio();
            aspect_ratio(s, h)?;
            h.end_preserve_aspect_ratio();
            s.expect(')')?;
        }
        Clause::Transform => {
            h.start_transform_list();
            transforms(s, h)?;
            h.end_transform_list();
            s.expect(')')?;
        }
        Clause::ZoomAndPan => {
            let value = s.keyword(&[
                ("magnify", ZoomAndPan::Magnify),
                ("disable", ZoomAndPan::Disable),
            ])?;
            s.expect(')')?;
            h.zoom_and_pan(value);
        }
        Clause::ViewTarget => {
            h.start_view_target();
            let res = view_targets(s, h).recoverable()?;
            h.end_view_target();
            if res.is_none() {
                return Err(Abort::Recover);
            }
        }
    }

    Ok(())
}

/// Parses names separated by `,` or `;` up to the closing parenthesis.
fn view_targets<H: FragmentIdentifierHandler>(s: &mut Scanner, h: &mut H) -> Step {
    loop {
        let name = s.name()?;
        h.view_target(&name);

        match s.current() {
            Some(')') => {
                s.read();
                return Ok(());
            }
            Some(',') | Some(';') => s.read(),
            _ => return Err(s.unexpected()),
        }
    }
}

/// A view specification assembled from fragment identifier events.
///
/// Fields are `None` when the matching clause is absent.
#[derive(Clone, Default, Debug)]
pub struct ViewSpec {
    /// A bare name or an `xpointer` reference.
    pub id: Option<String>,
    /// The `viewBox(x,y,width,height)` clause.
    pub view_box: Option<Rect>,
    /// The `preserveAspectRatio(...)` clause.
    pub aspect_ratio: Option<AspectRatio>,
    /// The `transform(...)` clause, composed into a single transform.
    pub transform: Option<Transform>,
    /// The `zoomAndPan(...)` clause.
    pub zoom_and_pan: Option<ZoomAndPan>,
    /// Names of the `viewTarget(...)` clause.
    pub view_targets: Vec<String>,
    ts: TransformProducer,
}

impl PreserveAspectRatioHandler for ViewSpec {
    fn start_preserve_aspect_ratio(&mut self) {
        self.aspect_ratio = Some(AspectRatio::default());
    }

    fn defer(&mut self) {
        if let Some(ref mut v) = self.aspect_ratio {
            v.defer();
        }
    }

    fn align(&mut self, align: Align) {
        if let Some(ref mut v) = self.aspect_ratio {
            v.align(align);
        }
    }

    fn meet_or_slice(&mut self, value: MeetOrSlice) {
        if let Some(ref mut v) = self.aspect_ratio {
            v.meet_or_slice(value);
        }
    }
}

impl TransformListHandler for ViewSpec {
    fn start_transform_list(&mut self) {
        self.ts.start_transform_list();
    }

    fn transform(&mut self, token: TransformListToken) {
        TransformListHandler::transform(&mut self.ts, token);
    }

    fn end_transform_list(&mut self) {
        self.transform = Some(self.ts.to_transform());
    }
}

impl FragmentIdentifierHandler for ViewSpec {
    fn start_fragment_identifier(&mut self) {
        *self = ViewSpec::default();
    }

    fn id_reference(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    fn view_box(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x, y) = (f64::from(x), f64::from(y));
        self.view_box = Some(Rect::new(x, y, x + f64::from(width), y + f64::from(height)));
    }

    fn view_target(&mut self, name: &str) {
        self.view_targets.push(name.to_string());
    }

    fn zoom_and_pan(&mut self, value: ZoomAndPan) {
        self.zoom_and_pan = Some(value);
    }
}

impl FromStr for ViewSpec {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = FragmentIdentifierParser::with_handler(ViewSpec::default());
        p.parse(text)?;
        Ok(p.into_handler())
    }
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::TextPos;

    #[derive(Default)]
    struct Events(Vec<String>);

    impl PreserveAspectRatioHandler for Events {
        fn start_preserve_aspect_ratio(&mut self) { self.0.push("start par".to_string()); }
        fn align(&mut self, a: Align) { self.0.push(format!("{:?}", a)); }
        fn meet_or_slice(&mut self, v: MeetOrSlice) { self.0.push(format!("{:?}", v)); }
        fn end_preserve_aspect_ratio(&mut self) { self.0.push("end par".to_string()); }
    }

    impl TransformListHandler for Events {
        fn start_transform_list(&mut self) { self.0.push("start transform".to_string()); }
        fn transform(&mut self, t: TransformListToken) { self.0.push(format!("{:?}", t)); }
        fn end_transform_list(&mut self) { self.0.push("end transform".to_string()); }
    }

    impl FragmentIdentifierHandler for Events {
        fn start_fragment_identifier(&mut self) { self.0.push("start".to_string()); }
        fn id_reference(&mut self, id: &str) { self.0.push(format!("id {}", id)); }
        fn view_box(&mut self, x: f32, y: f32, w: f32, h: f32) {
            self.0.push(format!("viewBox {} {} {} {}", x, y, w, h));
        }
        fn start_view_target(&mut self) { self.0.push("start target".to_string()); }
        fn view_target(&mut self, name: &str) { self.0.push(format!("target {}", name)); }
        fn end_view_target(&mut self) { self.0.push("end target".to_string()); }
        fn zoom_and_pan(&mut self, v: ZoomAndPan) { self.0.push(format!("{:?}", v)); }
        fn end_fragment_identifier(&mut self) { self.0.push("end".to_string()); }
    }

    macro_rules! test {
        ($name:ident, $text:expr, $( $e:expr ),*) => (
            #[test]
            fn $name() {
                let mut p = FragmentIdentifierParser::with_handler(Events::default());
                p.parse($text).unwrap();
                let expected: Vec<&str> = vec![ $($e),* ];
                assert_eq!(p.handler().0, expected);
            }
        )
    }

    test!(parse_1, "MyDrawing", "start", "id MyDrawing", "end");
    test!(parse_2, "xpointer(id('MyView'))", "start", "id MyView", "end");
    test!(parse_3, "xpointer(id(\"MyView\"))", "start", "id MyView", "end");
    test!(parse_4, "xpoint", "start", "id xpoint", "end");
    test!(parse_5, "svgViewer", "start", "id svgViewer", "end");
    test!(parse_6, "s.1", "start", "id s.1", "end");
    test!(parse_7, "", "start", "end");

    test!(view_1, "svgView(viewBox(0,200,1000,1000))",
        "start", "viewBox 0 200 1000 1000", "end");

    test!(view_2, "svgView(preserveAspectRatio(xMidYMid slice);zoomAndPan(magnify))",
        "start", "start par", "XMidYMid", "Slice", "end par", "Magnify", "end");

    test!(view_3, "svgView(transform(rotate(90) translate(10));viewTarget(a,b;c))",
        "start",
        "start transform",
        "Rotate { angle: 90.0, center: None }",
        "Translate { tx: 10.0, ty: None }",
        "end transform",
        "start target", "target a", "target b", "target c", "end target",
        "end");

    test!(view_4, "svgView(zoomAndPan(disable);;viewBox(1,2,3,4);)",
        "start", "Disable", "viewBox 1 2 3 4", "end");

    macro_rules! test_err {
        ($name:ident, $text:expr, $result:expr) => (
            #[test]
            fn $name() {
                assert_eq!(ViewSpec::from_str($text).unwrap_err().to_string(), $result);
            }
        )
    }

    test_err!(err_1, "1abc", "unexpected '1' at 1:1");
    test_err!(err_2, "xpointer(id(x))", "expected ''' instead of 'x' at 1:13");
    test_err!(err_3, "xpointer(id('x')", "expected ')' instead of end of input at 1:17");
    test_err!(err_4, "svgView()", "unexpected ')' at 1:9");
    test_err!(err_5, "svgView(viewBox(0 0 1 1))", "expected ',' instead of ' ' at 1:18");
    test_err!(err_6, "svgView(zoomAndPan(magnify)", "expected ')' instead of end of input at 1:28");
    test_err!(err_7, "svgView(zoomAndPan(magnify)) x", "expected end of input instead of ' ' at 1:29");
    test_err!(err_8, "name#", "expected end of input instead of '#' at 1:5");
    test_err!(err_9, "svgView(preserveAspectRatio())", "unexpected ')' at 1:29");

    #[test]
    fn view_spec() {
        let v = ViewSpec::from_str(
            "svgView(viewBox(0,0,20,10);transform(scale(2));preserveAspectRatio(none);viewTarget(t))"
        ).unwrap();
        assert_eq!(v.id, None);
        assert_eq!(v.view_box, Some(Rect::new(0.0, 0.0, 20.0, 10.0)));
        assert_eq!(v.transform, Some(Transform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0)));
        assert_eq!(v.aspect_ratio.map(|a| a.align), Some(Align::None));
        assert_eq!(v.zoom_and_pan, None);
        assert_eq!(v.view_targets, vec!["t".to_string()]);
    }

    #[test]
    fn recover_clause() {
        let mut errors: Vec<ParseError> = Vec::new();
        let mut events = Events::default();
        {
            let mut p = FragmentIdentifierParser::with_handler(&mut events);
            p.set_error_handler(&mut errors);
            p.parse("svgView(viewBox(0,0,1);zoomAndPan(magnify))").unwrap();
        }
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].pos(), Some(TextPos::new(1, 22)));
        assert_eq!(events.0, &["start", "Magnify", "end"]);
    }

    #[test]
    fn recover_empty_aspect_ratio() {
        let mut errors: Vec<ParseError> = Vec::new();
        let mut events = Events::default();
        {
            let mut p = FragmentIdentifierParser::with_handler(&mut events);
            p.set_error_handler(&mut errors);
            p.parse("svgView(preserveAspectRatio();zoomAndPan(disable))").unwrap();
        }
        assert_eq!(errors.len(), 1);
        assert_eq!(events.0, &["start", "start par", "end par", "Disable", "end"]);
    }

    #[test]
    fn recover_to_end() {
        let mut errors: Vec<ParseError> = Vec::new();
        let mut events = Events::default();
        {
            let mut p = FragmentIdentifierParser::with_handler(&mut events);
            p.set_error_handler(&mut errors);
            p.parse("svgView(viewTarget(a b))").unwrap();
        }
        assert_eq!(errors.len(), 1);
        assert_eq!(events.0, &["start", "start target", "target a", "end target", "end"]);
    }
}
