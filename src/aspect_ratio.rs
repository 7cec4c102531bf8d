// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use crate::scanner::{Abort, CharExt, Scanner, Step, StepExt};
use crate::{DefaultHandler, ParseError, Parser, ParserBase};

/// Representation of the `align` value of the [`preserveAspectRatio`] attribute.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[allow(missing_docs)]
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    None,
    XMinYMin,
    XMidYMin,
    XMaxYMin,
    XMinYMid,
    XMidYMid,
    XMaxYMid,
    XMinYMax,
    XMidYMax,
    XMaxYMax,
}

/// Representation of the `meetOrSlice` value of the [`preserveAspectRatio`] attribute.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[allow(missing_docs)]
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub enum MeetOrSlice {
    Meet,
    Slice,
}

const ALIGNS: &[(&str, Align)] = &[
    ("none", Align::None),
    ("xMinYMin", Align::XMinYMin),
    ("xMidYMin", Align::XMidYMin),
    ("xMaxYMin", Align::XMaxYMin),
    ("xMinYMid", Align::XMinYMid),
    ("xMidYMid", Align::XMidYMid),
    ("xMaxYMid", Align::XMaxYMid),
    ("xMinYMax", Align::XMinYMax),
    ("xMidYMax", Align::XMidYMax),
    ("xMaxYMax", Align::XMaxYMax),
];

const MEET_OR_SLICE: &[(&str, MeetOrSlice)] = &[
    ("meet", MeetOrSlice::Meet),
    ("slice", MeetOrSlice::Slice),
];

/// A [`preserveAspectRatio`] events receiver.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
pub trait PreserveAspectRatioHandler {
    /// Called before the value.
    fn start_preserve_aspect_ratio(&mut self) {}

    /// Called when `defer` is present.
    fn defer(&mut self) {}

    /// Called for the alignment.
    fn align(&mut self, _align: Align) {}

    /// Called when `meet` or `slice` is present.
    fn meet_or_slice(&mut self, _value: MeetOrSlice) {}

    /// Called after the value.
    fn end_preserve_aspect_ratio(&mut self) {}
}

impl PreserveAspectRatioHandler for DefaultHandler {}

impl<T: PreserveAspectRatioHandler + ?Sized> PreserveAspectRatioHandler for &mut T {
    fn start_preserve_aspect_ratio(&mut self) {
        (**self).start_preserve_aspect_ratio()
    }

    fn defer(&mut self) {
        (**self).defer()
    }

    fn align(&mut self, align: Align) {
        (**self).align(align)
    }

    fn meet_or_slice(&mut self, value: MeetOrSlice) {
        (**self).meet_or_slice(value)
    }

    fn end_preserve_aspect_ratio(&mut self) {
        (**self).end_preserve_aspect_ratio()
    }
}

/// A [`preserveAspectRatio`] parser.
///
/// An empty value is allowed and produces no alignment event.
///
/// # Recovery
///
/// A malformed keyword is skipped up to the next whitespace.
///
/// # Examples
///
/// ```
/// use svgmicro::{Align, AspectRatio, Parser, PreserveAspectRatioParser};
///
/// let mut p = PreserveAspectRatioParser::with_handler(AspectRatio::default());
/// p.parse("defer xMinYMax slice").unwrap();
/// assert_eq!(p.handler(), &AspectRatio { defer: true, align: Align::XMinYMax, slice: true });
/// ```
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[derive(Debug)]
pub struct PreserveAspectRatioParser<'e, H = DefaultHandler> {
    base: ParserBase<'e>,
    handler: H,
}

impl_parser!(
    PreserveAspectRatioParser,
    PreserveAspectRatioHandler,
    parse_preserve_aspect_ratio
);

fn parse_preserve_aspect_ratio<H: PreserveAspectRatioHandler>(s: &mut Scanner, h: &mut H) -> Step {
    h.start_preserve_aspect_ratio();
    s.skip_spaces();
    aspect_ratio(s, h)?;
    s.skip_spaces();
    s.expect_end()?;
    h.end_preserve_aspect_ratio();
    Ok(())
}

/// Parses `defer? <align> <meetOrSlice>?` without the surrounding events.
///
/// Stops at the first character that can't continue the value.
pub(crate) fn aspect_ratio<H>(s: &mut Scanner, h: &mut H) -> Step
where
    H: PreserveAspectRatioHandler + ?Sized,
{
    if s.is_curr('d') {
        match s.keyword(&[("defer", ())]).recoverable()? {
            Some(()) => h.defer(),
            None => skip_identifier(s),
        }

        s.skip_spaces();
    }

    match s.current() {
        Some('n') | Some('x') => match s.keyword(ALIGNS).recoverable()? {
            Some(align) => h.align(align),
            None => skip_identifier(s),
        },
        None => return Ok(()),
        Some(_) => match s.unexpected() {
            Abort::Recover => skip_identifier(s),
            e => return Err(e),
        },
    }

    s.skip_comma_spaces();

    if let Some('m') | Some('s') = s.current() {
        match s.keyword(MEET_OR_SLICE).recoverable()? {
            Some(v) => h.meet_or_slice(v),
            None => skip_identifier(s),
        }
    }

    Ok(())
}

fn skip_identifier(s: &mut Scanner) {
    s.skip_until(|c| c.is_svg_space() || matches!(c, ',' | ')' | ';'));
    s.skip_spaces();
}

/// Representation of the [`preserveAspectRatio`] attribute.
///
/// As a handler it keeps the last parsed value.
///
/// [`preserveAspectRatio`]: https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute
#[derive(Clone, Hash, Copy, PartialEq, Eq, Debug)]
pub struct AspectRatio {
    /// `<defer>` value.
    ///
    /// Set to `true` when `defer` value is present.
    pub defer: bool,
    /// `<align>` value.
    pub align: Align,
    /// `<meetOrSlice>` value.
    ///
    /// - Set to `true` when `slice` value is present.
    /// - Set to `false` when `meet` value is present or value is not set at all.
    pub slice: bool,
}

impl Default for AspectRatio {
    #[inline]
    fn default() -> Self {
        AspectRatio {
            defer: false,
            align: Align::XMidYMid,
            slice: false,
        }
    }
}

impl PreserveAspectRatioHandler for AspectRatio {
    fn start_preserve_aspect_ratio(&mut self) {
        *self = AspectRatio::default();
    }

    fn defer(&mut self) {
        self.defer = true;
    }

    fn align(&mut self, align: Align) {
        self.align = align;
    }

    fn meet_or_slice(&mut self, value: MeetOrSlice) {
        self.slice = value == MeetOrSlice::Slice;
    }
}

impl FromStr for AspectRatio {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut p = PreserveAspectRatioParser::with_handler(AspectRatio::default());
        p.parse(text)?;
        Ok(p.into_handler())
    }
}
