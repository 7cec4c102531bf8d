// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
*svgmicro* is a collection of event-based parsers for SVG attribute micro-syntaxes.

Each parser walks the input one character at a time and reports what it recognizes
to a handler. Handlers are plain traits with no-op default methods, so you implement
only the events you care about. Ready-made handlers build values from events:
[`PathProducer`], [`PolylineProducer`], [`TransformProducer`], [`Length`], [`Angle`],
[`ClockProducer`], [`AspectRatio`] and [`ViewSpec`].

## Supported syntaxes

- [`<path>`](https://www.w3.org/TR/SVG11/paths.html#PathData)
- [`<list-of-points>`](https://www.w3.org/TR/SVG11/shapes.html#PointsBNF)
- [`<transform-list>`](https://www.w3.org/TR/SVG11/coords.html#TransformAttribute)
- [`<length>`](https://www.w3.org/TR/SVG11/types.html#DataTypeLength)
- [`<list-of-lengths>`](https://www.w3.org/TR/SVG11/types.html#DataTypeLengths)
- [`<angle>`](https://www.w3.org/TR/SVG11/types.html#DataTypeAngle)
- [clock values](https://www.w3.org/TR/SMIL2/smil-timing.html#Timing-ClockValueSyntax)
- [`preserveAspectRatio`](https://www.w3.org/TR/SVG11/coords.html#PreserveAspectRatioAttribute)
- [fragment identifiers](https://www.w3.org/TR/SVG11/linking.html#SVGFragmentIdentifiers),
  including `svgView(...)`

## Errors

Every problem is passed to the parser's [`ErrorHandler`]. The default one, [`AbortOnError`],
stops the parse at the first error. A tolerant handler, like [`LogErrors`] or a
`Vec<ParseError>`, lets the parser skip the malformed part and continue.

```
use svgmicro::{ParseError, Parser, PathParser, PathSegment};

let mut errors: Vec<ParseError> = Vec::new();
let mut segments: Vec<PathSegment> = Vec::new();
{
    let mut p = PathParser::with_handler(&mut segments);
    p.set_error_handler(&mut errors);
    p.parse("M 10 20 L 30 x L 50 60").unwrap();
}
assert_eq!(errors.len(), 1);
assert_eq!(segments.len(), 2);
```

Messages are localizable, see [`Parser::register_message`].

## Limitations

- Accepts only [normalized](https://www.w3.org/TR/REC-xml/#AVNormalize) values,
  e.g. an input text should not contain `&#x20;` or `&data;`.
- All keywords and units are case-sensitive.
- Numbers keep up to 9 significant digits.

## Safety

- The library should not panic. Any panic considered as a critical bug and should be reported.
- The library forbids unsafe code.
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

#[macro_use]
mod macros;

mod angle;
mod aspect_ratio;
mod clock;
mod error;
mod fragment;
mod input;
mod length;
mod messages;
mod number;
mod path;
mod points;
mod scanner;
mod transform;
mod writer;

pub use crate::angle::*;
pub use crate::aspect_ratio::{
    Align, AspectRatio, MeetOrSlice, PreserveAspectRatioHandler, PreserveAspectRatioParser,
};
pub use crate::clock::*;
pub use crate::error::*;
pub use crate::fragment::*;
pub use crate::input::*;
pub use crate::length::*;
pub use crate::messages::Localizer;
pub use crate::number::{build_float, Number};
pub use crate::path::*;
pub use crate::points::*;
pub use crate::scanner::{Parser, ParserBase};
pub use crate::transform::{
    Transform, TransformListHandler, TransformListParser, TransformListToken, TransformProducer,
};
pub use crate::writer::*;

/// A handler that ignores all events.
///
/// Every parser uses it until another handler is set.
#[derive(Clone, Copy, Default, Debug)]
pub struct DefaultHandler;
