// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Implements the handler accessors and the `Parser` trait for a grammar parser.
///
/// The parser type must have `base: ParserBase<'e>` and `handler: H` fields.
macro_rules! impl_parser {
    ($parser:ident, $handler:ident, $grammar:path) => {
        impl<'e> $parser<'e> {
            /// Creates a parser with a no-op handler.
            pub fn new() -> Self {
                Self::with_handler($crate::DefaultHandler)
            }
        }

        impl Default for $parser<'_> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<'e, H: $handler> $parser<'e, H> {
            /// Creates a parser with the given handler.
            pub fn with_handler(handler: H) -> Self {
                $parser {
                    base: $crate::ParserBase::default(),
                    handler,
                }
            }

            /// Returns the handler.
            #[inline]
            pub fn handler(&self) -> &H {
                &self.handler
            }

            /// Returns the mutable handler.
            #[inline]
            pub fn handler_mut(&mut self) -> &mut H {
                &mut self.handler
            }

            /// Replaces the handler and returns the previous one.
            pub fn set_handler(&mut self, handler: H) -> H {
                std::mem::replace(&mut self.handler, handler)
            }

            /// Consumes the parser and returns the handler.
            pub fn into_handler(self) -> H {
                self.handler
            }
        }

        impl<'e, H: $handler> $crate::Parser<'e> for $parser<'e, H> {
            #[inline]
            fn base(&self) -> &$crate::ParserBase<'e> {
                &self.base
            }

            #[inline]
            fn base_mut(&mut self) -> &mut $crate::ParserBase<'e> {
                &mut self.base
            }

            fn parse_input(&mut self, input: $crate::Input) -> Result<(), $crate::ParseError> {
                let mut s = self.base.scanner(input);
                let res = $grammar(&mut s, &mut self.handler);
                s.finish(res)
            }
        }
    };
}
