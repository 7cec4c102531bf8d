// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::fmt::{self, Display};

/// Built-in English messages.
const ROOT_MESSAGES: &[(&str, &str)] = &[
    ("character.unexpected", "unexpected {0}"),
    ("character.expected", "expected '{0}' instead of {1}"),
    ("end.of.stream.expected", "expected end of input instead of {0}"),
    ("float.format", "invalid number, found {0}"),
    ("io.exception", "I/O error: {0}"),
];

/// A locale-aware message catalog.
///
/// Messages are templates where `{N}` is replaced by the N-th argument.
///
/// A lookup tries the exact locale first, then its language
/// (`fr-CA` falls back to `fr`), then messages registered for the root
/// locale (an empty string) and finally the built-in English messages.
/// When nothing is found, the raw key is returned.
#[derive(Clone, Debug)]
pub struct Localizer {
    locale: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl Default for Localizer {
    fn default() -> Self {
        Localizer {
            locale: "en".to_string(),
            bundles: HashMap::new(),
        }
    }
}

impl Localizer {
    /// Creates a catalog with only the built-in messages.
    pub fn new() -> Self {
        Localizer::default()
    }

    /// Returns the current locale.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Sets the current locale.
    ///
    /// Both `fr-CA` and `fr_CA` forms are accepted.
    pub fn set_locale(&mut self, locale: &str) {
        self.locale = normalize_locale(locale);
    }

    /// Registers a message template for a locale.
    ///
    /// Use an empty locale to override the built-in messages.
    pub fn register(&mut self, locale: &str, key: &str, template: &str) {
        self.bundles
            .entry(normalize_locale(locale))
            .or_insert_with(HashMap::new)
            .insert(key.to_string(), template.to_string());
    }

    /// Returns the template for a key in the current locale.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let locale = self.locale.as_str();
        let language = locale.split('-').next().unwrap_or(locale);

        for name in &[locale, language, ""] {
            if let Some(template) = self.bundles.get(*name).and_then(|b| b.get(key)) {
                return Some(template.as_str());
            }
        }

        ROOT_MESSAGES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, template)| *template)
    }

    /// Formats a message.
    ///
    /// Returns the raw key when no template is registered.
    pub fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        match self.lookup(key) {
            Some(template) => substitute(template, args),
            None => key.to_string(),
        }
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-")
}

fn substitute(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let index = tail
            .find('}')
            .and_then(|end| tail[..end].parse::<usize>().ok().map(|idx| (idx, end)));

        match index {
            Some((idx, end)) if idx < args.len() => {
                out.push_str(&args[idx].to_string());
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Describes a character found in the input, or the end of input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Found(pub Option<char>);

impl Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "'{}'", c.escape_debug()),
            None => f.write_str("end of input"),
        }
    }
}
