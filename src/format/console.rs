// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Write;

#[cfg(feature = "colored")]
use colored::Color;

use crate::Error;
use crate::Level;
#[cfg(feature = "colored")]
use crate::format::LevelColor;
use crate::format::Formatter;
use crate::format::LABEL_KEY;
use crate::format::LogEvent;
use crate::format::TIMESTAMP_KEY;

/// A formatter that renders events as human-readable, optionally colored text.
///
/// Output format:
///
/// ```text
/// [INF] [2024-08-11T22:44:57+08:00] user logged in user=alice attempts=3
/// ```
///
/// The label and the timestamp are printed in brackets when present. Every other metadata pair
/// follows the message as ` key=value`, in insertion order. No trailing newline is added; writers
/// terminate lines.
///
/// By default, labels and keys are colored. Call [`no_color`](ConsoleFormatter::no_color) to
/// disable coloring.
///
/// # Examples
///
/// ```
/// use logbook::format::ConsoleFormatter;
///
/// let formatter = ConsoleFormatter::default().no_color();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConsoleFormatter {
    #[cfg(feature = "colored")]
    colors: LevelColor,
    no_color: bool,
}

impl ConsoleFormatter {
    /// Create a formatter, with colored output if `use_colors` is true.
    pub fn new(use_colors: bool) -> Self {
        Self {
            no_color: !use_colors,
            ..Default::default()
        }
    }

    /// Disable colored output.
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    /// Customize the color of the fatal label. Default to bold red.
    ///
    /// No effect if `no_color` is set to `true`.
    #[cfg(feature = "colored")]
    pub fn fatal_color(mut self, color: Color) -> Self {
        self.colors.fatal = color;
        self
    }

    /// Customize the color of the error label. Default to red.
    ///
    /// No effect if `no_color` is set to `true`.
    #[cfg(feature = "colored")]
    pub fn error_color(mut self, color: Color) -> Self {
        self.colors.error = color;
        self
    }

    /// Customize the color of the warning label. Default to yellow.
    ///
    /// No effect if `no_color` is set to `true`.
    #[cfg(feature = "colored")]
    pub fn warning_color(mut self, color: Color) -> Self {
        self.colors.warning = color;
        self
    }

    /// Customize the color of the info label. Default to blue.
    ///
    /// No effect if `no_color` is set to `true`.
    #[cfg(feature = "colored")]
    pub fn info_color(mut self, color: Color) -> Self {
        self.colors.info = color;
        self
    }

    /// Customize the color of the debug label. Default to magenta.
    ///
    /// No effect if `no_color` is set to `true`.
    #[cfg(feature = "colored")]
    pub fn debug_color(mut self, color: Color) -> Self {
        self.colors.debug = color;
        self
    }

    /// Customize the color of the verbose label. Default to blue.
    ///
    /// No effect if `no_color` is set to `true`.
    #[cfg(feature = "colored")]
    pub fn verbose_color(mut self, color: Color) -> Self {
        self.colors.verbose = color;
        self
    }

    #[cfg(feature = "colored")]
    fn write_label(&self, text: &mut String, level: Level, label: &str) -> std::fmt::Result {
        let label = self.colors.colorize_label(self.no_color, level, label);
        write!(text, "[{label}] ")
    }

    #[cfg(not(feature = "colored"))]
    fn write_label(&self, text: &mut String, _: Level, label: &str) -> std::fmt::Result {
        write!(text, "[{label}] ")
    }

    #[cfg(feature = "colored")]
    fn write_pair(&self, text: &mut String, key: &str, value: &str) -> std::fmt::Result {
        let key = self.colors.colorize_key(self.no_color, key);
        write!(text, " {key}={value}")
    }

    #[cfg(not(feature = "colored"))]
    fn write_pair(&self, text: &mut String, key: &str, value: &str) -> std::fmt::Result {
        write!(text, " {key}={value}")
    }

    fn render(&self, event: &LogEvent) -> Result<String, std::fmt::Error> {
        let message = event.message().unwrap_or_default();
        let mut text = String::with_capacity(message.len() + 32);

        if let Some(label) = event.label() {
            self.write_label(&mut text, event.level(), label)?;
        }
        if let Some(timestamp) = event.timestamp() {
            write!(&mut text, "[{timestamp}] ")?;
        }
        text.push_str(message);

        for (key, value) in event.metadata() {
            if key == LABEL_KEY || key == TIMESTAMP_KEY {
                continue;
            }
            self.write_pair(&mut text, key, value)?;
        }

        Ok(text)
    }
}

impl Formatter for ConsoleFormatter {
    fn format(&self, event: &LogEvent) -> Result<Option<Vec<u8>>, Error> {
        let text = self
            .render(event)
            .map_err(|err| Error::new("failed to format console line").with_source(err))?;
        Ok(Some(text.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::format::Metadata;

    fn render(level: Level, message: &str, pairs: &[(&str, &str)]) -> String {
        let metadata: Metadata = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let event = LogEvent::new(level, &metadata).with_message(message);
        let bytes = ConsoleFormatter::default()
            .no_color()
            .format(&event)
            .unwrap()
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_label_and_pairs() {
        let line = render(
            Level::Info,
            "login",
            &[("label", "INF"), ("user", "alice"), ("attempts", "3")],
        );
        assert_snapshot!(line, @"[INF] login user=alice attempts=3");
    }

    #[test]
    fn test_timestamp_follows_label() {
        let line = render(
            Level::Warning,
            "disk almost full",
            &[("timestamp", "2024-08-11T22:44:57Z"), ("label", "WRN")],
        );
        assert_snapshot!(line, @"[WRN] [2024-08-11T22:44:57Z] disk almost full");
    }

    #[test]
    fn test_no_label_no_brackets() {
        assert_eq!(render(Level::Silent, "plain output", &[]), "plain output");
        assert_eq!(
            render(Level::Info, "empty label", &[("label", "")]),
            "empty label"
        );
    }

    #[test]
    fn test_no_trailing_newline() {
        let line = render(Level::Info, "done", &[("label", "INF")]);
        assert!(!line.ends_with('\n'));
    }

    #[test]
    fn test_missing_message() {
        let metadata = Metadata::from([("k".to_string(), "v".to_string())]);
        let event = LogEvent::new(Level::Info, &metadata);
        let bytes = ConsoleFormatter::new(false).format(&event).unwrap().unwrap();
        assert_eq!(bytes, b" k=v");
    }
}
