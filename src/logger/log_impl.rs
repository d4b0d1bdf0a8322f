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

use std::process;
use std::sync::Arc;

use crate::Error;
use crate::Event;
use crate::Level;
use crate::LoggerBuilder;
use crate::format::ConsoleFormatter;
use crate::format::Formatter;
use crate::format::LogEvent;
use crate::format::Metadata;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::ConsoleWriter;
use crate::writer::Writer;

/// A logger: a maximum level, a formatter, a writer and a timestamp policy.
///
/// Cloning a logger is cheap. Clones share the formatter and the writer, and reconfiguring a
/// clone never affects the original.
///
/// The default logger admits [`Level::Info`] and more severe, writes colored text through a
/// [`ConsoleFormatter`] to a [`ConsoleWriter`], and stamps no timestamps.
#[derive(Debug, Clone)]
pub struct Logger {
    max_level: Level,
    formatter: Arc<dyn Formatter>,
    writer: Arc<dyn Writer>,
    // stamp events at this level or noisier
    timestamp: Option<Level>,
    trap: Arc<dyn Trap>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            max_level: Level::Info,
            formatter: Arc::new(ConsoleFormatter::default()),
            writer: Arc::new(ConsoleWriter::default()),
            timestamp: None,
            trap: Arc::new(DefaultTrap::default()),
        }
    }
}

impl Logger {
    pub(super) fn new(
        max_level: Level,
        formatter: Arc<dyn Formatter>,
        writer: Arc<dyn Writer>,
        timestamp: Option<Level>,
        trap: Arc<dyn Trap>,
    ) -> Self {
        Self {
            max_level,
            formatter,
            writer,
            timestamp,
            trap,
        }
    }

    /// Create a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        crate::logger::builder()
    }

    /// The most verbose level this logger admits.
    pub fn max_level(&self) -> Level {
        self.max_level
    }

    /// Whether this logger admits events of `level`.
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled(self.max_level)
    }

    /// Whether events of `level` get a timestamp when created.
    pub(crate) fn stamps(&self, level: Level) -> bool {
        self.timestamp.is_some_and(|min| level >= min)
    }

    /// Set the most verbose level this logger admits.
    pub fn set_max_level(&mut self, level: Level) {
        self.max_level = level;
    }

    /// Replace the formatter.
    pub fn set_formatter(&mut self, formatter: impl Formatter) {
        self.formatter = Arc::new(formatter);
    }

    /// Replace the writer.
    pub fn set_writer(&mut self, writer: impl Writer) {
        self.writer = Arc::new(writer);
    }

    /// Stamp every event at `min_level` or noisier with the current time, or stop stamping.
    pub fn set_timestamp(&mut self, enabled: bool, min_level: Level) {
        self.timestamp = enabled.then_some(min_level);
    }

    /// Start a [`Level::Fatal`] event. Emitting it terminates the process with exit status 1.
    pub fn fatal(&self) -> Event<'_> {
        Event::borrowed(self, Level::Fatal).with_level_label()
    }

    /// Start a [`Level::Error`] event.
    pub fn error(&self) -> Event<'_> {
        Event::borrowed(self, Level::Error).with_level_label()
    }

    /// Start a [`Level::Warning`] event.
    pub fn warning(&self) -> Event<'_> {
        Event::borrowed(self, Level::Warning).with_level_label()
    }

    /// Start a [`Level::Info`] event.
    pub fn info(&self) -> Event<'_> {
        Event::borrowed(self, Level::Info).with_level_label()
    }

    /// Start a [`Level::Debug`] event.
    pub fn debug(&self) -> Event<'_> {
        Event::borrowed(self, Level::Debug).with_level_label()
    }

    /// Start a [`Level::Verbose`] event.
    pub fn verbose(&self) -> Event<'_> {
        Event::borrowed(self, Level::Verbose).with_level_label()
    }

    /// Start an unlabeled [`Level::Silent`] event.
    pub fn print(&self) -> Event<'_> {
        Event::borrowed(self, Level::Silent)
    }

    /// Start an event at `level`, labeled unless the level has no label.
    pub fn log(&self, level: Level) -> Event<'_> {
        Event::borrowed(self, level).with_level_label()
    }

    /// Flush buffered output of the writer.
    pub fn flush(&self) -> Result<(), Error> {
        self.writer.flush()
    }

    /// Flush and release the writer.
    pub fn close(&self) -> Result<(), Error> {
        self.writer.close()
    }

    pub(crate) fn trap(&self, err: &Error) {
        self.trap.trap(err);
    }

    /// Format and write one event, then terminate the process if the event is fatal.
    pub(crate) fn dispatch(&self, level: Level, message: &str, metadata: &Metadata) {
        if !self.enabled(level) {
            return;
        }

        let message = message.strip_suffix('\n').unwrap_or(message);
        let event = LogEvent::new(level, metadata).with_message(message);
        match self.formatter.format(&event) {
            Ok(Some(bytes)) => self.writer.write(&bytes, level),
            Ok(None) => {}
            Err(err) => {
                let err = Error::new("failed to format log event").with_source(err);
                self.trap.trap(&err);
                return;
            }
        }

        if level == Level::Fatal {
            if let Err(err) = self.writer.close() {
                self.trap.trap(&err);
            }
            process::exit(1);
        }
    }
}
