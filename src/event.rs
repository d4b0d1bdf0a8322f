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

//! The per-event builder.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::Level;
use crate::Logger;
use crate::format::LABEL_KEY;
use crate::format::Metadata;
use crate::format::TIMESTAMP_KEY;
use crate::time::rfc3339_now;

/// A logger borrowed from the caller, or shared from the default logger.
#[derive(Clone)]
enum LoggerRef<'a> {
    Borrowed(&'a Logger),
    Shared(Arc<Logger>),
}

impl Deref for LoggerRef<'_> {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        match self {
            LoggerRef::Borrowed(logger) => logger,
            LoggerRef::Shared(logger) => logger,
        }
    }
}

/// A single-use builder for one log event.
///
/// An event is created by a level constructor such as [`Logger::info`] or [`crate::info`],
/// enriched with [`label`](Event::label), [`timestamp`](Event::timestamp) and
/// [`set`](Event::set), and dispatched by one of the terminal methods [`msg`](Event::msg),
/// [`msgf`](Event::msgf) or [`msg_with`](Event::msg_with).
///
/// An event whose level the logger does not admit stays usable but inert: builder methods do
/// nothing and the terminal methods return without formatting or writing.
///
/// # Examples
///
/// ```
/// use logbook::Logger;
/// use logbook::format::ConsoleFormatter;
/// use logbook::writer::MemoryWriter;
///
/// let writer = MemoryWriter::default();
/// let logger = Logger::builder()
///     .formatter(ConsoleFormatter::default().no_color())
///     .writer(writer.clone())
///     .build();
///
/// logger
///     .warning()
///     .set("disk", "/dev/sda1")
///     .msgf(format_args!("{}% used", 93));
/// assert_eq!(writer.lines(), vec!["[WRN] 93% used disk=/dev/sda1"]);
/// ```
#[must_use = "an event is only emitted by `msg`, `msgf` or `msg_with`"]
pub struct Event<'a> {
    logger: LoggerRef<'a>,
    level: Level,
    enabled: bool,
    metadata: Metadata,
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("enabled", &self.enabled)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<'a> Event<'a> {
    fn new(logger: LoggerRef<'a>, level: Level) -> Self {
        let enabled = logger.enabled(level);
        let mut metadata = Metadata::new();
        if enabled && logger.stamps(level) {
            metadata.insert(TIMESTAMP_KEY.to_string(), rfc3339_now());
        }

        Self {
            logger,
            level,
            enabled,
            metadata,
        }
    }

    pub(crate) fn borrowed(logger: &'a Logger, level: Level) -> Self {
        Self::new(LoggerRef::Borrowed(logger), level)
    }

    pub(crate) fn with_level_label(self) -> Self {
        match self.level.label() {
            Some(label) => self.label(label),
            None => self,
        }
    }
}

impl Event<'static> {
    pub(crate) fn shared(logger: Arc<Logger>, level: Level) -> Self {
        Self::new(LoggerRef::Shared(logger), level)
    }
}

impl Event<'_> {
    /// The level of this event.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether the logger admits this event.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The metadata collected so far.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Set the label, replacing the level label.
    pub fn label(self, label: impl Into<String>) -> Self {
        self.set(LABEL_KEY, label)
    }

    /// Stamp the current time, RFC 3339 in the local time zone.
    pub fn timestamp(mut self) -> Self {
        if self.enabled {
            self.metadata
                .insert(TIMESTAMP_KEY.to_string(), rfc3339_now());
        }
        self
    }

    /// Set a metadata pair. Setting an existing key replaces its value in place.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if self.enabled {
            self.metadata.insert(key.into(), value.into());
        }
        self
    }

    /// Emit the event with the given message.
    pub fn msg(self, message: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        self.logger
            .dispatch(self.level, message.as_ref(), &self.metadata);
    }

    /// Emit the event with a formatted message.
    ///
    /// ```
    /// logbook::debug().msgf(format_args!("retrying in {}s", 5));
    /// ```
    pub fn msgf(self, args: fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        match args.as_str() {
            Some(message) => self.msg(message),
            None => self.msg(args.to_string()),
        }
    }

    /// Emit the event with a message computed on demand.
    ///
    /// `supplier` is called exactly once when the level is enabled, and never otherwise.
    pub fn msg_with<F, S>(self, supplier: F)
    where
        F: FnOnce() -> S,
        S: AsRef<str>,
    {
        if !self.enabled {
            return;
        }
        let message = supplier();
        self.msg(message)
    }
}
