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

//! Formatters turn a log event into bytes.

use std::fmt;

use indexmap::IndexMap;

use crate::Error;
use crate::Level;

#[cfg(feature = "colored")]
mod color;
mod console;
#[cfg(feature = "json")]
mod json;

#[cfg(feature = "colored")]
pub use self::color::LevelColor;
pub use self::console::ConsoleFormatter;
#[cfg(feature = "json")]
pub use self::json::JsonFormatter;

/// The key-value metadata attached to an event.
///
/// Iteration follows insertion order. Setting an existing key replaces its value in place.
pub type Metadata = IndexMap<String, String>;

/// The metadata key holding the level label, such as `INF`.
pub const LABEL_KEY: &str = "label";

/// The metadata key holding the event timestamp.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// The view of an event handed to a [`Formatter`].
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    level: Level,
    message: Option<&'a str>,
    metadata: &'a Metadata,
}

impl<'a> LogEvent<'a> {
    /// Create an event without a message.
    pub fn new(level: Level, metadata: &'a Metadata) -> Self {
        Self {
            level,
            message: None,
            metadata,
        }
    }

    /// Set the message of this event.
    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// The level of this event.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message of this event, if any.
    pub fn message(&self) -> Option<&'a str> {
        self.message
    }

    /// The metadata of this event, in insertion order.
    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    /// The non-empty label of this event, if any.
    pub fn label(&self) -> Option<&'a str> {
        self.metadata
            .get(LABEL_KEY)
            .map(String::as_str)
            .filter(|label| !label.is_empty())
    }

    /// The non-empty timestamp of this event, if any.
    pub fn timestamp(&self) -> Option<&'a str> {
        self.metadata
            .get(TIMESTAMP_KEY)
            .map(String::as_str)
            .filter(|ts| !ts.is_empty())
    }
}

/// A formatter renders an event into bytes.
///
/// Returning `Ok(None)` means the event produces no output.
pub trait Formatter: fmt::Debug + Send + Sync + 'static {
    /// Formats an event.
    fn format(&self, event: &LogEvent) -> Result<Option<Vec<u8>>, Error>;
}

impl<T: Formatter> From<T> for Box<dyn Formatter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
