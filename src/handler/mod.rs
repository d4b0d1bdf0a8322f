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

//! Structured-logging handlers: integer levels, typed attributes, attribute groups and bound
//! attributes, and the adapter that routes them through a [`Logger`](crate::Logger).
//!
//! # Examples
//!
//! ```
//! use logbook::Logger;
//! use logbook::format::ConsoleFormatter;
//! use logbook::handler::Attr;
//! use logbook::handler::LoggerHandler;
//! use logbook::handler::StructuredLogger;
//! use logbook::writer::MemoryWriter;
//!
//! let writer = MemoryWriter::default();
//! let logger = Logger::builder()
//!     .formatter(ConsoleFormatter::default().no_color())
//!     .writer(writer.clone())
//!     .build();
//!
//! let log = StructuredLogger::new(LoggerHandler::new(logger))
//!     .with_group("http")
//!     .with(vec![Attr::new("method", "GET")]);
//! log.info("request served", [Attr::new("status", 200)]);
//!
//! assert_eq!(
//!     writer.lines(),
//!     vec!["[INF] request served http.method=GET http.status=200"]
//! );
//! ```

use std::fmt;

use crate::Error;

mod adapter;
mod frontend;
mod level;
mod record;
mod value;

pub use self::adapter::HandlerOptions;
pub use self::adapter::LEVEL_KEY;
pub use self::adapter::LoggerHandler;
pub use self::adapter::ReplaceAttr;
pub use self::adapter::trim_levels;
pub use self::frontend::StructuredLogger;
pub use self::level::HandlerLevel;
pub use self::record::Context;
pub use self::record::HandlerRecord;
pub use self::value::Attr;
pub use self::value::Value;
pub use self::value::ZERO_TIME;

/// A handler processes structured records.
///
/// Deriving a handler with [`with_attrs`](Handler::with_attrs) or
/// [`with_group`](Handler::with_group) returns a new handler and never changes the original.
pub trait Handler: fmt::Debug + Send + Sync {
    /// Whether a record at `level` would be handled.
    fn enabled(&self, cx: &Context, level: HandlerLevel) -> bool;

    /// Handle one record.
    ///
    /// # Errors
    ///
    /// Return an error if the context was cancelled before the record was handled.
    fn handle(&self, cx: &Context, record: &HandlerRecord) -> Result<(), Error>;

    /// A handler that adds `attrs` to every record.
    fn with_attrs(&self, attrs: Vec<Attr>) -> Self
    where
        Self: Sized;

    /// A handler that qualifies every later attribute key with `name`.
    fn with_group(&self, name: &str) -> Self
    where
        Self: Sized;
}
