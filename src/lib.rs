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


//! Logbook is a leveled, key-value structured logging library with pluggable formatters and
//! writers.
//!
//! # Overview
//!
//! A [`Logger`] admits events up to its max [`Level`], renders them with a
//! [`Formatter`](format::Formatter) and hands the bytes to a [`Writer`](writer::Writer). Events
//! are built fluently and dispatched by a terminal call such as [`Event::msg`].
//!
//! The package-level functions, such as [`info`] and [`error`], log through the default logger.
//! Configure it with [`set_max_level`], [`set_formatter`], [`set_writer`] and [`set_timestamp`],
//! or replace it with [`LoggerBuilder::apply`].
//!
//! # Examples
//!
//! ```
//! logbook::info().set("user", "alice").msg("logged in");
//! logbook::debug().msg_with(|| "only computed when debug is enabled");
//! ```
//!
//! Log to a rotating file as JSON:
//!
//! ```no_run
//! use logbook::Level;
//! use logbook::format::JsonFormatter;
//! use logbook::writer::RotatingFileWriterBuilder;
//!
//! let writer = RotatingFileWriterBuilder::new("logs", "app.log")
//!     .rotate(true)
//!     .max_size(std::num::NonZeroU64::new(16 * 1024 * 1024).unwrap())
//!     .compress(true)
//!     .build()
//!     .unwrap();
//!
//! logbook::builder()
//!     .max_level(Level::Debug)
//!     .formatter(JsonFormatter::default())
//!     .writer(writer)
//!     .apply();
//!
//! logbook::warning().set("disk", "/dev/sda1").msg("almost full");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod format;
pub mod handler;
pub mod writer;

mod error;
pub use self::error::Error;
pub use self::error::ErrorKind;

mod event;
pub use self::event::Event;

mod level;
pub use self::level::Level;

mod logger;
pub use self::logger::*;

mod trap;
pub use self::trap::DefaultTrap;
pub use self::trap::Trap;

mod time;

pub use self::format::Metadata;

/// Start a [`Level::Fatal`] event on the default logger. Emitting it terminates the process with
/// exit status 1.
pub fn fatal() -> Event<'static> {
    Event::shared(default_logger(), Level::Fatal).with_level_label()
}

/// Start a [`Level::Error`] event on the default logger.
pub fn error() -> Event<'static> {
    Event::shared(default_logger(), Level::Error).with_level_label()
}

/// Start a [`Level::Warning`] event on the default logger.
pub fn warning() -> Event<'static> {
    Event::shared(default_logger(), Level::Warning).with_level_label()
}

/// Start a [`Level::Info`] event on the default logger.
pub fn info() -> Event<'static> {
    Event::shared(default_logger(), Level::Info).with_level_label()
}

/// Start a [`Level::Debug`] event on the default logger.
pub fn debug() -> Event<'static> {
    Event::shared(default_logger(), Level::Debug).with_level_label()
}

/// Start a [`Level::Verbose`] event on the default logger.
pub fn verbose() -> Event<'static> {
    Event::shared(default_logger(), Level::Verbose).with_level_label()
}

/// Start an unlabeled [`Level::Silent`] event on the default logger.
///
/// Silent events go to standard output through a [`ConsoleWriter`](writer::ConsoleWriter).
pub fn silent() -> Event<'static> {
    Event::shared(default_logger(), Level::Silent)
}

/// Start an unlabeled [`Level::Info`] event on the default logger.
pub fn print() -> Event<'static> {
    Event::shared(default_logger(), Level::Info)
}
