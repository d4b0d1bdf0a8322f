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

use std::env;
use std::sync::Arc;

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::format::ConsoleFormatter;
use crate::format::Formatter;
use crate::logger::set_default_logger;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::ConsoleWriter;
use crate::writer::Writer;

/// Create a new [`LoggerBuilder`] with the default configuration.
///
/// # Examples
///
/// ```
/// use logbook::Level;
///
/// logbook::builder().max_level(Level::Debug).apply();
/// ```
pub fn builder() -> LoggerBuilder {
    LoggerBuilder {
        max_level: Level::Info,
        formatter: None,
        writer: None,
        timestamp: None,
        trap: None,
    }
}

/// A builder for configuring a [`Logger`], or the default logger.
///
/// # Examples
///
/// ```
/// use logbook::Level;
/// use logbook::format::ConsoleFormatter;
/// use logbook::writer::ConsoleWriter;
///
/// let logger = logbook::builder()
///     .max_level(Level::Verbose)
///     .formatter(ConsoleFormatter::new(false))
///     .writer(ConsoleWriter::default())
///     .timestamp(Level::Info)
///     .build();
/// ```
#[must_use = "call `apply` to set the default logger or `build` to construct a logger instance"]
#[derive(Debug)]
pub struct LoggerBuilder {
    max_level: Level,
    formatter: Option<Arc<dyn Formatter>>,
    writer: Option<Arc<dyn Writer>>,
    timestamp: Option<Level>,
    trap: Option<Arc<dyn Trap>>,
}

impl LoggerBuilder {
    /// Set the most verbose level the logger admits. Default to [`Level::Info`].
    pub fn max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }

    /// Read the max level from the environment variable `var`, such as `LOG_LEVEL=debug`.
    ///
    /// Keep the current max level if the variable is unset.
    ///
    /// # Errors
    ///
    /// Return an error if the variable is set but is not a level name.
    pub fn max_level_from_env(self, var: &str) -> Result<Self, Error> {
        match env::var(var) {
            Ok(value) => {
                let level = value
                    .trim()
                    .parse::<Level>()
                    .map_err(|err| err.with_context("var", var))?;
                Ok(self.max_level(level))
            }
            Err(env::VarError::NotPresent) => Ok(self),
            Err(err) => Err(Error::config_invalid("failed to read log level from environment")
                .with_context("var", var)
                .with_source(err)),
        }
    }

    /// Set the formatter. Default to a colored [`ConsoleFormatter`].
    pub fn formatter(mut self, formatter: impl Formatter) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Set the writer. Default to a [`ConsoleWriter`].
    pub fn writer(mut self, writer: impl Writer) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    /// Stamp every event at `min_level` or noisier with the current time.
    ///
    /// Timestamps are off by default.
    pub fn timestamp(mut self, min_level: Level) -> Self {
        self.timestamp = Some(min_level);
        self
    }

    /// Set the trap for formatting and writing errors. Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Some(Arc::new(trap));
        self
    }

    /// Build the [`Logger`].
    pub fn build(self) -> Logger {
        let Self {
            max_level,
            formatter,
            writer,
            timestamp,
            trap,
        } = self;

        Logger::new(
            max_level,
            formatter.unwrap_or_else(|| Arc::new(ConsoleFormatter::default())),
            writer.unwrap_or_else(|| Arc::new(ConsoleWriter::default())),
            timestamp,
            trap.unwrap_or_else(|| Arc::new(DefaultTrap::default())),
        )
    }

    /// Build the [`Logger`] and install it as the default logger.
    ///
    /// Unlike a global `log` facade, the default logger can be replaced at any time.
    pub fn apply(self) {
        set_default_logger(self.build());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_level_from_env() {
        let var = "LOGBOOK_TEST_MAX_LEVEL_FROM_ENV";

        // SAFETY: no other test touches this variable.
        unsafe { env::remove_var(var) };
        let logger = builder().max_level_from_env(var).unwrap().build();
        assert_eq!(logger.max_level(), Level::Info);

        unsafe { env::set_var(var, " Verbose ") };
        let logger = builder().max_level_from_env(var).unwrap().build();
        assert_eq!(logger.max_level(), Level::Verbose);

        unsafe { env::set_var(var, "chatty") };
        let err = builder().max_level_from_env(var).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ConfigInvalid);

        unsafe { env::remove_var(var) };
    }
}
