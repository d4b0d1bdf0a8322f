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

//! The severity levels of log events.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An enum representing the available severity levels of the logger.
///
/// Levels are ordered from the most severe to the most verbose. An event is emitted when its
/// level is less than or equal to the logger's maximum level.
///
/// [`Level::Silent`] sits between [`Level::Warning`] and [`Level::Info`]: it is emitted whenever
/// informational output is, carries no label, and is routed to standard output by the console
/// writer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Designates unrecoverable errors. Emitting a fatal event terminates the process.
    Fatal = 0,
    /// Designates very serious errors.
    Error = 1,
    /// Designates hazardous situations.
    Warning = 2,
    /// Designates plain output without a label.
    Silent = 3,
    /// Designates useful information.
    Info = 4,
    /// Designates lower priority information.
    Debug = 5,
    /// Designates very low priority, often extremely verbose, information.
    Verbose = 6,
}

impl Level {
    /// All levels, from the most severe to the most verbose.
    pub const ALL: [Level; 7] = [
        Level::Fatal,
        Level::Error,
        Level::Warning,
        Level::Silent,
        Level::Info,
        Level::Debug,
        Level::Verbose,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Fatal => "FATAL",
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Silent => "SILENT",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Verbose => "VERBOSE",
        }
    }

    /// Return the short label attached to events of this level, if any.
    ///
    /// [`Level::Silent`] has no label.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Level::Fatal => Some("FTL"),
            Level::Error => Some("ERR"),
            Level::Warning => Some("WRN"),
            Level::Silent => None,
            Level::Info => Some("INF"),
            Level::Debug => Some("DBG"),
            Level::Verbose => Some("VER"),
        }
    }

    /// Checks whether an event of this level passes the given maximum level.
    pub fn enabled(self, max_level: Level) -> bool {
        self <= max_level
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("fatal", Level::Fatal),
            ("error", Level::Error),
            ("warning", Level::Warning),
            ("warn", Level::Warning),
            ("silent", Level::Silent),
            ("info", Level::Info),
            ("debug", Level::Debug),
            ("verbose", Level::Verbose),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::config_invalid(format!("malformed level: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_enabled() {
        assert!(Level::Fatal < Level::Error);
        assert!(Level::Warning < Level::Silent);
        assert!(Level::Silent < Level::Info);
        assert!(Level::Debug < Level::Verbose);

        assert!(Level::Silent.enabled(Level::Info));
        assert!(Level::Info.enabled(Level::Info));
        assert!(!Level::Debug.enabled(Level::Info));
        assert!(!Level::Silent.enabled(Level::Warning));
        assert!(Level::Fatal.enabled(Level::Fatal));

        for level in Level::ALL {
            assert!(level.enabled(Level::Verbose));
        }
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = Level::ALL.iter().map(|l| l.label()).collect();
        assert_eq!(
            labels,
            vec![
                Some("FTL"),
                Some("ERR"),
                Some("WRN"),
                None,
                Some("INF"),
                Some("DBG"),
                Some("VER")
            ]
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("silent".parse::<Level>().unwrap(), Level::Silent);
        assert!("loud".parse::<Level>().is_err());
    }
}
