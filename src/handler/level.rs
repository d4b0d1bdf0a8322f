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

use std::borrow::Cow;
use std::fmt;

use crate::Level;

/// A severity on the integer scale of structured-logging handlers.
///
/// Larger values are more severe. The four standard levels are spaced four apart so that
/// intermediate levels fit between them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HandlerLevel(i32);

impl HandlerLevel {
    /// Trace level, below debug.
    pub const TRACE: HandlerLevel = HandlerLevel(-8);
    /// Verbose level, between trace and debug.
    pub const VERBOSE: HandlerLevel = HandlerLevel(-6);
    /// Debug level.
    pub const DEBUG: HandlerLevel = HandlerLevel(-4);
    /// Info level.
    pub const INFO: HandlerLevel = HandlerLevel(0);
    /// Silent level, just above info.
    pub const SILENT: HandlerLevel = HandlerLevel(1);
    /// Warn level.
    pub const WARN: HandlerLevel = HandlerLevel(4);
    /// Error level.
    pub const ERROR: HandlerLevel = HandlerLevel(8);
    /// Fatal level, above error.
    pub const FATAL: HandlerLevel = HandlerLevel(12);

    /// Create a level from its integer value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// The integer value of this level.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Translate to the logger's [`Level`].
    pub fn to_level(self) -> Level {
        match self.0 {
            12.. => Level::Fatal,
            8.. => Level::Error,
            4.. => Level::Warning,
            1.. => Level::Silent,
            0.. => Level::Info,
            -4.. => Level::Debug,
            _ => Level::Verbose,
        }
    }

    /// The name of this level with the custom levels spelled out.
    ///
    /// `TRACE`, `VERBOSE` and `FATAL` replace their offset names, [`HandlerLevel::SILENT`] has an
    /// empty name, and every other level keeps its [`Display`](fmt::Display) form.
    pub fn clean_name(self) -> Cow<'static, str> {
        match self {
            HandlerLevel::TRACE => Cow::Borrowed("TRACE"),
            HandlerLevel::VERBOSE => Cow::Borrowed("VERBOSE"),
            HandlerLevel::SILENT => Cow::Borrowed(""),
            HandlerLevel::FATAL => Cow::Borrowed("FATAL"),
            level => Cow::Owned(level.to_string()),
        }
    }
}

impl From<i32> for HandlerLevel {
    fn from(value: i32) -> Self {
        HandlerLevel(value)
    }
}

impl fmt::Debug for HandlerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The standard names, with the distance to the nearest lower standard level as a signed offset,
/// as in `DEBUG-4` or `ERROR+4`.
impl fmt::Display for HandlerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, offset) = match *self {
            level if level < HandlerLevel::INFO => ("DEBUG", level.0 - HandlerLevel::DEBUG.0),
            level if level < HandlerLevel::WARN => ("INFO", level.0 - HandlerLevel::INFO.0),
            level if level < HandlerLevel::ERROR => ("WARN", level.0 - HandlerLevel::WARN.0),
            level => ("ERROR", level.0 - HandlerLevel::ERROR.0),
        };

        if offset == 0 {
            f.pad(base)
        } else {
            f.pad(&format!("{base}{offset:+}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_boundaries() {
        let cases = [
            (100, Level::Fatal),
            (12, Level::Fatal),
            (11, Level::Error),
            (8, Level::Error),
            (7, Level::Warning),
            (4, Level::Warning),
            (3, Level::Silent),
            (1, Level::Silent),
            (0, Level::Info),
            (-1, Level::Debug),
            (-4, Level::Debug),
            (-5, Level::Verbose),
            (-6, Level::Verbose),
            (-8, Level::Verbose),
            (i32::MIN, Level::Verbose),
        ];
        for (value, expected) in cases {
            assert_eq!(HandlerLevel::new(value).to_level(), expected, "{value}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(HandlerLevel::DEBUG.to_string(), "DEBUG");
        assert_eq!(HandlerLevel::INFO.to_string(), "INFO");
        assert_eq!(HandlerLevel::WARN.to_string(), "WARN");
        assert_eq!(HandlerLevel::ERROR.to_string(), "ERROR");
        assert_eq!(HandlerLevel::TRACE.to_string(), "DEBUG-4");
        assert_eq!(HandlerLevel::VERBOSE.to_string(), "DEBUG-2");
        assert_eq!(HandlerLevel::SILENT.to_string(), "INFO+1");
        assert_eq!(HandlerLevel::FATAL.to_string(), "ERROR+4");
        assert_eq!(HandlerLevel::new(-10).to_string(), "DEBUG-6");
    }

    #[test]
    fn test_clean_names() {
        assert_eq!(HandlerLevel::TRACE.clean_name(), "TRACE");
        assert_eq!(HandlerLevel::VERBOSE.clean_name(), "VERBOSE");
        assert_eq!(HandlerLevel::SILENT.clean_name(), "");
        assert_eq!(HandlerLevel::FATAL.clean_name(), "FATAL");
        assert_eq!(HandlerLevel::WARN.clean_name(), "WARN");
        assert_eq!(HandlerLevel::new(2).clean_name(), "INFO+2");
    }
}
