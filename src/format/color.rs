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

//! Color utilities.

use colored::Color;
use colored::ColoredString;
use colored::Colorize;

use crate::Level;

/// Colors for different log levels.
#[derive(Debug, Clone)]
pub struct LevelColor {
    /// Color for fatal level labels. Always rendered bold.
    pub fatal: Color,
    /// Color for error level labels.
    pub error: Color,
    /// Color for warning level labels.
    pub warning: Color,
    /// Color for info level labels.
    pub info: Color,
    /// Color for debug level labels.
    pub debug: Color,
    /// Color for verbose level labels.
    pub verbose: Color,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            fatal: Color::Red,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
            debug: Color::Magenta,
            verbose: Color::Blue,
        }
    }
}

impl LevelColor {
    /// Colorize a level label.
    pub fn colorize_label(&self, no_color: bool, level: Level, label: &str) -> ColoredString {
        let label = ColoredString::from(label);
        if no_color {
            return label;
        }

        match level {
            Level::Fatal => label.color(self.fatal).bold(),
            Level::Error => label.color(self.error),
            Level::Warning => label.color(self.warning),
            Level::Info => label.color(self.info),
            Level::Debug => label.color(self.debug),
            Level::Verbose => label.color(self.verbose),
            Level::Silent => label,
        }
    }

    /// Colorize a metadata key.
    pub fn colorize_key(&self, no_color: bool, key: &str) -> ColoredString {
        let key = ColoredString::from(key);
        if no_color { key } else { key.bold() }
    }
}
