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

//! The process-wide default logger used by the package-level functions.

use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use crate::Level;
use crate::Logger;
use crate::format::Formatter;
use crate::writer::Writer;

static DEFAULT_LOGGER: LazyLock<RwLock<Arc<Logger>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Logger::default())));

/// Return a snapshot of the default logger.
///
/// Events started from the snapshot keep using it even if the default logger is replaced
/// meanwhile.
pub fn default_logger() -> Arc<Logger> {
    DEFAULT_LOGGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the default logger.
pub fn set_default_logger(logger: Logger) {
    let mut default = DEFAULT_LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *default = Arc::new(logger);
}

fn update_default_logger(f: impl FnOnce(&mut Logger)) {
    let mut default = DEFAULT_LOGGER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let mut logger = Logger::clone(&default);
    f(&mut logger);
    *default = Arc::new(logger);
}

/// Set the most verbose level the default logger admits.
pub fn set_max_level(level: Level) {
    update_default_logger(|logger| logger.set_max_level(level));
}

/// Replace the formatter of the default logger.
pub fn set_formatter(formatter: impl Formatter) {
    update_default_logger(|logger| logger.set_formatter(formatter));
}

/// Replace the writer of the default logger.
pub fn set_writer(writer: impl Writer) {
    update_default_logger(|logger| logger.set_writer(writer));
}

/// Turn timestamping of the default logger on or off.
pub fn set_timestamp(enabled: bool, min_level: Level) {
    update_default_logger(|logger| logger.set_timestamp(enabled, min_level));
}
