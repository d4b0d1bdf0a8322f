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

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Error;
use crate::Level;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::Writer;
use crate::writer::write_line;

/// A writer that prints lines to the terminal.
///
/// [`Level::Silent`] lines go to standard output; every other level goes to standard error.
/// A single lock covers both streams so lines never interleave. Failed writes are handed to the
/// trap.
///
/// # Examples
///
/// ```
/// use logbook::DefaultTrap;
/// use logbook::writer::ConsoleWriter;
///
/// let writer = ConsoleWriter::default().trap(DefaultTrap::default());
/// ```
#[derive(Debug)]
pub struct ConsoleWriter {
    lock: Mutex<()>,
    trap: Arc<dyn Trap>,
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self {
            lock: Mutex::new(()),
            trap: Arc::new(DefaultTrap::default()),
        }
    }
}

impl ConsoleWriter {
    /// Set the trap for failed writes. Default to [`DefaultTrap`].
    #[must_use]
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }
}

impl Writer for ConsoleWriter {
    fn write(&self, data: &[u8], level: Level) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (stream, written) = match level {
            Level::Silent => ("stdout", write_line(io::stdout().lock(), data)),
            _ => ("stderr", write_line(io::stderr().lock(), data)),
        };
        if let Err(err) = written {
            let err = Error::new("failed to write log line")
                .with_context("stream", stream)
                .with_source(err);
            self.trap.trap(&err);
        }
    }

    fn flush(&self) -> Result<(), Error> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        io::stdout().flush().map_err(Error::from_io_error)?;
        io::stderr().flush().map_err(Error::from_io_error)
    }
}
