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

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::Error;
use crate::Level;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::Writer;
use crate::writer::write_line;

/// A writer that appends lines to a single file through a buffer.
///
/// The file is created, or truncated if it exists. Lines are buffered until
/// [`flush`](Writer::flush) or [`close`](Writer::close), and when the writer is dropped.
/// Failed writes are handed to the trap, a [`DefaultTrap`] unless set with
/// [`trap`](FileWriter::trap).
///
/// # Examples
///
/// ```no_run
/// use logbook::writer::FileWriter;
///
/// let writer = FileWriter::create("app.log").unwrap();
/// ```
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    inner: Mutex<Option<BufWriter<File>>>,
    trap: Arc<dyn Trap>,
}

impl FileWriter {
    /// Create the file at `path` and return a writer for it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| {
            Error::new("failed to create log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(Some(BufWriter::new(file))),
            trap: Arc::new(DefaultTrap::default()),
        })
    }

    /// Set the trap for failed writes.
    #[must_use]
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// The path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn inner(&self) -> MutexGuard<'_, Option<BufWriter<File>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Writer for FileWriter {
    fn write(&self, data: &[u8], _: Level) {
        if data.is_empty() {
            return;
        }
        let mut inner = self.inner();
        let Some(writer) = inner.as_mut() else {
            return;
        };
        if let Err(err) = write_line(writer, data) {
            let err = Error::new("failed to write log line")
                .with_context("path", self.path.display())
                .with_source(err);
            self.trap.trap(&err);
        }
    }

    fn flush(&self) -> Result<(), Error> {
        match self.inner().as_mut() {
            Some(writer) => writer.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<(), Error> {
        let Some(mut writer) = self.inner().take() else {
            return Ok(());
        };
        writer.flush().map_err(Error::from_io_error)?;
        writer.get_ref().sync_all().map_err(Error::from_io_error)
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
