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

//! Writers deliver formatted lines to their destination.

use std::fmt;
use std::io;
use std::io::Write;

use crate::Error;
use crate::Level;

mod console;
mod file;
mod memory;
#[cfg(feature = "rotating-file")]
pub mod rotating;

pub use self::console::ConsoleWriter;
pub use self::file::FileWriter;
pub use self::memory::MemoryWriter;
#[cfg(feature = "rotating-file")]
pub use self::rotating::RotatingFileWriter;
#[cfg(feature = "rotating-file")]
pub use self::rotating::RotatingFileWriterBuilder;

/// The line terminator of the current platform.
pub const NEWLINE: &[u8] = if cfg!(windows) { b"\r\n" } else { b"\n" };

/// A writer receives formatted bytes together with the level of the event.
///
/// Writers are shared by every clone of a logger, so implementations must accept concurrent
/// calls. Each call is one line: an implementation appends [`NEWLINE`] when the bytes do not
/// already end with `\n`, and must not interleave concurrent lines.
pub trait Writer: fmt::Debug + Send + Sync + 'static {
    /// Write one formatted line.
    fn write(&self, data: &[u8], level: Level);

    /// Flush any buffered lines.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Flush and release the underlying resources.
    ///
    /// Default to [`flush`](Writer::flush).
    fn close(&self) -> Result<(), Error> {
        self.flush()
    }
}

impl<T: Writer> From<T> for Box<dyn Writer> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// Write `data` followed by a line terminator if it lacks one. Return the number of bytes written.
pub(crate) fn write_line(mut out: impl Write, data: &[u8]) -> io::Result<usize> {
    out.write_all(data)?;
    if data.ends_with(b"\n") {
        Ok(data.len())
    } else {
        out.write_all(NEWLINE)?;
        Ok(data.len() + NEWLINE.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_line_terminates_once() {
        let mut buf = vec![];
        assert_eq!(write_line(&mut buf, b"hello").unwrap(), 5 + NEWLINE.len());
        let n = write_line(&mut buf, b"world\n").unwrap();
        assert_eq!(n, 6);

        let mut expected = b"hello".to_vec();
        expected.extend_from_slice(NEWLINE);
        expected.extend_from_slice(b"world\n");
        assert_eq!(buf, expected);
    }
}
