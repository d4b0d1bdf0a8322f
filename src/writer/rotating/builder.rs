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
use std::num::NonZeroU64;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::Error;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::rotating::ArchiveFormat;
use crate::writer::rotating::DEFAULT_BACKUP_TIME_FORMAT;
use crate::writer::rotating::DEFAULT_CHECK_INTERVAL;
use crate::writer::rotating::RotatingFileWriter;
use crate::writer::rotating::clock::Clock;
use crate::writer::rotating::naming::Naming;

/// A builder for configuring [`RotatingFileWriter`].
#[derive(Debug)]
pub struct RotatingFileWriterBuilder {
    // required
    directory: PathBuf,
    filename: String,

    // has default
    rotate: bool,
    max_size: Option<NonZeroU64>,
    rotation_interval: Option<Duration>,
    compress: bool,
    check_interval: Duration,
    backup_time_format: String,
    archive_format: ArchiveFormat,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

impl Default for RotatingFileWriterBuilder {
    /// Log to `<current dir>/logs/<process name>.log`.
    fn default() -> Self {
        let directory = env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("logs");
        Self::new(directory, format!("{}.log", process_name()))
    }
}

fn process_name() -> String {
    env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

impl RotatingFileWriterBuilder {
    /// Creates a new [`RotatingFileWriterBuilder`] for `<directory>/<filename>`.
    ///
    /// Rotation is disabled until [`rotate`](Self::rotate) is set.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            rotate: false,
            max_size: None,
            rotation_interval: None,
            compress: false,
            check_interval: DEFAULT_CHECK_INTERVAL,
            backup_time_format: DEFAULT_BACKUP_TIME_FORMAT.to_string(),
            archive_format: ArchiveFormat::default(),
            clock: Clock::DefaultClock,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Set the trap for errors raised while writing, rotating or compressing.
    #[must_use]
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Enable or disable rotation.
    #[must_use]
    pub fn rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// Rotate once the current file reaches `n` bytes.
    #[must_use]
    pub fn max_size(mut self, n: NonZeroU64) -> Self {
        self.max_size = Some(n);
        self
    }

    /// Rotate once the current file is older than `interval`.
    ///
    /// A zero interval disables age-based rotation.
    #[must_use]
    pub fn rotation_interval(mut self, interval: Duration) -> Self {
        self.rotation_interval = Some(interval).filter(|interval| !interval.is_zero());
        self
    }

    /// Compress backups in the background.
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set how often the background checker evaluates the rotation triggers.
    ///
    /// Default to 5 seconds.
    #[must_use]
    pub fn check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Set the strftime format of the timestamp inserted into backup names.
    ///
    /// Default to `%Y-%m-%dT%H-%M-%S`. The format must parse back from its own output.
    #[must_use]
    pub fn backup_time_format(mut self, format: impl Into<String>) -> Self {
        self.backup_time_format = format.into();
        self
    }

    /// Set the compression format of backups. Default to gzip.
    #[must_use]
    pub fn archive_format(mut self, format: ArchiveFormat) -> Self {
        self.archive_format = format;
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RotatingFileWriter`].
    ///
    /// Creates the directory and opens the current file for appending. When rotation is
    /// enabled, also starts the background checker.
    pub fn build(self) -> Result<RotatingFileWriter, Error> {
        let Self {
            directory,
            filename,
            rotate,
            max_size,
            rotation_interval,
            compress,
            check_interval,
            backup_time_format,
            archive_format,
            clock,
            trap,
        } = self;

        if rotate && check_interval.is_zero() {
            return Err(Error::config_invalid("check interval must not be zero"));
        }

        let naming = Naming::new(directory, filename, backup_time_format, archive_format)?;
        let policy = Policy {
            rotate,
            max_size,
            rotation_interval,
            compress,
            check_interval,
        };

        RotatingFileWriter::open(naming, policy, clock, trap)
    }
}

/// When and how to rotate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Policy {
    pub(crate) rotate: bool,
    pub(crate) max_size: Option<NonZeroU64>,
    pub(crate) rotation_interval: Option<Duration>,
    pub(crate) compress: bool,
    pub(crate) check_interval: Duration,
}

impl Policy {
    pub(crate) fn size_exceeded(&self, size: u64) -> bool {
        self.max_size.is_some_and(|max| size >= max.get())
    }

    pub(crate) fn age_exceeded(&self, birth: jiff::Timestamp, now: jiff::Timestamp) -> bool {
        self.rotation_interval.is_some_and(|interval| {
            let interval = jiff::SignedDuration::try_from(interval)
                .unwrap_or(jiff::SignedDuration::MAX);
            now.duration_since(birth) > interval
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_triggers() {
        let policy = Policy {
            rotate: true,
            max_size: NonZeroU64::new(100),
            rotation_interval: Some(Duration::from_secs(60)),
            compress: false,
            check_interval: DEFAULT_CHECK_INTERVAL,
        };

        assert!(!policy.size_exceeded(99));
        assert!(policy.size_exceeded(100));

        let birth: jiff::Timestamp = "2024-08-10T00:00:00Z".parse().unwrap();
        let at_limit: jiff::Timestamp = "2024-08-10T00:01:00Z".parse().unwrap();
        let past_limit: jiff::Timestamp = "2024-08-10T00:01:01Z".parse().unwrap();
        assert!(!policy.age_exceeded(birth, at_limit));
        assert!(policy.age_exceeded(birth, past_limit));

        let unbounded = Policy {
            max_size: None,
            rotation_interval: None,
            ..policy
        };
        assert!(!unbounded.size_exceeded(u64::MAX));
        assert!(!unbounded.age_exceeded(birth, past_limit));
    }

    #[test]
    fn test_default_location() {
        let builder = RotatingFileWriterBuilder::default();
        assert!(builder.directory.ends_with("logs"));
        assert!(builder.filename.ends_with(".log"));
        assert!(!builder.rotate);
        assert_eq!(builder.check_interval, DEFAULT_CHECK_INTERVAL);
    }

    #[test]
    fn test_zero_check_interval_rejected() {
        let err = RotatingFileWriterBuilder::new("logs", "app.log")
            .rotate(true)
            .check_interval(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::ConfigInvalid);
    }
}
