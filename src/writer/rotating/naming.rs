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

use std::path::Path;
use std::path::PathBuf;

use jiff::Zoned;
use jiff::civil::Date;
use jiff::civil::DateTime;
use jiff::civil::Time;
use jiff::fmt::strtime;

use crate::Error;
use crate::writer::rotating::ArchiveFormat;

/// File names of the current log, its backups and their archives.
#[derive(Debug, Clone)]
pub(crate) struct Naming {
    directory: PathBuf,
    filename: String,
    backup_time_format: String,
    archive_format: ArchiveFormat,
}

impl Naming {
    pub(crate) fn new(
        directory: PathBuf,
        filename: String,
        backup_time_format: String,
        archive_format: ArchiveFormat,
    ) -> Result<Self, Error> {
        if filename.is_empty() {
            return Err(Error::config_invalid("filename must not be empty"));
        }

        let naming = Self {
            directory,
            filename,
            backup_time_format,
            archive_format,
        };

        let now = Zoned::now();
        let stamp = naming.format_time(&now)?;
        if naming.parse_time(&stamp).is_none() {
            return Err(Error::config_invalid(
                "backup time format cannot be parsed back from its own output",
            )
            .with_context("format", &naming.backup_time_format));
        }

        Ok(naming)
    }

    pub(crate) fn directory(&self) -> &Path {
        &self.directory
    }

    pub(crate) fn archive_format(&self) -> ArchiveFormat {
        self.archive_format
    }

    pub(crate) fn current_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    /// `app.log` splits into `app` and `.log`; a name without an extension keeps all of it.
    fn split_filename(&self) -> (&str, &str) {
        match self.filename.rfind('.') {
            Some(pos) if pos > 0 => self.filename.split_at(pos),
            _ => (&self.filename, ""),
        }
    }

    fn format_time(&self, now: &Zoned) -> Result<String, Error> {
        strtime::format(&self.backup_time_format, now).map_err(|err| {
            Error::config_invalid("invalid backup time format")
                .with_context("format", &self.backup_time_format)
                .with_source(err)
        })
    }

    fn parse_time(&self, stamp: &str) -> Option<DateTime> {
        let format = &self.backup_time_format;
        DateTime::strptime(format, stamp)
            .or_else(|_| Date::strptime(format, stamp).map(|date| date.to_datetime(Time::midnight())))
            .ok()
    }

    /// A backup path for `now` that collides with neither an existing backup nor its archive.
    pub(crate) fn backup_path(&self, now: &Zoned) -> Result<PathBuf, Error> {
        let (stem, ext) = self.split_filename();
        let stamp = self.format_time(now)?;

        let mut candidate = self.directory.join(format!("{stem}.{stamp}{ext}"));
        let mut counter = 1u32;
        while candidate.exists() || self.archive_path(&candidate).exists() {
            candidate = self.directory.join(format!("{stem}.{stamp}.{counter}{ext}"));
            counter += 1;
        }
        Ok(candidate)
    }

    pub(crate) fn archive_path(&self, backup: &Path) -> PathBuf {
        let mut archive = backup.as_os_str().to_os_string();
        archive.push(".");
        archive.push(self.archive_format.extension());
        PathBuf::from(archive)
    }

    /// Recover the backup time from the file name of a backup or of its archive.
    pub(crate) fn parse_backup_time(&self, file_name: &str) -> Option<DateTime> {
        let (stem, ext) = self.split_filename();
        let archive_suffix = format!(".{}", self.archive_format.extension());
        let name = file_name.strip_suffix(&archive_suffix).unwrap_or(file_name);

        let stamp = name.strip_prefix(stem)?.strip_prefix('.')?.strip_suffix(ext)?;
        if let Some(datetime) = self.parse_time(stamp) {
            return Some(datetime);
        }

        // collision counter, as in `app.<time>.2.log`
        let (stamp, counter) = stamp.rsplit_once('.')?;
        counter.parse::<u32>().ok()?;
        self.parse_time(stamp)
    }
}
