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

//! A file writer that rotates its file by size or by age.
//!
//! The current file always lives at `<directory>/<filename>`. When a rotation triggers, the file
//! is renamed to `<stem>.<backup time>.<ext>` and a fresh file is opened at the canonical path.
//! With compression enabled, the backup is compressed on a background thread into
//! `<backup>.<archive extension>` and removed once the archive is complete.
//!
//! # Examples
//!
//! ```no_run
//! use std::num::NonZeroU64;
//! use std::time::Duration;
//!
//! use logbook::writer::RotatingFileWriterBuilder;
//!
//! let writer = RotatingFileWriterBuilder::new("logs", "app.log")
//!     .rotate(true)
//!     .max_size(NonZeroU64::new(10 * 1024 * 1024).unwrap())
//!     .rotation_interval(Duration::from_secs(24 * 60 * 60))
//!     .compress(true)
//!     .build()
//!     .unwrap();
//! ```

mod archive;
mod builder;
mod clock;
mod naming;
mod writer;

pub use self::archive::ArchiveFormat;
pub use self::builder::RotatingFileWriterBuilder;
pub use self::writer::RotatingFileWriter;

/// The default interval between two rotation checks.
pub const DEFAULT_CHECK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5);

/// The default strftime format of the timestamp inserted into backup names.
pub const DEFAULT_BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
