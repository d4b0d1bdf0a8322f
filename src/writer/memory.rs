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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::Level;
use crate::writer::Writer;
use crate::writer::write_line;

/// A writer that keeps every line in memory, so tests can inspect what was logged.
///
/// Clones share the same buffer: keep one clone and hand the other to the logger.
///
/// # Examples
///
/// ```
/// use logbook::Logger;
/// use logbook::format::ConsoleFormatter;
/// use logbook::writer::MemoryWriter;
///
/// let writer = MemoryWriter::default();
/// let logger = Logger::builder()
///     .formatter(ConsoleFormatter::default().no_color())
///     .writer(writer.clone())
///     .build();
///
/// logger.info().set("user", "alice").msg("login");
/// assert_eq!(writer.lines(), vec!["[INF] login user=alice"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryWriter {
    records: Arc<Mutex<Vec<(Level, Vec<u8>)>>>,
}

impl MemoryWriter {
    fn records(&self) -> MutexGuard<'_, Vec<(Level, Vec<u8>)>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far, terminators included.
    pub fn contents(&self) -> String {
        let records = self.records();
        let bytes: Vec<u8> = records.iter().flat_map(|(_, line)| line.clone()).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Every line written so far, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.entries().into_iter().map(|(_, line)| line).collect()
    }

    /// Every line written so far with its level, without terminators.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.records()
            .iter()
            .map(|(level, line)| {
                let line = String::from_utf8_lossy(line);
                let line = line.trim_end_matches(['\r', '\n']);
                (*level, line.to_string())
            })
            .collect()
    }

    /// Number of lines written so far.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Forget every line written so far.
    pub fn clear(&self) {
        self.records().clear();
    }
}

impl Writer for MemoryWriter {
    fn write(&self, data: &[u8], level: Level) {
        let mut line = Vec::with_capacity(data.len() + 2);
        let _ = write_line(&mut line, data);
        self.records().push((level, line));
    }
}
