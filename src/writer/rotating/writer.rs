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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::Error;
use crate::Level;
use crate::trap::Trap;
use crate::writer::Writer;
use crate::writer::rotating::builder::Policy;
use crate::writer::rotating::clock::Clock;
use crate::writer::rotating::naming::Naming;
use crate::writer::write_line;

/// A writer for a file that rotates by size or by age.
///
/// Build one with [`RotatingFileWriterBuilder`](super::RotatingFileWriterBuilder). Writes and
/// rotations share one lock, so a line is never split across two files. Closing, or dropping,
/// the writer stops the background checker and waits for pending compressions.
#[derive(Debug)]
pub struct RotatingFileWriter {
    shared: Arc<Shared>,
    checker: Mutex<Option<Checker>>,
}

#[derive(Debug)]
struct Checker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
struct Shared {
    naming: Naming,
    policy: Policy,
    state: Mutex<State>,
    compressions: Mutex<Vec<JoinHandle<()>>>,
    clock: Clock,
    trap: Arc<dyn Trap>,
}

#[derive(Debug)]
struct State {
    file: Option<File>,
    size: u64,
    opened_at: Timestamp,
    closed: bool,
}

impl RotatingFileWriter {
    pub(crate) fn open(
        naming: Naming,
        policy: Policy,
        clock: Clock,
        trap: Arc<dyn Trap>,
    ) -> Result<Self, Error> {
        let directory = naming.directory();
        fs::create_dir_all(directory).map_err(|err| {
            Error::new("failed to create log directory")
                .with_context("path", directory.display())
                .with_source(err)
        })?;

        let (file, size) = open_current(&naming.current_path())?;
        let state = State {
            file: Some(file),
            size,
            opened_at: clock.now(),
            closed: false,
        };

        let shared = Arc::new(Shared {
            naming,
            policy,
            state: Mutex::new(state),
            compressions: Mutex::new(vec![]),
            clock,
            trap,
        });

        let checker = if policy.rotate {
            Some(Checker::spawn(shared.clone())?)
        } else {
            None
        };

        Ok(Self {
            shared,
            checker: Mutex::new(checker),
        })
    }

    /// The path of the current file.
    pub fn path(&self) -> PathBuf {
        self.shared.naming.current_path()
    }

    /// Recover the backup time from the file name of a backup, or of its archive.
    ///
    /// Return `None` if the name is not one this writer produces.
    pub fn parse_backup_time(&self, file_name: &str) -> Option<DateTime> {
        self.shared.naming.parse_backup_time(file_name)
    }

    /// Evaluate the rotation triggers now, as the background checker does on every tick.
    ///
    /// Does nothing if rotation is disabled.
    pub fn check_and_rotate(&self) {
        self.shared.check_and_rotate();
    }
}

impl Writer for RotatingFileWriter {
    fn write(&self, data: &[u8], _: Level) {
        let shared = &*self.shared;
        let mut state = shared.lock_state();

        let Some(file) = state.file.as_mut() else {
            if state.closed {
                shared.trap.trap(&Error::new("write to a closed rotating file writer"));
            }
            return;
        };

        match write_line(file, data) {
            Ok(n) => state.size += n as u64,
            Err(err) => {
                let err = Error::new("failed to write log line")
                    .with_context("path", shared.naming.current_path().display())
                    .with_source(err);
                shared.trap.trap(&err);
            }
        }

        if shared.policy.rotate && shared.policy.size_exceeded(state.size) {
            shared.rotate(&mut state);
        }
    }

    fn flush(&self) -> Result<(), Error> {
        let mut state = self.shared.lock_state();
        match state.file.as_mut() {
            Some(file) => file.flush().map_err(Error::from_io_error),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<(), Error> {
        let checker = self
            .checker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(checker) = checker {
            checker.stop();
        }

        let file = {
            let mut state = self.shared.lock_state();
            state.closed = true;
            state.file.take()
        };

        self.shared.join_compressions();

        match file {
            Some(mut file) => {
                file.flush().map_err(Error::from_io_error)?;
                file.sync_all().map_err(Error::from_io_error)
            }
            None => Ok(()),
        }
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            let err = Error::new("failed to close rotating file writer on drop").with_source(err);
            self.shared.trap.trap(&err);
        }
    }
}

impl Checker {
    fn spawn(shared: Arc<Shared>) -> Result<Checker, Error> {
        let (shutdown, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        let ticker = crossbeam_channel::tick(shared.policy.check_interval);

        let handle = thread::Builder::new()
            .name("logbook-rotation-checker".to_string())
            .spawn(move || {
                loop {
                    crossbeam_channel::select! {
                        recv(ticker) -> _ => shared.check_and_rotate(),
                        recv(shutdown_rx) -> _ => break,
                    }
                }
            })
            .map_err(|err| Error::new("failed to spawn rotation checker").with_source(err))?;

        Ok(Checker { shutdown, handle })
    }

    fn stop(self) {
        let Checker { shutdown, handle } = self;
        // disconnecting wakes the checker up
        drop(shutdown);
        let _ = handle.join();
    }
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_and_rotate(&self) {
        if !self.policy.rotate {
            return;
        }

        let mut state = self.lock_state();
        if state.closed {
            return;
        }

        let Some(file) = state.file.as_ref() else {
            // the previous rotation failed to reopen; try again
            self.reopen(&mut state, self.clock.now());
            return;
        };

        let size = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(_) => return,
        };
        let birth = self.birth_time(&state);
        let now = self.clock.now();

        if self.policy.size_exceeded(size) || self.policy.age_exceeded(birth, now) {
            self.rotate(&mut state);
        }
    }

    /// The creation time of the current file if the platform reports one, or else the time the
    /// writer opened it.
    fn birth_time(&self, state: &State) -> Timestamp {
        fs::metadata(self.naming.current_path())
            .and_then(|metadata| metadata.created())
            .ok()
            .and_then(|created| Timestamp::try_from(created).ok())
            .unwrap_or(state.opened_at)
    }

    fn rotate(&self, state: &mut State) {
        let now = self.clock.now();

        if let Some(mut file) = state.file.take() {
            if let Err(err) = file.flush().and_then(|()| file.sync_all()) {
                let err = Error::new("failed to sync log file before rotation").with_source(err);
                self.trap.trap(&err);
            }
        }

        let current = self.naming.current_path();
        let rotated = self
            .naming
            .backup_path(&now.to_zoned(TimeZone::system()))
            .and_then(|backup| {
                fs::rename(&current, &backup)
                    .map(|()| backup)
                    .map_err(|err| {
                        Error::new("failed to rename log file")
                            .with_context("path", current.display())
                            .with_source(err)
                    })
            });

        match rotated {
            Ok(backup) if self.policy.compress => self.spawn_compression(backup),
            Ok(_) => {}
            Err(err) => self.trap.trap(&err),
        }

        self.reopen(state, now);
    }

    fn reopen(&self, state: &mut State, now: Timestamp) {
        match open_current(&self.naming.current_path()) {
            Ok((file, size)) => {
                state.file = Some(file);
                state.size = size;
                state.opened_at = now;
            }
            Err(err) => self.trap.trap(&err),
        }
    }

    fn spawn_compression(&self, backup: PathBuf) {
        let archive = self.naming.archive_path(&backup);
        let format = self.naming.archive_format();
        let trap = self.trap.clone();

        let spawned = thread::Builder::new()
            .name("logbook-rotation-compress".to_string())
            .spawn(move || match format.compress(&backup, &archive) {
                Ok(()) => {
                    if let Err(err) = fs::remove_file(&backup) {
                        let err = Error::new("failed to remove compressed backup")
                            .with_context("path", backup.display())
                            .with_source(err);
                        trap.trap(&err);
                    }
                }
                Err(err) => trap.trap(&err),
            });

        match spawned {
            Ok(handle) => {
                let mut compressions = self
                    .compressions
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                compressions.retain(|handle| !handle.is_finished());
                compressions.push(handle);
            }
            Err(err) => {
                let err = Error::new("failed to spawn compression").with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn join_compressions(&self) {
        let handles = std::mem::take(
            &mut *self
                .compressions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            if handle.join().is_err() {
                self.trap.trap(&Error::new("compression thread panicked"));
            }
        }
    }
}

fn open_current(path: &Path) -> Result<(File, u64), Error> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", path.display())
                .with_source(err)
        })?;
    let size = file.metadata().map(|metadata| metadata.len()).unwrap_or(0);
    Ok((file, size))
}
