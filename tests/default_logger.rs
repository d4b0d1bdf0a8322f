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


//! The package-level functions log through the process-wide default logger, so these tests
//! serialize on a lock and restore the default configuration when done.

use std::env;
use std::process::Command;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use logbook::Level;
use logbook::Logger;
use logbook::format::ConsoleFormatter;
use logbook::writer::MemoryWriter;
use logbook::writer::NEWLINE;

static SERIAL: Mutex<()> = Mutex::new(());

const FATAL_CHILD_ENV: &str = "LOGBOOK_TEST_FATAL_CHILD";
const CONSOLE_CHILD_ENV: &str = "LOGBOOK_TEST_CONSOLE_CHILD";

fn capture_default() -> (MutexGuard<'static, ()>, MemoryWriter) {
    let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    let writer = MemoryWriter::default();
    logbook::set_default_logger(Logger::default());
    logbook::set_formatter(ConsoleFormatter::default().no_color());
    logbook::set_writer(writer.clone());
    (guard, writer)
}

#[test]
fn test_package_level_functions() {
    let (_guard, writer) = capture_default();

    logbook::error().set("code", "E42").msg("failed");
    logbook::warning().msg("careful");
    logbook::info().msgf(format_args!("{} users", 3));
    logbook::debug().msg("hidden at info");
    logbook::verbose().msg_with(|| -> String { unreachable!("supplier of a disabled event") });
    logbook::silent().msg("raw output");
    logbook::print().set("k", "v").msg("unlabeled info");

    assert_eq!(
        writer.entries(),
        vec![
            (Level::Error, "[ERR] failed code=E42".to_string()),
            (Level::Warning, "[WRN] careful".to_string()),
            (Level::Info, "[INF] 3 users".to_string()),
            (Level::Silent, "raw output".to_string()),
            (Level::Info, "unlabeled info k=v".to_string()),
        ]
    );
}

#[test]
fn test_reconfigure_default_logger() {
    let (_guard, writer) = capture_default();

    logbook::debug().msg("before");
    logbook::set_max_level(Level::Verbose);
    logbook::debug().msg("after");
    logbook::verbose().msg("noisiest");

    assert_eq!(logbook::default_logger().max_level(), Level::Verbose);
    assert_eq!(writer.lines(), vec!["[DBG] after", "[VER] noisiest"]);
}

#[test]
fn test_snapshot_survives_reconfiguration() {
    let (_guard, writer) = capture_default();

    let event = logbook::info().set("phase", "old");
    logbook::set_writer(MemoryWriter::default());
    event.msg("still delivered");

    assert_eq!(writer.lines(), vec!["[INF] still delivered phase=old"]);
}

#[test]
fn test_timestamps() {
    let (_guard, writer) = capture_default();

    // events at the given level or noisier are stamped
    logbook::set_timestamp(true, Level::Info);
    logbook::error().msg("unstamped");
    logbook::info().msg("stamped");

    let lines = writer.lines();
    assert_eq!(lines[0], "[ERR] unstamped");
    let stamped = lines[1].strip_prefix("[INF] [").unwrap();
    let (timestamp, message) = stamped.split_once("] ").unwrap();
    assert!(timestamp.parse::<jiff::Timestamp>().is_ok(), "{timestamp}");
    assert_eq!(message, "stamped");
}

#[test]
fn test_builder_apply() {
    let (_guard, writer) = capture_default();

    logbook::builder()
        .max_level(Level::Error)
        .formatter(ConsoleFormatter::default().no_color())
        .writer(writer.clone())
        .apply();

    logbook::warning().msg("dropped");
    logbook::error().msg("kept");

    assert_eq!(writer.lines(), vec!["[ERR] kept"]);
}

#[test]
fn test_fatal_exits_process() {
    if env::var_os(FATAL_CHILD_ENV).is_some() {
        logbook::set_formatter(ConsoleFormatter::default().no_color());
        logbook::fatal().set("reason", "disk").msg("unrecoverable");
        unreachable!("a fatal event terminates the process");
    }

    let output = Command::new(env::current_exe().unwrap())
        .args(["--exact", "test_fatal_exits_process", "--nocapture"])
        .env(FATAL_CHILD_ENV, "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[FTL] unrecoverable reason=disk"),
        "{stderr}"
    );
}

#[test]
fn test_console_streams() {
    if env::var_os(CONSOLE_CHILD_ENV).is_some() {
        logbook::builder()
            .max_level(Level::Debug)
            .formatter(ConsoleFormatter::default().no_color())
            .apply();
        logbook::info().set("user", "alice").msg("login");
        logbook::silent().msg("plain output");
        return;
    }

    let output = Command::new(env::current_exe().unwrap())
        .args(["--exact", "test_console_streams", "--nocapture"])
        .env(CONSOLE_CHILD_ENV, "1")
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let newline = String::from_utf8_lossy(NEWLINE);

    // the test harness shares stdout with the child
    assert!(stdout.contains(&format!("plain output{newline}")), "{stdout}");
    assert!(!stdout.contains("login"), "{stdout}");

    assert_eq!(stderr, format!("[INF] login user=alice{newline}"));
}
