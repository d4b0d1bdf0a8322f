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


#![cfg(feature = "rotating-file")]

use std::fs;
use std::io::Read;
use std::num::NonZeroU64;
use std::path::Path;
use std::thread;
use std::time::Duration;

use flate2::read::GzDecoder;
use logbook::Logger;
use logbook::format::ConsoleFormatter;
use logbook::writer::RotatingFileWriterBuilder;
use tempfile::TempDir;

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_background_age_rotation_with_compression() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let writer = RotatingFileWriterBuilder::new(temp_dir.path(), "app.log")
        .rotate(true)
        .rotation_interval(Duration::from_millis(200))
        .check_interval(Duration::from_millis(50))
        .compress(true)
        .build()
        .unwrap();
    let logger = Logger::builder()
        .formatter(ConsoleFormatter::default().no_color())
        .writer(writer)
        .build();

    logger.info().msg("before rotation");
    thread::sleep(Duration::from_millis(600));
    logger.info().msg("after rotation");
    logger.close().unwrap();

    let names = file_names(temp_dir.path());
    let archives: Vec<_> = names.iter().filter(|name| name.ends_with(".log.gz")).collect();
    assert!(!archives.is_empty(), "{names:?}");
    assert!(names.iter().all(|name| name == "app.log" || name.ends_with(".gz")), "{names:?}");

    let mut archived = String::new();
    for archive in archives {
        let file = fs::File::open(temp_dir.path().join(archive)).unwrap();
        GzDecoder::new(file).read_to_string(&mut archived).unwrap();
    }
    assert!(archived.contains("[INF] before rotation\n"), "{archived:?}");

    let current = fs::read_to_string(temp_dir.path().join("app.log")).unwrap();
    assert!(!current.contains("before rotation"), "{current:?}");
}

#[test]
fn test_size_rotation_through_logger() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let writer = RotatingFileWriterBuilder::new(temp_dir.path(), "app.log")
        .rotate(true)
        .max_size(NonZeroU64::new(64).unwrap())
        .check_interval(Duration::from_secs(3600))
        .build()
        .unwrap();
    let logger = Logger::builder()
        .formatter(ConsoleFormatter::default().no_color())
        .writer(writer)
        .build();

    for i in 0..4 {
        logger.info().set("i", i.to_string()).msg("x".repeat(60));
    }
    logger.close().unwrap();

    let names = file_names(temp_dir.path());
    assert_eq!(names.len(), 5, "{names:?}");
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("app.log")).unwrap(),
        ""
    );
}
