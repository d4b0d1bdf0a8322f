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
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use flate2::Compression;
use flate2::write::GzEncoder;
use flate2::write::ZlibEncoder;

use crate::Error;

/// The compression format of rotated backups.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArchiveFormat {
    /// Gzip, with the `gz` extension.
    #[default]
    Gzip,
    /// Zlib, with the `zz` extension.
    Zlib,
}

impl ArchiveFormat {
    /// The extension appended to a compressed backup.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Gzip => "gz",
            ArchiveFormat::Zlib => "zz",
        }
    }

    /// Compress `src` into `dst`. A partially written `dst` is removed on failure.
    pub(crate) fn compress(&self, src: &Path, dst: &Path) -> Result<(), Error> {
        let result = self.compress_file(src, dst);
        if result.is_err() {
            let _ = fs::remove_file(dst);
        }
        result.map_err(|err| {
            Error::new("failed to compress rotated log")
                .with_context("src", src.display())
                .with_context("dst", dst.display())
                .with_source(err)
        })
    }

    fn compress_file(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let mut input = File::open(src)?;
        let output = BufWriter::new(File::create(dst)?);

        let mut output = match self {
            ArchiveFormat::Gzip => {
                let mut encoder = GzEncoder::new(output, Compression::default());
                io::copy(&mut input, &mut encoder)?;
                encoder.finish()?
            }
            ArchiveFormat::Zlib => {
                let mut encoder = ZlibEncoder::new(output, Compression::default());
                io::copy(&mut input, &mut encoder)?;
                encoder.finish()?
            }
        };

        output.flush()?;
        output.get_ref().sync_all()
    }
}

impl FromStr for ArchiveFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for (name, format) in [
            ("gz", ArchiveFormat::Gzip),
            ("gzip", ArchiveFormat::Gzip),
            ("zz", ArchiveFormat::Zlib),
            ("zlib", ArchiveFormat::Zlib),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(format);
            }
        }

        Err(Error::config_invalid(format!("unsupported archive format: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;
    use flate2::read::ZlibDecoder;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_compress_formats() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let src = temp_dir.path().join("app.log");
        fs::write(&src, "line one\nline two\n").unwrap();

        let gz = temp_dir.path().join("app.log.gz");
        ArchiveFormat::Gzip.compress(&src, &gz).unwrap();
        let mut text = String::new();
        GzDecoder::new(File::open(&gz).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "line one\nline two\n");

        let zz = temp_dir.path().join("app.log.zz");
        ArchiveFormat::Zlib.compress(&src, &zz).unwrap();
        let mut text = String::new();
        ZlibDecoder::new(File::open(&zz).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[test]
    fn test_compress_missing_source() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let dst = temp_dir.path().join("missing.log.gz");
        let err = ArchiveFormat::Gzip
            .compress(&temp_dir.path().join("missing.log"), &dst)
            .unwrap_err();
        assert!(err.to_string().contains("failed to compress rotated log"));
        assert!(!dst.exists());
    }

    #[test]
    fn test_parse() {
        assert_eq!("gz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Gzip);
        assert_eq!("ZLIB".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zlib);
        assert!("rar".parse::<ArchiveFormat>().is_err());
    }
}
