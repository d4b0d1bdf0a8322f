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

use std::borrow::Cow;
use std::sync::LazyLock;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use regex::Regex;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

use crate::Error;
use crate::format::Formatter;
use crate::format::LogEvent;
use crate::format::Metadata;
use crate::format::TIMESTAMP_KEY;

const MESSAGE_KEY: &str = "msg";

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]+m").expect("ANSI escape pattern must compile; this is a bug")
});

/// A JSON formatter for machine-readable logs.
///
/// Output format:
///
/// ```json
/// {"label":"INF","user":"alice","timestamp":"2024-08-11T14:44:57+0000","msg":"user logged in"}
/// ```
///
/// Every metadata pair becomes a string field. `timestamp` is always set to the formatting time,
/// and `msg` holds the message with ANSI color sequences removed. Events without a message
/// produce no output.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logbook::format::JsonFormatter;
///
/// let formatter = JsonFormatter::default().timezone(TimeZone::system());
/// ```
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    timezone: TimeZone,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            timezone: TimeZone::UTC,
        }
    }
}

impl JsonFormatter {
    /// Sets the timezone for timestamps. Default to UTC.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }
}

struct EventLine<'a> {
    metadata: &'a Metadata,
    timestamp: String,
    message: Cow<'a, str>,
}

impl Serialize for EventLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.metadata {
            if key == TIMESTAMP_KEY || key == MESSAGE_KEY {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(TIMESTAMP_KEY, &self.timestamp)?;
        map.serialize_entry(MESSAGE_KEY, &self.message)?;
        map.end()
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, event: &LogEvent) -> Result<Option<Vec<u8>>, Error> {
        let Some(message) = event.message() else {
            return Ok(None);
        };

        let timestamp = Timestamp::now()
            .to_zoned(self.timezone.clone())
            .strftime("%Y-%m-%dT%H:%M:%S%z")
            .to_string();
        let line = EventLine {
            metadata: event.metadata(),
            timestamp,
            message: ANSI_ESCAPE.replace_all(message, ""),
        };

        let bytes = serde_json::to_vec(&line)
            .map_err(|err| Error::new("failed to serialize event as json").with_source(err))?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::Level;

    fn render(message: Option<&str>, metadata: &Metadata) -> Option<Value> {
        let mut event = LogEvent::new(Level::Info, metadata);
        if let Some(message) = message {
            event = event.with_message(message);
        }
        JsonFormatter::default()
            .format(&event)
            .unwrap()
            .map(|bytes| serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_fields() {
        let metadata = Metadata::from([
            ("label".to_string(), "INF".to_string()),
            ("user".to_string(), "alice".to_string()),
            ("timestamp".to_string(), "stale".to_string()),
        ]);
        let value = render(Some("login"), &metadata).unwrap();

        assert_eq!(value["msg"], "login");
        assert_eq!(value["user"], "alice");
        assert_eq!(value["label"], "INF");

        let timestamp = value["timestamp"].as_str().unwrap();
        let pattern = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\+0000$").unwrap();
        assert!(pattern.is_match(timestamp), "{timestamp}");
    }

    #[test]
    fn test_strips_ansi_sequences() {
        let value = render(Some("\x1b[1;31mred\x1b[0m alert"), &Metadata::new()).unwrap();
        assert_eq!(value["msg"], "red alert");
    }

    #[test]
    fn test_no_message_no_output() {
        let metadata = Metadata::from([("user".to_string(), "alice".to_string())]);
        assert!(render(None, &metadata).is_none());
    }

    #[test]
    fn test_single_line() {
        let metadata = Metadata::new();
        let event = LogEvent::new(Level::Info, &metadata).with_message("multi\nline");
        let bytes = JsonFormatter::default().format(&event).unwrap().unwrap();
        assert!(!bytes.contains(&b'\n'));
    }
}
