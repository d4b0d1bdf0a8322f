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

//! Timestamp rendering shared by events, formatters and attribute values.

use jiff::Timestamp;
use jiff::Zoned;
use jiff::tz::Offset;
use jiff::tz::TimeZone;

/// RFC 3339 at second precision, in the system time zone.
pub(crate) fn rfc3339_now() -> String {
    rfc3339(&Zoned::now())
}

/// RFC 3339 at second precision, with `Z` for a zero offset.
pub(crate) fn rfc3339(zoned: &Zoned) -> String {
    if zoned.offset() == Offset::UTC {
        zoned.strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        zoned.strftime("%Y-%m-%dT%H:%M:%S%:z").to_string()
    }
}

/// RFC 3339 at second precision, in UTC.
pub(crate) fn rfc3339_utc(timestamp: Timestamp) -> String {
    rfc3339(&timestamp.to_zoned(TimeZone::UTC))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        let ts: Timestamp = "2024-08-11T22:44:57.172105Z".parse().unwrap();
        assert_eq!(rfc3339_utc(ts), "2024-08-11T22:44:57Z");

        let tz = TimeZone::fixed(jiff::tz::offset(8));
        assert_eq!(rfc3339(&ts.to_zoned(tz)), "2024-08-12T06:44:57+08:00");
    }
}
