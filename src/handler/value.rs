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

use std::any::Any;
use std::fmt;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;

use crate::handler::HandlerLevel;
use crate::time::rfc3339_utc;

/// The zero time, `0001-01-01T00:00:00Z`.
pub const ZERO_TIME: Timestamp = Timestamp::constant(-62_135_596_800, 0);

/// A key-value attribute.
#[derive(Debug, Clone)]
pub struct Attr {
    /// The key.
    pub key: String,
    /// The value.
    pub value: Value,
}

impl Attr {
    /// Create an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create an attribute holding any debuggable value.
    pub fn any(key: impl Into<String>, value: impl fmt::Debug + Send + Sync + 'static) -> Self {
        Self::new(key, Value::any(value))
    }

    /// Create an attribute holding a nested group of attributes.
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::Group(attrs.into_iter().collect()))
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value.render())
    }
}

/// The value of an [`Attr`].
#[derive(Debug, Clone)]
pub enum Value {
    /// A string.
    String(String),
    /// A signed integer.
    Int64(i64),
    /// An unsigned integer.
    Uint64(u64),
    /// A floating point number.
    Float64(f64),
    /// A boolean.
    Bool(bool),
    /// A duration.
    Duration(Duration),
    /// A point in time.
    Time(Timestamp),
    /// A handler level.
    Level(HandlerLevel),
    /// Any other value, rendered with its `Debug` implementation. `None` renders as `<nil>`.
    Any(Option<Arc<dyn fmt::Debug + Send + Sync>>),
    /// A nested group of attributes.
    Group(Vec<Attr>),
}

impl Value {
    /// Wrap any debuggable value.
    pub fn any(value: impl fmt::Debug + Send + Sync + 'static) -> Self {
        Value::Any(Some(Arc::new(value)))
    }

    /// The missing value.
    pub fn nil() -> Self {
        Value::Any(None)
    }

    /// Render this value as a metadata string.
    ///
    /// A panic raised while rendering, such as from a `Debug` implementation, is caught and
    /// rendered as `<error formatting value: REASON>`.
    pub fn render(&self) -> String {
        match panic::catch_unwind(AssertUnwindSafe(|| self.render_unguarded())) {
            Ok(rendered) => rendered,
            Err(payload) => {
                format!("<error formatting value: {}>", panic_reason(payload.as_ref()))
            }
        }
    }

    fn render_unguarded(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int64(n) => n.to_string(),
            Value::Uint64(n) => n.to_string(),
            Value::Float64(f) => format_float(*f),
            Value::Bool(b) => b.to_string(),
            Value::Duration(d) => format_duration(*d),
            Value::Time(ts) => format_time(*ts),
            Value::Level(level) => level.to_string(),
            Value::Any(Some(value)) => format!("{value:?}"),
            Value::Any(None) => "<nil>".to_string(),
            Value::Group(attrs) => {
                let attrs: Vec<String> = attrs.iter().map(Attr::to_string).collect();
                format!("[group:[{}]]", attrs.join(" "))
            }
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason
    } else {
        "unknown panic"
    }
}

/// The shortest representation that round-trips, in exponent form for exponents below -4 or
/// from 6 up, as in `3.14`, `1e+06` or `1e-05`.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return f.to_string();
    };

    if (-4..6).contains(&exponent) {
        f.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

/// Unit-suffixed form with a decimal fraction of the smallest unit, as in `1.5ms`, `1.5s` or
/// `1h30m0s`. Below one second the unit is `ns`, `µs` or `ms`; from one second up, hours and
/// minutes lead and keep their zero components.
fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000_000_000 {
        if nanos < 1_000 {
            return format!("{nanos}ns");
        }
        let (digits, unit) = if nanos < 1_000_000 {
            (3, "µs")
        } else {
            (6, "ms")
        };
        let (whole, fraction) = split_fraction(nanos, digits);
        return format!("{whole}{fraction}{unit}");
    }

    let (secs, fraction) = split_fraction(nanos, 9);
    let mut text = String::new();
    let minutes = secs / 60;
    if minutes > 0 {
        let hours = minutes / 60;
        if hours > 0 {
            text.push_str(&format!("{hours}h"));
        }
        text.push_str(&format!("{}m", minutes % 60));
    }
    text.push_str(&format!("{}{fraction}s", secs % 60));
    text
}

/// Split `value` into its integer part and a `.ddd` fraction of `digits` decimal places, trailing
/// zeros removed. The fraction is empty when it is zero.
fn split_fraction(value: u128, digits: u32) -> (u128, String) {
    let scale = 10u128.pow(digits);
    let (whole, fraction) = (value / scale, value % scale);
    if fraction == 0 {
        return (whole, String::new());
    }

    let fraction = format!(".{fraction:0width$}", width = digits as usize);
    (whole, fraction.trim_end_matches('0').to_string())
}

fn format_time(ts: Timestamp) -> String {
    if ts == ZERO_TIME {
        return "0001-01-01T00:00:00Z".to_string();
    }
    rfc3339_utc(ts)
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int64(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Uint64(value.into())
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Uint64(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Time(value)
    }
}

impl From<HandlerLevel> for Value {
    fn from(value: HandlerLevel) -> Self {
        Value::Level(value)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(value: Vec<Attr>) -> Self {
        Value::Group(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(Value::from("alice").render(), "alice");
        assert_eq!(Value::from(-42i64).render(), "-42");
        assert_eq!(Value::from(u64::MAX).render(), "18446744073709551615");
        assert_eq!(Value::from(true).render(), "true");
        assert_eq!(Value::from(HandlerLevel::WARN).render(), "WARN");
    }

    #[test]
    fn test_floats() {
        assert_eq!(format_float(3.14), "3.14");
        assert_eq!(format_float(100000.0), "100000");
        assert_eq!(format_float(123456.5), "123456.5");
        assert_eq!(format_float(1e6), "1e+06");
        assert_eq!(format_float(1234567.0), "1.234567e+06");
        assert_eq!(format_float(1e21), "1e+21");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-2.5e-7), "-2.5e-07");
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_durations() {
        let cases = [
            (Duration::ZERO, "0s"),
            (Duration::from_nanos(999), "999ns"),
            (Duration::from_nanos(1_500), "1.5µs"),
            (Duration::from_micros(1_500), "1.5ms"),
            (Duration::from_millis(100), "100ms"),
            (Duration::from_millis(1_500), "1.5s"),
            (Duration::from_secs(61), "1m1s"),
            (Duration::from_secs(5400), "1h30m0s"),
            (Duration::from_secs(3600), "1h0m0s"),
            (Duration::new(90_061, 250_000_000), "25h1m1.25s"),
        ];
        for (duration, expected) in cases {
            assert_eq!(Value::from(duration).render(), expected, "{duration:?}");
        }
    }

    #[test]
    fn test_times() {
        assert_eq!(Value::from(ZERO_TIME).render(), "0001-01-01T00:00:00Z");

        let ts: Timestamp = "2024-08-11T22:44:57.5Z".parse().unwrap();
        assert_eq!(Value::from(ts).render(), "2024-08-11T22:44:57Z");
    }

    #[test]
    fn test_any_and_nil() {
        let map = BTreeMap::from([("a", 1), ("b", 2)]);
        assert_eq!(Value::any(map).render(), r#"{"a": 1, "b": 2}"#);
        assert_eq!(Value::any(vec![1, 2, 3]).render(), "[1, 2, 3]");
        assert_eq!(Value::nil().render(), "<nil>");
    }

    #[test]
    fn test_group() {
        let value = Value::Group(vec![Attr::new("k", "v"), Attr::new("n", 1)]);
        assert_eq!(value.render(), "[group:[k=v n=1]]");
    }

    #[test]
    fn test_panic_is_rendered() {
        struct Exploding;

        impl fmt::Debug for Exploding {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                panic!("boom")
            }
        }

        assert_eq!(
            Value::any(Exploding).render(),
            "<error formatting value: boom>"
        );
    }
}
