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

use jiff::Timestamp;
use tokio_util::sync::CancellationToken;

use crate::Error;
use crate::handler::Attr;
use crate::handler::HandlerLevel;
use crate::handler::Value;

/// The call context of a handler, carrying an optional cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancellation: Option<CancellationToken>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled together with `token`.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: Some(token),
        }
    }

    /// Whether the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::cancelled("context canceled"))
        } else {
            Ok(())
        }
    }
}

/// A structured record handed to a handler: a time, a level, a message and attributes.
#[derive(Debug, Clone)]
pub struct HandlerRecord {
    time: Timestamp,
    level: HandlerLevel,
    message: String,
    attrs: Vec<Attr>,
}

impl HandlerRecord {
    /// Create a record at the current time.
    pub fn new(level: HandlerLevel, message: impl Into<String>) -> Self {
        Self {
            time: Timestamp::now(),
            level,
            message: message.into(),
            attrs: vec![],
        }
    }

    /// Append an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.push(Attr::new(key, value));
        self
    }

    /// Append attributes.
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Append attributes in place.
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    /// The time the record was created.
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// The level of the record.
    pub fn level(&self) -> HandlerLevel {
        self.level
    }

    /// The message of the record.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The attributes of the record, in order.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_cancellation() {
        assert!(!Context::background().is_cancelled());
        assert!(Context::background().check().is_ok());

        let token = CancellationToken::new();
        let cx = Context::with_cancellation(token.clone());
        assert!(!cx.is_cancelled());

        token.cancel();
        assert!(cx.is_cancelled());
        assert!(cx.check().unwrap_err().is_cancelled());
    }
}
