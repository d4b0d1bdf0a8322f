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
use std::fmt;
use std::sync::Arc;

use crate::Error;
use crate::Logger;
use crate::format::LABEL_KEY;
use crate::format::Metadata;
use crate::format::TIMESTAMP_KEY;
use crate::handler::Attr;
use crate::handler::Context;
use crate::handler::Handler;
use crate::handler::HandlerLevel;
use crate::handler::HandlerRecord;
use crate::handler::Value;
use crate::logger::default_logger;
use crate::time::rfc3339_now;

/// The attribute key conventionally holding a record level.
pub const LEVEL_KEY: &str = "level";

/// Rewrites or drops an attribute before it is added. The first argument is the group prefix the
/// attribute is added under, such as `http.`.
pub type ReplaceAttr = Arc<dyn Fn(&str, Attr) -> Option<Attr> + Send + Sync>;

/// Options of a [`LoggerHandler`].
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// The least severe level handled, in addition to the logger's own max level.
    pub level: Option<HandlerLevel>,
    /// Rewrites or drops every attribute before it is added.
    pub replace_attr: Option<ReplaceAttr>,
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("replace_attr", &self.replace_attr.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Options that admit every custom level and spell out their names.
///
/// A `level` attribute holding a [`HandlerLevel`] is rewritten to its
/// [`clean_name`](HandlerLevel::clean_name), and dropped when that name is empty.
pub fn trim_levels() -> HandlerOptions {
    HandlerOptions {
        level: Some(HandlerLevel::TRACE),
        replace_attr: Some(Arc::new(|_: &str, attr: Attr| {
            if attr.key != LEVEL_KEY {
                return Some(attr);
            }
            match attr.value {
                Value::Level(level) => {
                    let name = level.clean_name();
                    if name.is_empty() {
                        None
                    } else {
                        Some(Attr::new(LEVEL_KEY, name.into_owned()))
                    }
                }
                _ => Some(attr),
            }
        })),
    }
}

#[derive(Debug, Clone)]
struct BoundAttr {
    prefix: String,
    attr: Attr,
}

/// A [`Handler`] that routes records through a [`Logger`].
///
/// Levels are translated with [`HandlerLevel::to_level`]. The record message becomes the event
/// message, and every attribute becomes a metadata pair keyed by its group prefix and key.
/// Bound attributes keep the group prefix current when they were bound.
///
/// Derived handlers share the logger, and so its formatter and writer.
#[derive(Debug, Clone)]
pub struct LoggerHandler {
    logger: Arc<Logger>,
    group_prefix: String,
    attrs: Arc<[BoundAttr]>,
    options: HandlerOptions,
}

impl LoggerHandler {
    /// Create a handler for `logger`.
    pub fn new(logger: impl Into<Arc<Logger>>) -> Self {
        Self {
            logger: logger.into(),
            group_prefix: String::new(),
            attrs: Arc::from([]),
            options: HandlerOptions::default(),
        }
    }

    /// Create a handler for a snapshot of the default logger.
    pub fn from_default() -> Self {
        Self::new(default_logger())
    }

    /// Set the handler options.
    pub fn with_options(mut self, options: HandlerOptions) -> Self {
        self.options = options;
        self
    }

    /// The logger records are routed through.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The group prefix prepended to attribute keys, such as `http.`.
    pub fn group_prefix(&self) -> &str {
        &self.group_prefix
    }

    fn insert_attr(&self, metadata: &mut Metadata, prefix: &str, attr: &Attr) {
        let attr = match &self.options.replace_attr {
            Some(replace) => match replace(prefix, attr.clone()) {
                Some(attr) => Cow::Owned(attr),
                None => return,
            },
            None => Cow::Borrowed(attr),
        };
        metadata.insert(format!("{prefix}{}", attr.key), attr.value.render());
    }
}

impl Handler for LoggerHandler {
    fn enabled(&self, _: &Context, level: HandlerLevel) -> bool {
        self.options.level.is_none_or(|min| level >= min)
            && self.logger.enabled(level.to_level())
    }

    fn handle(&self, cx: &Context, record: &HandlerRecord) -> Result<(), Error> {
        cx.check()?;

        let level = record.level().to_level();
        let mut metadata = Metadata::new();
        if self.logger.stamps(level) {
            metadata.insert(TIMESTAMP_KEY.to_string(), rfc3339_now());
        }
        if let Some(label) = level.label() {
            metadata.insert(LABEL_KEY.to_string(), label.to_string());
        }
        for bound in self.attrs.iter() {
            self.insert_attr(&mut metadata, &bound.prefix, &bound.attr);
        }
        for attr in record.attrs() {
            self.insert_attr(&mut metadata, &self.group_prefix, attr);
        }

        self.logger.dispatch(level, record.message(), &metadata);
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        let bound = self.attrs.iter().cloned().chain(attrs.into_iter().map(|attr| BoundAttr {
            prefix: self.group_prefix.clone(),
            attr,
        }));

        Self {
            attrs: bound.collect(),
            ..self.clone()
        }
    }

    fn with_group(&self, name: &str) -> Self {
        Self {
            group_prefix: format!("{}{name}.", self.group_prefix),
            ..self.clone()
        }
    }
}
