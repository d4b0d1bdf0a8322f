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


//! Route records of the [`log`] crate through a [`LoggerHandler`].

use log::kv::Key;
use log::kv::VisitSource;

use crate::handler::Attr;
use crate::handler::Context;
use crate::handler::Handler;
use crate::handler::HandlerLevel;
use crate::handler::HandlerRecord;
use crate::handler::LoggerHandler;
use crate::handler::Value;

fn handler_level(level: log::Level) -> HandlerLevel {
    match level {
        log::Level::Error => HandlerLevel::ERROR,
        log::Level::Warn => HandlerLevel::WARN,
        log::Level::Info => HandlerLevel::INFO,
        log::Level::Debug => HandlerLevel::DEBUG,
        log::Level::Trace => HandlerLevel::TRACE,
    }
}

struct AttrCollector(Vec<Attr>);

impl<'kvs> VisitSource<'kvs> for AttrCollector {
    fn visit_pair(
        &mut self,
        key: Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        let value = if let Some(n) = value.to_i64() {
            Value::Int64(n)
        } else if let Some(n) = value.to_u64() {
            Value::Uint64(n)
        } else if let Some(f) = value.to_f64() {
            Value::Float64(f)
        } else if let Some(b) = value.to_bool() {
            Value::Bool(b)
        } else if let Some(s) = value.to_borrowed_str() {
            Value::String(s.to_string())
        } else {
            Value::String(value.to_string())
        };
        self.0.push(Attr::new(key.as_str(), value));
        Ok(())
    }
}

impl log::Log for LoggerHandler {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Handler::enabled(self, &Context::background(), handler_level(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let level = handler_level(record.level());
        let cx = Context::background();
        if !Handler::enabled(self, &cx, level) {
            return;
        }

        let mut visitor = AttrCollector(Vec::new());
        // a failing source still yields the pairs visited so far
        let _ = record.key_values().visit(&mut visitor);

        let record = HandlerRecord::new(level, record.args().to_string()).with_attrs(visitor.0);
        // a background context is never cancelled
        let _ = self.handle(&cx, &record);
    }

    fn flush(&self) {
        if let Err(err) = self.logger().flush() {
            self.logger().trap(&err);
        }
    }
}

/// Install `handler` as the global logger of the [`log`] crate.
///
/// The global maximum level of the `log` crate is set to `Trace`, so filtering is left to the
/// handler and its logger.
///
/// # Errors
///
/// Return an error if the `log` crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use logbook::handler::LoggerHandler;
///
/// let _ = logbook::bridge::try_setup_log_crate(LoggerHandler::from_default());
/// log::info!(user = "alice"; "login");
/// ```
pub fn try_setup_log_crate(handler: LoggerHandler) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(handler))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Install `handler` as the global logger of the [`log`] crate.
///
/// # Panics
///
/// Panic if the `log` crate global logger has already been set.
pub fn setup_log_crate(handler: LoggerHandler) {
    try_setup_log_crate(handler).expect(
        "logbook::bridge::setup_log_crate must be called before the log crate global logger is initialized",
    )
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;
    use crate::Level;
    use crate::Logger;
    use crate::format::ConsoleFormatter;
    use crate::writer::MemoryWriter;

    fn handler(max_level: Level) -> (LoggerHandler, MemoryWriter) {
        let writer = MemoryWriter::default();
        let logger = Logger::builder()
            .max_level(max_level)
            .formatter(ConsoleFormatter::default().no_color())
            .writer(writer.clone())
            .build();
        (LoggerHandler::new(logger), writer)
    }

    #[test]
    fn test_levels() {
        let (handler, writer) = handler(Level::Verbose);
        for level in [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ] {
            handler.log(
                &log::Record::builder()
                    .level(level)
                    .args(format_args!("{level}"))
                    .build(),
            );
        }

        assert_eq!(
            writer.lines(),
            vec![
                "[ERR] ERROR",
                "[WRN] WARN",
                "[INF] INFO",
                "[DBG] DEBUG",
                "[VER] TRACE"
            ]
        );
    }

    #[test]
    fn test_key_values() {
        let (handler, writer) = handler(Level::Info);
        let kvs: &[(&str, log::kv::Value)] = &[
            ("user", log::kv::Value::from("alice")),
            ("attempts", log::kv::Value::from(3)),
            ("ok", log::kv::Value::from(true)),
        ];
        handler.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("login"))
                .key_values(&kvs)
                .build(),
        );

        assert_eq!(writer.lines(), vec!["[INF] login user=alice attempts=3 ok=true"]);
    }

    #[test]
    fn test_enabled() {
        let (handler, writer) = handler(Level::Info);
        let debug = log::Metadata::builder().level(log::Level::Debug).build();
        let warn = log::Metadata::builder().level(log::Level::Warn).build();

        assert!(!Log::enabled(&handler, &debug));
        assert!(Log::enabled(&handler, &warn));

        handler.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        assert!(writer.is_empty());
    }
}
