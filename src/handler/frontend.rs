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


use crate::Error;
use crate::handler::Attr;
use crate::handler::Context;
use crate::handler::Handler;
use crate::handler::HandlerLevel;
use crate::handler::HandlerRecord;

/// A structured-logging front-end over a [`Handler`].
///
/// The leveled shortcuts use a background context and discard handler errors. Use
/// [`log`](StructuredLogger::log) to pass a context and observe errors.
#[derive(Debug, Clone)]
pub struct StructuredLogger<H> {
    handler: H,
}

impl<H: Handler> StructuredLogger<H> {
    /// Create a front-end over `handler`.
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// The underlying handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// A front-end whose records all carry `attrs`.
    pub fn with(&self, attrs: Vec<Attr>) -> Self {
        Self::new(self.handler.with_attrs(attrs))
    }

    /// A front-end whose later attribute keys are qualified with `name`.
    pub fn with_group(&self, name: &str) -> Self {
        Self::new(self.handler.with_group(name))
    }

    /// Log a record at `level`, unless the handler is not enabled for it.
    pub fn log(
        &self,
        cx: &Context,
        level: HandlerLevel,
        message: &str,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<(), Error> {
        if !self.handler.enabled(cx, level) {
            return Ok(());
        }
        let record = HandlerRecord::new(level, message).with_attrs(attrs);
        self.handler.handle(cx, &record)
    }

    /// Log at [`HandlerLevel::DEBUG`].
    pub fn debug(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        let _ = self.log(&Context::background(), HandlerLevel::DEBUG, message, attrs);
    }

    /// Log at [`HandlerLevel::INFO`].
    pub fn info(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        let _ = self.log(&Context::background(), HandlerLevel::INFO, message, attrs);
    }

    /// Log at [`HandlerLevel::WARN`].
    pub fn warn(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        let _ = self.log(&Context::background(), HandlerLevel::WARN, message, attrs);
    }

    /// Log at [`HandlerLevel::ERROR`].
    pub fn error(&self, message: &str, attrs: impl IntoIterator<Item = Attr>) {
        let _ = self.log(&Context::background(), HandlerLevel::ERROR, message, attrs);
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::Level;
    use crate::Logger;
    use crate::format::ConsoleFormatter;
    use crate::handler::LoggerHandler;
    use crate::writer::MemoryWriter;

    fn structured(max_level: Level) -> (StructuredLogger<LoggerHandler>, MemoryWriter) {
        let writer = MemoryWriter::default();
        let logger = Logger::builder()
            .max_level(max_level)
            .formatter(ConsoleFormatter::default().no_color())
            .writer(writer.clone())
            .build();
        (StructuredLogger::new(LoggerHandler::new(logger)), writer)
    }

    #[test]
    fn test_shortcuts() {
        let (log, writer) = structured(Level::Info);

        log.debug("hidden", []);
        log.info("started", [Attr::new("port", 8080)]);
        log.warn("slow", [Attr::new("elapsed", std::time::Duration::from_secs(2))]);
        log.error("failed", [Attr::new("retry", false)]);

        assert_eq!(
            writer.lines(),
            vec![
                "[INF] started port=8080",
                "[WRN] slow elapsed=2s",
                "[ERR] failed retry=false",
            ]
        );
    }

    #[test]
    fn test_disabled_level_skips_cancelled_check() {
        let (log, writer) = structured(Level::Info);
        let token = CancellationToken::new();
        token.cancel();
        let cx = Context::with_cancellation(token);

        assert!(log.log(&cx, HandlerLevel::DEBUG, "hidden", []).is_ok());
        assert!(log.log(&cx, HandlerLevel::INFO, "shown", []).unwrap_err().is_cancelled());
        assert!(writer.is_empty());
    }
}
