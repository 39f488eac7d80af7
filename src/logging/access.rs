//! Human-readable rendering of access-log events for text mode.

use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{self, Format, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Target used by the access-log middleware.
pub const ACCESS_TARGET: &str = "access";

/// Text formatter: access events become one request line, everything else
/// uses the standard `tracing-subscriber` layout.
pub struct TextFormat {
    inner: Format,
}

impl TextFormat {
    pub fn new(with_target: bool) -> Self {
        Self {
            inner: format::format().with_target(with_target),
        }
    }
}

impl<S, N> FormatEvent<S, N> for TextFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if event.metadata().target() != ACCESS_TARGET {
            return self.inner.format_event(ctx, writer, event);
        }

        let mut line = AccessLine::default();
        event.record(&mut line);

        write!(
            writer,
            "{} {:>5} {} \"{} {}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
            event.metadata().level(),
            line.request_id.as_deref().unwrap_or("-"),
            line.method.as_deref().unwrap_or("-"),
            line.path.as_deref().unwrap_or("-"),
        )?;
        if let Some(query) = line.query.as_deref().filter(|q| !q.is_empty()) {
            write!(writer, "?{}", query)?;
        }
        write!(writer, "\" {}", line.status.as_deref().unwrap_or("-"))?;
        if let Some(duration) = line.duration_ms.as_deref() {
            write!(writer, " {}ms", duration)?;
        }
        writeln!(writer)
    }
}

#[derive(Debug, Default)]
struct AccessLine {
    request_id: Option<String>,
    method: Option<String>,
    path: Option<String>,
    query: Option<String>,
    status: Option<String>,
    duration_ms: Option<String>,
}

impl AccessLine {
    fn slot(&mut self, field: &Field) -> Option<&mut Option<String>> {
        match field.name() {
            "request_id" => Some(&mut self.request_id),
            "method" => Some(&mut self.method),
            "path" => Some(&mut self.path),
            "query" => Some(&mut self.query),
            "status" => Some(&mut self.status),
            "duration_ms" => Some(&mut self.duration_ms),
            _ => None,
        }
    }
}

impl Visit for AccessLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if let Some(slot) = self.slot(field) {
            *slot = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if let Some(slot) = self.slot(field) {
            *slot = Some(format!("{:?}", value));
        }
    }
}
