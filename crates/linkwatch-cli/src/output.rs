//! Human-readable rendering of watch events.

use chrono::SecondsFormat;
use linkwatch::WatchEvent;

/// Render one event as a single line, optionally followed by the content.
pub fn render(event: &WatchEvent, with_content: bool) -> String {
    let mut line = format!(
        "{} {} {}",
        event.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
        event.kind(),
        event.source().display()
    );
    match event {
        WatchEvent::Changed { data, .. } => {
            line.push_str(&format!(" ({} bytes)", data.len()));
            if with_content {
                line.push('\n');
                line.push_str(&String::from_utf8_lossy(data));
            }
        }
        WatchEvent::Error { error, .. } => line.push_str(&format!(": {}", error)),
        WatchEvent::Removed { .. } => {}
    }
    line
}
