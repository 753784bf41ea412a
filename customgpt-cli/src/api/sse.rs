//! Minimal text/event-stream decoder for streamed message responses

/// One server-sent event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
}

/// Split an event-stream body into events.
///
/// `data:` lines of one event are joined with `\n`; comment lines (`:`) and
/// unknown fields are skipped; events without data are dropped.
pub fn parse_events(body: &str) -> Vec<SseEvent> {
    let mut events = Vec::new();
    let mut event: Option<String> = None;
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.is_empty() {
            flush(&mut events, &mut event, &mut data);
            continue;
        }
        if line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }
    flush(&mut events, &mut event, &mut data);

    events
}

fn flush(events: &mut Vec<SseEvent>, event: &mut Option<String>, data: &mut Vec<&str>) {
    if !data.is_empty() {
        events.push(SseEvent {
            event: event.take(),
            data: data.join("\n"),
        });
    }
    *event = None;
    data.clear();
}
