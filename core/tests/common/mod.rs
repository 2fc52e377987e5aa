use agent_stream_core::{default_registry, Event, FormatEngine, FormatOptions, ParserRegistry, StreamEngine, StreamOptions};
use std::io::Cursor;

pub fn registry() -> ParserRegistry {
    default_registry()
}

pub fn collect_events(input: &str, opts: StreamOptions) -> Vec<Event> {
    collect_events_with(&registry(), input, opts)
}

pub fn collect_events_with(registry: &ParserRegistry, input: &str, opts: StreamOptions) -> Vec<Event> {
    let mut engine = StreamEngine::new(Cursor::new(input.to_string()), registry, opts).expect("engine construction");
    let mut out = Vec::new();
    while let Some(event) = engine.next_event().expect("stream should not fail in this fixture") {
        out.push(event);
    }
    out
}

pub fn render(input: &str, stream_opts: StreamOptions, format_opts: FormatOptions) -> String {
    let registry = registry();
    let mut engine = FormatEngine::new(Cursor::new(input.to_string()), &registry, stream_opts, format_opts)
        .expect("engine construction");
    engine.collect_string().expect("render should not fail in this fixture")
}
