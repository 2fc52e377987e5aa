//! The non-scenario "universal" properties from spec.md §8: escape
//! safety, ANSI injection safety, balanced HTML, and error recovery not
//! losing valid lines.

mod common;

use agent_stream_core::{Event, FormatOptions, OutputFormat, StreamOptions};

#[test]
fn html_escape_safety_never_leaks_dangerous_elements() {
    let dangerous = [
        "<script>x</script>",
        "<iframe src=x></iframe>",
        "<object data=x></object>",
        "<embed src=x>",
        "<style>x</style>",
        "<svg onload=x>",
    ];
    for payload in dangerous {
        let input = format!(
            "{{\"type\":\"message\",\"role\":\"user\",\"content\":{}}}\n",
            serde_json::to_string(payload).unwrap()
        );
        let out = common::render(
            &input,
            StreamOptions::default(),
            FormatOptions::new(OutputFormat::Html),
        );
        for tag in ["<script", "<iframe", "<object", "<embed", "<style", "<svg "] {
            assert!(!out.contains(tag), "payload {payload:?} leaked {tag:?} into {out:?}");
        }
    }
}

#[test]
fn ansi_injection_safety_strips_raw_esc_bytes() {
    let input = "{\"type\":\"message\",\"role\":\"user\",\"content\":\"before\\u001b[31mafter\"}\n";
    let out = common::render(
        input,
        StreamOptions::default(),
        FormatOptions::new(OutputFormat::Ansi),
    );
    assert!(!out.contains('\x1b'));
    assert!(out.contains("\\x1b[31m"));
}

#[test]
fn balanced_html_for_a_well_formed_tool_lifecycle() {
    let input = concat!(
        "{\"type\":\"tool_use\",\"id\":\"t1\",\"name\":\"bash\",\"input\":{\"command\":\"ls\"}}\n",
        "{\"type\":\"tool_result\",\"tool_use_id\":\"t1\",\"content\":\"stdout\",\"output\":\"ok\"}\n",
    );
    let out = common::render(
        input,
        StreamOptions::default(),
        FormatOptions::new(OutputFormat::Html),
    );
    assert_eq!(out.matches("<div").count(), out.matches("</div>").count());
}

#[test]
fn error_recovery_preserves_every_valid_line() {
    let mut input = String::new();
    let mut valid_count = 0;
    for i in 0..20 {
        if i % 3 == 0 {
            input.push_str("not json\n");
        } else {
            input.push_str(&format!(
                "{{\"type\":\"message\",\"role\":\"user\",\"content\":\"m{i}\"}}\n"
            ));
            valid_count += 1;
        }
    }
    let opts = StreamOptions {
        max_consecutive_errors: 1000,
        continue_on_error: true,
        ..StreamOptions::default()
    };
    let events = common::collect_events(&input, opts);
    let message_count = events.iter().filter(|e| matches!(e, Event::Message { .. })).count();
    assert_eq!(message_count, valid_count);
}

#[test]
fn suppressed_kinds_render_nothing_across_all_three_formats() {
    let input = "{\"type\":\"usage\",\"input_tokens\":1000,\"output_tokens\":1000}\n";
    for format in [OutputFormat::Ansi, OutputFormat::Html, OutputFormat::Json] {
        let mut opts = FormatOptions::new(format);
        opts.hide_cost = true;
        let out = common::render(input, StreamOptions::default(), opts);
        assert!(out.is_empty(), "format {format:?} leaked a hidden cost event: {out:?}");
    }
}
