//! Demonstration of the Chatterbox pipeline
//!
//! This example shows how to:
//! 1. Parse a transcript with a frontmatter header
//! 2. Inspect the parsed entries
//! 3. Render the transcript to HTML with plugin-wide defaults

use chatterbox::managers::AuthorOrder;
use chatterbox::{CommonMarkRenderer, Entry, Settings, parse_chatterbox, render_chatterbox};

fn main() {
    println!("=== Chatterbox Transcript Demo ===\n");

    let source = r"---
mode: bubble
maxMessageWidth: 60%
authors:
  john:
    fullName: John Smith
    bgColor: '#dbeafe'
---
#() Monday, 9:14
john|9:14 > Morning! Did the build pass?
jane!@ <<< It did, *finally*.
Two flaky tests left:
- `parser::crlf`
- `render::fixes`
<<<
...
# an hour later
john >@ **Great**, shipping it.";

    println!("Input:\n{source}\n");
    println!("---\n");

    let parsed = match parse_chatterbox(source) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("Error parsing: {err}");
            return;
        }
    };

    println!("Config: {:?}\n", parsed.config);
    println!("Parsed {} entries:\n", parsed.entry_count());

    let order = AuthorOrder::from_entries(&parsed.entries);
    for (i, entry) in parsed.entries.iter().enumerate() {
        match entry {
            Entry::Message { message } => println!(
                "  Entry {i}: message from {:?} (order {}) {:?}, rich: {}",
                message.author,
                order.index_of(&message.author).unwrap_or_default(),
                message.direction,
                message.render_rich
            ),
            other => println!("  Entry {i}: {} {:?}", other.kind_name(), other.content()),
        }
    }

    let settings = Settings {
        default_config: "mode: simple\nmaxCapsuleWidth: 20em".to_string(),
        ..Settings::default()
    };

    println!("\nRendered HTML:\n");
    println!(
        "{}",
        render_chatterbox(source, &settings, &CommonMarkRenderer::new())
    );
}
