//! Example showing the functions exported to host applications
//!
//! This demonstrates the cross-platform interface that would be used
//! from Swift, Kotlin, Python, etc.

use chatterbox::ffi::{
    FfiError, default_settings_json, parse_chatterbox_source, render_chatterbox_html,
    validate_config_yaml,
};

fn main() {
    println!("=== Chatterbox FFI Example ===\n");

    match parse_chatterbox_source("alice > hi\nbob < hello\n...") {
        Ok(parsed) => println!("✓ Parsed {} entries", parsed.entries.len()),
        Err(e) => eprintln!("Error parsing: {e}"),
    }

    match parse_chatterbox_source("---\nmode: [broken\n---\nalice > hi") {
        Ok(_) => println!("✗ Broken header was accepted"),
        Err(FfiError::InvalidConfig { messages }) => {
            println!("✓ Broken header rejected:");
            for message in messages {
                println!("  └─ {message}");
            }
        }
        Err(e) => eprintln!("Unexpected error: {e}"),
    }

    match validate_config_yaml("mode: simple\nautoColorAuthors: nope") {
        Ok(config) => println!("✓ Defaults validated: {config:?}"),
        Err(e) => eprintln!("Error validating: {e}"),
    }

    let settings = default_settings_json().unwrap_or_default();
    println!("✓ Default settings JSON:\n{settings}");

    println!("\n✓ Rendered HTML:");
    println!("{}", render_chatterbox_html("alice >@ **hi**", &settings));
}
