//! Per-transcript indexes built from the parsed entries before rendering

pub mod authors;

pub use authors::{AUTO_COLOR_COUNT, AuthorOrder, AutoAuthorColors};
