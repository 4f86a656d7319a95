/// Structural extraction of embedded entry references.
///
/// Entry bodies are arbitrary JSON. Linked entries show up inside them as
/// objects carrying `uid` and `_content_type_uid`, at any nesting level:
/// reference fields, modular blocks, JSON rich text, groups.
mod embedded;

pub use embedded::{as_entry_ref, extract_references, CONTENT_TYPE_KEY, UID_KEY};
