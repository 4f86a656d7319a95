use serde_json::{Map, Value};

use crate::types::{EntryRef, Reference};

/// Key holding the referenced entry's uid inside a reference object.
pub const UID_KEY: &str = "uid";

/// Key holding the referenced entry's content type inside a reference object.
pub const CONTENT_TYPE_KEY: &str = "_content_type_uid";

/// Returns the entry a mapping points to, if the mapping is reference-shaped.
///
/// A mapping is reference-shaped when it carries both `uid` and
/// `_content_type_uid` as strings. Any other value under those keys leaves
/// the mapping an ordinary object.
pub fn as_entry_ref(map: &Map<String, Value>) -> Option<EntryRef> {
    let uid = map.get(UID_KEY)?.as_str()?;
    let content_type = map.get(CONTENT_TYPE_KEY)?.as_str()?;
    Some(EntryRef::new(uid, content_type))
}

/// Collects every reference-shaped object inside `value`.
///
/// The walk is depth-first in document order. A reference-shaped object is
/// reported before anything nested inside it. Every reference gets the same
/// `depth`; nesting within the body does not change it.
pub fn extract_references(value: &Value, depth: i32, locale: &str) -> Vec<Reference> {
    let mut refs = Vec::new();
    collect(value, depth, locale, &mut refs);
    refs
}

fn collect(value: &Value, depth: i32, locale: &str, out: &mut Vec<Reference>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, depth, locale, out);
            }
        }
        Value::Object(map) => {
            if let Some(entry) = as_entry_ref(map) {
                out.push(entry.at_depth(depth, locale));
            }
            for nested in map.values() {
                collect(nested, depth, locale, out);
            }
        }
        _ => {}
    }
}
