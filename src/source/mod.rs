//! Where reference data comes from.
//!
//! The traversals only need two questions answered about an entry: who
//! references it, and what its body looks like. `ReferenceSource` is that
//! contract.
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `ContentstackSource` | `contentstack` | Contentstack Content Management API over HTTPS |
//! | `MemorySource` | `memory` | In-memory graph, loadable from a JSON fixture |

pub mod contentstack;
pub mod memory;

use serde_json::Value;

use crate::errors::Result;
use crate::types::EntryRef;

pub use contentstack::ContentstackSource;
pub use memory::MemorySource;

/// Retrieves reference data for entries.
///
/// Every call blocks until the data arrives or the retrieval fails. A failed
/// retrieval is reported as `RefCrawlError::Fetch`.
pub trait ReferenceSource {
    /// Entries that reference the given entry directly.
    ///
    /// A successful response without a reference list yields an empty list.
    fn upward_references(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        locale: &str,
    ) -> Result<Vec<EntryRef>>;

    /// The decoded body of the given entry, or `None` if it has none.
    fn entry_body(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        locale: &str,
    ) -> Result<Option<Value>>;
}
