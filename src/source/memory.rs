//! In-memory reference source.
//!
//! Holds a whole graph in memory, which makes crawls reproducible without a
//! network. Graphs are built programmatically or loaded from a JSON fixture:
//!
//! ```json
//! {
//!   "entries": {
//!     "blt_home": {
//!       "content_type_uid": "page",
//!       "referenced_by": [{ "entry_uid": "blt_nav", "content_type_uid": "menu" }],
//!       "body": { "hero": [{ "uid": "blt_banner", "_content_type_uid": "banner" }] }
//!     }
//!   }
//! }
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{RefCrawlError, Result};
use crate::source::ReferenceSource;
use crate::types::EntryRef;

#[derive(Debug, Clone, Default, Deserialize)]
struct MemoryEntry {
    #[serde(default)]
    content_type_uid: String,
    #[serde(default)]
    referenced_by: Vec<EntryRef>,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    entries: HashMap<String, MemoryEntry>,
}

/// Reference source answering from an in-memory graph.
///
/// Upward edges are the `referenced_by` lists; downward edges are whatever
/// the stored bodies embed. Unknown entries have no referrers and no body.
/// Fetches are counted per entry so callers can check visitation.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: HashMap<String, MemoryEntry>,
    failing: HashSet<String>,
    upward_fetches: RefCell<HashMap<String, usize>>,
    body_fetches: RefCell<HashMap<String, usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON fixture document.
    pub fn from_fixture_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self {
            entries: fixture.entries,
            ..Self::default()
        })
    }

    /// Loads a JSON fixture file.
    pub fn load_fixture(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| RefCrawlError::Fixture {
            message: format!("failed to read fixture: {}", e),
            path: path.display().to_string(),
        })?;
        Self::from_fixture_json(&contents).map_err(|e| RefCrawlError::Fixture {
            message: format!("failed to parse fixture: {}", e),
            path: path.display().to_string(),
        })
    }

    /// Inserts or replaces an entry's content type and body.
    ///
    /// Referrers already recorded for the entry are kept.
    pub fn add_entry(&mut self, entry_uid: &str, content_type_uid: &str, body: Option<Value>) {
        let entry = self.entries.entry(entry_uid.to_string()).or_default();
        entry.content_type_uid = content_type_uid.to_string();
        entry.body = body;
    }

    /// Records that `from` references `to`, appending `from` to the upward
    /// list of `to`. Bodies are not touched.
    pub fn add_reference(&mut self, from: &EntryRef, to: &EntryRef) {
        let entry = self
            .entries
            .entry(to.entry_uid.clone())
            .or_insert_with(|| MemoryEntry {
                content_type_uid: to.content_type_uid.clone(),
                ..MemoryEntry::default()
            });
        entry.referenced_by.push(from.clone());
    }

    /// Makes every fetch of `entry_uid` fail.
    pub fn fail_on(&mut self, entry_uid: &str) {
        self.failing.insert(entry_uid.to_string());
    }

    /// Number of upward-reference fetches issued for `entry_uid`.
    pub fn upward_fetches(&self, entry_uid: &str) -> usize {
        self.upward_fetches
            .borrow()
            .get(entry_uid)
            .copied()
            .unwrap_or(0)
    }

    /// Number of body fetches issued for `entry_uid`.
    pub fn body_fetches(&self, entry_uid: &str) -> usize {
        self.body_fetches.borrow().get(entry_uid).copied().unwrap_or(0)
    }

    /// Content type recorded for `entry_uid`, if the entry is known.
    pub fn content_type_of(&self, entry_uid: &str) -> Option<&str> {
        self.entries
            .get(entry_uid)
            .map(|entry| entry.content_type_uid.as_str())
    }

    fn record(counter: &RefCell<HashMap<String, usize>>, entry_uid: &str) {
        *counter
            .borrow_mut()
            .entry(entry_uid.to_string())
            .or_insert(0) += 1;
    }

    fn check_failure(&self, entry_uid: &str, endpoint: String) -> Result<()> {
        if self.failing.contains(entry_uid) {
            return Err(RefCrawlError::Fetch {
                message: format!("injected failure for entry '{}'", entry_uid),
                endpoint,
            });
        }
        Ok(())
    }
}

impl ReferenceSource for MemorySource {
    fn upward_references(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        locale: &str,
    ) -> Result<Vec<EntryRef>> {
        Self::record(&self.upward_fetches, entry_uid);
        self.check_failure(
            entry_uid,
            format!(
                "memory://{}/{}/references?locale={}",
                content_type_uid, entry_uid, locale
            ),
        )?;
        Ok(self
            .entries
            .get(entry_uid)
            .map(|entry| entry.referenced_by.clone())
            .unwrap_or_default())
    }

    fn entry_body(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        locale: &str,
    ) -> Result<Option<Value>> {
        Self::record(&self.body_fetches, entry_uid);
        self.check_failure(
            entry_uid,
            format!("memory://{}/{}?locale={}", content_type_uid, entry_uid, locale),
        )?;
        Ok(self.entries.get(entry_uid).and_then(|entry| entry.body.clone()))
    }
}
