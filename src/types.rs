use serde::{Deserialize, Serialize};

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en-us";

/// Direction of a reference traversal relative to the root entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follows "referenced-by" edges; depths are positive.
    Upward,
    /// Follows edges embedded in entry bodies; depths are negative.
    Downward,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Upward => "upward",
            Direction::Downward => "downward",
        }
    }

    /// Depth assigned to the root's direct neighbours in this direction.
    pub fn first_depth(&self) -> i32 {
        match self {
            Direction::Upward => 1,
            Direction::Downward => -1,
        }
    }

    /// Depth one hop further away from the root than `depth`.
    pub fn next_depth(&self, depth: i32) -> i32 {
        match self {
            Direction::Upward => depth + 1,
            Direction::Downward => depth - 1,
        }
    }

    /// Direction encoded by the sign of a depth, `None` for zero.
    pub fn of_depth(depth: i32) -> Option<Self> {
        match depth.signum() {
            1 => Some(Direction::Upward),
            -1 => Some(Direction::Downward),
            _ => None,
        }
    }
}

/// An entry identified by uid and content type, without traversal metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryRef {
    pub entry_uid: String,
    pub content_type_uid: String,
}

impl EntryRef {
    pub fn new(entry_uid: impl Into<String>, content_type_uid: impl Into<String>) -> Self {
        Self {
            entry_uid: entry_uid.into(),
            content_type_uid: content_type_uid.into(),
        }
    }

    /// Attaches a depth and locale, producing a `Reference`.
    pub fn at_depth(self, depth: i32, locale: &str) -> Reference {
        Reference {
            entry_uid: self.entry_uid,
            content_type_uid: self.content_type_uid,
            depth,
            locale: locale.to_string(),
        }
    }
}

/// An entry discovered while crawling, tagged with its signed hop count from
/// the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub entry_uid: String,
    pub content_type_uid: String,
    pub depth: i32,
    pub locale: String,
}

impl Reference {
    pub fn new(
        entry_uid: impl Into<String>,
        content_type_uid: impl Into<String>,
        depth: i32,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            entry_uid: entry_uid.into(),
            content_type_uid: content_type_uid.into(),
            depth,
            locale: locale.into(),
        }
    }

    /// Number of hops between this entry and the root.
    pub fn distance(&self) -> u32 {
        self.depth.unsigned_abs()
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::of_depth(self.depth)
    }
}

/// Outcome of a full crawl around one root entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub root: EntryRef,
    pub locale: String,
    /// Deduplicated references, in order of first sighting.
    pub references: Vec<Reference>,
    /// Raw (pre-dedup) reference count found by the upward traversal.
    pub upward_count: usize,
    /// Raw (pre-dedup) reference count found by the downward traversal.
    pub downward_count: usize,
    pub duration_ms: u64,
}

impl CrawlReport {
    /// References that were kept from the upward traversal.
    pub fn upward(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|r| r.direction() == Some(Direction::Upward))
    }

    /// References that were kept from the downward traversal.
    pub fn downward(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|r| r.direction() == Some(Direction::Downward))
    }
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(OutputFormat::Json),
            "text" | "table" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}
