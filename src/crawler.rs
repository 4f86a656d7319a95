use std::time::{Duration, Instant};

use crate::config::CrawlConfig;
use crate::errors::Result;
use crate::graph::{dedupe_references, ReferenceTraverser};
use crate::source::ReferenceSource;
use crate::types::*;

/// Runs a full crawl around one root entry.
///
/// The upward traversal runs first, then the downward one; their results are
/// concatenated and deduplicated. Any failure aborts the whole crawl and no
/// partial result is returned.
pub struct ReferenceCrawler<'a> {
    source: &'a dyn ReferenceSource,
    root: EntryRef,
    locale: String,
}

impl<'a> ReferenceCrawler<'a> {
    pub fn new(source: &'a dyn ReferenceSource, root: EntryRef, locale: impl Into<String>) -> Self {
        Self {
            source,
            root,
            locale: locale.into(),
        }
    }

    /// Builds a crawler for the root entry and locale named in `config`.
    ///
    /// Fails with a config error if the root is not fully specified.
    pub fn from_config(source: &'a dyn ReferenceSource, config: &CrawlConfig) -> Result<Self> {
        config.validate_root()?;
        Ok(Self::new(source, config.root(), config.locale.clone()))
    }

    pub fn root(&self) -> &EntryRef {
        &self.root
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Crawls both directions and returns the merged report.
    pub fn crawl(&self) -> Result<CrawlReport> {
        let start = Instant::now();
        let traverser = ReferenceTraverser::new(self.source, &self.locale);

        tracing::info!(
            entry_uid = %self.root.entry_uid,
            content_type_uid = %self.root.content_type_uid,
            locale = %self.locale,
            "crawling references"
        );

        let upward = traverser.resolve_upward(&self.root)?;
        tracing::info!(count = upward.len(), "upward traversal complete");

        let downward = traverser.resolve_downward(&self.root)?;
        tracing::info!(count = downward.len(), "downward traversal complete");

        let upward_count = upward.len();
        let downward_count = downward.len();
        let references = dedupe_references(upward.into_iter().chain(downward));

        tracing::info!(unique = references.len(), "crawl complete");

        Ok(CrawlReport {
            root: self.root.clone(),
            locale: self.locale.clone(),
            references,
            upward_count,
            downward_count,
            duration_ms: elapsed_ms(start.elapsed()),
        })
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
