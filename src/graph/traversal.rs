use std::collections::HashSet;

use crate::errors::Result;
use crate::extraction::extract_references;
use crate::source::ReferenceSource;
use crate::types::*;

/// State owned by a single traversal invocation.
///
/// Each call to `resolve` builds a fresh context, so the upward and downward
/// traversals never share a visited set.
struct TraversalContext<'r> {
    direction: Direction,
    root_uid: &'r str,
    visited: HashSet<String>,
}

impl<'r> TraversalContext<'r> {
    fn new(direction: Direction, root_uid: &'r str) -> Self {
        Self {
            direction,
            root_uid,
            visited: HashSet::new(),
        }
    }
}

/// Walks the reference graph around a root entry, one direction at a time.
///
/// Traversal is depth-first and strictly sequential: each entry's direct
/// references are emitted as one batch, then each of them is expanded in turn,
/// its whole subtree finished before the next sibling starts. For a fixed
/// graph the output order is deterministic.
pub struct ReferenceTraverser<'a> {
    source: &'a dyn ReferenceSource,
    locale: &'a str,
}

impl<'a> ReferenceTraverser<'a> {
    /// Creates a traverser reading from `source` under `locale`.
    pub fn new(source: &'a dyn ReferenceSource, locale: &'a str) -> Self {
        Self { source, locale }
    }

    /// Collects every entry that transitively references `root`.
    ///
    /// Direct referrers get depth 1, their referrers depth 2, and so on.
    pub fn resolve_upward(&self, root: &EntryRef) -> Result<Vec<Reference>> {
        self.resolve(root, Direction::Upward)
    }

    /// Collects every entry transitively embedded in `root`'s body.
    ///
    /// Entries embedded in the root get depth -1, entries embedded in those
    /// depth -2, and so on.
    pub fn resolve_downward(&self, root: &EntryRef) -> Result<Vec<Reference>> {
        self.resolve(root, Direction::Downward)
    }

    /// Collects references reachable from `root` in `direction`, in pre-order.
    ///
    /// Every entry is fetched at most once, so cyclic graphs terminate. An entry
    /// already visited can still show up again as a reference (at the depth of
    /// that later sighting); the root itself never does. The first failed fetch
    /// aborts the traversal.
    pub fn resolve(&self, root: &EntryRef, direction: Direction) -> Result<Vec<Reference>> {
        let mut ctx = TraversalContext::new(direction, &root.entry_uid);
        let mut out = Vec::new();
        self.visit(
            &root.entry_uid,
            &root.content_type_uid,
            direction.first_depth(),
            &mut ctx,
            &mut out,
        )?;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Expands one entry: fetches its direct references at `depth`, appends
    /// them, then recurses into each at the next depth.
    fn visit(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        depth: i32,
        ctx: &mut TraversalContext<'_>,
        out: &mut Vec<Reference>,
    ) -> Result<()> {
        if !ctx.visited.insert(entry_uid.to_string()) {
            return Ok(());
        }

        let batch: Vec<Reference> = self
            .direct_references(entry_uid, content_type_uid, depth, ctx.direction)?
            .into_iter()
            .filter(|r| r.entry_uid != ctx.root_uid)
            .collect();

        tracing::debug!(
            direction = ctx.direction.as_str(),
            entry_uid,
            depth,
            found = batch.len(),
            "visited entry"
        );

        out.extend(batch.iter().cloned());

        let next_depth = ctx.direction.next_depth(depth);
        for reference in &batch {
            self.visit(
                &reference.entry_uid,
                &reference.content_type_uid,
                next_depth,
                ctx,
                out,
            )?;
        }

        Ok(())
    }

    /// Fetches the references one hop away from an entry, tagged with `depth`.
    fn direct_references(
        &self,
        entry_uid: &str,
        content_type_uid: &str,
        depth: i32,
        direction: Direction,
    ) -> Result<Vec<Reference>> {
        match direction {
            Direction::Upward => Ok(self
                .source
                .upward_references(entry_uid, content_type_uid, self.locale)?
                .into_iter()
                .map(|entry| entry.at_depth(depth, self.locale))
                .collect()),
            Direction::Downward => {
                match self
                    .source
                    .entry_body(entry_uid, content_type_uid, self.locale)?
                {
                    Some(body) => Ok(extract_references(&body, depth, self.locale)),
                    None => Ok(Vec::new()),
                }
            }
        }
    }
}
