/// Upward and downward traversal of the reference graph.
pub mod traversal;

/// Merging of references discovered along several paths.
pub mod dedup;

pub use dedup::dedupe_references;
pub use traversal::ReferenceTraverser;
