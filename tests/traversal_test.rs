use refcrawl::graph::traversal::ReferenceTraverser;
use refcrawl::source::MemorySource;
use refcrawl::types::*;
use serde_json::json;

/// Helper: an entry reference.
fn entry(uid: &str, content_type: &str) -> EntryRef {
    EntryRef::new(uid, content_type)
}

/// Helper: a reference-shaped object as it appears inside an entry body.
fn link(uid: &str, content_type: &str) -> serde_json::Value {
    json!({ "uid": uid, "_content_type_uid": content_type })
}

/// Helper: (uid, depth) pairs, in output order.
fn pairs(refs: &[Reference]) -> Vec<(String, i32)> {
    refs.iter().map(|r| (r.entry_uid.clone(), r.depth)).collect()
}

/// Sets up a referrer chain: R <- P1 <- G1, R <- P2.
fn setup_referrers() -> MemorySource {
    let mut source = MemorySource::new();
    let r = entry("R", "page");
    let p1 = entry("P1", "menu");
    let p2 = entry("P2", "menu");
    let g1 = entry("G1", "site");
    source.add_reference(&p1, &r);
    source.add_reference(&p2, &r);
    source.add_reference(&g1, &p1);
    source
}

// ---------------------------------------------------------------------------
// Upward traversal
// ---------------------------------------------------------------------------

#[test]
fn test_upward_depths_and_order() {
    let source = setup_referrers();
    let traverser = ReferenceTraverser::new(&source, "en-us");

    let refs = traverser.resolve_upward(&entry("R", "page")).unwrap();

    assert_eq!(
        pairs(&refs),
        vec![
            ("P1".to_string(), 1),
            ("P2".to_string(), 1),
            ("G1".to_string(), 2),
        ]
    );
    assert!(refs.iter().all(|r| r.locale == "en-us"));
    assert_eq!(refs[2].content_type_uid, "site");
}

#[test]
fn test_upward_subtree_follows_its_batch() {
    // R <- A <- A1, R <- B <- B1: A's subtree completes before B's.
    let mut source = MemorySource::new();
    let r = entry("R", "page");
    source.add_reference(&entry("A", "t"), &r);
    source.add_reference(&entry("B", "t"), &r);
    source.add_reference(&entry("A1", "t"), &entry("A", "t"));
    source.add_reference(&entry("B1", "t"), &entry("B", "t"));

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_upward(&r).unwrap();

    let uids: Vec<&str> = refs.iter().map(|r| r.entry_uid.as_str()).collect();
    assert_eq!(uids, vec!["A", "B", "A1", "B1"]);
}

#[test]
fn test_upward_cycle_through_root_terminates() {
    // R <- P <- R
    let mut source = MemorySource::new();
    let r = entry("R", "page");
    let p = entry("P", "menu");
    source.add_reference(&p, &r);
    source.add_reference(&r, &p);

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_upward(&r).unwrap();

    assert_eq!(pairs(&refs), vec![("P".to_string(), 1)]);
    assert_eq!(source.upward_fetches("P"), 1);
    assert_eq!(source.upward_fetches("R"), 1);
}

#[test]
fn test_upward_self_reference_terminates() {
    let mut source = MemorySource::new();
    let a = entry("A", "page");
    source.add_reference(&a, &a);

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_upward(&a).unwrap();

    assert!(refs.is_empty());
    assert_eq!(source.upward_fetches("A"), 1);
}

#[test]
fn test_upward_shared_referrer_fetched_once() {
    // R <- A <- S, R <- B <- S
    let mut source = MemorySource::new();
    let r = entry("R", "page");
    let s = entry("S", "site");
    source.add_reference(&entry("A", "t"), &r);
    source.add_reference(&entry("B", "t"), &r);
    source.add_reference(&s, &entry("A", "t"));
    source.add_reference(&s, &entry("B", "t"));

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_upward(&r).unwrap();

    assert_eq!(source.upward_fetches("S"), 1);
    // S is sighted through both parents, but expanded only once.
    assert_eq!(refs.iter().filter(|r| r.entry_uid == "S").count(), 2);
    assert!(refs.iter().all(|r| r.depth > 0));
}

#[test]
fn test_upward_no_referrers() {
    let source = MemorySource::new();
    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_upward(&entry("lonely", "page")).unwrap();
    assert!(refs.is_empty());
}

// ---------------------------------------------------------------------------
// Downward traversal
// ---------------------------------------------------------------------------

#[test]
fn test_downward_embedded_twice_then_recurses() {
    let mut source = MemorySource::new();
    source.add_entry(
        "R",
        "T",
        Some(json!({
            "title": "Home",
            "hero": [link("A", "TA")],
            "footer": { "promo": link("A", "TA") },
        })),
    );
    source.add_entry("A", "TA", Some(json!({ "cards": [link("C", "TC")] })));
    source.add_entry("C", "TC", Some(json!({ "title": "leaf" })));

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_downward(&entry("R", "T")).unwrap();

    assert_eq!(
        pairs(&refs),
        vec![
            ("A".to_string(), -1),
            ("A".to_string(), -1),
            ("C".to_string(), -2),
        ]
    );
    assert_eq!(source.body_fetches("A"), 1);
    assert_eq!(source.body_fetches("C"), 1);
}

#[test]
fn test_downward_single_depth_per_body() {
    let mut source = MemorySource::new();
    source.add_entry(
        "R",
        "page",
        Some(json!({
            "blocks": [
                { "section": { "items": [{ "deep": { "ref": link("X", "t") } }] } }
            ],
            "top": link("Y", "t"),
        })),
    );

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_downward(&entry("R", "page")).unwrap();

    assert_eq!(pairs(&refs), vec![("X".to_string(), -1), ("Y".to_string(), -1)]);
}

#[test]
fn test_downward_absent_body() {
    let mut source = MemorySource::new();
    source.add_entry("R", "page", None);

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_downward(&entry("R", "page")).unwrap();

    assert!(refs.is_empty());
    assert_eq!(source.body_fetches("R"), 1);
}

#[test]
fn test_downward_mutual_embedding_terminates() {
    let mut source = MemorySource::new();
    source.add_entry("R", "page", Some(json!({ "a": link("A", "t") })));
    source.add_entry("A", "t", Some(json!({ "b": link("B", "t") })));
    source.add_entry("B", "t", Some(json!({ "a": link("A", "t"), "r": link("R", "page") })));

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_downward(&entry("R", "page")).unwrap();

    assert_eq!(
        pairs(&refs),
        vec![
            ("A".to_string(), -1),
            ("B".to_string(), -2),
            ("A".to_string(), -3),
        ]
    );
    assert_eq!(source.body_fetches("A"), 1);
    assert_eq!(source.body_fetches("B"), 1);
    assert_eq!(source.body_fetches("R"), 1);
}

#[test]
fn test_downward_does_not_touch_upward_edges() {
    let mut source = setup_referrers();
    source.add_entry("R", "page", Some(json!({ "x": link("D", "t") })));

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let refs = traverser.resolve_downward(&entry("R", "page")).unwrap();

    assert_eq!(pairs(&refs), vec![("D".to_string(), -1)]);
    assert_eq!(source.upward_fetches("R"), 0);
}

#[test]
fn test_directions_use_independent_visited_sets() {
    // P references R and R embeds P: P is visited once in each direction.
    let mut source = MemorySource::new();
    let r = entry("R", "page");
    let p = entry("P", "menu");
    source.add_reference(&p, &r);
    source.add_entry("R", "page", Some(json!({ "nav": link("P", "menu") })));

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let up = traverser.resolve_upward(&r).unwrap();
    let down = traverser.resolve_downward(&r).unwrap();

    assert_eq!(pairs(&up), vec![("P".to_string(), 1)]);
    assert_eq!(pairs(&down), vec![("P".to_string(), -1)]);
    assert_eq!(source.upward_fetches("P"), 1);
    assert_eq!(source.body_fetches("P"), 1);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_fetch_failure_aborts_traversal() {
    let mut source = setup_referrers();
    source.fail_on("G1");

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let err = traverser.resolve_upward(&entry("R", "page")).unwrap_err();

    assert!(matches!(err, refcrawl::errors::RefCrawlError::Fetch { .. }));
    // G1 sits inside P1's subtree, so P2 is never expanded.
    assert_eq!(source.upward_fetches("P2"), 0);
}

#[test]
fn test_failure_on_root_body() {
    let mut source = MemorySource::new();
    source.fail_on("R");

    let traverser = ReferenceTraverser::new(&source, "en-us");
    let err = traverser.resolve_downward(&entry("R", "page")).unwrap_err();
    assert!(err.to_string().contains("R"));
}
