#![no_main]

// Harness: expand_graph
// Focus: termination on arbitrary (cyclic, dangling) graphs, no duplicate results,
// resolved and unresolved disjoint.

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use authority_core::{expand, AccessControl, AccessControlId, InMemoryAccessControlStore};

#[derive(Arbitrary, Debug)]
struct GraphFrame {
    nodes: Vec<(u8, Vec<u8>)>,
    roots: Vec<u8>,
}

fn id(n: u8) -> AccessControlId {
    AccessControlId::from(format!("{}", n))
}

fuzz_target!(|frame: GraphFrame| {
    let store: InMemoryAccessControlStore = frame
        .nodes
        .iter()
        .map(|(n, children)| AccessControl::group(id(*n), children.iter().map(|c| id(*c))))
        .collect();

    let expansion = expand(&store, frame.roots.iter().map(|r| id(*r)));

    let unresolved: HashSet<&AccessControlId> = expansion.unresolved.iter().collect();
    assert_eq!(unresolved.len(), expansion.unresolved.len());
    for ac in &expansion.resolved {
        assert!(!unresolved.contains(&ac.id));
        assert!(store.get(&ac.id).is_some());
    }
    for id in &expansion.unresolved {
        assert!(store.get(id).is_none());
    }
});
