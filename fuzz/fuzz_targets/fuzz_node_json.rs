//! Fuzz target for node record parsing.
//!
//! Goal: parsing arbitrary bytes as a node **never panics**, and any node that
//! parses survives a serialize/parse cycle unchanged.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_node_json
//! ```

#![no_main]

use guardian_types::Node;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let Ok(node) = serde_json::from_slice::<Node>(data) else {
        return;
    };
    let text = serde_json::to_string(&node).expect("serialize parsed node");
    let again: Node = serde_json::from_str(&text).expect("reparse serialized node");
    assert_eq!(node, again);
});
