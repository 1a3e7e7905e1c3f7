//! Tests for the comment-preserving merge

use confkit_content::{merge, parse_yaml};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn merge_text(text: &str, new: Value) -> String {
    let old = parse_yaml(text).unwrap();
    let merged = merge(text, &old, &new).unwrap();
    assert_eq!(parse_yaml(&merged).unwrap(), new, "merged text:\n{merged}");
    merged
}

#[test]
fn test_unchanged_value_is_byte_identical() {
    let text = "# yaml-language-server: $schema=.schemas/project.json\n\n\
                version: 1   # pinned\n\n# the list\nitems:\n  - 'a'\n  - \"b\"\n";
    let old = parse_yaml(text).unwrap();
    assert_eq!(merge(text, &old, &old).unwrap(), text);
}

#[test]
fn test_rename_key_keeps_comments_and_bumps_version() {
    let text = "# yaml-language-server: $schema=.schemas/project.json\n\
                version: 0\n\n# things to process\nlist:\n  - a\n";
    let merged = merge_text(text, json!({"version": 1, "items": ["a"]}));
    assert_eq!(
        merged,
        "# yaml-language-server: $schema=.schemas/project.json\nversion: 1\nitems:\n- a\n"
    );
}

#[test]
fn test_changed_scalar_keeps_neighbours() {
    let text = "# header\nname: demo # display name\n\n# port to bind\nport: 8080\n";
    let merged = merge_text(text, json!({"name": "demo", "port": 9090}));
    assert_eq!(
        merged,
        "# header\nname: demo # display name\n\n# port to bind\nport: 9090\n"
    );
}

#[test]
fn test_nested_mapping_patch() {
    let text = "services:\n  # the web tier\n  web:\n    image: nginx\n    port: 80\n  db:\n    image: postgres\n";
    let merged = merge_text(
        text,
        json!({"services": {"web": {"image": "nginx", "port": 8080}, "db": {"image": "postgres"}}}),
    );
    assert_eq!(
        merged,
        "services:\n  # the web tier\n  web:\n    image: nginx\n    port: 8080\n  db:\n    image: postgres\n"
    );
}

#[test]
fn test_new_keys_appended_in_value_order() {
    let text = "version: 1\n# trailing note\n";
    let merged = merge_text(text, json!({"zeta": true, "version": 1, "alpha": "x"}));
    assert_eq!(merged, "version: 1\nzeta: true\nalpha: x\n# trailing note\n");
}

#[test]
fn test_removed_key_drops_its_comment() {
    let text = "version: 1\n# obsolete\nold: 1\nkeep: 2\n";
    let merged = merge_text(text, json!({"version": 1, "keep": 2}));
    assert_eq!(merged, "version: 1\nkeep: 2\n");
}

#[test]
fn test_sequence_item_patch_preserves_other_items() {
    let text = "hosts:\n  - name: a # primary\n    port: 1\n  - name: b\n    port: 2\n";
    let merged = merge_text(
        text,
        json!({"hosts": [{"name": "a", "port": 1}, {"name": "b", "port": 3}, {"name": "c", "port": 4}]}),
    );
    assert_eq!(
        merged,
        "hosts:\n  - name: a # primary\n    port: 1\n  - name: b\n    port: 3\n  - name: c\n    port: 4\n"
    );
}

#[test]
fn test_sequence_shrinks() {
    let text = "tags:\n- one # first\n- two\n- three\n";
    let merged = merge_text(text, json!({"tags": ["one", "two"]}));
    assert_eq!(merged, "tags:\n- one # first\n- two\n");
}

#[test]
fn test_empty_document_gets_entries_after_header() {
    let text = "# yaml-language-server: $schema=.schemas/x.json\n# Documentation: https://example.com/x.md\n";
    let merged = merge(text, &json!({}), &json!({"version": 0, "name": "x"})).unwrap();
    assert_eq!(
        merged,
        "# yaml-language-server: $schema=.schemas/x.json\n# Documentation: https://example.com/x.md\nversion: 0\nname: x\n"
    );
}

#[test]
fn test_flow_root_falls_back_to_render_with_header() {
    let text = "# header\n{version: 0}\n";
    let merged = merge_text(text, json!({"version": 1}));
    assert_eq!(merged, "# header\nversion: 1\n");
}

#[test]
fn test_anchor_subtree_is_rerendered() {
    let text = "base: &b\n  x: 1\nother: 2\n";
    let merged = merge_text(text, json!({"base": {"x": 1}, "other": 3}));
    assert_eq!(merged, "base:\n  x: 1\nother: 3\n");
}

#[test]
fn test_multiline_string_changes() {
    let text = "note: |\n  first\n  # kept as text\nafter: 1\n";
    let merged = merge_text(text, json!({"note": "first\n# kept as text\n", "after": 2}));
    assert_eq!(merged, "note: |\n  first\n  # kept as text\nafter: 2\n");
}

#[test]
fn test_value_to_empty_mapping() {
    let text = "opts:\n  a: 1\nversion: 1\n";
    let merged = merge_text(text, json!({"opts": {}, "version": 1}));
    assert_eq!(merged, "opts: {}\nversion: 1\n");
}
