use confkit_content::{format_config, merge, parse_yaml};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (0u32..10_000).prop_map(|n| Value::from(n)),
        "[a-z][a-z0-9 ]{0,10}".prop_map(|s| Value::String(s.trim_end().to_string())),
        // Written as `|-` block scalars, with blank lines inside the body
        "[a-z]{1,5}(\n\n?\n?[a-z]{1,5}){1,3}".prop_map(Value::String),
    ]
}

fn config_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        3 => scalar(),
        1 => prop::collection::vec(scalar(), 0..4).prop_map(Value::Array),
    ];
    let nested = prop::collection::btree_map("[a-z]{1,6}", leaf.clone(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()));
    let field = prop_oneof![3 => leaf, 1 => nested];
    prop::collection::btree_map("[a-z]{1,6}", field, 1..6)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>()))
}

fn with_header(value: &Value) -> String {
    format!("# header comment\n{}", serde_yaml::to_string(value).unwrap())
}

proptest! {
    #[test]
    fn test_merge_fixpoint(value in config_value()) {
        let text = with_header(&value);
        let parsed = parse_yaml(&text).unwrap();
        prop_assert_eq!(merge(&text, &parsed, &parsed).unwrap(), text);
    }

    #[test]
    fn test_merge_produces_new_value(old in config_value(), new in config_value()) {
        let text = with_header(&old);
        let parsed = parse_yaml(&text).unwrap();
        let merged = merge(&text, &parsed, &new).unwrap();
        prop_assert!(merged.starts_with("# header comment\n"));
        prop_assert_eq!(parse_yaml(&merged).unwrap(), new);
    }

    #[test]
    fn test_format_is_idempotent_and_lossless(value in config_value()) {
        let text = with_header(&value);
        let once = format_config(&text);
        prop_assert_eq!(format_config(&once), once.clone());
        prop_assert_eq!(parse_yaml(&once).unwrap(), value);
        prop_assert!(once.ends_with('\n') && !once.ends_with("\n\n"));
    }
}
