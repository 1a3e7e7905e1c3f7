use confkit_fs::{NormalizedPath, relative_path};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalization_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_relative_path_resolves_back(segments in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let base = std::env::temp_dir().join("confkit-prop-base");
        let mut target = base.clone();
        for segment in &segments {
            target.push(segment);
        }

        let rel = relative_path(&base, &target).unwrap();
        let resolved = NormalizedPath::absolute(base.join(rel.to_native())).unwrap();
        prop_assert_eq!(resolved, NormalizedPath::absolute(&target).unwrap());
    }
}
