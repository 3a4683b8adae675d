//! Property-based tests for cache overwrite semantics

use frame_relay::{ContentKind, MessageCache};
use proptest::prelude::*;

fn content_kind() -> impl Strategy<Value = ContentKind> {
    prop_oneof![Just(ContentKind::UrlTopFrame), Just(ContentKind::UrlNavigate)]
}

proptest! {
    /// Writing the same value twice is the same as writing it once
    #[test]
    fn repeated_write_is_idempotent(key in content_kind(), value in ".*") {
        let cache = MessageCache::new();
        cache.write(key, value.clone());
        cache.write(key, value.clone());
        prop_assert_eq!(cache.read(key), Some(value));
        prop_assert_eq!(cache.snapshot().len(), 1);
    }

    /// Read always returns the last write for a key, whatever happened to the other key
    #[test]
    fn read_returns_last_write(
        writes in prop::collection::vec((content_kind(), "[a-z:/.]{0,24}"), 0..32),
    ) {
        let cache = MessageCache::new();
        for (key, value) in &writes {
            cache.write(*key, value.clone());
        }

        for key in [ContentKind::UrlTopFrame, ContentKind::UrlNavigate] {
            let expected = writes
                .iter()
                .rev()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone());
            prop_assert_eq!(cache.read(key), expected);
        }
        prop_assert!(cache.snapshot().len() <= 2);
    }
}
