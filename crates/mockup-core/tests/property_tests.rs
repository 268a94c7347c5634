//! Property-based tests for containment and quota accounting.

#![allow(clippy::unwrap_used)]

use mockup_core::ExtractionError;
use mockup_core::copy::CopyBuffer;
use mockup_core::copy::copy_bounded;
use mockup_core::security::QuotaTracker;
use mockup_core::security::clean_path;
use mockup_core::security::contained_join;
use proptest::prelude::*;
use std::io::Cursor;
use std::path::Path;

proptest! {
    /// Whatever an entry is named, an accepted destination lies under the root.
    #[test]
    fn prop_accepted_destination_is_contained(
        parts in prop::collection::vec(prop_oneof![
            Just("..".to_string()),
            Just(".".to_string()),
            "[a-z]{1,8}",
        ], 0..8),
        absolute in any::<bool>(),
    ) {
        let root = Path::new("/srv/uploads/v1");
        let mut name = parts.join("/");
        if absolute {
            name.insert(0, '/');
        }
        if let Some(dest) = contained_join(root, &name) {
            prop_assert!(dest.starts_with(root));
            prop_assert!(!dest.components().any(|c| c.as_os_str() == ".."));
        }
    }

    /// Any name that climbs above the root first is rejected.
    #[test]
    fn prop_leading_parent_rejected(
        tail in prop::collection::vec("[a-z]{1,8}", 0..5),
    ) {
        let root = Path::new("/srv/uploads/v1");
        let name = format!("../{}", tail.join("/"));
        prop_assert!(contained_join(root, &name).is_none());
    }

    /// Plain relative names are always accepted verbatim.
    #[test]
    fn prop_plain_names_accepted(
        parts in prop::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..6),
    ) {
        let root = Path::new("/srv/uploads/v1");
        let name = parts.join("/");
        prop_assert_eq!(contained_join(root, &name), Some(root.join(&name)));
    }

    /// Cleaning is idempotent.
    #[test]
    fn prop_clean_path_idempotent(path in "(/)?([a-z.]{1,4}/){0,6}") {
        let once = clean_path(Path::new(&path));
        prop_assert_eq!(clean_path(&once), once);
    }

    /// The tracker errors exactly when the running total passes the ceiling.
    #[test]
    fn prop_quota_matches_running_total(
        max in 0u64..10_000,
        sizes in prop::collection::vec(0u64..4_000, 1..10),
    ) {
        let mut tracker = QuotaTracker::new(max);
        let mut total = 0u64;
        for size in sizes {
            total += size;
            let result = tracker.record(size);
            if total > max {
                let is_quota_error = matches!(result, Err(ExtractionError::QuotaExceeded { .. }));
                prop_assert!(is_quota_error);
                break;
            }
            prop_assert!(result.is_ok());
        }
    }

    /// A bounded copy never reads past its limit.
    #[test]
    fn prop_copy_respects_limit(len in 0usize..200_000, limit in 0u64..200_000) {
        let data = vec![7u8; len];
        let mut input = Cursor::new(&data);
        let mut output = Vec::new();
        let mut buffer = CopyBuffer::new();

        let copied = copy_bounded(&mut input, &mut output, limit, &mut buffer).unwrap();
        prop_assert_eq!(copied, (len as u64).min(limit));
        prop_assert_eq!(output.len() as u64, copied);
    }
}
