//! Extract command implementation.
//!
//! Runs the same extraction the ingest side performs, against a local
//! storage root.

use std::fs;

use anyhow::Context;
use anyhow::Result;
use mockup_core::ExtractionLimits;
use mockup_core::VersionedStorage;
use mockup_core::config::ReextractPolicy;
use mockup_core::config::UnsafeEntryPolicy;

use crate::cli::ExtractArgs;
use crate::error::convert_extraction_error;
use crate::output::OutputFormatter;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let bytes = fs::read(&args.archive)
        .with_context(|| format!("failed to read archive '{}'", args.archive.display()))?;

    let limits = ExtractionLimits {
        unsafe_entry_policy: if args.strict {
            UnsafeEntryPolicy::Reject
        } else {
            UnsafeEntryPolicy::Skip
        },
        reextract_policy: if args.no_merge {
            ReextractPolicy::Reject
        } else {
            ReextractPolicy::Merge
        },
        ..Default::default()
    };
    let storage = VersionedStorage::with_limits(&args.storage, limits);

    let report = storage
        .extract(&args.version_id, &bytes)
        .map_err(|e| convert_extraction_error(e, &args.archive))?;

    formatter.format_extraction_result(&storage.version(&args.version_id), &report)
}
