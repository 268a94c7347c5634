//! Pages command implementation.

use anyhow::Context;
use anyhow::Result;
use mockup_core::VersionedStorage;

use crate::cli::PagesArgs;
use crate::output::OutputFormatter;

pub fn execute(args: &PagesArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let storage = VersionedStorage::new(&args.storage);
    let pages = storage.list_html_files(&args.version_id).with_context(|| {
        format!(
            "failed to list pages of version '{}' under '{}'",
            args.version_id,
            args.storage.display()
        )
    })?;

    formatter.format_pages(&args.version_id, &pages)
}
