use std::collections::HashSet;

use common::options::StoreError;
use common::platform::normalize_platform_id;
use common::sanitize::sanitize_text_field;
use common::validate::row_problems;
use common::widget::PLACEHOLDER_VALUE;
use common::{PlatformRecord, PlatformRow, PlatformTable, RecordStore};
use tracing::{info, warn};

/// What a platform table replacement did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TableUpdate {
    /// New supported list, in submission order.
    pub published: Vec<String>,
    /// Previously supported platforms whose release fields were emptied.
    pub retired: Vec<String>,
    /// Entries dropped because their id sanitized to nothing or to the
    /// selector placeholder.
    pub skipped: usize,
}

fn sanitize_record(record: &PlatformRecord) -> PlatformRecord {
    PlatformRecord {
        name: sanitize_text_field(&record.name),
        version: sanitize_text_field(&record.version),
        download_url: sanitize_text_field(&record.download_url),
        shasum: sanitize_text_field(&record.shasum),
        payload_url: sanitize_text_field(&record.payload_url),
    }
}

/// Replace the published platform table with `table`.
///
/// Fields are written one at a time and the supported list last, so a
/// storage failure part way through leaves earlier writes in place. Rows that
/// fail validation are still published.
pub async fn replace_platform_table(
    records: &RecordStore,
    table: PlatformTable,
) -> Result<TableUpdate, StoreError> {
    let previous = records.supported_platforms().await?;
    let mut update = TableUpdate::default();

    for (raw_id, record) in table {
        let id = sanitize_text_field(&raw_id);
        if id.is_empty() {
            warn!(raw_id = %raw_id, "Skipping platform with an empty id");
            update.skipped += 1;
            continue;
        }
        if id == PLACEHOLDER_VALUE {
            warn!("Skipping platform whose id is the selector placeholder");
            update.skipped += 1;
            continue;
        }

        let record = sanitize_record(&record);
        let problems = row_problems(&PlatformRow::from_entry(&id, &record));
        if !problems.is_empty() {
            let fields: Vec<&str> = problems.iter().map(|f| f.label()).collect();
            warn!(platform = %id, ?fields, "Publishing platform with invalid fields");
        }

        records.set_platform(&id, &record).await?;
        if !update.published.contains(&id) {
            update.published.push(id);
        }
    }

    // Ids that normalize to a published id share its option keys.
    let published_keys: HashSet<String> = update
        .published
        .iter()
        .map(|id| normalize_platform_id(id))
        .collect();

    for id in previous {
        if published_keys.contains(&normalize_platform_id(&id)) {
            continue;
        }
        records.clear_platform(&id).await?;
        info!(platform = %id, "Platform no longer supported, release fields cleared");
        update.retired.push(id);
    }

    records.set_supported_platforms(&update.published).await?;
    info!(
        published = update.published.len(),
        retired = update.retired.len(),
        skipped = update.skipped,
        "Platform table replaced"
    );
    Ok(update)
}

/// Store a new EULA. The version is sanitized; the text is kept verbatim.
pub async fn replace_eula(
    records: &RecordStore,
    version: &str,
    text: &str,
) -> Result<(), StoreError> {
    let version = sanitize_text_field(version);
    records.set_eula_version(&version).await?;
    records.set_eula_text(text).await?;
    info!(version = %version, bytes = text.len(), "EULA replaced");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionChange {
    Installed,
    Upgraded { from: String },
    Unchanged,
}

/// Compare the stored service version with `current` and store `current`.
pub async fn record_service_version(
    records: &RecordStore,
    current: &str,
) -> Result<VersionChange, StoreError> {
    let change = match records.service_version().await? {
        None => VersionChange::Installed,
        Some(stored) if stored == current => return Ok(VersionChange::Unchanged),
        Some(stored) => VersionChange::Upgraded { from: stored },
    };
    records.set_service_version(current).await?;
    Ok(change)
}
