use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::options::{OptionStore, StoreError};
use crate::platform::{Eula, PlatformRecord, PlatformTable, normalize_platform_id};

const SUPPORTED_PLATFORMS: &str = "supported_platforms";
const KNOWN_PLATFORMS: &str = "known_platforms";
const EULA_VERSION: &str = "eula_version";
const EULA_TEXT: &str = "eula_text";
const SERVICE_VERSION: &str = "version";

/// Per-platform fields, each persisted as `<key prefix>_<normalized id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformField {
    Name,
    Version,
    DownloadUrl,
    Shasum,
    PayloadUrl,
}

impl PlatformField {
    pub const ALL: [PlatformField; 5] = [
        PlatformField::Name,
        PlatformField::Version,
        PlatformField::DownloadUrl,
        PlatformField::Shasum,
        PlatformField::PayloadUrl,
    ];

    /// Fields emptied when a platform stops being supported.
    pub const RELEASE: [PlatformField; 4] = [
        PlatformField::Version,
        PlatformField::DownloadUrl,
        PlatformField::Shasum,
        PlatformField::PayloadUrl,
    ];

    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Version => "version",
            Self::DownloadUrl => "download_url",
            Self::Shasum => "shasum",
            Self::PayloadUrl => "payload_url",
        }
    }

    fn option_key(self, platform_id: &str) -> String {
        format!("{}_{}", self.key_prefix(), normalize_platform_id(platform_id))
    }

    fn value(self, record: &PlatformRecord) -> &str {
        match self {
            Self::Name => &record.name,
            Self::Version => &record.version,
            Self::DownloadUrl => &record.download_url,
            Self::Shasum => &record.shasum,
            Self::PayloadUrl => &record.payload_url,
        }
    }
}

/// Typed access to platform, EULA and service-version options.
///
/// Every key is namespaced beneath a fixed prefix. Each mutator writes
/// straight through to the backend; there is no cache and no batching, so
/// concurrent writers race field by field.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn OptionStore>,
    prefix: String,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn OptionStore>, prefix: &str) -> Self {
        Self {
            backend,
            prefix: format!("{prefix}_"),
        }
    }

    fn option_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Read `key`, falling back to `default` when it was never written.
    pub async fn get(&self, key: &str, default: &str) -> Result<String, StoreError> {
        Ok(self
            .backend
            .get(&self.option_name(key))
            .await?
            .unwrap_or_else(|| default.to_owned()))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(&self.option_name(key), value).await
    }

    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.delete(&self.option_name(key)).await
    }

    async fn id_list(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let raw = self.get(key, "[]").await?;
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(option = key, error = %e, "Stored platform list is not a JSON string array, treating as empty");
            Vec::new()
        }))
    }

    async fn set_id_list(&self, key: &str, ids: &[String]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(ids).map_err(|source| StoreError::Encode {
            name: key.into(),
            source,
        })?;
        self.set(key, &encoded).await
    }

    /// Ids of the currently published platforms, in publication order.
    pub async fn supported_platforms(&self) -> Result<Vec<String>, StoreError> {
        self.id_list(SUPPORTED_PLATFORMS).await
    }

    pub async fn set_supported_platforms(&self, ids: &[String]) -> Result<(), StoreError> {
        self.set_id_list(SUPPORTED_PLATFORMS, ids).await
    }

    /// Every platform that ever had a field written, retired ones included.
    pub async fn known_platforms(&self) -> Result<Vec<String>, StoreError> {
        self.id_list(KNOWN_PLATFORMS).await
    }

    /// Record `platform_id` as known unless an id with the same option keys
    /// already is.
    async fn remember_platform(&self, platform_id: &str) -> Result<(), StoreError> {
        let mut known = self.known_platforms().await?;
        let key = normalize_platform_id(platform_id);
        if known.iter().any(|id| normalize_platform_id(id) == key) {
            return Ok(());
        }
        known.push(platform_id.to_owned());
        self.set_id_list(KNOWN_PLATFORMS, &known).await
    }

    pub async fn platform_field(
        &self,
        platform_id: &str,
        field: PlatformField,
    ) -> Result<String, StoreError> {
        self.get(&field.option_key(platform_id), "").await
    }

    pub async fn set_platform_field(
        &self,
        platform_id: &str,
        field: PlatformField,
        value: &str,
    ) -> Result<(), StoreError> {
        self.remember_platform(platform_id).await?;
        self.set(&field.option_key(platform_id), value).await
    }

    pub async fn platform_name(&self, platform_id: &str) -> Result<String, StoreError> {
        self.platform_field(platform_id, PlatformField::Name).await
    }

    pub async fn platform_version(&self, platform_id: &str) -> Result<String, StoreError> {
        self.platform_field(platform_id, PlatformField::Version).await
    }

    pub async fn download_url(&self, platform_id: &str) -> Result<String, StoreError> {
        self.platform_field(platform_id, PlatformField::DownloadUrl)
            .await
    }

    pub async fn shasum(&self, platform_id: &str) -> Result<String, StoreError> {
        self.platform_field(platform_id, PlatformField::Shasum).await
    }

    pub async fn payload_url(&self, platform_id: &str) -> Result<String, StoreError> {
        self.platform_field(platform_id, PlatformField::PayloadUrl)
            .await
    }

    /// Assemble every stored field of one platform.
    pub async fn platform(&self, platform_id: &str) -> Result<PlatformRecord, StoreError> {
        Ok(PlatformRecord {
            name: self.platform_name(platform_id).await?,
            version: self.platform_version(platform_id).await?,
            download_url: self.download_url(platform_id).await?,
            shasum: self.shasum(platform_id).await?,
            payload_url: self.payload_url(platform_id).await?,
        })
    }

    /// Write every field of one platform. Fields are written one at a time.
    pub async fn set_platform(
        &self,
        platform_id: &str,
        record: &PlatformRecord,
    ) -> Result<(), StoreError> {
        for field in PlatformField::ALL {
            self.set_platform_field(platform_id, field, field.value(record))
                .await?;
        }
        Ok(())
    }

    /// Empty the release fields of a platform, leaving its name in place.
    pub async fn clear_platform(&self, platform_id: &str) -> Result<(), StoreError> {
        for field in PlatformField::RELEASE {
            self.set_platform_field(platform_id, field, "").await?;
        }
        Ok(())
    }

    /// Snapshot of all supported platforms, values exactly as stored.
    pub async fn platform_table(&self) -> Result<PlatformTable, StoreError> {
        let mut table = PlatformTable::new();
        for id in self.supported_platforms().await? {
            let record = self.platform(&id).await?;
            table.insert(id, record);
        }
        Ok(table)
    }

    pub async fn eula_version(&self) -> Result<String, StoreError> {
        self.get(EULA_VERSION, "").await
    }

    pub async fn set_eula_version(&self, version: &str) -> Result<(), StoreError> {
        self.set(EULA_VERSION, version).await
    }

    pub async fn eula_text(&self) -> Result<String, StoreError> {
        self.get(EULA_TEXT, "").await
    }

    pub async fn set_eula_text(&self, text: &str) -> Result<(), StoreError> {
        self.set(EULA_TEXT, text).await
    }

    pub async fn eula(&self) -> Result<Eula, StoreError> {
        Ok(Eula {
            version: self.eula_version().await?,
            text: self.eula_text().await?,
        })
    }

    /// Installed service version, `None` before the first start.
    pub async fn service_version(&self) -> Result<Option<String>, StoreError> {
        self.backend
            .get(&self.option_name(SERVICE_VERSION))
            .await
    }

    pub async fn set_service_version(&self, version: &str) -> Result<(), StoreError> {
        self.set(SERVICE_VERSION, version).await
    }

    /// Delete every option this store manages: the fields of every platform
    /// ever written, the platform lists, the EULA and the service version.
    /// Returns how many options existed.
    pub async fn purge(&self) -> Result<usize, StoreError> {
        let mut ids = self.known_platforms().await?;
        ids.extend(self.supported_platforms().await?);

        let mut seen = HashSet::new();
        let mut removed = 0;
        for id in ids {
            if !seen.insert(normalize_platform_id(&id)) {
                continue;
            }
            for field in PlatformField::ALL {
                if self.delete(&field.option_key(&id)).await? {
                    removed += 1;
                }
            }
        }
        for key in [
            SUPPORTED_PLATFORMS,
            KNOWN_PLATFORMS,
            EULA_VERSION,
            EULA_TEXT,
            SERVICE_VERSION,
        ] {
            if self.delete(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
