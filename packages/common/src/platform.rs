use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Release metadata for one platform, as published and as submitted.
///
/// Every field defaults to an empty string so partially filled submissions
/// deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct PlatformRecord {
    /// Human-readable platform name.
    #[schema(example = "Windows 10/11 (64-bit)")]
    pub name: String,
    /// Release version for this platform.
    #[schema(example = "1.4.2")]
    pub version: String,
    /// Installer download URL.
    #[schema(example = "https://downloads.example.com/app-1.4.2.msi")]
    pub download_url: String,
    /// SHA-256 checksum of the installer, hex encoded.
    #[schema(example = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08")]
    pub shasum: String,
    /// Optional payload URL; empty when unused.
    #[schema(example = "")]
    pub payload_url: String,
}

/// One editable row of the platform table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformRow {
    pub platform_id: String,
    pub name: String,
    pub version: String,
    pub download_url: String,
    pub shasum: String,
    pub payload_url: String,
}

impl PlatformRow {
    pub fn from_entry(platform_id: &str, record: &PlatformRecord) -> Self {
        Self {
            platform_id: platform_id.to_owned(),
            name: record.name.clone(),
            version: record.version.clone(),
            download_url: record.download_url.clone(),
            shasum: record.shasum.clone(),
            payload_url: record.payload_url.clone(),
        }
    }

    /// Split into the platform id and its record, trimming every field.
    pub fn into_entry(self) -> (String, PlatformRecord) {
        (
            self.platform_id.trim().to_owned(),
            PlatformRecord {
                name: self.name.trim().to_owned(),
                version: self.version.trim().to_owned(),
                download_url: self.download_url.trim().to_owned(),
                shasum: self.shasum.trim().to_owned(),
                payload_url: self.payload_url.trim().to_owned(),
            },
        )
    }
}

/// Ordered mapping of platform id to record.
///
/// Serializes as a JSON object and keeps the order entries were inserted or
/// appeared on the wire, which is the order platforms are published in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformTable {
    entries: Vec<(String, PlatformRecord)>,
}

impl PlatformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing an existing entry with the same id in place.
    pub fn insert(&mut self, platform_id: String, record: PlatformRecord) {
        match self.entries.iter_mut().find(|(id, _)| *id == platform_id) {
            Some((_, existing)) => *existing = record,
            None => self.entries.push((platform_id, record)),
        }
    }

    pub fn get(&self, platform_id: &str) -> Option<&PlatformRecord> {
        self.entries
            .iter()
            .find(|(id, _)| id == platform_id)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, platform_id: &str) -> bool {
        self.get(platform_id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlatformRecord)> {
        self.entries.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for PlatformTable {
    type Item = (String, PlatformRecord);
    type IntoIter = std::vec::IntoIter<(String, PlatformRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<PlatformRow> for PlatformTable {
    fn from_iter<I: IntoIterator<Item = PlatformRow>>(rows: I) -> Self {
        let mut table = PlatformTable::new();
        for row in rows {
            let (id, record) = row.into_entry();
            table.insert(id, record);
        }
        table
    }
}

impl Serialize for PlatformTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PlatformTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PlatformTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of platform id to platform fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = PlatformTable::new();
                while let Some((id, record)) = access.next_entry::<String, PlatformRecord>()? {
                    table.insert(id, record);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// The end-user license agreement singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Eula {
    /// EULA version label.
    #[schema(example = "2.0")]
    pub version: String,
    /// EULA body; HTML is preserved as written.
    #[schema(example = "<p>Terms</p>")]
    pub text: String,
}

/// Storage-key form of a platform id: ASCII-lowercased, with every byte
/// outside `[a-z0-9]` replaced by `_`.
pub fn normalize_platform_id(platform_id: &str) -> String {
    platform_id
        .bytes()
        .map(|b| {
            let b = b.to_ascii_lowercase();
            if b.is_ascii_lowercase() || b.is_ascii_digit() {
                b as char
            } else {
                '_'
            }
        })
        .collect()
}
