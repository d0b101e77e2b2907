use std::collections::HashMap;

use common::{PlatformRecord, PlatformTable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Replacement platform table.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateVersionDataRequest {
    /// Platform id to release fields. Order is the publication order.
    #[schema(value_type = HashMap<String, PlatformRecord>)]
    pub data: PlatformTable,
}

/// Replacement EULA.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateEulaRequest {
    #[schema(example = "2.0")]
    pub version: String,
    /// EULA body; HTML is stored as given.
    #[schema(example = "<p>Terms</p>")]
    pub text: String,
}

/// Result of the `purge` action.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PurgeResponse {
    #[schema(example = "OK")]
    pub status: String,
    /// Number of options that existed and were deleted.
    #[schema(example = 9)]
    pub removed: usize,
}
