//! Bundle model

use serde::{Deserialize, Serialize};

/// One registered client application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bundle {
    /// Row identifier
    pub id: i64,

    /// Opaque application identifier, e.g. `com.example.app`
    pub bundle_id: String,

    /// Whether the application may run
    pub allow_execution: bool,

    /// When the gate last answered for this bundle (unix epoch seconds)
    pub last_access_time: i64,
}
