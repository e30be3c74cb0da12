use serde::{Deserialize, Serialize};

/// One monitored service from the registry's `services` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Registry primary key; doubles as the published document id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Host the service runs on, when the registry records it.
    pub host: Option<String>,
}
