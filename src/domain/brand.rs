use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A brand that products reference by id.
///
/// Brands are read-only in this service; rows are seeded by migration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Brand {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
