use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A category that products reference by id.
///
/// Categories are read-only in this service; rows are seeded by migration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
