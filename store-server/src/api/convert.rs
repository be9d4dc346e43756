//! Handler-side conversion helpers

use surrealdb::RecordId;

/// Render an optional record id as its "table:id" string form
pub fn id_string(id: &Option<RecordId>) -> String {
    id.as_ref().map(|t| t.to_string()).unwrap_or_default()
}
