// Helper for generating document identifiers.
//
// Documents are keyed by UUIDv7 strings so that `_id` order follows
// insertion order, matching the store's natural ordering.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Generate a fresh document `_id`.
pub fn new_document_id() -> String {
    uuidv7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn document_ids_are_monotonic() {
        let a = new_document_id();
        let b = new_document_id();
        // UUIDv7 embeds timestamp: later IDs sort after earlier ones
        assert!(b >= a);
    }
}
