//! Uniqueness rule shared by usernames and note titles.
//!
//! The caller looks up the record currently holding the candidate value (under
//! case-insensitive collation) and hands its id here. On update the record
//! being changed is excluded, so keeping an unchanged name never conflicts.

/// Returns true when `existing_id` belongs to a record other than `exclude`.
#[must_use]
pub fn is_duplicate(existing_id: Option<i32>, exclude: Option<i32>) -> bool {
    match existing_id {
        Some(id) => exclude != Some(id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_flow() {
        assert!(!is_duplicate(None, None));
        assert!(is_duplicate(Some(3), None));
    }

    #[test]
    fn test_update_flow_excludes_self() {
        assert!(!is_duplicate(Some(3), Some(3)));
        assert!(is_duplicate(Some(3), Some(4)));
        assert!(!is_duplicate(None, Some(4)));
    }
}
