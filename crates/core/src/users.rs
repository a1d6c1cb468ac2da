//! Candidate filtering for the executor / CC user picker.

use serde::Serialize;

use crate::types::DbId;

/// A user as shown in the picker. Read-only from this crate's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct PickerUser {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Filter candidates by a live text query.
///
/// Case-insensitive substring match against `name`, `role`, or `email`.
/// An empty query returns the full list unchanged. The caller supplies the
/// candidate list; no lookups happen here.
pub fn filter_users<'a>(users: &'a [PickerUser], query: &str) -> Vec<&'a PickerUser> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return users.iter().collect();
    }
    users
        .iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&query)
                || u.role.to_lowercase().contains(&query)
                || u.email.to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<PickerUser> {
        vec![
            PickerUser {
                id: 1,
                name: "Alice Wong".into(),
                role: "engineer".into(),
                email: "alice@site.example".into(),
                avatar: None,
            },
            PickerUser {
                id: 2,
                name: "Bob Chan".into(),
                role: "foreman".into(),
                email: "bob@site.example".into(),
                avatar: Some("bob.png".into()),
            },
        ]
    }

    #[test]
    fn test_empty_query_returns_everyone() {
        let users = candidates();
        assert_eq!(filter_users(&users, "").len(), 2);
        assert_eq!(filter_users(&users, "   ").len(), 2);
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let users = candidates();
        let hits = filter_users(&users, "ALICE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_matches_role_and_email() {
        let users = candidates();
        assert_eq!(filter_users(&users, "foreman")[0].id, 2);
        assert_eq!(filter_users(&users, "alice@")[0].id, 1);
    }

    #[test]
    fn test_no_match_yields_empty_list() {
        let users = candidates();
        assert!(filter_users(&users, "zzz-nobody").is_empty());
    }
}
