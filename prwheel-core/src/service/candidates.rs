//! Shared candidate selection

use std::collections::HashSet;

use crate::models::User;

/// Filter a member list down to eligible reviewer candidates.
///
/// Returns the ids of `members` not present in `exclude`. Callers decide
/// what goes into the exclusion set (the author, current reviewers, the
/// departing reviewer); this helper only applies it. Order follows the
/// input, so a uniform draw over the result is a uniform draw over the
/// eligible pool.
pub fn candidate_pool(members: &[User], exclude: &HashSet<&str>) -> Vec<String> {
    members
        .iter()
        .filter(|u| !exclude.contains(u.id.as_str()))
        .map(|u| u.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.into(),
            name: id.into(),
            team_name: "backend".into(),
            is_active: true,
        }
    }

    #[test]
    fn filters_excluded_ids() {
        let members = vec![user("u1"), user("u2"), user("u3")];
        let exclude: HashSet<&str> = ["u1", "u3"].into_iter().collect();
        assert_eq!(candidate_pool(&members, &exclude), vec!["u2".to_string()]);
    }

    #[test]
    fn empty_exclusion_keeps_everyone() {
        let members = vec![user("u1"), user("u2")];
        let pool = candidate_pool(&members, &HashSet::new());
        assert_eq!(pool, vec!["u1".to_string(), "u2".to_string()]);
    }

    #[test]
    fn empty_members_yield_empty_pool() {
        let exclude: HashSet<&str> = ["u1"].into_iter().collect();
        assert!(candidate_pool(&[], &exclude).is_empty());
    }
}
