//! Login autosuggest

use super::entity::User;

/// Return at most `limit` users whose login contains `substring`.
///
/// Matching is case-insensitive substring containment; an empty substring
/// matches every login. Matches are ordered by the raw login using ordinal
/// comparison (so `"Tom"` sorts before `"abc"`), keeping the incoming order
/// for equal logins, and the first `limit` are returned.
pub fn autosuggest(users: Vec<User>, substring: &str, limit: usize) -> Vec<User> {
    let needle = substring.to_lowercase();

    let mut matches: Vec<User> = users
        .into_iter()
        .filter(|user| user.login().to_lowercase().contains(&needle))
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| a.login().cmp(b.login()));
    matches.truncate(limit);

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    fn user(id: &str, login: &str) -> User {
        User::new(UserId::new(id).unwrap(), login, None, Some(27))
    }

    fn seeded() -> Vec<User> {
        vec![
            user("1", "abc"),
            user("777", "alex"),
            user("111", "alexa"),
            user("222", "alexandra"),
            user("333", "Tom"),
        ]
    }

    fn logins(users: &[User]) -> Vec<&str> {
        users.iter().map(User::login).collect()
    }

    #[test]
    fn test_prefix_match_truncated() {
        let result = autosuggest(seeded(), "alex", 2);
        assert_eq!(logins(&result), vec!["alex", "alexa"]);
    }

    #[test]
    fn test_no_match() {
        assert!(autosuggest(seeded(), "zzz", 10).is_empty());
    }

    #[test]
    fn test_case_insensitive_filter() {
        let result = autosuggest(seeded(), "TOM", 10);
        assert_eq!(logins(&result), vec!["Tom"]);

        let result = autosuggest(seeded(), "XAN", 10);
        assert_eq!(logins(&result), vec!["alexandra"]);
    }

    #[test]
    fn test_empty_substring_matches_all_in_ordinal_order() {
        let result = autosuggest(seeded(), "", 10);
        assert_eq!(
            logins(&result),
            vec!["Tom", "abc", "alex", "alexa", "alexandra"]
        );
    }

    #[test]
    fn test_length_is_min_of_limit_and_matches() {
        for limit in 1..=6 {
            let result = autosuggest(seeded(), "a", limit);
            assert_eq!(result.len(), limit.min(4));
        }
    }

    #[test]
    fn test_zero_limit_yields_nothing() {
        assert!(autosuggest(seeded(), "", 0).is_empty());
    }

    #[test]
    fn test_substring_in_middle() {
        let result = autosuggest(seeded(), "lex", 10);
        assert_eq!(logins(&result), vec!["alex", "alexa", "alexandra"]);
    }

    #[test]
    fn test_stable_for_duplicate_logins() {
        let users = vec![
            user("first", "sam"),
            user("x", "al"),
            user("second", "sam"),
            user("third", "sam"),
        ];

        let result = autosuggest(users, "sam", 10);
        let ids: Vec<&str> = result.iter().map(|u| u.id().as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_results_sorted_and_all_contain_substring() {
        let users = vec![
            user("1", "Zed"),
            user("2", "zebra"),
            user("3", "ZEN"),
            user("4", "amaze"),
            user("5", "bob"),
            user("6", "Gaze"),
        ];

        let result = autosuggest(users, "ze", 10);

        assert_eq!(result.len(), 5);
        assert!(result
            .iter()
            .all(|u| u.login().to_lowercase().contains("ze")));
        assert!(result.windows(2).all(|w| w[0].login() <= w[1].login()));
        assert!(result.iter().all(|u| u.login() != "bob"));
    }

    #[test]
    fn test_includes_deleted_users() {
        let mut deleted = user("9", "alexis");
        deleted.mark_deleted();

        let mut users = seeded();
        users.push(deleted);

        let result = autosuggest(users, "alexi", 5);
        assert_eq!(logins(&result), vec!["alexis"]);
        assert!(result[0].is_deleted());
    }
}
