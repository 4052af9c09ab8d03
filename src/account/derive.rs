/// Builds a username suggestion from a full name: words joined by `-`, lower-cased.
///
/// Returns `None` for an empty name so callers leave the username untouched.
pub fn username_from_full_name(full_name: &str) -> Option<String> {
    if full_name.is_empty() {
        return None;
    }

    let joined = full_name.split_whitespace().collect::<Vec<_>>().join("-");
    Some(joined.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_joins_and_lowercases() {
        assert_eq!(
            username_from_full_name("  Ada LOVELACE ").as_deref(),
            Some("ada-lovelace")
        );
        assert_eq!(
            username_from_full_name("Grace\t Brewster  Hopper").as_deref(),
            Some("grace-brewster-hopper")
        );
        assert_eq!(username_from_full_name("linus").as_deref(), Some("linus"));
    }

    #[test]
    fn empty_name_is_skipped() {
        assert_eq!(username_from_full_name(""), None);
    }

    #[test]
    fn whitespace_only_name_derives_empty() {
        assert_eq!(username_from_full_name("   ").as_deref(), Some(""));
    }
}
