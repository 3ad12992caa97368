//! Key scoping helpers.
//!
//! Keys are scoped to a user by prefixing them with the user's root folder.
//! Names are not sanitized: `..` segments and absolute-looking names are
//! concatenated as-is.

/// Scope `name` to `folder`.
///
/// A name that already starts with the folder is returned unchanged, so
/// applying this twice gives the same key as applying it once.
///
/// # Examples
///
/// ```
/// use s3fm_core::keys::normalize_key;
///
/// assert_eq!(normalize_key("alice/", "a.txt"), "alice/a.txt");
/// assert_eq!(normalize_key("alice/", "alice/a.txt"), "alice/a.txt");
/// ```
#[must_use]
pub fn normalize_key(folder: &str, name: &str) -> String {
    if name.starts_with(folder) {
        name.to_owned()
    } else {
        format!("{folder}{name}")
    }
}

/// Remove the first occurrence of `folder` anywhere in `key`.
///
/// The occurrence need not be at the start of the key.
#[must_use]
pub fn strip_folder(key: &str, folder: &str) -> String {
    key.replacen(folder, "", 1)
}

/// Pick the file names directly inside `prefix` from a listing of keys.
///
/// Each key is first made relative with [`strip_folder`]. Without a prefix
/// (or with an empty one) the relative names containing no `/` are kept.
/// With a prefix, the leading `prefix.chars().count()` characters are cut
/// from the relative name and the rest is kept when non-empty and free of
/// `/`. The cut is by position, so it does not check that the name
/// actually starts with the prefix.
#[must_use]
pub fn select_listed_files<'a>(
    keys: impl IntoIterator<Item = &'a str>,
    folder: &str,
    prefix: Option<&str>,
) -> Vec<String> {
    let prefix_chars = prefix.filter(|p| !p.is_empty()).map(|p| p.chars().count());
    keys.into_iter()
        .filter_map(|key| {
            let relative = strip_folder(key, folder);
            match prefix_chars {
                None => (!relative.contains('/')).then_some(relative),
                Some(skip) => {
                    let rest: String = relative.chars().skip(skip).collect();
                    (!rest.is_empty() && !rest.contains('/')).then_some(rest)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_prefix_relative_names() {
        assert_eq!(normalize_key("alice/", "docs/a.txt"), "alice/docs/a.txt");
        assert_eq!(normalize_key("alice/", ""), "alice/");
    }

    #[test]
    fn test_should_be_idempotent() {
        for name in ["a.txt", "docs/", "alice/x", "../bob/secret", ""] {
            let once = normalize_key("alice/", name);
            assert_eq!(normalize_key("alice/", &once), once, "{name}");
        }
    }

    #[test]
    fn test_should_not_sanitize_traversal() {
        assert_eq!(normalize_key("alice/", "../bob/x"), "alice/../bob/x");
    }

    #[test]
    fn test_should_strip_first_occurrence_anywhere() {
        assert_eq!(strip_folder("alice/docs/", "alice/"), "docs/");
        assert_eq!(strip_folder("x/alice/y", "alice/"), "x/y");
        assert_eq!(strip_folder("alice/alice/z", "alice/"), "alice/z");
        assert_eq!(strip_folder("bob/z", "alice/"), "bob/z");
    }

    #[test]
    fn test_should_list_top_level_files_without_prefix() {
        let keys = ["alice/a.txt", "alice/docs/", "alice/docs/b.txt", "alice/c.md"];
        assert_eq!(
            select_listed_files(keys, "alice/", None),
            vec!["a.txt", "c.md"]
        );
        assert_eq!(
            select_listed_files(keys, "alice/", Some("")),
            vec!["a.txt", "c.md"]
        );
    }

    #[test]
    fn test_should_list_files_directly_under_prefix() {
        let keys = [
            "alice/docs/",
            "alice/docs/b.txt",
            "alice/docs/sub/",
            "alice/docs/sub/c.txt",
        ];
        assert_eq!(
            select_listed_files(keys, "alice/", Some("docs/")),
            vec!["b.txt"]
        );
    }

    #[test]
    fn test_should_cut_prefix_by_character_count() {
        let keys = ["alice/dé/f.txt"];
        assert_eq!(
            select_listed_files(keys, "alice/", Some("dé/")),
            vec!["f.txt"]
        );
    }
}
