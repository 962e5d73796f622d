/// Normalize a string for selector matching: lowercase, keep alphanumeric chars and spaces, strip other characters.
pub fn normalize_for_matching(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Fuzzy match of a user-typed selector against an "artist – title" pair.
/// Case-insensitive substring semantics; empty selectors never match.
pub fn selector_matches(artist: &str, title: &str, selector: &str) -> bool {
    let needle = normalize_for_matching(selector);
    if needle.is_empty() {
        return false;
    }
    normalize_for_matching(&format!("{artist} – {title}")).contains(&needle)
}
