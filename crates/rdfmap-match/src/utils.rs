//! Text helpers shared by the matchers.

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercases and removes spaces and underscores.
///
/// This is the comparison key of the exact-label matchers, so
/// `first_name`, `First Name` and `FirstName` all collapse to `firstname`.
pub fn squash(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits camelCase boundaries before normalizing (`birthDate` -> `birth date`).
pub fn split_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;
    for ch in raw.chars() {
        if let Some(p) = prev
            && ch.is_uppercase()
            && (p.is_lowercase() || p.is_ascii_digit())
        {
            out.push(' ');
        }
        out.push(ch);
        prev = Some(ch);
    }
    normalize_text(&out)
}

/// Word set of a normalized string.
pub fn tokens(normalized: &str) -> Vec<&str> {
    let mut words: Vec<&str> = normalized.split_whitespace().collect();
    words.sort_unstable();
    words.dedup();
    words
}

/// Jaccard overlap of two word sets.
pub fn jaccard(left: &[&str], right: &[&str]) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let overlap = left.iter().filter(|w| right.contains(w)).count();
    let union = left.len() + right.len() - overlap;
    overlap as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squash_collapses_case_spaces_and_underscores() {
        assert_eq!(squash("First_Name"), "firstname");
        assert_eq!(squash(" first name "), "firstname");
    }

    #[test]
    fn identifiers_split_on_camel_case() {
        assert_eq!(split_identifier("birthDate"), "birth date");
        assert_eq!(split_identifier("employee_ID"), "employee id");
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        assert_eq!(jaccard(&["a"], &["b"]), 0.0);
        assert!((jaccard(&["a", "b"], &["b", "c"]) - 1.0 / 3.0).abs() < 1e-9);
    }
}
