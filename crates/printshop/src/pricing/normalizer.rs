/// Canonical form for categorical attribute values ("A4", " a4 ", "Art  Paper").
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

pub(crate) fn keys_equal(left: &str, right: &str) -> bool {
    normalize_key(left) == normalize_key(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_key_trims_collapses_and_lowercases() {
        assert_eq!(normalize_key("\u{feff}  Art   Paper "), "art paper");
        assert!(keys_equal("a4", "A4"));
        assert!(keys_equal(" A4", "A4 "));
        assert!(!keys_equal("A4", "A5"));
    }
}
