//! Unit tests for summon token extraction

#[cfg(test)]
mod tests {
    use crate::summon::{parse_summons, SUMMON_LIMIT};

    #[test]
    fn test_case_fold_dedup_and_blank_skip() {
        let summons = parse_summons("{{Dark Magician}} hi {{dark magician}} {{ }}");
        assert_eq!(summons, vec!["dark magician"]);
    }

    #[test]
    fn test_order_of_appearance_preserved() {
        let summons = parse_summons("{{b}} and {{a}} and {{B}}");
        assert_eq!(summons, vec!["b", "a"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        assert!(parse_summons("no braces here").is_empty());
        assert!(parse_summons("").is_empty());
        assert!(parse_summons("single {brace} pair").is_empty());
    }

    #[test]
    fn test_whitespace_trimmed() {
        let summons = parse_summons("{{  Blue-Eyes White Dragon  }}");
        assert_eq!(summons, vec!["blue-eyes white dragon"]);
    }

    #[test]
    fn test_cap_keeps_first_five_in_appearance_order() {
        let text = "{{a}}{{b}}{{c}}{{d}}{{e}}{{f}}{{g}}";
        let summons = parse_summons(text);
        assert_eq!(summons.len(), SUMMON_LIMIT);
        assert_eq!(summons, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_cap_applies_after_dedup() {
        // 5 unique tokens among 7 matches: the repeats must not eat the cap
        let text = "{{a}}{{A}}{{b}}{{B}}{{c}}{{d}}{{e}}";
        assert_eq!(parse_summons(text), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_unclosed_braces_ignored() {
        assert!(parse_summons("{{never closed").is_empty());
        assert_eq!(parse_summons("{{closed}} {{not"), vec!["closed"]);
    }
}
