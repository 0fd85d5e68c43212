use super::*;
use proptest::prelude::*;

#[test]
fn test_levenshtein_distance() {
    assert_eq!(Levenshtein::distance("kitten", "sitting"), 3);
    assert_eq!(Levenshtein::distance("flaw", "lawn"), 2);
    assert_eq!(Levenshtein::distance("delay", "delayed"), 2);
    assert_eq!(Levenshtein::distance("delay", "delay"), 0);
}

#[test]
fn test_levenshtein_empty() {
    assert_eq!(Levenshtein::distance("", "abc"), 3);
    assert_eq!(Levenshtein::distance("abc", ""), 3);
    assert_eq!(Levenshtein::distance("", ""), 0);
}

#[test]
fn test_levenshtein_counts_chars_not_bytes() {
    // 'é' is two bytes in UTF-8 but a single substitution.
    assert_eq!(Levenshtein::distance("cafe", "café"), 1);
}

#[test]
fn test_indel_distance() {
    // A substitution costs a deletion plus an insertion.
    assert_eq!(Indel::distance("cat", "bat"), 2);
    assert_eq!(Indel::distance("delay", "delayed"), 2);
    assert_eq!(Indel::distance("", "abc"), 3);
    assert_eq!(Indel::distance("abc", "abc"), 0);
}

fn arb_token() -> impl Strategy<Value = String> {
    "[a-e]{0,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_levenshtein_is_metric(a in arb_token(), b in arb_token(), c in arb_token()) {
        let ab = Levenshtein::distance(&a, &b);
        prop_assert_eq!(ab, Levenshtein::distance(&b, &a));
        prop_assert_eq!(Levenshtein::distance(&a, &a), 0);
        prop_assert_eq!(ab == 0, a == b);
        prop_assert!(
            Levenshtein::distance(&a, &c) <= ab + Levenshtein::distance(&b, &c)
        );
    }

    #[test]
    fn prop_indel_is_metric(a in arb_token(), b in arb_token(), c in arb_token()) {
        let ab = Indel::distance(&a, &b);
        prop_assert_eq!(ab, Indel::distance(&b, &a));
        prop_assert_eq!(ab == 0, a == b);
        prop_assert!(Indel::distance(&a, &c) <= ab + Indel::distance(&b, &c));
        // Never cheaper than Levenshtein, which also allows substitutions.
        prop_assert!(ab >= Levenshtein::distance(&a, &b));
    }
}
