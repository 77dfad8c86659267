use super::common::*;

const STANDARD_POLICY_IDS: [&str; 10] = [
    "result_100",
    "result_90",
    "result_80",
    "result_70",
    "freedom_fighter",
    "tribal",
    "disability",
    "sibling",
    "spouse",
    "female",
];

#[test]
fn result_and_sibling_waivers_stack() {
    assert_eq!(resolver().resolve(["result_100", "sibling"]), 90);
}

#[test]
fn stacked_waivers_clamp_at_one_hundred() {
    assert_eq!(
        resolver().resolve(["result_100", "sibling", "freedom_fighter"]),
        100
    );
}

#[test]
fn unknown_policies_contribute_nothing() {
    let resolver = resolver();
    assert_eq!(resolver.resolve(["sibling", "alumni_legacy"]), 20);
    assert_eq!(resolver.resolve(["alumni_legacy"]), 0);
}

#[test]
fn empty_selection_resolves_to_zero() {
    assert_eq!(resolver().resolve(Vec::<String>::new()), 0);
}

#[test]
fn repeated_ids_count_once() {
    assert_eq!(resolver().resolve(["sibling", "sibling", "female"]), 30);
}

#[test]
fn policies_in_the_same_category_both_apply() {
    assert_eq!(resolver().resolve(["result_80", "result_70"]), 45);
}

#[test]
fn every_combination_stays_within_bounds() {
    let resolver = resolver();
    let catalog = catalog();

    for mask in 0u32..(1 << STANDARD_POLICY_IDS.len()) {
        let selected: Vec<&str> = STANDARD_POLICY_IDS
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, id)| *id)
            .collect();

        let raw: u32 = selected
            .iter()
            .filter_map(|id| catalog.policy(id))
            .map(|policy| u32::from(policy.percentage))
            .sum();
        let resolved = resolver.resolve(&selected);

        assert!(resolved <= 100, "{selected:?} resolved to {resolved}");
        assert_eq!(u32::from(resolved), raw.min(100), "{selected:?}");
    }
}
