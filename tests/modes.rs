// Mode table invariants. These tests are native-friendly and avoid
// wasm/browser APIs.

use quickdraw::round::GameMode;

#[test]
fn mode_table_matches_fixed_budgets() {
    assert_eq!(GameMode::Creative.time_budget(), 0);
    assert_eq!(GameMode::Easy.time_budget(), 15);
    assert_eq!(GameMode::Normal.time_budget(), 10);
    assert_eq!(GameMode::Hard.time_budget(), 5);
}

#[test]
fn only_creative_is_untimed() {
    for mode in GameMode::ALL {
        let timed = mode.time_budget() > 0;
        assert_eq!(timed, mode != GameMode::Creative, "unexpected budget for {}", mode.label());
    }
}

#[test]
fn mode_labels_are_distinct() {
    let labels: Vec<&str> = GameMode::ALL.iter().map(|m| m.label()).collect();
    for (i, a) in labels.iter().enumerate() {
        for b in labels.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}
