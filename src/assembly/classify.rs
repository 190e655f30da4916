//! Condition classification: how inferable a task's code is from a manual set.

use crate::types::{Availability, Condition, Kind, ManualEntry, Overlap, Task};

/// Classify `target` against the revealed `manual` entries.
///
/// - available iff `(target, bespoke)` was revealed
/// - exact iff `(target, compositional)` was revealed; otherwise full, partial
///   or none depending on whether compositional entries share the left part,
///   the right part, both or neither.
pub fn classify(manual: &[ManualEntry], target: Task) -> Condition {
    let availability =
        Availability::from_present(manual.contains(&ManualEntry::bespoke(target)));

    if manual.contains(&ManualEntry::compositional(target)) {
        return Condition::new(availability, Overlap::Exact);
    }

    let mut left = false;
    let mut right = false;
    for e in manual.iter().filter(|e| e.kind == Kind::Compositional) {
        left |= e.task.left == target.left;
        right |= e.task.right == target.right;
    }

    let overlap = match (left, right) {
        (true, true) => Overlap::Full,
        (true, false) | (false, true) => Overlap::Partial,
        (false, false) => Overlap::None,
    };
    Condition::new(availability, overlap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Task {
        s.parse().unwrap()
    }

    #[test]
    fn empty_manual_is_unavailable_none() {
        assert_eq!(
            classify(&[], t("22")),
            Condition::new(Availability::Unavailable, Overlap::None)
        );
    }

    #[test]
    fn two_crossing_entries_are_full() {
        let manual = [
            ManualEntry::compositional(t("12")),
            ManualEntry::compositional(t("21")),
        ];
        assert_eq!(
            classify(&manual, t("22")),
            Condition::new(Availability::Unavailable, Overlap::Full)
        );
    }

    #[test]
    fn bespoke_entries_do_not_count_toward_overlap() {
        let manual = [ManualEntry::bespoke(t("21")), ManualEntry::bespoke(t("22"))];
        assert_eq!(
            classify(&manual, t("22")),
            Condition::new(Availability::Available, Overlap::None)
        );
    }

    #[test]
    fn exact_wins_over_everything() {
        let manual = [
            ManualEntry::compositional(t("12")),
            ManualEntry::compositional(t("21")),
            ManualEntry::compositional(t("22")),
        ];
        assert_eq!(classify(&manual, t("22")).overlap, Overlap::Exact);
    }

    #[test]
    fn one_side_is_partial() {
        let manual = [ManualEntry::compositional(t("13"))];
        assert_eq!(classify(&manual, t("33")).overlap, Overlap::Partial);
        assert_eq!(classify(&manual, t("14")).overlap, Overlap::Partial);
        assert_eq!(classify(&manual, t("24")).overlap, Overlap::None);
    }
}
