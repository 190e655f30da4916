//! Property-based tests for code assignment, classification and composition.

use std::collections::HashSet;

use proptest::prelude::*;

use code_stimuli::assembly::classify::classify;
use code_stimuli::shapes::compose;
use code_stimuli::task_codes::TaskCodeGenerator;
use code_stimuli::types::{Availability, GeneratorParams, ManualEntry, Overlap, Task};
use code_stimuli::validation::validate_mapping;

/// Strategy: parameters with comfortable code-space headroom.
fn params_strategy() -> impl Strategy<Value = GeneratorParams> {
    (4u8..=9, 1usize..=4, 1usize..=8).prop_map(|(max_digit, n_part, solutions_per_task)| {
        GeneratorParams {
            max_digit,
            code_length: 4,
            n_part,
            solutions_per_task,
        }
    })
}

/// A part index different from `p` in an `n`-part grid.
fn other(p: usize, n: usize, k: usize) -> usize {
    (p + 1 + k % (n - 1)) % n
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // 1. Generated mappings satisfy every invariant
    #[test]
    fn mapping_is_valid(params in params_strategy(), seed in any::<u64>()) {
        let mapping = TaskCodeGenerator::new(params).generate(seed).unwrap();
        let report = validate_mapping(&mapping);
        prop_assert!(report.is_ok(), "{report}");
    }

    // 2. Union of all codes has exactly n_part² * solutions_per_task members
    #[test]
    fn codes_are_globally_unique(params in params_strategy(), seed in any::<u64>()) {
        let mapping = TaskCodeGenerator::new(params).generate(seed).unwrap();
        let all: HashSet<_> = mapping.all_codes().collect();
        prop_assert_eq!(all.len(), params.n_part * params.n_part * params.solutions_per_task);
        prop_assert_eq!(mapping.len(), params.n_part * params.n_part);
    }

    // 3. Bespoke codes never share a half with their compositional code
    #[test]
    fn exclusion_law(params in params_strategy(), seed in any::<u64>()) {
        let mapping = TaskCodeGenerator::new(params).generate(seed).unwrap();
        let half = params.half_length();
        for (task, sol) in mapping.iter() {
            for code in &sol.bespoke {
                prop_assert_ne!(code.head(half), sol.compositional.head(half), "task {}", task);
                prop_assert_ne!(code.tail(half), sol.compositional.tail(half), "task {}", task);
            }
        }
    }

    // 4. Same parameters and seed give the same mapping
    #[test]
    fn mapping_is_deterministic(params in params_strategy(), seed in any::<u64>()) {
        let generator = TaskCodeGenerator::new(params);
        prop_assert_eq!(generator.generate(seed).unwrap(), generator.generate(seed).unwrap());
    }

    // 5. none → partial → full → exact as compositional evidence accumulates
    #[test]
    fn classifier_progression(
        n in 4usize..=9,
        l in 0usize..9,
        r in 0usize..9,
        k1 in 0usize..8,
        k2 in 0usize..8,
        k3 in 0usize..8,
    ) {
        let target = Task::new(l % n, r % n);
        let far = Task::new(other(target.left, n, k1), other(target.right, n, k2));

        let mut manual = vec![ManualEntry::compositional(far)];
        prop_assert_eq!(classify(&manual, target).overlap, Overlap::None);

        manual.push(ManualEntry::compositional(Task::new(target.left, other(target.right, n, k3))));
        prop_assert_eq!(classify(&manual, target).overlap, Overlap::Partial);

        manual.push(ManualEntry::compositional(Task::new(other(target.left, n, k3), target.right)));
        prop_assert_eq!(classify(&manual, target).overlap, Overlap::Full);

        manual.push(ManualEntry::compositional(target));
        prop_assert_eq!(classify(&manual, target).overlap, Overlap::Exact);
        prop_assert_eq!(classify(&manual, target).availability, Availability::Unavailable);

        manual.push(ManualEntry::bespoke(target));
        prop_assert_eq!(classify(&manual, target).availability, Availability::Available);
    }

    // 6. Two blank grids always compose to blank
    #[test]
    fn blank_composition(w in 1usize..10, h in 1usize..8) {
        let grid: Vec<String> = (0..h).map(|_| "_".repeat(w)).collect();
        let block = compose(&grid, &grid).unwrap();
        prop_assert!(block.chars().all(|c| c == '_' || c == '\n'));
        prop_assert_eq!(block.lines().count(), h);
    }
}
