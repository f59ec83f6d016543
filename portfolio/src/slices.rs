use std::time::Duration;

/// Splits `budget` proportionally to `weights`.
///
/// Every slice but the last is `floor(budget_ms * weight / sum)`, the last one
/// takes whatever is left, so the slices always add up to exactly `budget`.
pub fn compute_slices(weights: &[u32], budget: Duration) -> Vec<Duration> {
    let Some((_, leading)) = weights.split_last() else {
        return vec![];
    };

    let total: u128 = weights.iter().map(|&weight| u128::from(weight)).sum();
    let budget_ms = budget.as_millis();

    let mut slices = Vec::with_capacity(weights.len());
    let mut allocated = Duration::ZERO;

    for &weight in leading {
        let millis = if total == 0 {
            0
        } else {
            budget_ms * u128::from(weight) / total
        };
        let slice = Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX));

        allocated += slice;
        slices.push(slice);
    }

    slices.push(budget.saturating_sub(allocated));
    slices
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::compute_slices;
    use crate::tables::{ADL_CONFIGS, STRIPS_CONFIGS};

    #[test]
    fn empty_weights() {
        assert!(compute_slices(&[], Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn single_weight_gets_everything() {
        assert_eq!(
            compute_slices(&[7], Duration::from_millis(1234)),
            vec![Duration::from_millis(1234)]
        );
    }

    #[test]
    fn proportional_split() {
        assert_eq!(
            compute_slices(&[1, 1, 2], Duration::from_secs(100)),
            vec![
                Duration::from_secs(25),
                Duration::from_secs(25),
                Duration::from_secs(50)
            ]
        );
    }

    #[test]
    fn remainder_goes_to_last() {
        let slices = compute_slices(&[1, 1, 1], Duration::from_millis(100));
        assert_eq!(
            slices,
            vec![
                Duration::from_millis(33),
                Duration::from_millis(33),
                Duration::from_millis(34)
            ]
        );
    }

    #[test]
    fn sub_millisecond_budget_lands_in_last_slice() {
        let budget = Duration::from_nanos(1_500_000_700);
        let slices = compute_slices(&[1, 2], budget);

        assert_eq!(slices[0], Duration::from_millis(500));
        assert_eq!(slices.iter().sum::<Duration>(), budget);
    }

    #[test]
    fn slices_always_sum_to_budget() {
        let weight_lists: [&[u32]; 6] = [
            &[1],
            &[3, 5],
            &[1, 99, 38, 463],
            &[1, 538, 338, 340, 392, 113, 11],
            &[u32::MAX, u32::MAX, 1],
            &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2],
        ];

        for weights in weight_lists {
            for budget_ms in [0, 1, 7, 999, 1800 * 1000, 123_456_789] {
                let budget = Duration::from_millis(budget_ms);
                let slices = compute_slices(weights, budget);

                assert_eq!(slices.len(), weights.len());
                assert_eq!(slices.iter().sum::<Duration>(), budget, "{weights:?} {budget:?}");
            }
        }
    }

    #[test]
    fn cedalion_adl_slices() {
        let slices = compute_slices(&ADL_CONFIGS.weights(), Duration::from_secs(1800));

        assert_eq!(slices[0], Duration::from_millis(2995));
        assert_eq!(slices[1], Duration::from_millis(296_505));
        assert_eq!(slices[2], Duration::from_millis(113_810));
        assert_eq!(slices[3], Duration::from_millis(1_386_690));
    }

    #[test]
    fn larger_weights_get_larger_slices() {
        let weights = STRIPS_CONFIGS.weights();
        let slices = compute_slices(&weights, Duration::from_secs(1800));

        // 538 vs. 1 in the first two entries.
        assert!(slices[1] > slices[0] * 500);
    }
}
