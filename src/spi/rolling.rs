/// Trailing window sums of `scale` consecutive values.
///
/// Position `i` holds the sum of `values[i + 1 - scale..=i]` when the whole window lies
/// inside the series and contains no missing value; otherwise it is `None`. Partial sums
/// are never produced, so one gap invalidates exactly the `scale` windows that cover it.
///
/// A scale of 1 returns the input unchanged. A scale of 0 has no valid window, so every
/// position is `None`.
pub fn rolling_sum(values: &[Option<f64>], scale: usize) -> Vec<Option<f64>> {
    match scale {
        0 => return vec![None; values.len()],
        1 => return values.to_vec(),
        _ => {}
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < scale {
                return None;
            }
            values[i + 1 - scale..=i]
                .iter()
                .try_fold(0.0, |acc, v| v.map(|x| acc + x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_one_is_pass_through() {
        let values = vec![Some(1.0), None, Some(3.0)];
        assert_eq!(rolling_sum(&values, 1), values);
    }

    #[test]
    fn test_zero_scale_has_no_windows() {
        let values = vec![Some(1.0), Some(2.0), None];
        assert_eq!(rolling_sum(&values, 0), vec![None, None, None]);
    }

    #[test]
    fn test_leading_windows_are_missing() {
        let values: Vec<Option<f64>> = (1..=6).map(|v| Some(v as f64)).collect();
        let sums = rolling_sum(&values, 3);
        assert_eq!(
            sums,
            vec![None, None, Some(6.0), Some(9.0), Some(12.0), Some(15.0)]
        );
    }

    #[test]
    fn test_single_gap_invalidates_exactly_scale_windows() {
        for scale in 1..=6 {
            let mut values: Vec<Option<f64>> = vec![Some(2.0); 30];
            values[15] = None;
            let sums = rolling_sum(&values, scale);

            let invalid: Vec<usize> = sums
                .iter()
                .enumerate()
                .skip(scale - 1)
                .filter(|(_, v)| v.is_none())
                .map(|(i, _)| i)
                .collect();
            let expected: Vec<usize> = (15..15 + scale).collect();
            assert_eq!(invalid, expected, "scale {scale}");

            for (i, v) in sums.iter().enumerate().skip(scale - 1) {
                if !expected.contains(&i) {
                    assert_eq!(*v, Some(2.0 * scale as f64));
                }
            }
        }
    }

    #[test]
    fn test_window_longer_than_series() {
        let values = vec![Some(1.0), Some(2.0)];
        assert_eq!(rolling_sum(&values, 3), vec![None, None]);
        assert!(rolling_sum(&[], 3).is_empty());
    }

    #[test]
    fn test_missing_at_start_delays_first_value() {
        let values = vec![None, Some(1.0), Some(1.0), Some(1.0)];
        assert_eq!(rolling_sum(&values, 3), vec![None, None, None, Some(3.0)]);
    }
}
