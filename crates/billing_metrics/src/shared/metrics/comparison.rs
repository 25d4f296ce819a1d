/// Values of the `len` positions right before `start`, aligned with the
/// current window position by position.
///
/// When fewer than `len` earlier values exist the result is left-padded with
/// `None`, so it always has exactly `len` entries.
pub fn previous_window(column: &[Option<f64>], start: usize, len: usize) -> Vec<Option<f64>> {
    let start = start.min(column.len());
    let available = start.min(len);

    let mut previous = Vec::with_capacity(len);
    previous.resize(len - available, None);
    previous.extend_from_slice(&column[start - available..start]);
    previous
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(n: usize) -> Vec<Option<f64>> {
        (0..n).map(|i| Some(i as f64)).collect()
    }

    #[test]
    fn test_full_history() {
        let prev = previous_window(&column(20), 13, 7);
        assert_eq!(
            prev,
            vec![Some(6.0), Some(7.0), Some(8.0), Some(9.0), Some(10.0), Some(11.0), Some(12.0)]
        );
    }

    #[test]
    fn test_short_history_is_left_padded() {
        let prev = previous_window(&column(10), 3, 7);
        assert_eq!(prev.len(), 7);
        assert_eq!(&prev[..4], &[None, None, None, None]);
        assert_eq!(&prev[4..], &[Some(0.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_window_at_start_has_no_comparison() {
        let prev = previous_window(&column(12), 0, 12);
        assert_eq!(prev, vec![None; 12]);
    }

    #[test]
    fn test_gaps_are_kept() {
        let col = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        assert_eq!(previous_window(&col, 3, 3), vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_empty_window() {
        assert!(previous_window(&column(5), 5, 0).is_empty());
        assert!(previous_window(&[], 0, 0).is_empty());
    }
}
