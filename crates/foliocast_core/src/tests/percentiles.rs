//! Tests for linear-interpolation percentile computation

use crate::monte_carlo::percentile;

#[test]
fn test_median_odd_count() {
    assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 50.0), 3.0);
}

#[test]
fn test_median_even_count_interpolates() {
    assert_eq!(percentile(&[1.0, 2.0], 50.0), 1.5);
}

#[test]
fn test_empty_input_returns_zero() {
    assert_eq!(percentile(&[], 0.0), 0.0);
    assert_eq!(percentile(&[], 50.0), 0.0);
    assert_eq!(percentile(&[], 100.0), 0.0);
}

#[test]
fn test_out_of_range_p_is_clamped() {
    let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(percentile(&xs, -10.0), percentile(&xs, 0.0));
    assert_eq!(percentile(&xs, -10.0), 1.0);
    assert_eq!(percentile(&xs, 150.0), 5.0);
}

#[test]
fn test_input_order_does_not_matter() {
    assert_eq!(percentile(&[5.0, 1.0, 4.0, 2.0, 3.0], 50.0), 3.0);
}

#[test]
fn test_fractional_index_interpolation() {
    // idx = 0.25 * 3 = 0.75 between 10 and 20.
    assert_eq!(percentile(&[10.0, 20.0, 30.0, 40.0], 25.0), 17.5);
}

#[test]
fn test_single_element() {
    assert_eq!(percentile(&[42.0], 10.0), 42.0);
    assert_eq!(percentile(&[42.0], 90.0), 42.0);
}
