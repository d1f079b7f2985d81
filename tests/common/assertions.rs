//! Assertion utilities for testing.
//!
//! Helpers for floating-point comparisons and for colors that come back
//! from the API as hex strings.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that a flat `x, y, z` buffer only holds points at distance
/// `radius` from the origin.
pub fn assert_on_sphere(positions: &[f64], radius: f64, epsilon: Option<f64>) {
    assert_eq!(positions.len() % 3, 0, "Position buffer is not a multiple of 3");

    for (i, p) in positions.chunks(3).enumerate() {
        let length = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        let eps = epsilon.unwrap_or(1e-3 * radius);
        assert!(
            (length - radius).abs() <= eps,
            "Vertex {} is off the sphere: |p| = {}, radius = {}",
            i,
            length,
            radius
        );
    }
}

/// Assert that a string is a `#rrggbb` color.
pub fn assert_hex_color(value: &str) {
    assert!(
        value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit()),
        "Not a #rrggbb color: {}",
        value
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0000001, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_on_sphere() {
        assert_on_sphere(&[1.0, 0.0, 0.0, 0.0, -1.0, 0.0], 1.0, None);
    }

    #[test]
    fn test_assert_hex_color() {
        assert_hex_color("#00ff7f");
    }
}
