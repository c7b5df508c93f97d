const TOLERANCE: f64 = 1e-6;

pub(crate) trait TestHelper<T> {
    fn assert_approx_eq(&self, expected: T);
}

impl TestHelper<f64> for f64 {
    fn assert_approx_eq(&self, expected: f64) {
        assert!(
            (self - expected).abs() < TOLERANCE,
            "expected {expected}, got {self}"
        );
    }
}

impl<const N: usize> TestHelper<[f64; N]> for [f64] {
    fn assert_approx_eq(&self, expected: [f64; N]) {
        assert_eq!(self.len(), N, "expected {expected:?}, got {self:?}");
        for (actual, expected) in self.iter().zip(expected) {
            actual.assert_approx_eq(expected);
        }
    }
}
