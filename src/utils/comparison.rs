use std::borrow::Borrow;

use crate::constants::EPSILON;
use crate::models::FloatType;

/// Extension trait enabling float comparison using an epsilon value
pub trait FloatCompare<T> {
    fn approx_lt(&self, other: T) -> bool;
    fn approx_lte(&self, other: T) -> bool;
    fn approx_gt(&self, other: T) -> bool;
    fn approx_gte(&self, other: T) -> bool;
    fn approx_eq(&self, other: T) -> bool;
}

impl<T: Borrow<FloatType>> FloatCompare<T> for FloatType {
    fn approx_lt(&self, other: T) -> bool {
        *self < other.borrow() - EPSILON
    }

    fn approx_lte(&self, other: T) -> bool {
        self < other.borrow() || self.approx_eq(other)
    }

    fn approx_gt(&self, other: T) -> bool {
        *self > other.borrow() + EPSILON
    }

    fn approx_gte(&self, other: T) -> bool {
        self > other.borrow() || self.approx_eq(other)
    }

    fn approx_eq(&self, other: T) -> bool {
        (self - other.borrow()).abs() < EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_approx_lt() {
        assert_eq!(false, 1.0.approx_lt(0.9));
        assert_eq!(false, 1.0.approx_lt(0.999_999_8));
        assert_eq!(false, 1.0.approx_lt(0.999_999_95));
        assert_eq!(false, 1.0.approx_lt(1.0));
        assert_eq!(false, 1.0.approx_lt(1.000_000_05));
        assert_eq!(true, 1.0.approx_lt(1.000_000_2));
        assert_eq!(true, 1.0.approx_lt(1.1));
    }

    #[test]
    fn f64_approx_lte() {
        assert_eq!(false, 1.0.approx_lte(0.9));
        assert_eq!(false, 1.0.approx_lte(0.999_999_8));
        assert_eq!(true, 1.0.approx_lte(0.999_999_95));
        assert_eq!(true, 1.0.approx_lte(1.0));
        assert_eq!(true, 1.0.approx_lte(1.000_000_05));
        assert_eq!(true, 1.0.approx_lte(1.000_000_2));
        assert_eq!(true, 1.0.approx_lte(1.1));
    }

    #[test]
    fn f64_approx_gt() {
        assert_eq!(true, 1.0.approx_gt(0.9));
        assert_eq!(true, 1.0.approx_gt(0.999_999_8));
        assert_eq!(false, 1.0.approx_gt(0.999_999_95));
        assert_eq!(false, 1.0.approx_gt(1.0));
        assert_eq!(false, 1.0.approx_gt(1.000_000_05));
        assert_eq!(false, 1.0.approx_gt(1.000_000_2));
        assert_eq!(false, 1.0.approx_gt(1.1));
    }

    #[test]
    fn f64_approx_gte() {
        assert_eq!(true, 1.0.approx_gte(0.9));
        assert_eq!(true, 1.0.approx_gte(0.999_999_8));
        assert_eq!(true, 1.0.approx_gte(0.999_999_95));
        assert_eq!(true, 1.0.approx_gte(1.0));
        assert_eq!(true, 1.0.approx_gte(1.000_000_05));
        assert_eq!(false, 1.0.approx_gte(1.000_000_2));
        assert_eq!(false, 1.0.approx_gte(1.1));
    }

    #[test]
    fn f64_approx_eq() {
        assert_eq!(false, 1.0.approx_eq(0.9));
        assert_eq!(false, 1.0.approx_eq(0.999_999_8));
        assert_eq!(true, 1.0.approx_eq(0.999_999_95));
        assert_eq!(true, 1.0.approx_eq(1.0));
        assert_eq!(true, 1.0.approx_eq(1.000_000_05));
        assert_eq!(false, 1.0.approx_eq(1.000_000_2));
        assert_eq!(false, 1.0.approx_eq(1.1));
    }

    #[test]
    fn snapping_bounds() {
        assert!((1e-8).approx_eq(0.0));
        assert!(!(1e-6).approx_eq(0.0));
        assert!((1.0 - 1e-8).approx_gte(1.0));
    }
}
