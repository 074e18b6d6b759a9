//! Extensions for numbers that are not present in the stable standard library.

pub(crate) trait NumExt: Sized {
    /// Division with rounding up.
    fn div_ceil(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_floor(self, other: Self) -> Self;
}

macro_rules! impl_num_ext {
    ($int:ty) => {
        impl NumExt for $int {
            fn div_ceil(self, other: Self) -> Self {
                // TODO: Taken from the nightly implementation of `div_ceil` and `div_floor` for
                // signed integers. Remove once `int_roundings` is stabilised.
                // Tracking issue: https://github.com/rust-lang/rust/issues/88581
                let d = self / other;
                let r = self % other;
                if (r > 0 && other > 0) || (r < 0 && other < 0) {
                    d + 1
                } else {
                    d
                }
            }

            fn div_floor(self, other: Self) -> Self {
                let d = self / other;
                let r = self % other;
                if (r > 0 && other < 0) || (r < 0 && other > 0) {
                    d - 1
                } else {
                    d
                }
            }
        }
    };
}

impl_num_ext!(i64);
impl_num_ext!(i128);

/// Clamps a wide intermediate result into the `i64` range.
pub(crate) fn saturate_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value > 0 { i64::MAX } else { i64::MIN })
}

/// The distance from `value` to the interval `[lower, upper]`; zero when it lies inside.
pub(crate) fn distance_to_interval(value: i128, lower: i64, upper: i64) -> i64 {
    if value < i128::from(lower) {
        saturate_to_i64(i128::from(lower) - value)
    } else if value > i128::from(upper) {
        saturate_to_i64(value - i128::from(upper))
    } else {
        0
    }
}

/// `|a - b|`, saturating at [`i64::MAX`].
pub(crate) fn absolute_difference(a: i128, b: i128) -> i64 {
    i64::try_from(a.abs_diff(b)).unwrap_or(i64::MAX)
}
