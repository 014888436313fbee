//! Unit conversion utilities for the drawing layer.
//!
//! Shape geometry is stored in master units (576 per inch) and exposed in
//! points (72 per inch). Angles and opacities are stored as 16.16 fixed point.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_CM: i64 = 360_000;

/// Reference coordinate system resolution used by PowerPoint.
pub const MASTER_DPI: i32 = 576;
/// Points per inch.
pub const POINT_DPI: i32 = 72;
/// Pixels per inch of the default screen.
pub const PIXEL_DPI: i32 = 96;

/// Coordinate value meaning "unset"; it bypasses unit conversion.
pub const UNSET_COORDINATE: i32 = -1;

/// 1.0 in 16.16 fixed point.
pub const FIXED_POINT_ONE: i32 = 0x0001_0000;

/// Convert master units to points.
///
/// The `-1` sentinel is passed through unconverted.
///
/// ```
/// use litchi_drawing::common::unit::master_to_points;
/// assert_eq!(master_to_points(576), 72.0);
/// assert_eq!(master_to_points(-1), -1.0);
/// ```
#[inline]
pub fn master_to_points(master: i32) -> f64 {
    if master == UNSET_COORDINATE {
        return UNSET_COORDINATE as f64;
    }
    master as f64 * POINT_DPI as f64 / MASTER_DPI as f64
}

/// Convert points to master units, rounding half to even.
///
/// `-1.0` is the sentinel and maps to `-1`.
///
/// ```
/// use litchi_drawing::common::unit::points_to_master;
/// assert_eq!(points_to_master(72.0), 576);
/// assert_eq!(points_to_master(-1.0), -1);
/// ```
#[inline]
pub fn points_to_master(points: f64) -> i32 {
    if points == UNSET_COORDINATE as f64 {
        return UNSET_COORDINATE;
    }
    (points * MASTER_DPI as f64 / POINT_DPI as f64).round_ties_even() as i32
}

#[inline]
pub fn emu_to_points(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn points_to_emu(points: f64) -> i64 {
    (points * EMUS_PER_PT as f64) as i64
}

/// Decode a 16.16 fixed point value.
///
/// ```
/// use litchi_drawing::common::unit::fixed_point_to_f64;
/// assert_eq!(fixed_point_to_f64(0x0001_8000), 1.5);
/// ```
#[inline]
pub fn fixed_point_to_f64(fixed: i32) -> f64 {
    fixed as f64 / FIXED_POINT_ONE as f64
}

/// Encode a value as 16.16 fixed point, saturating at the `i32` range.
#[inline]
pub fn f64_to_fixed_point(value: f64) -> i32 {
    (value * FIXED_POINT_ONE as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_point_factor_is_eight() {
        assert_eq!(master_to_points(8), 1.0);
        assert_eq!(master_to_points(-16), -2.0);
        assert_eq!(points_to_master(1.5), 12);
        assert_eq!(points_to_master(0.0625), 0);
    }

    #[test]
    fn test_sentinel_is_not_converted() {
        assert_eq!(master_to_points(UNSET_COORDINATE), -1.0);
        assert_eq!(points_to_master(-1.0), UNSET_COORDINATE);
        assert_eq!(points_to_master(master_to_points(-1)), -1);
    }

    #[test]
    fn test_fixed_point() {
        assert_eq!(f64_to_fixed_point(45.0), 45 << 16);
        assert_eq!(f64_to_fixed_point(-30.0), -30 << 16);
        assert_eq!(fixed_point_to_f64(FIXED_POINT_ONE), 1.0);
        assert_eq!(fixed_point_to_f64(f64_to_fixed_point(0.25)), 0.25);
    }

    #[test]
    fn test_emu_points() {
        assert_eq!(emu_to_points(EMUS_PER_INCH), 72.0);
        assert_eq!(points_to_emu(1.0), EMUS_PER_PT);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // -8 master units is exactly -1pt, which collides with the sentinel.
            #[test]
            fn prop_master_round_trip(c in any::<i32>().prop_filter("sentinel image", |c| *c != -8)) {
                prop_assert_eq!(points_to_master(master_to_points(c)), c);
            }
        }
    }
}
