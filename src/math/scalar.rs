//! Scalar utilities: domain-guarded elementary functions, polynomial
//! approximations and power-of-two helpers.
//!
//! The `fast_*0` variants trade accuracy for speed; the `fast_*1` variants
//! carry more polynomial terms. Each documents its valid input range.

use super::consts::{HALF_PI, RAD_TO_DEG, DEG_TO_RAD};

/// Arc cosine with the input clamped to `[-1, 1]`.
#[inline]
pub fn acos(value: f32) -> f32 {
    if value <= -1.0 {
        std::f32::consts::PI
    } else if value >= 1.0 {
        0.0
    } else {
        value.acos()
    }
}

/// Arc sine with the input clamped to `[-1, 1]`.
#[inline]
pub fn asin(value: f32) -> f32 {
    if value <= -1.0 {
        -HALF_PI
    } else if value >= 1.0 {
        HALF_PI
    } else {
        value.asin()
    }
}

/// Square root. Negative input is a caller error; release builds return 0.
#[inline]
pub fn sqrt(value: f32) -> f32 {
    debug_assert!(value >= 0.0, "sqrt of negative value {value}");
    if value > 0.0 {
        value.sqrt()
    } else {
        0.0
    }
}

/// Reciprocal square root. Non-positive input is a caller error; release
/// builds return 0.
#[inline]
pub fn inv_sqrt(value: f32) -> f32 {
    debug_assert!(value > 0.0, "inv_sqrt of non-positive value {value}");
    if value > 0.0 {
        1.0 / value.sqrt()
    } else {
        0.0
    }
}

/// Natural logarithm, 0 for non-positive input.
#[inline]
pub fn log(value: f32) -> f32 {
    if value > 0.0 {
        value.ln()
    } else {
        0.0
    }
}

/// Base-2 logarithm, 0 for non-positive input.
#[inline]
pub fn log2(value: f32) -> f32 {
    if value > 0.0 {
        value.log2()
    } else {
        0.0
    }
}

/// Base-10 logarithm, 0 for non-positive input.
#[inline]
pub fn log10(value: f32) -> f32 {
    if value > 0.0 {
        value.log10()
    } else {
        0.0
    }
}

/// Sign of `value` as -1, 0 or 1.
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Square of a value.
#[inline]
pub fn sqr(value: f32) -> f32 {
    value * value
}

/// Clamp a value between min and max.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Clamp a value to `[0, 1]`.
#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linear interpolation between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

// === Polynomial approximations ===

/// Sine on `[0, pi/2]`, max error about 1.7e-4.
pub fn fast_sin0(angle: f32) -> f32 {
    let sqr = angle * angle;
    let mut result = 7.61e-03;
    result *= sqr;
    result -= 1.6605e-01;
    result *= sqr;
    result += 1.0;
    result * angle
}

/// Sine on `[0, pi/2]`, max error about 2.3e-9.
pub fn fast_sin1(angle: f32) -> f32 {
    let sqr = angle * angle;
    let mut result = -2.39e-08;
    result *= sqr;
    result += 2.7526e-06;
    result *= sqr;
    result -= 1.98409e-04;
    result *= sqr;
    result += 8.3333315e-03;
    result *= sqr;
    result -= 1.666666664e-01;
    result *= sqr;
    result += 1.0;
    result * angle
}

/// Cosine on `[0, pi/2]`, max error about 1.2e-3.
pub fn fast_cos0(angle: f32) -> f32 {
    let sqr = angle * angle;
    let mut result = 3.705e-02;
    result *= sqr;
    result -= 4.967e-01;
    result *= sqr;
    result + 1.0
}

/// Cosine on `[0, pi/2]`, max error about 2.3e-9.
pub fn fast_cos1(angle: f32) -> f32 {
    let sqr = angle * angle;
    let mut result = -2.605e-07;
    result *= sqr;
    result += 2.47609e-05;
    result *= sqr;
    result -= 1.3888397e-03;
    result *= sqr;
    result += 4.16666418e-02;
    result *= sqr;
    result -= 4.999999963e-01;
    result *= sqr;
    result + 1.0
}

/// Tangent on `[0, pi/4]`, max error about 8.1e-4.
pub fn fast_tan0(angle: f32) -> f32 {
    let sqr = angle * angle;
    let mut result = 2.033e-01;
    result *= sqr;
    result += 3.1755e-01;
    result *= sqr;
    result += 1.0;
    result * angle
}

/// Tangent on `[0, pi/4]`, max error about 1.9e-8.
pub fn fast_tan1(angle: f32) -> f32 {
    let sqr = angle * angle;
    let mut result = 9.5168091e-03;
    result *= sqr;
    result += 2.900525e-03;
    result *= sqr;
    result += 2.45650893e-02;
    result *= sqr;
    result += 5.33740603e-02;
    result *= sqr;
    result += 1.333923995e-01;
    result *= sqr;
    result += 3.333314036e-01;
    result *= sqr;
    result += 1.0;
    result * angle
}

/// Arc sine on `[0, 1]`, max error about 6.8e-5.
pub fn fast_inv_sin0(value: f32) -> f32 {
    let root = sqrt(1.0 - value);
    let mut result = -0.0187293;
    result *= value;
    result += 0.0742610;
    result *= value;
    result -= 0.2121144;
    result *= value;
    result += 1.5707288;
    HALF_PI - root * result
}

/// Arc sine on `[0, 1]`, max error about 2.2e-8.
pub fn fast_inv_sin1(value: f32) -> f32 {
    HALF_PI - fast_inv_cos1(value)
}

/// Arc cosine on `[0, 1]`, max error about 6.8e-5.
pub fn fast_inv_cos0(value: f32) -> f32 {
    let root = sqrt(1.0 - value);
    let mut result = -0.0187293;
    result *= value;
    result += 0.0742610;
    result *= value;
    result -= 0.2121144;
    result *= value;
    result += 1.5707288;
    root * result
}

/// Arc cosine on `[0, 1]`, max error about 2.2e-8.
pub fn fast_inv_cos1(value: f32) -> f32 {
    let root = sqrt(1.0 - value);
    let mut result = -0.0012624911;
    result *= value;
    result += 0.0066700901;
    result *= value;
    result -= 0.0170881256;
    result *= value;
    result += 0.0308918810;
    result *= value;
    result -= 0.0501743046;
    result *= value;
    result += 0.0889789874;
    result *= value;
    result -= 0.2145988016;
    result *= value;
    result += 1.5707963050;
    root * result
}

/// Arc tangent on `[-1, 1]`, max error about 1.2e-5.
pub fn fast_inv_tan0(value: f32) -> f32 {
    let sqr = value * value;
    let mut result = 0.0208351;
    result *= sqr;
    result -= 0.085133;
    result *= sqr;
    result += 0.180141;
    result *= sqr;
    result -= 0.3302995;
    result *= sqr;
    result += 0.999866;
    result * value
}

/// Arc tangent on `[-1, 1]`, max error about 1.3e-8.
pub fn fast_inv_tan1(value: f32) -> f32 {
    let sqr = value * value;
    let mut result = 0.0028662257;
    result *= sqr;
    result -= 0.0161657367;
    result *= sqr;
    result += 0.0429096138;
    result *= sqr;
    result -= 0.0752896400;
    result *= sqr;
    result += 0.1065626393;
    result *= sqr;
    result -= 0.1420889944;
    result *= sqr;
    result += 0.1999355085;
    result *= sqr;
    result -= 0.3333314528;
    result *= sqr;
    result += 1.0;
    result * value
}

/// `exp(-x)` for `x >= 0`, max error about 2.4e-4.
pub fn fast_neg_exp0(value: f32) -> f32 {
    let mut result = 0.0038278;
    result *= value;
    result += 0.0292732;
    result *= value;
    result += 0.2507213;
    result *= value;
    result += 1.0;
    result *= result;
    result *= result;
    1.0 / result
}

/// `exp(-x)` for `x >= 0`, max error about 2.4e-5.
pub fn fast_neg_exp1(value: f32) -> f32 {
    let mut result = 0.00026695;
    result *= value;
    result += 0.00227723;
    result *= value;
    result += 0.03158565;
    result *= value;
    result += 0.24991035;
    result *= value;
    result += 1.0;
    result *= result;
    result *= result;
    1.0 / result
}

/// `exp(-x)` for `x >= 0`, max error about 2.4e-6.
pub fn fast_neg_exp2(value: f32) -> f32 {
    let mut result = 0.000014876;
    result *= value;
    result += 0.000127992;
    result *= value;
    result += 0.002673255;
    result *= value;
    result += 0.031198056;
    result *= value;
    result += 0.250010936;
    result *= value;
    result += 1.0;
    result *= result;
    result *= result;
    1.0 / result
}

/// `exp(-x)` for `x >= 0`, max error about 2.5e-7.
pub fn fast_neg_exp3(value: f32) -> f32 {
    let mut result = 0.0000006906;
    result *= value;
    result += 0.0000054302;
    result *= value;
    result += 0.0001715620;
    result *= value;
    result += 0.0025913712;
    result *= value;
    result += 0.0312575832;
    result *= value;
    result += 0.2499986842;
    result *= value;
    result += 1.0;
    result *= result;
    result *= result;
    1.0 / result
}

// === Power of two ===

/// True when `value` is a positive power of two.
#[inline]
pub fn is_power_of_two(value: u32) -> bool {
    value > 0 && (value & (value - 1)) == 0
}

/// `log2(value)` for a power of two.
#[inline]
pub fn log2_of_power_of_two(value: u32) -> u32 {
    debug_assert!(is_power_of_two(value), "{value} is not a power of two");
    value.trailing_zeros()
}

/// Smallest power of two greater than or equal to `value` (1 for 0).
#[inline]
pub fn next_power_of_two(value: u32) -> u32 {
    value.max(1).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(max: f32) -> impl Iterator<Item = f32> {
        (0..=64).map(move |i| max * i as f32 / 64.0)
    }

    #[test]
    fn test_guarded_trig() {
        assert_eq!(acos(2.0), 0.0);
        assert_eq!(acos(-2.0), std::f32::consts::PI);
        assert_eq!(asin(1.5), HALF_PI);
        assert_eq!(asin(-1.5), -HALF_PI);
        assert!((acos(0.5) - 0.5f32.acos()).abs() < 1e-6);
    }

    #[test]
    fn test_angle_conversion() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!((rad_to_deg(HALF_PI) - 90.0).abs() < 1e-4);
        assert!((DEG_TO_RAD * RAD_TO_DEG - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_guarded_log() {
        assert_eq!(log(0.0), 0.0);
        assert_eq!(log(-3.0), 0.0);
        assert_eq!(log2(8.0), 3.0);
        assert!((log10(1000.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sign_and_saturate() {
        assert_eq!(sign(-4.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(saturate(1.7), 1.0);
        assert_eq!(saturate(-0.2), 0.0);
        assert_eq!(sqr(3.0), 9.0);
    }

    #[test]
    fn test_fast_trig_accuracy() {
        for x in samples(HALF_PI) {
            assert!((fast_sin0(x) - x.sin()).abs() < 2e-3);
            assert!((fast_sin1(x) - x.sin()).abs() < 1e-5);
            assert!((fast_cos0(x) - x.cos()).abs() < 2e-3);
            assert!((fast_cos1(x) - x.cos()).abs() < 1e-5);
        }
        for x in samples(std::f32::consts::FRAC_PI_4) {
            assert!((fast_tan0(x) - x.tan()).abs() < 2e-3);
            assert!((fast_tan1(x) - x.tan()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_fast_inverse_trig_accuracy() {
        for x in samples(1.0) {
            assert!((fast_inv_sin0(x) - x.asin()).abs() < 1e-3);
            assert!((fast_inv_sin1(x) - x.asin()).abs() < 1e-5);
            assert!((fast_inv_cos0(x) - x.acos()).abs() < 1e-3);
            assert!((fast_inv_cos1(x) - x.acos()).abs() < 1e-5);
            assert!((fast_inv_tan0(x) - x.atan()).abs() < 1e-4);
            assert!((fast_inv_tan1(-x) - (-x).atan()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_fast_neg_exp_accuracy() {
        for x in samples(4.0) {
            let exact = (-x).exp();
            assert!((fast_neg_exp0(x) - exact).abs() < 1e-3);
            assert!((fast_neg_exp1(x) - exact).abs() < 1e-4);
            assert!((fast_neg_exp2(x) - exact).abs() < 1e-5);
            assert!((fast_neg_exp3(x) - exact).abs() < 5e-6);
        }
    }

    #[test]
    fn test_power_of_two() {
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(1024));
        assert!(!is_power_of_two(0));
        assert!(!is_power_of_two(12));
        assert_eq!(log2_of_power_of_two(256), 8);
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(17), 32);
        assert_eq!(next_power_of_two(64), 64);
    }
}
