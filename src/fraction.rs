//! Best rational approximation of a ratio in `[0, 1]`.
//!
//! Walks the continued fraction convergents of `x` until one is within
//! tolerance. Convergents are the best approximations for their denominator
//! size, so the first one that fits is also the smallest.

use libm::{fabs, floor};

use crate::errors::*;

/// `numerator / denominator`, `denominator >= 1`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    /// `0 / 1`
    pub const ZERO: Fraction = Fraction { numerator: 0, denominator: 1 };

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// Finds `p/q` with `|p/q - x| < tolerance` and both `p, q <= max_term`.
///
/// `x` must lie in `[0, 1]`, otherwise `Error::InvalidInput`.
/// Fails with `Error::InvalidInput` when the first convergent within tolerance
/// does not fit into `max_term` (never clamped), and with `Error::Unconvergable`
/// when `max_iterations` convergents were not enough.
pub fn approximate(
    x: f64,
    tolerance: f64,
    max_term: u32,
    max_iterations: u32,
) -> Result<Fraction, Error> {
    if !(0.0..=1.0).contains(&x) {
        return Err(Error::InvalidInput);
    }
    if x == 0.0 {
        return Ok(Fraction::ZERO);
    }

    // h(n-2)/k(n-2) and h(n-1)/k(n-1)
    let (mut h0, mut k0) = (0.0f64, 1.0f64);
    let (mut h1, mut k1) = (1.0f64, 0.0f64);
    let mut g = x;

    for _ in 0..max_iterations {
        let s = floor(g);
        let num = h0 + s * h1;
        let den = k0 + s * k1;
        h0 = h1;
        k0 = k1;
        h1 = num;
        k1 = den;

        if fabs(num / den - x) < tolerance {
            if num > max_term as f64 || den > max_term as f64 {
                return Err(Error::InvalidInput);
            }
            return Ok(Fraction { numerator: num as u32, denominator: den as u32 });
        }

        // nothing left to expand
        if g == s {
            return Err(Error::Unconvergable);
        }
        g = 1.0 / (g - s);
    }

    Err(Error::Unconvergable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn approx(x: f64) -> Result<Fraction, Error> {
        approximate(x, FRACTION_TOLERANCE, FRACTION_MAX_TERM, FRACTION_MAX_ITERATIONS)
    }

    #[test]
    fn zero_is_exact() {
        assert_eq!(approx(0.0), Ok(Fraction { numerator: 0, denominator: 1 }));
        assert!(approx(0.0).unwrap().is_zero());
    }

    #[test]
    fn one_is_exact() {
        assert_eq!(approx(1.0), Ok(Fraction { numerator: 1, denominator: 1 }));
    }

    #[test]
    fn out_of_domain() {
        assert_eq!(approx(-0.25), Err(Error::InvalidInput));
        assert_eq!(approx(1.5), Err(Error::InvalidInput));
        assert_eq!(approx(f64::NAN), Err(Error::InvalidInput));
    }

    #[test]
    fn recovers_small_fractions() {
        for q in 2..200u32 {
            for p in 1..q {
                if gcd(p, q) != 1 {
                    continue;
                }
                let f = approx(p as f64 / q as f64).unwrap();
                assert_eq!((f.numerator, f.denominator), (p, q), "{}/{}", p, q);
            }
        }
    }

    #[test]
    fn recovers_large_fractions() {
        let cases = [
            (524_287, 1_048_575),
            (1, 1_048_575),
            (1_048_573, 1_048_574),
            (777_777, 1_000_003),
        ];
        for &(p, q) in cases.iter() {
            let f = approximate(p as f64 / q as f64, 1e-14, FRACTION_MAX_TERM, FRACTION_MAX_ITERATIONS);
            assert_eq!(f, Ok(Fraction { numerator: p, denominator: q }), "{}/{}", p, q);
        }
    }

    #[test]
    fn recovers_divider_remainders() {
        // 800 MHz / 3.6 MHz, 800 MHz / 14.07 MHz, 600 MHz / 28 MHz
        assert_eq!(approx(800.0 / 3.6 - 222.0), Ok(Fraction { numerator: 2, denominator: 9 }));
        assert_eq!(
            approx(800.0 / 14.07 - 56.0),
            Ok(Fraction { numerator: 1208, denominator: 1407 })
        );
        assert_eq!(approx(600.0 / 28.0 - 21.0), Ok(Fraction { numerator: 3, denominator: 7 }));
    }

    #[test]
    fn within_tolerance_or_error() {
        let xs = [0.1, 0.333_333_333_3, 0.141_592_653_589_793, 0.718_281_828_459_045, 0.999_999];
        for &x in xs.iter() {
            for &tol in [1e-7, 1e-9, 1e-10, 1e-12].iter() {
                match approximate(x, tol, FRACTION_MAX_TERM, FRACTION_MAX_ITERATIONS) {
                    Ok(f) => {
                        assert!((f.value() - x).abs() < tol, "{} {:?}", x, f);
                        assert!(f.denominator >= 1 && f.denominator <= FRACTION_MAX_TERM);
                        assert!(f.numerator <= FRACTION_MAX_TERM);
                    }
                    Err(e) => assert!(e == Error::InvalidInput || e == Error::Unconvergable),
                }
            }
        }
    }

    #[test]
    fn smallest_convergent_wins() {
        // pi - 3, loose tolerance stops at 1/7 (22/7)
        let f = approximate(core::f64::consts::PI - 3.0, 1e-2, FRACTION_MAX_TERM, 100).unwrap();
        assert_eq!(f, Fraction { numerator: 1, denominator: 7 });
        // 355/113 is within 3e-7
        let f = approximate(core::f64::consts::PI - 3.0, 1e-6, FRACTION_MAX_TERM, 100).unwrap();
        assert_eq!(f, Fraction { numerator: 16, denominator: 113 });
    }

    #[test]
    fn term_bound_is_not_clamped() {
        assert_eq!(approximate(1.0 / 997.0, 1e-12, 100, 100), Err(Error::InvalidInput));
    }

    #[test]
    fn iteration_budget() {
        assert_eq!(
            approximate(core::f64::consts::PI - 3.0, 1e-12, FRACTION_MAX_TERM, 2),
            Err(Error::Unconvergable)
        );
    }

    fn gcd(a: u32, b: u32) -> u32 {
        if b == 0 { a } else { gcd(b, a % b) }
    }
}
