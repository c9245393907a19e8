///! Frequency calculations

use libm::{fabs, floor};

use crate::{ config::*, constants::*, errors::*, fraction::*, register::* };


/// `ratio = a + b/c` with `b/c` the best fraction within tolerance
fn split_ratio(ratio: f64, tuning: &Tuning) -> Result<(u32, Fraction), Error> {
    if !ratio.is_finite() || ratio < 0.0 || ratio > u32::MAX as f64 {
        return Err(Error::OutOfRange);
    }
    let a = floor(ratio);
    let remainder = ratio - a;
    let f = approximate(remainder, tuning.ratio_tolerance, tuning.max_term, tuning.max_iterations)?;
    // remainder rounded up to a whole
    if f.numerator == f.denominator {
        return Ok((a as u32 + 1, Fraction::ZERO));
    }
    Ok((a as u32, f))
}

/// Integer mode is only valid for even integer ratios
#[inline]
fn is_even_integer(a: u32, f: &Fraction) -> bool {
    f.is_zero() && a % 2 == 0
}


/// Feedback multisynth (PLL multiplier) settings
///
/// f PLL = f XTAL × (a + b/c), 15 ≤ a + b/c ≤ 90
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PllPlan {
    /// `a`
    pub integer_part: u32,
    /// `b/c`
    pub fraction: Fraction,
    /// Frequency the PLL will actually lock to, Hz
    pub achieved_frequency: f64,
    /// FBx_INT should be set
    pub integer_mode: bool,
}

impl PllPlan {

    /// Multiplier settings that take `xtal_hz` to `target_hz`.
    ///
    /// `target_hz` must be within 600 MHz ..= 900 MHz, the achieved frequency
    /// must be within `tuning.pll_tolerance_hz` of it.
    pub fn new(xtal_hz: f64, target_hz: f64, tuning: &Tuning) -> Result<Self, Error> {
        (if !(PLL_FREQ_MIN ..= PLL_FREQ_MAX).contains(&target_hz) { Err(Error::OutOfRange) } else { Ok(()) })?;
        (if !(xtal_hz > 0.0) { Err(Error::InvalidInput) } else { Ok(()) })?;

        let (a, fraction) = split_ratio(target_hz / xtal_hz, tuning)?;
        let multiplier = a as f64 + fraction.value();
        let achieved_frequency = xtal_hz * multiplier;

        if fabs(target_hz - achieved_frequency) > tuning.pll_tolerance_hz {
            return Err(Error::ToleranceExceeded);
        }
        (if !(PLL_MULT_MIN ..= PLL_MULT_MAX).contains(&multiplier) { Err(Error::OutOfRange) } else { Ok(()) })?;

        Ok(PllPlan {
            integer_part: a,
            fraction,
            achieved_frequency,
            integer_mode: is_even_integer(a, &fraction),
        })
    }

    /// a + b/c
    #[inline]
    pub fn multiplier(self: &Self) -> f64 {
        self.integer_part as f64 + self.fraction.value()
    }

    /// Feedback multisynth parameter registers
    #[inline]
    pub fn registers(self: &Self) -> Result<RegisterBlock, Error> {
        pack(self.integer_part, self.fraction)
    }

    /// `current` FBx_INT register with the integer mode bit set or cleared
    #[inline]
    pub fn control(self: &Self, current: Reg<PllControl>) -> Reg<PllControl> {
        current.set(FbIntMode(self.integer_mode))
    }
}


/// Output multisynth (divider) settings
///
/// f OUT = f PLL / (a + b/c), 6 ≤ a + b/c ≤ 1800
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DividerPlan {
    /// `a`
    pub integer_part: u32,
    /// `b/c`
    pub fraction: Fraction,
    /// Output frequency, Hz
    pub achieved_frequency: f64,
    /// MSn_INT should be set
    pub integer_mode: bool,
}

impl DividerPlan {

    /// Divider settings that take `pll_hz` (the achieved PLL frequency) to `target_hz`.
    ///
    /// `pll_hz == 0` means the PLL was never configured.
    pub fn new(pll_hz: f64, target_hz: f64, tuning: &Tuning) -> Result<Self, Error> {
        (if !(target_hz.is_finite() && target_hz > 0.0) { Err(Error::InvalidInput) } else { Ok(()) })?;
        (if !(pll_hz > 0.0) { Err(Error::PrerequisiteMissing) } else { Ok(()) })?;

        let (a, fraction) = split_ratio(pll_hz / target_hz, tuning)?;
        let divider = a as f64 + fraction.value();
        (if !(MS_DIV_MIN ..= MS_DIV_MAX).contains(&divider) { Err(Error::OutOfRange) } else { Ok(()) })?;

        let achieved_frequency = pll_hz / divider;
        if fabs(target_hz - achieved_frequency) > tuning.output_tolerance_hz {
            return Err(Error::ToleranceExceeded);
        }

        Ok(DividerPlan {
            integer_part: a,
            fraction,
            achieved_frequency,
            integer_mode: is_even_integer(a, &fraction),
        })
    }

    /// a + b/c
    #[inline]
    pub fn divider(self: &Self) -> f64 {
        self.integer_part as f64 + self.fraction.value()
    }

    /// Output multisynth parameter registers
    #[inline]
    pub fn registers(self: &Self) -> Result<RegisterBlock, Error> {
        pack(self.integer_part, self.fraction)
    }

    /// CLKn control register value
    #[inline]
    pub fn control(self: &Self, pll: Pll) -> Reg<ClkControl> {
        Reg::<ClkControl>::multisynth_output(pll, self.integer_mode)
    }
}
