///! Device configuration: PLL / clock selectors, numeric tuning

use core::convert::TryFrom;

use crate::{ constants::*, errors::* };


/// PLL selector
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pll {
    A = 0,
    B = 1,
}

impl Pll {
    /// First of the 8 feedback multisynth parameter registers
    #[inline]
    pub fn multiplier_register(self: Self) -> u8 {
        match self {
            Pll::A => REG_PLLA_MULTIPLIER,
            Pll::B => REG_PLLB_MULTIPLIER,
        }
    }

    /// Register holding the FBx_INT bit
    #[inline]
    pub fn control_register(self: Self) -> u8 {
        REG_PLLA_CONTROL + self as u8
    }
}


/// Clock output selector
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockOutput {
    Clk0 = 0,
    Clk1,
    Clk2,
    Clk3,
    Clk4,
    Clk5,
    Clk6,
    Clk7,
}

impl ClockOutput {
    pub const ALL: [ClockOutput; NUM_CLOCKS as usize] = [
        ClockOutput::Clk0,
        ClockOutput::Clk1,
        ClockOutput::Clk2,
        ClockOutput::Clk3,
        ClockOutput::Clk4,
        ClockOutput::Clk5,
        ClockOutput::Clk6,
        ClockOutput::Clk7,
    ];

    #[inline]
    pub fn index(self: Self) -> u8 {
        self as u8
    }

    /// Bit in the output enable register
    #[inline]
    pub fn mask(self: Self) -> u8 {
        1 << self.index()
    }

    /// CLKn control register
    #[inline]
    pub fn control_register(self: Self) -> u8 {
        REG_CLK0_CONTROL + self.index()
    }

    /// First of the 8 output multisynth parameter registers
    #[inline]
    pub fn divider_register(self: Self) -> u8 {
        REG_CLK0_DIVIDER + (MULTISYNTH_BLOCK_LEN as u8) * self.index()
    }
}

impl TryFrom<u8> for ClockOutput {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self, Error> {
        ClockOutput::ALL.get(n as usize).copied().ok_or(Error::InvalidInput)
    }
}


/// Numeric knobs of the frequency planner.
///
/// Defaults match the hardware: 20-bit fraction terms, 10 Hz tolerance.
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuning {
    /// Max absolute error of a multiplier / divider fraction
    pub ratio_tolerance: f64,
    /// Max fraction numerator / denominator
    pub max_term: u32,
    /// Continued fraction expansion limit
    pub max_iterations: u32,
    /// Max |requested - achieved| PLL frequency, Hz
    pub pll_tolerance_hz: f64,
    /// Max |requested - achieved| output frequency, Hz
    pub output_tolerance_hz: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            ratio_tolerance: FRACTION_TOLERANCE,
            max_term: FRACTION_MAX_TERM,
            max_iterations: FRACTION_MAX_ITERATIONS,
            pll_tolerance_hz: PLL_FREQ_TOLERANCE_HZ,
            output_tolerance_hz: OUT_FREQ_TOLERANCE_HZ,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_map() {
        assert_eq!(Pll::A.multiplier_register(), 26);
        assert_eq!(Pll::B.multiplier_register(), 34);
        assert_eq!(Pll::A.control_register(), 22);
        assert_eq!(Pll::B.control_register(), 23);

        assert_eq!(ClockOutput::Clk0.divider_register(), 42);
        assert_eq!(ClockOutput::Clk2.divider_register(), 58);
        assert_eq!(ClockOutput::Clk0.control_register(), 16);
        assert_eq!(ClockOutput::Clk7.control_register(), 23);
        assert_eq!(ClockOutput::Clk3.mask(), 0b0000_1000);
    }

    #[test]
    fn clock_index_range() {
        for n in 0..8u8 {
            assert_eq!(ClockOutput::try_from(n).map(|c| c.index()), Ok(n));
        }
        assert_eq!(ClockOutput::try_from(8), Err(Error::InvalidInput));
        assert_eq!(ClockOutput::try_from(255), Err(Error::InvalidInput));
    }
}
