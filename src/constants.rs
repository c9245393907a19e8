//! Constants

/// 7-bit I2C device address
pub const I2C_ADDRESS: u8 = 0x60;

/// Minimum allowed crystal frequency
pub const XTAL_FREQ_MIN: f64 = 10_000_000.0;

/// Maximum allowed crystal frequency
pub const XTAL_FREQ_MAX: f64 = 40_000_000.0;

/// PLL (VCO) min frequency
pub const PLL_FREQ_MIN: f64 = 600_000_000.0;

/// PLL (VCO) max frequency
pub const PLL_FREQ_MAX: f64 = 900_000_000.0;

/// Feedback multisynth, min `a + b/c`
pub const PLL_MULT_MIN: f64 = 15.0;

/// Feedback multisynth, max `a + b/c`
pub const PLL_MULT_MAX: f64 = 90.0;

/// Output multisynth, min `a + b/c`
pub const MS_DIV_MIN: f64 = 6.0;

/// Output multisynth, max `a + b/c`
pub const MS_DIV_MAX: f64 = 1800.0;

/// Max absolute error of the approximated ratio
pub const FRACTION_TOLERANCE: f64 = 1e-10;

/// Max numerator / denominator, width of the P2/P3 register fields (2^20 - 1)
pub const FRACTION_MAX_TERM: u32 = 1_048_575;

/// Continued fraction expansion gives up after this many terms
pub const FRACTION_MAX_ITERATIONS: u32 = 1000;

/// Max distance between requested and achieved PLL frequency, Hz
pub const PLL_FREQ_TOLERANCE_HZ: f64 = 10.0;

/// Max distance between requested and achieved output frequency, Hz
pub const OUT_FREQ_TOLERANCE_HZ: f64 = 10.0;

/// Number of clock outputs
pub const NUM_CLOCKS: u8 = 8;

/// Output enable control, one bit per clock, active low
pub const REG_OUTPUT_ENABLE: u8 = 3;

/// CLK0 control, CLKn is at `REG_CLK0_CONTROL + n`
pub const REG_CLK0_CONTROL: u8 = 16;

/// PLL A feedback integer mode lives in the CLK6 control register (FBA_INT),
/// PLL B in the CLK7 one (FBB_INT)
pub const REG_PLLA_CONTROL: u8 = 22;

/// Feedback multisynth A parameters (8 registers)
pub const REG_PLLA_MULTIPLIER: u8 = 26;

/// Feedback multisynth B parameters (8 registers)
pub const REG_PLLB_MULTIPLIER: u8 = 34;

/// Multisynth 0 parameters, MSn is at `REG_CLK0_DIVIDER + 8 * n`
pub const REG_CLK0_DIVIDER: u8 = 42;

/// Crystal internal load capacitance
pub const REG_XTAL_LOAD: u8 = 183;

/// Size of a multisynth parameter block
pub const MULTISYNTH_BLOCK_LEN: usize = 8;
