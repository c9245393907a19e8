#![cfg_attr(not(test), no_std)]

///! (Si5351)[https://www.silabs.com/timing/clock-generators/si5351] clock generator driver.
///!
///! Fractional PLL multipliers and multisynth dividers are computed as exact
///! `a + b/c` ratios (continued fractions) and packed per AN619.

pub mod constants;
pub mod errors;
pub mod fraction;
pub mod register;
pub mod config;
pub mod xtal;
pub mod frequency;
pub mod device;
