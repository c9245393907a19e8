//! Errors

use core::fmt;

/// Driver errors
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Argument outside of its domain (crystal frequency, clock index, ratio to approximate, ...)
    InvalidInput,
    /// Computed multiplier / divider or requested PLL frequency outside the hardware range
    OutOfRange,
    /// Achievable frequency is too far from the requested one
    ToleranceExceeded,
    /// Continued fraction expansion ran out of iterations
    Unconvergable,
    /// Output divider requested against a PLL that was never configured
    PrerequisiteMissing,
    /// Internal contract violation, register field would be negative or too wide
    InvalidState,
    /// I2C bus failure
    I2c,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidInput => write!(f, "Invalid input"),
            Error::OutOfRange => write!(f, "Value out of range"),
            Error::ToleranceExceeded => write!(f, "Frequency tolerance exceeded"),
            Error::Unconvergable => write!(f, "Could not express ratio as a fraction"),
            Error::PrerequisiteMissing => write!(f, "PLL is not configured"),
            Error::InvalidState => write!(f, "Invalid register state"),
            Error::I2c => write!(f, "I2C communication error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::PrerequisiteMissing.to_string(), "PLL is not configured");
        assert_eq!(Error::I2c.to_string(), "I2C communication error");
    }
}
