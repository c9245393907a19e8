///! Crystal reference config
///! Frequency / internal load capacitance

use crate::{ constants::*, errors::*, register::* };


/// Crystal reference
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Xtal {
    /// Crystal frequency, Hz
    f: f64,
    /// Internal load capacitance
    load: CrystalLoad,
}

impl Xtal {

    /// Configure crystal reference.
    /// Frequency must be within 10 MHz ..= 40 MHz (25 or 27 MHz recommended).
    pub fn new(
        f: f64,
        load: CrystalLoad,
    ) -> Result<Self, Error> {
        (if !(XTAL_FREQ_MIN ..= XTAL_FREQ_MAX).contains(&f) { Err(Error::InvalidInput) } else { Ok(()) })?;
        Ok(Xtal { f, load })
    }

    /// 25 MHz crystal, 10 pF load, as found on the Adafruit breakout
    pub fn adafruit_module() -> Self {
        Xtal { f: 25_000_000.0, load: CrystalLoad::Load10pF }
    }

    #[inline]
    pub fn frequency(self: &Self) -> f64 {
        self.f
    }

    #[inline]
    pub fn load(self: &Self) -> CrystalLoad {
        self.load
    }

    /// XTAL_CL register value
    #[inline]
    pub fn load_register(self: &Self) -> Reg<XtalLoad> {
        Reg::<XtalLoad>::default().set(self.load)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_range() {
        assert!(Xtal::new(25e6, CrystalLoad::Load10pF).is_ok());
        assert!(Xtal::new(10e6, CrystalLoad::Load6pF).is_ok());
        assert!(Xtal::new(40e6, CrystalLoad::Load8pF).is_ok());
        assert_eq!(Xtal::new(9_999_999.0, CrystalLoad::Load10pF), Err(Error::InvalidInput));
        assert_eq!(Xtal::new(40_000_001.0, CrystalLoad::Load10pF), Err(Error::InvalidInput));
        assert_eq!(Xtal::new(f64::NAN, CrystalLoad::Load10pF), Err(Error::InvalidInput));
    }

    #[test]
    fn load_register() {
        assert_eq!(Xtal::adafruit_module().load_register().w, 0xD2);
        assert_eq!(Xtal::new(27e6, CrystalLoad::Load6pF).unwrap().load_register().w, 0x52);
    }
}
