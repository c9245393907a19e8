//! Si5351 registers

use core::marker::PhantomData;

use crate::{ config::*, constants::*, errors::*, fraction::* };

/// Register marker types
macro_rules! gen_register_marker {
    ($(#[$meta:meta])* $r:ident, $reset:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone)]
        pub struct $r {}

        impl Default for Reg<$r> { #[inline] fn default() -> Self { Reg::from_word($reset) } }
    }
}

gen_register_marker!(
    /// CLKn control (16..23)
    ClkControl, 0);
gen_register_marker!(
    /// FBx_INT half of the CLK6 / CLK7 control registers (22, 23)
    PllControl, 0);
gen_register_marker!(
    /// Crystal internal load capacitance (183), low bits are reserved and must be 0b010010
    XtalLoad, 0b0001_0010);
gen_register_marker!(
    /// Output enable control (3), everything disabled out of reset
    OutputEnable, 0xFF);


/// Single 8-bit config register
#[derive(Debug,Copy,Clone)]
pub struct Reg<R> {
    /// Register byte
    pub w: u8,
    phantom: PhantomData<R>,
}

/// Bit operations on register bytes
impl<R> Reg<R> {
    #[inline]
    pub fn from_word(w: u8) -> Self {
        Reg { w, phantom: PhantomData }
    }

    #[inline]
    pub fn get<F>(self: &Self) -> F
    where F: Sized + BitField<R> + From<u8>
    {
        F::from(
            (self.w >> F::offset()) & F::mask()
        )
    }

    #[inline]
    pub fn set<F>(mut self: Self, f: F) -> Self
    where F: Sized + BitField<R> + Into<u8>
    {
        let fbits = (f.into() & F::mask()) << F::offset();
        let rbits = self.w & (! ( F::mask() << F::offset() ));
        self.w = rbits | fbits;
        self
    }
}


/// Bit field inside of an 8-bit register `R`
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u8 {
        ((1u16 << Self::num_bits()) - 1) as u8
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
	($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }
    }
}

/// Single bit flags
macro_rules! gen_bitfield_flag {
	($(#[$meta:meta])*, $r:ty, $n:ident, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug,Copy,Clone,PartialEq,Eq)]
        pub struct $n(pub bool);

        gen_bitfield_impl!($r, $n, 1, $off);

        impl From<u8> for $n { #[inline] fn from(x: u8) -> Self { $n(x != 0) } }
        impl From<$n> for u8 { #[inline] fn from(x: $n) -> u8 { x.0 as u8 } }
	};
}

/// Enums with explicit discriminants
macro_rules! gen_bitfield_enum {
	($r:ty, $n:ident, $nb:tt, $off:tt) => {
        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<$n> for u8 { #[inline] fn from(x: $n) -> u8 { x as u8 } }
    }
}


gen_bitfield_flag!(
    /// CLKn_PDN: 1 powers the output driver down
    , ClkControl, ClkPowerDown, 7
);

gen_bitfield_flag!(
    /// MSn_INT: multisynth integer mode, lower phase noise, only valid
    /// when the divider is an even integer
    , ClkControl, MsIntMode, 6
);

// MSn_SRC: which PLL feeds the multisynth
gen_bitfield_enum!(ClkControl, Pll, 1, 5);

impl From<u8> for Pll {
    #[inline]
    fn from(x: u8) -> Self {
        if x & 1 == 0 { Pll::A } else { Pll::B }
    }
}

gen_bitfield_flag!(
    /// CLKn_INV: invert the output
    , ClkControl, ClkInvert, 4
);

/// CLKn_SRC: output driver input source
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClkSource {
    Xtal = 0b00,
    ClkIn = 0b01,
    /// Multisynth 0 (CLK0..3) or multisynth 4 (CLK4..7)
    MultisynthAlt = 0b10,
    /// Own multisynth
    Multisynth = 0b11,
}
gen_bitfield_enum!(ClkControl, ClkSource, 2, 2);

/// CLKn_IDRV: output drive strength
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveStrength {
    Drive2mA = 0b00,
    Drive4mA = 0b01,
    Drive6mA = 0b10,
    Drive8mA = 0b11,
}
gen_bitfield_enum!(ClkControl, DriveStrength, 2, 0);

gen_bitfield_flag!(
    /// FBA_INT / FBB_INT: feedback multisynth integer mode
    , PllControl, FbIntMode, 6
);

/// XTAL_CL: crystal internal load capacitance
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrystalLoad {
    Load6pF = 0b01,
    Load8pF = 0b10,
    Load10pF = 0b11,
}
gen_bitfield_enum!(XtalLoad, CrystalLoad, 2, 6);


impl Reg<ClkControl> {
    /// Output powered up, driven by its own multisynth at full drive strength
    /// (the `0x0F` low nibble), fed from `pll`.
    pub fn multisynth_output(pll: Pll, int_mode: bool) -> Self {
        Reg::<ClkControl>::default()
            .set(ClkPowerDown(false))
            .set(MsIntMode(int_mode))
            .set(pll)
            .set(ClkSource::Multisynth)
            .set(DriveStrength::Drive8mA)
    }

    /// Output driver powered down
    pub fn powered_down() -> Self {
        Reg::<ClkControl>::default().set(ClkPowerDown(true))
    }
}

/// Output enable bits are active low: a cleared bit enables the clock.
impl Reg<OutputEnable> {
    #[inline]
    pub fn enable(mut self: Self, clk: ClockOutput) -> Self {
        self.w &= !clk.mask();
        self
    }

    #[inline]
    pub fn disable(mut self: Self, clk: ClockOutput) -> Self {
        self.w |= clk.mask();
        self
    }

    #[inline]
    pub fn is_enabled(self: &Self, clk: ClockOutput) -> bool {
        self.w & clk.mask() == 0
    }
}


/// AN619 multisynth parameters for `a + b/c`
///
/// Feedback (PLL) and output multisynths share the encoding.
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MultisynthParams {
    /// MSx_P1, 18 bits
    pub p1: u32,
    /// MSx_P2, 20 bits
    pub p2: u32,
    /// MSx_P3, 20 bits
    pub p3: u32,
}

/// Eight consecutive multisynth parameter registers, lowest address first
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterBlock(pub [u8; MULTISYNTH_BLOCK_LEN]);

impl MultisynthParams {
    /// intermediate = floor(128 * b / c)
    /// P1 = 128 * a + intermediate - 512
    /// P2 = 128 * b - c * intermediate
    /// P3 = intermediate
    pub fn new(a: u32, f: Fraction) -> Result<Self, Error> {
        if f.denominator == 0 {
            return Err(Error::InvalidState);
        }
        let (a, b, c) = (a as i64, f.numerator as i64, f.denominator as i64);

        let intermediate = 128 * b / c;
        let p1 = 128 * a + intermediate - 512;
        let p2 = 128 * b - c * intermediate;
        let p3 = intermediate;

        if !(0 ..= 0x3_FFFF).contains(&p1)
            || !(0 ..= 0xF_FFFF).contains(&p2)
            || !(0 ..= 0xF_FFFF).contains(&p3)
        {
            return Err(Error::InvalidState);
        }

        Ok(MultisynthParams { p1: p1 as u32, p2: p2 as u32, p3: p3 as u32 })
    }

    /// Register layout:
    ///
    /// | # | bits                   |
    /// |---|------------------------|
    /// | 0 | P3[15:8]               |
    /// | 1 | P3[7:0]                |
    /// | 2 | P1[17:16]              |
    /// | 3 | P1[15:8]               |
    /// | 4 | P1[7:0]                |
    /// | 5 | P3[19:16] : P2[19:16]  |
    /// | 6 | P2[15:8]               |
    /// | 7 | P2[7:0]                |
    pub fn to_block(self: &Self) -> RegisterBlock {
        let MultisynthParams { p1, p2, p3 } = *self;
        RegisterBlock([
            ((p3 >> 8) & 0xFF) as u8,
            (p3 & 0xFF) as u8,
            ((p1 >> 16) & 0x03) as u8,
            ((p1 >> 8) & 0xFF) as u8,
            (p1 & 0xFF) as u8,
            (((p3 >> 12) & 0xF0) | ((p2 >> 16) & 0x0F)) as u8,
            ((p2 >> 8) & 0xFF) as u8,
            (p2 & 0xFF) as u8,
        ])
    }
}

/// Packs `a + b/c` into a multisynth register block.
#[inline]
pub fn pack(a: u32, f: Fraction) -> Result<RegisterBlock, Error> {
    MultisynthParams::new(a, f).map(|p| p.to_block())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn frac(numerator: u32, denominator: u32) -> Fraction {
        Fraction { numerator, denominator }
    }

    #[test]
    fn integer_multiplier() {
        // 25 MHz * 32 = 800 MHz
        let p = MultisynthParams::new(32, Fraction::ZERO).unwrap();
        assert_eq!(p, MultisynthParams { p1: 3584, p2: 0, p3: 0 });
        assert_eq!(p.to_block(), RegisterBlock([0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00, 0x00]));
    }

    #[test]
    fn fractional_divider() {
        // 800 MHz / (222 + 2/9) = 3.6 MHz
        let p = MultisynthParams::new(222, frac(2, 9)).unwrap();
        assert_eq!(p, MultisynthParams { p1: 27932, p2: 4, p3: 28 });
        assert_eq!(
            pack(222, frac(2, 9)),
            Ok(RegisterBlock([0x00, 0x1C, 0x00, 0x6D, 0x1C, 0x00, 0x00, 0x04]))
        );
    }

    #[test]
    fn wide_fields() {
        // P1 above 16 bits and P2 above 16 bits
        let p = MultisynthParams::new(1800, frac(1_048_000, 1_048_575)).unwrap();
        assert_eq!(p.p3, 127);
        assert_eq!(p.p1, 128 * 1800 + 127 - 512);
        assert_eq!(p.p2, 128 * 1_048_000 - 1_048_575 * 127);
        assert!(p.p2 > 0xFFFF);

        let b = p.to_block().0;
        assert_eq!(b[2], ((p.p1 >> 16) & 0x03) as u8);
        assert_eq!(b[2] & 0xFC, 0);
        assert_eq!(b[5] & 0x0F, ((p.p2 >> 16) & 0x0F) as u8);
        assert_eq!(b[5] >> 4, 0);
        assert_eq!(u32::from(b[6]) << 8 | u32::from(b[7]), p.p2 & 0xFFFF);
    }

    #[test]
    fn deterministic() {
        let f = frac(1208, 1407);
        assert_eq!(pack(56, f), pack(56, f));
    }

    #[test]
    fn negative_p1_is_rejected() {
        assert_eq!(pack(3, Fraction::ZERO), Err(Error::InvalidState));
        assert_eq!(pack(10, frac(1, 0)), Err(Error::InvalidState));
    }

    #[test]
    fn clock_control_byte() {
        let r = Reg::<ClkControl>::multisynth_output(Pll::A, false);
        assert_eq!(r.w, 0x0F);
        let r = Reg::<ClkControl>::multisynth_output(Pll::B, true);
        assert_eq!(r.w, 0b0110_1111);
        assert_eq!(r.get::<Pll>(), Pll::B);
        assert_eq!(r.get::<MsIntMode>(), MsIntMode(true));
        assert_eq!(r.get::<ClkPowerDown>(), ClkPowerDown(false));
        assert_eq!(Reg::<ClkControl>::powered_down().w, 0x80);
    }

    #[test]
    fn crystal_load_byte() {
        let r = |cl: CrystalLoad| Reg::<XtalLoad>::default().set(cl).w;
        assert_eq!(r(CrystalLoad::Load6pF), 0b0101_0010);
        assert_eq!(r(CrystalLoad::Load8pF), 0b1001_0010);
        assert_eq!(r(CrystalLoad::Load10pF), 0b1101_0010);
    }

    #[test]
    fn output_enable_is_active_low() {
        let r = Reg::<OutputEnable>::from_word(0b1111_0000)
            .enable(ClockOutput::Clk5)
            .disable(ClockOutput::Clk1);
        assert_eq!(r.w, 0b1101_0010);
        assert!(r.is_enabled(ClockOutput::Clk0));
        assert!(!r.is_enabled(ClockOutput::Clk1));
        assert!(!r.is_enabled(ClockOutput::Clk4));
        assert!(r.is_enabled(ClockOutput::Clk5));
    }
}
