///! Device

use embedded_hal::blocking::i2c::{ Write, WriteRead };


use crate::{ config::*, constants::*, errors::*, frequency::*, register::*, xtal::* };


/// What the driver remembers between calls.
#[derive(Debug,Copy,Clone,PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthesizerState {
    pub xtal: Xtal,
    /// Achieved PLL A frequency, Hz, 0 = never configured
    pub plla_frequency: f64,
    /// Achieved PLL B frequency, Hz, 0 = never configured
    pub pllb_frequency: f64,
}

impl SynthesizerState {
    pub fn new(xtal: Xtal) -> Self {
        SynthesizerState { xtal, plla_frequency: 0.0, pllb_frequency: 0.0 }
    }

    /// Achieved frequency of `pll`, 0 if it was never configured
    #[inline]
    pub fn pll_frequency(self: &Self, pll: Pll) -> f64 {
        match pll {
            Pll::A => self.plla_frequency,
            Pll::B => self.pllb_frequency,
        }
    }

    #[inline]
    fn record(self: &mut Self, pll: Pll, f: f64) {
        match pll {
            Pll::A => self.plla_frequency = f,
            Pll::B => self.pllb_frequency = f,
        }
    }
}


/// Si5351 device
pub struct Si5351<I2C> {
    i2c: I2C,
    state: SynthesizerState,
    tuning: Tuning,
}


impl<I2C, E> Si5351<I2C>
where I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Creates the device (unconfigured, no bus traffic).
    ///
    /// `i2c` - I2C bus, the device answers at `0x60`
    /// `xtal` - crystal reference
    pub fn new(i2c: I2C, xtal: Xtal) -> Self {
        Self::with_tuning(i2c, xtal, Tuning::default())
    }

    /// Same as `new` with non-default planner limits.
    pub fn with_tuning(i2c: I2C, xtal: Xtal, tuning: Tuning) -> Self {
        Si5351 { i2c, state: SynthesizerState::new(xtal), tuning }
    }

    /// Releases the bus.
    pub fn free(self: Self) -> I2C {
        self.i2c
    }

    #[inline]
    pub fn state(self: &Self) -> &SynthesizerState {
        &self.state
    }

    #[inline]
    pub fn tuning(self: &Self) -> &Tuning {
        &self.tuning
    }

    /// Achieved frequency of `pll`, `None` until `set_pll` succeeded for it.
    pub fn pll_frequency(self: &Self, pll: Pll) -> Option<f64> {
        let f = self.state.pll_frequency(pll);
        if f > 0.0 { Some(f) } else { None }
    }

    /// Brings the device into a known state: all outputs disabled,
    /// all output drivers powered down, crystal load capacitance set.
    pub fn init(self: &mut Self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("si5351 init, xtal {}", self.state.xtal);

        self.write_register(REG_OUTPUT_ENABLE, Reg::<OutputEnable>::default().w)?;
        self.write_registers(
            REG_CLK0_CONTROL,
            &[Reg::<ClkControl>::powered_down().w; NUM_CLOCKS as usize],
        )?;
        self.write_register(REG_XTAL_LOAD, self.state.xtal.load_register().w)?;
        Ok(())
    }

    /// Locks `pll` as close as possible to `target_hz` (600 MHz ..= 900 MHz).
    ///
    /// Nothing is written unless the whole plan is valid. On success the
    /// achieved (not requested) frequency becomes the reference for `set_freq`.
    pub fn set_pll(self: &mut Self, pll: Pll, target_hz: f64) -> Result<PllPlan, Error> {
        let plan = PllPlan::new(self.state.xtal.frequency(), target_hz, &self.tuning)?;
        let block = plan.registers()?;

        // FBx_INT shares the CLK6 / CLK7 control register, keep the other bits
        let control = Reg::<PllControl>::from_word(self.read_register(pll.control_register())?);
        self.write_register(pll.control_register(), plan.control(control).w)?;
        self.write_registers(pll.multiplier_register(), &block.0)?;

        self.state.record(pll, plan.achieved_frequency);

        #[cfg(feature = "defmt")]
        defmt::debug!("PLL {} set to {} Hz", pll, plan.achieved_frequency);

        Ok(plan)
    }

    /// Drives `clk` from `pll` at `target_hz` and enables the output.
    ///
    /// `pll` must have been configured with `set_pll`.
    pub fn set_freq(self: &mut Self, clk: ClockOutput, pll: Pll, target_hz: f64) -> Result<DividerPlan, Error> {
        let plan = DividerPlan::new(self.state.pll_frequency(pll), target_hz, &self.tuning)?;
        let block = plan.registers()?;

        self.write_registers(clk.divider_register(), &block.0)?;
        self.write_register(clk.control_register(), plan.control(pll).w)?;
        self.enable_clock(clk)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Clock {} set to {} Hz", clk, plan.achieved_frequency);

        Ok(plan)
    }

    /// Enables output `clk`, other outputs are left as they are.
    pub fn enable_clock(self: &mut Self, clk: ClockOutput) -> Result<(), Error> {
        let oe = self.read_output_enable()?.enable(clk);
        self.write_register(REG_OUTPUT_ENABLE, oe.w)
    }

    /// Disables output `clk`, other outputs are left as they are.
    pub fn disable_clock(self: &mut Self, clk: ClockOutput) -> Result<(), Error> {
        let oe = self.read_output_enable()?.disable(clk);
        self.write_register(REG_OUTPUT_ENABLE, oe.w)
    }

    #[inline]
    fn read_output_enable(self: &mut Self) -> Result<Reg<OutputEnable>, Error> {
        self.read_register(REG_OUTPUT_ENABLE).map(Reg::from_word)
    }

    /// Reads a single register.
    pub fn read_register(self: &mut Self, addr: u8) -> Result<u8, Error> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDRESS, &[addr], &mut buffer)
            .map_err(|_| Error::I2c)?;
        Ok(buffer[0])
    }

    /// Writes a single register.
    pub fn write_register(self: &mut Self, addr: u8, byte: u8) -> Result<(), Error> {
        self.i2c
            .write(I2C_ADDRESS, &[addr, byte])
            .map_err(|_| Error::I2c)
    }

    /// Writes consecutive registers starting at `addr`.
    ///
    /// Sent as bursts of up to 8 registers, one I2C transaction each.
    /// The run must not go past register 255.
    pub fn write_registers(self: &mut Self, addr: u8, bytes: &[u8]) -> Result<(), Error> {
        (if addr as usize + bytes.len() > 256 { Err(Error::InvalidInput) } else { Ok(()) })?;

        let mut data = [0u8; MULTISYNTH_BLOCK_LEN + 1];
        for (i, chunk) in bytes.chunks(MULTISYNTH_BLOCK_LEN).enumerate() {
            data[0] = addr + (i * MULTISYNTH_BLOCK_LEN) as u8;
            data[1 ..= chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(I2C_ADDRESS, &data[..= chunk.len()])
                .map_err(|_| Error::I2c)?;
        }
        Ok(())
    }
}
