pub mod generic_pcf8574t;

use embedded_hal::{delay::DelayNs, i2c};

use crate::{transport, CharacterDisplayError, DeviceSetupConfig};

/// Settling time between putting a nibble on the expander pins and raising Enable. Not a
/// datasheet figure; PCF8574 backpacks drop nibbles without it.
pub(crate) const PRE_PULSE_DELAY_US: u32 = 1_000;
/// Enable must stay high for at least 450ns
pub(crate) const ENABLE_PULSE_WIDTH_US: u32 = 1;

/// HD44780 register select line. `Command` addresses the instruction register, `Data` the data
/// register (DDRAM or CGRAM, depending on the last address instruction).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RegisterSelect {
    Command,
    Data,
}

/// Trait for implementing an I2C adapter for a HD44780 controller. Assumes the connection from
/// the adapter to the HD44780 is a 4 bit interface and the adapter exposes 8 GPIO pins carrying the
/// 4 data lines, RS, RW, enable and the backlight switch. Implementors only describe the pin map;
/// the nibble and byte protocol is provided.
pub trait HD44780AdapterTrait: Default {
    /// Returns the default I2C address for the adapter
    fn default_i2c_address() -> u8;

    /// Returns the current value of the expander's output port
    fn bits(&self) -> u8;

    /// Sets the RS pin for the display. A value of `false` indicates an instruction is being sent, while
    /// a value of `true` indicates data is being sent.
    fn set_rs(&mut self, value: bool);

    /// Sets the RW pin for the display. This driver only ever writes.
    fn set_rw(&mut self, value: bool);

    fn set_enable(&mut self, value: bool);

    /// Sets the backlight pin. Takes effect with the next byte written to the expander.
    fn set_backlight(&mut self, value: bool);

    fn backlight(&self) -> bool;

    /// Places the low 4 bits of `value` on the D4..D7 lines.
    fn set_data(&mut self, value: u8);

    fn write_bits_to_gpio<I2C>(
        &self,
        i2c: &mut I2C,
        i2c_address: u8,
        operation: &'static str,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
    {
        transport::write_control_byte(i2c, i2c_address, self.bits(), operation)
    }

    /// writes a full byte to the controller, high nibble first. A failure while sending the high
    /// nibble aborts the write before the low nibble is attempted.
    fn write_byte_to_controller<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        register: RegisterSelect,
        value: u8,
        operation: &'static str,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.write_nibble_to_controller(config, register, value >> 4, operation)?;
        self.write_nibble_to_controller(config, register, value & 0x0F, operation)
    }

    /// writes the lower nibble of a `value` byte to the controller. Used on its own only during
    /// the reset sequence, when the controller may still be in 8 bit mode.
    fn write_nibble_to_controller<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        register: RegisterSelect,
        value: u8,
        operation: &'static str,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.set_rs(register == RegisterSelect::Data);
        self.set_rw(false);
        self.set_data(value & 0x0F);
        self.set_enable(false);
        self.write_bits_to_gpio(&mut config.i2c, config.address, operation)?;
        config.delay.delay_us(PRE_PULSE_DELAY_US);
        self.pulse_enable(config, operation)
    }

    /// Clocks the nibble currently on the data lines into the controller. Data is latched on the
    /// falling edge.
    fn pulse_enable<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        operation: &'static str,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.set_enable(true);
        self.write_bits_to_gpio(&mut config.i2c, config.address, operation)?;
        config.delay.delay_us(ENABLE_PULSE_WIDTH_US);
        self.set_enable(false);
        self.write_bits_to_gpio(&mut config.i2c, config.address, operation)
    }
}
