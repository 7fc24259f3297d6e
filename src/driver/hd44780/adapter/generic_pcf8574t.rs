use bitfield::bitfield;

use super::HD44780AdapterTrait;

// Pin map of the common PCF8574T backpack driving a HD44780 over its 4-bit interface
bitfield! {
    pub struct GenericPCF8574TBitField(u8);
    impl Debug;
    pub rs, set_rs: 0, 0;
    pub rw, set_rw: 1, 1;
    pub enable, set_enable: 2, 2;
    pub backlight, set_backlight: 3, 3;
    pub data, set_data: 7, 4;
}

impl Clone for GenericPCF8574TBitField {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

/// Adapter based on the PCF8574T I2C GPIO expander interfacing with the HD44780 LCD controller
/// via a 4-bit interface. Holds the last value written to the expander port.
#[derive(Debug, Clone)]
pub struct GenericPCF8574TAdapter {
    bits: GenericPCF8574TBitField,
}

impl Default for GenericPCF8574TAdapter {
    fn default() -> Self {
        Self {
            bits: GenericPCF8574TBitField(0),
        }
    }
}

impl HD44780AdapterTrait for GenericPCF8574TAdapter {
    fn default_i2c_address() -> u8 {
        0x27
    }

    fn bits(&self) -> u8 {
        self.bits.0
    }

    fn set_rs(&mut self, value: bool) {
        self.bits.set_rs(value as u8);
    }

    fn set_rw(&mut self, value: bool) {
        self.bits.set_rw(value as u8);
    }

    fn set_enable(&mut self, value: bool) {
        self.bits.set_enable(value as u8);
    }

    fn set_backlight(&mut self, value: bool) {
        self.bits.set_backlight(value as u8);
    }

    fn backlight(&self) -> bool {
        self.bits.backlight() != 0
    }

    fn set_data(&mut self, value: u8) {
        self.bits.set_data(value);
    }
}
