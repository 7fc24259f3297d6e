// Helpers for building expected I2C transcripts for a PCF8574 backpack
// (P0=RS, P1=RW, P2=E, P3=backlight, P4..P7=D4..D7).
extern crate std;

use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::i2c::Transaction as I2cTransaction;

const RS: u8 = 0b0000_0001;
const ENABLE: u8 = 0b0000_0100;
const BACKLIGHT: u8 = 0b0000_1000;

/// The three expander writes that latch one nibble: data with E low, E high, E low.
pub(crate) fn nibble(address: u8, value: u8, rs: bool, backlight: bool) -> Vec<I2cTransaction> {
    let mut port = (value & 0x0F) << 4;
    if rs {
        port |= RS;
    }
    if backlight {
        port |= BACKLIGHT;
    }
    std::vec![
        I2cTransaction::write(address, std::vec![port]),
        I2cTransaction::write(address, std::vec![port | ENABLE]),
        I2cTransaction::write(address, std::vec![port]),
    ]
}

/// A full byte, high nibble first.
pub(crate) fn byte(address: u8, value: u8, rs: bool, backlight: bool) -> Vec<I2cTransaction> {
    let mut transactions = nibble(address, value >> 4, rs, backlight);
    transactions.extend(nibble(address, value & 0x0F, rs, backlight));
    transactions
}

pub(crate) fn command(address: u8, value: u8) -> Vec<I2cTransaction> {
    byte(address, value, false, true)
}

pub(crate) fn data(address: u8, value: u8) -> Vec<I2cTransaction> {
    byte(address, value, true, true)
}

/// Probe plus the complete reset and configuration sequence with the backlight on.
pub(crate) fn init_sequence(address: u8, function_set: u8) -> Vec<I2cTransaction> {
    let mut transactions = std::vec![I2cTransaction::write(address, std::vec![])];
    // 8 bit function set, three times
    transactions.extend(nibble(address, 0x3, false, true));
    transactions.extend(nibble(address, 0x3, false, true));
    transactions.extend(nibble(address, 0x3, false, true));
    // switch to 4 bit
    transactions.extend(nibble(address, 0x2, false, true));
    transactions.extend(command(address, function_set));
    // display on, cursor off, blink off
    transactions.extend(command(address, 0x0C));
    // clear
    transactions.extend(command(address, 0x01));
    // increment, no shift
    transactions.extend(command(address, 0x06));
    // home
    transactions.extend(command(address, 0x02));
    transactions
}

/// Delay that records every requested wait in nanoseconds.
#[derive(Default)]
pub(crate) struct RecordingDelay {
    pub delays_ns: Vec<u64>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ns.push(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.delays_ns.push(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ns.push(ms as u64 * 1_000_000);
    }
}
