// Transport
// The only two bus primitives the driver needs: a single-byte write to the expander and a
// zero-length write used to check whether anything acknowledges the address. Bus timeouts are
// the responsibility of the `I2c` implementation; failures are never retried here.

use embedded_hal::i2c::{self, Error as _, ErrorKind};

use crate::CharacterDisplayError;

/// Highest valid 7-bit I2C address
pub(crate) const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Writes one control byte to the expander. `operation` names the instruction being transmitted
/// and is attached to any bus error. The byte is always sent, 0x00 included.
pub(crate) fn write_control_byte<I2C>(
    i2c: &mut I2C,
    address: u8,
    byte: u8,
    operation: &'static str,
) -> Result<(), CharacterDisplayError<I2C::Error>>
where
    I2C: i2c::I2c,
{
    if address > MAX_I2C_ADDRESS {
        return Err(CharacterDisplayError::InvalidAddress);
    }
    i2c.write(address, &[byte])
        .map_err(|e| CharacterDisplayError::I2cError(operation, e))
}

/// Issues a zero-length write to `address`. A NACK means nothing is listening and is reported as
/// `DeviceNotFound`; any other failure is a bus error.
pub(crate) fn probe<I2C>(i2c: &mut I2C, address: u8) -> Result<(), CharacterDisplayError<I2C::Error>>
where
    I2C: i2c::I2c,
{
    if address > MAX_I2C_ADDRESS {
        return Err(CharacterDisplayError::InvalidAddress);
    }
    match i2c.write(address, &[]) {
        Ok(()) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("Device found at address {=u8:#x}", address);
            Ok(())
        }
        Err(e) => match e.kind() {
            ErrorKind::NoAcknowledge(_) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("No device at address {=u8:#x}", address);
                Err(CharacterDisplayError::DeviceNotFound)
            }
            _ => Err(CharacterDisplayError::I2cError("probe", e)),
        },
    }
}
