// The HD44780 controller: instruction set, cursor model, state machine and the expander adapter
// that carries its 4-bit interface over I2C.
pub mod hd44780;
