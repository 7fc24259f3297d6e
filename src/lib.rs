//! This Rust `embedded-hal`-based library drives a [HD44780](https://en.wikipedia.org/wiki/Hitachi_HD44780_LCD_controller)
//! compatible character display through a PCF8574 I2C GPIO expander "backpack" in an embedded, `no_std` environment.
//!
//! The PCF8574 adapters are ubiquitous on eBay and AliExpress and have no clear branding. The common wiring connects the
//! display's 4-bit data pins to P4-P7 of the expander and RS, RW, Enable and the backlight transistor to P0-P3. Every
//! 4-bit transfer to the HD44780 becomes three single-byte writes to the expander: data with Enable low, Enable high,
//! Enable low.
//!
//! Key features include:
//! - Convenient high-level API for controlling the display
//! - Tracks the cursor position across row wraps, including the interleaved DDRAM layout of 4 row displays
//! - Support for custom characters
//! - Backlight control
//! - `core::fmt::Write` implementation for easy use with the `write!` macro
//! - Compatible with the `embedded-hal` traits v1.0 and later
//! - Optional support for the `defmt` and `ufmt` logging frameworks
//!
//! ## Usage
//! Add this to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! hd44780-pcf8574 = { version = "0.1", features = ["defmt"] }
//! ```
//! The `features = ["defmt"]` line is optional and enables the `defmt` feature, which allows the library's errors to be used with the `defmt` logging
//! framework and turns on debug logging inside the driver. Another optional feature is `features = ["ufmt"]`, which enables the `ufmt` feature,
//! allowing the `uwriteln!` and `uwrite!` macros to be used.
//!
//! Create the display:
//! ```rust
//! use hd44780_pcf8574::{CharacterDisplayPCF8574T, LcdDisplayType};
//!
//! // board setup
//! let i2c = ...; // I2C peripheral
//! let delay = ...; // DelayNs implementation
//!
//! let mut lcd = CharacterDisplayPCF8574T::new(i2c, LcdDisplayType::Lcd16x2, delay);
//! // or at a specific address
//! let mut lcd = CharacterDisplayPCF8574T::new_with_address(i2c, 0x3F, LcdDisplayType::Lcd20x4, delay);
//! ```
//! The display type should match the physical display you are using. It configures the number of rows and columns.
//!
//! Initialize the display:
//! ```rust
//! if let Err(e) = lcd.init() {
//!    panic!("Error initializing LCD: {}", e);
//! }
//! ```
//! Use the display:
//! ```rust
//! lcd.backlight(true)?.clear()?.home()?;
//! lcd.print("Hello, world!")?;
//! // can also use the `core::fmt::write!` macro
//! use core::fmt::Write;
//!
//! write!(lcd, "Hello, world!")?;
//! ```
//! The various methods for controlling the LCD each return a `Result` that wraps the display object in `Ok()`, allowing for easy chaining
//! of commands. For example:
//! ```rust
//! lcd.set_cursor(0, 1)?.show_cursor(true)?.print("Hello, world!")?;
//! ```
//!
//! ### Errors
//! Every failure is reported as a `CharacterDisplayError`. Use `CharacterDisplayError::category` to tell a bad argument from a missing device
//! from a bus glitch. Bus errors carry the name of the instruction that was being transmitted. Nothing is retried by the driver.
//!
#![no_std]
#![allow(non_upper_case_globals)]
use core::fmt::Display;

use embedded_hal::{delay::DelayNs, i2c};

mod driver;
#[cfg(test)]
mod test_support;
mod transport;

pub use driver::hd44780::{
    adapter::{generic_pcf8574t::GenericPCF8574TAdapter, HD44780AdapterTrait, RegisterSelect},
    cursor::CursorPosition,
    instructions::{
        DataLength, DisplayControl, EntryMode, FontSize, FunctionSet, LineCount, ShiftDirection,
    },
    HD44780,
};

/// HD44780 based character display using a generic PCF8574T I2C adapter.
pub type CharacterDisplayPCF8574T<I2C, DELAY> =
    BaseCharacterDisplay<I2C, DELAY, GenericPCF8574TAdapter>;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
/// Errors that can occur when using the display. `E` is the error type of the I2C bus.
pub enum CharacterDisplayError<E> {
    /// I2C error returned from the underlying I2C implementation, together with the name of the
    /// instruction being transmitted
    I2cError(&'static str, E),
    /// Nothing acknowledged the display's I2C address
    DeviceNotFound,
    /// The I2C address is not a valid 7-bit address
    InvalidAddress,
    /// Row is out of range
    RowOutOfRange,
    /// Column is out of range
    ColumnOutOfRange,
    /// Character code 0 cannot be written
    NullCharacter,
    /// Custom character slots are numbered 0 through 7
    GlyphSlotOutOfRange,
    /// Only the 4-bit interface is supported
    UnsupportedInterface,
    /// The display geometry cannot be driven by a single HD44780
    UnsupportedDisplayType,
    /// The requested mode is not supported by the driver
    UnsupportedOperation,
    /// `init` was already called successfully
    AlreadyInitialized,
    /// `init` has not been called successfully
    NotInitialized,
    /// Internal error - the tracked cursor is outside the display
    BadCursorPosition,
    /// Formatting error
    FormattingError(core::fmt::Error),
}

/// Broad classes of `CharacterDisplayError`
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ErrorCategory {
    /// The caller passed a value the display cannot accept
    InvalidArgument,
    /// The operation is not valid in the driver's current state
    InvalidState,
    /// No device answered at the display's address
    NotFound,
    /// The bus transaction failed
    Transport,
    /// The display could do it, this driver does not
    NotSupported,
}

impl<E> CharacterDisplayError<E> {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CharacterDisplayError::I2cError(_, _) => ErrorCategory::Transport,
            CharacterDisplayError::DeviceNotFound => ErrorCategory::NotFound,
            CharacterDisplayError::InvalidAddress
            | CharacterDisplayError::RowOutOfRange
            | CharacterDisplayError::ColumnOutOfRange
            | CharacterDisplayError::NullCharacter
            | CharacterDisplayError::GlyphSlotOutOfRange
            | CharacterDisplayError::UnsupportedInterface
            | CharacterDisplayError::UnsupportedDisplayType
            | CharacterDisplayError::FormattingError(_) => ErrorCategory::InvalidArgument,
            CharacterDisplayError::AlreadyInitialized
            | CharacterDisplayError::NotInitialized
            | CharacterDisplayError::BadCursorPosition => ErrorCategory::InvalidState,
            CharacterDisplayError::UnsupportedOperation => ErrorCategory::NotSupported,
        }
    }
}

impl<E> From<core::fmt::Error> for CharacterDisplayError<E> {
    fn from(err: core::fmt::Error) -> Self {
        CharacterDisplayError::FormattingError(err)
    }
}

impl<E> From<&CharacterDisplayError<E>> for &'static str {
    fn from(err: &CharacterDisplayError<E>) -> Self {
        match err {
            CharacterDisplayError::I2cError(_, _) => "I2C error",
            CharacterDisplayError::DeviceNotFound => "Device not found",
            CharacterDisplayError::InvalidAddress => "Invalid I2C address",
            CharacterDisplayError::RowOutOfRange => "Row out of range",
            CharacterDisplayError::ColumnOutOfRange => "Column out of range",
            CharacterDisplayError::NullCharacter => "Null character",
            CharacterDisplayError::GlyphSlotOutOfRange => "Custom character slot out of range",
            CharacterDisplayError::UnsupportedInterface => "8-bit interface not supported",
            CharacterDisplayError::UnsupportedDisplayType => "Unsupported display type",
            CharacterDisplayError::UnsupportedOperation => "Operation not supported",
            CharacterDisplayError::AlreadyInitialized => "Display already initialized",
            CharacterDisplayError::NotInitialized => "Display not initialized",
            CharacterDisplayError::BadCursorPosition => "Bad cursor position",
            CharacterDisplayError::FormattingError(_) => "Formatting error",
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for CharacterDisplayError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        match self {
            CharacterDisplayError::I2cError(operation, _) => {
                defmt::write!(fmt, "{} during {}", msg, operation)
            }
            _ => defmt::write!(fmt, "{}", msg),
        }
    }
}

#[cfg(feature = "ufmt")]
impl<E> ufmt::uDisplay for CharacterDisplayError<E> {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        match self {
            CharacterDisplayError::I2cError(operation, _) => {
                ufmt::uwrite!(w, "{} during {}", msg, *operation)
            }
            _ => ufmt::uwrite!(w, "{}", msg),
        }
    }
}

impl<E> Display for CharacterDisplayError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        match self {
            CharacterDisplayError::I2cError(operation, _) => write!(f, "{} during {}", msg, operation),
            _ => write!(f, "{}", msg),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// The type of LCD display. This is used to determine the number of rows and columns.
pub enum LcdDisplayType {
    /// 20x4 display
    Lcd20x4,
    /// 20x2 display
    Lcd20x2,
    /// 16x2 display
    Lcd16x2,
    /// 16x1 display
    Lcd16x1,
    /// 8x2 display
    Lcd8x2,
    /// 40x2 display
    Lcd40x2,
    /// Any other geometry. Checked against what a single HD44780 can address during `init`.
    Custom { columns: u8, rows: u8 },
}

impl From<&LcdDisplayType> for &'static str {
    fn from(display_type: &LcdDisplayType) -> Self {
        match display_type {
            LcdDisplayType::Lcd20x4 => "20x4",
            LcdDisplayType::Lcd20x2 => "20x2",
            LcdDisplayType::Lcd16x2 => "16x2",
            LcdDisplayType::Lcd16x1 => "16x1",
            LcdDisplayType::Lcd8x2 => "8x2",
            LcdDisplayType::Lcd40x2 => "40x2",
            LcdDisplayType::Custom { .. } => "custom",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdDisplayType {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LcdDisplayType::Custom { columns, rows } => defmt::write!(fmt, "{}x{}", columns, rows),
            _ => {
                let msg: &'static str = From::from(self);
                defmt::write!(fmt, "{}", msg);
            }
        }
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for LcdDisplayType {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            LcdDisplayType::Custom { columns, rows } => ufmt::uwrite!(w, "{}x{}", *columns, *rows),
            _ => {
                let msg: &'static str = From::from(self);
                ufmt::uwrite!(w, "{}", msg)
            }
        }
    }
}

impl Display for LcdDisplayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LcdDisplayType::Custom { columns, rows } => write!(f, "{}x{}", columns, rows),
            _ => {
                let msg: &'static str = From::from(self);
                write!(f, "{}", msg)
            }
        }
    }
}

impl LcdDisplayType {
    /// Get the number of rows for the display type
    pub const fn rows(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 => 4,
            LcdDisplayType::Lcd20x2 => 2,
            LcdDisplayType::Lcd16x2 => 2,
            LcdDisplayType::Lcd16x1 => 1,
            LcdDisplayType::Lcd8x2 => 2,
            LcdDisplayType::Lcd40x2 => 2,
            LcdDisplayType::Custom { rows, .. } => *rows,
        }
    }

    /// Get the number of columns for the display type
    pub const fn cols(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd20x4 => 20,
            LcdDisplayType::Lcd20x2 => 20,
            LcdDisplayType::Lcd16x2 => 16,
            LcdDisplayType::Lcd16x1 => 16,
            LcdDisplayType::Lcd8x2 => 8,
            LcdDisplayType::Lcd40x2 => 40,
            LcdDisplayType::Custom { columns, .. } => *columns,
        }
    }

    /// Whether a single HD44780 can address every cell. DDRAM holds two 40 character lines; on
    /// 4 row displays rows 2 and 3 continue rows 0 and 1 at column 20.
    pub const fn is_supported(&self) -> bool {
        match self.rows() {
            1 | 2 => self.cols() >= 1 && self.cols() <= 40,
            4 => self.cols() >= 1 && self.cols() <= 20,
            _ => false,
        }
    }
}

/// Settings fixed at `init`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DisplayOptions {
    /// Must be `DataLength::FourBit`; the expander only carries four data lines.
    pub data_length: DataLength,
    pub font: FontSize,
    /// Backlight state for the first bytes sent to the display
    pub backlight: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            data_length: DataLength::FourBit,
            font: FontSize::Dots5x8,
            backlight: true,
        }
    }
}

pub struct DeviceSetupConfig<I2C, DELAY>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
{
    lcd_type: LcdDisplayType,
    i2c: I2C,
    address: u8,
    delay: DELAY,
    options: DisplayOptions,
}

pub struct BaseCharacterDisplay<I2C, DELAY, ADAPTER>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
    ADAPTER: HD44780AdapterTrait,
{
    config: DeviceSetupConfig<I2C, DELAY>,
    device: HD44780<ADAPTER>,
}

impl<I2C, DELAY, ADAPTER> BaseCharacterDisplay<I2C, DELAY, ADAPTER>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
    ADAPTER: HD44780AdapterTrait,
{
    /// Create a new character display object with the default I2C address for the adapter.
    pub fn new(i2c: I2C, lcd_type: LcdDisplayType, delay: DELAY) -> Self {
        Self::new_with_address(i2c, ADAPTER::default_i2c_address(), lcd_type, delay)
    }

    /// Create a new character display object with a specific I2C address for the adapter.
    pub fn new_with_address(i2c: I2C, address: u8, lcd_type: LcdDisplayType, delay: DELAY) -> Self {
        Self::new_with_options(i2c, address, lcd_type, DisplayOptions::default(), delay)
    }

    /// Create a new character display object with a specific I2C address and display options.
    /// Nothing is sent to the display until `init` is called.
    pub fn new_with_options(
        i2c: I2C,
        address: u8,
        lcd_type: LcdDisplayType,
        options: DisplayOptions,
        delay: DELAY,
    ) -> Self {
        Self {
            config: DeviceSetupConfig {
                lcd_type,
                i2c,
                address,
                delay,
                options,
            },
            device: HD44780::new(options.backlight),
        }
    }

    /// Initialize the display. This must be called before using the display. Fails with
    /// `AlreadyInitialized` if called again after succeeding.
    pub fn init(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.init(&mut self.config)?;
        Ok(self)
    }

    /// Checks whether anything acknowledges the display's address. Returns `DeviceNotFound` if
    /// nothing does. May be called before `init`.
    pub fn probe(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        transport::probe(&mut self.config.i2c, self.config.address)?;
        Ok(self)
    }

    /// returns a reference to the I2C peripheral. mostly needed for testing
    #[cfg(test)]
    fn i2c(&mut self) -> &mut I2C {
        &mut self.config.i2c
    }

    /// returns the `LcdDisplayType` used to create the display
    pub fn display_type(&self) -> LcdDisplayType {
        self.config.lcd_type
    }

    /// returns the I2C address of the adapter
    pub fn address(&self) -> u8 {
        self.config.address
    }

    pub fn is_initialized(&self) -> bool {
        self.device.is_initialized()
    }

    /// The cursor position as tracked by the driver. Zero-indexed.
    pub fn cursor_position(&self) -> CursorPosition {
        self.device.cursor()
    }

    pub fn backlight_enabled(&self) -> bool {
        self.device.backlight_enabled()
    }

    /// Last function set successfully sent to the controller
    pub fn function_set(&self) -> FunctionSet {
        self.device.function_set()
    }

    /// Last display control successfully sent to the controller
    pub fn display_control(&self) -> DisplayControl {
        self.device.display_control()
    }

    /// Last entry mode successfully sent to the controller
    pub fn entry_mode(&self) -> EntryMode {
        self.device.entry_mode()
    }

    //--------------------------------------------------------------------------------------------------
    // high level commands, for the user!
    //--------------------------------------------------------------------------------------------------

    /// Clear the display. Also returns the cursor home and restores left to right text flow.
    pub fn clear(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.clear(&mut self.config)?;
        Ok(self)
    }

    /// Set the cursor to the home position.
    pub fn home(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.home(&mut self.config)?;
        Ok(self)
    }

    /// Set the cursor position at specified column and row. Columns and rows are zero-indexed.
    pub fn set_cursor(
        &mut self,
        col: u8,
        row: u8,
    ) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.set_cursor(&mut self.config, col, row)?;
        Ok(self)
    }

    /// Set the cursor visibility.
    pub fn show_cursor(
        &mut self,
        show_cursor: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.show_cursor(&mut self.config, show_cursor)?;
        Ok(self)
    }

    /// Set the cursor blinking.
    pub fn blink_cursor(
        &mut self,
        blink_cursor: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.blink_cursor(&mut self.config, blink_cursor)?;
        Ok(self)
    }

    /// Set the display visibility. DDRAM is retained while the display is off.
    pub fn show_display(
        &mut self,
        show_display: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.show_display(&mut self.config, show_display)?;
        Ok(self)
    }

    /// Scroll the display to the left.
    pub fn scroll_display_left(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.scroll(&mut self.config, ShiftDirection::Left)?;
        Ok(self)
    }

    /// Scroll the display to the right.
    pub fn scroll_display_right(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.scroll(&mut self.config, ShiftDirection::Right)?;
        Ok(self)
    }

    /// Set the text flow direction to left to right.
    pub fn left_to_right(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.left_to_right(&mut self.config)?;
        Ok(self)
    }

    /// Set the text flow direction to right to left.
    pub fn right_to_left(&mut self) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.right_to_left(&mut self.config)?;
        Ok(self)
    }

    /// Set the auto scroll mode. Only `false` is supported.
    pub fn autoscroll(
        &mut self,
        autoscroll: bool,
    ) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.autoscroll(&mut self.config, autoscroll)?;
        Ok(self)
    }

    /// Create a new custom character in slot `location` (0 through 7). Print it with character
    /// code `location`, or `location + 8` for slot 0.
    pub fn create_char(
        &mut self,
        location: u8,
        charmap: [u8; 8],
    ) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device
            .create_char(&mut self.config, location, charmap)?;
        Ok(self)
    }

    /// Writes a single character code at the cursor position.
    pub fn write_char(&mut self, c: u8) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.write_char(&mut self.config, c)?;
        Ok(self)
    }

    /// Prints a string to the LCD at the current cursor position. Characters outside the
    /// display's 8-bit character set are shown as `?`.
    pub fn print(&mut self, text: &str) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.print(&mut self.config, text)?;
        Ok(self)
    }

    /// Turn the backlight on or off
    pub fn backlight(&mut self, on: bool) -> Result<&mut Self, CharacterDisplayError<I2C::Error>> {
        self.device.backlight(&mut self.config, on)?;
        Ok(self)
    }
}

/// Implement the `core::fmt::Write` trait for the LCD backpack, allowing it to be used with the `write!` macro.
/// This is a convenience method for printing to the display.
impl<I2C, DELAY, ADAPTER> core::fmt::Write for BaseCharacterDisplay<I2C, DELAY, ADAPTER>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
    ADAPTER: HD44780AdapterTrait,
{
    fn write_str(&mut self, s: &str) -> Result<(), core::fmt::Error> {
        if let Err(_e) = self.print(s) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Error writing to display: {}", _e);
            return Err(core::fmt::Error);
        }
        Ok(())
    }
}

#[cfg(feature = "ufmt")]
/// Implement the `ufmt::uWrite` trait for the LCD backpack, allowing it to be used with the `uwriteln!` and `uwrite!` macros.
impl<I2C, DELAY, ADAPTER> ufmt::uWrite for BaseCharacterDisplay<I2C, DELAY, ADAPTER>
where
    I2C: i2c::I2c,
    DELAY: DelayNs,
    ADAPTER: HD44780AdapterTrait,
{
    fn write_str(&mut self, s: &str) -> Result<(), CharacterDisplayError<I2C::Error>> {
        self.print(s)?;
        Ok(())
    }

    type Error = CharacterDisplayError<I2C::Error>;
}
