// HD44780 Support
// The HD44780 struct owns the controller's persistent state: the function set, display control
// and entry mode registers, the tracked cursor position and the initialization flag. Every
// operation computes the new register value on a copy, sends it through the adapter, and only
// commits the copy once the bus write succeeded, so a reported success always means the
// controller and the in-memory state agree.
//
// The adapter (HD44780AdapterTrait) turns instruction and data bytes into nibble transfers on the
// expander. GenericPCF8574TAdapter is the pin map of the common PCF8574T backpack.
//

pub mod adapter;
pub mod cursor;
pub mod instructions;

use embedded_hal::{delay::DelayNs, i2c};

use crate::{
    driver::hd44780::{
        adapter::{HD44780AdapterTrait, RegisterSelect},
        cursor::CursorPosition,
        instructions::{
            DataLength, DisplayControl, EntryMode, FunctionSet, Instruction, LineCount,
            ShiftDirection, LCD_CMD_FUNCTIONSET, LCD_DATA_EXEC_TIME_US, LCD_FLAG_8BITMODE,
            ROW_OFFSETS,
        },
    },
    transport, CharacterDisplayError, DeviceSetupConfig,
};

/// The controller may still be in its power-on reset for up to 40ms after Vcc rises.
const POWER_ON_DELAY_MS: u32 = 50;
// Reset by instruction, figure 24 of the HD44780U datasheet
const RESET_FIRST_DELAY_US: u32 = 4_100;
const RESET_SECOND_DELAY_US: u32 = 100;
const FOUR_BIT_SWITCH_DELAY_US: u32 = 40;

pub struct HD44780<ADAPTER>
where
    ADAPTER: HD44780AdapterTrait,
{
    adapter: ADAPTER,
    display_function: FunctionSet,
    display_control: DisplayControl,
    display_mode: EntryMode,
    cursor: CursorPosition,
    initialized: bool,
}

impl<ADAPTER> Default for HD44780<ADAPTER>
where
    ADAPTER: HD44780AdapterTrait,
{
    fn default() -> Self {
        Self {
            adapter: ADAPTER::default(),
            display_function: FunctionSet::default(),
            display_control: DisplayControl::default(),
            display_mode: EntryMode::default(),
            cursor: CursorPosition::HOME,
            initialized: false,
        }
    }
}

impl<ADAPTER> HD44780<ADAPTER>
where
    ADAPTER: HD44780AdapterTrait,
{
    /// Creates the controller state with the backlight bit that every transmitted byte will carry
    /// until changed.
    pub fn new(backlight: bool) -> Self {
        let mut controller = Self::default();
        controller.adapter.set_backlight(backlight);
        controller
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn function_set(&self) -> FunctionSet {
        self.display_function
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    pub fn entry_mode(&self) -> EntryMode {
        self.display_mode
    }

    pub fn backlight_enabled(&self) -> bool {
        self.adapter.backlight()
    }

    /// Runs the reset by instruction sequence and configures the controller. The controller's
    /// state at power-up is unknown (a microcontroller reset does not reset the display), so the
    /// full sequence is always sent.
    pub fn init<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        if self.initialized {
            return Err(CharacterDisplayError::AlreadyInitialized);
        }
        if config.options.data_length == DataLength::EightBit {
            return Err(CharacterDisplayError::UnsupportedInterface);
        }
        if !config.lcd_type.is_supported() {
            return Err(CharacterDisplayError::UnsupportedDisplayType);
        }

        transport::probe(&mut config.i2c, config.address)?;
        config.delay.delay_ms(POWER_ON_DELAY_MS);

        let display_function = FunctionSet {
            data_length: DataLength::FourBit,
            lines: if config.lcd_type.rows() > 1 {
                LineCount::Two
            } else {
                LineCount::One
            },
            font: config.options.font,
        };

        // the controller may be in 8 bit mode, possibly half way through a byte, so the
        // function set is sent as single nibbles until 4 bit mode is confirmed
        let reset_nibble = (LCD_CMD_FUNCTIONSET | LCD_FLAG_8BITMODE) >> 4;
        self.write_reset_nibble(config, reset_nibble)?;
        config.delay.delay_us(RESET_FIRST_DELAY_US);
        self.write_reset_nibble(config, reset_nibble)?;
        config.delay.delay_us(RESET_SECOND_DELAY_US);
        self.write_reset_nibble(config, reset_nibble)?;
        self.write_reset_nibble(config, LCD_CMD_FUNCTIONSET >> 4)?;
        config.delay.delay_us(FOUR_BIT_SWITCH_DELAY_US);

        // 4 bit transfers from here on
        self.send_command(config, Instruction::FunctionSet(display_function))?;
        let display_control = DisplayControl::default();
        self.send_command(config, Instruction::DisplayControl(display_control))?;
        self.send_command(config, Instruction::ClearDisplay)?;
        let display_mode = EntryMode::default();
        self.send_command(config, Instruction::EntryModeSet(display_mode))?;
        self.send_command(config, Instruction::ReturnHome)?;

        self.display_function = display_function;
        self.display_control = display_control;
        self.display_mode = display_mode;
        self.cursor = CursorPosition::HOME;
        self.initialized = true;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "HD44780 initialized: {} at address {=u8:#x}",
            config.lcd_type,
            config.address
        );
        Ok(())
    }

    /// Clears DDRAM and returns the cursor home. The controller also forces increment mode.
    pub fn clear<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        self.send_command(config, Instruction::ClearDisplay)?;
        self.display_mode.increment = true;
        self.cursor = CursorPosition::HOME;
        Ok(())
    }

    /// Returns the cursor home and undoes any display shift, leaving DDRAM intact.
    pub fn home<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        self.send_command(config, Instruction::ReturnHome)?;
        self.cursor = CursorPosition::HOME;
        Ok(())
    }

    pub fn set_cursor<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        col: u8,
        row: u8,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        if row >= config.lcd_type.rows() {
            return Err(CharacterDisplayError::RowOutOfRange);
        }
        if col >= config.lcd_type.cols() {
            return Err(CharacterDisplayError::ColumnOutOfRange);
        }
        self.move_to(config, CursorPosition::new(col, row))
    }

    pub fn show_display<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        show_display: bool,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let mut display_control = self.display_control;
        display_control.display_on = show_display;
        self.update_display_control(config, display_control)
    }

    pub fn show_cursor<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        show_cursor: bool,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let mut display_control = self.display_control;
        display_control.cursor_on = show_cursor;
        self.update_display_control(config, display_control)
    }

    pub fn blink_cursor<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        blink_cursor: bool,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let mut display_control = self.display_control;
        display_control.blink_on = blink_cursor;
        self.update_display_control(config, display_control)
    }

    /// Shifts the whole display one position without touching DDRAM. The tracked cursor then
    /// moves one cell in the entry mode direction, wrapping across rows like a character write.
    pub fn scroll<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        direction: ShiftDirection,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        self.send_command(
            config,
            Instruction::CursorShift {
                display_move: true,
                direction,
            },
        )?;
        self.step_cursor(config)
    }

    pub fn left_to_right<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let mut display_mode = self.display_mode;
        display_mode.increment = true;
        self.update_entry_mode(config, display_mode)
    }

    pub fn right_to_left<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let mut display_mode = self.display_mode;
        display_mode.increment = false;
        self.update_entry_mode(config, display_mode)
    }

    /// Shifting the whole display on every write would break cursor tracking, so only turning
    /// autoscroll off is supported.
    pub fn autoscroll<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        autoscroll: bool,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        if autoscroll {
            #[cfg(feature = "defmt")]
            defmt::warn!("Autoscroll not supported");
            return Err(CharacterDisplayError::UnsupportedOperation);
        }
        let mut display_mode = self.display_mode;
        display_mode.display_shift = false;
        self.update_entry_mode(config, display_mode)
    }

    /// Writes one character code at the cursor and advances the cursor. Code 0 is rejected; the
    /// first custom glyph is also reachable as code 8.
    pub fn write_char<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        c: u8,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        if c == 0 {
            return Err(CharacterDisplayError::NullCharacter);
        }
        self.send_data(config, c)?;
        self.step_cursor(config)
    }

    pub fn print<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        text: &str,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        #[cfg(feature = "defmt")]
        defmt::debug!("Printing: {}", text);
        for c in text.chars() {
            self.write_char(config, u8::try_from(c).unwrap_or(b'?'))?;
        }
        Ok(())
    }

    /// Switches the backlight. There is no HD44780 instruction for this; the new state is written
    /// to the expander with Enable low, which the controller ignores, and then rides along on
    /// every later byte.
    pub fn backlight<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        on: bool,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        let previous = self.adapter.backlight();
        self.adapter.set_backlight(on);
        // a failed enable pulse can leave Enable high in the port image
        self.adapter.set_enable(false);
        if let Err(e) = self
            .adapter
            .write_bits_to_gpio(&mut config.i2c, config.address, "backlight")
        {
            self.adapter.set_backlight(previous);
            return Err(e);
        }
        Ok(())
    }

    /// Stores an 5x8 glyph in one of the eight CGRAM slots, then points the address counter back
    /// at the tracked cursor so later writes land in DDRAM again.
    pub fn create_char<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        location: u8,
        charmap: [u8; 8],
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        if location > 7 {
            return Err(CharacterDisplayError::GlyphSlotOutOfRange);
        }
        self.send_command(config, Instruction::SetCgramAddress(location << 3))?;
        for &charmap_byte in charmap.iter() {
            self.send_data(config, charmap_byte)?;
        }
        self.move_to(config, self.cursor)
    }

    fn ensure_initialized<E>(&self) -> Result<(), CharacterDisplayError<E>> {
        if self.initialized {
            Ok(())
        } else {
            Err(CharacterDisplayError::NotInitialized)
        }
    }

    fn write_reset_nibble<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        nibble: u8,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.adapter
            .write_nibble_to_controller(config, RegisterSelect::Command, nibble, "function set")
    }

    fn send_command<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        instruction: Instruction,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let result = self.adapter.write_byte_to_controller(
            config,
            RegisterSelect::Command,
            instruction.bits(),
            instruction.name(),
        );
        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("I2C error sending {}", instruction.name());
            return result;
        }
        // wait for command to complete
        config.delay.delay_us(instruction.execution_time_us());
        Ok(())
    }

    fn send_data<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        value: u8,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.adapter
            .write_byte_to_controller(config, RegisterSelect::Data, value, "write data")?;
        config.delay.delay_us(LCD_DATA_EXEC_TIME_US);
        Ok(())
    }

    fn move_to<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        position: CursorPosition,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        let address = position.column + ROW_OFFSETS[position.row as usize];
        self.send_command(config, Instruction::SetDdramAddress(address))?;
        self.cursor = position;
        Ok(())
    }

    fn step_cursor<I2C, DELAY>(
        &mut self,
        config: &DeviceSetupConfig<I2C, DELAY>,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.cursor = self.cursor.step(
            self.display_mode.increment,
            config.lcd_type.cols(),
            config.lcd_type.rows(),
        )?;
        Ok(())
    }

    fn update_display_control<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        display_control: DisplayControl,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        self.send_command(config, Instruction::DisplayControl(display_control))?;
        self.display_control = display_control;
        Ok(())
    }

    fn update_entry_mode<I2C, DELAY>(
        &mut self,
        config: &mut DeviceSetupConfig<I2C, DELAY>,
        display_mode: EntryMode,
    ) -> Result<(), CharacterDisplayError<I2C::Error>>
    where
        I2C: i2c::I2c,
        DELAY: DelayNs,
    {
        self.ensure_initialized()?;
        self.send_command(config, Instruction::EntryModeSet(display_mode))?;
        self.display_mode = display_mode;
        Ok(())
    }
}

#[cfg(test)]
mod lib_tests {
    extern crate std;
    use crate::{test_support, DisplayOptions, GenericPCF8574TAdapter, LcdDisplayType};

    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        i2c::{Mock as I2cMock, Transaction as I2cTransaction},
    };

    type GenericHD44780PCF8574T = HD44780<GenericPCF8574TAdapter>;

    fn setup(
        lcd_type: LcdDisplayType,
        expected: &[I2cTransaction],
    ) -> (GenericHD44780PCF8574T, DeviceSetupConfig<I2cMock, NoopDelay>) {
        let config = DeviceSetupConfig {
            i2c: I2cMock::new(expected),
            address: 0x27,
            lcd_type,
            delay: NoopDelay::new(),
            options: DisplayOptions::default(),
        };
        (GenericHD44780PCF8574T::new(true), config)
    }

    /// Controller that skipped the bus init but is otherwise ready
    fn initialized(
        lcd_type: LcdDisplayType,
        expected: &[I2cTransaction],
    ) -> (GenericHD44780PCF8574T, DeviceSetupConfig<I2cMock, NoopDelay>) {
        let (mut controller, config) = setup(lcd_type, expected);
        controller.initialized = true;
        controller.display_function.lines = if lcd_type.rows() > 1 {
            LineCount::Two
        } else {
            LineCount::One
        };
        (controller, config)
    }

    #[test]
    fn test_generic_hd44780_pcf8574t_init() {
        let expected = test_support::init_sequence(0x27, 0x28);
        let (mut controller, mut config) = setup(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.init(&mut config).is_ok());
        assert!(controller.is_initialized());
        assert_eq!(controller.function_set().bits(), 0x08);
        assert_eq!(controller.display_control(), DisplayControl::default());
        assert_eq!(controller.entry_mode(), EntryMode::default());
        assert_eq!(controller.cursor(), CursorPosition::HOME);

        config.i2c.done();
    }

    #[test]
    fn test_one_row_init_uses_one_line_mode() {
        let expected = test_support::init_sequence(0x27, 0x20);
        let (mut controller, mut config) = setup(LcdDisplayType::Lcd16x1, &expected);

        assert!(controller.init(&mut config).is_ok());
        assert_eq!(controller.function_set().lines, LineCount::One);
        config.i2c.done();
    }

    #[test]
    fn test_init_rejects_eight_bit_interface() {
        let (mut controller, mut config) = setup(LcdDisplayType::Lcd16x2, &[]);
        config.options.data_length = DataLength::EightBit;

        assert_eq!(
            controller.init(&mut config),
            Err(CharacterDisplayError::UnsupportedInterface)
        );
        assert!(!controller.is_initialized());
        config.i2c.done();
    }

    #[test]
    fn test_init_rejects_three_rows() {
        let (mut controller, mut config) = setup(
            LcdDisplayType::Custom {
                columns: 16,
                rows: 3,
            },
            &[],
        );
        assert_eq!(
            controller.init(&mut config),
            Err(CharacterDisplayError::UnsupportedDisplayType)
        );
        config.i2c.done();
    }

    #[test]
    fn test_init_failure_leaves_controller_uninitialized() {
        let expected = [
            I2cTransaction::write(0x27, std::vec![]),
            I2cTransaction::write(0x27, std::vec![0b0011_1000]).with_error(ErrorKind::Other),
        ];
        let (mut controller, mut config) = setup(LcdDisplayType::Lcd16x2, &expected);

        assert_eq!(
            controller.init(&mut config),
            Err(CharacterDisplayError::I2cError("function set", ErrorKind::Other))
        );
        assert!(!controller.is_initialized());
        config.i2c.done();
    }

    #[test]
    fn test_operations_require_init() {
        let (mut controller, mut config) = setup(LcdDisplayType::Lcd16x2, &[]);

        assert_eq!(
            controller.clear(&mut config),
            Err(CharacterDisplayError::NotInitialized)
        );
        assert_eq!(
            controller.set_cursor(&mut config, 0, 0),
            Err(CharacterDisplayError::NotInitialized)
        );
        assert_eq!(
            controller.write_char(&mut config, b'a'),
            Err(CharacterDisplayError::NotInitialized)
        );
        assert_eq!(
            controller.backlight(&mut config, false),
            Err(CharacterDisplayError::NotInitialized)
        );
        assert_eq!(
            controller.show_cursor(&mut config, true),
            Err(CharacterDisplayError::NotInitialized)
        );
        config.i2c.done();
    }

    #[test]
    fn test_generic_hd44780_pcf8574t_print() {
        let mut expected = std::vec::Vec::new();
        for c in "hello".bytes() {
            expected.extend(test_support::data(0x27, c));
        }
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.print(&mut config, "hello").is_ok());
        assert_eq!(controller.cursor(), CursorPosition::new(5, 0));

        config.i2c.done();
    }

    #[test]
    fn test_print_replaces_characters_outside_rom() {
        let mut expected = test_support::data(0x27, b'?');
        expected.extend(test_support::data(0x27, 0xDF));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.print(&mut config, "\u{263A}\u{00DF}").is_ok());
        config.i2c.done();
    }

    #[test]
    fn test_write_null_character_is_rejected() {
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &[]);
        assert_eq!(
            controller.write_char(&mut config, 0),
            Err(CharacterDisplayError::NullCharacter)
        );
        assert_eq!(controller.cursor(), CursorPosition::HOME);
        config.i2c.done();
    }

    #[test]
    fn test_write_wraps_to_row_two_on_four_row_display() {
        let mut expected = test_support::command(0x27, 0x80 | 19);
        expected.extend(test_support::data(0x27, b'x'));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd20x4, &expected);

        assert!(controller.set_cursor(&mut config, 19, 0).is_ok());
        assert!(controller.write_char(&mut config, b'x').is_ok());
        assert_eq!(controller.cursor(), CursorPosition::new(0, 2));
        config.i2c.done();
    }

    #[test]
    fn test_right_to_left_write_decrements() {
        let mut expected = test_support::command(0x27, 0x04);
        expected.extend(test_support::data(0x27, b'x'));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd20x4, &expected);

        assert!(controller.right_to_left(&mut config).is_ok());
        assert!(!controller.entry_mode().increment);
        assert!(controller.write_char(&mut config, b'x').is_ok());
        assert_eq!(controller.cursor(), CursorPosition::new(19, 3));
        config.i2c.done();
    }

    #[test]
    fn test_set_cursor_out_of_range() {
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &[]);

        assert_eq!(
            controller.set_cursor(&mut config, 16, 0),
            Err(CharacterDisplayError::ColumnOutOfRange)
        );
        assert_eq!(
            controller.set_cursor(&mut config, 0, 2),
            Err(CharacterDisplayError::RowOutOfRange)
        );
        assert_eq!(controller.cursor(), CursorPosition::HOME);
        config.i2c.done();
    }

    #[test]
    fn test_set_cursor_round_trips_every_cell() {
        for lcd_type in [
            LcdDisplayType::Lcd16x1,
            LcdDisplayType::Lcd16x2,
            LcdDisplayType::Lcd20x4,
        ] {
            let mut expected = std::vec::Vec::new();
            for row in 0..lcd_type.rows() {
                for col in 0..lcd_type.cols() {
                    expected.extend(test_support::command(
                        0x27,
                        0x80 | (col + ROW_OFFSETS[row as usize]),
                    ));
                }
            }
            let (mut controller, mut config) = initialized(lcd_type, &expected);
            for row in 0..lcd_type.rows() {
                for col in 0..lcd_type.cols() {
                    assert!(controller.set_cursor(&mut config, col, row).is_ok());
                    assert_eq!(controller.cursor(), CursorPosition::new(col, row));
                }
            }
            config.i2c.done();
        }
    }

    #[test]
    fn test_clear_forces_increment_mode() {
        let mut expected = test_support::command(0x27, 0x04);
        expected.extend(test_support::command(0x27, 0x80 | 0x45));
        expected.extend(test_support::command(0x27, 0x01));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.right_to_left(&mut config).is_ok());
        assert!(controller.set_cursor(&mut config, 5, 1).is_ok());
        assert!(controller.clear(&mut config).is_ok());
        assert!(controller.entry_mode().increment);
        assert_eq!(controller.cursor(), CursorPosition::HOME);
        config.i2c.done();
    }

    #[test]
    fn test_home_keeps_entry_mode() {
        let mut expected = test_support::command(0x27, 0x04);
        expected.extend(test_support::command(0x27, 0x02));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.right_to_left(&mut config).is_ok());
        assert!(controller.home(&mut config).is_ok());
        assert!(!controller.entry_mode().increment);
        config.i2c.done();
    }

    #[test]
    fn test_display_control_toggles() {
        let mut expected = test_support::command(0x27, 0x0E); // cursor on
        expected.extend(test_support::command(0x27, 0x0F)); // blink on
        expected.extend(test_support::command(0x27, 0x0B)); // display off
        expected.extend(test_support::command(0x27, 0x09)); // cursor off
        expected.extend(test_support::command(0x27, 0x08)); // blink off
        expected.extend(test_support::command(0x27, 0x0C)); // display on
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.show_cursor(&mut config, true).is_ok());
        assert!(controller.blink_cursor(&mut config, true).is_ok());
        assert!(controller.show_display(&mut config, false).is_ok());
        assert!(controller.show_cursor(&mut config, false).is_ok());
        assert!(controller.blink_cursor(&mut config, false).is_ok());
        assert!(controller.show_display(&mut config, true).is_ok());
        assert_eq!(controller.display_control(), DisplayControl::default());
        config.i2c.done();
    }

    #[test]
    fn test_failed_write_leaves_register_unchanged() {
        let expected = [
            I2cTransaction::write(0x27, std::vec![0b0000_1000]).with_error(ErrorKind::Bus)
        ];
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert_eq!(
            controller.show_cursor(&mut config, true),
            Err(CharacterDisplayError::I2cError("display control", ErrorKind::Bus))
        );
        assert!(!controller.display_control().cursor_on);
        config.i2c.done();
    }

    #[test]
    fn test_failed_set_cursor_keeps_cursor() {
        let mut expected = test_support::nibble(0x27, 0x8, false, true);
        expected.push(
            I2cTransaction::write(0x27, std::vec![0b0101_1000]).with_error(ErrorKind::Other),
        );
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd20x4, &expected);

        assert!(controller.set_cursor(&mut config, 5, 0).is_err());
        assert_eq!(controller.cursor(), CursorPosition::HOME);
        config.i2c.done();
    }

    #[test]
    fn test_scroll_moves_cursor_with_entry_mode() {
        let mut expected = test_support::command(0x27, 0x80 | 0x40 | 15);
        expected.extend(test_support::command(0x27, 0x18)); // shift display left
        expected.extend(test_support::command(0x27, 0x04)); // right to left
        expected.extend(test_support::command(0x27, 0x1C)); // shift display right
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.set_cursor(&mut config, 15, 1).is_ok());
        assert!(controller.scroll(&mut config, ShiftDirection::Left).is_ok());
        assert_eq!(controller.cursor(), CursorPosition::new(0, 0));
        assert!(controller.right_to_left(&mut config).is_ok());
        assert!(controller.scroll(&mut config, ShiftDirection::Right).is_ok());
        assert_eq!(controller.cursor(), CursorPosition::new(15, 1));
        config.i2c.done();
    }

    #[test]
    fn test_autoscroll() {
        let expected = test_support::command(0x27, 0x06);
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert_eq!(
            controller.autoscroll(&mut config, true),
            Err(CharacterDisplayError::UnsupportedOperation)
        );
        assert!(controller.autoscroll(&mut config, false).is_ok());
        assert!(!controller.entry_mode().display_shift);
        config.i2c.done();
    }

    #[test]
    fn test_generic_hd44780_pcf8574t_set_backlight() {
        let expected = [
            I2cTransaction::write(0x27, std::vec![0b0000_0000]), // backlight off
            I2cTransaction::write(0x27, std::vec![0b0000_1000]), // backlight on
        ];
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.backlight(&mut config, false).is_ok());
        assert!(!controller.backlight_enabled());
        assert!(controller.backlight(&mut config, true).is_ok());
        assert!(controller.backlight_enabled());
        config.i2c.done();
    }

    #[test]
    fn test_backlight_bit_rides_on_later_bytes() {
        let mut expected = std::vec![I2cTransaction::write(0x27, std::vec![0b0000_0000])];
        expected.extend(test_support::byte(0x27, b'A', true, false));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.backlight(&mut config, false).is_ok());
        assert!(controller.write_char(&mut config, b'A').is_ok());
        config.i2c.done();
    }

    #[test]
    fn test_failed_backlight_write_keeps_previous_state() {
        let expected = [
            I2cTransaction::write(0x27, std::vec![0b0000_0000]).with_error(ErrorKind::Other)
        ];
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.backlight(&mut config, false).is_err());
        assert!(controller.backlight_enabled());
        config.i2c.done();
    }

    #[test]
    fn test_backlight_after_failed_enable_pulse_keeps_enable_low() {
        let expected = [
            // high nibble of 'A' goes out, raising Enable fails
            I2cTransaction::write(0x27, std::vec![0b0100_1001]),
            I2cTransaction::write(0x27, std::vec![0b0100_1101]).with_error(ErrorKind::Other),
            // backlight off, Enable low
            I2cTransaction::write(0x27, std::vec![0b0100_0001]),
        ];
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert_eq!(
            controller.write_char(&mut config, b'A'),
            Err(CharacterDisplayError::I2cError("write data", ErrorKind::Other))
        );
        assert_eq!(controller.cursor(), CursorPosition::HOME);
        assert!(controller.backlight(&mut config, false).is_ok());
        assert!(!controller.backlight_enabled());
        config.i2c.done();
    }

    #[test]
    fn test_create_char() {
        let glyph = [0x07, 0x0F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F, 0x1F];
        let mut expected = test_support::command(0x27, 0x80 | 0x40 | 2);
        expected.extend(test_support::command(0x27, 0x40 | (3 << 3)));
        for row in glyph {
            expected.extend(test_support::data(0x27, row));
        }
        // back to DDRAM at the cursor
        expected.extend(test_support::command(0x27, 0x80 | 0x40 | 2));
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &expected);

        assert!(controller.set_cursor(&mut config, 2, 1).is_ok());
        assert!(controller.create_char(&mut config, 3, glyph).is_ok());
        assert_eq!(controller.cursor(), CursorPosition::new(2, 1));
        config.i2c.done();
    }

    #[test]
    fn test_create_char_slot_out_of_range() {
        let (mut controller, mut config) = initialized(LcdDisplayType::Lcd16x2, &[]);
        assert_eq!(
            controller.create_char(&mut config, 8, [0; 8]),
            Err(CharacterDisplayError::GlyphSlotOutOfRange)
        );
        config.i2c.done();
    }
}
