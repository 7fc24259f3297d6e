// HD44780 instruction set, per Table 6 of the HD44780U datasheet. The controller's persistent
// registers are kept as named fields and only packed into an instruction byte when sent.

// commands
pub(crate) const LCD_CMD_CLEARDISPLAY: u8 = 0x01; //  Clear display, set cursor position to zero
pub(crate) const LCD_CMD_RETURNHOME: u8 = 0x02; //  Set cursor position to zero
pub(crate) const LCD_CMD_ENTRYMODESET: u8 = 0x04; //  Sets the entry mode
pub(crate) const LCD_CMD_DISPLAYCONTROL: u8 = 0x08; //  Controls the display; does stuff like turning it off and on
pub(crate) const LCD_CMD_CURSORSHIFT: u8 = 0x10; //  Lets you move the cursor or the display
pub(crate) const LCD_CMD_FUNCTIONSET: u8 = 0x20; //  Used to send the function to set to the display
pub(crate) const LCD_CMD_SETCGRAMADDR: u8 = 0x40; //  Used to set the CGRAM (character generator RAM) address
pub(crate) const LCD_CMD_SETDDRAMADDR: u8 = 0x80; //  Used to set the DDRAM (Display Data RAM) address

// flags for display entry mode
const LCD_FLAG_ENTRYINCREMENT: u8 = 0x02; //  DDRAM address increments after each write
const LCD_FLAG_ENTRYDISPLAYSHIFT: u8 = 0x01; //  Whole display shifts after each write

// flags for display on/off control
const LCD_FLAG_DISPLAYON: u8 = 0x04; //  Turns the display on
const LCD_FLAG_CURSORON: u8 = 0x02; //  Turns the cursor on
const LCD_FLAG_BLINKON: u8 = 0x01; //  Turns on the blinking cursor

// flags for display/cursor shift
const LCD_FLAG_DISPLAYMOVE: u8 = 0x08; //  Flag for moving the display
const LCD_FLAG_MOVERIGHT: u8 = 0x04; //  Flag for moving right

// flags for function set
pub(crate) const LCD_FLAG_8BITMODE: u8 = 0x10; //  LCD 8 bit mode
const LCD_FLAG_2LINE: u8 = 0x08; //  LCD 2 line mode
const LCD_FLAG_5x10_DOTS: u8 = 0x04; //  10 pixel high font mode

/// DDRAM base address of each display row.
pub(crate) const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

// execution times in microseconds
pub(crate) const LCD_STD_EXEC_TIME_US: u32 = 40;
pub(crate) const LCD_HOME_EXEC_TIME_US: u32 = 1_520;
pub(crate) const LCD_CLEAR_EXEC_TIME_US: u32 = 1_520;
pub(crate) const LCD_DATA_EXEC_TIME_US: u32 = 43;

/// Width of the controller's data bus.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DataLength {
    /// 4 data lines. The only width reachable through a PCF8574.
    FourBit,
    /// 8 data lines. Not supported by this driver.
    EightBit,
}

/// Number of electrical display lines the controller drives.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LineCount {
    One,
    Two,
}

/// Character font. The 5x10 font is only honoured by the controller in one-line mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FontSize {
    Dots5x8,
    Dots5x10,
}

/// Function set register. Written once during initialization.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FunctionSet {
    pub data_length: DataLength,
    pub lines: LineCount,
    pub font: FontSize,
}

impl FunctionSet {
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if matches!(self.data_length, DataLength::EightBit) {
            bits |= LCD_FLAG_8BITMODE;
        }
        if matches!(self.lines, LineCount::Two) {
            bits |= LCD_FLAG_2LINE;
        }
        if matches!(self.font, FontSize::Dots5x10) {
            bits |= LCD_FLAG_5x10_DOTS;
        }
        bits
    }
}

impl Default for FunctionSet {
    fn default() -> Self {
        Self {
            data_length: DataLength::FourBit,
            lines: LineCount::Two,
            font: FontSize::Dots5x8,
        }
    }
}

/// Display on/off control register.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DisplayControl {
    pub display_on: bool,
    pub cursor_on: bool,
    pub blink_on: bool,
}

impl DisplayControl {
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.display_on {
            bits |= LCD_FLAG_DISPLAYON;
        }
        if self.cursor_on {
            bits |= LCD_FLAG_CURSORON;
        }
        if self.blink_on {
            bits |= LCD_FLAG_BLINKON;
        }
        bits
    }
}

impl Default for DisplayControl {
    /// display on, cursor off, blink off
    fn default() -> Self {
        Self {
            display_on: true,
            cursor_on: false,
            blink_on: false,
        }
    }
}

/// Entry mode register.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct EntryMode {
    /// `true` moves the cursor right (increments DDRAM address) after each write.
    pub increment: bool,
    /// `true` shifts the whole display after each write.
    pub display_shift: bool,
}

impl EntryMode {
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.increment {
            bits |= LCD_FLAG_ENTRYINCREMENT;
        }
        if self.display_shift {
            bits |= LCD_FLAG_ENTRYDISPLAYSHIFT;
        }
        bits
    }
}

impl Default for EntryMode {
    /// increment, no display shift
    fn default() -> Self {
        Self {
            increment: true,
            display_shift: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ShiftDirection {
    Left,
    Right,
}

/// One HD44780 instruction together with its operands.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Instruction {
    ClearDisplay,
    ReturnHome,
    EntryModeSet(EntryMode),
    DisplayControl(DisplayControl),
    CursorShift {
        display_move: bool,
        direction: ShiftDirection,
    },
    FunctionSet(FunctionSet),
    SetCgramAddress(u8),
    SetDdramAddress(u8),
}

impl Instruction {
    /// The instruction byte as sent over the (4-bit) data bus
    pub(crate) const fn bits(&self) -> u8 {
        match self {
            Instruction::ClearDisplay => LCD_CMD_CLEARDISPLAY,
            Instruction::ReturnHome => LCD_CMD_RETURNHOME,
            Instruction::EntryModeSet(mode) => LCD_CMD_ENTRYMODESET | mode.bits(),
            Instruction::DisplayControl(control) => LCD_CMD_DISPLAYCONTROL | control.bits(),
            Instruction::CursorShift {
                display_move,
                direction,
            } => {
                let mut bits = LCD_CMD_CURSORSHIFT;
                if *display_move {
                    bits |= LCD_FLAG_DISPLAYMOVE;
                }
                if matches!(direction, ShiftDirection::Right) {
                    bits |= LCD_FLAG_MOVERIGHT;
                }
                bits
            }
            Instruction::FunctionSet(function) => LCD_CMD_FUNCTIONSET | function.bits(),
            Instruction::SetCgramAddress(address) => LCD_CMD_SETCGRAMADDR | (*address & 0x3F),
            Instruction::SetDdramAddress(address) => LCD_CMD_SETDDRAMADDR | (*address & 0x7F),
        }
    }

    /// Time the controller needs to execute the instruction after the final enable pulse.
    pub(crate) const fn execution_time_us(&self) -> u32 {
        match self {
            Instruction::ClearDisplay => LCD_CLEAR_EXEC_TIME_US,
            Instruction::ReturnHome => LCD_HOME_EXEC_TIME_US,
            _ => LCD_STD_EXEC_TIME_US,
        }
    }

    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Instruction::ClearDisplay => "clear display",
            Instruction::ReturnHome => "return home",
            Instruction::EntryModeSet(_) => "entry mode set",
            Instruction::DisplayControl(_) => "display control",
            Instruction::CursorShift { .. } => "cursor shift",
            Instruction::FunctionSet(_) => "function set",
            Instruction::SetCgramAddress(_) => "set CGRAM address",
            Instruction::SetDdramAddress(_) => "set DDRAM address",
        }
    }
}
