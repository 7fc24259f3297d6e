// Cursor bookkeeping. The controller's address counter moves by one cell after every data write;
// when it runs off the end of a row it continues at whichever row's DDRAM block comes next, which
// for a four row display is not the next row down.

use crate::CharacterDisplayError;

/// Zero-indexed cursor position as tracked by the driver.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct CursorPosition {
    pub column: u8,
    pub row: u8,
}

impl CursorPosition {
    pub const HOME: Self = Self { column: 0, row: 0 };

    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }

    /// Position after the address counter increments once.
    pub(crate) fn advance<E>(self, columns: u8, rows: u8) -> Result<Self, CharacterDisplayError<E>> {
        if self.column >= columns {
            return Err(CharacterDisplayError::BadCursorPosition);
        }
        if self.column + 1 < columns {
            return Ok(Self::new(self.column + 1, self.row));
        }
        Ok(Self::new(0, next_row(self.row, rows)?))
    }

    /// Position after the address counter decrements once.
    pub(crate) fn retreat<E>(self, columns: u8, rows: u8) -> Result<Self, CharacterDisplayError<E>> {
        if self.column >= columns {
            return Err(CharacterDisplayError::BadCursorPosition);
        }
        if self.column > 0 {
            return Ok(Self::new(self.column - 1, self.row));
        }
        Ok(Self::new(columns - 1, previous_row(self.row, rows)?))
    }

    /// Moves one cell in the direction selected by the entry mode.
    pub(crate) fn step<E>(
        self,
        increment: bool,
        columns: u8,
        rows: u8,
    ) -> Result<Self, CharacterDisplayError<E>> {
        if increment {
            self.advance(columns, rows)
        } else {
            self.retreat(columns, rows)
        }
    }
}

/// Row the address counter lands on after running off the end of `row`.
/// Rows 0 and 2 share one DDRAM block (0x00..0x27), rows 1 and 3 the other (0x40..0x67).
/// A 1-row display wraps back to column 0 of row 0.
fn next_row<E>(row: u8, rows: u8) -> Result<u8, CharacterDisplayError<E>> {
    match (rows, row) {
        (1, 0) => Ok(0),
        (2, 0) => Ok(1),
        (2, 1) => Ok(0),
        (4, 0) => Ok(2),
        (4, 1) => Ok(3),
        (4, 2) => Ok(1),
        (4, 3) => Ok(0),
        _ => Err(CharacterDisplayError::BadCursorPosition),
    }
}

/// Inverse of `next_row`.
fn previous_row<E>(row: u8, rows: u8) -> Result<u8, CharacterDisplayError<E>> {
    match (rows, row) {
        (1, 0) => Ok(0),
        (2, 0) => Ok(1),
        (2, 1) => Ok(0),
        (4, 0) => Ok(3),
        (4, 1) => Ok(2),
        (4, 2) => Ok(0),
        (4, 3) => Ok(1),
        _ => Err(CharacterDisplayError::BadCursorPosition),
    }
}
