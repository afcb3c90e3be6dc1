//! The command subset the rasterizer consumes: window addressing and pixel data writes.
//!
//! The controller's display RAM is arranged in rows and columns, where each column is 4 adjacent
//! pixels in the row at 4 bits each, so every "column" address refers to a horizontal group of
//! two bytes driving 4 pixels. A 256-pixel-wide module only wires the middle 64 of the chip's
//! 120 column addresses, so pixel column 0 of the panel lives at column address [`SEG_OFFSET`].
//!
//! Power-on sequencing, remap, clock, and drive-strength commands are deliberately absent: the
//! surrounding firmware owns display bring-up, and this crate only ever addresses a window and
//! streams pixel data into it.

use crate::interface::DisplayInterface;
use crate::Error;

/// Width of the panel in pixels.
pub const NUM_PIXEL_COLS: u16 = 256;
/// Height of the panel in pixels (and rows in the shadow cache).
pub const NUM_PIXEL_ROWS: u8 = 64;
/// Column address of the leftmost panel pixel in the controller's 120-column RAM.
pub const SEG_OFFSET: u8 = 28;
/// Number of 4-pixel column addresses spanned by the panel.
pub const NUM_BUF_COLS: u8 = (NUM_PIXEL_COLS / 4) as u8;

const CHIP_BUF_COL_MAX: u8 = 119;
const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;

/// Commands which take a fixed argument list.
#[derive(Clone, Copy)]
pub enum Command {
    /// Set the column start and end address range for subsequent image data writes, in 4-pixel
    /// column addresses. The column address pointer is reset to the start address. Range 0-119.
    SetColumnAddress(u8, u8),
    /// Set the row start and end address range for subsequent image data writes. The row address
    /// pointer is reset to the start address.
    SetRowAddress(u8, u8),
}

/// Commands which borrow a buffer of data.
pub enum BufCommand<'buf> {
    /// Write image data into display RAM at the current address pointers, advancing them within
    /// the window set by `SetColumnAddress`/`SetRowAddress`.
    WriteImageData(&'buf [u8]),
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let (cmd, args) = match self {
            Command::SetColumnAddress(start, end) => {
                if start > CHIP_BUF_COL_MAX || end > CHIP_BUF_COL_MAX {
                    return Err(Error::Bounds);
                }
                (0x15, [start, end])
            }
            Command::SetRowAddress(start, end) => {
                if start > PIXEL_ROW_MAX || end > PIXEL_ROW_MAX {
                    return Err(Error::Bounds);
                }
                (0x75, [start, end])
            }
        };
        iface.send_command(cmd)?;
        iface.send_data(&args)?;
        Ok(())
    }
}

impl<'buf> BufCommand<'buf> {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        let (cmd, data) = match self {
            BufCommand::WriteImageData(buf) => (0x5C, buf),
        };
        iface.send_command(cmd)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(data)?;
            Ok(())
        }
    }
}
