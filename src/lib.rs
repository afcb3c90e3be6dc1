//! Glyph and bitmap rasterizer for 256x64, 4-bit grayscale OLED modules driven over a
//! command/data serial bus.
//!
//! The display RAM on these modules is addressable only in columns of 4 horizontally-adjacent
//! pixels (two bytes per column), and the bus is write-only: there is no way to read back what a
//! previous draw left in a column. Drawing variable-width glyphs at arbitrary pixel positions
//! therefore requires merging new pixel data into partially-shared columns using a host-side
//! shadow of the last write to each row. That merge logic is the heart of this crate; the
//! [`display::Display`] type wraps it with font resolution, raw bitmap blits, and whole-panel
//! fills.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod display;
pub mod font;
pub mod interface;

mod cache;
mod packer;

// Re-exports for primary API.
pub use crate::display::Display;
pub use crate::font::{BaseFont, BaseWidth, Font, HqFont, HqGlyph};
pub use crate::interface::spi::SpiInterface;

/// Errors surfaced by drawing operations.
///
/// Character resolution itself never fails; unresolvable characters degrade to a font's default
/// glyph instead, because a half-drawn glyph on a write-only panel cannot be rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested rectangle does not fit on the panel.
    Bounds,
    /// A user-defined glyph slot index is out of range.
    InvalidIndex,
    /// The bus rejected a transfer.
    Bus,
}

impl From<()> for Error {
    fn from(_: ()) -> Self {
        Error::Bus
    }
}
