//! The pixel packing engine: converts 4-bit samples into the panel's packed column wire format,
//! honoring sub-column horizontal alignment by merging against the shadow cache.
//!
//! The wire format packs 4 pixels into one 16-bit column, MSB-first, transmitted high byte
//! first. A draw starting at a pixel x not divisible by 4 owns only the trailing nibble
//! positions of its first column; the leading positions belong to whatever was drawn before, and
//! must be replayed from the cache (or filled with background when the cache has no record of
//! that column).

use crate::cache::ShadowCache;
use crate::command::NUM_PIXEL_COLS;
use crate::interface::DisplayInterface;
use crate::Error;

/// One row can span every panel column plus a partial column at each end.
const ROW_BUF_BYTES: usize = (NUM_PIXEL_COLS as usize / 4 + 1) * 2;

/// Assembles 4-bit pixels into 4-pixel, 2-byte packed columns.
///
/// Pixels enter through [`push`](ColumnPacker::push) in left-to-right order and accumulate in a
/// 16-bit working register; each time the register holds a complete column it is emitted into an
/// internal row buffer as two bytes, high byte first. [`finish`](ColumnPacker::finish) flushes a
/// trailing partial column with zero filler in the positions no pixel reached.
pub(crate) struct ColumnPacker {
    buf: [u8; ROW_BUF_BYTES],
    len: usize,
    reg: u16,
    filled: u8,
}

impl ColumnPacker {
    pub fn new() -> Self {
        ColumnPacker {
            buf: [0; ROW_BUF_BYTES],
            len: 0,
            reg: 0,
            filled: 0,
        }
    }

    /// Preload `count` nibble positions, already packed into the low bits of `reg`. Used to
    /// replay the owned-by-someone-else left edge of an unaligned draw. Must be called before
    /// any `push`, with `count < 4`.
    pub fn seed(&mut self, reg: u16, count: u8) {
        self.reg = reg;
        self.filled = count;
    }

    /// Append one 4-bit pixel, emitting a completed column when this is its 4th nibble.
    pub fn push(&mut self, nibble: u8) {
        self.reg = self.reg << 4 | (nibble & 0x0F) as u16;
        self.filled += 1;
        if self.filled == 4 {
            self.buf[self.len] = (self.reg >> 8) as u8;
            self.buf[self.len + 1] = self.reg as u8;
            self.len += 2;
            self.reg = 0;
            self.filled = 0;
        }
    }

    /// Flush a trailing partial column, if any, left-aligning its pixels and zero-filling the
    /// rest. Returns the packed value of that final column, or 0 when the pixels ended exactly
    /// on a column boundary; either way the return value is what the shadow cache must record
    /// for the row.
    pub fn finish(&mut self) -> u16 {
        if self.filled == 0 {
            return 0;
        }
        let reg = self.reg << (4 * (4 - self.filled as u16));
        self.buf[self.len] = (reg >> 8) as u8;
        self.buf[self.len + 1] = reg as u8;
        self.len += 2;
        self.reg = 0;
        self.filled = 0;
        reg
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Paint a `width` x `height` rectangle of 4-bit pixels at pixel position `(x, y)`, where `x`
/// need not be aligned to the 4-pixel column granularity. `sample` supplies the pixel value for
/// each `(column, row)` offset within the rectangle.
///
/// The caller must already have addressed a window covering exactly the columns this blit spans
/// and put the controller in pixel-write mode; this function only streams data bytes and keeps
/// the shadow cache coherent. Per row it:
///
/// 1. replays the left partial column from the cache when the cache's recorded address matches
///    `x / 4`, or fills the unowned positions with `background` when it does not (the true
///    contents are unknowable host-side),
/// 2. packs and streams the row's pixels, and
/// 3. records the rightmost column reached, `(x + width) / 4`, and the packed value of a
///    trailing partial column so the next adjacent draw can merge against it.
pub(crate) fn blit<DI, F>(
    iface: &mut DI,
    cache: &mut ShadowCache,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    background: u8,
    mut sample: F,
) -> Result<(), Error>
where
    DI: DisplayInterface,
    F: FnMut(u16, u16) -> u8,
{
    let xoff = (x % 4) as u8;
    let left_col = (x / 4) as u8;
    let end_col = ((x + width) / 4) as u8;

    for yind in 0..height {
        let row = (y + yind) as usize;
        let mut packer = ColumnPacker::new();

        if xoff != 0 {
            let prev = cache.peek(row);
            if prev.addr == left_col {
                // The previous draw on this row ended inside our first column; replay the
                // nibbles it owns so the flush below does not erase them.
                packer.seed(prev.pixels >> (4 * (4 - xoff as u16)), xoff);
            } else {
                for _ in 0..xoff {
                    packer.push(background);
                }
            }
        }

        for xind in 0..width {
            packer.push(sample(xind, yind));
        }

        let last = packer.finish();
        iface.send_data(packer.bytes())?;
        cache.commit(row, end_col, last);
    }
    Ok(())
}
