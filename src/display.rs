//! The main API to the rasterizer. A [`Display`] owns the bus interface, the shadow column
//! cache, and the pen state (active font, foreground and background colour), and exposes
//! character, text, raw bitmap, and user-defined glyph drawing at arbitrary pixel positions.
//!
//! Every draw addresses a window covering exactly the columns it will touch, then streams packed
//! pixel data through the packing engine. Draws are synchronous and non-reentrant; `&mut self`
//! throughout means a single logical thread of control drives the panel, which is what keeps the
//! shadow cache coherent without locking.

use core::cmp;

use crate::cache::ShadowCache;
use crate::command::{BufCommand, Command, NUM_PIXEL_COLS, NUM_PIXEL_ROWS, SEG_OFFSET};
use crate::font::{Font, Source};
use crate::interface::DisplayInterface;
use crate::packer;
use crate::Error;

/// Number of user-definable glyph slots.
const USER_GLYPH_SLOTS: usize = 8;

/// A rasterizing driver for a 256x64 4-bit grayscale panel.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    font: Font,
    foreground: u8,
    background: u8,
    cache: ShadowCache,
    user_glyphs: [[u8; 8]; USER_GLYPH_SLOTS],
}

/// Apply a signed glyph offset to a pen coordinate, clamping at the panel edge.
fn offset_origin(v: i16, offset: i8) -> u16 {
    cmp::max(v as i32 + offset as i32, 0) as u16
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a driver writing through `iface`, initially drawing with `font` in white on
    /// black. The panel itself is assumed to already be powered up and configured by the
    /// surrounding firmware.
    pub fn new(iface: DI, font: Font) -> Self {
        Display {
            iface,
            font,
            foreground: 15,
            background: 0,
            cache: ShadowCache::new(),
            user_glyphs: [[0; 8]; USER_GLYPH_SLOTS],
        }
    }

    /// Release the bus interface.
    pub fn release(self) -> DI {
        self.iface
    }

    /// Select the font used by subsequent text draws.
    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    /// Set the pen foreground colour index (0-15). Takes effect on the next draw.
    pub fn set_foreground(&mut self, colour: u8) {
        self.foreground = colour & 0x0F;
    }

    /// Set the pen background colour index (0-15). Takes effect on the next draw.
    pub fn set_background(&mut self, colour: u8) {
        self.background = colour & 0x0F;
    }

    /// Advance width and line height for `ch` in the active font. Pure query; no bus traffic.
    pub fn measure(&self, ch: u8) -> (u8, u8) {
        self.font.measure(ch)
    }

    /// Draw one character with its top-left pen position at `(x, y)`, returning the horizontal
    /// advance for the caller's layout. Characters the font cannot represent degrade to its
    /// substitute glyph; a rectangle that would leave the panel is rejected with
    /// [`Error::Bounds`] before any bus traffic.
    ///
    /// Blank (space) glyphs paint background over their advance box rather than drawing
    /// nothing, so the shadow cache stays consistent with what the panel actually holds.
    pub fn draw_char(&mut self, x: i16, y: i16, ch: u8, colour: u8, bg: u8) -> Result<u8, Error> {
        let colour = colour & 0x0F;
        let mut bg = bg & 0x0F;
        if colour == bg {
            // A glyph drawn in its own background colour would be invisible; force the
            // background to black so the ink remains distinct.
            bg = 0;
        }

        let glyph = self.font.glyph(ch);
        let (width, height) = match glyph.source {
            Source::Blank => (glyph.advance as u16, self.font.height() as u16),
            Source::Packed { .. } => (glyph.width as u16, glyph.height as u16),
        };
        if width == 0 || height == 0 {
            return Ok(glyph.advance);
        }

        let x = offset_origin(x, glyph.xoffset);
        let y = offset_origin(y, glyph.yoffset);
        self.set_window(x, y, width, height)?;

        match glyph.source {
            Source::Blank => {
                packer::blit(&mut self.iface, &mut self.cache, x, y, width, height, bg, |_, _| bg)?
            }
            Source::Packed { data, stride } => packer::blit(
                &mut self.iface,
                &mut self.cache,
                x,
                y,
                width,
                height,
                bg,
                |xind, yind| {
                    let byte = data[yind as usize * stride + (xind / 2) as usize];
                    let sample = if xind % 2 == 0 { byte >> 4 } else { byte & 0x0F };
                    if sample != 0 {
                        colour
                    } else {
                        bg
                    }
                },
            )?,
        }
        Ok(glyph.advance)
    }

    /// Draw a run of characters left to right starting at `(x, y)` using the pen colours,
    /// returning the total advance. No wrapping is performed; a run that reaches the right edge
    /// of the panel fails with [`Error::Bounds`] at the offending character.
    pub fn draw_text(&mut self, x: i16, y: i16, text: &str) -> Result<u16, Error> {
        let (colour, bg) = (self.foreground, self.background);
        let mut advance = 0u16;
        for ch in text.bytes() {
            advance += self.draw_char(x + advance as i16, y, ch, colour, bg)? as u16;
        }
        Ok(advance)
    }

    /// Blit a pre-packed image at `(x, y)`. `pixels` holds `height` rows of `ceil(width / 4)`
    /// 16-bit words, each word 4 pixels MSB-first; samples are panel colour indices used as-is.
    /// The same alignment and shadow-cache merge rules apply as for glyphs.
    pub fn draw_bitmap(
        &mut self,
        x: i16,
        y: i16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let stride = ((width + 3) / 4) as usize;
        if pixels.len() < stride * height as usize {
            return Err(Error::Bounds);
        }
        let x = offset_origin(x, 0);
        let y = offset_origin(y, 0);
        self.set_window(x, y, width, height)?;
        let bg = self.background;
        packer::blit(
            &mut self.iface,
            &mut self.cache,
            x,
            y,
            width,
            height,
            bg,
            |xind, yind| {
                let word = pixels[yind as usize * stride + (xind / 4) as usize];
                (word >> (4 * (3 - xind % 4)) & 0x0F) as u8
            },
        )
    }

    /// Store an 8x8, 1-bit-per-pixel pattern in user glyph slot `index` (0-7). Each byte is one
    /// row, MSB leftmost.
    pub fn define_glyph(&mut self, index: u8, rows: [u8; 8]) -> Result<(), Error> {
        if index as usize >= USER_GLYPH_SLOTS {
            return Err(Error::InvalidIndex);
        }
        self.user_glyphs[index as usize] = rows;
        Ok(())
    }

    /// Draw user glyph slot `index` at `(x, y)` in the pen colours, returning its fixed advance
    /// of 8.
    pub fn draw_user_glyph(&mut self, x: i16, y: i16, index: u8) -> Result<u8, Error> {
        if index as usize >= USER_GLYPH_SLOTS {
            return Err(Error::InvalidIndex);
        }
        let rows = self.user_glyphs[index as usize];
        let colour = self.foreground;
        let bg = if self.background == colour {
            0
        } else {
            self.background
        };
        let x = offset_origin(x, 0);
        let y = offset_origin(y, 0);
        self.set_window(x, y, 8, 8)?;
        packer::blit(
            &mut self.iface,
            &mut self.cache,
            x,
            y,
            8,
            8,
            bg,
            |xind, yind| {
                if rows[yind as usize] & (0x80 >> xind) != 0 {
                    colour
                } else {
                    bg
                }
            },
        )?;
        Ok(8)
    }

    /// Flood the whole panel with one colour and forget the shadow cache, since every column
    /// has been rewritten.
    pub fn fill(&mut self, colour: u8) -> Result<(), Error> {
        let colour = colour & 0x0F;
        self.set_window(0, 0, NUM_PIXEL_COLS, NUM_PIXEL_ROWS as u16)?;

        // Paint using constant memory by repeatedly writing a fixed chunk.
        let byte = colour << 4 | colour;
        let chunk = [byte; 32];
        let total = NUM_PIXEL_COLS as usize * NUM_PIXEL_ROWS as usize / 2;
        let mut written = 0;
        while written < total {
            let n = cmp::min(chunk.len(), total - written);
            self.iface.send_data(&chunk[..n])?;
            written += n;
        }

        self.cache.reset();
        Ok(())
    }

    /// Clear the panel to the pen background colour.
    pub fn clear(&mut self) -> Result<(), Error> {
        self.fill(self.background)
    }

    /// Address a window of exactly `[x, x + width) x [y, y + height)` and put the controller in
    /// pixel-write mode. Column addressing has 4-pixel granularity, so the window covers the
    /// columns containing the end pixels.
    fn set_window(&mut self, x: u16, y: u16, width: u16, height: u16) -> Result<(), Error> {
        if x as u32 + width as u32 > NUM_PIXEL_COLS as u32
            || y as u32 + height as u32 > NUM_PIXEL_ROWS as u32
        {
            return Err(Error::Bounds);
        }
        let left = SEG_OFFSET + (x / 4) as u8;
        let right = SEG_OFFSET + ((x + width - 1) / 4) as u8;
        Command::SetColumnAddress(left, right).send(&mut self.iface)?;
        Command::SetRowAddress(y as u8, (y + height - 1) as u8).send(&mut self.iface)?;
        BufCommand::WriteImageData(&[]).send(&mut self.iface)
    }
}
