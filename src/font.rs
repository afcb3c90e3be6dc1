//! Font descriptors and character-to-glyph resolution.
//!
//! Two independently evolved table formats are serviced: the "base" format, where every glyph in
//! a font shares one height and bitmaps live in a single dense table (fixed- or
//! width-table-variable advance), and the "HQ" format, where each glyph carries its own bounding
//! box and pen offsets so the painted rectangle can be tighter than (or hang outside) the
//! horizontal advance. Both store bitmaps row-major as 4-bit samples packed two per byte, MSB
//! first.
//!
//! Resolution never fails: characters a font cannot represent degrade to a substitute glyph.
//! Malformed font tables (width table shorter than the glyph range, bitmap table truncated) are
//! a data authoring defect and will panic on slice indexing rather than being checked at
//! runtime.

/// Advance width handling for base-format fonts.
#[derive(Clone, Copy)]
pub enum BaseWidth {
    /// Every glyph advances by the same amount.
    Fixed(u8),
    /// Per-glyph advance, indexed by the zero-based glyph index.
    Table(&'static [u8]),
}

/// A base-format font: one shared glyph height, bitmaps in a dense table addressed by
/// `(ch - first) * store_width * height`.
pub struct BaseFont {
    /// Bytes per bitmap row (2 pixels per byte).
    pub store_width: u8,
    /// Height of every glyph in the font.
    pub height: u8,
    /// Concatenated glyph bitmaps.
    pub glyphs: &'static [u8],
    pub width: BaseWidth,
    /// First and last character codes with a glyph in the table.
    pub first: u8,
    pub last: u8,
    /// Character substituted for out-of-range input when no remap table exists.
    pub fallback: u8,
    /// Arbitrary byte-to-byte substitution consulted for out-of-range input.
    pub remap: Option<&'static [u8; 256]>,
}

/// One glyph of an HQ-format font.
///
/// `width` is the horizontal advance; `xrect`/`yrect` are the dimensions of the painted
/// rectangle, which need not fit inside the advance. A `None` bitmap marks a blank glyph that
/// consumes advance only.
pub struct HqGlyph {
    pub width: u8,
    pub xrect: u8,
    pub yrect: u8,
    pub xoffset: i8,
    pub yoffset: i8,
    pub bitmap: Option<&'static [u8]>,
}

/// An HQ-format font. `map` densely indexes the printable ASCII range `[' ', 0x7F]`; anything
/// outside it resolves to glyph 0 (space).
pub struct HqFont {
    pub glyphs: &'static [HqGlyph],
    pub map: &'static [u8],
    pub height: u8,
}

/// A handle to either font format. Adding a third format is a compile-time-checked change at
/// every dispatch site.
#[derive(Clone, Copy)]
pub enum Font {
    Base(&'static BaseFont),
    Hq(&'static HqFont),
}

/// Geometry and bitmap for one resolved character.
#[derive(Clone, Copy)]
pub struct Glyph {
    /// Horizontal distance the pen moves after drawing.
    pub advance: u8,
    /// Width of the painted rectangle. Zero for blank glyphs.
    pub width: u8,
    /// Height of the painted rectangle. Zero for blank glyphs.
    pub height: u8,
    pub xoffset: i8,
    pub yoffset: i8,
    pub(crate) source: Source,
}

#[derive(Clone, Copy)]
pub(crate) enum Source {
    /// No ink; paint background over the advance box.
    Blank,
    /// Row-major 4-bit samples, 2 per byte MSB-first, `stride` bytes per row.
    Packed {
        data: &'static [u8],
        stride: usize,
    },
}

impl Font {
    /// Font-wide line height.
    pub fn height(&self) -> u8 {
        match *self {
            Font::Base(f) => f.height,
            Font::Hq(f) => f.height,
        }
    }

    /// Resolve a character to its glyph geometry and bitmap. Touches no bus; always succeeds.
    pub fn glyph(&self, ch: u8) -> Glyph {
        match *self {
            Font::Base(f) => base_glyph(f, ch),
            Font::Hq(f) => hq_glyph(f, ch),
        }
    }

    /// Advance width and line height for a character, for layout without drawing.
    pub fn measure(&self, ch: u8) -> (u8, u8) {
        (self.glyph(ch).advance, self.height())
    }
}

fn base_glyph(f: &'static BaseFont, ch: u8) -> Glyph {
    let ch = if ch < f.first || ch > f.last {
        match f.remap {
            Some(map) => map[ch as usize],
            None => f.fallback,
        }
    } else {
        ch
    };
    let index = (ch - f.first) as usize;
    let advance = match f.width {
        BaseWidth::Fixed(w) => w,
        BaseWidth::Table(widths) => widths[index],
    };
    let span = f.store_width as usize * f.height as usize;
    Glyph {
        advance,
        width: advance,
        height: f.height,
        xoffset: 0,
        yoffset: 0,
        source: Source::Packed {
            data: &f.glyphs[index * span..(index + 1) * span],
            stride: f.store_width as usize,
        },
    }
}

fn hq_glyph(f: &'static HqFont, ch: u8) -> Glyph {
    let index = if ch < b' ' || ch > 0x7F {
        0
    } else {
        f.map[(ch - b' ') as usize] as usize
    };
    let g = &f.glyphs[index];
    match g.bitmap {
        None => Glyph {
            advance: g.width,
            width: 0,
            height: 0,
            xoffset: 0,
            yoffset: 0,
            source: Source::Blank,
        },
        Some(data) => Glyph {
            // One blank trailing pixel column by convention.
            advance: (g.xrect as i16 + g.xoffset as i16 + 1) as u8,
            width: g.xrect,
            height: g.yrect,
            xoffset: g.xoffset,
            yoffset: g.yoffset,
            source: Source::Packed {
                data,
                stride: (g.xrect as usize + 1) / 2,
            },
        },
    }
}

#[cfg(test)]
pub(crate) mod test_fonts {
    //! Small synthetic fonts shared by the unit tests in this crate.

    use super::*;

    /// 4x2 fixed-width font covering 'A'..='B'. 'A' paints its corner pixels, 'B' its top row.
    pub static TINY_GLYPHS: [u8; 8] = [
        0xF0, 0x0F, // 'A' row 0: X..X
        0xFF, 0x00, // 'A' row 1: XX..
        0xF0, 0xF0, // 'B' row 0: X.X.
        0x0F, 0x0F, // 'B' row 1: .X.X
    ];

    pub static TINY: BaseFont = BaseFont {
        store_width: 2,
        height: 2,
        glyphs: &TINY_GLYPHS,
        width: BaseWidth::Fixed(4),
        first: b'A',
        last: b'B',
        fallback: b'B',
        remap: None,
    };

    /// 6-wide single-row font for exercising unaligned draws: 'A' is solid, 'B' is patterned
    /// with background at its edges.
    pub static WIDE_GLYPHS: [u8; 6] = [
        0xFF, 0xFF, 0xFF, // 'A': XXXXXX
        0x0F, 0xF0, 0x0F, // 'B': .XX..X
    ];

    pub static WIDE: BaseFont = BaseFont {
        store_width: 3,
        height: 1,
        glyphs: &WIDE_GLYPHS,
        width: BaseWidth::Fixed(6),
        first: b'A',
        last: b'B',
        fallback: b'A',
        remap: None,
    };

    pub static VAR_WIDTHS: [u8; 2] = [3, 4];

    /// Variable-width variant of TINY's glyph data.
    pub static VAR: BaseFont = BaseFont {
        store_width: 2,
        height: 2,
        glyphs: &TINY_GLYPHS,
        width: BaseWidth::Table(&VAR_WIDTHS),
        first: b'A',
        last: b'B',
        fallback: b'A',
        remap: None,
    };

    /// HQ font: glyph 0 is a 5-advance space, glyph 1 ('A') an 8x2 solid rect shifted left 3.
    pub static HQ_A_BITMAP: [u8; 8] = [0xFF; 8];

    pub static HQ_GLYPHS: [HqGlyph; 2] = [
        HqGlyph {
            width: 5,
            xrect: 0,
            yrect: 0,
            xoffset: 0,
            yoffset: 0,
            bitmap: None,
        },
        HqGlyph {
            width: 6,
            xrect: 8,
            yrect: 2,
            xoffset: -3,
            yoffset: 0,
            bitmap: Some(&HQ_A_BITMAP),
        },
    ];

    pub static HQ_MAP: [u8; 96] = {
        let mut map = [0u8; 96];
        map[(b'A' - b' ') as usize] = 1;
        map
    };

    pub static HQ: HqFont = HqFont {
        glyphs: &HQ_GLYPHS,
        map: &HQ_MAP,
        height: 2,
    };
}

#[cfg(test)]
mod tests {
    use super::test_fonts::*;
    use super::*;

    #[test]
    fn base_fixed_width_in_range() {
        let font = Font::Base(&TINY);
        let glyph = font.glyph(b'A');
        assert_eq!(glyph.advance, 4);
        assert_eq!(glyph.width, 4);
        assert_eq!(glyph.height, 2);
        assert_eq!((glyph.xoffset, glyph.yoffset), (0, 0));
        match glyph.source {
            Source::Packed { data, stride } => {
                assert_eq!(data, &TINY_GLYPHS[0..4]);
                assert_eq!(stride, 2);
            }
            Source::Blank => panic!("base glyph must carry a bitmap"),
        }
    }

    #[test]
    fn base_variable_width_uses_table() {
        let font = Font::Base(&VAR);
        assert_eq!(font.glyph(b'A').advance, 3);
        assert_eq!(font.glyph(b'B').advance, 4);
    }

    #[test]
    fn base_out_of_range_uses_fallback() {
        let font = Font::Base(&TINY);
        let fallback = font.glyph(TINY.fallback);
        for ch in [b'@', b'C', 0x00, 0xFF].iter() {
            let glyph = font.glyph(*ch);
            assert_eq!(glyph.advance, fallback.advance);
            match (glyph.source, fallback.source) {
                (Source::Packed { data: a, .. }, Source::Packed { data: b, .. }) => {
                    assert_eq!(a, b)
                }
                _ => panic!("expected bitmaps"),
            }
        }
    }

    #[test]
    fn base_out_of_range_prefers_remap_table() {
        static REMAP: [u8; 256] = {
            let mut map = [b'A'; 256];
            map[b'z' as usize] = b'B';
            map
        };
        static REMAPPED: BaseFont = BaseFont {
            store_width: 2,
            height: 2,
            glyphs: &TINY_GLYPHS,
            width: BaseWidth::Fixed(4),
            first: b'A',
            last: b'B',
            fallback: b'A',
            remap: Some(&REMAP),
        };
        let font = Font::Base(&REMAPPED);
        let z = font.glyph(b'z');
        let b = font.glyph(b'B');
        match (z.source, b.source) {
            (Source::Packed { data: a, .. }, Source::Packed { data: c, .. }) => assert_eq!(a, c),
            _ => panic!("expected bitmaps"),
        }
    }

    #[test]
    fn hq_space_is_blank_with_advance_only() {
        let font = Font::Hq(&HQ);
        let glyph = font.glyph(b' ');
        assert_eq!(glyph.advance, 5);
        assert_eq!((glyph.width, glyph.height), (0, 0));
        match glyph.source {
            Source::Blank => {}
            Source::Packed { .. } => panic!("space must be blank"),
        }
    }

    #[test]
    fn hq_inked_glyph_advance_includes_offset_and_gap() {
        let font = Font::Hq(&HQ);
        let glyph = font.glyph(b'A');
        // advance = xrect + xoffset + 1 = 8 - 3 + 1
        assert_eq!(glyph.advance, 6);
        assert_eq!((glyph.width, glyph.height), (8, 2));
        assert_eq!(glyph.xoffset, -3);
        match glyph.source {
            Source::Packed { stride, .. } => assert_eq!(stride, 4),
            Source::Blank => panic!("expected a bitmap"),
        }
    }

    #[test]
    fn hq_out_of_range_degrades_to_space() {
        let font = Font::Hq(&HQ);
        for ch in [0x05u8, 0x1F, 0x80, 0xFF].iter() {
            let glyph = font.glyph(*ch);
            assert_eq!(glyph.advance, 5);
            assert_eq!(glyph.width, 0);
        }
    }

    #[test]
    fn measure_is_advance_and_line_height() {
        assert_eq!(Font::Base(&TINY).measure(b'A'), (4, 2));
        assert_eq!(Font::Base(&VAR).measure(b'B'), (4, 2));
        assert_eq!(Font::Hq(&HQ).measure(b' '), (5, 2));
        assert_eq!(Font::Hq(&HQ).measure(b'A'), (6, 2));
    }
}
