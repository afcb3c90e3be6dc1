//! Host-side shadow of the most recent write to each display row.
//!
//! The bus is write-only, so when a draw lands partway into a 4-pixel column the hardware cannot
//! be asked what the other pixels of that column currently hold. Instead, every draw records the
//! rightmost column it touched on each row, along with the packed value it left there. A later
//! draw whose left edge falls in that same column can then reconstruct the pixels it must
//! preserve; anywhere else, the true column contents are unknowable and are treated as blank.

use crate::command::{NUM_BUF_COLS, NUM_PIXEL_ROWS};

/// The last write to one display row: the 4-pixel column address reached and the packed value
/// left in that column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnState {
    pub addr: u8,
    pub pixels: u16,
}

impl ColumnState {
    /// A row with no write on record. The address lies past the last real column, so it can
    /// never equal a draw's left column and no merge fires against it. Column 0 in particular
    /// must not be the resting state, or an unaligned first draw at the panel's left edge would
    /// mistake it for its own earlier output.
    pub const VACANT: ColumnState = ColumnState {
        addr: NUM_BUF_COLS,
        pixels: 0,
    };
}

/// One [`ColumnState`] per display row.
pub struct ShadowCache {
    rows: [ColumnState; NUM_PIXEL_ROWS as usize],
}

impl ShadowCache {
    pub fn new() -> Self {
        ShadowCache {
            rows: [ColumnState::VACANT; NUM_PIXEL_ROWS as usize],
        }
    }

    pub fn peek(&self, row: usize) -> ColumnState {
        self.rows[row]
    }

    pub fn commit(&mut self, row: usize, addr: u8, pixels: u16) {
        self.rows[row] = ColumnState { addr, pixels };
    }

    /// Forget everything. Must accompany any whole-panel fill, since a fill rewrites every
    /// column behind the cache's back.
    pub fn reset(&mut self) {
        for row in self.rows.iter_mut() {
            *row = ColumnState::VACANT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_vacant() {
        let cache = ShadowCache::new();
        assert_eq!(cache.peek(0), ColumnState::VACANT);
        assert_eq!(cache.peek(63), ColumnState::VACANT);
    }

    #[test]
    fn vacant_address_is_past_every_real_column() {
        // Left columns of real draws run 0..NUM_BUF_COLS, so the vacant address matches none.
        assert_eq!(ColumnState::VACANT.addr, NUM_BUF_COLS);
    }

    #[test]
    fn commit_then_peek() {
        let mut cache = ShadowCache::new();
        cache.commit(10, 3, 0xF0A0);
        assert_eq!(
            cache.peek(10),
            ColumnState {
                addr: 3,
                pixels: 0xF0A0
            }
        );
        // Other rows are unaffected.
        assert_eq!(cache.peek(9), ColumnState::VACANT);
        assert_eq!(cache.peek(11), ColumnState::VACANT);
    }

    #[test]
    fn reset_vacates_every_row() {
        let mut cache = ShadowCache::new();
        for row in 0..NUM_PIXEL_ROWS as usize {
            cache.commit(row, 5, 0x1234);
        }
        cache.reset();
        for row in 0..NUM_PIXEL_ROWS as usize {
            assert_eq!(cache.peek(row), ColumnState::VACANT);
        }
    }
}
