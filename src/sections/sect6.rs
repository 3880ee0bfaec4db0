/// Section 6 presence mask, kept in its packed on-the-wire form.
///
/// Bit 1 of each octet (most significant) corresponds to the first of its
/// eight grid points; a set bit means a value is present in the data section.
pub struct BitMap {
    /// Code table 6.0: 0 bitmap attached, 254 previously defined bitmap
    /// applies, 255 none.
    pub bitmap_indicator: u8,
    pub bitmap: Vec<u8>,
}

impl BitMap {
    pub fn new(bitmap_indicator: u8, bitmap: Vec<u8>) -> Self {
        Self {
            bitmap_indicator,
            bitmap,
        }
    }

    /// Pack a boolean mask; mainly useful for building records by hand.
    pub fn from_bools(mask: &[bool]) -> Self {
        let mut bitmap = vec![0u8; (mask.len() + 7) / 8];
        for (i, present) in mask.iter().enumerate() {
            if *present {
                bitmap[i / 8] |= 128 >> (i % 8);
            }
        }
        Self {
            bitmap_indicator: 0,
            bitmap,
        }
    }

    /// Whether this section carries (or re-uses) an applicable mask.
    pub fn applies(&self) -> bool {
        self.bitmap_indicator == 0 || self.bitmap_indicator == 254
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bitmap[index / 8] & (128 >> (index % 8)) != 0
    }

    /// Number of present points among the first `num_points`.
    pub fn count_set(&self, num_points: usize) -> usize {
        (0..num_points).filter(|i| self.is_set(*i)).count()
    }

    /// Whether the mask covers a grid of `num_points` points.
    pub fn covers(&self, num_points: usize) -> bool {
        self.bitmap.len() * 8 >= num_points
    }
}
