use crate::error::{GribError, Result};

/// MSB-first bit cursor over a data-section payload.
///
/// GRIB2 numbers bits within an octet from 1 (most significant) to 8, and
/// packed sequences span octet boundaries freely. Group metadata sequences
/// are padded with zero bits to end on an octet boundary; callers skip the
/// padding with [`reset_byte_alignment`](Self::reset_byte_alignment).
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    pub fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Discard any partially consumed octet; the next read starts on a fresh
    /// octet boundary.
    pub fn reset_byte_alignment(&mut self) {
        let rem = self.bit_pos % 8;
        if rem != 0 {
            self.bit_pos += 8 - rem;
        }
    }

    /// Read `nbits` (0..=31) as an unsigned integer.
    ///
    /// A zero-width read returns 0 without consuming anything: a field whose
    /// declared width is 0 means "the value is the reference itself".
    pub fn read_unsigned(&mut self, nbits: usize) -> Result<u32> {
        if nbits == 0 {
            return Ok(0);
        }
        if nbits > 31 {
            return Err(GribError::BitWidthOverflow(nbits));
        }
        if self.bit_pos + nbits > self.data.len() * 8 {
            return Err(GribError::UnexpectedEndOfStream(self.bit_pos));
        }

        let mut val: u32 = 0;
        let mut remaining = nbits;
        while remaining > 0 {
            let byte = self.data[self.bit_pos / 8];
            let offset = self.bit_pos % 8;
            let take = remaining.min(8 - offset);
            // Clear the consumed high bits, then keep the top `take` bits.
            let chunk = ((byte << offset) >> (8 - take)) as u32;
            val = (val << take) | chunk;
            self.bit_pos += take;
            remaining -= take;
        }

        Ok(val)
    }

    /// Read a sign bit followed by an `nbits - 1` bit magnitude.
    ///
    /// GRIB2 signed fields are sign + magnitude, not two's complement.
    pub fn read_signed(&mut self, nbits: usize) -> Result<i64> {
        if nbits == 0 {
            return Ok(0);
        }
        let sign = self.read_unsigned(1)?;
        let magnitude = self.read_unsigned(nbits - 1)? as i64;

        Ok(if sign == 1 { -magnitude } else { magnitude })
    }
}
