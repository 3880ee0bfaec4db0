use num::ToPrimitive;

use crate::bitreader::BitReader;
use crate::error::{GribError, Result};
use crate::sections::sect5::Data;
use crate::sections::sect7::{expand_with_bitmap, DecodeContext, Grib2DataDecoder};

/// Template 7.0: one unsigned field of `num_bits` per present grid point.
pub(crate) struct GridPointDataSimplePackingDecoder {}

impl Grib2DataDecoder for GridPointDataSimplePackingDecoder {
    fn decode(&self, ctx: &DecodeContext, slice: &[u8]) -> Result<Box<[f64]>> {
        let data = match &ctx.drs.data {
            Data::Data0(data) => data,
            _ => {
                return Err(GribError::ParseError(String::from("Wrong decoder")));
            }
        };

        let mut reader = BitReader::new(slice);
        let count = ctx.encoded_points();

        let mut packed = Vec::with_capacity(count);
        for _ in 0..count {
            packed.push(reader.read_unsigned(data.num_bits)?);
        }

        let decoded: Vec<f64> = ScaledValueIterator::new(
            packed.into_iter(),
            data.reference_value as f64,
            data.binary_scale_factor,
            data.decimal_scale_factor,
        )
        .collect();

        Ok(expand_with_bitmap(
            &decoded,
            ctx.bitmap,
            ctx.grid.num_points,
            f64::NAN,
        ))
    }
}

/// Applies Y = (R + X * 2^E) / 10^D to a stream of packed integers.
pub(crate) struct ScaledValueIterator<I: Iterator<Item = N>, N: ToPrimitive> {
    packed_iter: I,
    reference_value: f64,
    binary_scale: f64,
    decimal_scale: f64,
}

impl<I: Iterator<Item = N>, N: ToPrimitive> ScaledValueIterator<I, N> {
    pub(crate) fn new(
        packed_iter: I,
        reference_value: f64,
        binary_scale_factor: i16,
        decimal_scale_factor: i16,
    ) -> Self {
        Self {
            packed_iter,
            reference_value,
            binary_scale: 2_f64.powi(binary_scale_factor as i32),
            decimal_scale: 10_f64.powi(-(decimal_scale_factor as i32)),
        }
    }
}

impl<I: Iterator<Item = N>, N: ToPrimitive> Iterator for ScaledValueIterator<I, N> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let encoded = self.packed_iter.next()?.to_f64()?;
        Some((self.reference_value + encoded * self.binary_scale) * self.decimal_scale)
    }
}
