use crate::bitreader::BitReader;
use crate::error::{GribError, Result};
use crate::sections::sect5::Data;
use crate::sections::sect7::{
    expand_with_bitmap, groups, resolve_missing, DecodeContext, Grib2DataDecoder,
};

/// All-ones code in an `nbits` wide field, reserved for missing points when a
/// missing value management scheme is active.
pub(crate) fn all_ones(nbits: usize) -> u32 {
    if nbits == 0 {
        0
    } else {
        (1u32 << nbits) - 1
    }
}

/// Template 7.2: groups of points sharing a local reference value and width.
pub(crate) struct GridPointDataComplexPackingDecoder {}

impl Grib2DataDecoder for GridPointDataComplexPackingDecoder {
    fn decode(&self, ctx: &DecodeContext, slice: &[u8]) -> Result<Box<[f64]>> {
        let data = match &ctx.drs.data {
            Data::Data2(data) => data,
            _ => {
                return Err(GribError::ParseError(String::from("Wrong decoder")));
            }
        };

        let mvm = data.missing_value_management;
        let missing = resolve_missing(
            ctx.config,
            mvm,
            data.missing_substitute_primary,
            data.missing_substitute_secondary,
        );

        if data.group_definition.num_groups == 0 {
            return Ok(vec![missing; ctx.grid.num_points].into_boxed_slice());
        }

        let reference_value = data.reference_value as f64;
        let binary_scale = 2_f64.powi(data.binary_scale_factor as i32);
        let decimal_scale = 10_f64.powi(data.decimal_scale_factor as i32);
        let scale = |x: i64| (reference_value + x as f64 * binary_scale) / decimal_scale;

        let mut reader = BitReader::new(slice);
        let groups = groups::read_groups(&mut reader, data.num_bits, &data.group_definition, 0)?;

        // Packed deviations (X2) follow the metadata, byte-aligned.
        reader.reset_byte_alignment();
        let mut values = Vec::with_capacity(groups.total_length());
        for i in 0..data.group_definition.num_groups {
            let x1 = groups.references[i] as i64;
            let width = groups.widths[i];
            for _ in 0..groups.lengths[i] {
                if width == 0 {
                    // Constant group: no incremental data present.
                    values.push(if mvm == 0 { scale(x1) } else { missing });
                } else {
                    let x2 = reader.read_unsigned(width)?;
                    if mvm != 0 && x2 == all_ones(width) {
                        values.push(missing);
                    } else {
                        values.push(scale(x1 + x2 as i64));
                    }
                }
            }
        }

        Ok(expand_with_bitmap(
            &values,
            ctx.bitmap,
            ctx.grid.num_points,
            missing,
        ))
    }
}
