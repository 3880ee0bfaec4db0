use log::warn;

use crate::bitreader::BitReader;
use crate::error::{GribError, Result};
use crate::sections::sect5::Data;
use crate::sections::sect7::complex::all_ones;
use crate::sections::sect7::{
    expand_with_bitmap, groups, resolve_missing, DecodeContext, Grib2DataDecoder,
};

/// Template 7.3: complex packing over first or second order spatial
/// differences. The payload carries the initial undifferenced value(s) and
/// the overall minimum of the differences ahead of the group metadata;
/// undoing the differencing is a cumulative recurrence over the decoded
/// sequence.
pub(crate) struct GridPointDataComplexPackingSpacialDiffDecoder {}

impl Grib2DataDecoder for GridPointDataComplexPackingSpacialDiffDecoder {
    fn decode(&self, ctx: &DecodeContext, slice: &[u8]) -> Result<Box<[f64]>> {
        let data = match &ctx.drs.data {
            Data::Data3(data) => data,
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
        let num_points = ctx.grid.num_points;

        if data.group_definition.num_groups == 0 {
            return Ok(vec![missing; num_points].into_boxed_slice());
        }

        let order = data.spacial_difference_order;
        if order != 1 && order != 2 {
            warn!("Unsupported spatial differencing order {}", order);
            return Ok(vec![missing; num_points].into_boxed_slice());
        }

        // Descriptor width in bits; the leading bit of each descriptor is the
        // sign. A zero width leaves nothing to seed the recurrence with.
        let nbitsd = data.spacial_difference_size as usize * 8;
        if nbitsd == 0 {
            warn!("Spatial differencing with zero descriptor octets");
            return Ok(vec![missing; num_points].into_boxed_slice());
        }

        let mut reader = BitReader::new(slice);
        let ival1 = reader.read_signed(nbitsd)?;
        let ival2 = if order == 2 {
            reader.read_signed(nbitsd)?
        } else {
            0
        };
        let minsd = reader.read_signed(nbitsd)?;

        let groups = groups::read_groups(
            &mut reader,
            data.num_bits,
            &data.group_definition,
            data.group_definition.group_widths_reference as usize,
        )?;

        let total_length = groups.total_length();
        let expected = if mvm == 0 {
            num_points
        } else {
            ctx.drs.num_points
        };
        if total_length != expected {
            warn!(
                "Group lengths sum {} != expected points {}",
                total_length, expected
            );
            return Ok(vec![missing; num_points].into_boxed_slice());
        }

        // Raw integers (X1 + X2) per point; under a missing policy the
        // reserved codes are excluded from the dense sequence and tracked in
        // a presence mask so the recurrence only runs over real data.
        reader.reset_byte_alignment();
        let mut dense: Vec<i64> = Vec::with_capacity(total_length);
        let mut presence: Option<Vec<bool>> = (mvm != 0).then(|| Vec::with_capacity(total_length));

        for i in 0..data.group_definition.num_groups {
            let x1 = groups.references[i] as i64;
            let width = groups.widths[i];
            match presence.as_mut() {
                None => {
                    for _ in 0..groups.lengths[i] {
                        let x2 = reader.read_unsigned(width)? as i64;
                        dense.push(x1 + x2);
                    }
                }
                Some(mask) if width != 0 => {
                    let msng1 = all_ones(width) as i64;
                    let msng2 = msng1 - 1;
                    for _ in 0..groups.lengths[i] {
                        let x2 = reader.read_unsigned(width)? as i64;
                        if x2 == msng1 || (mvm == 2 && x2 == msng2) {
                            mask.push(false);
                        } else {
                            mask.push(true);
                            dense.push(x1 + x2);
                        }
                    }
                }
                Some(mask) => {
                    // Constant group: the reference itself carries the
                    // missing code, judged against the reference field width.
                    let msng1 = all_ones(data.num_bits) as i64;
                    let msng2 = msng1 - 1;
                    let group_missing = x1 == msng1 || (mvm == 2 && x1 == msng2);
                    for _ in 0..groups.lengths[i] {
                        if group_missing {
                            mask.push(false);
                        } else {
                            mask.push(true);
                            dense.push(x1);
                        }
                    }
                }
            }
        }

        match order {
            1 => first_order_undifference(&mut dense, ival1, minsd),
            _ => second_order_undifference(&mut dense, ival1, ival2, minsd),
        }

        let reference_value = data.reference_value as f64;
        let binary_scale = 2_f64.powi(data.binary_scale_factor as i32);
        let decimal_scale = 10_f64.powi(data.decimal_scale_factor as i32);
        let scaled: Vec<f64> = dense
            .iter()
            .map(|x| (reference_value + *x as f64 * binary_scale) / decimal_scale)
            .collect();

        let sequence = match presence {
            None => scaled,
            Some(mask) => {
                let mut expanded = Vec::with_capacity(total_length);
                let mut next = 0;
                for present in mask {
                    if present {
                        expanded.push(scaled[next]);
                        next += 1;
                    } else {
                        expanded.push(missing);
                    }
                }
                expanded
            }
        };

        Ok(expand_with_bitmap(
            &sequence,
            ctx.bitmap,
            num_points,
            missing,
        ))
    }
}

/// F(n) = G(n) + minsd + F(n-1); the first decoded value is replaced by the
/// stored initial value.
fn first_order_undifference(seq: &mut [i64], ival1: i64, minsd: i64) {
    if seq.is_empty() {
        return;
    }
    seq[0] = ival1;
    for i in 1..seq.len() {
        seq[i] = seq[i] + minsd + seq[i - 1];
    }
}

/// Second order: the first two decoded values are replaced by the stored
/// initial pair.
fn second_order_undifference(seq: &mut [i64], ival1: i64, ival2: i64, minsd: i64) {
    if let Some(first) = seq.first_mut() {
        *first = ival1;
    }
    if let Some(second) = seq.get_mut(1) {
        *second = ival2;
    }
    for i in 2..seq.len() {
        seq[i] = seq[i] + minsd + 2 * seq[i - 1] - seq[i - 2];
    }
}
