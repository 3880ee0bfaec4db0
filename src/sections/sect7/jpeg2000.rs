use log::warn;

use crate::error::{GribError, Result};
use crate::sections::sect5::Data;
use crate::sections::sect7::simple::ScaledValueIterator;
use crate::sections::sect7::{expand_with_bitmap, DecodeContext, Grib2DataDecoder};

/// Strategy wrapping an external image codec (JPEG 2000 for template 7.40).
///
/// `decode` receives the whole code stream and the declared bit depth and
/// returns one integer per encoded grid point. Injected so the engine can be
/// exercised without the real codec.
pub trait ImageCodec {
    fn decode(&self, data: &[u8], num_bits: usize) -> Result<Vec<i32>>;
}

/// Template 7.40: packed values carried as an image code stream.
pub(crate) struct GridPointDataJpeg2000Decoder {}

impl Grib2DataDecoder for GridPointDataJpeg2000Decoder {
    fn decode(&self, ctx: &DecodeContext, slice: &[u8]) -> Result<Box<[f64]>> {
        let data = match &ctx.drs.data {
            Data::Data40(data) => data,
            _ => {
                return Err(GribError::ParseError(String::from("Wrong decoder")));
            }
        };

        let num_points = ctx.grid.num_points;
        // Template 5.40 carries no missing value management; absent points
        // are NaN regardless of the session policy.
        let missing = f64::NAN;

        // No code stream at all: the whole field is the reference value.
        if data.num_bits == 0 {
            let reference =
                data.reference_value as f64 / 10_f64.powi(data.decimal_scale_factor as i32);
            let out: Vec<f64> = match ctx.bitmap {
                None => vec![reference; num_points],
                Some(bitmap) => (0..num_points)
                    .map(|i| if bitmap.is_set(i) { reference } else { missing })
                    .collect(),
            };
            return Ok(out.into_boxed_slice());
        }

        let codec = match ctx.codec {
            Some(codec) => codec,
            None => {
                return Err(GribError::DecodeError(String::from(
                    "No image codec supplied for template 40",
                )));
            }
        };

        let expected = ctx.encoded_points();
        let idata = match codec.decode(slice, data.num_bits) {
            Ok(idata) => idata,
            Err(err) => {
                // A broken code stream costs one field, not the whole scan.
                warn!("Image codec failed: {}", err);
                return Ok(vec![missing; num_points].into_boxed_slice());
            }
        };
        if idata.len() != expected {
            warn!(
                "Image codec returned {} points, expected {}",
                idata.len(),
                expected
            );
            return Ok(vec![missing; num_points].into_boxed_slice());
        }

        let decoded: Vec<f64> = ScaledValueIterator::new(
            idata.into_iter(),
            data.reference_value as f64,
            data.binary_scale_factor,
            data.decimal_scale_factor,
        )
        .collect();

        Ok(expand_with_bitmap(
            &decoded,
            ctx.bitmap,
            num_points,
            missing,
        ))
    }
}
