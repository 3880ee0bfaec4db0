//! Decoder for GRIB2 packed data sections.
//!
//! Given the data representation parameters from Section 5, a grid
//! descriptor, an optional bitmap and the raw Section 7 payload, [`unpack`]
//! recovers the dense grid of floating point values. Supported data
//! representation templates:
//!
//! - 7.0 grid point data, simple packing
//! - 7.2 grid point data, complex packing
//! - 7.3 grid point data, complex packing and spatial differencing
//! - 7.40 grid point data, JPEG 2000 code stream (via an injected
//!   [`ImageCodec`])
//!
//! Values are recovered with Y = (R + (X1 + X2) * 2^E) / 10^D per regulation
//! 92.9.4; missing points take the sentinel selected by the record's missing
//! value management and the session [`DecodeConfig`].

mod bitreader;
mod config;
mod error;
pub mod sections;
mod utils;

pub use crate::bitreader::BitReader;
pub use crate::config::DecodeConfig;
pub use crate::error::{GribError, Result};
pub use crate::sections::sect3::GridDescriptor;
pub use crate::sections::sect5::{Data, DataRepresentation};
pub use crate::sections::sect6::BitMap;
pub use crate::sections::sect7::{normalize_scanning_mode, ImageCodec};

use crate::sections::sect7::complex::GridPointDataComplexPackingDecoder;
use crate::sections::sect7::complex_spacial_diff::GridPointDataComplexPackingSpacialDiffDecoder;
use crate::sections::sect7::jpeg2000::GridPointDataJpeg2000Decoder;
use crate::sections::sect7::simple::GridPointDataSimplePackingDecoder;
use crate::sections::sect7::{DecodeContext, Grib2DataDecoder};

/// Decode one record's data section into a scan-normalized grid.
///
/// `data` is the Section 7 payload after its 5-octet header. The result has
/// exactly `grid.num_points` elements; every element is either a decoded
/// value or the missing sentinel.
///
/// Truncated payloads and unsupported templates fail the record; the numeric
/// edge cases (no groups, codec trouble, group length mismatches) degrade to
/// an all-sentinel field so one bad record does not abort a file scan.
pub fn unpack(
    drs: &DataRepresentation,
    grid: &GridDescriptor,
    bitmap: Option<&BitMap>,
    codec: Option<&dyn ImageCodec>,
    config: &DecodeConfig,
    data: &[u8],
) -> Result<Box<[f64]>> {
    if let Some(bitmap) = bitmap {
        if !bitmap.covers(grid.num_points) {
            return Err(GribError::DecodeError(format!(
                "Bitmap length {} != grid length {}",
                bitmap.bitmap.len() * 8,
                grid.num_points
            )));
        }
    }

    let ctx = DecodeContext {
        drs,
        grid,
        bitmap,
        codec,
        config,
    };

    let mut decoded = match &drs.data {
        Data::Data0(_) => GridPointDataSimplePackingDecoder {}.decode(&ctx, data)?,
        Data::Data2(_) => GridPointDataComplexPackingDecoder {}.decode(&ctx, data)?,
        Data::Data3(_) => GridPointDataComplexPackingSpacialDiffDecoder {}.decode(&ctx, data)?,
        Data::Data40(_) => GridPointDataJpeg2000Decoder {}.decode(&ctx, data)?,
        Data::Unknown(_) => {
            return Err(GribError::UnsupportedTemplate(drs.template_number));
        }
    };

    if grid.quasi_regular {
        // Row width varies on a thinned grid; a fixed-nx reorder would
        // scramble the field.
        log::debug!("Skipping scan normalization for quasi-regular grid");
    } else {
        normalize_scanning_mode(&mut decoded, grid.scan_mode, grid.nx);
    }

    Ok(decoded)
}
