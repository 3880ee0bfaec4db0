use crate::config::DecodeConfig;
use crate::error::Result;
use crate::sections::sect3::GridDescriptor;
use crate::sections::sect5::DataRepresentation;
use crate::sections::sect6::BitMap;

pub(crate) mod complex;
pub(crate) mod complex_spacial_diff;
mod groups;
pub(crate) mod jpeg2000;
pub(crate) mod simple;

pub use jpeg2000::ImageCodec;

/// Marker for "no data" when a record selects a missing value management
/// scheme this decoder does not recognize (wgrib2's UNDEFINED).
pub(crate) const UNDEFINED: f64 = 9.999e20;

pub(crate) struct DecodeContext<'a> {
    pub drs: &'a DataRepresentation,
    pub grid: &'a GridDescriptor,
    pub bitmap: Option<&'a BitMap>,
    pub codec: Option<&'a dyn ImageCodec>,
    pub config: &'a DecodeConfig,
}

impl DecodeContext<'_> {
    /// Number of values the data section actually encodes: the bitmap's
    /// present count when a mask applies, the full grid otherwise.
    pub(crate) fn encoded_points(&self) -> usize {
        match self.bitmap {
            Some(bitmap) => bitmap.count_set(self.grid.num_points),
            None => self.grid.num_points,
        }
    }
}

pub(crate) trait Grib2DataDecoder {
    fn decode(&self, ctx: &DecodeContext, slice: &[u8]) -> Result<Box<[f64]>>;
}

/// Effective sentinel for missing points.
///
/// The session policy wins over the record: operators may force a uniform NaN
/// even when the file encodes a numeric substitute.
pub(crate) fn resolve_missing(
    config: &DecodeConfig,
    missing_value_management: u8,
    primary: f32,
    secondary: f32,
) -> f64 {
    if config.force_nan {
        return f64::NAN;
    }
    match missing_value_management {
        0 => f64::NAN,
        1 => primary as f64,
        2 => secondary as f64,
        _ => UNDEFINED,
    }
}

/// Expand a sequentially decoded run onto the full grid.
///
/// With a mask, present positions take the next decoded value and the rest
/// get the sentinel. Without one the run is copied as-is; a short run leaves
/// the tail at the sentinel rather than uninitialized.
pub(crate) fn expand_with_bitmap(
    values: &[f64],
    bitmap: Option<&BitMap>,
    num_points: usize,
    missing: f64,
) -> Box<[f64]> {
    let mut out = vec![missing; num_points];
    match bitmap {
        Some(bitmap) => {
            let mut next = 0;
            for (i, slot) in out.iter_mut().enumerate() {
                if bitmap.is_set(i) && next < values.len() {
                    *slot = values[next];
                    next += 1;
                }
            }
        }
        None => {
            let n = values.len().min(num_points);
            out[..n].copy_from_slice(&values[..n]);
        }
    }
    out.into_boxed_slice()
}

/// Reorder a row-major field according to the flag table 3.4 scanning mode.
///
/// Modes 0 and 64 are the identity (the caller's coordinate system handles
/// the Y direction). 128 and 192 scan -x, so every row is reversed. Anything
/// else is treated as the alternating convention: odd rows scan backwards.
pub fn normalize_scanning_mode(data: &mut [f64], scan_mode: u8, nx: usize) {
    if scan_mode == 0 || scan_mode == 64 || nx == 0 {
        return;
    }

    let reverse_all = scan_mode == 128 || scan_mode == 192;
    for (row, chunk) in data.chunks_mut(nx).enumerate() {
        if reverse_all || row % 2 != 0 {
            chunk.reverse();
        }
    }
}
