use crate::bitreader::BitReader;
use crate::error::Result;
use crate::sections::sect5::GroupDefinition;

/// Group metadata for one complex-packed record: per-group reference values
/// (X1), bit widths (NB) and member counts (L).
pub(crate) struct Groups {
    pub references: Vec<u32>,
    pub widths: Vec<usize>,
    pub lengths: Vec<usize>,
}

impl Groups {
    pub(crate) fn total_length(&self) -> usize {
        self.lengths.iter().sum()
    }
}

/// Run the three metadata passes over the shared cursor.
///
/// Each sequence is zero-padded to end on an octet boundary, so every pass
/// starts with a fresh byte alignment. A declared width of 0 leaves the whole
/// array at zero without consuming bits. The final group's length is always
/// the explicit last-group field from the template, never the scaled value.
///
/// `width_correction` is the reference group width added to every NB; the
/// spatial-differencing variant applies it, plain complex packing does not.
pub(crate) fn read_groups(
    reader: &mut BitReader,
    num_bits: usize,
    group_definition: &GroupDefinition,
    width_correction: usize,
) -> Result<Groups> {
    let ng = group_definition.num_groups;

    reader.reset_byte_alignment();
    let mut references = Vec::with_capacity(ng);
    for _ in 0..ng {
        references.push(reader.read_unsigned(num_bits)?);
    }

    reader.reset_byte_alignment();
    let mut widths = Vec::with_capacity(ng);
    for _ in 0..ng {
        let width = reader.read_unsigned(group_definition.group_widths_num_bits)? as usize;
        widths.push(width + width_correction);
    }

    reader.reset_byte_alignment();
    let reference_length = group_definition.group_lengths_reference as usize;
    let increment = group_definition.group_lengths_increment as usize;
    let mut lengths = Vec::with_capacity(ng);
    for _ in 0..ng {
        let scaled = reader.read_unsigned(group_definition.group_scaled_lengths_num_bits)? as usize;
        lengths.push(reference_length + scaled * increment);
    }
    if let Some(last) = lengths.last_mut() {
        *last = group_definition.group_lengths_last as usize;
    }

    Ok(Groups {
        references,
        widths,
        lengths,
    })
}
