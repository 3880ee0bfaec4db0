use crate::error::Result;
use crate::utils::{Buffer, GribInt};

/// Section 5 contents: declared encoded-point count plus the data
/// representation template parameters.
pub struct DataRepresentation {
    /// Number of data points where one or more values are specified in
    /// Section 7 when a bitmap is present; the full grid count otherwise.
    pub num_points: usize,
    pub template_number: u16,
    pub data: Data,
}

impl DataRepresentation {
    pub fn new(num_points: usize, template_number: u16, data: Data) -> Self {
        Self {
            num_points,
            template_number,
            data,
        }
    }

    /// Build from the raw template octets (Section 5, octet 12 onward).
    pub fn from_template(num_points: usize, template_number: u16, bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            num_points,
            template_number,
            data: Data::from_template(template_number, bytes)?,
        })
    }
}

pub enum Data {
    /// Template 5.0: grid point data, simple packing.
    Data0(Data0),
    /// Template 5.2: grid point data, complex packing.
    Data2(Data2),
    /// Template 5.3: grid point data, complex packing and spatial differencing.
    Data3(Data3),
    /// Template 5.40: grid point data, JPEG 2000 code stream.
    Data40(Data40),
    Unknown(Vec<u8>),
}

impl Data {
    pub fn from_template(template_number: u16, bytes: Vec<u8>) -> Result<Self> {
        let mut buf = Buffer::new(bytes);

        match template_number {
            0 => Ok(Data::Data0(Data0 {
                reference_value: buf.read()?,
                binary_scale_factor: buf.read::<u16>()?.as_grib_int(),
                decimal_scale_factor: buf.read::<u16>()?.as_grib_int(),
                num_bits: buf.read::<u8>()? as usize,
                values_type: buf.read()?,
            })),
            2 => Ok(Data::Data2(Data2 {
                reference_value: buf.read()?,
                binary_scale_factor: buf.read::<u16>()?.as_grib_int(),
                decimal_scale_factor: buf.read::<u16>()?.as_grib_int(),
                num_bits: buf.read::<u8>()? as usize,
                values_type: buf.read()?,
                group_method: buf.read()?,
                missing_value_management: buf.read()?,
                missing_substitute_primary: buf.read()?,
                missing_substitute_secondary: buf.read()?,
                group_definition: GroupDefinition::read(&mut buf)?,
            })),
            3 => Ok(Data::Data3(Data3 {
                reference_value: buf.read()?,
                binary_scale_factor: buf.read::<u16>()?.as_grib_int(),
                decimal_scale_factor: buf.read::<u16>()?.as_grib_int(),
                num_bits: buf.read::<u8>()? as usize,
                values_type: buf.read()?,
                group_method: buf.read()?,
                missing_value_management: buf.read()?,
                missing_substitute_primary: buf.read()?,
                missing_substitute_secondary: buf.read()?,
                group_definition: GroupDefinition::read(&mut buf)?,
                spacial_difference_order: buf.read()?,
                spacial_difference_size: buf.read()?,
            })),
            40 => Ok(Data::Data40(Data40 {
                reference_value: buf.read()?,
                binary_scale_factor: buf.read::<u16>()?.as_grib_int(),
                decimal_scale_factor: buf.read::<u16>()?.as_grib_int(),
                num_bits: buf.read::<u8>()? as usize,
                values_type: buf.read()?,
                compression_method: buf.read()?,
                compression_ratio: buf.read()?,
            })),
            _ => Ok(Data::Unknown(buf.bytes)),
        }
    }
}

pub struct Data0 {
    pub reference_value: f32,
    pub binary_scale_factor: i16,
    pub decimal_scale_factor: i16,
    pub num_bits: usize,
    pub values_type: u8,
}

/// Octets 32-47 of templates 5.2 and 5.3: how the grid points are split into
/// groups sharing a local reference and bit width.
pub struct GroupDefinition {
    pub num_groups: usize,
    pub group_widths_reference: u8,
    pub group_widths_num_bits: usize,
    pub group_lengths_reference: u32,
    pub group_lengths_increment: u8,
    pub group_lengths_last: u32,
    pub group_scaled_lengths_num_bits: usize,
}

impl GroupDefinition {
    fn read(buf: &mut Buffer) -> Result<Self> {
        Ok(Self {
            num_groups: buf.read::<u32>()? as usize,
            group_widths_reference: buf.read()?,
            group_widths_num_bits: buf.read::<u8>()? as usize,
            group_lengths_reference: buf.read()?,
            group_lengths_increment: buf.read()?,
            group_lengths_last: buf.read()?,
            group_scaled_lengths_num_bits: buf.read::<u8>()? as usize,
        })
    }
}

pub struct Data2 {
    pub reference_value: f32,
    pub binary_scale_factor: i16,
    pub decimal_scale_factor: i16,
    pub num_bits: usize,
    pub values_type: u8,
    pub group_method: u8,
    /// Code table 5.5: 0 none, 1 primary substitute, 2 primary and secondary.
    pub missing_value_management: u8,
    pub missing_substitute_primary: f32,
    pub missing_substitute_secondary: f32,
    pub group_definition: GroupDefinition,
}

pub struct Data3 {
    pub reference_value: f32,
    pub binary_scale_factor: i16,
    pub decimal_scale_factor: i16,
    pub num_bits: usize,
    pub values_type: u8,
    pub group_method: u8,
    pub missing_value_management: u8,
    pub missing_substitute_primary: f32,
    pub missing_substitute_secondary: f32,
    pub group_definition: GroupDefinition,
    /// Code table 5.6: order of spatial differencing (1 or 2).
    pub spacial_difference_order: u8,
    /// Octets per extra descriptor (ival1, ival2, minsd) in the payload.
    pub spacial_difference_size: u8,
}

pub struct Data40 {
    pub reference_value: f32,
    pub binary_scale_factor: i16,
    pub decimal_scale_factor: i16,
    pub num_bits: usize,
    pub values_type: u8,
    /// Code table 5.40: 0 lossless, 1 lossy.
    pub compression_method: u8,
    pub compression_ratio: u8,
}
