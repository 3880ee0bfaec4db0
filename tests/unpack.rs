use anyhow::Result;
use gribfield::sections::sect5::{Data0, Data2, Data3, Data40, GroupDefinition};
use gribfield::{
    unpack, BitMap, Data, DataRepresentation, DecodeConfig, GribError, GridDescriptor, ImageCodec,
};

fn simple_drs(num_points: usize, num_bits: usize, r: f32, e: i16, d: i16) -> DataRepresentation {
    DataRepresentation::new(
        num_points,
        0,
        Data::Data0(Data0 {
            reference_value: r,
            binary_scale_factor: e,
            decimal_scale_factor: d,
            num_bits,
            values_type: 0,
        }),
    )
}

fn complex_drs(
    num_points: usize,
    num_bits: usize,
    mvm: u8,
    primary: f32,
    group_definition: GroupDefinition,
) -> DataRepresentation {
    DataRepresentation::new(
        num_points,
        2,
        Data::Data2(Data2 {
            reference_value: 0.0,
            binary_scale_factor: 0,
            decimal_scale_factor: 0,
            num_bits,
            values_type: 0,
            group_method: 1,
            missing_value_management: mvm,
            missing_substitute_primary: primary,
            missing_substitute_secondary: 0.0,
            group_definition,
        }),
    )
}

fn spacial_diff_drs(
    num_points: usize,
    num_bits: usize,
    mvm: u8,
    primary: f32,
    group_definition: GroupDefinition,
) -> DataRepresentation {
    DataRepresentation::new(
        num_points,
        3,
        Data::Data3(Data3 {
            reference_value: 0.0,
            binary_scale_factor: 0,
            decimal_scale_factor: 0,
            num_bits,
            values_type: 0,
            group_method: 1,
            missing_value_management: mvm,
            missing_substitute_primary: primary,
            missing_substitute_secondary: 0.0,
            group_definition,
            spacial_difference_order: 1,
            spacial_difference_size: 2,
        }),
    )
}

fn jpeg2000_drs(num_points: usize, num_bits: usize, r: f32, d: i16) -> DataRepresentation {
    DataRepresentation::new(
        num_points,
        40,
        Data::Data40(Data40 {
            reference_value: r,
            binary_scale_factor: 0,
            decimal_scale_factor: d,
            num_bits,
            values_type: 0,
            compression_method: 0,
            compression_ratio: 255,
        }),
    )
}

fn grid(num_points: usize, nx: usize, scan_mode: u8) -> GridDescriptor {
    GridDescriptor::new(num_points, nx, scan_mode)
}

struct FakeCodec(Vec<i32>);

impl ImageCodec for FakeCodec {
    fn decode(&self, _data: &[u8], _num_bits: usize) -> gribfield::Result<Vec<i32>> {
        Ok(self.0.clone())
    }
}

struct BrokenCodec;

impl ImageCodec for BrokenCodec {
    fn decode(&self, _data: &[u8], _num_bits: usize) -> gribfield::Result<Vec<i32>> {
        Err(GribError::DecodeError(String::from("corrupt code stream")))
    }
}

#[test]
fn simple_packing_round_trips_every_byte_value() -> Result<()> {
    let payload: Vec<u8> = (0..=255).collect();
    let drs = simple_drs(256, 8, 0.0, 0, 0);
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(256, 16, 0), None, None, &config, &payload)?;
    assert_eq!(field.len(), 256);
    for (i, value) in field.iter().enumerate() {
        assert_eq!(*value, i as f64);
    }
    Ok(())
}

#[test]
fn simple_packing_applies_binary_and_decimal_scaling() -> Result<()> {
    // Y = (10 + x * 2^1) / 10^1
    let payload = [0u8, 5, 45];
    let drs = simple_drs(3, 8, 10.0, 1, 1);
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(3, 3, 0), None, None, &config, &payload)?;
    assert_eq!(&field[..], &[1.0, 2.0, 10.0]);
    Ok(())
}

#[test]
fn simple_packing_with_bitmap_skips_missing_points() -> Result<()> {
    let bitmap = BitMap::from_bools(&[true, false, true]);
    let payload = [5u8, 7];
    let drs = simple_drs(3, 8, 0.0, 0, 0);
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(3, 3, 0), Some(&bitmap), None, &config, &payload)?;
    assert_eq!(field[0], 5.0);
    assert!(field[1].is_nan());
    assert_eq!(field[2], 7.0);
    Ok(())
}

#[test]
fn simple_packing_truncated_payload_fails_the_record() {
    let payload = [0xffu8];
    let drs = simple_drs(4, 8, 0.0, 0, 0);
    let config = DecodeConfig::new();

    let result = unpack(&drs, &grid(4, 2, 0), None, None, &config, &payload);
    assert!(matches!(result, Err(GribError::UnexpectedEndOfStream(_))));
}

#[test]
fn unknown_template_is_a_recoverable_error() {
    let drs = DataRepresentation::new(4, 41, Data::Unknown(vec![1, 2, 3]));
    let config = DecodeConfig::new();

    let result = unpack(&drs, &grid(4, 2, 0), None, None, &config, &[]);
    assert!(matches!(result, Err(GribError::UnsupportedTemplate(41))));
}

#[test]
fn bitmap_shorter_than_grid_is_fatal() {
    let bitmap = BitMap::new(0, vec![0xff]);
    let drs = simple_drs(9, 3, 0.0, 0, 0);
    let config = DecodeConfig::new();

    let result = unpack(&drs, &grid(9, 3, 0), Some(&bitmap), None, &config, &[0; 16]);
    assert!(matches!(result, Err(GribError::DecodeError(_))));
}

#[test]
fn complex_packing_decodes_grouped_values() -> Result<()> {
    // Two groups: references 10 and 20, widths 2 and 0, lengths 2 and 2.
    // Group 0 deviations: 01, 10. Group 1 is constant.
    let payload = [
        0x0a, 0x14, // references, 8 bits each
        0x02, 0x00, // widths, 8 bits each
        0x02, 0x00, // scaled lengths, 8 bits each (last overridden to 2)
        0b0110_0000, // packed deviations
    ];
    let drs = complex_drs(
        4,
        8,
        0,
        0.0,
        GroupDefinition {
            num_groups: 2,
            group_widths_reference: 0,
            group_widths_num_bits: 8,
            group_lengths_reference: 0,
            group_lengths_increment: 1,
            group_lengths_last: 2,
            group_scaled_lengths_num_bits: 8,
        },
    );
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(4, 2, 0), None, None, &config, &payload)?;
    assert_eq!(&field[..], &[11.0, 12.0, 20.0, 20.0]);
    Ok(())
}

#[test]
fn complex_packing_without_groups_is_all_missing() -> Result<()> {
    let drs = complex_drs(
        3,
        8,
        0,
        0.0,
        GroupDefinition {
            num_groups: 0,
            group_widths_reference: 0,
            group_widths_num_bits: 8,
            group_lengths_reference: 0,
            group_lengths_increment: 1,
            group_lengths_last: 0,
            group_scaled_lengths_num_bits: 8,
        },
    );
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(3, 3, 0), None, None, &config, &[])?;
    assert_eq!(field.len(), 3);
    assert!(field.iter().all(|v| v.is_nan()));

    let bitmap = BitMap::from_bools(&[true, true, false]);
    let field = unpack(&drs, &grid(3, 3, 0), Some(&bitmap), None, &config, &[])?;
    assert!(field.iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn complex_packing_all_ones_code_becomes_the_substitute() -> Result<()> {
    // One group: reference 3, width 2, length 3. Deviations 01, 11, 00;
    // 11 is the all-ones code and must surface as the primary substitute.
    let payload = [0x03, 0x02, 0x00, 0b0111_0000];
    let drs = complex_drs(
        3,
        8,
        1,
        5.5,
        GroupDefinition {
            num_groups: 1,
            group_widths_reference: 0,
            group_widths_num_bits: 8,
            group_lengths_reference: 0,
            group_lengths_increment: 1,
            group_lengths_last: 3,
            group_scaled_lengths_num_bits: 8,
        },
    );
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(3, 3, 0), None, None, &config, &payload)?;
    assert_eq!(&field[..], &[4.0, 5.5, 3.0]);
    Ok(())
}

#[test]
fn complex_packing_force_nan_overrides_the_substitute() -> Result<()> {
    let payload = [0x03, 0x02, 0x00, 0b0111_0000];
    let drs = complex_drs(
        3,
        8,
        1,
        5.5,
        GroupDefinition {
            num_groups: 1,
            group_widths_reference: 0,
            group_widths_num_bits: 8,
            group_lengths_reference: 0,
            group_lengths_increment: 1,
            group_lengths_last: 3,
            group_scaled_lengths_num_bits: 8,
        },
    );
    let config = DecodeConfig::new().with_force_nan(true);

    let field = unpack(&drs, &grid(3, 3, 0), None, None, &config, &payload)?;
    assert_eq!(field[0], 4.0);
    assert!(field[1].is_nan());
    assert_eq!(field[2], 3.0);
    Ok(())
}

// Spatial differencing payload shared by the order-1 tests:
//   ival1 = +10, minsd = +2 (16-bit sign + magnitude descriptors),
//   one group: reference 0 (4 bits), width 3 (4 bits), length 3 (explicit),
//   packed values 000 101 111.
const SPACIAL_DIFF_PAYLOAD: [u8; 9] = [
    0x00, 0x0a, // ival1
    0x00, 0x02, // minsd
    0x00, // group references
    0x30, // group widths
    0x00, // scaled group lengths
    0b0001_0111,
    0b1000_0000, // packed values
];

fn spacial_diff_groups() -> GroupDefinition {
    GroupDefinition {
        num_groups: 1,
        group_widths_reference: 0,
        group_widths_num_bits: 4,
        group_lengths_reference: 0,
        group_lengths_increment: 1,
        group_lengths_last: 3,
        group_scaled_lengths_num_bits: 4,
    }
}

#[test]
fn spacial_diff_first_order_recurrence() -> Result<()> {
    let drs = spacial_diff_drs(3, 4, 0, 0.0, spacial_diff_groups());
    let config = DecodeConfig::new();

    let field = unpack(
        &drs,
        &grid(3, 3, 0),
        None,
        None,
        &config,
        &SPACIAL_DIFF_PAYLOAD,
    )?;
    assert_eq!(&field[..], &[10.0, 17.0, 26.0]);
    Ok(())
}

#[test]
fn spacial_diff_missing_codes_are_excluded_from_the_recurrence() -> Result<()> {
    // Same stream, but with primary substitution active the third packed
    // value (111, all ones in 3 bits) is a missing point, not data.
    let drs = spacial_diff_drs(3, 4, 1, 9.0, spacial_diff_groups());
    let config = DecodeConfig::new();

    let field = unpack(
        &drs,
        &grid(3, 3, 0),
        None,
        None,
        &config,
        &SPACIAL_DIFF_PAYLOAD,
    )?;
    assert_eq!(&field[..], &[10.0, 17.0, 9.0]);
    Ok(())
}

#[test]
fn spacial_diff_group_length_mismatch_degrades_to_missing() -> Result<()> {
    // Groups account for 3 points but the grid declares 4.
    let drs = spacial_diff_drs(4, 4, 0, 0.0, spacial_diff_groups());
    let config = DecodeConfig::new();

    let field = unpack(
        &drs,
        &grid(4, 2, 0),
        None,
        None,
        &config,
        &SPACIAL_DIFF_PAYLOAD,
    )?;
    assert_eq!(field.len(), 4);
    assert!(field.iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn scan_mode_reversal_applies_after_decode() -> Result<()> {
    let payload = [1u8, 2, 3, 4, 5, 6];
    let drs = simple_drs(6, 8, 0.0, 0, 0);
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(6, 3, 128), None, None, &config, &payload)?;
    assert_eq!(&field[..], &[3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);

    let field = unpack(&drs, &grid(6, 3, 16), None, None, &config, &payload)?;
    assert_eq!(&field[..], &[1.0, 2.0, 3.0, 6.0, 5.0, 4.0]);
    Ok(())
}

#[test]
fn quasi_regular_grid_skips_scan_normalization() -> Result<()> {
    let payload = [1u8, 2, 3, 4, 5, 6];
    let drs = simple_drs(6, 8, 0.0, 0, 0);
    let config = DecodeConfig::new();

    let field = unpack(
        &drs,
        &grid(6, 3, 128).quasi_regular(),
        None,
        None,
        &config,
        &payload,
    )?;
    assert_eq!(&field[..], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    Ok(())
}

#[test]
fn jpeg2000_codec_output_is_scaled_like_simple_packing() -> Result<()> {
    let codec = FakeCodec(vec![10, 20, 30]);
    let drs = jpeg2000_drs(3, 8, 0.0, 1);
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(3, 3, 0), None, Some(&codec), &config, &[0; 4])?;
    assert_eq!(&field[..], &[1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn jpeg2000_honors_the_bitmap() -> Result<()> {
    let codec = FakeCodec(vec![10, 30]);
    let bitmap = BitMap::from_bools(&[true, false, true]);
    let drs = jpeg2000_drs(3, 8, 0.0, 0);
    let config = DecodeConfig::new();

    let field = unpack(
        &drs,
        &grid(3, 3, 0),
        Some(&bitmap),
        Some(&codec),
        &config,
        &[0; 4],
    )?;
    assert_eq!(field[0], 10.0);
    assert!(field[1].is_nan());
    assert_eq!(field[2], 30.0);
    Ok(())
}

#[test]
fn jpeg2000_codec_failure_degrades_to_missing() -> Result<()> {
    let drs = jpeg2000_drs(3, 8, 0.0, 0);
    let config = DecodeConfig::new();

    let field = unpack(
        &drs,
        &grid(3, 3, 0),
        None,
        Some(&BrokenCodec),
        &config,
        &[0; 4],
    )?;
    assert_eq!(field.len(), 3);
    assert!(field.iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn jpeg2000_length_mismatch_degrades_to_missing() -> Result<()> {
    let codec = FakeCodec(vec![10, 20]);
    let drs = jpeg2000_drs(3, 8, 0.0, 0);
    let config = DecodeConfig::new();

    let field = unpack(&drs, &grid(3, 3, 0), None, Some(&codec), &config, &[0; 4])?;
    assert!(field.iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn jpeg2000_zero_bits_fills_with_the_reference_value() -> Result<()> {
    let drs = jpeg2000_drs(3, 0, 5.0, 0);
    let config = DecodeConfig::new();

    // No codec required: there is nothing to decode.
    let field = unpack(&drs, &grid(3, 3, 0), None, None, &config, &[])?;
    assert_eq!(&field[..], &[5.0, 5.0, 5.0]);
    Ok(())
}
