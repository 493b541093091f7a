use rsdk::{
    ActiveLayer, Direction, EntityV3, EntityV4, Error, Fixed, Format, InkEffect, LayerMidpoint, Placement, Priority,
    Stage, StageEntities,
};

fn sample_v3() -> Stage {
    let mut stage = Stage::new(Format::V3);
    stage.title = "GREEN HILL".to_string();
    stage.active_layers = [
        ActiveLayer::Foreground,
        ActiveLayer::Background2,
        ActiveLayer::Background8,
        ActiveLayer::None,
    ];
    stage.layer_midpoint = LayerMidpoint::AfterLayer1;
    stage.resize(3, 2);
    stage.layout.set(0, 0, 0x1234);
    stage.layout.set(2, 1, 0xFFFF);
    stage.layout.set(1, 1, 7);
    stage.entities = StageEntities::V3 {
        object_type_names: vec!["Ring".to_string(), "Monitor".to_string()],
        entities: vec![
            EntityV3::new(1, 0, Fixed::from_int(128), Fixed::from_int(64)),
            EntityV3::new(2, 5, Fixed::from_int(-3), Fixed::from_int(i16::MAX)),
            EntityV3::new(2, 255, Fixed::from_int(i16::MIN), Fixed::from_int(0)),
        ],
    };
    stage
}

fn sample_v4() -> Stage {
    let mut stage = Stage::new(Format::V4);
    stage.title = "Chemical Plant".to_string();
    stage.resize(2, 3);
    stage.layout.set(0, 0, 0x1234);
    stage.layout.set(1, 2, 0x00FF);

    let plain = EntityV4::new(1, 0, Fixed(0x0001_8000), Fixed(-0x0000_4000));
    let mut decorated = EntityV4::new(9, 3, Fixed(0x7FFF_FFFF), Fixed(i32::MIN));
    decorated.direction = Some(Direction::FlipX);
    decorated.priority = Some(Priority::Always);
    decorated.ink_effect = Some(InkEffect::Alpha);
    decorated.alpha = Some(0x80);
    decorated.value2 = Some(-42);
    decorated.animation_speed = Some(0x100);
    stage.entities = StageEntities::V4(vec![plain, decorated]);
    stage
}

#[test]
fn v3_round_trip() {
    let stage = sample_v3();
    let bytes = stage.encode().unwrap();
    let decoded = Stage::decode(&bytes, Format::V3).unwrap();
    assert_eq!(decoded, stage);
    assert_eq!(decoded.encode().unwrap(), bytes);
}

#[test]
fn v4_round_trip() {
    let stage = sample_v4();
    let bytes = stage.encode().unwrap();
    let decoded = Stage::decode(&bytes, Format::V4).unwrap();
    assert_eq!(decoded, stage);
    assert_eq!(decoded.encode().unwrap(), bytes);
}

#[test]
fn v3_byte_layout() {
    let stage = sample_v3();
    let bytes = stage.encode().unwrap();

    let mut expected = vec![10];
    expected.extend_from_slice(b"GREEN HILL");
    expected.extend_from_slice(&[0, 2, 8, 9, 2]);
    expected.extend_from_slice(&[3, 2]);
    // Layout, big-endian cells.
    expected.extend_from_slice(&[0x12, 0x34, 0, 0, 0, 0]);
    expected.extend_from_slice(&[0, 0, 0, 7, 0xFF, 0xFF]);
    // Type names.
    expected.push(2);
    expected.extend_from_slice(b"\x04Ring\x07Monitor");
    // Entity count, big-endian, then 6-byte records.
    expected.extend_from_slice(&[0, 3]);
    expected.extend_from_slice(&[1, 0, 0x00, 0x80, 0x00, 0x40]);
    expected.extend_from_slice(&[2, 5, 0xFF, 0xFD, 0x7F, 0xFF]);
    expected.extend_from_slice(&[2, 255, 0x80, 0x00, 0x00, 0x00]);

    assert_eq!(bytes, expected);
}

#[test]
fn v4_header_and_layout_bytes() {
    let stage = sample_v4();
    let bytes = stage.encode().unwrap();

    let title_end = 1 + "Chemical Plant".len();
    let header = &bytes[title_end..title_end + 9];
    // Default layers and midpoint, then width/pad/height/pad.
    assert_eq!(header, &[1, 9, 0, 0, 3, 2, 0, 3, 0]);

    let layout = &bytes[title_end + 9..title_end + 9 + 12];
    assert_eq!(layout, &[0x34, 0x12, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0x00]);

    let count = &bytes[title_end + 21..title_end + 23];
    assert_eq!(count, &[2, 0]);
}

#[test]
fn same_cell_opposite_byte_order() {
    for (format, expected) in [(Format::V3, [0x12u8, 0x34]), (Format::V4, [0x34, 0x12])] {
        let mut stage = Stage::new(format);
        stage.title.clear();
        stage.resize(1, 1);
        stage.layout.set(0, 0, 0x1234);
        let bytes = stage.encode().unwrap();

        // 1 title byte + 5 layer bytes + dimensions.
        let start = if format == Format::V3 { 8 } else { 10 };
        assert_eq!(&bytes[start..start + 2], &expected, "{format}");
        let decoded = Stage::decode(&bytes, format).unwrap();
        assert_eq!(decoded.layout.get(0, 0), Some(0x1234));
    }
}

#[test]
fn every_truncation_fails_cleanly() {
    for (stage, format) in [(sample_v3(), Format::V3), (sample_v4(), Format::V4)] {
        let bytes = stage.encode().unwrap();
        for len in 0..bytes.len() {
            match Stage::decode(&bytes[..len], format) {
                Err(Error::UnexpectedEof { .. }) => {}
                other => panic!("{format} truncated to {len} bytes: {other:?}"),
            }
        }
    }
}

#[test]
fn resize_round_trip_keeps_original_cells() {
    let mut stage = Stage::new(Format::V4);
    stage.resize(2, 2);
    stage.layout.set(0, 0, 11);
    stage.layout.set(1, 0, 12);
    stage.layout.set(0, 1, 21);
    stage.layout.set(1, 1, 22);

    stage.resize(4, 1);
    stage.resize(2, 2);
    assert_eq!(stage.layout.rows().to_vec(), vec![vec![11u16, 12], vec![0, 0]]);

    let bytes = stage.encode().unwrap();
    assert_eq!(Stage::decode(&bytes, Format::V4).unwrap(), stage);
}

#[test]
fn ragged_layout_is_not_encoded() {
    let mut stage = sample_v3();
    stage.layout.rows_mut()[0].push(1);
    assert!(matches!(
        stage.encode(),
        Err(Error::DimensionMismatch {
            row: 0,
            expected: 3,
            found: 4
        })
    ));
}

#[test]
fn v3_positions_are_whole_units() {
    let mut stage = Stage::new(Format::V3);
    if let StageEntities::V3 { entities, .. } = &mut stage.entities {
        let mut entity = EntityV3::default();
        entity.set_position_f32(10.75, -0.5);
        entities.push(entity);
    }
    let bytes = stage.encode().unwrap();
    let decoded = Stage::decode(&bytes, Format::V3).unwrap();
    let entity = decoded.entities().next().unwrap();
    // 10.75 keeps its whole part; -0.5 is 0xFFFF8000, whose high half is -1.
    assert_eq!(entity.position(), (Fixed::from_int(10), Fixed::from_int(-1)));
}

#[test]
fn trailing_bytes_are_left_alone() {
    let mut bytes = sample_v4().encode().unwrap();
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    assert_eq!(Stage::decode(&bytes, Format::V4).unwrap(), sample_v4());
}

#[test]
fn json_dump_round_trips() {
    let stage = sample_v4();
    let json = serde_json::to_string(&stage).unwrap();
    let back: Stage = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stage);
}
