use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::cursor::{Cursor, Writer};
use crate::entity::{EntityV3, EntityV4, Placement};
use crate::error::{Error, Result};
use crate::fixed::Fixed;
use crate::format::Format;
use crate::layout::TileLayout;

/// Layer slot selectable as one of the stage's four active layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActiveLayer {
    Foreground = 0,
    Background1 = 1,
    Background2 = 2,
    Background3 = 3,
    Background4 = 4,
    Background5 = 5,
    Background6 = 6,
    Background7 = 7,
    Background8 = 8,
    None = 9,
}

impl ActiveLayer {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Foreground),
            1 => Some(Self::Background1),
            2 => Some(Self::Background2),
            3 => Some(Self::Background3),
            4 => Some(Self::Background4),
            5 => Some(Self::Background5),
            6 => Some(Self::Background6),
            7 => Some(Self::Background7),
            8 => Some(Self::Background8),
            9 => Some(Self::None),
            _ => None,
        }
    }
}

/// Which active layers draw on the high visual plane. With `AfterLayer1`,
/// active layers 0 and 1 draw low and layers 2 and 3 draw high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayerMidpoint {
    BeforeLayer0 = 0,
    AfterLayer0 = 1,
    AfterLayer1 = 2,
    AfterLayer2 = 3,
    AfterLayer3 = 4,
}

impl LayerMidpoint {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::BeforeLayer0),
            1 => Some(Self::AfterLayer0),
            2 => Some(Self::AfterLayer1),
            3 => Some(Self::AfterLayer2),
            4 => Some(Self::AfterLayer3),
            _ => None,
        }
    }
}

/// Generation-specific part of a stage: its entity records, plus the object
/// type name table that only v3 stages carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageEntities {
    V3 {
        /// Type names from index 1 on; the blank type 0 is implicit.
        object_type_names: Vec<String>,
        entities: Vec<EntityV3>,
    },
    V4(Vec<EntityV4>),
}

impl StageEntities {
    pub fn new(format: Format) -> Self {
        match format {
            Format::V3 => Self::V3 {
                object_type_names: Vec::new(),
                entities: Vec::new(),
            },
            Format::V4 => Self::V4(Vec::new()),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Self::V3 { .. } => Format::V3,
            Self::V4(_) => Format::V4,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::V3 { entities, .. } => entities.len(),
            Self::V4(entities) => entities.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed view of an entity of either generation.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    V3(&'a EntityV3),
    V4(&'a EntityV4),
}

impl Placement for EntityRef<'_> {
    fn object_type(&self) -> u8 {
        match self {
            Self::V3(e) => e.object_type,
            Self::V4(e) => e.object_type,
        }
    }

    fn property_value(&self) -> u8 {
        match self {
            Self::V3(e) => e.property_value,
            Self::V4(e) => e.property_value,
        }
    }

    fn position(&self) -> (Fixed, Fixed) {
        match self {
            Self::V3(e) => e.position(),
            Self::V4(e) => e.position(),
        }
    }
}

/// A decoded stage: header, foreground chunk layout and entity placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Name shown on the title card.
    pub title: String,
    pub active_layers: [ActiveLayer; 4],
    pub layer_midpoint: LayerMidpoint,
    pub layout: TileLayout,
    pub entities: StageEntities,
}

impl Stage {
    /// An empty stage with the engine's default header.
    pub fn new(format: Format) -> Self {
        Self {
            title: "STAGE".to_string(),
            active_layers: [
                ActiveLayer::Background1,
                ActiveLayer::None,
                ActiveLayer::Foreground,
                ActiveLayer::Foreground,
            ],
            layer_midpoint: LayerMidpoint::AfterLayer2,
            layout: TileLayout::default(),
            entities: StageEntities::new(format),
        }
    }

    pub fn format(&self) -> Format {
        self.entities.format()
    }

    /// Width in chunks.
    pub fn width(&self) -> u8 {
        self.layout.width()
    }

    /// Height in chunks.
    pub fn height(&self) -> u8 {
        self.layout.height()
    }

    /// Resize the chunk layout. See [`TileLayout::resize`].
    pub fn resize(&mut self, width: u8, height: u8) {
        self.layout.resize(width, height);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities of either generation, in stored order.
    pub fn entities(&self) -> Box<dyn Iterator<Item = EntityRef<'_>> + '_> {
        match &self.entities {
            StageEntities::V3 { entities, .. } => Box::new(entities.iter().map(EntityRef::V3)),
            StageEntities::V4(entities) => Box::new(entities.iter().map(EntityRef::V4)),
        }
    }

    /// The v3 object type name table, or `None` for v4 stages.
    pub fn object_type_names(&self) -> Option<&[String]> {
        match &self.entities {
            StageEntities::V3 {
                object_type_names, ..
            } => Some(object_type_names),
            StageEntities::V4(_) => None,
        }
    }

    /// Decode a stage from raw bytes with the default [`CodecConfig`].
    pub fn decode(data: &[u8], format: Format) -> Result<Self> {
        Self::decode_with(data, format, &CodecConfig::default())
    }

    pub fn decode_with(data: &[u8], format: Format, config: &CodecConfig) -> Result<Self> {
        let mut c = Cursor::new(data);
        let stage = Self::read(&mut c, format, config)?;
        if !c.is_empty() {
            tracing::debug!(trailing = c.remaining(), "stage record followed by extra bytes");
        }
        Ok(stage)
    }

    /// Read a stage record at the cursor. Stops right after the last entity.
    pub fn read(c: &mut Cursor<'_>, format: Format, config: &CodecConfig) -> Result<Self> {
        let title = c.read_rsdk_string()?;

        let mut active_layers = [ActiveLayer::Foreground; 4];
        for layer in &mut active_layers {
            *layer = c.read_enum("active layer", ActiveLayer::from_u8)?;
        }
        let layer_midpoint = c.read_enum("layer midpoint", LayerMidpoint::from_u8)?;

        let width = c.read_u8()?;
        if format.has_dimension_padding() {
            c.skip(1)?;
        }
        let height = c.read_u8()?;
        if format.has_dimension_padding() {
            c.skip(1)?;
        }

        let layout = TileLayout::read(c, width, height, format.layout_endian())?;

        let entities = match format {
            Format::V3 => {
                let name_count = c.read_u8()?;
                let mut object_type_names = Vec::with_capacity(name_count as usize);
                for _ in 0..name_count {
                    object_type_names.push(c.read_rsdk_string()?);
                }

                let count = c.read_u16(format.entity_count_endian())? as usize;
                config.check_entity_count(count)?;
                let mut entities = Vec::with_capacity(count);
                for _ in 0..count {
                    entities.push(EntityV3::read(c)?);
                }
                StageEntities::V3 {
                    object_type_names,
                    entities,
                }
            }
            Format::V4 => {
                let count = c.read_u16(format.entity_count_endian())? as usize;
                config.check_entity_count(count)?;
                let mut entities = Vec::with_capacity(count);
                for _ in 0..count {
                    entities.push(EntityV4::read(c)?);
                }
                StageEntities::V4(entities)
            }
        };

        tracing::debug!(
            %format,
            title = %title,
            width,
            height,
            entities = entities.len(),
            "decoded stage"
        );

        Ok(Self {
            title,
            active_layers,
            layer_midpoint,
            layout,
            entities,
        })
    }

    /// Encode with the default [`CodecConfig`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&CodecConfig::default())
    }

    pub fn encode_with(&self, config: &CodecConfig) -> Result<Vec<u8>> {
        let mut w = Writer::new();
        self.write(&mut w, config)?;
        Ok(w.into_bytes())
    }

    pub fn write(&self, w: &mut Writer, config: &CodecConfig) -> Result<()> {
        let format = self.format();
        config.check_entity_count(self.entity_count())?;

        w.write_rsdk_string(&self.title)?;
        for layer in self.active_layers {
            w.write_u8(layer as u8);
        }
        w.write_u8(self.layer_midpoint as u8);

        w.write_u8(self.layout.width());
        if format.has_dimension_padding() {
            w.write_u8(0);
        }
        w.write_u8(self.layout.height());
        if format.has_dimension_padding() {
            w.write_u8(0);
        }

        self.layout.write(w, format.layout_endian())?;

        let count = u16::try_from(self.entity_count()).map_err(|_| Error::CountOverflow {
            what: "entity",
            count: self.entity_count(),
            max: u16::MAX as usize,
        })?;

        match &self.entities {
            StageEntities::V3 {
                object_type_names,
                entities,
            } => {
                let name_count = u8::try_from(object_type_names.len()).map_err(|_| Error::CountOverflow {
                    what: "object type name",
                    count: object_type_names.len(),
                    max: u8::MAX as usize,
                })?;
                w.write_u8(name_count);
                for name in object_type_names {
                    w.write_rsdk_string(name)?;
                }

                w.write_u16(count, format.entity_count_endian());
                for entity in entities {
                    entity.write(w);
                }
            }
            StageEntities::V4(entities) => {
                w.write_u16(count, format.entity_count_endian());
                for entity in entities {
                    entity.write(w);
                }
            }
        }

        tracing::debug!(%format, title = %self.title, entities = count, "encoded stage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let stage = Stage::new(Format::V4);
        assert_eq!(stage.title, "STAGE");
        assert_eq!(
            stage.active_layers,
            [
                ActiveLayer::Background1,
                ActiveLayer::None,
                ActiveLayer::Foreground,
                ActiveLayer::Foreground
            ]
        );
        assert_eq!(stage.layer_midpoint, LayerMidpoint::AfterLayer2);
        assert_eq!((stage.width(), stage.height()), (0, 0));
        assert_eq!(stage.entity_count(), 0);
        assert!(stage.object_type_names().is_none());
        assert_eq!(Stage::new(Format::V3).object_type_names(), Some(&[][..]));
    }

    #[test]
    fn empty_v3_bytes() {
        let bytes = Stage::new(Format::V3).encode().unwrap();
        assert_eq!(
            bytes,
            [5, b'S', b'T', b'A', b'G', b'E', 1, 9, 0, 0, 3, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn empty_v4_bytes() {
        let bytes = Stage::new(Format::V4).encode().unwrap();
        assert_eq!(
            bytes,
            [5, b'S', b'T', b'A', b'G', b'E', 1, 9, 0, 0, 3, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn v4_padding_is_ignored_on_read() {
        let mut bytes = Stage::new(Format::V4).encode().unwrap();
        // Title is 6 bytes, layers+midpoint 5; width at 11, its pad at 12.
        bytes[12] = 0xAA;
        bytes[14] = 0x55;
        let stage = Stage::decode(&bytes, Format::V4).unwrap();
        assert_eq!(stage, Stage::new(Format::V4));
        // Written back as zero.
        let again = stage.encode().unwrap();
        assert_eq!(again[12], 0);
        assert_eq!(again[14], 0);
    }

    #[test]
    fn invalid_active_layer() {
        let mut bytes = Stage::new(Format::V3).encode().unwrap();
        bytes[8] = 10;
        assert!(matches!(
            Stage::decode(&bytes, Format::V3),
            Err(Error::InvalidEnumValue {
                kind: "active layer",
                value: 10,
                offset: 8
            })
        ));
    }

    #[test]
    fn invalid_midpoint() {
        let mut bytes = Stage::new(Format::V4).encode().unwrap();
        bytes[10] = 5;
        assert!(matches!(
            Stage::decode(&bytes, Format::V4),
            Err(Error::InvalidEnumValue {
                kind: "layer midpoint",
                ..
            })
        ));
    }

    #[test]
    fn entity_limit_applies_both_ways() {
        let mut stage = Stage::new(Format::V3);
        if let StageEntities::V3 { entities, .. } = &mut stage.entities {
            entities.resize(3, EntityV3::default());
        }
        let config = CodecConfig {
            max_entities: Some(2),
            ..CodecConfig::default()
        };
        assert!(matches!(
            stage.encode_with(&config),
            Err(Error::TooManyEntities { count: 3, max: 2 })
        ));

        let bytes = stage.encode().unwrap();
        assert!(matches!(
            Stage::decode_with(&bytes, Format::V3, &config),
            Err(Error::TooManyEntities { count: 3, max: 2 })
        ));
    }

    #[test]
    fn too_many_type_names() {
        let mut stage = Stage::new(Format::V3);
        if let StageEntities::V3 {
            object_type_names, ..
        } = &mut stage.entities
        {
            object_type_names.resize(256, "Ring".to_string());
        }
        assert!(matches!(
            stage.encode(),
            Err(Error::CountOverflow { count: 256, max: 255, .. })
        ));
    }

    #[test]
    fn entity_view_reads_common_fields() {
        let mut stage = Stage::new(Format::V4);
        if let StageEntities::V4(entities) = &mut stage.entities {
            entities.push(EntityV4::new(3, 1, Fixed::from_int(10), Fixed::from_int(20)));
        }
        let first = stage.entities().next().unwrap();
        assert_eq!(first.object_type(), 3);
        assert_eq!(first.property_value(), 1);
        assert_eq!(first.position_f32(), (10.0, 20.0));
    }
}
