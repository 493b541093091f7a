use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;
use crate::fixed::Fixed;

/// Fields shared by entity records of both generations.
pub trait Placement {
    /// Index into the stage's object type list.
    fn object_type(&self) -> u8;

    /// Property value (the subtype in the classic games).
    fn property_value(&self) -> u8;

    fn position(&self) -> (Fixed, Fixed);

    fn position_f32(&self) -> (f32, f32) {
        let (x, y) = self.position();
        (x.to_f32(), y.to_f32())
    }
}

/// A v3 entity record: 6 bytes, whole-unit big-endian coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityV3 {
    pub object_type: u8,
    pub property_value: u8,
    pub x: Fixed,
    pub y: Fixed,
}

impl EntityV3 {
    pub const SIZE: usize = 6;

    pub fn new(object_type: u8, property_value: u8, x: Fixed, y: Fixed) -> Self {
        Self {
            object_type,
            property_value,
            x,
            y,
        }
    }

    /// Set the position from floats, truncating toward zero.
    pub fn set_position_f32(&mut self, x: f32, y: f32) {
        self.x = Fixed::from_f32(x);
        self.y = Fixed::from_f32(y);
    }

    pub fn read(c: &mut Cursor<'_>) -> Result<Self> {
        let object_type = c.read_u8()?;
        let property_value = c.read_u8()?;
        let x = Fixed::read_v3(c)?;
        let y = Fixed::read_v3(c)?;
        Ok(Self {
            object_type,
            property_value,
            x,
            y,
        })
    }

    /// Write the record. Fractional coordinate bits are not representable
    /// and are dropped.
    pub fn write(&self, w: &mut Writer) {
        w.write_u8(self.object_type);
        w.write_u8(self.property_value);
        self.x.write_v3(w);
        self.y.write_v3(w);
    }
}

impl Placement for EntityV3 {
    fn object_type(&self) -> u8 {
        self.object_type
    }

    fn property_value(&self) -> u8 {
        self.property_value
    }

    fn position(&self) -> (Fixed, Fixed) {
        (self.x, self.y)
    }
}

/// Tile/sprite flip direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    FlipNone = 0,
    FlipX = 1,
    FlipY = 2,
    FlipXY = 3,
}

impl Direction {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::FlipNone),
            1 => Some(Self::FlipX),
            2 => Some(Self::FlipY),
            3 => Some(Self::FlipXY),
            _ => None,
        }
    }
}

/// When an entity is processed relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Priority {
    Bounds = 0,
    Active = 1,
    Always = 2,
    XBounds = 3,
    XBoundsDestroy = 4,
    Inactive = 5,
    BoundsSmall = 6,
    ActiveSmall = 7,
}

impl Priority {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Bounds),
            1 => Some(Self::Active),
            2 => Some(Self::Always),
            3 => Some(Self::XBounds),
            4 => Some(Self::XBoundsDestroy),
            5 => Some(Self::Inactive),
            6 => Some(Self::BoundsSmall),
            7 => Some(Self::ActiveSmall),
            _ => None,
        }
    }
}

/// Blend mode used when drawing the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InkEffect {
    None = 0,
    Blend = 1,
    Alpha = 2,
    Add = 3,
    Sub = 4,
}

impl InkEffect {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::None),
            1 => Some(Self::Blend),
            2 => Some(Self::Alpha),
            3 => Some(Self::Add),
            4 => Some(Self::Sub),
            _ => None,
        }
    }
}

/// Optional v4 entity attribute. The discriminant is the bit index in the
/// record's presence mask, and also the order values are stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Attribute {
    State = 0,
    Direction = 1,
    Scale = 2,
    Rotation = 3,
    DrawOrder = 4,
    Priority = 5,
    Alpha = 6,
    Animation = 7,
    AnimationSpeed = 8,
    Frame = 9,
    InkEffect = 10,
    Value0 = 11,
    Value1 = 12,
    Value2 = 13,
    Value3 = 14,
}

impl Attribute {
    /// Every attribute, in bit (and storage) order.
    pub const ALL: [Self; 15] = [
        Self::State,
        Self::Direction,
        Self::Scale,
        Self::Rotation,
        Self::DrawOrder,
        Self::Priority,
        Self::Alpha,
        Self::Animation,
        Self::AnimationSpeed,
        Self::Frame,
        Self::InkEffect,
        Self::Value0,
        Self::Value1,
        Self::Value2,
        Self::Value3,
    ];

    pub fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Stored size in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::State
            | Self::Scale
            | Self::Rotation
            | Self::AnimationSpeed
            | Self::Value0
            | Self::Value1
            | Self::Value2
            | Self::Value3 => 4,
            Self::Direction
            | Self::DrawOrder
            | Self::Priority
            | Self::Alpha
            | Self::Animation
            | Self::Frame
            | Self::InkEffect => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Int(i32),
    Byte(u8),
}

/// A v4 entity record: presence mask, full 16.16 coordinates, then the
/// attributes whose bits are set.
///
/// `None` always means "not stored"; there are no sentinel values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityV4 {
    pub object_type: u8,
    pub property_value: u8,
    pub x: Fixed,
    pub y: Fixed,

    pub state: Option<i32>,
    pub direction: Option<Direction>,
    pub scale: Option<i32>,
    pub rotation: Option<i32>,
    pub draw_order: Option<u8>,
    pub priority: Option<Priority>,
    pub alpha: Option<u8>,
    pub animation: Option<u8>,
    pub animation_speed: Option<i32>,
    pub frame: Option<u8>,
    pub ink_effect: Option<InkEffect>,
    pub value0: Option<i32>,
    pub value1: Option<i32>,
    pub value2: Option<i32>,
    pub value3: Option<i32>,
}

impl EntityV4 {
    pub fn new(object_type: u8, property_value: u8, x: Fixed, y: Fixed) -> Self {
        Self {
            object_type,
            property_value,
            x,
            y,
            ..Self::default()
        }
    }

    /// Set the position from floats, truncating toward zero.
    pub fn set_position_f32(&mut self, x: f32, y: f32) {
        self.x = Fixed::from_f32(x);
        self.y = Fixed::from_f32(y);
    }

    pub fn has(&self, attr: Attribute) -> bool {
        self.slot(attr).is_some()
    }

    /// Stored value of one attribute, widened to its wire type.
    fn slot(&self, attr: Attribute) -> Option<Slot> {
        match attr {
            Attribute::State => self.state.map(Slot::Int),
            Attribute::Direction => self.direction.map(|v| Slot::Byte(v as u8)),
            Attribute::Scale => self.scale.map(Slot::Int),
            Attribute::Rotation => self.rotation.map(Slot::Int),
            Attribute::DrawOrder => self.draw_order.map(Slot::Byte),
            Attribute::Priority => self.priority.map(|v| Slot::Byte(v as u8)),
            Attribute::Alpha => self.alpha.map(Slot::Byte),
            Attribute::Animation => self.animation.map(Slot::Byte),
            Attribute::AnimationSpeed => self.animation_speed.map(Slot::Int),
            Attribute::Frame => self.frame.map(Slot::Byte),
            Attribute::InkEffect => self.ink_effect.map(|v| Slot::Byte(v as u8)),
            Attribute::Value0 => self.value0.map(Slot::Int),
            Attribute::Value1 => self.value1.map(Slot::Int),
            Attribute::Value2 => self.value2.map(Slot::Int),
            Attribute::Value3 => self.value3.map(Slot::Int),
        }
    }

    /// Presence mask derived from which attributes hold a value.
    pub fn presence_mask(&self) -> u16 {
        Attribute::ALL
            .iter()
            .filter(|&&attr| self.has(attr))
            .fold(0, |mask, attr| mask | attr.bit())
    }

    /// Encoded size of this record in bytes.
    pub fn encoded_len(&self) -> usize {
        12 + Attribute::ALL
            .iter()
            .filter(|&&attr| self.has(attr))
            .map(|attr| attr.width())
            .sum::<usize>()
    }

    pub fn read(c: &mut Cursor<'_>) -> Result<Self> {
        let mask = c.read_u16(Endian::Little)?;
        let object_type = c.read_u8()?;
        let property_value = c.read_u8()?;
        let x = Fixed::read_v4(c)?;
        let y = Fixed::read_v4(c)?;

        let mut entity = Self::new(object_type, property_value, x, y);
        for attr in Attribute::ALL {
            if mask & attr.bit() != 0 {
                entity.read_attribute(attr, c)?;
            }
        }
        if mask & 0x8000 != 0 {
            tracing::debug!(mask, "ignoring unused presence bit 15");
        }
        tracing::trace!(mask, object_type, property_value, "read v4 entity");
        Ok(entity)
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_u16(self.presence_mask(), Endian::Little);
        w.write_u8(self.object_type);
        w.write_u8(self.property_value);
        self.x.write_v4(w);
        self.y.write_v4(w);
        for attr in Attribute::ALL {
            self.write_attribute(attr, w);
        }
    }

    fn read_attribute(&mut self, attr: Attribute, c: &mut Cursor<'_>) -> Result<()> {
        match attr {
            Attribute::State => self.state = Some(c.read_i32(Endian::Little)?),
            Attribute::Direction => self.direction = Some(c.read_enum("direction", Direction::from_u8)?),
            Attribute::Scale => self.scale = Some(c.read_i32(Endian::Little)?),
            Attribute::Rotation => self.rotation = Some(c.read_i32(Endian::Little)?),
            Attribute::DrawOrder => self.draw_order = Some(c.read_u8()?),
            Attribute::Priority => self.priority = Some(c.read_enum("priority", Priority::from_u8)?),
            Attribute::Alpha => self.alpha = Some(c.read_u8()?),
            Attribute::Animation => self.animation = Some(c.read_u8()?),
            Attribute::AnimationSpeed => self.animation_speed = Some(c.read_i32(Endian::Little)?),
            Attribute::Frame => self.frame = Some(c.read_u8()?),
            Attribute::InkEffect => self.ink_effect = Some(c.read_enum("ink effect", InkEffect::from_u8)?),
            Attribute::Value0 => self.value0 = Some(c.read_i32(Endian::Little)?),
            Attribute::Value1 => self.value1 = Some(c.read_i32(Endian::Little)?),
            Attribute::Value2 => self.value2 = Some(c.read_i32(Endian::Little)?),
            Attribute::Value3 => self.value3 = Some(c.read_i32(Endian::Little)?),
        }
        Ok(())
    }

    /// Write one attribute if present; absent attributes write nothing.
    fn write_attribute(&self, attr: Attribute, w: &mut Writer) {
        match self.slot(attr) {
            Some(Slot::Int(v)) => w.write_i32(v, Endian::Little),
            Some(Slot::Byte(v)) => w.write_u8(v),
            None => {}
        }
    }
}

impl Placement for EntityV4 {
    fn object_type(&self) -> u8 {
        self.object_type
    }

    fn property_value(&self) -> u8 {
        self.property_value
    }

    fn position(&self) -> (Fixed, Fixed) {
        (self.x, self.y)
    }
}
