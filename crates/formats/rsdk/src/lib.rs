//! Reader/writer for Retro Engine stage assets (v3 and v4 generations).
//!
//! Three-layer architecture:
//! - **Layer 1** (`cursor`, `format`): byte I/O with explicit endianness,
//!   and the per-generation layout rules
//! - **Layer 2** (`stage`, `entity`, `layout`, `stage_config`, `name`): typed
//!   records, each decoding and encoding itself through the cursor
//! - **Layer 3** (`pack`): loading records out of a data pack or folder

pub mod config;
pub mod cursor;
pub mod entity;
pub mod error;
pub mod fixed;
pub mod format;
pub mod layout;
pub mod name;
pub mod pack;
pub mod palette;
pub mod stage;
pub mod stage_config;

pub use config::{CodecConfig, ENTITY_LIST_SIZE};
pub use entity::{Attribute, Direction, EntityV3, EntityV4, InkEffect, Placement, Priority};
pub use error::{Error, Result};
pub use fixed::Fixed;
pub use format::Format;
pub use layout::TileLayout;
pub use name::NameId;
pub use pack::{DataPack, DirectoryPack, MemoryPack};
pub use stage::{ActiveLayer, EntityRef, LayerMidpoint, Stage, StageEntities};
pub use stage_config::{ObjectInfo, SoundInfo, StageConfig, StageSounds};
