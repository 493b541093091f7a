use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::error::{Error, Result};

/// Maximum number of entities the engine loads from one stage.
pub const ENTITY_LIST_SIZE: usize = 2048;

/// Validation knobs for decoding and encoding.
///
/// The default accepts everything the engine itself accepts. Tighten
/// individual checks by setting fields, or start from
/// [`CodecConfig::engine_limits`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reject boolean bytes other than 0 or 1 instead of treating any nonzero
    /// value as true.
    pub strict_booleans: bool,
    /// Fail when a stage holds more entities than this.
    pub max_entities: Option<usize>,
}

impl CodecConfig {
    /// Strict booleans and the engine's entity list size.
    pub fn engine_limits() -> Self {
        Self {
            strict_booleans: true,
            max_entities: Some(ENTITY_LIST_SIZE),
        }
    }

    pub(crate) fn read_bool(&self, c: &mut Cursor<'_>) -> Result<bool> {
        if self.strict_booleans {
            c.read_bool_strict()
        } else {
            c.read_bool()
        }
    }

    pub(crate) fn check_entity_count(&self, count: usize) -> Result<()> {
        match self.max_entities {
            Some(max) if count > max => Err(Error::TooManyEntities { count, max }),
            _ => Ok(()),
        }
    }
}
