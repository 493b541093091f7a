use serde::{Deserialize, Serialize};

use crate::cursor::Endian;

/// Stage asset generation.
///
/// - `V3` (Format A): big-endian tile layout and counts, packed 6-byte entity
///   records, and an object type name table inside the stage.
/// - `V4` (Format B): little-endian tile layout and counts, padded dimension
///   bytes, and entity records with a presence bitmask of optional attributes.
///
/// The codec never guesses the generation from the data; callers pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    V3,
    V4,
}

impl Format {
    /// Byte order of tile layout cells.
    pub fn layout_endian(self) -> Endian {
        match self {
            Self::V3 => Endian::Big,
            Self::V4 => Endian::Little,
        }
    }

    /// Byte order of the u16 entity count.
    pub fn entity_count_endian(self) -> Endian {
        match self {
            Self::V3 => Endian::Big,
            Self::V4 => Endian::Little,
        }
    }

    /// Whether width and height are each followed by an unused zero byte.
    pub fn has_dimension_padding(self) -> bool {
        matches!(self, Self::V4)
    }

    /// Whether the stage stores its own object type name table.
    pub fn has_type_names(self) -> bool {
        matches!(self, Self::V3)
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V3 => write!(f, "v3"),
            Self::V4 => write!(f, "v4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_disagree_on_byte_order() {
        assert_eq!(Format::V3.layout_endian(), Endian::Big);
        assert_eq!(Format::V4.layout_endian(), Endian::Little);
        assert_eq!(Format::V3.entity_count_endian(), Endian::Big);
        assert_eq!(Format::V4.entity_count_endian(), Endian::Little);
    }

    #[test]
    fn section_presence() {
        assert!(Format::V3.has_type_names());
        assert!(!Format::V4.has_type_names());
        assert!(Format::V4.has_dimension_padding());
        assert!(!Format::V3.has_dimension_padding());
        assert_eq!(Format::V4.to_string(), "v4");
    }
}
