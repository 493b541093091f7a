use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("invalid {kind} value {value} at offset {offset:#x}")]
    InvalidEnumValue {
        kind: &'static str,
        value: u8,
        offset: usize,
    },

    #[error("tile layout row {row} has {found} columns, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("string of {len} bytes does not fit a u8 length prefix")]
    StringTooLong { len: usize },

    #[error("character {ch:?} cannot be stored as a single byte")]
    UnencodableChar { ch: char },

    #[error("{what} count {count} exceeds the format maximum of {max}")]
    CountOverflow {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("palette holds {found} colours, the record stores exactly {expected}")]
    PaletteSize { expected: usize, found: usize },

    #[error("stage has {count} entities, limit is {max}")]
    TooManyEntities { count: usize, max: usize },

    #[error("file {name:?} not found in data pack")]
    FileNotFound { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
