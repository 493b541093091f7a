use std::hash::{Hash, Hasher};

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, Writer};
use crate::error::Result;

/// A resource name addressed by the MD5 of its ASCII bytes.
///
/// Built either from a known name or from 16 raw digest bytes read out of a
/// file. Equality and hashing only look at the digest, so a named id and a
/// digest-only id for the same name compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameId {
    hash: [u8; 16],
    name: Option<String>,
}

impl NameId {
    pub const SIZE: usize = 16;

    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            hash: hash_name(&name),
            name: Some(name),
        }
    }

    pub fn from_hash(hash: [u8; 16]) -> Self {
        Self { hash, name: None }
    }

    pub fn hash(&self) -> &[u8; 16] {
        &self.hash
    }

    /// The plain-text name, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lowercase hex digest with no separators.
    pub fn hash_string(&self) -> String {
        let mut s = String::with_capacity(32);
        for b in self.hash {
            s.push_str(&format!("{b:02x}"));
        }
        s
    }

    pub fn read(c: &mut Cursor<'_>) -> Result<Self> {
        let bytes = c.read_bytes(Self::SIZE)?;
        let mut hash = [0u8; 16];
        hash.copy_from_slice(bytes);
        Ok(Self::from_hash(hash))
    }

    pub fn write(&self, w: &mut Writer) {
        w.write_bytes(&self.hash);
    }
}

/// MD5 of the name with non-ASCII characters replaced by `?`.
fn hash_name(name: &str) -> [u8; 16] {
    let bytes: Vec<u8> = name
        .chars()
        .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
        .collect();
    let mut hash = [0u8; 16];
    hash.copy_from_slice(&Md5::digest(&bytes));
    hash
}

impl PartialEq for NameId {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for NameId {}

impl Hash for NameId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl std::fmt::Display for NameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.hash_string()),
        }
    }
}
