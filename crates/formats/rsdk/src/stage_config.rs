use serde::{Deserialize, Serialize};

use crate::config::CodecConfig;
use crate::cursor::{Cursor, Writer};
use crate::error::{Error, Result};
use crate::format::Format;
use crate::palette::Palette;

/// Palette rows stored by a stage config (indices 96..128 of the full palette).
pub const STAGE_PALETTE_ROWS: usize = 2;

/// A stage-specific object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub name: String,
    /// Path of the object's script, relative to the scripts folder.
    pub script: String,
}

/// A named sound effect (v4 only; v3 stores bare paths).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundInfo {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageSounds {
    V3(Vec<String>),
    V4(Vec<SoundInfo>),
}

/// Per-stage object and sound lists, plus the stage palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Whether the game config's global objects are loaded too.
    pub load_global_objects: bool,
    pub palette: Palette,
    pub objects: Vec<ObjectInfo>,
    pub sounds: StageSounds,
}

impl StageConfig {
    pub fn new(format: Format) -> Self {
        Self {
            load_global_objects: false,
            palette: Palette::with_rows(STAGE_PALETTE_ROWS),
            objects: Vec::new(),
            sounds: match format {
                Format::V3 => StageSounds::V3(Vec::new()),
                Format::V4 => StageSounds::V4(Vec::new()),
            },
        }
    }

    pub fn format(&self) -> Format {
        match self.sounds {
            StageSounds::V3(_) => Format::V3,
            StageSounds::V4(_) => Format::V4,
        }
    }

    pub fn decode(data: &[u8], format: Format) -> Result<Self> {
        Self::decode_with(data, format, &CodecConfig::default())
    }

    pub fn decode_with(data: &[u8], format: Format, config: &CodecConfig) -> Result<Self> {
        let mut c = Cursor::new(data);
        Self::read(&mut c, format, config)
    }

    /// v3: flag, palette, objects, sound paths.
    /// v4: flag, palette, named sounds, objects.
    pub fn read(c: &mut Cursor<'_>, format: Format, config: &CodecConfig) -> Result<Self> {
        let load_global_objects = config.read_bool(c)?;
        let palette = Palette::read(c, STAGE_PALETTE_ROWS)?;

        let (objects, sounds) = match format {
            Format::V3 => {
                let objects = read_objects(c)?;
                let count = c.read_u8()?;
                let mut paths = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    paths.push(c.read_rsdk_string()?);
                }
                (objects, StageSounds::V3(paths))
            }
            Format::V4 => {
                let count = c.read_u8()? as usize;
                let mut sounds = Vec::with_capacity(count);
                for _ in 0..count {
                    sounds.push(SoundInfo {
                        name: c.read_rsdk_string()?,
                        path: String::new(),
                    });
                }
                for sound in &mut sounds {
                    sound.path = c.read_rsdk_string()?;
                }
                let objects = read_objects(c)?;
                (objects, StageSounds::V4(sounds))
            }
        };

        tracing::debug!(
            %format,
            objects = objects.len(),
            global_objects = load_global_objects,
            "decoded stage config"
        );

        Ok(Self {
            load_global_objects,
            palette,
            objects,
            sounds,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut w = Writer::new();
        self.write(&mut w)?;
        Ok(w.into_bytes())
    }

    pub fn write(&self, w: &mut Writer) -> Result<()> {
        w.write_bool(self.load_global_objects);
        self.palette.write(w, STAGE_PALETTE_ROWS)?;

        match &self.sounds {
            StageSounds::V3(paths) => {
                write_objects(w, &self.objects)?;
                w.write_u8(list_count("sound effect", paths.len())?);
                for path in paths {
                    w.write_rsdk_string(path)?;
                }
            }
            StageSounds::V4(sounds) => {
                w.write_u8(list_count("sound effect", sounds.len())?);
                for sound in sounds {
                    w.write_rsdk_string(&sound.name)?;
                }
                for sound in sounds {
                    w.write_rsdk_string(&sound.path)?;
                }
                write_objects(w, &self.objects)?;
            }
        }
        Ok(())
    }
}

/// u8 count, then every name, then every script.
fn read_objects(c: &mut Cursor<'_>) -> Result<Vec<ObjectInfo>> {
    let count = c.read_u8()? as usize;
    let mut objects = Vec::with_capacity(count);
    for _ in 0..count {
        objects.push(ObjectInfo {
            name: c.read_rsdk_string()?,
            script: String::new(),
        });
    }
    for object in &mut objects {
        object.script = c.read_rsdk_string()?;
    }
    Ok(objects)
}

fn write_objects(w: &mut Writer, objects: &[ObjectInfo]) -> Result<()> {
    w.write_u8(list_count("object", objects.len())?);
    for object in objects {
        w.write_rsdk_string(&object.name)?;
    }
    for object in objects {
        w.write_rsdk_string(&object.script)?;
    }
    Ok(())
}

fn list_count(what: &'static str, count: usize) -> Result<u8> {
    u8::try_from(count).map_err(|_| Error::CountOverflow {
        what,
        count,
        max: u8::MAX as usize,
    })
}
