//! Piece sprites loaded from PNG files.
//!
//! One image per (color, piece) pair, named `<key>.png` where the key is
//! [`asset_key`]. Images are scaled once at load time to the sprite size the
//! board geometry asks for.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chess::{PieceColor, PieceKind};
use image::imageops::FilterType;

/// Alpha below this is treated as transparent.
const ALPHA_THRESHOLD: u8 = 128;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Missing piece image '{key}' at {path:?}")]
    Missing { key: String, path: PathBuf },
    #[error("Failed to read piece image '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode piece image '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: image::ImageError,
    },
}

/// Asset key for a piece: color prefix then piece letter, pawns lowercase
/// (`wp`, `bK`, ...).
pub fn asset_key(color: PieceColor, kind: PieceKind) -> String {
    let letter = match kind {
        PieceKind::Pawn => 'p',
        other => other.to_char_upper(),
    };
    format!("{}{}", color.prefix(), letter)
}

/// A scaled piece image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Sprite {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB of the pixel at (`x`, `y`), or `None` if it is transparent or out
    /// of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = *self.pixels.get((y * self.width + x) as usize)?;
        (a >= ALPHA_THRESHOLD).then_some((r, g, b))
    }
}

/// All twelve piece sprites.
#[derive(Debug, Clone)]
pub struct AssetTable {
    sprites: HashMap<(PieceColor, PieceKind), Sprite>,
}

impl AssetTable {
    /// Load and scale every piece image in `dir`. Fails on the first missing
    /// or unreadable image.
    pub fn load(dir: &Path, sprite_width: u32, sprite_height: u32) -> Result<Self, AssetError> {
        let mut sprites = HashMap::with_capacity(12);
        for color in PieceColor::ALL {
            for kind in PieceKind::ALL {
                let key = asset_key(color, kind);
                let path = dir.join(format!("{}.png", key));
                let sprite = load_sprite(&key, &path, sprite_width, sprite_height)?;
                sprites.insert((color, kind), sprite);
            }
        }
        tracing::info!(
            dir = %dir.display(),
            "Loaded {} piece images at {}x{}",
            sprites.len(),
            sprite_width,
            sprite_height
        );
        Ok(Self { sprites })
    }

    pub fn sprite(&self, color: PieceColor, kind: PieceKind) -> Option<&Sprite> {
        self.sprites.get(&(color, kind))
    }
}

fn load_sprite(key: &str, path: &Path, width: u32, height: u32) -> Result<Sprite, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing {
            key: key.to_string(),
            path: path.to_path_buf(),
        });
    }
    let reader = image::io::Reader::open(path).map_err(|source| AssetError::Io {
        key: key.to_string(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        key: key.to_string(),
        source,
    })?;
    let scaled = decoded
        .resize_exact(width.max(1), height.max(1), FilterType::Nearest)
        .to_rgba8();
    let (w, h) = scaled.dimensions();
    let pixels = scaled.pixels().map(|p| p.0).collect();
    tracing::debug!(key, "Loaded {:?}", path);
    Ok(Sprite::from_rgba(w, h, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_set(dir: &Path, size: u32) {
        for color in PieceColor::ALL {
            for kind in PieceKind::ALL {
                let mut img = RgbaImage::new(size, size);
                // Opaque top-left quadrant, transparent elsewhere.
                for y in 0..size / 2 {
                    for x in 0..size / 2 {
                        img.put_pixel(x, y, Rgba([200, 10, 10, 255]));
                    }
                }
                img.save(dir.join(format!("{}.png", asset_key(color, kind))))
                    .unwrap();
            }
        }
    }

    #[test]
    fn keys_match_file_names() {
        let keys: Vec<String> = PieceColor::ALL
            .iter()
            .flat_map(|&c| PieceKind::ALL.iter().map(move |&k| asset_key(c, k)))
            .collect();
        assert_eq!(
            keys,
            vec!["wp", "wN", "wB", "wR", "wQ", "wK", "bp", "bN", "bB", "bR", "bQ", "bK"]
        );
    }

    #[test]
    fn loads_and_scales_full_set() {
        let dir = TempDir::new().unwrap();
        write_set(dir.path(), 16);

        let table = AssetTable::load(dir.path(), 8, 8).unwrap();
        let sprite = table.sprite(PieceColor::Black, PieceKind::Queen).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (8, 8));
        assert_eq!(sprite.pixel(0, 0), Some((200, 10, 10)));
        assert_eq!(sprite.pixel(7, 7), None);
        assert_eq!(sprite.pixel(8, 0), None);
    }

    #[test]
    fn missing_image_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_set(dir.path(), 4);
        std::fs::remove_file(dir.path().join("bK.png")).unwrap();

        match AssetTable::load(dir.path(), 8, 8) {
            Err(AssetError::Missing { key, .. }) => assert_eq!(key, "bK"),
            other => panic!("expected missing asset, got {:?}", other),
        }
    }

    #[test]
    fn corrupt_image_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_set(dir.path(), 4);
        std::fs::write(dir.path().join("wN.png"), b"not a png").unwrap();

        assert!(matches!(
            AssetTable::load(dir.path(), 8, 8),
            Err(AssetError::Decode { .. })
        ));
    }
}
