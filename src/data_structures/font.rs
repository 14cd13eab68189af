//! Bitmap fonts: a contiguous character range rasterized into one atlas.
//!
//! [`Font::bake`] rasterizes every character of the configured range with
//! fontdue and packs the glyph bitmaps into a single channel atlas using a
//! shelf packer. For each character it records a [`PackedChar`] (where the
//! glyph sits in the atlas and how it is offset from the pen position) and an
//! [`AlignedQuad`] (the same data as screen offsets plus texture coordinates).
//!
//! All offsets are in pixels with the y axis pointing down, relative to the
//! baseline, so `yoff` is negative for anything above the baseline.

use std::path::Path;

use thiserror::Error;

use super::handle::{Handle, HandleError, Manager, Resource};

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font data must contain exactly one font, found {0}")]
    FontCount(u32),
    #[error("font data is neither TrueType nor OpenType")]
    UnknownFormat,
    #[error("could not parse font: {0}")]
    Parse(String),
    #[error("character range must not be empty")]
    EmptyRange,
    #[error("character range {begin} + {count} exceeds the u32 code space")]
    RangeOverflow { begin: u32, count: u32 },
    #[error("glyph {index} rectangle ({x0}, {y0})-({x1}, {y1}) does not fit a {width}x{height} atlas")]
    InvalidGlyphRect {
        index: usize,
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
        width: u32,
        height: u32,
    },
    #[error("font size must be positive, got {0}")]
    InvalidSize(f32),
    #[error("{width}x{height} atlas is full, {character:?} does not fit")]
    AtlasFull {
        width: u32,
        height: u32,
        character: char,
    },
    #[error("expected {expected} packed characters, got {actual}")]
    GlyphCount { expected: usize, actual: usize },
    #[error("atlas bitmap has {actual} bytes, expected {expected}")]
    AtlasSize { expected: usize, actual: usize },
    #[error("could not write atlas image: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Handle(#[from] HandleError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontAtlasConfig {
    /// First character code in the atlas.
    pub charcode_begin: u32,
    /// Number of consecutive character codes.
    pub charcode_count: u32,
    /// Pixel height from the highest ascender to the lowest descender.
    pub font_size: f32,
    pub width: u32,
    pub height: u32,
    /// Empty pixels kept around every glyph.
    pub padding: u32,
}

impl Default for FontAtlasConfig {
    fn default() -> Self {
        Self {
            charcode_begin: 32,
            charcode_count: 95,
            font_size: 64.0,
            width: 1024,
            height: 1024,
            padding: 1,
        }
    }
}

impl FontAtlasConfig {
    /// One past the last character code of the range.
    pub fn charcode_end(&self) -> Result<u32, FontError> {
        if self.charcode_count == 0 {
            return Err(FontError::EmptyRange);
        }
        self.charcode_begin
            .checked_add(self.charcode_count)
            .ok_or(FontError::RangeOverflow {
                begin: self.charcode_begin,
                count: self.charcode_count,
            })
    }
}

/// Placement of one glyph inside the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackedChar {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub xoff: f32,
    pub yoff: f32,
    pub xadvance: f32,
    pub xoff2: f32,
    pub yoff2: f32,
}

impl PackedChar {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Screen-space rectangle of a glyph drawn at the origin, plus its atlas uvs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignedQuad {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub s0: f32,
    pub t0: f32,
    pub s1: f32,
    pub t1: f32,
}

impl AlignedQuad {
    pub fn from_packed(packed: &PackedChar, atlas_width: u32, atlas_height: u32) -> Self {
        let ipw = 1.0 / atlas_width as f32;
        let iph = 1.0 / atlas_height as f32;
        Self {
            x0: packed.xoff,
            y0: packed.yoff,
            x1: packed.xoff2,
            y1: packed.yoff2,
            s0: packed.x0 as f32 * ipw,
            t0: packed.y0 as f32 * iph,
            s1: packed.x1 as f32 * ipw,
            t1: packed.y1 as f32 * iph,
        }
    }
}

/// Row based rectangle packer.
///
/// Rectangles are placed left to right; when one does not fit the current
/// row, a new row starts below the tallest rectangle of the previous one.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
        }
    }

    /// Reserve a `w` x `h` rectangle and return its top-left corner.
    pub fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * self.padding > self.width {
            return None;
        }
        if self.cursor_x + w + self.padding > self.width {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }
        if self.cursor_y + h + self.padding > self.height {
            return None;
        }
        let position = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(position)
    }
}

/// Number of fonts in a TrueType/OpenType file or collection.
///
/// Returns `None` when the data does not start with a known font signature.
pub fn number_of_fonts(bytes: &[u8]) -> Option<u32> {
    let tag = bytes.get(0..4)?;
    match tag {
        [0x00, 0x01, 0x00, 0x00] | [b'1', 0, 0, 0] | b"true" | b"typ1" | b"OTTO" => Some(1),
        b"ttcf" => {
            let version = bytes.get(4..8)?;
            if version != [0, 1, 0, 0] && version != [0, 2, 0, 0] {
                return None;
            }
            let count = bytes.get(8..12)?;
            Some(u32::from_be_bytes([count[0], count[1], count[2], count[3]]))
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Font {
    config: FontAtlasConfig,
    bitmap: Vec<u8>,
    packed_chars: Vec<PackedChar>,
    aligned_quads: Vec<AlignedQuad>,
}

impl Resource for Font {
    const KIND: &'static str = "font";
}

impl Font {
    pub fn bake(bytes: &[u8], config: &FontAtlasConfig) -> Result<Self, FontError> {
        match number_of_fonts(bytes) {
            Some(1) => {}
            Some(n) => return Err(FontError::FontCount(n)),
            None => return Err(FontError::UnknownFormat),
        }
        let end = config.charcode_end()?;
        if !(config.font_size > 0.0) {
            return Err(FontError::InvalidSize(config.font_size));
        }

        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;

        // fontdue scales by the em size, the atlas is specified by line height
        let units_per_em = font.units_per_em();
        let px = match font.horizontal_line_metrics(units_per_em) {
            Some(m) if m.ascent - m.descent > 0.0 => {
                config.font_size * units_per_em / (m.ascent - m.descent)
            }
            _ => config.font_size,
        };

        let width = config.width as usize;
        let mut bitmap = vec![0u8; width * config.height as usize];
        let mut packer = ShelfPacker::new(config.width, config.height, config.padding);
        let mut packed_chars = Vec::with_capacity(config.charcode_count as usize);

        for code in config.charcode_begin..end {
            let Some(character) = char::from_u32(code) else {
                packed_chars.push(PackedChar::default());
                continue;
            };
            let (metrics, glyph) = font.rasterize(character, px);
            let (w, h) = (metrics.width as u32, metrics.height as u32);
            let (x, y) = if w == 0 || h == 0 {
                (0, 0)
            } else {
                let (x, y) = packer.place(w, h).ok_or(FontError::AtlasFull {
                    width: config.width,
                    height: config.height,
                    character,
                })?;
                for row in 0..metrics.height {
                    let src = &glyph[row * metrics.width..(row + 1) * metrics.width];
                    let start = (y as usize + row) * width + x as usize;
                    bitmap[start..start + metrics.width].copy_from_slice(src);
                }
                (x, y)
            };
            packed_chars.push(PackedChar {
                x0: x,
                y0: y,
                x1: x + w,
                y1: y + h,
                xoff: metrics.xmin as f32,
                yoff: -(metrics.ymin + h as i32) as f32,
                xadvance: metrics.advance_width,
                xoff2: (metrics.xmin + w as i32) as f32,
                yoff2: -metrics.ymin as f32,
            });
        }

        log::info!(
            "Baked {} glyphs at {}px into a {}x{} atlas",
            packed_chars.len(),
            config.font_size,
            config.width,
            config.height
        );
        Self::from_parts(*config, bitmap, packed_chars)
    }

    /// Assemble a font from an already baked atlas.
    pub fn from_parts(
        config: FontAtlasConfig,
        bitmap: Vec<u8>,
        packed_chars: Vec<PackedChar>,
    ) -> Result<Self, FontError> {
        config.charcode_end()?;
        if packed_chars.len() != config.charcode_count as usize {
            return Err(FontError::GlyphCount {
                expected: config.charcode_count as usize,
                actual: packed_chars.len(),
            });
        }
        let expected = config.width as usize * config.height as usize;
        if bitmap.len() != expected {
            return Err(FontError::AtlasSize {
                expected,
                actual: bitmap.len(),
            });
        }
        for (index, p) in packed_chars.iter().enumerate() {
            if p.x0 > p.x1 || p.y0 > p.y1 || p.x1 > config.width || p.y1 > config.height {
                return Err(FontError::InvalidGlyphRect {
                    index,
                    x0: p.x0,
                    y0: p.y0,
                    x1: p.x1,
                    y1: p.y1,
                    width: config.width,
                    height: config.height,
                });
            }
        }
        let aligned_quads = packed_chars
            .iter()
            .map(|packed| AlignedQuad::from_packed(packed, config.width, config.height))
            .collect();
        Ok(Self {
            config,
            bitmap,
            packed_chars,
            aligned_quads,
        })
    }

    /// Atlas data of `character`, or `None` when it is outside the baked range.
    pub fn glyph(&self, character: char) -> Option<(&PackedChar, &AlignedQuad)> {
        let index = (character as u32).checked_sub(self.config.charcode_begin)?;
        if index >= self.config.charcode_count {
            return None;
        }
        let index = index as usize;
        Some((&self.packed_chars[index], &self.aligned_quads[index]))
    }

    pub fn charcode_begin(&self) -> u32 {
        self.config.charcode_begin
    }

    pub fn charcode_count(&self) -> u32 {
        self.config.charcode_count
    }

    pub fn font_size(&self) -> f32 {
        self.config.font_size
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Single channel coverage, row-major, `width * height` bytes.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    pub fn packed_chars(&self) -> &[PackedChar] {
        &self.packed_chars
    }

    pub fn aligned_quads(&self) -> &[AlignedQuad] {
        &self.aligned_quads
    }

    /// Write the atlas as an 8-bit grayscale PNG, handy when debugging layouts.
    pub fn save_atlas_png(&self, path: impl AsRef<Path>) -> Result<(), FontError> {
        let path = path.as_ref();
        let image = image::GrayImage::from_raw(
            self.config.width,
            self.config.height,
            self.bitmap.clone(),
        )
        .ok_or(FontError::AtlasSize {
            expected: self.config.width as usize * self.config.height as usize,
            actual: self.bitmap.len(),
        })?;
        image.save(path)?;
        log::info!("Wrote font atlas to {}", path.display());
        Ok(())
    }
}

pub type FontManager = Manager<Font>;

impl Manager<Font> {
    pub fn create(
        &mut self,
        bytes: &[u8],
        config: &FontAtlasConfig,
    ) -> Result<Handle<Font>, FontError> {
        self.ensure_capacity()?;
        let font = Font::bake(bytes, config)?;
        Ok(self.insert(font)?)
    }
}
