#![allow(dead_code)]

use jonark::data_structures::font::{Font, FontAtlasConfig, PackedChar};

pub const ATLAS_SIZE: u32 = 16;

/// A hand-made font covering 'A'..='C' in a 16x16 atlas.
///
/// 'A' is a 4x6 glyph sitting on the baseline, 'B' a 2x3 glyph with a
/// descender of 1 pixel and 'C' is empty like a space.
pub fn synthetic_font() -> Font {
    let config = FontAtlasConfig {
        charcode_begin: 'A' as u32,
        charcode_count: 3,
        font_size: 8.0,
        width: ATLAS_SIZE,
        height: ATLAS_SIZE,
        padding: 1,
    };
    let packed = vec![
        PackedChar {
            x0: 1,
            y0: 1,
            x1: 5,
            y1: 7,
            xoff: 1.0,
            yoff: -6.0,
            xadvance: 6.0,
            xoff2: 5.0,
            yoff2: 0.0,
        },
        PackedChar {
            x0: 6,
            y0: 1,
            x1: 8,
            y1: 4,
            xoff: 0.0,
            yoff: -2.0,
            xadvance: 3.0,
            xoff2: 2.0,
            yoff2: 1.0,
        },
        PackedChar {
            xadvance: 2.0,
            ..Default::default()
        },
    ];
    let mut bitmap = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE) as usize];
    for p in &packed {
        for y in p.y0..p.y1 {
            for x in p.x0..p.x1 {
                bitmap[(y * ATLAS_SIZE + x) as usize] = 255;
            }
        }
    }
    Font::from_parts(config, bitmap, packed).expect("synthetic font is consistent")
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Convert a linear clear colour to the 8-bit value stored in an sRGB target.
pub fn srgb_u8(linear: f64) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let encoded = if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}
