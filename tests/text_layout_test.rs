mod common;

use cgmath::Vector2;
use common::test_utils::{assert_close, synthetic_font};
use jonark::text::{TextError, layout_text};

#[test]
fn should_emit_one_quad_per_character() {
    let font = synthetic_font();
    let geometry = layout_text(&font, Vector2::new(0.0, 0.0), "ABC", 1.0, 0.5).unwrap();

    assert_eq!(geometry.vertices.len(), 12);
    assert_eq!(
        geometry.indices,
        vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7, 8, 9, 10, 8, 10, 11]
    );
}

#[test]
fn should_place_glyph_on_baseline() {
    let font = synthetic_font();
    let geometry = layout_text(&font, Vector2::new(0.0, 0.0), "A", 1.0, 0.5).unwrap();
    let [top_right, top_left, bottom_left, bottom_right] = geometry.vertices[..] else {
        panic!("expected four vertices");
    };

    assert_eq!(top_right.position, [2.5, 3.0, 0.0]);
    assert_eq!(top_left.position, [0.5, 3.0, 0.0]);
    assert_eq!(bottom_left.position, [0.5, 0.0, 0.0]);
    assert_eq!(bottom_right.position, [2.5, 0.0, 0.0]);

    assert_eq!(top_right.tex_coords, [5.0 / 16.0, 1.0 / 16.0]);
    assert_eq!(top_left.tex_coords, [1.0 / 16.0, 1.0 / 16.0]);
    assert_eq!(bottom_left.tex_coords, [1.0 / 16.0, 7.0 / 16.0]);
    assert_eq!(bottom_right.tex_coords, [5.0 / 16.0, 7.0 / 16.0]);
}

// The bottom edge is `cursor.y - yoff2 * s`. Placing it at `cursor.y + yoff2 * s`
// (the stb_truetype y-down value used as is) would lift descenders above the line.
#[test]
fn should_drop_descenders_below_baseline() {
    let font = synthetic_font();
    let geometry = layout_text(&font, Vector2::new(1.0, 2.0), "B", 1.0, 1.0).unwrap();
    let bottom_left = geometry.vertices[2];
    let top_left = geometry.vertices[1];

    assert_close(bottom_left.position[0], 1.0);
    assert_close(bottom_left.position[1], 1.0);
    assert_close(top_left.position[1], 4.0);
}

#[test]
fn should_advance_cursor_by_scaled_advance() {
    let font = synthetic_font();
    let geometry = layout_text(&font, Vector2::new(0.0, 0.5), "ABC", 2.0, 0.25).unwrap();

    // advances 6 + 3 + 2 pixels at a scale of 0.5
    assert_close(geometry.cursor.x, 5.5);
    assert_close(geometry.cursor.y, 0.5);

    let second_left = geometry.vertices[5].position[0];
    assert_close(second_left, 3.0);
}

#[test]
fn should_keep_empty_glyphs_as_degenerate_quads() {
    let font = synthetic_font();
    let geometry = layout_text(&font, Vector2::new(0.0, 0.0), "C", 1.0, 1.0).unwrap();
    assert_eq!(geometry.vertices.len(), 4);
    assert!(
        geometry
            .vertices
            .iter()
            .all(|v| v.position == [0.0, 0.0, 0.0])
    );
    assert_close(geometry.cursor.x, 2.0);
}

#[test]
fn should_fail_on_characters_outside_the_font() {
    let font = synthetic_font();
    let err = layout_text(&font, Vector2::new(0.0, 0.0), "AZ", 1.0, 1.0).unwrap_err();
    assert_eq!(err, TextError::UnsupportedCharacter('Z'));
    assert_eq!(err.to_string(), "Could not find character 'Z'");
}

#[test]
fn should_lay_out_empty_text() {
    let font = synthetic_font();
    let geometry = layout_text(&font, Vector2::new(0.3, 0.4), "", 1.0, 1.0).unwrap();
    assert!(geometry.vertices.is_empty());
    assert!(geometry.indices.is_empty());
    assert_eq!(geometry.cursor, Vector2::new(0.3, 0.4));
}
