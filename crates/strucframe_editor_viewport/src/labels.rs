// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stroke font for ID and axis labels.
//!
//! Glyphs are polylines on a 1 x 2 cell. Text is laid out in the world XZ
//! plane starting at `origin`, so labels read upright from the default and
//! front views.

use glam::DVec3;

/// Horizontal distance between glyph origins, in cell units
pub const GLYPH_ADVANCE: f64 = 1.5;

/// Polyline for a supported character
fn glyph(c: char) -> Option<&'static [[f64; 2]]> {
    let strokes: &'static [[f64; 2]] = match c {
        '0' => &[[0.0, 0.0], [1.0, 0.0], [1.0, 2.0], [0.0, 2.0], [0.0, 0.0]],
        '1' => &[[0.5, 0.0], [0.5, 2.0]],
        '2' => &[[0.0, 2.0], [1.0, 2.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
        '3' => &[[0.0, 2.0], [1.0, 2.0], [1.0, 1.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        '4' => &[[1.0, 0.0], [1.0, 2.0], [1.0, 1.0], [0.0, 1.0], [0.0, 2.0]],
        '5' => &[[1.0, 2.0], [0.0, 2.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        '6' => &[[1.0, 2.0], [0.0, 2.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        '7' => &[[0.0, 2.0], [1.0, 2.0], [0.5, 0.0]],
        '8' => &[[0.0, 1.0], [1.0, 1.0], [1.0, 2.0], [0.0, 2.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
        '9' => &[[1.0, 0.0], [1.0, 2.0], [0.0, 2.0], [0.0, 1.0], [1.0, 1.0]],
        'X' => &[[0.0, 0.0], [1.0, 2.0], [0.5, 1.0], [0.0, 2.0], [1.0, 0.0]],
        'Y' => &[[0.0, 2.0], [0.5, 1.0], [1.0, 2.0], [0.5, 1.0], [0.5, 0.0]],
        'Z' => &[[0.0, 2.0], [1.0, 2.0], [0.0, 0.0], [1.0, 0.0]],
        '-' => &[[0.0, 1.0], [1.0, 1.0]],
        'F' => &[[0.0, 0.0], [0.0, 2.0], [1.0, 2.0], [0.0, 2.0], [0.0, 1.0], [0.8, 1.0]],
        _ => return None,
    };
    Some(strokes)
}

/// Line segments spelling `text` at `origin`.
///
/// Unsupported characters still advance the cursor.
pub fn vector_text(text: &str, origin: DVec3, scale: f64) -> Vec<[DVec3; 2]> {
    let mut segments = Vec::new();
    let mut cursor = 0.0;

    for c in text.chars() {
        if let Some(strokes) = glyph(c) {
            let to_world = |[lx, ly]: [f64; 2]| {
                origin + DVec3::new((cursor + lx) * scale, 0.0, ly * scale)
            };
            segments.extend(strokes.windows(2).map(|pair| [to_world(pair[0]), to_world(pair[1])]));
        }
        cursor += GLYPH_ADVANCE;
    }

    segments
}
