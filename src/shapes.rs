//! Vertex data of the exercises, in normalized device coordinates.

pub const TRIANGLE_VTX2XYZ: [f32; 9] = [
    -0.5, -0.5, 0.0, // bottom-left
    0.5, -0.5, 0.0, // bottom-right
    0.0, 0.5, 0.0, // top-center
];

pub const TWO_RECTANGLES_VTX2XYZ: [f32; 24] = [
    // left
    -0.9, -0.5, 0.0, //
    -0.1, -0.5, 0.0, //
    -0.1, 0.5, 0.0, //
    -0.9, 0.5, 0.0, //
    // right
    0.1, -0.5, 0.0, //
    0.9, -0.5, 0.0, //
    0.9, 0.5, 0.0, //
    0.1, 0.5, 0.0, //
];

pub const TWO_RECTANGLES_TRI2VTX: [u32; 12] = [
    0, 1, 2, 2, 3, 0, //
    4, 5, 6, 6, 7, 4,
];

/// Number of indices in one rectangle of [`TWO_RECTANGLES_TRI2VTX`].
pub const RECTANGLE_NUM_INDEX: usize = 6;

/// Color oscillating between blue and red with period 2π.
pub fn pulse_color(time: f32) -> [f32; 4] {
    let mix = time.sin() / 2.0 + 0.5;
    [mix, 0.0, 1.0 - mix, 1.0]
}
