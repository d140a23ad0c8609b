pub use crate::geometry::Point;

pub const PENCIL_WIDTH: f32 = 2.0;
pub const ERASER_WIDTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

pub const STROKE_COLORS: [Color; 3] = [
    Color::rgb(0, 0, 0),
    Color::rgb(229, 57, 53),
    Color::rgb(30, 136, 229),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    #[default]
    SourceOver,
    DestinationOut,
}

/// Width is in CSS pixels; the surface scales it by its pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub op: CompositeOp,
    pub width: f32,
    pub color: Color,
}

impl StrokeStyle {
    pub fn for_tool(tool: Tool, color: Color) -> Self {
        match tool {
            Tool::Pencil => Self {
                op: CompositeOp::SourceOver,
                width: PENCIL_WIDTH,
                color,
            },
            Tool::Eraser => Self {
                op: CompositeOp::DestinationOut,
                width: ERASER_WIDTH,
                color,
            },
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::for_tool(Tool::Pencil, STROKE_COLORS[0])
    }
}
