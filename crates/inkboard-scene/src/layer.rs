use inkboard_core::{Color, Point2D};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

fn default_scale() -> f64 {
    1.0
}

fn default_opacity() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

/// A single element placed on the scene canvas.
///
/// `position` is the layer's anchor in scene pixels: top-left for
/// images, the shape center for shapes and strokes, and the text
/// alignment origin for text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Point2D,
    /// Stacking order; lower values render first.
    #[serde(default, alias = "zIndex")]
    pub z_index: i32,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Rotation in degrees, clockwise, about the element's own center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub content: LayerContent,
}

/// The kind-specific payload of a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerContent {
    Image {
        #[serde(alias = "imagePath", alias = "src")]
        image_path: String,
    },
    Text {
        #[serde(alias = "textConfig")]
        text_config: TextConfig,
    },
    Shape {
        #[serde(alias = "shapeConfig")]
        shape_config: ShapeConfig,
    },
    Whiteboard {
        #[serde(default)]
        strokes: Vec<Stroke>,
    },
}

impl LayerContent {
    /// The serialized kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            LayerContent::Image { .. } => "image",
            LayerContent::Text { .. } => "text",
            LayerContent::Shape { .. } => "shape",
            LayerContent::Whiteboard { .. } => "whiteboard",
        }
    }
}

fn default_font() -> String {
    "sans-serif".to_string()
}

fn default_font_size() -> f32 {
    24.0
}

fn default_line_height() -> f32 {
    1.2
}

/// Text layer payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    pub text: String,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub size: f32,
    #[serde(default)]
    pub style: FontStyle,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub align: TextAlign,
    /// Line spacing as a multiple of the font size.
    #[serde(default = "default_line_height", alias = "lineHeight")]
    pub line_height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// Horizontal placement of text relative to the layer anchor: left
/// starts each block at the anchor, right ends it there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

fn default_shape_size() -> f64 {
    100.0
}

fn default_shape_stroke_width() -> f64 {
    1.0
}

/// Shape layer payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeConfig {
    #[serde(alias = "shapeType")]
    pub shape_type: ShapeType,
    #[serde(default = "default_shape_size")]
    pub width: f64,
    #[serde(default = "default_shape_size")]
    pub height: f64,
    #[serde(default, alias = "fillColor")]
    pub fill_color: Color,
    #[serde(default, alias = "strokeColor")]
    pub stroke_color: Color,
    #[serde(default = "default_shape_stroke_width", alias = "strokeWidth")]
    pub stroke_width: f64,
    #[serde(default, alias = "fillMode")]
    pub fill_mode: FillMode,
}

/// Geometry of a shape layer. Unknown names deserialize to `Other` so
/// a scene from a newer editor loads; the renderer warns and skips
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeType {
    Rectangle,
    Circle,
    Line,
    Triangle,
    Star,
    Other(String),
}

impl ShapeType {
    pub fn from_name(name: &str) -> ShapeType {
        match name {
            // Squares are rectangles with equal sides; the editor
            // still writes a distinct type name for them.
            "rectangle" | "square" => ShapeType::Rectangle,
            "circle" => ShapeType::Circle,
            "line" => ShapeType::Line,
            "triangle" => ShapeType::Triangle,
            "star" => ShapeType::Star,
            other => ShapeType::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Line => "line",
            ShapeType::Triangle => "triangle",
            ShapeType::Star => "star",
            ShapeType::Other(name) => name,
        }
    }
}

impl Serialize for ShapeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ShapeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ShapeType::from_name(&s))
    }
}

/// How a shape is painted. Unknown names fall back to `Both` so a
/// scene from a newer editor still renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    Fill,
    Stroke,
    #[default]
    Both,
}

impl FillMode {
    pub fn from_name(name: &str) -> FillMode {
        match name {
            "fill" => FillMode::Fill,
            "stroke" => FillMode::Stroke,
            _ => FillMode::Both,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FillMode::Fill => "fill",
            FillMode::Stroke => "stroke",
            FillMode::Both => "both",
        }
    }
}

impl Serialize for FillMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FillMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FillMode::from_name(&s))
    }
}

fn default_stroke_width() -> f64 {
    2.0
}

/// One freehand stroke of a whiteboard layer, in layer-local pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point2D>,
    #[serde(default = "default_stroke_width", alias = "strokeWidth")]
    pub stroke_width: f64,
    #[serde(default, alias = "strokeColor")]
    pub stroke_color: Color,
    #[serde(default, alias = "lineJoin")]
    pub line_join: LineJoin,
    #[serde(default, alias = "lineCap")]
    pub line_cap: LineCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Round,
    Miter,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Round,
    Butt,
    Square,
}
