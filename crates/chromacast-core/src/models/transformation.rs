//! Transformation pipeline model
//!
//! A pipeline is an ordered list of steps, each step an ordered list of named
//! parameters. The media cloud applies steps left to right, so order inside the
//! pipeline defines compositing order. Two encodings are supported:
//!
//! - JSON, one object per step (`[{"width": 500, "crop": "scale"}, ...]`)
//! - the compact URL syntax (`w_500,c_scale/l_video:fg123/...`)

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Resize mode applied together with a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    Scale,
    Fit,
    Fill,
}

impl CropMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropMode::Scale => "scale",
            CropMode::Fit => "fit",
            CropMode::Fill => "fill",
        }
    }
}

/// Anchor used when placing a layer on its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Center,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::North => "north",
            Gravity::NorthEast => "north_east",
            Gravity::East => "east",
            Gravity::SouthEast => "south_east",
            Gravity::South => "south",
            Gravity::SouthWest => "south_west",
            Gravity::West => "west",
            Gravity::NorthWest => "north_west",
            Gravity::Center => "center",
        }
    }
}

impl Display for Gravity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gravity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" => Ok(Gravity::North),
            "north_east" => Ok(Gravity::NorthEast),
            "east" => Ok(Gravity::East),
            "south_east" => Ok(Gravity::SouthEast),
            "south" => Ok(Gravity::South),
            "south_west" => Ok(Gravity::SouthWest),
            "west" => Ok(Gravity::West),
            "north_west" => Ok(Gravity::NorthWest),
            "center" => Ok(Gravity::Center),
            other => Err(format!("Unknown gravity: {}", other)),
        }
    }
}

/// Step-level flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// Dimensions are relative to the base layer
    Relative,
    /// Closes the current overlay and flattens it onto the base
    LayerApply,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Relative => "relative",
            Flag::LayerApply => "layer_apply",
        }
    }
}

/// Width either in pixels or as a fraction of the base layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Pixels(u32),
    Ratio(f64),
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Dimension::Pixels(px) => write!(f, "{}", px),
            Dimension::Ratio(r) => write!(f, "{}", format_decimal(*r)),
        }
    }
}

/// One named effect parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformParam {
    Crop(CropMode),
    Width(Dimension),
    /// Layer reference, e.g. `video:<public_id>`
    Overlay(String),
    Flags(Flag),
    /// Hex colour, `#RRGGBB`
    Color(String),
    MakeTransparent { tolerance: u32 },
    Gravity(Gravity),
    /// Seconds
    Duration(f64),
}

impl TransformParam {
    /// Parameter name in the JSON encoding.
    pub fn name(&self) -> &'static str {
        match self {
            TransformParam::Crop(_) => "crop",
            TransformParam::Width(_) => "width",
            TransformParam::Overlay(_) => "overlay",
            TransformParam::Flags(_) => "flags",
            TransformParam::Color(_) => "color",
            TransformParam::MakeTransparent { .. } => "effect",
            TransformParam::Gravity(_) => "gravity",
            TransformParam::Duration(_) => "duration",
        }
    }

    fn json_value(&self) -> serde_json::Value {
        match self {
            TransformParam::Crop(mode) => mode.as_str().into(),
            TransformParam::Width(Dimension::Pixels(px)) => (*px).into(),
            TransformParam::Width(Dimension::Ratio(r)) => format_decimal(*r).into(),
            TransformParam::Overlay(layer) => layer.clone().into(),
            TransformParam::Flags(flag) => flag.as_str().into(),
            TransformParam::Color(color) => color.clone().into(),
            TransformParam::MakeTransparent { tolerance } => {
                format!("make_transparent:{}", tolerance).into()
            }
            TransformParam::Gravity(g) => g.as_str().into(),
            TransformParam::Duration(secs) => format_decimal(*secs).into(),
        }
    }

    /// Compact URL syntax, e.g. `w_500` or `co_rgb:6adb47`.
    pub fn to_url_component(&self) -> String {
        match self {
            TransformParam::Crop(mode) => format!("c_{}", mode.as_str()),
            TransformParam::Width(dim) => format!("w_{}", dim),
            // Folder separators in layer ids are written as ':' in URL syntax
            TransformParam::Overlay(layer) => format!("l_{}", layer.replace('/', ":")),
            TransformParam::Flags(flag) => format!("fl_{}", flag.as_str()),
            TransformParam::Color(color) => {
                format!("co_rgb:{}", color.trim_start_matches('#').to_lowercase())
            }
            TransformParam::MakeTransparent { tolerance } => {
                format!("e_make_transparent:{}", tolerance)
            }
            TransformParam::Gravity(g) => format!("g_{}", g.as_str()),
            TransformParam::Duration(secs) => format!("du_{}", format_decimal(*secs)),
        }
    }
}

/// Formats a float keeping at least one decimal (15 -> "15.0", 0.6 -> "0.6").
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Ordered set of parameters applied as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformationStep {
    params: Vec<TransformParam>,
}

impl TransformationStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, param: TransformParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[TransformParam] {
        &self.params
    }

    /// First parameter with the given JSON name.
    pub fn get(&self, name: &str) -> Option<&TransformParam> {
        self.params.iter().find(|p| p.name() == name)
    }

    pub fn to_url_component(&self) -> String {
        self.params
            .iter()
            .map(TransformParam::to_url_component)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Serialize for TransformationStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.params.len()))?;
        for param in &self.params {
            map.serialize_entry(param.name(), &param.json_value())?;
        }
        map.end()
    }
}

/// Ordered list of steps, applied left to right by the media cloud.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransformationPipeline {
    steps: Vec<TransformationStep>,
}

impl TransformationPipeline {
    pub fn new(steps: Vec<TransformationStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[TransformationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Encodes the pipeline as a chained transformation string.
    pub fn to_transformation_string(&self) -> String {
        self.steps
            .iter()
            .map(TransformationStep::to_url_component)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl Display for TransformationPipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_transformation_string())
    }
}
