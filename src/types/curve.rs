use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A Bézier control point in normalized space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Response curve applied in normalized [0, 1] space between normalization
/// and denormalization.
///
/// On the wire the variant is selected by a `type` field. Bézier points may
/// be written as `[[x, y], ...]`, `[{"x": .., "y": ..}, ...]`, or a flat
/// `[x0, y0, x1, y1, ...]` list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InterpolationDefinition {
    #[default]
    #[serde(alias = "Linear", alias = "identity", alias = "linear")]
    Identity,
    #[serde(alias = "bezier")]
    Bezier {
        #[serde(deserialize_with = "deserialize_points")]
        points: Vec<ControlPoint>,
    },
}

impl InterpolationDefinition {
    /// Build a Bézier definition from `(x, y)` pairs. Not validated.
    #[must_use]
    pub fn bezier(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        InterpolationDefinition::Bezier {
            points: points.into_iter().map(ControlPoint::from).collect(),
        }
    }
}

impl fmt::Display for InterpolationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationDefinition::Identity => write!(f, "identity"),
            InterpolationDefinition::Bezier { points } => {
                write!(f, "bezier[")?;
                for (i, p) in points.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "({}, {})", p.x, p.y)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointsRepr {
    Objects(Vec<ControlPoint>),
    Pairs(Vec<[f64; 2]>),
    Flat(Vec<f64>),
}

fn deserialize_points<'de, D>(deserializer: D) -> Result<Vec<ControlPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    match PointsRepr::deserialize(deserializer)? {
        PointsRepr::Objects(points) => Ok(points),
        PointsRepr::Pairs(pairs) => Ok(pairs
            .into_iter()
            .map(|[x, y]| ControlPoint { x, y })
            .collect()),
        PointsRepr::Flat(coords) => {
            if coords.len() % 2 != 0 {
                return Err(serde::de::Error::custom(format!(
                    "flat control point list needs an even number of coordinates, got {}",
                    coords.len()
                )));
            }
            Ok(coords
                .chunks_exact(2)
                .map(|c| ControlPoint { x: c[0], y: c[1] })
                .collect())
        }
    }
}
