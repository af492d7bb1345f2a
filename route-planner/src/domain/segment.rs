//! Renderable route segments.

use crate::geo::Coordinate;

use super::TrafficType;

/// The rendering category of a segment, with its fixed display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SegmentKind {
    Subway,
    Bus,
    Walk,
    Bike,
}

impl SegmentKind {
    pub fn from_traffic_type(t: TrafficType) -> Self {
        match t {
            TrafficType::Subway => Self::Subway,
            TrafficType::Bus => Self::Bus,
            TrafficType::Walk => Self::Walk,
            TrafficType::Bike => Self::Bike,
        }
    }

    /// Fixed type-to-color table for the display layer.
    pub fn color(self) -> &'static str {
        match self {
            Self::Subway => "#800080",
            Self::Bus => "#ff0000",
            Self::Walk => "#0000ff",
            Self::Bike => "#00a000",
        }
    }
}

/// A renderable slice of a candidate: one mode, one color, an ordered
/// coordinate list.
///
/// After stitching, consecutive segments within one candidate share their
/// boundary coordinate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteSegment {
    pub kind: SegmentKind,
    pub color: String,
    pub points: Vec<Coordinate>,
}

impl RouteSegment {
    pub fn new(kind: SegmentKind, points: Vec<Coordinate>) -> Self {
        Self {
            kind,
            color: kind.color().to_string(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_table() {
        assert_eq!(SegmentKind::Subway.color(), "#800080");
        assert_eq!(SegmentKind::Bus.color(), "#ff0000");
        assert_eq!(SegmentKind::Walk.color(), "#0000ff");
        assert_eq!(SegmentKind::Bike.color(), "#00a000");
    }

    #[test]
    fn kind_from_traffic_type() {
        assert_eq!(
            SegmentKind::from_traffic_type(TrafficType::Bus),
            SegmentKind::Bus
        );
        assert_eq!(
            SegmentKind::from_traffic_type(TrafficType::Bike),
            SegmentKind::Bike
        );
    }
}
