//! Transit legs and paths.
//!
//! A `TransitLeg` mirrors one "subPath" entry of the transit provider's
//! response: a bus or subway ride with its stop list, a walk gap with no
//! geometry of its own, or a synthetic bike leg inserted by this planner.

use crate::geo::Coordinate;

/// The mode of one leg.
///
/// `Subway`, `Bus` and `Walk` carry the transit provider's numeric codes
/// (1, 2, 3). `Bike` is synthesized by this planner and never appears in
/// provider responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TrafficType {
    Subway,
    Bus,
    Walk,
    Bike,
}

impl TrafficType {
    /// Map a transit-provider trafficType code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Subway),
            2 => Some(Self::Bus),
            3 => Some(Self::Walk),
            _ => None,
        }
    }

    /// True for modes that move the rider on a vehicle (not walking).
    pub fn is_transit(self) -> bool {
        matches!(self, Self::Subway | Self::Bus)
    }
}

/// One stop along a bus or subway leg.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stop {
    pub name: String,
    pub position: Coordinate,
}

/// One atomic segment of an itinerary.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitLeg {
    pub traffic_type: TrafficType,
    /// Ordered stops for bus/subway legs; empty for walk and bike legs
    /// (their geometry is resolved separately).
    pub stops: Vec<Stop>,
    /// Duration of this leg in minutes.
    pub section_time_mins: u32,
    /// Length of this leg in metres.
    pub distance_m: f64,
    /// Line name for bus/subway legs ("Line 2", "Bus 273").
    pub lane_name: Option<String>,
    /// Line color for rendering, if the provider supplies one.
    pub lane_color: Option<String>,
    /// Display name of where this leg starts, once resolved.
    pub start_name: Option<String>,
    /// Display name of where this leg ends, once resolved.
    pub end_name: Option<String>,
}

impl TransitLeg {
    /// A walk gap with no geometry; endpoints are resolved during path
    /// processing.
    pub fn walk(section_time_mins: u32, distance_m: f64) -> Self {
        Self {
            traffic_type: TrafficType::Walk,
            stops: Vec::new(),
            section_time_mins,
            distance_m,
            lane_name: None,
            lane_color: None,
            start_name: None,
            end_name: None,
        }
    }

    /// A synthetic bike leg between two named stations.
    pub fn bike(
        start_name: impl Into<String>,
        end_name: impl Into<String>,
        section_time_mins: u32,
        distance_m: f64,
    ) -> Self {
        Self {
            traffic_type: TrafficType::Bike,
            stops: Vec::new(),
            section_time_mins,
            distance_m,
            lane_name: None,
            lane_color: None,
            start_name: Some(start_name.into()),
            end_name: Some(end_name.into()),
        }
    }

    /// First stop coordinate, for legs that carry stops.
    pub fn first_stop(&self) -> Option<&Stop> {
        self.stops.first()
    }

    /// Last stop coordinate, for legs that carry stops.
    pub fn last_stop(&self) -> Option<&Stop> {
        self.stops.last()
    }
}

/// One itinerary alternative from the transit provider: ordered legs plus
/// the provider's total travel time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitPath {
    pub legs: Vec<TransitLeg>,
    pub total_time_mins: u32,
}

impl TransitPath {
    /// Whether any leg is an actual transit ride (bus or subway).
    pub fn has_transit_leg(&self) -> bool {
        self.legs.iter().any(|l| l.traffic_type.is_transit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_type_codes() {
        assert_eq!(TrafficType::from_code(1), Some(TrafficType::Subway));
        assert_eq!(TrafficType::from_code(2), Some(TrafficType::Bus));
        assert_eq!(TrafficType::from_code(3), Some(TrafficType::Walk));
        assert_eq!(TrafficType::from_code(4), None);
        assert_eq!(TrafficType::from_code(0), None);
    }

    #[test]
    fn transit_detection() {
        assert!(TrafficType::Subway.is_transit());
        assert!(TrafficType::Bus.is_transit());
        assert!(!TrafficType::Walk.is_transit());
        assert!(!TrafficType::Bike.is_transit());
    }

    #[test]
    fn path_transit_leg_detection() {
        let walk_only = TransitPath {
            legs: vec![TransitLeg::walk(10, 700.0)],
            total_time_mins: 10,
        };
        assert!(!walk_only.has_transit_leg());

        let with_bike = TransitPath {
            legs: vec![
                TransitLeg::walk(5, 350.0),
                TransitLeg::bike("A", "B", 15, 3000.0),
            ],
            total_time_mins: 20,
        };
        assert!(!with_bike.has_transit_leg());
    }
}
