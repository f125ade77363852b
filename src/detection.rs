//! Probe results.
//!
//! These structures hold the results of the line traces used to keep
//! a wall run attached to its surface.

use bevy::prelude::*;

/// Information about a line trace that hit something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    /// Distance from the trace origin to the impact.
    pub distance: f32,
    /// Outward surface normal at the impact.
    pub normal: Vec3,
    /// World position of the impact.
    pub point: Vec3,
    /// Entity that was hit (if known).
    pub entity: Option<Entity>,
}

impl TraceHit {
    /// Create a hit result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }

    /// Build a hit from a trace segment and the fraction along it.
    pub fn along(origin: Vec3, end: Vec3, fraction: f32, normal: Vec3) -> Self {
        let point = origin.lerp(end, fraction);
        Self::new(origin.distance(point), normal, point, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_hit_fields() {
        let hit = TraceHit::new(5.0, Vec3::X, Vec3::new(10.0, 0.0, 0.0), None);
        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.normal, Vec3::X);
        assert_eq!(hit.point, Vec3::new(10.0, 0.0, 0.0));
        assert!(hit.entity.is_none());
    }

    #[test]
    fn trace_hit_along_segment() {
        let hit = TraceHit::along(Vec3::ZERO, Vec3::new(200.0, 0.0, 0.0), 0.25, Vec3::NEG_X);
        assert!((hit.distance - 50.0).abs() < 1e-4);
        assert!((hit.point.x - 50.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::NEG_X);
    }
}
