//! Surface classification.
//!
//! Decides whether a contact normal is a runnable wall and which flank of
//! the character it lies on. Everything here is pure; the world is
//! right-handed with +Y up, the character looks down -Z and its right is +X.

use bevy::prelude::*;

/// Which flank of the character is against the wall.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallRunSide {
    #[default]
    None,
    Left,
    Right,
}

impl WallRunSide {
    /// Unit sign of the flank along the character's right vector.
    ///
    /// `Right` is `1.0`, `Left` is `-1.0`, `None` is `0.0`.
    pub fn sign(self) -> f32 {
        match self {
            WallRunSide::None => 0.0,
            WallRunSide::Left => -1.0,
            WallRunSide::Right => 1.0,
        }
    }

    /// The opposite flank. `None` stays `None`.
    pub fn flipped(self) -> Self {
        match self {
            WallRunSide::None => WallRunSide::None,
            WallRunSide::Left => WallRunSide::Right,
            WallRunSide::Right => WallRunSide::Left,
        }
    }
}

/// Returns true if `normal` belongs to a wall that can be run on.
///
/// Normals pointing up more than `walkable_floor_y` are floor, and any
/// downward-facing normal is an overhang.
pub fn classify_surface(normal: Vec3, walkable_floor_y: f32) -> bool {
    !(normal.y > walkable_floor_y || normal.y < 0.0)
}

/// Work out the flank a wall is on and the forward travel direction along it.
///
/// The direction is always horizontal and normalised, or zero when the
/// normal is degenerate (zero length or straight up/down). Callers treat a
/// zero direction as an invalid surface.
pub fn derive_side_and_direction(normal: Vec3, right: Vec3, epsilon: f32) -> (WallRunSide, Vec3) {
    if normal.dot(right) > -epsilon {
        (
            WallRunSide::Left,
            Vec3::Y.cross(normal).normalize_or_zero(),
        )
    } else {
        (
            WallRunSide::Right,
            normal.cross(Vec3::Y).normalize_or_zero(),
        )
    }
}

/// True if a derived run direction can be used.
#[inline]
pub fn is_usable_direction(direction: Vec3) -> bool {
    direction.is_finite() && direction.length_squared() > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 0.001;
    const FLOOR: f32 = 0.71;

    #[test]
    fn vertical_wall_is_runnable() {
        assert!(classify_surface(Vec3::X, FLOOR));
        assert!(classify_surface(Vec3::NEG_Z, FLOOR));
    }

    #[test]
    fn floors_are_rejected() {
        for y in [0.72f32, 0.8, 0.95, 1.0] {
            let normal = Vec3::new((1.0 - y * y).sqrt(), y, 0.0);
            assert!(!classify_surface(normal, FLOOR), "y = {y}");
        }
    }

    #[test]
    fn overhangs_are_rejected() {
        for y in [-0.01f32, -0.5, -1.0] {
            let normal = Vec3::new((1.0 - y * y).sqrt(), y, 0.0);
            assert!(!classify_surface(normal, FLOOR), "y = {y}");
        }
    }

    #[test]
    fn eligibility_flips_at_threshold() {
        let below = Vec3::new(0.7, FLOOR - 1e-4, 0.0);
        let at = Vec3::new(0.7, FLOOR, 0.0);
        let above = Vec3::new(0.7, FLOOR + 1e-4, 0.0);
        assert!(classify_surface(below, FLOOR));
        assert!(classify_surface(at, FLOOR));
        assert!(!classify_surface(above, FLOOR));
    }

    #[test]
    fn zero_vertical_is_not_an_overhang() {
        assert!(classify_surface(Vec3::new(0.0, 0.0, 1.0), FLOOR));
        assert!(classify_surface(Vec3::new(0.0, -0.0, 1.0), FLOOR));
    }

    #[test]
    fn wall_on_the_right_runs_forward() {
        // Wall at +X faces back toward the character.
        let (side, direction) = derive_side_and_direction(Vec3::NEG_X, Vec3::X, EPS);
        assert_eq!(side, WallRunSide::Right);
        assert!((direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn wall_on_the_left_runs_forward() {
        let (side, direction) = derive_side_and_direction(Vec3::X, Vec3::X, EPS);
        assert_eq!(side, WallRunSide::Left);
        assert!((direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn side_is_antisymmetric_in_horizontal_normal() {
        let right = Vec3::X;
        let normals = [
            Vec3::new(0.8, 0.2, 0.3),
            Vec3::new(-0.6, 0.1, -0.5),
            Vec3::new(0.3, 0.0, 0.95),
            Vec3::new(-1.0, 0.4, 0.0),
        ];
        for normal in normals {
            let mirrored = Vec3::new(-normal.x, normal.y, -normal.z);
            let (side, _) = derive_side_and_direction(normal, right, EPS);
            let (mirrored_side, _) = derive_side_and_direction(mirrored, right, EPS);
            assert_eq!(side.flipped(), mirrored_side, "normal = {normal}");
        }
    }

    #[test]
    fn direction_is_horizontal_unit() {
        let normal = Vec3::new(-0.6, 0.4, 0.2).normalize();
        let (_, direction) = derive_side_and_direction(normal, Vec3::X, EPS);
        assert!(direction.y.abs() < 1e-6);
        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert!(direction.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn degenerate_normal_gives_zero_direction() {
        let (_, direction) = derive_side_and_direction(Vec3::ZERO, Vec3::X, EPS);
        assert!(!is_usable_direction(direction));

        let (_, direction) = derive_side_and_direction(Vec3::Y, Vec3::X, EPS);
        assert!(!is_usable_direction(direction));
    }

    #[test]
    fn perpendicular_normal_counts_as_left() {
        // Exactly zero dot product falls inside the epsilon band.
        let (side, _) = derive_side_and_direction(Vec3::Z, Vec3::X, EPS);
        assert_eq!(side, WallRunSide::Left);
    }

    #[test]
    fn side_sign_and_flip() {
        assert_eq!(WallRunSide::Right.sign(), 1.0);
        assert_eq!(WallRunSide::Left.sign(), -1.0);
        assert_eq!(WallRunSide::None.sign(), 0.0);
        assert_eq!(WallRunSide::None.flipped(), WallRunSide::None);
        assert_eq!(WallRunSide::Left.flipped(), WallRunSide::Right);
    }
}
