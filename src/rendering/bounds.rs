use bevy::prelude::*;
use bevy::render::primitives::Aabb;

/// World-space axis-aligned box around a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere through the box corners.
    pub fn radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

/// Merges the transformed corners of every mesh box. `None` when there are no meshes.
pub fn world_bounds<'a>(
    meshes: impl IntoIterator<Item = (&'a Aabb, &'a GlobalTransform)>,
) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    for (aabb, transform) in meshes {
        let min = Vec3::from(aabb.min());
        let max = Vec3::from(aabb.max());
        for corner in 0..8u8 {
            let local = Vec3::new(
                if corner & 1 == 0 { min.x } else { max.x },
                if corner & 2 == 0 { min.y } else { max.y },
                if corner & 4 == 0 { min.z } else { max.z },
            );
            let world = transform.transform_point(local);
            match bounds.as_mut() {
                Some(b) => b.include(world),
                None => bounds = Some(Bounds::from_point(world)),
            }
        }
    }
    bounds
}

/// Camera distance at which a sphere of `radius` fits the view.
///
/// Uses the narrower of the vertical and horizontal half-angles, so portrait
/// windows back the camera off further. Returns `None` for a degenerate sphere.
pub fn fit_distance(radius: f32, fov_y: f32, aspect: f32, margin: f32) -> Option<f32> {
    if !(radius > 0.0) || !radius.is_finite() {
        return None;
    }
    let half_vertical = fov_y * 0.5;
    let half_angle = if aspect > 0.0 {
        let half_horizontal = (half_vertical.tan() * aspect).atan();
        half_vertical.min(half_horizontal)
    } else {
        half_vertical
    };
    Some(radius / half_angle.sin() * margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_fit_is_diagonal_times_margin() {
        let bounds = Bounds {
            min: Vec3::new(-1.0, -1.0, -1.0),
            max: Vec3::new(1.0, 1.0, 1.0),
        };
        let diagonal = bounds.size().length();
        let distance = fit_distance(bounds.radius(), 60f32.to_radians(), 16.0 / 9.0, 1.2).unwrap();
        assert!((distance - diagonal * 1.2).abs() < 1e-4);
    }

    #[test]
    fn portrait_windows_need_more_distance() {
        let fov = 60f32.to_radians();
        let landscape = fit_distance(1.0, fov, 1.5, 1.0).unwrap();
        let portrait = fit_distance(1.0, fov, 0.5, 1.0).unwrap();
        assert!(portrait > landscape);
    }

    #[test]
    fn degenerate_radius_has_no_fit() {
        assert_eq!(fit_distance(0.0, 1.0, 1.0, 1.2), None);
        assert_eq!(fit_distance(f32::NAN, 1.0, 1.0, 1.2), None);
        assert_eq!(fit_distance(f32::INFINITY, 1.0, 1.0, 1.2), None);
    }

    #[test]
    fn no_meshes_means_no_bounds() {
        assert_eq!(world_bounds(std::iter::empty()), None);
    }

    #[test]
    fn bounds_apply_mesh_transforms() {
        let unit = Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5));
        let scaled = GlobalTransform::from(
            Transform::from_translation(Vec3::new(2.0, 0.0, 0.0)).with_scale(Vec3::splat(1.5)),
        );
        let shifted = GlobalTransform::from_translation(Vec3::new(-3.0, 1.0, 0.0));

        let bounds = world_bounds([(&unit, &scaled), (&unit, &shifted)]).unwrap();
        assert!((bounds.min - Vec3::new(-3.5, -0.75, -0.75)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(2.75, 1.5, 0.75)).length() < 1e-5);
        assert!((bounds.center() - Vec3::new(-0.375, 0.375, 0.0)).length() < 1e-5);
    }
}
