use nalgebra::{Point3, Vector3};

use crate::engine::camera::OrbitCamera;

pub const FOCUS_DURATION_MS: f64 = 1000.0;
const FOCUS_DISTANCE_FACTOR: f32 = 5.0;
const FOCUS_DISTANCE_OFFSET: f32 = 20.0;

/// One-shot linear interpolation of the camera toward a clicked planet.
///
/// The destination direction is frozen at click time: the camera backs off
/// from the planet along the planet-to-camera ray as it was when the click
/// landed, even if the user orbits mid-tween. The app keeps at most one
/// tween, so a newer click supersedes this one and stale steps cannot run.
pub struct FocusTween {
    from_position: Point3<f32>,
    from_target: Point3<f32>,
    to_position: Point3<f32>,
    to_target: Point3<f32>,
    start_ms: f64,
}

impl FocusTween {
    pub fn toward(
        camera: &OrbitCamera,
        planet_center: Point3<f32>,
        planet_radius: f32,
        now_ms: f64,
    ) -> Self {
        let viewing_distance = planet_radius * FOCUS_DISTANCE_FACTOR + FOCUS_DISTANCE_OFFSET;
        let direction = (camera.position() - planet_center)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);

        FocusTween {
            from_position: camera.position(),
            from_target: camera.target,
            to_position: planet_center + direction * viewing_distance,
            to_target: planet_center,
            start_ms: now_ms,
        }
    }

    /// Monotonically clamped to [0, 1].
    pub fn progress(&self, now_ms: f64) -> f32 {
        (((now_ms - self.start_ms) / FOCUS_DURATION_MS).clamp(0.0, 1.0)) as f32
    }

    pub fn destination_target(&self) -> Point3<f32> {
        self.to_target
    }

    /// Apply the pose for `now_ms` to the camera. Returns true once the
    /// tween has reached its destination and should be discarded.
    pub fn step(&self, camera: &mut OrbitCamera, now_ms: f64) -> bool {
        let t = self.progress(now_ms);
        let position = self.from_position + (self.to_position - self.from_position) * t;
        let target = self.from_target + (self.to_target - self.from_target) * t;
        camera.set_view(position, target);
        t >= 1.0
    }
}
