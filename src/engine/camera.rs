use nalgebra::{Matrix4, Point3, Vector3};

const MIN_PITCH: f32 = -1.5;
const MAX_PITCH: f32 = 1.5;
const MIN_DISTANCE: f32 = 15.0;
const MAX_DISTANCE: f32 = 600.0;
const MIN_ASPECT: f32 = 0.05;

/// Perspective camera orbiting a mutable target point.
///
/// Drag and wheel input move goal angles; `update()` chases the goals with
/// exponential damping each frame. A focus tween bypasses the goals by
/// writing a pose directly through `set_view`, which re-derives the
/// spherical state so damping resumes cleanly afterwards.
pub struct OrbitCamera {
    pub target: Point3<f32>,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_goal: f32,
    pitch_goal: f32,
    distance_goal: f32,
    damping: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    home_position: Point3<f32>,
    home_target: Point3<f32>,
}

impl OrbitCamera {
    pub fn new(position: Point3<f32>, target: Point3<f32>, fov_y: f32, aspect: f32) -> Self {
        let (yaw, pitch, distance) = spherical_from(position, target);
        OrbitCamera {
            target,
            yaw,
            pitch,
            distance,
            yaw_goal: yaw,
            pitch_goal: pitch,
            distance_goal: distance,
            damping: 0.05,
            fov_y,
            aspect: aspect.max(MIN_ASPECT),
            near: 0.1,
            far: 1000.0,
            home_position: position,
            home_target: target,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let (sin_p, cos_p) = self.pitch.sin_cos();
        self.target
            + Vector3::new(
                self.distance * cos_p * sin_y,
                self.distance * sin_p,
                self.distance * cos_p * cos_y,
            )
    }

    /// Damped step toward the goal angles. Call once per frame.
    pub fn update(&mut self) {
        self.yaw += (self.yaw_goal - self.yaw) * self.damping;
        self.pitch += (self.pitch_goal - self.pitch) * self.damping;
        self.distance += (self.distance_goal - self.distance) * self.damping;
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw_goal += d_yaw;
        self.pitch_goal = (self.pitch_goal + d_pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance_goal = (self.distance_goal + delta).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Overwrite the pose and snap the damping goals to it. Used by the
    /// focus tween, which owns the camera for its lifetime.
    pub fn set_view(&mut self, position: Point3<f32>, target: Point3<f32>) {
        self.target = target;
        let (yaw, pitch, distance) = spherical_from(position, target);
        self.yaw = yaw;
        self.pitch = pitch;
        self.distance = distance;
        self.yaw_goal = yaw;
        self.pitch_goal = pitch;
        self.distance_goal = distance;
    }

    /// Restore the pose saved at construction.
    pub fn reset(&mut self) {
        let home_position = self.home_position;
        let home_target = self.home_target;
        self.set_view(home_position, home_target);
    }

    /// Degenerate dimensions clamp to a small positive aspect ratio.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.aspect = if height > 0.0 {
            (width / height).max(MIN_ASPECT)
        } else {
            MIN_ASPECT
        };
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &Vector3::y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates. Points at or
    /// behind the eye plane yield `None`.
    pub fn project(&self, world: &Point3<f32>) -> Option<(f32, f32)> {
        let clip = self.view_projection() * world.to_homogeneous();
        if clip.w <= 0.0 {
            return None;
        }
        Some((clip.x / clip.w, clip.y / clip.w))
    }
}

fn spherical_from(position: Point3<f32>, target: Point3<f32>) -> (f32, f32, f32) {
    let offset = position - target;
    let distance = offset.norm().max(f32::EPSILON);
    let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let yaw = offset.x.atan2(offset.z);
    (yaw, pitch, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(
            Point3::new(0.0, 50.0, 150.0),
            Point3::origin(),
            75.0_f32.to_radians(),
            16.0 / 9.0,
        )
    }

    #[test]
    fn position_round_trips_through_spherical_state() {
        let cam = camera();
        let pos = cam.position();
        assert!((pos.x - 0.0).abs() < 1e-3);
        assert!((pos.y - 50.0).abs() < 1e-3);
        assert!((pos.z - 150.0).abs() < 1e-3);
    }

    #[test]
    fn set_view_then_reset_restores_home_pose() {
        let mut cam = camera();
        cam.set_view(Point3::new(30.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
        assert!((cam.target.x - 10.0).abs() < 1e-5);

        cam.reset();
        let pos = cam.position();
        assert!((pos.y - 50.0).abs() < 1e-3);
        assert!((pos.z - 150.0).abs() < 1e-3);
        assert!(cam.target.coords.norm() < 1e-5);
    }

    #[test]
    fn update_converges_toward_rotation_goal() {
        let mut cam = camera();
        let before = cam.position();
        cam.rotate(1.0, 0.0);
        for _ in 0..400 {
            cam.update();
        }
        let after = cam.position();
        assert!((after - before).norm() > 1.0);
        // Orbit preserves distance to target.
        let d_before = (before - cam.target).norm();
        let d_after = (after - cam.target).norm();
        assert!((d_before - d_after).abs() < 0.1);
    }

    #[test]
    fn pitch_and_distance_are_clamped() {
        let mut cam = camera();
        cam.rotate(0.0, 100.0);
        cam.zoom(10_000.0);
        for _ in 0..1000 {
            cam.update();
        }
        let offset = cam.position() - cam.target;
        assert!(offset.norm() <= MAX_DISTANCE + 0.5);
        assert!((offset.y / offset.norm()).asin() <= MAX_PITCH + 1e-3);
    }

    #[test]
    fn degenerate_viewport_keeps_positive_aspect() {
        let mut cam = camera();
        cam.set_viewport(800.0, 0.0);
        assert!(cam.aspect > 0.0);
        assert!(cam.projection_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = camera();
        let (x, y) = cam.project(&Point3::origin()).unwrap();
        assert!(x.abs() < 1e-4);
        assert!(y.abs() < 1e-4);
    }

    #[test]
    fn point_behind_camera_does_not_project() {
        let cam = camera();
        // Opposite side of the eye from the target.
        let behind = cam.position() + (cam.position() - cam.target);
        assert!(cam.project(&behind).is_none());
    }
}
