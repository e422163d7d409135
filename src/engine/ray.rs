use nalgebra::{Point3, Vector3};

use crate::engine::camera::OrbitCamera;

/// World-space picking ray.
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

/// Pixel coordinates to normalized device coordinates, y flipped so +y is up.
pub fn ndc_from_pixel(px: f32, py: f32, width: f32, height: f32) -> (f32, f32) {
    let x = (px / width) * 2.0 - 1.0;
    let y = -((py / height) * 2.0 - 1.0);
    (x, y)
}

impl Ray {
    /// Ray from the camera eye through a point on the near plane, by
    /// unprojecting the NDC point at both depth extremes.
    pub fn from_camera(camera: &OrbitCamera, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inverse = camera.view_projection().try_inverse()?;
        let near = inverse.transform_point(&Point3::new(ndc_x, ndc_y, -1.0));
        let far = inverse.transform_point(&Point3::new(ndc_x, ndc_y, 1.0));
        let direction = (far - near).try_normalize(f32::EPSILON)?;
        Some(Ray { origin: near, direction })
    }

    /// Nearest positive distance at which the ray hits the sphere, if any.
    pub fn intersect_sphere(&self, center: &Point3<f32>, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(&self.direction);
        let c = oc.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let t_near = -b - sqrt_d;
        if t_near > 1e-4 {
            return Some(t_near);
        }
        let t_far = -b + sqrt_d;
        if t_far > 1e-4 {
            return Some(t_far);
        }
        None
    }
}
