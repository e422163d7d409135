use nalgebra::Point3;
use rand::Rng;

use crate::app::registry::{PlanetDescriptor, MAX_SPEED, PLANETS, SUN_RADIUS};
use crate::engine::mesh::Mesh;
use crate::engine::ray::Ray;

pub const STAR_COUNT: usize = 10_000;
pub const STAR_SPREAD: f32 = 500.0;
const ORBIT_RING_SEGMENTS: usize = 64;

/// One orbiting body, created at startup and mutated by slider input and the
/// per-frame advance. The orbit pivot is the Y-axis rotation `orbit_angle`;
/// the body sits at `(distance, 0, 0)` in pivot space.
pub struct PlanetInstance {
    pub name: &'static str,
    pub radius: f32,
    pub distance: f32,
    pub speed: f32,
    pub orbit_angle: f32,
    pub color: [f32; 3],
    pub mesh: Mesh,
    pub orbit_ring: Vec<f32>,
}

impl PlanetInstance {
    fn from_descriptor(descriptor: &PlanetDescriptor) -> Self {
        PlanetInstance {
            name: descriptor.name,
            radius: descriptor.radius,
            distance: descriptor.distance,
            speed: descriptor.initial_speed,
            orbit_angle: 0.0,
            color: descriptor.color,
            mesh: Mesh::sphere(descriptor.radius, 32, 16),
            orbit_ring: orbit_ring(descriptor.distance),
        }
    }

    /// World position of the body after applying the pivot rotation.
    pub fn world_position(&self) -> Point3<f32> {
        let (sin_a, cos_a) = self.orbit_angle.sin_cos();
        Point3::new(self.distance * cos_a, 0.0, -self.distance * sin_a)
    }
}

/// Everything in the 3D scene: sun, planets, starfield.
pub struct SolarScene {
    pub sun_mesh: Mesh,
    pub planets: Vec<PlanetInstance>,
    pub stars: Vec<f32>,
}

impl SolarScene {
    pub fn build(rng: &mut impl Rng) -> Self {
        let planets = PLANETS.iter().map(PlanetInstance::from_descriptor).collect();

        let mut stars = Vec::with_capacity(STAR_COUNT * 3);
        for _ in 0..STAR_COUNT * 3 {
            stars.push(rng.gen_range(-STAR_SPREAD..STAR_SPREAD));
        }

        SolarScene {
            sun_mesh: Mesh::sphere(SUN_RADIUS, 48, 24),
            planets,
            stars,
        }
    }

    /// Advance every orbit pivot by its current speed, wrapping mod 2π.
    pub fn advance(&mut self) {
        for planet in &mut self.planets {
            planet.orbit_angle = (planet.orbit_angle + planet.speed).rem_euclid(std::f32::consts::TAU);
        }
    }

    pub fn set_speed(&mut self, index: usize, speed: f32) {
        if let Some(planet) = self.planets.get_mut(index) {
            planet.speed = speed.clamp(0.0, MAX_SPEED);
        }
    }

    /// Nearest ray hit among planet bodies. The sun and starfield are not
    /// pickable.
    pub fn pick(&self, ray: &Ray) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, planet) in self.planets.iter().enumerate() {
            if let Some(t) = ray.intersect_sphere(&planet.world_position(), planet.radius) {
                if best.map_or(true, |(_, best_t)| t < best_t) {
                    best = Some((index, t));
                }
            }
        }
        best.map(|(index, _)| index)
    }
}

fn orbit_ring(distance: f32) -> Vec<f32> {
    let mut points = Vec::with_capacity(ORBIT_RING_SEGMENTS * 3);
    for i in 0..ORBIT_RING_SEGMENTS {
        let angle = std::f32::consts::TAU * i as f32 / ORBIT_RING_SEGMENTS as f32;
        points.push(distance * angle.cos());
        points.push(0.0);
        points.push(distance * angle.sin());
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn scene() -> SolarScene {
        SolarScene::build(&mut SmallRng::seed_from_u64(7))
    }

    #[test]
    fn startup_matches_the_registry() {
        let scene = scene();
        assert_eq!(scene.planets.len(), 8);
        for (planet, descriptor) in scene.planets.iter().zip(PLANETS.iter()) {
            assert_eq!(planet.name, descriptor.name);
            assert_eq!(planet.distance, descriptor.distance);
            assert_eq!(planet.speed, descriptor.initial_speed);
            assert_eq!(planet.orbit_angle, 0.0);
        }
        assert_eq!(scene.stars.len(), STAR_COUNT * 3);
        assert!(scene.stars.iter().all(|c| c.abs() <= STAR_SPREAD));
    }

    #[test]
    fn advance_accumulates_speed_per_frame() {
        let mut scene = scene();
        let frames = 25;
        for _ in 0..frames {
            scene.advance();
        }
        for (planet, descriptor) in scene.planets.iter().zip(PLANETS.iter()) {
            let expected = (frames as f32 * descriptor.initial_speed).rem_euclid(std::f32::consts::TAU);
            assert!((planet.orbit_angle - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn orbit_angle_wraps_at_two_pi() {
        let mut scene = scene();
        scene.set_speed(0, MAX_SPEED);
        for _ in 0..200 {
            scene.advance();
        }
        // 200 * 0.05 = 10 radians, wrapped once.
        assert!((scene.planets[0].orbit_angle - (10.0 - std::f32::consts::TAU)).abs() < 1e-3);
    }

    #[test]
    fn set_speed_clamps_to_the_valid_range() {
        let mut scene = scene();
        scene.set_speed(2, 99.0);
        assert_eq!(scene.planets[2].speed, MAX_SPEED);
        scene.set_speed(2, -1.0);
        assert_eq!(scene.planets[2].speed, 0.0);
    }

    #[test]
    fn world_position_follows_the_pivot_rotation() {
        let mut scene = scene();
        let distance = scene.planets[0].distance;

        let start = scene.planets[0].world_position();
        assert!((start.x - distance).abs() < 1e-4);
        assert!(start.z.abs() < 1e-4);

        scene.planets[0].orbit_angle = std::f32::consts::FRAC_PI_2;
        let quarter = scene.planets[0].world_position();
        assert!(quarter.x.abs() < 1e-3);
        assert!((quarter.z + distance).abs() < 1e-3);
    }

    #[test]
    fn pick_prefers_the_nearest_hit() {
        let scene = scene();
        // Ray along -x from beyond Neptune's orbit crosses every body on
        // the +x axis; Neptune's near wall comes first.
        let ray = Ray {
            origin: Point3::new(200.0, 0.0, 0.0),
            direction: -Vector3::x(),
        };
        let hit = scene.pick(&ray).unwrap();
        assert_eq!(scene.planets[hit].name, "Neptune");
    }

    #[test]
    fn pick_misses_off_plane() {
        let scene = scene();
        let ray = Ray {
            origin: Point3::new(0.0, 300.0, 0.0),
            direction: Vector3::y(),
        };
        assert!(scene.pick(&ray).is_none());
    }
}
