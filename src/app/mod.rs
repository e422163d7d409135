pub mod focus;
pub mod registry;
pub mod scene;

use nalgebra::Point3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::app::focus::FocusTween;
use crate::app::registry::{
    slider_to_speed, Palette, AMBIENT_INTENSITY, DARK_PALETTE, LIGHT_PALETTE, SUN_COLOR,
    SUN_LIGHT_INTENSITY,
};
use crate::app::scene::SolarScene;
use crate::engine::camera::OrbitCamera;
use crate::engine::ray::{ndc_from_pixel, Ray};
use crate::engine::renderer::{LightRig, Renderer};

const ORBIT_RING_COLOR: [f32; 3] = [0.3, 0.3, 0.3];
const STAR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const STAR_POINT_SIZE: f32 = 1.5;
const DRAG_SENSITIVITY: f32 = 0.01;
const WHEEL_SENSITIVITY: f32 = 0.05;

/// Result of feeding a pointer position through the hover state machine.
#[derive(Debug, PartialEq, Eq)]
pub enum HoverChange {
    /// Entered a planet (from idle or from another planet).
    Shown(&'static str),
    /// Left all planets.
    Hidden,
    Unchanged,
}

/// All mutable viewer state for one browser session. Owns the camera, the
/// scene, the interaction flags, and the at-most-one focus tween; the DOM
/// and WebGL layers stay outside so this compiles and tests natively.
pub struct Session {
    pub camera: OrbitCamera,
    pub scene: SolarScene,
    pub hovered: Option<usize>,
    pub paused: bool,
    pub light_mode: bool,
    focus: Option<FocusTween>,
    dragging: bool,
    last_pointer: (f32, f32),
}

impl Session {
    pub fn new(width: f32, height: f32) -> Self {
        let camera = OrbitCamera::new(
            Point3::new(0.0, 50.0, 150.0),
            Point3::origin(),
            75.0_f32.to_radians(),
            width / height.max(1.0),
        );
        let mut rng = SmallRng::from_entropy();
        Session {
            camera,
            scene: SolarScene::build(&mut rng),
            hovered: None,
            paused: false,
            light_mode: false,
            focus: None,
            dragging: false,
            last_pointer: (0.0, 0.0),
        }
    }

    /// One animation-loop step: camera damping, focus tween, orbit advance.
    pub fn tick(&mut self, now_ms: f64) {
        self.camera.update();

        if let Some(tween) = &self.focus {
            if tween.step(&mut self.camera, now_ms) {
                self.focus = None;
            }
        }

        if !self.paused {
            self.scene.advance();
        }
    }

    pub fn pointer_pressed(&mut self, px: f32, py: f32) {
        self.dragging = true;
        self.last_pointer = (px, py);
    }

    pub fn pointer_released(&mut self) {
        self.dragging = false;
    }

    /// Drag-orbit plus the hover state machine.
    pub fn pointer_moved(&mut self, px: f32, py: f32, width: f32, height: f32) -> HoverChange {
        if self.dragging {
            let dx = px - self.last_pointer.0;
            let dy = py - self.last_pointer.1;
            self.camera.rotate(dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
            self.last_pointer = (px, py);
        }
        let hit = self.pick_at(px, py, width, height);
        self.apply_hover(hit)
    }

    /// Click-to-focus: a hit starts a fresh tween from the camera's current
    /// (possibly mid-tween) pose, superseding any older one. Returns the
    /// focused planet's name.
    pub fn click(&mut self, px: f32, py: f32, width: f32, height: f32, now_ms: f64) -> Option<&'static str> {
        let index = self.pick_at(px, py, width, height)?;
        let planet = &self.scene.planets[index];
        self.focus = Some(FocusTween::toward(
            &self.camera,
            planet.world_position(),
            planet.radius,
            now_ms,
        ));
        Some(planet.name)
    }

    pub fn wheel(&mut self, delta: f32) {
        self.camera.zoom(delta * WHEEL_SENSITIVITY);
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn toggle_light_mode(&mut self) -> bool {
        self.light_mode = !self.light_mode;
        self.light_mode
    }

    pub fn reset_camera(&mut self) {
        self.focus = None;
        self.camera.reset();
    }

    /// Slider input, [0, 100]. Returns the speed actually applied so the
    /// readout can display it.
    pub fn set_planet_speed(&mut self, index: usize, slider_value: f32) -> f32 {
        let speed = slider_to_speed(slider_value);
        self.scene.set_speed(index, speed);
        self.scene.planets.get(index).map_or(0.0, |p| p.speed)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn palette(&self) -> &'static Palette {
        if self.light_mode {
            &LIGHT_PALETTE
        } else {
            &DARK_PALETTE
        }
    }

    pub fn hovered_name(&self) -> Option<&'static str> {
        self.hovered.map(|i| self.scene.planets[i].name)
    }

    /// Screen pixel for the tooltip, tracking the hovered planet. `None`
    /// when nothing is hovered or the planet projects behind the eye.
    pub fn tooltip_position(&self, width: f32, height: f32) -> Option<(f32, f32)> {
        let planet = &self.scene.planets[self.hovered?];
        let (ndc_x, ndc_y) = self.camera.project(&planet.world_position())?;
        Some((
            (ndc_x * 0.5 + 0.5) * width,
            (-ndc_y * 0.5 + 0.5) * height,
        ))
    }

    fn pick_at(&self, px: f32, py: f32, width: f32, height: f32) -> Option<usize> {
        let (ndc_x, ndc_y) = ndc_from_pixel(px, py, width, height);
        let ray = Ray::from_camera(&self.camera, ndc_x, ndc_y)?;
        self.scene.pick(&ray)
    }

    fn apply_hover(&mut self, hit: Option<usize>) -> HoverChange {
        match (self.hovered, hit) {
            (old, Some(new)) if old != Some(new) => {
                self.hovered = Some(new);
                HoverChange::Shown(self.scene.planets[new].name)
            }
            (Some(_), None) => {
                self.hovered = None;
                HoverChange::Hidden
            }
            _ => HoverChange::Unchanged,
        }
    }
}

/// The session plus its WebGL renderer; lives in the thread-local slot.
pub struct Viewer {
    pub renderer: Renderer,
    pub session: Session,
}

impl Viewer {
    pub fn new(mut renderer: Renderer, width: f32, height: f32) -> Self {
        let session = Session::new(width, height);
        renderer.load_stars(&session.scene.stars);
        Viewer { renderer, session }
    }

    pub fn render(&self) {
        let session = &self.session;
        let palette = session.palette();

        self.renderer.enable_depth_test();
        self.renderer.clear(palette.background);

        let view_proj = session.camera.view_projection();

        self.renderer.draw_stars(STAR_COLOR, STAR_POINT_SIZE, &view_proj);
        self.renderer.draw_mesh(
            &session.scene.sun_mesh,
            &Point3::origin(),
            SUN_COLOR,
            None,
            &view_proj,
        );

        let rig = LightRig {
            position: Point3::origin(),
            color: scale_color(palette.sun_light, SUN_LIGHT_INTENSITY),
            ambient: scale_color(palette.ambient, AMBIENT_INTENSITY),
        };
        for planet in &session.scene.planets {
            self.renderer.draw_line_loop(&planet.orbit_ring, ORBIT_RING_COLOR, &view_proj);
            self.renderer.draw_mesh(
                &planet.mesh,
                &planet.world_position(),
                planet.color,
                Some(&rig),
                &view_proj,
            );
        }
    }
}

fn scale_color(color: [f32; 3], factor: f32) -> [f32; 3] {
    [color[0] * factor, color[1] * factor, color[2] * factor]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::focus::FOCUS_DURATION_MS;
    use crate::app::registry::{MAX_SPEED, PLANETS};

    const W: f32 = 800.0;
    const H: f32 = 600.0;

    fn session() -> Session {
        Session::new(W, H)
    }

    /// Park the camera on the +z side of a planet so the screen center ray
    /// passes straight through its body.
    fn aim_at_planet(session: &mut Session, index: usize) {
        let center = session.scene.planets[index].world_position();
        session
            .camera
            .set_view(Point3::new(center.x, center.y, center.z + 50.0), center);
    }

    #[test]
    fn hover_state_machine_transitions() {
        let mut s = session();

        assert_eq!(s.apply_hover(None), HoverChange::Unchanged);
        assert_eq!(s.apply_hover(Some(2)), HoverChange::Shown("Earth"));
        assert_eq!(s.apply_hover(Some(2)), HoverChange::Unchanged);
        assert_eq!(s.apply_hover(Some(4)), HoverChange::Shown("Jupiter"));
        assert_eq!(s.apply_hover(None), HoverChange::Hidden);
        assert!(s.hovered.is_none());
    }

    #[test]
    fn pointer_over_a_planet_shows_then_hides_the_tooltip() {
        let mut s = session();
        aim_at_planet(&mut s, 0);

        let change = s.pointer_moved(W / 2.0, H / 2.0, W, H);
        assert_eq!(change, HoverChange::Shown("Mercury"));
        assert_eq!(s.hovered_name(), Some("Mercury"));
        assert!(s.tooltip_position(W, H).is_some());

        // Top-left corner ray misses everything.
        let change = s.pointer_moved(0.0, 0.0, W, H);
        assert_eq!(change, HoverChange::Hidden);
        assert!(s.tooltip_position(W, H).is_none());
    }

    #[test]
    fn click_focuses_the_planet_under_the_cursor() {
        let mut s = session();
        aim_at_planet(&mut s, 3);
        let mars_position = s.scene.planets[3].world_position();

        let name = s.click(W / 2.0, H / 2.0, W, H, 0.0);
        assert_eq!(name, Some("Mars"));
        let tween = s.focus.as_ref().unwrap();
        assert_eq!(tween.destination_target(), mars_position);
    }

    #[test]
    fn focus_tween_finishes_and_camera_settles() {
        let mut s = session();
        s.paused = true;
        aim_at_planet(&mut s, 1);
        s.click(W / 2.0, H / 2.0, W, H, 0.0).unwrap();

        s.tick(FOCUS_DURATION_MS / 2.0);
        assert!(s.focus.is_some());

        s.tick(FOCUS_DURATION_MS);
        assert!(s.focus.is_none());

        let settled = s.camera.position();
        s.tick(FOCUS_DURATION_MS + 500.0);
        assert!((s.camera.position() - settled).norm() < 1e-4);
    }

    #[test]
    fn click_miss_leaves_no_tween() {
        let mut s = session();
        aim_at_planet(&mut s, 0);
        assert!(s.click(0.0, 0.0, W, H, 0.0).is_none());
        assert!(s.focus.is_none());
    }

    #[test]
    fn pause_freezes_orbits_and_double_toggle_restores() {
        let mut s = session();
        assert!(s.toggle_pause());

        let angles: Vec<f32> = s.scene.planets.iter().map(|p| p.orbit_angle).collect();
        for frame in 0..10 {
            s.tick(frame as f64 * 16.0);
        }
        for (planet, angle) in s.scene.planets.iter().zip(&angles) {
            assert_eq!(planet.orbit_angle, *angle);
        }

        assert!(!s.toggle_pause());
        s.tick(0.0);
        assert!(s.scene.planets[0].orbit_angle > 0.0);
    }

    #[test]
    fn light_mode_double_toggle_restores_the_palette() {
        let mut s = session();
        let original = s.palette().background;

        assert!(s.toggle_light_mode());
        assert_ne!(s.palette().background, original);
        assert_eq!(s.palette().background, LIGHT_PALETTE.background);

        assert!(!s.toggle_light_mode());
        assert_eq!(s.palette().background, original);
        assert_eq!(s.palette().sun_light, DARK_PALETTE.sun_light);
        assert_eq!(s.palette().ambient, DARK_PALETTE.ambient);
    }

    #[test]
    fn slider_input_updates_speed_through_the_linear_mapping() {
        let mut s = session();
        assert_eq!(s.set_planet_speed(0, 100.0), MAX_SPEED);
        assert_eq!(s.set_planet_speed(0, 0.0), 0.0);
        let mid = s.set_planet_speed(5, 50.0);
        assert!((mid - MAX_SPEED / 2.0).abs() < 1e-7);
        assert_eq!(s.scene.planets[5].speed, mid);
    }

    #[test]
    fn reset_camera_cancels_an_active_focus_tween() {
        let mut s = session();
        aim_at_planet(&mut s, 6);
        s.click(W / 2.0, H / 2.0, W, H, 0.0).unwrap();
        assert!(s.focus.is_some());

        s.reset_camera();
        assert!(s.focus.is_none());
        assert!((s.camera.position() - Point3::new(0.0, 50.0, 150.0)).norm() < 1e-3);
    }

    #[test]
    fn startup_scenario_matches_the_registry() {
        let s = session();
        assert_eq!(s.scene.planets.len(), PLANETS.len());
        assert!(!s.paused);
        assert!(!s.light_mode);
        assert!(s.hovered.is_none());
        for (planet, descriptor) in s.scene.planets.iter().zip(PLANETS.iter()) {
            assert_eq!(planet.name, descriptor.name);
            assert_eq!(planet.speed, descriptor.initial_speed);
        }
    }
}
