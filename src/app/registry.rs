//! Static planet table and theme palettes. Values are scaled for
//! visualization, not astronomically accurate.

/// Immutable description of one planet. Consumers read, never write.
pub struct PlanetDescriptor {
    pub name: &'static str,
    pub radius: f32,
    pub distance: f32,
    /// Radians added to the orbit pivot per unpaused frame.
    pub initial_speed: f32,
    pub color: [f32; 3],
}

pub const SUN_RADIUS: f32 = 10.0;
pub const SUN_COLOR: [f32; 3] = [1.0, 0.647, 0.0];

/// Upper bound for any planet's angular speed (radians/frame).
pub const MAX_SPEED: f32 = 0.05;

pub const PLANETS: [PlanetDescriptor; 8] = [
    PlanetDescriptor { name: "Mercury", radius: 0.8, distance: 15.0, initial_speed: 0.04, color: [0.663, 0.663, 0.663] },
    PlanetDescriptor { name: "Venus", radius: 1.5, distance: 22.0, initial_speed: 0.015, color: [1.0, 0.4, 0.0] },
    PlanetDescriptor { name: "Earth", radius: 1.6, distance: 30.0, initial_speed: 0.01, color: [0.0, 0.467, 0.745] },
    PlanetDescriptor { name: "Mars", radius: 1.2, distance: 38.0, initial_speed: 0.008, color: [0.8, 0.0, 0.0] },
    PlanetDescriptor { name: "Jupiter", radius: 5.0, distance: 60.0, initial_speed: 0.005, color: [1.0, 0.8, 0.4] },
    PlanetDescriptor { name: "Saturn", radius: 4.0, distance: 85.0, initial_speed: 0.003, color: [1.0, 0.82, 0.0] },
    PlanetDescriptor { name: "Uranus", radius: 3.5, distance: 110.0, initial_speed: 0.002, color: [0.0, 0.6, 1.0] },
    PlanetDescriptor { name: "Neptune", radius: 3.4, distance: 135.0, initial_speed: 0.001, color: [0.2, 0.4, 1.0] },
];

/// Scene colors for one theme.
pub struct Palette {
    pub background: [f32; 3],
    pub sun_light: [f32; 3],
    pub ambient: [f32; 3],
}

pub const DARK_PALETTE: Palette = Palette {
    background: [0.0, 0.0, 0.0],
    sun_light: [1.0, 1.0, 1.0],
    ambient: [0.251, 0.251, 0.251],
};

pub const LIGHT_PALETTE: Palette = Palette {
    background: [0.753, 0.847, 0.941],
    sun_light: [0.533, 0.533, 0.533],
    ambient: [0.667, 0.667, 0.667],
};

pub const SUN_LIGHT_INTENSITY: f32 = 1.5;
pub const AMBIENT_INTENSITY: f32 = 0.5;

/// Linear mapping from a [0, 100] slider position to an angular speed.
pub fn slider_to_speed(value: f32) -> f32 {
    (value / 100.0) * MAX_SPEED
}

/// Inverse of [`slider_to_speed`].
pub fn speed_to_slider(speed: f32) -> f32 {
    (speed / MAX_SPEED) * 100.0
}
