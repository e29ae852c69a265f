//! Demo render payload: circles drifting around the surface.
//!
//! Deliberately thin and interchangeable; the integration subsystem only
//! needs something that produces frames. The simulation is pure so it can be
//! stepped without a window.

#[derive(Debug, Clone)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub radius: f32,
    pub color: (u8, u8, u8),
}

#[derive(Debug, Clone)]
pub struct Scene {
    width: i32,
    height: i32,
    pub circles: Vec<Circle>,
}

const CIRCLE_COUNT: usize = 12;
const PALETTE: [(u8, u8, u8); 4] = [
    (235, 94, 94),
    (94, 160, 235),
    (110, 220, 140),
    (240, 200, 90),
];

impl Scene {
    /// Deterministic spawn: positions and velocities come from a small
    /// xorshift stream so the demo looks the same on every run.
    pub fn new(width: i32, height: i32) -> Self {
        let mut seed = 0x2545_f491u32;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        let circles = (0..CIRCLE_COUNT)
            .map(|i| {
                let radius = 20.0 + (next() % 40) as f32;
                // Spawn anywhere; the resize below clamps into the field.
                Circle {
                    x: (next() % width.max(1) as u32) as f32,
                    y: (next() % height.max(1) as u32) as f32,
                    dx: 40.0 + (next() % 120) as f32,
                    dy: 40.0 + (next() % 120) as f32,
                    radius,
                    color: PALETTE[i % PALETTE.len()],
                }
            })
            .collect();

        let mut scene = Self {
            width,
            height,
            circles,
        };
        scene.resize(width, height);
        scene
    }

    /// Re-clamp every circle into the new field.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
        for c in &mut self.circles {
            c.x = c.x.clamp(c.radius, (self.width as f32 - c.radius).max(c.radius));
            c.y = c.y.clamp(c.radius, (self.height as f32 - c.radius).max(c.radius));
        }
    }

    /// Advance the simulation, bouncing circles off the field edges.
    pub fn step(&mut self, dt: f32) {
        let w = self.width as f32;
        let h = self.height as f32;
        for c in &mut self.circles {
            c.x += c.dx * dt;
            c.y += c.dy * dt;
            if c.x - c.radius < 0.0 {
                c.x = c.radius;
                c.dx = c.dx.abs();
            } else if c.x + c.radius > w {
                c.x = w - c.radius;
                c.dx = -c.dx.abs();
            }
            if c.y - c.radius < 0.0 {
                c.y = c.radius;
                c.dy = c.dy.abs();
            } else if c.y + c.radius > h {
                c.y = h - c.radius;
                c.dy = -c.dy.abs();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_bounds(scene: &Scene, width: f32, height: f32) -> bool {
        scene.circles.iter().all(|c| {
            c.x - c.radius >= -0.01
                && c.y - c.radius >= -0.01
                && c.x + c.radius <= width + 0.01
                && c.y + c.radius <= height + 0.01
        })
    }

    #[test]
    fn circles_stay_inside_the_field() {
        let mut scene = Scene::new(800, 450);
        for _ in 0..600 {
            scene.step(1.0 / 60.0);
        }
        assert!(in_bounds(&scene, 800.0, 450.0));
    }

    #[test]
    fn resize_reclamps_into_the_smaller_field() {
        let mut scene = Scene::new(1920, 1080);
        scene.resize(400, 300);
        scene.step(1.0 / 60.0);
        assert!(in_bounds(&scene, 400.0, 300.0));
    }

    #[test]
    fn spawn_is_deterministic() {
        let a = Scene::new(800, 450);
        let b = Scene::new(800, 450);
        for (ca, cb) in a.circles.iter().zip(&b.circles) {
            assert_eq!(ca.x.to_bits(), cb.x.to_bits());
            assert_eq!(ca.y.to_bits(), cb.y.to_bits());
        }
    }
}
