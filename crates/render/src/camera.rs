use glam::{Mat4, Vec2, Vec3};

/// Source of the per-frame camera matrices (4x4, column-major).
///
/// The renderer reads each matrix once per frame and treats it as a snapshot.
pub trait Camera {
    fn projection_matrix(&self) -> Mat4;
    fn view_matrix(&self) -> Mat4;
}

/// Orthographic side-view camera in world units.
/// Camera motion lives outside the terrain: it only decides what gets drawn.
#[derive(Debug, Clone)]
pub struct OrthoCamera {
    /// World-space point at the center of the screen.
    pub position: Vec2,
    /// Screen pixels per world unit.
    pub zoom: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Pan speed in world units per second.
    pub speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 2.0,
            viewport: Vec2::new(1280.0, 720.0),
            speed: 200.0,
            min_zoom: 0.25,
            max_zoom: 8.0,
        }
    }
}

impl OrthoCamera {
    pub fn new(position: Vec2, viewport: Vec2) -> Self {
        Self {
            position,
            viewport,
            ..Self::default()
        }
    }

    pub fn move_left(&mut self, dt: f32) {
        self.position.x -= self.speed * dt;
    }

    pub fn move_right(&mut self, dt: f32) {
        self.position.x += self.speed * dt;
    }

    pub fn move_up(&mut self, dt: f32) {
        self.position.y += self.speed * dt;
    }

    pub fn move_down(&mut self, dt: f32) {
        self.position.y -= self.speed * dt;
    }

    /// Multiply the zoom by `factor`, clamped to the zoom range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    /// Half extents of the visible area in world units.
    pub fn half_extents(&self) -> Vec2 {
        self.viewport / (2.0 * self.zoom)
    }

    /// World position under a screen pixel (origin top-left, Y down).
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let centered = screen - self.viewport / 2.0;
        self.position + Vec2::new(centered.x, -centered.y) / self.zoom
    }
}

impl Camera for OrthoCamera {
    fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -1.0, 1.0)
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn camera_center_maps_to_clip_origin() {
        let cam = OrthoCamera::new(Vec2::new(100.0, 50.0), Vec2::new(800.0, 600.0));
        let clip = cam.projection_matrix() * cam.view_matrix() * Vec4::new(100.0, 50.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
    }

    #[test]
    fn viewport_edge_maps_to_clip_edge() {
        let cam = OrthoCamera::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        let right = Vec2::new(cam.half_extents().x, 0.0);
        let clip = cam.projection_matrix() * cam.view_matrix() * right.extend(0.0).extend(1.0);
        assert!((clip.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrthoCamera::default();
        cam.zoom_by(100.0);
        assert_eq!(cam.zoom, cam.max_zoom);
        cam.zoom_by(0.0001);
        assert_eq!(cam.zoom, cam.min_zoom);
    }

    #[test]
    fn panning_and_picking() {
        let mut cam = OrthoCamera::new(Vec2::ZERO, Vec2::new(200.0, 100.0));
        cam.move_right(1.0);
        assert_eq!(cam.position.x, cam.speed);
        cam.position = Vec2::ZERO;
        cam.zoom = 1.0;
        assert_eq!(cam.screen_to_world(Vec2::new(100.0, 50.0)), Vec2::ZERO);
        assert_eq!(cam.screen_to_world(Vec2::new(200.0, 0.0)), Vec2::new(100.0, 50.0));
    }
}
