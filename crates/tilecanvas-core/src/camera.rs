use crate::coords::Point;

/// World-space offset of the viewport's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Camera {
    position: Point,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Point) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Jump to an absolute position
    pub fn move_to(&mut self, x: i64, y: i64) {
        self.position = Point::new(x, y);
    }

    /// Pan by a relative amount, stopping at the edges of the `i64` range
    pub fn move_by(&mut self, dx: i64, dy: i64) {
        self.position = self.position + Point::new(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_starts_at_origin() {
        assert_eq!(Camera::new().position(), Point::ORIGIN);
    }

    #[test]
    fn test_move_to() {
        let mut camera = Camera::new();
        camera.move_to(-300, 42);
        assert_eq!(camera.position(), Point::new(-300, 42));
    }

    #[test]
    fn test_move_by_accumulates() {
        let mut camera = Camera::at(Point::new(10, 10));
        camera.move_by(5, -20);
        camera.move_by(-15, 0);
        assert_eq!(camera.position(), Point::new(0, -10));
    }

    #[test]
    fn test_move_by_saturates() {
        let mut camera = Camera::at(Point::new(i64::MAX - 10, i64::MIN + 10));
        camera.move_by(100, -100);
        assert_eq!(camera.position(), Point::new(i64::MAX, i64::MIN));
    }
}
