use serde::{Deserialize, Serialize};
use vek::Vec2;

use super::{Path, Point2};

/// 世界邊界矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2<f64>,
    pub max: Vec2<f64>,
}

impl Bounds {
    pub fn new(min: Vec2<f64>, max: Vec2<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains_point(&self, point: Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// 四個角點，逆時針，從左下角開始
    pub fn corners(&self) -> Path {
        vec![
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.max.x, self.max.y),
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_corners_counter_clockwise() {
        let bounds = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        let corners = bounds.corners();
        assert_eq!(corners.len(), 4);
        assert!(crate::vision::geometry_utils::signed_area(&corners) > 0.0, "角點應為逆時針");
        assert_eq!(bounds.width(), 4.0);
        assert_eq!(bounds.height(), 2.0);
        assert!(bounds.contains_point(Vec2::new(4.0, 1.0)));
        assert!(!bounds.contains_point(Vec2::new(4.1, 1.0)));
    }
}
