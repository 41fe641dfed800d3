use super::frame::BoundingBox;

/// Inclusive width/height window for detected boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeWindow {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl SizeWindow {
    pub fn contains(&self, bbox: &BoundingBox) -> bool {
        (self.min_width..=self.max_width).contains(&bbox.width)
            && (self.min_height..=self.max_height).contains(&bbox.height)
    }

    pub fn min_area(&self) -> f64 {
        self.min_width as f64 * self.min_height as f64
    }

    pub fn max_area(&self) -> f64 {
        self.max_width as f64 * self.max_height as f64
    }
}

impl Default for SizeWindow {
    fn default() -> Self {
        Self {
            min_width: 48,
            max_width: 128,
            min_height: 48,
            max_height: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = SizeWindow::default();
        assert!(window.contains(&BoundingBox::new(0, 0, 48, 48)));
        assert!(window.contains(&BoundingBox::new(0, 0, 128, 128)));
        assert!(!window.contains(&BoundingBox::new(0, 0, 47, 64)));
        assert!(!window.contains(&BoundingBox::new(0, 0, 64, 129)));
    }

    #[test]
    fn test_wide_and_short_box_is_rejected() {
        // 面积与 64×64 相同，但高度不够
        let window = SizeWindow::default();
        assert!(!window.contains(&BoundingBox::new(0, 0, 128, 32)));
    }

    #[test]
    fn test_area_window() {
        let window = SizeWindow::default();
        assert_eq!(window.min_area(), 2304.0);
        assert_eq!(window.max_area(), 16384.0);
    }
}
