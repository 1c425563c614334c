/// Pointer position in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Rectangle in terminal cells, half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let right = u32::from(self.x) + u32::from(self.width);
        let bottom = u32::from(self.y) + u32::from(self.height);
        point.x >= self.x
            && u32::from(point.x) < right
            && point.y >= self.y
            && u32::from(point.y) < bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let region = Region::new(10, 10, 5, 5);
        assert!(region.contains(Point::new(10, 10)));
        assert!(region.contains(Point::new(14, 14)));
        assert!(!region.contains(Point::new(15, 10)));
        assert!(!region.contains(Point::new(9, 12)));
    }

    #[test]
    fn test_edge_of_screen_does_not_overflow() {
        let region = Region::new(u16::MAX - 1, 0, 10, 1);
        assert!(region.contains(Point::new(u16::MAX, 0)));
    }
}
