use glam::Vec2;

/// Rectangular area an animal is kept inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl FieldBounds {
    pub fn around(center: Vec2, half_width: f32) -> Self {
        Self {
            min_x: center.x - half_width,
            max_x: center.x + half_width,
            min_z: center.y - half_width,
            max_z: center.y + half_width,
        }
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_z + self.max_z) * 0.5,
        )
    }

    /// Fallback for animals spawned without a home field: the field whose
    /// quadrant the position lies in, kept 100 units off every fence.
    /// Positions exactly on a divider belong to no quadrant.
    pub fn quadrant_of(x: f32, z: f32) -> Option<Self> {
        let (min_x, max_x) = if x < 0.0 {
            (-1900.0, -100.0)
        } else if x > 0.0 {
            (100.0, 1900.0)
        } else {
            return None;
        };
        let (min_z, max_z) = if z < 0.0 {
            (-1900.0, -100.0)
        } else if z > 0.0 {
            (100.0, 1900.0)
        } else {
            return None;
        };
        Some(Self {
            min_x,
            max_x,
            min_z,
            max_z,
        })
    }
}

/// The four themed fields of the 2x2 farm grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTheme {
    Wildflowers,
    Wheat,
    Pasture,
    HayField,
}

impl FieldTheme {
    pub const ALL: [FieldTheme; 4] = [
        FieldTheme::Wildflowers,
        FieldTheme::Wheat,
        FieldTheme::Pasture,
        FieldTheme::HayField,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldTheme::Wildflowers => "Wildflower Field",
            FieldTheme::Wheat => "Wheat Field",
            FieldTheme::Pasture => "Cattle Pasture",
            FieldTheme::HayField => "Hay Field",
        }
    }

    pub fn center(self) -> Vec2 {
        match self {
            FieldTheme::Wildflowers => Vec2::new(-1000.0, -1000.0),
            FieldTheme::Wheat => Vec2::new(1000.0, -1000.0),
            FieldTheme::Pasture => Vec2::new(-1000.0, 1000.0),
            FieldTheme::HayField => Vec2::new(1000.0, 1000.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_around_center() {
        let bounds = FieldBounds::around(FieldTheme::Pasture.center(), 900.0);
        assert_eq!(bounds.min_x, -1900.0);
        assert_eq!(bounds.max_z, 1900.0);
        assert!(bounds.contains(-1000.0, 1000.0));
        assert!(!bounds.contains(-50.0, 1000.0));
        assert_eq!(bounds.center(), Vec2::new(-1000.0, 1000.0));
    }

    #[test]
    fn quadrant_fallback_matches_themed_fields() {
        for theme in FieldTheme::ALL {
            let c = theme.center();
            let bounds = FieldBounds::quadrant_of(c.x, c.y).expect("quadrant");
            assert_eq!(bounds.center(), c, "{}", theme.label());
        }
    }

    #[test]
    fn divider_positions_have_no_quadrant() {
        assert!(FieldBounds::quadrant_of(0.0, 500.0).is_none());
        assert!(FieldBounds::quadrant_of(-500.0, 0.0).is_none());
    }
}
