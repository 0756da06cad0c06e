pub mod collision;

/// One straight, impassable fence run on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FenceSegment {
    pub start_x: f32,
    pub start_z: f32,
    pub end_x: f32,
    pub end_z: f32,
}

impl FenceSegment {
    pub const fn new(start_x: f32, start_z: f32, end_x: f32, end_z: f32) -> Self {
        Self {
            start_x,
            start_z,
            end_x,
            end_z,
        }
    }

    pub fn length_squared(&self) -> f32 {
        let dx = self.end_x - self.start_x;
        let dz = self.end_z - self.start_z;
        dx * dx + dz * dz
    }
}

/// Append-only list of fence runs, filled once while the farm is built.
#[derive(Debug, Clone, Default)]
pub struct FenceRegistry {
    segments: Vec<FenceSegment>,
}

impl FenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_segment(&mut self, segment: FenceSegment) {
        self.segments.push(segment);
    }

    /// Segments in insertion order.
    pub fn all_segments(&self) -> &[FenceSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The farm's 2x2 field grid: a square boundary of `half_extent` plus a
    /// cross of dividers through the origin.
    ///
    /// The two short gate runs near the origin are decoration only; the horse
    /// still has to jump the dividers to change fields.
    pub fn farm_layout(half_extent: f32) -> Self {
        let h = half_extent;
        let mut registry = Self::new();
        // Outer boundary
        registry.add_segment(FenceSegment::new(-h, -h, h, -h));
        registry.add_segment(FenceSegment::new(-h, h, h, h));
        registry.add_segment(FenceSegment::new(-h, -h, -h, h));
        registry.add_segment(FenceSegment::new(h, -h, h, h));
        // Dividers
        registry.add_segment(FenceSegment::new(-h, 0.0, h, 0.0));
        registry.add_segment(FenceSegment::new(0.0, -h, 0.0, h));
        registry
    }
}
