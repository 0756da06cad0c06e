use glam::Vec2;

use super::{FenceRegistry, FenceSegment};

/// Below this squared length a segment has no direction and is ignored.
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

impl FenceRegistry {
    /// Would an actor of `radius` centred at (x, z) overlap any fence?
    ///
    /// Stops at the first blocking segment. Zero-length segments never block.
    pub fn is_blocked(&self, x: f32, z: f32, radius: f32) -> bool {
        self.segments
            .iter()
            .any(|segment| segment_blocks(segment, x, z, radius))
    }
}

/// Cheap infinite-line test first, exact finite-segment test only when the
/// line is within reach.
fn segment_blocks(segment: &FenceSegment, x: f32, z: f32, radius: f32) -> bool {
    let norm_sq = segment.length_squared();
    if norm_sq < DEGENERATE_LENGTH_SQ {
        return false;
    }

    let a = segment.end_z - segment.start_z;
    let b = segment.start_x - segment.end_x;
    let c = segment.end_x * segment.start_z - segment.start_x * segment.end_z;

    let line_distance = (a * x + b * z + c).abs() / norm_sq.sqrt();
    if line_distance >= radius {
        return false;
    }

    distance_to_segment(segment, x, z) < radius
}

/// Euclidean distance from (x, z) to the closest point on the finite segment.
pub fn distance_to_segment(segment: &FenceSegment, x: f32, z: f32) -> f32 {
    let start = Vec2::new(segment.start_x, segment.start_z);
    let end = Vec2::new(segment.end_x, segment.end_z);
    let point = Vec2::new(x, z);

    let run = end - start;
    let length_sq = run.length_squared();
    if length_sq < DEGENERATE_LENGTH_SQ {
        return point.distance(start);
    }

    let t = ((point - start).dot(run) / length_sq).clamp(0.0, 1.0);
    let closest = start + run * t;
    point.distance(closest)
}
