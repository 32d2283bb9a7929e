//! Axis-aligned boxes and the static obstacle set.
//!
//! Obstacles are bucketed into a uniform XZ hash grid so a query only tests
//! boxes near the player instead of every wall in the maze. Queries still
//! report the obstacle a full linear scan would have found first, so the
//! bucketing never changes which wall blocks a move.

use bevy::prelude::*;
use std::collections::HashMap;

/// Edge length of a bucket in world units.
/// Should be at least the size of the largest obstacle footprint.
pub const SPATIAL_CELL_SIZE: f32 = 4.0;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::from_center_half_extents(center, size * 0.5)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap test on closed intervals: boxes that only touch on a face intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Immutable set of obstacle boxes with a bucket index.
#[derive(Default, Debug, Clone)]
pub struct ObstacleSet {
    /// Map from bucket (x, z) to indices of boxes overlapping that bucket, ascending.
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// All boxes, in generation order.
    boxes: Vec<Aabb>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set. Order is preserved and defines the hit tie-break.
    pub fn from_boxes(boxes: Vec<Aabb>) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();

        for (idx, aabb) in boxes.iter().enumerate() {
            let (min_cell, max_cell) = Self::cell_span(aabb);
            for cx in min_cell.0..=max_cell.0 {
                for cz in min_cell.1..=max_cell.1 {
                    cells.entry((cx, cz)).or_default().push(idx);
                }
            }
        }

        Self { cells, boxes }
    }

    #[inline]
    fn world_to_cell(x: f32, z: f32) -> (i32, i32) {
        (
            (x / SPATIAL_CELL_SIZE).floor() as i32,
            (z / SPATIAL_CELL_SIZE).floor() as i32,
        )
    }

    fn cell_span(aabb: &Aabb) -> ((i32, i32), (i32, i32)) {
        (
            Self::world_to_cell(aabb.min.x, aabb.min.z),
            Self::world_to_cell(aabb.max.x, aabb.max.z),
        )
    }

    /// Index of the first box (in generation order) intersecting `query`.
    pub fn first_hit(&self, query: &Aabb) -> Option<usize> {
        if !query.is_finite() {
            // Bucket math is meaningless on NaN/inf; fall back to the exact scan.
            return self.first_hit_linear(query);
        }

        let (min_cell, max_cell) = Self::cell_span(query);
        let mut best: Option<usize> = None;

        for cx in min_cell.0..=max_cell.0 {
            for cz in min_cell.1..=max_cell.1 {
                let Some(indices) = self.cells.get(&(cx, cz)) else {
                    continue;
                };
                // Indices are ascending, so the first hit in a bucket is that bucket's best.
                for &idx in indices {
                    if best.is_some_and(|b| idx >= b) {
                        break;
                    }
                    if self.boxes[idx].intersects(query) {
                        best = Some(idx);
                        break;
                    }
                }
            }
        }

        best
    }

    /// Reference scan over every box in order. Same answer as `first_hit`.
    pub fn first_hit_linear(&self, query: &Aabb) -> Option<usize> {
        self.boxes.iter().position(|b| b.intersects(query))
    }

    pub fn get(&self, idx: usize) -> Option<&Aabb> {
        self.boxes.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aabb> {
        self.boxes.iter()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_wall(x: f32, z: f32) -> Aabb {
        Aabb::from_center_size(Vec3::new(x, 1.0, z), Vec3::new(1.0, 2.0, 1.0))
    }

    #[test]
    fn test_aabb_basic_geometry() {
        let b = unit_wall(3.0, -2.0);
        assert_eq!(b.min, Vec3::new(2.5, 0.0, -2.5));
        assert_eq!(b.max, Vec3::new(3.5, 2.0, -1.5));
        assert_eq!(b.center(), Vec3::new(3.0, 1.0, -2.0));
        assert_eq!(b.size(), Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_touching_faces_intersect() {
        let a = unit_wall(0.0, 0.0);
        let b = unit_wall(1.0, 0.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));

        let c = unit_wall(1.01, 0.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_vertical_separation_does_not_intersect() {
        let wall = unit_wall(0.0, 0.0);
        let above = Aabb::from_center_half_extents(Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.25, 0.9, 0.25));
        assert!(!wall.intersects(&above));
    }

    #[test]
    fn test_empty_set_never_hits() {
        let set = ObstacleSet::new();
        assert!(set.is_empty());
        assert_eq!(set.first_hit(&unit_wall(0.0, 0.0)), None);
    }

    #[test]
    fn test_first_hit_prefers_generation_order() {
        // Later box listed first in a bucket-friendly position; the lower index must win.
        let set = ObstacleSet::from_boxes(vec![unit_wall(5.0, 0.0), unit_wall(4.0, 0.0)]);
        let query = Aabb::from_center_half_extents(Vec3::new(4.5, 1.0, 0.0), Vec3::new(0.25, 0.9, 0.25));
        assert_eq!(set.first_hit(&query), Some(0));
        assert_eq!(set.first_hit_linear(&query), Some(0));
    }

    #[test]
    fn test_bucketed_query_matches_linear_scan() {
        let mut boxes = Vec::new();
        for z in -12_i32..12 {
            for x in -12_i32..12 {
                if (x * 7 + z * 13).rem_euclid(5) == 0 {
                    boxes.push(unit_wall(x as f32, z as f32));
                }
            }
        }
        let set = ObstacleSet::from_boxes(boxes);

        let mut probe = -13.0;
        while probe < 13.0 {
            for &pz in &[-11.3_f32, -4.0, -0.5, 0.0, 3.75, 8.1] {
                let q = Aabb::from_center_half_extents(
                    Vec3::new(probe, 1.8, pz),
                    Vec3::new(0.25, 0.9, 0.25),
                );
                assert_eq!(set.first_hit(&q), set.first_hit_linear(&q), "probe ({probe}, {pz})");
            }
            probe += 0.37;
        }
    }

    #[test]
    fn test_query_straddling_bucket_boundary() {
        // Box sits across the x = 4.0 bucket edge.
        let set = ObstacleSet::from_boxes(vec![unit_wall(4.0, 0.0)]);
        let left = Aabb::from_center_half_extents(Vec3::new(3.3, 1.0, 0.0), Vec3::new(0.25, 0.9, 0.25));
        let right = Aabb::from_center_half_extents(Vec3::new(4.7, 1.0, 0.0), Vec3::new(0.25, 0.9, 0.25));
        assert_eq!(set.first_hit(&left), Some(0));
        assert_eq!(set.first_hit(&right), Some(0));
    }
}
