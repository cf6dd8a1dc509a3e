use glam::Vec2;

use crate::GridMap;

/// Distance travelled by a marched ray between consecutive samples.
pub const RAY_STEP: f32 = 1.0;

/// Point visited by a [`RayMarch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaySample {
    /// Distance travelled from the ray origin.
    pub distance: f32,
    /// World-space position of the sample.
    pub point: Vec2,
}

/// Uniform-step ray march shared by wall projection and hit-scan shots.
///
/// The ray advances by [`RAY_STEP`] world units per sample until the maximum
/// depth is reached. Stepping uniformly keeps the march free of
/// direction-dependent divisions, so rays parallel to a wall resolve like any
/// other ray.
#[derive(Clone, Debug)]
pub struct RayMarch {
    origin: Vec2,
    direction: Vec2,
    max_depth: f32,
    step: u32,
}

impl RayMarch {
    /// Starts a march from `origin` heading along `angle` radians.
    #[must_use]
    pub fn new(origin: Vec2, angle: f32, max_depth: f32) -> Self {
        Self {
            origin,
            direction: Vec2::from_angle(angle),
            max_depth: max_depth.max(0.0),
            step: 0,
        }
    }

    /// Unit vector the ray travels along.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Marches until the first sample that lands in a wall or outside the
    /// grid, returning `None` when the maximum depth is reached first.
    pub fn find_wall(self, map: &GridMap) -> Option<RaySample> {
        self.into_iter()
            .find(|sample| map.cell_at_position(sample.point).is_wall())
    }
}

impl Iterator for RayMarch {
    type Item = RaySample;

    fn next(&mut self) -> Option<Self::Item> {
        let distance = (self.step + 1) as f32 * RAY_STEP;
        if distance > self.max_depth {
            return None;
        }
        self.step += 1;
        Some(RaySample {
            distance,
            point: self.origin + self.direction * distance,
        })
    }
}

/// Per-column perpendicular wall distances produced by a projection pass.
///
/// Entries always lie within `[0, max_depth]`; columns whose ray found no
/// wall store `max_depth`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthBuffer {
    depths: Vec<f32>,
    max_depth: f32,
}

impl DepthBuffer {
    /// Creates a buffer with every column set to `max_depth`.
    #[must_use]
    pub fn new(columns: usize, max_depth: f32) -> Self {
        Self {
            depths: vec![max_depth; columns],
            max_depth,
        }
    }

    /// Resets the buffer for a new frame, resizing it to `columns` entries.
    pub fn reset(&mut self, columns: usize, max_depth: f32) {
        self.max_depth = max_depth;
        self.depths.clear();
        self.depths.resize(columns, max_depth);
    }

    /// Stores the depth for a column, clamped into `[0, max_depth]`.
    pub fn set(&mut self, column: usize, depth: f32) {
        if let Some(slot) = self.depths.get_mut(column) {
            *slot = depth.clamp(0.0, self.max_depth);
        }
    }

    /// Depth recorded for a column.
    #[must_use]
    pub fn get(&self, column: usize) -> Option<f32> {
        self.depths.get(column).copied()
    }

    /// Number of columns covered by the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Reports whether the buffer covers no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Maximum depth a column may hold.
    #[must_use]
    pub const fn max_depth(&self) -> f32 {
        self.max_depth
    }

    /// Raw depth values ordered by column.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.depths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn march_visits_every_unit_step_up_to_depth() {
        let samples: Vec<_> = RayMarch::new(Vec2::ZERO, 0.0, 5.0).collect();
        assert_eq!(samples.len(), 5);
        assert!((samples[0].distance - 1.0).abs() < f32::EPSILON);
        assert!((samples[4].point.x - 5.0).abs() < 1e-5);
        assert!(samples[4].point.y.abs() < 1e-5);
    }

    #[test]
    fn march_finds_first_wall_sample() {
        let map = GridMap::from_rows(&[vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]], 64.0)
            .expect("valid grid");
        let hit = RayMarch::new(Vec2::new(96.0, 96.0), 0.0, 800.0)
            .find_wall(&map)
            .expect("wall within range");
        assert!((hit.distance - 32.0).abs() < f32::EPSILON);
        assert!(hit.point.x >= 128.0);
    }

    #[test]
    fn axis_parallel_rays_resolve() {
        let map = GridMap::from_rows(&[vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]], 64.0)
            .expect("valid grid");
        let down = RayMarch::new(Vec2::new(96.0, 96.0), std::f32::consts::FRAC_PI_2, 800.0)
            .find_wall(&map)
            .expect("wall below");
        assert!((down.distance - 32.0).abs() < 1e-3);
    }

    #[test]
    fn depth_buffer_clamps_entries() {
        let mut buffer = DepthBuffer::new(3, 800.0);
        buffer.set(0, -4.0);
        buffer.set(1, 2_000.0);
        buffer.set(7, 10.0);
        assert_eq!(buffer.as_slice(), &[0.0, 800.0, 800.0]);
        buffer.reset(5, 400.0);
        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.get(4), Some(400.0));
    }
}
