use glam::Vec2;

/// Side length of the procedural wall pattern in texels.
pub const PATTERN_SIZE: usize = 8;

/// Brick pattern applied to every wall face; `1` marks mortar.
///
/// Indexed as `WALL_PATTERN[x][y]` with texel coordinates derived from the
/// hit point's position inside its cell.
pub const WALL_PATTERN: [[u8; PATTERN_SIZE]; PATTERN_SIZE] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 1, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
];

/// Texture class of a wall texel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallSurface {
    /// Face of a brick, drawn in the base wall color.
    Brick,
    /// Mortar between bricks, drawn in the shadow color.
    Mortar,
}

impl WallSurface {
    /// Classifies the texel under a wall hit point.
    #[must_use]
    pub fn sample(hit_point: Vec2, cell_size: f32) -> Self {
        let (column, row) = texel(hit_point, cell_size);
        if WALL_PATTERN[column][row] == 1 {
            Self::Mortar
        } else {
            Self::Brick
        }
    }
}

fn texel(hit_point: Vec2, cell_size: f32) -> (usize, usize) {
    if cell_size.is_nan() || cell_size <= 0.0 {
        return (0, 0);
    }
    let axis = |value: f32| {
        let fraction = value.rem_euclid(cell_size) / cell_size;
        let index = (fraction * PATTERN_SIZE as f32).floor();
        if index.is_finite() {
            (index as usize).min(PATTERN_SIZE - 1)
        } else {
            0
        }
    };
    (axis(hit_point.x), axis(hit_point.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_edges_are_mortar() {
        assert_eq!(WallSurface::sample(Vec2::new(64.0, 100.0), 64.0), WallSurface::Mortar);
        assert_eq!(WallSurface::sample(Vec2::new(127.9, 100.0), 64.0), WallSurface::Mortar);
    }

    #[test]
    fn brick_interior_is_brick() {
        assert_eq!(WallSurface::sample(Vec2::new(88.0, 92.0), 64.0), WallSurface::Brick);
    }

    #[test]
    fn studs_are_mortar() {
        // Texel (2, 2) covers [16, 24) on both axes.
        assert_eq!(WallSurface::sample(Vec2::new(20.0, 20.0), 64.0), WallSurface::Mortar);
    }
}
