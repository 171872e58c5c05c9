//! Static world: arena bounds and hiding obstacles
//!
//! Obstacles are fixed points. Hiding is a pure proximity test against the
//! nearest one; no line-of-sight occlusion is involved.

use glam::Vec2;

use crate::consts::*;

/// Reference tree layout
pub const REFERENCE_TREES: [(f32, f32); 9] = [
    (150.0, 100.0),
    (400.0, 150.0),
    (650.0, 120.0),
    (200.0, 300.0),
    (500.0, 280.0),
    (700.0, 400.0),
    (100.0, 500.0),
    (600.0, 500.0),
    (350.0, 450.0),
];

/// Obstacle counts above this are bucketed into a grid
pub const GRID_THRESHOLD: usize = 64;

/// Uniform grid over obstacle indices.
///
/// Cell size equals the query radius, so any hit lies in the 3x3 block
/// around the query cell.
#[derive(Debug, Clone)]
pub struct ObstacleGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<u32>>,
}

impl ObstacleGrid {
    pub fn new(obstacles: &[Vec2], width: f32, height: f32, cell_size: f32) -> Self {
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);
        let mut grid = Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
        };
        for (i, &p) in obstacles.iter().enumerate() {
            let (cx, cy) = grid.cell_coords(p);
            let idx = grid.index(cx, cy);
            grid.cells[idx].push(i as u32);
        }
        grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Visit obstacle indices in the query cell and its 8 neighbours
    pub fn query_neighbors(&self, pos: Vec2, mut callback: impl FnMut(u32)) {
        let (cx, cy) = self.cell_coords(pos);
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let x = cx as i64 + dx;
                let y = cy as i64 + dy;
                if x < 0 || y < 0 || x >= self.cols as i64 || y >= self.rows as i64 {
                    continue;
                }
                for &i in &self.cells[self.index(x as usize, y as usize)] {
                    callback(i);
                }
            }
        }
    }

    // Points outside the arena fold into the border cells
    fn cell_coords(&self, pos: Vec2) -> (usize, usize) {
        let cx = (pos.x * self.inv_cell_size).floor().max(0.0) as usize;
        let cy = (pos.y * self.inv_cell_size).floor().max(0.0) as usize;
        (cx.min(self.cols - 1), cy.min(self.rows - 1))
    }

    fn index(&self, cx: usize, cy: usize) -> usize {
        cy * self.cols + cx
    }
}

/// Fixed-size bounded plane with hiding spots
#[derive(Debug, Clone)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    obstacles: Vec<Vec2>,
    grid: Option<ObstacleGrid>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::reference()
    }
}

impl Arena {
    pub fn new(width: f32, height: f32, obstacles: Vec<Vec2>) -> Self {
        let grid = (obstacles.len() > GRID_THRESHOLD)
            .then(|| ObstacleGrid::new(&obstacles, width, height, TREE_HIDE_RANGE));
        Self {
            width,
            height,
            obstacles,
            grid,
        }
    }

    /// 800x600 arena with the nine reference trees
    pub fn reference() -> Self {
        Self::new(
            ARENA_WIDTH,
            ARENA_HEIGHT,
            REFERENCE_TREES.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        )
    }

    /// Arena with no hiding spots
    pub fn open() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT, Vec::new())
    }

    pub fn obstacles(&self) -> &[Vec2] {
        &self.obstacles
    }

    pub fn is_indexed(&self) -> bool {
        self.grid.is_some()
    }

    /// Distance from `point` to the closest obstacle (None if there are none)
    pub fn nearest_obstacle_distance(&self, point: Vec2) -> Option<f32> {
        self.obstacles
            .iter()
            .map(|o| o.distance(point))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Closest obstacle position
    pub fn nearest_obstacle(&self, point: Vec2) -> Option<Vec2> {
        self.obstacles
            .iter()
            .copied()
            .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
    }

    /// True when `center` is strictly within hide range of some obstacle
    pub fn is_hidden(&self, center: Vec2) -> bool {
        match &self.grid {
            Some(grid) => {
                let mut hidden = false;
                grid.query_neighbors(center, |i| {
                    if self.obstacles[i as usize].distance(center) < TREE_HIDE_RANGE {
                        hidden = true;
                    }
                });
                hidden
            }
            None => self
                .nearest_obstacle_distance(center)
                .is_some_and(|d| d < TREE_HIDE_RANGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layout() {
        let arena = Arena::reference();
        assert_eq!(arena.obstacles().len(), 9);
        assert!(!arena.is_indexed());
    }

    #[test]
    fn test_hide_range_is_strict() {
        let arena = Arena::new(800.0, 600.0, vec![Vec2::new(100.0, 100.0)]);
        assert!(arena.is_hidden(Vec2::new(129.9, 100.0)));
        assert!(!arena.is_hidden(Vec2::new(130.0, 100.0)));
    }

    #[test]
    fn test_no_obstacles_never_hidden() {
        let arena = Arena::open();
        assert!(!arena.is_hidden(Vec2::new(400.0, 300.0)));
        assert_eq!(arena.nearest_obstacle_distance(Vec2::ZERO), None);
    }

    #[test]
    fn test_grid_matches_linear_scan() {
        // Dense lattice forces the grid path
        let mut trees = Vec::new();
        for y in 0..12 {
            for x in 0..16 {
                trees.push(Vec2::new(25.0 + x as f32 * 50.0, 25.0 + y as f32 * 50.0));
            }
        }
        let indexed = Arena::new(800.0, 600.0, trees.clone());
        assert!(indexed.is_indexed());

        let mut probe = Vec2::new(-10.0, -10.0);
        while probe.y < 620.0 {
            let linear = indexed
                .nearest_obstacle_distance(probe)
                .is_some_and(|d| d < TREE_HIDE_RANGE);
            assert_eq!(indexed.is_hidden(probe), linear, "mismatch at {probe}");
            probe.x += 7.3;
            if probe.x > 820.0 {
                probe.x = -10.0;
                probe.y += 6.1;
            }
        }
    }
}
