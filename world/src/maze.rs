//! Maze topology: carved corridors, unstable walls, and solidity queries.

use quantum_maze_core::{CellCoord, CellType, WorldPos};
use rand::{seq::SliceRandom, Rng};
use rand_chacha::ChaCha8Rng;

/// Upper bound on the carve stack depth. When the frontier reaches this
/// depth the connecting corridor is still opened but the target cell stays a
/// wall, so the carve truncates without erroring.
const MAX_CARVE_DEPTH: usize = 1000;

/// Smallest grid dimension that leaves room for the border plus one corridor.
const MIN_DIMENSION: u32 = 5;

/// Fallback cell size when the requested one cannot index the grid.
const MIN_CELL_SIZE: f32 = 1.0;

const FREQUENCY_BASE: f32 = 0.5;
const FREQUENCY_SPREAD: f32 = 1.5;

/// A wall cell whose solidity oscillates on its own clock.
struct Oscillator {
    cell: CellCoord,
    phase: f32,
    frequency: f32,
}

impl Oscillator {
    fn is_solid(&self) -> bool {
        self.phase.sin() > 0.0
    }
}

/// Carved grid of cells plus the oscillators backing its unstable walls.
pub(crate) struct Maze {
    columns: u32,
    rows: u32,
    cell_size: f32,
    cells: Vec<CellType>,
    oscillators: Vec<Oscillator>,
}

impl Maze {
    /// Generates a maze of the requested dimensions. Degenerate dimensions
    /// are clamped up to the smallest carvable grid, and a non-positive or
    /// non-finite cell size is clamped to the smallest usable one.
    pub(crate) fn generate(
        columns: u32,
        rows: u32,
        cell_size: f32,
        unstable_wall_chance: f32,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let columns = columns.max(MIN_DIMENSION);
        let rows = rows.max(MIN_DIMENSION);
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        let mut cells = vec![CellType::Wall; grid_len(columns, rows)];

        carve(&mut cells, columns, rows, rng);
        let mut oscillators = convert_unstable(&mut cells, columns, rows, unstable_wall_chance, rng);
        seal_border(&mut cells, columns, rows);
        oscillators.sort_by_key(|oscillator| (oscillator.cell.row(), oscillator.cell.column()));

        Self {
            columns,
            rows,
            cell_size,
            cells,
            oscillators,
        }
    }

    /// Advances every unstable-wall oscillator by the elapsed time.
    pub(crate) fn update(&mut self, dt: f32) {
        for oscillator in &mut self.oscillators {
            oscillator.phase += dt * oscillator.frequency;
        }
    }

    /// Reports whether the cell containing the world-space point is solid.
    /// Out-of-bounds points count as solid. `bypass` lets the caller pass
    /// through unstable walls regardless of their momentary state.
    pub(crate) fn is_wall_at(&self, x: f32, y: f32, bypass: bool) -> bool {
        if x < 0.0 || y < 0.0 {
            return true;
        }
        let column = (x / self.cell_size) as u32;
        let row = (y / self.cell_size) as u32;
        if column >= self.columns || row >= self.rows {
            return true;
        }
        match self.cells[cell_index(self.columns, column, row)] {
            CellType::Wall => true,
            CellType::Path => false,
            CellType::UnstableWall => !bypass && self.oscillator_solid(CellCoord::new(column, row)),
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub(crate) fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// World-space center of the provided cell.
    pub(crate) fn cell_center(&self, cell: CellCoord) -> WorldPos {
        WorldPos::new(
            cell.column() as f32 * self.cell_size + self.cell_size / 2.0,
            cell.row() as f32 * self.cell_size + self.cell_size / 2.0,
        )
    }

    /// Uniformly random center of a permanently open cell.
    pub(crate) fn random_path_position<R: Rng>(&self, rng: &mut R) -> Option<WorldPos> {
        self.path_cells()
            .choose(rng)
            .map(|cell| self.cell_center(*cell))
    }

    /// Every permanently open cell, in row-major order.
    pub(crate) fn path_cells(&self) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        for row in 0..self.rows {
            for column in 0..self.columns {
                if self.cells[cell_index(self.columns, column, row)] == CellType::Path {
                    cells.push(CellCoord::new(column, row));
                }
            }
        }
        cells
    }

    fn oscillator_solid(&self, cell: CellCoord) -> bool {
        let key = (cell.row(), cell.column());
        match self
            .oscillators
            .binary_search_by_key(&key, |oscillator| {
                (oscillator.cell.row(), oscillator.cell.column())
            }) {
            Ok(index) => self.oscillators[index].is_solid(),
            // An unstable cell without an oscillator defaults to solid.
            Err(_) => true,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cells(columns: u32, rows: u32, cell_size: f32, cells: Vec<CellType>) -> Self {
        assert_eq!(cells.len(), grid_len(columns, rows));
        Self {
            columns,
            rows,
            cell_size,
            cells,
            oscillators: Vec::new(),
        }
    }
}

fn grid_len(columns: u32, rows: u32) -> usize {
    columns as usize * rows as usize
}

fn cell_index(columns: u32, column: u32, row: u32) -> usize {
    row as usize * columns as usize + column as usize
}

fn shuffled_directions(rng: &mut ChaCha8Rng) -> [(i64, i64); 4] {
    let mut directions = [(0, -2), (2, 0), (0, 2), (-2, 0)];
    directions.shuffle(rng);
    directions
}

struct CarveFrame {
    cell: CellCoord,
    directions: [(i64, i64); 4],
    next: usize,
}

/// Iterative backtracking carve starting at (1, 1). Each frame holds its own
/// shuffled direction order so the walk matches a depth-first recursion.
fn carve(cells: &mut [CellType], columns: u32, rows: u32, rng: &mut ChaCha8Rng) {
    let start = CellCoord::new(1, 1);
    cells[cell_index(columns, start.column(), start.row())] = CellType::Path;

    let mut stack = vec![CarveFrame {
        cell: start,
        directions: shuffled_directions(rng),
        next: 0,
    }];

    while !stack.is_empty() {
        let top = stack.len() - 1;
        if stack[top].next >= stack[top].directions.len() {
            let _ = stack.pop();
            continue;
        }
        let (delta_column, delta_row) = stack[top].directions[stack[top].next];
        stack[top].next += 1;
        let cell = stack[top].cell;

        let Some(target) = cell.offset_by(delta_column, delta_row) else {
            continue;
        };
        let interior = target.column() > 0
            && target.column() < columns - 1
            && target.row() > 0
            && target.row() < rows - 1;
        if !interior {
            continue;
        }
        if cells[cell_index(columns, target.column(), target.row())] != CellType::Wall {
            continue;
        }

        let Some(midpoint) = cell.offset_by(delta_column / 2, delta_row / 2) else {
            continue;
        };
        cells[cell_index(columns, midpoint.column(), midpoint.row())] = CellType::Path;

        if stack.len() <= MAX_CARVE_DEPTH {
            cells[cell_index(columns, target.column(), target.row())] = CellType::Path;
            stack.push(CarveFrame {
                cell: target,
                directions: shuffled_directions(rng),
                next: 0,
            });
        }
    }
}

/// Converts eligible interior walls into unstable walls. A wall qualifies
/// only when exactly two of its orthogonal neighbors are open corridor.
fn convert_unstable(
    cells: &mut [CellType],
    columns: u32,
    rows: u32,
    chance: f32,
    rng: &mut ChaCha8Rng,
) -> Vec<Oscillator> {
    let mut oscillators = Vec::new();
    for row in 1..rows - 1 {
        for column in 1..columns - 1 {
            let index = cell_index(columns, column, row);
            if cells[index] != CellType::Wall {
                continue;
            }
            if rng.gen::<f32>() >= chance {
                continue;
            }
            let cell = CellCoord::new(column, row);
            if orthogonal_path_neighbors(cells, columns, rows, cell) != 2 {
                continue;
            }
            cells[index] = CellType::UnstableWall;
            oscillators.push(Oscillator {
                cell,
                phase: rng.gen::<f32>() * std::f32::consts::TAU,
                frequency: FREQUENCY_BASE + rng.gen::<f32>() * FREQUENCY_SPREAD,
            });
        }
    }
    oscillators
}

fn orthogonal_path_neighbors(cells: &[CellType], columns: u32, rows: u32, cell: CellCoord) -> usize {
    let mut count = 0;
    for (delta_column, delta_row) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
        let Some(neighbor) = cell.offset_by(delta_column, delta_row) else {
            continue;
        };
        if neighbor.column() >= columns || neighbor.row() >= rows {
            continue;
        }
        if cells[cell_index(columns, neighbor.column(), neighbor.row())] == CellType::Path {
            count += 1;
        }
    }
    count
}

fn seal_border(cells: &mut [CellType], columns: u32, rows: u32) {
    for column in 0..columns {
        cells[cell_index(columns, column, 0)] = CellType::Wall;
        cells[cell_index(columns, column, rows - 1)] = CellType::Wall;
    }
    for row in 0..rows {
        cells[cell_index(columns, 0, row)] = CellType::Wall;
        cells[cell_index(columns, columns - 1, row)] = CellType::Wall;
    }
}
