//! Axis-decoupled displacement resolution shared by the player and agents.

use glam::Vec2;

use crate::maze::Maze;

/// Distance probed along the perpendicular axis when hugging a wall.
const SLIDE_PROBE: f32 = 3.0;
/// Fraction of the probe distance actually applied as the slide nudge.
const SLIDE_FRACTION: f32 = 0.3;

/// Outcome of resolving one displacement against the maze.
pub(crate) struct Resolution {
    /// Final position, never inside a solid cell.
    pub(crate) position: Vec2,
    /// Set when both axes were rejected and the mover should shed momentum.
    pub(crate) blocked: bool,
}

/// Resolves a single-tick displacement. The full vector is attempted first,
/// then each axis alone with a small perpendicular slide nudge toward the
/// rejected component, so movers round corners instead of sticking to them.
pub(crate) fn resolve(maze: &Maze, position: Vec2, displacement: Vec2, bypass: bool) -> Resolution {
    let target = position + displacement;

    if !maze.is_wall_at(target.x, target.y, bypass) {
        return Resolution {
            position: target,
            blocked: false,
        };
    }

    if displacement.x != 0.0 && !maze.is_wall_at(target.x, position.y, bypass) {
        let mut resolved = Vec2::new(target.x, position.y);
        if displacement.y > 0.0 && !maze.is_wall_at(target.x, position.y + SLIDE_PROBE, bypass) {
            resolved.y = position.y + SLIDE_PROBE * SLIDE_FRACTION;
        } else if displacement.y < 0.0
            && !maze.is_wall_at(target.x, position.y - SLIDE_PROBE, bypass)
        {
            resolved.y = position.y - SLIDE_PROBE * SLIDE_FRACTION;
        }
        return Resolution {
            position: resolved,
            blocked: false,
        };
    }

    if displacement.y != 0.0 && !maze.is_wall_at(position.x, target.y, bypass) {
        let mut resolved = Vec2::new(position.x, target.y);
        if displacement.x > 0.0 && !maze.is_wall_at(position.x + SLIDE_PROBE, target.y, bypass) {
            resolved.x = position.x + SLIDE_PROBE * SLIDE_FRACTION;
        } else if displacement.x < 0.0
            && !maze.is_wall_at(position.x - SLIDE_PROBE, target.y, bypass)
        {
            resolved.x = position.x - SLIDE_PROBE * SLIDE_FRACTION;
        }
        return Resolution {
            position: resolved,
            blocked: false,
        };
    }

    Resolution { position, blocked: true }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::maze::Maze;
    use glam::Vec2;
    use quantum_maze_core::CellType;

    // 5x3 grid, 10-unit cells: a single horizontal corridor along row 1.
    fn corridor() -> Maze {
        let mut cells = vec![CellType::Wall; 15];
        for column in 1..4 {
            cells[5 + column] = CellType::Path;
        }
        Maze::from_cells(5, 3, 10.0, cells)
    }

    #[test]
    fn free_displacement_is_applied_in_full() {
        let maze = corridor();
        let outcome = resolve(&maze, Vec2::new(15.0, 15.0), Vec2::new(4.0, 0.0), false);
        assert_eq!(outcome.position, Vec2::new(19.0, 15.0));
        assert!(!outcome.blocked);
    }

    #[test]
    fn diagonal_into_a_wall_keeps_the_open_axis() {
        let maze = corridor();
        let outcome = resolve(&maze, Vec2::new(15.0, 15.0), Vec2::new(4.0, -9.0), false);
        assert_eq!(outcome.position.x, 19.0);
        assert!(!outcome.blocked);
        assert!(!maze.is_wall_at(outcome.position.x, outcome.position.y, false));
    }

    #[test]
    fn fully_blocked_displacement_reports_blocked() {
        let maze = corridor();
        let outcome = resolve(&maze, Vec2::new(15.0, 15.0), Vec2::new(0.0, -9.0), false);
        assert_eq!(outcome.position, Vec2::new(15.0, 15.0));
        assert!(outcome.blocked);
    }

    #[test]
    fn resolved_positions_never_land_in_walls() {
        let maze = corridor();
        let mut position = Vec2::new(15.0, 15.0);
        let probes = [
            Vec2::new(3.0, 3.0),
            Vec2::new(-2.0, -6.0),
            Vec2::new(8.0, 1.0),
            Vec2::new(0.5, -8.0),
            Vec2::new(-9.0, 4.0),
        ];
        for displacement in probes {
            let outcome = resolve(&maze, position, displacement, false);
            assert!(!maze.is_wall_at(outcome.position.x, outcome.position.y, false));
            position = outcome.position;
        }
    }
}
