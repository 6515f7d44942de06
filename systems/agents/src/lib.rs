#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planning system that steers the pursuit agents.
//!
//! The system never mutates world state. It watches the event stream, reads
//! the immutable snapshot views, and answers with [`Command::SetAgentPath`]
//! and [`Command::SetAgentHeading`] batches. All randomness comes from a
//! seeded generator owned by the system, so identical inputs always produce
//! identical command batches.

use std::time::Duration;

use glam::Vec2;
use quantum_maze_core::{
    AgentId, AgentKind, AgentMode, AgentSnapshot, AgentView, CellCoord, Command, Direction, Event,
    PlayerSnapshot, QubitView, TopologyView, WorldPos,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scatter anchors sit this many cell widths in from each maze corner.
const SCATTER_INSET_CELLS: f32 = 2.5;
/// Advance rate of the guardian orbit wobble.
const WOBBLE_RATE: f32 = 8.0;
/// Radius of the guardian idle orbit around its patrol anchor.
const ORBIT_DISTANCE: f32 = 30.0;

/// Tunables consumed by [`Steering`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Seed for the system's own random number generator.
    pub rng_seed: u64,
    /// Cadence at which cached paths are recomputed.
    pub recompute_interval: Duration,
    /// Upper bound on the number of cells in one planned path.
    pub max_path_steps: usize,
    /// Distance of the flee target projected away from the player.
    pub flee_distance: f32,
    /// Cadence at which rovers pick a fresh heading.
    pub rover_turn_interval: Duration,
}

impl Config {
    /// Creates a configuration with the standard cadences and the given seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            recompute_interval: Duration::from_secs(1),
            max_path_steps: 20,
            flee_distance: 100.0,
            rover_turn_interval: Duration::from_secs(2),
        }
    }
}

#[derive(Clone, Copy)]
struct AgentEntry {
    id: AgentId,
    recompute: f32,
    turn: f32,
    wobble: f32,
}

/// Stateful planner that turns world events into steering commands.
pub struct Steering {
    config: Config,
    rng: ChaCha8Rng,
    entries: Vec<AgentEntry>,
}

impl Steering {
    /// Creates a steering system seeded from the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            entries: Vec::new(),
        }
    }

    /// Reacts to one batch of world events.
    pub fn handle(
        &mut self,
        events: &[Event],
        topology: &TopologyView<'_>,
        player: &PlayerSnapshot,
        agents: &AgentView,
        qubits: &QubitView,
        out_commands: &mut Vec<Command>,
    ) {
        self.sync_entries(agents);

        let mut dt = 0.0_f32;
        let mut force_all = false;
        let mut forced: Vec<AgentId> = Vec::new();
        let mut blocked: Vec<AgentId> = Vec::new();
        for event in events {
            match event {
                Event::TimeAdvanced { dt: step } => dt += step.as_secs_f32(),
                Event::ModeChanged { .. }
                | Event::FrightenedStarted { .. }
                | Event::FrightenedEnded { .. } => force_all = true,
                Event::AgentPathNeeded { agent } => forced.push(*agent),
                Event::AgentBlocked { agent } => blocked.push(*agent),
                _ => {}
            }
        }

        let recompute_interval = self.config.recompute_interval.as_secs_f32();
        let turn_interval = self.config.rover_turn_interval.as_secs_f32();
        let snapshots: Vec<AgentSnapshot> = agents.iter().cloned().collect();

        for (index, snapshot) in snapshots.iter().enumerate() {
            if snapshot.captured {
                continue;
            }
            let frightened = snapshot.mode == AgentMode::Frightened;
            {
                let entry = &mut self.entries[index];
                entry.wobble += dt * WOBBLE_RATE;
                entry.recompute -= dt;
                if force_all || forced.contains(&snapshot.id) {
                    entry.recompute = 0.0;
                }
            }

            if snapshot.kind == AgentKind::Rover && !frightened {
                // Rovers ignore the path recompute cadence; only the turn
                // timer and wall contact re-roll their heading.
                let must_turn = {
                    let slot = &mut self.entries[index];
                    slot.turn -= dt;
                    slot.turn <= 0.0 || blocked.contains(&snapshot.id)
                };
                if must_turn {
                    let heading =
                        choose_heading(&mut self.rng, topology, snapshot.cell, snapshot.heading);
                    out_commands.push(Command::SetAgentHeading {
                        agent: snapshot.id,
                        direction: heading,
                    });
                    self.entries[index].turn = turn_interval;
                }
                continue;
            }

            if self.entries[index].recompute <= 0.0 || snapshot.path_len == 0 {
                let target = self.select_target(snapshot, index, player, qubits, topology);
                let waypoints = plan_path(
                    &mut self.rng,
                    topology,
                    snapshot.cell,
                    target,
                    self.config.max_path_steps,
                );
                out_commands.push(Command::SetAgentPath {
                    agent: snapshot.id,
                    waypoints,
                });
                self.entries[index].recompute = recompute_interval;
            }
        }
    }

    fn sync_entries(&mut self, agents: &AgentView) {
        let previous = std::mem::take(&mut self.entries);
        for snapshot in agents.iter() {
            let entry = previous
                .iter()
                .copied()
                .find(|entry| entry.id == snapshot.id)
                .unwrap_or(AgentEntry {
                    id: snapshot.id,
                    recompute: 0.0,
                    turn: 0.0,
                    wobble: self.rng.gen::<f32>() * std::f32::consts::TAU,
                });
            self.entries.push(entry);
        }
    }

    fn select_target(
        &self,
        snapshot: &AgentSnapshot,
        index: usize,
        player: &PlayerSnapshot,
        qubits: &QubitView,
        topology: &TopologyView<'_>,
    ) -> WorldPos {
        if snapshot.mode == AgentMode::Frightened {
            return flee_target(snapshot.position, player.position, self.config.flee_distance);
        }
        match snapshot.kind {
            AgentKind::Pursuer => match snapshot.mode {
                AgentMode::Chase => player.position,
                _ => scatter_corner(topology, snapshot.id),
            },
            AgentKind::Guardian => {
                let anchor = snapshot
                    .patrol
                    .map(|patrol| (vec(patrol.center), patrol.radius))
                    .unwrap_or((vec(snapshot.position), 0.0));
                if snapshot.mode == AgentMode::Chase {
                    let mut nearest: Option<(Vec2, f32)> = None;
                    for qubit in qubits.iter() {
                        if qubit.collected {
                            continue;
                        }
                        let separation = vec(qubit.position).distance(anchor.0);
                        if separation < anchor.1
                            && nearest.map_or(true, |(_, best)| separation < best)
                        {
                            nearest = Some((vec(qubit.position), separation));
                        }
                    }
                    if let Some((position, _)) = nearest {
                        return pos(position);
                    }
                    let angle = self.entries[index].wobble.sin() * std::f32::consts::PI;
                    return pos(anchor.0 + Vec2::new(angle.cos(), angle.sin()) * ORBIT_DISTANCE);
                }
                pos(anchor.0)
            }
            // Frightened rovers are handled above; this arm only feeds the
            // fallback planner when a rover is explicitly given a path.
            AgentKind::Rover => player.position,
        }
    }
}

/// Bounded greedy walk toward the cell under `target`. Prefers the diagonal
/// step whose components point at the target, falling back to a shuffled
/// orthogonal step, and gives up early in dead ends.
fn plan_path(
    rng: &mut ChaCha8Rng,
    topology: &TopologyView<'_>,
    from: CellCoord,
    target: WorldPos,
    max_steps: usize,
) -> Vec<WorldPos> {
    let goal = topology.clamped_cell_at(target);
    let mut current = from;
    let mut waypoints = Vec::new();
    for _ in 0..max_steps {
        if current == goal {
            break;
        }
        let delta_column = i64::from(goal.column()) - i64::from(current.column());
        let delta_row = i64::from(goal.row()) - i64::from(current.row());
        let preferred = current.offset_by(delta_column.signum(), delta_row.signum());
        if let Some(next) = preferred.filter(|cell| topology.is_traversable(*cell)) {
            current = next;
            waypoints.push(topology.cell_center(next));
            continue;
        }

        let mut deltas = [(0, 1), (1, 0), (0, -1), (-1, 0)];
        deltas.shuffle(rng);
        let mut stepped = false;
        for (fallback_column, fallback_row) in deltas {
            let Some(next) = current.offset_by(fallback_column, fallback_row) else {
                continue;
            };
            if topology.is_traversable(next) {
                current = next;
                waypoints.push(topology.cell_center(next));
                stepped = true;
                break;
            }
        }
        if !stepped {
            break;
        }
    }
    waypoints
}

/// Picks a travel heading that avoids an immediate reversal and leads into a
/// traversable neighbor whenever one exists.
fn choose_heading(
    rng: &mut ChaCha8Rng,
    topology: &TopologyView<'_>,
    cell: CellCoord,
    current: Direction,
) -> Direction {
    let open: Vec<Direction> = Direction::ALL
        .iter()
        .copied()
        .filter(|direction| *direction != current.opposite())
        .filter(|direction| {
            let (delta_column, delta_row) = direction.offset();
            cell.offset_by(delta_column, delta_row)
                .is_some_and(|neighbor| topology.is_traversable(neighbor))
        })
        .collect();
    if let Some(direction) = open.choose(rng) {
        return *direction;
    }
    let reverse = current.opposite();
    let (delta_column, delta_row) = reverse.offset();
    if cell
        .offset_by(delta_column, delta_row)
        .is_some_and(|neighbor| topology.is_traversable(neighbor))
    {
        reverse
    } else {
        current
    }
}

fn flee_target(position: WorldPos, player: WorldPos, distance: f32) -> WorldPos {
    let away = vec(position) - vec(player);
    if away.length_squared() <= f32::EPSILON {
        return position;
    }
    pos(vec(position) + away.normalize() * distance)
}

fn scatter_corner(topology: &TopologyView<'_>, id: AgentId) -> WorldPos {
    let inset = SCATTER_INSET_CELLS * topology.cell_size();
    let width = topology.width();
    let height = topology.height();
    let corners = [
        WorldPos::new(inset, inset),
        WorldPos::new(width - inset, inset),
        WorldPos::new(width - inset, height - inset),
        WorldPos::new(inset, height - inset),
    ];
    corners[(id.get() as usize) % corners.len()]
}

fn vec(value: WorldPos) -> Vec2 {
    Vec2::new(value.x(), value.y())
}

fn pos(value: Vec2) -> WorldPos {
    WorldPos::new(value.x, value.y)
}

#[cfg(test)]
mod tests {
    use super::{choose_heading, flee_target, plan_path, scatter_corner};
    use quantum_maze_core::{AgentId, CellCoord, CellType, Direction, TopologyView, WorldPos};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // 5x5 grid with an open plus-shaped corridor through the middle.
    fn open_cross() -> Vec<CellType> {
        let mut cells = vec![CellType::Wall; 25];
        for index in [7, 11, 12, 13, 17] {
            cells[index] = CellType::Path;
        }
        cells
    }

    #[test]
    fn plan_path_walks_straight_down_an_open_row() {
        let cells = open_cross();
        let topology = TopologyView::new(&cells, 5, 5, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let waypoints = plan_path(
            &mut rng,
            &topology,
            CellCoord::new(1, 2),
            topology.cell_center(CellCoord::new(3, 2)),
            20,
        );
        assert_eq!(
            waypoints,
            vec![
                topology.cell_center(CellCoord::new(2, 2)),
                topology.cell_center(CellCoord::new(3, 2)),
            ]
        );
    }

    #[test]
    fn plan_path_is_bounded_by_the_step_budget() {
        let mut cells = vec![CellType::Wall; 100];
        for column in 0..10 {
            cells[5 * 10 + column] = CellType::Path;
        }
        let topology = TopologyView::new(&cells, 10, 10, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let waypoints = plan_path(
            &mut rng,
            &topology,
            CellCoord::new(0, 5),
            topology.cell_center(CellCoord::new(9, 5)),
            3,
        );
        assert_eq!(waypoints.len(), 3);
    }

    #[test]
    fn choose_heading_never_reverses_when_another_exit_exists() {
        let cells = open_cross();
        let topology = TopologyView::new(&cells, 5, 5, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..32 {
            let heading = choose_heading(&mut rng, &topology, CellCoord::new(2, 2), Direction::East);
            assert_ne!(heading, Direction::West);
        }
    }

    #[test]
    fn choose_heading_reverses_out_of_a_dead_end() {
        // Corridor cell with a single exit back the way the rover came.
        let mut cells = vec![CellType::Wall; 25];
        cells[12] = CellType::Path;
        cells[11] = CellType::Path;
        let topology = TopologyView::new(&cells, 5, 5, 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let heading = choose_heading(&mut rng, &topology, CellCoord::new(2, 2), Direction::East);
        assert_eq!(heading, Direction::West);
    }

    #[test]
    fn flee_target_points_away_from_the_player() {
        let target = flee_target(WorldPos::new(50.0, 50.0), WorldPos::new(40.0, 50.0), 100.0);
        assert_eq!(target, WorldPos::new(150.0, 50.0));

        let overlapping = flee_target(WorldPos::new(50.0, 50.0), WorldPos::new(50.0, 50.0), 100.0);
        assert_eq!(overlapping, WorldPos::new(50.0, 50.0));
    }

    #[test]
    fn scatter_corners_cycle_by_identifier() {
        let cells = vec![CellType::Path; 16];
        let topology = TopologyView::new(&cells, 4, 4, 20.0);
        assert_eq!(
            scatter_corner(&topology, AgentId::new(0)),
            WorldPos::new(50.0, 50.0)
        );
        assert_eq!(
            scatter_corner(&topology, AgentId::new(4)),
            scatter_corner(&topology, AgentId::new(0))
        );
        assert_eq!(
            scatter_corner(&topology, AgentId::new(2)),
            WorldPos::new(30.0, 30.0)
        );
    }
}
