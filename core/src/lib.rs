#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quantum Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{Config, Difficulty};

/// Classification of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Permanently solid cell.
    Wall,
    /// Permanently traversable corridor cell.
    Path,
    /// Wall whose solidity oscillates over time.
    UnstableWall,
}

/// Cardinal movement directions available to mobile entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row delta produced by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Behavior variant assigned to a pursuit agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Tracks the player directly while chasing.
    Pursuer,
    /// Moves in straight lines and turns at obstacles.
    Rover,
    /// Defends collectibles around a fixed patrol anchor.
    Guardian,
}

/// Global phase alternated by the session-wide mode timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModePhase {
    /// Agents pursue their chase targets.
    Chase,
    /// Agents retreat toward their scatter anchors.
    Scatter,
}

impl ModePhase {
    /// The phase the mode timer switches to next.
    #[must_use]
    pub const fn toggled(self) -> ModePhase {
        match self {
            ModePhase::Chase => ModePhase::Scatter,
            ModePhase::Scatter => ModePhase::Chase,
        }
    }
}

/// Effective mode observed on an individual agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentMode {
    /// Following the global chase phase.
    Chase,
    /// Following the global scatter phase.
    Scatter,
    /// Fleeing and capturable for the remainder of the frightened window.
    Frightened,
}

/// Kinds of power-ups that can appear in the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Grants passage through unstable walls.
    Superposition,
    /// Grants the capture capability and frightens agents.
    Measurement,
    /// Frightens agents for an extended window.
    Entanglement,
}

impl PowerUpKind {
    /// Every power-up kind in spawn-selection order.
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Superposition,
        PowerUpKind::Measurement,
        PowerUpKind::Entanglement,
    ];

    /// Duration of the capability granted on collection.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            PowerUpKind::Superposition => Duration::from_secs(8),
            PowerUpKind::Measurement => Duration::from_secs(5),
            PowerUpKind::Entanglement => Duration::from_secs(10),
        }
    }

    /// Points awarded when the power-up is collected.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            PowerUpKind::Superposition => 50,
            PowerUpKind::Measurement => 75,
            PowerUpKind::Entanglement => 100,
        }
    }
}

/// Unique identifier assigned to an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a qubit collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(u32);

impl QubitId {
    /// Creates a new qubit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Cell reached by applying the provided column and row deltas, when it
    /// stays within unsigned bounds.
    #[must_use]
    pub fn offset_by(self, delta_column: i64, delta_row: i64) -> Option<CellCoord> {
        let column = i64::from(self.column).checked_add(delta_column)?;
        let row = i64::from(self.row).checked_add(delta_row)?;
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// Continuous world-space position measured in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    x: f32,
    y: f32,
}

impl WorldPos {
    /// Creates a new world-space position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: WorldPos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the maze and repopulates every entity collection.
    ConfigureSession {
        /// Number of cell columns in the generated maze.
        columns: u32,
        /// Number of cell rows in the generated maze.
        rows: u32,
        /// Numeric tunables applied to the new session.
        config: Config,
        /// Seed for all world-side randomness in the session.
        seed: u64,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates the player's movement intent vector.
    SetPlayerIntent {
        /// Horizontal intent component, clamped to `[-1, 1]`.
        x: f32,
        /// Vertical intent component, clamped to `[-1, 1]`.
        y: f32,
    },
    /// Assigns a freshly planned waypoint path to an agent.
    SetAgentPath {
        /// Identifier of the agent receiving the path.
        agent: AgentId,
        /// Cell-center waypoints in travel order.
        waypoints: Vec<WorldPos>,
    },
    /// Assigns a travel heading to an agent, clearing any waypoint path.
    SetAgentHeading {
        /// Identifier of the agent receiving the heading.
        agent: AgentId,
        /// Direction the agent should travel until blocked.
        direction: Direction,
    },
    /// Requests placement of a power-up on the provided path cell.
    SpawnPowerUp {
        /// Cell that should receive the power-up.
        cell: CellCoord,
        /// Kind of power-up to place.
        kind: PowerUpKind,
    },
    /// Puts every non-captured agent into the frightened mode.
    ActivateFrightened {
        /// Length of the frightened window.
        duration: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new session was generated.
    SessionConfigured {
        /// Number of cell columns in the generated maze.
        columns: u32,
        /// Number of cell rows in the generated maze.
        rows: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the global chase/scatter phase toggled.
    ModeChanged {
        /// Phase that became active.
        phase: ModePhase,
    },
    /// Announces that the frightened window opened.
    FrightenedStarted {
        /// Length of the frightened window.
        duration: Duration,
    },
    /// Announces that the frightened window expired.
    FrightenedEnded {
        /// Global phase agents reverted to.
        phase: ModePhase,
    },
    /// Requests that the planning system compute a path for an agent.
    AgentPathNeeded {
        /// Identifier of the agent awaiting a path.
        agent: AgentId,
    },
    /// Reports that an agent's movement was fully blocked this tick.
    AgentBlocked {
        /// Identifier of the blocked agent.
        agent: AgentId,
    },
    /// Confirms that an agent was captured.
    AgentCaptured {
        /// Identifier of the captured agent.
        agent: AgentId,
        /// Indicates capture through an entanglement link rather than contact.
        by_entanglement: bool,
    },
    /// Reports that the player was hit by a hostile agent.
    PlayerHit {
        /// Lives remaining after the hit.
        lives_remaining: u32,
    },
    /// Reports that the player ran out of lives.
    PlayerDefeated,
    /// Confirms that the player traveled through a teleporter pair.
    PlayerTeleported {
        /// Position the player left.
        from: WorldPos,
        /// Position the player arrived at.
        to: WorldPos,
    },
    /// Confirms that a qubit was collected.
    QubitCollected {
        /// Identifier of the collected qubit.
        qubit: QubitId,
        /// Points awarded for the collection.
        points: u32,
    },
    /// Announces that the first qubit of an entangled pair was collected.
    EntanglementWindowOpened {
        /// Partner qubit that must be collected before the window closes.
        partner: QubitId,
        /// Length of the bonus window.
        window: Duration,
    },
    /// Confirms that an entangled pair was completed within the window.
    EntanglementBonus {
        /// Qubit that completed the pair.
        qubit: QubitId,
        /// Bonus points awarded on top of the qubit's own value.
        points: u32,
    },
    /// Announces that the entanglement bonus window lapsed unfulfilled.
    EntanglementWindowExpired,
    /// Confirms that a power-up was placed into the maze.
    PowerUpSpawned {
        /// Identifier assigned to the power-up.
        id: PowerUpId,
        /// Cell occupied by the power-up.
        cell: CellCoord,
        /// Kind of power-up that was placed.
        kind: PowerUpKind,
    },
    /// Confirms that the player collected a power-up.
    PowerUpCollected {
        /// Kind of power-up that was collected.
        kind: PowerUpKind,
        /// Points awarded for the collection.
        points: u32,
    },
    /// Announces that every qubit in the session was collected.
    LevelCleared,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous position of the player.
    pub position: WorldPos,
    /// Grid cell containing the player.
    pub cell: CellCoord,
    /// Lives remaining in the session.
    pub lives: u32,
    /// Indicates the unstable-wall bypass capability is active.
    pub has_phase_bypass: bool,
    /// Indicates the capture capability is active.
    pub has_capture: bool,
}

/// Patrol assignment carried by guardian agents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patrol {
    /// Center of the patrolled area.
    pub center: WorldPos,
    /// Radius of the patrolled area in world units.
    pub radius: f32,
}

/// Immutable representation of a single agent's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Unique identifier assigned to the agent.
    pub id: AgentId,
    /// Behavior variant assigned at spawn.
    pub kind: AgentKind,
    /// Effective mode the agent currently follows.
    pub mode: AgentMode,
    /// Continuous position of the agent.
    pub position: WorldPos,
    /// Grid cell containing the agent.
    pub cell: CellCoord,
    /// Current travel heading.
    pub heading: Direction,
    /// Number of waypoints remaining in the assigned path.
    pub path_len: usize,
    /// Indicates the agent was captured and no longer updates.
    pub captured: bool,
    /// Patrol assignment, present on guardians only.
    pub patrol: Option<Patrol>,
}

/// Read-only snapshot describing all agents within the maze.
#[derive(Clone, Debug, Default)]
pub struct AgentView {
    snapshots: Vec<AgentSnapshot>,
}

impl AgentView {
    /// Creates a new agent view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AgentSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured agent snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AgentSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single qubit's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QubitSnapshot {
    /// Unique identifier assigned to the qubit.
    pub id: QubitId,
    /// Continuous position of the qubit.
    pub position: WorldPos,
    /// Grid cell containing the qubit.
    pub cell: CellCoord,
    /// Indicates the qubit was already collected.
    pub collected: bool,
    /// Points awarded on collection.
    pub points: u32,
    /// Entanglement partner, if the qubit belongs to a pair.
    pub partner: Option<QubitId>,
}

/// Read-only snapshot describing all qubits within the maze.
#[derive(Clone, Debug, Default)]
pub struct QubitView {
    snapshots: Vec<QubitSnapshot>,
}

impl QubitView {
    /// Creates a new qubit view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<QubitSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured qubit snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &QubitSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<QubitSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single power-up used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpSnapshot {
    /// Unique identifier assigned to the power-up.
    pub id: PowerUpId,
    /// Kind of power-up.
    pub kind: PowerUpKind,
    /// Continuous position of the power-up.
    pub position: WorldPos,
    /// Grid cell containing the power-up.
    pub cell: CellCoord,
    /// Indicates the power-up was already collected.
    pub collected: bool,
}

/// Read-only snapshot describing all power-ups within the maze.
#[derive(Clone, Debug, Default)]
pub struct PowerUpView {
    snapshots: Vec<PowerUpSnapshot>,
}

impl PowerUpView {
    /// Creates a new power-up view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PowerUpSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured power-up snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerUpSnapshot> {
        self.snapshots.iter()
    }

    /// Number of uncollected power-ups in the view.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| !snapshot.collected)
            .count()
    }
}

/// Immutable representation of one end of a teleporter pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalSnapshot {
    /// Continuous position of the portal.
    pub position: WorldPos,
    /// Grid cell containing the portal.
    pub cell: CellCoord,
    /// Time remaining until the portal accepts travelers again.
    pub cooldown_remaining: Duration,
}

/// Snapshot of the global mode controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeSnapshot {
    /// Current global chase/scatter phase.
    pub phase: ModePhase,
    /// Indicates the frightened window is open.
    pub frightened: bool,
}

/// Read-only view into the maze's carved topology.
///
/// The view deliberately ignores unstable-wall solidity: planning code sees
/// every non-wall cell as traversable and leaves momentary solidity to the
/// collision resolver.
#[derive(Clone, Copy, Debug)]
pub struct TopologyView<'a> {
    cells: &'a [CellType],
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl<'a> TopologyView<'a> {
    /// Captures a new topology view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellType], columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            cells,
            columns,
            rows,
            cell_size,
        }
    }

    /// Number of cell columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total width of the maze in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the maze in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Classification of the provided cell, if it lies within the maze.
    #[must_use]
    pub fn cell_type(&self, cell: CellCoord) -> Option<CellType> {
        self.index(cell).and_then(|index| self.cells.get(index)).copied()
    }

    /// Reports whether planning may route through the provided cell.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        matches!(
            self.cell_type(cell),
            Some(CellType::Path) | Some(CellType::UnstableWall)
        )
    }

    /// Grid cell containing the provided world-space position.
    #[must_use]
    pub fn cell_at(&self, position: WorldPos) -> Option<CellCoord> {
        if position.x() < 0.0 || position.y() < 0.0 || self.cell_size <= 0.0 {
            return None;
        }
        let column = (position.x() / self.cell_size) as u32;
        let row = (position.y() / self.cell_size) as u32;
        let cell = CellCoord::new(column, row);
        if column < self.columns && row < self.rows {
            Some(cell)
        } else {
            None
        }
    }

    /// World-space center of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPos {
        WorldPos::new(
            cell.column() as f32 * self.cell_size + self.cell_size / 2.0,
            cell.row() as f32 * self.cell_size + self.cell_size / 2.0,
        )
    }

    /// Clamps an arbitrary world-space position to the nearest in-bounds cell.
    #[must_use]
    pub fn clamped_cell_at(&self, position: WorldPos) -> CellCoord {
        if self.columns == 0 || self.rows == 0 || self.cell_size <= 0.0 {
            return CellCoord::new(0, 0);
        }
        let column = (position.x() / self.cell_size).floor();
        let row = (position.y() / self.cell_size).floor();
        let column = column.clamp(0.0, (self.columns - 1) as f32) as u32;
        let row = row.clamp(0.0, (self.rows - 1) as f32) as u32;
        CellCoord::new(column, row)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AgentId, CellCoord, CellType, Config, Direction, PowerUpKind, QubitId, TopologyView,
        WorldPos,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn offset_by_rejects_out_of_range_deltas() {
        let origin = CellCoord::new(0, 2);
        assert_eq!(origin.offset_by(-1, 0), None);
        assert_eq!(origin.offset_by(2, -2), Some(CellCoord::new(2, 0)));
    }

    #[test]
    fn direction_opposites_are_symmetric() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            let (dx, dy) = direction.offset();
            let (ox, oy) = direction.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn power_up_durations_match_specification() {
        assert_eq!(
            PowerUpKind::Superposition.duration(),
            Duration::from_secs(8)
        );
        assert_eq!(PowerUpKind::Measurement.duration(), Duration::from_secs(5));
        assert_eq!(
            PowerUpKind::Entanglement.duration(),
            Duration::from_secs(10)
        );
        assert_eq!(PowerUpKind::Measurement.points(), 75);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&AgentId::new(7));
        assert_round_trip(&QubitId::new(11));
        assert_round_trip(&CellCoord::new(5, 9));
        assert_round_trip(&PowerUpKind::Entanglement);
    }

    #[test]
    fn config_round_trips_through_bincode() {
        assert_round_trip(&Config::default());
    }

    #[test]
    fn world_pos_round_trips_through_bincode() {
        assert_round_trip(&WorldPos::new(12.5, -3.25));
    }

    #[test]
    fn topology_view_translates_positions_and_cells() {
        let cells = vec![
            CellType::Wall,
            CellType::Wall,
            CellType::Wall,
            CellType::Wall,
            CellType::Path,
            CellType::UnstableWall,
            CellType::Wall,
            CellType::Wall,
            CellType::Wall,
        ];
        let view = TopologyView::new(&cells, 3, 3, 10.0);

        assert_eq!(view.cell_type(CellCoord::new(1, 1)), Some(CellType::Path));
        assert!(view.is_traversable(CellCoord::new(2, 1)));
        assert!(!view.is_traversable(CellCoord::new(0, 0)));
        assert_eq!(
            view.cell_at(WorldPos::new(15.0, 15.0)),
            Some(CellCoord::new(1, 1))
        );
        assert_eq!(view.cell_at(WorldPos::new(-1.0, 5.0)), None);
        assert_eq!(view.cell_center(CellCoord::new(1, 1)), WorldPos::new(15.0, 15.0));
        assert_eq!(
            view.clamped_cell_at(WorldPos::new(500.0, -4.0)),
            CellCoord::new(2, 0)
        );
    }
}
