//! Game state and core simulation types
//!
//! `GameState` is the single owner of every entity. The other sim modules
//! receive borrowed slices of it and mutate only what they are handed.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{food, grid};
use super::snapshot::Snapshot;
use crate::config::GameConfig;
use crate::consts::*;
use crate::error::SimError;

/// A grid cell, `0 <= x, y < tile_count` while on the board
pub type Cell = IVec2;

/// Direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Zero vector: the snake holds still and no collision checks run
    Idle,
}

impl Direction {
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit grid vector (y grows downward)
    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::Idle => IVec2::ZERO,
        }
    }

    /// Parse a `{x, y}` request; only the four unit vectors and zero are valid
    pub fn from_vector(v: IVec2) -> Option<Self> {
        match (v.x, v.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (0, 0) => Some(Direction::Idle),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Idle => Direction::Idle,
        }
    }

    pub fn is_idle(self) -> bool {
        self == Direction::Idle
    }
}

/// How zones are dropped behind the tail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePattern {
    /// Every 4th move, sparse and forgiving
    Alternate,
    /// Every 3rd move, with a high-danger zone every 15th move
    Continuous,
    /// Probabilistic, scaled by difficulty
    Random,
}

impl ZonePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZonePattern::Alternate => "alternate",
            ZonePattern::Continuous => "continuous",
            ZonePattern::Random => "random",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DangerLevel {
    #[default]
    Normal,
    /// Lives 1.5x longer and kills regardless of opacity
    High,
}

/// A forbidden cell left behind by the tail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub cell: Cell,
    pub created_at: f64,
    /// Base lifetime in ms (shrunk by the slow-decay power-up)
    pub duration: f64,
    pub danger: DangerLevel,
    pub opacity: f32,
    /// Render flash for freshly created zones
    pub is_new: bool,
}

impl Zone {
    pub fn new(cell: Cell, created_at: f64, duration: f64, danger: DangerLevel) -> Self {
        Self {
            cell,
            created_at,
            duration,
            danger,
            opacity: ZONE_INITIAL_OPACITY,
            is_new: true,
        }
    }

    /// Lifetime after the danger-level bonus
    pub fn effective_duration(&self) -> f64 {
        match self.danger {
            DangerLevel::High => self.duration * HIGH_DANGER_DURATION_FACTOR,
            DangerLevel::Normal => self.duration,
        }
    }

    /// High-danger zones always kill; normal ones only while still solid
    pub fn is_lethal(&self) -> bool {
        self.danger == DangerLevel::High || self.opacity > ZONE_LETHAL_OPACITY
    }
}

/// Food variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FoodTier {
    #[default]
    Normal,
    Bonus,
    Super,
    Epic,
}

impl FoodTier {
    pub const ALL: [FoodTier; 4] = [
        FoodTier::Normal,
        FoodTier::Bonus,
        FoodTier::Super,
        FoodTier::Epic,
    ];

    pub fn points(self) -> u64 {
        match self {
            FoodTier::Normal => 10,
            FoodTier::Bonus => 20,
            FoodTier::Super => 50,
            FoodTier::Epic => 100,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            FoodTier::Normal => "#ef4444",
            FoodTier::Bonus => "#ff9f1c",
            FoodTier::Super => "#f72585",
            FoodTier::Epic => "#7209b7",
        }
    }

    /// Spawn weight at level 0
    pub fn base_weight(self) -> f64 {
        match self {
            FoodTier::Normal => 0.70,
            FoodTier::Bonus => 0.20,
            FoodTier::Super => 0.09,
            FoodTier::Epic => 0.01,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FoodTier::Normal => "Normal",
            FoodTier::Bonus => "Bonus",
            FoodTier::Super => "Super",
            FoodTier::Epic => "Epic",
        }
    }

    /// Anything above Normal plays the special eat cue
    pub fn is_special(self) -> bool {
        self != FoodTier::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub cell: Cell,
    pub tier: FoodTier,
}

/// Power-up rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Rarity {
    pub fn base_weight(self) -> f64 {
        match self {
            Rarity::Common => 10.0,
            Rarity::Uncommon => 6.0,
            Rarity::Rare => 3.0,
            Rarity::Epic => 1.0,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ClearPath,
    SlowDecay,
    ScoreBoost,
    PhaseThrough,
    SpeedBoost,
    Magnet,
    Shrink,
    Invulnerability,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 8] = [
        PowerUpKind::ClearPath,
        PowerUpKind::SlowDecay,
        PowerUpKind::ScoreBoost,
        PowerUpKind::PhaseThrough,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Magnet,
        PowerUpKind::Shrink,
        PowerUpKind::Invulnerability,
    ];

    pub fn rarity(self) -> Rarity {
        match self {
            PowerUpKind::SlowDecay | PowerUpKind::ScoreBoost | PowerUpKind::SpeedBoost => {
                Rarity::Common
            }
            PowerUpKind::ClearPath | PowerUpKind::PhaseThrough | PowerUpKind::Magnet => {
                Rarity::Uncommon
            }
            PowerUpKind::Shrink => Rarity::Rare,
            PowerUpKind::Invulnerability => Rarity::Epic,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerUpKind::ClearPath => "#4361ee",
            PowerUpKind::SlowDecay => "#7209b7",
            PowerUpKind::ScoreBoost => "#ffce1a",
            PowerUpKind::PhaseThrough => "#14213d",
            PowerUpKind::SpeedBoost => "#06d6a0",
            PowerUpKind::Magnet => "#e63946",
            PowerUpKind::Shrink => "#8338ec",
            PowerUpKind::Invulnerability => "#ffd700",
        }
    }

    /// Effect lifetime in ms; zero means a one-shot effect
    pub fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::ClearPath => 5000.0,
            PowerUpKind::SlowDecay => 10000.0,
            PowerUpKind::ScoreBoost => 7000.0,
            PowerUpKind::PhaseThrough => 3000.0,
            PowerUpKind::SpeedBoost => 5000.0,
            PowerUpKind::Magnet => 8000.0,
            PowerUpKind::Shrink => 0.0,
            PowerUpKind::Invulnerability => 4000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PowerUpKind::ClearPath => "✨",
            PowerUpKind::SlowDecay => "🕒",
            PowerUpKind::ScoreBoost => "💎",
            PowerUpKind::PhaseThrough => "👻",
            PowerUpKind::SpeedBoost => "⚡",
            PowerUpKind::Magnet => "🧲",
            PowerUpKind::Shrink => "✂",
            PowerUpKind::Invulnerability => "⭐",
        }
    }

    /// Notification text shown on pickup
    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::ClearPath => "Path Cleared!",
            PowerUpKind::SlowDecay => "Zones Decaying Faster!",
            PowerUpKind::ScoreBoost => "Double Score Activated!",
            PowerUpKind::PhaseThrough => "Phase Through Activated!",
            PowerUpKind::SpeedBoost => "Speed Boost!",
            PowerUpKind::Magnet => "Food Magnet!",
            PowerUpKind::Shrink => "Snake Shrunk!",
            PowerUpKind::Invulnerability => "Invulnerable!",
        }
    }
}

/// A pickup lying on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub cell: Cell,
    pub kind: PowerUpKind,
    pub duration: f64,
}

impl PowerUp {
    pub fn new(cell: Cell, kind: PowerUpKind) -> Self {
        Self {
            cell,
            kind,
            duration: kind.duration_ms(),
        }
    }
}

/// A running power-up timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub start_time: f64,
    pub duration: f64,
    pub active: bool,
}

impl ActivePowerUp {
    pub fn is_expired(&self, now: f64) -> bool {
        now - self.start_time >= self.duration
    }
}

/// Consecutive-food combo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub count: u32,
    pub last_food_time: Option<f64>,
    pub multiplier: f64,
}

impl Default for ComboState {
    fn default() -> Self {
        Self {
            count: 0,
            last_food_time: None,
            multiplier: 1.0,
        }
    }
}

impl ComboState {
    /// True once the decay window has passed since the last food
    pub fn has_lapsed(&self, now: f64) -> bool {
        self.last_food_time.is_some_and(|last| now - last > COMBO_WINDOW_MS)
    }

    /// Register a food at `now`, resetting first if the window lapsed
    pub fn register_food(&mut self, now: f64) {
        if self.has_lapsed(now) {
            *self = Self::default();
        }
        self.count += 1;
        self.last_food_time = Some(now);
        self.multiplier = 1.0 + (self.count as f64 * COMBO_STEP).min(COMBO_MAX_BONUS);
    }
}

/// One row of the level table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    pub threshold: u64,
    pub name: &'static str,
    pub pattern: ZonePattern,
    /// Move interval at the normal speed preset
    pub speed_ms: f64,
    /// Zone lifetime at the default zone duration
    pub zone_duration_ms: f64,
}

/// Level progression, ascending by score threshold
pub const LEVELS: [LevelSpec; 6] = [
    LevelSpec {
        threshold: 0,
        name: "Warm Up",
        pattern: ZonePattern::Alternate,
        speed_ms: 150.0,
        zone_duration_ms: 3500.0,
    },
    LevelSpec {
        threshold: 60,
        name: "Getting Serious",
        pattern: ZonePattern::Continuous,
        speed_ms: 140.0,
        zone_duration_ms: 4000.0,
    },
    LevelSpec {
        threshold: 120,
        name: "Maze Runner",
        pattern: ZonePattern::Random,
        speed_ms: 130.0,
        zone_duration_ms: 4500.0,
    },
    LevelSpec {
        threshold: 250,
        name: "Zone Master",
        pattern: ZonePattern::Random,
        speed_ms: 115.0,
        zone_duration_ms: 5000.0,
    },
    LevelSpec {
        threshold: 400,
        name: "Serpent Legend",
        pattern: ZonePattern::Random,
        speed_ms: 100.0,
        zone_duration_ms: 5500.0,
    },
    LevelSpec {
        threshold: 600,
        name: "Untouchable",
        pattern: ZonePattern::Random,
        speed_ms: 85.0,
        zone_duration_ms: 6000.0,
    },
];

/// Highest level whose threshold `score` has reached
pub fn level_for_score(score: u64) -> usize {
    LEVELS
        .iter()
        .rposition(|l| score >= l.threshold)
        .unwrap_or(0)
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    SelfHit,
    Zone,
}

/// Notable things that happened during one update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Ate { tier: FoodTier, points: u64 },
    PowerUp(PowerUpKind),
    LevelUp { level: usize },
    Died(DeathCause),
}

/// Trail point for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub cell: Cell,
    pub time: f64,
}

/// Complete game state
pub struct GameState {
    pub config: GameConfig,
    pub tile_count: i32,
    /// Head at the front
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    /// Accepted request applied at the start of the next move
    pub pending_direction: Option<Direction>,
    pub food: Food,
    pub zones: Vec<Zone>,
    /// Uncollected pickups
    pub power_ups: Vec<PowerUp>,
    pub active_power_ups: Vec<ActivePowerUp>,
    pub score: u64,
    pub level: usize,
    pub zone_pattern: ZonePattern,
    pub zone_duration: f64,
    /// Milliseconds between moves
    pub game_speed: f64,
    pub difficulty: f64,
    pub combo: ComboState,
    pub move_count: u64,
    pub game_over: bool,
    pub death_cause: Option<DeathCause>,
    /// Recent head positions (newest first)
    pub trail: VecDeque<TrailPoint>,
    pub max_trail_length: usize,
    /// 60-point milestones already turned into speed-ups
    pub speedup_milestones: u64,
    pub power_ups_collected: u32,
    pub foods_eaten: u32,
    /// Simulated time covered by the updates so far
    pub sim_time_ms: f64,
    /// Events raised by the latest update
    pub events: Vec<GameEvent>,
    pub(crate) rng: Box<dyn RngCore + Send>,
}

impl GameState {
    /// Create a new game seeded from `config.seed`
    pub fn new(config: GameConfig) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::with_rng(config, Box::new(rng))
    }

    /// Create a new game drawing from an injected random source
    pub fn with_rng(config: GameConfig, rng: Box<dyn RngCore + Send>) -> Self {
        let tile_count = config.tile_count();
        let start = config.start_cell();
        let mut state = Self {
            tile_count,
            snake: VecDeque::from([start]),
            direction: Direction::Right,
            pending_direction: None,
            food: Food {
                cell: start,
                tier: FoodTier::Normal,
            },
            zones: Vec::new(),
            power_ups: Vec::new(),
            active_power_ups: Vec::new(),
            score: 0,
            level: 0,
            zone_pattern: LEVELS[0].pattern,
            zone_duration: config.zone_duration_ms,
            game_speed: config.speed.move_interval_ms(),
            difficulty: config.difficulty,
            combo: ComboState::default(),
            move_count: 0,
            game_over: false,
            death_cause: None,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + TRAIL_BONUS),
            max_trail_length: TRAIL_LENGTH,
            speedup_milestones: 0,
            power_ups_collected: 0,
            foods_eaten: 0,
            sim_time_ms: 0.0,
            events: Vec::new(),
            rng,
            config,
        };
        state.direction = Direction::from_vector(START_DIRECTION).unwrap_or(Direction::Right);
        state.place_food();
        state
    }

    /// Return to start-of-game invariants, keeping config and random stream.
    ///
    /// Ephemeral collections are replaced outright so no stale timer survives.
    pub fn reset(&mut self) {
        let start = self.config.start_cell();
        self.tile_count = self.config.tile_count();
        self.snake = VecDeque::from([start]);
        self.direction = Direction::from_vector(START_DIRECTION).unwrap_or(Direction::Right);
        self.pending_direction = None;
        self.zones = Vec::new();
        self.power_ups = Vec::new();
        self.active_power_ups = Vec::new();
        self.score = 0;
        self.level = 0;
        self.zone_pattern = LEVELS[0].pattern;
        self.zone_duration = self.config.zone_duration_ms;
        self.game_speed = self.config.speed.move_interval_ms();
        self.difficulty = self.config.difficulty;
        self.combo = ComboState::default();
        self.move_count = 0;
        self.game_over = false;
        self.death_cause = None;
        self.trail = VecDeque::with_capacity(TRAIL_LENGTH + TRAIL_BONUS);
        self.max_trail_length = TRAIL_LENGTH;
        self.speedup_milestones = 0;
        self.power_ups_collected = 0;
        self.foods_eaten = 0;
        self.sim_time_ms = 0.0;
        self.events = Vec::new();
        self.place_food();
        log::info!("Game reset ({}x{} board)", self.tile_count, self.tile_count);
    }

    /// Snake head
    pub fn head(&self) -> Cell {
        self.snake.front().copied().unwrap_or(self.config.start_cell())
    }

    /// Random source for the sim modules
    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng.as_mut()
    }

    /// Queue a direction change, rejecting 180° reversals and non-unit vectors
    pub fn try_set_direction(&mut self, v: IVec2) -> Result<(), SimError> {
        let rejected = SimError::InvalidDirection { x: v.x, y: v.y };
        let dir = Direction::from_vector(v).ok_or(rejected)?;
        if dir.is_idle() || dir == self.direction.opposite() {
            return Err(rejected);
        }
        self.pending_direction = Some(dir);
        Ok(())
    }

    /// Queue a direction change; invalid requests are ignored
    pub fn set_direction(&mut self, v: IVec2) {
        if let Err(e) = self.try_set_direction(v) {
            log::trace!("{e}");
        }
    }

    /// True if any live timer of this kind is running
    pub fn is_power_up_active(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.iter().any(|p| p.kind == kind && p.active)
    }

    /// Display name of the current level
    pub fn level_name(&self) -> &'static str {
        LEVELS[self.level.min(LEVELS.len() - 1)].name
    }

    /// Replace the food on a free cell with a freshly rolled tier
    pub fn place_food(&mut self) {
        let food = food::place_food(
            &grid::Board {
                tile_count: self.tile_count,
                snake: &self.snake,
                zones: &self.zones,
                power_ups: &self.power_ups,
                food: None,
            },
            self.level,
            self.rng.as_mut(),
        );
        log::debug!("Food placed at {} ({})", food.cell, food.tier.as_str());
        self.food = food;
    }

    /// Owned copy for renderers and UI
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(self)
    }
}
