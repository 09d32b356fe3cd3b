//! World state and entity types
//!
//! Everything a renderer needs to draw a frame lives here, and the whole
//! `World` serializes so it can be handed out as a snapshot.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// Terminal until the world is reset
    GameOver,
}

/// Player start position
pub const PLAYER_START: Vec2 = Vec2::new(ARENA_WIDTH * 0.5, ARENA_HEIGHT * 0.8);

/// The player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Turret angle (radians)
    pub angle: f32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            angle: -std::f32::consts::FRAC_PI_2, // Facing up
            cooldown: 0.0,
        }
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    Scout,
    Heavy,
    Sniper,
}

/// Combat stats for an enemy variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantStats {
    pub speed: f32,
    pub hp: u32,
    pub score: u64,
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 3] = [EnemyVariant::Scout, EnemyVariant::Heavy, EnemyVariant::Sniper];

    pub const fn stats(self) -> VariantStats {
        match self {
            EnemyVariant::Scout => VariantStats {
                speed: 180.0,
                hp: 1,
                score: 10,
                fire_cooldown: ENEMY_FIRE_COOLDOWN,
                bullet_speed: ENEMY_BULLET_SPEED,
            },
            EnemyVariant::Heavy => VariantStats {
                speed: 90.0,
                hp: 3,
                score: 25,
                fire_cooldown: ENEMY_FIRE_COOLDOWN,
                bullet_speed: ENEMY_BULLET_SPEED,
            },
            EnemyVariant::Sniper => VariantStats {
                speed: 120.0,
                hp: 1,
                score: 20,
                fire_cooldown: 1.6,
                bullet_speed: 560.0,
            },
        }
    }
}

/// An AI tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub cooldown: f32,
    /// Hit points; an enemy at 0 is dead and gets dropped this step
    pub hp: u32,
    pub variant: EnemyVariant,
    /// Simulation time of spawn
    pub spawned_at: f64,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
    /// Simulation time the bullet was fired
    pub born: f64,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// +1 life, capped at `MAX_LIVES`
    Heal,
    /// Faster firing for `RAPID_DURATION` seconds
    Rapid,
}

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub spawned_at: f64,
    /// Animation phase (radians) for the renderer's pulse
    pub pulse: f32,
}

/// Active timed modifier
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Buff {
    #[default]
    None,
    Rapid { until: f64 },
}

impl Buff {
    pub fn is_rapid(&self) -> bool {
        matches!(self, Buff::Rapid { .. })
    }
}

/// Color tags for explosion particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Enemy,
    Player,
    Heal,
    Rapid,
}

impl ParticleColor {
    /// 0xRRGGBB for renderers
    pub fn rgb(self) -> u32 {
        match self {
            ParticleColor::Enemy => 0xef4444,
            ParticleColor::Player => 0x3b82f6,
            ParticleColor::Heal => 0x34d399,
            ParticleColor::Rapid => 0xf472b6,
        }
    }
}

impl From<PowerupKind> for ParticleColor {
    fn from(kind: PowerupKind) -> Self {
        match kind {
            PowerupKind::Heal => ParticleColor::Heal,
            PowerupKind::Rapid => ParticleColor::Rapid,
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: ParticleColor,
}

impl Particle {
    pub fn opacity(&self) -> f32 {
        (self.life / self.max_life).max(0.0)
    }
}

/// Default particle cap (matches the Medium quality preset)
pub const MAX_PARTICLES: usize = 500;

/// Events produced by one simulation step, consumed by audio/HUD/persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A tank fired
    Shoot { pos: Vec2, owner: BulletOwner },
    /// An explosion burst was spawned
    Explosion { pos: Vec2, color: ParticleColor },
    /// An enemy was destroyed
    EnemyDestroyed { pos: Vec2, variant: EnemyVariant },
    /// The player lost a life
    PlayerHit { pos: Vec2 },
    PowerupPickup { pos: Vec2, kind: PowerupKind },
    ScoreChanged { score: u64 },
    LivesChanged { lives: u8 },
    WaveChanged { wave: u32 },
    GameOver {
        score: u64,
        waves_survived: u32,
        new_high_score: bool,
        new_best_wave: bool,
    },
}

/// Fixed arena layout: four border walls and four inner blocks
pub fn arena_walls() -> Vec<Rect> {
    let m = WALL_MARGIN;
    let t = WALL_THICKNESS;
    vec![
        // Borders
        Rect::new(m, m, ARENA_WIDTH - m * 2.0, t),
        Rect::new(m, ARENA_HEIGHT - m - t, ARENA_WIDTH - m * 2.0, t),
        Rect::new(m, m, t, ARENA_HEIGHT - m * 2.0),
        Rect::new(ARENA_WIDTH - m - t, m, t, ARENA_HEIGHT - m * 2.0),
        // Inner blocks
        Rect::new(200.0, 180.0, 120.0, 18.0),
        Rect::new(ARENA_WIDTH - 320.0, 180.0, 120.0, 18.0),
        Rect::new(320.0, 320.0, 80.0, 18.0),
        Rect::new(ARENA_WIDTH - 400.0, 320.0, 80.0, 18.0),
    ]
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed
    pub seed: u64,
    /// Elapsed simulation time (seconds); every timer is measured against it
    pub time: f64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Next wave to spawn (starts at 1)
    pub wave: u32,
    pub last_spawn_at: f64,
    pub next_spawn_delay: f64,
    pub buff: Buff,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub walls: Vec<Rect>,
    pub powerups: Vec<Powerup>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Oldest particles are dropped beyond this count
    pub particle_cap: usize,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64) -> Self {
        let mut world = Self {
            seed,
            time: 0.0,
            phase: GamePhase::Active,
            score: 0,
            lives: MAX_LIVES,
            wave: 1,
            last_spawn_at: 0.0,
            next_spawn_delay: SPAWN_INTERVAL_BASE,
            buff: Buff::None,
            player: Player::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            walls: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        world.reset();
        world
    }

    /// Start a new session in place. The RNG stream and particle cap carry over.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Active;
        self.score = 0;
        self.lives = MAX_LIVES;
        self.wave = 1;
        self.enemies.clear();
        self.bullets.clear();
        self.powerups.clear();
        self.particles.clear();
        self.walls = arena_walls();
        self.player = Player::default();
        self.buff = Buff::None;
        self.last_spawn_at = self.time;
        self.next_spawn_delay = SPAWN_INTERVAL_BASE;
        log::info!("New session (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Active <-> Paused. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Active => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Active,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }

    /// Fire a bullet from `origin` along the unit vector `dir`
    pub fn spawn_bullet(&mut self, origin: Vec2, dir: Vec2, speed: f32, owner: BulletOwner) {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: origin,
            vel: dir * speed,
            owner,
            born: self.time,
        });
    }

    /// Add an enemy of the given variant at full health
    pub fn spawn_enemy(&mut self, variant: EnemyVariant, pos: Vec2, cooldown: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos,
            angle: std::f32::consts::FRAC_PI_2, // Facing down
            cooldown,
            hp: variant.stats().hp,
            variant,
            spawned_at: self.time,
        });
        id
    }

    pub fn spawn_powerup(&mut self, kind: PowerupKind, pos: Vec2) {
        let id = self.next_entity_id();
        self.powerups.push(Powerup {
            id,
            kind,
            pos,
            radius: POWERUP_RADIUS,
            spawned_at: self.time,
            pulse: 0.0,
        });
    }

    /// Seconds of rapid fire left (0 when no buff)
    pub fn buff_remaining(&self) -> f32 {
        match self.buff {
            Buff::Rapid { until } => (until - self.time).max(0.0) as f32,
            Buff::None => 0.0,
        }
    }

    /// Read-only JSON snapshot for out-of-process renderers
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
