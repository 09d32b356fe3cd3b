//! Arena simulation
//!
//! All gameplay logic lives here. The module has no rendering, audio or
//! platform dependencies:
//! - Time is the world's own accumulator, never the wall clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order)

pub mod ai;
pub mod combat;
pub mod geometry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use combat::{BulletFate, bullet_fate, damage_player, spawn_explosion};
pub use geometry::{
    Rect, circle_intersects_rect, circles_overlap, clamp, collides_with_walls, has_line_of_sight,
    move_axis_separated, normalize,
};
pub use spawn::{VariantWeights, spawn_delay_for_wave, spawn_wave, wave_size};
pub use state::{
    Buff, Bullet, BulletOwner, Enemy, EnemyVariant, GameEvent, GamePhase, Particle, ParticleColor,
    Player, Powerup, PowerupKind, VariantStats, World, arena_walls, MAX_PARTICLES, PLAYER_START,
};
pub use tick::{TickInput, tick};
