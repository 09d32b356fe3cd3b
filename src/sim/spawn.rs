//! Wave director
//!
//! Decides when the next wave arrives, how many tanks it holds and which
//! variants they are. Difficulty scales with the wave number.

use glam::Vec2;
use rand::Rng;

use super::state::{EnemyVariant, GameEvent, PowerupKind, World};
use crate::consts::*;

/// Effective probability of each variant for one wave (always sums to 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantWeights {
    pub scout: f32,
    pub heavy: f32,
    pub sniper: f32,
}

impl VariantWeights {
    pub fn for_wave(wave: u32) -> Self {
        let w = wave as f32;
        let scout = (0.5 + w * 0.01).clamp(0.5, 0.7);
        let heavy = (0.2 + w * 0.01).clamp(0.2, 0.35);
        // Late waves push scout + heavy past 1; the draw then never reaches sniper
        let heavy = heavy.min(1.0 - scout);
        Self {
            scout,
            heavy,
            sniper: 1.0 - scout - heavy,
        }
    }

    /// Map a uniform draw in [0, 1) onto a variant
    pub fn pick(&self, roll: f32) -> EnemyVariant {
        if roll < self.scout {
            EnemyVariant::Scout
        } else if roll < self.scout + self.heavy {
            EnemyVariant::Heavy
        } else {
            EnemyVariant::Sniper
        }
    }
}

/// Number of tanks in a wave
pub fn wave_size(wave: u32) -> usize {
    2 + (wave as f32 * 1.2).floor() as usize
}

/// Delay before the wave after `wave` (shrinks, floored at `SPAWN_INTERVAL_MIN`)
pub fn spawn_delay_for_wave(wave: u32) -> f64 {
    (SPAWN_INTERVAL_BASE - f64::from(wave) * SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_MIN)
}

/// Spawn the next wave if its timer has run out
pub fn update_spawner(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.time - world.last_spawn_at >= world.next_spawn_delay {
        spawn_wave(world, events);
        world.last_spawn_at = world.time;
        world.next_spawn_delay = spawn_delay_for_wave(world.wave);
    }
}

/// Spawn a full wave of enemies plus one power-up, then advance the wave counter
pub fn spawn_wave(world: &mut World, events: &mut Vec<GameEvent>) {
    let count = wave_size(world.wave);
    let weights = VariantWeights::for_wave(world.wave);

    for _ in 0..count {
        // Top 30% of the arena, away from the player's start
        let x = world.rng.random_range(40.0..ARENA_WIDTH - 40.0);
        let y = world.rng.random_range(40.0..ARENA_HEIGHT * 0.3);
        let variant = weights.pick(world.rng.random::<f32>());
        let cooldown = world
            .rng
            .random_range(ENEMY_MIN_INITIAL_COOLDOWN..ENEMY_FIRE_COOLDOWN);
        world.spawn_enemy(variant, Vec2::new(x, y), cooldown);
    }

    log::info!("Wave {}: {} enemies", world.wave, count);
    world.wave += 1;
    events.push(GameEvent::WaveChanged { wave: world.wave });

    let px = world.rng.random_range(60.0..ARENA_WIDTH - 60.0);
    let py = world.rng.random_range(80.0..ARENA_HEIGHT - 80.0);
    let kind = if world.rng.random_bool(0.5) {
        PowerupKind::Heal
    } else {
        PowerupKind::Rapid
    };
    world.spawn_powerup(kind, Vec2::new(px, py));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_wave_spawns_three() {
        let mut world = World::new(12345);
        let mut events = Vec::new();
        spawn_wave(&mut world, &mut events);

        assert_eq!(world.enemies.len(), 3);
        assert_eq!(world.wave, 2);
        assert_eq!(world.powerups.len(), 1);
        assert_eq!(events, vec![GameEvent::WaveChanged { wave: 2 }]);
    }

    #[test]
    fn test_spawned_enemies_in_top_band() {
        let mut world = World::new(99);
        let mut events = Vec::new();
        for _ in 0..5 {
            spawn_wave(&mut world, &mut events);
        }
        for enemy in &world.enemies {
            assert!(enemy.pos.x >= 40.0 && enemy.pos.x < ARENA_WIDTH - 40.0);
            assert!(enemy.pos.y >= 40.0 && enemy.pos.y < ARENA_HEIGHT * 0.3);
            assert_eq!(enemy.hp, enemy.variant.stats().hp);
            assert!(enemy.cooldown >= ENEMY_MIN_INITIAL_COOLDOWN);
        }
    }

    #[test]
    fn test_spawner_waits_for_delay() {
        let mut world = World::new(5);
        let mut events = Vec::new();

        world.time = 5.9;
        update_spawner(&mut world, &mut events);
        assert!(world.enemies.is_empty());

        world.time = 6.0;
        update_spawner(&mut world, &mut events);
        assert_eq!(world.enemies.len(), 3);
        assert_eq!(world.last_spawn_at, 6.0);
        assert!((world.next_spawn_delay - (6.0 - 2.0 * 0.35)).abs() < 1e-6);
    }

    #[test]
    fn test_wave_sizes() {
        assert_eq!(wave_size(1), 3);
        assert_eq!(wave_size(2), 4);
        assert_eq!(wave_size(5), 8);
    }

    #[test]
    fn test_weights_late_waves_drop_sniper() {
        let w = VariantWeights::for_wave(30);
        assert_eq!(w.scout, 0.7);
        assert!((w.heavy - 0.3).abs() < 1e-6);
        assert!(w.sniper.abs() < 1e-6);
        assert_eq!(w.pick(0.999), EnemyVariant::Heavy);
    }

    #[test]
    fn test_weights_pick_boundaries() {
        let w = VariantWeights::for_wave(1);
        assert_eq!(w.pick(0.0), EnemyVariant::Scout);
        assert_eq!(w.pick(0.6), EnemyVariant::Heavy);
        assert_eq!(w.pick(0.95), EnemyVariant::Sniper);
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_one(wave in 1u32..10_000) {
            let w = VariantWeights::for_wave(wave);
            prop_assert!(w.scout >= 0.0 && w.heavy >= 0.0 && w.sniper >= -1e-6);
            prop_assert!((w.scout + w.heavy + w.sniper - 1.0).abs() < 1e-5);
        }

        #[test]
        fn prop_spawn_delay_non_increasing(wave in 1u32..10_000) {
            let a = spawn_delay_for_wave(wave);
            let b = spawn_delay_for_wave(wave + 1);
            prop_assert!(b <= a);
            prop_assert!(b >= SPAWN_INTERVAL_MIN);
        }
    }
}
