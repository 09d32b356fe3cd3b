//! Simulation step
//!
//! One call advances the world by a single frame and reports what happened.

use glam::Vec2;

use super::ai::update_enemies;
use super::combat::{animate_powerups, update_bullets, update_buff, update_particles, update_powerups};
use super::geometry::{move_axis_separated, normalize};
use super::spawn::update_spawner;
use super::state::{BulletOwner, GameEvent, GamePhase, World};
use crate::clamp_frame_dt;
use crate::consts::*;
use crate::highscores::ScoreStore;

/// Input snapshot for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim target in arena coordinates
    pub aim: Vec2,
    /// Fire held
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Movement direction from the axis flags, normalized for diagonals
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        normalize(dir)
    }
}

/// Advance the world by `dt` seconds (clamped to `MAX_FRAME_DT`).
///
/// `store` is only consulted when the run ends.
pub fn tick(world: &mut World, input: &TickInput, dt: f32, store: &mut dyn ScoreStore) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        world.toggle_pause();
    }

    // Don't tick if paused or game over
    if world.phase != GamePhase::Active {
        return events;
    }

    let dt = clamp_frame_dt(dt);
    world.time += f64::from(dt);

    update_player_weapon(world, input, dt, &mut events);
    update_player_movement(world, input, dt);
    update_enemies(world, dt, &mut events);
    update_spawner(world, &mut events);
    animate_powerups(world, dt);
    update_bullets(world, dt, store, &mut events);
    update_particles(world, dt);

    // A fatal hit this step freezes lives and buffs where they are
    if world.phase == GamePhase::GameOver {
        return events;
    }

    update_powerups(world, &mut events);
    update_buff(world);

    events
}

/// Turret aim and firing
fn update_player_weapon(world: &mut World, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    let player = &mut world.player;
    let aim = input.aim - player.pos;
    player.angle = aim.y.atan2(aim.x);
    player.cooldown = (player.cooldown - dt).max(0.0);

    if input.fire && player.cooldown == 0.0 {
        let fire_cooldown = if world.buff.is_rapid() {
            PLAYER_FIRE_COOLDOWN * RAPID_COOLDOWN_FACTOR
        } else {
            PLAYER_FIRE_COOLDOWN
        };
        let dir = normalize(aim);
        let muzzle = player.pos + dir * (PLAYER_RADIUS + PLAYER_MUZZLE_OFFSET);
        player.cooldown = fire_cooldown;

        world.spawn_bullet(muzzle, dir, PLAYER_BULLET_SPEED, BulletOwner::Player);
        events.push(GameEvent::Shoot {
            pos: muzzle,
            owner: BulletOwner::Player,
        });
    }
}

fn update_player_movement(world: &mut World, input: &TickInput, dt: f32) {
    let dir = input.move_dir();
    if dir == Vec2::ZERO {
        return;
    }
    world.player.pos = move_axis_separated(world.player.pos, dir * PLAYER_SPEED * dt, PLAYER_RADIUS, &world.walls);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::state::{Buff, EnemyVariant, PLAYER_START};
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_player_bullet_kills_scout() {
        let mut world = World::new(12345);
        let mut store = MemoryStore::new();
        world.spawn_enemy(EnemyVariant::Scout, Vec2::new(480.0, 100.0), 99.0);
        world.spawn_bullet(
            Vec2::new(480.0, 480.0 - PLAYER_RADIUS - PLAYER_MUZZLE_OFFSET),
            Vec2::new(0.0, -1.0),
            PLAYER_BULLET_SPEED,
            BulletOwner::Player,
        );

        let input = TickInput {
            aim: Vec2::new(480.0, 0.0),
            ..Default::default()
        };
        let mut events = Vec::new();
        for _ in 0..60 {
            events.extend(tick(&mut world, &input, DT, &mut store));
            if world.enemies.is_empty() {
                break;
            }
        }

        assert!(world.enemies.is_empty());
        assert_eq!(world.score, 10);
        assert!(events.contains(&GameEvent::ScoreChanged { score: 10 }));
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_last_life_game_over_halts() {
        let mut world = World::new(7);
        let mut store = MemoryStore::new();
        world.lives = 1;
        world.spawn_bullet(PLAYER_START, Vec2::ZERO, 0.0, BulletOwner::Enemy);

        let events = tick(&mut world, &TickInput::default(), DT, &mut store);
        assert_eq!(world.lives, 0);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Terminal: nothing moves, pause is ignored
        let time = world.time;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert!(tick(&mut world, &pause, DT, &mut store).is_empty());
        assert_eq!(world.time, time);
        assert_eq!(world.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_pause_toggle() {
        let mut world = World::new(12345);
        let mut store = MemoryStore::new();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut world, &pause, DT, &mut store);
        assert_eq!(world.phase, GamePhase::Paused);
        let time = world.time;
        tick(&mut world, &TickInput::default(), DT, &mut store);
        assert_eq!(world.time, time);

        // Unpausing resumes in the same step
        tick(&mut world, &pause, DT, &mut store);
        assert_eq!(world.phase, GamePhase::Active);
        assert!(world.time > time);
    }

    #[test]
    fn test_fire_cooldown_and_rapid_buff() {
        let mut world = World::new(1);
        let mut store = MemoryStore::new();
        let fire = TickInput {
            aim: Vec2::new(480.0, 0.0),
            fire: true,
            ..Default::default()
        };

        let events = tick(&mut world, &fire, DT, &mut store);
        assert_eq!(world.bullets.len(), 1);
        assert!(matches!(events[0], GameEvent::Shoot { owner: BulletOwner::Player, .. }));
        assert_eq!(world.player.cooldown, PLAYER_FIRE_COOLDOWN);
        assert!((world.player.angle + std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        // Still cooling down
        tick(&mut world, &fire, DT, &mut store);
        assert_eq!(world.bullets.len(), 1);

        world.player.cooldown = 0.0;
        world.buff = Buff::Rapid { until: world.time + 5.0 };
        tick(&mut world, &fire, DT, &mut store);
        assert_eq!(world.bullets.len(), 2);
        assert!((world.player.cooldown - PLAYER_FIRE_COOLDOWN * RAPID_COOLDOWN_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_movement_normalized() {
        let mut world = World::new(1);
        let mut store = MemoryStore::new();
        let input = TickInput {
            down: true,
            right: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.02, &mut store);

        let moved = world.player.pos - PLAYER_START;
        assert!((moved.length() - PLAYER_SPEED * 0.02).abs() < 1e-3);
        assert!((moved.x - moved.y).abs() < 1e-4);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let mut world = World::new(1);
        let mut store = MemoryStore::new();
        tick(&mut world, &TickInput::default(), 1.0, &mut store);
        assert!((world.time - f64::from(MAX_FRAME_DT)).abs() < 1e-9);
    }

    #[test]
    fn test_first_wave_arrives_after_base_interval() {
        let mut world = World::new(42);
        let mut store = MemoryStore::new();
        let mut waves = Vec::new();
        let steps = (SPAWN_INTERVAL_BASE / f64::from(MAX_FRAME_DT)).ceil() as usize + 1;
        for _ in 0..steps {
            for event in tick(&mut world, &TickInput::default(), MAX_FRAME_DT, &mut store) {
                if let GameEvent::WaveChanged { wave } = event {
                    waves.push(wave);
                }
            }
        }
        assert_eq!(waves, vec![2]);
        assert_eq!(world.enemies.len(), 3);
    }

    #[test]
    fn test_clock_holds_frame_precision_late_in_session() {
        let mut world = World::new(3);
        let mut store = MemoryStore::new();
        world.time = 300_000.0;
        world.last_spawn_at = world.time;
        world.next_spawn_delay = 1.0e9;
        world.spawn_bullet(Vec2::new(480.0, 300.0), Vec2::ZERO, 0.0, BulletOwner::Player);

        let idle = TickInput::default();
        for _ in 0..120 {
            tick(&mut world, &idle, DT, &mut store);
        }
        assert_eq!(world.bullets.len(), 1);
        for _ in 0..30 {
            tick(&mut world, &idle, DT, &mut store);
        }
        assert!(world.bullets.is_empty());

        for _ in 0..450 {
            tick(&mut world, &idle, DT, &mut store);
        }
        assert!((world.time - 300_010.0).abs() < 1e-3);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<[bool; 5]>(), 0.0f32..960.0, 0.0f32..600.0).prop_map(|(keys, x, y)| TickInput {
            up: keys[0],
            down: keys[1],
            left: keys[2],
            right: keys[3],
            fire: keys[4],
            aim: Vec2::new(x, y),
            pause: false,
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_session_invariants(seed in any::<u64>(), inputs in prop::collection::vec(arb_input(), 1..40)) {
            let mut world = World::new(seed);
            let mut store = MemoryStore::new();
            let mut last_wave = world.wave;

            // Each input is held for 15 frames (~0.5 s)
            for input in inputs.iter().flat_map(|i| std::iter::repeat_n(i, 15)) {
                let lives_before = world.lives;
                tick(&mut world, input, MAX_FRAME_DT, &mut store);

                prop_assert!(world.lives <= MAX_LIVES);
                prop_assert!(world.wave >= last_wave);
                last_wave = world.wave;
                prop_assert!(world.enemies.iter().all(|e| e.hp >= 1));
                if lives_before == 0 {
                    prop_assert_eq!(world.lives, 0);
                }
                if world.lives == 0 {
                    prop_assert_eq!(world.phase, GamePhase::GameOver);
                }
                for bullet in &world.bullets {
                    prop_assert!(world.time - bullet.born <= BULLET_LIFETIME);
                }
            }
        }
    }
}
