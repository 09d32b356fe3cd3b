//! Collision and combat resolution
//!
//! Runs after movement each step. Surviving bullets, enemies, particles and
//! power-ups are rebuilt into fresh collections instead of being spliced out
//! mid-iteration, so a bullet can hit at most one enemy per step.

use glam::Vec2;
use rand::Rng;

use super::geometry::{circle_intersects_rect, circles_overlap, in_arena};
use super::state::{
    Bullet, BulletOwner, Buff, GameEvent, GamePhase, Particle, ParticleColor, PowerupKind,
    PLAYER_START, World,
};
use crate::consts::*;
use crate::highscores::{ScoreStore, record_run};

/// Why a bullet left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletFate {
    Alive,
    Wall,
    OutOfBounds,
    Expired,
}

/// Classify a bullet after it has moved. Checks run in order; first match wins.
pub fn bullet_fate(bullet: &Bullet, world: &World) -> BulletFate {
    if world
        .walls
        .iter()
        .any(|w| circle_intersects_rect(bullet.pos, BULLET_RADIUS, w))
    {
        BulletFate::Wall
    } else if !in_arena(bullet.pos) {
        BulletFate::OutOfBounds
    } else if world.time - bullet.born > BULLET_LIFETIME {
        BulletFate::Expired
    } else {
        BulletFate::Alive
    }
}

/// Move bullets and resolve their hits against walls, the player and enemies
pub fn update_bullets(
    world: &mut World,
    dt: f32,
    store: &mut dyn ScoreStore,
    events: &mut Vec<GameEvent>,
) {
    let bullets = std::mem::take(&mut world.bullets);
    let mut alive: Vec<Bullet> = Vec::with_capacity(bullets.len());
    let mut player_hit = false;

    for mut bullet in bullets {
        bullet.pos += bullet.vel * dt;

        if bullet_fate(&bullet, world) != BulletFate::Alive {
            continue;
        }

        match bullet.owner {
            BulletOwner::Enemy => {
                // After a hit every enemy bullet is cleared for the rest of the step
                if player_hit {
                    continue;
                }
                if circles_overlap(bullet.pos, BULLET_RADIUS, world.player.pos, PLAYER_RADIUS) {
                    player_hit = true;
                    damage_player(world, store, events);
                    continue;
                }
            }
            BulletOwner::Player => {
                // Score is final once the run has been recorded
                if world.phase != GamePhase::GameOver && hit_enemy(world, bullet.pos, events) {
                    continue;
                }
            }
        }

        alive.push(bullet);
    }

    if player_hit {
        alive.retain(|b| b.owner != BulletOwner::Enemy);
    }
    world.bullets = alive;
    world.enemies.retain(|e| e.hp > 0);
}

/// Apply a player bullet at `pos` to the first live enemy it overlaps.
/// Returns true if the bullet was consumed.
fn hit_enemy(world: &mut World, pos: Vec2, events: &mut Vec<GameEvent>) -> bool {
    let Some(idx) = world
        .enemies
        .iter()
        .position(|e| e.hp > 0 && circles_overlap(pos, BULLET_RADIUS, e.pos, ENEMY_RADIUS))
    else {
        return false;
    };

    let enemy = &mut world.enemies[idx];
    enemy.hp = enemy.hp.saturating_sub(1);
    let (enemy_pos, variant, dead) = (enemy.pos, enemy.variant, enemy.hp == 0);

    if dead {
        world.score += variant.stats().score;
        spawn_explosion(world, enemy_pos, ParticleColor::Enemy, events);
        events.push(GameEvent::EnemyDestroyed { pos: enemy_pos, variant });
        events.push(GameEvent::ScoreChanged { score: world.score });
    }
    // Every hit bursts, so a kill shows two overlapping bursts
    spawn_explosion(world, enemy_pos, ParticleColor::Enemy, events);
    true
}

/// The player took a hit: lose a life, then either end the run or respawn
pub fn damage_player(world: &mut World, store: &mut dyn ScoreStore, events: &mut Vec<GameEvent>) {
    if world.phase == GamePhase::GameOver {
        return;
    }

    world.lives = world.lives.saturating_sub(1);
    events.push(GameEvent::LivesChanged { lives: world.lives });

    if world.lives == 0 {
        world.phase = GamePhase::GameOver;
        let waves_survived = world.wave.saturating_sub(1);
        let record = record_run(store, world.score, waves_survived);
        log::info!(
            "Game over: score {} after {} waves (new high score: {}, new best wave: {})",
            world.score,
            waves_survived,
            record.new_high_score,
            record.new_best_wave
        );
        events.push(GameEvent::GameOver {
            score: world.score,
            waves_survived,
            new_high_score: record.new_high_score,
            new_best_wave: record.new_best_wave,
        });
    } else {
        world.bullets.retain(|b| b.owner != BulletOwner::Enemy);
        world.player.pos = PLAYER_START;
        log::debug!("Player hit, {} lives left", world.lives);
    }

    let pos = world.player.pos;
    spawn_explosion(world, pos, ParticleColor::Player, events);
    events.push(GameEvent::PlayerHit { pos });
}

/// Emit a burst of particles at `pos`
pub fn spawn_explosion(world: &mut World, pos: Vec2, color: ParticleColor, events: &mut Vec<GameEvent>) {
    for _ in 0..EXPLOSION_PARTICLES {
        let angle = world.rng.random::<f32>() * std::f32::consts::TAU;
        let speed = world.rng.random_range(80.0..240.0);
        let particle = Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: world.rng.random_range(0.6..1.0),
            max_life: 1.0,
            size: world.rng.random_range(2.0..5.0),
            color,
        };
        world.particles.push(particle);
    }

    if world.particles.len() > world.particle_cap {
        let excess = world.particles.len() - world.particle_cap;
        world.particles.drain(..excess);
    }

    events.push(GameEvent::Explosion { pos, color });
}

/// Drift, fade and prune particles
pub fn update_particles(world: &mut World, dt: f32) {
    for p in &mut world.particles {
        p.vel *= 0.99;
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    world.particles.retain(|p| p.life > 0.0);
}

/// Resolve pickups and expire stale power-ups
pub fn update_powerups(world: &mut World, events: &mut Vec<GameEvent>) {
    let powerups = std::mem::take(&mut world.powerups);
    let mut alive = Vec::with_capacity(powerups.len());

    for powerup in powerups {
        if circles_overlap(powerup.pos, powerup.radius, world.player.pos, PLAYER_RADIUS) {
            match powerup.kind {
                PowerupKind::Heal => {
                    world.lives = (world.lives + 1).min(MAX_LIVES);
                    events.push(GameEvent::LivesChanged { lives: world.lives });
                }
                PowerupKind::Rapid => {
                    world.buff = Buff::Rapid {
                        until: world.time + RAPID_DURATION,
                    };
                }
            }
            log::debug!("Picked up {:?}", powerup.kind);
            events.push(GameEvent::PowerupPickup {
                pos: powerup.pos,
                kind: powerup.kind,
            });
            spawn_explosion(world, powerup.pos, powerup.kind.into(), events);
            continue;
        }
        if world.time - powerup.spawned_at > POWERUP_LIFETIME {
            continue;
        }
        alive.push(powerup);
    }

    world.powerups = alive;
}

/// Advance power-up pulse animation
pub fn animate_powerups(world: &mut World, dt: f32) {
    for powerup in &mut world.powerups {
        powerup.pulse += dt * POWERUP_PULSE_RATE;
    }
}

/// Clear the buff once its expiry has passed
pub fn update_buff(world: &mut World) {
    if let Buff::Rapid { until } = world.buff {
        if world.time > until {
            world.buff = Buff::None;
        }
    }
}
