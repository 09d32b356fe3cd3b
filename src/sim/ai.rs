//! Enemy steering and targeting
//!
//! Enemies drive straight at the player, sliding along walls when one axis is
//! blocked, and fire whenever their gun is ready and they can see the player.

use super::geometry::{has_line_of_sight, move_axis_separated, normalize};
use super::state::{BulletOwner, GameEvent, World};
use crate::consts::{ENEMY_MUZZLE_OFFSET, ENEMY_RADIUS};

/// Advance every enemy by `dt`
pub fn update_enemies(world: &mut World, dt: f32, events: &mut Vec<GameEvent>) {
    let target = world.player.pos;
    let mut shots = Vec::new();

    for enemy in &mut world.enemies {
        let stats = enemy.variant.stats();
        let to_player = target - enemy.pos;
        let dir = normalize(to_player);

        enemy.pos = move_axis_separated(enemy.pos, dir * stats.speed * dt, ENEMY_RADIUS, &world.walls);
        enemy.angle = to_player.y.atan2(to_player.x);

        enemy.cooldown = (enemy.cooldown - dt).max(0.0);
        if enemy.cooldown == 0.0 && has_line_of_sight(enemy.pos, target, &world.walls) {
            let muzzle = enemy.pos + dir * (ENEMY_RADIUS + ENEMY_MUZZLE_OFFSET);
            shots.push((muzzle, dir, stats.bullet_speed));
            enemy.cooldown = stats.fire_cooldown;
        }
    }

    for (origin, dir, speed) in shots {
        world.spawn_bullet(origin, dir, speed, BulletOwner::Enemy);
        events.push(GameEvent::Shoot {
            pos: origin,
            owner: BulletOwner::Enemy,
        });
    }
}
