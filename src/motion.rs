use crate::config::EngineConfig;
use crate::player::Player;
use crate::world::World;

/// One tick's worth of movement input. Each axis is a signed scalar,
/// typically -1, 0 or +1, scaled by the config speeds when applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: f32,
    pub turn: f32,
}

/// Advance the player by one tick.
///
/// Rotation is applied first and never collides. Translation computes a
/// candidate point along the (new) heading and commits it only if the
/// five-point probe clears; otherwise the whole displacement is dropped,
/// with no sliding along the free axis.
///
/// The probe samples the candidate itself and four points offset by
/// `collision_radius` along each axis. A displacement larger than the
/// radius in a single tick can step past those samples; callers keep
/// `move_speed` ≤ `collision_radius`.
pub fn apply(player: &mut Player, intent: MoveIntent, world: &World, config: &EngineConfig) {
    player.heading += intent.turn * config.turn_speed;

    if intent.forward == 0.0 {
        return;
    }

    let [dx, dy] = player.dir();
    let next_x = player.pos[0] + dx * intent.forward * config.move_speed;
    let next_y = player.pos[1] + dy * intent.forward * config.move_speed;

    if !probe_blocked(world, next_x, next_y, config.collision_radius) {
        player.pos = [next_x, next_y];
    }
}

fn probe_blocked(world: &World, x: f32, y: f32, radius: f32) -> bool {
    world.is_occupied(x, y)
        || world.is_occupied(x + radius, y)
        || world.is_occupied(x - radius, y)
        || world.is_occupied(x, y + radius)
        || world.is_occupied(x, y - radius)
}
