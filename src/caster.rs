use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::config::EngineConfig;
use crate::player::Player;
use crate::world::{Cell, World};

/// First occupied cell found along one ray of the fan.
///
/// `distance` is the raw Euclidean march distance from the player, NOT
/// corrected for the ray's angular offset from the view center, so a flat
/// wall bows outward toward the fan edges. Kept that way on purpose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub ray: usize,
    pub distance: f32,
    pub cell: Cell,
}

/// Cast the full fan and fill one slot per ray, left to right across the
/// field of view. `None` means the ray left the grid or ran out of depth;
/// the renderer leaves the background showing for that band.
///
/// Rays are independent and read-only over `world`/`player`, so the fan is
/// split across rayon workers, each writing its own slot. The call returns
/// only once every slot is filled.
///
/// # Panics
///
/// Panics if `hits.len()` differs from `config.ray_count`.
pub fn cast_rays(world: &World, player: &Player, config: &EngineConfig, hits: &mut [Option<RayHit>]) {
    assert_eq!(hits.len(), config.ray_count);

    hits.par_iter_mut().enumerate().for_each(|(ray, slot)| {
        *slot = march(world, player, config, ray);
    });
}

/// March a single ray outward in fixed radial steps until it enters an
/// occupied cell, exits the grid, or exhausts the depth budget.
fn march(world: &World, player: &Player, config: &EngineConfig, ray: usize) -> Option<RayHit> {
    let angle =
        player.heading - config.fov * 0.5 + ray as f32 * (config.fov / config.ray_count as f32);
    let (sin, cos) = angle.sin_cos();

    // Start one step out so a hit distance is always positive; the motion
    // probe keeps the player's own cell empty anyway.
    let samples = (config.max_depth / config.step).round() as usize;
    for n in 1..=samples {
        let distance = n as f32 * config.step;
        let x = player.pos[0] + cos * distance;
        let y = player.pos[1] + sin * distance;

        match world.cell_at(x, y) {
            None => return None,
            Some(cell) if cell.blocks() => {
                return Some(RayHit {
                    ray,
                    distance,
                    cell,
                });
            }
            Some(_) => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::world::DEFAULT_LAYOUT;

    fn room() -> World {
        World::from_layout(&DEFAULT_LAYOUT)
    }

    fn cast(world: &World, player: &Player, config: &EngineConfig) -> Vec<Option<RayHit>> {
        let mut hits = vec![None; config.ray_count];
        cast_rays(world, player, config, &mut hits);
        hits
    }

    #[test]
    fn center_ray_reports_east_wall_distance() {
        let world = room();
        let config = EngineConfig::default();
        let player = Player::new(2.5, 2.5, 0.0);

        let hits = cast(&world, &player, &config);
        let center = hits[config.ray_count / 2].expect("center ray must hit the east wall");

        // Wall column begins at x = 7, i.e. 4.5 cells east of the player.
        assert_eq!(center.cell, Cell::Wall);
        assert!(
            (center.distance - 4.5).abs() <= config.step + 1e-4,
            "distance {} not within one step of 4.5",
            center.distance
        );
    }

    #[test]
    fn hit_carries_the_cell_code_of_the_struck_tile() {
        let world = room();
        let config = EngineConfig::default();
        // Facing the north-west boundary corner cell at (0, 0).
        let player = Player::new(1.5, 1.5, PI + PI / 4.0);

        let hits = cast(&world, &player, &config);
        let center = hits[config.ray_count / 2].expect("corner is well within depth");
        assert_eq!(center.cell, Cell::Boundary);
    }

    #[test]
    fn distances_are_within_one_step_of_geometry() {
        let world = room();
        let config = EngineConfig::default();
        // Facing west: wall column spans x < 1, true distance 1.5.
        let player = Player::new(2.5, 2.5, PI);

        let hits = cast(&world, &player, &config);
        let center = hits[config.ray_count / 2].expect("west wall in range");
        assert!(center.distance >= 1.5 - 1e-4);
        assert!(center.distance <= 1.5 + config.step + 1e-4);
    }

    #[test]
    fn all_rays_hit_inside_a_closed_room() {
        let world = room();
        let config = EngineConfig::default();
        let player = Player::new(2.5, 2.5, 0.7);

        let hits = cast(&world, &player, &config);
        for (i, hit) in hits.iter().enumerate() {
            let hit = hit.unwrap_or_else(|| panic!("ray {i} escaped a closed room"));
            assert_eq!(hit.ray, i);
            assert!(hit.distance > 0.0);
            assert!(hit.distance <= config.max_depth);
        }
    }

    #[test]
    fn rays_starting_outside_the_grid_miss() {
        let world = room();
        let config = EngineConfig::default();
        // Well outside, facing further away: first sample is out of bounds.
        let player = Player::new(20.0, 20.0, PI / 4.0);

        let hits = cast(&world, &player, &config);
        assert!(hits.iter().all(Option::is_none));
    }

    #[test]
    fn casting_twice_yields_identical_records() {
        let world = room();
        let config = EngineConfig::default();
        let player = Player::new(3.1, 4.2, 1.234);

        let first = cast(&world, &player, &config);
        let second = cast(&world, &player, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn flat_distance_across_fan() {
        // Documents the uncorrected projection: against a flat wall, edge
        // rays of the fan travel farther than the center ray because the
        // Euclidean distance is not divided by cos(offset from center).
        // Close enough to the east wall that the whole fan lands on it.
        let world = room();
        let config = EngineConfig::default();
        let player = Player::new(5.5, 3.5, 0.0);

        let hits = cast(&world, &player, &config);
        let center = hits[config.ray_count / 2].expect("center hits");
        let edge = hits[0].expect("edge hits");
        assert_eq!(edge.cell, Cell::Wall);
        assert!(edge.distance > center.distance + config.step);
    }
}
