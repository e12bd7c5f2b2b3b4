use crate::caster::RayHit;
use crate::player::Player;
use crate::world::{Cell, World};

/// Single wall-height factor applied to every projected slice.
const WALL_HEIGHT_FACTOR: f32 = 1.0;

/// Guards the division for hits at (near-)zero distance.
const MIN_DISTANCE: f32 = 1e-4;

/// Minimap tile size in pixels.
const MINIMAP_SCALE: usize = 10;

#[inline]
const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory, alpha left at 0
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

const SKY: u32 = pack_rgb(30, 30, 70);
const GROUND: u32 = pack_rgb(40, 40, 40);
const WALL: u32 = pack_rgb(200, 200, 200);
const BOUNDARY: u32 = pack_rgb(180, 180, 250);
const MAP_FLOOR: u32 = pack_rgb(15, 15, 15);
const MAP_WALL: u32 = pack_rgb(230, 230, 230);
const MAP_BOUNDARY: u32 = pack_rgb(170, 170, 240);
const PLAYER: u32 = pack_rgb(60, 120, 255);

/// Paint one frame: background halves, then a vertical slice per ray hit,
/// then the minimap overlay. `hits` slot i covers the column band
/// `[i * width / hits.len(), (i + 1) * width / hits.len())`.
pub fn render_frame(
    buf: &mut [u32],
    width: usize,
    height: usize,
    world: &World,
    player: &Player,
    hits: &[Option<RayHit>],
) {
    let mid = height / 2;
    for y in 0..mid {
        let row = y * width;
        buf[row..row + width].fill(SKY);
    }
    for y in mid..height {
        let row = y * width;
        buf[row..row + width].fill(GROUND);
    }

    draw_walls(buf, width, height, hits);
    draw_minimap(buf, width, height, world, player);
}

fn draw_walls(buf: &mut [u32], width: usize, height: usize, hits: &[Option<RayHit>]) {
    let n = hits.len();
    if n == 0 {
        return;
    }

    for hit in hits.iter().flatten() {
        let (top, bottom) = wall_span(hit.distance, height);
        let color = match hit.cell {
            Cell::Boundary => BOUNDARY,
            _ => WALL,
        };

        // The record's ray index picks the column band.
        let x0 = hit.ray * width / n;
        let x1 = ((hit.ray + 1) * width / n).min(width);
        for y in top..bottom {
            let row = y * width;
            buf[row + x0..row + x1].fill(color);
        }
    }
}

/// Screen rows `[top, bottom)` of a slice at the given march distance,
/// vertically centered and clamped. Closer hits produce taller slices.
fn wall_span(distance: f32, height: usize) -> (usize, usize) {
    let slice = (height as f32 / distance.max(MIN_DISTANCE)) * WALL_HEIGHT_FACTOR;
    let half = slice * 0.5;
    let mid = height as f32 * 0.5;
    let top = (mid - half).max(0.0) as usize;
    let bottom = ((mid + half) as usize).min(height);
    (top, bottom)
}

fn draw_minimap(buf: &mut [u32], width: usize, height: usize, world: &World, player: &Player) {
    for row in 0..world.rows() {
        for col in 0..world.cols() {
            let color = match world.cell(col, row).unwrap_or(Cell::Empty) {
                Cell::Empty => MAP_FLOOR,
                Cell::Wall => MAP_WALL,
                Cell::Boundary => MAP_BOUNDARY,
            };
            fill_rect(
                buf,
                width,
                height,
                col * MINIMAP_SCALE,
                row * MINIMAP_SCALE,
                MINIMAP_SCALE,
                MINIMAP_SCALE,
                color,
            );
        }
    }

    // Player marker and a one-cell heading line.
    let scale = MINIMAP_SCALE as f32;
    let px = player.pos[0] * scale;
    let py = player.pos[1] * scale;
    fill_rect(
        buf,
        width,
        height,
        (px - 2.0).max(0.0) as usize,
        (py - 2.0).max(0.0) as usize,
        5,
        5,
        PLAYER,
    );

    let [dx, dy] = player.dir();
    draw_line(buf, width, height, px, py, px + dx * scale, py + dy * scale, PLAYER);
}

fn fill_rect(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    color: u32,
) {
    let x1 = (x + w).min(width);
    let y1 = (y + h).min(height);
    if x >= x1 {
        return;
    }
    for row in y..y1 {
        let base = row * width;
        buf[base + x..base + x1].fill(color);
    }
}

/// Sampled line, fine enough for the short minimap heading stroke.
fn draw_line(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    color: u32,
) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0);
    for n in 0..=steps as usize {
        let t = n as f32 / steps;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = (x as usize, y as usize);
        if x < width && y < height {
            buf[y * width + x] = color;
        }
    }
}
