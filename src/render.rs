//! Optional PNG rendering of a solved or unsolved grid, for debugging by
//! eye rather than by assertion. Not part of the solve path; nothing here
//! runs unless the driver is asked for it.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::cell::CellGrid;
use crate::position::{Direction, Position};

/// Pixels per cell interior, not counting the wall line itself.
const CELL_SIZE: u32 = 10;
const WALL_SIZE: u32 = 2;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const WALL: Rgb<u8> = Rgb([0, 0, 0]);
const DEAD: Rgb<u8> = Rgb([235, 190, 190]);
const PATH: Rgb<u8> = Rgb([60, 120, 220]);

/// Renders `grid` to an RGB image: open passages as background, closed
/// walls as black lines, DEAD cells tinted, and (if given) `path` traced
/// from start in the solution color.
pub fn render(grid: &CellGrid, path: Option<&[Direction]>) -> RgbImage {
    let stride = CELL_SIZE + WALL_SIZE;
    let img_width = grid.width as u32 * stride + WALL_SIZE;
    let img_height = grid.height as u32 * stride + WALL_SIZE;

    let mut img: RgbImage = ImageBuffer::from_pixel(img_width, img_height, BACKGROUND);

    for row in 0..grid.height {
        for col in 0..grid.width {
            let p = Position::new(row as i64, col as i64);
            let x0 = col as u32 * stride;
            let y0 = row as u32 * stride;

            let fill = if grid.is_dead(p) { DEAD } else { BACKGROUND };
            fill_rect(&mut img, x0 + WALL_SIZE, y0 + WALL_SIZE, CELL_SIZE, CELL_SIZE, fill);

            if !grid.can_move(p, Direction::North) {
                fill_rect(&mut img, x0, y0, stride + WALL_SIZE, WALL_SIZE, WALL);
            }
            if !grid.can_move(p, Direction::West) {
                fill_rect(&mut img, x0, y0, WALL_SIZE, stride + WALL_SIZE, WALL);
            }
            if !grid.can_move(p, Direction::South) {
                fill_rect(&mut img, x0, y0 + stride, stride + WALL_SIZE, WALL_SIZE, WALL);
            }
            if !grid.can_move(p, Direction::East) {
                fill_rect(&mut img, x0 + stride, y0, WALL_SIZE, stride + WALL_SIZE, WALL);
            }
        }
    }

    if let Some(path) = path {
        let mut at = grid.start();
        mark_cell(&mut img, at, stride);
        for &dir in path {
            at = at.step(dir);
            mark_cell(&mut img, at, stride);
        }
    }

    img
}

fn mark_cell(img: &mut RgbImage, p: Position, stride: u32) {
    let x0 = p.col as u32 * stride + WALL_SIZE;
    let y0 = p.row as u32 * stride + WALL_SIZE;
    fill_rect(img, x0, y0, CELL_SIZE, CELL_SIZE, PATH);
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}
