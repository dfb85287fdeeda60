//! Edge-aware blur post-process.
//!
//! Softens sampling noise in the ray-traced frame (soft-shadow penumbras
//! in particular) without smearing object silhouettes: a neighbour only
//! joins the average when its colour is close to the centre pixel's.
//!
//! The pass reads an immutable snapshot of the finished frame and writes
//! a separate output buffer, row-partitioned across the worker pool the
//! same way the ray tracer parallelizes, so no pixel is read while a
//! neighbour writes it.

use rayon::prelude::*;

use crate::colors::Color;

/// Number of horizontal bands processed in parallel.
const WORKER_BANDS: usize = 4;

/// Neighbours whose summed channel difference exceeds this are treated
/// as lying across an edge and excluded from the average.
const EDGE_THRESHOLD: i32 = 96;

/// Blurs a frame, returning a new buffer of the same size.
pub fn edge_aware_blur(colors: &[u32], width: u32, height: u32) -> Vec<u32> {
    debug_assert_eq!(colors.len(), (width * height) as usize);
    let width = width as usize;
    let height = height as usize;

    let mut output = vec![0u32; colors.len()];
    let rows_per_band = height.div_ceil(WORKER_BANDS);

    output
        .par_chunks_mut(rows_per_band * width)
        .enumerate()
        .for_each(|(band, rows)| {
            let y_start = band * rows_per_band;
            for (offset, pixel) in rows.iter_mut().enumerate() {
                let x = offset % width;
                let y = y_start + offset / width;
                *pixel = blur_pixel(colors, width, height, x, y);
            }
        });

    output
}

fn blur_pixel(colors: &[u32], width: usize, height: usize, x: usize, y: usize) -> u32 {
    let center = Color::from_argb(colors[y * width + x]);

    let mut sum = (center.red as u32, center.green as u32, center.blue as u32);
    let mut count = 1u32;

    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || nx >= width as i32 || ny < 0 || ny >= height as i32 {
                continue;
            }
            let neighbor = Color::from_argb(colors[ny as usize * width + nx as usize]);
            let difference = (neighbor.red as i32 - center.red as i32).abs()
                + (neighbor.green as i32 - center.green as i32).abs()
                + (neighbor.blue as i32 - center.blue as i32).abs();
            if difference > EDGE_THRESHOLD {
                continue;
            }
            sum.0 += neighbor.red as u32;
            sum.1 += neighbor.green as u32;
            sum.2 += neighbor.blue as u32;
            count += 1;
        }
    }

    Color::new(
        (sum.0 / count) as u8,
        (sum.1 / count) as u8,
        (sum.2 / count) as u8,
    )
    .as_argb()
}
