//! Structural similarity (SSIM) between grayscale images.
//!
//! Mean SSIM over every 7x7 window that lies fully inside the image, with
//! uniform weights and sample (N-1) covariance. Scores match scikit-image's
//! `structural_similarity` defaults for 8-bit images.

use image::GrayImage;
use ndarray::Array2;

use crate::error::SimilarityError;

/// Side of the square comparison window.
pub const WINDOW: u32 = 7;

const DATA_RANGE: f64 = 255.0;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Mean SSIM of two equally sized images, in [-1, 1].
pub fn ssim(left: &GrayImage, right: &GrayImage) -> Result<f64, SimilarityError> {
    if left.dimensions() != right.dimensions() {
        return Err(SimilarityError::DimensionMismatch {
            left: left.dimensions(),
            right: right.dimensions(),
        });
    }

    let (width, height) = left.dimensions();
    if width < WINDOW || height < WINDOW {
        return Err(SimilarityError::TooSmall((width, height), WINDOW));
    }

    let x = to_array(left);
    let y = to_array(right);

    let sum_x = integral(&x);
    let sum_y = integral(&y);
    let sum_xx = integral(&(&x * &x));
    let sum_yy = integral(&(&y * &y));
    let sum_xy = integral(&(&x * &y));

    let n = f64::from(WINDOW * WINDOW);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let win = WINDOW as usize;
    let rows = height as usize - win + 1;
    let cols = width as usize - win + 1;

    let mut total = 0.0;
    for r in 0..rows {
        for c in 0..cols {
            let sx = window_sum(&sum_x, r, c, win);
            let sy = window_sum(&sum_y, r, c, win);
            let sxx = window_sum(&sum_xx, r, c, win);
            let syy = window_sum(&sum_yy, r, c, win);
            let sxy = window_sum(&sum_xy, r, c, win);

            let mx = sx / n;
            let my = sy / n;
            let vx = (sxx - sx * mx) / (n - 1.0);
            let vy = (syy - sy * my) / (n - 1.0);
            let cov = (sxy - sx * my) / (n - 1.0);

            total += ((2.0 * mx * my + c1) * (2.0 * cov + c2))
                / ((mx * mx + my * my + c1) * (vx + vy + c2));
        }
    }

    Ok(total / (rows * cols) as f64)
}

fn to_array(image: &GrayImage) -> Array2<f64> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
        f64::from(image.get_pixel(c as u32, r as u32)[0])
    })
}

/// Summed-area table with a zero row and column in front.
fn integral(values: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = values.dim();
    let mut table = Array2::<f64>::zeros((rows + 1, cols + 1));
    for r in 0..rows {
        for c in 0..cols {
            table[[r + 1, c + 1]] =
                values[[r, c]] + table[[r, c + 1]] + table[[r + 1, c]] - table[[r, c]];
        }
    }
    table
}

fn window_sum(table: &Array2<f64>, r: usize, c: usize, win: usize) -> f64 {
    table[[r + win, c + win]] - table[[r, c + win]] - table[[r + win, c]] + table[[r, c]]
}
