use std::sync::Arc;

use image::{ImageBuffer, Luma, Rgb32FImage};
use imageproc::template_matching::Extremes;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

pub type Luma32fImage = ImageBuffer<Luma<f32>, Vec<f32>>;

const CHANNELS: usize = 3;

/// Variance below this is treated as a flat region (samples are in `[0, 1]`).
const FLAT_EPSILON: f64 = 1e-7;

/// Summed-area tables with a zero first row and column: one of the sums per
/// channel, and one of the squares of all channels together.
struct Integral {
    stride: usize,
    sums: [Vec<f64>; CHANNELS],
    sq_sum: Vec<f64>,
}

impl Integral {
    fn new(image: &Rgb32FImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sums: [Vec<f64>; CHANNELS] = std::array::from_fn(|_| vec![0.0; stride * (h + 1)]);
        let mut sq_sum = vec![0.0; stride * (h + 1)];
        let raw = image.as_raw();
        for y in 0..h {
            let mut row = [0.0; CHANNELS];
            let mut row_sq = 0.0;
            for x in 0..w {
                let at = (y + 1) * stride + x + 1;
                let above = y * stride + x + 1;
                let px = &raw[(y * w + x) * CHANNELS..(y * w + x + 1) * CHANNELS];
                for (c, v) in px.iter().enumerate() {
                    let v = *v as f64;
                    row[c] += v;
                    row_sq += v * v;
                    sums[c][at] = sums[c][above] + row[c];
                }
                sq_sum[at] = sq_sum[above] + row_sq;
            }
        }
        Self {
            stride,
            sums,
            sq_sum,
        }
    }

    fn window(&self, table: &[f64], x: usize, y: usize, w: usize, h: usize) -> f64 {
        let s = self.stride;
        table[(y + h) * s + x + w] - table[y * s + x + w] - table[(y + h) * s + x] + table[y * s + x]
    }

    /// `sum((I - mean(I))^2)` over the window, each channel centred on its own mean.
    fn centered_sq_sum(&self, x: usize, y: usize, w: usize, h: usize) -> f64 {
        let n = (w * h) as f64;
        let sq = self.window(&self.sq_sum, x, y, w, h);
        let means: f64 = self
            .sums
            .iter()
            .map(|table| {
                let s = self.window(table, x, y, w, h);
                s * s / n
            })
            .sum();
        sq - means
    }
}

/// 2-D DFTs of a fixed `width x height` grid, rows first, then columns.
///
/// Spectra come out transposed (`width` rows of `height`), [`Fft2d::inverse`]
/// takes them in that layout.
struct Fft2d {
    width: usize,
    height: usize,
    rows: Arc<dyn Fft<f64>>,
    cols: Arc<dyn Fft<f64>>,
    rows_inv: Arc<dyn Fft<f64>>,
    cols_inv: Arc<dyn Fft<f64>>,
}

impl Fft2d {
    fn new(width: usize, height: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            width,
            height,
            rows: planner.plan_fft_forward(width),
            cols: planner.plan_fft_forward(height),
            rows_inv: planner.plan_fft_inverse(width),
            cols_inv: planner.plan_fft_inverse(height),
        }
    }

    fn forward(&self, mut data: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
        self.rows.process(&mut data);
        let mut spectrum = transpose(&data, self.width, self.height);
        self.cols.process(&mut spectrum);
        spectrum
    }

    /// Unnormalized: the result is `width * height` times the input signal.
    fn inverse(&self, mut spectrum: Vec<Complex<f64>>) -> Vec<Complex<f64>> {
        self.cols_inv.process(&mut spectrum);
        let mut data = transpose(&spectrum, self.height, self.width);
        self.rows_inv.process(&mut data);
        data
    }
}

/// `height` rows of `width` into `width` rows of `height`.
fn transpose(src: &[Complex<f64>], width: usize, height: usize) -> Vec<Complex<f64>> {
    let mut dst = vec![Complex::default(); src.len()];
    for (y, row) in src.chunks_exact(width).enumerate() {
        for (x, v) in row.iter().enumerate() {
            dst[x * height + y] = *v;
        }
    }
    dst
}

/// Puts channel `re` (and `im`, if any) of an interleaved RGB buffer
/// `src_width` pixels wide into the top-left of a zeroed `width x height` grid.
fn pack(
    raw: &[f32],
    src_width: usize,
    width: usize,
    height: usize,
    re: usize,
    im: Option<usize>,
) -> Vec<Complex<f64>> {
    let mut grid = vec![Complex::default(); width * height];
    for (y, row) in raw.chunks_exact(src_width * CHANNELS).enumerate() {
        for (x, px) in row.chunks_exact(CHANNELS).enumerate() {
            grid[y * width + x] = Complex::new(px[re] as f64, im.map_or(0.0, |c| px[c] as f64));
        }
    }
    grid
}

/// Cross-correlation summed over the channels, `sum(I[y + j][x + i] * T[j][i])`,
/// for every anchor of the image in row-major order. Anchors where the template
/// does not fit wrap around and mean nothing.
///
/// Two channels share a transform: for `z = a + ib` and `w = p + iq`,
/// `Re(z * conj(w)) = ap + bq`.
fn correlate(
    image: &[f32],
    width: usize,
    height: usize,
    template: &[f32],
    template_width: usize,
) -> Vec<f64> {
    let fft = Fft2d::new(width, height);
    let mut acc = vec![Complex::default(); width * height];
    for (re, im) in [(0, Some(1)), (2, None)] {
        let z = fft.forward(pack(image, width, width, height, re, im));
        let w = fft.forward(pack(template, template_width, width, height, re, im));
        for ((acc, z), w) in acc.iter_mut().zip(&z).zip(&w) {
            *acc += *z * w.conj();
        }
    }

    let scale = (width * height) as f64;
    fft.inverse(acc).into_iter().map(|v| v.re / scale).collect()
}

/// Slides `template` over `image` and scores every top-left anchor with the
/// normalized correlation coefficient (OpenCV's `TM_CCOEFF_NORMED`).
///
/// Like OpenCV on a 3-channel input, each channel is centred on its own mean and
/// the products and squares are summed over all channels before normalizing, so
/// a color difference lowers the score even at equal brightness.
///
/// The result is `(W - w + 1) x (H - h + 1)`, each value in `[-1, 1]`.
/// A flat window (or a flat template) scores `0`. If the template does not
/// fit into the image the result is empty.
pub fn ccoeff_normed(image: &Rgb32FImage, template: &Rgb32FImage) -> Luma32fImage {
    let (iw, ih) = (image.width() as usize, image.height() as usize);
    let (tw, th) = (template.width() as usize, template.height() as usize);
    if tw == 0 || th == 0 || tw > iw || th > ih {
        return ImageBuffer::new(0, 0);
    }
    let (rw, rh) = (iw - tw + 1, ih - th + 1);
    let n = (tw * th) as f64;

    let mut means = [0.0f64; CHANNELS];
    for px in template.as_raw().chunks_exact(CHANNELS) {
        for (mean, v) in means.iter_mut().zip(px) {
            *mean += *v as f64;
        }
    }
    means.iter_mut().for_each(|mean| *mean /= n);

    // T' = T - mean(T) sums to zero, so correlating it with I equals correlating with I - mean(I)
    let centered: Vec<f32> = template
        .as_raw()
        .chunks_exact(CHANNELS)
        .flat_map(|px| px.iter().zip(means).map(|(v, mean)| (*v as f64 - mean) as f32))
        .collect();
    let t_sq_sum: f64 = centered.iter().map(|v| (*v as f64).powi(2)).sum();
    if t_sq_sum < FLAT_EPSILON {
        return ImageBuffer::new(rw as u32, rh as u32);
    }

    let numerator = correlate(image.as_raw(), iw, ih, &centered, tw);
    let integral = Integral::new(image);
    let mut data = vec![0.0f32; rw * rh];
    for y in 0..rh {
        for x in 0..rw {
            let var = integral.centered_sq_sum(x, y, tw, th);
            if var < FLAT_EPSILON {
                continue;
            }
            let score = numerator[y * iw + x] / (var * t_sq_sum).sqrt();
            data[y * rw + x] = score.clamp(-1.0, 1.0) as f32;
        }
    }

    ImageBuffer::from_raw(rw as u32, rh as u32, data).unwrap_or_else(|| ImageBuffer::new(0, 0))
}

/// Finds the smallest and largest values and their locations in a score map.
///
/// Ties keep the first location in row-major order. Returns [`None`] for an empty map.
pub fn find_extremes(input: &Luma32fImage) -> Option<Extremes<f32>> {
    if input.width() == 0 || input.height() == 0 {
        return None;
    }

    let mut min_value = f32::MAX;
    let mut min_value_location = (0, 0);
    let mut max_value = f32::MIN;
    let mut max_value_location = (0, 0);

    for (x, y, pixel) in input.enumerate_pixels() {
        let value = pixel.0[0];
        if value < min_value {
            min_value = value;
            min_value_location = (x, y);
        }
        if value > max_value {
            max_value = value;
            max_value_location = (x, y);
        }
    }

    Some(Extremes {
        min_value,
        max_value,
        min_value_location,
        max_value_location,
    })
}
