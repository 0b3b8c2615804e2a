//! Masked template matching comparison
//!
//! The squared difference at each position expands to
//! `Σm·T² - 2·Σm·T·I + Σm·I²`. The first term is fixed per template. The
//! other two are correlations of the capture with the masked template and
//! with the mask; when the search area is large they are computed with FFTs
//! instead of sliding the template pixel by pixel.

use image::{imageops, DynamicImage, GrayImage, RgbaImage};
use imageproc::rect::Rect;
use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

use super::l2_norm::squared_difference;
use super::preprocess::SourceImage;

/// Cost of one FFT step relative to one direct per-pixel step
const FFT_COST_FACTOR: f64 = 8.0;

/// Scores by the best normalized squared difference of the source, cropped to
/// its mask's bounding box, slid across the resized capture
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateComparison {
    source: SourceImage,
    template_size: (u32, u32),
    /// Comparable template pixels as (x, y, rgba)
    template_pixels: Vec<(u32, u32, [u8; 4])>,
    template_norm: u64,
}

impl TemplateComparison {
    pub fn new(source: SourceImage) -> Self {
        let (template_size, template_pixels) = match source.mask() {
            None => {
                let pixels = source
                    .pixels()
                    .enumerate_pixels()
                    .map(|(x, y, p)| (x, y, p.0))
                    .collect();
                ((source.width(), source.height()), pixels)
            }
            Some(mask) => match mask_bounding_rect(mask) {
                Some(rect) => {
                    let (left, top) = (rect.left() as u32, rect.top() as u32);
                    let template =
                        imageops::crop_imm(source.pixels(), left, top, rect.width(), rect.height())
                            .to_image();
                    let template_mask =
                        imageops::crop_imm(mask, left, top, rect.width(), rect.height()).to_image();
                    let pixels = template
                        .enumerate_pixels()
                        .filter(|(x, y, _)| template_mask.get_pixel(*x, *y)[0] != 0)
                        .map(|(x, y, p)| (x, y, p.0))
                        .collect();
                    ((rect.width(), rect.height()), pixels)
                }
                None => ((0, 0), Vec::new()),
            },
        };

        let template_norm = template_pixels
            .iter()
            .map(|(_, _, p)| squared_difference(p, &[0; 4]))
            .sum();

        Self {
            source,
            template_size,
            template_pixels,
            template_norm,
        }
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub(crate) fn into_source(self) -> SourceImage {
        self.source
    }

    /// Width and height of the cropped template
    pub fn template_size(&self) -> (u32, u32) {
        self.template_size
    }

    /// Similarity from 0 to 1: one minus the lowest normalized squared difference
    pub fn compare(&self, capture: &DynamicImage) -> f64 {
        let (tw, th) = self.template_size;
        if self.template_pixels.is_empty() {
            return 0.0;
        }

        let capture = self.source.resize_capture(capture);
        let (cw, ch) = capture.dimensions();
        if tw > cw || th > ch {
            return 0.0;
        }

        let best = if self.prefers_fourier(cw, ch) {
            self.fourier_search(&capture)
        } else {
            self.direct_search(&capture)
        };
        (1.0 - best).clamp(0.0, 1.0)
    }

    /// Whether correlating through FFTs is cheaper than sliding the template
    /// over a `width` x `height` capture
    pub(crate) fn prefers_fourier(&self, width: u32, height: u32) -> bool {
        let (tw, th) = self.template_size;
        if tw > width || th > height {
            return false;
        }
        let positions = (width - tw + 1) as f64 * (height - th + 1) as f64;
        let direct = positions * self.template_pixels.len() as f64;
        let area = width as f64 * height as f64;
        direct > FFT_COST_FACTOR * area * area.log2()
    }

    /// Lowest normalized squared difference, summing every position directly
    pub(crate) fn direct_search(&self, capture: &RgbaImage) -> f64 {
        let (tw, th) = self.template_size;
        let (cw, ch) = capture.dimensions();
        let raw = capture.as_raw();
        let mut best = 1.0f64;

        'search: for y in 0..=ch - th {
            for x in 0..=cw - tw {
                let mut sqdiff = 0u64;
                let mut capture_norm = 0u64;
                for &(dx, dy, template) in &self.template_pixels {
                    let idx = (((y + dy) * cw + x + dx) * 4) as usize;
                    let pixel = [raw[idx], raw[idx + 1], raw[idx + 2], raw[idx + 3]];
                    sqdiff += squared_difference(&template, &pixel);
                    capture_norm += squared_difference(&pixel, &[0; 4]);
                }

                best = best.min(normalized_sqdiff(sqdiff, self.template_norm, capture_norm));
                if best == 0.0 {
                    break 'search;
                }
            }
        }
        best
    }

    /// Lowest normalized squared difference, with the cross term and the
    /// capture norm of every position taken from one inverse FFT.
    ///
    /// Channels are packed two per complex signal. Both sums are integers,
    /// so rounding them recovers the exact values of the direct search.
    pub(crate) fn fourier_search(&self, capture: &RgbaImage) -> f64 {
        let (tw, th) = (self.template_size.0 as usize, self.template_size.1 as usize);
        let (w, h) = (capture.width() as usize, capture.height() as usize);
        let n = w * h;
        let zero = Complex::new(0.0, 0.0);

        let mut red_green = Vec::with_capacity(n);
        let mut blue_alpha = Vec::with_capacity(n);
        let mut energy = Vec::with_capacity(n);
        for pixel in capture.pixels() {
            let [r, g, b, a] = pixel.0.map(f64::from);
            red_green.push(Complex::new(r, g));
            blue_alpha.push(Complex::new(b, a));
            energy.push(Complex::new(r * r + g * g + b * b + a * a, 0.0));
        }

        // Template and mask padded to the capture size, anchored top left
        let mut template_red_green = vec![zero; n];
        let mut template_blue_alpha = vec![zero; n];
        let mut mask = vec![zero; n];
        for &(x, y, [r, g, b, a]) in &self.template_pixels {
            let i = y as usize * w + x as usize;
            template_red_green[i] = Complex::new(r as f64, g as f64);
            template_blue_alpha[i] = Complex::new(b as f64, a as f64);
            mask[i] = Complex::new(1.0, 0.0);
        }

        let mut planner = FftPlanner::new();
        for buffer in [
            &mut red_green,
            &mut blue_alpha,
            &mut energy,
            &mut template_red_green,
            &mut template_blue_alpha,
            &mut mask,
        ] {
            fft_2d(&mut planner, buffer, w, h, FftDirection::Forward);
        }

        // Real part: Σ m·T·I over the four channels. Imaginary part: Σ m·I².
        let mut sums: Vec<Complex<f64>> = (0..n)
            .map(|k| {
                let (ky, kx) = (k / w, k % w);
                let mirrored = ((h - ky) % h) * w + (w - kx) % w;
                let (r, g) = unpack(&red_green, k, mirrored);
                let (b, a) = unpack(&blue_alpha, k, mirrored);
                let (tr, tg) = unpack(&template_red_green, k, mirrored);
                let (tb, ta) = unpack(&template_blue_alpha, k, mirrored);
                let cross = r * tr.conj() + g * tg.conj() + b * tb.conj() + a * ta.conj();
                let capture_norm = energy[k] * mask[k].conj();
                cross + Complex::<f64>::i() * capture_norm
            })
            .collect();
        fft_2d(&mut planner, &mut sums, w, h, FftDirection::Inverse);

        let scale = n as f64;
        let template_norm = self.template_norm as i64;
        let mut best = 1.0f64;
        for y in 0..=h - th {
            for x in 0..=w - tw {
                let sum = sums[y * w + x] / scale;
                let cross = sum.re.round() as i64;
                let capture_norm = sum.im.round().max(0.0) as i64;
                let sqdiff = (template_norm - 2 * cross + capture_norm).max(0) as u64;
                best = best.min(normalized_sqdiff(
                    sqdiff,
                    self.template_norm,
                    capture_norm as u64,
                ));
            }
        }
        best
    }
}

/// Spectra of the real and the imaginary part of a packed signal at bin `k`,
/// `mirrored` being the bin of `-k`
fn unpack(spectrum: &[Complex<f64>], k: usize, mirrored: usize) -> (Complex<f64>, Complex<f64>) {
    let conjugate = spectrum[mirrored].conj();
    (
        (spectrum[k] + conjugate) * 0.5,
        (spectrum[k] - conjugate) * Complex::new(0.0, -0.5),
    )
}

/// Unnormalized 2-D FFT of a row-major `width` x `height` grid, in place
fn fft_2d(
    planner: &mut FftPlanner<f64>,
    data: &mut [Complex<f64>],
    width: usize,
    height: usize,
    direction: FftDirection,
) {
    planner.plan_fft(width, direction).process(data);
    let mut columns = transpose(data, width, height);
    planner.plan_fft(height, direction).process(&mut columns);
    data.copy_from_slice(&transpose(&columns, height, width));
}

fn transpose(data: &[Complex<f64>], width: usize, height: usize) -> Vec<Complex<f64>> {
    let mut out = vec![Complex::new(0.0, 0.0); data.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = data[y * width + x];
        }
    }
    out
}

/// `sqdiff / sqrt(template_norm * capture_norm)` limited to [0, 1]. A window
/// with no difference is a perfect match even when both sides are black.
fn normalized_sqdiff(sqdiff: u64, template_norm: u64, capture_norm: u64) -> f64 {
    if sqdiff == 0 {
        return 0.0;
    }
    let denominator = (template_norm as f64 * capture_norm as f64).sqrt();
    if denominator == 0.0 {
        return 1.0;
    }
    (sqdiff as f64 / denominator).min(1.0)
}

/// Smallest rectangle containing every non-zero mask pixel
fn mask_bounding_rect(mask: &GrayImage) -> Option<Rect> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in mask.enumerate_pixels() {
        if p[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((left, top, right, bottom)) => {
                (left.min(x), top.min(y), right.max(x), bottom.max(y))
            }
        });
    }

    bounds.map(|(left, top, right, bottom)| {
        Rect::at(left as i32, top as i32).of_size(right - left + 1, bottom - top + 1)
    })
}
