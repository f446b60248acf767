/*
 * Copyright (c) Radzivon Bartoshyk, 02/2025. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::conversion_error::check_packed_image;
use crate::images::{Nv12ImageMut, RgbSourceOrder};
use crate::internals::ProcessedOffset;
use crate::matrix::{CbCrForwardTransform, YuvStandardMatrix, UV_PRESCALED_BIAS, Y_PRESCALED_BIAS};
use crate::numerics::mulhrs;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
use crate::sse::sse_rgb_to_nv12_rows;
use crate::ConvertError;
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

#[inline(always)]
fn luma_dot(r: i16, g: i16, b: i16, transform: &CbCrForwardTransform<i16>) -> u8 {
    // Inputs are pre-scaled by 64 so the 16-bit multiply-high keeps enough
    // precision; the bias carries 16*64 plus half a step for the final >> 6.
    let y = mulhrs(r << 6, transform.yr)
        + mulhrs(g << 6, transform.yg)
        + mulhrs(b << 6, transform.yb)
        + Y_PRESCALED_BIAS;
    ((y >> 6) as i32).clamp(0, 255) as u8
}

#[inline(always)]
fn chroma_dot(
    r4: i16,
    g4: i16,
    b4: i16,
    cr: i16,
    cg: i16,
    cb: i16,
) -> u8 {
    // r4/g4/b4 are 2x2 sums (max 1020). The weights carry a x2 pre-scale, so
    // a single >> 3 both averages the four pixels and drops the pre-scale.
    let c = mulhrs(r4, cr) + mulhrs(g4, cg) + mulhrs(b4, cb) + UV_PRESCALED_BIAS;
    ((c >> 3) as i32).clamp(0, 255) as u8
}

fn rgbx_to_nv12<const ORIGIN_CHANNELS: u8>(
    image: &mut Nv12ImageMut<u8>,
    rgb: &[u8],
    rgb_stride: u32,
    matrix: YuvStandardMatrix,
) -> Result<(), ConvertError> {
    let src_order: RgbSourceOrder = ORIGIN_CHANNELS.into();
    const CHANNELS: usize = 3;

    check_packed_image(rgb, rgb_stride, image.width, image.height, CHANNELS)?;
    image.check_constraints()?;
    if image.width % 8 != 0 || image.height % 2 != 0 {
        return Err(ConvertError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let transform = matrix.weights().to_fixed_point();

    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
    let use_sse = std::arch::is_x86_feature_detected!("sse4.1");

    let width = image.width;
    let r_offset = src_order.r_offset();
    let g_offset = src_order.g_offset();
    let b_offset = src_order.b_offset();

    let process_wide_row = |_y_dst0: &mut [u8],
                            _y_dst1: &mut [u8],
                            _uv_dst: &mut [u8],
                            _rgb0: &[u8],
                            _rgb1: &[u8]| {
        let mut _offset: ProcessedOffset = ProcessedOffset { cx: 0, ux: 0 };
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        if use_sse {
            _offset = sse_rgb_to_nv12_rows::<ORIGIN_CHANNELS>(
                _y_dst0, _y_dst1, _uv_dst, _rgb0, _rgb1, width, &transform, _offset.cx,
                _offset.ux,
            );
        }
        _offset
    };

    let process_double_row =
        |y_dst0: &mut [u8], y_dst1: &mut [u8], uv_dst: &mut [u8], rgb0: &[u8], rgb1: &[u8]| {
            let offset = process_wide_row(y_dst0, y_dst1, uv_dst, rgb0, rgb1);

            for ((((y_dst0, y_dst1), uv_dst), rgb0), rgb1) in y_dst0
                .chunks_exact_mut(2)
                .zip(y_dst1.chunks_exact_mut(2))
                .zip(uv_dst.chunks_exact_mut(2))
                .zip(rgb0.chunks_exact(CHANNELS * 2))
                .zip(rgb1.chunks_exact(CHANNELS * 2))
                .skip(offset.cx / 2)
            {
                let rgb00 = &rgb0[0..CHANNELS];
                let r00 = rgb00[r_offset] as i16;
                let g00 = rgb00[g_offset] as i16;
                let b00 = rgb00[b_offset] as i16;
                y_dst0[0] = luma_dot(r00, g00, b00, &transform);

                let rgb01 = &rgb0[CHANNELS..CHANNELS * 2];
                let r01 = rgb01[r_offset] as i16;
                let g01 = rgb01[g_offset] as i16;
                let b01 = rgb01[b_offset] as i16;
                y_dst0[1] = luma_dot(r01, g01, b01, &transform);

                let rgb10 = &rgb1[0..CHANNELS];
                let r10 = rgb10[r_offset] as i16;
                let g10 = rgb10[g_offset] as i16;
                let b10 = rgb10[b_offset] as i16;
                y_dst1[0] = luma_dot(r10, g10, b10, &transform);

                let rgb11 = &rgb1[CHANNELS..CHANNELS * 2];
                let r11 = rgb11[r_offset] as i16;
                let g11 = rgb11[g_offset] as i16;
                let b11 = rgb11[b_offset] as i16;
                y_dst1[1] = luma_dot(r11, g11, b11, &transform);

                let r4 = r00 + r01 + r10 + r11;
                let g4 = g00 + g01 + g10 + g11;
                let b4 = b00 + b01 + b10 + b11;

                uv_dst[0] = chroma_dot(r4, g4, b4, transform.cb_r, transform.cb_g, transform.cb_b);
                uv_dst[1] = chroma_dot(r4, g4, b4, transform.cr_r, transform.cr_g, transform.cr_b);
            }
        };

    let y_plane = image.y_plane.borrow_mut();
    let y_stride = image.y_stride;
    let uv_plane = image.uv_plane.borrow_mut();
    let uv_stride = image.uv_stride;

    let iter;
    #[cfg(feature = "rayon")]
    {
        iter = y_plane
            .par_chunks_exact_mut(y_stride as usize * 2)
            .zip(uv_plane.par_chunks_exact_mut(uv_stride as usize))
            .zip(rgb.par_chunks_exact(rgb_stride as usize * 2));
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = y_plane
            .chunks_exact_mut(y_stride as usize * 2)
            .zip(uv_plane.chunks_exact_mut(uv_stride as usize))
            .zip(rgb.chunks_exact(rgb_stride as usize * 2));
    }
    iter.for_each(|((y_rows, uv_dst), rgb_rows)| {
        let (y_dst0, y_dst1) = y_rows.split_at_mut(y_stride as usize);
        let (rgb0, rgb1) = rgb_rows.split_at(rgb_stride as usize);
        process_double_row(
            &mut y_dst0[0..width as usize],
            &mut y_dst1[0..width as usize],
            &mut uv_dst[0..width as usize],
            &rgb0[0..width as usize * CHANNELS],
            &rgb1[0..width as usize * CHANNELS],
        );
    });

    Ok(())
}

/// Convert a packed RGB 8-bit image to NV12 with 2x2 box-filtered chroma.
///
/// Limited-range output: Y in [16, 235], Cb/Cr around the 128 neutral point.
/// Width must be a multiple of 8 and height even.
///
/// # Arguments
///
/// * `image`: Target NV12 bi-planar image
/// * `rgb`: Source packed RGB data
/// * `rgb_stride`: Source stride in bytes
/// * `matrix`: Conversion standard, BT.601 or BT.709
pub fn rgb_to_nv12(
    image: &mut Nv12ImageMut<u8>,
    rgb: &[u8],
    rgb_stride: u32,
    matrix: YuvStandardMatrix,
) -> Result<(), ConvertError> {
    rgbx_to_nv12::<{ RgbSourceOrder::Rgb as u8 }>(image, rgb, rgb_stride, matrix)
}

/// Convert a packed BGR 8-bit image to NV12 with 2x2 box-filtered chroma.
///
/// Limited-range output: Y in [16, 235], Cb/Cr around the 128 neutral point.
/// Width must be a multiple of 8 and height even.
///
/// # Arguments
///
/// * `image`: Target NV12 bi-planar image
/// * `bgr`: Source packed BGR data
/// * `bgr_stride`: Source stride in bytes
/// * `matrix`: Conversion standard, BT.601 or BT.709
pub fn bgr_to_nv12(
    image: &mut Nv12ImageMut<u8>,
    bgr: &[u8],
    bgr_stride: u32,
    matrix: YuvStandardMatrix,
) -> Result<(), ConvertError> {
    rgbx_to_nv12::<{ RgbSourceOrder::Bgr as u8 }>(image, bgr, bgr_stride, matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn reference_nv12(
        rgb: &[u8],
        width: usize,
        height: usize,
        matrix: YuvStandardMatrix,
    ) -> (Vec<u8>, Vec<u8>) {
        let w = matrix.weights();
        let mut y_plane = vec![0u8; width * height];
        let mut uv_plane = vec![0u8; width * height / 2];
        for y in 0..height {
            for x in 0..width {
                let px = &rgb[(y * width + x) * 3..][..3];
                let (r, g, b) = (px[0] as f64, px[1] as f64, px[2] as f64);
                let luma = w.yr as f64 * r + w.yg as f64 * g + w.yb as f64 * b + 16.0;
                y_plane[y * width + x] = luma.round().clamp(0.0, 255.0) as u8;
            }
        }
        for by in 0..height / 2 {
            for bx in 0..width / 2 {
                let mut sums = [0.0f64; 3];
                for dy in 0..2 {
                    for dx in 0..2 {
                        let px = &rgb[((by * 2 + dy) * width + bx * 2 + dx) * 3..][..3];
                        sums[0] += px[0] as f64;
                        sums[1] += px[1] as f64;
                        sums[2] += px[2] as f64;
                    }
                }
                let (r, g, b) = (sums[0] / 4.0, sums[1] / 4.0, sums[2] / 4.0);
                let cb = w.cb_r as f64 * r + w.cb_g as f64 * g + w.cb_b as f64 * b + 128.0;
                let cr = w.cr_r as f64 * r + w.cr_g as f64 * g + w.cr_b as f64 * b + 128.0;
                uv_plane[by * width + bx * 2] = cb.round().clamp(0.0, 255.0) as u8;
                uv_plane[by * width + bx * 2 + 1] = cr.round().clamp(0.0, 255.0) as u8;
            }
        }
        (y_plane, uv_plane)
    }

    #[test]
    fn red_image_bt709_reference_vector() {
        let width = 8u32;
        let height = 2u32;
        let rgb: Vec<u8> = (0..width as usize * height as usize)
            .flat_map(|_| [255u8, 0, 0])
            .collect();
        let mut image = Nv12ImageMut::<u8>::alloc(width, height);
        rgb_to_nv12(&mut image, &rgb, width * 3, YuvStandardMatrix::Bt709).unwrap();
        for &y in image.y_plane.borrow() {
            assert_eq!(y, 63);
        }
        for pair in image.uv_plane.borrow().chunks_exact(2) {
            assert_eq!(pair[0], 102, "Cb");
            assert_eq!(pair[1], 240, "Cr");
        }
    }

    #[test]
    fn white_hits_limited_range_ceiling() {
        let width = 8u32;
        let height = 2u32;
        let rgb = vec![255u8; width as usize * height as usize * 3];
        let mut image = Nv12ImageMut::<u8>::alloc(width, height);
        rgb_to_nv12(&mut image, &rgb, width * 3, YuvStandardMatrix::Bt709).unwrap();
        for &y in image.y_plane.borrow() {
            assert_eq!(y, 235);
        }
    }

    #[test]
    fn black_hits_limited_range_floor() {
        let width = 16u32;
        let height = 4u32;
        let rgb = vec![0u8; width as usize * height as usize * 3];
        let mut image = Nv12ImageMut::<u8>::alloc(width, height);
        rgb_to_nv12(&mut image, &rgb, width * 3, YuvStandardMatrix::Bt709).unwrap();
        for &y in image.y_plane.borrow() {
            assert_eq!(y, 16);
        }
        for &c in image.uv_plane.borrow() {
            assert_eq!(c, 128);
        }
    }

    #[test]
    fn gray_keeps_chroma_neutral() {
        let width = 24u32;
        let height = 6u32;
        for level in [1u8, 64, 127, 200, 254] {
            let rgb = vec![level; width as usize * height as usize * 3];
            let mut image = Nv12ImageMut::<u8>::alloc(width, height);
            rgb_to_nv12(&mut image, &rgb, width * 3, YuvStandardMatrix::Bt709).unwrap();
            for &c in image.uv_plane.borrow() {
                assert!(c.abs_diff(128) <= 1, "chroma {c} too far from neutral");
            }
        }
    }

    #[test]
    fn random_image_tracks_float_reference() {
        let width = 32usize;
        let height = 8usize;
        let mut rng = rand::rng();
        let rgb: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
        let mut image = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        rgb_to_nv12(
            &mut image,
            &rgb,
            width as u32 * 3,
            YuvStandardMatrix::Bt709,
        )
        .unwrap();
        let (ref_y, ref_uv) = reference_nv12(&rgb, width, height, YuvStandardMatrix::Bt709);
        for (&got, &expected) in image.y_plane.borrow().iter().zip(ref_y.iter()) {
            assert!(got.abs_diff(expected) <= 1, "Y {got} vs {expected}");
        }
        for (&got, &expected) in image.uv_plane.borrow().iter().zip(ref_uv.iter()) {
            assert!(got.abs_diff(expected) <= 1, "chroma {got} vs {expected}");
        }
    }

    #[test]
    fn wide_row_is_bit_identical_to_fixed_point_scalar() {
        // 24 wide: one full 16-pixel vector block plus an 8-pixel scalar
        // tail, so both code paths land in the same planes. Every byte must
        // match the fixed-point formula exactly, not within a tolerance.
        let width = 24usize;
        let height = 4usize;
        let mut rng = rand::rng();
        let rgb: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
        let mut image = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        rgb_to_nv12(
            &mut image,
            &rgb,
            width as u32 * 3,
            YuvStandardMatrix::Bt709,
        )
        .unwrap();

        let transform = YuvStandardMatrix::Bt709.weights().to_fixed_point();
        let y_plane = image.y_plane.borrow();
        for y in 0..height {
            for x in 0..width {
                let px = &rgb[(y * width + x) * 3..][..3];
                let expected = luma_dot(px[0] as i16, px[1] as i16, px[2] as i16, &transform);
                assert_eq!(y_plane[y * width + x], expected, "Y at ({x}, {y})");
            }
        }
        let uv_plane = image.uv_plane.borrow();
        for by in 0..height / 2 {
            for bx in 0..width / 2 {
                let mut sums = [0i16; 3];
                for dy in 0..2 {
                    for dx in 0..2 {
                        let px = &rgb[((by * 2 + dy) * width + bx * 2 + dx) * 3..][..3];
                        sums[0] += px[0] as i16;
                        sums[1] += px[1] as i16;
                        sums[2] += px[2] as i16;
                    }
                }
                let cb = chroma_dot(
                    sums[0], sums[1], sums[2], transform.cb_r, transform.cb_g, transform.cb_b,
                );
                let cr = chroma_dot(
                    sums[0], sums[1], sums[2], transform.cr_r, transform.cr_g, transform.cr_b,
                );
                assert_eq!(uv_plane[by * width + bx * 2], cb, "Cb at ({bx}, {by})");
                assert_eq!(uv_plane[by * width + bx * 2 + 1], cr, "Cr at ({bx}, {by})");
            }
        }
    }

    #[test]
    fn bgr_matches_swapped_rgb() {
        let width = 16usize;
        let height = 4usize;
        let mut rng = rand::rng();
        let rgb: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
        let bgr: Vec<u8> = rgb
            .chunks_exact(3)
            .flat_map(|px| [px[2], px[1], px[0]])
            .collect();
        let mut from_rgb = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        let mut from_bgr = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        rgb_to_nv12(
            &mut from_rgb,
            &rgb,
            width as u32 * 3,
            YuvStandardMatrix::Bt601,
        )
        .unwrap();
        bgr_to_nv12(
            &mut from_bgr,
            &bgr,
            width as u32 * 3,
            YuvStandardMatrix::Bt601,
        )
        .unwrap();
        assert_eq!(from_rgb.y_plane.borrow(), from_bgr.y_plane.borrow());
        assert_eq!(from_rgb.uv_plane.borrow(), from_bgr.uv_plane.borrow());
    }

    #[test]
    fn conversion_is_deterministic() {
        let width = 40usize;
        let height = 10usize;
        let mut rng = rand::rng();
        let rgb: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
        let mut first = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        let mut second = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        rgb_to_nv12(&mut first, &rgb, width as u32 * 3, YuvStandardMatrix::Bt709).unwrap();
        rgb_to_nv12(&mut second, &rgb, width as u32 * 3, YuvStandardMatrix::Bt709).unwrap();
        assert_eq!(first.y_plane.borrow(), second.y_plane.borrow());
        assert_eq!(first.uv_plane.borrow(), second.uv_plane.borrow());
    }

    #[test]
    fn rejects_unaligned_dimensions() {
        let mut image = Nv12ImageMut::<u8>::alloc(12, 2);
        let rgb = vec![0u8; 12 * 2 * 3];
        assert!(matches!(
            rgb_to_nv12(&mut image, &rgb, 12 * 3, YuvStandardMatrix::Bt709),
            Err(ConvertError::InvalidDimensions { .. })
        ));
        let mut image = Nv12ImageMut::<u8>::alloc(16, 3);
        let rgb = vec![0u8; 16 * 3 * 3];
        assert!(matches!(
            rgb_to_nv12(&mut image, &rgb, 16 * 3, YuvStandardMatrix::Bt709),
            Err(ConvertError::InvalidDimensions { .. })
        ));
    }
}
