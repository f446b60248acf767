/*
 * Copyright (c) Radzivon Bartoshyk, 03/2025. All rights reserved.
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
use crate::images::Nv12ImageMut;
use crate::internals::ProcessedOffset;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
use crate::sse::sse_yuy2_to_nv12_rows;
use crate::ConvertError;
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

/// How a 4:2:2 row pair collapses into one 4:2:0 chroma row.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Yuy2ChromaPolicy {
    /// Keep the chroma of the top row, drop the bottom row's. Cheapest; this
    /// is what most capture-to-encode paths historically do.
    #[default]
    TakeTopRow,
    /// Average the two rows' chroma with round-half-up. Slightly better
    /// vertical chroma placement at the cost of an extra add per sample.
    AverageRows,
}

/// Repacks YUY2 (4:2:2 packed) into NV12 (4:2:0 bi-planar).
///
/// No colorimetry is applied; luma bytes move verbatim and chroma is carried
/// over per `policy`. Width and height must be even.
///
/// # Arguments
///
/// * `image`: Target NV12 bi-planar image
/// * `yuy2`: Source YUY2 data, `Y0 U Y1 V` per two pixels
/// * `yuy2_stride`: Source stride in bytes
/// * `policy`: Vertical chroma reduction policy
pub fn yuy2_to_nv12(
    image: &mut Nv12ImageMut<u8>,
    yuy2: &[u8],
    yuy2_stride: u32,
    policy: Yuy2ChromaPolicy,
) -> Result<(), ConvertError> {
    // Two bytes per pixel in the packed source.
    check_packed_image(yuy2, yuy2_stride, image.width, image.height, 2)?;
    image.check_constraints()?;
    if image.width % 2 != 0 || image.height % 2 != 0 {
        return Err(ConvertError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
    let use_sse = std::arch::is_x86_feature_detected!("sse4.1");

    let width = image.width;

    let process_wide_row = |_y_dst0: &mut [u8],
                            _y_dst1: &mut [u8],
                            _uv_dst: &mut [u8],
                            _yuy2_0: &[u8],
                            _yuy2_1: &[u8]| {
        let mut _offset: ProcessedOffset = ProcessedOffset { cx: 0, ux: 0 };
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
        if use_sse {
            _offset = sse_yuy2_to_nv12_rows(
                _y_dst0, _y_dst1, _uv_dst, _yuy2_0, _yuy2_1, width, policy, _offset.cx,
                _offset.ux,
            );
        }
        _offset
    };

    let process_double_row =
        |y_dst0: &mut [u8], y_dst1: &mut [u8], uv_dst: &mut [u8], src0: &[u8], src1: &[u8]| {
            let offset = process_wide_row(y_dst0, y_dst1, uv_dst, src0, src1);

            for ((((y_dst0, y_dst1), uv_dst), src0), src1) in y_dst0
                .chunks_exact_mut(2)
                .zip(y_dst1.chunks_exact_mut(2))
                .zip(uv_dst.chunks_exact_mut(2))
                .zip(src0.chunks_exact(4))
                .zip(src1.chunks_exact(4))
                .skip(offset.cx / 2)
            {
                y_dst0[0] = src0[0];
                y_dst0[1] = src0[2];
                y_dst1[0] = src1[0];
                y_dst1[1] = src1[2];
                match policy {
                    Yuy2ChromaPolicy::TakeTopRow => {
                        uv_dst[0] = src0[1];
                        uv_dst[1] = src0[3];
                    }
                    Yuy2ChromaPolicy::AverageRows => {
                        uv_dst[0] = ((src0[1] as u16 + src1[1] as u16 + 1) >> 1) as u8;
                        uv_dst[1] = ((src0[3] as u16 + src1[3] as u16 + 1) >> 1) as u8;
                    }
                }
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
            .zip(yuy2.par_chunks_exact(yuy2_stride as usize * 2));
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = y_plane
            .chunks_exact_mut(y_stride as usize * 2)
            .zip(uv_plane.chunks_exact_mut(uv_stride as usize))
            .zip(yuy2.chunks_exact(yuy2_stride as usize * 2));
    }
    iter.for_each(|((y_rows, uv_dst), src_rows)| {
        let (y_dst0, y_dst1) = y_rows.split_at_mut(y_stride as usize);
        let (src0, src1) = src_rows.split_at(yuy2_stride as usize);
        process_double_row(
            &mut y_dst0[0..width as usize],
            &mut y_dst1[0..width as usize],
            &mut uv_dst[0..width as usize],
            &src0[0..width as usize * 2],
            &src1[0..width as usize * 2],
        );
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn repacks_4x2_top_row_chroma() {
        // Two rows of YUY2, 4 pixels each.
        let yuy2 = vec![
            10, 90, 11, 91, 12, 92, 13, 93, // row 0: Y0 U Y1 V Y2 U Y3 V
            20, 70, 21, 71, 22, 72, 23, 73, // row 1
        ];
        let mut image = Nv12ImageMut::<u8>::alloc(4, 2);
        yuy2_to_nv12(&mut image, &yuy2, 8, Yuy2ChromaPolicy::TakeTopRow).unwrap();
        assert_eq!(image.y_plane.borrow(), &[10, 11, 12, 13, 20, 21, 22, 23]);
        assert_eq!(image.uv_plane.borrow(), &[90, 91, 92, 93]);
    }

    #[test]
    fn averaging_rounds_half_up() {
        let yuy2 = vec![
            0, 100, 0, 200, 0, 10, 0, 20, //
            0, 101, 0, 201, 0, 11, 0, 21, //
        ];
        let mut image = Nv12ImageMut::<u8>::alloc(4, 2);
        yuy2_to_nv12(&mut image, &yuy2, 8, Yuy2ChromaPolicy::AverageRows).unwrap();
        // (100+101+1)>>1 = 101, (200+201+1)>>1 = 201, etc.
        assert_eq!(image.uv_plane.borrow(), &[101, 201, 11, 21]);
    }

    #[test]
    fn luma_is_policy_independent() {
        let width = 20u32;
        let height = 6u32;
        let mut rng = rand::rng();
        let yuy2: Vec<u8> = (0..(width * height * 2) as usize)
            .map(|_| rng.random())
            .collect();
        let mut top = Nv12ImageMut::<u8>::alloc(width, height);
        let mut avg = Nv12ImageMut::<u8>::alloc(width, height);
        yuy2_to_nv12(&mut top, &yuy2, width * 2, Yuy2ChromaPolicy::TakeTopRow).unwrap();
        yuy2_to_nv12(&mut avg, &yuy2, width * 2, Yuy2ChromaPolicy::AverageRows).unwrap();
        assert_eq!(top.y_plane.borrow(), avg.y_plane.borrow());
    }

    #[test]
    fn matches_scalar_reference_on_random_input() {
        let width = 36usize;
        let height = 8usize;
        let mut rng = rand::rng();
        let yuy2: Vec<u8> = (0..width * height * 2).map(|_| rng.random()).collect();
        let mut image = Nv12ImageMut::<u8>::alloc(width as u32, height as u32);
        yuy2_to_nv12(
            &mut image,
            &yuy2,
            width as u32 * 2,
            Yuy2ChromaPolicy::TakeTopRow,
        )
        .unwrap();
        let y_plane = image.y_plane.borrow();
        let uv_plane = image.uv_plane.borrow();
        for row in 0..height {
            for col in 0..width {
                assert_eq!(y_plane[row * width + col], yuy2[row * width * 2 + col * 2]);
            }
        }
        for row in 0..height / 2 {
            for pair in 0..width / 2 {
                let src = row * 2 * width * 2 + pair * 4;
                assert_eq!(uv_plane[row * width + pair * 2], yuy2[src + 1]);
                assert_eq!(uv_plane[row * width + pair * 2 + 1], yuy2[src + 3]);
            }
        }
    }

    #[test]
    fn rejects_odd_dimensions() {
        let mut image = Nv12ImageMut::<u8>::alloc(5, 2);
        let yuy2 = vec![0u8; 5 * 2 * 2];
        assert!(yuy2_to_nv12(&mut image, &yuy2, 10, Yuy2ChromaPolicy::TakeTopRow).is_err());
    }
}
