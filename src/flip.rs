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
#![forbid(unsafe_code)]
use crate::conversion_error::check_packed_image;
use crate::ConvertError;
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

/// Swaps BGR to RGB (or back) while mirroring the image vertically.
///
/// Bottom-up DIB-style captures come out of desktop duplication with the last
/// scanline first and the channels reversed. One pass fixes both, writing a
/// top-down RGB image into `dst`.
///
/// # Arguments
///
/// * `src`: Source packed 24-bit image
/// * `src_stride`: Source stride in bytes
/// * `dst`: Destination packed 24-bit image
/// * `dst_stride`: Destination stride in bytes
/// * `width`: Image width
/// * `height`: Image height
pub fn flip_and_swap_rgb(
    src: &[u8],
    src_stride: u32,
    dst: &mut [u8],
    dst_stride: u32,
    width: u32,
    height: u32,
) -> Result<(), ConvertError> {
    const CHANNELS: usize = 3;
    check_packed_image(src, src_stride, width, height, CHANNELS)?;
    check_packed_image(dst, dst_stride, width, height, CHANNELS)?;

    let swap_row = |src_row: &[u8], dst_row: &mut [u8]| {
        for (dst_px, src_px) in dst_row
            .chunks_exact_mut(CHANNELS)
            .zip(src_row.chunks_exact(CHANNELS))
            .take(width as usize)
        {
            dst_px[0] = src_px[2];
            dst_px[1] = src_px[1];
            dst_px[2] = src_px[0];
        }
    };

    #[cfg(feature = "rayon")]
    {
        dst.par_chunks_exact_mut(dst_stride as usize)
            .zip(src.par_chunks_exact(src_stride as usize).rev())
            .for_each(|(dst_row, src_row)| swap_row(src_row, dst_row));
    }
    #[cfg(not(feature = "rayon"))]
    {
        dst.chunks_exact_mut(dst_stride as usize)
            .zip(src.chunks_exact(src_stride as usize).rev())
            .for_each(|(dst_row, src_row)| swap_row(src_row, dst_row));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn flip_and_swap_moves_corners() {
        // 2x2 BGR, distinct pixels.
        let src = vec![
            1, 2, 3, 4, 5, 6, // row 0
            7, 8, 9, 10, 11, 12, // row 1
        ];
        let mut dst = vec![0u8; src.len()];
        flip_and_swap_rgb(&src, 6, &mut dst, 6, 2, 2).unwrap();
        // Bottom-left BGR(7,8,9) lands top-left as RGB(9,8,7).
        assert_eq!(&dst[0..3], &[9, 8, 7]);
        assert_eq!(&dst[3..6], &[12, 11, 10]);
        assert_eq!(&dst[6..9], &[3, 2, 1]);
        assert_eq!(&dst[9..12], &[6, 5, 4]);
    }

    #[test]
    fn flip_and_swap_is_involutive() {
        let width = 17u32;
        let height = 6u32;
        let mut rng = rand::rng();
        let src: Vec<u8> = (0..width as usize * height as usize * 3)
            .map(|_| rng.random())
            .collect();
        let mut once = vec![0u8; src.len()];
        let mut twice = vec![0u8; src.len()];
        flip_and_swap_rgb(&src, width * 3, &mut once, width * 3, width, height).unwrap();
        flip_and_swap_rgb(&once, width * 3, &mut twice, width * 3, width, height).unwrap();
        assert_eq!(src, twice);
    }

    #[test]
    fn flip_and_swap_honors_strides() {
        let width = 3u32;
        let height = 2u32;
        let src_stride = 12u32;
        let dst_stride = 10u32;
        let mut src = vec![0u8; (src_stride * height) as usize];
        src[0..9].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        src[12..21].copy_from_slice(&[21, 22, 23, 24, 25, 26, 27, 28, 29]);
        let mut dst = vec![0xAAu8; (dst_stride * height) as usize];
        flip_and_swap_rgb(&src, src_stride, &mut dst, dst_stride, width, height).unwrap();
        assert_eq!(&dst[0..9], &[23, 22, 21, 26, 25, 24, 29, 28, 27]);
        assert_eq!(&dst[10..19], &[3, 2, 1, 6, 5, 4, 9, 8, 7]);
        // Padding bytes stay untouched.
        assert_eq!(dst[9], 0xAA);
    }
}
