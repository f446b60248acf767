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
use crate::internals::ProcessedOffset;
use crate::sse::sse_support::_mm_deinterleave_x2_epi8;
use crate::yuy2_to_nv12::Yuy2ChromaPolicy;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

pub(crate) fn sse_yuy2_to_nv12_rows(
    y_plane0: &mut [u8],
    y_plane1: &mut [u8],
    uv_plane: &mut [u8],
    yuy2_0: &[u8],
    yuy2_1: &[u8],
    width: u32,
    policy: Yuy2ChromaPolicy,
    start_cx: usize,
    start_ux: usize,
) -> ProcessedOffset {
    unsafe {
        sse_yuy2_to_nv12_rows_impl(
            y_plane0, y_plane1, uv_plane, yuy2_0, yuy2_1, width, policy, start_cx, start_ux,
        )
    }
}

/// Even source bytes are luma, odd bytes are already NV12-ordered CbCr pairs,
/// so one even/odd split per row yields both planes for 16 pixels.
#[target_feature(enable = "sse4.1")]
unsafe fn sse_yuy2_to_nv12_rows_impl(
    y_plane0: &mut [u8],
    y_plane1: &mut [u8],
    uv_plane: &mut [u8],
    yuy2_0: &[u8],
    yuy2_1: &[u8],
    width: u32,
    policy: Yuy2ChromaPolicy,
    start_cx: usize,
    start_ux: usize,
) -> ProcessedOffset {
    let mut cx = start_cx;
    let mut uv_x = start_ux;

    while cx + 16 <= width as usize {
        let px = cx * 2;
        let src0 = yuy2_0.get_unchecked(px..).as_ptr();
        let src1 = yuy2_1.get_unchecked(px..).as_ptr();

        let row0_a = _mm_loadu_si128(src0 as *const __m128i);
        let row0_b = _mm_loadu_si128(src0.add(16) as *const __m128i);
        let (y0, uv0) = _mm_deinterleave_x2_epi8(row0_a, row0_b);

        let row1_a = _mm_loadu_si128(src1 as *const __m128i);
        let row1_b = _mm_loadu_si128(src1.add(16) as *const __m128i);
        let (y1, uv1) = _mm_deinterleave_x2_epi8(row1_a, row1_b);

        _mm_storeu_si128(
            y_plane0.get_unchecked_mut(cx..).as_mut_ptr() as *mut __m128i,
            y0,
        );
        _mm_storeu_si128(
            y_plane1.get_unchecked_mut(cx..).as_mut_ptr() as *mut __m128i,
            y1,
        );

        let uv = match policy {
            Yuy2ChromaPolicy::TakeTopRow => uv0,
            // _mm_avg_epu8 rounds half up, same as the scalar (a + b + 1) >> 1.
            Yuy2ChromaPolicy::AverageRows => _mm_avg_epu8(uv0, uv1),
        };
        _mm_storeu_si128(
            uv_plane.get_unchecked_mut(uv_x..).as_mut_ptr() as *mut __m128i,
            uv,
        );

        uv_x += 16;
        cx += 16;
    }

    ProcessedOffset { cx, ux: uv_x }
}
