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
use crate::internals::ProcessedOffset;
use crate::matrix::{CbCrForwardTransform, UV_PRESCALED_BIAS, Y_PRESCALED_BIAS};
use crate::sse::sse_support::_mm_load_deinterleave_rgb;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

pub(crate) fn sse_rgb_to_nv12_rows<const ORIGIN_CHANNELS: u8>(
    y_plane0: &mut [u8],
    y_plane1: &mut [u8],
    uv_plane: &mut [u8],
    rgb0: &[u8],
    rgb1: &[u8],
    width: u32,
    transform: &CbCrForwardTransform<i16>,
    start_cx: usize,
    start_ux: usize,
) -> ProcessedOffset {
    unsafe {
        sse_rgb_to_nv12_rows_impl::<ORIGIN_CHANNELS>(
            y_plane0, y_plane1, uv_plane, rgb0, rgb1, width, transform, start_cx, start_ux,
        )
    }
}

/// Computes 16 luma samples per row and 8 interleaved CbCr pairs per
/// iteration with the exact arithmetic of the scalar path: inputs shifted
/// left by 6, `_mm_mulhrs_epi16` dot products, biased, shifted back.
#[target_feature(enable = "sse4.1")]
unsafe fn sse_rgb_to_nv12_rows_impl<const ORIGIN_CHANNELS: u8>(
    y_plane0: &mut [u8],
    y_plane1: &mut [u8],
    uv_plane: &mut [u8],
    rgb0: &[u8],
    rgb1: &[u8],
    width: u32,
    transform: &CbCrForwardTransform<i16>,
    start_cx: usize,
    start_ux: usize,
) -> ProcessedOffset {
    const CHANNELS: usize = 3;

    let mut cx = start_cx;
    let mut uv_x = start_ux;

    let zeros = _mm_setzero_si128();
    let y_bias = _mm_set1_epi16(Y_PRESCALED_BIAS);
    let uv_bias = _mm_set1_epi16(UV_PRESCALED_BIAS);
    let v_yr = _mm_set1_epi16(transform.yr);
    let v_yg = _mm_set1_epi16(transform.yg);
    let v_yb = _mm_set1_epi16(transform.yb);
    let v_cb_r = _mm_set1_epi16(transform.cb_r);
    let v_cb_g = _mm_set1_epi16(transform.cb_g);
    let v_cb_b = _mm_set1_epi16(transform.cb_b);
    let v_cr_r = _mm_set1_epi16(transform.cr_r);
    let v_cr_g = _mm_set1_epi16(transform.cr_g);
    let v_cr_b = _mm_set1_epi16(transform.cr_b);

    while cx + 16 <= width as usize {
        let px = cx * CHANNELS;
        let (r0, g0, b0) =
            _mm_load_deinterleave_rgb::<ORIGIN_CHANNELS>(rgb0.get_unchecked(px..).as_ptr());
        let (r1, g1, b1) =
            _mm_load_deinterleave_rgb::<ORIGIN_CHANNELS>(rgb1.get_unchecked(px..).as_ptr());

        let r0_lo = _mm_unpacklo_epi8(r0, zeros);
        let r0_hi = _mm_unpackhi_epi8(r0, zeros);
        let g0_lo = _mm_unpacklo_epi8(g0, zeros);
        let g0_hi = _mm_unpackhi_epi8(g0, zeros);
        let b0_lo = _mm_unpacklo_epi8(b0, zeros);
        let b0_hi = _mm_unpackhi_epi8(b0, zeros);

        let r1_lo = _mm_unpacklo_epi8(r1, zeros);
        let r1_hi = _mm_unpackhi_epi8(r1, zeros);
        let g1_lo = _mm_unpacklo_epi8(g1, zeros);
        let g1_hi = _mm_unpackhi_epi8(g1, zeros);
        let b1_lo = _mm_unpacklo_epi8(b1, zeros);
        let b1_hi = _mm_unpackhi_epi8(b1, zeros);

        let y0 = _mm_packus_epi16(
            _mm_luma_dot(r0_lo, g0_lo, b0_lo, v_yr, v_yg, v_yb, y_bias),
            _mm_luma_dot(r0_hi, g0_hi, b0_hi, v_yr, v_yg, v_yb, y_bias),
        );
        let y1 = _mm_packus_epi16(
            _mm_luma_dot(r1_lo, g1_lo, b1_lo, v_yr, v_yg, v_yb, y_bias),
            _mm_luma_dot(r1_hi, g1_hi, b1_hi, v_yr, v_yg, v_yb, y_bias),
        );
        _mm_storeu_si128(
            y_plane0.get_unchecked_mut(cx..).as_mut_ptr() as *mut __m128i,
            y0,
        );
        _mm_storeu_si128(
            y_plane1.get_unchecked_mut(cx..).as_mut_ptr() as *mut __m128i,
            y1,
        );

        // Vertical sums stay below 510 per lane, then the horizontal pairwise
        // add produces the 2x2 block sums (max 1020) in 8 lanes.
        let r4 = _mm_hadd_epi16(_mm_add_epi16(r0_lo, r1_lo), _mm_add_epi16(r0_hi, r1_hi));
        let g4 = _mm_hadd_epi16(_mm_add_epi16(g0_lo, g1_lo), _mm_add_epi16(g0_hi, g1_hi));
        let b4 = _mm_hadd_epi16(_mm_add_epi16(b0_lo, b1_lo), _mm_add_epi16(b0_hi, b1_hi));

        let cb = _mm_chroma_dot(r4, g4, b4, v_cb_r, v_cb_g, v_cb_b, uv_bias);
        let cr = _mm_chroma_dot(r4, g4, b4, v_cr_r, v_cr_g, v_cr_b, uv_bias);

        let cb8 = _mm_packus_epi16(cb, cb);
        let cr8 = _mm_packus_epi16(cr, cr);
        let uv = _mm_unpacklo_epi8(cb8, cr8);
        _mm_storeu_si128(
            uv_plane.get_unchecked_mut(uv_x..).as_mut_ptr() as *mut __m128i,
            uv,
        );

        uv_x += 16;
        cx += 16;
    }

    ProcessedOffset { cx, ux: uv_x }
}

/// `(((v << 6) * c + 0x4000) >> 15)` per channel, summed with the luma bias
/// and shifted back. Mirrors the scalar luma dot product lane for lane.
#[inline(always)]
unsafe fn _mm_luma_dot(
    r16: __m128i,
    g16: __m128i,
    b16: __m128i,
    v_yr: __m128i,
    v_yg: __m128i,
    v_yb: __m128i,
    y_bias: __m128i,
) -> __m128i {
    let y = _mm_add_epi16(
        _mm_add_epi16(
            _mm_add_epi16(
                _mm_mulhrs_epi16(_mm_slli_epi16::<6>(r16), v_yr),
                _mm_mulhrs_epi16(_mm_slli_epi16::<6>(g16), v_yg),
            ),
            _mm_mulhrs_epi16(_mm_slli_epi16::<6>(b16), v_yb),
        ),
        y_bias,
    );
    _mm_srli_epi16::<6>(y)
}

#[inline(always)]
unsafe fn _mm_chroma_dot(
    r4: __m128i,
    g4: __m128i,
    b4: __m128i,
    vr: __m128i,
    vg: __m128i,
    vb: __m128i,
    uv_bias: __m128i,
) -> __m128i {
    let c = _mm_add_epi16(
        _mm_add_epi16(
            _mm_add_epi16(_mm_mulhrs_epi16(r4, vr), _mm_mulhrs_epi16(g4, vg)),
            _mm_mulhrs_epi16(b4, vb),
        ),
        uv_bias,
    );
    _mm_srai_epi16::<3>(c)
}
