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
use crate::images::RgbSourceOrder;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Loads 16 packed 24-bit pixels and returns (R, G, B) registers honoring the
/// source channel order.
///
/// Each channel is gathered with one zeroing `pshufb` per source register and
/// OR-merged. Pixel `i` keeps its byte 3i(+1)(+2) across the 48-byte span, so
/// the per-register gather indices step by three with a phase that shifts as
/// the span crosses a register boundary.
#[inline(always)]
pub(crate) unsafe fn _mm_load_deinterleave_rgb<const ORIGIN_CHANNELS: u8>(
    ptr: *const u8,
) -> (__m128i, __m128i, __m128i) {
    let src_order: RgbSourceOrder = ORIGIN_CHANNELS.into();
    let rgb0 = _mm_loadu_si128(ptr as *const __m128i);
    let rgb1 = _mm_loadu_si128(ptr.add(16) as *const __m128i);
    let rgb2 = _mm_loadu_si128(ptr.add(32) as *const __m128i);

    #[rustfmt::skip]
    let c0 = _mm_or_si128(
        _mm_or_si128(
            _mm_shuffle_epi8(rgb0, _mm_setr_epi8(0, 3, 6, 9, 12, 15, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1)),
            _mm_shuffle_epi8(rgb1, _mm_setr_epi8(-1, -1, -1, -1, -1, -1, 2, 5, 8, 11, 14, -1, -1, -1, -1, -1)),
        ),
        _mm_shuffle_epi8(rgb2, _mm_setr_epi8(-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 1, 4, 7, 10, 13)),
    );
    #[rustfmt::skip]
    let c1 = _mm_or_si128(
        _mm_or_si128(
            _mm_shuffle_epi8(rgb0, _mm_setr_epi8(1, 4, 7, 10, 13, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1)),
            _mm_shuffle_epi8(rgb1, _mm_setr_epi8(-1, -1, -1, -1, -1, 0, 3, 6, 9, 12, 15, -1, -1, -1, -1, -1)),
        ),
        _mm_shuffle_epi8(rgb2, _mm_setr_epi8(-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 2, 5, 8, 11, 14)),
    );
    #[rustfmt::skip]
    let c2 = _mm_or_si128(
        _mm_or_si128(
            _mm_shuffle_epi8(rgb0, _mm_setr_epi8(2, 5, 8, 11, 14, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1)),
            _mm_shuffle_epi8(rgb1, _mm_setr_epi8(-1, -1, -1, -1, -1, 1, 4, 7, 10, 13, -1, -1, -1, -1, -1, -1)),
        ),
        _mm_shuffle_epi8(rgb2, _mm_setr_epi8(-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 0, 3, 6, 9, 12, 15)),
    );

    match src_order {
        RgbSourceOrder::Rgb => (c0, c1, c2),
        RgbSourceOrder::Bgr => (c2, c1, c0),
    }
}

/// Splits two registers of byte-interleaved data into even and odd lanes.
///
/// Both inputs are regrouped evens-low/odds-high with one shuffle, then a
/// 64-bit unpack stitches the halves together.
#[inline(always)]
pub(crate) unsafe fn _mm_deinterleave_x2_epi8(a: __m128i, b: __m128i) -> (__m128i, __m128i) {
    let grouping = _mm_setr_epi8(0, 2, 4, 6, 8, 10, 12, 14, 1, 3, 5, 7, 9, 11, 13, 15);
    let a_grouped = _mm_shuffle_epi8(a, grouping);
    let b_grouped = _mm_shuffle_epi8(b, grouping);
    let evens = _mm_unpacklo_epi64(a_grouped, b_grouped);
    let odds = _mm_unpackhi_epi64(a_grouped, b_grouped);
    (evens, odds)
}
