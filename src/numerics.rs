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
#![forbid(unsafe_code)]

/// Scalar equivalent of `_mm_mulhrs_epi16`: `(a * b + 0x4000) >> 15` with the
/// product computed at i32 width. Keeping the scalar path on this exact
/// primitive makes it bit-identical to the SSE path.
#[inline(always)]
pub(crate) const fn mulhrs(a: i16, b: i16) -> i16 {
    (((a as i32) * (b as i32) + (1 << 14)) >> 15) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mulhrs_matches_definition() {
        assert_eq!(mulhrs(0, 12345), 0);
        assert_eq!(mulhrs(1 << 6, 5997), (((1 << 6) * 5997 + 0x4000) >> 15) as i16);
        assert_eq!(mulhrs(255 << 6, 32767), ((((255 << 6) * 32767) + 0x4000) >> 15) as i16);
        assert_eq!(mulhrs(1020, -13238), ((1020 * -13238 + 0x4000) >> 15) as i16);
    }

    #[test]
    fn mulhrs_rounds_to_nearest() {
        // 1 * 16384 = 0.5 after the shift, rounds up.
        assert_eq!(mulhrs(1, 16384), 1);
        assert_eq!(mulhrs(1, 16383), 0);
        assert_eq!(mulhrs(-1, 16384), 0);
    }
}
