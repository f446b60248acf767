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

/// Forward RGB -> limited-range YCbCr weights as real numbers.
///
/// Luma weights are scaled by `2^15` when converted to fixed point. Chroma
/// weights carry an extra x2 pre-scale (so `2^16` total) which is paid back
/// by the final `>> 3` in the 2x2 subsampling step.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CbCrForwardTransform<T> {
    pub yr: T,
    pub yg: T,
    pub yb: T,
    pub cb_r: T,
    pub cb_g: T,
    pub cb_b: T,
    pub cr_r: T,
    pub cr_g: T,
    pub cr_b: T,
}

/// Luma rounding bias: `16 * 64 + 32`. Inputs are pre-scaled by 64, the 32 is
/// half a step for the trailing `>> 6`.
pub(crate) const Y_PRESCALED_BIAS: i16 = (16 << 6) + 32;

/// Chroma rounding bias: `128 * 8 + 4`. The 2x2 sum plus doubled weights put
/// the result at 8x scale, the 4 is half a step for the trailing `>> 3`.
pub(crate) const UV_PRESCALED_BIAS: i16 = (128 << 3) + 4;

impl CbCrForwardTransform<f32> {
    /// Converts to rounded integer weights, ties away from zero.
    pub fn to_fixed_point(&self) -> CbCrForwardTransform<i16> {
        const LUMA_SCALE: f32 = (1 << 15) as f32;
        const CHROMA_SCALE: f32 = (1 << 16) as f32;
        CbCrForwardTransform {
            yr: (self.yr * LUMA_SCALE).round() as i16,
            yg: (self.yg * LUMA_SCALE).round() as i16,
            yb: (self.yb * LUMA_SCALE).round() as i16,
            cb_r: (self.cb_r * CHROMA_SCALE).round() as i16,
            cb_g: (self.cb_g * CHROMA_SCALE).round() as i16,
            cb_b: (self.cb_b * CHROMA_SCALE).round() as i16,
            cr_r: (self.cr_r * CHROMA_SCALE).round() as i16,
            cr_g: (self.cr_g * CHROMA_SCALE).round() as i16,
            cr_b: (self.cr_b * CHROMA_SCALE).round() as i16,
        }
    }
}

/// Declares YUV standard for forward conversion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum YuvStandardMatrix {
    /// BT.601 (SDTV)
    Bt601,
    /// BT.709 (HDTV)
    Bt709,
}

impl YuvStandardMatrix {
    pub fn weights(self) -> CbCrForwardTransform<f32> {
        match self {
            YuvStandardMatrix::Bt601 => CbCrForwardTransform {
                yr: 0.257,
                yg: 0.504,
                yb: 0.098,
                cb_r: -0.148,
                cb_g: -0.291,
                cb_b: 0.439,
                cr_r: 0.439,
                cr_g: -0.368,
                cr_b: -0.071,
            },
            YuvStandardMatrix::Bt709 => CbCrForwardTransform {
                yr: 0.183,
                yg: 0.614,
                yb: 0.062,
                cb_r: -0.101,
                cb_g: -0.339,
                cb_b: 0.439,
                cr_r: 0.439,
                cr_g: -0.399,
                cr_b: -0.040,
            },
        }
    }
}
