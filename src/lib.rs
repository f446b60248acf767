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
//! Fast packed RGB/BGR and YUY2 to NV12 conversion for real-time video
//! encoding pipelines.
//!
//! The converters use the same fixed-point arithmetic on the scalar and the
//! SSE paths, so results are bit-exact regardless of which path executed.
//! Chroma for 4:2:0 output is produced by a 2x2 box filter with a single
//! final rounding step.
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![deny(unreachable_code, unreachable_pub)]

mod conversion_error;
mod flip;
mod images;
mod internals;
mod matrix;
mod numerics;
mod pipeline;
mod rgb_to_nv12;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;
mod stride_copy;
mod yuy2_to_nv12;

pub use conversion_error::{ConvertError, MismatchedSize};
pub use flip::flip_and_swap_rgb;
pub use images::{BufferStoreMut, Nv12Image, Nv12ImageMut};
pub use matrix::{CbCrForwardTransform, YuvStandardMatrix};
pub use pipeline::{
    AudioConfig, AudioSample, EncodePipeline, FrameSource, PipelineConfig, PipelineError,
    PipelineOutcome, PipelineState, SampleSink, SinkFormat, SourcePixelFormat, VideoSample,
    TICKS_PER_SECOND,
};
pub use rgb_to_nv12::{bgr_to_nv12, rgb_to_nv12};
pub use stride_copy::{copy_plane, RowDirection};
pub use yuy2_to_nv12::{yuy2_to_nv12, Yuy2ChromaPolicy};
