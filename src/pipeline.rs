/*
 * Copyright (c) Radzivon Bartoshyk, 04/2025. All rights reserved.
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
use crate::images::Nv12ImageMut;
use crate::matrix::YuvStandardMatrix;
use crate::rgb_to_nv12::rgb_to_nv12;
use crate::stride_copy::{copy_plane, RowDirection};
use crate::yuy2_to_nv12::{yuy2_to_nv12, Yuy2ChromaPolicy};
use crate::{flip_and_swap_rgb, ConvertError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Presentation timestamps and durations are expressed in 100 ns ticks.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

const AUDIO_BITS_PER_SAMPLE: u32 = 16;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfiguration(String),
    #[error("frame source failed: {0}")]
    Source(String),
    #[error("sample sink failed: {0}")]
    Sink(String),
}

/// Pixel layout the pipeline requests from the frame source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourcePixelFormat {
    /// Bottom-up packed 24-bit BGR, DIB style. Only requested in accelerated
    /// mode.
    Bgr24,
    /// Top-down packed YUY2.
    Yuy2,
}

/// Layout of the buffer handed to the sample sink.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SinkFormat {
    Nv12,
    Yuy2,
}

/// Where the pipeline currently is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    StreamingVideo,
    StreamingAudio,
    Finalizing,
    Done,
    /// Terminal; samples already written are not rolled back.
    Aborted,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed,
    Aborted,
}

/// One video frame handed to the sink, already repacked to `stride`.
#[derive(Debug)]
pub struct VideoSample<'a> {
    pub data: &'a [u8],
    /// Row stride of `data` in bytes.
    pub stride: u32,
    /// Presentation time in 100 ns ticks.
    pub pts: i64,
    /// Duration in 100 ns ticks.
    pub duration: i64,
}

/// One chunk of 16-bit PCM handed to the sink.
#[derive(Debug)]
pub struct AudioSample<'a> {
    pub data: &'a [u8],
    /// Presentation time in 100 ns ticks.
    pub pts: i64,
    /// Duration in 100 ns ticks.
    pub duration: i64,
}

/// Supplies raw frames and audio, and owns abort/progress signalling.
pub trait FrameSource {
    /// Returns the packed pixels of frame `frame_index` in the requested
    /// layout. The returned slice stays valid until the next pull.
    fn pull_video_frame(
        &mut self,
        frame_index: u32,
        format: SourcePixelFormat,
    ) -> Result<&[u8], PipelineError>;

    /// Returns up to `max_bytes` of 16-bit PCM starting at `start_sample`.
    /// An empty slice means the range carries no audio; streaming continues.
    fn pull_audio_chunk(
        &mut self,
        start_sample: u64,
        max_bytes: usize,
    ) -> Result<&[u8], PipelineError>;

    /// Polled before every frame and audio chunk.
    fn is_aborted(&self) -> bool;

    /// Progress callback, `done` out of `total` units of the current stage.
    fn report_progress(&mut self, done: u64, total: u64);
}

/// Receives converted samples in strictly increasing timestamp order.
pub trait SampleSink {
    fn write_video_sample(&mut self, sample: VideoSample<'_>) -> Result<(), PipelineError>;

    fn write_audio_sample(&mut self, sample: AudioSample<'_>) -> Result<(), PipelineError>;

    /// Flushes and closes the container. Called exactly once per run, also
    /// after an abort.
    fn finalize(&mut self) -> Result<(), PipelineError>;
}

/// PCM stream parameters. Samples are always 16-bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    pub channels: u32,
    pub sample_rate: u32,
    /// Total samples per channel over the whole stream.
    pub total_samples: u64,
}

impl AudioConfig {
    /// Bytes per audio frame across all channels.
    pub fn block_alignment(&self) -> u32 {
        self.channels * (AUDIO_BITS_PER_SAMPLE / 8)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second as (rate, scale), e.g. (30000, 1001).
    pub frame_rate: (u32, u32),
    pub frame_count: u32,
    /// `true` pulls BGR and runs full colorimetry; `false` pulls YUY2 and
    /// only repacks.
    pub accelerated: bool,
    pub matrix: YuvStandardMatrix,
    pub chroma_policy: Yuy2ChromaPolicy,
    pub sink_format: SinkFormat,
    /// Row stride of the sink buffer in bytes; may exceed the logical row.
    pub sink_stride: u32,
    pub sink_row_direction: RowDirection,
    pub audio: Option<AudioConfig>,
}

/// Synchronous driver: pulls every frame and audio chunk from a
/// [`FrameSource`], converts per configuration and pushes the result into a
/// [`SampleSink`].
#[derive(Debug)]
pub struct EncodePipeline {
    config: PipelineConfig,
    state: PipelineState,
}

impl EncodePipeline {
    /// Validates the configuration once so the streaming loops can assume
    /// consistent dimensions and strides.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        if config.width == 0 || config.height == 0 {
            return Err(ConvertError::ZeroBaseSize.into());
        }
        if config.accelerated {
            if config.width % 8 != 0 || config.height % 2 != 0 {
                return Err(ConvertError::InvalidDimensions {
                    width: config.width,
                    height: config.height,
                }
                .into());
            }
            if config.sink_format == SinkFormat::Yuy2 {
                return Err(PipelineError::InvalidConfiguration(
                    "accelerated mode produces NV12, not YUY2".to_string(),
                ));
            }
        } else if config.width % 2 != 0 || config.height % 2 != 0 {
            return Err(ConvertError::InvalidDimensions {
                width: config.width,
                height: config.height,
            }
            .into());
        }
        let (rate, scale) = config.frame_rate;
        if rate == 0 || scale == 0 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "frame rate {rate}/{scale} is not representable"
            )));
        }
        let min_stride = match config.sink_format {
            SinkFormat::Nv12 => config.width,
            SinkFormat::Yuy2 => config.width * 2,
        };
        if config.sink_stride < min_stride {
            return Err(PipelineError::InvalidConfiguration(format!(
                "sink stride {} is below the logical row width {min_stride}",
                config.sink_stride
            )));
        }
        if let Some(audio) = &config.audio {
            if audio.channels == 0 || audio.sample_rate == 0 {
                return Err(PipelineError::InvalidConfiguration(
                    "audio stream must have a channel count and a sample rate".to_string(),
                ));
            }
        }
        Ok(EncodePipeline {
            config,
            state: PipelineState::NotStarted,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Drives the whole job to completion: all video frames, then all audio
    /// chunks, then finalization. Returns [`PipelineOutcome::Aborted`] when
    /// the source signalled abort; the sink is still finalized best-effort in
    /// that case.
    pub fn run<S: FrameSource, K: SampleSink>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> Result<PipelineOutcome, PipelineError> {
        if self.state != PipelineState::NotStarted {
            return Err(PipelineError::InvalidConfiguration(
                "pipeline has already run".to_string(),
            ));
        }

        let width = self.config.width as usize;
        let height = self.config.height as usize;
        let (rate, scale) = self.config.frame_rate;
        let frame_duration = TICKS_PER_SECOND * scale as i64 / rate as i64;
        let sink_stride = self.config.sink_stride as usize;

        let sink_rows = match self.config.sink_format {
            SinkFormat::Nv12 => height + height / 2,
            SinkFormat::Yuy2 => height,
        };
        let mut sink_buffer = vec![0u8; sink_stride * sink_rows];

        let mut rgb_scratch = if self.config.accelerated {
            vec![0u8; width * height * 3]
        } else {
            Vec::new()
        };
        let mut nv12 = Nv12ImageMut::<u8>::alloc(self.config.width, self.config.height);

        self.state = PipelineState::StreamingVideo;
        info!("sending video samples to the writer");
        for f in 0..self.config.frame_count {
            if source.is_aborted() {
                return self.abort(sink);
            }
            source.report_progress(f as u64, self.config.frame_count as u64);

            if self.config.accelerated {
                let bgr = source.pull_video_frame(f, SourcePixelFormat::Bgr24)?;
                flip_and_swap_rgb(
                    bgr,
                    self.config.width * 3,
                    &mut rgb_scratch,
                    self.config.width * 3,
                    self.config.width,
                    self.config.height,
                )?;
                rgb_to_nv12(
                    &mut nv12,
                    &rgb_scratch,
                    self.config.width * 3,
                    self.config.matrix,
                )?;
                pack_nv12(
                    &nv12,
                    &mut sink_buffer,
                    sink_stride,
                    self.config.sink_row_direction,
                )?;
            } else {
                let yuy2 = source.pull_video_frame(f, SourcePixelFormat::Yuy2)?;
                match self.config.sink_format {
                    SinkFormat::Yuy2 => {
                        copy_plane(
                            yuy2,
                            self.config.width * 2,
                            &mut sink_buffer,
                            self.config.sink_stride,
                            width * 2,
                            height,
                            self.config.sink_row_direction,
                        )?;
                    }
                    SinkFormat::Nv12 => {
                        yuy2_to_nv12(
                            &mut nv12,
                            yuy2,
                            self.config.width * 2,
                            self.config.chroma_policy,
                        )?;
                        pack_nv12(
                            &nv12,
                            &mut sink_buffer,
                            sink_stride,
                            self.config.sink_row_direction,
                        )?;
                    }
                }
            }

            debug!(frame = f, "video sample converted");
            sink.write_video_sample(VideoSample {
                data: &sink_buffer,
                stride: self.config.sink_stride,
                pts: frame_duration * f as i64,
                duration: frame_duration,
            })?;
        }

        if let Some(audio) = self.config.audio {
            self.state = PipelineState::StreamingAudio;
            info!("sending audio samples to the writer");
            // One second of PCM per chunk.
            let max_bytes = (audio.block_alignment() * audio.sample_rate) as usize;
            let mut n = 0u64;
            while n < audio.total_samples {
                if source.is_aborted() {
                    return self.abort(sink);
                }
                source.report_progress(n, audio.total_samples);

                let chunk = source.pull_audio_chunk(n, max_bytes)?;
                if !chunk.is_empty() {
                    let pts = n as i64 * TICKS_PER_SECOND / audio.sample_rate as i64;
                    let duration = chunk.len() as i64 * TICKS_PER_SECOND / max_bytes as i64;
                    sink.write_audio_sample(AudioSample {
                        data: chunk,
                        pts,
                        duration,
                    })?;
                }
                n += audio.sample_rate as u64;
            }
        }

        self.state = PipelineState::Finalizing;
        info!("finalizing, this may take a while");
        sink.finalize()?;
        self.state = PipelineState::Done;
        info!("done");
        Ok(PipelineOutcome::Completed)
    }

    fn abort<K: SampleSink>(&mut self, sink: &mut K) -> Result<PipelineOutcome, PipelineError> {
        self.state = PipelineState::Aborted;
        // Best effort: samples already written should still end up in a
        // playable container.
        if let Err(err) = sink.finalize() {
            warn!("finalize after abort failed: {err}");
        }
        info!("aborted");
        Ok(PipelineOutcome::Aborted)
    }
}

/// Repacks a tight NV12 image into a single sink buffer where both planes
/// share `sink_stride`.
fn pack_nv12(
    image: &Nv12ImageMut<u8>,
    sink_buffer: &mut [u8],
    sink_stride: usize,
    direction: RowDirection,
) -> Result<(), ConvertError> {
    let height = image.height as usize;
    let width = image.width as usize;
    let (luma, chroma) = sink_buffer.split_at_mut(sink_stride * height);
    copy_plane(
        image.y_plane.borrow(),
        image.y_stride,
        luma,
        sink_stride as u32,
        width,
        height,
        direction,
    )?;
    copy_plane(
        image.uv_plane.borrow(),
        image.uv_stride,
        chroma,
        sink_stride as u32,
        width,
        height / 2,
        direction,
    )?;
    Ok(())
}
