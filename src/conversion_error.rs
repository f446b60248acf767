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
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug)]
pub enum ConvertError {
    InvalidDimensions { width: u32, height: u32 },
    SourceSizeMismatch(MismatchedSize),
    MinimumSourceSizeMismatch(MismatchedSize),
    PointerOverflow,
    ZeroBaseSize,
    LumaPlaneSizeMismatch(MismatchedSize),
    LumaPlaneMinimumSizeMismatch(MismatchedSize),
    ChromaPlaneSizeMismatch(MismatchedSize),
    ChromaPlaneMinimumSizeMismatch(MismatchedSize),
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::InvalidDimensions { width, height } => f.write_fmt(format_args!(
                "Image dimensions {width}x{height} are not supported by this converter"
            )),
            ConvertError::SourceSizeMismatch(size) => f.write_fmt(format_args!(
                "Source size mismatch: expected={}, received={}",
                size.expected, size.received
            )),
            ConvertError::MinimumSourceSizeMismatch(size) => f.write_fmt(format_args!(
                "Source must have size at least {} but it is {}",
                size.expected, size.received
            )),
            ConvertError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
            ConvertError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
            ConvertError::LumaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            ConvertError::LumaPlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Luma plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
            ConvertError::ChromaPlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Chroma plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            ConvertError::ChromaPlaneMinimumSizeMismatch(size) => f.write_fmt(format_args!(
                "Chroma plane have invalid size, it must be at least {}, but it was {}",
                size.expected, size.received
            )),
        }
    }
}

impl Error for ConvertError {}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), ConvertError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(ConvertError::PointerOverflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_overflow_v3(v0: usize, v1: usize, v2: usize) -> Result<(), ConvertError> {
    let (product0, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(ConvertError::PointerOverflow);
    }
    let (_, overflow) = product0.overflowing_mul(v2);
    if overflow {
        return Err(ConvertError::PointerOverflow);
    }
    Ok(())
}

/// Validates a packed interleaved image (RGB, BGR or YUY2) against its stride.
#[inline]
pub(crate) fn check_packed_image<V>(
    arr: &[V],
    stride: u32,
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), ConvertError> {
    if width == 0 || height == 0 {
        return Err(ConvertError::ZeroBaseSize);
    }
    check_overflow_v3(width as usize, height as usize, channels)?;
    check_overflow_v2(stride as usize, height as usize)?;
    if arr.len() != stride as usize * height as usize {
        return Err(ConvertError::SourceSizeMismatch(MismatchedSize {
            expected: stride as usize * height as usize,
            received: arr.len(),
        }));
    }
    if (stride as usize * height as usize) < (width as usize * height as usize * channels) {
        return Err(ConvertError::MinimumSourceSizeMismatch(MismatchedSize {
            expected: width as usize * height as usize * channels,
            received: stride as usize * height as usize,
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_y8_channel<V>(
    data: &[V],
    stride: u32,
    width: u32,
    height: u32,
) -> Result<(), ConvertError> {
    check_overflow_v2(stride as usize, height as usize)?;
    check_overflow_v2(width as usize, height as usize)?;
    if (stride as usize * height as usize) < (width as usize * height as usize) {
        return Err(ConvertError::LumaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: width as usize * height as usize,
            received: stride as usize * height as usize,
        }));
    }
    if stride as usize * height as usize != data.len() {
        return Err(ConvertError::LumaPlaneSizeMismatch(MismatchedSize {
            expected: stride as usize * height as usize,
            received: data.len(),
        }));
    }
    Ok(())
}

/// Validates an interleaved CbCr plane subsampled 2x2 from the image size.
#[inline]
pub(crate) fn check_interleaved_chroma_channel(
    data: &[u8],
    stride: u32,
    image_width: u32,
    image_height: u32,
) -> Result<(), ConvertError> {
    let chroma_min_width = image_width.div_ceil(2) * 2;
    let chroma_height = image_height.div_ceil(2);
    check_overflow_v2(stride as usize, chroma_height as usize)?;
    check_overflow_v2(chroma_min_width as usize, chroma_height as usize)?;
    if (stride as usize * chroma_height as usize)
        < (chroma_min_width as usize * chroma_height as usize)
    {
        return Err(ConvertError::ChromaPlaneMinimumSizeMismatch(MismatchedSize {
            expected: chroma_min_width as usize * chroma_height as usize,
            received: stride as usize * chroma_height as usize,
        }));
    }
    if stride as usize * chroma_height as usize != data.len() {
        return Err(ConvertError::ChromaPlaneSizeMismatch(MismatchedSize {
            expected: stride as usize * chroma_height as usize,
            received: data.len(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_image_rejects_short_buffer() {
        let data = vec![0u8; 16 * 2 * 3 - 1];
        assert!(check_packed_image(&data, 16 * 3, 16, 2, 3).is_err());
    }

    #[test]
    fn packed_image_accepts_padded_stride() {
        let data = vec![0u8; 50 * 2];
        assert!(check_packed_image(&data, 50, 16, 2, 3).is_ok());
    }

    #[test]
    fn chroma_plane_covers_odd_heights() {
        let data = vec![0u8; 16 * 3];
        assert!(check_interleaved_chroma_channel(&data, 16, 16, 5).is_ok());
    }
}
