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
use crate::conversion_error::{check_overflow_v2, MismatchedSize};
use crate::ConvertError;

/// Scanline ordering of the source plane relative to the destination.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RowDirection {
    /// Rows are copied in storage order.
    TopDown,
    /// The last source row becomes the first destination row. Encoders that
    /// consume bottom-up DIB layouts need this.
    BottomUp,
}

/// Copies `rows` scanlines of `row_bytes` each between planes with different
/// strides. Stride padding in the destination is left untouched.
pub fn copy_plane(
    src: &[u8],
    src_stride: u32,
    dst: &mut [u8],
    dst_stride: u32,
    row_bytes: usize,
    rows: usize,
    direction: RowDirection,
) -> Result<(), ConvertError> {
    if row_bytes == 0 || rows == 0 {
        return Err(ConvertError::ZeroBaseSize);
    }
    if (src_stride as usize) < row_bytes || (dst_stride as usize) < row_bytes {
        return Err(ConvertError::MinimumSourceSizeMismatch(MismatchedSize {
            expected: row_bytes,
            received: (src_stride as usize).min(dst_stride as usize),
        }));
    }
    check_overflow_v2(src_stride as usize, rows)?;
    check_overflow_v2(dst_stride as usize, rows)?;
    // The last row only has to reach row_bytes, not the full stride.
    let src_needed = src_stride as usize * (rows - 1) + row_bytes;
    if src.len() < src_needed {
        return Err(ConvertError::SourceSizeMismatch(MismatchedSize {
            expected: src_needed,
            received: src.len(),
        }));
    }
    let dst_needed = dst_stride as usize * (rows - 1) + row_bytes;
    if dst.len() < dst_needed {
        return Err(ConvertError::SourceSizeMismatch(MismatchedSize {
            expected: dst_needed,
            received: dst.len(),
        }));
    }

    let dst_rows = dst.chunks_mut(dst_stride as usize).take(rows);
    let src_rows = src.chunks(src_stride as usize).take(rows);
    match direction {
        RowDirection::TopDown => {
            for (dst_row, src_row) in dst_rows.zip(src_rows) {
                dst_row[..row_bytes].copy_from_slice(&src_row[..row_bytes]);
            }
        }
        RowDirection::BottomUp => {
            for (dst_row, src_row) in dst_rows.zip(src_rows.rev()) {
                dst_row[..row_bytes].copy_from_slice(&src_row[..row_bytes]);
            }
        }
    }
    Ok(())
}
