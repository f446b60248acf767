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
use crate::conversion_error::{check_interleaved_chroma_channel, check_y8_channel};
use crate::ConvertError;
use std::fmt::Debug;

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

#[derive(Debug, Clone)]
/// Non-mutable representation of an NV12 bi-planar image
pub struct Nv12Image<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    /// Interleaved CbCr plane, subsampled 2x2.
    pub uv_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub uv_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl Nv12Image<'_, u8> {
    pub fn check_constraints(&self) -> Result<(), ConvertError> {
        check_y8_channel(self.y_plane, self.y_stride, self.width, self.height)?;
        check_interleaved_chroma_channel(self.uv_plane, self.uv_stride, self.width, self.height)?;
        Ok(())
    }
}

#[derive(Debug)]
/// Mutable representation of an NV12 bi-planar image
pub struct Nv12ImageMut<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    /// Interleaved CbCr plane, subsampled 2x2.
    pub uv_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub uv_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl Nv12ImageMut<'_, u8> {
    pub fn check_constraints(&self) -> Result<(), ConvertError> {
        check_y8_channel(
            self.y_plane.borrow(),
            self.y_stride,
            self.width,
            self.height,
        )?;
        check_interleaved_chroma_channel(
            self.uv_plane.borrow(),
            self.uv_stride,
            self.width,
            self.height,
        )?;
        Ok(())
    }
}

impl<'a, T> Nv12ImageMut<'a, T>
where
    T: Default + Clone + Copy + Debug,
{
    /// Allocates a mutable NV12 target with tightly packed planes.
    pub fn alloc(width: u32, height: u32) -> Self {
        let chroma_width = (width as usize).div_ceil(2) * 2;
        let chroma_height = (height as usize).div_ceil(2);
        Nv12ImageMut {
            y_plane: BufferStoreMut::Owned(vec![T::default(); width as usize * height as usize]),
            y_stride: width,
            uv_plane: BufferStoreMut::Owned(vec![T::default(); chroma_width * chroma_height]),
            uv_stride: chroma_width as u32,
            width,
            height,
        }
    }

    pub fn to_fixed(&'a self) -> Nv12Image<'a, T> {
        Nv12Image {
            y_plane: self.y_plane.borrow(),
            y_stride: self.y_stride,
            uv_plane: self.uv_plane.borrow(),
            uv_stride: self.uv_stride,
            width: self.width,
            height: self.height,
        }
    }
}

/// Channel ordering of a packed 24-bit source row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum RgbSourceOrder {
    Rgb = 0,
    Bgr = 1,
}

impl From<u8> for RgbSourceOrder {
    fn from(value: u8) -> Self {
        match value {
            0 => RgbSourceOrder::Rgb,
            1 => RgbSourceOrder::Bgr,
            _ => unimplemented!("Unknown channel order {value}"),
        }
    }
}

impl RgbSourceOrder {
    #[inline(always)]
    pub(crate) const fn r_offset(self) -> usize {
        match self {
            RgbSourceOrder::Rgb => 0,
            RgbSourceOrder::Bgr => 2,
        }
    }

    #[inline(always)]
    pub(crate) const fn g_offset(self) -> usize {
        1
    }

    #[inline(always)]
    pub(crate) const fn b_offset(self) -> usize {
        match self {
            RgbSourceOrder::Rgb => 2,
            RgbSourceOrder::Bgr => 0,
        }
    }
}
