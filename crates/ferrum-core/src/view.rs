// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Borrowed, non-copying views over caller-owned `f32` storage.
//!
//! A [`BufferView`] walks a slice from `offset` in steps of `stride`; a
//! [`MatrixView`] walks a column-major matrix (optionally only one triangle of
//! it). Both are validated once at construction so kernels can index them
//! without further checks. [`Operand`] unifies the two for the engine entry
//! points, and every operand enumerates its elements in increasing logical
//! index order.

use core::fmt;
use std::ops::Range;

use crate::error::{FerrumError, PureResult};

/// Strided window over a contiguous slice.
#[derive(Clone, Copy, Debug)]
pub struct BufferView<'a> {
    data: &'a [f32],
    offset: usize,
    stride: usize,
    len: usize,
}

impl<'a> BufferView<'a> {
    /// Builds a view of `len` elements starting at `offset`, `stride` apart.
    pub fn new(data: &'a [f32], offset: usize, stride: usize, len: usize) -> PureResult<Self> {
        if stride == 0 {
            return Err(FerrumError::OutOfBounds {
                offset,
                stride,
                len,
                available: data.len(),
            });
        }
        let fits = if len == 0 {
            offset <= data.len()
        } else {
            (len - 1)
                .checked_mul(stride)
                .and_then(|span| span.checked_add(offset))
                .is_some_and(|last| last < data.len())
        };
        if !fits {
            return Err(FerrumError::OutOfBounds {
                offset,
                stride,
                len,
                available: data.len(),
            });
        }
        Ok(Self {
            data,
            offset,
            stride,
            len,
        })
    }

    /// Builds a view covering every element reachable from `offset` with the
    /// given stride, i.e. `ceil((data.len() - offset) / stride)` elements.
    pub fn strided(data: &'a [f32], offset: usize, stride: usize) -> PureResult<Self> {
        if stride == 0 || offset > data.len() {
            return Err(FerrumError::OutOfBounds {
                offset,
                stride,
                len: 0,
                available: data.len(),
            });
        }
        let len = (data.len() - offset).div_ceil(stride);
        Self::new(data, offset, stride, len)
    }

    /// Dense view over the whole slice (`offset = 0`, `stride = 1`).
    pub fn dense(data: &'a [f32]) -> Self {
        Self {
            data,
            offset: 0,
            stride: 1,
            len: data.len(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Element at logical `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<f32> {
        (index < self.len).then(|| self.at(index))
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> f32 {
        self.data[self.offset + index * self.stride]
    }

    /// Elements in logical order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + 'a {
        let data = self.data;
        data[self.offset..]
            .iter()
            .step_by(self.stride)
            .take(self.len)
            .copied()
    }
}

/// Part of a square matrix addressed by a [`MatrixView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Every element.
    General,
    /// One triangle. With `unit` set the diagonal is implicit and skipped.
    Triangular { lower: bool, unit: bool },
}

/// Column-major matrix view with a leading dimension.
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    data: &'a [f32],
    offset: usize,
    ld: usize,
    rows: usize,
    cols: usize,
    region: Region,
}

impl<'a> MatrixView<'a> {
    /// General `rows x cols` matrix whose column `j` starts at `offset + j * ld`.
    pub fn general(
        data: &'a [f32],
        offset: usize,
        ld: usize,
        rows: usize,
        cols: usize,
    ) -> PureResult<Self> {
        Self::build(data, offset, ld, rows, cols, Region::General)
    }

    /// Upper or lower triangle of an `n x n` matrix.
    pub fn triangular(
        data: &'a [f32],
        offset: usize,
        ld: usize,
        n: usize,
        lower: bool,
        unit: bool,
    ) -> PureResult<Self> {
        Self::build(data, offset, ld, n, n, Region::Triangular { lower, unit })
    }

    fn build(
        data: &'a [f32],
        offset: usize,
        ld: usize,
        rows: usize,
        cols: usize,
        region: Region,
    ) -> PureResult<Self> {
        if ld < rows.max(1) {
            return Err(FerrumError::InvalidLayout {
                reason: "leading dimension must be at least the row count",
            });
        }
        if matches!(region, Region::Triangular { .. }) && rows != cols {
            return Err(FerrumError::InvalidLayout {
                reason: "triangular views must be square",
            });
        }
        let view = Self {
            data,
            offset,
            ld,
            rows,
            cols,
            region,
        };
        // The whole column-major footprint must be addressable, including the
        // part a triangular region never reads.
        let fits = if rows == 0 || cols == 0 {
            offset <= data.len()
        } else {
            (cols - 1)
                .checked_mul(ld)
                .zip(offset.checked_add(rows - 1))
                .and_then(|(span, first_col_end)| span.checked_add(first_col_end))
                .is_some_and(|last| last < data.len())
        };
        if !fits {
            return Err(FerrumError::OutOfBounds {
                offset,
                stride: ld,
                len: rows.saturating_mul(cols),
                available: data.len(),
            });
        }
        Ok(view)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ld(&self) -> usize {
        self.ld
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Number of logical elements (stored triangle only for triangular views).
    pub fn len(&self) -> usize {
        match self.region {
            Region::General => self.rows * self.cols,
            Region::Triangular { unit: false, .. } => self.rows * (self.rows + 1) / 2,
            Region::Triangular { unit: true, .. } => self.rows * self.rows.saturating_sub(1) / 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extent(&self) -> Extent {
        Extent::Matrix {
            rows: self.rows,
            cols: self.cols,
            region: self.region,
        }
    }

    fn column_rows(&self, col: usize) -> Range<usize> {
        let n = self.rows;
        match self.region {
            Region::General => 0..n,
            Region::Triangular { lower: false, unit } => 0..if unit { col } else { col + 1 },
            Region::Triangular { lower: true, unit } => (if unit { col + 1 } else { col })..n,
        }
    }

    /// Logical index of the first element of column `col`.
    fn column_start(&self, col: usize) -> usize {
        let n = self.rows;
        let before = col * col.saturating_sub(1) / 2;
        match self.region {
            Region::General => col * n,
            Region::Triangular { lower: false, unit: false } => col * (col + 1) / 2,
            Region::Triangular { lower: false, unit: true } => before,
            Region::Triangular { lower: true, unit: false } => col * n - before,
            Region::Triangular { lower: true, unit: true } => col * n.saturating_sub(1) - before,
        }
    }

    pub(crate) fn at(&self, index: usize) -> f32 {
        let col = match self.region {
            Region::General => index / self.rows,
            Region::Triangular { .. } => {
                // Last column whose first logical index is <= index. Empty
                // columns share their start with the next one and lose the tie.
                let (mut lo, mut hi) = (0, self.cols);
                while hi - lo > 1 {
                    let mid = lo + (hi - lo) / 2;
                    if self.column_start(mid) <= index {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                lo
            }
        };
        let row = self.column_rows(col).start + (index - self.column_start(col));
        self.data[self.offset + col * self.ld + row]
    }

    /// Element at logical `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<f32> {
        (index < self.len()).then(|| self.at(index))
    }

    /// Elements column by column.
    pub fn iter(&self) -> impl Iterator<Item = f32> + 'a {
        let view = *self;
        (0..view.cols).flat_map(move |col| {
            let base = view.offset + col * view.ld;
            view.column_rows(col).map(move |row| view.data[base + row])
        })
    }
}

/// Logical size of an operand; two operands combine only when these agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    Vector { len: usize },
    Matrix { rows: usize, cols: usize, region: Region },
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Vector { len } => write!(f, "vector of {len}"),
            Extent::Matrix {
                rows,
                cols,
                region: Region::General,
            } => write!(f, "{rows}x{cols} general matrix"),
            Extent::Matrix {
                rows,
                cols,
                region: Region::Triangular { lower, unit },
            } => write!(
                f,
                "{rows}x{cols} {} {}triangular matrix",
                if *lower { "lower" } else { "upper" },
                if *unit { "unit " } else { "" }
            ),
        }
    }
}

/// Any input accepted by the engine entry points.
#[derive(Clone, Copy, Debug)]
pub enum Operand<'a> {
    Vector(BufferView<'a>),
    Matrix(MatrixView<'a>),
}

impl<'a> Operand<'a> {
    pub fn len(&self) -> usize {
        match self {
            Operand::Vector(view) => view.len(),
            Operand::Matrix(view) => view.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn extent(&self) -> Extent {
        match self {
            Operand::Vector(view) => Extent::Vector { len: view.len() },
            Operand::Matrix(view) => view.extent(),
        }
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> f32 {
        match self {
            Operand::Vector(view) => view.at(index),
            Operand::Matrix(view) => view.at(index),
        }
    }

    /// Elements in logical order.
    pub fn to_vec(&self) -> Vec<f32> {
        match self {
            Operand::Vector(view) => view.iter().collect(),
            Operand::Matrix(view) => view.iter().collect(),
        }
    }
}

/// Checks that two operands can be zipped and returns their common length.
pub(crate) fn common_len(left: &Operand<'_>, right: &Operand<'_>) -> PureResult<usize> {
    match (left.extent(), right.extent()) {
        (Extent::Vector { len: expected }, Extent::Vector { len: got }) if expected != got => {
            Err(FerrumError::LengthMismatch { expected, got })
        }
        (l, r) if l != r => Err(FerrumError::ExtentMismatch { left: l, right: r }),
        _ => Ok(left.len()),
    }
}

impl<'a> From<BufferView<'a>> for Operand<'a> {
    fn from(view: BufferView<'a>) -> Self {
        Operand::Vector(view)
    }
}

impl<'a> From<MatrixView<'a>> for Operand<'a> {
    fn from(view: MatrixView<'a>) -> Self {
        Operand::Matrix(view)
    }
}

impl<'a> From<&'a [f32]> for Operand<'a> {
    fn from(data: &'a [f32]) -> Self {
        Operand::Vector(BufferView::dense(data))
    }
}

impl<'a> From<&'a Vec<f32>> for Operand<'a> {
    fn from(data: &'a Vec<f32>) -> Self {
        Operand::Vector(BufferView::dense(data))
    }
}

impl<'a, const N: usize> From<&'a [f32; N]> for Operand<'a> {
    fn from(data: &'a [f32; N]) -> Self {
        Operand::Vector(BufferView::dense(data))
    }
}
