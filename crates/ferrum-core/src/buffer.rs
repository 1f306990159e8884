// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use core::fmt;
use std::ops::{Deref, DerefMut};

use crate::view::{BufferView, Operand};

/// Dense result of an engine call, owned by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Buffer {
    values: Vec<f32>,
}

impl Buffer {
    pub fn zeroed(len: usize) -> Self {
        Self {
            values: vec![0.0; len],
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

impl Deref for Buffer {
    type Target = [f32];

    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.values
    }
}

impl From<Vec<f32>> for Buffer {
    fn from(values: Vec<f32>) -> Self {
        Self { values }
    }
}

impl From<Buffer> for Vec<f32> {
    fn from(buffer: Buffer) -> Self {
        buffer.values
    }
}

impl<'a> From<&'a Buffer> for Operand<'a> {
    fn from(buffer: &'a Buffer) -> Self {
        Operand::Vector(BufferView::dense(&buffer.values))
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_values(f, &self.values)
    }
}

/// Renders `[v0, v1, ..., vn]` for diagnostics.
pub fn format_values(values: &[f32]) -> String {
    struct Values<'a>(&'a [f32]);

    impl fmt::Display for Values<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_values(f, self.0)
        }
    }

    Values(values).to_string()
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[f32]) -> fmt::Result {
    f.write_str("[")?;
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value:?}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_a_bracketed_list() {
        assert_eq!(format_values(&[1.0, 2.5, -3.0]), "[1.0, 2.5, -3.0]");
        assert_eq!(format_values(&[7.0]), "[7.0]");
        assert_eq!(format_values(&[]), "[]");
        assert_eq!(format_values(&[f32::NAN, f32::INFINITY]), "[NaN, inf]");
    }

    #[test]
    fn buffer_display_matches_format_values() {
        let buffer = Buffer::from(vec![6.0, 8.0, 10.0, 12.0]);
        assert_eq!(buffer.to_string(), "[6.0, 8.0, 10.0, 12.0]");
        assert_eq!(buffer.len(), 4);
        assert_eq!(Vec::from(buffer), vec![6.0, 8.0, 10.0, 12.0]);
    }
}
