// discuss-kit - Mention-aware input and threaded discussions
// Copyright (C) 2025  The discuss-kit authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use super::insert::char_to_byte_index;
use unicode_width::UnicodeWidthStr;

/// Anchor point for the suggestion overlay, in the resolver's units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaretPosition {
    pub x: f32,
    pub y: f32,
}

/// Translates a char offset into overlay coordinates.
///
/// Implementations must be pure: resolving a position never touches mention
/// state.
pub trait CaretResolver {
    fn resolve(&self, text: &str, cursor: usize) -> CaretPosition;
}

impl<F> CaretResolver for F
where
    F: Fn(&str, usize) -> CaretPosition,
{
    fn resolve(&self, text: &str, cursor: usize) -> CaretPosition {
        self(text, cursor)
    }
}

/// Fixed-cell resolver for terminals and monospace editors.
///
/// `y` is the line index times `line_height`; `x` is the display width of the
/// line up to the cursor times `cell_width`, so wide glyphs take two cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceCaret {
    pub cell_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceCaret {
    fn default() -> Self {
        Self { cell_width: 1.0, line_height: 1.0 }
    }
}

impl CaretResolver for MonospaceCaret {
    #[allow(clippy::cast_precision_loss)]
    fn resolve(&self, text: &str, cursor: usize) -> CaretPosition {
        let before = &text[..char_to_byte_index(text, cursor)];
        let row = before.matches('\n').count();
        let line = before.rsplit('\n').next().unwrap_or_default();
        CaretPosition {
            x: line.width() as f32 * self.cell_width,
            y: row as f32 * self.line_height,
        }
    }
}
