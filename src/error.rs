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

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input file")]
    InvalidInput,
    #[error("Invalid configuration")]
    ConfigInvalid,
    #[error("Cursor out of range")]
    CursorOutOfRange,
}

impl AppError {
    pub const INVALID_INPUT_EXIT_CODE: i32 = 20;
    pub const CONFIG_INVALID_EXIT_CODE: i32 = 21;
    pub const CURSOR_OUT_OF_RANGE_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput => Self::INVALID_INPUT_EXIT_CODE,
            Self::ConfigInvalid => Self::CONFIG_INVALID_EXIT_CODE,
            Self::CursorOutOfRange => Self::CURSOR_OUT_OF_RANGE_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => {
                "The input file could not be read as a JSON array of comment records."
            }
            Self::ConfigInvalid => {
                "The settings file or a DISCUSS_* environment variable is invalid."
            }
            Self::CursorOutOfRange => "The --cursor offset is past the end of the text.",
        }
    }
}
