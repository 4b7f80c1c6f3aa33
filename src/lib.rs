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

pub mod config;
pub mod error;
pub mod mention;
pub mod thread;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "discuss", version, about = "Mention-aware input and threaded discussions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (defaults to the per-user config file when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write tracing diagnostics to a file (disabled when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (e.g. `info,discuss_kit=debug`)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to --log-file instead of truncating it
    #[arg(long, global = true)]
    pub log_append: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Thread a JSON array of comment records and print what renders
    Thread {
        /// JSON file with the flat record list
        file: PathBuf,

        /// How replies under each root are laid out
        #[arg(long, value_enum, default_value_t = thread::ThreadMode::InsertionOrder)]
        mode: thread::ThreadMode,
    },
    /// Detect the `@` trigger at the cursor and fetch suggestions
    Mention {
        text: String,

        /// Cursor offset in chars (defaults to the end of the text)
        #[arg(long)]
        cursor: Option<usize>,

        /// JSON array of usernames to search instead of a remote directory
        #[arg(long, value_name = "FILE", conflicts_with = "directory_url")]
        users: Option<PathBuf>,

        /// Remote user directory queried as `<URL>?q=<prefix>`
        #[arg(long, value_name = "URL")]
        directory_url: Option<String>,

        /// Commit the suggestion at this index into the text
        #[arg(long)]
        pick: Option<usize>,

        /// Override the debounce interval in milliseconds
        #[arg(long, value_name = "MS")]
        debounce_ms: Option<u64>,
    },
    /// List committed `@username` mentions in a text
    Scan { text: String },
}
