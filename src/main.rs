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

use anyhow::Context as _;
use clap::Parser;
use discuss_kit::config::Settings;
use discuss_kit::error::AppError;
use discuss_kit::mention::{
    Composer, HttpDirectory, MentionEffect, MentionSession, MonospaceCaret, StaticDirectory,
    SuggestionProvider, find_mentions, mentioned_usernames,
};
use discuss_kit::thread::{
    Forest, ThreadMode, ThreadSummary, VisibilityMap, decode_records, render_forest,
};
use discuss_kit::{Cli, Command};
use std::fs::OpenOptions;
use std::path::Path;
use std::rc::Rc;

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(app_error) = extract_app_error(&err) {
            eprintln!("{}", app_error.user_message());
            eprintln!("{err:#}");
            std::process::exit(app_error.exit_code());
        }
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;
    dispatch(cli.command, cli.config.as_deref())
}

/// Only `mention` reads settings.
fn dispatch(command: Command, config: Option<&Path>) -> anyhow::Result<()> {
    match command {
        Command::Thread { file, mode } => run_thread(&file, mode),
        Command::Mention { text, cursor, users, directory_url, pick, debounce_ms } => {
            let mut settings = load_settings(config)?;
            if let Some(ms) = debounce_ms {
                settings.debounce_ms = ms;
            }
            if directory_url.is_some() {
                settings.directory_url = directory_url;
            }
            run_mention(&settings, text, cursor, users.as_deref(), pick)
        }
        Command::Scan { text } => {
            run_scan(&text);
            Ok(())
        }
    }
}

fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    Settings::load(config)
        .map_err(|err| anyhow::Error::new(AppError::ConfigInvalid).context(err.to_string()))
}

fn extract_app_error(err: &anyhow::Error) -> Option<AppError> {
    err.chain().find_map(|cause| cause.downcast_ref::<AppError>().cloned())
}

fn run_thread(file: &Path, mode: ThreadMode) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(file)
        .map_err(|err| anyhow::Error::new(AppError::InvalidInput).context(err.to_string()))
        .with_context(|| format!("failed to read {}", file.display()))?;
    let records = decode_records(&json)
        .map_err(|err| anyhow::Error::new(AppError::InvalidInput).context(err.to_string()))?;

    let forest = Forest::build(&records);
    let visibility = VisibilityMap::resolve(&forest);
    for line in render_forest(&forest, &visibility, mode) {
        println!("{line}");
    }

    let summary = ThreadSummary::of(&forest, &visibility);
    tracing::info!(
        records = records.len(),
        roots = summary.roots,
        rendered = summary.rendered,
        placeholders = summary.placeholders,
        hidden = summary.hidden,
        "threaded comment list"
    );
    println!();
    println!(
        "{} comments ({} deleted placeholders, {} hidden)",
        summary.rendered, summary.placeholders, summary.hidden
    );
    Ok(())
}

fn run_mention(
    settings: &Settings,
    text: String,
    cursor: Option<usize>,
    users: Option<&Path>,
    pick: Option<usize>,
) -> anyhow::Result<()> {
    let char_len = text.chars().count();
    let cursor = cursor.unwrap_or(char_len);
    if cursor > char_len {
        return Err(anyhow::Error::new(AppError::CursorOutOfRange)
            .context(format!("cursor {cursor} > text length {char_len}")));
    }

    let provider = build_provider(settings, users)?;
    let options = settings.session_options();

    let rt = tokio::runtime::Runtime::new()?;
    let local_set = tokio::task::LocalSet::new();

    rt.block_on(local_set.run_until(async move {
        let mut session = MentionSession::new(provider, options);
        session.edit(|c| c.set_text(text, cursor));

        let mention = session.composer().mention();
        let Some((start, end)) = mention.trigger_span() else {
            println!("no active mention at cursor {cursor}");
            return Ok(());
        };
        println!("trigger [{start}, {end}) query {:?}", mention.query());
        if let Some(anchor) = session.composer().caret_anchor(&MonospaceCaret::default()) {
            println!("anchor line {} column {}", anchor.y, anchor.x);
        }

        session.settle().await;
        print_suggestions(session.composer());

        let Some(index) = pick else {
            return Ok(());
        };
        match session.pick(index) {
            MentionEffect::Commit(commit) => {
                println!();
                println!("committed @{}", commit.username);
                println!("{}", session.composer().text());
                println!("cursor {}", session.composer().cursor());
                Ok(())
            }
            _ => Err(anyhow::anyhow!("no suggestion at index {index}")),
        }
    }))
}

fn build_provider(
    settings: &Settings,
    users: Option<&Path>,
) -> anyhow::Result<Rc<dyn SuggestionProvider>> {
    if let Some(path) = users {
        return Ok(Rc::new(StaticDirectory::from_json_file(path)?));
    }
    if let Some(url) = settings.directory_url.as_deref() {
        return Ok(Rc::new(HttpDirectory::new(url, settings.request_timeout())?));
    }
    tracing::warn!("no user directory configured; suggestions will be empty");
    Ok(Rc::new(StaticDirectory::default()))
}

fn print_suggestions(composer: &Composer) {
    let mention = composer.mention();
    if mention.suggestions().is_empty() {
        println!("no matches");
        return;
    }
    for (i, username) in mention.suggestions().iter().enumerate() {
        let marker = if i == mention.selected_index() { '>' } else { ' ' };
        println!("{marker} {i}: {username}");
    }
}

fn run_scan(text: &str) {
    for span in find_mentions(text) {
        println!("[{}, {}) @{}", span.start, span.end, span.username);
    }
    let users = mentioned_usernames(text);
    if !users.is_empty() {
        println!("mentions: {}", users.join(", "));
    }
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if cli.log_append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let file = options
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        target: "diagnostics",
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        log_filter = %directives,
        log_append = cli.log_append,
        "tracing enabled"
    );

    Ok(())
}
