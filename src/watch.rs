//! Watch mode: re-check on file changes and reload configuration when it changes

use anyhow::Result;
use chrono::Local;
use colored::*;
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use tidybridge_lib::config::{CONFIG_FILES, Config, ConfigStore};
use tidybridge_lib::document::PERL_EXTENSIONS;
use tidybridge_lib::exit_codes::exit;
use tidybridge_lib::tool::DEFAULT_ARG;
use tokio::runtime::Runtime;
use tokio::sync::watch;

use crate::cli_types::WatchArgs;
use crate::commands::check::handle_check;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Configuration,
    SourceFile,
}

/// Detects what kind of change occurred based on the file name
pub fn change_detected(event: &Event) -> Option<ChangeKind> {
    if !matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) {
        return None;
    }

    let mut source_file = false;
    for path in &event.paths {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str())
            && CONFIG_FILES.contains(&file_name)
        {
            return Some(ChangeKind::Configuration);
        }

        if let Some(extension) = path.extension().and_then(|ext| ext.to_str())
            && PERL_EXTENSIONS.contains(&extension)
        {
            source_file = true;
        }
    }

    source_file.then_some(ChangeKind::SourceFile)
}

/// Describe the configuration the next check will use, if it changed since the last call.
pub fn config_change_summary(changes: &mut watch::Receiver<Arc<Config>>) -> Option<String> {
    if !changes.has_changed().unwrap_or(false) {
        return None;
    }
    let config = changes.borrow_and_update();
    Some(format!(
        "Using {} {} (timeout {}ms)",
        config.executable().unwrap_or("<perltidy not configured>"),
        config.args.as_deref().unwrap_or(DEFAULT_ARG),
        config.timeout
    ))
}

/// Clear the terminal screen
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = io::stdout().flush();
}

fn check_once(runtime: &Runtime, store: &ConfigStore, args: &WatchArgs) {
    if let Err(e) = runtime.block_on(handle_check(store.clone(), &args.run)) {
        eprintln!("{}: {e:#}", "Error".red().bold());
    }
    if !args.run.quiet {
        println!("\n{}", "Watching for file changes...".cyan());
    }
}

/// Check once, then again after every change until interrupted.
///
/// `reload` re-reads the configuration; the result replaces the store's contents so
/// the next check uses it.
pub fn run_watch_mode(
    runtime: &Runtime,
    store: ConfigStore,
    config_path: Option<&Path>,
    reload: impl Fn() -> Result<Config>,
    args: &WatchArgs,
) -> ! {
    let (tx, rx) = channel();

    let mut watcher = match RecommendedWatcher::new(
        tx,
        NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
    ) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("{}: Failed to create file watcher: {}", "Error".red().bold(), e);
            exit::tool_error();
        }
    };

    let watch_paths: Vec<PathBuf> = if args.run.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.run.paths.iter().map(PathBuf::from).collect()
    };

    for path in &watch_paths {
        if let Err(e) = watcher.watch(path, RecursiveMode::Recursive) {
            eprintln!("{}: Failed to watch {}: {}", "Warning".yellow().bold(), path.display(), e);
        }
    }

    if let Some(config_path) = config_path
        && let Err(e) = watcher.watch(config_path, RecursiveMode::NonRecursive)
    {
        eprintln!("{}: Failed to watch config file: {}", "Warning".yellow().bold(), e);
    }

    clear_screen();
    let timestamp = Local::now().format("%H:%M:%S");
    println!("[{}] {}...", timestamp, "Starting perltidy in watch mode".green().bold());
    println!("{}", "Press Ctrl-C to exit".cyan());
    println!();

    let mut config_changes = store.subscribe();
    check_once(runtime, &store, args);

    let debounce_duration = Duration::from_millis(100);

    loop {
        let first_event = match rx.recv() {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => {
                eprintln!("{}: Watch error: {}", "Error".red().bold(), e);
                continue;
            }
            Err(e) => {
                eprintln!("{}: Failed to receive watch event: {}", "Error".red().bold(), e);
                exit::tool_error();
            }
        };

        let Some(mut change_kind) = change_detected(&first_event) else {
            continue;
        };

        // Collect everything else that arrives within the debounce window
        let start = Instant::now();
        while start.elapsed() < debounce_duration {
            if let Ok(Ok(event)) = rx.recv_timeout(Duration::from_millis(10))
                && change_detected(&event) == Some(ChangeKind::Configuration)
            {
                change_kind = ChangeKind::Configuration;
            }
        }

        if change_kind == ChangeKind::Configuration {
            match reload() {
                Ok(config) => store.update(config),
                Err(e) => {
                    log::warn!("Keeping previous configuration: {e:#}");
                    eprintln!("{}: Failed to reload configuration: {e:#}", "Warning".yellow().bold());
                }
            }
        }

        let timestamp = Local::now().format("%H:%M:%S");
        let header = match change_kind {
            ChangeKind::Configuration => format!(
                "[{}] {}...\n\n",
                timestamp,
                "Configuration change detected".yellow().bold()
            ),
            ChangeKind::SourceFile => format!("[{}] {}...\n\n", timestamp, "File change detected".cyan().bold()),
        };

        clear_screen();
        print!("{header}");
        if let Some(summary) = config_change_summary(&mut config_changes) {
            println!("{}\n", summary.dimmed());
        }
        let _ = io::stdout().flush();

        check_once(runtime, &store, args);
    }
}
