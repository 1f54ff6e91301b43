//! md2poster - turn Markdown into paginated poster cards
//!
//! Entry point for the command line tool. Handles argument parsing,
//! logging initialization, and drives the poster state through export,
//! clipboard copy, and watch mode.

use anyhow::{bail, Context};
use clap::Parser;
use md2poster::clipboard;
use md2poster::config::Config;
use md2poster::file_handler::{read_file, read_stdin, SourceWatcher, WatchEvent};
use md2poster::markdown::{PosterExporter, PosterOptions, RenderMode, SAMPLE_DOCUMENT};
use md2poster::message::Message;
use md2poster::state::{ExportStatus, PosterState};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name for logging
const APP_NAME: &str = "md2poster";

/// How often watch mode checks for source changes
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Turn Markdown into poster cards, one HTML file per page
#[derive(Parser, Debug)]
#[command(name = APP_NAME, version)]
#[command(about = "Turn Markdown into paginated poster cards")]
struct Args {
    /// Markdown file to render ("-" reads stdin; omit for the sample document)
    file: Option<PathBuf>,

    /// Pagination mode: long, auto or manual
    #[arg(short, long)]
    mode: Option<RenderMode>,

    /// Output directory for the poster files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file name stem
    #[arg(long)]
    stem: Option<String>,

    /// Use dark card styling
    #[arg(long)]
    dark: bool,

    /// Print the page list instead of exporting
    #[arg(short, long)]
    list: bool,

    /// Copy page N (1-based) to the clipboard instead of exporting
    #[arg(short, long, value_name = "N")]
    copy: Option<usize>,

    /// Re-export whenever the source file changes
    #[arg(short, long)]
    watch: bool,

    /// Use an alternate configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Store --mode, --dark, --output and --stem as defaults, then exit
    #[arg(long)]
    save_config: bool,
}

/// Where the document came from
enum Source {
    Sample,
    Stdin,
    File(PathBuf),
}

impl Source {
    fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            None => Source::Sample,
            Some(path) if path.as_os_str() == "-" => Source::Stdin,
            Some(path) => Source::File(path),
        }
    }

    fn path(&self) -> Option<&Path> {
        match self {
            Source::File(path) => Some(path.as_path()),
            _ => None,
        }
    }

    async fn load(&self) -> anyhow::Result<String> {
        match self {
            Source::Sample => Ok(SAMPLE_DOCUMENT.to_string()),
            Source::Stdin => Ok(read_stdin().await.context("reading standard input")?.content),
            Source::File(path) => Ok(read_file(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?
                .content),
        }
    }
}

/// Export settings resolved from arguments and configuration
struct ExportTarget {
    output_dir: PathBuf,
    file_stem: String,
    options: PosterOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    log::debug!("Arguments: {:?}", args);

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    if args.save_config {
        return save_config(config, &args);
    }

    let source = Source::from_arg(args.file.clone());
    let mode = args.mode.unwrap_or(config.render.default_mode);

    let mut state = PosterState::new(source.load().await?, mode);
    if args.dark || config.render.dark_mode {
        state = state.update(Message::ToggleDarkMode);
    }
    log::info!("Rendering in {} mode: {} page(s)", state.mode, state.page_count());

    if args.list {
        print_pages(&state);
        return Ok(());
    }

    if let Some(number) = args.copy {
        return finish(&copy_page(state, number));
    }

    // Checked up front so a misuse writes nothing
    let watched = watch_path(args.watch, &source)?;

    let target = resolve_target(&args, &config, &source);
    let exporter = PosterExporter::new();
    state = export(&exporter, state, &target).await;

    if let Some(path) = watched {
        return watch(&exporter, state, path, &target, config.watch.debounce_ms).await;
    }

    finish(&state)
}

/// Turn a failed final state into a non-zero exit
fn finish(state: &PosterState) -> anyhow::Result<()> {
    match &state.status {
        ExportStatus::Failed(reason) => bail!("{}", reason),
        _ => Ok(()),
    }
}

/// Initialize the logging system
fn init_logging() {
    let default_filter = format!("info,{}=debug", APP_NAME);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

/// The file to watch, or an error when watching was asked for without one
fn watch_path(watch: bool, source: &Source) -> anyhow::Result<Option<&Path>> {
    match (watch, source.path()) {
        (false, _) => Ok(None),
        (true, Some(path)) => Ok(Some(path)),
        (true, None) => bail!("--watch needs a source file"),
    }
}

fn resolve_target(args: &Args, config: &Config, source: &Source) -> ExportTarget {
    let output_dir = args
        .output
        .clone()
        .or_else(|| config.export.output_dir.clone())
        .or_else(|| source.path().map(PosterExporter::suggest_output_dir))
        .unwrap_or_else(|| PathBuf::from("."));

    let title = source
        .path()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned());

    ExportTarget {
        output_dir,
        file_stem: args.stem.clone().unwrap_or_else(|| config.export.file_stem.clone()),
        options: PosterOptions {
            title,
            show_page_badge: config.export.show_page_badge,
            include_styles: config.export.include_styles,
            ..PosterOptions::default()
        },
    }
}

fn save_config(mut config: Config, args: &Args) -> anyhow::Result<()> {
    config.remember(args.mode, args.dark, args.output.clone(), args.stem.clone());
    match &args.config {
        Some(path) => config.save_to(path),
        None => config.save(),
    }
    .context("saving configuration")?;

    if let Some(path) = args.config.clone().or_else(|| Config::config_path().ok()) {
        println!("Saved configuration to {}", path.display());
    }
    Ok(())
}

fn print_pages(state: &PosterState) {
    let pages = state.pages();
    println!("{}: {} page(s)", state.mode.display_name(), pages.len());
    for (index, page) in pages.iter().enumerate() {
        let first_line = page.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        println!("{:>3}  {:>4} lines  {}", index + 1, page.lines().count(), first_line.trim());
    }
}

fn copy_page(state: PosterState, number: usize) -> PosterState {
    let state = state.update(Message::ExportStarted);
    match clipboard::copy_page(&state.pages(), number) {
        Ok(()) => {
            println!("Copied page {} to the clipboard", number);
            state.update(Message::ExportFinished(1))
        }
        Err(e) => state.update(Message::ExportFailed(e.user_message())),
    }
}

/// Export all pages, recording the outcome in the returned state
async fn export(exporter: &PosterExporter, state: PosterState, target: &ExportTarget) -> PosterState {
    let state = state.update(Message::ExportStarted);
    let options = PosterOptions {
        dark_mode: state.dark_mode,
        ..target.options.clone()
    };

    let result = exporter
        .export_pages(&state.source, state.mode, &target.output_dir, &target.file_stem, &options)
        .await;

    match result {
        Ok(paths) => {
            for path in &paths {
                println!("{}", path.display());
            }
            state.update(Message::ExportFinished(paths.len()))
        }
        Err(e) => {
            let message = md2poster::error::AppError::from(e).user_message();
            log::error!("{}", message);
            state.update(Message::ExportFailed(message))
        }
    }
}

/// Re-export on every settled change of `path` until Ctrl-C
async fn watch(
    exporter: &PosterExporter,
    mut state: PosterState,
    path: &Path,
    target: &ExportTarget,
    debounce_ms: u64,
) -> anyhow::Result<()> {
    let mut watcher = SourceWatcher::new(path, debounce_ms).context("starting watch mode")?;
    log::info!("Watching {} (Ctrl-C to stop)", watcher.path().display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping watch mode");
                return Ok(());
            }
            _ = tokio::time::sleep(WATCH_POLL_INTERVAL) => {}
        }

        for event in watcher.poll() {
            match event {
                WatchEvent::Modified(changed) => match read_file(&changed).await {
                    Ok(read) if read.content == state.source => {
                        log::debug!("{} changed on disk but content is identical", changed.display());
                    }
                    Ok(read) => {
                        state = state.update(Message::SourceChanged(read.content));
                        log::info!("Source changed: {} page(s)", state.page_count());
                        state = export(exporter, state, target).await;
                    }
                    Err(e) => log::warn!("Could not reload {}: {}", changed.display(), e.user_message()),
                },
                WatchEvent::Removed(removed) => {
                    log::warn!("{} was removed; waiting for it to reappear", removed.display());
                }
                WatchEvent::Error(e) => log::error!("Watcher error: {}", e),
            }
        }
    }
}
