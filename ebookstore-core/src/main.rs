//! src/main.rs
//! Terminal front end for the e-book storefront

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event as TerminalEvent, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::{signal, sync::Notify};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use ebookstore_core::{
    Logger,
    config::Config,
    controller::{
        actions::{Action, Flow},
        storefront::Storefront,
        terminal_input::TerminalInput,
    },
    model::{location::Location, preferences::LocalStorage},
    view::ui::UIRenderer,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// One animation frame at 60 Hz.
const FRAME: Duration = Duration::from_millis(16);

/// How often lifetime counters are written to the log.
const METRICS_EVERY: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "ebookstore", version, about = "Browse the e-book storefront catalog")]
struct Args {
    /// Config file; the platform config dir is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the static site is served from
    #[arg(long)]
    site_root: Option<PathBuf>,

    /// Page to open, e.g. `ebook-details.html?id=3`
    #[arg(short, long)]
    page: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_panic_handler();

    let app = App::new(args)
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    store: Storefront,
    input: TerminalInput,
    ui_renderer: UIRenderer,
    shutdown: Arc<Notify>,
    last_metrics_log: Instant,
    /// Page loads seen by the input mapper; focus resets when this moves.
    seen_page_loads: u64,
    _log_guard: WorkerGuard,
}

impl App {
    async fn new(args: Args) -> Result<Self> {
        // Load configuration
        let loaded = match &args.config {
            Some(path) => Config::load_from(path).await,
            None => Config::load().await,
        };
        let (mut config, load_error) = match loaded {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };
        if let Some(root) = args.site_root {
            config.site_root = root;
        }

        let log_guard = Logger::init_tracing(&config.logging).context("Failed to set up logging")?;
        info!("Starting eBookStore terminal front end");
        if let Some(e) = load_error {
            info!("Failed to load config, using defaults: {}", e);
        }

        let storage = match config.local_storage_path() {
            Ok(path) => LocalStorage::open(&path).await.unwrap_or_else(|e| {
                warn!("Local storage unreadable, starting empty: {}", e);
                LocalStorage::in_memory()
            }),
            Err(e) => {
                warn!("No local storage location: {}", e);
                LocalStorage::in_memory()
            }
        };

        let mut builder = Storefront::builder(config).storage(storage);
        if let Some(page) = &args.page {
            builder = builder.location(Location::parse(page).context("Invalid --page")?);
        }
        let mut store = builder.build().context("Failed to assemble storefront")?;
        store.boot().await;

        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            seen_page_loads: store.stats().page_loads,
            store,
            input: TerminalInput::new(),
            ui_renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
            last_metrics_log: Instant::now(),
            _log_guard: log_guard,
        })
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Starting event loop");

        let mut event_stream: EventStream = EventStream::new();

        loop {
            self.render()?;

            if self.last_metrics_log.elapsed() >= METRICS_EVERY {
                self.last_metrics_log = Instant::now();
                self.log_performance_metrics();
            }

            let wait = self.store.until_next_task();
            let frame_due = self.store.frame_pending();

            tokio::select! {
                // Shutdown signal
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }

                // Terminal events
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(terminal_event)) => {
                        if self.process_terminal_event(terminal_event).await == Flow::Quit {
                            info!("Quit action from terminal event");
                            break;
                        }
                    }
                    Some(Err(e)) => warn!("Terminal event error: {}", e),
                    None => {
                        info!("Terminal event stream closed");
                        break;
                    }
                },

                // Next deferred task
                _ = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {}

                // Pending scroll work
                _ = tokio::time::sleep(FRAME), if frame_due => {
                    self.store.dispatch(Action::AnimationFrame).await;
                }
            }

            let ran = self.store.run_due_tasks().await;
            if ran > 0 {
                debug!(ran, "deferred tasks ran");
            }
            self.sync_focus();
        }

        self.log_final_metrics();
        info!("Event loop terminated cleanly");
        Ok(())
    }

    async fn process_terminal_event(&mut self, event: TerminalEvent) -> Flow {
        match self.input.map_event(&event, self.store.document()) {
            Some(action) => {
                debug!("Dispatching action: {:?}", action);
                self.store.dispatch(action).await
            }
            None => Flow::Continue,
        }
    }

    /// New page, new focus ring.
    fn sync_focus(&mut self) {
        let loads = self.store.stats().page_loads;
        if loads != self.seen_page_loads {
            self.seen_page_loads = loads;
            self.input.reset();
        }
    }

    fn render(&mut self) -> Result<()> {
        let size = self.terminal.size().context("Failed to read terminal size")?;
        let screen = Rect::new(0, 0, size.width, size.height);
        let revision = self.store.document().revision();
        let moves = self.input.moves();
        if !self.ui_renderer.needs_redraw(revision, moves, screen) {
            self.ui_renderer.skip();
            return Ok(());
        }

        let focus = self.input.focused(self.store.document());
        let store = &self.store;
        let renderer = &mut self.ui_renderer;
        self.terminal
            .draw(|frame: &mut Frame<'_>| {
                renderer.render(frame, store, focus.as_ref(), moves);
            })
            .context("Failed to draw terminal")?;
        Ok(())
    }

    fn log_performance_metrics(&self) {
        let stats = self.store.stats();
        let render_stats = self.ui_renderer.stats();
        info!(
            actions = stats.actions,
            tasks = stats.tasks_run,
            frames = render_stats.frames,
            slow = render_stats.slow,
            "render throughput {:.1} frames/s of draw time",
            render_stats.fps()
        );

        if render_stats.slow > 5 {
            warn!(slow = render_stats.slow, "frames over the 16 ms budget");
        }
    }

    fn log_final_metrics(&self) {
        let stats = self.store.stats();
        let render_stats = self.ui_renderer.stats();

        info!("Final metrics:");
        info!("  Actions processed: {}", stats.actions);
        info!("  Tasks run: {}", stats.tasks_run);
        info!("  Page loads: {}", stats.page_loads);
        info!("  Ignored clicks: {}", stats.ignored_clicks);
        info!("  Catalog fetches: {}", self.store.catalog_fetches());
        info!(
            "  Frames drawn: {} (skipped {})",
            render_stats.frames, render_stats.skips
        );
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(term), Ok(int)) => (term, int),
                        (Err(e), _) | (_, Err(e)) => {
                            warn!("Failed to install signal handlers: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
