use super::draw::{render_dashboard, Frame, UiOpts};
use super::terminal;
use crate::opener::open_url;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use piponger_client::{
    spawn_force_create, spawn_poll, ActionDispatcher, Artifact, ArtifactTarget,
    ForceCreateCompletion, HttpStatusApi, PollCompletion, PollOutcome, Poller, StatusApi,
    StatusStore,
};
use piponger_view::project;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

const RENDER_TICK: Duration = Duration::from_millis(250);

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult {
    None,
    Redraw,
    Quit,
    ForceCreate,
    Open(ArtifactTarget),
}

/// Dashboard state: the latest snapshot, poll bookkeeping and button state.
pub struct App {
    api: Arc<HttpStatusApi>,
    store: StatusStore,
    poller: Poller,
    dispatcher: ActionDispatcher,
    last_applied: Option<DateTime<Local>>,
}

impl App {
    pub fn new(api: HttpStatusApi, poller: Poller) -> Self {
        Self {
            api: Arc::new(api),
            store: StatusStore::new(),
            poller,
            dispatcher: ActionDispatcher::new(),
            last_applied: None,
        }
    }

    pub fn start_poll(&mut self, tx: &UnboundedSender<PollCompletion>) {
        let ticket = self.poller.issue();
        debug!(seq = ticket.seq, "poll issued");
        spawn_poll(self.api.clone(), ticket, tx.clone());
    }

    pub fn on_poll_complete(&mut self, completion: PollCompletion) -> PollOutcome {
        let outcome = self
            .poller
            .complete(completion, Instant::now(), &mut self.store);
        if outcome == PollOutcome::Applied {
            self.dispatcher.reconcile(&self.store);
            self.last_applied = Some(Local::now());
        }
        outcome
    }

    pub fn on_force_create_complete(&mut self, completion: ForceCreateCompletion) {
        self.dispatcher.finish_force_create(completion.result);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyResult::Quit;
        }

        if self.dispatcher.dialog().is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                    self.dispatcher.dismiss_dialog();
                    KeyResult::Redraw
                }
                _ => KeyResult::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => KeyResult::Quit,
            KeyCode::Char('s') if self.dispatcher.begin_force_create() => KeyResult::ForceCreate,
            KeyCode::Char('p') => self.open(Artifact::StaticPlot),
            KeyCode::Char('g') => self.open(Artifact::InteractiveGraph),
            _ => KeyResult::None,
        }
    }

    fn open(&self, artifact: Artifact) -> KeyResult {
        self.dispatcher
            .resolve_artifact(artifact, &self.store)
            .map(KeyResult::Open)
            .unwrap_or(KeyResult::None)
    }

    fn open_artifact(&mut self, target: &ArtifactTarget) {
        let url = self.api.url(&target.path());
        info!(%url, "opening result artifact");
        if let Err(err) = open_url(&url) {
            warn!(%url, error = %err, "failed to open artifact");
            self.dispatcher.show_error(format!("Could not open {url}: {err}"));
        }
    }

    pub fn render(&self, opts: &UiOpts, width: u16, now: DateTime<Utc>) -> String {
        let view = self.store.current().map(|snapshot| project(snapshot, now));
        let frame = Frame {
            server: self.api.base_url(),
            view: view.as_ref(),
            gates: self.dispatcher.gates(),
            dialog: self.dispatcher.dialog(),
            loading: self.poller.loading_visible(Instant::now()),
            updated: self
                .last_applied
                .map(|at| at.format("%H:%M:%S").to_string()),
        };
        render_dashboard(&frame, opts, width)
    }
}

/// Full-screen dashboard with keyboard actions.
pub async fn run_interactive(mut app: App) -> Result<()> {
    let opts = UiOpts {
        ascii_only: false,
        show_keys: true,
    };
    let mut stdout = io::stdout();
    terminal::setup_terminal(&mut stdout).context("failed to prepare terminal")?;
    let result = event_loop(&mut app, &opts, &mut stdout).await;
    terminal::restore_terminal(&mut stdout).context("failed to restore terminal")?;
    result
}

async fn event_loop(app: &mut App, opts: &UiOpts, out: &mut impl Write) -> Result<()> {
    let (poll_tx, mut poll_rx) = unbounded_channel();
    let (action_tx, mut action_rx) = unbounded_channel();
    let mut poll_timer = interval(app.poller.period());
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut render_timer = interval(RENDER_TICK);
    let mut events = EventStream::new();

    loop {
        let (width, height) = terminal::size();
        let frame = app.render(opts, width, Utc::now());
        terminal::paint(out, &frame, height)?;

        tokio::select! {
            _ = poll_timer.tick() => app.start_poll(&poll_tx),
            Some(completion) = poll_rx.recv() => {
                app.on_poll_complete(completion);
            }
            Some(completion) = action_rx.recv() => app.on_force_create_complete(completion),
            _ = render_timer.tick() => {}
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match app.on_key(key) {
                        KeyResult::Quit => break,
                        KeyResult::ForceCreate => {
                            info!("requesting a new iteration");
                            spawn_force_create(app.api.clone(), action_tx.clone());
                        }
                        KeyResult::Open(target) => app.open_artifact(&target),
                        KeyResult::Redraw | KeyResult::None => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("failed to read terminal events"),
                None => break,
            },
        }
    }

    Ok(())
}

/// Prints one frame per applied snapshot until Ctrl-C.
pub async fn run_plain(mut app: App) -> Result<()> {
    let opts = UiOpts {
        ascii_only: true,
        show_keys: false,
    };
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl-C handler")?;

    let (poll_tx, mut poll_rx) = unbounded_channel();
    let mut poll_timer = interval(app.poller.period());
    poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stop_check = interval(RENDER_TICK);
    let mut stdout = io::stdout();

    while !stop.load(Ordering::SeqCst) {
        tokio::select! {
            _ = poll_timer.tick() => app.start_poll(&poll_tx),
            Some(completion) = poll_rx.recv() => {
                if app.on_poll_complete(completion) == PollOutcome::Applied {
                    writeln!(stdout, "{}\n", app.render(&opts, 80, Utc::now()))?;
                    stdout.flush()?;
                }
            }
            _ = stop_check.tick() => {}
        }
    }

    info!("interrupted; exiting");
    Ok(())
}

/// Fetches a single snapshot and prints it.
pub async fn run_once(mut app: App) -> Result<()> {
    let opts = UiOpts {
        ascii_only: true,
        show_keys: false,
    };
    let snapshot = app
        .api
        .fetch_snapshot()
        .await
        .with_context(|| format!("failed to fetch status from {}", app.api.base_url()))?;
    app.store.replace(snapshot);
    app.dispatcher.reconcile(&app.store);
    app.last_applied = Some(Local::now());

    println!("{}", app.render(&opts, 80, Utc::now()));
    Ok(())
}
