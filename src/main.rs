mod config;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::writer::BoxMakeWriter};

use kubedash_k8s::{Dashboard, KubeClient};
use kubedash_tui::{
    Action, AppState, DetailPage, Event, EventHandler, KeyBindings, KeyContext, Listing, Screen,
    Tui, View,
};
use kubedash_types::{ClusterSummary, Kind, NormalizedRecord};

use crate::config::Settings;

type SharedDashboard = Arc<Dashboard<KubeClient>>;

/// Kubedash - A read-only terminal dashboard for Kubernetes clusters
#[derive(Parser, Debug)]
#[command(name = "kubedash")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubeconfig context (defaults to the current context or in-cluster config)
    #[arg(long, global = true)]
    context: Option<String>,

    /// Restrict namespaced views to this namespace
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Display name for the cluster
    #[arg(long, env = "KUBERNETES_CLUSTER_NAME", global = true)]
    cluster_name: Option<String>,

    /// Path to a TOML settings file
    #[arg(long, env = "KUBEDASH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Terminal UI tick interval in milliseconds
    #[arg(long)]
    tick_rate_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// One-shot commands printing JSON instead of starting the terminal UI
#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster summary counts and health
    Summary,
    /// Case-insensitive search across all searchable kinds
    Search { query: String },
    /// List one kind (pods, deploy, pvc, ...)
    List { kind: String },
    /// Resource usage from the metrics API
    Top {
        #[arg(value_enum)]
        target: TopTarget,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TopTarget {
    Nodes,
    Pods,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.command.is_none(), args.log_file.as_deref())?;

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Subcommands log to stderr; the terminal UI logs to a file or nowhere
fn init_tracing(interactive: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    let (writer, ansi) = match (interactive, log_file) {
        (true, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        (true, None) => (BoxMakeWriter::new(std::io::sink), false),
        (false, _) => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .init();

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;

    let context = args.context.clone().or_else(|| settings.context.clone());
    let namespace = args.namespace.clone().or_else(|| settings.namespace.clone());
    let cluster_name = settings.cluster_name(args.cluster_name.clone());
    let tick_rate = Duration::from_millis(settings.tick_rate_ms(args.tick_rate_ms));

    let client = KubeClient::connect(context.as_deref(), cluster_name).await?;
    let identity = client.identity().clone();
    info!(
        cluster = %identity.cluster_name,
        api_server = %identity.api_server_address,
        "connected"
    );
    let dashboard = Arc::new(Dashboard::new(client, identity));

    match args.command {
        Some(command) => run_command(&dashboard, command, namespace.as_deref()).await,
        None => run_app(dashboard, namespace, tick_rate).await,
    }
}

async fn run_command(
    dashboard: &SharedDashboard,
    command: Command,
    namespace: Option<&str>,
) -> Result<()> {
    match command {
        Command::Summary => print_json(&dashboard.summarize().await),
        Command::Search { query } => print_json(&dashboard.search(&query).await),
        Command::List { kind } => {
            let kind = Kind::parse(&kind).ok_or_else(|| anyhow!("Unknown resource kind: {}", kind))?;
            print_json(&dashboard.fetch_view(kind, namespace).await)
        }
        Command::Top { target } => {
            let usage = match target {
                TopTarget::Nodes => dashboard.top_nodes().await,
                TopTarget::Pods => dashboard.top_pods(namespace).await,
            };
            print_json(&usage)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Internal actions for async operations
enum InternalAction {
    LoadSummary,
    LoadView(View),
    Search(String),
    LoadDetail(Kind, Option<String>, String),
    SummaryLoaded(ClusterSummary),
    ViewLoaded(View, Listing),
    SearchLoaded(String, Vec<NormalizedRecord>),
    DetailLoaded(DetailPage),
    Error(String),
}

async fn run_app(
    dashboard: SharedDashboard,
    namespace: Option<String>,
    tick_rate: Duration,
) -> Result<()> {
    // Create action channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    let mut state = AppState::new(dashboard.identity().cluster_name.clone(), namespace);

    let mut tui = Tui::new().context("Failed to initialize terminal")?;
    let mut events = EventHandler::new(tick_rate);
    let keybindings = KeyBindings::new();

    let _ = internal_tx.send(InternalAction::LoadSummary);

    // Initial render
    render(&mut tui, &mut state)?;

    // Main event loop
    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if state.ui_state.error_message.is_some() {
                            Some(Action::DismissError)
                        } else if state.ui_state.help_visible {
                            Some(Action::ToggleHelp)
                        } else if state.ui_state.search_active {
                            keybindings.get_search_input_action(&key)
                        } else {
                            let context = match state.current_screen {
                                Screen::Overview |
                                Screen::ResourceList |
                                Screen::SearchResults => KeyContext::ListNavigation,
                                Screen::Detail => KeyContext::Detail,
                            };
                            keybindings.get_action(context, &key)
                        };

                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    // Nothing changes on a tick unless a load finished
                    Event::Tick => {}
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        let _ = action_tx.send(Action::ShowError(e));
                    }
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &internal_tx, action);
                state.render_dirty = true;
            }

            // Handle internal async actions
            Some(internal) = internal_rx.recv() => {
                handle_internal(&mut state, &dashboard, &internal_tx, internal);
                state.render_dirty = true;
            }
        }

        if state.should_quit {
            break;
        }

        if state.render_dirty {
            render(&mut tui, &mut state)?;
        }
    }

    // Cleanup
    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn handle_action(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::GoBack => {
            if !state.go_back() {
                state.should_quit = true;
            }
        }
        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }
        Action::ListUp => {
            state.list_up();
        }
        Action::ListDown => {
            state.list_down();
        }
        Action::ListSelect => {
            handle_list_select(state, internal_tx);
        }

        // Search bar
        Action::OpenSearch => {
            state.start_search();
        }
        Action::CloseSearch => {
            state.cancel_search();
        }
        Action::SearchInput(c) => {
            state.search_input_char(c);
        }
        Action::SearchBackspace => {
            state.search_input_backspace();
        }
        Action::SubmitSearch => {
            let query = state.take_search_query();
            if !query.trim().is_empty() {
                state.ui_state.loading = Some(format!("search \"{}\"", query.trim()));
                let _ = internal_tx.send(InternalAction::Search(query));
            }
        }

        Action::ClearNamespace => {
            let was_scoped = state.namespace.take().is_some();
            let namespaced_view = state.current_view.filter(|v| v.is_namespaced());
            if let (true, Screen::ResourceList, Some(view)) =
                (was_scoped, state.current_screen.clone(), namespaced_view)
            {
                request_view(state, internal_tx, view);
            }
        }
        Action::Refresh => {
            refresh(state, internal_tx);
        }

        // Detail page
        Action::ScrollUp(n) => {
            state.scroll_up(n);
        }
        Action::ScrollDown(n) => {
            state.scroll_down(n);
        }
        Action::ScrollToTop => {
            state.ui_state.detail_scroll = 0;
        }

        Action::ShowError(msg) => {
            state.show_error(msg);
        }
        Action::DismissError => {
            state.dismiss_error();
        }
        Action::Render => {}
    }
}

fn handle_list_select(state: &mut AppState, internal_tx: &mpsc::UnboundedSender<InternalAction>) {
    match state.current_screen {
        Screen::Overview => {
            if let Some(view) = state.selected_view() {
                request_view(state, internal_tx, view);
            }
        }
        Screen::ResourceList | Screen::SearchResults => {
            if let Some(record) = state.selected_record() {
                let kind = record.kind;
                let name = record.name.clone();
                let namespace = kind.is_namespaced().then(|| record.namespace.clone());
                request_detail(state, internal_tx, kind, namespace, name);
            }
        }
        Screen::Detail => {}
    }
}

fn request_view(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    view: View,
) {
    state.ui_state.loading = Some(view.title().to_string());
    let _ = internal_tx.send(InternalAction::LoadView(view));
}

fn request_detail(
    state: &mut AppState,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    kind: Kind,
    namespace: Option<String>,
    name: String,
) {
    state.ui_state.loading = Some(format!("{} {}", kind, name));
    let _ = internal_tx.send(InternalAction::LoadDetail(kind, namespace, name));
}

/// Reload whatever the current screen shows
fn refresh(state: &mut AppState, internal_tx: &mpsc::UnboundedSender<InternalAction>) {
    match state.current_screen {
        Screen::Overview => {
            state.ui_state.loading = Some("cluster summary".to_string());
            let _ = internal_tx.send(InternalAction::LoadSummary);
        }
        Screen::ResourceList => {
            if let Some(view) = state.current_view {
                request_view(state, internal_tx, view);
            }
        }
        Screen::SearchResults => {
            if !state.search_query.is_empty() {
                state.ui_state.loading = Some(format!("search \"{}\"", state.search_query));
                let _ = internal_tx.send(InternalAction::Search(state.search_query.clone()));
            }
        }
        Screen::Detail => {
            if let Some(page) = &state.detail {
                let record = &page.detail.record;
                let kind = record.kind;
                let name = record.name.clone();
                let namespace = kind.is_namespaced().then(|| record.namespace.clone());
                request_detail(state, internal_tx, kind, namespace, name);
            }
        }
    }
}

/// Run loads on spawned tasks and apply their results to the state
fn handle_internal(
    state: &mut AppState,
    dashboard: &SharedDashboard,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    internal: InternalAction,
) {
    match internal {
        InternalAction::LoadSummary => {
            spawn_load(dashboard, internal_tx, |dashboard| async move {
                InternalAction::SummaryLoaded(dashboard.summarize().await)
            });
        }

        InternalAction::LoadView(view) => {
            let namespace = state.namespace.clone();
            spawn_load(dashboard, internal_tx, move |dashboard| async move {
                let namespace = namespace.as_deref();
                let listing = match view {
                    View::Resources(kind) => {
                        Listing::Records(dashboard.fetch_view(kind, namespace).await)
                    }
                    View::VolumeBindings => {
                        Listing::Bindings(dashboard.fetch_volume_bindings(namespace).await)
                    }
                    View::TopNodes => Listing::Usage(dashboard.top_nodes().await),
                    View::TopPods => Listing::Usage(dashboard.top_pods(namespace).await),
                };
                InternalAction::ViewLoaded(view, listing)
            });
        }

        InternalAction::Search(query) => {
            spawn_load(dashboard, internal_tx, move |dashboard| async move {
                let results = dashboard.search(&query).await;
                InternalAction::SearchLoaded(query, results)
            });
        }

        InternalAction::LoadDetail(kind, namespace, name) => {
            spawn_load(dashboard, internal_tx, move |dashboard| async move {
                match dashboard.detail(kind, namespace.as_deref(), &name).await {
                    Ok(detail) => {
                        let events = match (kind, namespace.as_deref()) {
                            (Kind::Pod, Some(ns)) => dashboard.fetch_pod_events(ns, &name).await,
                            _ => Vec::new(),
                        };
                        InternalAction::DetailLoaded(DetailPage { detail, events })
                    }
                    Err(e) => InternalAction::Error(e.to_string()),
                }
            });
        }

        InternalAction::SummaryLoaded(summary) => {
            state.ui_state.loading = None;
            state.summary = Some(summary);
        }

        InternalAction::ViewLoaded(view, listing) => {
            state.ui_state.loading = None;
            debug!(view = view.title(), rows = listing.len(), "view loaded");
            if state.current_screen != Screen::ResourceList || state.current_view != Some(view) {
                state.navigate_to(Screen::ResourceList);
            }
            state.set_listing(view, listing);
        }

        InternalAction::SearchLoaded(query, results) => {
            state.ui_state.loading = None;
            state.navigate_to(Screen::SearchResults);
            state.set_search_results(query, results);
        }

        InternalAction::DetailLoaded(page) => {
            state.ui_state.loading = None;
            let same_page = state.current_screen == Screen::Detail
                && state
                    .detail
                    .as_ref()
                    .is_some_and(|d| d.detail.record.name == page.detail.record.name);
            if !same_page {
                state.navigate_to(Screen::Detail);
            }
            state.detail = Some(page);
        }

        InternalAction::Error(msg) => {
            state.ui_state.loading = None;
            state.show_error(msg);
        }
    }
}

fn spawn_load<F, Fut>(
    dashboard: &SharedDashboard,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    load: F,
) where
    F: FnOnce(SharedDashboard) -> Fut,
    Fut: Future<Output = InternalAction> + Send + 'static,
{
    let tx = internal_tx.clone();
    let task = load(Arc::clone(dashboard));
    tokio::spawn(async move {
        let _ = tx.send(task.await);
    });
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.terminal().draw(|frame| kubedash_tui::render(frame, state))?;
    state.render_dirty = false;
    Ok(())
}
