//! Palette session: async loads, section recomputation, key dispatch, command execution.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::actions::{Action, HostRequest};
use crate::aliases::{AliasDraft, AliasStore, StoredAliases};
use crate::builds::{search_pipelines, Build, BuildSource, Pipeline};
use crate::commands::{builtin_registry, Command, CommandMatcher, CommandRegistry, ScoredMatch};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::AliasError;
use crate::events::{key_to_action, key_to_press};
use crate::logging::report_error;
use crate::nav::{scroll_into_view, Key, KeyPress, KeyboardNav, NavHandlers, Section};
use crate::prefs::{Preferences, RecentCommand};
use crate::state::{CommandItem, PaletteItem, PaletteState, SectionKind, SectionView};
use crate::store::KeyValueStore;

const RECENT_BUILDS: usize = 20;
const DEFAULT_VIEWPORT_ROWS: usize = 12;

/// Result of one background load, delivered to the UI thread.
#[derive(Debug)]
pub enum LoadResult {
    FavoriteCommands(Result<Vec<String>>),
    Recents(Result<Vec<RecentCommand>>),
    Pipelines(Result<Vec<Pipeline>>),
    FavoritePipelines(Result<Vec<String>>),
    Builds { pipeline: String, result: Result<Vec<Build>> },
    BuildCreated { pipeline: String, result: Result<Build> },
}

/// What a key press asked the palette to do, applied after navigation returns.
enum NavOutcome {
    Activate(PaletteItem),
    Close,
    Backspace { input_was_empty: bool },
    ToggleFavorite,
}

pub struct App {
    pub state: PaletteState,
    pub should_quit: bool,
    /// For spinner animation (incremented each tick).
    pub tick: usize,
    viewport_rows: usize,
    org: Option<String>,
    registry: CommandRegistry,
    prefs: Arc<Preferences<dyn KeyValueStore>>,
    aliases: StoredAliases<dyn KeyValueStore>,
    source: Option<Arc<dyn BuildSource>>,
    debouncer: Debouncer<String>,
    runtime: Runtime,
    loads_tx: UnboundedSender<LoadResult>,
    loads_rx: UnboundedReceiver<LoadResult>,
    requests_rx: UnboundedReceiver<HostRequest>,
}

impl App {
    pub fn new(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        source: Option<Arc<dyn BuildSource>>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("bk-palette-load")
            .enable_all()
            .build()
            .context("starting background runtime")?;
        let (loads_tx, loads_rx) = unbounded_channel();
        let (requests_tx, requests_rx) = unbounded_channel();

        let state = PaletteState {
            nav: KeyboardNav::new(config.initial_index, config.digit_modifier),
            ..Default::default()
        };

        Ok(Self {
            state,
            should_quit: false,
            tick: 0,
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
            org: config.buildkite.as_ref().map(|b| b.org.clone()),
            registry: builtin_registry(requests_tx, source.is_some()),
            prefs: Arc::new(Preferences::new(Arc::clone(&store), config.max_recents)),
            aliases: StoredAliases::new(store),
            source,
            debouncer: Debouncer::new(config.debounce),
            runtime,
            loads_tx,
            loads_rx,
            requests_rx,
        })
    }

    /// Kick off the initial loads; favorites, recents and pipelines run concurrently.
    pub fn bootstrap(&mut self) {
        info!(commands = self.registry.len(), source = self.source.is_some(), "palette starting");
        self.reload_aliases();
        self.load_favorites();
        self.load_recents();
        self.load_pipelines();
        if self.source.is_none() {
            self.state.status =
                Some("Set BUILDKITE_ORG and BUILDKITE_API_TOKEN for pipelines".to_string());
        }
        self.recompute();
    }

    /// Configured Buildkite organization, if any.
    pub fn org(&self) -> Option<&str> {
        self.org.as_deref()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            self.sync_scroll();
        }
    }

    fn spawn_load(&self, load: impl FnOnce() -> LoadResult + Send + 'static) {
        let tx = self.loads_tx.clone();
        self.runtime.spawn_blocking(move || {
            // The receiver only goes away on shutdown.
            let _ = tx.send(load());
        });
    }

    fn load_favorites(&mut self) {
        self.state.loading.favorites = true;
        let prefs = Arc::clone(&self.prefs);
        self.spawn_load(move || LoadResult::FavoriteCommands(prefs.favorite_commands()));
    }

    fn load_recents(&mut self) {
        self.state.loading.recents = true;
        let prefs = Arc::clone(&self.prefs);
        self.spawn_load(move || LoadResult::Recents(prefs.recent_commands()));
    }

    fn load_pipelines(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        self.state.loading.pipelines = true;
        self.spawn_load(move || LoadResult::Pipelines(source.pipelines()));
        let prefs = Arc::clone(&self.prefs);
        self.spawn_load(move || LoadResult::FavoritePipelines(prefs.favorite_pipelines()));
    }

    fn load_builds(&mut self, pipeline: String) {
        let Some(source) = self.source.clone() else {
            return;
        };
        self.state.loading.builds = true;
        self.spawn_load(move || {
            let result = source.recent_builds(&pipeline, RECENT_BUILDS);
            LoadResult::Builds { pipeline, result }
        });
    }

    fn reload_aliases(&mut self) {
        match self.aliases.aliases() {
            Ok(aliases) => self.state.aliases = aliases,
            Err(e) => self.report("loading aliases", &e),
        }
    }

    fn report(&mut self, context: &str, err: &anyhow::Error) {
        report_error(context, err);
        self.state.status = Some(format!("Error {context}: {err}"));
    }

    /// Drain finished loads and the debounced input. Called once per tick.
    pub fn poll_results(&mut self, now: Instant) {
        let mut changed = false;
        while let Ok(result) = self.loads_rx.try_recv() {
            self.apply_load(result);
            changed = true;
        }
        if let Some(query) = self.debouncer.poll(now) {
            self.apply_query(query);
            changed = true;
        }
        if changed {
            self.recompute();
        }
    }

    fn apply_query(&mut self, query: String) {
        debug!(%query, "input settled");
        self.state.query = query;
        self.state.builds = None;
        self.state.nav.reset();
    }

    /// Search the typed text now instead of waiting out the debounce.
    fn settle_input(&mut self) {
        if let Some(query) = self.debouncer.flush() {
            self.apply_query(query);
            self.recompute();
        }
    }

    pub(crate) fn apply_load(&mut self, result: LoadResult) {
        match result {
            LoadResult::FavoriteCommands(result) => {
                self.state.loading.favorites = false;
                match result {
                    Ok(ids) => self.state.favorite_commands = ids,
                    Err(e) => self.report("loading favorites", &e),
                }
            }
            LoadResult::Recents(result) => {
                self.state.loading.recents = false;
                match result {
                    Ok(recents) => self.state.recents = recents,
                    Err(e) => self.report("loading recent commands", &e),
                }
            }
            LoadResult::Pipelines(result) => {
                self.state.loading.pipelines = false;
                match result {
                    Ok(pipelines) => {
                        info!(count = pipelines.len(), "pipelines loaded");
                        self.state.pipelines = pipelines;
                        self.refresh_pipeline_favorites();
                    }
                    Err(e) => self.report("loading pipelines", &e),
                }
            }
            LoadResult::FavoritePipelines(result) => match result {
                Ok(_) => self.refresh_pipeline_favorites(),
                Err(e) => self.report("loading favorite pipelines", &e),
            },
            LoadResult::Builds { pipeline, result } => {
                self.state.loading.builds = false;
                match result {
                    Ok(builds) => {
                        self.state.status = Some(format!("{} builds for {pipeline}", builds.len()));
                        self.state.builds = Some((pipeline, builds));
                        self.state.nav.reset();
                    }
                    Err(e) => self.report(&format!("loading builds for {pipeline}"), &e),
                }
            }
            LoadResult::BuildCreated { pipeline, result } => match result {
                Ok(build) => {
                    info!(%pipeline, number = build.number, "build created");
                    self.state.status =
                        Some(format!("Created {pipeline} #{} ({})", build.number, build.status));
                }
                Err(e) => self.report(&format!("creating build for {pipeline}"), &e),
            },
        }
        self.recompute();
    }

    fn refresh_pipeline_favorites(&mut self) {
        let ids = self.state.pipelines.iter().map(|p| p.slug.as_str());
        match self.prefs.pipeline_favorite_lookup(ids) {
            Ok(lookup) => self.state.pipeline_favorites = lookup,
            Err(e) => self.report("loading favorite pipelines", &e),
        }
    }

    fn command_item(&self, hit: &ScoredMatch<'_, Command>, uses: Option<u32>) -> PaletteItem {
        PaletteItem::Command(CommandItem {
            id: hit.item.id.clone(),
            name: hit.item.name.clone(),
            description: hit.item.description.clone(),
            params: hit.params.clone(),
            alias: hit.alias.clone(),
            uses,
            favorite: self.state.favorite_commands.contains(&hit.item.id),
        })
    }

    fn registered_item(&self, id: &str, uses: Option<u32>) -> Option<PaletteItem> {
        let command = self.registry.get(id).filter(|c| c.is_available())?;
        let hit = ScoredMatch {
            item: command,
            score: 0,
            alias: None,
            params: None,
        };
        Some(self.command_item(&hit, uses))
    }

    /// Rebuild the sections from the settled query and loaded data.
    pub fn recompute(&mut self) {
        let query = self.state.query.trim().to_string();
        let mut sections = Vec::new();

        if let Some((pipeline, builds)) = &self.state.builds {
            sections.push(SectionView {
                kind: SectionKind::Builds,
                items: builds
                    .iter()
                    .map(|build| PaletteItem::Build {
                        pipeline: pipeline.clone(),
                        build: build.clone(),
                    })
                    .collect(),
            });
        }

        let matcher = CommandMatcher::new(&self.registry, &self.state.aliases);
        let commands: Vec<PaletteItem> = matcher
            .search(&query)
            .iter()
            .map(|hit| self.command_item(hit, None))
            .collect();

        if query.is_empty() {
            let favorites = self
                .state
                .favorite_commands
                .iter()
                .filter_map(|id| self.registered_item(id, None))
                .collect();
            let recents = self
                .state
                .recents
                .iter()
                .filter_map(|r| self.registered_item(&r.command_id, Some(r.count)))
                .collect();
            sections.push(SectionView {
                kind: SectionKind::Favorites,
                items: favorites,
            });
            sections.push(SectionView {
                kind: SectionKind::Recents,
                items: recents,
            });
            sections.push(SectionView {
                kind: SectionKind::Commands,
                items: commands,
            });
        } else {
            sections.push(SectionView {
                kind: SectionKind::Commands,
                items: commands,
            });
            if !query.starts_with('/') {
                let pipelines = search_pipelines(&self.state.pipelines, &query)
                    .into_iter()
                    .map(|hit| PaletteItem::Pipeline {
                        pipeline: hit.item.clone(),
                        favorite: self
                            .state
                            .pipeline_favorites
                            .get(&hit.item.slug)
                            .copied()
                            .unwrap_or(false),
                    })
                    .collect();
                sections.push(SectionView {
                    kind: SectionKind::Pipelines,
                    items: pipelines,
                });
            }
        }

        self.state.sections = sections;
        let total = self.state.total_items();
        self.state.nav.clamp(total);
        debug!(%query, total, "sections recomputed");
        self.sync_scroll();
    }

    fn sync_scroll(&mut self) {
        let total = self.state.total_items();
        match self.state.nav.state().selection(total) {
            Some(selected) => {
                let row = self.state.row_of(selected);
                let scroll = scroll_into_view(self.state.scroll, self.viewport_rows, row);
                // Keep the header in view when the first item of a section is selected.
                self.state.scroll = match self.state.section_header_row(selected) {
                    Some(header) if self.viewport_rows > 1 => {
                        scroll_into_view(scroll, self.viewport_rows, header)
                    }
                    _ => scroll,
                };
            }
            None => self.state.scroll = 0,
        }
    }

    pub fn on_key(&mut self, event: &KeyEvent) {
        if self.state.visible {
            if let Some(press) = key_to_press(event) {
                if self.handle_nav(press) {
                    return;
                }
            }
        }
        if let Some(action) = key_to_action(event, self.state.visible) {
            self.dispatch(action);
        }
    }

    /// Route a key through the navigation core. Returns whether it was consumed.
    pub fn handle_nav(&mut self, press: KeyPress) -> bool {
        let activates = match press.key {
            Key::Enter => true,
            Key::Digit(_) => press.modifiers.alt || press.modifiers.ctrl,
            _ => false,
        };
        if activates {
            self.settle_input();
        }

        let outcome: RefCell<Option<NavOutcome>> = RefCell::new(None);
        let input_is_empty = self.state.input.is_empty();

        let handled = {
            let record = |o: NavOutcome| *outcome.borrow_mut() = Some(o);
            let mut sections: Vec<Section<'_, PaletteItem>> = self
                .state
                .sections
                .iter()
                .map(|view| {
                    let section = Section::new(view.kind.id(), view.items.as_slice());
                    match view.kind {
                        // Commands fall through to the global handler.
                        SectionKind::Commands => section,
                        _ => section.on_select(move |item: &PaletteItem| {
                            record(NavOutcome::Activate(item.clone()))
                        }),
                    }
                })
                .collect();
            let mut handlers = NavHandlers::new()
                .on_select(|item: &PaletteItem, _section: &str| {
                    record(NavOutcome::Activate(item.clone()))
                })
                .on_escape(|| record(NavOutcome::Close))
                .on_backspace(|input_was_empty| record(NavOutcome::Backspace { input_was_empty }))
                .input_probe(move || input_is_empty)
                .custom(Key::Char('f'), |press: KeyPress| {
                    if press.modifiers.ctrl {
                        record(NavOutcome::ToggleFavorite);
                        true
                    } else {
                        false
                    }
                });

            self.state.nav.handle_key(press, &mut sections, &mut handlers)
        };

        match outcome.into_inner() {
            Some(NavOutcome::Activate(item)) => self.activate(item),
            Some(NavOutcome::Close) => self.hide(),
            Some(NavOutcome::Backspace { input_was_empty: true }) => self.hide(),
            Some(NavOutcome::Backspace { input_was_empty: false }) => self.edit(Action::Backspace),
            Some(NavOutcome::ToggleFavorite) => self.toggle_selected_favorite(),
            None => self.sync_scroll(),
        }
        handled
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::PaletteShow => self.show(),
            Action::PaletteHide => self.hide(),
            edit => self.edit(edit),
        }
    }

    fn edit(&mut self, action: Action) {
        let input = &mut self.state.input;
        let pos = self.state.cursor.min(input.len());
        match action {
            Action::Char(c) => {
                input.insert(pos, c);
                self.state.cursor = pos + c.len_utf8();
            }
            Action::Backspace => {
                if let Some(prev) = input[..pos].chars().next_back() {
                    let at = pos - prev.len_utf8();
                    input.remove(at);
                    self.state.cursor = at;
                }
            }
            Action::ClearInput => {
                input.clear();
                self.state.cursor = 0;
            }
            Action::CursorLeft => {
                if let Some(prev) = input[..pos].chars().next_back() {
                    self.state.cursor = pos - prev.len_utf8();
                }
                return;
            }
            Action::CursorRight => {
                if let Some(next) = input[pos..].chars().next() {
                    self.state.cursor = pos + next.len_utf8();
                }
                return;
            }
            Action::Quit | Action::PaletteShow | Action::PaletteHide => return,
        }
        self.debouncer.push(self.state.input.clone(), Instant::now());
    }

    /// Replace the input and search it right away.
    pub fn set_input(&mut self, text: String) {
        self.state.cursor = text.len();
        self.state.input = text.clone();
        self.debouncer.cancel();
        self.state.query = text;
        self.state.builds = None;
        self.state.nav.reset();
        self.recompute();
    }

    pub fn show(&mut self) {
        info!("palette opened");
        self.state.visible = true;
        self.state.status = None;
        self.set_input(String::new());
    }

    pub fn hide(&mut self) {
        info!("palette closed");
        self.state.visible = false;
        self.set_input(String::new());
    }

    fn activate(&mut self, item: PaletteItem) {
        match item {
            PaletteItem::Command(command) => self.run_command(&command.id, command.params),
            PaletteItem::Pipeline { pipeline, .. } => self.open_pipeline(&pipeline.slug),
            PaletteItem::Build { pipeline, build } => {
                let url = build.web_url.unwrap_or_else(|| format!("{pipeline} #{}", build.number));
                self.state.status = Some(format!("Open {url}"));
            }
        }
    }

    /// Execute a registered command with resolved parameters.
    pub fn run_command(&mut self, id: &str, params: Option<String>) {
        let Some(command) = self.registry.get(id) else {
            self.state.status = Some(format!("Unknown command {id}"));
            return;
        };
        let name = command.name.clone();

        if let (None, Some(hint)) = (&params, command.param_hint.clone()) {
            debug!(command = %id, %hint, "prompting for parameters");
            self.set_input(format!("/{id} "));
            self.state.status = Some(format!("{name} {hint}"));
            return;
        }

        match command.execute(params.as_deref()) {
            Ok(()) => {
                info!(command = %id, params = ?params, "command executed");
                if let Err(e) = self.prefs.record_command_use(id) {
                    self.report("recording command use", &e);
                }
                self.load_recents();
                self.set_input(String::new());
                self.state.status = Some(format!("Ran {name}"));
                self.drain_requests();
            }
            Err(e) => {
                report_error(&format!("running {id}"), &e);
                self.state.status = Some(format!("{name}: {e}"));
            }
        }
    }

    fn drain_requests(&mut self) {
        while let Ok(request) = self.requests_rx.try_recv() {
            self.handle_request(request);
        }
    }

    fn handle_request(&mut self, request: HostRequest) {
        debug!(?request, "host request");
        match request {
            HostRequest::OpenPipeline(slug) => self.open_pipeline(&slug),
            HostRequest::ShowBuilds(slug) => {
                self.state.status = Some(format!("Loading builds for {slug}…"));
                self.load_builds(slug);
            }
            HostRequest::CreateBuild { pipeline, branch } => {
                let Some(source) = self.source.clone() else {
                    return;
                };
                self.state.status = Some(format!("Creating build for {pipeline} on {branch}…"));
                self.spawn_load(move || {
                    let result = source.create_build(&pipeline, &branch);
                    LoadResult::BuildCreated { pipeline, result }
                });
            }
            HostRequest::ToggleFavoritePipeline(slug) => self.toggle_pipeline_favorite(&slug),
            HostRequest::ToggleFavoriteCommand(id) => self.toggle_command_favorite(&id),
            HostRequest::CreateAlias(definition) => self.create_alias(&definition),
            HostRequest::DeleteAlias(name) => self.delete_alias(&name),
            HostRequest::ReloadPipelines => self.load_pipelines(),
            HostRequest::Close => self.hide(),
        }
        self.recompute();
    }

    fn open_pipeline(&mut self, slug: &str) {
        let url = match &self.source {
            Some(source) => source.pipeline_url(slug),
            None => slug.to_string(),
        };
        info!(%url, "open pipeline");
        self.state.status = Some(format!("Open {url}"));
    }

    fn toggle_selected_favorite(&mut self) {
        match self.state.selected_item().cloned() {
            Some(PaletteItem::Command(command)) => self.toggle_command_favorite(&command.id),
            Some(PaletteItem::Pipeline { pipeline, .. }) => {
                self.toggle_pipeline_favorite(&pipeline.slug)
            }
            Some(PaletteItem::Build { .. }) | None => {}
        }
        self.recompute();
    }

    fn toggle_command_favorite(&mut self, id: &str) {
        if self.registry.get(id).is_none() {
            self.state.status = Some(format!("Unknown command {id}"));
            return;
        }
        match self.prefs.toggle_favorite_command(id) {
            Ok(favorite) => {
                let label = if favorite { "starred" } else { "unstarred" };
                self.state.status = Some(format!("{id} {label}"));
                self.load_favorites();
            }
            Err(e) => self.report("saving favorite", &e),
        }
    }

    fn toggle_pipeline_favorite(&mut self, slug: &str) {
        match self.prefs.toggle_favorite_pipeline(slug) {
            Ok(favorite) => {
                self.state.pipeline_favorites.insert(slug.to_string(), favorite);
                let label = if favorite { "starred" } else { "unstarred" };
                self.state.status = Some(format!("{slug} {label}"));
            }
            Err(e) => self.report("saving favorite pipeline", &e),
        }
    }

    /// Validation failures are shown to the user; store failures are reported.
    pub fn create_alias(&mut self, definition: &str) {
        let draft = AliasDraft::parse(definition);
        match draft.validate(&self.state.aliases, &self.registry) {
            Ok(alias) => {
                let name = alias.name.clone();
                match self.aliases.set_alias(alias) {
                    Ok(()) => {
                        info!(alias = %name, "alias created");
                        self.state.status = Some(format!("Alias /{name} created"));
                        self.reload_aliases();
                    }
                    Err(e) => self.report("saving alias", &e),
                }
            }
            Err(invalid) => self.state.status = Some(invalid.to_string()),
        }
    }

    pub fn delete_alias(&mut self, name: &str) {
        let Some(alias) = self.state.aliases.iter().find(|a| a.is_named(name)).cloned() else {
            self.state.status = Some(AliasError::NotFound(name.to_string()).to_string());
            return;
        };
        match self.aliases.delete_alias(&alias.id) {
            Ok(()) => {
                self.state.status = Some(format!("Alias /{} deleted", alias.name));
                self.reload_aliases();
            }
            Err(e) => self.report("deleting alias", &e),
        }
    }
}
