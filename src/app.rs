use std::cell::Cell;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::cache::Cache;
use crate::catalog::Catalog;
use crate::error::DexError;
use crate::event::Event;
use crate::history::History;
use crate::location::{Location, Route};
use crate::pagination::{self, ListKey, PageState, PER_PAGE_OPTIONS};
use crate::query::Query;
use crate::types::{ListItem, ListResult, Pokemon, RelatedLink};

/// Digits accepted by the go-to-page input
const MAX_PAGE_INPUT: usize = 6;
const SCROLL_PAGE: usize = 10;

/// What keystrokes currently go to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    PageInput(String),
    Search(String),
    /// Per-page popup, holding the highlighted option index
    PageSizeSelect(usize),
}

pub struct App {
    pub history: History,

    // List view
    pub page: PageState,
    pub list: Query<ListKey, ListResult>,
    pub list_index: usize,

    // Detail view
    pub detail: Query<u32, Pokemon>,
    pub link_index: usize,
    pub scroll_offset: usize,
    pub show_shiny: bool,
    /// Furthest the profile can scroll, as of the last draw
    detail_max_scroll: Cell<usize>,

    pub input: InputMode,
    /// Name lookup whose result is still wanted
    pub pending_search: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub should_quit: bool,

    list_cache: Cache<ListKey, ListResult>,
    detail_cache: Cache<u32, Pokemon>,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        location: Location,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            history: History::new(location),
            page: PageState::default(),
            list: Query::default(),
            list_index: 0,
            detail: Query::default(),
            link_index: 0,
            scroll_offset: 0,
            show_shiny: false,
            detail_max_scroll: Cell::new(usize::MAX),
            input: InputMode::Normal,
            pending_search: None,
            error: None,
            notice: None,
            should_quit: false,
            list_cache: Cache::default(),
            detail_cache: Cache::default(),
            catalog,
            action_tx,
        }
    }

    pub fn location(&self) -> &Location {
        self.history.current()
    }

    pub fn route(&self) -> Route {
        self.location().route()
    }

    /// Page count of the loaded list; None until a page has loaded
    pub fn total_pages(&self) -> Option<u32> {
        self.list
            .data()
            .map(|result| pagination::total_pages(result.total, self.page.page_size))
    }

    /// Pagination controls need a page count, so they only exist once a
    /// page has loaded.
    pub fn controls_visible(&self) -> bool {
        self.route() == Route::List && self.list.data().is_some()
    }

    /// The per-page selector stays usable after a failed load, only a
    /// pending one hides it.
    pub fn page_size_select_visible(&self) -> bool {
        self.route() == Route::List && !self.list.is_loading()
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.list.data()?.items.get(self.list_index)
    }

    pub fn related_links(&self) -> Vec<RelatedLink> {
        self.detail
            .data()
            .map(Pokemon::related_links)
            .unwrap_or_default()
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadLocation,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        match &self.input {
            InputMode::PageInput(_) => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => Action::PageInput(c),
                KeyCode::Backspace => Action::PageInputBackspace,
                KeyCode::Enter => Action::PageInputConfirm,
                KeyCode::Esc => Action::CancelInput,
                _ => Action::None,
            },
            InputMode::Search(_) => match key.code {
                KeyCode::Char(c) => Action::SearchInput(c),
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Enter => Action::SearchConfirm,
                KeyCode::Esc => Action::CancelInput,
                _ => Action::None,
            },
            InputMode::PageSizeSelect(_) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Action::PopupDown,
                KeyCode::Char('k') | KeyCode::Up => Action::PopupUp,
                KeyCode::Enter => Action::PopupSelect,
                KeyCode::Esc | KeyCode::Char('q') => Action::CancelInput,
                _ => Action::None,
            },
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankLocation,
            _ => match self.route() {
                Route::List => self.handle_list_key(key),
                Route::Detail(_) => match key.code {
                    KeyCode::Char('s') => Action::ToggleShiny,
                    KeyCode::Char('b') => Action::FollowBackLink,
                    _ => Action::None,
                },
            },
        }
    }

    fn handle_list_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
            KeyCode::Char('g') | KeyCode::Home => Action::FirstPage,
            KeyCode::Char('G') | KeyCode::End => Action::LastPage,
            KeyCode::Char(':') => Action::EnterPageInput,
            KeyCode::Char('s') => Action::ShowPageSizeSelect,
            KeyCode::Char('+') | KeyCode::Char('=') => Action::ChangePageSize(
                pagination::step_page_size(&PER_PAGE_OPTIONS, self.page.page_size, true),
            ),
            KeyCode::Char('-') => Action::ChangePageSize(pagination::step_page_size(
                &PER_PAGE_OPTIONS,
                self.page.page_size,
                false,
            )),
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if !action.is_fetch_result() && !matches!(action, Action::None) {
            self.error = None;
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => {
                if self.history.back() {
                    self.load_location();
                } else if let Route::Detail(_) = self.route() {
                    // Opened straight on a record: fall back to its list page
                    let back = self.location().back_link();
                    self.history.replace(back);
                    self.load_location();
                } else {
                    self.should_quit = true;
                }
            }
            Action::ScrollUp => match self.route() {
                Route::List => {
                    self.list_index = self.list_index.saturating_sub(1);
                }
                Route::Detail(_) => {
                    if self.related_links().is_empty() {
                        self.scroll_offset = self.scroll_offset.saturating_sub(1);
                    } else {
                        self.link_index = self.link_index.saturating_sub(1);
                    }
                }
            },
            Action::ScrollDown => match self.route() {
                Route::List => {
                    let len = self.list.data().map_or(0, |r| r.items.len());
                    if len > 0 && self.list_index < len - 1 {
                        self.list_index += 1;
                    }
                }
                Route::Detail(_) => {
                    let links = self.related_links().len();
                    if links == 0 {
                        self.scroll_detail_by(1);
                    } else if self.link_index < links - 1 {
                        self.link_index += 1;
                    }
                }
            },
            Action::PageUp => match self.route() {
                Route::List => {
                    self.list_index = self.list_index.saturating_sub(SCROLL_PAGE);
                }
                Route::Detail(_) => {
                    self.scroll_offset = self.scroll_offset.saturating_sub(SCROLL_PAGE);
                }
            },
            Action::PageDown => match self.route() {
                Route::List => {
                    let len = self.list.data().map_or(0, |r| r.items.len());
                    self.list_index = (self.list_index + SCROLL_PAGE).min(len.saturating_sub(1));
                }
                Route::Detail(_) => {
                    self.scroll_detail_by(SCROLL_PAGE);
                }
            },
            Action::Select => match self.route() {
                Route::List => {
                    if let Some(item) = self.selected_item() {
                        let link = self.location().detail_link(item.id);
                        self.navigate(link);
                    }
                }
                Route::Detail(_) => {
                    if let Some(link) = self.related_links().get(self.link_index) {
                        let target = self.location().detail_link(link.id);
                        self.navigate(target);
                    }
                }
            },

            // Navigation
            Action::LoadLocation => self.load_location(),
            Action::FollowBackLink => {
                if let Route::Detail(_) = self.route() {
                    let back = self.location().back_link();
                    self.navigate(back);
                }
            }

            // Pagination
            Action::NextPage => {
                if let Some(total) = self.total_pages() {
                    self.apply_page(self.page.next(total));
                }
            }
            Action::PrevPage => {
                if let Some(total) = self.total_pages() {
                    self.apply_page(self.page.previous(total));
                }
            }
            Action::FirstPage => {
                if let Some(total) = self.total_pages() {
                    self.apply_page(self.page.first(total));
                }
            }
            Action::LastPage => {
                if let Some(total) = self.total_pages() {
                    self.apply_page(self.page.last(total));
                }
            }
            Action::ChangePageSize(size) => {
                if self.page_size_select_visible() {
                    self.apply_page(self.page.change_page_size(size));
                }
            }

            // Go-to-page input
            Action::EnterPageInput => {
                if self.controls_visible() {
                    self.input = InputMode::PageInput(self.page.page.to_string());
                }
            }
            Action::PageInput(c) => {
                if let InputMode::PageInput(buf) = &mut self.input {
                    if c.is_ascii_digit() && buf.len() < MAX_PAGE_INPUT {
                        buf.push(c);
                    }
                }
            }
            Action::PageInputBackspace => {
                if let InputMode::PageInput(buf) = &mut self.input {
                    buf.pop();
                }
            }
            Action::PageInputConfirm => {
                if let InputMode::PageInput(buf) = std::mem::take(&mut self.input) {
                    if let Some(total) = self.total_pages() {
                        // empty or zero input lands on page 1 via the clamp
                        let target = buf.parse::<u32>().unwrap_or(0);
                        let next = self.page.go_to(target, total);
                        if next != self.page {
                            self.apply_page(next);
                        }
                    }
                }
            }

            // Per-page selector
            Action::ShowPageSizeSelect => {
                if self.page_size_select_visible() {
                    let selected = PER_PAGE_OPTIONS
                        .iter()
                        .position(|size| *size == self.page.page_size)
                        .unwrap_or(0);
                    self.input = InputMode::PageSizeSelect(selected);
                }
            }
            Action::PopupUp => {
                if let InputMode::PageSizeSelect(selected) = &mut self.input {
                    *selected = selected.saturating_sub(1);
                }
            }
            Action::PopupDown => {
                if let InputMode::PageSizeSelect(selected) = &mut self.input {
                    if *selected < PER_PAGE_OPTIONS.len() - 1 {
                        *selected += 1;
                    }
                }
            }
            Action::PopupSelect => {
                if let InputMode::PageSizeSelect(selected) = std::mem::take(&mut self.input) {
                    if let Some(size) = PER_PAGE_OPTIONS.get(selected) {
                        self.apply_page(self.page.change_page_size(*size));
                    }
                }
            }

            // Search
            Action::EnterSearchMode => {
                self.input = InputMode::Search(String::new());
            }
            Action::SearchInput(c) => {
                if let InputMode::Search(buf) = &mut self.input {
                    buf.push(c);
                }
            }
            Action::SearchBackspace => {
                if let InputMode::Search(buf) = &mut self.input {
                    buf.pop();
                }
            }
            Action::SearchConfirm => {
                if let InputMode::Search(buf) = std::mem::take(&mut self.input) {
                    let name = buf.trim();
                    if !name.is_empty() {
                        self.notice = Some(format!("Searching for {}...", name));
                        self.pending_search = Some(name.to_string());
                        self.spawn_resolve_name(name.to_string());
                    }
                }
            }
            Action::NameResolved(name, id) => {
                if self.pending_search.as_deref() == Some(name.as_str()) {
                    self.notice = None;
                    let link = self.location().detail_link(id);
                    self.navigate(link);
                } else {
                    tracing::debug!("Dropping stale lookup result for {}", name);
                }
            }
            Action::NameFailed(name, msg) => {
                if self.pending_search.as_deref() == Some(name.as_str()) {
                    self.pending_search = None;
                    self.notice = None;
                    self.error = Some(msg);
                } else {
                    tracing::debug!("Dropping stale lookup failure for {}", name);
                }
            }
            Action::CancelInput => {
                self.input = InputMode::Normal;
                self.pending_search = None;
            }

            // Detail
            Action::ToggleShiny => {
                if self.detail.data().is_some_and(Pokemon::has_shiny_artwork) {
                    self.show_shiny = !self.show_shiny;
                }
            }

            // Fetch results
            Action::ListLoaded(key, result) => {
                self.list_cache.insert(key, result.clone());
                if self.list.resolve(&key, Ok(result)) {
                    let len = self.list.data().map_or(0, |r| r.items.len());
                    self.list_index = self.list_index.min(len.saturating_sub(1));
                } else {
                    tracing::debug!("Dropping stale list result for {:?}", key);
                }
            }
            Action::ListFailed(key, msg) => {
                if !self.list.resolve(&key, Err(msg)) {
                    tracing::debug!("Dropping stale list failure for {:?}", key);
                }
            }
            Action::DetailLoaded(id, pokemon) => {
                let pokemon = *pokemon;
                self.detail_cache.insert(id, pokemon.clone());
                if !self.detail.resolve(&id, Ok(pokemon)) {
                    tracing::debug!("Dropping stale detail result for {}", id);
                }
            }
            Action::DetailFailed(id, msg) => {
                if !self.detail.resolve(&id, Err(msg)) {
                    tracing::debug!("Dropping stale detail failure for {}", id);
                }
            }

            Action::Refresh => match self.route() {
                Route::List => {
                    self.list_cache.remove(&self.page.list_key());
                    self.load_list();
                }
                Route::Detail(id) => {
                    self.detail_cache.remove(&id);
                    self.load_detail(id);
                }
            },
            Action::OpenInBrowser => {
                let url = match self.route() {
                    Route::List => self.selected_item().map(|item| item.image_url.clone()),
                    Route::Detail(_) => self
                        .detail
                        .data()
                        .and_then(|p| p.artwork(self.show_shiny))
                        .map(str::to_string),
                };
                if let Some(url) = url {
                    if let Err(e) = open::that(&url) {
                        self.error = Some(format!("Failed to open browser: {}", e));
                    }
                }
            }
            Action::YankLocation => {
                let text = self.location().to_string();
                match copy_to_clipboard(&text) {
                    Ok(()) => self.notice = Some(format!("Copied {}", text)),
                    Err(e) => self.update(Action::from(e)),
                }
            }

            Action::Error(msg) => {
                self.notice = None;
                self.error = Some(msg);
            }
            Action::None => {}
        }
    }

    /// Called by the renderer once it knows how many profile lines fit.
    pub fn set_detail_max_scroll(&self, max: usize) {
        self.detail_max_scroll.set(max);
    }

    fn scroll_detail_by(&mut self, lines: usize) {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add(lines)
            .min(self.detail_max_scroll.get());
    }

    /// Follow a link: new history entry, then load whatever it points at.
    fn navigate(&mut self, location: Location) {
        self.history.push(location);
        tracing::info!("navigate {} (history depth {})", self.location(), self.history.len());
        self.load_location();
    }

    /// Bring view state in line with the current location.
    fn load_location(&mut self) {
        self.input = InputMode::Normal;
        self.pending_search = None;

        match self.route() {
            Route::List => {
                let state = self.location().page_state(&PER_PAGE_OPTIONS);
                let synced = self.location().with_page_state(state);
                if &synced != self.location() {
                    self.history.replace(synced);
                }
                self.page = state;
                self.load_list();
            }
            Route::Detail(id) => {
                if self.detail.key() != Some(&id) {
                    self.show_shiny = false;
                    self.link_index = 0;
                    self.scroll_offset = 0;
                    self.detail_max_scroll.set(usize::MAX);
                }
                self.load_detail(id);
            }
        }
    }

    /// Move to `next` and write it to the location. Pagination replaces the
    /// current history entry rather than pushing.
    fn apply_page(&mut self, next: PageState) {
        self.pending_search = None;
        self.page = next;
        let synced = self.location().with_page_state(next);
        self.history.replace(synced);
        self.load_list();
    }

    fn load_list(&mut self) {
        let key = self.page.list_key();
        if self.list.key() != Some(&key) {
            self.list_index = 0;
        }

        if let Some(cached) = self.list_cache.get(&key) {
            tracing::debug!("list {:?} from cache ({} pages cached)", key, self.list_cache.len());
            self.list.ready(key, cached);
            return;
        }

        self.list.start(key);
        self.spawn_load_list(key);
    }

    fn load_detail(&mut self, id: u32) {
        if let Some(cached) = self.detail_cache.get(&id) {
            self.detail.ready(id, cached);
            return;
        }

        self.detail.start(id);
        self.spawn_load_detail(id);
    }

    fn spawn_load_list(&self, key: ListKey) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            match catalog.fetch_list(key.limit, key.offset).await {
                Ok(result) => {
                    tx.send(Action::ListLoaded(key, result)).ok();
                }
                Err(e) => {
                    tx.send(Action::ListFailed(key, e.to_string())).ok();
                }
            }
        });
    }

    fn spawn_load_detail(&self, id: u32) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            match catalog.fetch_with_variants(id).await {
                Ok(pokemon) => {
                    tx.send(Action::DetailLoaded(id, Box::new(pokemon))).ok();
                }
                Err(e) => {
                    tx.send(Action::DetailFailed(id, e.to_string())).ok();
                }
            }
        });
    }

    fn spawn_resolve_name(&self, name: String) {
        let tx = self.action_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tokio::spawn(async move {
            match catalog.fetch_by_name(&name).await {
                Ok(pokemon) => {
                    tx.send(Action::NameResolved(name, pokemon.id)).ok();
                }
                Err(e) => {
                    tx.send(Action::NameFailed(name, e.to_string())).ok();
                }
            }
        });
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), DexError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| DexError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| DexError::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::{FetchTarget, Result};
    use crate::query::LoadState;
    use crate::types::fixtures::{pikachu, pikachu_varieties};
    use crate::types::Species;

    const TOTAL: u32 = 1281;

    #[derive(Debug, Default)]
    struct FakeCatalog {
        fail_list: bool,
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn fetch_list(&self, limit: u32, offset: u32) -> Result<ListResult> {
            if self.fail_list {
                return Err(DexError::fetch(
                    FetchTarget::List { limit, offset },
                    "HTTP 500 Internal Server Error",
                ));
            }
            let end = (offset + limit).min(TOTAL);
            let items = (offset + 1..=end)
                .map(|id| ListItem {
                    id,
                    name: format!("pokemon-{}", id),
                    image_url: format!("https://img.test/{}.png", id),
                })
                .collect();
            Ok(ListResult {
                items,
                total: TOTAL,
                next: (end < TOTAL).then_some(offset + limit),
                previous: (offset > 0).then(|| offset.saturating_sub(limit)),
            })
        }

        async fn fetch_by_id(&self, id: u32) -> Result<Pokemon> {
            let mut pokemon = pikachu();
            pokemon.id = id;
            Ok(pokemon)
        }

        async fn fetch_by_name(&self, name: &str) -> Result<Pokemon> {
            if name.eq_ignore_ascii_case("pikachu") {
                Ok(pikachu())
            } else {
                Err(DexError::fetch(
                    FetchTarget::Name(name.to_string()),
                    "HTTP 404 Not Found",
                ))
            }
        }

        async fn fetch_species(&self, id: u32) -> Result<Species> {
            Ok(Species {
                id,
                name: "pikachu".to_string(),
                varieties: pikachu_varieties(),
            })
        }
    }

    fn app_with(catalog: FakeCatalog, location: &str) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Arc::new(catalog), Location::parse(location).unwrap(), tx);
        (app, rx)
    }

    fn app_at(location: &str) -> (App, mpsc::UnboundedReceiver<Action>) {
        app_with(FakeCatalog::default(), location)
    }

    /// Feed the next background result back into the app
    async fn settle(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        let action = rx.recv().await.unwrap();
        app.update(action);
    }

    async fn loaded_list(location: &str) -> (App, mpsc::UnboundedReceiver<Action>) {
        let (mut app, mut rx) = app_at(location);
        app.update(Action::LoadLocation);
        settle(&mut app, &mut rx).await;
        (app, rx)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn init_normalizes_location() {
        let (mut app, mut rx) = app_at("/?page=abc&perPage=24&theme=dark");
        let action = app.handle_event(Event::Init);
        app.update(action);

        assert_eq!(
            app.location().to_string(),
            "/?page=1&perPage=24&theme=dark"
        );
        assert_eq!(app.history.len(), 1);
        assert!(app.list.is_loading());
        assert!(!app.controls_visible());

        settle(&mut app, &mut rx).await;
        assert_eq!(app.list.data().unwrap().items.len(), 24);
        assert_eq!(app.total_pages(), Some(54));
    }

    #[tokio::test]
    async fn change_page_size_resets_to_first_page() {
        let (mut app, mut rx) = loaded_list("/?page=5&perPage=12").await;
        assert_eq!(app.page, PageState { page: 5, page_size: 12 });
        assert_eq!(app.selected_item().unwrap().id, 49);

        app.update(Action::ChangePageSize(24));
        assert_eq!(app.page, PageState { page: 1, page_size: 24 });
        assert_eq!(app.location().to_string(), "/?page=1&perPage=24");
        assert_eq!(app.history.len(), 1);

        settle(&mut app, &mut rx).await;
        assert_eq!(app.total_pages(), Some(54));
    }

    #[tokio::test]
    async fn page_size_keys_step_through_options() {
        let (app, _rx) = loaded_list("/?page=2&perPage=24").await;
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('+'))),
            Action::ChangePageSize(48)
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('-'))),
            Action::ChangePageSize(12)
        ));
    }

    #[tokio::test]
    async fn page_transitions_replace_location() {
        let (mut app, mut rx) = loaded_list("/?perPage=12").await;

        app.update(Action::NextPage);
        assert_eq!(app.location().to_string(), "/?perPage=12&page=2");
        settle(&mut app, &mut rx).await;

        app.update(Action::LastPage);
        assert_eq!(app.page.page, 107);
        settle(&mut app, &mut rx).await;
        assert_eq!(app.list.data().unwrap().items.len(), 9);

        app.update(Action::NextPage);
        assert_eq!(app.page.page, 107);

        app.update(Action::FirstPage);
        assert_eq!(app.page.page, 1);
        // page 1 was loaded before, so it comes straight from the cache
        assert!(app.list.data().is_some());

        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn pagination_ignored_while_loading() {
        let (mut app, _rx) = app_at("/?page=3&perPage=12");
        app.update(Action::LoadLocation);
        app.update(Action::NextPage);
        app.update(Action::ChangePageSize(48));
        assert_eq!(app.page, PageState { page: 3, page_size: 12 });
    }

    #[tokio::test]
    async fn stale_list_result_is_dropped() {
        let (mut app, mut rx) = loaded_list("/").await;
        app.update(Action::NextPage);
        assert!(app.list.is_loading());

        let stale_key = ListKey { limit: 12, offset: 600 };
        let stale = FakeCatalog::default().fetch_list(12, 600).await.unwrap();
        app.update(Action::ListLoaded(stale_key, stale));
        assert!(app.list.is_loading());

        settle(&mut app, &mut rx).await;
        assert_eq!(app.selected_item().unwrap().id, 13);
    }

    #[tokio::test]
    async fn detail_round_trip_preserves_list_position() {
        let (mut app, mut rx) = loaded_list("/?page=3&perPage=24").await;
        app.update(Action::ScrollDown);
        app.update(Action::ScrollDown);
        assert_eq!(app.selected_item().unwrap().id, 51);

        app.update(Action::Select);
        assert_eq!(app.location().to_string(), "/pokemon/51?page=3&perPage=24");
        assert_eq!(app.history.len(), 2);
        assert!(app.detail.is_loading());

        settle(&mut app, &mut rx).await;
        let pokemon = app.detail.data().unwrap();
        assert_eq!(pokemon.id, 51);
        assert_eq!(pokemon.varieties, Some(pikachu_varieties()));

        app.update(Action::Back);
        assert_eq!(app.location().to_string(), "/?page=3&perPage=24");
        assert_eq!(app.page, PageState { page: 3, page_size: 24 });
        assert!(app.list.data().is_some());
        assert_eq!(app.list_index, 2);
    }

    #[tokio::test]
    async fn related_link_carries_position() {
        let (mut app, mut rx) = app_at("/pokemon/25");
        app.update(Action::LoadLocation);
        settle(&mut app, &mut rx).await;

        let links = app.related_links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, 10194);

        app.update(Action::Select);
        assert_eq!(app.location().to_string(), "/pokemon/10194?page=1&perPage=12");
        assert_eq!(app.history.len(), 2);
    }

    #[tokio::test]
    async fn back_from_opened_detail_goes_to_its_list_page() {
        let (mut app, _rx) = app_at("/pokemon/25?page=4&perPage=48");
        app.update(Action::LoadLocation);
        app.update(Action::Back);

        assert!(!app.should_quit);
        assert_eq!(app.route(), Route::List);
        assert_eq!(app.location().to_string(), "/?page=4&perPage=48");
        assert_eq!(app.page, PageState { page: 4, page_size: 48 });
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn follow_back_link_pushes() {
        let (mut app, _rx) = app_at("/pokemon/25?page=2&perPage=96");
        app.update(Action::LoadLocation);
        app.update(Action::FollowBackLink);
        assert_eq!(app.location().to_string(), "/?page=2&perPage=96");
        assert_eq!(app.history.len(), 2);
    }

    #[tokio::test]
    async fn back_at_list_root_quits() {
        let (mut app, _rx) = loaded_list("/").await;
        app.update(Action::Back);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn go_to_page_input_clamps() {
        let (mut app, mut rx) = loaded_list("/").await;

        app.update(Action::EnterPageInput);
        assert_eq!(app.input, InputMode::PageInput("1".to_string()));
        app.update(Action::PageInputBackspace);
        for c in ['9', '9', '9'] {
            let action = app.handle_event(key(KeyCode::Char(c)));
            app.update(action);
        }
        app.update(Action::PageInputConfirm);
        assert_eq!(app.input, InputMode::Normal);
        assert_eq!(app.page.page, 107);
        settle(&mut app, &mut rx).await;

        app.update(Action::EnterPageInput);
        app.update(Action::PageInputBackspace);
        app.update(Action::PageInputBackspace);
        app.update(Action::PageInputBackspace);
        app.update(Action::PageInputConfirm);
        assert_eq!(app.page.page, 1);
    }

    #[tokio::test]
    async fn page_input_rejects_letters() {
        let (mut app, _rx) = loaded_list("/").await;
        app.update(Action::EnterPageInput);
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('x'))),
            Action::None
        ));
    }

    #[tokio::test]
    async fn page_input_same_page_is_not_a_transition() {
        let (mut app, _rx) = loaded_list("/?page=2&perPage=12").await;
        app.update(Action::EnterPageInput);
        app.update(Action::PageInputConfirm);
        assert_eq!(app.page.page, 2);
        assert!(app.list.data().is_some());
    }

    #[tokio::test]
    async fn page_size_popup_selects_option() {
        let (mut app, mut rx) = loaded_list("/?page=9&perPage=12").await;
        app.update(Action::ShowPageSizeSelect);
        assert_eq!(app.input, InputMode::PageSizeSelect(0));
        app.update(Action::PopupDown);
        app.update(Action::PopupDown);
        app.update(Action::PopupSelect);

        assert_eq!(app.input, InputMode::Normal);
        assert_eq!(app.page, PageState { page: 1, page_size: 48 });
        assert_eq!(app.location().to_string(), "/?page=1&perPage=48");
        settle(&mut app, &mut rx).await;
        assert_eq!(app.total_pages(), Some(27));
    }

    #[tokio::test]
    async fn search_navigates_to_detail() {
        let (mut app, mut rx) = loaded_list("/?page=2&perPage=12").await;
        app.update(Action::EnterSearchMode);
        for c in "Pikachu".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SearchConfirm);
        assert_eq!(app.input, InputMode::Normal);

        settle(&mut app, &mut rx).await;
        assert_eq!(app.location().to_string(), "/pokemon/25?page=2&perPage=12");
        settle(&mut app, &mut rx).await;
        assert_eq!(app.detail.data().unwrap().name, "pikachu");
    }

    #[tokio::test]
    async fn search_failure_shows_error() {
        let (mut app, mut rx) = loaded_list("/").await;
        app.update(Action::EnterSearchMode);
        for c in "missingno".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SearchConfirm);
        settle(&mut app, &mut rx).await;

        assert_eq!(app.route(), Route::List);
        assert_eq!(
            app.error.as_deref(),
            Some("Failed to fetch pokemon with name missingno: HTTP 404 Not Found")
        );
    }

    #[tokio::test]
    async fn search_result_after_navigation_is_dropped() {
        let (mut app, mut rx) = loaded_list("/?page=2&perPage=12").await;
        app.update(Action::EnterSearchMode);
        for c in "pikachu".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SearchConfirm);
        assert_eq!(app.pending_search.as_deref(), Some("pikachu"));

        app.update(Action::Select);
        assert!(app.pending_search.is_none());

        // lookup result and detail fetch, in whichever order they arrive
        settle(&mut app, &mut rx).await;
        settle(&mut app, &mut rx).await;

        assert_eq!(app.location().to_string(), "/pokemon/13?page=2&perPage=12");
        assert_eq!(app.history.len(), 2);
        assert_eq!(app.detail.data().unwrap().id, 13);
    }

    #[tokio::test]
    async fn search_failure_after_page_change_is_dropped() {
        let (mut app, mut rx) = loaded_list("/").await;
        app.update(Action::EnterSearchMode);
        for c in "missingno".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SearchConfirm);
        app.update(Action::NextPage);

        settle(&mut app, &mut rx).await;
        settle(&mut app, &mut rx).await;

        assert!(app.error.is_none());
        assert_eq!(app.page.page, 2);
        assert!(app.list.data().is_some());
    }

    #[tokio::test]
    async fn cancel_input_drops_pending_search() {
        let (mut app, mut rx) = loaded_list("/").await;
        app.update(Action::EnterSearchMode);
        for c in "pikachu".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SearchConfirm);
        app.update(Action::EnterSearchMode);
        app.update(Action::CancelInput);

        settle(&mut app, &mut rx).await;
        assert_eq!(app.route(), Route::List);
        assert_eq!(app.history.len(), 1);
    }

    #[tokio::test]
    async fn detail_scroll_stops_at_content_end() {
        let (mut app, mut rx) = app_at("/pokemon/25");
        app.update(Action::LoadLocation);
        settle(&mut app, &mut rx).await;

        app.set_detail_max_scroll(12);
        for _ in 0..5 {
            app.update(Action::PageDown);
        }
        assert_eq!(app.scroll_offset, 12);

        app.update(Action::PageUp);
        assert_eq!(app.scroll_offset, 2);
    }

    #[tokio::test]
    async fn detail_scroll_limit_resets_for_new_record() {
        let (mut app, mut rx) = app_at("/pokemon/25");
        app.update(Action::LoadLocation);
        settle(&mut app, &mut rx).await;
        app.set_detail_max_scroll(0);
        app.update(Action::PageDown);
        assert_eq!(app.scroll_offset, 0);

        app.update(Action::Select);
        settle(&mut app, &mut rx).await;
        app.update(Action::PageDown);
        assert_eq!(app.scroll_offset, SCROLL_PAGE);
    }

    #[tokio::test]
    async fn list_failure_hides_controls_but_not_selector() {
        let (mut app, mut rx) = app_with(FakeCatalog { fail_list: true }, "/");
        app.update(Action::LoadLocation);
        settle(&mut app, &mut rx).await;

        assert!(matches!(app.list.state(), LoadState::Failed(_)));
        assert!(!app.controls_visible());
        assert!(app.page_size_select_visible());

        app.update(Action::NextPage);
        assert_eq!(app.page.page, 1);
        app.update(Action::ShowPageSizeSelect);
        assert_eq!(app.input, InputMode::PageSizeSelect(0));
    }

    #[tokio::test]
    async fn refresh_refetches_cached_page() {
        let (mut app, mut rx) = loaded_list("/").await;
        app.update(Action::Refresh);
        assert!(app.list.is_loading());
        settle(&mut app, &mut rx).await;
        assert!(app.list.data().is_some());
    }

    #[tokio::test]
    async fn shiny_toggle_resets_on_new_record() {
        let (mut app, mut rx) = app_at("/pokemon/25");
        app.update(Action::LoadLocation);
        app.update(Action::ToggleShiny);
        assert!(!app.show_shiny);

        settle(&mut app, &mut rx).await;
        app.update(Action::ToggleShiny);
        assert!(app.show_shiny);

        app.update(Action::Select);
        assert!(!app.show_shiny);
    }

    #[tokio::test]
    async fn detail_keys_differ_from_list_keys() {
        let (app, _rx) = app_at("/pokemon/25");
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('s'))),
            Action::ToggleShiny
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('l'))),
            Action::None
        ));

        let (app, _rx) = app_at("/");
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('s'))),
            Action::ShowPageSizeSelect
        ));
        assert!(matches!(
            app.handle_event(key(KeyCode::Char('l'))),
            Action::NextPage
        ));
    }
}
