use kubedash_types::{ClusterSummary, NormalizedRecord, ResourceDetail, UsageRecord, VolumeBinding};
use ratatui::widgets::{ListState, TableState};

use super::View;

/// Screen enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Overview,
    ResourceList,
    SearchResults,
    Detail,
}

/// Rows shown by the resource list screen
#[derive(Clone, Debug)]
pub enum Listing {
    Records(Vec<NormalizedRecord>),
    Bindings(Vec<VolumeBinding>),
    Usage(Vec<UsageRecord>),
}

impl Listing {
    pub fn len(&self) -> usize {
        match self {
            Self::Records(r) => r.len(),
            Self::Bindings(b) => b.len(),
            Self::Usage(u) => u.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self::Records(Vec::new())
    }
}

/// A loaded detail page
#[derive(Clone, Debug)]
pub struct DetailPage {
    pub detail: ResourceDetail,
    /// Recent events, only filled in for pods
    pub events: Vec<NormalizedRecord>,
}

/// UI-specific transient state
#[derive(Default)]
pub struct UiState {
    /// Is the search bar active?
    pub search_active: bool,

    /// Current search input text
    pub search_input: String,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Selection in the overview menu
    pub list_state: ListState,

    /// Selection in resource and search tables
    pub table_state: TableState,

    /// Scroll offset of the detail page
    pub detail_scroll: u16,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// What is being fetched right now, if anything
    pub loading: Option<String>,
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Navigation stack for back navigation
    pub screen_stack: Vec<Screen>,

    /// Name shown in the header until the first summary arrives
    pub cluster_name: String,

    /// Latest cluster summary
    pub summary: Option<ClusterSummary>,

    /// Namespace scope for namespaced views (None = all namespaces)
    pub namespace: Option<String>,

    /// View shown on the resource list screen
    pub current_view: Option<View>,

    /// Rows of the current view
    pub listing: Listing,

    /// Last submitted search query
    pub search_query: String,

    /// Matches of the last search
    pub search_results: Vec<NormalizedRecord>,

    /// Detail page being shown
    pub detail: Option<DetailPage>,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,
}

impl AppState {
    pub fn new(cluster_name: impl Into<String>, namespace: Option<String>) -> Self {
        let mut ui_state = UiState::default();
        ui_state.list_state.select(Some(0));
        ui_state.table_state.select(Some(0));

        Self {
            current_screen: Screen::Overview,
            screen_stack: Vec::new(),
            cluster_name: cluster_name.into(),
            summary: None,
            namespace,
            current_view: None,
            listing: Listing::default(),
            search_query: String::new(),
            search_results: Vec::new(),
            detail: None,
            ui_state,
            should_quit: false,
            render_dirty: true, // Start dirty to ensure initial render
        }
    }

    /// Navigate to a new screen, pushing current to stack
    pub fn navigate_to(&mut self, screen: Screen) {
        if self.current_screen == screen {
            self.reset_selection();
            return;
        }
        self.screen_stack.push(self.current_screen.clone());
        self.current_screen = screen;
        self.reset_selection();
    }

    /// Go back to previous screen
    pub fn go_back(&mut self) -> bool {
        if let Some(prev_screen) = self.screen_stack.pop() {
            self.current_screen = prev_screen;
            self.reset_selection();
            true
        } else {
            false
        }
    }

    fn reset_selection(&mut self) {
        self.ui_state.table_state.select(Some(0));
        self.ui_state.detail_scroll = 0;
    }

    /// Get the current list length based on screen
    pub fn current_list_len(&self) -> usize {
        match self.current_screen {
            Screen::Overview => View::MENU.len(),
            Screen::ResourceList => self.listing.len(),
            Screen::SearchResults => self.search_results.len(),
            Screen::Detail => 0,
        }
    }

    fn selection(&self) -> Option<usize> {
        match self.current_screen {
            Screen::Overview => self.ui_state.list_state.selected(),
            _ => self.ui_state.table_state.selected(),
        }
    }

    fn select(&mut self, index: usize) {
        match self.current_screen {
            Screen::Overview => self.ui_state.list_state.select(Some(index)),
            _ => self.ui_state.table_state.select(Some(index)),
        }
    }

    /// Move selection up
    pub fn list_up(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.selection() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    /// Move selection down
    pub fn list_down(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.selection() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(i);
    }

    /// The overview menu entry under the cursor
    pub fn selected_view(&self) -> Option<View> {
        self.ui_state
            .list_state
            .selected()
            .and_then(|i| View::MENU.get(i).copied())
    }

    /// The record under the cursor on a list or search screen
    pub fn selected_record(&self) -> Option<&NormalizedRecord> {
        let i = self.ui_state.table_state.selected()?;
        match self.current_screen {
            Screen::ResourceList => match &self.listing {
                Listing::Records(records) => records.get(i),
                _ => None,
            },
            Screen::SearchResults => self.search_results.get(i),
            _ => None,
        }
    }

    /// Replace the rows of the resource list, keeping the cursor in range
    pub fn set_listing(&mut self, view: View, listing: Listing) {
        self.current_view = Some(view);
        self.listing = listing;
        self.clamp_table_selection();
    }

    pub fn set_search_results(&mut self, query: String, results: Vec<NormalizedRecord>) {
        self.search_query = query;
        self.search_results = results;
        self.clamp_table_selection();
    }

    fn clamp_table_selection(&mut self) {
        let len = self.current_list_len();
        let selected = self.ui_state.table_state.selected().unwrap_or(0);
        self.ui_state
            .table_state
            .select(Some(selected.min(len.saturating_sub(1))));
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.ui_state.detail_scroll = self.ui_state.detail_scroll.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.ui_state.detail_scroll = self.ui_state.detail_scroll.saturating_add(n);
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    /// Start search input mode
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
        self.ui_state.search_input.clear();
    }

    /// Cancel search input
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.search_input.clear();
    }

    /// Close the search bar and hand back the typed query
    pub fn take_search_query(&mut self) -> String {
        self.ui_state.search_active = false;
        std::mem::take(&mut self.ui_state.search_input)
    }

    /// Add a character to search input
    pub fn search_input_char(&mut self, c: char) {
        self.ui_state.search_input.push(c);
    }

    /// Remove last character from search input
    pub fn search_input_backspace(&mut self) {
        self.ui_state.search_input.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubedash_types::Kind;

    fn pods(n: usize) -> Vec<NormalizedRecord> {
        (0..n)
            .map(|i| NormalizedRecord::new(Kind::Pod, format!("pod-{}", i), Some("default".into()), "Running"))
            .collect()
    }

    #[test]
    fn test_navigation_stack() {
        let mut state = AppState::new("dev", None);
        state.navigate_to(Screen::ResourceList);
        state.navigate_to(Screen::Detail);

        assert!(state.go_back());
        assert_eq!(state.current_screen, Screen::ResourceList);
        assert!(state.go_back());
        assert_eq!(state.current_screen, Screen::Overview);
        assert!(!state.go_back());
    }

    #[test]
    fn test_navigate_to_same_screen_does_not_stack() {
        let mut state = AppState::new("dev", None);
        state.navigate_to(Screen::SearchResults);
        state.navigate_to(Screen::SearchResults);
        assert_eq!(state.screen_stack.len(), 1);
    }

    #[test]
    fn test_list_wraps_around() {
        let mut state = AppState::new("dev", None);
        state.navigate_to(Screen::ResourceList);
        state.set_listing(View::Resources(Kind::Pod), Listing::Records(pods(3)));

        state.list_up();
        assert_eq!(state.selection(), Some(2));
        state.list_down();
        assert_eq!(state.selection(), Some(0));
        assert_eq!(state.selected_record().map(|r| r.name.as_str()), Some("pod-0"));
    }

    #[test]
    fn test_menu_selection() {
        let mut state = AppState::new("dev", None);
        state.list_down();
        assert_eq!(state.selected_view(), Some(View::MENU[1]));
        state.list_up();
        state.list_up();
        assert_eq!(state.selected_view(), View::MENU.last().copied());
    }

    #[test]
    fn test_refresh_clamps_selection() {
        let mut state = AppState::new("dev", None);
        state.navigate_to(Screen::ResourceList);
        state.set_listing(View::Resources(Kind::Pod), Listing::Records(pods(5)));
        state.list_up();
        assert_eq!(state.selection(), Some(4));

        state.set_listing(View::Resources(Kind::Pod), Listing::Records(pods(2)));
        assert_eq!(state.selection(), Some(1));
    }

    #[test]
    fn test_search_input() {
        let mut state = AppState::new("dev", None);
        state.start_search();
        for c in "web".chars() {
            state.search_input_char(c);
        }
        state.search_input_backspace();

        assert_eq!(state.take_search_query(), "we");
        assert!(!state.ui_state.search_active);
        assert!(state.ui_state.search_input.is_empty());
    }
}
