/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // UI toggles
    ToggleHelp,

    // List navigation
    ListUp,
    ListDown,
    ListSelect,

    // Cluster-wide search
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SubmitSearch,

    // Namespace scope
    ClearNamespace,

    // Refresh the current screen
    Refresh,

    // Detail page scrolling
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToTop,

    // Error handling
    ShowError(String),
    DismissError,

    // Render request
    Render,
}
