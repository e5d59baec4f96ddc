use crate::error::DexError;
use crate::pagination::ListKey;
use crate::types::{ListResult, Pokemon};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Select,

    // Navigation
    LoadLocation,
    FollowBackLink,

    // Pagination
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    ChangePageSize(u32),

    // Go-to-page input
    EnterPageInput,
    PageInput(char),
    PageInputBackspace,
    PageInputConfirm,

    // Per-page selector popup
    ShowPageSizeSelect,
    PopupUp,
    PopupDown,
    PopupSelect,

    // Search by name
    EnterSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    // Lookup results, tagged with the name that was searched for
    NameResolved(String, u32),
    NameFailed(String, String),

    CancelInput,

    // Detail view
    ToggleShiny,

    // Fetch results, tagged with the key they were requested for
    ListLoaded(ListKey, ListResult),
    ListFailed(ListKey, String),
    DetailLoaded(u32, Box<Pokemon>),
    DetailFailed(u32, String),

    Refresh,
    OpenInBrowser,
    YankLocation,

    Error(String),
    None,
}

impl Action {
    /// Results of background fetches, as opposed to user input
    pub fn is_fetch_result(&self) -> bool {
        matches!(
            self,
            Action::ListLoaded(..)
                | Action::ListFailed(..)
                | Action::DetailLoaded(..)
                | Action::DetailFailed(..)
                | Action::NameResolved(..)
                | Action::NameFailed(..)
        )
    }
}

impl From<DexError> for Action {
    fn from(err: DexError) -> Self {
        Action::Error(err.to_string())
    }
}
