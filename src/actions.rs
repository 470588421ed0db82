//! User and system actions.

/// Editing and lifecycle actions the host applies when navigation leaves a key unhandled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Char(char),
    Backspace,
    ClearInput,
    CursorLeft,
    CursorRight,

    PaletteShow,
    PaletteHide,
}

/// Side effects requested by command handlers, drained by the host after execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostRequest {
    OpenPipeline(String),
    ShowBuilds(String),
    CreateBuild { pipeline: String, branch: String },
    ToggleFavoritePipeline(String),
    ToggleFavoriteCommand(String),
    CreateAlias(String),
    DeleteAlias(String),
    ReloadPipelines,
    Close,
}
