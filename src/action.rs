#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    CycleFont,
    Refresh,
    ToggleProcesses,
    None,
}
