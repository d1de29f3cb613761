use std::fmt;

/// Installation state of a component.
///
/// `Uninitialized -> Installing -> Installed`, and `Installed -> Uninstalled`.
/// Both `Uninitialized` and `Uninstalled` accept a fresh install attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstallState {
    #[default]
    Uninitialized,
    Installing,
    Installed,
    Uninstalled,
}

impl InstallState {
    /// Numeric code of the state (0 to 3).
    pub fn code(&self) -> u8 {
        match self {
            InstallState::Uninitialized => 0,
            InstallState::Installing => 1,
            InstallState::Installed => 2,
            InstallState::Uninstalled => 3,
        }
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, InstallState::Installed)
    }

    /// Whether an install call may start a new attempt from this state.
    pub fn accepts_install(&self) -> bool {
        matches!(self, InstallState::Uninitialized | InstallState::Uninstalled)
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallState::Uninitialized => "uninitialized",
            InstallState::Installing => "installing",
            InstallState::Installed => "installed",
            InstallState::Uninstalled => "uninstalled",
        };
        f.write_str(label)
    }
}
