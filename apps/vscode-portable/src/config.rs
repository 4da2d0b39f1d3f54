use serde::{Deserialize, Serialize};

/// The `[app]` table of `vscode-portable.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VscodeConfig {
    /// Remove the editor's leftover profile state once it exits.
    pub cleanup: bool,
}
