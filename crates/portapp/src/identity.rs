use crate::error::PortappError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    id: String,
    name: String,
}

impl AppIdentity {
    /// `id` names files on disk, so it is limited to ASCII alphanumerics and `-_.`.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, PortappError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PortappError::InvalidIdentity("empty app id".into()));
        }
        if let Some(bad) = id
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.')))
        {
            return Err(PortappError::InvalidIdentity(format!(
                "app id {id:?} contains {bad:?}"
            )));
        }
        if id.starts_with('.') {
            return Err(PortappError::InvalidIdentity(format!(
                "app id {id:?} must not start with '.'"
            )));
        }
        Ok(Self {
            id,
            name: name.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::AppIdentity;

    #[test]
    fn accepts_file_safe_ids() {
        let identity = AppIdentity::new("vscode-portable", "VS Code").expect("valid id");
        assert_eq!(identity.id(), "vscode-portable");
        assert_eq!(identity.name(), "VS Code");
    }

    #[test]
    fn rejects_ids_that_are_not_file_safe() {
        assert!(AppIdentity::new("", "x").is_err());
        assert!(AppIdentity::new("../escape", "x").is_err());
        assert!(AppIdentity::new("with space", "x").is_err());
        assert!(AppIdentity::new(".hidden", "x").is_err());
    }
}
