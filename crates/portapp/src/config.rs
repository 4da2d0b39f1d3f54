use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::error::PortappError;

/// Settings every portable app understands, read from the `[common]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonConfig {
    /// Suppresses the launcher log file and tells apps not to write diagnostics.
    pub disable_log: bool,
    /// Extra environment for the launched program.
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config<C> {
    pub common: CommonConfig,
    pub app: C,
}

/// Loads `path` on top of `defaults`.
///
/// Keys missing from the file keep the value they had in `defaults`; a
/// missing file yields the defaults unchanged.
pub fn load<C>(path: &Path, defaults: C) -> Result<Config<C>, PortappError>
where
    C: Serialize + DeserializeOwned,
{
    let mut merged = Table::new();
    merged.insert("common".into(), Value::try_from(CommonConfig::default())?);
    merged.insert("app".into(), Value::try_from(&defaults)?);

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let layer = toml::from_str::<Table>(&content).map_err(|source| PortappError::Config {
                path: path.to_path_buf(),
                source,
            })?;
            overlay(&mut merged, layer);
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        }
        Err(err) => return Err(PortappError::io("reading configuration file", err)),
    }

    Value::Table(merged)
        .try_into()
        .map_err(|source| PortappError::Config {
            path: path.to_path_buf(),
            source,
        })
}

fn overlay(base: &mut Table, layer: Table) {
    for (key, value) in layer {
        if let Value::Table(incoming) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                overlay(existing, incoming);
                continue;
            }
            base.insert(key, Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommonConfig, load};
    use crate::error::PortappError;
    use crate::test_support::unique_temp_dir;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        cleanup: bool,
        channel: String,
    }

    fn defaults() -> Sample {
        Sample {
            cleanup: false,
            channel: "stable".into(),
        }
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = unique_temp_dir("config-missing");
        let config = load(&dir.join("absent.toml"), defaults()).expect("load defaults");
        assert_eq!(config.app, defaults());
        assert_eq!(config.common, CommonConfig::default());
    }

    #[test]
    fn file_overlays_only_the_keys_it_sets() {
        let dir = unique_temp_dir("config-overlay");
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("app.toml");
        std::fs::write(
            &path,
            "[common]\ndisable_log = true\n[common.env]\nFOO = \"bar\"\n[app]\ncleanup = true\n",
        )
        .expect("write config");

        let config = load(&path, defaults()).expect("load config");
        assert!(config.app.cleanup);
        assert_eq!(config.app.channel, "stable");
        assert!(config.common.disable_log);
        assert_eq!(config.common.env.get("FOO").map(String::as_str), Some("bar"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = unique_temp_dir("config-unknown");
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("app.toml");
        std::fs::write(&path, "[app]\ncleanpu = true\n").expect("write config");

        let err = load(&path, defaults()).expect_err("typo should fail");
        assert!(matches!(err, PortappError::Config { .. }));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = unique_temp_dir("config-malformed");
        std::fs::create_dir_all(&dir).expect("create dir");
        let path = dir.join("app.toml");
        std::fs::write(&path, "[app\ncleanup = ").expect("write config");

        let err = load(&path, defaults()).expect_err("parse should fail");
        assert!(err.to_string().contains("app.toml"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
