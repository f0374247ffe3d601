use crate::error::PersistenceError;
use crate::product::ProductConfig;
use std::path::PathBuf;

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub template_dir: Option<PathBuf>,
    pub preset_file: Option<PathBuf>,
}

/// Resolved locations of the template asset root and the preset store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub template_root: PathBuf,
    pub preset_path: PathBuf,
}

impl Settings {
    /// Template root: flag, then the product's env var, then its default.
    /// Preset store: flag, then `$HOME/<preset file name>`.
    pub fn resolve<C: ProductConfig>(
        config: &C,
        overrides: &Overrides,
    ) -> Result<Self, PersistenceError> {
        Self::resolve_with(
            config,
            overrides,
            |name| std::env::var(name).ok(),
            dirs::home_dir(),
        )
    }

    fn resolve_with<C, F>(
        config: &C,
        overrides: &Overrides,
        env_var: F,
        home: Option<PathBuf>,
    ) -> Result<Self, PersistenceError>
    where
        C: ProductConfig,
        F: Fn(&str) -> Option<String>,
    {
        let template_root = overrides
            .template_dir
            .clone()
            .or_else(|| {
                env_var(config.template_dir_env())
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| config.default_template_dir());

        let preset_path = match &overrides.preset_file {
            Some(path) => path.clone(),
            None => home
                .ok_or(PersistenceError::NoPath)?
                .join(config.preset_file_name()),
        };

        tracing::debug!(
            templates = %template_root.display(),
            presets = %preset_path.display(),
            "settings resolved"
        );

        Ok(Self {
            template_root,
            preset_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::testing::TestProduct;

    fn product() -> TestProduct {
        TestProduct {
            template_dir: PathBuf::from("/usr/share/stencil/templates"),
        }
    }

    #[test]
    fn test_defaults() {
        let s = Settings::resolve_with(
            &product(),
            &Overrides::default(),
            |_| None,
            Some(PathBuf::from("/home/ada")),
        )
        .unwrap();
        assert_eq!(s.template_root, PathBuf::from("/usr/share/stencil/templates"));
        assert_eq!(s.preset_path, PathBuf::from("/home/ada/.stencil-test.preset"));
    }

    #[test]
    fn test_env_overrides_default() {
        let s = Settings::resolve_with(
            &product(),
            &Overrides::default(),
            |name| (name == "STENCIL_TEST_TEMPLATE_DIR").then(|| "/opt/templates".to_string()),
            Some(PathBuf::from("/home/ada")),
        )
        .unwrap();
        assert_eq!(s.template_root, PathBuf::from("/opt/templates"));
    }

    #[test]
    fn test_flags_win() {
        let overrides = Overrides {
            template_dir: Some(PathBuf::from("./mine")),
            preset_file: Some(PathBuf::from("/tmp/p.preset")),
        };
        let s = Settings::resolve_with(
            &product(),
            &overrides,
            |_| Some("/opt/templates".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(s.template_root, PathBuf::from("./mine"));
        assert_eq!(s.preset_path, PathBuf::from("/tmp/p.preset"));
    }

    #[test]
    fn test_no_home() {
        let err =
            Settings::resolve_with(&product(), &Overrides::default(), |_| None, None).unwrap_err();
        assert!(matches!(err, PersistenceError::NoPath));
    }
}
