use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Immutable bag of filesystem paths used throughout the app.
/// Constructed once at startup; never mutated after that.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// XDG data dirs, user dir first.
    pub data_dirs: Vec<PathBuf>,
    pub home: PathBuf,
    pub kwinrc: PathBuf,
    pub kdeglobals: PathBuf,
    pub plasmarc: PathBuf,
    pub appletsrc: PathBuf,
    pub icon_cache: PathBuf,
}

impl Ctx {
    /// Construct paths from environment variables.
    pub fn new() -> Result<Self> {
        let home = PathBuf::from(std::env::var("HOME").context("$HOME is not set")?);

        let config_dir = xdg_dir("XDG_CONFIG_HOME").unwrap_or_else(|| home.join(".config"));
        let cache_dir = xdg_dir("XDG_CACHE_HOME").unwrap_or_else(|| home.join(".cache"));
        let data_home = xdg_dir("XDG_DATA_HOME").unwrap_or_else(|| home.join(".local/share"));

        let system = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_owned());

        let mut data_dirs = vec![data_home];
        data_dirs.extend(
            system
                .split(':')
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        );

        Ok(Self::with_dirs(home, config_dir, cache_dir, data_dirs))
    }

    /// Build from explicit roots; all derived paths follow from these.
    pub fn with_dirs(
        home: PathBuf,
        config_dir: PathBuf,
        cache_dir: PathBuf,
        data_dirs: Vec<PathBuf>,
    ) -> Self {
        Self {
            kwinrc: config_dir.join("kwinrc"),
            kdeglobals: config_dir.join("kdeglobals"),
            plasmarc: config_dir.join("plasmarc"),
            appletsrc: config_dir.join("plasma-org.kde.plasma.desktop-appletsrc"),
            icon_cache: cache_dir.join("icon-cache.kcache"),
            home,
            config_dir,
            cache_dir,
            data_dirs,
        }
    }

    pub fn color_scheme_dirs(&self) -> Vec<PathBuf> {
        self.data_subdirs("color-schemes")
    }

    /// `~/.icons` first, then every `<data>/icons`.
    pub fn icon_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.home.join(".icons")];
        dirs.extend(self.data_subdirs("icons"));
        dirs
    }

    pub fn desktop_theme_dirs(&self) -> Vec<PathBuf> {
        self.data_subdirs("plasma/desktoptheme")
    }

    fn data_subdirs(&self, rel: impl AsRef<Path>) -> Vec<PathBuf> {
        self.data_dirs.iter().map(|d| d.join(rel.as_ref())).collect()
    }
}

fn xdg_dir(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
impl Ctx {
    /// A context rooted entirely inside `root`, for filesystem tests.
    pub fn rooted(root: &Path) -> Self {
        Self::with_dirs(
            root.join("home"),
            root.join("home/.config"),
            root.join("home/.cache"),
            vec![root.join("home/.local/share"), root.join("usr/share")],
        )
    }
}
