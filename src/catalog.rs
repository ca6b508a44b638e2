//! Discover installed choices: color schemes, icon and cursor themes,
//! Plasma desktop themes.

use crate::ctx::Ctx;
use clap::ValueEnum;
use std::{collections::BTreeSet, path::Path};
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    ColorSchemes,
    Icons,
    Cursors,
    DesktopThemes,
}

/// Sorted, deduplicated names usable as selection values for `kind`.
pub fn list(ctx: &Ctx, kind: Kind) -> Vec<String> {
    let names: BTreeSet<String> = match kind {
        Kind::ColorSchemes => ctx
            .color_scheme_dirs()
            .iter()
            .flat_map(|d| entries(d))
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "colors"))
            .filter_map(|p| file_name(&p))
            .collect(),
        Kind::Icons => themes_with(&ctx.icon_dirs(), |d| {
            d.join("index.theme").is_file() && !d.join("cursors").is_dir()
        }),
        Kind::Cursors => themes_with(&ctx.icon_dirs(), |d| d.join("cursors").is_dir()),
        Kind::DesktopThemes => themes_with(&ctx.desktop_theme_dirs(), |d| {
            d.join("metadata.json").is_file() || d.join("metadata.desktop").is_file()
        }),
    };
    names.into_iter().collect()
}

/// Immediate subdirectories of each root that satisfy `accept`.
fn themes_with(roots: &[std::path::PathBuf], accept: impl Fn(&Path) -> bool) -> BTreeSet<String> {
    roots
        .iter()
        .flat_map(|r| entries(r))
        .filter(|p| p.is_dir() && accept(p))
        .filter_map(|p| file_name(&p))
        .collect()
}

/// Direct children of `dir`, following symlinks. Missing dirs yield nothing.
fn entries(dir: &Path) -> impl Iterator<Item = std::path::PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
}

fn file_name(p: &Path) -> Option<String> {
    p.file_name()?.to_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_color_schemes_across_dirs() {
        let dir = TempDir::new().unwrap();
        let ctx = Ctx::rooted(dir.path());
        let dirs = ctx.color_scheme_dirs();
        for d in &dirs {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(dirs[0].join("Mine.colors"), "").unwrap();
        fs::write(dirs[1].join("BreezeDark.colors"), "").unwrap();
        fs::write(dirs[1].join("Mine.colors"), "").unwrap();
        fs::write(dirs[1].join("README"), "").unwrap();

        assert_eq!(
            list(&ctx, Kind::ColorSchemes),
            vec!["BreezeDark.colors", "Mine.colors"]
        );
    }

    #[test]
    fn separates_icon_and_cursor_themes() {
        let dir = TempDir::new().unwrap();
        let ctx = Ctx::rooted(dir.path());
        let icons = &ctx.icon_dirs()[2];

        fs::create_dir_all(icons.join("Papirus")).unwrap();
        fs::write(icons.join("Papirus/index.theme"), "").unwrap();
        fs::create_dir_all(icons.join("Breeze_Snow/cursors")).unwrap();
        fs::write(icons.join("Breeze_Snow/index.theme"), "").unwrap();
        fs::create_dir_all(icons.join("stray")).unwrap();

        assert_eq!(list(&ctx, Kind::Icons), vec!["Papirus"]);
        assert_eq!(list(&ctx, Kind::Cursors), vec!["Breeze_Snow"]);
    }

    #[test]
    fn desktop_themes_need_metadata() {
        let dir = TempDir::new().unwrap();
        let ctx = Ctx::rooted(dir.path());
        let themes = &ctx.desktop_theme_dirs()[0];
        fs::create_dir_all(themes.join("breeze-dark")).unwrap();
        fs::write(themes.join("breeze-dark/metadata.json"), "{}").unwrap();
        fs::create_dir_all(themes.join("half-installed")).unwrap();

        assert_eq!(list(&ctx, Kind::DesktopThemes), vec!["breeze-dark"]);
        assert!(list(&ctx, Kind::Cursors).is_empty());
    }
}
