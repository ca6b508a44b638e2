//! Apply a [`Selection`] to the shell's config files.
//!
//! Steps run in a fixed order and each one flushes its own store. A failure
//! aborts the run; stores flushed by earlier steps stay written.

pub mod colors;
pub mod reload;

use crate::{ctx::Ctx, layout::AppletsLayout, selection::Selection, store::IniStore, util};
use anyhow::{Context, Result};
use reload::Launcher;
use std::path::{Path, PathBuf};

/// Desktop grid rows; fixed regardless of the desktop count.
pub const DESKTOP_ROWS: u8 = 2;

#[derive(Clone, Copy, Debug)]
pub struct ApplyOptions {
    /// Launch the window-manager restart and cursor-apply commands.
    pub launch: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { launch: true }
    }
}

/// What a run actually did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Files written, in first-write order, without duplicates.
    pub written: Vec<PathBuf>,
    /// Command lines that were launched.
    pub launched: Vec<String>,
}

impl Report {
    fn wrote(&mut self, path: &Path, changed: bool) {
        if changed && !self.written.iter().any(|p| p == path) {
            self.written.push(path.to_owned());
        }
    }
}

pub fn execute(
    ctx: &Ctx,
    sel: &Selection,
    launcher: &dyn Launcher,
    opts: ApplyOptions,
) -> Result<Report> {
    let mut report = Report::default();

    // Virtual desktops.
    let mut kwin = IniStore::open(&ctx.kwinrc)?;
    kwin.set("Desktops", "Number", &sel.desktop_count.to_string());
    kwin.set("Desktops", "Rows", &DESKTOP_ROWS.to_string());
    report.wrote(&ctx.kwinrc, kwin.sync().context("write desktop count")?);
    log::info!("desktops: {} in {DESKTOP_ROWS} rows", sel.desktop_count);

    if let Some(icons) = &sel.icon_set {
        let mut globals = IniStore::open(&ctx.kdeglobals)?;
        globals.set("Icons", "Theme", icons);
        report.wrote(&ctx.kdeglobals, globals.sync().context("write icon theme")?);
        log::info!("icon theme: {icons}");
        drop_icon_cache(&ctx.icon_cache);
    }

    if let Some(style) = &sel.widget_style {
        let style = style.to_lowercase();
        let mut globals = IniStore::open(&ctx.kdeglobals)?;
        globals.set("KDE", "widgetStyle", &style);
        report.wrote(&ctx.kdeglobals, globals.sync().context("write widget style")?);
        log::info!("widget style: {style}");
    }

    if let Some(decoration) = &sel.window_style {
        let mut kwin = IniStore::open(&ctx.kwinrc)?;
        kwin.set("org.kde.kdecoration2", "library", decoration);
        report.wrote(&ctx.kwinrc, kwin.sync().context("write window decoration")?);
        log::info!("window decoration: {decoration}");

        if opts.launch {
            report.launched.extend(reload::restart_window_manager(launcher));
        }
    }

    if let Some(theme) = &sel.desktop_theme {
        let mut plasma = IniStore::open(&ctx.plasmarc)?;
        plasma.set("Theme", "name", theme);
        report.wrote(&ctx.plasmarc, plasma.sync().context("write desktop theme")?);
        log::info!("desktop theme: {theme}");
    }

    if let Some(cursor) = &sel.mouse_cursor {
        log::info!("cursor theme: {cursor}");
        if opts.launch {
            report.launched.extend(reload::apply_cursor_theme(launcher, cursor));
        }
    }

    if let Some(scheme) = &sel.color_scheme {
        let src = colors::resolve(ctx, scheme)?;
        // Repair first so escaped groups merge with the scheme's groups.
        let repaired = colors::unescape_colons(&ctx.kdeglobals)?;
        let mut globals = IniStore::open(&ctx.kdeglobals)?;
        let copied = colors::copy_scheme(&src, &mut globals)
            .with_context(|| format!("import color scheme {}", src.display()))?;
        let changed = globals.sync().context("write color scheme")?;
        report.wrote(&ctx.kdeglobals, changed || repaired);
        log::info!("color scheme: {} ({copied} keys)", src.display());
    }

    let mut layout = AppletsLayout::open(&ctx.appletsrc)?;
    let switched = layout.set_desktop_type(sel.desktop_type);
    if switched > 0 {
        log::info!("desktop type: {} on {switched} containment(s)", sel.desktop_type.id());
    }
    if sel.show_desktop {
        layout.add_show_desktop_applet();
    }
    report.wrote(&ctx.appletsrc, layout.sync().context("write applets layout")?);

    Ok(report)
}

/// Best-effort removal of the icon cache; failures are only logged.
fn drop_icon_cache(path: &Path) {
    if std::fs::symlink_metadata(path).is_err() {
        log::debug!("no icon cache at {}", path.display());
        return;
    }
    match util::remove_any(path) {
        Ok(()) => log::info!("removed {}", path.display()),
        Err(e) => log::warn!("icon cache not removed: {e:#}"),
    }
}
