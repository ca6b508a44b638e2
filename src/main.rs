//! `kaptan-theme` — apply desktop theme and layout choices to Plasma config.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod apply;
mod catalog;
mod ctx;
mod layout;
mod selection;
mod store;
mod util;

use ctx::Ctx;
use selection::{DESKTOP_COUNT_RANGE, Event, Selection};

#[derive(Parser)]
#[command(name = "kaptan-theme", about = "Apply desktop theme and layout choices")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Write the selection into the shell's config files
    Apply {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Do not restart the window manager or apply the cursor live
        #[arg(long)]
        no_launch: bool,
    },

    /// List installed choices of one kind
    List {
        #[arg(value_enum)]
        kind: catalog::Kind,
    },

    /// Print the resolved selection without applying it
    Show {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Selection sources. Flags override values from `--from`.
#[derive(Args, Debug)]
struct SelectionArgs {
    /// TOML selection file
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,

    /// Number of virtual desktops
    #[arg(long, value_parser = clap::value_parser!(u8).range(
        i64::from(*DESKTOP_COUNT_RANGE.start())..=i64::from(*DESKTOP_COUNT_RANGE.end())
    ))]
    desktops: Option<u8>,

    /// 0 = desktop view, anything else = folder view
    #[arg(long, value_name = "INDEX")]
    desktop_type: Option<usize>,

    /// Icon theme name
    #[arg(long)]
    icons: Option<String>,

    /// Cursor theme name
    #[arg(long)]
    cursor: Option<String>,

    /// Qt widget style
    #[arg(long, conflicts_with = "no_widget_style")]
    widget_style: Option<String>,

    /// Leave the widget style untouched
    #[arg(long)]
    no_widget_style: bool,

    /// Window decoration library
    #[arg(long)]
    window_style: Option<String>,

    /// Color scheme file name, e.g. BreezeDark.colors
    #[arg(long, value_name = "FILE")]
    color_scheme: Option<String>,

    /// Plasma desktop theme name
    #[arg(long)]
    desktop_theme: Option<String>,

    /// Add a show-desktop applet to the panel
    #[arg(long)]
    show_desktop: bool,
}

impl SelectionArgs {
    fn resolve(self) -> Result<Selection> {
        let mut sel = match &self.from {
            Some(path) => Selection::from_toml(path).context("load selection file")?,
            None => Selection::default(),
        };

        let events = [
            self.desktops.map(Event::DesktopCount),
            self.desktop_type.map(Event::DesktopTypeIndex),
            self.icons.map(Event::IconSet),
            self.cursor.map(Event::MouseCursor),
            self.widget_style.map(Event::WidgetStyle),
            self.window_style.map(Event::WindowStyle),
            self.color_scheme.map(Event::ColorScheme),
            self.desktop_theme.map(Event::DesktopTheme),
            self.show_desktop.then_some(Event::ShowDesktop(true)),
        ];
        for event in events.into_iter().flatten() {
            sel.handle(event);
        }

        if self.no_widget_style {
            sel.widget_style = None;
        }
        Ok(sel)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ctx = Ctx::new().context("initialise context")?;
    log::debug!(
        "config dir {}, cache dir {}",
        ctx.config_dir.display(),
        ctx.cache_dir.display()
    );

    match cli.cmd {
        Cmd::Apply {
            selection,
            no_launch,
        } => {
            let sel = selection.resolve()?;
            let report = apply::execute(
                &ctx,
                &sel,
                &apply::reload::Detached,
                apply::ApplyOptions {
                    launch: !no_launch,
                },
            )
            .context("apply selection")?;
            log::info!(
                "done: {} file(s) written, {} command(s) launched",
                report.written.len(),
                report.launched.len()
            );
            Ok(())
        }

        Cmd::List { kind } => {
            for name in catalog::list(&ctx, kind) {
                println!("{name}");
            }
            Ok(())
        }

        Cmd::Show { selection } => {
            print!("{}", selection.resolve()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selection::DesktopType;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("kaptan-theme").chain(args.iter().copied()))
    }

    fn resolved(args: &[&str]) -> Selection {
        match parse(args).unwrap().cmd {
            Cmd::Apply { selection, .. } | Cmd::Show { selection } => selection.resolve().unwrap(),
            Cmd::List { .. } => panic!("not a selection command"),
        }
    }

    #[test]
    fn flags_become_events() {
        let sel = resolved(&[
            "apply",
            "--desktops",
            "6",
            "--desktop-type",
            "2",
            "--icons",
            "Papirus",
            "--widget-style",
            "Fusion",
            "--show-desktop",
        ]);
        assert_eq!(sel.desktop_count, 6);
        assert_eq!(sel.desktop_type, DesktopType::Folder);
        assert_eq!(sel.icon_set.as_deref(), Some("papirus"));
        assert_eq!(sel.widget_style.as_deref(), Some("fusion"));
        assert!(sel.show_desktop);
        assert!(sel.mouse_cursor.is_none());
    }

    #[test]
    fn flags_override_selection_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("selection.toml");
        std::fs::write(&file, "desktops = 3\ncursor = \"Breeze_Snow\"\n").unwrap();

        let sel = resolved(&["show", "--from", file.to_str().unwrap(), "--desktops", "8"]);
        assert_eq!(sel.desktop_count, 8);
        assert_eq!(sel.mouse_cursor.as_deref(), Some("Breeze_Snow"));
    }

    #[test]
    fn desktop_count_is_range_checked() {
        assert!(parse(&["apply", "--desktops", "0"]).is_err());
        assert!(parse(&["apply", "--desktops", "21"]).is_err());
        assert!(parse(&["apply", "--desktops", "20"]).is_ok());
    }

    #[test]
    fn no_widget_style_clears_default() {
        let sel = resolved(&["apply", "--no-widget-style"]);
        assert!(sel.widget_style.is_none());
        assert!(parse(&["apply", "--no-widget-style", "--widget-style", "x"]).is_err());
    }

    #[test]
    fn list_kinds_parse() {
        assert!(parse(&["list", "color-schemes"]).is_ok());
        assert!(parse(&["list", "desktop-themes"]).is_ok());
        assert!(parse(&["list", "wallpapers"]).is_err());
    }
}
