//! What the user picked on the theme page.

use anyhow::{Context, Result, bail};
use std::{fmt, fs, path::Path};

/// Inclusive range accepted for the virtual desktop count.
pub const DESKTOP_COUNT_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

/// Desktop containment plugin placed on every screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DesktopType {
    #[default]
    Containment,
    Folder,
}

impl DesktopType {
    /// Combo-box index mapping: 0 is the plain desktop view, anything else
    /// is the folder view.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::Containment
        } else {
            Self::Folder
        }
    }

    /// Plugin identifier written to the applets layout file.
    pub fn id(self) -> &'static str {
        match self {
            Self::Containment => "org.kde.desktopcontainment",
            Self::Folder => "org.kde.plasma.folder",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        [Self::Containment, Self::Folder]
            .into_iter()
            .find(|t| t.id() == id)
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "containment" | "desktop" => Some(Self::Containment),
            "folder" => Some(Self::Folder),
            other => Self::from_id(other),
        }
    }
}

/// One user interaction on the page. Each event overwrites exactly one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    IconSet(String),
    MouseCursor(String),
    WindowStyle(String),
    WidgetStyle(String),
    DesktopTheme(String),
    ColorScheme(String),
    DesktopCount(u8),
    DesktopTypeIndex(usize),
    ShowDesktop(bool),
}

/// Selections collected from the page. `None` means the control was never
/// touched and the applier leaves the matching config key alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub desktop_count: u8,
    pub desktop_type: DesktopType,
    pub icon_set: Option<String>,
    pub mouse_cursor: Option<String>,
    pub show_desktop: bool,
    pub widget_style: Option<String>,
    pub window_style: Option<String>,
    pub color_scheme: Option<String>,
    pub desktop_theme: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            desktop_count: 1,
            desktop_type: DesktopType::Containment,
            icon_set: None,
            mouse_cursor: None,
            show_desktop: false,
            widget_style: Some("breeze".to_owned()),
            window_style: None,
            color_scheme: None,
            desktop_theme: None,
        }
    }
}

impl Selection {
    /// Record a single interaction. No validation happens here.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::IconSet(name) => self.icon_set = Some(name.to_lowercase()),
            Event::MouseCursor(name) => self.mouse_cursor = Some(name),
            Event::WindowStyle(name) => self.window_style = Some(name),
            Event::WidgetStyle(name) => self.widget_style = Some(name.to_lowercase()),
            Event::DesktopTheme(name) => self.desktop_theme = Some(name),
            Event::ColorScheme(file) => self.color_scheme = Some(file),
            Event::DesktopCount(n) => self.desktop_count = n,
            Event::DesktopTypeIndex(i) => self.desktop_type = DesktopType::from_index(i),
            Event::ShowDesktop(on) => self.show_desktop = on,
        }
    }

    /// Load a selection file. Keys absent from the file keep their defaults.
    pub fn from_toml(path: &Path) -> Result<Self> {
        let src =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse_toml(&src).with_context(|| format!("parse {}", path.display()))
    }

    fn parse_toml(src: &str) -> Result<Self> {
        let doc: toml::Value = toml::from_str(src).context("invalid TOML")?;
        let Some(table) = doc.as_table() else {
            bail!("selection file must be a table");
        };

        let mut sel = Self::default();
        for (key, value) in table {
            let event = match (key.as_str(), value) {
                ("desktops", toml::Value::Integer(n)) => {
                    Event::DesktopCount(desktop_count(*n)?)
                }
                ("desktop_type", toml::Value::Integer(i)) => {
                    let i = usize::try_from(*i).context("desktop_type index is negative")?;
                    Event::DesktopTypeIndex(i)
                }
                ("desktop_type", toml::Value::String(s)) => {
                    let Some(t) = DesktopType::from_name(s) else {
                        bail!("unknown desktop_type '{s}' (expected containment or folder)");
                    };
                    sel.desktop_type = t;
                    continue;
                }
                ("show_desktop", toml::Value::Boolean(b)) => Event::ShowDesktop(*b),
                ("icons", toml::Value::String(s)) => Event::IconSet(s.clone()),
                ("cursor", toml::Value::String(s)) => Event::MouseCursor(s.clone()),
                ("widget_style", toml::Value::String(s)) => Event::WidgetStyle(s.clone()),
                ("window_style", toml::Value::String(s)) => Event::WindowStyle(s.clone()),
                ("color_scheme", toml::Value::String(s)) => Event::ColorScheme(s.clone()),
                ("desktop_theme", toml::Value::String(s)) => Event::DesktopTheme(s.clone()),
                (
                    "desktops" | "desktop_type" | "show_desktop" | "icons" | "cursor"
                    | "widget_style" | "window_style" | "color_scheme" | "desktop_theme",
                    other,
                ) => bail!("key '{key}' has unexpected type {}", other.type_str()),
                _ => bail!("unknown key '{key}'"),
            };
            sel.handle(event);
        }

        Ok(sel)
    }
}

fn desktop_count(n: i64) -> Result<u8> {
    u8::try_from(n)
        .ok()
        .filter(|n| DESKTOP_COUNT_RANGE.contains(n))
        .with_context(|| {
            format!(
                "desktops must be between {} and {}, got {n}",
                DESKTOP_COUNT_RANGE.start(),
                DESKTOP_COUNT_RANGE.end()
            )
        })
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unset = "(unchanged)";
        writeln!(f, "desktops:      {}", self.desktop_count)?;
        writeln!(f, "desktop type:  {}", self.desktop_type.id())?;
        writeln!(f, "show desktop:  {}", self.show_desktop)?;
        for (label, value) in [
            ("icons:        ", &self.icon_set),
            ("cursor:       ", &self.mouse_cursor),
            ("widget style: ", &self.widget_style),
            ("window style: ", &self.window_style),
            ("color scheme: ", &self.color_scheme),
            ("desktop theme:", &self.desktop_theme),
        ] {
            writeln!(f, "{label} {}", value.as_deref().unwrap_or(unset))?;
        }
        Ok(())
    }
}
