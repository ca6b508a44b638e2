//! Edits to the Plasma desktop applets layout
//! (`plasma-org.kde.plasma.desktop-appletsrc`).
//!
//! Containments live in `[Containments][N]`, their applets in
//! `[Containments][N][Applets][M]`. Ids are unique across the whole file.

use crate::{
    selection::DesktopType,
    store::{
        IniStore,
        parser::{group_name, group_parts},
    },
};
use anyhow::Result;
use std::path::Path;

const PANEL_PLUGIN: &str = "org.kde.panel";
pub const SHOW_DESKTOP_PLUGIN: &str = "org.kde.plasma.showdesktop";

#[derive(Debug)]
pub struct AppletsLayout {
    store: IniStore,
}

impl AppletsLayout {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: IniStore::open(path)?,
        })
    }

    /// Switch every desktop containment to `kind`. Containments already
    /// using it are left alone. Returns how many were changed.
    pub fn set_desktop_type(&mut self, kind: DesktopType) -> usize {
        let targets: Vec<String> = self
            .containments()
            .filter(|(_, plugin)| {
                DesktopType::from_id(plugin).is_some_and(|current| current != kind)
            })
            .map(|(group, _)| group.to_owned())
            .collect();

        for group in &targets {
            log::debug!("[{group}] plugin -> {}", kind.id());
            self.store.set(group, "plugin", kind.id());
        }
        targets.len()
    }

    /// Add a show-desktop applet to the first panel unless it already has
    /// one. Returns whether an applet was added.
    pub fn add_show_desktop_applet(&mut self) -> bool {
        let Some(panel) = self
            .containments()
            .find(|(_, plugin)| *plugin == PANEL_PLUGIN)
            .map(|(group, _)| group.to_owned())
        else {
            log::warn!(
                "no panel in {}; show-desktop applet not added",
                self.store.path().display()
            );
            return false;
        };

        let panel_id = group_parts(&panel)[1].to_owned();
        if self.panel_has_show_desktop(&panel_id) {
            log::debug!("panel {panel_id} already has a show-desktop applet");
            return false;
        }

        let Some(id) = self.next_id() else {
            log::warn!(
                "no free applet id in {}; show-desktop applet not added",
                self.store.path().display()
            );
            return false;
        };
        let id = id.to_string();
        let applet = group_name(&["Containments", &panel_id, "Applets", &id]);
        self.store.set(&applet, "immutability", "1");
        self.store.set(&applet, "plugin", SHOW_DESKTOP_PLUGIN);

        let general = group_name(&["Containments", &panel_id, "General"]);
        if let Some(order) = self.store.get(&general, "AppletOrder") {
            let order = if order.is_empty() {
                id.clone()
            } else {
                format!("{order};{id}")
            };
            self.store.set(&general, "AppletOrder", &order);
        }

        log::info!("added show-desktop applet {id} to panel {panel_id}");
        true
    }

    pub fn sync(&mut self) -> Result<bool> {
        self.store.sync()
    }

    /// Top-level containment groups paired with their `plugin` value.
    fn containments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.store.sections().filter_map(|name| {
            match group_parts(name).as_slice() {
                ["Containments", id] if id.parse::<u32>().is_ok() => {
                    Some((name, self.store.get(name, "plugin").unwrap_or_default()))
                }
                _ => None,
            }
        })
    }

    fn panel_has_show_desktop(&self, panel_id: &str) -> bool {
        self.store.sections().any(|name| {
            matches!(
                group_parts(name).as_slice(),
                ["Containments", c, "Applets", _] if *c == panel_id
            ) && self.store.get(name, "plugin") == Some(SHOW_DESKTOP_PLUGIN)
        })
    }

    /// One past the largest containment or applet id in the file, `None`
    /// once ids are exhausted.
    fn next_id(&self) -> Option<u32> {
        self.store
            .sections()
            .flat_map(|name| {
                let parts = group_parts(name);
                let containment = match parts.as_slice() {
                    ["Containments", c, ..] => c.parse::<u32>().ok(),
                    _ => None,
                };
                let applet = match parts.as_slice() {
                    ["Containments", _, "Applets", a, ..] => a.parse::<u32>().ok(),
                    _ => None,
                };
                containment.into_iter().chain(applet)
            })
            .max()
            .map_or(Some(1), |max| max.checked_add(1))
    }
}
