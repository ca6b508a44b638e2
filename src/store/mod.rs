//! Section/key/value config files, read-modify-write.

pub mod parser;

use crate::util;
use anyhow::{Context, Result};
use parser::{Document, Group, Line};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// An INI file loaded into memory. Unrelated groups, keys, comments and
/// ordering are written back untouched by [`IniStore::sync`].
#[derive(Debug)]
pub struct IniStore {
    path: PathBuf,
    doc: Document,
    dirty: bool,
}

impl IniStore {
    /// Load `path`. A missing file opens as an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = match fs::read_to_string(path) {
            Ok(src) => parser::parse(&src),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => parser::parse(""),
            Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
        };

        Ok(Self {
            path: path.to_owned(),
            doc,
            dirty: false,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.group(group)?.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Set `group/key`. Creates the group at the end of the file if needed.
    /// The store is only marked dirty when the stored value changes.
    pub fn set(&mut self, group: &str, key: &str, value: &str) {
        let idx = match self.doc.groups.iter().position(|g| g.name == group) {
            Some(i) => i,
            None => self.push_group(group),
        };
        let lines = &mut self.doc.groups[idx].lines;

        for line in lines.iter_mut() {
            if let Line::Entry { key: k, value: v, .. } = line {
                if k == key {
                    if v != value {
                        *line = Line::entry(key, value);
                        self.dirty = true;
                    }
                    return;
                }
            }
        }

        // Insert after the last non-blank line so group separators stay put.
        let at = lines
            .iter()
            .rposition(|l| !l.is_blank())
            .map_or(0, |i| i + 1);
        lines.insert(at, Line::entry(key, value));
        self.dirty = true;
    }

    /// Names of all groups in file order, the root group excluded.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.doc
            .groups
            .iter()
            .map(|g| g.name.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Every `(group, key, value)` in file order. Root-level keys carry an
    /// empty group name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.doc.groups.iter().flat_map(|g| {
            g.lines.iter().filter_map(move |line| match line {
                Line::Entry { key, value, .. } => Some((g.name.as_str(), key.as_str(), value.as_str())),
                Line::Raw(_) => None,
            })
        })
    }

    /// Flush pending changes to disk atomically. Returns whether anything
    /// was written.
    pub fn sync(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        util::write_atomic(&self.path, &parser::render(&self.doc))?;
        self.dirty = false;
        Ok(true)
    }

    fn group(&self, name: &str) -> Option<&Group> {
        self.doc.groups.iter().find(|g| g.name == name)
    }

    fn push_group(&mut self, name: &str) -> usize {
        if name.is_empty() {
            // The root group always exists at index 0.
            return 0;
        }
        let groups = &mut self.doc.groups;
        if let Some(last) = groups.last_mut() {
            if last.lines.last().is_some_and(|l| !l.is_blank()) {
                last.lines.push(Line::Raw(String::new()));
            }
        }
        groups.push(Group {
            name: name.to_owned(),
            header: None,
            lines: Vec::new(),
        });
        groups.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty_and_not_written_until_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kwinrc");
        let mut store = IniStore::open(&path).unwrap();
        assert_eq!(store.entries().count(), 0);
        assert!(!store.sync().unwrap());
        assert!(!path.exists());

        store.set("Desktops", "Number", "3");
        assert!(store.sync().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[Desktops]\nNumber=3\n");
    }

    #[test]
    fn preserves_unrelated_keys_and_comments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kdeglobals");
        fs::write(
            &path,
            "# managed by hand\n[General]\nfixed=Hack,10\n\n[KDE]\nSingleClick=false\n",
        )
        .unwrap();

        let mut store = IniStore::open(&path).unwrap();
        store.set("KDE", "widgetStyle", "breeze");
        store.set("Icons", "Theme", "papirus");
        store.sync().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# managed by hand\n[General]\nfixed=Hack,10\n\n[KDE]\nSingleClick=false\nwidgetStyle=breeze\n\n[Icons]\nTheme=papirus\n"
        );
    }

    #[test]
    fn new_key_lands_before_group_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plasmarc");
        fs::write(&path, "[Theme]\nname=default\n\n[Wallpapers]\nusersWallpapers=\n").unwrap();

        let mut store = IniStore::open(&path).unwrap();
        store.set("Theme", "name", "breeze-dark");
        store.set("Theme", "accent", "none");
        store.sync().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[Theme]\nname=breeze-dark\naccent=none\n\n[Wallpapers]\nusersWallpapers=\n"
        );
    }

    #[test]
    fn setting_same_value_keeps_store_clean() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kwinrc");
        fs::write(&path, "[Desktops]\nNumber=2\n").unwrap();

        let mut store = IniStore::open(&path).unwrap();
        store.set("Desktops", "Number", "2");
        assert!(!store.sync().unwrap());
        store.set("Desktops", "Number", "5");
        assert_eq!(store.get("Desktops", "Number"), Some("5"));
        assert!(store.sync().unwrap());
    }

    #[test]
    fn set_keeps_untouched_lines_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kwinrc");
        fs::write(&path, "[Desktops]\r\nNumber = 2\r\nRows = 2\r\n").unwrap();

        let mut store = IniStore::open(&path).unwrap();
        store.set("Desktops", "Number", "5");
        store.sync().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[Desktops]\r\nNumber=5\r\nRows = 2\r\n"
        );
    }

    #[test]
    fn repeated_group_reads_and_writes_as_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kdeglobals");
        fs::write(&path, "[WM]\na=1\n\n[KDE]\nx=1\n\n[WM]\nb=2\n").unwrap();

        let mut store = IniStore::open(&path).unwrap();
        assert_eq!(store.get("WM", "b"), Some("2"));
        assert_eq!(store.sections().collect::<Vec<_>>(), vec!["WM", "KDE"]);

        store.set("WM", "b", "3");
        store.sync().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[WM]\na=1\nb=3\n\n[KDE]\nx=1\n\n"
        );
    }

    #[test]
    fn entries_walk_groups_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.colors");
        fs::write(&path, "top=1\n[A]\nk=v\n[B:C]\nx=y\n").unwrap();

        let store = IniStore::open(&path).unwrap();
        let all: Vec<_> = store.entries().collect();
        assert_eq!(all, vec![("", "top", "1"), ("A", "k", "v"), ("B:C", "x", "y")]);
        assert_eq!(store.sections().collect::<Vec<_>>(), vec!["A", "B:C"]);
    }
}
