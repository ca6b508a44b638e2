//! Line-preserving parser for KDE-style INI files.

/// One line inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `key=value`, both sides trimmed. `raw` holds the line as read and is
    /// cleared once the value changes.
    Entry {
        key: String,
        value: String,
        raw: Option<String>,
    },
    /// Comments, blank lines, anything without `=`. Emitted verbatim.
    Raw(String),
}

impl Line {
    pub fn entry(key: &str, value: &str) -> Self {
        Line::Entry {
            key: key.to_owned(),
            value: value.to_owned(),
            raw: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Raw(s) if s.trim().is_empty())
    }
}

/// A `[group]` and the lines below it up to the next header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub name: String,
    /// Header line as read; `None` for new groups and the root group.
    pub header: Option<String>,
    pub lines: Vec<Line>,
}

/// A parsed file. The first group always has an empty name and holds
/// whatever precedes the first header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub groups: Vec<Group>,
    /// Line terminator of the source, reused for every line on render.
    pub eol: &'static str,
}

/// Parse `input`. Never fails; malformed lines become [`Line::Raw`].
///
/// Nested KDE groups such as `[Containments][1][Applets][4]` are kept as one
/// name with the outer brackets stripped: `Containments][1][Applets][4`.
/// A header repeated later in the file continues the first group of that
/// name, as KConfig reads it.
pub fn parse(input: &str) -> Document {
    let eol = if input.contains("\r\n") { "\r\n" } else { "\n" };
    let mut groups = vec![Group::default()];
    // `None` while inside a repeated header.
    let mut current = Some(0);
    // Lines of a repeated group, spliced into the first occurrence at the end.
    let mut folded: Vec<(usize, Vec<Line>)> = Vec::new();

    for raw in input.lines() {
        let line = raw.trim();

        if let Some(name) = header(line) {
            match groups.iter().position(|g| g.name == name) {
                Some(first) => {
                    folded.push((first, Vec::new()));
                    current = None;
                }
                None => {
                    groups.push(Group {
                        name: name.to_owned(),
                        header: Some(raw.to_owned()),
                        lines: Vec::new(),
                    });
                    current = Some(groups.len() - 1);
                }
            }
            continue;
        }

        let parsed = match line.split_once('=') {
            Some((key, value)) if !is_comment(line) && !key.trim().is_empty() => Line::Entry {
                key: key.trim().to_owned(),
                value: value.trim().to_owned(),
                raw: Some(raw.to_owned()),
            },
            _ => Line::Raw(raw.to_owned()),
        };

        match (current, folded.last_mut()) {
            (Some(i), _) => groups[i].lines.push(parsed),
            (None, Some((_, lines))) => lines.push(parsed),
            (None, None) => {}
        }
    }

    for (first, mut lines) in folded {
        while lines.last().is_some_and(Line::is_blank) {
            lines.pop();
        }
        let target = &mut groups[first].lines;
        let at = target
            .iter()
            .rposition(|l| !l.is_blank())
            .map_or(0, |i| i + 1);
        let tail = target.split_off(at);
        target.extend(lines);
        target.extend(tail);
    }

    Document { groups, eol }
}

/// Serialize back to text. Root group lines come first, without a header.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();

    for group in &doc.groups {
        if !group.name.is_empty() {
            match &group.header {
                Some(h) => out.push_str(h),
                None => {
                    out.push('[');
                    out.push_str(&group.name);
                    out.push(']');
                }
            }
            out.push_str(doc.eol);
        }
        for line in &group.lines {
            match line {
                Line::Entry { raw: Some(r), .. } => out.push_str(r),
                Line::Entry { key, value, .. } => {
                    out.push_str(key);
                    out.push('=');
                    out.push_str(value);
                }
                Line::Raw(s) => out.push_str(s),
            }
            out.push_str(doc.eol);
        }
    }

    out
}

/// Join nested group components: `["Containments", "1"]` → `Containments][1`.
pub fn group_name(parts: &[&str]) -> String {
    parts.join("][")
}

/// Split a group name into its nested components.
pub fn group_parts(name: &str) -> Vec<&str> {
    name.split("][").collect()
}

fn header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    // `[$i]` and friends are KConfig immutability markers, not groups.
    (!inner.is_empty() && !inner.starts_with('$')).then_some(inner)
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}
