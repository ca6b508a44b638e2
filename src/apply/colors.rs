//! Color scheme import into kdeglobals.

use crate::{ctx::Ctx, store::IniStore, util};
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Escaped `:` left in group names by Qt's INI writer.
const ESCAPED_COLON: &str = "%3A";

/// Find `name` in the color-scheme dirs, user dir first. Absolute paths are
/// taken as-is.
pub fn resolve(ctx: &Ctx, name: &str) -> Result<PathBuf> {
    let direct = Path::new(name);
    if direct.is_absolute() {
        return Ok(direct.to_owned());
    }

    let dirs = ctx.color_scheme_dirs();
    match dirs.iter().map(|d| d.join(name)).find(|p| p.is_file()) {
        Some(p) => Ok(p),
        None => bail!(
            "color scheme '{name}' not found in {}",
            dirs.iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Copy every group/key/value of the scheme at `src` into `dest` verbatim.
/// Returns the number of keys copied.
pub fn copy_scheme(src: &Path, dest: &mut IniStore) -> Result<usize> {
    let meta = fs::metadata(src).with_context(|| format!("stat {}", src.display()))?;
    if !meta.is_file() {
        bail!("color scheme is not a file: {}", src.display());
    }

    let scheme = IniStore::open(src)?;
    let mut copied = 0;
    for (group, key, value) in scheme.entries() {
        log::debug!("{group}/{key} = {value}");
        dest.set(group, key, value);
        copied += 1;
    }
    Ok(copied)
}

/// Rewrite `path` with every `%3A` turned back into `:`. Returns whether the
/// file changed.
pub fn unescape_colons(path: &Path) -> Result<bool> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    if !text.contains(ESCAPED_COLON) {
        return Ok(false);
    }

    util::write_atomic(path, &text.replace(ESCAPED_COLON, ":"))?;
    Ok(true)
}
