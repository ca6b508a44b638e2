//! Nudge the running shell so it picks up freshly written config.

use std::{
    io,
    process::{Command, Stdio},
};

/// Spawns external commands. Callers treat every launch as best-effort.
pub trait Launcher {
    fn launch(&self, program: &str, args: &[&str]) -> io::Result<()>;
}

/// Fire-and-forget launcher: null stdio, never waits for the child.
#[derive(Debug, Default)]
pub struct Detached;

impl Launcher for Detached {
    fn launch(&self, program: &str, args: &[&str]) -> io::Result<()> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }
}

pub const WINDOW_MANAGER: &str = "kwin_x11";
pub const CURSOR_APPLY: &str = "plasma-apply-cursortheme";

/// Replace the running window manager so it reloads its decoration plugin.
pub fn restart_window_manager(launcher: &dyn Launcher) -> Option<String> {
    best_effort(launcher, WINDOW_MANAGER, &["--replace"])
}

/// Apply a cursor theme live; nothing is written to a config store.
pub fn apply_cursor_theme(launcher: &dyn Launcher, theme: &str) -> Option<String> {
    best_effort(launcher, CURSOR_APPLY, &[theme])
}

/// Launch and log. Returns the command line on success.
fn best_effort(launcher: &dyn Launcher, program: &str, args: &[&str]) -> Option<String> {
    let line = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    match launcher.launch(program, args) {
        Ok(()) => {
            log::info!("launched `{line}`");
            Some(line)
        }
        Err(e) => {
            log::warn!("could not launch `{line}`: {e}");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Launcher;
    use std::{cell::RefCell, io};

    /// Records launches instead of spawning anything.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub calls: RefCell<Vec<Vec<String>>>,
        pub fail: bool,
    }

    impl Launcher for Recorder {
        fn launch(&self, program: &str, args: &[&str]) -> io::Result<()> {
            let mut call = vec![program.to_owned()];
            call.extend(args.iter().map(|a| (*a).to_owned()));
            self.calls.borrow_mut().push(call);
            if self.fail {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such program"))
            } else {
                Ok(())
            }
        }
    }
}
