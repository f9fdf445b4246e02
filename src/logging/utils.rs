//! Log file location and ANSI stripping.
use std::env;
use std::fs;
use std::path::PathBuf;

/// Remove terminal escape sequences from `s`.
///
/// CSI sequences (`ESC [` up to a final byte in `@`..=`~`) are dropped whole;
/// any other escape drops itself and the character after it.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some((plain, escape)) = rest.split_once('\x1b') {
        out.push_str(plain);
        let mut chars = escape.chars();
        if chars.next() == Some('[') {
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        rest = chars.as_str();
    }
    out.push_str(rest);
    out
}

/// `$XDG_CACHE_HOME/storage-linker`, falling back to `~/.cache` and then the
/// working directory. Created on demand.
fn log_dir() -> Option<PathBuf> {
    let cache = env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env::var_os("HOME")
                .or_else(|| env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })
        .unwrap_or_else(|| PathBuf::from(".cache"));
    let dir = cache.join("storage-linker");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Path of the log file for `command`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(log_dir()?.join(format!("{command}.log")))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m hello"), "ERROR hello");
        assert_eq!(strip_ansi("no codes here"), "no codes here");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mstage\x1b[0m"),
            "==> stage"
        );
    }

    #[test]
    fn strip_ansi_handles_csi_sequences() {
        assert_eq!(strip_ansi("\x1b[2;5Htext"), "text");
        assert_eq!(strip_ansi("\x1b[Kworld"), "world");
        assert_eq!(strip_ansi("\x1bMtext"), "text");
    }

    #[test]
    fn strip_ansi_empty_string() {
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn log_file_path_names_the_command() {
        let _lock = crate::logging::TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let tmp = tempfile::tempdir().unwrap();
        // SAFETY: Protected by TEST_ENV_MUTEX; removed before the lock is released.
        #[allow(unsafe_code)]
        unsafe {
            env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("link");
        // SAFETY: Protected by TEST_ENV_MUTEX.
        #[allow(unsafe_code)]
        unsafe {
            env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("storage-linker").join("link.log")));
        assert!(tmp.path().join("storage-linker").is_dir());
    }

    #[test]
    fn strip_ansi_drops_trailing_escape() {
        assert_eq!(strip_ansi("done\x1b"), "done");
        assert_eq!(strip_ansi("half\x1b[31"), "half");
    }
}
