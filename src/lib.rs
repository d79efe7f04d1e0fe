//! Rename episode thumbnail images so they share the base name of their video file.
//!
//! Images and videos are paired per directory by the season and episode marker in their
//! file names, for example `S01E02`. A matched image is then renamed to the video's file
//! stem plus its own extension so media players pick it up as the episode thumbnail.

pub mod config;
pub mod episode;
pub mod rename;

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::{ColoredString, Colorize};

pub use config::{Config, MatchRules};
pub use episode::SeasonEpisode;
pub use rename::{RenamePlan, RunStats, ThumbRename};

/// Divider width used when the terminal size is not available.
const DEFAULT_DIVIDER_WIDTH: usize = 80;

/// Format bool value as a coloured string.
#[must_use]
pub fn colorize_bool(value: bool) -> ColoredString {
    if value { "true".green() } else { "false".red() }
}

/// Resolve the given input directory to an absolute path.
///
/// If `path` is `None` or empty, the current working directory is used.
/// Returns an error if the path does not exist or is not accessible.
///
/// ```rust
/// use std::path::Path;
/// use thumb_rename::resolve_input_path;
///
/// let absolute_path = resolve_input_path(Some(Path::new("src"))).unwrap();
/// assert!(absolute_path.is_absolute());
/// ```
pub fn resolve_input_path(path: Option<&Path>) -> Result<PathBuf> {
    let input_path = path.map(|p| path_to_string(p).trim().to_string()).unwrap_or_default();

    let filepath = if input_path.is_empty() {
        env::current_dir().context("Failed to get current working directory")?
    } else {
        PathBuf::from(input_path)
    };
    if !filepath.exists() {
        anyhow::bail!(
            "Input path does not exist or is not accessible: '{}'",
            filepath.display()
        );
    }

    dunce::canonicalize(&filepath).with_context(|| format!("Failed to resolve path: '{}'", filepath.display()))
}

/// Convert `OsStr` to String with invalid Unicode handling.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to string with invalid Unicode handling.
pub fn path_to_string(path: &Path) -> String {
    path.to_str().map_or_else(
        || path.to_string_lossy().to_string().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

/// Build a divider line of the given character spanning `width` columns.
#[must_use]
pub fn format_divider(character: char, width: usize) -> String {
    std::iter::repeat_n(character, width).collect()
}

/// Print a full terminal width divider surrounded by empty lines.
pub fn print_divider(character: char) {
    let width = crossterm::terminal::size().map_or(DEFAULT_DIVIDER_WIDTH, |(columns, _)| usize::from(columns));
    let width = if width == 0 { DEFAULT_DIVIDER_WIDTH } else { width };
    println!("{}", format!("\n{}\n", format_divider(character, width)).blue());
}

/// Generate a shell completion script for the given shell.
pub fn generate_shell_completion(shell: Shell, mut command: Command, install: bool, command_name: &str) -> Result<()> {
    if install {
        let out_dir = get_shell_completion_dir(shell, command_name)?;
        let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
        println!("Completion file generated to: {}", path.display());
    } else {
        clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
    }
    Ok(())
}

/// Determine the appropriate directory for storing shell completions.
///
/// Uses the user-specific directory if it exists, then the global one.
/// If neither exist, creates and uses the user-specific dir.
fn get_shell_completion_dir(shell: Shell, name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;

    // oh-my-zsh loads completions from a custom plugin directory
    if shell == Shell::Zsh {
        let omz_plugins = home.join(".oh-my-zsh/custom/plugins");
        if omz_plugins.exists() {
            let plugin_dir = omz_plugins.join(name);
            std::fs::create_dir_all(&plugin_dir)
                .with_context(|| format!("Failed to create directory: {}", plugin_dir.display()))?;
            return Ok(plugin_dir);
        }
    }

    let user_dir = match shell {
        Shell::PowerShell => {
            if cfg!(windows) {
                home.join(r"Documents\PowerShell\completions")
            } else {
                home.join(".config/powershell/completions")
            }
        }
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Elvish => home.join(".elvish"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::Zsh => home.join(".zsh/completions"),
        _ => anyhow::bail!("Unsupported shell"),
    };

    if user_dir.exists() {
        return Ok(user_dir);
    }

    let global_dir = match shell {
        Shell::Bash => Some(PathBuf::from("/etc/bash_completion.d")),
        Shell::Fish => Some(PathBuf::from("/usr/share/fish/completions")),
        Shell::Zsh => Some(PathBuf::from("/usr/share/zsh/site-functions")),
        _ => None,
    };

    if let Some(global_dir) = global_dir.filter(|dir| dir.exists()) {
        return Ok(global_dir);
    }

    std::fs::create_dir_all(&user_dir)
        .with_context(|| format!("Failed to create directory: {}", user_dir.display()))?;
    Ok(user_dir)
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn resolve_input_path_valid() {
        let dir = tempdir().expect("temp dir");
        let resolved = resolve_input_path(Some(dir.path())).expect("should resolve");
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }

    #[test]
    fn resolve_input_path_nonexistent() {
        let resolved = resolve_input_path(Some(Path::new("nonexistent-directory-for-test")));
        assert!(resolved.is_err());
    }

    #[test]
    fn resolve_input_path_empty_uses_current_dir() {
        let resolved = resolve_input_path(Some(Path::new("  \n"))).expect("should resolve");
        let current = dunce::canonicalize(env::current_dir().expect("cwd")).expect("canonical cwd");
        assert_eq!(resolved, current);
    }

    #[test]
    fn resolve_input_path_default_uses_current_dir() {
        let resolved = resolve_input_path(None).expect("should resolve");
        let current = dunce::canonicalize(env::current_dir().expect("cwd")).expect("canonical cwd");
        assert_eq!(resolved, current);
    }

    #[test]
    fn resolve_input_path_relative_becomes_absolute() {
        let resolved = resolve_input_path(Some(Path::new("./"))).expect("should resolve");
        assert!(resolved.is_absolute());
    }

    #[test]
    fn format_divider_repeats_character() {
        assert_eq!(format_divider('=', 5), "=====");
        assert_eq!(format_divider('-', 0), "");
    }

    #[test]
    fn path_to_string_keeps_valid_unicode() {
        assert_eq!(path_to_string(Path::new("Sarja/Jakso.S01E01.mkv")), "Sarja/Jakso.S01E01.mkv");
        assert_eq!(os_str_to_string(OsStr::new("kansi ä.jpg")), "kansi ä.jpg");
    }
}
