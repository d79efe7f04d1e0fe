//! Configuration: user config file, file matching rules, and the final merged config.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::{fmt, fs};

use anyhow::Context;
use itertools::Itertools;
use serde::Deserialize;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Entry names that are never classified or descended into.
pub const DEFAULT_IGNORED_NAMES: [&str; 3] = [".git", "node_modules", "@eaDir"];

/// Image file extensions including the leading dot.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".tbn"];

/// Video file extensions including the leading dot.
pub const DEFAULT_VIDEO_EXTENSIONS: [&str; 5] = [".mp4", ".mkv", ".m4v", ".avi", ".mov"];

/// Path to the user config file: `$HOME/.config/thumb-rename.toml`
///
/// `None` if the home directory cannot be determined.
static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
});

/// Get the user config file path if the home directory is known.
#[must_use]
pub fn config_path() -> Option<&'static Path> {
    CONFIG_PATH.as_deref()
}

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct ThumbRenameConfig {
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub image_extensions: Vec<String>,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub video_extensions: Vec<String>,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    thumb_rename: ThumbRenameConfig,
}

/// Options given on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOptions {
    pub dryrun: bool,
    pub ignore: Vec<String>,
    pub overwrite: bool,
    pub verbose: bool,
}

/// Which entries get skipped, and which count as images or videos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    pub ignored_names: BTreeSet<String>,
    pub image_extensions: BTreeSet<String>,
    pub video_extensions: BTreeSet<String>,
}

/// Final config combined from CLI arguments and user config file.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub dryrun: bool,
    pub overwrite: bool,
    pub rules: MatchRules,
    pub verbose: bool,
}

impl ThumbRenameConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.thumb_rename)
            .context("Failed to parse thumb_rename config TOML")
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            ignored_names: DEFAULT_IGNORED_NAMES.iter().map(ToString::to_string).collect(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(ToString::to_string).collect(),
            video_extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl MatchRules {
    /// Build rules from user given values.
    ///
    /// Extra ignored names are added to the defaults.
    /// Non-empty extension lists replace the defaults.
    #[must_use]
    pub fn from_lists(ignore: &[String], image_extensions: &[String], video_extensions: &[String]) -> Self {
        let mut rules = Self::default();
        rules.ignored_names.extend(
            ignore
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(ToString::to_string),
        );
        let image_extensions = normalize_extensions(image_extensions);
        if !image_extensions.is_empty() {
            rules.image_extensions = image_extensions;
        }
        let video_extensions = normalize_extensions(video_extensions);
        if !video_extensions.is_empty() {
            rules.video_extensions = video_extensions;
        }
        rules
    }

    /// Exact, case-sensitive match against the ignore list.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_names.contains(name)
    }

    #[must_use]
    pub fn is_image(&self, name: &str) -> bool {
        dotted_extension(name).is_some_and(|extension| self.image_extensions.contains(extension))
    }

    #[must_use]
    pub fn is_video(&self, name: &str) -> bool {
        dotted_extension(name).is_some_and(|extension| self.video_extensions.contains(extension))
    }
}

impl Config {
    /// Create config from given command line options and the user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed.
    pub fn from_options(options: CliOptions) -> anyhow::Result<Self> {
        let user_config = ThumbRenameConfig::get_user_config()?;
        Ok(Self::merge(options, user_config))
    }

    /// Combine command line options with values from the user config file.
    #[must_use]
    pub fn merge(options: CliOptions, user_config: ThumbRenameConfig) -> Self {
        let ignore: Vec<String> = user_config.ignore.into_iter().chain(options.ignore).unique().collect();
        let rules = MatchRules::from_lists(
            &ignore,
            &user_config.image_extensions,
            &user_config.video_extensions,
        );

        Self {
            dryrun: options.dryrun || user_config.dryrun,
            overwrite: options.overwrite || user_config.overwrite,
            rules,
            verbose: options.verbose || user_config.verbose,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  dryrun:    {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  overwrite: {}", crate::colorize_bool(self.overwrite))?;
        writeln!(f, "  verbose:   {}", crate::colorize_bool(self.verbose))?;
        writeln!(f, "  ignore:    [{}]", self.rules.ignored_names.iter().join(", "))?;
        writeln!(f, "  images:    [{}]", self.rules.image_extensions.iter().join(", "))?;
        write!(f, "  videos:    [{}]", self.rules.video_extensions.iter().join(", "))
    }
}

/// Get the final extension of a file name including the leading dot.
///
/// A name whose only dot is the first character, like `.jpg`, has no extension.
///
/// ```rust
/// use thumb_rename::config::dotted_extension;
///
/// assert_eq!(dotted_extension("Show.S01E01.mkv"), Some(".mkv"));
/// assert_eq!(dotted_extension(".jpg"), None);
/// assert_eq!(dotted_extension("README"), None);
/// ```
#[must_use]
pub fn dotted_extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(index) => Some(&name[index..]),
    }
}

/// Trim extensions and make sure each one starts with a dot.
fn normalize_extensions(extensions: &[String]) -> BTreeSet<String> {
    extensions
        .iter()
        .map(|extension| extension.trim())
        .filter(|extension| !extension.is_empty() && *extension != ".")
        .map(|extension| {
            if extension.starts_with('.') {
                extension.to_string()
            } else {
                format!(".{extension}")
            }
        })
        .collect()
}


#[cfg(test)]
mod match_rules_tests {
    use super::*;

    #[test]
    fn default_rules_match_known_types() {
        let rules = MatchRules::default();
        assert!(rules.is_image("cover_s01e02.png"));
        assert!(rules.is_image("a.tbn"));
        assert!(rules.is_image("a.jpeg"));
        assert!(rules.is_video("Show.S01E02.mp4"));
        assert!(rules.is_video("Show.m4v"));
        assert!(!rules.is_image("Show.S01E02.mp4"));
        assert!(!rules.is_video("cover.jpg"));
        assert!(!rules.is_video("subtitles.srt"));
        assert!(!rules.is_image("subtitles.srt"));
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let rules = MatchRules::default();
        assert!(!rules.is_image("COVER.JPG"));
        assert!(!rules.is_video("SHOW.MKV"));
    }

    #[test]
    fn only_final_extension_counts() {
        let rules = MatchRules::default();
        assert!(!rules.is_image("cover.jpg.bak"));
        assert!(rules.is_video("Show.jpg.mkv"));
    }

    #[test]
    fn dotfile_without_extension_is_not_classified() {
        let rules = MatchRules::default();
        assert!(!rules.is_image(".jpg"));
        assert!(!rules.is_video(".mkv"));
    }

    #[test]
    fn default_ignored_names() {
        let rules = MatchRules::default();
        assert!(rules.is_ignored(".git"));
        assert!(rules.is_ignored("node_modules"));
        assert!(rules.is_ignored("@eaDir"));
        assert!(!rules.is_ignored(".Git"));
        assert!(!rules.is_ignored("Season 1"));
    }

    #[test]
    fn from_lists_adds_ignored_names_and_replaces_extensions() {
        let rules = MatchRules::from_lists(
            &["Extras".to_string(), "  ".to_string()],
            &["webp".to_string(), " .jpg ".to_string()],
            &[],
        );
        assert!(rules.is_ignored("Extras"));
        assert!(rules.is_ignored(".git"));
        assert_eq!(rules.ignored_names.len(), 4);
        assert!(rules.is_image("a.webp"));
        assert!(rules.is_image("a.jpg"));
        assert!(!rules.is_image("a.png"));
        assert_eq!(rules.video_extensions, MatchRules::default().video_extensions);
    }

    #[test]
    fn dotted_extension_edge_cases() {
        assert_eq!(dotted_extension("a.b.c"), Some(".c"));
        assert_eq!(dotted_extension("trailing."), Some("."));
        assert_eq!(dotted_extension("..jpg"), Some(".jpg"));
        assert_eq!(dotted_extension(""), None);
    }
}
