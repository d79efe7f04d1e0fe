//! Pair images with videos by season and episode, and rename the images to match.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use itertools::Itertools;

use crate::config::Config;
use crate::episode::SeasonEpisode;
use crate::{print_error, print_warning};

/// Processes a directory tree and renames episode images after their video file.
#[derive(Debug)]
pub struct ThumbRename {
    root: PathBuf,
    config: Config,
    stats: RunStats,
}

/// Planned rename of one image for one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub identifier: SeasonEpisode,
    pub image_path: PathBuf,
    pub new_image_name: String,
    pub new_image_path: PathBuf,
    /// Image already has the target name.
    pub would_skip: bool,
    /// New name differs from the old one only by letter case.
    pub capitalization_change_only: bool,
}

/// What happened to a single video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOutcome {
    NoIdentifier,
    NoImage,
    AlreadyNamed,
    WouldRename,
    Renamed,
    Failed,
}

/// Counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub directories: usize,
    pub renamed: usize,
    pub would_rename: usize,
    pub already_named: usize,
    pub no_identifier: usize,
    pub no_image: usize,
    pub images_without_identifier: usize,
    /// Failed or refused renames.
    pub failed: usize,
    /// Entries or subdirectories that could not be read.
    pub errors: usize,
}

impl ThumbRename {
    #[must_use]
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self {
            root,
            config,
            stats: RunStats::default(),
        }
    }

    /// Statistics collected so far.
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }

    /// Process the whole tree starting from the root directory.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory or cannot be listed.
    /// Failures below the root are reported and counted instead.
    pub fn run(&mut self) -> Result<RunStats> {
        if self.config.verbose {
            println!("{}", self.config);
            println!("Root: {}", self.root.display());
        }
        if !self.root.is_dir() {
            anyhow::bail!("Input path is not a directory: '{}'", self.root.display());
        }

        let root = self.root.clone();
        self.process_directory(&root)?;
        self.print_summary();
        Ok(self.stats)
    }

    /// Process subdirectories first, then pair and rename the images in this directory.
    ///
    /// # Errors
    /// Returns an error if `directory` itself cannot be listed.
    /// Errors from subdirectories and single entries are reported and skipped.
    pub fn process_directory(&mut self, directory: &Path) -> Result<()> {
        crate::print_divider('=');
        println!("{}", format!("Processing directory: {}", directory.display()).blue().bold());

        let entries = self.list_directory(directory)?;
        self.stats.directories += 1;

        for name in &entries {
            let path = directory.join(name);
            match fs::symlink_metadata(&path) {
                Ok(metadata) if metadata.is_dir() => {
                    if let Err(error) = self.process_directory(&path) {
                        print_error!("Failed to process directory {}: {error:#}", path.display());
                        self.stats.errors += 1;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    print_error!("Failed to read file type for {}: {error}", path.display());
                    self.stats.errors += 1;
                }
            }
        }

        let names: Vec<&str> = entries
            .iter()
            .filter_map(|name| {
                let utf8_name = name.to_str();
                if utf8_name.is_none() {
                    print_warning!(
                        "Skipping name with invalid unicode: {}",
                        crate::os_str_to_string(name)
                    );
                }
                utf8_name
            })
            .collect();

        let videos: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.config.rules.is_video(name))
            .collect();

        let images: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| self.config.rules.is_image(name))
            .collect();

        if self.config.verbose {
            println!("videos: [{}]", videos.iter().join(", "));
            println!("images: [{}]", images.iter().join(", "));
        }

        let image_index = self.index_images(&images);

        for video in videos {
            crate::print_divider('-');
            let outcome = self.process_video(directory, video, &image_index);
            self.stats.record(outcome);
        }

        Ok(())
    }

    /// List the entry names of a directory, excluding ignored names.
    ///
    /// Names are sorted so processing order does not depend on the filesystem.
    fn list_directory(&self, directory: &Path) -> Result<Vec<OsString>> {
        let mut entries = Vec::new();
        for entry in
            fs::read_dir(directory).with_context(|| format!("Failed to read directory: {}", directory.display()))?
        {
            let entry = entry.with_context(|| format!("Failed to read directory entry in: {}", directory.display()))?;
            let name = entry.file_name();
            if name.to_str().is_some_and(|name| self.config.rules.is_ignored(name)) {
                continue;
            }
            entries.push(name);
        }
        entries.sort_unstable();

        if self.config.verbose {
            println!(
                "contents: [{}]",
                entries.iter().map(|name| crate::os_str_to_string(name)).join(", ")
            );
        }

        Ok(entries)
    }

    /// Map `season-episode` keys to image names.
    ///
    /// A later image with the same key replaces the earlier one.
    pub fn index_images<'a>(&mut self, images: &[&'a str]) -> HashMap<String, &'a str> {
        let mut index = HashMap::new();
        for image in images {
            let Some(identifier) = SeasonEpisode::from_filename(image) else {
                if self.config.verbose {
                    println!("{}", format!("No season and episode found for {image}").red().bold());
                }
                self.stats.images_without_identifier += 1;
                continue;
            };
            index.insert(identifier.key(), *image);
        }
        index
    }

    /// Find the image for a video and rename it, or report why not.
    fn process_video(&self, directory: &Path, video: &str, image_index: &HashMap<String, &str>) -> VideoOutcome {
        let Some(identifier) = SeasonEpisode::from_filename(video) else {
            println!("No season and episode found for {video}");
            return VideoOutcome::NoIdentifier;
        };

        let Some(image) = image_index.get(&identifier.key()) else {
            println!("No image found for {}", video.yellow().bold());
            return VideoOutcome::NoImage;
        };

        let plan = Self::plan_rename(directory, video, image, identifier);
        if self.config.verbose {
            println!("newImageName: {}", plan.new_image_name);
            println!("imagePath: {}", plan.image_path.display());
            println!("newImagePath: {}", plan.new_image_path.display());
        }

        if plan.would_skip {
            if self.config.dryrun {
                println!("{}", "Would skip:".cyan().bold());
                println!("  {}", plan.image_path.display().to_string().yellow().bold());
                println!("  as it is already named correctly.");
            } else {
                println!(
                    "Skipping {} as it is already named correctly.",
                    plan.image_path.display().to_string().yellow().bold()
                );
            }
            return VideoOutcome::AlreadyNamed;
        }

        if self.config.dryrun {
            if self.is_refused(&plan) {
                print_warning!(
                    "Would refuse to rename \"{}\" to \"{}\": target already exists",
                    plan.image_path.display(),
                    plan.new_image_path.display()
                );
                return VideoOutcome::Failed;
            }
            println!(
                "{} {}:",
                "Would rename file for".cyan().bold(),
                identifier.to_string().underline()
            );
            println!("  OLD: {}", plan.image_path.display().to_string().yellow().bold());
            println!("  NEW: {}", plan.new_image_path.display().to_string().blue().bold());
            return VideoOutcome::WouldRename;
        }

        match self.apply(&plan) {
            Ok(()) => {
                println!("{}", "Renamed:".green().bold());
                println!("  {}", plan.image_path.display().to_string().yellow().bold());
                println!("  to");
                println!("  {}", plan.new_image_path.display().to_string().yellow().bold());
                VideoOutcome::Renamed
            }
            Err(error) => {
                print_error!("{error:#}");
                VideoOutcome::Failed
            }
        }
    }

    /// Compute the new image name from the video base name and the image extension.
    ///
    /// ```rust
    /// use std::path::Path;
    /// use thumb_rename::{SeasonEpisode, ThumbRename};
    ///
    /// let plan = ThumbRename::plan_rename(
    ///     Path::new("/tv/Show"),
    ///     "Show.S01E02.mp4",
    ///     "cover_s01e02.png",
    ///     SeasonEpisode::new(1, 2),
    /// );
    /// assert_eq!(plan.new_image_name, "Show.S01E02.png");
    /// assert_eq!(plan.new_image_path, Path::new("/tv/Show/Show.S01E02.png"));
    /// assert!(!plan.would_skip);
    /// ```
    #[must_use]
    pub fn plan_rename(directory: &Path, video: &str, image: &str, identifier: SeasonEpisode) -> RenamePlan {
        // A name without a dot uses the whole name for both parts
        let image_extension = image.rsplit_once('.').map_or(image, |(_, extension)| extension);
        let video_base_name = video.rsplit_once('.').map_or(video, |(base, _)| base);
        let new_image_name = format!("{video_base_name}.{image_extension}");

        let image_path = directory.join(image);
        let new_image_path = directory.join(&new_image_name);
        let would_skip = image_path == new_image_path;
        let capitalization_change_only = !would_skip && new_image_name.to_lowercase() == image.to_lowercase();

        RenamePlan {
            identifier,
            image_path,
            new_image_name,
            new_image_path,
            would_skip,
            capitalization_change_only,
        }
    }

    /// Apply mode refuses to replace an existing file unless overwrite is enabled.
    fn is_refused(&self, plan: &RenamePlan) -> bool {
        !self.config.overwrite && Self::target_exists(plan)
    }

    /// Check if another file already has the new name.
    ///
    /// On case-insensitive file systems a capitalization change finds the image itself,
    /// so those compare against the exact names in the directory listing instead.
    fn target_exists(plan: &RenamePlan) -> bool {
        if !plan.capitalization_change_only {
            return fs::symlink_metadata(&plan.new_image_path).is_ok();
        }
        let Some(directory) = plan.new_image_path.parent() else {
            return false;
        };
        fs::read_dir(directory).is_ok_and(|entries| {
            entries
                .filter_map(std::result::Result::ok)
                .any(|entry| entry.file_name().to_str() == Some(plan.new_image_name.as_str()))
        })
    }

    /// Rename the image on disk.
    fn apply(&self, plan: &RenamePlan) -> Result<()> {
        if self.is_refused(plan) {
            anyhow::bail!(
                "Failed to rename \"{}\" to \"{}\": target already exists",
                plan.image_path.display(),
                plan.new_image_path.display()
            );
        }

        let result = if plan.capitalization_change_only {
            Self::rename_with_temp_file(&plan.image_path, &plan.new_image_path)
        } else {
            fs::rename(&plan.image_path, &plan.new_image_path)
        };

        result.with_context(|| {
            format!(
                "Failed to rename \"{}\" to \"{}\"",
                plan.image_path.display(),
                plan.new_image_path.display()
            )
        })
    }

    /// Rename a file with an intermediate temp file to work around case-insensitive file systems.
    fn rename_with_temp_file(path: &Path, new_path: &Path) -> std::io::Result<()> {
        let mut temp_name = new_path.as_os_str().to_os_string();
        temp_name.push(".tmp");
        let temp_file = PathBuf::from(temp_name);
        fs::rename(path, &temp_file)?;
        fs::rename(&temp_file, new_path)
    }

    fn print_summary(&self) {
        crate::print_divider('=');
        if self.config.dryrun {
            println!("{}", format!("Dryrun: {}", self.stats).cyan().bold());
        } else {
            println!("{}", format!("Finished: {}", self.stats).green().bold());
        }
    }
}

impl RunStats {
    fn record(&mut self, outcome: VideoOutcome) {
        match outcome {
            VideoOutcome::NoIdentifier => self.no_identifier += 1,
            VideoOutcome::NoImage => self.no_image += 1,
            VideoOutcome::AlreadyNamed => self.already_named += 1,
            VideoOutcome::WouldRename => self.would_rename += 1,
            VideoOutcome::Renamed => self.renamed += 1,
            VideoOutcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.would_rename > 0 {
            write!(f, "would rename {}, ", self.would_rename)?;
        }
        write!(
            f,
            "{} renamed, {} already named, {} without image, {} without season and episode, {} failed",
            self.renamed, self.already_named, self.no_image, self.no_identifier, self.failed
        )?;
        if self.errors > 0 {
            write!(f, ", {} unreadable", self.errors)?;
        }
        write!(
            f,
            " ({} {})",
            self.directories,
            if self.directories == 1 { "directory" } else { "directories" }
        )
    }
}
