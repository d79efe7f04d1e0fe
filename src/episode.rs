//! Season and episode identifiers parsed from file names.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `s<digits>e<digits>` with an optional whitespace character in between.
static RE_SEASON_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)s(\d+)\s?e(\d+)").expect("Failed to compile season episode regex"));

/// Season and episode number pair, for example `S01E02`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
}

impl SeasonEpisode {
    #[must_use]
    pub const fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }

    /// Extract the first season and episode marker from a file name.
    ///
    /// Returns `None` if there is no marker,
    /// or if the first marker contains a number too large to fit in `u32`.
    ///
    /// ```rust
    /// use thumb_rename::SeasonEpisode;
    ///
    /// assert_eq!(SeasonEpisode::from_filename("Show.S01E02.mkv"), Some(SeasonEpisode::new(1, 2)));
    /// assert_eq!(SeasonEpisode::from_filename("cover s3 e10.jpg"), Some(SeasonEpisode::new(3, 10)));
    /// assert_eq!(SeasonEpisode::from_filename("poster.jpg"), None);
    /// ```
    #[must_use]
    pub fn from_filename(name: &str) -> Option<Self> {
        let captures = RE_SEASON_EPISODE.captures(name)?;
        let season = captures.get(1)?.as_str().parse().ok()?;
        let episode = captures.get(2)?.as_str().parse().ok()?;
        Some(Self { season, episode })
    }

    /// Image index key in the form `season-episode`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.season, self.episode)
    }
}

impl fmt::Display for SeasonEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Season {} Episode {}", self.season, self.episode)
    }
}
