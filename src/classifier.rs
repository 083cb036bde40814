use anyhow::Result;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// An `S..E..` code found inside a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeTag {
    pub season: u32,
    pub episode: u32,
}

/// Text-pattern extraction of season, disc and episode numbers from names.
///
/// All lookups are pure: a name that does not match simply yields `None`.
#[derive(Debug)]
pub struct PathClassifier {
    season_pattern: Regex,
    disc_pattern: Regex,
    combined_pattern: Regex,
    episode_pattern: Regex,
}

impl PathClassifier {
    pub fn new() -> Result<Self> {
        let season_pattern = Regex::new(r"(?i)(?:season|staffel|s)[_.\-\s]?(?P<season>\d+)")?;
        let disc_pattern = Regex::new(r"(?i)(?:disc|disk|dvd|d)[_.\-\s]?(?P<disc>\d+)")?;
        let combined_pattern = Regex::new(r"(?i)s(?P<season>\d+)d(?P<disc>\d+)")?;
        // Only the S/E letters are case-insensitive here.
        let episode_pattern = Regex::new(r"[sS](?P<season>\d+)[eE](?P<episode>\d+)")?;

        Ok(Self {
            season_pattern,
            disc_pattern,
            combined_pattern,
            episode_pattern,
        })
    }

    /// Season number from a folder name such as `Season 2`, `Staffel_3` or `S04`.
    pub fn season_number(&self, name: &str) -> Option<u32> {
        let season = self
            .season_pattern
            .captures(name)
            .and_then(|captures| parse_group(&captures, "season"));
        debug!(name, ?season, "season lookup");
        season
    }

    /// Disc number from a folder name, ignoring the `s<season>` token so
    /// that `S2D1` in season 2 reads as disc 1 rather than disc 2.
    pub fn disc_number(&self, name: &str, season: u32) -> Option<u32> {
        let season_token = RegexBuilder::new(&format!("s{season}"))
            .case_insensitive(true)
            .build()
            .ok()?;
        let stripped = season_token.replace_all(name, "");

        if let Some(captures) = self.disc_pattern.captures(&stripped) {
            let disc = parse_group(&captures, "disc");
            debug!(name, season, ?disc, "disc lookup");
            return disc;
        }

        let disc = self
            .combined_pattern
            .captures(name)
            .filter(|captures| parse_group(captures, "season") == Some(season))
            .and_then(|captures| parse_group(&captures, "disc"));
        debug!(name, season, ?disc, "disc lookup (combined pattern)");
        disc
    }

    /// Episode number from an `S<digits>E<digits>` code anywhere in the name.
    /// The season digits are not checked against anything.
    pub fn explicit_episode(&self, name: &str) -> Option<u32> {
        self.explicit_tag(name).map(|tag| tag.episode)
    }

    /// Season and episode of the first `S<digits>E<digits>` code in the name.
    pub fn explicit_tag(&self, name: &str) -> Option<EpisodeTag> {
        let captures = self.episode_pattern.captures(name)?;
        Some(EpisodeTag {
            season: parse_group(&captures, "season")?,
            episode: parse_group(&captures, "episode")?,
        })
    }
}

fn parse_group(captures: &regex::Captures<'_>, group: &str) -> Option<u32> {
    captures.name(group)?.as_str().parse().ok()
}
