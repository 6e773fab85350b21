//! Article bands
//!
//! The classifier assigns every article to exactly one of three bands.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Classification band of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleBand {
    /// Seminal articles of the topic
    Root,
    /// Articles where the topic took shape
    Trunk,
    /// Recent articles and reviews
    Leaf,
}

impl ArticleBand {
    /// All bands in display order
    pub const ALL: [Self; 3] = [Self::Root, Self::Trunk, Self::Leaf];

    /// Key used in section maps (`root`, `trunk`, `leaf`)
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Trunk => "trunk",
            Self::Leaf => "leaf",
        }
    }

    /// Display title
    #[inline]
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Trunk => "Trunk",
            Self::Leaf => "Leaves",
        }
    }

    /// Short description shown above the band
    #[must_use]
    pub const fn info(self) -> &'static str {
        match self {
            Self::Root => {
                "Here you should find seminal articles from the original articles of \
                 your topic of interest."
            }
            Self::Trunk => {
                "Here you should find articles where your topic of interest got a \
                 structure, these should be the first authors to discover the \
                 applicability of your topic of interest."
            }
            Self::Leaf => {
                "Here you should find recent articles and reviews that should \
                 condense very well your topics."
            }
        }
    }
}

impl Display for ArticleBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleBand {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "root" => Ok(Self::Root),
            "trunk" => Ok(Self::Trunk),
            "leaf" => Ok(Self::Leaf),
            other => Err(UnknownBand(other.to_string())),
        }
    }
}

/// Band name outside `root`, `trunk`, `leaf`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown band: '{0}'")]
pub struct UnknownBand(pub String);

/// Which bands are on screen
///
/// Starts with every band visible. Toggling a band shows only that band;
/// toggling the shown band again shows everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BandFilter {
    shown: Option<ArticleBand>,
}

impl BandFilter {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, band: ArticleBand) {
        self.shown = if self.shown == Some(band) { None } else { Some(band) };
    }

    /// The single band shown, if any
    #[inline]
    #[must_use]
    pub fn shown(&self) -> Option<ArticleBand> {
        self.shown
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self, band: ArticleBand) -> bool {
        self.shown.map_or(true, |shown| shown == band)
    }

    /// Visible bands in display order
    pub fn visible(&self) -> impl Iterator<Item = ArticleBand> + '_ {
        ArticleBand::ALL.into_iter().filter(|band| self.is_visible(*band))
    }
}
