//! Data types for the records submitted to MusicBrainz and the outcome of an
//! edit.
//!
//! Records derive `serde` so callers can load them straight from the JSON
//! their importers produce.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ================================================================================================
// RELEASE INPUT
// ================================================================================================

/// An album to be added as a new release.
///
/// # Examples
///
/// ```rust
/// use musicbrainz_edit::{Album, AlbumTrack, Medium};
///
/// let album = Album {
///     source_id: "cdbaby:theartist".to_string(),
///     artist: "The Artist".to_string(),
///     artist_id: None,
///     title: "First Album".to_string(),
///     date: Some("2009-03".to_string()),
///     label: None,
///     barcode: Some("634479123456".to_string()),
///     mediums: vec![Medium {
///         format: "CD".to_string(),
///         position: "1".to_string(),
///         tracks: vec![AlbumTrack {
///             position: "1".to_string(),
///             title: "Opening".to_string(),
///             length: 125,
///         }],
///     }],
/// };
/// assert_eq!(album.track_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Opaque `<source>:<key>` identifier of the record this album was
    /// imported from; the edit note is derived from it.
    #[serde(rename = "_id")]
    pub source_id: String,
    /// Credited artist name
    pub artist: String,
    /// Identifier of an existing artist to credit, if known
    #[serde(default, rename = "artist_mbid")]
    pub artist_id: Option<String>,
    pub title: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    pub mediums: Vec<Medium>,
}

impl Album {
    /// Total number of tracks across all mediums.
    pub fn track_count(&self) -> usize {
        self.mediums.iter().map(|medium| medium.tracks.len()).sum()
    }
}

/// One disc (or other medium) of an [`Album`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medium {
    pub format: String,
    pub position: String,
    pub tracks: Vec<AlbumTrack>,
}

/// One track of a [`Medium`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumTrack {
    pub position: String,
    pub title: String,
    /// Length in seconds
    pub length: u32,
}

// ================================================================================================
// IN-PLACE EDIT INPUT
// ================================================================================================

/// A year with optional month and day, as entered in the service's date
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl PartialDate {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_day(mut self, day: u32) -> Self {
        self.day = Some(day);
        self
    }
}

/// Attributes of an artist that an edit may fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistField {
    Area,
    Type,
    Gender,
    BeginDate,
    EndDate,
    Comment,
}

/// An existing artist, with the values a caller wants to fill in.
///
/// Only the attributes listed in the accompanying update set are touched;
/// the rest of the record is ignored by [`edit_artist`](crate::MusicBrainzClient::edit_artist).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// 36-character identifier
    #[serde(rename = "gid")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sort_name: Option<String>,
    #[serde(default, rename = "type")]
    pub type_id: Option<u32>,
    #[serde(default, rename = "gender")]
    pub gender_id: Option<u32>,
    #[serde(default, rename = "area")]
    pub area_id: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub begin_date: Option<PartialDate>,
    #[serde(default)]
    pub end_date: Option<PartialDate>,
}

impl Artist {
    /// A new artist with only a name and sort name, for creation.
    pub fn named(name: &str, sort_name: &str) -> Self {
        Self {
            name: name.to_string(),
            sort_name: Some(sort_name.to_string()),
            ..Default::default()
        }
    }
}

/// Attributes of a work that an edit may fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkField {
    Type,
    Language,
    Comment,
}

/// An existing work, with the values a caller wants to fill in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    #[serde(rename = "gid")]
    pub id: String,
    #[serde(default, rename = "type")]
    pub type_id: Option<u32>,
    #[serde(default, rename = "language")]
    pub language_id: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// The attributes a caller intends to set this round.
pub type ArtistUpdate = BTreeSet<ArtistField>;

/// The attributes a caller intends to set this round.
pub type WorkUpdate = BTreeSet<WorkField>;

/// Artist credit split: `names.len()` credited names joined by one fewer
/// join phrases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCreditSplit {
    /// Row id of each credited artist
    pub artist_ids: Vec<u64>,
    /// Name each artist is credited as
    pub names: Vec<String>,
    /// Phrases placed between consecutive names
    pub join_phrases: Vec<String>,
}

// ================================================================================================
// EDIT METADATA
// ================================================================================================

/// Kinds of entity addressed by path on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Artist,
    Release,
    ReleaseGroup,
    Recording,
    Work,
    Label,
    Url,
}

impl EntityType {
    /// Path segment used by the service
    pub fn as_path(&self) -> &'static str {
        match self {
            EntityType::Artist => "artist",
            EntityType::Release => "release",
            EntityType::ReleaseGroup => "release_group",
            EntityType::Recording => "recording",
            EntityType::Work => "work",
            EntityType::Label => "label",
            EntityType::Url => "url",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// How a submitted edit is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditMode {
    /// Open the edit for voting
    #[default]
    Votable,
    /// Apply immediately, using the account's auto-editor privilege
    Auto,
}

/// Result of an edit that did not fail.
///
/// Failures are reported through [`MusicBrainzError`](crate::MusicBrainzError).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOutcome {
    /// The edit was entered; creations carry the new entity's identifier.
    Submitted { id: Option<String> },
    /// Nothing to do: the value was already set, so nothing was submitted
    /// (or the service reported that the submission changed nothing).
    AlreadySet,
}

impl EditOutcome {
    pub fn submitted() -> Self {
        EditOutcome::Submitted { id: None }
    }

    pub fn created(id: String) -> Self {
        EditOutcome::Submitted { id: Some(id) }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, EditOutcome::Submitted { .. })
    }

    /// Identifier of the created entity, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            EditOutcome::Submitted { id } => id.as_deref(),
            EditOutcome::AlreadySet => None,
        }
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Submitted { id: Some(id) } => write!(f, "submitted ({id})"),
            EditOutcome::Submitted { id: None } => write!(f, "submitted"),
            EditOutcome::AlreadySet => write!(f, "already set, not changing"),
        }
    }
}

/// An entry of the editor's edit history, as offered to an
/// [`add_edit_note`](crate::MusicBrainzClient::add_edit_note) matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSummary {
    /// Edit number
    pub id: u64,
    /// Raw HTML of the edit's details block
    pub details_html: String,
}
