//! Form codec: structured records → the field paths of the service's forms.
//!
//! The field paths here are a contract with the service's current HTML form
//! layout. They change when the site changes, and this is the only module
//! that should need to follow.
//!
//! Everything in this module is a pure function of its input.

use crate::fields::FormFields;
use crate::types::{Album, ArtistCreditSplit};
use crate::{MusicBrainzError, Result};

/// Prefix of the provenance note attached to imported releases
pub const PROVENANCE_URL_PREFIX: &str = "http://www.cdbaby.com/cd/";

/// Render a length in seconds as `M:SS`.
///
/// Minutes are not wrapped into hours: `3600` renders as `60:00`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Split a `YYYY[-MM[-DD]]` date into its components, greedily from the
/// left. Components beyond the day are ignored.
pub fn split_date(date: &str) -> Vec<&str> {
    date.split('-').take(3).collect()
}

/// Edit note for an imported release, derived from the source record's
/// `<source>:<key>` identifier.
pub fn provenance_note(source_id: &str) -> String {
    let key = source_id.split(':').nth(1).unwrap_or(source_id);
    format!("{PROVENANCE_URL_PREFIX}{key}")
}

/// Fields of the release editor for a new release.
///
/// Mediums and tracks are numbered from 0 in input order.
pub fn album_to_fields(album: &Album) -> FormFields {
    let mut fields = FormFields::new();
    fields.insert("artist_credit.names.0.artist.name", album.artist.as_str());
    fields.insert("artist_credit.names.0.name", album.artist.as_str());
    if let Some(artist_id) = album.artist_id.as_deref().filter(|id| !id.is_empty()) {
        fields.insert("artist_credit.names.0.mbid", artist_id);
    }
    fields.insert("name", album.title.as_str());

    if let Some(date) = album.date.as_deref().filter(|date| !date.is_empty()) {
        for (part, key) in split_date(date)
            .into_iter()
            .zip(["date.year", "date.month", "date.day"])
        {
            fields.insert(key, part);
        }
    }
    if let Some(label) = album.label.as_deref().filter(|label| !label.is_empty()) {
        fields.insert("labels.0.name", label);
    }
    if let Some(barcode) = album.barcode.as_deref().filter(|barcode| !barcode.is_empty()) {
        fields.insert("barcode", barcode);
    }

    for (medium_no, medium) in album.mediums.iter().enumerate() {
        fields.insert(format!("mediums.{medium_no}.format"), medium.format.as_str());
        fields.insert(
            format!("mediums.{medium_no}.position"),
            medium.position.as_str(),
        );
        for (track_no, track) in medium.tracks.iter().enumerate() {
            let prefix = format!("mediums.{medium_no}.track.{track_no}");
            fields.insert(format!("{prefix}.position"), track.position.as_str());
            fields.insert(format!("{prefix}.name"), track.title.as_str());
            fields.insert(format!("{prefix}.length"), format_duration(track.length));
        }
    }

    fields.insert("edit_note", provenance_note(&album.source_id));
    fields
}

/// Check the shape of an artist-credit split: `n` names need exactly `n - 1`
/// join phrases, and one artist id per name.
pub fn validate_credit_split(split: &ArtistCreditSplit) -> Result<()> {
    let names = split.names.len();
    if names == 0 {
        return Err(MusicBrainzError::Precondition(
            "an artist credit needs at least one name".to_string(),
        ));
    }
    if split.artist_ids.len() != names || split.join_phrases.len() + 1 != names {
        return Err(MusicBrainzError::Precondition(format!(
            "artist credit split has {} ids, {} names and {} join phrases; expected n, n and n - 1",
            split.artist_ids.len(),
            names,
            split.join_phrases.len()
        )));
    }
    Ok(())
}

/// Fields of the artist-credit split form.
///
/// The last credited name gets an empty join phrase.
pub fn credit_split_fields(split: &ArtistCreditSplit) -> Result<FormFields> {
    validate_credit_split(split)?;

    let mut fields = FormFields::new();
    let join_phrases = split
        .join_phrases
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(""));
    for (i, ((artist_id, name), join)) in split
        .artist_ids
        .iter()
        .zip(&split.names)
        .zip(join_phrases)
        .enumerate()
    {
        let prefix = format!("split-artist.artist_credit.names.{i}");
        fields.insert(format!("{prefix}.artist.id"), artist_id.to_string());
        fields.insert(format!("{prefix}.name"), name.as_str());
        fields.insert(format!("{prefix}.join_phrase"), join);
    }
    Ok(fields)
}

/// Body that puts entities into the merge queue.
pub fn merge_queue_fields(entity_ids: &[String]) -> FormFields {
    let mut fields = FormFields::new();
    fields.insert("add-to-merge", entity_ids.to_vec());
    fields
}

/// Body that confirms a queued merge into `target_id`.
pub fn merge_fields(entity_ids: &[String], target_id: &str, edit_note: &str) -> FormFields {
    let mut fields = FormFields::new();
    fields.insert("merge.target", target_id);
    fields.insert("submit", "submit");
    fields.insert("merge.edit_note", edit_note);
    for (idx, id) in entity_ids.iter().enumerate() {
        fields.insert(format!("merge.merging.{idx}"), id.as_str());
    }
    fields
}

/// Edit search for the editor's edits opened since `date` (`YYYY-MM-DD`).
pub fn edits_opened_since_query(
    username: &str,
    editor_id: u64,
    date: &str,
) -> FormFields {
    let mut fields = search_preamble();
    fields.insert("conditions.0.field", "open_time");
    fields.insert("conditions.0.operator", ">");
    fields.insert("conditions.0.args.0", date);
    fields.insert("conditions.0.args.1", "");
    fields.insert("conditions.1.field", "editor");
    fields.insert("conditions.1.operator", "=");
    fields.insert("conditions.1.name", username);
    fields.insert("conditions.1.args.0", editor_id.to_string());
    fields
}

/// Edit search for the editor's edits that are still open.
pub fn open_edits_query(username: &str, editor_id: u64) -> FormFields {
    let mut fields = search_preamble();
    fields.insert("conditions.0.field", "editor");
    fields.insert("conditions.0.operator", "=");
    fields.insert("conditions.0.name", username);
    fields.insert("conditions.0.args.0", editor_id.to_string());
    fields.insert("conditions.1.field", "status");
    fields.insert("conditions.1.operator", "=");
    fields.insert("conditions.1.args", "1");
    fields
}

fn search_preamble() -> FormFields {
    let mut fields = FormFields::new();
    fields.insert("page", "2000");
    fields.insert("combinator", "and");
    fields.insert("negation", "0");
    fields
}
