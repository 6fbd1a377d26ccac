//! Interpretation of the pages the service answers with.
//!
//! Edits are acknowledged with free-form HTML rather than a status code, so
//! the outcome is read from fixed text fragments. Anything unexpected is a
//! failure; a page is never assumed to mean success.

use crate::types::{EditOutcome, EntityType};
use crate::{MusicBrainzError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Shown after an edit has been entered
pub const SUCCESS_FRAGMENT: &str = "Thank you, your ";

/// Shown when a submitted edit would not change anything
pub const DEFAULT_NO_OP_FRAGMENT: &str = "any changes to the data already present";

/// Shown once entities have been queued for merging
pub const MERGE_QUEUE_FRAGMENT: &str = "You are about to merge";

/// Shown on the release page after the release editor saved
pub const RELEASE_SAVED_FRAGMENT: &str = "Release information";

/// Outcome tag of a submitted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The service acknowledged the edit.
    Accepted,
    /// The service reported there was nothing to change.
    AlreadyApplied,
    /// Neither fragment was found.
    Unrecognized,
}

/// Classify a page returned after a submit.
///
/// `no_op_fragment` is the text that means "already applied"; `None` turns
/// that check off so that anything but an acknowledgment is unrecognized.
pub fn classify(body: &str, no_op_fragment: Option<&str>) -> ResponseKind {
    if body.contains(SUCCESS_FRAGMENT) {
        return ResponseKind::Accepted;
    }
    match no_op_fragment {
        Some(fragment) if !fragment.is_empty() && body.contains(fragment) => {
            ResponseKind::AlreadyApplied
        }
        _ => ResponseKind::Unrecognized,
    }
}

/// Turn a classified page into an edit outcome.
pub fn check_response(body: &str, no_op_fragment: Option<&str>) -> Result<EditOutcome> {
    match classify(body, no_op_fragment) {
        ResponseKind::Accepted => Ok(EditOutcome::submitted()),
        ResponseKind::AlreadyApplied => {
            log::info!("Service reports no changes, edit not entered");
            Ok(EditOutcome::AlreadySet)
        }
        ResponseKind::Unrecognized => {
            log::debug!("Unrecognized response after submit: {} bytes", body.len());
            Err(MusicBrainzError::PostFailure(
                "response matched no known outcome".to_string(),
            ))
        }
    }
}

/// Recover a created entity's identifier from the address the service
/// redirected to: `/<entity>/<36-character id>` at the very end.
pub fn extract_entity_id(final_url: &str, entity: EntityType) -> Result<String> {
    let pattern = Regex::new(&format!(r"/{}/([0-9a-f-]{{36}})$", entity.as_path()))
        .map_err(|e| MusicBrainzError::Parse(e.to_string()))?;
    pattern
        .captures(final_url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| {
            MusicBrainzError::PostFailure(format!(
                "no {entity} identifier in final address {final_url}"
            ))
        })
}

fn found_edits_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Found (?:at least )?([0-9]+(?:,[0-9]{3})*) edits").unwrap()
    })
}

/// Read the `Found [at least] N edits` count from an edit search page.
pub fn parse_found_edits(body: &str) -> Result<u32> {
    let captures = found_edits_pattern()
        .captures(body)
        .ok_or_else(|| MusicBrainzError::Parse("no edit count on search page".to_string()))?;
    let digits: String = captures[1].chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<u32>()
        .map_err(|e| MusicBrainzError::Parse(format!("edit count {digits:?}: {e}")))
}

/// Edits left under `limit`, never negative.
pub fn remaining(limit: u32, used: u32) -> u32 {
    limit.saturating_sub(used)
}
