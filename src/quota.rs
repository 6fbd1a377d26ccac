//! Edit quota estimates.
//!
//! The service limits how many edits an editor may open per day and how many
//! may be open at once. Neither number is exposed directly, so both are
//! estimated from the hit counts of two edit searches.

use crate::client::MusicBrainzClient;
use crate::codec::{edits_opened_since_query, open_edits_query};
use crate::fields::FormFields;
use crate::response::{parse_found_edits, remaining};
use crate::Result;

impl MusicBrainzClient {
    /// Edits left before reaching the daily limit.
    ///
    /// Returns 0 (with a warning) when no editor id is configured or the
    /// search result cannot be read.
    pub async fn edits_left_today(&mut self) -> Result<u32> {
        let Some(editor_id) = self.config.editor_id else {
            log::warn!("No editor id configured, cannot count today's edits");
            return Ok(0);
        };
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let query = edits_opened_since_query(&self.username, editor_id, &today);
        let limit = self.config.daily_edit_limit;
        self.edits_left_for(&query, limit).await
    }

    /// Edits left before reaching the open edit limit.
    pub async fn edits_left_globally(&mut self) -> Result<u32> {
        let Some(editor_id) = self.config.editor_id else {
            log::warn!("No editor id configured, cannot count open edits");
            return Ok(0);
        };
        let query = open_edits_query(&self.username, editor_id);
        let limit = self.config.open_edit_limit;
        self.edits_left_for(&query, limit).await
    }

    /// The smaller of [`edits_left_today`](Self::edits_left_today) and
    /// [`edits_left_globally`](Self::edits_left_globally).
    pub async fn edits_left(&mut self) -> Result<u32> {
        let today = self.edits_left_today().await?;
        if today == 0 {
            return Ok(0);
        }
        let globally = self.edits_left_globally().await?;
        Ok(today.min(globally))
    }

    async fn edits_left_for(&mut self, query: &FormFields, limit: u32) -> Result<u32> {
        let url = self.session.url("/search/edits", Some(query));
        let page = self.session.open(&url).await?;
        match parse_found_edits(&page.body) {
            Ok(used) => {
                log::debug!("{used} of {limit} edits used");
                Ok(remaining(limit, used))
            }
            Err(e) => {
                log::warn!("Could not read edit count from search results: {e}");
                Ok(0)
            }
        }
    }
}
