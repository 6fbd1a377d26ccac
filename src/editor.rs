use crate::client::MusicBrainzClient;
use crate::{
    Album, Artist, ArtistCreditSplit, ArtistUpdate, EditMode, EditOutcome, EntityType, Result,
    Work, WorkUpdate,
};
use async_trait::async_trait;

/// Trait for MusicBrainz edit operations that can be mocked for testing.
///
/// Code that drives a bot (deciding which edits to make, watching the quota)
/// can be written against this trait and tested without a server.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides
/// `MockMusicBrainzEditor` that implements this trait using the `mockall`
/// library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait MusicBrainzEditor {
    /// Get the authenticated username.
    fn username(&self) -> String;

    /// Edits left before reaching the daily limit.
    async fn edits_left_today(&mut self) -> Result<u32>;

    /// Edits left before reaching the open edit limit.
    async fn edits_left_globally(&mut self) -> Result<u32>;

    /// The smaller of the two quotas.
    async fn edits_left(&mut self) -> Result<u32>;

    /// Add a new release and return its identifier.
    async fn add_release(&mut self, album: &Album, mode: EditMode) -> Result<EditOutcome>;

    /// Create an artist and return its identifier.
    async fn add_artist(
        &mut self,
        artist: &Artist,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Fill in artist attributes that are not set yet.
    async fn edit_artist(
        &mut self,
        artist: &Artist,
        update: &ArtistUpdate,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Split an artist credit.
    async fn edit_artist_credit(
        &mut self,
        artist_id: &str,
        credit_id: u32,
        split: &ArtistCreditSplit,
        edit_note: &str,
    ) -> Result<EditOutcome>;

    /// Set an artist's type if it has none.
    async fn set_artist_type(
        &mut self,
        artist_id: &str,
        type_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Replace a URL entity's address.
    async fn edit_url(
        &mut self,
        url_id: &str,
        old_url: &str,
        new_url: &str,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Fill in work attributes that are not set yet.
    async fn edit_work(
        &mut self,
        work: &Work,
        update: &WorkUpdate,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Remove a relationship between two entities.
    async fn remove_relationship(
        &mut self,
        relationship_id: u64,
        entity0: EntityType,
        entity1: EntityType,
        edit_note: &str,
    ) -> Result<EditOutcome>;

    /// Merge entities into a target.
    async fn merge(
        &mut self,
        entity_type: EntityType,
        entity_ids: &[String],
        target_id: &str,
        edit_note: &str,
    ) -> Result<EditOutcome>;

    /// Change a release's script.
    async fn set_release_script(
        &mut self,
        release_id: &str,
        old_script_id: u32,
        new_script_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Change a release's language.
    async fn set_release_language(
        &mut self,
        release_id: &str,
        old_language_id: u32,
        new_language_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Change a release's packaging.
    async fn set_release_packaging(
        &mut self,
        release_id: &str,
        old_packaging_id: Option<u32>,
        new_packaging_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome>;

    /// Cancel an open edit. An empty note is not sent.
    async fn cancel_edit(&mut self, edit_id: u64, edit_note: &str) -> Result<()>;
}

#[async_trait(?Send)]
impl MusicBrainzEditor for MusicBrainzClient {
    fn username(&self) -> String {
        MusicBrainzClient::username(self).to_string()
    }

    async fn edits_left_today(&mut self) -> Result<u32> {
        MusicBrainzClient::edits_left_today(self).await
    }

    async fn edits_left_globally(&mut self) -> Result<u32> {
        MusicBrainzClient::edits_left_globally(self).await
    }

    async fn edits_left(&mut self) -> Result<u32> {
        MusicBrainzClient::edits_left(self).await
    }

    async fn add_release(&mut self, album: &Album, mode: EditMode) -> Result<EditOutcome> {
        MusicBrainzClient::add_release(self, album, mode).await
    }

    async fn add_artist(
        &mut self,
        artist: &Artist,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::add_artist(self, artist, edit_note, mode).await
    }

    async fn edit_artist(
        &mut self,
        artist: &Artist,
        update: &ArtistUpdate,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::edit_artist(self, artist, update, edit_note, mode).await
    }

    async fn edit_artist_credit(
        &mut self,
        artist_id: &str,
        credit_id: u32,
        split: &ArtistCreditSplit,
        edit_note: &str,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::edit_artist_credit(self, artist_id, credit_id, split, edit_note).await
    }

    async fn set_artist_type(
        &mut self,
        artist_id: &str,
        type_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::set_artist_type(self, artist_id, type_id, edit_note, mode).await
    }

    async fn edit_url(
        &mut self,
        url_id: &str,
        old_url: &str,
        new_url: &str,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::edit_url(self, url_id, old_url, new_url, edit_note, mode).await
    }

    async fn edit_work(
        &mut self,
        work: &Work,
        update: &WorkUpdate,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::edit_work(self, work, update, edit_note, mode).await
    }

    async fn remove_relationship(
        &mut self,
        relationship_id: u64,
        entity0: EntityType,
        entity1: EntityType,
        edit_note: &str,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::remove_relationship(self, relationship_id, entity0, entity1, edit_note)
            .await
    }

    async fn merge(
        &mut self,
        entity_type: EntityType,
        entity_ids: &[String],
        target_id: &str,
        edit_note: &str,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::merge(self, entity_type, entity_ids, target_id, edit_note).await
    }

    async fn set_release_script(
        &mut self,
        release_id: &str,
        old_script_id: u32,
        new_script_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::set_release_script(
            self,
            release_id,
            old_script_id,
            new_script_id,
            edit_note,
            mode,
        )
        .await
    }

    async fn set_release_language(
        &mut self,
        release_id: &str,
        old_language_id: u32,
        new_language_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::set_release_language(
            self,
            release_id,
            old_language_id,
            new_language_id,
            edit_note,
            mode,
        )
        .await
    }

    async fn set_release_packaging(
        &mut self,
        release_id: &str,
        old_packaging_id: Option<u32>,
        new_packaging_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        MusicBrainzClient::set_release_packaging(
            self,
            release_id,
            old_packaging_id,
            new_packaging_id,
            edit_note,
            mode,
        )
        .await
    }

    async fn cancel_edit(&mut self, edit_id: u64, edit_note: &str) -> Result<()> {
        MusicBrainzClient::cancel_edit(self, edit_id, Some(edit_note)).await
    }
}
