use crate::codec::{album_to_fields, merge_fields, merge_queue_fields, validate_credit_split};
use crate::config::ClientConfig;
use crate::edit::{
    attach_edit_note, set_edit_mode, ArtistCreditEdit, ArtistEdit, ArtistTypeEdit, FormEdit,
    UrlEdit, WorkEdit,
};
use crate::fields::FormFields;
use crate::guard::Guard;
use crate::headers::user_agent;
use crate::response::{
    check_response, extract_entity_id, MERGE_QUEUE_FRAGMENT, RELEASE_SAVED_FRAGMENT,
};
use crate::session::EditSession;
use crate::types::{
    Album, Artist, ArtistCreditSplit, ArtistUpdate, EditMode, EditOutcome, EditSummary,
    EntityType, Work, WorkUpdate,
};
use crate::{MusicBrainzError, Result};
use http_client::HttpClient;
use regex::Regex;

/// One attribute of the release editor to change, with the value the caller
/// believes it currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseChange {
    /// Control name, e.g. `script_id`
    pub field: String,
    /// Value expected on the live form; `None` skips the comparison
    pub expected: Option<String>,
    pub new: String,
}

impl ReleaseChange {
    pub fn new(field: &str, expected: Option<String>, new: String) -> Self {
        Self {
            field: field.to_string(),
            expected,
            new,
        }
    }
}

/// Client that enters edits on MusicBrainz through its website, logged in
/// as one editor.
///
/// Each operation loads the relevant page, fills in its form and submits it,
/// then reads the outcome from the page the service answers with. Values an
/// editor has already entered are never overwritten: such edits come back as
/// [`EditOutcome::AlreadySet`] without anything being submitted.
///
/// # Examples
///
/// ```rust,no_run
/// # use musicbrainz_edit::{ClientConfig, EditMode, MusicBrainzClient};
/// # tokio_test::block_on(async {
/// let http_client = http_client::native::NativeClient::new();
/// let mut client = MusicBrainzClient::login_with_credentials(
///     Box::new(http_client),
///     ClientConfig::new().with_editor_id(123456),
///     "SomeBot",
///     "password",
/// )
/// .await?;
///
/// if client.edits_left().await? > 0 {
///     let outcome = client
///         .set_artist_type("5b11f4ce-a62d-471e-81fc-a69a8278c7da", 2, "Band", EditMode::Votable)
///         .await?;
///     println!("{outcome}");
/// }
/// # Ok::<(), musicbrainz_edit::MusicBrainzError>(())
/// # });
/// ```
pub struct MusicBrainzClient {
    pub(crate) session: EditSession,
    pub(crate) config: ClientConfig,
    pub(crate) username: String,
}

impl MusicBrainzClient {
    /// Create a client and log in. Construction fails if login fails.
    pub async fn login_with_credentials(
        client: Box<dyn HttpClient>,
        config: ClientConfig,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let agent = user_agent(
            &config.bot_name,
            &config.bot_version,
            &config.base_url,
            username,
        );
        let mut session = EditSession::new(client, &config.base_url, agent);
        session.login(username, password).await?;

        Ok(Self {
            session,
            config,
            username: username.to_string(),
        })
    }

    /// The authenticated username.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying session, for pages this client has no operation for.
    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    async fn pause_between_steps(&self) {
        if !self.config.step_delay.is_zero() {
            tokio::time::sleep(self.config.step_delay).await;
        }
    }

    /// Run one in-place edit: load, fill, attach the note, submit, classify.
    pub async fn submit_form_edit<E: FormEdit + ?Sized>(
        &mut self,
        edit: &E,
        edit_note: &str,
        mode: Option<EditMode>,
    ) -> Result<EditOutcome> {
        let url = self.session.url(&edit.path(), None);
        self.session.open(&url).await?;

        let form = self.session.select_form(edit.form_action())?;
        if let Guard::AlreadySet { field } = edit.apply(form)? {
            log::info!("{field} already set, not submitting {}", edit.path());
            return Ok(EditOutcome::AlreadySet);
        }
        attach_edit_note(form, edit.prefix(), edit_note, mode)?;

        let page = self.session.submit(None).await?;
        check_response(&page.body, edit.no_op_fragment())
    }

    /// Add a new release through the release editor.
    ///
    /// The edit note is derived from the album's source identifier. The
    /// editor is a two-step wizard with a fixed pause before each step.
    /// Returns the new release's identifier.
    pub async fn add_release(&mut self, album: &Album, mode: EditMode) -> Result<EditOutcome> {
        let fields = album_to_fields(album);
        log::debug!(
            "Adding release {:?} by {:?} ({} mediums, {} tracks)",
            album.title,
            album.artist,
            album.mediums.len(),
            album.track_count()
        );

        let url = self.session.url("/release/add", None);
        self.session.open_with_fields(&url, &fields).await?;
        self.pause_between_steps().await;

        self.session.select_form("/release")?;
        self.session.submit(Some("step_editnote")).await?;
        self.pause_between_steps().await;

        let form = self.session.select_form("/release")?;
        set_edit_mode(form, "", mode);
        self.session.submit(Some("save")).await?;

        let id = extract_entity_id(self.session.current_url()?, EntityType::Release)?;
        log::debug!("Added release {id}");
        Ok(EditOutcome::created(id))
    }

    /// Create an artist with a name and sort name. Returns its identifier.
    pub async fn add_artist(
        &mut self,
        artist: &Artist,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let sort_name = artist.sort_name.as_deref().ok_or_else(|| {
            MusicBrainzError::Precondition(format!("no sort name for artist {:?}", artist.name))
        })?;

        let url = self.session.url("/artist/create", None);
        self.session.open(&url).await?;
        let form = self.session.select_form("/artist/create")?;
        form.set("edit-artist.name", artist.name.as_str())?;
        form.set("edit-artist.sort_name", sort_name)?;
        attach_edit_note(form, "edit-artist.", edit_note, Some(mode))?;
        self.session.submit(None).await?;

        let id = extract_entity_id(self.session.current_url()?, EntityType::Artist)?;
        log::debug!("Created artist {id}");
        Ok(EditOutcome::created(id))
    }

    /// Fill in the attributes listed in `update` that the artist lacks.
    ///
    /// If any listed attribute already has a value, nothing is submitted.
    pub async fn edit_artist(
        &mut self,
        artist: &Artist,
        update: &ArtistUpdate,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let edit = ArtistEdit { artist, update };
        self.submit_form_edit(&edit, edit_note, Some(mode)).await
    }

    /// Split one artist credit into several credited artists.
    ///
    /// The split is checked before any request is made.
    pub async fn edit_artist_credit(
        &mut self,
        artist_id: &str,
        credit_id: u32,
        split: &ArtistCreditSplit,
        edit_note: &str,
    ) -> Result<EditOutcome> {
        validate_credit_split(split)?;
        let edit = ArtistCreditEdit {
            artist_id,
            credit_id,
            split,
        };
        self.submit_form_edit(&edit, edit_note, None).await
    }

    /// Set an artist's type if it has none.
    pub async fn set_artist_type(
        &mut self,
        artist_id: &str,
        type_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let edit = ArtistTypeEdit {
            artist_id: artist_id.to_string(),
            type_id,
        };
        self.submit_form_edit(&edit, edit_note, Some(mode)).await
    }

    /// Replace a URL entity's address.
    ///
    /// Fails with [`MusicBrainzError::RemoteStateChanged`] if the URL no
    /// longer holds `old_url`.
    pub async fn edit_url(
        &mut self,
        url_id: &str,
        old_url: &str,
        new_url: &str,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let edit = UrlEdit {
            url_id: url_id.to_string(),
            old_url: old_url.to_string(),
            new_url: new_url.to_string(),
        };
        self.submit_form_edit(&edit, edit_note, Some(mode)).await
    }

    /// Fill in the attributes listed in `update` that the work lacks.
    pub async fn edit_work(
        &mut self,
        work: &Work,
        update: &WorkUpdate,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let edit = WorkEdit { work, update };
        self.submit_form_edit(&edit, edit_note, Some(mode)).await
    }

    /// Remove a relationship between two entities.
    pub async fn remove_relationship(
        &mut self,
        relationship_id: u64,
        entity0: EntityType,
        entity1: EntityType,
        edit_note: &str,
    ) -> Result<EditOutcome> {
        let mut query = FormFields::new();
        query.insert("id", relationship_id.to_string());
        query.insert("type0", entity0.as_path());
        query.insert("type1", entity1.as_path());

        let url = self.session.url("/edit/relationship/delete", Some(&query));
        self.session.open(&url).await?;
        let form = self.session.select_form("/edit")?;
        form.set("confirm.edit_note", edit_note)?;

        let page = self.session.submit(None).await?;
        check_response(&page.body, None)
    }

    /// Merge entities into `target_id`.
    ///
    /// The entities are queued first; the merge is only submitted once the
    /// service confirms the queue. A failure after queueing leaves the queue
    /// as it is.
    pub async fn merge(
        &mut self,
        entity_type: EntityType,
        entity_ids: &[String],
        target_id: &str,
        edit_note: &str,
    ) -> Result<EditOutcome> {
        let queue_url = self
            .session
            .url(&format!("/{}/merge_queue", entity_type.as_path()), None);
        let page = self
            .session
            .open_with_fields(&queue_url, &merge_queue_fields(entity_ids))
            .await?;
        if !page.body.contains(MERGE_QUEUE_FRAGMENT) {
            return Err(MusicBrainzError::PostFailure(
                "unable to add items to merge queue".to_string(),
            ));
        }
        log::debug!("Queued {} {entity_type}s for merging", entity_ids.len());

        let merge_url = self
            .session
            .url(&format!("/{}/merge", entity_type.as_path()), None);
        let page = self
            .session
            .open_with_fields(&merge_url, &merge_fields(entity_ids, target_id, edit_note))
            .await?;
        check_response(&page.body, None)
    }

    /// Change a release's script, if it still has `old_script_id`.
    pub async fn set_release_script(
        &mut self,
        release_id: &str,
        old_script_id: u32,
        new_script_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let change = ReleaseChange::new(
            "script_id",
            Some(old_script_id.to_string()),
            new_script_id.to_string(),
        );
        self.edit_release_information(release_id, &[change], edit_note, mode)
            .await
    }

    /// Change a release's language, if it still has `old_language_id`.
    pub async fn set_release_language(
        &mut self,
        release_id: &str,
        old_language_id: u32,
        new_language_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let change = ReleaseChange::new(
            "language_id",
            Some(old_language_id.to_string()),
            new_language_id.to_string(),
        );
        self.edit_release_information(release_id, &[change], edit_note, mode)
            .await
    }

    /// Change a release's packaging. With `old_packaging_id` unknown the
    /// live value is not compared.
    pub async fn set_release_packaging(
        &mut self,
        release_id: &str,
        old_packaging_id: Option<u32>,
        new_packaging_id: u32,
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let change = ReleaseChange::new(
            "packaging_id",
            old_packaging_id.map(|id| id.to_string()),
            new_packaging_id.to_string(),
        );
        self.edit_release_information(release_id, &[change], edit_note, mode)
            .await
    }

    /// Change attributes on the release editor's information tab.
    ///
    /// Every change is compared against the live form first; any drift
    /// aborts the whole edit. Attributes already holding their new value
    /// are left alone, and if that is all of them nothing is submitted.
    pub async fn edit_release_information(
        &mut self,
        release_id: &str,
        changes: &[ReleaseChange],
        edit_note: &str,
        mode: EditMode,
    ) -> Result<EditOutcome> {
        let url = self.session.url(&format!("/release/{release_id}/edit"), None);
        self.session.open(&url).await?;
        let form = self.session.select_form("/edit")?;

        let mut changed = false;
        for change in changes {
            let current = form.get(&change.field)?;
            if let Some(expected) = &change.expected {
                if current != [expected.as_str()] {
                    log::warn!("{} has changed to {current:?}, aborting", change.field);
                    return Err(MusicBrainzError::RemoteStateChanged {
                        field: change.field.clone(),
                        expected: vec![expected.clone()],
                        actual: current,
                    });
                }
            }
            if current != [change.new.as_str()] {
                changed = true;
                form.set(&change.field, vec![change.new.clone()])?;
            }
        }
        if !changed {
            log::info!("Release {release_id} already set, not changing");
            return Ok(EditOutcome::AlreadySet);
        }
        if form.has_control("barcode_confirm") {
            form.set("barcode_confirm", vec!["1".to_string()])?;
        }
        self.session.submit(Some("step_editnote")).await?;

        let form = self.session.select_form("/edit")?;
        if form.set("edit_note", edit_note).is_err() {
            return Err(MusicBrainzError::PostFailure(
                "release editor offered no edit note step".to_string(),
            ));
        }
        set_edit_mode(form, "", mode);
        let page = self.session.submit(Some("save")).await?;

        if !page.body.contains(RELEASE_SAVED_FRAGMENT) {
            return Err(MusicBrainzError::PostFailure(format!(
                "release {release_id} was not saved"
            )));
        }
        Ok(EditOutcome::submitted())
    }

    /// Add an edit note to one of the editor's recent edits.
    ///
    /// Useful for edits entered through channels that cannot carry a note.
    /// `identify` is offered each edit on the editor's edit list, newest
    /// first; the note goes to the first one it accepts. Returns that edit's
    /// number, or `None` (and submits nothing) if it accepts none.
    pub async fn add_edit_note<F>(&mut self, identify: F, edit_note: &str) -> Result<Option<u64>>
    where
        F: Fn(&EditSummary) -> bool,
    {
        let url = self.session.url(
            &format!("/user/{}/edits", urlencoding::encode(&self.username)),
            None,
        );
        self.session.open(&url).await?;
        let body = self.session.body()?.to_string();
        let edits = parse_edit_list(&body, self.session.base_url())?;
        log::debug!("Found {} edits on the edit list", edits.len());

        let Some((index, edit)) = edits.iter().enumerate().find(|(_, edit)| identify(edit))
        else {
            log::info!("No listed edit matched, not adding a note");
            return Ok(None);
        };

        let form = self.session.select_form("/edit")?;
        form.set(&format!("enter-vote.vote.{index}.edit_note"), edit_note)?;
        self.session.submit(None).await?;
        Ok(Some(edit.id))
    }

    /// Cancel one of the editor's open edits.
    pub async fn cancel_edit(&mut self, edit_id: u64, edit_note: Option<&str>) -> Result<()> {
        let url = self.session.url(&format!("/edit/{edit_id}/cancel"), None);
        self.session.open(&url).await?;
        let form = self.session.select_form("/cancel")?;
        if let Some(note) = edit_note.filter(|note| !note.is_empty()) {
            form.set("confirm.edit_note", note)?;
        }
        self.session.submit(None).await?;
        log::debug!("Cancelled edit #{edit_id}");
        Ok(())
    }
}

/// Edits on an edit list page, in page order.
pub fn parse_edit_list(body: &str, base_url: &str) -> Result<Vec<EditSummary>> {
    let pattern = Regex::new(&format!(
        r#"(?s)<h2><a href="(?:{})?/edit/([0-9]+).*?<div class="edit-details">(.*?)</div>"#,
        regex::escape(base_url)
    ))
    .map_err(|e| MusicBrainzError::Parse(e.to_string()))?;

    pattern
        .captures_iter(body)
        .map(|captures| {
            let id = captures[1]
                .parse::<u64>()
                .map_err(|e| MusicBrainzError::Parse(format!("edit number: {e}")))?;
            Ok(EditSummary {
                id,
                details_html: captures[2].to_string(),
            })
        })
        .collect()
}
