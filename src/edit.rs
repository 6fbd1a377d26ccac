//! In-place edits of existing entities.
//!
//! Every in-place edit follows the same round trip: load the entity's edit
//! page, select its form, fill in the fields (refusing to overwrite anything
//! already set), attach an edit note, submit, and classify the answer. Each
//! edit kind implements [`FormEdit`] for the part that differs, so the
//! filling logic can be exercised against a parsed form without a network.

use crate::codec::credit_split_fields;
use crate::fields::FieldValue;
use crate::form::HtmlForm;
use crate::guard::{set_date_if_unset, set_if_unset, Guard};
use crate::response::DEFAULT_NO_OP_FRAGMENT;
use crate::types::{
    Artist, ArtistCreditSplit, ArtistField, ArtistUpdate, EditMode, Work, WorkField, WorkUpdate,
};
use crate::{MusicBrainzError, Result};

/// One kind of in-place edit.
pub trait FormEdit {
    /// Path of the page holding the edit form
    fn path(&self) -> String;

    /// Fragment of the form action used to select the form
    fn form_action(&self) -> &str {
        "/edit"
    }

    /// Prefix shared by the form's control names, e.g. `edit-artist.`
    fn prefix(&self) -> &str;

    /// Fill the freshly loaded form.
    ///
    /// Returning [`Guard::AlreadySet`] aborts the edit before anything is
    /// submitted.
    fn apply(&self, form: &mut HtmlForm) -> Result<Guard>;

    /// Text the service shows when the submission changed nothing; `None`
    /// treats anything but an acknowledgment as a failure.
    fn no_op_fragment(&self) -> Option<&str> {
        Some(DEFAULT_NO_OP_FRAGMENT)
    }
}

/// Attach the edit note to a filled form, and set the auto-editor flag when
/// a mode is given.
pub fn attach_edit_note(
    form: &mut HtmlForm,
    prefix: &str,
    edit_note: &str,
    mode: Option<EditMode>,
) -> Result<()> {
    form.set(&format!("{prefix}edit_note"), edit_note)?;
    if let Some(mode) = mode {
        set_edit_mode(form, prefix, mode);
    }
    Ok(())
}

/// Tick or untick the `make_votable` checkbox.
///
/// Accounts without auto-editor privileges get no such checkbox; the mode is
/// then ignored.
pub fn set_edit_mode(form: &mut HtmlForm, prefix: &str, mode: EditMode) {
    let key = format!("{prefix}make_votable");
    let value: Vec<String> = match mode {
        EditMode::Auto => Vec::new(),
        EditMode::Votable => vec!["1".to_string()],
    };
    if form.set(&key, value).is_err() {
        log::debug!("No {key} control, leaving edit mode to the service");
    }
}

fn missing(entity: &str, field: &str) -> MusicBrainzError {
    MusicBrainzError::Precondition(format!(
        "{entity} update includes {field} but the record has no value for it"
    ))
}

/// Fill in unset attributes of an artist.
#[derive(Debug, Clone, Copy)]
pub struct ArtistEdit<'a> {
    pub artist: &'a Artist,
    pub update: &'a ArtistUpdate,
}

impl FormEdit for ArtistEdit<'_> {
    fn path(&self) -> String {
        format!("/artist/{}/edit", self.artist.id)
    }

    fn prefix(&self) -> &str {
        "edit-artist."
    }

    fn apply(&self, form: &mut HtmlForm) -> Result<Guard> {
        let artist = self.artist;
        let order = [
            ArtistField::Area,
            ArtistField::Type,
            ArtistField::Gender,
            ArtistField::BeginDate,
            ArtistField::EndDate,
            ArtistField::Comment,
        ];

        for field in order.into_iter().filter(|f| self.update.contains(f)) {
            let guard = match field {
                ArtistField::Area => {
                    let area = artist.area_id.ok_or_else(|| missing("artist", "area"))?;
                    set_if_unset(form, "edit-artist.area_id", area.to_string().into())?
                }
                ArtistField::Type => {
                    let type_id = artist.type_id.ok_or_else(|| missing("artist", "type"))?;
                    set_if_unset(form, "edit-artist.type_id", selector(type_id))?
                }
                ArtistField::Gender => {
                    let gender = artist.gender_id.ok_or_else(|| missing("artist", "gender"))?;
                    set_if_unset(form, "edit-artist.gender_id", selector(gender))?
                }
                ArtistField::BeginDate => {
                    let date = artist
                        .begin_date
                        .as_ref()
                        .ok_or_else(|| missing("artist", "begin date"))?;
                    set_date_if_unset(form, "edit-artist.period.begin_date", date)?
                }
                ArtistField::EndDate => {
                    let date = artist
                        .end_date
                        .as_ref()
                        .ok_or_else(|| missing("artist", "end date"))?;
                    set_date_if_unset(form, "edit-artist.period.end_date", date)?
                }
                ArtistField::Comment => {
                    let comment = artist
                        .comment
                        .as_deref()
                        .ok_or_else(|| missing("artist", "comment"))?;
                    set_if_unset(form, "edit-artist.comment", comment.into())?
                }
            };
            if !guard.is_written() {
                return Ok(guard);
            }
        }
        Ok(Guard::Written)
    }
}

/// Fill in unset attributes of a work.
#[derive(Debug, Clone, Copy)]
pub struct WorkEdit<'a> {
    pub work: &'a Work,
    pub update: &'a WorkUpdate,
}

impl FormEdit for WorkEdit<'_> {
    fn path(&self) -> String {
        format!("/work/{}/edit", self.work.id)
    }

    fn prefix(&self) -> &str {
        "edit-work."
    }

    fn apply(&self, form: &mut HtmlForm) -> Result<Guard> {
        let work = self.work;
        let order = [WorkField::Type, WorkField::Language, WorkField::Comment];

        for field in order.into_iter().filter(|f| self.update.contains(f)) {
            let guard = match field {
                WorkField::Type => {
                    let type_id = work.type_id.ok_or_else(|| missing("work", "type"))?;
                    set_if_unset(form, "edit-work.type_id", selector(type_id))?
                }
                WorkField::Language => {
                    let language = work
                        .language_id
                        .ok_or_else(|| missing("work", "language"))?;
                    set_if_unset(form, "edit-work.language_id", selector(language))?
                }
                WorkField::Comment => {
                    let comment = work
                        .comment
                        .as_deref()
                        .ok_or_else(|| missing("work", "comment"))?;
                    set_if_unset(form, "edit-work.comment", comment.into())?
                }
            };
            if !guard.is_written() {
                return Ok(guard);
            }
        }
        Ok(Guard::Written)
    }
}

/// Set an artist's type if it has none.
#[derive(Debug, Clone)]
pub struct ArtistTypeEdit {
    pub artist_id: String,
    pub type_id: u32,
}

impl FormEdit for ArtistTypeEdit {
    fn path(&self) -> String {
        format!("/artist/{}/edit", self.artist_id)
    }

    fn prefix(&self) -> &str {
        "edit-artist."
    }

    fn apply(&self, form: &mut HtmlForm) -> Result<Guard> {
        set_if_unset(form, "edit-artist.type_id", selector(self.type_id))
    }
}

/// Replace a URL entity's address, provided it still holds the old one.
#[derive(Debug, Clone)]
pub struct UrlEdit {
    pub url_id: String,
    pub old_url: String,
    pub new_url: String,
}

impl FormEdit for UrlEdit {
    fn path(&self) -> String {
        format!("/url/{}/edit", self.url_id)
    }

    fn prefix(&self) -> &str {
        "edit-url."
    }

    fn apply(&self, form: &mut HtmlForm) -> Result<Guard> {
        let key = "edit-url.url";
        let current = form.value(key)?;
        if current != self.old_url {
            log::warn!("{key} has changed to {current:?}, aborting");
            return Err(MusicBrainzError::RemoteStateChanged {
                field: key.to_string(),
                expected: vec![self.old_url.clone()],
                actual: vec![current],
            });
        }
        if current == self.new_url {
            log::info!("{key} already set to {current:?}, not changing");
            return Ok(Guard::AlreadySet {
                field: key.to_string(),
            });
        }
        form.set(key, self.new_url.as_str())?;
        Ok(Guard::Written)
    }
}

/// Rewrite one artist credit as a split into several credited artists.
#[derive(Debug, Clone, Copy)]
pub struct ArtistCreditEdit<'a> {
    pub artist_id: &'a str,
    pub credit_id: u32,
    pub split: &'a ArtistCreditSplit,
}

impl FormEdit for ArtistCreditEdit<'_> {
    fn path(&self) -> String {
        format!("/artist/{}/credit/{}/edit", self.artist_id, self.credit_id)
    }

    fn prefix(&self) -> &str {
        "split-artist."
    }

    fn apply(&self, form: &mut HtmlForm) -> Result<Guard> {
        let fields = credit_split_fields(self.split)?;
        // Rows past the existing credit's length do not exist in the form yet
        for (path, value) in fields.iter() {
            form.ensure_text_control(path);
            form.set(path, value.clone())?;
        }
        Ok(Guard::Written)
    }
}

fn selector(id: u32) -> FieldValue {
    FieldValue::List(vec![id.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PartialDate;

    const ARTIST_PAGE: &str = r#"
        <form action="/artist/5b11f4ce-a62d-471e-81fc-a69a8278c7da/edit" method="post">
          <input name="edit-artist.name" value="Nirvana">
          <input name="edit-artist.sort_name" value="Nirvana">
          <input name="edit-artist.comment" value="">
          <input type="hidden" name="edit-artist.area_id" value="">
          <select name="edit-artist.type_id"><option value=""></option><option value="2">Group</option></select>
          <select name="edit-artist.gender_id"><option value=""></option><option value="1">Male</option></select>
          <input name="edit-artist.period.begin_date.year" value="1987">
          <input name="edit-artist.period.begin_date.month" value="">
          <input name="edit-artist.period.begin_date.day" value="">
          <input name="edit-artist.period.end_date.year" value="">
          <input name="edit-artist.period.end_date.month" value="">
          <input name="edit-artist.period.end_date.day" value="">
          <textarea name="edit-artist.edit_note"></textarea>
          <input type="checkbox" name="edit-artist.make_votable" value="1">
          <button type="submit">Enter edit</button>
        </form>
    "#;

    fn artist() -> Artist {
        Artist {
            id: "5b11f4ce-a62d-471e-81fc-a69a8278c7da".to_string(),
            name: "Nirvana".to_string(),
            type_id: Some(2),
            area_id: Some(222),
            comment: Some("90s US grunge band".to_string()),
            begin_date: Some(PartialDate::year(1987)),
            end_date: Some(PartialDate::year(1994).with_month(4).with_day(5)),
            ..Default::default()
        }
    }

    fn form() -> HtmlForm {
        HtmlForm::select_post(
            ARTIST_PAGE,
            "https://musicbrainz.org/artist/5b11f4ce-a62d-471e-81fc-a69a8278c7da/edit",
            "/edit",
        )
        .unwrap()
    }

    #[test]
    fn test_artist_edit_fills_requested_fields_only() {
        let artist = artist();
        let update: ArtistUpdate = [ArtistField::Type, ArtistField::EndDate, ArtistField::Comment]
            .into_iter()
            .collect();
        let edit = ArtistEdit {
            artist: &artist,
            update: &update,
        };
        let mut form = form();

        assert_eq!(edit.apply(&mut form).unwrap(), Guard::Written);
        assert_eq!(form.get("edit-artist.type_id").unwrap(), vec!["2"]);
        assert_eq!(form.value("edit-artist.period.end_date.year").unwrap(), "1994");
        assert_eq!(form.value("edit-artist.period.end_date.month").unwrap(), "4");
        assert_eq!(form.value("edit-artist.period.end_date.day").unwrap(), "5");
        assert_eq!(form.value("edit-artist.comment").unwrap(), "90s US grunge band");
        assert_eq!(form.value("edit-artist.area_id").unwrap(), "");
    }

    #[test]
    fn test_artist_edit_stops_at_first_set_field() {
        let artist = artist();
        let update: ArtistUpdate = [ArtistField::BeginDate, ArtistField::Comment]
            .into_iter()
            .collect();
        let edit = ArtistEdit {
            artist: &artist,
            update: &update,
        };
        let mut form = form();

        assert_eq!(
            edit.apply(&mut form).unwrap(),
            Guard::AlreadySet {
                field: "edit-artist.period.begin_date.year".to_string()
            }
        );
        assert_eq!(form.value("edit-artist.comment").unwrap(), "");
    }

    #[test]
    fn test_artist_edit_missing_value_is_precondition_failure() {
        let artist = artist();
        let update: ArtistUpdate = [ArtistField::Gender].into_iter().collect();
        let edit = ArtistEdit {
            artist: &artist,
            update: &update,
        };
        assert!(matches!(
            edit.apply(&mut form()),
            Err(MusicBrainzError::Precondition(_))
        ));
    }

    #[test]
    fn test_edit_note_and_mode() {
        let mut form = form();
        attach_edit_note(&mut form, "edit-artist.", "see wikipedia", Some(EditMode::Votable))
            .unwrap();
        assert_eq!(form.value("edit-artist.edit_note").unwrap(), "see wikipedia");
        assert_eq!(form.get("edit-artist.make_votable").unwrap(), vec!["1"]);

        set_edit_mode(&mut form, "edit-artist.", EditMode::Auto);
        assert!(form.get("edit-artist.make_votable").unwrap().is_empty());

        // no such checkbox: silently ignored
        set_edit_mode(&mut form, "edit-work.", EditMode::Auto);
    }

    #[test]
    fn test_url_edit() {
        let page = r#"<form action="/url/9f6c/edit" method="post">
            <input name="edit-url.url" value="http://example.com/old">
        </form>"#;
        let mut form =
            HtmlForm::select_post(page, "https://musicbrainz.org/url/9f6c/edit", "/edit").unwrap();

        let stale = UrlEdit {
            url_id: "9f6c".to_string(),
            old_url: "http://example.com/older".to_string(),
            new_url: "https://example.com/new".to_string(),
        };
        assert!(matches!(
            stale.apply(&mut form),
            Err(MusicBrainzError::RemoteStateChanged { .. })
        ));

        let edit = UrlEdit {
            old_url: "http://example.com/old".to_string(),
            ..stale
        };
        assert_eq!(edit.apply(&mut form).unwrap(), Guard::Written);
        assert_eq!(form.value("edit-url.url").unwrap(), "https://example.com/new");
    }

    #[test]
    fn test_url_edit_reports_drift_to_new_value() {
        let page = r#"<form action="/url/9f6c/edit" method="post">
            <input name="edit-url.url" value="https://example.com/new">
        </form>"#;
        let mut form =
            HtmlForm::select_post(page, "https://musicbrainz.org/url/9f6c/edit", "/edit").unwrap();

        // Someone else already changed it, from a value we did not expect
        let edit = UrlEdit {
            url_id: "9f6c".to_string(),
            old_url: "http://example.com/something-else".to_string(),
            new_url: "https://example.com/new".to_string(),
        };
        match edit.apply(&mut form) {
            Err(MusicBrainzError::RemoteStateChanged {
                field,
                expected,
                actual,
            }) => {
                assert_eq!(field, "edit-url.url");
                assert_eq!(expected, vec!["http://example.com/something-else".to_string()]);
                assert_eq!(actual, vec!["https://example.com/new".to_string()]);
            }
            other => panic!("expected drift to be reported, got {other:?}"),
        }

        let unchanged = UrlEdit {
            old_url: "https://example.com/new".to_string(),
            ..edit
        };
        assert!(!unchanged.apply(&mut form).unwrap().is_written());
    }

    #[test]
    fn test_credit_edit_adds_missing_rows() {
        let page = r#"<form action="/artist/abc/credit/7/edit" method="post">
            <input name="split-artist.artist_credit.names.0.artist.id" value="11">
            <input name="split-artist.artist_credit.names.0.name" value="A &amp; B">
            <input name="split-artist.artist_credit.names.0.join_phrase" value="">
            <textarea name="split-artist.edit_note"></textarea>
        </form>"#;
        let mut form = HtmlForm::select_post(
            page,
            "https://musicbrainz.org/artist/abc/credit/7/edit",
            "/edit",
        )
        .unwrap();
        let split = ArtistCreditSplit {
            artist_ids: vec![11, 12],
            names: vec!["A".to_string(), "B".to_string()],
            join_phrases: vec![" & ".to_string()],
        };
        let edit = ArtistCreditEdit {
            artist_id: "abc",
            credit_id: 7,
            split: &split,
        };

        assert_eq!(edit.path(), "/artist/abc/credit/7/edit");
        assert!(edit.apply(&mut form).unwrap().is_written());
        assert_eq!(
            form.value("split-artist.artist_credit.names.0.name").unwrap(),
            "A"
        );
        assert_eq!(
            form.value("split-artist.artist_credit.names.1.artist.id").unwrap(),
            "12"
        );
        assert_eq!(
            form.value("split-artist.artist_credit.names.0.join_phrase").unwrap(),
            " & "
        );
    }
}
