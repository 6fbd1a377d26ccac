mod common;

use common::{Reply, ScriptedClient};
use musicbrainz_edit::{
    Artist, ArtistCreditSplit, ArtistField, ArtistUpdate, EditMode, EditOutcome, EntityType,
    MusicBrainzError, PartialDate, Work, WorkField, WorkUpdate,
};

const ARTIST_ID: &str = "5b11f4ce-a62d-471e-81fc-a69a8278c7da";
const URL_ID: &str = "f1b2a3c4-0000-4000-8000-0123456789ab";
const WORK_ID: &str = "a0b1c2d3-1111-4222-8333-444455556666";

const THANK_YOU: &str =
    "<p>Thank you, your edit has been entered into the edit queue for peer review.</p>";

fn artist_page(type_selected: &str, begin_year: &str) -> String {
    let option = |value: &str| {
        if value == type_selected {
            format!(r#"<option value="{value}" selected>{value}</option>"#)
        } else {
            format!(r#"<option value="{value}">{value}</option>"#)
        }
    };
    format!(
        r#"<form action="/search" method="get"><input name="query"></form>
        <form action="/artist/{ARTIST_ID}/edit" method="post">
          <input name="edit-artist.name" value="Nirvana">
          <input name="edit-artist.sort_name" value="Nirvana">
          <select name="edit-artist.type_id"><option value=""></option>{}{}</select>
          <select name="edit-artist.gender_id"><option value=""></option><option value="1">1</option></select>
          <input name="edit-artist.area_id" value="">
          <input name="edit-artist.period.begin_date.year" value="{begin_year}">
          <input name="edit-artist.period.begin_date.month" value="">
          <input name="edit-artist.period.begin_date.day" value="">
          <input name="edit-artist.comment" value="">
          <textarea name="edit-artist.edit_note"></textarea>
          <input type="checkbox" name="edit-artist.make_votable" value="1">
          <button type="submit" class="submit positive">Enter edit</button>
        </form>"#,
        option("1"),
        option("2"),
    )
}

fn script_artist_edit(http: &ScriptedClient, page: String, answer: Reply) {
    let path = format!("/artist/{ARTIST_ID}/edit");
    http.on("GET", &path, Reply::ok(&page))
        .on("POST", &path, Reply::redirect(&format!("/artist/{ARTIST_ID}")))
        .on("GET", &format!("/artist/{ARTIST_ID}"), answer);
}

#[test_log::test(tokio::test)]
async fn test_set_artist_type() {
    let http = ScriptedClient::new().with_login();
    script_artist_edit(&http, artist_page("", ""), Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let outcome = client
        .set_artist_type(ARTIST_ID, 2, "Band, see discogs", EditMode::Votable)
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::submitted());

    let post = &http.posts_to(&format!("/artist/{ARTIST_ID}/edit"))[0];
    assert_eq!(post.field("edit-artist.type_id").as_deref(), Some("2"));
    assert_eq!(
        post.field("edit-artist.edit_note").as_deref(),
        Some("Band, see discogs")
    );
    assert_eq!(post.field("edit-artist.make_votable").as_deref(), Some("1"));
    // Untouched controls travel as loaded
    assert_eq!(post.field("edit-artist.name").as_deref(), Some("Nirvana"));
    assert!(post.cookie.is_some());
}

#[tokio::test]
async fn test_set_artist_type_already_set() {
    let http = ScriptedClient::new().with_login();
    script_artist_edit(&http, artist_page("1", ""), Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let outcome = client
        .set_artist_type(ARTIST_ID, 2, "", EditMode::Votable)
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::AlreadySet);
    assert!(http.posts_to(&format!("/artist/{ARTIST_ID}/edit")).is_empty());
}

#[tokio::test]
async fn test_set_artist_type_unknown_option() {
    let http = ScriptedClient::new().with_login();
    script_artist_edit(&http, artist_page("", ""), Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let result = client
        .set_artist_type(ARTIST_ID, 999, "", EditMode::Votable)
        .await;
    assert!(matches!(result, Err(MusicBrainzError::Precondition(_))));
    assert!(http.posts_to(&format!("/artist/{ARTIST_ID}/edit")).is_empty());
}

#[tokio::test]
async fn test_edit_artist_stops_at_first_set_attribute() {
    let http = ScriptedClient::new().with_login();
    script_artist_edit(&http, artist_page("", "1987"), Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let artist = Artist {
        id: ARTIST_ID.to_string(),
        type_id: Some(2),
        begin_date: Some(PartialDate::year(1988).with_month(1)),
        ..Artist::named("Nirvana", "Nirvana")
    };
    let update: ArtistUpdate = [ArtistField::Type, ArtistField::BeginDate]
        .into_iter()
        .collect();

    let outcome = client
        .edit_artist(&artist, &update, "", EditMode::Auto)
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::AlreadySet);
    assert!(http.posts_to(&format!("/artist/{ARTIST_ID}/edit")).is_empty());
}

#[tokio::test]
async fn test_edit_artist_no_op_answer() {
    let http = ScriptedClient::new().with_login();
    script_artist_edit(
        &http,
        artist_page("", ""),
        Reply::ok("<p>The data you have submitted does not make any changes to the data already present.</p>"),
    );
    let mut client = common::logged_in_client(&http).await;

    let artist = Artist {
        id: ARTIST_ID.to_string(),
        comment: Some("US grunge band".to_string()),
        begin_date: Some(PartialDate::year(1987)),
        ..Artist::default()
    };
    let update: ArtistUpdate = [ArtistField::Comment, ArtistField::BeginDate]
        .into_iter()
        .collect();

    let outcome = client
        .edit_artist(&artist, &update, "", EditMode::Auto)
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::AlreadySet);

    let post = &http.posts_to(&format!("/artist/{ARTIST_ID}/edit"))[0];
    assert_eq!(
        post.field("edit-artist.period.begin_date.year").as_deref(),
        Some("1987")
    );
    assert_eq!(
        post.field("edit-artist.comment").as_deref(),
        Some("US grunge band")
    );
    assert_eq!(post.field("edit-artist.make_votable"), None);
}

#[tokio::test]
async fn test_edit_artist_unrecognized_answer() {
    let http = ScriptedClient::new().with_login();
    script_artist_edit(
        &http,
        artist_page("", ""),
        Reply::ok("<p>Internal server error</p>"),
    );
    let mut client = common::logged_in_client(&http).await;

    let result = client
        .set_artist_type(ARTIST_ID, 1, "", EditMode::Votable)
        .await;
    assert!(matches!(result, Err(MusicBrainzError::PostFailure(_))));
}

#[tokio::test]
async fn test_add_artist() {
    let http = ScriptedClient::new().with_login();
    http.on(
        "GET",
        "/artist/create",
        Reply::ok(
            r#"<form action="/artist/create" method="post">
              <input name="edit-artist.name">
              <input name="edit-artist.sort_name">
              <textarea name="edit-artist.edit_note"></textarea>
              <input type="checkbox" name="edit-artist.make_votable" value="1">
              <button type="submit">Enter edit</button>
            </form>"#,
        ),
    )
    .on(
        "POST",
        "/artist/create",
        Reply::redirect(&format!("/artist/{ARTIST_ID}")),
    )
    .on(
        "GET",
        &format!("/artist/{ARTIST_ID}"),
        Reply::ok("<h1>The Artist</h1>"),
    );
    let mut client = common::logged_in_client(&http).await;

    let outcome = client
        .add_artist(
            &Artist::named("The Artist", "Artist, The"),
            "From the liner notes",
            EditMode::Votable,
        )
        .await
        .unwrap();
    assert_eq!(outcome.id(), Some(ARTIST_ID));

    let post = &http.posts_to("/artist/create")[0];
    assert_eq!(post.field("edit-artist.sort_name").as_deref(), Some("Artist, The"));
    assert_eq!(
        post.field("edit-artist.edit_note").as_deref(),
        Some("From the liner notes")
    );
}

#[tokio::test]
async fn test_add_artist_needs_sort_name() {
    let http = ScriptedClient::new().with_login();
    let mut client = common::logged_in_client(&http).await;

    let artist = Artist {
        name: "The Artist".to_string(),
        ..Artist::default()
    };
    let result = client.add_artist(&artist, "", EditMode::Votable).await;
    assert!(matches!(result, Err(MusicBrainzError::Precondition(_))));
    assert!(http.requests_after_login().is_empty());
}

#[tokio::test]
async fn test_edit_artist_credit_validates_before_loading() {
    let http = ScriptedClient::new().with_login();
    let mut client = common::logged_in_client(&http).await;

    let split = ArtistCreditSplit {
        artist_ids: vec![11, 22],
        names: vec!["Simon".to_string(), "Garfunkel".to_string()],
        join_phrases: vec![],
    };
    let result = client.edit_artist_credit(ARTIST_ID, 7, &split, "").await;
    assert!(matches!(result, Err(MusicBrainzError::Precondition(_))));
    assert!(http.requests_after_login().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_edit_artist_credit_split() {
    let http = ScriptedClient::new().with_login();
    let path = format!("/artist/{ARTIST_ID}/credit/7/edit");
    http.on(
        "GET",
        &path,
        Reply::ok(&format!(
            r#"<form action="{path}" method="post">
              <input name="split-artist.artist_credit.names.0.name" value="Simon &amp; Garfunkel">
              <input name="split-artist.artist_credit.names.0.artist.id" value="33">
              <input name="split-artist.artist_credit.names.0.join_phrase" value="">
              <textarea name="split-artist.edit_note"></textarea>
              <button type="submit">Enter edit</button>
            </form>"#
        )),
    )
    .on("POST", &path, Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let split = ArtistCreditSplit {
        artist_ids: vec![11, 22],
        names: vec!["Simon".to_string(), "Garfunkel".to_string()],
        join_phrases: vec![" & ".to_string()],
    };
    let outcome = client
        .edit_artist_credit(ARTIST_ID, 7, &split, "Two artists")
        .await
        .unwrap();
    assert!(outcome.is_submitted());

    let post = &http.posts_to(&path)[0];
    assert_eq!(
        post.field("split-artist.artist_credit.names.0.join_phrase").as_deref(),
        Some(" & ")
    );
    assert_eq!(
        post.field("split-artist.artist_credit.names.1.artist.id").as_deref(),
        Some("22")
    );
    assert_eq!(
        post.field("split-artist.artist_credit.names.1.join_phrase").as_deref(),
        Some("")
    );
    assert_eq!(
        post.field("split-artist.edit_note").as_deref(),
        Some("Two artists")
    );
}

#[tokio::test]
async fn test_edit_url_checks_old_value() {
    let http = ScriptedClient::new().with_login();
    let path = format!("/url/{URL_ID}/edit");
    http.on(
        "GET",
        &path,
        Reply::ok(&format!(
            r#"<form action="{path}" method="post">
              <input name="edit-url.url" value="http://www.example.com/band">
              <textarea name="edit-url.edit_note"></textarea>
              <button type="submit">Enter edit</button>
            </form>"#
        )),
    )
    .on("POST", &path, Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let result = client
        .edit_url(
            URL_ID,
            "http://example.com/band",
            "https://example.com/band",
            "",
            EditMode::Votable,
        )
        .await;
    assert!(matches!(
        result,
        Err(MusicBrainzError::RemoteStateChanged { .. })
    ));

    let outcome = client
        .edit_url(
            URL_ID,
            "http://www.example.com/band",
            "https://www.example.com/band",
            "Use https",
            EditMode::Votable,
        )
        .await
        .unwrap();
    assert!(outcome.is_submitted());

    let posts = http.posts_to(&path);
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].field("edit-url.url").as_deref(),
        Some("https://www.example.com/band")
    );
}

fn work_page(path: &str, language_selected: &str) -> String {
    let selected = if language_selected == "120" { " selected" } else { "" };
    format!(
        r#"<form action="{path}" method="post">
          <select name="edit-work.type_id"><option value=""></option><option value="17">Song</option></select>
          <select name="edit-work.language_id"><option value=""></option><option value="120"{selected}>English</option></select>
          <input name="edit-work.comment" value="">
          <textarea name="edit-work.edit_note"></textarea>
          <button type="submit">Enter edit</button>
        </form>"#
    )
}

#[tokio::test]
async fn test_edit_work() {
    let http = ScriptedClient::new().with_login();
    let path = format!("/work/{WORK_ID}/edit");
    http.on("GET", &path, Reply::ok(&work_page(&path, "")))
        .on("POST", &path, Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let work = Work {
        id: WORK_ID.to_string(),
        type_id: Some(17),
        language_id: Some(120),
        comment: None,
    };
    let update: WorkUpdate = [WorkField::Type, WorkField::Language].into_iter().collect();
    let outcome = client
        .edit_work(&work, &update, "", EditMode::Votable)
        .await
        .unwrap();
    assert!(outcome.is_submitted());

    let post = &http.posts_to(&path)[0];
    assert_eq!(post.field("edit-work.type_id").as_deref(), Some("17"));
    assert_eq!(post.field("edit-work.language_id").as_deref(), Some("120"));
}

#[tokio::test]
async fn test_edit_work_language_already_set() {
    let http = ScriptedClient::new().with_login();
    let path = format!("/work/{WORK_ID}/edit");
    http.on("GET", &path, Reply::ok(&work_page(&path, "120")))
        .on("POST", &path, Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let work = Work {
        id: WORK_ID.to_string(),
        type_id: None,
        language_id: Some(120),
        comment: None,
    };
    let update: WorkUpdate = [WorkField::Language].into_iter().collect();
    let outcome = client
        .edit_work(&work, &update, "", EditMode::Votable)
        .await
        .unwrap();
    assert_eq!(outcome, EditOutcome::AlreadySet);
    assert!(http.posts_to(&path).is_empty());
}

#[tokio::test]
async fn test_remove_relationship() {
    let http = ScriptedClient::new().with_login();
    http.on(
        "GET",
        "/edit/relationship/delete",
        Reply::ok(
            r#"<form action="/edit/relationship/delete?id=123&amp;type0=artist&amp;type1=url" method="post">
              <textarea name="confirm.edit_note"></textarea>
              <button type="submit">Enter edit</button>
            </form>"#,
        ),
    )
    .on("POST", "/edit/relationship/delete", Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let outcome = client
        .remove_relationship(123, EntityType::Artist, EntityType::Url, "Dead link")
        .await
        .unwrap();
    assert!(outcome.is_submitted());

    let load = http
        .requests()
        .into_iter()
        .find(|request| request.method == "GET" && request.path() == "/edit/relationship/delete")
        .unwrap();
    let query = load.query();
    assert!(query.contains(&("type0".to_string(), "artist".to_string())));
    assert!(query.contains(&("type1".to_string(), "url".to_string())));

    let post = &http.posts_to("/edit/relationship/delete")[0];
    assert_eq!(post.field("confirm.edit_note").as_deref(), Some("Dead link"));
}

#[tokio::test]
async fn test_remove_relationship_requires_acknowledgment() {
    let http = ScriptedClient::new().with_login();
    http.on(
        "GET",
        "/edit/relationship/delete",
        Reply::ok(
            r#"<form action="/edit/relationship/delete?id=123" method="post">
              <textarea name="confirm.edit_note"></textarea>
            </form>"#,
        ),
    )
    .on(
        "POST",
        "/edit/relationship/delete",
        Reply::ok("<p>This does not make any changes to the data already present.</p>"),
    );
    let mut client = common::logged_in_client(&http).await;

    let result = client
        .remove_relationship(123, EntityType::Artist, EntityType::Url, "")
        .await;
    assert!(matches!(result, Err(MusicBrainzError::PostFailure(_))));
}

#[test_log::test(tokio::test)]
async fn test_merge() {
    let http = ScriptedClient::new().with_login();
    http.on(
        "POST",
        "/artist/merge_queue",
        Reply::redirect("/artist/merge"),
    )
    .on(
        "GET",
        "/artist/merge",
        Reply::ok("<p>You are about to merge the following artists</p>"),
    )
    .on("POST", "/artist/merge", Reply::ok(THANK_YOU));
    let mut client = common::logged_in_client(&http).await;

    let ids = vec!["111".to_string(), "222".to_string()];
    let outcome = client
        .merge(EntityType::Artist, &ids, "222", "Duplicates")
        .await
        .unwrap();
    assert!(outcome.is_submitted());

    let queue = &http.posts_to("/artist/merge_queue")[0];
    let queued: Vec<String> = queue
        .fields()
        .into_iter()
        .filter(|(key, _)| key == "add-to-merge")
        .map(|(_, value)| value)
        .collect();
    assert_eq!(queued, ids);

    let merge = &http.posts_to("/artist/merge")[0];
    assert_eq!(merge.field("merge.target").as_deref(), Some("222"));
    assert_eq!(merge.field("merge.merging.1").as_deref(), Some("222"));
    assert_eq!(merge.field("merge.edit_note").as_deref(), Some("Duplicates"));
}

#[tokio::test]
async fn test_merge_queue_rejected() {
    let http = ScriptedClient::new().with_login();
    http.on(
        "POST",
        "/recording/merge_queue",
        Reply::ok("<p>Nothing to merge</p>"),
    );
    let mut client = common::logged_in_client(&http).await;

    let ids = vec!["111".to_string(), "222".to_string()];
    let result = client
        .merge(EntityType::Recording, &ids, "111", "")
        .await;
    assert!(matches!(result, Err(MusicBrainzError::PostFailure(_))));
    assert!(http.posts_to("/recording/merge").is_empty());
}
