use crate::session::EditSession;
use crate::{MusicBrainzError, Result};
use http_types::Url;
use scraper::{Html, Selector};

impl EditSession {
    /// Authenticate with the service using username and password.
    ///
    /// This method:
    /// 1. Loads the login page and selects its POST form
    /// 2. Fills in `username` and `password` and submits
    /// 3. Checks that the redirect chain ended on the editor's profile page
    ///
    /// Landing anywhere else (usually the login form again, with validation
    /// messages) is an [`MusicBrainzError::Auth`] failure; it is not retried.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let login_url = self.url("/login", None);
        self.open(&login_url).await?;

        let form = self.select_form("/login")?;
        form.set("username", username)?;
        form.set("password", password)?;
        self.submit(None).await?;

        let expected = self.profile_url(username);
        let page = self.page()?;
        if !same_address(&page.url, &expected) {
            let reason = parse_login_error(&page.body);
            log::debug!("Login ended up on {} instead of {expected}", page.url);
            return Err(MusicBrainzError::Auth(format!(
                "ended up on {} instead of {expected}{reason}",
                page.url
            )));
        }

        log::debug!("Login successful - authenticated as {username}");
        Ok(())
    }

    /// Address of an editor's profile page
    pub fn profile_url(&self, username: &str) -> String {
        self.url(&format!("/user/{}", urlencoding::encode(username)), None)
    }
}

/// Compare two addresses after parsing, so case in the host does not matter
fn same_address(actual: &str, expected: &str) -> bool {
    match (Url::parse(actual), Url::parse(expected)) {
        (Ok(actual), Ok(expected)) => actual == expected,
        _ => actual == expected,
    }
}

/// Collect validation messages from a re-displayed login page
fn parse_login_error(html: &str) -> String {
    let document = Html::parse_document(html);
    let error_selector = Selector::parse(".error, .form-error, .alert-danger").unwrap();

    let messages: Vec<String> = document
        .select(&error_selector)
        .map(|error| error.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if messages.is_empty() {
        String::new()
    } else {
        format!(": {}", messages.join("; "))
    }
}
