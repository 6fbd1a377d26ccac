use crate::fields::{encode_pairs, FormFields};
use crate::form::HtmlForm;
use crate::headers::{add_common_headers, add_cookies, add_form_headers, extract_cookies};
use crate::{MusicBrainzError, Result};
use http_client::{HttpClient, Request};
use http_types::{Method, Url};

/// Redirect hops followed before giving up
const MAX_REDIRECTS: u32 = 10;

/// Page most recently loaded by an [`EditSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Address after following redirects
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// A browser-like session against the service.
///
/// Holds the cookie jar, the page most recently loaded and the form selected
/// on it. Every call replaces that state, so operations on one session must
/// run one at a time; `&mut self` on every request enforces this. Use a
/// separate session (with its own login) for concurrent work.
pub struct EditSession {
    client: Box<dyn HttpClient>,
    base_url: String,
    user_agent: String,
    cookies: Vec<String>,
    page: Option<Page>,
    form: Option<HtmlForm>,
}

/// Canonical form of a base address, the way the service reports page URLs
fn normalize_base_url(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    match Url::parse(base_url) {
        Ok(url) => url.as_str().trim_end_matches('/').to_string(),
        Err(_) => base_url.to_string(),
    }
}

impl EditSession {
    pub fn new(client: Box<dyn HttpClient>, base_url: &str, user_agent: String) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            user_agent,
            cookies: Vec::new(),
            page: None,
            form: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn set_user_agent(&mut self, user_agent: String) {
        self.user_agent = user_agent;
    }

    pub fn cookies(&self) -> &[String] {
        &self.cookies
    }

    /// Absolute address of a service path, with an optional query.
    pub fn url(&self, path: &str, query: Option<&FormFields>) -> String {
        match query {
            Some(query) if !query.is_empty() => {
                format!("{}{}?{}", self.base_url, path, query.to_urlencoded())
            }
            _ => format!("{}{}", self.base_url, path),
        }
    }

    /// The page most recently loaded.
    pub fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| MusicBrainzError::Http("no page has been loaded".to_string()))
    }

    /// Final address of the page most recently loaded.
    pub fn current_url(&self) -> Result<&str> {
        Ok(&self.page()?.url)
    }

    /// Body of the page most recently loaded.
    pub fn body(&self) -> Result<&str> {
        Ok(&self.page()?.body)
    }

    /// Load a page with GET, following redirects.
    pub async fn open(&mut self, url: &str) -> Result<&Page> {
        self.request(Method::Get, url, None, None).await
    }

    /// POST url-encoded fields to an address, following redirects.
    pub async fn open_with_fields(&mut self, url: &str, fields: &FormFields) -> Result<&Page> {
        self.request(Method::Post, url, Some(fields.to_urlencoded()), None)
            .await
    }

    /// Select the POST form whose action contains `action_fragment` on the
    /// current page.
    pub fn select_form(&mut self, action_fragment: &str) -> Result<&mut HtmlForm> {
        let page = self.page()?;
        let form = HtmlForm::select_post(&page.body, &page.url, action_fragment)?;
        log::debug!("Selected form {} {}", form.method(), form.action());
        Ok(self.form.insert(form))
    }

    /// The form chosen by the last [`select_form`](Self::select_form).
    pub fn form_mut(&mut self) -> Result<&mut HtmlForm> {
        self.form
            .as_mut()
            .ok_or_else(|| MusicBrainzError::FormNotFound("no form selected".to_string()))
    }

    /// Submit the selected form by clicking `submit_name` (or its first
    /// submit control) and load the response.
    pub async fn submit(&mut self, submit_name: Option<&str>) -> Result<&Page> {
        let form = self
            .form
            .take()
            .ok_or_else(|| MusicBrainzError::FormNotFound("no form selected".to_string()))?;
        let pairs = form.submission(submit_name)?;
        let referer = self.page.as_ref().map(|page| page.url.clone());
        log::debug!(
            "Submitting {} fields to {} (button: {})",
            pairs.len(),
            form.action(),
            submit_name.unwrap_or("default")
        );

        if form.method() == "POST" {
            self.request(
                Method::Post,
                form.action(),
                Some(encode_pairs(&pairs)),
                referer.as_deref(),
            )
            .await
        } else {
            let separator = if form.action().contains('?') { '&' } else { '?' };
            let url = format!("{}{}{}", form.action(), separator, encode_pairs(&pairs));
            self.request(Method::Get, &url, None, referer.as_deref())
                .await
        }
    }

    async fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<String>,
        referer: Option<&str>,
    ) -> Result<&Page> {
        self.form = None;

        let mut method = method;
        let mut url = url.to_string();
        let mut body = body;
        let mut redirects = 0;

        loop {
            let parsed = url
                .parse::<Url>()
                .map_err(|e| MusicBrainzError::Http(format!("invalid address {url}: {e}")))?;
            let mut request = Request::new(method, parsed.clone());
            add_common_headers(&mut request, &self.user_agent);
            add_cookies(&mut request, &self.cookies);
            if let Some(ref form_body) = body {
                add_form_headers(&mut request, &self.base_url, referer);
                request.set_body(form_body.clone());
            } else if let Some(referer) = referer {
                let _ = request.insert_header("Referer", referer);
            }

            log::debug!("{method} {url}");
            let mut response = self
                .client
                .send(request)
                .await
                .map_err(|e| MusicBrainzError::Http(e.to_string()))?;

            let new_cookies = extract_cookies(&response, &mut self.cookies);
            if new_cookies > 0 {
                log::trace!(
                    "Extracted {} new cookies, total: {}",
                    new_cookies,
                    self.cookies.len()
                );
            }

            let status: u16 = response.status().into();
            if matches!(status, 301 | 302 | 303 | 307 | 308) {
                let location = response
                    .header("location")
                    .and_then(|values| values.get(0))
                    .map(|value| value.as_str().to_string());
                if let Some(location) = location {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(MusicBrainzError::Http("Too many redirects".to_string()));
                    }
                    let next = parsed
                        .join(&location)
                        .map_err(|e| {
                            MusicBrainzError::Http(format!("invalid redirect {location}: {e}"))
                        })?
                        .to_string();
                    log::debug!("Following redirect from {url} to {next}");

                    // 307/308 replay the request; the others turn into a GET
                    if !matches!(status, 307 | 308) {
                        method = Method::Get;
                        body = None;
                    }
                    url = next;
                    continue;
                }
            }

            let text = response
                .body_string()
                .await
                .map_err(|e| MusicBrainzError::Http(e.to_string()))?;
            log::debug!("{status} from {url} ({} bytes)", text.len());

            return Ok(&*self.page.insert(Page {
                url,
                status,
                body: text,
            }));
        }
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("cookies", &self.cookies.len())
            .field("page", &self.page.as_ref().map(|page| &page.url))
            .finish()
    }
}
