#![allow(dead_code)]
use async_trait::async_trait;
use http_client::{HttpClient, Request, Response};
use musicbrainz_edit::{ClientConfig, MusicBrainzClient};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "https://mb.example.org";
pub const USERNAME: &str = "SomeBot";
pub const PASSWORD: &str = "hunter2";
pub const SESSION_COOKIE: &str = "musicbrainz_server_session=abc123";

/// A canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub location: Option<String>,
    pub set_cookies: Vec<String>,
    pub body: String,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            location: None,
            set_cookies: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            location: Some(location.to_string()),
            set_cookies: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookies.push(cookie.to_string());
        self
    }
}

/// A request the client sent.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub body: String,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

impl Recorded {
    pub fn path(&self) -> &str {
        let without_base = self.url.strip_prefix(BASE_URL).unwrap_or(&self.url);
        without_base.split('?').next().unwrap_or(without_base)
    }

    /// Decoded form fields of the body, in order.
    pub fn fields(&self) -> Vec<(String, String)> {
        decode_pairs(&self.body)
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn query(&self) -> Vec<(String, String)> {
        self.url
            .split_once('?')
            .map(|(_, query)| decode_pairs(query))
            .unwrap_or_default()
    }
}

fn decode_pairs(encoded: &str) -> Vec<(String, String)> {
    encoded
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decode = |raw: &str| {
                urlencoding::decode(&raw.replace('+', " "))
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| raw.to_string())
            };
            (decode(key), decode(value))
        })
        .collect()
}

#[derive(Debug, Default)]
struct State {
    routes: HashMap<(String, String), VecDeque<Reply>>,
    requests: Vec<Recorded>,
}

/// An in-memory service that answers from scripted replies.
///
/// Replies are keyed by method and path. When a route holds several replies
/// they are served in order; the last one repeats.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    state: Arc<Mutex<State>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: &str, path: &str, reply: Reply) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests sent after login.
    pub fn requests_after_login(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .skip_while(|request| !request.path().starts_with("/user/"))
            .skip(1)
            .collect()
    }

    pub fn posts_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == "POST" && request.path() == path)
            .collect()
    }

    /// Script a login that succeeds for [`USERNAME`].
    pub fn with_login(self) -> Self {
        self.on("GET", "/login", Reply::ok(LOGIN_PAGE))
            .on(
                "POST",
                "/login",
                Reply::redirect(&format!("/user/{USERNAME}")).with_cookie(&format!(
                    "{SESSION_COOKIE}; path=/; HttpOnly"
                )),
            )
            .on(
                "GET",
                &format!("/user/{USERNAME}"),
                Reply::ok("<h1>SomeBot</h1>"),
            );
        self
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn send(&self, mut req: Request) -> Result<Response, http_types::Error> {
        let body = req.body_string().await?;
        let header = |name: &str| {
            req.header(name)
                .and_then(|values| values.get(0))
                .map(|value| value.as_str().to_string())
        };
        let recorded = Recorded {
            method: req.method().to_string().to_uppercase(),
            url: req.url().to_string(),
            body,
            cookie: header("Cookie"),
            user_agent: header("User-Agent"),
        };
        let key = (recorded.method.clone(), req.url().path().to_string());

        let mut state = self.state.lock().unwrap();
        state.requests.push(recorded);
        let reply = match state.routes.get_mut(&key) {
            Some(replies) if replies.len() > 1 => replies.pop_front(),
            Some(replies) => replies.front().cloned(),
            None => None,
        }
        .unwrap_or_else(|| Reply {
            status: 404,
            ..Reply::ok("<h1>Not Found</h1>")
        });
        drop(state);

        let mut response = Response::new(reply.status);
        if let Some(location) = &reply.location {
            response.insert_header("Location", location.as_str());
        }
        for cookie in &reply.set_cookies {
            response.append_header("Set-Cookie", cookie.as_str());
        }
        response.set_body(reply.body);
        Ok(response)
    }
}

pub const LOGIN_PAGE: &str = r#"
<html><body>
  <form action="/search" method="get"><input name="query"></form>
  <form action="/login" method="post">
    <input name="username" type="text">
    <input name="password" type="password">
    <input name="remember_me" type="checkbox" value="1">
    <button type="submit" class="login">Log In</button>
  </form>
</body></html>
"#;

pub fn test_config() -> ClientConfig {
    ClientConfig::new()
        .with_base_url(BASE_URL)
        .with_bot_identity("test-bot", "0.1")
        .with_editor_id(42)
        .with_step_delay(Duration::ZERO)
}

pub async fn logged_in_client(http: &ScriptedClient) -> MusicBrainzClient {
    MusicBrainzClient::login_with_credentials(
        Box::new(http.clone()),
        test_config(),
        USERNAME,
        PASSWORD,
    )
    .await
    .expect("scripted login should succeed")
}
