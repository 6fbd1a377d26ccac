use http_client::Request;

/// Accept header sent with regular page loads
const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Build the outbound identification header value.
///
/// The service asks bots to identify themselves and to point at the account
/// running them: `<bot-name>/<version> ( <base>/user/<username> )`.
pub fn user_agent(bot_name: &str, bot_version: &str, base_url: &str, username: &str) -> String {
    format!("{bot_name}/{bot_version} ( {base_url}/user/{username} )")
}

/// Add common headers to every request
pub fn add_common_headers(request: &mut Request, user_agent: &str) {
    let _ = request.insert_header("User-Agent", user_agent);
    let _ = request.insert_header("Accept", ACCEPT_HTML);
    let _ = request.insert_header("Accept-Language", "en-US,en;q=0.9");
    let _ = request.insert_header("Connection", "keep-alive");
}

/// Add headers for url-encoded form submissions
pub fn add_form_headers(request: &mut Request, base_url: &str, referer_url: Option<&str>) {
    let _ = request.insert_header("Content-Type", "application/x-www-form-urlencoded");
    let _ = request.insert_header("Origin", base_url);
    if let Some(referer) = referer_url {
        let _ = request.insert_header("Referer", referer);
    }
}

/// Add cookies to a request if they exist
pub fn add_cookies(request: &mut Request, cookies: &[String]) {
    if !cookies.is_empty() {
        let cookie_header = cookies.join("; ");
        let _ = request.insert_header("Cookie", &cookie_header);
    }
}

/// Merge `Set-Cookie` headers of a response into the cookie jar.
///
/// Only the `name=value` part is kept; a cookie replaces any earlier one with
/// the same name. Returns the number of cookies taken from the response.
pub fn extract_cookies(response: &http_types::Response, cookies: &mut Vec<String>) -> usize {
    let mut new_cookies = 0;
    if let Some(cookie_headers) = response.header("set-cookie") {
        for cookie_header in cookie_headers {
            let cookie_str = cookie_header.as_str();
            if let Some(cookie_value) = cookie_str.split(';').next() {
                let cookie_value = cookie_value.trim();
                let cookie_name = cookie_value.split('=').next().unwrap_or("");
                if cookie_name.is_empty() {
                    continue;
                }

                cookies.retain(|existing| !existing.starts_with(&format!("{cookie_name}=")));
                cookies.push(cookie_value.to_string());
                new_cookies += 1;
            }
        }
    }
    new_cookies
}
