use thiserror::Error;

/// Error types for MusicBrainz edit operations.
///
/// An edit that finds nothing to change is *not* an error: it is reported as
/// [`EditOutcome::AlreadySet`](crate::EditOutcome::AlreadySet). Everything in
/// this enum aborts the operation that produced it, and nothing is retried.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// # use musicbrainz_edit::{ClientConfig, MusicBrainzClient, MusicBrainzError};
/// # tokio_test::block_on(async {
/// let http = Box::new(http_client::native::NativeClient::new());
/// match MusicBrainzClient::login_with_credentials(http, ClientConfig::new(), "bot", "secret").await {
///     Ok(_client) => println!("Logged in"),
///     Err(MusicBrainzError::Auth(msg)) => eprintln!("Authentication failed: {}", msg),
///     Err(MusicBrainzError::Http(msg)) => eprintln!("Network error: {}", msg),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # });
/// ```
#[derive(Error, Debug)]
pub enum MusicBrainzError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, malformed addresses and redirect
    /// loops.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication failures.
    ///
    /// Login only succeeds when the post-login redirect lands exactly on the
    /// editor's profile page; anything else (typically the login page shown
    /// again with validation errors) ends up here.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Caller-supplied data violates an invariant of the requested edit.
    ///
    /// For example an artist-credit split whose join phrases do not number
    /// exactly one fewer than its credited names.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A value the caller expected to find unchanged has drifted remotely.
    ///
    /// Safe to re-fetch and retry at the caller's discretion.
    #[error("{field} has changed to {actual:?} (expected {expected:?}), aborting")]
    RemoteStateChanged {
        /// Form control that was compared
        field: String,
        /// Value the caller expected
        expected: Vec<String>,
        /// Value currently shown by the service
        actual: Vec<String>,
    },

    /// Failed to extract a value from the service's response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The response after a submit matched no recognized success or no-op
    /// pattern, or a created entity's address could not be recovered.
    #[error("Unable to post edit: {0}")]
    PostFailure(String),

    /// No POST form with a matching action exists on the current page.
    ///
    /// This typically indicates that the page layout has changed or that the
    /// session is no longer authenticated.
    #[error("No POST form with action matching {0:?} on the current page")]
    FormNotFound(String),

    /// The selected form has no control with the given name.
    #[error("Form control not found: {0}")]
    ControlNotFound(String),
}
