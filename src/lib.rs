pub mod client;
pub mod codec;
pub mod config;
pub mod edit;
pub mod editor;
pub mod error;
pub mod fields;
pub mod form;
pub mod guard;
pub mod headers;
pub mod login;
pub mod quota;
pub mod response;
pub mod session;
pub mod types;

pub use client::{MusicBrainzClient, ReleaseChange};
pub use config::{ClientConfig, Credentials};
pub use edit::FormEdit;
pub use editor::MusicBrainzEditor;
#[cfg(feature = "mock")]
pub use editor::MockMusicBrainzEditor;
pub use error::MusicBrainzError;
pub use fields::{FieldValue, FormFields};
pub use form::HtmlForm;
pub use session::{EditSession, Page};
pub use types::{
    Album, AlbumTrack, Artist, ArtistCreditSplit, ArtistField, ArtistUpdate, EditMode,
    EditOutcome, EditSummary, EntityType, Medium, PartialDate, Work, WorkField, WorkUpdate,
};

pub type Result<T> = std::result::Result<T, MusicBrainzError>;
