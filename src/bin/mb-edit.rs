use clap::{Parser, Subcommand, ValueEnum};
use musicbrainz_edit::{
    Album, ClientConfig, Credentials, EditMode, EntityType, MusicBrainzClient,
};
use std::path::PathBuf;

/// MusicBrainz edit bot
#[derive(Parser)]
#[command(
    name = "mb-edit",
    about = "Enter edits on MusicBrainz through its website",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    /// Apply edits immediately (auto-editors only)
    #[arg(long, global = true)]
    auto: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum EntityArg {
    Artist,
    Release,
    ReleaseGroup,
    Recording,
    Work,
    Label,
    Url,
}

impl From<EntityArg> for EntityType {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Artist => EntityType::Artist,
            EntityArg::Release => EntityType::Release,
            EntityArg::ReleaseGroup => EntityType::ReleaseGroup,
            EntityArg::Recording => EntityType::Recording,
            EntityArg::Work => EntityType::Work,
            EntityArg::Label => EntityType::Label,
            EntityArg::Url => EntityType::Url,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show how many edits are left today and overall
    ///
    /// Needs MUSICBRAINZ_EDITOR_ID to be set.
    Quota,

    /// Add a release described by an importer JSON file
    ///
    /// Usage example:
    /// mb-edit add-release album.json
    AddRelease {
        /// Path to the album JSON
        path: PathBuf,
    },

    /// Set an artist's type if it has none
    SetArtistType {
        artist_id: String,
        type_id: u32,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Merge entities into a target
    ///
    /// Usage example:
    /// mb-edit merge artist --target <mbid> <mbid> <mbid>
    Merge {
        #[arg(value_enum)]
        entity: EntityArg,
        /// Identifiers of the entities to merge, including the target
        ids: Vec<String>,
        #[arg(long)]
        target: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Remove a relationship
    RemoveRelationship {
        relationship_id: u64,
        #[arg(value_enum)]
        entity0: EntityArg,
        #[arg(value_enum)]
        entity1: EntityArg,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Cancel one of your open edits
    Cancel {
        edit_id: u64,
        #[arg(long)]
        note: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            eprintln!();
            eprintln!("Please set the following environment variables:");
            eprintln!("  MUSICBRAINZ_USERNAME=your_username");
            eprintln!("  MUSICBRAINZ_PASSWORD=your_password");
            eprintln!("Optionally:");
            eprintln!("  MUSICBRAINZ_SERVER=https://test.musicbrainz.org");
            eprintln!("  MUSICBRAINZ_EDITOR_ID=your_numeric_editor_id");
            std::process::exit(1);
        }
    };
    log::debug!("Using credentials {credentials:?}");

    let config = credentials.apply_to(
        ClientConfig::new().with_bot_identity("mb-edit", env!("CARGO_PKG_VERSION")),
    );
    let mut client = match MusicBrainzClient::login_with_credentials(
        Box::new(http_client::native::NativeClient::new()),
        config,
        &credentials.username,
        &credentials.password,
    )
    .await
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to log in: {e}");
            std::process::exit(1);
        }
    };

    let mode = if args.auto {
        EditMode::Auto
    } else {
        EditMode::Votable
    };

    if let Err(e) = execute_command(args.command, &mut client, mode).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn execute_command(
    command: Commands,
    client: &mut MusicBrainzClient,
    mode: EditMode,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Quota => {
            let today = client.edits_left_today().await?;
            let globally = client.edits_left_globally().await?;
            println!("Edits left today: {today}");
            println!("Open edits left:  {globally}");
        }
        Commands::AddRelease { path } => {
            let json = std::fs::read_to_string(&path)?;
            let album: Album = serde_json::from_str(&json)?;
            let outcome = client.add_release(&album, mode).await?;
            println!("✅ {outcome}");
        }
        Commands::SetArtistType {
            artist_id,
            type_id,
            note,
        } => {
            let outcome = client
                .set_artist_type(&artist_id, type_id, &note, mode)
                .await?;
            println!("✅ {outcome}");
        }
        Commands::Merge {
            entity,
            ids,
            target,
            note,
        } => {
            let outcome = client.merge(entity.into(), &ids, &target, &note).await?;
            println!("✅ {outcome}");
        }
        Commands::RemoveRelationship {
            relationship_id,
            entity0,
            entity1,
            note,
        } => {
            let outcome = client
                .remove_relationship(relationship_id, entity0.into(), entity1.into(), &note)
                .await?;
            println!("✅ {outcome}");
        }
        Commands::Cancel { edit_id, note } => {
            client.cancel_edit(edit_id, note.as_deref()).await?;
            println!("✅ Cancelled edit #{edit_id}");
        }
    }
    Ok(())
}
