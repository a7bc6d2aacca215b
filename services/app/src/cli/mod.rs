pub mod auth;
pub mod library;
pub mod reader;
pub mod state;

use crate::error::AppError;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use state::AppState;
use storyteller_core::{LibraryQuery, ResourceId, SortKey};

#[derive(Parser, Debug)]
#[command(name = "storyteller")]
#[command(about = "Read and listen to stories from the story service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Keep the session in memory only; nothing is written to the store file
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortArg {
    Date,
    Rating,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Date => SortKey::Date,
            SortArg::Rating => SortKey::Rating,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with email and password
    Login { email: String, password: String },

    /// Continue as a guest
    Guest,

    /// Create an account
    Signup {
        email: String,
        username: String,
        password: String,
        /// Password confirmation; must match
        #[arg(long)]
        confirm: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user's profile
    Profile,

    /// List the story library
    #[command(alias = "ls")]
    Stories {
        /// Only titles containing this text
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one story's details
    Story {
        id: ResourceId,

        /// Show local media paths as URLs on the story service
        #[arg(long)]
        served: bool,
    },

    /// Read a story page by page
    Read {
        id: ResourceId,

        /// Navigate with commands typed on stdin
        #[arg(short, long)]
        interactive: bool,

        /// Do not load page audio
        #[arg(long)]
        no_audio: bool,

        /// Fetch local media paths from the story service
        #[arg(long)]
        served: bool,
    },

    /// List playlists
    Playlists {
        /// Only playlists whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a playlist
    PlaylistCreate { name: String },

    /// Add a story to a playlist
    PlaylistAdd { playlist: ResourceId, story: ResourceId },

    /// Remove a story from a playlist
    PlaylistRemove { playlist: ResourceId, story: ResourceId },

    /// List favorite stories
    Favorites,

    /// Add a story to favorites
    Favorite { story: ResourceId },

    /// Remove a story from favorites
    Unfavorite { story: ResourceId },

    /// List recently played stories
    Recent,

    /// Record a story as played
    Played { story: ResourceId },

    /// Show or change the onboarding flag
    Onboarding {
        #[arg(long, conflicts_with = "reset")]
        complete: bool,

        #[arg(long)]
        reset: bool,
    },
}

pub(crate) fn print_json(value: &Value) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Dispatches one parsed command.
pub async fn run(command: Commands, state: &AppState) -> Result<(), AppError> {
    match command {
        Commands::Login { email, password } => auth::login(state, &email, &password).await,
        Commands::Guest => auth::guest(state).await,
        Commands::Signup {
            email,
            username,
            password,
            confirm,
        } => auth::signup(state, &email, &username, &password, &confirm).await,
        Commands::Logout => auth::logout(state).await,
        Commands::Profile => auth::profile(state).await,
        Commands::Stories { search, sort, desc } => {
            let query = LibraryQuery {
                search: search.unwrap_or_default(),
                sort: sort.into(),
                ascending: !desc,
            };
            library::list_stories(state, &query).await
        }
        Commands::Story { id, served } => library::show_story(state, &id, served).await,
        Commands::Read {
            id,
            interactive,
            no_audio,
            served,
        } => reader::read_story(state, &id, interactive, !no_audio, served).await,
        Commands::Playlists { search } => library::playlists(state, search.as_deref()).await,
        Commands::PlaylistCreate { name } => library::create_playlist(state, &name).await,
        Commands::PlaylistAdd { playlist, story } => library::add_to_playlist(state, &playlist, &story).await,
        Commands::PlaylistRemove { playlist, story } => {
            library::remove_from_playlist(state, &playlist, &story).await
        }
        Commands::Favorites => library::favorites(state).await,
        Commands::Favorite { story } => library::favorite(state, &story).await,
        Commands::Unfavorite { story } => library::unfavorite(state, &story).await,
        Commands::Recent => library::recently_played(state).await,
        Commands::Played { story } => library::mark_played(state, &story).await,
        Commands::Onboarding { complete, reset } => auth::onboarding(state, complete, reset).await,
    }
}
