//! services/app/src/cli/library.rs
//!
//! Library, playlist, favorites and recently-played commands.

use crate::cli::{print_json, state::AppState};
use crate::error::AppError;
use storyteller_core::{filter_titled, BestEffort, LibraryQuery, ResourceId, Story};

/// One listing line: id, title, then whatever metadata the story carries.
pub fn summary_line(story: &Story) -> String {
    let mut line = format!("{:>6}  {}", story.id, story.title);
    if let Some(date) = story.date_published {
        line.push_str(&format!("  [{}]", date.format("%Y-%m-%d")));
    }
    if let Some(rating) = story.rating {
        line.push_str(&format!("  ★ {:.1}", rating));
    }
    line
}

pub async fn list_stories(state: &AppState, query: &LibraryQuery) -> Result<(), AppError> {
    let stories = state.client.get_stories().await?;
    let shown = query.apply(&stories);
    if shown.is_empty() {
        println!("No stories found.");
    }
    for story in shown {
        println!("{}", summary_line(story));
    }
    Ok(())
}

pub async fn show_story(state: &AppState, id: &ResourceId, served: bool) -> Result<(), AppError> {
    let story = state.client.get_story_by_id(id).await?;

    println!("{}", story.title);
    if !story.description.is_empty() {
        println!("{}", story.description);
    }
    println!("Pages: {}", story.pages.len());
    if let Some(cover) = storyteller_core::resolve_cover_image_source(&story) {
        let cover = if served {
            state.client.served_image(cover)
        } else {
            cover
        };
        println!("Cover: {}", cover);
    }
    Ok(())
}

pub async fn playlists(state: &AppState, search: Option<&str>) -> Result<(), AppError> {
    let listing = state.client.get_playlists().await?;
    match search {
        Some(search) => print_json(&filter_titled(listing, search)),
        None => print_json(&listing),
    }
}

pub async fn create_playlist(state: &AppState, name: &str) -> Result<(), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Please enter a playlist name.".to_string()));
    }
    print_json(&state.client.create_playlist(name).await?)
}

pub async fn add_to_playlist(state: &AppState, playlist: &ResourceId, story: &ResourceId) -> Result<(), AppError> {
    print_json(&state.client.add_to_playlist(playlist, story).await?)
}

pub async fn remove_from_playlist(state: &AppState, playlist: &ResourceId, story: &ResourceId) -> Result<(), AppError> {
    print_json(&state.client.remove_from_playlist(playlist, story).await?)
}

pub async fn favorites(state: &AppState) -> Result<(), AppError> {
    print_json(&state.client.get_favorites().await?)
}

pub async fn favorite(state: &AppState, story: &ResourceId) -> Result<(), AppError> {
    print_json(&state.client.add_to_favorites(story).await?)
}

pub async fn unfavorite(state: &AppState, story: &ResourceId) -> Result<(), AppError> {
    print_json(&state.client.remove_from_favorites(story).await?)
}

pub async fn recently_played(state: &AppState) -> Result<(), AppError> {
    print_json(&state.client.get_recently_played().await?)
}

pub async fn mark_played(state: &AppState, story: &ResourceId) -> Result<(), AppError> {
    match state.client.add_to_recently_played(story).await {
        BestEffort::Done(body) => print_json(&body),
        BestEffort::Skipped(_) => {
            println!("Could not record the play; continuing.");
            Ok(())
        }
    }
}
