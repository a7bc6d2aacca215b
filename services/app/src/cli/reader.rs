//! services/app/src/cli/reader.rs
//!
//! The story reader command. It loads a story into a `ReaderState`, shows the
//! current page with its resolved media, and plays page audio through `Playback`.
//! With `served`, local media paths are fetched from the story service instead.

use crate::cli::state::AppState;
use crate::error::AppError;
use storyteller_core::{BestEffort, Playback, ReaderState, ResourceId, SessionClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// A navigation request typed at the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderCommand {
    Next,
    Previous,
    Play,
    Quit,
}

impl ReaderCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(ReaderCommand::Next),
            "p" | "prev" | "previous" => Some(ReaderCommand::Previous),
            "a" | "play" => Some(ReaderCommand::Play),
            "q" | "quit" => Some(ReaderCommand::Quit),
            _ => None,
        }
    }
}

/// Renders the current page, or `None` when there is nothing to show.
pub fn render_page(reader: &ReaderState, served: Option<&SessionClient>) -> Option<String> {
    let page = reader.current_page()?;
    let index = reader.current_index()?;

    let mut out = format!("--- Page {}/{} ---\n{}", index + 1, reader.page_count(), page.text);
    if let Some(image) = reader.current_image_source() {
        let image = match served {
            Some(client) => client.served_image(image),
            None => image,
        };
        out.push_str(&format!("\nImage: {}", image));
    }
    if let Some(audio) = reader.current_audio_source() {
        let audio = match served {
            Some(client) => client.served_audio(audio),
            None => audio,
        };
        out.push_str(&format!("\nAudio: {}", audio));
    }
    Some(out)
}

async fn play_current(reader: &ReaderState, playback: &mut Playback, served: Option<&SessionClient>) {
    let Some(page) = reader.current_page() else {
        return;
    };
    // Audio problems never end the reading session.
    let result = match (served, reader.current_audio_source()) {
        (Some(client), Some(audio)) => playback.play(&client.served_audio(audio)).await.map(|_| true),
        _ => playback.play_page(page).await,
    };
    if let Err(e) = result {
        error!("Error playing audio: {}", e);
    }
}

pub async fn read_story(
    state: &AppState,
    id: &ResourceId,
    interactive: bool,
    with_audio: bool,
    served: bool,
) -> Result<(), AppError> {
    let story = state.client.get_story_by_id(id).await?;
    if let BestEffort::Done(_) = state.client.add_to_recently_played(id).await {
        info!(story_id = %id, "Recorded play");
    }

    let mut reader = ReaderState::new();
    reader.load(story);
    let mut playback = Playback::new(state.audio.clone());
    let served = served.then_some(&state.client);

    if reader.current_page().is_none() {
        println!("This story has no pages yet.");
        return Ok(());
    }

    if interactive {
        read_interactively(&mut reader, &mut playback, served).await?;
    } else {
        loop {
            if let Some(text) = render_page(&reader, served) {
                println!("{}\n", text);
            }
            if with_audio {
                play_current(&reader, &mut playback, served).await;
            }
            if !reader.has_next() {
                break;
            }
            reader.next();
        }
    }

    playback.stop().await?;
    Ok(())
}

async fn read_interactively(
    reader: &mut ReaderState,
    playback: &mut Playback,
    served: Option<&SessionClient>,
) -> Result<(), AppError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if let Some(text) = render_page(reader, served) {
        println!("{}", text);
    }
    println!("[n]ext, [p]revious, [a]udio, [q]uit");

    while let Some(line) = lines.next_line().await? {
        match ReaderCommand::parse(&line) {
            Some(ReaderCommand::Next) if reader.has_next() => reader.next(),
            Some(ReaderCommand::Previous) if reader.has_previous() => reader.previous(),
            Some(ReaderCommand::Next) | Some(ReaderCommand::Previous) => {
                println!("No more pages that way.");
                continue;
            }
            Some(ReaderCommand::Play) => {
                play_current(reader, playback, served).await;
                continue;
            }
            Some(ReaderCommand::Quit) => break,
            None => {
                println!("Unknown command: {}", line.trim());
                continue;
            }
        }
        if let Some(text) = render_page(reader, served) {
            println!("{}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryStore, ReqwestTransport};
    use std::sync::Arc;
    use storyteller_core::{Page, Story};

    fn story() -> Story {
        Story {
            id: ResourceId::Number(1),
            title: "The Brave Little Elephant".to_string(),
            description: String::new(),
            pages: vec![
                Page {
                    image_base64: Some("QQ==".to_string()),
                    image_path: Some("C:\\x\\y.png".to_string()),
                    text: "Once upon a time".to_string(),
                    ..Page::default()
                },
                Page {
                    audio_path: Some("C:\\audio\\2.mp3".to_string()),
                    text: "The end".to_string(),
                    ..Page::default()
                },
            ],
            date_published: None,
            rating: None,
        }
    }

    #[test]
    fn renders_page_with_resolved_media() {
        let mut reader = ReaderState::new();
        assert_eq!(render_page(&reader, None), None);

        reader.load(story());
        assert_eq!(
            render_page(&reader, None).unwrap(),
            "--- Page 1/2 ---\nOnce upon a time\nImage: data:image/png;base64,QQ=="
        );

        reader.next();
        assert_eq!(
            render_page(&reader, None).unwrap(),
            "--- Page 2/2 ---\nThe end\nAudio: file://C:/audio/2.mp3"
        );
    }

    #[test]
    fn served_media_points_at_the_service() {
        let client = SessionClient::new(
            Arc::new(ReqwestTransport::new(reqwest::Client::new(), "http://stories.test/api/")),
            Arc::new(MemoryStore::new()),
        );
        let mut story = story();
        story.pages[1].audio_path = Some("\\audio\\2.mp3".to_string());
        let mut reader = ReaderState::new();
        reader.load(story);

        assert_eq!(
            render_page(&reader, Some(&client)).unwrap(),
            "--- Page 1/2 ---\nOnce upon a time\nImage: data:image/png;base64,QQ=="
        );
        reader.next();
        assert_eq!(
            render_page(&reader, Some(&client)).unwrap(),
            "--- Page 2/2 ---\nThe end\nAudio: http://stories.test/api/audio/2.mp3"
        );
    }

    #[test]
    fn parses_prompt_commands() {
        assert_eq!(ReaderCommand::parse(" N "), Some(ReaderCommand::Next));
        assert_eq!(ReaderCommand::parse("previous"), Some(ReaderCommand::Previous));
        assert_eq!(ReaderCommand::parse("a"), Some(ReaderCommand::Play));
        assert_eq!(ReaderCommand::parse("quit"), Some(ReaderCommand::Quit));
        assert_eq!(ReaderCommand::parse("jump"), None);
    }
}
