use std::{path::Path, thread};

use log::{info, warn};
use parking_lot::Mutex;
use revmix_collab::{
    AuthForm, CaptureMode, Collab, CollabError, CollabEvent, CreateRoomForm, EventReceiver, Screen,
    SubmissionAssembler,
};
use revmix_core::{run_preview, PlaybackPreview, TimelineComposer, VoteAxis};
use revmix_impls::AudioFile;
use tokio::signal;

use crate::{record, render, Command, RevMixError};

pub async fn run(
    collab: &Collab,
    events: &EventReceiver,
    command: Command,
) -> Result<(), RevMixError> {
    let restored = collab.restore().await;

    match command {
        Command::Login { username, password } => {
            let user = collab.login(&AuthForm::login(username, password)).await?;
            render::signed_in(&user);
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let form = AuthForm::register(username, email, password);
            let user = collab.login(&form).await?;
            render::signed_in(&user);
        }
        Command::Logout => {
            collab.logout().await;
            println!("Signed out.");
        }
        command => {
            if restored.is_none() {
                return Err(RevMixError::SignedOut);
            }

            run_signed_in(collab, events, command).await?;
        }
    }

    Ok(())
}

async fn run_signed_in(
    collab: &Collab,
    events: &EventReceiver,
    command: Command,
) -> Result<(), RevMixError> {
    let config = collab.context().config.clone();

    match command {
        Command::Whoami => {
            let profile = collab.profile(None).await?;
            render::profile(&profile);
        }
        Command::Feed { watch: true } => {
            let _feed = collab.watch_feed()?;
            follow(events).await;
        }
        Command::Feed { watch: false } => {
            let items = collab.home_feed().refresh().await.map_err(CollabError::from)?;
            render::feed(&items);
        }
        Command::Room {
            room_id,
            watch: true,
        } => {
            let _room = collab.watch_room(room_id)?;
            follow(events).await;
        }
        Command::Room {
            room_id,
            watch: false,
        } => {
            collab.navigate(Screen::Room {
                room_id: room_id.clone(),
            })?;

            let snapshot = collab.battle_room(room_id).refresh().await?;
            render::room(&snapshot);
        }
        Command::Join { room_id } => {
            let message = collab.battle_room(room_id).join().await?;
            println!("{}", message.message);
        }
        Command::Results { room_id } => {
            let results = collab.battle_room(room_id).results().await?;
            render::results(&results);
        }
        Command::Close { room_id } => {
            let message = collab.battle_room(room_id).close().await?;
            println!("{}", message.message);
        }
        Command::CreateRoom {
            name,
            prompt,
            kind,
            timer,
            max_participants,
        } => {
            collab.navigate(Screen::CreateRoom)?;

            let form = CreateRoomForm {
                name,
                kind: kind.into(),
                prompt,
                timer_duration: timer,
                max_participants,
            };

            let room = collab.create_room(&form).await?;
            println!("Created room {} ({})", room.name, room.id);
        }
        Command::Submit {
            room_id,
            record: from_stdin,
            upload,
            timeline,
        } => {
            let room = collab.battle_room(room_id);
            room.refresh().await?;

            let mut assembler = SubmissionAssembler::new(config.upload_duration);

            if !timeline.is_empty() {
                let composer = compose(collab, &timeline).await?;
                assembler.set_timeline(composer.finalize()?);
            } else if let Some(path) = upload {
                let file = AudioFile::load(&path, config.max_upload_size).await?;
                assembler.set_mode(CaptureMode::Upload);
                assembler.set_upload(file.blob);
            } else if from_stdin {
                let recording = record::record(&config).await?;
                assembler.set_recording(recording);
            }

            let submission = assembler
                .assemble()
                .map_err(|e| RevMixError::Collab(e.into()))?;

            let performance = room.submit(submission).await?;
            println!("Submitted performance {}", performance.id);

            if let Some(snapshot) = room.snapshot() {
                render::room(&snapshot);
            }
        }
        Command::Vote {
            room_id,
            performance_id,
            flow,
            lyrics,
            creativity,
        } => {
            let room = collab.battle_room(room_id);
            room.refresh().await?;

            room.set_score(&performance_id, VoteAxis::Flow, flow)?;
            room.set_score(&performance_id, VoteAxis::Lyrics, lyrics)?;
            room.set_score(&performance_id, VoteAxis::Creativity, creativity)?;

            let vote = room.vote(&performance_id).await?;
            render::vote(&vote);
        }
        Command::Preview { clips } => {
            let composer = compose(collab, &clips).await?;
            render::timeline(&composer);

            let preview = Mutex::new(PlaybackPreview::new(config.preview_step));
            preview.lock().play(&composer)?;

            tokio::select! {
                _ = run_preview(&preview, config.preview_tick, render::preview_tick) => {}
                _ = signal::ctrl_c() => {
                    preview.lock().stop();
                    render::preview_tick(preview.lock().tick());
                }
            }
        }
        Command::Effects => {
            let library = collab.clip_library().await?;
            render::library(&library);
        }
        Command::AddEffect { file } => {
            let file = AudioFile::load(&file, config.max_upload_size).await?;
            let effect = collab.upload_effect(&file).await?;
            println!("Added {} to the clip catalog ({})", effect.name, effect.id);
        }
        Command::Leaderboard { limit } => {
            let entries = collab.leaderboard(limit).await?;
            render::leaderboard(&entries);
        }
        Command::Profile { user_id } => {
            let profile = collab.profile(user_id.as_deref()).await?;
            render::profile(&profile);
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout => {}
    }

    Ok(())
}

/// Lays clips out on a timeline, looking names up in the catalog first and falling back to files
async fn compose(collab: &Collab, clips: &[String]) -> Result<TimelineComposer, RevMixError> {
    let config = collab.context().config.clone();
    let mut library = collab.clip_library().await?;
    let mut composer = TimelineComposer::new(config.timeline_spacing);

    for clip in clips {
        let source = match library.find_by_name(clip) {
            Some(source) => source.clone(),
            None if Path::new(clip).is_file() => {
                let file = AudioFile::load(clip, config.max_upload_size).await?;
                let id = library.add_upload(file.name, &file.blob, config.custom_clip_duration);

                library
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RevMixError::UnknownClip(clip.clone()))?
            }
            None => return Err(RevMixError::UnknownClip(clip.clone())),
        };

        composer.append(source);
    }

    info!(
        "Composed {} clip(s), {:.1}s in total",
        composer.len(),
        composer.total_duration()
    );

    Ok(composer)
}

/// Prints refreshes as they come in until interrupted
async fn follow(events: &EventReceiver) {
    let events = events.clone();

    thread::spawn(move || {
        for event in events.iter() {
            match event {
                CollabEvent::FeedUpdated { items } => render::feed(&items),
                CollabEvent::RoomUpdated { snapshot } => render::room(&snapshot),
                CollabEvent::RefreshFailed { message } => warn!("{}", message),
                _ => {}
            }
        }
    });

    if let Err(e) = signal::ctrl_c().await {
        warn!("Could not listen for interrupts: {}", e);
    }
}
