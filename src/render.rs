//! Prints the client's views to stdout.

use std::io::{self, Write};

use colored::Colorize;
use revmix_collab::{FeedItem, LeaderboardEntry, ProfileView, RoomSnapshot};
use revmix_core::{
    format_clock, rank_label, rank_performances, ClipLibrary, PerformanceData, PreviewTick,
    RoomPhase, RoomResultsData, TimelineComposer, UserData, VoteData, VoteWidget,
};

const PROGRESS_WIDTH: usize = 30;

pub fn signed_in(user: &UserData) {
    println!("Signed in as {}", user.username.bold());
}

pub fn feed(items: &[FeedItem]) {
    if items.is_empty() {
        println!("{}", "No battles or challenges right now.".dimmed());
        return;
    }

    for item in items {
        let action = if item.is_enterable() {
            item.action_label().green()
        } else {
            item.action_label().dimmed()
        };

        println!(
            "{} {} {} [{}]",
            item.kind_label(),
            item.title().bold(),
            format!("({})", item.id()).dimmed(),
            item.status_text()
        );

        if !item.description().is_empty() {
            println!("    {}", item.description());
        }

        println!("    👥 {}  {}", item.participant_count(), action);
    }
}

pub fn room(snapshot: &RoomSnapshot) {
    let view = &snapshot.view;
    let room = &view.room;

    println!(
        "{} {}",
        room.name.bold(),
        format!("({})", room.id).dimmed()
    );

    if !room.prompt.is_empty() {
        println!("  {}", room.prompt.italic());
    }

    println!(
        "  👥 {}  ⏱ {}  {}",
        view.participant_summary(),
        format_clock(snapshot.seconds_left()),
        phase_label(view.phase())
    );

    if view.shows_submission() {
        println!(
            "  {}",
            format!("Submit with `revmix submit {} --record`", room.id).dimmed()
        );
    }

    if snapshot.shows_judging() {
        println!("\n{}", "Performances".bold());

        for performance in &view.performances {
            let widget = snapshot
                .widget(&performance.id)
                .map(widget_label)
                .unwrap_or_default();

            println!("  {}  {}", performance_line(performance), widget);
        }
    }

    if view.shows_rankings() {
        println!("\n{}", "Live rankings".bold());
        rankings(&view.performances);
    }
}

pub fn results(results: &RoomResultsData) {
    println!("{} {}", results.room.name.bold(), "results".dimmed());

    if !results.results_announced {
        println!("{}", "Results have not been announced yet.".dimmed());
    }

    if let Some(winner) = &results.winner_id {
        let name = results
            .performances
            .iter()
            .find(|p| &p.user_id == winner)
            .map(|p| p.username.as_str())
            .unwrap_or(winner.as_str());

        println!("🏆 {}", name.bold());
    }

    rankings(&results.performances);
}

pub fn vote(vote: &VoteData) {
    println!(
        "{} Voted flow {}, lyrics {}, creativity {}",
        vote.emoji_reaction, vote.flow, vote.lyrics, vote.creativity
    );
}

pub fn leaderboard(entries: &[LeaderboardEntry]) {
    for entry in entries {
        let name = if entry.is_current {
            entry.user.username.bold().cyan()
        } else {
            entry.user.username.normal()
        };

        println!(
            "{:>4} {}  Lv {}  {} XP  {}",
            entry.rank_label,
            name,
            entry.user.level,
            entry.user.xp,
            entry.badges().join(", ").dimmed()
        );
    }
}

pub fn profile(profile: &ProfileView) {
    let user = &profile.user;
    let suffix = if profile.is_own { " (you)" } else { "" };

    println!("{}{}", user.username.bold(), suffix.dimmed());

    if !user.bio.is_empty() {
        println!("  {}", user.bio.italic());
    }

    println!(
        "  Level {}  {}/{} XP  {}",
        user.level,
        profile.xp_into_level(),
        profile.xp_per_level(),
        progress_bar(profile.level_progress_percent() / 100.)
    );
    println!("  🏆 {} wins in {} battles", user.wins, user.battles);

    if !user.badges.is_empty() {
        println!("  {}", user.badges.join(", "));
    }
}

pub fn library(library: &ClipLibrary) {
    for source in library.iter() {
        let category = if source.is_builtin() { "builtin" } else { "custom" };

        println!(
            "{}  {:.1}s  {}",
            source.name.bold(),
            source.duration,
            category.dimmed()
        );
    }
}

pub fn timeline(composer: &TimelineComposer) {
    for clip in composer.clips() {
        println!(
            "{:>6.1}s  {}",
            clip.position,
            clip.source.name
        );
    }

    let ruler: Vec<_> = composer
        .ruler_marks()
        .into_iter()
        .map(|s| format!("{}s", s))
        .collect();

    println!("{}", ruler.join(" | ").dimmed());
}

pub fn preview_tick(tick: PreviewTick) {
    match tick {
        PreviewTick::Playing { progress, total } => {
            let fraction = if total > 0. { progress / total } else { 1. };

            print!(
                "\r{} {} / {}",
                progress_bar(fraction),
                format_clock(progress as u32),
                format_clock(total as u32)
            );
            io::stdout().flush().ok();
        }
        PreviewTick::Finished => println!("\n{}", "Preview finished".dimmed()),
        PreviewTick::Stopped => println!("\n{}", "Preview stopped".dimmed()),
    }
}

fn rankings(performances: &[PerformanceData]) {
    for (index, performance) in rank_performances(performances).into_iter().enumerate() {
        println!(
            "{:>4} {}  {:.1} avg  {} vote(s)",
            rank_label(index),
            performance.username.bold(),
            performance.average_score,
            performance.vote_count
        );
    }
}

fn performance_line(performance: &PerformanceData) -> String {
    let source = if performance.is_timeline() {
        "🎛"
    } else if performance.has_audio() {
        "🎤"
    } else {
        "…"
    };

    format!(
        "{} {} {} {}",
        source,
        performance.username.bold(),
        format_clock(performance.duration as u32),
        format!("({})", performance.id).dimmed()
    )
}

fn widget_label(widget: VoteWidget) -> String {
    match widget {
        VoteWidget::OwnPerformance => "your performance".dimmed().to_string(),
        VoteWidget::Closed => "Voting has ended for this battle".dimmed().to_string(),
        VoteWidget::Open(_) => "open for your vote".green().to_string(),
        VoteWidget::Submitting(_) => "submitting vote".yellow().to_string(),
        VoteWidget::Voted => "✓ voted".cyan().to_string(),
    }
}

fn phase_label(phase: RoomPhase) -> String {
    match phase {
        RoomPhase::Create => "Recording open".green().to_string(),
        RoomPhase::Waiting => "Waiting for the battle to end".yellow().to_string(),
        RoomPhase::Results => "Battle ended".red().to_string(),
    }
}

fn progress_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0., 1.) * PROGRESS_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        " ".repeat(PROGRESS_WIDTH - filled)
    )
}
