//! Plain-text rendering of each screen.

use crate::account::initials;
use crate::chat::{CandidateKey, Sender, SuggestionPanel};
use crate::models::{LeaderboardEntry, Profile, Resolution, Score};
use crate::stats::ring_fraction;
use chrono::{Local, NaiveDate};
use std::fmt::Write;

const RING_WIDTH: usize = 20;

pub fn render_tasks(tasks: &[Resolution]) -> String {
    render_tasks_at(Local::now().date_naive(), tasks)
}

pub fn render_tasks_at(today: NaiveDate, tasks: &[Resolution]) -> String {
    if tasks.is_empty() {
        return "No active tasks. Add one or ask for suggestions.\n".to_string();
    }

    let mut out = String::new();
    for task in tasks {
        let mark = if task.completed_today || task.is_completed() {
            "x"
        } else {
            " "
        };
        let _ = write!(
            out,
            "[{mark}] #{:<4} {} (+{} pts, {})",
            task.id,
            task.title,
            task.points,
            task.kind.as_str()
        );
        if let Some(due) = task.target_date {
            let _ = write!(out, " due {due}");
        }
        if task.is_overdue(today) {
            out.push_str(" OVERDUE");
        }
        out.push('\n');
        if !task.description.is_empty() {
            let _ = writeln!(out, "         {}", task.description);
        }
    }
    out
}

pub fn render_score(score: &Score) -> String {
    let filled = (ring_fraction(score.total_points) * RING_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {} tokens | level {} | streak {} days | {} completed\n",
        "#".repeat(filled),
        "-".repeat(RING_WIDTH - filled),
        score.total_points,
        score.level,
        score.streak,
        score.tasks_completed
    )
}

pub fn render_profile(profile: &Profile) -> String {
    let about = if profile.about.is_empty() {
        "No bio yet."
    } else {
        profile.about.as_str()
    };
    format!(
        "({}) {} <{}>\nTokens: {}  Tasks completed: {}  Streak: {} days  Level: {}\nAbout: {}\n",
        initials(&profile.username),
        profile.username,
        profile.email,
        profile.total_points,
        profile.tasks_completed,
        profile.streak,
        profile.level,
        about
    )
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "Leaderboard is empty.\n".to_string();
    }
    let mut out = String::new();
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<20} {:>6} pts  lvl {}",
            rank + 1,
            entry.username,
            entry.total_points,
            entry.level
        );
    }
    out
}

pub fn render_chat(chat: &SuggestionPanel) -> String {
    let mut out = String::new();
    for message in chat.messages() {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Assistant => "bot",
        };
        let _ = writeln!(out, "{who}: {}", message.text);
        for (index, task) in chat.candidates(message.id).iter().enumerate() {
            let key = CandidateKey {
                message: message.id,
                index,
            };
            let mark = if chat.is_selected(key) { "x" } else { " " };
            let _ = writeln!(
                out,
                "  [{mark}] {index}: {} (+{} pts, {})",
                task.title,
                task.points,
                task.kind.as_str()
            );
        }
    }
    out
}
