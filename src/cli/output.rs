//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::auth::{Permission, Permissions, UserSession};
use crate::todos::{Page, Pager, Todo, UserSummary};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Human form of a remaining lifetime in seconds
pub fn format_remaining(seconds: u64) -> String {
    match seconds {
        0 => "expired".to_string(),
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m {}s", s / 60, s % 60),
        s => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}

/// Print a page of todos with pagination footer
pub fn print_todo_table(page: &Page<Todo>, pager: &Pager) {
    if page.content.is_empty() {
        info("No todos found. Create one with 'todo-client todos create <title>'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Done").fg(Color::Cyan),
            Cell::new("Owner").fg(Color::Cyan),
            Cell::new("Updated").fg(Color::Cyan),
        ]);

    for todo in &page.content {
        let (mark, color) = if todo.completed {
            ("✓", Color::Green)
        } else {
            ("·", Color::Yellow)
        };
        let updated = todo
            .updated_at
            .or(todo.created_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(todo.id.map(|i| i.to_string()).unwrap_or_default()),
            Cell::new(&todo.title),
            Cell::new(mark).fg(color),
            Cell::new(todo.username.as_deref().unwrap_or("-")),
            Cell::new(updated),
        ]);
    }

    println!("{table}");

    let pages = pager
        .visible_pages()
        .into_iter()
        .map(|p| {
            if p == pager.current_page {
                format!("[{}]", p + 1).bold().to_string()
            } else {
                (p + 1).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "  Page {} of {} ({} todos)   {}",
        pager.current_page + 1,
        pager.total_pages.max(1),
        pager.total_elements,
        pages
    );
}

/// Print detailed todo
pub fn print_todo_detail(todo: &Todo) {
    println!("{}", "Todo Details".bold().underline());
    println!();
    if let Some(id) = todo.id {
        println!("  {} {}", "ID:".bold(), id);
    }
    println!("  {} {}", "Title:".bold(), todo.title);
    if let Some(description) = &todo.description {
        println!("  {} {}", "Description:".bold(), description);
    }
    let status = if todo.completed {
        "completed".green()
    } else {
        "open".yellow()
    };
    println!("  {} {}", "Status:".bold(), status);
    if let Some(owner) = &todo.username {
        println!("  {} {}", "Owner:".bold(), owner);
    }
    if let Some(created) = todo.created_at {
        let by = todo.created_by.as_deref().unwrap_or("unknown");
        println!(
            "  {} {} by {}",
            "Created:".bold(),
            created.format("%Y-%m-%d %H:%M:%S"),
            by
        );
    }
    if let Some(updated) = todo.updated_at {
        println!("  {} {}", "Updated:".bold(), updated.format("%Y-%m-%d %H:%M:%S"));
    }
}

pub fn print_user_table(users: &[UserSummary]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
        ]);
    for user in users {
        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.username),
            Cell::new(user.name.as_deref().unwrap_or("-")),
            Cell::new(&user.email),
        ]);
    }
    println!("{table}");
}

/// Print the signed-in user and what they may do
pub fn print_session(session: &UserSession, permissions: &Permissions, remaining_secs: u64) {
    println!("{}", "Session".bold().underline());
    println!();
    println!("  {} {}", "User:".bold(), session.user.username);
    println!("  {} {}", "Email:".bold(), session.user.email);
    println!("  {} {}", "Role:".bold(), session.user.role.to_string().cyan());
    println!(
        "  {} {} ({})",
        "Expires:".bold(),
        session.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
        format_remaining(remaining_secs)
    );
    println!();
    println!("  {}", "Permissions:".bold());
    for permission in Permission::ALL {
        let icon = if permissions.has(permission) {
            "●".green()
        } else {
            "○".red()
        };
        println!("    {} {}", icon, permission);
    }
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
