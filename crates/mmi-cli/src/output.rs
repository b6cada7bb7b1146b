use mmi_core::{Task, DATE_FORMAT};
use unicode_width::UnicodeWidthStr;

pub fn print_success(message: &str) {
    println!("✓ {}", message);
}

pub fn print_error(message: &str) {
    eprintln!("✗ {}", message);
}

const HEADERS: [&str; 6] = ["ID", "Status", "Priority", "Due", "Title", "Description"];

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn row(task: &Task) -> [String; 6] {
    [
        task.id().to_string(),
        task.status().to_string(),
        task.priority().to_string(),
        task.due_date()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string()),
        task.title().to_string(),
        or_dash(task.description()),
    ]
}

/// Tasks as an aligned plain-text table
pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows: Vec<[String; 6]> = tasks.iter().map(row).collect();

    // Terminal columns, not chars: CJK is two wide, combining marks zero.
    let mut widths = HEADERS.map(|h| h.width());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.width());
        }
    }

    let format_line = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.width())))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_line(&HEADERS[..])];
    for cells in &rows {
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        lines.push(format_line(cells.as_slice()));
    }
    lines.join("\n")
}

pub fn render_task(task: &Task) -> String {
    let [id, status, priority, due, title, description] = row(task);
    [
        format!("Task: {}", id),
        format!("  Title: {}", title),
        format!("  Description: {}", description),
        format!("  Status: {}", status),
        format!("  Priority: {}", priority),
        format!("  Due: {}", due),
        format!("  Created: {}", task.created_at().format("%Y-%m-%d %H:%M:%S UTC")),
    ]
    .join("\n")
}
