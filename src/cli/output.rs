//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the deepscribe CLI.
//! Everything here goes to stdout except errors; logs go to stderr.

use crate::types::{ActivityEvent, CredibilityEntry};
use owo_colors::OwoColorize;

/// Output style configuration
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}",
                "deepscribe".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!("   {}\n", "Multi-agent deep research".bright_white());
        } else {
            println!(
                "\n   deepscribe v{}\n   Multi-agent deep research\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a step message (for multi-step operations)
    pub fn step(&self, step_num: usize, total: usize, message: &str) {
        if self.colored {
            println!(
                "  {} {}",
                format!("[{}/{}]", step_num, total).dimmed(),
                message.bright_white()
            );
        } else {
            println!("  [{}/{}] {}", step_num, total, message);
        }
    }

    /// One line of crawl progress from the research backend
    pub fn activity(&self, event: &ActivityEvent) {
        if self.colored {
            println!(
                "      {} {}",
                format!("[{}]", event.kind).cyan(),
                event.message.dimmed()
            );
        } else {
            println!("      [{}] {}", event.kind, event.message);
        }
    }

    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print a markdown body as-is, separated from the surrounding output
    pub fn markdown(&self, body: &str) {
        println!("\n{}\n", body);
    }

    /// Print the credibility table, best-scored sources first
    pub fn credibility_table(&self, entries: &[CredibilityEntry]) {
        if entries.is_empty() {
            self.info("The evaluator listed no sources");
            return;
        }
        let mut rows: Vec<&CredibilityEntry> = entries.iter().collect();
        rows.sort_by(|a, b| b.credibility_score.cmp(&a.credibility_score));

        self.table_header(&["Score", "Source"]);
        for entry in rows {
            let score = format!("{:>2}/10", entry.credibility_score);
            if self.colored {
                let score = match entry.credibility_score {
                    8..=10 => score.green().bold().to_string(),
                    5..=7 => score.yellow().to_string(),
                    _ => score.red().to_string(),
                };
                println!("    {:<15} {}", score, entry.title.bright_white());
                println!("    {:<15} {}", "", entry.url.dimmed());
            } else {
                println!("    {:<15} {}", score, entry.title);
                println!("    {:<15} {}", "", entry.url);
            }
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<15}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    pub fn newline(&self) {
        println!();
    }
}
