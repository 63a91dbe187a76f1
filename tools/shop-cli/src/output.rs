//! Output formatting for the CLI.

use console::style;
use shop_core::checkout::OrderStatus;
use shop_core::{ApiResponse, Money};

/// Minimum width of a key-value label, colon included.
const KEY_WIDTH: usize = 9;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style(kv_label(key)).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the headline of a storefront response.
    pub fn response<T>(&self, response: &ApiResponse<T>) {
        if response.success {
            self.success(&response.message);
            return;
        }
        let detail = response
            .error
            .as_ref()
            .map(|e| format!(" ({} {}: {})", response.status_code(), e.kind, e.detail))
            .unwrap_or_default();
        self.warn(&format!("{}{}", response.message, detail));
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Label padded before styling so escape codes don't count toward the width.
fn kv_label(key: &str) -> String {
    format!("{:<width$}", format!("{}:", key), width = KEY_WIDTH)
}

/// Status badge for order states.
pub fn status_badge(status: OrderStatus) -> String {
    let name = status.display_name();
    match status {
        OrderStatus::Delivered => style(name).green().to_string(),
        OrderStatus::Pending | OrderStatus::Processing => style(name).yellow().to_string(),
        OrderStatus::Shipped => style(name).cyan().to_string(),
        OrderStatus::Cancelled => style(name).dim().to_string(),
    }
}

/// Right-aligned money column.
pub fn money(amount: Money) -> String {
    format!("{:>10}", amount.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kv_labels_align() {
        assert_eq!(kv_label("Subtotal"), "Subtotal:");
        assert_eq!(kv_label("Tax"), "Tax:     ");
        assert_eq!(kv_label("Total").len(), kv_label("Shipping").len());
        assert_eq!(kv_label("Ferris Sticker"), "Ferris Sticker:");
    }

    #[test]
    fn test_money_column() {
        let column = money(Money::new(5457));
        assert_eq!(column.len(), 10);
        assert!(column.trim_start().ends_with("54.57"));
    }
}
