//
//  gocd-cli
//  output/table.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Table Output Formatting
//!
//! Builder and helpers for tabular terminal output, rendered with
//! `comfy_table` using UTF-8 box-drawing characters.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gocd_cli::output::TableBuilder;
//!
//! TableBuilder::new()
//!     .headers(["Counter", "Label", "Result"])
//!     .row(["2", "2", "Passed"])
//!     .row(["1", "1", "Failed"])
//!     .print();
//! ```

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

/// Creates a new table with UTF-8 borders and dynamic column widths.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// A builder for constructing formatted tables with a fluent API.
///
/// Headers are shown in cyan when color is enabled. Color support is
/// detected on creation; use [`color`](TableBuilder::color) to override it.
pub struct TableBuilder {
    table: Table,
    headers: Vec<String>,
    color: bool,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            table: create_table(),
            headers: Vec::new(),
            color: console::colors_enabled(),
        }
    }

    /// Sets whether color output is enabled.
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Sets the table headers. Call before adding rows.
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(|s| s.into()).collect();
        if self.color {
            let header_cells: Vec<Cell> = self
                .headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect();
            self.table.set_header(header_cells);
        } else {
            self.table.set_header(&self.headers);
        }
        self
    }

    /// Adds a single row to the table.
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(|s| s.into()).collect();
        self.table.add_row(row);
        self
    }

    /// Prints the table to stdout.
    pub fn print(self) {
        println!("{}", self.table);
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors a GoCD run result by its meaning.
///
/// - **Green**: `Passed`
/// - **Red**: `Failed`
/// - **Yellow**: `Cancelled`
/// - **Cyan**: `Building`, `Scheduled`, `Assigned`, `Preparing`
///
/// Matching is case-insensitive; anything else is returned unchanged.
pub fn format_result(result: &str, color: bool) -> String {
    if !color {
        return result.to_string();
    }

    use console::style;
    match result.to_lowercase().as_str() {
        "passed" => style(result).green().to_string(),
        "failed" => style(result).red().to_string(),
        "cancelled" => style(result).yellow().to_string(),
        "building" | "scheduled" | "assigned" | "preparing" => style(result).cyan().to_string(),
        _ => result.to_string(),
    }
}

/// Formats a boolean as `Yes` or `No`.
pub fn format_bool(value: bool, color: bool) -> String {
    if color {
        use console::style;
        if value {
            style("Yes").green().to_string()
        } else {
            style("No").dim().to_string()
        }
    } else if value {
        "Yes".to_string()
    } else {
        "No".to_string()
    }
}

/// Truncates `s` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_len).collect()
    }
}
