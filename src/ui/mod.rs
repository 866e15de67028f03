//! Terminal rendering for the command line.
//!
//! Listings render as tables through the [`Tabular`] trait; the configuration
//! listing is printed section by section with colors.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthChar;

use crate::config::ConfigEntry;
use crate::models::{
    Area, Author, Conference, Dataset, EvaluationTable, Method, Metric, Paper, PaperRepo,
    Proceeding, Repository, Result as EvaluationResult, Task,
};

/// Widest a text cell may grow before it is truncated
pub const MAX_CELL_WIDTH: usize = 60;

/// One table column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub align: CellAlignment,
}

impl Column {
    pub const fn left(title: &'static str) -> Self {
        Self {
            title,
            align: CellAlignment::Left,
        }
    }

    pub const fn right(title: &'static str) -> Self {
        Self {
            title,
            align: CellAlignment::Right,
        }
    }
}

/// A value that renders as one table row.
pub trait Tabular {
    const COLUMNS: &'static [Column];

    /// Cell texts, one per column.
    fn row(&self) -> Vec<String>;
}

/// Render `items` as a table.
pub fn table<'a, T: Tabular + 'a>(items: impl IntoIterator<Item = &'a T>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            T::COLUMNS
                .iter()
                .map(|column| Cell::new(column.title).add_attribute(Attribute::Bold)),
        );

    for item in items {
        table.add_row(
            item.row()
                .into_iter()
                .zip(T::COLUMNS)
                .map(|(text, column)| {
                    Cell::new(truncate_with_ellipsis(&text, MAX_CELL_WIDTH))
                        .set_alignment(column.align)
                }),
        );
    }
    table
}

/// Render the configuration listing, one `[section]` block per section.
pub fn config_listing(sections: &[(&str, Vec<ConfigEntry>)]) -> String {
    sections
        .iter()
        .map(|(section, entries)| {
            let mut block = format!("{}", format!("[{}]", section).cyan());
            for entry in entries {
                block.push('\n');
                block.push_str(&format!("{}: {}", entry.key.green(), entry.value));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Configuration listing as a JSON document `{section: {option: value}}`.
pub fn config_json(sections: &[(&str, Vec<ConfigEntry>)]) -> serde_json::Value {
    let mut root = serde_json::Map::new();
    for (section, entries) in sections {
        let mut options = serde_json::Map::new();
        for entry in entries {
            let value = serde_json::from_str(&entry.value)
                .unwrap_or_else(|_| serde_json::Value::from(entry.value.as_str()));
            options.insert(entry.key.to_string(), value);
        }
        root.insert(section.to_string(), options.into());
    }
    root.into()
}

/// Truncate text to a display width, appending `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    let width = |c: char| c.width().unwrap_or(0);
    if text.chars().map(width).sum::<usize>() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        if used + width(c) > budget {
            break;
        }
        used += width(c);
        out.push(c);
    }
    out.push_str("...");
    out
}

fn flag(value: bool) -> String {
    if value { "✓" } else { "✗" }.to_string()
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl Tabular for Paper {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::left("Title"),
        Column::left("Authors"),
        Column::left("Published"),
        Column::left("Conference"),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.author_line(),
            self.published.to_string(),
            opt(&self.conference),
        ]
    }
}

impl Tabular for Repository {
    const COLUMNS: &'static [Column] = &[
        Column::left("Repository"),
        Column::right("Stars"),
        Column::left("Framework"),
        Column::left("URL"),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.stars.to_string(),
            self.framework.clone(),
            self.url.clone(),
        ]
    }
}

impl Tabular for PaperRepo {
    const COLUMNS: &'static [Column] = &[
        Column::left("Paper"),
        Column::left("Title"),
        Column::left("Repository"),
        Column::right("Stars"),
        Column::left("Official"),
    ];

    fn row(&self) -> Vec<String> {
        let (repository, stars) = match &self.repository {
            Some(repository) => (repository.full_name(), repository.stars.to_string()),
            None => (String::new(), String::new()),
        };
        vec![
            self.paper.id.clone(),
            self.paper.title.clone(),
            repository,
            stars,
            flag(self.is_official),
        ]
    }
}

impl Tabular for Author {
    const COLUMNS: &'static [Column] = &[Column::left("ID"), Column::left("Full name")];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.full_name.clone()]
    }
}

impl Tabular for Conference {
    const COLUMNS: &'static [Column] = &[Column::left("ID"), Column::left("Name")];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

impl Tabular for Proceeding {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::right("Year"),
        Column::right("Month"),
    ];

    fn row(&self) -> Vec<String> {
        let show = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_default();
        vec![self.id.clone(), show(self.year), show(self.month)]
    }
}

impl Tabular for Area {
    const COLUMNS: &'static [Column] = &[Column::left("ID"), Column::left("Name")];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone()]
    }
}

impl Tabular for Task {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::left("Name"),
        Column::left("Description"),
    ];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), self.description.clone()]
    }
}

impl Tabular for Dataset {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::left("Name"),
        Column::left("Full name"),
        Column::left("URL"),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            opt(&self.full_name),
            opt(&self.url),
        ]
    }
}

impl Tabular for Method {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::left("Name"),
        Column::left("Full name"),
        Column::left("Paper"),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.full_name.clone(),
            opt(&self.paper),
        ]
    }
}

impl Tabular for EvaluationTable {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::left("Task"),
        Column::left("Dataset"),
        Column::left("Description"),
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.task.clone(),
            self.dataset.clone(),
            self.description.clone(),
        ]
    }
}

impl Tabular for Metric {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::left("Name"),
        Column::left("Loss"),
    ];

    fn row(&self) -> Vec<String> {
        vec![self.id.clone(), self.name.clone(), flag(self.is_loss)]
    }
}

impl Tabular for EvaluationResult {
    const COLUMNS: &'static [Column] = &[
        Column::left("ID"),
        Column::right("Rank"),
        Column::left("Methodology"),
        Column::left("Metrics"),
        Column::left("Paper"),
        Column::left("Evaluated on"),
    ];

    fn row(&self) -> Vec<String> {
        let metrics = self
            .metrics
            .iter()
            .map(|(name, value)| match value {
                serde_json::Value::String(text) => format!("{}: {}", name, text),
                other => format!("{}: {}", name, other),
            })
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            self.id.clone(),
            self.best_rank.map(|r| r.to_string()).unwrap_or_default(),
            self.methodology.clone(),
            metrics,
            opt(&self.paper),
            opt(&self.evaluated_on),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
        assert_eq!(truncate_with_ellipsis("日本語のタイトル", 9), "日本語...");
    }

    #[test]
    fn test_table_has_one_row_per_item() {
        let authors = vec![
            Author {
                id: "a-1".into(),
                full_name: "Ada Lovelace".into(),
            },
            Author {
                id: "a-2".into(),
                full_name: "Alan Turing".into(),
            },
        ];
        let rendered = table(&authors).to_string();
        assert!(rendered.contains("Full name"));
        assert!(rendered.contains("Alan Turing"));
        assert_eq!(table(&authors).row_iter().count(), 2);
    }

    #[test]
    fn test_config_json_shape() {
        let sections = vec![(
            "general",
            vec![ConfigEntry {
                key: "debug",
                value: "true".into(),
            }],
        )];
        assert_eq!(
            config_json(&sections),
            serde_json::json!({"general": {"debug": true}})
        );
        assert!(config_listing(&sections).contains("debug"));
    }
}
