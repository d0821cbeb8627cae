//! Dynamic-schema results table.
//!
//! A [`ResultsView`] is built from one [`ResultsCollection`] and rendered to
//! a page fragment that replaces the results container wholesale.

use serde_json::Value;

use super::html::{escape_text, replay_basename, replay_href, replay_link, value_text};
use super::row::{ResultRow, ResultsCollection};
use super::schema::Schema;
use crate::traits::PageSurface;

/// Placeholder shown when there is nothing to tabulate.
pub const NO_RESULTS_HTML: &str = "<p>No Results</p>";

/// Column that holds a replay file path.
pub const DEFAULT_REPLAY_COLUMN: &str = "ReplayPath";

/// Route replay files are served under.
pub const DEFAULT_REPLAY_ROUTE: &str = "/replays/";

/// How special columns are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub replay_column: String,
    pub replay_route: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            replay_column: DEFAULT_REPLAY_COLUMN.to_string(),
            replay_route: DEFAULT_REPLAY_ROUTE.to_string(),
        }
    }
}

/// One rendered body cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing field, `null`, or an unusable replay path
    Empty,
    /// Plain text, escaped at render time
    Text(String),
    /// Replay download link
    ReplayLink { href: String },
}

impl Cell {
    fn from_value(column: &str, value: Option<&Value>, options: &TableOptions) -> Self {
        let Some(value) = value else {
            return Cell::Empty;
        };

        if column == options.replay_column {
            return match value {
                Value::String(path) => match replay_basename(path) {
                    "" => Cell::Empty,
                    filename => Cell::ReplayLink {
                        href: replay_href(&options.replay_route, filename),
                    },
                },
                _ => Cell::Empty,
            };
        }

        match value_text(value) {
            text if text.is_empty() => Cell::Empty,
            text => Cell::Text(text),
        }
    }

    fn to_html(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => escape_text(text),
            Cell::ReplayLink { href } => replay_link(href),
        }
    }
}

/// Header and body of a non-empty results table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub schema: Schema,
    /// Body rows, most recent first
    pub rows: Vec<Vec<Cell>>,
}

impl ResultsTable {
    fn build(collection: &ResultsCollection, options: &TableOptions) -> Self {
        let schema = Schema::infer(collection.rows());
        let rows = collection
            .newest_first()
            .map(|row| body_row(&schema, row, options))
            .collect();
        Self { schema, rows }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(r#"<table style="overflow-x:auto;"><thead><tr>"#);
        for column in self.schema.iter() {
            html.push_str("<th>");
            html.push_str(&escape_text(column));
            html.push_str("</th>");
        }
        html.push_str("</tr></thead><tbody>");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str("<td>");
                html.push_str(&cell.to_html());
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }
}

fn body_row(schema: &Schema, row: &ResultRow, options: &TableOptions) -> Vec<Cell> {
    schema
        .iter()
        .map(|column| Cell::from_value(column, row.get(column), options))
        .collect()
}

/// What the results container shows after one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    NoResults,
    Table(ResultsTable),
}

impl ResultsView {
    pub fn build(collection: &ResultsCollection, options: &TableOptions) -> Self {
        if collection.is_empty() {
            ResultsView::NoResults
        } else {
            ResultsView::Table(ResultsTable::build(collection, options))
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ResultsView::NoResults => NO_RESULTS_HTML.to_string(),
            ResultsView::Table(table) => table.to_html(),
        }
    }
}

/// Render `collection` into `container_id`, replacing its previous content.
pub fn render_results(
    page: &dyn PageSurface,
    container_id: &str,
    collection: &ResultsCollection,
    options: &TableOptions,
) -> ResultsView {
    let view = ResultsView::build(collection, options);
    page.replace_content(container_id, view.to_html());
    view
}
