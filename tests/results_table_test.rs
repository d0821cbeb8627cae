//! Rendering properties of the dynamic results table.

mod common;

use arena_dashboard::adapters::MemoryPage;
use arena_dashboard::results::table::NO_RESULTS_HTML;
use arena_dashboard::results::{
    render_results, Cell, ResultsCollection, ResultsView, Schema, TableOptions,
};
use arena_dashboard::traits::element_ids;
use common::sample_results;
use serde_json::json;

fn table(payload: serde_json::Value) -> arena_dashboard::results::ResultsTable {
    let collection = ResultsCollection::from_json(payload).unwrap();
    match ResultsView::build(&collection, &TableOptions::default()) {
        ResultsView::Table(table) => table,
        ResultsView::NoResults => panic!("expected a table"),
    }
}

#[test]
fn test_schema_is_first_seen_union() {
    let collection = ResultsCollection::from_json(sample_results()).unwrap();
    let schema = Schema::infer(collection.rows());

    assert_eq!(
        schema.columns(),
        &["Bot1", "Bot2", "Winner", "ReplayPath", "Result"]
    );
}

#[test]
fn test_every_column_name_appears_exactly_once_in_header() {
    let html = table(sample_results()).to_html();
    for column in ["Bot1", "Bot2", "Winner", "ReplayPath", "Result"] {
        assert_eq!(
            html.matches(&format!("<th>{}</th>", column)).count(),
            1,
            "column {}",
            column
        );
    }
}

#[test]
fn test_body_is_newest_first_with_blank_missing_cells() {
    let table = table(sample_results());
    assert_eq!(table.rows.len(), 3);

    // Last received row comes first
    assert_eq!(table.rows[0][0], Cell::Text("alpha".to_string()));
    assert_eq!(table.rows[0][1], Cell::Text("delta".to_string()));
    // null Winner and missing Result both render blank
    assert_eq!(table.rows[0][2], Cell::Empty);
    assert_eq!(table.rows[0][4], Cell::Empty);

    // Middle row lacks Winner and ReplayPath
    assert_eq!(table.rows[1][2], Cell::Empty);
    assert_eq!(table.rows[1][3], Cell::Empty);
    assert_eq!(table.rows[1][4], Cell::Text("Tie".to_string()));

    assert_eq!(table.rows[2][0], Cell::Text("alpha".to_string()));
}

#[test]
fn test_replay_links_use_basename_for_both_separators() {
    let table = table(sample_results());

    assert_eq!(
        table.rows[0][3],
        Cell::ReplayLink {
            href: "/replays/3_alpha_vs_delta.SC2Replay".to_string()
        }
    );
    assert_eq!(
        table.rows[2][3],
        Cell::ReplayLink {
            href: "/replays/1_alpha_vs_beta.SC2Replay".to_string()
        }
    );

    let html = table.to_html();
    assert!(html.contains(r#"<a href="/replays/1_alpha_vs_beta.SC2Replay" download>Replay</a>"#));
    assert!(!html.contains("/home/arena"));
}

#[test]
fn test_empty_collection_renders_placeholder_only() {
    let page = MemoryPage::new();
    let collection = ResultsCollection::from_json(json!([])).unwrap();

    let view = render_results(
        &page,
        element_ids::RESULTS,
        &collection,
        &TableOptions::default(),
    );

    assert_eq!(view, ResultsView::NoResults);
    let html = page.content(element_ids::RESULTS).unwrap();
    assert_eq!(html, NO_RESULTS_HTML);
    assert!(!html.contains("<table"));
}

#[test]
fn test_render_replaces_previous_content() {
    let page = MemoryPage::new();
    let options = TableOptions::default();

    let first = ResultsCollection::from_json(json!([{"Bot1": "first"}])).unwrap();
    let second = ResultsCollection::from_json(json!([{"Bot1": "second"}])).unwrap();
    render_results(&page, element_ids::RESULTS, &first, &options);
    render_results(&page, element_ids::RESULTS, &second, &options);

    let html = page.content(element_ids::RESULTS).unwrap();
    assert!(html.contains("second"));
    assert!(!html.contains("first"));
    assert_eq!(html.matches("<table").count(), 1);
}

#[test]
fn test_cell_values_are_escaped() {
    let html = table(json!([
        {"Bot1": "<script>alert(1)</script>", "ReplayPath": "x/\"><b>.SC2Replay"}
    ]))
    .to_html();

    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<b>"));
}

#[test]
fn test_custom_replay_column_and_route() {
    let collection = ResultsCollection::from_json(json!([{"File": "/tmp/game.SC2Replay"}])).unwrap();
    let options = TableOptions {
        replay_column: "File".to_string(),
        replay_route: "/downloads/".to_string(),
    };

    let ResultsView::Table(table) = ResultsView::build(&collection, &options) else {
        panic!("expected a table");
    };
    assert_eq!(
        table.rows[0][0],
        Cell::ReplayLink {
            href: "/downloads/game.SC2Replay".to_string()
        }
    );
}
