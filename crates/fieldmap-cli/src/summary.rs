use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use fieldmap_map::{EditOutcome, MappingSession};
use fieldmap_model::{MappingRow, ScoreTier, VerificationResult, format_score};

use crate::commands::MapResult;

pub fn print_session(session: &MappingSession) {
    println!("Project: {}", session.project_name());
    println!("Session: {}", session.id());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source field"),
        header_cell("Target path"),
        header_cell("Score"),
        header_cell("Rationale"),
    ]);
    apply_mapping_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for row in session.rows() {
        table.add_row(mapping_cells(row));
    }
    println!("{table}");
    print_verification(session.verification());
}

pub fn print_map_result(result: &MapResult) {
    print_session(&result.session);
    if let Some(outcome) = &result.edits {
        print_edit_outcome(outcome);
    }
    println!(
        "Bundle: {} ({} bytes)",
        result.output.display(),
        result.bundle_bytes
    );
}

fn print_edit_outcome(outcome: &EditOutcome) {
    println!("Edits applied: {}", outcome.applied);
    if !outcome.ignored.is_empty() {
        eprintln!("Ignored edits for unknown fields:");
        for field in &outcome.ignored {
            eprintln!("- {field}");
        }
    }
}

fn print_verification(result: &VerificationResult) {
    println!();
    let mut table = Table::new();
    table.set_header(vec![header_cell("Check"), header_cell("Result")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Coverage"),
        Cell::new(format_score(result.coverage)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Low confidence"),
        count_cell(result.low_confidence_fields.len(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Duplicate targets"),
        count_cell(result.duplicate_target_issues.len(), Color::Red),
    ]);
    println!("{table}");

    if !result.low_confidence_fields.is_empty() {
        println!(
            "Low confidence: {}",
            result.low_confidence_fields.join(", ")
        );
    }
    for issue in &result.duplicate_target_issues {
        eprintln!("- {issue}");
    }
}

fn mapping_cells(row: &MappingRow) -> Vec<Cell> {
    let target = match &row.target_path {
        Some(path) => Cell::new(path),
        None => dim_cell("(unmapped)"),
    };
    vec![
        Cell::new(&row.source_field),
        target,
        score_cell(row.match_score),
        dim_cell(&row.rationale),
    ]
}

fn score_cell(score: f64) -> Cell {
    Cell::new(format_score(score))
        .fg(tier_color(ScoreTier::from_score(score)))
        .add_attribute(Attribute::Bold)
}

fn tier_color(tier: ScoreTier) -> Color {
    match tier {
        ScoreTier::Low => Color::Red,
        ScoreTier::Medium => Color::Yellow,
        ScoreTier::High => Color::Green,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_mapping_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
