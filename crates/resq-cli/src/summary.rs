use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use resq_cli::types::{FlattenResult, RuleListing, StudyListing};
use resq_reconcile::{FormVariant, StudySummary};

const VARIANTS: [FormVariant; 4] = [
    FormVariant::TransferProcedure,
    FormVariant::Version20,
    FormVariant::Version12,
    FormVariant::Other,
];

pub fn print_summary(result: &FlattenResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output.display());
    if let Some(path) = &result.codebook {
        println!("Codebook: {}", path.display());
    }
    println!("Columns: {}", result.columns);

    let mut header = vec![
        header_cell("Study"),
        header_cell("Site"),
        header_cell("Subjects"),
        header_cell("Rows"),
    ];
    header.extend(VARIANTS.iter().map(|variant| header_cell(variant.as_str())));
    header.push(header_cell("No forms"));
    header.push(header_cell("Ambiguous"));

    let mut table = Table::new();
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 2..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for study in &result.report.studies {
        table.add_row(study_row(study));
    }

    let mut totals = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All studies")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.report.subjects()).add_attribute(Attribute::Bold),
        Cell::new(result.rows).add_attribute(Attribute::Bold),
    ];
    totals.extend(VARIANTS.iter().map(|variant| {
        let count = result
            .report
            .studies
            .iter()
            .filter_map(|study| study.variants.get(variant))
            .sum();
        count_cell(count, Color::Reset).add_attribute(Attribute::Bold)
    }));
    let no_forms = result
        .report
        .studies
        .iter()
        .map(|study| study.skipped_no_forms)
        .sum();
    let ambiguous = result
        .report
        .studies
        .iter()
        .map(|study| study.skipped_ambiguous)
        .sum();
    totals.push(count_cell(no_forms, Color::Yellow).add_attribute(Attribute::Bold));
    totals.push(count_cell(ambiguous, Color::Yellow).add_attribute(Attribute::Bold));
    table.add_row(totals);
    println!("{table}");

    let unknown = result.report.unknown_items();
    if unknown > 0 {
        println!("Item references without a definition (dropped): {unknown}");
    }
}

fn study_row(study: &StudySummary) -> Vec<Cell> {
    let mut row = vec![
        Cell::new(&study.study_id)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(&study.site_name),
        Cell::new(study.subjects),
        Cell::new(study.rows),
    ];
    row.extend(
        VARIANTS
            .iter()
            .map(|variant| count_cell(study.variants.get(variant).copied().unwrap_or(0), Color::Reset)),
    );
    row.push(count_cell(study.skipped_no_forms, Color::Yellow));
    row.push(count_cell(study.skipped_ambiguous, Color::Yellow));
    row
}

pub fn print_studies(studies: &[StudyListing]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Study"),
        header_cell("Site"),
        header_cell("Protocol"),
        header_cell("Subjects"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for study in studies {
        table.add_row(vec![
            Cell::new(&study.study_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&study.site_name),
            Cell::new(&study.protocol_id),
            Cell::new(study.subjects),
        ]);
    }
    println!("{table}");
}

pub fn print_rules(rules: &[RuleListing], sentinels: &[&str]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Legacy column"),
        header_cell("Column"),
        header_cell("Transform"),
        header_cell("Values"),
    ]);
    apply_table_style(&mut table);
    for rule in rules {
        let detail = match rule.detail.split_once(' ') {
            Some((_, values)) => Cell::new(values),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(rule.source).fg(Color::Blue),
            Cell::new(rule.target),
            Cell::new(rule.kind),
            detail,
        ]);
    }
    println!("{table}");
    println!();
    println!("Sentinel columns (always present on recoded rows):");
    for column in sentinels {
        println!("- {column}");
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
