use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use annotab_model::{Action, Availability, Column, ColumnKind, IssueSeverity, SelectionMode};

use annotab_cli::overview::EntitySetOverview;

use crate::types::CompileReport;

pub fn print_summary(report: &CompileReport) {
    let table = &report.table;
    match &report.navigation_path {
        Some(path) => eprintln!("Table: {}/{}", report.entity_set, path),
        None => eprintln!("Table: {}", report.entity_set),
    }
    if let Some(path) = &report.output {
        eprintln!("Output: {}", path.display());
    }
    eprintln!(
        "Type: {}  Selection: {}  Threshold: {}",
        table.control.table_type,
        selection_text(&table.annotation.selection_mode),
        table.annotation.threshold
    );
    eprintln!("{}", column_table(&table.columns));
    if !table.actions.is_empty() {
        eprintln!();
        eprintln!("Actions:");
        eprintln!("{}", action_table(&table.actions));
    }
    print_issue_table(report);
}

fn column_table(columns: &[Column]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Type"),
        header_cell("Label"),
        header_cell("Availability"),
        header_cell("Sort"),
        header_cell("Group"),
        header_cell("Properties"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Center);
    let mut hidden = 0usize;
    for column in columns {
        if column.availability == Availability::Hidden && !column.is_part_of_line_item {
            hidden += 1;
            continue;
        }
        table.add_row(vec![
            key_cell(&column.key, column.kind),
            Cell::new(kind_text(column.kind)),
            optional_cell(column.label.as_deref().or(column.header.as_deref())),
            availability_cell(column.availability),
            flag_cell(column.sortable),
            flag_cell(column.is_groupable),
            if column.property_infos.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(column.property_infos.join(", "))
            },
        ]);
    }
    if hidden > 0 {
        table.add_row(vec![
            dim_cell(format!("+{hidden} hidden")),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    table
}

fn action_table(actions: &[Action]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Text"),
        header_cell("Visible"),
        header_cell("Enabled"),
        header_cell("Selection"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for action in actions {
        table.add_row(vec![
            Cell::new(&action.key)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(action.text.as_deref()),
            Cell::new(&action.visible),
            optional_cell(action.enabled.as_deref()),
            match action.requires_selection {
                Some(required) => flag_cell(required),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

fn print_issue_table(report: &CompileReport) {
    if report.issues.is_empty() {
        return;
    }
    let mut issues: Vec<_> = report.issues.iter().collect();
    issues.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
            .then_with(|| a.code.cmp(&b.code))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Category"),
        header_cell("Code"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.category.as_str()),
            optional_cell(issue.code.as_deref()),
            Cell::new(&issue.message),
        ]);
    }
    eprintln!();
    eprintln!("Diagnostics:");
    eprintln!("{table}");
    for severity in [IssueSeverity::High, IssueSeverity::Medium, IssueSeverity::Low] {
        let count = report
            .issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count();
        if count > 0 {
            eprintln!("{}: {count}", severity_text(severity));
        }
    }
    if report.strict_failure {
        eprintln!("Strict mode: medium or high diagnostics present");
    }
}

pub fn print_overview(sets: &[EntitySetOverview]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity set"),
        header_cell("Entity type"),
        header_cell("Properties"),
        header_cell("Line items"),
        header_cell("Presentation variants"),
        header_cell("Navigation"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for set in sets {
        table.add_row(vec![
            Cell::new(&set.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&set.entity_type),
            count_cell(set.properties),
            qualifier_cell(&set.line_items),
            qualifier_cell(&set.presentation_variants),
            if set.navigations.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(set.navigations.join(", "))
            },
        ]);
    }
    println!("{table}");
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
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(4)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Fixed(36)),
            ColumnConstraint::UpperBoundary(Width::Percentage(60)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn selection_text(mode: &SelectionMode) -> String {
    serde_json::to_value(mode)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn kind_text(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Annotation => "Annotation",
        ColumnKind::Default => "Default",
        ColumnKind::Slot => "Slot",
    }
}

fn key_cell(key: &str, kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Annotation => Cell::new(key)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        ColumnKind::Slot => Cell::new(key).fg(Color::Magenta),
        ColumnKind::Default => Cell::new(key),
    }
}

fn availability_cell(availability: Availability) -> Cell {
    match availability {
        Availability::Default => Cell::new("Default"),
        Availability::Adaptation => Cell::new("Adaptation").fg(Color::Yellow),
        Availability::Hidden => dim_cell("Hidden"),
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::High => Cell::new(severity_text(severity))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Medium => Cell::new(severity_text(severity)).fg(Color::Yellow),
        IssueSeverity::Low => dim_cell(severity_text(severity)),
    }
}

fn severity_text(severity: IssueSeverity) -> &'static str {
    match severity {
        IssueSeverity::High => "HIGH",
        IssueSeverity::Medium => "MEDIUM",
        IssueSeverity::Low => "LOW",
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn qualifier_cell(qualifiers: &[String]) -> Cell {
    if qualifiers.is_empty() {
        return dim_cell("-");
    }
    let names: Vec<&str> = qualifiers
        .iter()
        .map(|qualifier| {
            if qualifier.is_empty() {
                "(default)"
            } else {
                qualifier.as_str()
            }
        })
        .collect();
    Cell::new(names.join(", "))
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
