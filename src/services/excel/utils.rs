use std::collections::HashSet;
use calamine::{Data, DataType};

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

pub fn is_supported_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
        .unwrap_or(false)
}

/// Renders a cell the way it reads on screen, so identifiers stored as
/// numbers keep their digits (`1234567890.0` becomes `1234567890`).
pub fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // f64's Display drops a zero fractional part
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => cell
            .as_datetime()
            .map(|value| value.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

pub fn clean_column_name(name: &str, idx: usize, existing_names: &mut HashSet<String>) -> String {
    let trimmed = name.trim();
    let cleaned = if trimmed.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        trimmed.to_string()
    };

    // If the name already exists, add a numeric suffix
    let mut candidate = cleaned.clone();
    let mut counter = 1;
    while !existing_names.insert(candidate.clone()) {
        candidate = format!("{}.{}", cleaned, counter);
        counter += 1;
    }

    candidate
}

pub fn clean_headers<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut existing_names = HashSet::new();
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| clean_column_name(name, idx, &mut existing_names))
        .collect()
}

/// Locale-agnostic number parse: accepts `12`, `-3.5`, `1e3` and a lone
/// decimal comma (`12,5`). Blanks and non-finite values are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = text.parse::<f64>().ok().or_else(|| {
        if text.matches(',').count() == 1 && !text.contains('.') {
            text.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    });

    parsed.filter(|value| value.is_finite())
}

pub fn is_numeric(text: &str) -> bool {
    parse_number(text).is_some()
}
