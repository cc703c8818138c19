use serde::Serialize;

/// A worksheet read as text: one header row and the data rows below it.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterWarning {
    MissingIdentifierColumn { candidates: Vec<String> },
}

impl FilterWarning {
    /// Stable ASCII identifier, safe to send in an HTTP header.
    pub fn code(&self) -> &'static str {
        match self {
            FilterWarning::MissingIdentifierColumn { .. } => "missing_identifier_column",
        }
    }
}

impl std::fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterWarning::MissingIdentifierColumn { candidates } => write!(
                f,
                "Coluna de CPF/CNPJ não encontrada (procurado: {}); CPF/CNPJ não foi normalizado.",
                candidates.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub rows_read: usize,
    pub removed_by_term: usize,
    pub removed_non_numeric: usize,
    pub identifiers_padded: usize,
    pub identifier_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub table: Table,
    pub warnings: Vec<FilterWarning>,
    pub stats: FilterStats,
}
