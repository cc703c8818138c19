//! Row filtering and CPF/CNPJ normalization for payment report exports.
//!
//! A report export interleaves payment rows with branch headings, subtotal
//! lines and page headers. Payment rows are the ones whose first cell is a
//! numeric code; everything else is dropped, along with any row whose first
//! cell names one of the known branches or summary markers.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::AppError;
use crate::models::{FilterOutcome, FilterStats, FilterWarning, Table};
use crate::services::excel::utils::is_numeric;

pub const EXCLUDED_TERMS: [&str; 28] = [
    "ITABUNA",
    "Vencimento",
    "Qtde de Reg.:",
    "Total da Unidade",
    "ALCIR - ITABUNA",
    "ADMINISTRATIVO",
    "BELO HORIZONTE",
    "ALAGOAS",
    "ESPIRITO SANTO",
    "SAO PAULO - CAPITAL",
    "CEARA",
    "RIO DE JANEIRO",
    "PARANÁ",
    "RIO GRANDE DO SUL",
    "SAO PAULO - INTERIOR",
    "ITABUNA - ALCIR FREITAS ME",
    "MATO GROSSO DO SUL",
    "SANTA CATARINA",
    "MATO GROSSO",
    "PARAÍBA",
    "PIAUÍ",
    "RORAIMA",
    "SUB - 3RN INTERMEDIACOES DE NEGOCIOS LTDA - PAN",
    "FREI INOCÊNCIO",
    "ALPERCATA",
    "SUB - SPERANDIO SOLUCOES LTDA - C6",
    "SUB - 3RN INTERME. DE NEGOCIOS LTDA - C6",
    "SUB - SPERANDIO SOLUCOES LTDA - FACTA",
];

/// Header names tried in order; the first exact match wins.
pub const IDENTIFIER_COLUMN_CANDIDATES: [&str; 9] = [
    "CPF/CNPJ", "CPF", "CNPJ", "Cpf/Cnpj", "cpf/cnpj", "Cpf", "cpf", "Cnpj", "cnpj",
];

const IDENTIFIER_PADDED_LEN: usize = 10;

static DEFAULT_TERMS: Lazy<ExclusionTerms> = Lazy::new(|| {
    ExclusionTerms::new(&EXCLUDED_TERMS).expect("escaped literal terms always compile")
});

/// Case-insensitive literal substring matcher over a fixed term list.
#[derive(Debug, Clone)]
pub struct ExclusionTerms {
    matcher: Option<Regex>,
}

impl ExclusionTerms {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, AppError> {
        let alternatives: Vec<String> = terms
            .iter()
            .map(|term| term.as_ref().trim())
            .filter(|term| !term.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::empty());
        }

        let matcher = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Unexpected(format!("invalid exclusion terms: {}", e)))?;

        Ok(Self { matcher: Some(matcher) })
    }

    pub fn empty() -> Self {
        Self { matcher: None }
    }

    pub fn defaults() -> &'static ExclusionTerms {
        &DEFAULT_TERMS
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.as_ref().map_or(false, |re| re.is_match(text))
    }
}

/// Prepends a `0` to identifiers that are exactly ten ASCII digits.
pub fn normalize_identifier(value: &str) -> String {
    let value = value.trim();
    if value.len() == IDENTIFIER_PADDED_LEN && value.bytes().all(|b| b.is_ascii_digit()) {
        format!("0{}", value)
    } else {
        value.to_string()
    }
}

pub fn find_identifier_column(table: &Table) -> Option<(usize, &'static str)> {
    IDENTIFIER_COLUMN_CANDIDATES
        .iter()
        .find_map(|name| table.column_index(name).map(|idx| (idx, *name)))
}

pub struct PaymentFilter<'a> {
    terms: &'a ExclusionTerms,
}

impl Default for PaymentFilter<'static> {
    fn default() -> Self {
        Self::new(ExclusionTerms::defaults())
    }
}

impl<'a> PaymentFilter<'a> {
    pub fn new(terms: &'a ExclusionTerms) -> Self {
        Self { terms }
    }

    pub fn apply(&self, table: Table) -> Result<FilterOutcome, AppError> {
        if table.headers.is_empty() {
            return Err(AppError::Load("a planilha não tem colunas".to_string()));
        }

        let Table { headers, rows } = table;
        let headers: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let mut stats = FilterStats { rows_read: rows.len(), ..FilterStats::default() };

        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            let row: Vec<String> = row.iter().map(|cell| cell.trim().to_string()).collect();
            let first = row.first().map(String::as_str).unwrap_or_default();

            if self.terms.matches(first) {
                stats.removed_by_term += 1;
                continue;
            }
            if !is_numeric(first) {
                stats.removed_non_numeric += 1;
                continue;
            }
            kept.push(row);
        }

        let mut table = Table::new(headers, kept);
        let mut warnings = Vec::new();

        match find_identifier_column(&table) {
            Some((idx, name)) => {
                for row in table.rows.iter_mut() {
                    let normalized = normalize_identifier(&row[idx]);
                    if normalized.len() != row[idx].len() {
                        stats.identifiers_padded += 1;
                    }
                    row[idx] = normalized;
                }
                stats.identifier_column = Some(name.to_string());
            }
            None => {
                tracing::warn!(
                    "No identifier column found among headers {:?}",
                    table.headers
                );
                warnings.push(FilterWarning::MissingIdentifierColumn {
                    candidates: IDENTIFIER_COLUMN_CANDIDATES
                        .iter()
                        .take(3)
                        .map(|s| s.to_string())
                        .collect(),
                });
            }
        }

        tracing::info!(
            "Filtered {} rows: kept {}, removed {} by term, {} non-numeric, padded {} identifiers",
            stats.rows_read,
            table.row_count(),
            stats.removed_by_term,
            stats.removed_non_numeric,
            stats.identifiers_padded
        );

        Ok(FilterOutcome { table, warnings, stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_keeps_numeric_rows_and_pads_identifier() {
        let input = table(
            &["Código", "Nome", "CPF/CNPJ"],
            &[&["123456789012", "Maria", "0001234567"]],
        );

        let outcome = PaymentFilter::default().apply(input).unwrap();

        assert_eq!(outcome.table.rows, vec![vec!["123456789012", "Maria", "00001234567"]]);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.stats.identifiers_padded, 1);
        assert_eq!(outcome.stats.identifier_column.as_deref(), Some("CPF/CNPJ"));
    }

    #[test]
    fn test_excluded_terms_win_over_numeric_check() {
        let input = table(
            &["Código", "Nome", "CPF/CNPJ"],
            &[
                &["ITABUNA 123", "x", "1234567890"],
                &["Vencimento", "", ""],
                &["itabuna", "", ""],
                &["Qtde de Reg.: 14", "", ""],
                &["Paraná", "", ""],
                &["77", "João", "98765432100"],
            ],
        );

        let outcome = PaymentFilter::default().apply(input).unwrap();

        assert_eq!(outcome.table.rows, vec![vec!["77", "João", "98765432100"]]);
        assert_eq!(outcome.stats.removed_by_term, 5);
        assert_eq!(outcome.stats.removed_non_numeric, 0);
    }

    #[test]
    fn test_terms_match_literally() {
        let terms = ExclusionTerms::new(&["Qtde de Reg.:"]).unwrap();
        assert!(terms.matches("QTDE DE REG.: 3"));
        // '.' is not a wildcard
        assert!(!terms.matches("Qtde de RegX: 3"));
        assert!(!ExclusionTerms::empty().matches("anything"));
    }

    #[test]
    fn test_non_numeric_and_blank_rows_are_dropped() {
        let input = table(
            &["Código", "Valor"],
            &[
                &["", "10"],
                &["Total", "10"],
                &[" 42 ", "10"],
                &["3,5", "1"],
                &["nan", "1"],
            ],
        );

        let outcome = PaymentFilter::default().apply(input).unwrap();

        assert_eq!(
            outcome.table.rows,
            vec![vec!["42", "10"], vec!["3,5", "1"]]
        );
        assert_eq!(outcome.stats.removed_non_numeric, 3);
    }

    #[test]
    fn test_missing_identifier_column_is_a_warning() {
        let input = table(&["Código", "Documento"], &[&["1", "1234567890"]]);

        let outcome = PaymentFilter::default().apply(input).unwrap();

        assert_eq!(outcome.table.rows, vec![vec!["1", "1234567890"]]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            outcome.warnings[0],
            FilterWarning::MissingIdentifierColumn { .. }
        ));
        assert!(outcome.stats.identifier_column.is_none());
    }

    #[test]
    fn test_identifier_candidates_checked_in_order() {
        let input = table(&["Código", "cpf", "CNPJ"], &[&["1", "1234567890", "1234567890"]]);

        let outcome = PaymentFilter::default().apply(input).unwrap();

        assert_eq!(outcome.stats.identifier_column.as_deref(), Some("CNPJ"));
        assert_eq!(outcome.table.rows[0], vec!["1", "1234567890", "01234567890"]);
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("1234567890"), "01234567890");
        assert_eq!(normalize_identifier(" 1234567890 "), "01234567890");
        assert_eq!(normalize_identifier("12345678901"), "12345678901");
        assert_eq!(normalize_identifier("123456789"), "123456789");
        assert_eq!(normalize_identifier("123.456.78"), "123.456.78");
        assert_eq!(normalize_identifier(""), "");

        for value in ["1234567890", "0001234567", "12.345.678/0001-90", "abc"] {
            let once = normalize_identifier(value);
            assert_eq!(normalize_identifier(&once), once);
        }
    }

    #[test]
    fn test_rejects_table_without_columns() {
        let result = PaymentFilter::default().apply(Table::default());
        assert!(matches!(result, Err(AppError::Load(_))));
    }
}
