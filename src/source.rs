//! Source table loading
//!
//! The questionnaire and its technique mappings come from a single tabular
//! file maintained by privacy staff. Columns are located by name so that the
//! optional ones (parameter suggestions, deal-breakers, explicit question
//! metadata) can simply be left out.

use crate::error::{AdvisorError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub const QUESTION_COLUMN: &str = "Question";
pub const ANSWER_COLUMN: &str = "Answer Option";
pub const TECHNIQUES_COLUMN: &str = "Recommended Techniques";

/// Resolved positions of the columns the engine reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub question: usize,
    pub answer: usize,
    pub techniques: usize,
    /// First column whose name starts with "parameter suggestion"
    pub parameters: Option<usize>,
    /// First column whose name contains "deal"
    pub deal_breakers: Option<usize>,
    pub multi_select: Option<usize>,
    pub depends_on: Option<usize>,
    pub depends_value: Option<usize>,
}

fn find(lowered: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    lowered.iter().position(|h| pred(h.as_str()))
}

impl Columns {
    fn detect(headers: &[String]) -> Result<Self> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let required = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| AdvisorError::MissingColumn {
                    column: name.to_string(),
                })
        };
        Ok(Self {
            question: required(QUESTION_COLUMN)?,
            answer: required(ANSWER_COLUMN)?,
            techniques: required(TECHNIQUES_COLUMN)?,
            parameters: find(&lowered, |h| h.starts_with("parameter suggestion")),
            deal_breakers: find(&lowered, |h| h.contains("deal")),
            multi_select: find(&lowered, |h| {
                matches!(h, "multi select" | "multi-select" | "multiselect")
            }),
            depends_on: find(&lowered, |h| h == "depends on"),
            depends_value: find(&lowered, |h| h == "depends value"),
        })
    }
}

/// The raw questionnaire table
#[derive(Debug, Clone)]
pub struct SourceTable {
    headers: Vec<String>,
    columns: Columns,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one row with named accessors
#[derive(Debug, Clone, Copy)]
pub struct SourceRow<'a> {
    cells: &'a [String],
    columns: &'a Columns,
}

impl<'a> SourceRow<'a> {
    fn cell(&self, index: usize) -> &'a str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or("")
    }

    fn optional(&self, index: Option<usize>) -> Option<&'a str> {
        index.map(|i| self.cell(i)).filter(|c| !c.is_empty())
    }

    pub fn question(&self) -> &'a str {
        self.cell(self.columns.question)
    }

    pub fn answer(&self) -> &'a str {
        self.cell(self.columns.answer)
    }

    pub fn techniques(&self) -> Vec<String> {
        split_list(self.cell(self.columns.techniques))
    }

    /// Trimmed parameter text; empty when the cell or the column is missing
    pub fn parameters(&self) -> &'a str {
        self.optional(self.columns.parameters).unwrap_or("")
    }

    /// `None` when there is no deal-breaker column or the cell is empty
    pub fn deal_breakers(&self) -> Option<Vec<String>> {
        self.optional(self.columns.deal_breakers)
            .map(split_list)
            .filter(|pets| !pets.is_empty())
    }

    pub fn multi_select(&self) -> Option<bool> {
        self.optional(self.columns.multi_select)
            .map(|v| matches!(v.to_lowercase().as_str(), "yes" | "y" | "true" | "1" | "x"))
    }

    pub fn depends_on(&self) -> Option<&'a str> {
        self.optional(self.columns.depends_on)
    }

    pub fn depends_value(&self) -> Option<&'a str> {
        self.optional(self.columns.depends_value)
    }
}

/// Split a `;`-delimited cell into trimmed, non-empty names
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

impl SourceTable {
    /// Build a table from headers and rows of cells
    ///
    /// Short rows are padded with empty cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let columns = Columns::detect(&headers)?;
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    /// Load from a `.csv` or `.json` file, chosen by extension
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let table = match extension.as_str() {
            "csv" => Self::from_csv_reader(File::open(path)?)?,
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            other => {
                return Err(AdvisorError::Source {
                    message: format!("unsupported source format {:?} for {:?}", other, path),
                })
            }
        };

        info!(
            rows = table.len(),
            columns = table.headers.len(),
            "Loaded source table from {:?}",
            path
        );
        Ok(table)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    /// Parse a JSON array of row objects keyed by column name
    ///
    /// Numbers and booleans are stringified; `null` becomes an empty cell.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<serde_json::Map<String, Value>> = serde_json::from_str(json)?;

        let mut headers: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| match record.get(h) {
                        None | Some(Value::Null) => String::new(),
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                    })
                    .collect()
            })
            .collect();

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn has_deal_breakers(&self) -> bool {
        self.columns.deal_breakers.is_some()
    }

    pub fn has_parameters(&self) -> bool {
        self.columns.parameters.is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = SourceRow<'_>> {
        self.rows.iter().map(move |cells| SourceRow {
            cells,
            columns: &self.columns,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Question,Answer Option,Recommended Techniques,Parameter Suggestions (optional),Deal-Breaker PETs
  Who will see results? ,External partners,MPC; Differential Privacy;,Use ε ≤ 1,
Who will see results?,Internal only,k-anonymity,,Secure Multiparty Computation
";

    #[test]
    fn test_csv_column_detection() {
        let table = SourceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let cols = table.columns();
        assert_eq!(cols.question, 0);
        assert_eq!(cols.parameters, Some(3));
        assert_eq!(cols.deal_breakers, Some(4));
        assert_eq!(cols.multi_select, None);
        assert!(table.has_deal_breakers());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_row_accessors_trim_and_split() {
        let table = SourceTable::from_csv_reader(CSV.as_bytes()).unwrap();
        let rows: Vec<_> = table.rows().collect();

        assert_eq!(rows[0].question(), "Who will see results?");
        assert_eq!(rows[0].techniques(), vec!["MPC", "Differential Privacy"]);
        assert_eq!(rows[0].parameters(), "Use ε ≤ 1");
        assert_eq!(rows[0].deal_breakers(), None);

        assert_eq!(rows[1].parameters(), "");
        assert_eq!(
            rows[1].deal_breakers(),
            Some(vec!["Secure Multiparty Computation".to_string()])
        );
    }

    #[test]
    fn test_missing_required_column() {
        let err = SourceTable::from_csv_reader("Question,Answer Option\nQ,A\n".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::MissingColumn { ref column } if column == TECHNIQUES_COLUMN
        ));
    }

    #[test]
    fn test_optional_columns_absent() {
        let table = SourceTable::from_csv_reader(
            "Question,Answer Option,Recommended Techniques\nQ,A,DP\n".as_bytes(),
        )
        .unwrap();
        assert!(!table.has_deal_breakers());
        assert!(!table.has_parameters());
        let row = table.rows().next().unwrap();
        assert_eq!(row.parameters(), "");
        assert_eq!(row.deal_breakers(), None);
    }

    #[test]
    fn test_json_rows_stringify_cells() {
        let json = r#"[
            {"Question": "How many records?", "Answer Option": 1000, "Recommended Techniques": "DP", "Multi Select": "no"},
            {"Question": "How many records?", "Answer Option": null, "Recommended Techniques": "MPC"}
        ]"#;
        let table = SourceTable::from_json_str(json).unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].answer(), "1000");
        assert_eq!(rows[0].multi_select(), Some(false));
        assert_eq!(rows[1].answer(), "");
        assert_eq!(rows[1].multi_select(), None);
    }

    #[test]
    fn test_split_list_drops_empties() {
        assert_eq!(split_list(" a ;; b ;"), vec!["a", "b"]);
        assert!(split_list("  ").is_empty());
    }
}
