//! Whitespace-delimited text tables with a header row.
//!
//! The harness writes every result file as `fprintf` output: one header line
//! naming the columns, then one row per measurement, fields separated by any
//! run of spaces or tabs. Columns are addressed by name so that extra columns
//! added by newer harness versions are ignored.

use anyhow::{Context, Result, bail};
use std::path::Path;

/// A parsed table: column names plus string fields per row.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// A data row and the 1-based source line it came from.
#[derive(Debug, Clone)]
struct Row {
    line: usize,
    fields: Vec<String>,
}

impl Table {
    /// Parse a table from text.
    ///
    /// The first non-blank line is the header. Blank lines are skipped. A
    /// file with no non-blank lines yields an empty table with no columns.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let Some((_, header)) = lines.next() else {
            return Ok(Self::default());
        };
        let columns: Vec<String> = header.split_whitespace().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (line, text) in lines {
            let fields: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            if fields.len() != columns.len() {
                bail!(
                    "line {line}: expected {} fields, found {}",
                    columns.len(),
                    fields.len()
                );
            }
            rows.push(Row { line, fields });
        }

        Ok(Self { columns, rows })
    }

    /// Read and parse a table from a file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<Column<'_>> {
        let index = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "missing column '{name}' (have: {})",
                    self.columns.join(", ")
                )
            })?;
        Ok(Column { table: self, index })
    }

    /// Column by position, if the table has that many columns.
    pub fn column_at(&self, index: usize) -> Option<Column<'_>> {
        (index < self.columns.len()).then_some(Column { table: self, index })
    }
}

/// A borrowed view of one table column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Column<'a> {
    /// The column's header name.
    pub fn name(&self) -> &'a str {
        &self.table.columns[self.index]
    }

    /// Raw string fields.
    pub fn strs(self) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.index;
        self.table.rows.iter().map(move |row| row.fields[index].as_str())
    }

    /// Fields parsed as floating point numbers.
    pub fn f64s(&self) -> Result<Vec<f64>> {
        self.parse_each(|field| field.parse::<f64>().ok())
    }

    /// Fields parsed as unsigned integers.
    ///
    /// Integral floats such as `42.000000` are accepted, since the harness
    /// prints some counters with `%f`.
    pub fn u64s(&self) -> Result<Vec<u64>> {
        self.parse_each(parse_u64)
    }

    fn parse_each<T>(&self, parse: impl Fn(&str) -> Option<T>) -> Result<Vec<T>> {
        self.table
            .rows
            .iter()
            .map(|row| {
                let field = &row.fields[self.index];
                parse(field).ok_or_else(|| {
                    anyhow::anyhow!(
                        "line {}: column '{}': invalid number '{field}'",
                        row.line,
                        self.name()
                    )
                })
            })
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_u64(field: &str) -> Option<u64> {
    if let Ok(v) = field.parse::<u64>() {
        return Some(v);
    }
    let v = field.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
}
