//! LaTeX `tabular` fragments in the booktabs layout.
//!
//! Output is meant to be `\input{}` into a paper, so only the tabular body
//! is emitted, without a surrounding `table` float.

use std::fmt::Write;

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `l`, used for text.
    Left,
    /// `r`, used for numbers.
    Right,
}

impl Align {
    fn spec(self) -> char {
        match self {
            Self::Left => 'l',
            Self::Right => 'r',
        }
    }
}

/// A table with a row index column and named data columns.
#[derive(Debug, Clone, Default)]
pub struct LatexTable {
    columns: Vec<(String, Align)>,
    rows: Vec<(String, Vec<String>)>,
}

impl LatexTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a data column.
    pub fn column(mut self, name: impl Into<String>, align: Align) -> Self {
        self.columns.push((name.into(), align));
        self
    }

    /// Append a row. Missing trailing cells render empty.
    pub fn push_row(&mut self, index: impl Into<String>, cells: Vec<String>) {
        self.rows.push((index.into(), cells));
    }

    /// Number of data columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Render the `tabular` environment.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let spec: String = std::iter::once('l')
            .chain(self.columns.iter().map(|(_, align)| align.spec()))
            .collect();

        let _ = writeln!(out, "\\begin{{tabular}}{{{spec}}}");
        out.push_str("\\toprule\n");

        let header: Vec<String> = std::iter::once("{}".to_string())
            .chain(self.columns.iter().map(|(name, _)| escape(name)))
            .collect();
        let _ = writeln!(out, "{} \\\\", header.join(" & "));
        out.push_str("\\midrule\n");

        for (index, cells) in &self.rows {
            let mut line = vec![escape(index)];
            for i in 0..self.columns.len() {
                line.push(cells.get(i).map(|c| escape(c)).unwrap_or_default());
            }
            let _ = writeln!(out, "{} \\\\", line.join(" & "));
        }

        out.push_str("\\bottomrule\n");
        out.push_str("\\end{tabular}\n");
        out
    }
}

/// Escape LaTeX special characters in a cell.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash "),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde "),
            '^' => out.push_str("\\textasciicircum "),
            _ => out.push(c),
        }
    }
    out
}
