//! Memory usage and space efficiency per variant.

use serde::Serialize;

use crate::humanize;
use crate::latex::{Align, LatexTable};

/// Memory used by one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRow {
    /// Variant name.
    pub variant: String,
    /// Bytes used by the hash map.
    pub usage: u64,
}

impl MemoryRow {
    /// Space efficiency in percent: ideal payload over bytes used.
    ///
    /// `None` when the variant reported zero usage.
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self, payload_bytes: f64) -> Option<f64> {
        (self.usage > 0).then(|| 100.0 * payload_bytes / self.usage as f64)
    }
}

/// Build the memory table: `Hashmap`, `Size`, `Space Efficiency`.
pub fn memory_table(rows: &[MemoryRow], payload_bytes: f64) -> LatexTable {
    let mut table = LatexTable::new()
        .column("Hashmap", Align::Left)
        .column("Size", Align::Left)
        .column("Space Efficiency", Align::Right);

    for (idx, row) in rows.iter().enumerate() {
        let efficiency = row
            .efficiency(payload_bytes)
            .map_or_else(|| "-".to_string(), |e| format!("{e:.2}"));
        table.push_row(
            idx.to_string(),
            vec![row.variant.clone(), humanize::bytes(row.usage), efficiency],
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_is_percent_of_payload() {
        let row = MemoryRow {
            variant: "v".into(),
            usage: 2000,
        };
        assert_eq!(row.efficiency(1000.0), Some(50.0));
        let empty = MemoryRow {
            variant: "v".into(),
            usage: 0,
        };
        assert_eq!(empty.efficiency(1000.0), None);
    }

    #[test]
    fn table_rows() {
        let rows = vec![
            MemoryRow {
                variant: "graveyard".into(),
                usage: 67_108_864 * 2,
            },
            MemoryRow {
                variant: "robin_hood".into(),
                usage: 0,
            },
        ];
        let text = memory_table(&rows, 67_108_864.0).render();
        assert!(text.contains("0 & graveyard & 128 MB & 50.00 \\\\"), "{text}");
        assert!(text.contains("1 & robin\\_hood & 0 B & - \\\\"), "{text}");
    }
}
