//! `test_params.txt`: the headerless parameter file written per variant.
//!
//! One value per line, in this order: memory usage in bytes, key bits,
//! quotient bits, value bits, initial load factor (percent), churn cycles,
//! churn ops per cycle, then the churn phase change points as percentages of
//! the operation stream. Lines carry a trailing space.

use anyhow::{Context, Result, bail};
use std::path::Path;

/// Benchmark parameters for one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TestParams {
    /// Memory used by the hash map, in bytes.
    pub memory_usage: u64,
    /// Key width in bits.
    pub key_bits: u32,
    /// Quotient width in bits; the table has `2^quotient_bits` slots.
    pub quotient_bits: u32,
    /// Value width in bits.
    pub value_bits: u32,
    /// Initial load factor in percent.
    pub load_factor: u32,
    /// Number of churn cycles.
    pub churn_cycles: u64,
    /// Operations per churn cycle.
    pub churn_ops: u64,
    /// Points (percent of churn ops) where the operation kind changes.
    pub churn_points: Vec<f64>,
}

/// Field names for the fixed-position lines, for error messages.
const FIELDS: [&str; 7] = [
    "memory usage",
    "key bits",
    "quotient bits",
    "value bits",
    "load factor",
    "churn cycles",
    "churn ops",
];

impl TestParams {
    /// Parse the contents of a `test_params.txt` file.
    pub fn parse(text: &str) -> Result<Self> {
        let values: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        if values.len() < FIELDS.len() {
            bail!(
                "expected at least {} lines, found {}",
                FIELDS.len(),
                values.len()
            );
        }

        let int = |i: usize| -> Result<u64> {
            let (line, value) = values[i];
            value
                .parse::<u64>()
                .with_context(|| format!("line {line}: invalid {} '{value}'", FIELDS[i]))
        };
        let small = |i: usize| -> Result<u32> {
            let v = int(i)?;
            u32::try_from(v).with_context(|| format!("{} {v} out of range", FIELDS[i]))
        };

        let churn_points = values[FIELDS.len()..]
            .iter()
            .map(|&(line, value)| {
                value
                    .parse::<f64>()
                    .with_context(|| format!("line {line}: invalid churn point '{value}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            memory_usage: int(0)?,
            key_bits: small(1)?,
            quotient_bits: small(2)?,
            value_bits: small(3)?,
            load_factor: small(4)?,
            churn_cycles: int(5)?,
            churn_ops: int(6)?,
            churn_points,
        })
    }

    /// Read and parse a `test_params.txt` file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Bits stored per slot besides the quotient: remainder plus value.
    pub fn remainder_bits(&self) -> u32 {
        let bits = (u64::from(self.key_bits) + u64::from(self.value_bits))
            .saturating_sub(u64::from(self.quotient_bits));
        u32::try_from(bits).unwrap_or(u32::MAX)
    }

    /// Caption line describing the run, placed under each chart.
    pub fn caption(&self) -> String {
        format!(
            "q_bits={}, r_bits={}, ChurnOps: {}, ChurnCycles: {}",
            self.quotient_bits,
            self.remainder_bits(),
            self.churn_ops,
            self.churn_cycles
        )
    }

    /// Bytes of key/value payload held at the initial load factor.
    ///
    /// This is the lower bound any variant can reach, used as the numerator
    /// of the space efficiency ratio.
    pub fn payload_bytes(&self) -> f64 {
        let slots = 2f64.powi(i32::try_from(self.quotient_bits).unwrap_or(i32::MAX));
        let bytes_per_item = (f64::from(self.key_bits) + f64::from(self.value_bits)) / 8.0;
        f64::from(self.load_factor) / 100.0 * slots * bytes_per_item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "6710886400 \n64 \n22 \n64 \n95 \n10 \n1000000 \n33.3333 \n66.6667 \n";

    #[test]
    fn parse_sample() {
        let params = TestParams::parse(SAMPLE).unwrap();
        assert_eq!(params.memory_usage, 6_710_886_400);
        assert_eq!(params.key_bits, 64);
        assert_eq!(params.quotient_bits, 22);
        assert_eq!(params.value_bits, 64);
        assert_eq!(params.load_factor, 95);
        assert_eq!(params.churn_cycles, 10);
        assert_eq!(params.churn_ops, 1_000_000);
        assert_eq!(params.churn_points, vec![33.3333, 66.6667]);
    }

    #[test]
    fn caption_uses_remainder_bits() {
        let params = TestParams::parse(SAMPLE).unwrap();
        assert_eq!(
            params.caption(),
            "q_bits=22, r_bits=106, ChurnOps: 1000000, ChurnCycles: 10"
        );
    }

    #[test]
    fn payload_matches_reference_configuration() {
        // 95% of 2^22 slots holding 16-byte key/value pairs.
        let params = TestParams::parse(SAMPLE).unwrap();
        assert!((params.payload_bytes() - 95.0 * 4_194_304.0 * 16.0 / 100.0).abs() < 1e-3);
    }

    #[test]
    fn no_churn_points() {
        let params = TestParams::parse("1\n2\n1\n0\n50\n3\n4\n").unwrap();
        assert!(params.churn_points.is_empty());
        assert_eq!(params.remainder_bits(), 1);
    }

    #[test]
    fn wide_bit_counts_do_not_overflow() {
        let params = TestParams::parse("1\n4294967295\n22\n1\n95\n2\n1000\n").unwrap();
        assert_eq!(params.remainder_bits(), 4_294_967_274);
        assert!(params.caption().contains("r_bits=4294967274"));
        assert!(params.payload_bytes().is_finite());
        assert!(params.payload_bytes() > 0.0);
    }

    #[test]
    fn too_few_lines() {
        let err = TestParams::parse("1\n2\n3\n").unwrap_err();
        assert!(err.to_string().contains("at least 7"), "{err}");
    }

    #[test]
    fn bad_value_names_field() {
        let err = TestParams::parse("1\n2\nx\n0\n50\n3\n4\n").unwrap_err();
        assert!(err.to_string().contains("quotient bits"), "{err}");
    }
}
