use std::{
    fmt,
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result, bail};

use crate::{classify::MissKind, stats::CacheStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Detailed,
    Compact,
}

impl FromStr for ReportMode {
    type Err = anyhow::Error;

    // Numeric flags follow the classic tool: 0 is detailed, anything else compact.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(flag) = s.parse::<i64>() {
            return Ok(if flag == 0 {
                ReportMode::Detailed
            } else {
                ReportMode::Compact
            });
        }
        match s.to_ascii_lowercase().as_str() {
            "detailed" => Ok(ReportMode::Detailed),
            "compact" => Ok(ReportMode::Compact),
            _ => bail!("unknown output flag '{s}' (expected 0, 1, detailed or compact)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSelection {
    Counts,
    Rates,
    Both,
}

impl FromStr for DetailSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "counts" => Ok(DetailSelection::Counts),
            "2" | "rates" => Ok(DetailSelection::Rates),
            "0" | "both" => Ok(DetailSelection::Both),
            other => bail!("unknown display choice '{other}' (expected 0, 1 or 2)"),
        }
    }
}

/// Asks which parts of the detailed report to show.
pub fn prompt_selection(mut input: impl BufRead, mut output: impl Write) -> Result<DetailSelection> {
    writeln!(output, "Display data:")?;
    writeln!(output, "[1] - absolute counts  [2] - rates    [0] - both")?;
    output.flush()?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read display choice")?;
    answer.parse()
}

pub struct DetailedReport<'a> {
    pub stats: &'a CacheStats,
    pub selection: DetailSelection,
}

impl fmt::Display for DetailedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        if matches!(self.selection, DetailSelection::Counts | DetailSelection::Both) {
            writeln!(f, "Total: {}", stats.accesses)?;
            writeln!(f, "hits: {}", stats.hits)?;
            writeln!(f, "misses: {}", stats.misses)?;
            writeln!(f, "compulsory: {}", stats.compulsory)?;
            writeln!(f, "conflict: {}", stats.conflict)?;
            writeln!(f, "capacity: {}", stats.capacity)?;
        }
        if matches!(self.selection, DetailSelection::Rates | DetailSelection::Both) {
            writeln!(f, "##### RATES #####")?;
            writeln!(f, "hit: {:.4}", stats.hit_rate())?;
            writeln!(f, "miss: {:.4}", stats.miss_rate())?;
            writeln!(f, "compulsory: {:.4}", stats.miss_kind_rate(MissKind::Compulsory))?;
            writeln!(f, "conflict: {:.4}", stats.miss_kind_rate(MissKind::Conflict))?;
            writeln!(f, "capacity: {:.4}", stats.miss_kind_rate(MissKind::Capacity))?;
        }
        Ok(())
    }
}

pub struct CompactReport<'a>(pub &'a CacheStats);

impl fmt::Display for CompactReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        write!(
            f,
            "{} {:.4} {:.4} {:.4} {:.4} {:.4}",
            stats.accesses,
            stats.hit_rate(),
            stats.miss_rate(),
            stats.miss_kind_rate(MissKind::Compulsory),
            stats.miss_kind_rate(MissKind::Conflict),
            stats.miss_kind_rate(MissKind::Capacity),
        )
    }
}
