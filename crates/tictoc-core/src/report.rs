//! Hierarchical report rendering.
//!
//! Each registry stores its blocks flat, in creation order; the report shows
//! them parent-grouped. The ordering is reconstructed by a positional splice:
//! start from the level-0 entries in creation order, then for each level
//! from 1 upward splice every entry of that level in immediately *before*
//! its parent's current position. The child-before-parent placement is a
//! long-standing quirk of the report format and is preserved deliberately;
//! see `test_nested_blocks_splice_order`.

use thiserror::Error;

use crate::registry::Registry;
use crate::stat::BlockStat;

/// Emitted when a render finds nothing recorded anywhere in the group.
pub const NO_TIMINGS_MESSAGE: &str =
    "No timings were recorded. Did you use the instrumentation decorator and call the methods?";

/// Placeholder shown instead of an undefined statistic (count == 0).
const NO_DATA: &str = "—";

/// A registry's flat block list could not be assembled into a display order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// A nested entry names a parent that is not present in the display
    /// sequence. Indicates an inconsistent parent reference at the call
    /// site.
    #[error("block '{block}' references unknown parent '{parent}'")]
    UnknownParent { block: String, parent: String },
    /// A nested entry carries no parent name at all.
    #[error("block '{block}' is nested at level {level} but has no parent name")]
    MissingParent { block: String, level: u32 },
}

/// Render the report for an ordered list of (label, registry) members.
///
/// Returns the single [`NO_TIMINGS_MESSAGE`] line when every member is
/// empty (or there are no members). No trailing newline.
pub fn render_group(members: &[(String, Registry)]) -> Result<String, ReportError> {
    if members.iter().all(|(_, registry)| registry.is_empty()) {
        return Ok(NO_TIMINGS_MESSAGE.to_string());
    }

    let mut out = String::new();
    for (label, registry) in members {
        render_subject(label, &registry.snapshot(), &mut out)?;
    }
    // Sections each end with a newline; the report itself carries none.
    out.pop();
    Ok(out)
}

/// One labeled section: header line plus one row per block in display
/// order.
///
/// A member with no recorded blocks keeps its header and renders a single
/// `(no timings recorded)` line in place of the rows, so the label stays
/// visible when other members do have data. The whole-group empty case is
/// handled in [`render_group`] with [`NO_TIMINGS_MESSAGE`] instead.
fn render_subject(label: &str, stats: &[BlockStat], out: &mut String) -> Result<(), ReportError> {
    out.push_str(&ljust(label, 38));
    out.push_str("total [ms]");
    out.push_str(&" ".repeat(4));
    out.push_str("count [n]");
    out.push_str(&" ".repeat(8));
    out.push_str("std [ms]");
    out.push_str(&" ".repeat(7));
    out.push_str("mean [ms]");
    out.push('\n');

    if stats.is_empty() {
        out.push_str("  (no timings recorded)\n");
        return Ok(());
    }

    let rows: Vec<String> = display_order(stats)?
        .into_iter()
        .map(|i| format_row(&stats[i]))
        .collect();
    out.push_str(&rows.join("\n"));
    out.push('\n');
    Ok(())
}

/// Indices of `stats` in display order.
///
/// Level 0 seeds the sequence in creation order; each higher level is then
/// spliced in, entry by entry in creation order, at the position currently
/// held by its parent (shifting the parent one slot later).
fn display_order(stats: &[BlockStat]) -> Result<Vec<usize>, ReportError> {
    let mut order: Vec<usize> = stats
        .iter()
        .enumerate()
        .filter(|(_, s)| s.level == 0)
        .map(|(i, _)| i)
        .collect();

    let max_level = stats.iter().map(|s| s.level).max().unwrap_or(0);
    for level in 1..=max_level {
        for (i, stat) in stats.iter().enumerate() {
            if stat.level != level {
                continue;
            }
            let parent = stat.parent.as_deref().ok_or_else(|| ReportError::MissingParent {
                block: stat.name.clone(),
                level,
            })?;
            let pos = order
                .iter()
                .position(|&j| stats[j].name == parent)
                .ok_or_else(|| ReportError::UnknownParent {
                    block: stat.name.clone(),
                    parent: parent.to_string(),
                })?;
            order.insert(pos, i);
        }
    }
    Ok(order)
}

fn format_row(stat: &BlockStat) -> String {
    let dashes = stat.level as usize * 5;
    let mut row = String::from("  +");
    row.push_str(&"-".repeat(dashes));
    row.push_str(&ljust(
        &format!("-  {}:", stat.name),
        35usize.saturating_sub(dashes),
    ));
    match (stat.mean_ms(), stat.std_ms()) {
        (Some(mean), Some(std)) => {
            row.push_str(&ljust(&format!("{:.2}", stat.total_ms), 14));
            row.push_str(&ljust(&format!("{} ", stat.count), 16));
            row.push_str(&ljust(&format!(" {:.3}", std), 16));
            row.push_str(&ljust(&format!("{:.3}", mean), 16));
        }
        // Created but never updated (e.g. a render mid-flight between a
        // guard's construction and its drop): keep the row so children can
        // still locate this name, show the statistics as undefined.
        _ => {
            row.push_str(&ljust("0.00", 14));
            row.push_str(&ljust("0 ", 16));
            row.push_str(&ljust(&format!(" {NO_DATA}"), 16));
            row.push_str(&ljust(NO_DATA, 16));
        }
    }
    row
}

/// Left-justify in a field of `width` characters; strings already at or past
/// the width are returned unchanged.
fn ljust(s: &str, width: usize) -> String {
    let len = s.chars().count();
    let mut out = String::with_capacity(width.max(len));
    out.push_str(s);
    for _ in len..width {
        out.push(' ');
    }
    out
}
