use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{Criterion, ExclusionReport, PreferenceVector, RankedTable, ScoredRegion};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Composite scores always show 2 decimals, the precision they are rounded to
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Rescaled scores live in [0, 1] and get one more digit
pub fn format_rescaled(score: f64) -> String {
    format!("{:.3}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn format_metrics(region: &ScoredRegion, metrics: &[Criterion]) -> String {
    metrics
        .iter()
        .filter_map(|c| region.metric(*c).map(|m| format!("{}={:.2}", c, m)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format the ranked table: index, score, optional rescaled score, name,
/// then the display metrics. No headers.
pub fn format_ranked_table(table: &RankedTable, use_colors: bool) -> String {
    if table.regions.is_empty() {
        return "No regions to rank.".to_string();
    }

    let term_width = get_terminal_width();

    // Index column: 3 chars ("99."), score column: 6 chars ("100.00")
    let score_width = 6;
    let rescaled_width = if table.normalized { 5 + 2 } else { 0 };
    let separator = "  ";

    table
        .regions
        .iter()
        .enumerate()
        .map(|(idx, region)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>width$}", format_score(region.composite), width = score_width);
            let rescaled_str = match region.rescaled {
                Some(r) if table.normalized => format!("{}{}", separator, format_rescaled(r)),
                _ => String::new(),
            };
            let metrics = format_metrics(region, &table.display_metrics);

            let fixed_width = 3 + 1 + score_width + rescaled_width + separator.len() * 2 + metrics.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&region.name, width - fixed_width),
                Some(_) => truncate_name(&region.name, 20),
                None => region.name.clone(),
            };

            let line = if use_colors {
                format!(
                    "{} {}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    rescaled_str.cyan(),
                    separator,
                    name
                )
            } else {
                format!("{} {}{}{}{}", index_str, score_str, rescaled_str, separator, name)
            };

            if metrics.is_empty() {
                line
            } else if use_colors {
                format!("{}{}{}", line, separator, metrics.dimmed())
            } else {
                format!("{}{}{}", line, separator, metrics)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranked table as tab-separated values for scripting.
/// Columns: rank, name, composite, [rescaled], display metrics (no headers, no colors)
pub fn format_tsv(table: &RankedTable) -> String {
    table
        .regions
        .iter()
        .enumerate()
        .map(|(idx, region)| {
            let mut fields = vec![
                (idx + 1).to_string(),
                region.name.clone(),
                format_score(region.composite),
            ];
            if table.normalized {
                fields.push(region.rescaled.map(|r| format!("{:.4}", r)).unwrap_or_default());
            }
            for criterion in &table.display_metrics {
                fields.push(
                    region
                        .metric(*criterion)
                        .map(|m| format!("{:.2}", m))
                        .unwrap_or_default(),
                );
            }
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the full result, exclusions included, as pretty JSON
pub fn format_json(table: &RankedTable) -> serde_json::Result<String> {
    let excluded: Vec<_> = table
        .exclusions
        .iter()
        .map(|e| {
            json!({
                "row": e.input_index,
                "name": e.name,
                "reason": e.reason.to_string(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&json!({
        "regions": table.regions,
        "scored": table.scored_count,
        "excluded": excluded,
        "normalized": table.normalized,
        "display_metrics": table.display_metrics,
    }))
}

/// Format a single region with its rank (1-based) and per-criterion breakdown
/// (for verbose mode)
pub fn format_region_detail(rank: usize, region: &ScoredRegion, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(region.breakdown.len() + 3);

    if use_colors {
        lines.push(format!("{}. {}", rank, region.name.bold()));
    } else {
        lines.push(format!("{}. {}", rank, region.name));
    }
    lines.push(format!("  Composite: {}", format_score(region.composite)));
    if let Some(r) = region.rescaled {
        lines.push(format!("  Rescaled: {}", format_rescaled(r)));
    }
    for c in &region.breakdown {
        lines.push(format!(
            "  {}: {:.2} x {:.3} = {:.3}",
            c.criterion.label(),
            c.metric,
            c.weight,
            c.contribution
        ));
    }

    lines.join("\n")
}

/// Format a preference vector, one criterion per line with its share
pub fn format_weights(weights: &PreferenceVector, use_colors: bool) -> String {
    weights
        .iter()
        .map(|(criterion, weight)| {
            let share = format!("{:>5.1}%", weight * 100.0);
            if use_colors {
                format!("{:<12} {:.3}  {}", criterion.name(), weight, share.dimmed())
            } else {
                format!("{:<12} {:.3}  {}", criterion.name(), weight, share)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summarize rows left out of scoring, one per line. Rows are 1-based.
pub fn format_exclusions(report: &ExclusionReport) -> String {
    if report.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!("Excluded {} row(s) from scoring:", report.count())];
    for exclusion in report.iter() {
        let name = if exclusion.name.trim().is_empty() {
            "(unnamed)"
        } else {
            exclusion.name.as_str()
        };
        lines.push(format!(
            "  row {} ({}): {}",
            exclusion.input_index + 1,
            name,
            exclusion.reason
        ));
    }
    lines.join("\n")
}
