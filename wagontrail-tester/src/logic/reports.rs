use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;
use wagontrail_game::Difficulty;

use super::policy::Strategy;
use super::simulation::RunRecord;

/// Per strategy and difficulty roll-up of finished runs.
#[derive(Debug, Clone, Serialize)]
pub struct RunAggregate {
    pub strategy: Strategy,
    pub difficulty: Difficulty,
    pub runs: usize,
    pub victories: usize,
    pub win_rate: f64,
    pub avg_days: f64,
    pub avg_distance: f64,
    pub avg_health: f64,
    pub endings: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    aggregates: &'a [RunAggregate],
    runs: &'a [RunRecord],
}

#[allow(clippy::cast_precision_loss)]
fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Group records by strategy and difficulty, in strategy order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_runs(records: &[RunRecord]) -> Vec<RunAggregate> {
    let mut groups: BTreeMap<(Strategy, &'static str), Vec<&RunRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.strategy, record.difficulty.code()))
            .or_default()
            .push(record);
    }

    groups
        .into_values()
        .filter_map(|runs| {
            let first = runs.first()?;
            let count = runs.len();
            let victories = runs.iter().filter(|r| r.is_victory()).count();
            let mut endings = BTreeMap::new();
            for run in &runs {
                *endings.entry(run.ending_key()).or_insert(0) += 1;
            }
            Some(RunAggregate {
                strategy: first.strategy,
                difficulty: first.difficulty,
                runs: count,
                victories,
                win_rate: mean(victories as f64, count) * 100.0,
                avg_days: mean(runs.iter().map(|r| f64::from(r.days)).sum(), count),
                avg_distance: mean(runs.iter().map(|r| f64::from(r.distance)).sum(), count),
                avg_health: mean(runs.iter().map(|r| r.health).sum(), count),
                endings,
            })
        })
        .collect()
}

fn ending_list(endings: &BTreeMap<&'static str, usize>) -> String {
    endings
        .iter()
        .map(|(key, count)| format!("{key} {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// # Errors
///
/// Returns an error if the writer fails.
pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[RunAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Journey Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;

    let victories = records.iter().filter(|r| r.is_victory()).count();
    writeln!(out, "Total runs: {}", records.len())?;
    writeln!(out, "Reached Oregon City: {}", victories.to_string().green())?;
    writeln!(
        out,
        "Lost on the trail: {}",
        (records.len() - victories).to_string().red()
    )?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for aggregate in aggregates {
        let rate = format!("{:.1}%", aggregate.win_rate);
        let rate = if aggregate.win_rate >= 50.0 {
            rate.green()
        } else {
            rate.yellow()
        };
        writeln!(
            out,
            "🐂 {} ({})",
            aggregate.strategy.label().bold(),
            aggregate.difficulty
        )?;
        writeln!(out, "   Runs: {}  Win rate: {rate}", aggregate.runs)?;
        writeln!(
            out,
            "   Avg days: {:.1}  Avg miles: {:.0}  Avg health: {:.1}",
            aggregate.avg_days, aggregate.avg_distance, aggregate.avg_health
        )?;
        writeln!(out, "   Endings: {}", ending_list(&aggregate.endings))?;
        writeln!(out)?;
    }

    if let Some(longest) = records.iter().filter(|r| r.is_victory()).max_by_key(|r| r.days) {
        writeln!(out, "{}", "🗺  Longest winning trek".bright_yellow().bold())?;
        writeln!(
            out,
            "   seed {} ({}) - {} days",
            longest.seed,
            longest.strategy,
            longest.days
        )?;
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if serialization or the writer fails.
pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[RunAggregate],
) -> Result<()> {
    let report = JsonReport {
        aggregates,
        runs: records,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// # Errors
///
/// Returns an error if the writer fails.
pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[RunAggregate],
) -> Result<()> {
    writeln!(out, "# Wagon Trail Journey Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {}", records.len())?;
    writeln!(
        out,
        "- **Victories**: {}\n",
        records.iter().filter(|r| r.is_victory()).count()
    )?;

    writeln!(out, "## Strategies\n")?;
    writeln!(
        out,
        "| Strategy | Difficulty | Runs | Win rate | Avg days | Avg miles | Endings |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {:.1}% | {:.1} | {:.0} | {} |",
            aggregate.strategy,
            aggregate.difficulty,
            aggregate.runs,
            aggregate.win_rate,
            aggregate.avg_days,
            aggregate.avg_distance,
            ending_list(&aggregate.endings)
        )?;
    }

    writeln!(out, "\n## Runs\n")?;
    for record in records {
        let status = if record.is_victory() { "✅" } else { "❌" };
        let label = record
            .code
            .clone()
            .unwrap_or_else(|| record.seed.to_string());
        writeln!(
            out,
            "- {status} `{label}` {} on day {}: {}",
            record.strategy, record.days, record.headline
        )?;
    }
    Ok(())
}
