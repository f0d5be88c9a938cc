// Command bodies for the `vgrank` binary, written against injected writers so
// the output and exit status can be asserted without a terminal.

use std::io::Write;

use anyhow::Result;
use tracing::info;

use vgrank_common::SiteRanking;

use crate::filters::apply_filters;
use crate::report::{render_ranking, render_stats};
use crate::search::ProductSearch;
use crate::stats::RankingStats;
use crate::storage::StateStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputMode {
    pub stats: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Run one search: history first, then the query. A successful ranking
/// replaces the saved snapshot; a failure leaves it alone and prints an
/// empty report.
pub async fn run_search(
    search: &ProductSearch,
    state: &StateStore,
    term: &str,
    mode: OutputMode,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<Outcome> {
    let term = term.trim();
    if !term.is_empty() {
        state.save_search_history(term);
    }

    match search.search_by_term(term).await {
        Ok(rankings) => {
            info!(sites = rankings.len(), "Saving ranking snapshot");
            state.save_ranking_data(&rankings);
            let shown = match state.search_filters() {
                Some(filters) => apply_filters(rankings, &filters),
                None => rankings,
            };
            print_rankings(out, &shown, Some(term), mode)?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            writeln!(err, "検索に失敗しました ({}): {e}", e.kind())?;
            let mode = OutputMode { stats: false, ..mode };
            print_rankings(out, &[], Some(term), mode)?;
            Ok(Outcome::Failure)
        }
    }
}

pub fn show_last(state: &StateStore, mode: OutputMode, out: &mut dyn Write) -> Result<()> {
    print_rankings(out, &state.ranking_data(), None, mode)
}

pub fn print_rankings(
    out: &mut dyn Write,
    rankings: &[SiteRanking],
    term: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    if mode.json {
        let value = if mode.stats {
            serde_json::json!({
                "rankings": rankings,
                "stats": RankingStats::compute(rankings),
            })
        } else {
            serde_json::to_value(rankings)?
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }
    write!(out, "{}", render_ranking(rankings, term))?;
    if mode.stats {
        writeln!(out)?;
        write!(out, "{}", render_stats(&RankingStats::compute(rankings)))?;
    }
    Ok(())
}
