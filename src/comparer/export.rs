// Writing of the export documents: the full results file, overwritten on
// every run, and the running history file, rewritten in full after appending.

use chrono::Utc;
use serde_json::json;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use std::fs;
use std::path::Path;

use list_matching::{AreaRow, ListMatch, MatchingResult, PartyTally};

use crate::comparer::{ComparerResult, RenderingJsonSnafu, WritingJsonSnafu};

/// Fixed location of both export files, relative to the working directory.
pub const OUTPUT_DIR: &str = "docs/data";
pub const RESULTS_FILE: &str = "results.json";
pub const HISTORY_FILE: &str = "history.json";

fn tally_js(tally: &PartyTally) -> JSValue {
    json!({
        "party_code": tally.party_code,
        "match_count": tally.match_count,
    })
}

fn match_js(m: &ListMatch) -> JSValue {
    json!({
        "area": m.area,
        "mp_number": m.mp_number,
        "mp_party": m.mp_party,
        "pl_rank": m.pl_rank,
        "pl_party_code": m.pl_party_code,
    })
}

fn row_js(row: &AreaRow) -> JSValue {
    json!({
        "area": row.area,
        "mp_number": row.mp_number,
        "mp_party": row.mp_party,
        "matched": row.matched,
        "status": row.status,
    })
}

fn results_js(result: &MatchingResult, timestamp: &str) -> JSValue {
    json!({
        "timestamp": timestamp,
        "total_areas": result.total_areas(),
        "matched_areas": result.matched_areas(),
        "match_rate": result.match_rate(),
        "summary_by_party": result.summary.iter().map(tally_js).collect::<Vec<JSValue>>(),
        "matches": result.matches.iter().map(match_js).collect::<Vec<JSValue>>(),
        "details": result.rows.iter().map(row_js).collect::<Vec<JSValue>>(),
    })
}

// The history keeps the totals only, not the per-area records.
fn snapshot_js(result: &MatchingResult, timestamp: &str) -> JSValue {
    json!({
        "timestamp": timestamp,
        "total_areas": result.total_areas(),
        "matched_areas": result.matched_areas(),
        "match_rate": result.match_rate(),
        "summary_by_party": result.summary.iter().map(tally_js).collect::<Vec<JSValue>>(),
    })
}

/// Writes the results document and appends a snapshot to the history file.
/// Both land in `out_dir`, which is created when absent.
pub fn write_results(result: &MatchingResult, out_dir: &Path) -> ComparerResult<()> {
    fs::create_dir_all(out_dir).context(WritingJsonSnafu {
        path: out_dir.display().to_string(),
    })?;
    let timestamp = Utc::now().to_rfc3339();

    let results_path = out_dir.join(RESULTS_FILE);
    let pretty =
        serde_json::to_string_pretty(&results_js(result, &timestamp)).context(RenderingJsonSnafu)?;
    fs::write(&results_path, pretty).context(WritingJsonSnafu {
        path: results_path.display().to_string(),
    })?;
    println!();
    println!("Results exported to {}", results_path.display());

    append_history(result, &timestamp, out_dir)
}

fn append_history(result: &MatchingResult, timestamp: &str, out_dir: &Path) -> ComparerResult<()> {
    let history_path = out_dir.join(HISTORY_FILE);
    // A missing or unreadable history starts over from empty.
    let mut history: Vec<JSValue> = match fs::read_to_string(&history_path) {
        Ok(contents) => serde_json::from_str(contents.as_str()).unwrap_or_default(),
        Err(_) => Vec::new(),
    };
    history.push(snapshot_js(result, timestamp));

    let pretty =
        serde_json::to_string_pretty(&JSValue::Array(history)).context(RenderingJsonSnafu)?;
    fs::write(&history_path, pretty).context(WritingJsonSnafu {
        path: history_path.display().to_string(),
    })?;
    println!("History updated at {}", history_path.display());
    Ok(())
}
