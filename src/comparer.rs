use log::{debug, info, warn};

use list_matching::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod export;

#[derive(Debug, Snafu)]
pub enum ComparerError {
    #[snafu(display("Input directory not found: {path}"))]
    MissingInputDir { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error rendering JSON output"))]
    RenderingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
}

pub type ComparerResult<T> = Result<T, ComparerError>;

pub mod data_reader {
    use crate::comparer::*;

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct ConstituencyEntry {
        #[serde(rename = "candidateCode", default)]
        pub candidate_code: String,
        #[serde(rename = "partyCode", default = "unknown_party")]
        pub party_code: String,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct ConstituencyFile {
        #[serde(default)]
        pub entries: Vec<ConstituencyEntry>,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct PartyListEntry {
        #[serde(rename = "partyCode", default)]
        pub party_code: String,
        #[serde(default)]
        pub rank: u32,
    }

    #[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
    pub struct PartyListFile {
        #[serde(default)]
        pub entries: Vec<PartyListEntry>,
    }

    fn unknown_party() -> String {
        "Unknown".to_string()
    }

    pub fn read_constituency_file(path: &Path) -> ComparerResult<ConstituencyFile> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
            path: path.display().to_string(),
        })?;
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
            path: path.display().to_string(),
        })
    }

    pub fn read_party_list_file(path: &Path) -> ComparerResult<PartyListFile> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
            path: path.display().to_string(),
        })?;
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
            path: path.display().to_string(),
        })
    }
}

/// The area codes present in a directory: every `<code>.json` file name,
/// sorted for a deterministic report order.
pub fn list_area_codes(dir: &Path) -> ComparerResult<Vec<String>> {
    let entries = fs::read_dir(dir).context(OpeningJsonSnafu {
        path: dir.display().to_string(),
    })?;
    let mut codes: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.context(OpeningJsonSnafu {
            path: dir.display().to_string(),
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(code) = name.strip_suffix(".json") {
            codes.push(code.to_string());
        }
    }
    codes.sort();
    Ok(codes)
}

fn read_area(code: &str, mp_path: &Path, pl_path: &Path) -> ComparerResult<AreaBallots> {
    let mp = data_reader::read_constituency_file(mp_path)?;
    let pl = data_reader::read_party_list_file(pl_path)?;
    Ok(AreaBallots {
        area_code: code.to_string(),
        constituency: mp
            .entries
            .into_iter()
            .map(|e| CandidateEntry {
                candidate_code: e.candidate_code,
                party_code: e.party_code,
            })
            .collect(),
        party_list: pl
            .entries
            .into_iter()
            .map(|e| ListEntry {
                party_code: e.party_code,
                rank: e.rank,
            })
            .collect(),
    })
}

/// Pairs up the per-area files of the two directories and reads them.
///
/// Areas with no party-list file are skipped without a message. An area whose
/// files cannot be read or parsed is logged and dropped; it never aborts the
/// rest of the batch. A missing top-level directory is the one fatal case.
pub fn collect_areas(mp_root: &Path, pl_root: &Path) -> ComparerResult<Vec<AreaBallots>> {
    for dir in [mp_root, pl_root] {
        if !dir.is_dir() {
            return MissingInputDirSnafu {
                path: dir.display().to_string(),
            }
            .fail();
        }
    }

    let area_codes = list_area_codes(mp_root)?;
    info!(
        "collect_areas: {} constituency files under {}",
        area_codes.len(),
        mp_root.display()
    );

    let mut areas: Vec<AreaBallots> = Vec::new();
    for code in area_codes.iter() {
        let mp_path = mp_root.join(format!("{}.json", code));
        let pl_path = pl_root.join(format!("{}.json", code));
        if !pl_path.exists() {
            debug!("collect_areas: area {}: no party-list file, skipping", code);
            continue;
        }
        match read_area(code, &mp_path, &pl_path) {
            Ok(ballots) => areas.push(ballots),
            Err(e) => {
                warn!("Error processing {}: {}", code, e);
            }
        }
    }
    Ok(areas)
}

fn print_report(result: &MatchingResult) {
    println!(
        "{:<6} | {:<6} | {:<10} | {:<30}",
        "Area", "MP Num", "MP Party", "Status"
    );
    println!("{}", "-".repeat(50));
    for row in result.rows.iter() {
        println!(
            "{:<6} | {:<6} | {:<10} | {}",
            row.area, row.mp_number, row.mp_party, row.status
        );
    }

    println!();
    println!("{}", "=".repeat(40));
    println!("{:^40}", "SUMMARY BY PARTY (DESC)");
    println!("{}", "=".repeat(40));
    if result.summary.is_empty() {
        println!("No matches discovered.");
    } else {
        println!("{:<20} | {:<10}", "Party Code", "Match Count");
        println!("{}", "-".repeat(40));
        for tally in result.summary.iter() {
            println!("{:<20} | {:<10}", tally.party_code, tally.match_count);
        }
    }
    println!("{}", "=".repeat(40));
}

pub fn run_comparison(mp_dir: &str, pl_dir: &str, export_json: bool) -> ComparerResult<()> {
    let areas = collect_areas(Path::new(mp_dir), Path::new(pl_dir))?;
    let result = run_matching(&areas);
    print_report(&result);
    if export_json {
        export::write_results(&result, Path::new(export::OUTPUT_DIR))?;
    }
    Ok(())
}
