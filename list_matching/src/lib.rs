mod config;
pub mod builder;

use log::{debug, info};

pub use crate::config::*;

/// Extracts the winning candidate's number for an area.
///
/// The number is whatever follows `CANDIDATE-MP-<area_code>` in the candidate
/// code. This is a plain substring: leading zeros are preserved and no numeric
/// parsing happens at any point, so `"05"` and `"5"` are different numbers.
/// Returns `None` when the prefix does not match or nothing follows it.
pub fn winning_number(area_code: &str, candidate_code: &str) -> Option<String> {
    let prefix = format!("{}{}", CANDIDATE_PREFIX, area_code);
    match candidate_code.strip_prefix(prefix.as_str()) {
        Some(number) if !number.is_empty() => Some(number.to_string()),
        _ => None,
    }
}

/// The trailing two characters of a party code, or the whole code when it is
/// shorter than that.
pub fn party_number(party_code: &str) -> &str {
    match party_code.char_indices().rev().nth(1) {
        Some((idx, _)) => &party_code[idx..],
        None => party_code,
    }
}

/// Matches one area's winning candidate number against its party list.
///
/// Only the first [`TOP_LIST_RANKS`] entries of the list are scanned. Entries
/// carrying a number from [`EXCLUDED_PARTY_NUMBERS`] are skipped before any
/// comparison. Returns `None` when the area has no constituency entries or no
/// number can be extracted from the winning candidate code; such areas do not
/// appear in the report at all.
pub fn match_area(ballots: &AreaBallots) -> Option<AreaOutcome> {
    let winner = ballots.constituency.first()?;
    let mp_number = winning_number(&ballots.area_code, &winner.candidate_code)?;
    let mp_party = winner.party_code.clone();

    let mut matches: Vec<ListMatch> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    for entry in ballots.party_list.iter().take(TOP_LIST_RANKS) {
        let number = party_number(&entry.party_code);
        if EXCLUDED_PARTY_NUMBERS.contains(&number) {
            debug!(
                "match_area: area {}: rank {} has reserved number {}, skipping",
                ballots.area_code, entry.rank, number
            );
            continue;
        }
        if number == mp_number {
            labels.push(format!("Rank {} (Party List {})", entry.rank, number));
            matches.push(ListMatch {
                area: ballots.area_code.clone(),
                mp_number: mp_number.clone(),
                mp_party: mp_party.clone(),
                pl_rank: entry.rank,
                pl_party_code: entry.party_code.clone(),
            });
        }
    }

    let status = if labels.is_empty() {
        "No Match".to_string()
    } else {
        format!("MATCH: {}", labels.join(", "))
    };
    Some(AreaOutcome {
        row: AreaRow {
            area: ballots.area_code.clone(),
            mp_number,
            mp_party,
            matched: !matches.is_empty(),
            status,
        },
        matches,
    })
}

/// Counts match occurrences per constituency party.
///
/// Counts are per match, not per matched area. The result is sorted by count
/// descending with a stable sort, so parties with equal counts keep the order
/// in which they were first encountered.
pub fn tally_by_party(matches: &[ListMatch]) -> Vec<PartyTally> {
    let mut tallies: Vec<PartyTally> = Vec::new();
    for m in matches.iter() {
        match tallies.iter_mut().find(|t| t.party_code == m.mp_party) {
            Some(t) => t.match_count += 1,
            None => tallies.push(PartyTally {
                party_code: m.mp_party.clone(),
                match_count: 1,
            }),
        }
    }
    tallies.sort_by_key(|t| std::cmp::Reverse(t.match_count));
    tallies
}

/// The share of matched areas, as a percentage rounded to 2 decimals.
/// An empty run rates 0.
pub fn match_rate(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = matched as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Runs the matching for a batch of areas.
///
/// Arguments:
/// * `areas` the per-area ballots to process, in report order
///
/// Areas that fail a precondition (see [`match_area`]) are dropped without a
/// row. The summary is computed over all the matches of the batch.
pub fn run_matching(areas: &[AreaBallots]) -> MatchingResult {
    info!("run_matching: processing {} areas", areas.len());
    let mut rows: Vec<AreaRow> = Vec::new();
    let mut matches: Vec<ListMatch> = Vec::new();
    for ballots in areas.iter() {
        match match_area(ballots) {
            Some(outcome) => {
                debug!(
                    "run_matching: area {}: {}",
                    outcome.row.area, outcome.row.status
                );
                matches.extend(outcome.matches);
                rows.push(outcome.row);
            }
            None => {
                debug!(
                    "run_matching: area {}: no usable winning entry, skipped",
                    ballots.area_code
                );
            }
        }
    }
    let summary = tally_by_party(&matches);
    MatchingResult {
        rows,
        matches,
        summary,
    }
}

impl MatchingResult {
    /// The number of areas that produced a row.
    pub fn total_areas(&self) -> usize {
        self.rows.len()
    }

    /// The number of areas with at least one match.
    pub fn matched_areas(&self) -> usize {
        self.rows.iter().filter(|r| r.matched).count()
    }

    /// See [`match_rate`].
    pub fn match_rate(&self) -> f64 {
        match_rate(self.matched_areas(), self.total_areas())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn winning_number_is_a_substring() {
        init();
        assert_eq!(
            winning_number("100", "CANDIDATE-MP-10005"),
            Some("05".to_string())
        );
        // Leading zeros survive; nothing is parsed as a number.
        assert_ne!(winning_number("100", "CANDIDATE-MP-10005"), Some("5".to_string()));
        assert_eq!(winning_number("1", "CANDIDATE-MP-105"), Some("05".to_string()));
    }

    #[test]
    fn winning_number_rejects_foreign_codes() {
        init();
        assert_eq!(winning_number("100", "CANDIDATE-PL-10005"), None);
        assert_eq!(winning_number("101", "CANDIDATE-MP-10005"), None);
        // The remainder is taken as-is, whatever its length.
        assert_eq!(
            winning_number("1", "CANDIDATE-MP-10005"),
            Some("0005".to_string())
        );
        // An exact prefix with nothing after it is not a number.
        assert_eq!(winning_number("100", "CANDIDATE-MP-100"), None);
        assert_eq!(winning_number("100", ""), None);
    }

    #[test]
    fn party_number_is_the_trailing_pair() {
        init();
        assert_eq!(party_number("PARTY-B-05"), "05");
        assert_eq!(party_number("05"), "05");
        assert_eq!(party_number("5"), "5");
        assert_eq!(party_number(""), "");
    }

    #[test]
    fn area_without_entries_is_skipped() {
        init();
        let ballots = Builder::new("100").list_entry("PARTY-05", 1).build();
        assert_eq!(match_area(&ballots), None);
    }

    #[test]
    fn area_with_unexpected_winner_code_is_skipped() {
        init();
        let ballots = Builder::new("100")
            .constituency_entry("SOMETHING-ELSE-10005", "PARTY-RED")
            .list_entry("PARTY-05", 1)
            .build();
        assert_eq!(match_area(&ballots), None);
    }

    #[test]
    fn match_is_found_in_the_top_ranks() {
        init();
        let ballots = Builder::new("100")
            .constituency_entry("CANDIDATE-MP-10005", "PARTY-RED")
            .list_entry("PARTY-31", 1)
            .list_entry("PARTY-22", 2)
            .list_entry("PARTY-05", 3)
            .build();
        let outcome = match_area(&ballots).unwrap();
        assert!(outcome.row.matched);
        assert_eq!(outcome.row.status, "MATCH: Rank 3 (Party List 05)");
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].pl_rank, 3);
        assert_eq!(outcome.matches[0].pl_party_code, "PARTY-05");
        assert_eq!(outcome.matches[0].mp_party, "PARTY-RED");
    }

    #[test]
    fn multiple_matches_join_in_scan_order() {
        init();
        let ballots = Builder::new("100")
            .constituency_entry("CANDIDATE-MP-10005", "PARTY-RED")
            .list_entry("PARTY-05", 1)
            .list_entry("PARTY-10", 2)
            .list_entry("OTHER-05", 3)
            .build();
        let outcome = match_area(&ballots).unwrap();
        assert_eq!(
            outcome.row.status,
            "MATCH: Rank 1 (Party List 05), Rank 3 (Party List 05)"
        );
        assert_eq!(outcome.matches.len(), 2);
    }

    #[test]
    fn only_the_first_seven_entries_are_scanned() {
        init();
        let mut builder = Builder::new("100")
            .constituency_entry("CANDIDATE-MP-10005", "PARTY-RED");
        for rank in 1..=7 {
            builder = builder.list_entry(&format!("PARTY-{:02}", rank + 30), rank);
        }
        // Would match, but sits at rank 8.
        builder = builder.list_entry("PARTY-05", 8);
        let outcome = match_area(&builder.build()).unwrap();
        assert!(!outcome.row.matched);
        assert_eq!(outcome.row.status, "No Match");
    }

    #[test]
    fn reserved_numbers_never_match() {
        init();
        let ballots = Builder::new("101")
            .constituency_entry("CANDIDATE-MP-10109", "PARTY-BLUE")
            .list_entry("PARTY-09", 1)
            .list_entry("PARTY-06", 2)
            .build();
        let outcome = match_area(&ballots).unwrap();
        assert!(!outcome.row.matched);
        assert_eq!(outcome.row.status, "No Match");
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn tally_sorts_descending_and_keeps_tie_order() {
        init();
        let mk = |party: &str| ListMatch {
            area: "100".to_string(),
            mp_number: "05".to_string(),
            mp_party: party.to_string(),
            pl_rank: 1,
            pl_party_code: "PARTY-05".to_string(),
        };
        let matches = vec![mk("A"), mk("B"), mk("C"), mk("B")];
        let summary = tally_by_party(&matches);
        let compact: Vec<(&str, u64)> = summary
            .iter()
            .map(|t| (t.party_code.as_str(), t.match_count))
            .collect();
        // B leads; A and C tie at 1 and keep their first-seen order.
        assert_eq!(compact, vec![("B", 2), ("A", 1), ("C", 1)]);
    }

    #[test]
    fn match_rate_rounds_to_two_decimals() {
        init();
        assert_eq!(match_rate(0, 0), 0.0);
        assert_eq!(match_rate(1, 3), 33.33);
        assert_eq!(match_rate(2, 3), 66.67);
        assert_eq!(match_rate(3, 3), 100.0);
    }

    #[test]
    fn two_area_batch_end_to_end() {
        init();
        let area_100 = Builder::new("100")
            .constituency_entry("CANDIDATE-MP-10005", "PARTY-RED")
            .list_entry("PARTY-44", 1)
            .list_entry("PARTY-17", 2)
            .list_entry("PARTY-05", 3)
            .build();
        // The winner number 09 exists at rank 1, but 09 is reserved.
        let area_101 = Builder::new("101")
            .constituency_entry("CANDIDATE-MP-10109", "PARTY-BLUE")
            .list_entry("PARTY-09", 1)
            .list_entry("PARTY-12", 2)
            .build();

        let result = run_matching(&[area_100, area_101]);
        assert_eq!(result.total_areas(), 2);
        assert_eq!(result.matched_areas(), 1);
        assert_eq!(result.match_rate(), 50.0);

        assert_eq!(result.rows[0].area, "100");
        assert!(result.rows[0].matched);
        assert_eq!(result.rows[0].status, "MATCH: Rank 3 (Party List 05)");
        assert_eq!(result.rows[1].area, "101");
        assert!(!result.rows[1].matched);
        assert_eq!(result.rows[1].status, "No Match");

        assert_eq!(result.summary.len(), 1);
        assert_eq!(result.summary[0].party_code, "PARTY-RED");
        assert_eq!(result.summary[0].match_count, 1);
    }
}
