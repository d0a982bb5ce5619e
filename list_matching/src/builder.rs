pub use crate::config::*;

/// A builder for assembling the ballots of one area.
///
/// ```
/// pub use list_matching::builder::Builder;
///
/// let ballots = Builder::new("100")
///     .constituency_entry("CANDIDATE-MP-10005", "PARTY-RED")
///     .list_entry("PARTY-BLUE-05", 1)
///     .build();
///
/// assert_eq!(ballots.area_code, "100");
/// assert_eq!(ballots.constituency.len(), 1);
/// ```
pub struct Builder {
    _area_code: String,
    _constituency: Vec<CandidateEntry>,
    _party_list: Vec<ListEntry>,
}

impl Builder {
    pub fn new(area_code: &str) -> Builder {
        Builder {
            _area_code: area_code.to_string(),
            _constituency: Vec::new(),
            _party_list: Vec::new(),
        }
    }

    /// Appends one constituency candidate. Entries are kept in insertion
    /// order; the first one is the winner.
    pub fn constituency_entry(mut self, candidate_code: &str, party_code: &str) -> Builder {
        self._constituency.push(CandidateEntry {
            candidate_code: candidate_code.to_string(),
            party_code: party_code.to_string(),
        });
        self
    }

    /// Appends one party-list entry. Entries are expected in rank order.
    pub fn list_entry(mut self, party_code: &str, rank: u32) -> Builder {
        self._party_list.push(ListEntry {
            party_code: party_code.to_string(),
            rank,
        });
        self
    }

    pub fn build(self) -> AreaBallots {
        AreaBallots {
            area_code: self._area_code,
            constituency: self._constituency,
            party_list: self._party_list,
        }
    }
}
