use crate::types::model::CompetitionType;

/// How a ranked entry turns into leaderboard points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PointsPolicy {
    /// Points equal the participant's total score.
    #[default]
    RawTotal,
    /// Points come from a per-rank table; ranks past the table earn nothing.
    FixedTable { single: Vec<u64>, group: Vec<u64> },
}

impl PointsPolicy {
    pub fn points(&self, rank: u32, total_score: u64, competition_type: CompetitionType) -> u64 {
        match self {
            Self::RawTotal => total_score,
            Self::FixedTable { single, group } => {
                let table = match competition_type {
                    CompetitionType::Single => single,
                    CompetitionType::Group => group,
                };
                rank.checked_sub(1)
                    .and_then(|index| table.get(index as usize))
                    .copied()
                    .unwrap_or(0)
            }
        }
    }
}
