use super::types::{ProjectionError, RankedEntry, RankingRequest, RankingResponse};
use crate::engine::types::{ResultSet, Row};

const NAME_COLUMN: usize = 0;
const SCORE_COLUMN: usize = 1;

/// Turns the engine's result set into the success envelope.
///
/// The first row is the header and is skipped. Row order is trusted as-is:
/// the query already sorts by total score, so ranks are just positions.
pub fn project(
    result: ResultSet,
    request: &RankingRequest,
) -> Result<RankingResponse, ProjectionError> {
    let ranking = result
        .rows
        .into_iter()
        .skip(1)
        .enumerate()
        .map(|(index, row)| to_entry(index + 1, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RankingResponse::Success {
        start_date: request.start_date.clone(),
        end_date: request.end_date.clone(),
        exam: request.exam.clone(),
        ranking,
    })
}

fn to_entry(rank: usize, mut row: Row) -> Result<RankedEntry, ProjectionError> {
    let mut take = |column: usize| {
        row.cells
            .get_mut(column)
            .and_then(Option::take)
            .ok_or(ProjectionError::MissingCell { row: rank, column })
    };

    Ok(RankedEntry {
        rank,
        name: take(NAME_COLUMN)?,
        score: take(SCORE_COLUMN)?,
    })
}
