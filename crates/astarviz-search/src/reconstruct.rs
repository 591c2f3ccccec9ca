//! Turning predecessor chains into routes.

use astarviz_core::Bounds;

use crate::error::SearchError;
use crate::event::Route;
use crate::table::{Direction, SearchTable};

/// Follow `dir` parents from `from` until a record with no parent.
///
/// Returns flat indices in walk order, `from` first. A walk longer than the
/// table is a cycle.
pub(crate) fn walk(
    table: &SearchTable,
    bounds: Bounds,
    from: usize,
    dir: Direction,
) -> Result<Vec<usize>, SearchError> {
    let mut chain = vec![from];
    let mut cur = from;
    while let Some(parent) = table.get(cur, dir).parent {
        if chain.len() > table.len() {
            let at = bounds.coord(parent);
            log::warn!("predecessor cycle at {at}");
            return Err(SearchError::Reconstruction { at });
        }
        chain.push(parent);
        cur = parent;
    }
    Ok(chain)
}

/// Route for a unidirectional run that reached `end`.
///
/// Returns the route (Start first) and the walk order, End first.
pub(crate) fn unidirectional(
    table: &SearchTable,
    bounds: Bounds,
    end: usize,
) -> Result<(Route, Vec<usize>), SearchError> {
    let chain = walk(table, bounds, end, Direction::Forward)?;
    let cells = chain.iter().rev().map(|&i| bounds.coord(i)).collect();
    Ok((
        Route {
            cells,
            meeting: None,
        },
        chain,
    ))
}

/// Route for a bidirectional run spliced at `meeting`.
///
/// Returns the route (Start first) and the walk order: meeting back to
/// Start, then onward to End.
pub(crate) fn bidirectional(
    table: &SearchTable,
    bounds: Bounds,
    meeting: usize,
) -> Result<(Route, Vec<usize>), SearchError> {
    let to_start = walk(table, bounds, meeting, Direction::Forward)?;
    let to_end = walk(table, bounds, meeting, Direction::Backward)?;

    let mut cells: Vec<_> = to_start.iter().rev().map(|&i| bounds.coord(i)).collect();
    cells.extend(to_end.iter().skip(1).map(|&i| bounds.coord(i)));

    let mut order = to_start;
    order.extend(to_end.into_iter().skip(1));
    Ok((
        Route {
            cells,
            meeting: Some(bounds.coord(meeting)),
        },
        order,
    ))
}
