//! Folding of one-to-many joined rows into parents with child collections.
//!
//! A `LEFT JOIN` between a parent table and its children yields one row per
//! parent × child pair, or a single row with all-null child columns for a
//! parent without children. [`aggregate`] walks those rows in query order and
//! rebuilds the object graph. The query must order by the parent key (at
//! least as a final tiebreak) so each parent's rows are contiguous.

use folio_core::types::DbId;

/// A decoded row of a one-to-many join.
pub trait JoinedRow {
    type Parent;
    type Child;

    /// Identity of the parent this row belongs to.
    fn parent_id(&self) -> DbId;

    /// Split the row into its parent columns and, when the child columns are
    /// not all null, its child.
    fn into_parts(self) -> (Self::Parent, Option<Self::Child>);

    /// Append a child to a parent's collection.
    fn attach(parent: &mut Self::Parent, child: Self::Child);
}

/// Fold joined rows into parents, preserving row order.
///
/// An empty row set yields an empty vector.
pub fn aggregate<R, I>(rows: I) -> Vec<R::Parent>
where
    R: JoinedRow,
    I: IntoIterator<Item = R>,
{
    let mut parents = Vec::new();
    let mut current: Option<(DbId, R::Parent)> = None;

    for row in rows {
        let id = row.parent_id();
        let (parent, child) = row.into_parts();

        let is_new_parent = !matches!(&current, Some((current_id, _)) if *current_id == id);
        if is_new_parent {
            if let Some((_, finished)) = current.replace((id, parent)) {
                parents.push(finished);
            }
        }

        if let (Some(child), Some((_, accumulator))) = (child, current.as_mut()) {
            R::attach(accumulator, child);
        }
    }

    if let Some((_, last)) = current {
        parents.push(last);
    }

    parents
}
