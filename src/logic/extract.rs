use log::{debug, info};

use crate::logic::{Expressions, Term};
use crate::table::{Row, TruthTable};

/// Which table rows contribute terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSelection {
    /// Every enumerated row
    #[default]
    All,
    /// Only the row recorded for each distinct result, the last one enumerated
    Distinct,
}

/// Derive one expression per output bit from the truth table
///
/// For each selected row and each bit set in its result, the term of the row's operands is
/// added to the expression of that bit. A term already present is not added again. Terms are
/// kept in the order they are first seen.
pub fn extract_minterms(table: &TruthTable, selection: RowSelection) -> Expressions {
    let mut ret = Expressions::new(table.width());
    let rows: Box<dyn Iterator<Item = &Row> + '_> = match selection {
        RowSelection::All => Box::new(table.rows().iter()),
        RowSelection::Distinct => Box::new(table.entries()),
    };
    let mut nb_duplicates = 0;
    for row in rows {
        let term = Term::from_pair(&row.pair);
        for p in row.result.ones() {
            if !ret.output_mut(p).add(term) {
                debug!("c{}: duplicate term {} from {}", p, term, row.pair);
                nb_duplicates += 1;
            }
        }
    }
    info!(
        "Extracted {} terms over {} outputs ({} duplicates merged)",
        ret.nb_terms(),
        ret.nb_outputs(),
        nb_duplicates
    );
    ret
}
