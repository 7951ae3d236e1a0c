//! Removal of LEFT JOINs that nothing in the statement refers to.

use std::collections::HashSet;

use super::Select;
use super::parts::{ColumnExpr, JoinType};

/// What keeps a LEFT-joined table alive.
#[derive(Debug)]
struct LeftJoinUsage {
    correlation: String,
    /// Selected from, or mentioned in a raw column or WHERE predicate.
    directly_used: bool,
    /// Tables whose join condition mentions this one.
    dependents: Vec<String>,
}

impl Select {
    /// Drop LEFT-joined tables that contribute nothing to the result.
    ///
    /// A LEFT JOIN survives when a selected column belongs to it, when a raw column or a
    /// WHERE predicate mentions it (by correlation or physical name), or when another
    /// surviving table's join condition mentions it. Removal repeats until stable, so a
    /// chain of joins that only feed each other disappears as a whole.
    ///
    /// The analysis is textual and conservative: ORDER BY, GROUP BY and HAVING are not
    /// inspected, and a name that merely looks like a reference keeps the join.
    pub fn reset_join_left(&mut self) -> &mut Self {
        let usage = self.left_join_usage();
        let mut removed: HashSet<&str> = HashSet::new();

        loop {
            let mut changed = false;
            for entry in &usage {
                if entry.directly_used || removed.contains(entry.correlation.as_str()) {
                    continue;
                }
                let needed = entry
                    .dependents
                    .iter()
                    .any(|dep| !removed.contains(dep.as_str()));
                if !needed {
                    tracing::debug!(
                        target: "sqlsel.select",
                        correlation = %entry.correlation,
                        "pruned unused LEFT JOIN"
                    );
                    removed.insert(entry.correlation.as_str());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        if !removed.is_empty() {
            self.tables
                .retain(|t| !removed.contains(t.correlation.as_str()));
        }
        self
    }

    fn left_join_usage(&self) -> Vec<LeftJoinUsage> {
        let quote = self.dialect.quote_symbol();
        self.tables
            .iter()
            .filter(|t| t.join_type == JoinType::Left)
            .map(|table| {
                let names: Vec<&str> = std::iter::once(table.correlation.as_str())
                    .chain(table.table_name())
                    .collect();
                let mentioned = |text: &str| names.iter().any(|n| references_table(n, text, quote));

                let directly_used = self.columns.iter().any(|c| {
                    c.correlation.as_deref() == Some(table.correlation.as_str())
                        || matches!(&c.expr, ColumnExpr::Raw(e) if mentioned(e.as_str()))
                }) || self.wheres.iter().any(|p| mentioned(&p.text));

                let dependents = self
                    .tables
                    .iter()
                    .filter(|other| other.correlation != table.correlation)
                    .filter(|other| other.condition.as_deref().is_some_and(|c| mentioned(c)))
                    .map(|other| other.correlation.clone())
                    .collect();

                LeftJoinUsage {
                    correlation: table.correlation.clone(),
                    directly_used,
                    dependents,
                }
            })
            .collect()
    }
}

/// Whether `text` refers to `name` as a qualifier (`name.` or `<q>name<q>.`).
///
/// An unquoted match must start the text or follow a character that cannot be part of
/// an identifier, so `orders` is not found in `old_orders.id`.
pub(crate) fn references_table(name: &str, text: &str, quote: char) -> bool {
    if name.is_empty() {
        return false;
    }
    if text.contains(&format!("{quote}{name}{quote}.")) {
        return true;
    }
    let needle = format!("{name}.");
    text.match_indices(&needle).any(|(pos, _)| {
        text[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}
