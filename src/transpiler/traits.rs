//! Transpiler traits and utilities.

use crate::error::{SqlentError, SqlentResult};
use crate::metadata::JoinKind;

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator {
    /// Dialect name for diagnostics.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column or result name).
    fn quote_identifier(&self, name: &str) -> String;

    /// Parameter placeholder for a 1-based index (e.g. `?` or `$3`).
    fn placeholder(&self, index: usize) -> String;

    /// Column reference qualified by a table alias: ``t.`age` ``.
    fn column(&self, table_alias: &str, column: &str) -> String {
        format!("{}.{}", table_alias, self.quote_identifier(column))
    }

    /// Table name qualified by catalog and schema, each part quoted.
    fn table(&self, path: &[&str]) -> String {
        path.iter()
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Table followed by its alias in FROM, UPDATE and DELETE clauses.
    fn aliased_table(&self, table: &str, alias: &str) -> String {
        format!("{} {}", table, alias)
    }

    /// Left-hand side of a SET assignment.
    fn assignment_target(&self, table_alias: &str, column: &str) -> String {
        self.column(table_alias, column)
    }

    fn join_keyword(&self, kind: JoinKind) -> SqlentResult<&'static str> {
        Ok(match kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::LeftOuter => "LEFT JOIN",
            JoinKind::RightOuter => "RIGHT JOIN",
            JoinKind::FullOuter => "FULL JOIN",
        })
    }

    /// Boolean constant as a predicate.
    fn constant(&self, value: bool) -> &'static str {
        if value { "(1=1)" } else { "(1=0)" }
    }

    /// `LIMIT` clause for a row window, given the placeholders already bound
    /// to offset and limit in [`SqlGenerator::offset_first`] order.
    fn limit_offset(&self, offset: &str, limit: &str) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }

    /// True when the dialect binds the offset before the limit.
    fn offset_first(&self) -> bool {
        false
    }

    fn for_update(&self) -> SqlentResult<&'static str> {
        Ok("FOR UPDATE")
    }
}

/// Error for a construct a dialect cannot render.
pub(crate) fn unsupported(generator: &dyn SqlGenerator, what: &str) -> SqlentError {
    SqlentError::unsupported(format!("{} is not supported by the {} dialect", what, generator.name()))
}
