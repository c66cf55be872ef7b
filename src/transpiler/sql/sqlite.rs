use crate::error::SqlentResult;
use crate::transpiler::traits::{SqlGenerator, unsupported};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn aliased_table(&self, table: &str, alias: &str) -> String {
        format!("{} AS {}", table, alias)
    }

    fn assignment_target(&self, _table_alias: &str, column: &str) -> String {
        self.quote_identifier(column)
    }

    fn for_update(&self) -> SqlentResult<&'static str> {
        Err(unsupported(self, "FOR UPDATE"))
    }
}
