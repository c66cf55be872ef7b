use crate::transpiler::traits::SqlGenerator;

/// Reference dialect: backtick identifiers, `?` placeholders, `LIMIT ?, ?`.
pub struct H2Generator;

impl SqlGenerator for H2Generator {
    fn name(&self) -> &'static str {
        "H2"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn limit_offset(&self, offset: &str, limit: &str) -> String {
        format!("LIMIT {}, {}", offset, limit)
    }

    fn offset_first(&self) -> bool {
        true
    }
}
