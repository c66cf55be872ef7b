use crate::error::SqlentResult;
use crate::metadata::JoinKind;
use crate::transpiler::traits::{SqlGenerator, unsupported};

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn join_keyword(&self, kind: JoinKind) -> SqlentResult<&'static str> {
        match kind {
            JoinKind::Inner => Ok("INNER JOIN"),
            JoinKind::LeftOuter => Ok("LEFT JOIN"),
            JoinKind::RightOuter => Ok("RIGHT JOIN"),
            JoinKind::FullOuter => Err(unsupported(self, "FULL JOIN")),
        }
    }

    fn limit_offset(&self, offset: &str, limit: &str) -> String {
        format!("LIMIT {}, {}", offset, limit)
    }

    fn offset_first(&self) -> bool {
        true
    }
}
