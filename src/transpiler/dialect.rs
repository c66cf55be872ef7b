use std::fmt;
use std::str::FromStr;

use crate::error::SqlentError;
use crate::transpiler::sql::h2::H2Generator;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    #[default]
    H2,
    MySQL,
    Postgres,
    SQLite,
}

impl Dialect {
    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::H2 => Box::new(H2Generator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
        }
    }
}

impl FromStr for Dialect {
    type Err = SqlentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "h2" => Ok(Dialect::H2),
            "mysql" => Ok(Dialect::MySQL),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::SQLite),
            other => Err(SqlentError::Config(format!(
                "unknown dialect '{}', expected h2, mysql, postgres or sqlite",
                other
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generator().name())
    }
}
