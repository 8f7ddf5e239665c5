//! Expected column layouts, checked once right after a frame is loaded.

use crate::error::{Error, Result};
use crate::frame::{get_column, is_numeric};
use polars::prelude::{DataFrame, DataType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    fn matches(self, dtype: &DataType) -> bool {
        match self {
            ColumnKind::Numeric => is_numeric(dtype),
            ColumnKind::Categorical => dtype == &DataType::String,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical (text)",
        }
    }
}

/// What to require of columns the schema does not name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Remainder {
    #[default]
    Any,
    Numeric,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
    remainder: Remainder,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnSpec {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn remainder(mut self, remainder: Remainder) -> Self {
        self.remainder = remainder;
        self
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Fails on the first named column that is absent or of the wrong kind,
    /// then on the first unnamed column violating the remainder policy.
    pub fn validate(&self, df: &DataFrame) -> Result<()> {
        for spec in &self.columns {
            let column = get_column(df, &spec.name)?;
            if !spec.kind.matches(column.dtype()) {
                return Err(Error::ColumnType {
                    column: spec.name.clone(),
                    expected: spec.kind.describe(),
                });
            }
        }

        if self.remainder == Remainder::Numeric {
            for column in df.get_columns() {
                let name = column.name().as_str();
                let named = self.columns.iter().any(|spec| spec.name == name);
                if !named && !is_numeric(column.dtype()) {
                    return Err(Error::ColumnType {
                        column: name.to_string(),
                        expected: ColumnKind::Numeric.describe(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::frame::read_csv_str;

    fn cars() -> DataFrame {
        read_csv_str("year,condition,price,region\n2012,good,7000,north\n").unwrap()
    }

    #[test]
    fn test_validate_ok() {
        let schema = Schema::new()
            .column("year", ColumnKind::Numeric)
            .column("condition", ColumnKind::Categorical)
            .column("price", ColumnKind::Numeric);

        assert!(schema.validate(&cars()).is_ok());
    }

    #[test]
    fn test_validate_missing_column() {
        let schema = Schema::new().column("odometer", ColumnKind::Numeric);

        match schema.validate(&cars()) {
            Err(Error::MissingColumn(name)) => assert_eq!(name, "odometer"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_wrong_kind() {
        let schema = Schema::new().column("condition", ColumnKind::Numeric);
        assert!(matches!(
            schema.validate(&cars()),
            Err(Error::ColumnType { .. })
        ));
    }

    #[test]
    fn test_validate_numeric_remainder() {
        let schema = Schema::new()
            .column("price", ColumnKind::Numeric)
            .remainder(Remainder::Numeric);

        match schema.validate(&cars()) {
            Err(Error::ColumnType { column, .. }) => assert_eq!(column, "condition"),
            other => panic!("expected ColumnType, got {:?}", other),
        }
    }
}
