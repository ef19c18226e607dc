use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::parsing::ParseError;

/// A tab-separated table with a header line, addressed by column name
#[derive(Debug, Clone)]
pub struct TsvTable {
    columns: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl TsvTable {
    /// Read a table from a file
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened, or
    /// `ParseError::Csv` if a row cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a table from any reader
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Csv` if the header or a row cannot be read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let columns = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, records })
    }

    /// Index of a required column
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingColumn` if the header lacks `name`.
    pub fn column(&self, name: &str) -> Result<usize, ParseError> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    }

    /// Index of an optional column
    #[must_use]
    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    #[must_use]
    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Field `idx` of a row; short rows read as empty
#[must_use]
pub fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Field `idx` of a row, `None` when empty
#[must_use]
pub fn non_empty_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_by_name() {
        let tsv = "readId\tdescrR1\n1\tGClone|ACGT|\n2\t\n";
        let table = TsvTable::from_reader(tsv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let id = table.column("readId").unwrap();
        let descr = table.column("descrR1").unwrap();
        assert_eq!(field(&table.records()[0], id), "1");
        assert_eq!(field(&table.records()[0], descr), "GClone|ACGT|");
        assert_eq!(non_empty_field(&table.records()[1], descr), None);
    }

    #[test]
    fn test_missing_column() {
        let table = TsvTable::from_reader("a\tb\n1\t2\n".as_bytes()).unwrap();
        assert!(matches!(
            table.column("nSeqCDR3"),
            Err(ParseError::MissingColumn(_))
        ));
        assert!(table.optional_column("nSeqCDR3").is_none());
    }

    #[test]
    fn test_quotes_are_literal() {
        let tsv = "targetDescriptions\n\"VJOverlap(3)\"\n";
        let table = TsvTable::from_reader(tsv.as_bytes()).unwrap();
        assert_eq!(field(&table.records()[0], 0), "\"VJOverlap(3)\"");
    }
}
