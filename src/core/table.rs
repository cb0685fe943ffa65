/// Result table: ordered inspection records and their delimited export

use std::io::Write;

use crate::core::parser::InspectionRecord;
use crate::error::ExportError;

/// Column labels of the exported table, in record value order
pub const COLUMN_HEADERS: [&str; 10] = [
    "File Name",
    "Verified",
    "Signing Date",
    "Publisher",
    "Company",
    "Description",
    "Product",
    "Prod Version",
    "File Version",
    "MachineType",
];

/// Records of one batch run, in processing order
#[derive(Debug, Default, Clone)]
pub struct ResultTable {
    records: Vec<InspectionRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record; called at the start of a run
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn append(&mut self, record: InspectionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[InspectionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &InspectionRecord> {
        self.records.iter()
    }

    /// Stream the header and every record to `writer` as delimited text.
    ///
    /// Fields holding the delimiter, a double quote or a line break are quoted
    /// with inner quotes doubled. The header must have one label per column.
    pub fn write_delimited<W: Write>(
        &self,
        writer: W,
        headers: &[&str],
        delimiter: u8,
    ) -> Result<(), ExportError> {
        if headers.len() != COLUMN_HEADERS.len() {
            return Err(ExportError::ColumnMismatch {
                expected: COLUMN_HEADERS.len(),
                actual: headers.len(),
            });
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        csv_writer.write_record(headers)?;
        for record in &self.records {
            csv_writer.write_record(record.values())?;
        }
        csv_writer.flush()?;

        Ok(())
    }

    /// Render the table to a string. See [`ResultTable::write_delimited`].
    pub fn export_delimited(&self, headers: &[&str], delimiter: u8) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        self.write_delimited(&mut buffer, headers, delimiter)?;
        // csv only emits the UTF-8 it was given
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a InspectionRecord;
    type IntoIter = std::slice::Iter<'a, InspectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
