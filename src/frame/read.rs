use std::path::Path;

use csv::ReaderBuilder;
use serde::de::DeserializeOwned;

use super::DataFrame;
use crate::error::Error;

impl DataFrame {
    /// Reads a frame from a headered CSV file of numeric columns.
    ///
    /// Cells that do not parse as numbers surface as
    /// [`Error::NonNumericData`]; everything else goes through the usual
    /// [`DataFrame::from_rows`] validation.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;

        let mut rows = Vec::new();
        for record in rdr.deserialize() {
            let row: Vec<f64> = decode_row(record)?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(Error::InvalidArgument(
                "CSV file contains no data records".to_string(),
            ));
        }
        Self::from_rows(rows)
    }
}

fn decode_row<T: DeserializeOwned>(record: Result<T, csv::Error>) -> Result<T, Error> {
    record.map_err(|e| {
        if matches!(e.kind(), csv::ErrorKind::Deserialize { .. }) {
            Error::NonNumericData(e.to_string())
        } else {
            Error::Csv(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_numeric_csv() {
        let file = write_csv("a,b\n1.0,2.0\n3.5,-4.25\n");
        let df = DataFrame::read_csv(file.path()).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.row(1), vec![3.5, -4.25]);
    }

    #[test]
    fn rejects_non_numeric_cells() {
        let file = write_csv("a,b\n1.0,test\n");
        let err = DataFrame::read_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::NonNumericData(_)));
    }

    #[test]
    fn rejects_header_only_file() {
        let file = write_csv("a,b\n");
        let err = DataFrame::read_csv(file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
