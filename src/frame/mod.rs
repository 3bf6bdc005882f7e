mod read;

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

use crate::error::Error;

/// Axis along which per-vector tests and statistics are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Treat each column as one sample vector (the default).
    #[default]
    Col,
    /// Treat each row as one sample vector.
    Row,
}

impl Axis {
    /// Short name used in table headers ("col" or "row").
    pub fn name(self) -> &'static str {
        match self {
            Axis::Col => "col",
            Axis::Row => "row",
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "col" => Ok(Axis::Col),
            "row" => Ok(Axis::Row),
            other => Err(Error::InvalidArgument(format!(
                "expected axis 'col' or 'row', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable rectangular grid of finite `f64` values, stored row-major.
///
/// The frame is read-only for the whole battery: every runner takes `&self`
/// and re-iterating the same frame always yields the same vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl DataFrame {
    /// Builds a frame from row vectors.
    ///
    /// Fails with [`Error::NonNumericData`] when any cell is NaN or infinite,
    /// and with [`Error::InvalidArgument`] when the grid is empty or ragged.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let nrows = rows.len();
        if nrows == 0 {
            return Err(Error::InvalidArgument(
                "frame must have at least one row".to_string(),
            ));
        }
        let ncols = rows[0].len();
        if ncols == 0 {
            return Err(Error::InvalidArgument(
                "frame must have at least one column".to_string(),
            ));
        }

        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::InvalidArgument(format!(
                    "row {i} has {} cells, expected {ncols}",
                    row.len()
                )));
            }
            for (j, cell) in row.into_iter().enumerate() {
                if !cell.is_finite() {
                    return Err(Error::NonNumericData(format!(
                        "cell ({i}, {j}) is {cell}"
                    )));
                }
                data.push(cell);
            }
        }

        Ok(Self { data, nrows, ncols })
    }

    /// `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy of row `i`. Panics when out of bounds.
    pub fn row(&self, i: usize) -> Vec<f64> {
        assert!(i < self.nrows, "row index {i} out of bounds");
        self.data[i * self.ncols..(i + 1) * self.ncols].to_vec()
    }

    /// Copy of column `j`. Panics when out of bounds.
    pub fn column(&self, j: usize) -> Vec<f64> {
        assert!(j < self.ncols, "column index {j} out of bounds");
        (0..self.nrows)
            .map(|i| self.data[i * self.ncols + j])
            .collect()
    }

    /// Lazy iterator over the sample vectors of the chosen axis, in
    /// ascending order. Indices are 1-based, matching the reported tables.
    pub fn vectors(&self, axis: Axis) -> Vectors<'_> {
        Vectors {
            frame: self,
            axis,
            next: 0,
        }
    }

    /// Number of sample vectors along `axis`.
    pub fn vector_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Col => self.ncols,
            Axis::Row => self.nrows,
        }
    }

    /// The frame as an `nrows x ncols` matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_iterator(self.nrows, self.ncols, self.data.iter().copied())
    }
}

/// Iterator produced by [`DataFrame::vectors`].
#[derive(Debug, Clone)]
pub struct Vectors<'a> {
    frame: &'a DataFrame,
    axis: Axis,
    next: usize,
}

impl Iterator for Vectors<'_> {
    /// `(1-based index, vector)`.
    type Item = (usize, Vec<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.frame.vector_count(self.axis) {
            return None;
        }
        let i = self.next;
        self.next += 1;
        let vector = match self.axis {
            Axis::Col => self.frame.column(i),
            Axis::Row => self.frame.row(i),
        };
        Some((i + 1, vector))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.frame.vector_count(self.axis) - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Vectors<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_3x2() -> DataFrame {
        DataFrame::from_rows(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
        ])
        .unwrap()
    }

    #[test]
    fn shape_and_accessors() {
        let df = frame_3x2();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.row(1), vec![3.0, 4.0]);
        assert_eq!(df.column(0), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn vectors_yield_ascending_one_based_indices() {
        let df = frame_3x2();

        let cols: Vec<_> = df.vectors(Axis::Col).collect();
        assert_eq!(cols.len(), df.ncols());
        assert_eq!(cols[0], (1, vec![1.0, 3.0, 5.0]));
        assert_eq!(cols[1], (2, vec![2.0, 4.0, 6.0]));

        let rows: Vec<_> = df.vectors(Axis::Row).collect();
        assert_eq!(rows.len(), df.nrows());
        let indices: Vec<usize> = rows.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn vectors_is_restartable() {
        let df = frame_3x2();
        let first: Vec<_> = df.vectors(Axis::Row).collect();
        let second: Vec<_> = df.vectors(Axis::Row).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_finite_cells() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = DataFrame::from_rows(vec![vec![1.0, bad]]).unwrap_err();
            assert!(matches!(err, Error::NonNumericData(_)));
        }
    }

    #[test]
    fn rejects_empty_and_ragged_grids() {
        assert!(matches!(
            DataFrame::from_rows(vec![]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            DataFrame::from_rows(vec![vec![]]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            DataFrame::from_rows(vec![vec![1.0], vec![1.0, 2.0]]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn axis_parsing() {
        assert_eq!("col".parse::<Axis>().unwrap(), Axis::Col);
        assert_eq!("row".parse::<Axis>().unwrap(), Axis::Row);
        assert!(matches!(
            "diag".parse::<Axis>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn matrix_round_trip() {
        let df = frame_3x2();
        let m = df.to_matrix();
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 2);
        assert_eq!(m[(2, 1)], 6.0);
    }
}
