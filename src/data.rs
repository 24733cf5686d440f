use std::num::ParseFloatError;
use std::path::Path;
use std::sync::Arc;

use crate::buffer::{Matrix, ShapeError};

quick_error! {
    #[derive(Debug)]
    pub enum DataError {
        Unavailable(path: String, err: csv::Error) {
            description("Data file unavailable")
            display("Data file {} unavailable: {}", path, err)
            cause(err)
        }
        Parse(path: String, value: String, err: ParseFloatError) {
            description("Non-numeric value in data file")
            display("Invalid value {:?} in {}: {}", value, path, err)
            cause(err)
        }
        Empty(path: String) {
            description("Data file contains no values")
            display("Data file {} contains no values", path)
        }
        Shape(err: ShapeError) {
            from()
            description("Data does not match the expected shape")
            display("Data does not match the expected shape: {}", err)
            cause(err)
        }
    }
}

/// Reads every comma separated value of a headerless CSV file in row-major order.
pub fn read_csv_values(path: impl AsRef<Path>) -> Result<Vec<f32>, DataError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| DataError::Unavailable(path_str.clone(), err))?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| DataError::Unavailable(path_str.clone(), err))?;
        for datum in record.iter().filter(|datum| !datum.is_empty()) {
            let value = datum.parse::<f32>()
                .map_err(|err| DataError::Parse(path_str.clone(), datum.to_owned(), err))?;
            values.push(value);
        }
    }

    if values.is_empty() {
        return Err(DataError::Empty(path_str));
    }
    log::debug!("read {} values from {}", values.len(), path_str);
    Ok(values)
}

pub fn read_csv_matrix(path: impl AsRef<Path>, rows: usize, cols: usize) -> Result<Matrix, DataError> {
    let values = read_csv_values(path)?;
    Ok(Matrix::from_vec(rows, cols, values)?)
}

/// Immutable set of input patches, one patch per row. Partitions share the same backing buffer.
#[derive(Clone, Debug)]
pub struct PatchSet {
    data: Arc<Box<[f32]>>,
    offset: usize,
    end: usize,
    num_cols: usize,
    num_rows: usize,
}

impl PatchSet {

    pub fn from_csv(path: impl AsRef<Path>, num_rows: usize, num_cols: usize) -> Result<PatchSet, DataError> {
        let values = read_csv_values(path)?;
        Self::from_vec(values, num_rows, num_cols)
    }

    pub fn from_vec(data: Vec<f32>, num_rows: usize, num_cols: usize) -> Result<PatchSet, DataError> {
        if num_rows == 0 || num_cols == 0 {
            return Err(ShapeError::ZeroDimension(num_rows, num_cols).into());
        }
        if data.len() != num_rows * num_cols {
            return Err(ShapeError::LengthMismatch(num_rows, num_cols, data.len()).into());
        }
        Ok(PatchSet {
            data: Arc::new(data.into_boxed_slice()),
            offset: 0,
            end: num_rows * num_cols,
            num_cols,
            num_rows,
        })
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    pub fn get_row(&self, row: usize) -> &[f32] {
        assert!(row < self.num_rows);
        let offset = self.offset + row * self.num_cols;
        &self.data[offset..offset + self.num_cols]
    }

    fn make_partition(&self, row_offset: usize, num_rows: usize) -> PatchSet {
        let offset = self.offset + row_offset * self.num_cols;
        let end = offset + num_rows * self.num_cols;
        assert!(offset <= end && end <= self.end);
        PatchSet {
            data: Arc::clone(&self.data),
            offset,
            end,
            num_cols: self.num_cols,
            num_rows,
        }
    }

    /// Splits into `n` contiguous partitions covering every row exactly once. The last
    /// partition returned starts at row 0 and absorbs the remainder.
    pub fn partition(&self, n: usize) -> Vec<PatchSet> {
        assert!(n > 0 && n <= self.num_rows);
        let target_rows = self.num_rows / n;
        let mut vec = Vec::with_capacity(n);
        let mut end_row = self.num_rows;
        for _ in 0..n-1 {
            let row_offset = end_row - target_rows;
            vec.push(self.make_partition(
                row_offset,
                target_rows
            ));
            end_row = row_offset;
        }
        vec.push(self.make_partition(0, end_row));
        vec
    }

    pub fn iter(&self) -> PatchSetIterator<'_> {
        PatchSetIterator {
            data: self.data.as_ref(),
            offset: self.offset,
            end: self.end,
            num_cols: self.num_cols,
        }
    }

}

pub struct PatchSetIterator<'a> {
    data: &'a [f32],
    offset: usize,
    end: usize,
    num_cols: usize,
}

impl<'a> Iterator for PatchSetIterator<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset != self.end {
            let offset = self.offset;
            self.offset += self.num_cols;
            Some(&self.data[offset..self.offset])
        } else {
            None
        }
    }

}

impl<'a> IntoIterator for &'a PatchSet {
    type Item = &'a [f32];
    type IntoIter = PatchSetIterator<'a>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
