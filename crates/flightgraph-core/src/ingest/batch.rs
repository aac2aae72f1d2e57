//! Fixed-size batching of parsed records

use crate::errors::Result;

/// Records grouped for a single store transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    /// 1-based position within the file
    pub number: usize,
    /// Expected number of batches for the file
    pub total: usize,
    pub records: Vec<T>,
}

/// `ceil(rows / batch_size)`; a file with no data rows has no batches
pub fn total_batches(rows: u64, batch_size: usize) -> usize {
    let size = batch_size.max(1) as u64;
    rows.div_ceil(size) as usize
}

/// Groups a fallible record stream into batches of `batch_size`
///
/// The last batch holds the remainder. The first parse error is yielded in
/// place of the batch it would have belonged to, after which the builder
/// yields nothing more.
pub struct BatchBuilder<I> {
    rows: I,
    batch_size: usize,
    total: usize,
    emitted: usize,
    done: bool,
}

impl<I, T> BatchBuilder<I>
where
    I: Iterator<Item = Result<T>>,
{
    /// `batch_size` is clamped to at least one record
    pub fn new(rows: I, batch_size: usize, total: usize) -> Self {
        Self {
            rows,
            batch_size: batch_size.max(1),
            total,
            emitted: 0,
            done: false,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<I, T> Iterator for BatchBuilder<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<Batch<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut records = Vec::with_capacity(self.batch_size);
        while records.len() < self.batch_size {
            match self.rows.next() {
                Some(Ok(record)) => records.push(record),
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if records.is_empty() {
            return None;
        }
        self.emitted += 1;
        Some(Ok(Batch {
            number: self.emitted,
            // A source that grew after counting still reports sane totals
            total: self.total.max(self.emitted),
            records,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FlightGraphError;
    use proptest::prelude::*;

    fn ok_rows(n: usize) -> impl Iterator<Item = Result<usize>> {
        (0..n).map(Ok)
    }

    #[test]
    fn test_five_rows_in_batches_of_two() {
        let batches: Vec<Batch<usize>> = BatchBuilder::new(ok_rows(5), 2, total_batches(5, 2))
            .collect::<Result<_>>()
            .unwrap();

        let sizes: Vec<usize> = batches.iter().map(|b| b.records.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(batches.iter().all(|b| b.total == 3));
        assert_eq!(batches[2].number, 3);
        assert_eq!(batches[2].records, vec![4]);
    }

    #[test]
    fn test_empty_source_yields_no_batches() {
        let mut builder = BatchBuilder::new(ok_rows(0), 4000, total_batches(0, 4000));
        assert!(builder.next().is_none());
        assert_eq!(total_batches(0, 4000), 0);
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let builder = BatchBuilder::new(ok_rows(3), 0, total_batches(3, 0));
        assert_eq!(builder.batch_size(), 1);
        assert_eq!(builder.count(), 3);
    }

    #[test]
    fn test_error_stops_batching() {
        let rows = vec![
            Ok(1),
            Ok(2),
            Ok(3),
            Err(FlightGraphError::Io {
                op: "read_csv".into(),
                message: "truncated".into(),
            }),
            Ok(5),
        ];
        let mut builder = BatchBuilder::new(rows.into_iter(), 2, 3);

        assert_eq!(builder.next().unwrap().unwrap().records, vec![1, 2]);
        assert!(builder.next().unwrap().is_err());
        assert!(builder.next().is_none());
    }

    proptest! {
        #[test]
        fn batches_partition_the_input(rows in 0usize..200, size in 1usize..50) {
            let total = total_batches(rows as u64, size);
            let batches: Vec<Batch<usize>> = BatchBuilder::new(ok_rows(rows), size, total)
                .collect::<Result<_>>()
                .unwrap();

            prop_assert_eq!(batches.len(), total);
            let flattened: Vec<usize> = batches.iter().flat_map(|b| b.records.clone()).collect();
            prop_assert_eq!(flattened, (0..rows).collect::<Vec<_>>());
            for (i, batch) in batches.iter().enumerate() {
                prop_assert_eq!(batch.number, i + 1);
                prop_assert!(!batch.records.is_empty());
                prop_assert!(batch.records.len() <= size);
            }
        }
    }
}
