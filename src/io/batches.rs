use std::io::BufRead;

use super::Format;
use super::error::Error;
use crate::model::batch::Batch;

/// Streams [`Batch`] records from JSON Lines input.
///
/// Blank lines are skipped. Each item is one batch, so callers can fold
/// batches into an aggregator without holding the whole input in memory.
pub struct BatchReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> BatchReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Line number of the most recently returned record.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    fn next_batch(&mut self) -> Result<Option<Batch>, Error> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|e| Error::parse(Format::BatchStream, self.line, e.to_string()));
        }
    }
}

impl<R: BufRead> Iterator for BatchReader<R> {
    type Item = Result<Batch, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Element;
    use std::io::Cursor;

    const TWO_BATCHES: &str = r#"{"atoms": [{"z": 8, "pos": [0.0, 0.0, 0.0]}, {"z": 1, "pos": [0.96, 0.0, 0.0]}], "interactions": [{"source": 0, "target": 1, "weight": 0.5}], "bonds": [{"source": 0, "target": 1}]}

{"atoms": [{"element": 6, "position": [0.0, 0.0, 0.0]}]}
"#;

    #[test]
    fn reads_batches_and_skips_blank_lines() {
        let batches: Vec<Batch> = BatchReader::new(Cursor::new(TWO_BATCHES))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].atom_count(), 2);
        assert_eq!(batches[0].atoms[0].element, Element::O);
        assert_eq!(batches[0].interaction_count(), 1);
        assert_eq!(batches[0].bond_count(), 1);
        assert_eq!(batches[1].atoms[0].element, Element::C);
        assert!(batches[1].interactions.is_empty());
    }

    #[test]
    fn reports_line_of_malformed_record() {
        let input = "{\"atoms\": []}\n\n{\"atoms\": [\n";
        let mut reader = BatchReader::new(Cursor::new(input));
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                format: Format::BatchStream,
                line: 3,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_atomic_number() {
        let input = r#"{"atoms": [{"z": 17, "pos": [0.0, 0.0, 0.0]}]}"#;
        let err = BatchReader::new(Cursor::new(input)).next().unwrap().unwrap_err();
        let Error::Parse { details, .. } = err else {
            panic!("expected parse error");
        };
        assert!(details.contains("unsupported atomic number: 17"));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(BatchReader::new(Cursor::new("")).next().is_none());
    }
}
