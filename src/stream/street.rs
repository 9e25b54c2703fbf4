use std::fs::File;
use std::io::{BufWriter, Write};
use std::iter::Iterator;
use crate::stream::geo::GeoStream;
use crate::types::{Keys, Street};

///
/// Streams valid street segments, skipping invalid features and optionally
/// logging them to an error file
///
pub struct StreetStream {
    input: GeoStream,
    keys: Keys,
    errors: Option<BufWriter<File>>,
    pub skipped: usize
}

impl StreetStream {
    pub fn new(input: GeoStream, keys: Keys, errors: Option<String>) -> Result<Self, String> {
        Ok(StreetStream {
            input,
            keys,
            errors: match errors {
                None => None,
                Some(path) => match File::create(&path) {
                    Ok(file) => Some(BufWriter::new(file)),
                    Err(err) => { return Err(format!("Unable to create error log {}: {}", path, err)); }
                }
            },
            skipped: 0
        })
    }

    fn error(&mut self, err: String) {
        self.skipped += 1;

        if let Some(ref mut file) = self.errors {
            if let Err(log_err) = file.write_all(format!("{}\n", err).as_bytes()) {
                eprintln!("warn - failed to write error log: {}", log_err);
            }
        }
    }
}

impl Iterator for StreetStream {
    type Item = Street;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let feat = match self.input.next()? {
                Ok(feat) => feat,
                Err(err) => {
                    self.error(err);
                    continue;
                }
            };

            match Street::new(feat, &self.keys) {
                Ok(street) => { return Some(street); },
                Err(err) => self.error(err)
            };
        }
    }
}
