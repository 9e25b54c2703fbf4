use std::io::{Read, Write};
use serde_json::Value;
use crate::types::Row;

///
/// A CSV table held in memory. Empty cells are read as null
///
#[derive(Debug, PartialEq, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>
}

impl Table {
    pub fn from_path(path: &str) -> Result<Self, String> {
        match std::fs::File::open(path) {
            Ok(file) => Table::from_reader(file),
            Err(err) => Err(format!("Unable to open table {}: {}", path, err))
        }
    }

    pub fn from_reader(input: impl Read) -> Result<Self, String> {
        let mut reader = csv::Reader::from_reader(input);

        let headers: Vec<String> = match reader.headers() {
            Ok(headers) => headers.iter().map(String::from).collect(),
            Err(err) => { return Err(format!("Invalid CSV header: {}", err)); }
        };

        let mut rows: Vec<Row> = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) => { return Err(format!("Invalid CSV row {}: {}", i + 1, err)); }
            };

            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };

                row.insert(header.clone(), value);
            }

            rows.push(row);
        }

        Ok(Table {
            headers,
            rows
        })
    }
}

///
/// Write rows as CSV with the given header order
///
pub fn write<'a>(output: impl Write, headers: &[String], rows: impl Iterator<Item = &'a Row>) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    if let Err(err) = writer.write_record(headers) {
        return Err(format!("Failed to write CSV header: {}", err));
    }

    for row in rows {
        let record: Vec<String> = headers.iter().map(|header| match row.get(header) {
            None | Some(Value::Null) => String::from(""),
            Some(Value::String(cell)) => cell.clone(),
            Some(value) => value.to_string()
        }).collect();

        if let Err(err) = writer.write_record(&record) {
            return Err(format!("Failed to write CSV row: {}", err));
        }
    }

    writer.flush().map_err(|err| format!("Failed to flush CSV: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_reader() {
        let table = Table::from_reader("street,year,notes\nrue du bac,1880,\nrue de la paix,1881,corner\n".as_bytes()).unwrap();

        assert_eq!(table.headers, vec![String::from("street"), String::from("year"), String::from("notes")]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("street"), Some(&json!("rue du bac")));
        assert_eq!(table.rows[0].get("notes"), Some(&Value::Null));
        assert_eq!(table.rows[1].get("notes"), Some(&json!("corner")));
    }

    #[test]
    fn test_from_reader_ragged() {
        assert!(Table::from_reader("street,year\nrue du bac\n".as_bytes()).is_err());
    }

    #[test]
    fn test_write() {
        let table = Table::from_reader("street,year\nrue du bac,1880\n\"quai d'orsay, nord\",\n".as_bytes()).unwrap();

        let mut headers = table.headers.clone();
        headers.push(String::from("align_method"));

        let mut rows = table.rows.clone();
        rows[0].insert(String::from("align_method"), json!("exact"));
        rows[1].insert(String::from("align_method"), json!(3));

        let mut output: Vec<u8> = Vec::new();
        write(&mut output, &headers, rows.iter()).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), String::from("street,year,align_method\nrue du bac,1880,exact\n\"quai d'orsay, nord\",,3\n"));
    }
}
