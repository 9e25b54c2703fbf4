use std::collections::HashSet;
use std::fs::File;
use indicatif::ProgressBar;
use serde_json::Value;
use crate::join::align_on_column;
use crate::stream::Table;
use crate::stream::table;
use crate::text::{self, fuzzy};
use crate::types::{AlignMethod, DirectoryRecord, Row};

pub fn main(args: &clap_v3::ArgMatches) -> Result<(), String> {
    let directory_src = args.value_of("DIRECTORY").unwrap_or_default().to_string();
    let streets_src = args.value_of("STREETS").unwrap_or_default().to_string();

    let mut left = args.value_of("left").unwrap_or("street").to_string();
    let mut right = args.value_of("right").unwrap_or("street").to_string();

    let cutoff: u8 = crate::arg(args, "cutoff")?.unwrap_or(90);
    if cutoff > 100 {
        return Err(format!("Invalid --cutoff {}: must be 0-100", cutoff));
    }

    let threads = crate::threads(args)?;

    let mut directory = Table::from_path(&directory_src)?;
    let mut streets = Table::from_path(&streets_src)?;

    eprintln!("ok - imported {} directory records", directory.rows.len());
    eprintln!("ok - imported {} canonical streets", streets.rows.len());

    if args.is_present("normalize") {
        let dictionary = match args.value_of("dictionary") {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(input) => text::str_dictionary(&input)?,
                Err(err) => { return Err(format!("Unable to read dictionary {}: {}", path, err)); }
            },
            None => Vec::new()
        };

        left = prepare(&mut directory, &left, &dictionary);
        right = prepare(&mut streets, &right, &dictionary);

        eprintln!("ok - normalized {} and {}", left, right);
    }

    let right = disambiguate(&mut streets, &directory.headers, &left, &right);

    let records: Vec<DirectoryRecord> = directory.rows.iter().cloned().map(DirectoryRecord::new).collect();

    let exact = align_on_column(&records, &streets.rows, &[], &left, &right, AlignMethod::Exact)?;
    eprintln!("ok - joined on {} and {}, {}", left, right, exact.report);

    let queries: HashSet<&str> = exact.not_aligned.iter()
        .filter_map(|record| record.raw_name(&left))
        .filter(|name| !name.trim().is_empty())
        .collect();
    let pb = ProgressBar::new(queries.len() as u64);
    let second = fuzzy::align_fuzzy(&exact.not_aligned, &streets.rows, &exact.aligned, &left, &right, cutoff, threads, || {
        pb.inc(1);
    })?;
    pb.finish();
    eprintln!("ok - fuzzy matched {} against {}, {}", left, right, second.report);

    let mut aligned_headers = directory.headers.clone();
    for header in streets.headers.iter() {
        if !aligned_headers.contains(header) {
            aligned_headers.push(header.clone());
        }
    }
    aligned_headers.push(String::from("aligned_name"));
    aligned_headers.push(String::from("align_method"));

    let aligned_rows: Vec<Row> = second.aligned.iter().map(|record| {
        let mut row = record.props.clone();
        row.insert(String::from("aligned_name"), record.aligned_name().map(Value::from).unwrap_or(Value::Null));
        row.insert(String::from("align_method"), record.method().map(|m| Value::from(m.to_string())).unwrap_or(Value::Null));
        row
    }).collect();

    let aligned_out = args.value_of("aligned").unwrap_or("aligned.csv");
    table::write(create(aligned_out)?, &aligned_headers, aligned_rows.iter())?;

    let not_aligned_out = args.value_of("not_aligned").unwrap_or("not_aligned.csv");
    table::write(create(not_aligned_out)?, &directory.headers, second.not_aligned.iter().map(|record| &record.props))?;

    eprintln!("ok - wrote {} aligned records to {}", second.aligned.len(), aligned_out);
    eprintln!("ok - wrote {} unaligned records to {}", second.not_aligned.len(), not_aligned_out);

    Ok(())
}

///
/// Add a `{column}_prep` column holding the normalized value of `column`,
/// returning the new column name
///
pub fn prepare(table: &mut Table, column: &str, dictionary: &[(String, String)]) -> String {
    let prep = format!("{}_prep", column);

    for row in table.rows.iter_mut() {
        let value = match row.get(column) {
            Some(Value::String(raw)) => {
                let normalized = text::substitute(&text::normalize(raw), dictionary);

                if normalized.is_empty() {
                    Value::Null
                } else {
                    Value::String(normalized)
                }
            },
            _ => Value::Null
        };

        row.insert(prep.clone(), value);
    }

    if !table.headers.contains(&prep) {
        table.headers.push(prep.clone());
    }

    prep
}

///
/// Rename canonical columns that also exist in the directory table to
/// `{column}_canonical`, keeping a join column shared by both sides. Returns
/// the name of the `right` column after renaming
///
pub fn disambiguate(table: &mut Table, taken: &[String], left: &str, right: &str) -> String {
    let renames: Vec<(String, String)> = table.headers.iter()
        .filter(|header| taken.contains(header) && !(left == right && header.as_str() == right))
        .map(|header| (header.clone(), format!("{}_canonical", header)))
        .collect();

    for (from, to) in renames.iter() {
        for row in table.rows.iter_mut() {
            if let Some(value) = row.remove(from) {
                row.insert(to.clone(), value);
            }
        }

        for header in table.headers.iter_mut() {
            if header == from {
                *header = to.clone();
            }
        }
    }

    match renames.iter().find(|(from, _)| from == right) {
        Some((_, to)) => to.clone(),
        None => right.to_string()
    }
}

fn create(path: &str) -> Result<File, String> {
    File::create(path).map_err(|err| format!("Unable to create {}: {}", path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare() {
        let mut table = Table::from_reader("street,year\nRue Saint-Honoré,1880\n,1881\n".as_bytes()).unwrap();
        let dictionary = vec![(String::from("saint "), String::from("st "))];

        assert_eq!(prepare(&mut table, "street", &dictionary), String::from("street_prep"));
        assert_eq!(table.headers, vec![String::from("street"), String::from("year"), String::from("street_prep")]);
        assert_eq!(table.rows[0].get("street_prep"), Some(&json!("rue st honore")));
        assert_eq!(table.rows[0].get("street"), Some(&json!("Rue Saint-Honoré")));
        assert_eq!(table.rows[1].get("street_prep"), Some(&Value::Null));
    }

    #[test]
    fn test_disambiguate() {
        let mut streets = Table::from_reader("street,entry,street_id\nrue du bac,4,10\n".as_bytes()).unwrap();
        let taken = vec![String::from("street"), String::from("entry")];

        assert_eq!(disambiguate(&mut streets, &taken, "street", "street"), String::from("street"));

        assert_eq!(streets.headers, vec![String::from("street"), String::from("entry_canonical"), String::from("street_id")]);
        assert_eq!(streets.rows[0].get("entry_canonical"), Some(&json!("4")));
        assert_eq!(streets.rows[0].contains_key("entry"), false);

        let mut other = Table::from_reader("street\nrue du bac\n".as_bytes()).unwrap();
        assert_eq!(disambiguate(&mut other, &taken, "name", "street"), String::from("street_canonical"));

        disambiguate(&mut streets, &taken, "street", "name");
        assert_eq!(streets.headers[0], String::from("street_canonical"));
    }

    #[test]
    fn test_exact_then_fuzzy() {
        let mut directory = Table::from_reader("street,entry\nRue du Bac,1\nrue de la Pai,2\nboulevard haussmann,3\n,4\n".as_bytes()).unwrap();
        let mut streets = Table::from_reader("street,street_id\nrue du bac,10\nrue de la paix,11\n".as_bytes()).unwrap();

        let left = prepare(&mut directory, "street", &[]);
        let right = prepare(&mut streets, "street", &[]);
        let right = disambiguate(&mut streets, &directory.headers, &left, &right);

        let records: Vec<DirectoryRecord> = directory.rows.iter().cloned().map(DirectoryRecord::new).collect();
        let exact = align_on_column(&records, &streets.rows, &[], &left, &right, AlignMethod::Exact).unwrap();

        assert_eq!(exact.report.newly, 1);
        assert_eq!(exact.aligned[0].props.get("street_id"), Some(&json!("10")));
        assert_eq!(exact.aligned[0].props.get("street_canonical"), Some(&json!("rue du bac")));
        assert_eq!(exact.aligned[0].props.get("street"), Some(&json!("Rue du Bac")));

        let second = fuzzy::align_fuzzy(&exact.not_aligned, &streets.rows, &exact.aligned, &left, &right, 90, 2, || ()).unwrap();

        assert_eq!(second.aligned.len(), 2);
        assert_eq!(second.aligned[1].aligned_name(), Some("rue de la paix"));
        assert_eq!(second.aligned[1].method(), Some(AlignMethod::Fuzzy));
        assert_eq!(second.aligned[1].props.get("street_id"), Some(&json!("11")));
        assert_eq!(second.aligned[1].props.get("street_canonical"), Some(&json!("rue de la paix")));
        assert_eq!(second.aligned[1].props.get("street"), Some(&json!("rue de la Pai")));
        assert_eq!(second.not_aligned.len(), 2);
        assert_eq!(second.not_aligned[1].props.get("entry"), Some(&json!("4")));
        assert_eq!(second.aligned.len() + second.not_aligned.len(), records.len());
    }
}
