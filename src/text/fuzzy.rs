use std::collections::{HashMap, HashSet};
use rayon::prelude::*;
use crate::join::{align_with, join_key, Alignment};
use crate::text::ratio;
use crate::types::{AlignMethod, DirectoryRecord, Row, Vocabulary};

///
/// Find the vocabulary entry most similar to the query
///
/// The first entry reaching the maximum score wins, so the result only depends on
/// the vocabulary order. Returns None when the best score is below the cutoff.
///
pub fn best_match(vocabulary: &Vocabulary, query: &str, cutoff: u8) -> Result<Option<String>, String> {
    if query.trim().is_empty() {
        return Err(String::from("Invalid query: empty string"));
    }

    let mut max: Option<(&String, f64)> = None;
    for candidate in vocabulary.names() {
        let score = ratio(query, candidate);

        match max {
            None => {
                max = Some((candidate, score));
            },
            Some((_, current)) => {
                if score > current {
                    max = Some((candidate, score));
                }
            }
        };
    }

    match max {
        Some((name, score)) if score >= cutoff as f64 => Ok(Some(name.clone())),
        _ => Ok(None)
    }
}

///
/// Map every query to its best vocabulary entry, dropping queries without a
/// match above the cutoff
///
/// Queries are scored on a dedicated pool of `threads` workers. Every failed
/// query is collected and the whole batch fails if any did.
///
pub fn fuzzy_align(vocabulary: &Vocabulary, queries: &[String], cutoff: u8, threads: usize) -> Result<HashMap<String, String>, String> {
    fuzzy_align_with(vocabulary, queries, cutoff, threads, || ())
}

///
/// As `fuzzy_align`, calling `tick` once per scored query
///
pub fn fuzzy_align_with<F>(vocabulary: &Vocabulary, queries: &[String], cutoff: u8, threads: usize, tick: F) -> Result<HashMap<String, String>, String>
    where F: Fn() + Sync
{
    if cutoff > 100 {
        return Err(format!("Invalid score cutoff: {} (must be 0-100)", cutoff));
    }

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool,
        Err(err) => { return Err(format!("Failed to build worker pool: {}", err)); }
    };

    let results: Vec<Result<Option<(String, String)>, String>> = pool.install(|| {
        queries.par_iter().map(|query| {
            let result = best_match(vocabulary, query, cutoff).map(|best| {
                best.map(|best| (query.clone(), best))
            });

            tick();

            result
        }).collect()
    });

    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut errors: Vec<String> = Vec::new();

    for result in results {
        match result {
            Ok(Some((query, name))) => {
                mapping.insert(query, name);
            },
            Ok(None) => (),
            Err(err) => errors.push(err)
        };
    }

    if !errors.is_empty() {
        return Err(format!("{} of {} fuzzy queries failed: {}", errors.len(), queries.len(), errors.join(", ")));
    }

    Ok(mapping)
}

///
/// Fuzzy pass over the residual records of an exact pass
///
/// The vocabulary is every distinct `canonical[right]` value. Each unaligned record
/// whose `left` name maps to a vocabulary entry is joined to the canonical rows
/// holding that entry, exactly as the exact pass joins them, and tagged with
/// `AlignMethod::Fuzzy`. Records without a name in `left` are never queried and
/// stay unaligned.
///
pub fn align_fuzzy<F>(
    not_aligned: &[DirectoryRecord],
    canonical: &[Row],
    aligned: &[DirectoryRecord],
    left: &str,
    right: &str,
    cutoff: u8,
    threads: usize,
    tick: F
) -> Result<Alignment, String>
    where F: Fn() + Sync
{
    let vocabulary: Vocabulary = canonical.iter().filter_map(|row| join_key(row.get(right))).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut queries: Vec<String> = Vec::new();

    for name in not_aligned.iter().filter_map(|record| query(record, left)) {
        if seen.insert(name) {
            queries.push(name.to_string());
        }
    }

    let mapping = fuzzy_align_with(&vocabulary, &queries, cutoff, threads, tick)?;

    align_with(not_aligned, canonical, aligned, left, right, AlignMethod::Fuzzy, |record| {
        query(record, left).and_then(|name| mapping.get(name)).cloned()
    })
}

///
/// Name a record can be fuzzy matched on. Blank names can't
///
fn query<'a>(record: &'a DirectoryRecord, key: &str) -> Option<&'a str> {
    record.raw_name(key).filter(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn vocabulary() -> Vocabulary {
        vec!["rue de la paix", "rue du bac", "quai voltaire", "rue de la pompe"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn queries(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_best_match() {
        let vocab = vocabulary();

        assert_eq!(best_match(&vocab, "rue du bac", 100).unwrap(), Some(String::from("rue du bac")));
        assert_eq!(best_match(&vocab, "rue de la pai", 90).unwrap(), Some(String::from("rue de la paix")));
        assert_eq!(best_match(&vocab, "rue de la pai", 97).unwrap(), None);

        assert_eq!(best_match(&vocab, "boulevard haussmann", 90).unwrap(), None);
        assert_eq!(best_match(&vocab, "", 90), Err(String::from("Invalid query: empty string")));
        assert_eq!(best_match(&Vocabulary::default(), "rue du bac", 0).unwrap(), None);
    }

    #[test]
    fn test_best_match_tie() {
        // both entries are one substitution away from the query
        let vocab: Vocabulary = vec!["rue abc", "rue abd"].into_iter().map(String::from).collect();

        for _ in 0..10 {
            assert_eq!(best_match(&vocab, "rue abx", 0).unwrap(), Some(String::from("rue abc")));
        }

        let reversed: Vocabulary = vec!["rue abd", "rue abc"].into_iter().map(String::from).collect();
        assert_eq!(best_match(&reversed, "rue abx", 0).unwrap(), Some(String::from("rue abd")));
    }

    #[test]
    fn test_fuzzy_align() {
        let mapping = fuzzy_align(&vocabulary(), &queries(&[
            "rue de la pai",
            "rue du bak",
            "boulevard haussmann",
            "rue de la pai"
        ]), 85, 2).unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("rue de la pai"), Some(&String::from("rue de la paix")));
        assert_eq!(mapping.get("rue du bak"), Some(&String::from("rue du bac")));
        assert_eq!(mapping.get("boulevard haussmann"), None);
    }

    #[test]
    fn test_fuzzy_align_monotonic() {
        let input = queries(&["rue de la pai", "rue du bak", "quai voltair", "rue de la pomp", "quai d'orsay"]);

        let mut last = std::usize::MAX;
        for cutoff in (0..=100).step_by(5) {
            let size = fuzzy_align(&vocabulary(), &input, cutoff as u8, 3).unwrap().len();
            assert!(size <= last);
            last = size;
        }
    }

    #[test]
    fn test_fuzzy_align_deterministic() {
        let input = queries(&["rue de la pai", "rue du bak", "quai voltair", "rue de la pomp"]);

        let single = fuzzy_align(&vocabulary(), &input, 80, 1).unwrap();
        let multi = fuzzy_align(&vocabulary(), &input, 80, 4).unwrap();
        assert_eq!(single, multi);
    }

    #[test]
    fn test_fuzzy_align_errors() {
        let err = fuzzy_align(&vocabulary(), &queries(&["rue du bak", "", " "]), 80, 2).unwrap_err();
        assert_eq!(err, String::from("2 of 3 fuzzy queries failed: Invalid query: empty string, Invalid query: empty string"));

        assert!(fuzzy_align(&vocabulary(), &queries(&["rue du bak"]), 101, 2).is_err());
    }

    #[test]
    fn test_fuzzy_align_tick() {
        let count = AtomicUsize::new(0);

        fuzzy_align_with(&vocabulary(), &queries(&["rue du bak", "quai voltair", "rue lafitte"]), 80, 2, || {
            count.fetch_add(1, Ordering::SeqCst);
        }).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    fn canonical() -> Vec<Row> {
        vec!["rue de la paix", "rue du bac", "quai voltaire", "rue de la pompe", "rue du bac"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let mut row = Row::new();
                row.insert(String::from("name"), json!(name));
                row.insert(String::from("street_id"), json!(i));
                row
            }).collect()
    }

    fn records(names: &[serde_json::Value]) -> Vec<DirectoryRecord> {
        names.iter().map(|name| {
            let mut props = Row::new();
            props.insert(String::from("street"), name.clone());
            DirectoryRecord::new(props)
        }).collect()
    }

    #[test]
    fn test_align_fuzzy() {
        let input = records(&[json!("rue de la pai"), json!("boulevard haussmann"), json!("quai voltair")]);

        let alignment = align_fuzzy(&input, &canonical(), &[], "street", "name", 85, 2, || ()).unwrap();

        assert_eq!(alignment.aligned.len() + alignment.not_aligned.len(), input.len());
        assert_eq!(alignment.aligned.len(), 2);
        assert_eq!(alignment.aligned[0].aligned_name(), Some("rue de la paix"));
        assert_eq!(alignment.aligned[0].method(), Some(AlignMethod::Fuzzy));
        assert_eq!(alignment.aligned[0].raw_name("street"), Some("rue de la pai"));
        assert_eq!(alignment.aligned[0].props.get("street_id"), Some(&json!(0)));
        assert_eq!(alignment.aligned[1].aligned_name(), Some("quai voltaire"));
        assert_eq!(alignment.aligned[1].props.get("street_id"), Some(&json!(2)));
        assert_eq!(alignment.not_aligned[0].raw_name("street"), Some("boulevard haussmann"));
        assert_eq!(alignment.not_aligned[0].props.contains_key("street_id"), false);
        assert_eq!(alignment.report.newly, 2);
        assert_eq!(alignment.report.not_aligned, 1);
    }

    #[test]
    fn test_align_fuzzy_one_to_many() {
        let alignment = align_fuzzy(&records(&[json!("rue du bak")]), &canonical(), &[], "street", "name", 85, 2, || ()).unwrap();

        assert_eq!(alignment.aligned.len(), 2);
        assert_eq!(alignment.aligned[0].props.get("street_id"), Some(&json!(1)));
        assert_eq!(alignment.aligned[1].props.get("street_id"), Some(&json!(4)));
    }

    #[test]
    fn test_align_fuzzy_blank_names() {
        let mut input = records(&[json!("rue de la pai"), serde_json::Value::Null, json!("  ")]);
        input.push(DirectoryRecord::new(Row::new()));

        let alignment = align_fuzzy(&input, &canonical(), &[], "street", "name", 85, 2, || ()).unwrap();

        assert_eq!(alignment.aligned.len(), 1);
        assert_eq!(alignment.not_aligned.len(), 3);
        assert_eq!(alignment.not_aligned[0].props.get("street"), Some(&serde_json::Value::Null));
        assert_eq!(alignment.not_aligned[1].raw_name("street"), Some("  "));
        assert_eq!(alignment.not_aligned[2].is_aligned(), false);
    }
}
