mod diacritics;
pub mod fuzzy;

//
// A note on fn names:
// - Functions that score a pair of strings return an `f64` ratio
// - Functions that operate on Strings should be prefixed with `str_` unless they
//   form part of the public normalizer (`normalize`, `substitute`)
//

pub use self::diacritics::diacritics;

use regex::Regex;

///
/// Levenshtein distance with unit insert/delete cost and the given substitution
/// cost. A substitution cost of 2 yields the InDel distance
///
fn edit_distance(a: &str, b: &str, substitution: usize) -> usize {
    let v1: Vec<char> = a.chars().collect();
    let v2: Vec<char> = b.chars().collect();
    let v1len = v1.len();
    let v2len = v2.len();

    // Early exit if one of the strings is empty
    if v1len == 0 { return v2len; }
    if v2len == 0 { return v1len; }

    fn min3<T: Ord>(v1: T, v2: T, v3: T) -> T {
        std::cmp::min(v1, std::cmp::min(v2, v3))
    }

    let delta = |x: char, y: char| -> usize {
        if x == y { 0 } else { substitution }
    };

    let mut column: Vec<usize> = (0..v1len+1).collect();

    for x in 1..v2len+1 {
        column[0] = x;
        let mut lastdiag = x-1;
        for y in 1..v1len+1 {
            let olddiag = column[y];
            column[y] = min3(column[y] + 1, column[y-1] + 1, lastdiag + delta(v1[y-1], v2[x-1]));
            lastdiag = olddiag;
        }
    }

    column[v1len]
}

///
/// Normalized similarity of two strings on a 0-100 scale
///
/// Based on the Levenshtein distance with substitutions weighted as an insert
/// plus a delete, so the score is `100 * (1 - d / (len(a) + len(b)))`.
/// Strings are compared verbatim; any normalization must happen before scoring.
///
pub fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();

    if total == 0 {
        return 100.0;
    }

    let dist = edit_distance(a, b, 2);

    100.0 * (1.0 - (dist as f64 / total as f64))
}

///
/// Canonicalize a raw street string before it is joined or scored
///
/// Lowercases, folds diacritics, maps `-` and `_` to spaces, removes the space
/// after an apostrophe and collapses runs of whitespace
///
pub fn normalize(text: &str) -> String {
    lazy_static! {
        static ref SEPARATORS: Regex = Regex::new(r"[-_]").unwrap();
        static ref APOSTROPHE: Regex = Regex::new(r"'\s+").unwrap();
        static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
    }

    let text = diacritics(&text.to_lowercase());
    let text = SEPARATORS.replace_all(&text, " ");
    let text = APOSTROPHE.replace_all(&text, "'");
    let text = SPACES.replace_all(&text, " ");

    text.trim().to_string()
}

///
/// Apply an ordered substitution dictionary (ie: abbreviation expansion)
/// Each entry replaces every occurrence of its key, in dictionary order
///
pub fn substitute(text: &str, dictionary: &[(String, String)]) -> String {
    let mut text = text.to_string();

    for (incorrect, correct) in dictionary {
        if !incorrect.is_empty() && text.contains(incorrect.as_str()) {
            text = text.replace(incorrect.as_str(), correct);
        }
    }

    text
}

///
/// Parse a substitution dictionary from `incorrect<TAB>correct` lines
/// Blank lines and lines starting with `#` are ignored
///
pub fn str_dictionary(input: &str) -> Result<Vec<(String, String)>, String> {
    let mut dictionary = Vec::new();

    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.splitn(2, '\t');
        match (parts.next(), parts.next()) {
            (Some(incorrect), Some(correct)) if !incorrect.is_empty() => {
                dictionary.push((incorrect.to_string(), correct.to_string()));
            },
            _ => { return Err(format!("Invalid dictionary entry on line {}: {}", i + 1, line)); }
        }
    }

    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("a", "b", 1), 1);
        assert_eq!(edit_distance("ab", "ac", 1), 1);
        assert_eq!(edit_distance("ac", "bc", 1), 1);
        assert_eq!(edit_distance("abc", "axc", 1), 1);
        assert_eq!(edit_distance("xabxcdxxefxgx", "1ab2cd34ef5g6", 1), 6);

        assert_eq!(edit_distance("xabxcdxxefxgx", "abcdefg", 1), 6);
        assert_eq!(edit_distance("example", "samples", 1), 3);
        assert_eq!(edit_distance("sturgeon", "urgently", 1), 6);
        assert_eq!(edit_distance("levenshtein", "frankenstein", 1), 6);
        assert_eq!(edit_distance("distance", "difference", 1), 5);

        assert_eq!(edit_distance("rue de la paix", "rue de la pai", 1), 1);
        assert_eq!(edit_distance("", "rue", 1), 3);

        assert_eq!(edit_distance("ab", "ac", 2), 2);
        assert_eq!(edit_distance("rue de la paix", "rue de la pai", 2), 1);

        assert_eq!(edit_distance("你好世界", "你好", 1), 2);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("rue du bac", "rue du bac"), 100.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("abc", ""), 0.0);

        // one deletion over 27 characters
        assert_eq!(ratio("rue de la paix", "rue de la pai"), 100.0 * (1.0 - 1.0 / 27.0));

        // one substitution counts as insert + delete
        assert_eq!(ratio("ab", "ac"), 50.0);

        // scoring is case sensitive
        assert!(ratio("Rue du Bac", "rue du bac") < 100.0);
        assert_eq!(ratio("rue du bac", "rue du bca"), ratio("rue du bca", "rue du bac"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Rue de l'Église"), String::from("rue de l'eglise"));
        assert_eq!(normalize("Rue   Saint-Honoré"), String::from("rue saint honore"));
        assert_eq!(normalize("rue_du_bac "), String::from("rue du bac"));
        assert_eq!(normalize("Quai d' Orsay"), String::from("quai d'orsay"));
        assert_eq!(normalize("Faubourg Saint-Antoine"), String::from("faubourg saint antoine"));
        assert_eq!(normalize(""), String::from(""));
    }

    #[test]
    fn test_substitute() {
        let dictionary = vec![
            (String::from("bd "), String::from("boulevard ")),
            (String::from("st "), String::from("saint ")),
            (String::from("fg "), String::from("faubourg "))
        ];

        assert_eq!(substitute("bd st germain", &dictionary), String::from("boulevard saint germain"));
        assert_eq!(substitute("fg st antoine", &dictionary), String::from("faubourg saint antoine"));
        assert_eq!(substitute("rue du bac", &dictionary), String::from("rue du bac"));
        assert_eq!(substitute("rue du bac", &[]), String::from("rue du bac"));
    }

    #[test]
    fn test_str_dictionary() {
        assert_eq!(str_dictionary("# abbreviations\nbd \tboulevard \n\nst \tsaint \n"), Ok(vec![
            (String::from("bd "), String::from("boulevard ")),
            (String::from("st "), String::from("saint "))
        ]));

        assert!(str_dictionary("bd boulevard").is_err());
    }
}
