use std::collections::HashMap;

///
/// Fold latin diacritics into their plain ascii letter
/// ie: é => e, ç => c, œ => oe
///
pub fn diacritics(text: &str) -> String {
    lazy_static! {
        static ref FOLD: HashMap<char, &'static str> = {
            let mut m = HashMap::new();

            for c in "àáâãäå".chars() { m.insert(c, "a"); }
            for c in "ÀÁÂÃÄÅ".chars() { m.insert(c, "A"); }
            for c in "èéêë".chars() { m.insert(c, "e"); }
            for c in "ÈÉÊË".chars() { m.insert(c, "E"); }
            for c in "ìíîï".chars() { m.insert(c, "i"); }
            for c in "ÌÍÎÏ".chars() { m.insert(c, "I"); }
            for c in "òóôõöø".chars() { m.insert(c, "o"); }
            for c in "ÒÓÔÕÖØ".chars() { m.insert(c, "O"); }
            for c in "ùúûü".chars() { m.insert(c, "u"); }
            for c in "ÙÚÛÜ".chars() { m.insert(c, "U"); }
            for c in "ýÿ".chars() { m.insert(c, "y"); }
            for c in "ÝŸ".chars() { m.insert(c, "Y"); }

            m.insert('ç', "c");
            m.insert('Ç', "C");
            m.insert('ñ', "n");
            m.insert('Ñ', "N");
            m.insert('œ', "oe");
            m.insert('Œ', "OE");
            m.insert('æ', "ae");
            m.insert('Æ', "AE");
            m.insert('ß', "ss");

            m
        };
    }

    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        match FOLD.get(&c) {
            Some(plain) => folded.push_str(plain),
            None => folded.push(c)
        };
    }

    folded
}
