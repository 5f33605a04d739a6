//! Numeric-aware comparison of haplotype names.
//!
//! Star-allele names embed numbers (`*2`, `*10`, `*4.001`) that must sort by
//! value rather than character by character, so `*9` comes before `*10`.

use std::cmp::Ordering;

/// A run of either digits or non-digits within a name
#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn chunks(name: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits: Option<bool> = None;

    for (i, c) in name.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(make_chunk(&name[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&name[start..], prev));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Number(s)
    } else {
        Chunk::Text(s)
    }
}

/// Compare two digit runs by value without parsing (runs may exceed `u64`)
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
}

/// Natural ordering of haplotype names.
///
/// Digit runs compare numerically, other runs compare as text, and a number sorts
/// before text at the same chunk. Names that are equal under these rules (e.g.
/// `*01` and `*1`) fall back to plain string order so the result is a total order
/// consistent with string equality.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (x, y) in a_chunks.iter().zip(b_chunks.iter()) {
        let rez = match (x, y) {
            (Chunk::Number(x), Chunk::Number(y)) => compare_numbers(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
        };
        if rez != Ordering::Equal {
            return rez;
        }
    }

    a_chunks
        .len()
        .cmp(&b_chunks.len())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_numbers() {
        assert_eq!(compare_names("*9", "*10"), Ordering::Less);
        assert_eq!(compare_names("*10", "*9"), Ordering::Greater);
        assert_eq!(compare_names("*2", "*2"), Ordering::Equal);
    }

    #[test]
    fn test_embedded_numbers() {
        assert_eq!(compare_names("*4.001", "*4.010"), Ordering::Less);
        assert_eq!(compare_names("*4", "*4.001"), Ordering::Less);
        assert_eq!(compare_names("Foo9Bar", "Foo10Bar"), Ordering::Less);
        assert_eq!(compare_names("*2A", "*2B"), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros_are_total() {
        assert_eq!(compare_names("*01", "*1"), "*01".cmp("*1"));
        assert_ne!(compare_names("*01", "*1"), Ordering::Equal);
    }

    #[test]
    fn test_huge_numbers() {
        assert_eq!(
            compare_names("x99999999999999999999", "x100000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_sort() {
        let mut names = vec!["*10", "*2", "*1", "*9", "*17", "*1.001"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["*1", "*1.001", "*2", "*9", "*10", "*17"]);
    }

    #[test]
    fn test_chunks() {
        assert_eq!(
            chunks("*4.01"),
            vec![
                Chunk::Text("*"),
                Chunk::Number("4"),
                Chunk::Text("."),
                Chunk::Number("01")
            ]
        );
        assert!(chunks("").is_empty());
    }
}
