//! IUPAC nucleotide codes.
//!
//! Curated definitions use ambiguity codes (e.g. `R` for A or G) at positions
//! where more than one base is acceptable. Those positions are called "wobble"
//! positions.

/// Bases represented by a single IUPAC code, or `None` if the character is not a code
pub fn expand(code: char) -> Option<&'static [&'static str]> {
    let bases: &'static [&'static str] = match code.to_ascii_uppercase() {
        'A' => &["A"],
        'C' => &["C"],
        'G' => &["G"],
        'T' | 'U' => &["T"],
        'R' => &["A", "G"],
        'Y' => &["C", "T"],
        'S' => &["G", "C"],
        'W' => &["A", "T"],
        'K' => &["G", "T"],
        'M' => &["A", "C"],
        'B' => &["C", "G", "T"],
        'D' => &["A", "G", "T"],
        'H' => &["A", "C", "T"],
        'V' => &["A", "C", "G"],
        'N' => &["A", "C", "G", "T"],
        '-' => &["-"],
        _ => return None,
    };
    Some(bases)
}

/// Whether an allele is a single IUPAC code standing for more than one base
pub fn is_wobble(allele: &str) -> bool {
    single_char(allele)
        .and_then(expand)
        .is_some_and(|bases| bases.len() > 1)
}

fn single_char(allele: &str) -> Option<char> {
    let mut chars = allele.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Expansion of a curated allele: single IUPAC codes expand, anything else is literal
pub fn expand_allele(allele: &str) -> Option<&'static [&'static str]> {
    single_char(allele).and_then(expand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        assert_eq!(expand('A'), Some(&["A"][..]));
        assert_eq!(expand('r'), Some(&["A", "G"][..]));
        assert_eq!(expand('N').map(<[_]>::len), Some(4));
        assert_eq!(expand('X'), None);
    }

    #[test]
    fn test_is_wobble() {
        assert!(is_wobble("R"));
        assert!(is_wobble("N"));
        assert!(!is_wobble("A"));
        assert!(!is_wobble("-"));
        assert!(!is_wobble("delA"));
        assert!(!is_wobble(""));
    }

    #[test]
    fn test_expand_allele_multi_char_is_literal() {
        assert!(expand_allele("TA").is_none());
        assert_eq!(expand_allele("Y"), Some(&["C", "T"][..]));
    }
}
