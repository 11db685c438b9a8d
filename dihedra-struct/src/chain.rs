//! Chain selection and sequence extraction.

use crate::types::{Chain, Structure};

/// The first chain of a structure, in file order.
pub fn first_chain(structure: &Structure) -> Option<&Chain> {
    structure.chains.first()
}

/// `(residue number, one-letter code)` for each standard amino acid of a
/// chain, in chain order. This is the residue list an alignment string
/// indexes into.
pub fn residue_codes(chain: &Chain) -> Vec<(i32, char)> {
    chain
        .residues
        .iter()
        .filter_map(|r| r.one_letter_code().map(|c| (r.seq_num, c)))
        .collect()
}

/// One-letter sequence of the standard amino acids of a chain.
pub fn sequence(chain: &Chain) -> String {
    chain.amino_acids().filter_map(|r| r.one_letter_code()).collect()
}

/// File stem used for an extracted chain: `<stem>_Chain<ID>`.
pub fn chain_file_stem(stem: &str, chain_id: char) -> String {
    format!("{}_Chain{}", stem, chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::{make_atom, make_residue};

    fn sample() -> Structure {
        let a = Chain::new(
            'B',
            vec![
                make_residue("MET", 1, vec![make_atom(" CA ", 0.0, 0.0, 0.0)]),
                make_residue("HOH", 2, vec![make_atom(" O  ", 0.0, 0.0, 0.0)]),
                make_residue("LYS", 5, vec![make_atom(" CA ", 0.0, 0.0, 0.0)]),
            ],
        );
        let b = Chain::new(
            'A',
            vec![make_residue("GLY", 1, vec![make_atom(" CA ", 0.0, 0.0, 0.0)])],
        );
        Structure {
            id: "TEST".into(),
            model: 0,
            chains: vec![a, b],
        }
    }

    #[test]
    fn first_chain_is_file_order() {
        let s = sample();
        assert_eq!(first_chain(&s).unwrap().id, 'B');
        let empty = Structure {
            id: "E".into(),
            model: 0,
            chains: vec![],
        };
        assert!(first_chain(&empty).is_none());
    }

    #[test]
    fn codes_skip_non_amino_acids() {
        let s = sample();
        assert_eq!(residue_codes(&s.chains[0]), vec![(1, 'M'), (5, 'K')]);
        assert_eq!(sequence(&s.chains[0]), "MK");
    }

    #[test]
    fn stem_format() {
        assert_eq!(chain_file_stem("1abc", 'A'), "1abc_ChainA");
    }
}
