use log::debug;

use crate::{
    bitmanipulation::BitReader,
    code_table::CodeTable,
    error::{CodecError, Result},
    Symbol,
};

enum Branch<S> {
    Inner([Option<usize>; 2]),
    Leaf(S),
}

/// Decoding tree rebuilt from a code table. Index 0 is the root.
struct DecodeTrie<S> {
    nodes: Vec<Branch<S>>,
}

impl<S: Symbol> DecodeTrie<S> {
    fn new(table: &CodeTable<S>) -> Self {
        let mut nodes = vec![Branch::Inner([None, None])];

        for (symbol, code) in table.iter() {
            let mut at = 0;
            for bit in code.iter().by_vals() {
                let child = match &nodes[at] {
                    Branch::Inner(children) => children[bit as usize],
                    Branch::Leaf(_) => None,
                };
                at = match child {
                    Some(next) => next,
                    None => {
                        let next = nodes.len();
                        nodes.push(Branch::Inner([None, None]));
                        if let Branch::Inner(children) = &mut nodes[at] {
                            children[bit as usize] = Some(next);
                        }
                        next
                    }
                };
            }
            nodes[at] = Branch::Leaf(symbol);
        }

        DecodeTrie { nodes }
    }
}

/// Walks `bit_count` bits of `bytes`, emitting a symbol every time the walk
/// reaches a complete code.
pub fn decode<S: Symbol>(bytes: &[u8], bit_count: usize, table: &CodeTable<S>) -> Result<Vec<S>> {
    let mut reader = BitReader::new(bytes, bit_count).ok_or_else(|| {
        CodecError::corrupt(bytes.len() * 8, "valid-bit count exceeds the packed buffer")
    })?;
    let trie = DecodeTrie::new(table);

    let mut output = Vec::with_capacity(bit_count / table.max_code_len().max(1));
    let mut at = 0;
    let mut code_start = 0;

    while let Some(bit) = reader.read() {
        let next = match &trie.nodes[at] {
            Branch::Inner(children) => children[bit as usize],
            Branch::Leaf(_) => None,
        };
        at = next.ok_or_else(|| {
            CodecError::corrupt(reader.position() - 1, "bit path matches no code")
        })?;

        if let Branch::Leaf(symbol) = &trie.nodes[at] {
            output.push(*symbol);
            at = 0;
            code_start = reader.position();
        }
    }

    if at != 0 {
        return Err(CodecError::corrupt(
            code_start,
            "bits end in the middle of a code",
        ));
    }

    debug!("decoded {} bits into {} symbols", bit_count, output.len());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use bitvec::prelude::*;

    use super::decode;
    use crate::{build_code, code_table::CodeTable, CodecError};

    #[test]
    fn test_decode() {
        // a=0 c=10 b=11
        let table = build_code(b"abacba").unwrap();
        let input: [u8; 1] = [0b0111_0000];

        let output = decode(&input, 5, &table).unwrap();

        assert_eq!("abc", std::str::from_utf8(&output).unwrap());
    }

    #[test]
    fn padding_is_never_decoded() {
        let table = build_code(b"abacba").unwrap();
        // the padding zeros would read as three more 'a's
        assert_eq!(decode(&[0b0111_0000], 5, &table).unwrap(), b"abc");
        assert_eq!(decode(&[0b0111_0000], 8, &table).unwrap(), b"abcaaa");
    }

    #[test]
    fn zero_bits_decode_to_nothing() {
        let table = build_code(b"ab").unwrap();
        assert_eq!(decode(&[], 0, &table).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn truncated_code_is_corrupt() {
        let table = build_code(b"abacba").unwrap();
        // "0" then the first bit of "10"
        assert_eq!(
            decode(&[0b0100_0000], 2, &table),
            Err(CodecError::CorruptBitstream {
                bit_offset: 1,
                reason: "bits end in the middle of a code"
            })
        );
    }

    #[test]
    fn bit_count_past_buffer_is_corrupt() {
        let table = build_code(b"abacba").unwrap();
        let err = decode(&[0xFF], 9, &table).unwrap_err();
        assert!(err.is_bad_data());
    }

    #[test]
    fn unknown_path_is_corrupt() {
        // the single-symbol code leaves the '1' branch unused
        let table = build_code(b"zzz").unwrap();
        assert_eq!(
            decode(&[0b0010_0000], 3, &table),
            Err(CodecError::CorruptBitstream {
                bit_offset: 2,
                reason: "bit path matches no code"
            })
        );
    }

    #[test]
    fn decodes_with_supplied_codes() {
        let table = CodeTable::from_codes(vec![
            ('x', bitvec![u8, Msb0; 1]),
            ('y', bitvec![u8, Msb0; 0, 1]),
            ('z', bitvec![u8, Msb0; 0, 0]),
        ])
        .unwrap();
        // x z y x
        assert_eq!(
            decode(&[0b1000_1100], 6, &table).unwrap(),
            vec!['x', 'z', 'y', 'x']
        );
    }
}
