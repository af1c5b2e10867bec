use std::{collections::BTreeMap, fmt};

use bitvec::prelude::*;
use itertools::Itertools;
use log::trace;

use crate::{
    bitmanipulation::Bits,
    error::{CodecError, Result},
    frequency::FrequencyTable,
    tree::{HuffmanTree, TreeNode},
    Symbol,
};

/// Prefix code for every symbol of an alphabet. This is the only artifact
/// that has to travel from encode to decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable<S> {
    codes: BTreeMap<S, Bits>,
}

impl<S: Symbol> CodeTable<S> {
    /// Left edges are `0`, right edges `1`. A tree that is a single leaf gets
    /// the one-bit code `0` so that every symbol still costs a bit.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            TreeNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, bitvec![u8, Msb0; 0]);
            }
            root => assign(root, &mut Bits::new(), &mut codes),
        }
        let table = CodeTable { codes };
        trace!("code table:\n{}", table);
        table
    }

    /// Builds a table from codes produced elsewhere, checking that they form
    /// a prefix code.
    pub fn from_codes<I>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Bits)>,
    {
        let mut map = BTreeMap::new();
        for (symbol, code) in codes {
            if code.is_empty() {
                return Err(CodecError::InvalidCodeTable {
                    reason: format!("symbol {:?} has an empty code", symbol),
                });
            }
            if map.insert(symbol, code).is_some() {
                return Err(CodecError::InvalidCodeTable {
                    reason: format!("symbol {:?} appears more than once", symbol),
                });
            }
        }
        if map.is_empty() {
            return Err(CodecError::InvalidCodeTable {
                reason: "no codes".to_string(),
            });
        }

        let table = CodeTable { codes: map };
        if let Some((a, b)) = table.prefix_violation() {
            return Err(CodecError::InvalidCodeTable {
                reason: format!("code of {:?} is a prefix of the code of {:?}", a, b),
            });
        }
        Ok(table)
    }

    pub fn get(&self, symbol: &S) -> Option<&BitSlice<u8, Msb0>> {
        self.codes.get(symbol).map(|code| code.as_bitslice())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .map(|(symbol, code)| (*symbol, code.as_bitslice()))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(|code| code.len()).max().unwrap_or(0)
    }

    pub fn is_prefix_free(&self) -> bool {
        self.prefix_violation().is_none()
    }

    /// Number of valid bits an input with these frequencies encodes to, or
    /// `None` if one of its symbols has no code or the count overflows.
    pub fn encoded_bit_len(&self, frequencies: &FrequencyTable<S>) -> Option<usize> {
        frequencies
            .iter()
            .map(|(symbol, count)| self.get(&symbol)?.len().checked_mul(count))
            .sum()
    }

    /// In lexicographic order a code is followed directly by any code it is
    /// a prefix of, so checking neighbours is enough.
    fn prefix_violation(&self) -> Option<(S, S)> {
        self.codes
            .iter()
            .sorted_by(|(_, a), (_, b)| a.cmp(b))
            .tuple_windows::<(_, _)>()
            .find(|((_, a), (_, b))| b.starts_with(a.as_bitslice()))
            .map(|((a, _), (b, _))| (*a, *b))
    }
}

fn assign<S: Symbol>(node: &TreeNode<S>, prefix: &mut Bits, codes: &mut BTreeMap<S, Bits>) {
    match node {
        TreeNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix.clone());
        }
        TreeNode::Internal { left, right, .. } => {
            prefix.push(false);
            assign(left, prefix, codes);
            prefix.pop();

            prefix.push(true);
            assign(right, prefix, codes);
            prefix.pop();
        }
    }
}

pub(crate) fn code_string(code: &BitSlice<u8, Msb0>) -> String {
    code.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

impl<S: Symbol> fmt::Display for CodeTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "{:?}\t{}", symbol, code_string(code))?;
        }
        Ok(())
    }
}
