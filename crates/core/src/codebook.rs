//! Codeword table derived from a Huffman tree.
//!
//! Each present symbol's codeword is its root-to-leaf path: `0` for every step
//! to a left child, `1` for every step to a right child. Codes are prefix-free
//! because only leaves carry symbols.
//!
//! A tree whose root is itself a leaf has no edges to walk. That symbol gets
//! the reserved one-bit codeword `0`, so every occurrence still costs one bit
//! in the data stream and the decoder can count symbols off bit by bit.

use std::fmt;

use crate::frequency::ALPHABET_SIZE;
use crate::tree::{HuffmanTree, Node, NodeId};

/// Bit sequence identifying one symbol, first bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Codeword {
    bits: Vec<bool>,
}

impl Codeword {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Codewords indexed by symbol. Absent symbols have no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    words: Vec<Option<Codeword>>,
}

impl CodeTable {
    /// Walk `tree` depth-first and record every leaf's path.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut words = vec![None; ALPHABET_SIZE];

        if let Node::Leaf { symbol, .. } = *tree.node(tree.root()) {
            words[symbol as usize] = Some(Codeword::from_bits(vec![false]));
        } else {
            let mut path = Vec::new();
            map_paths(tree, tree.root(), &mut path, &mut words);
        }

        Self { words }
    }

    /// Codeword for `symbol`, if the symbol is present in the tree.
    pub fn get(&self, symbol: u8) -> Option<&Codeword> {
        self.words[symbol as usize].as_ref()
    }

    /// Present symbols and their codewords in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Codeword)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(s, w)| w.as_ref().map(|w| (s as u8, w)))
    }

    /// Number of symbols with a codeword.
    pub fn len(&self) -> usize {
        self.words.iter().filter(|w| w.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn map_paths(
    tree: &HuffmanTree,
    id: NodeId,
    path: &mut Vec<bool>,
    words: &mut [Option<Codeword>],
) {
    match *tree.node(id) {
        Node::Leaf { symbol, .. } => {
            words[symbol as usize] = Some(Codeword::from_bits(path.clone()));
        }
        Node::Inner { left, right, .. } => {
            path.push(false);
            map_paths(tree, left, path, words);
            path.pop();

            path.push(true);
            map_paths(tree, right, path, words);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn table_for(input: &[u8]) -> CodeTable {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(input)).unwrap();
        CodeTable::from_tree(&tree)
    }

    #[test]
    fn test_two_symbols() {
        let table = table_for(b"aaab");
        assert_eq!(table.get(b'b').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "1");
        assert!(table.get(b'c').is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_single_symbol_gets_reserved_bit() {
        let table = table_for(b"zzzz");
        assert_eq!(table.get(b'z').unwrap().bits(), &[false]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for(b"this is an example of a huffman tree, with some skew: eeeeeeeee");
        let words: Vec<_> = table.iter().collect();
        for (i, (sa, a)) in words.iter().enumerate() {
            for (sb, b) in &words[i + 1..] {
                assert!(!a.is_prefix_of(b), "{} prefixes {}", sa, sb);
                assert!(!b.is_prefix_of(a), "{} prefixes {}", sb, sa);
            }
        }
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let table = table_for(b"eeeeeeeeeeeeeeeeeeeetaxq");
        let e = table.get(b'e').unwrap().len();
        for s in [b't', b'a', b'x', b'q'] {
            assert!(e <= table.get(s).unwrap().len());
        }
    }

    #[test]
    fn test_kraft_equality() {
        // A full binary tree satisfies sum(2^-len) == 1
        let table = table_for(b"mississippi river banks");
        let max = table.iter().map(|(_, w)| w.len()).max().unwrap();
        let sum: u64 = table.iter().map(|(_, w)| 1u64 << (max - w.len())).sum();
        assert_eq!(sum, 1u64 << max);
    }

    #[test]
    fn test_full_alphabet_uniform_is_eight_bits() {
        let tree = HuffmanTree::build(&FrequencyTable::from([5u64; 256])).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|(_, w)| w.len() == 8));
    }
}
