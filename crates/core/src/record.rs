//! Tree section serialization.
//!
//! Every node is one fixed-width 64-bit record, packed LSB-first through
//! [`BitWriter`]:
//!
//! ```text
//! Leaf:   [1 marker = 1][55 weight bits, LSB first][8 symbol bits, LSB first]
//! Inner:  [1 marker = 0][63 weight bits, LSB first]
//! ```
//!
//! Records are written in pre-order (node, left subtree, right subtree) and
//! the section ends with an all-zero 8-byte terminator. No real record is all
//! zero: a leaf's marker is 1, and an inner node's weight is the sum of at
//! least two positive leaf weights.
//!
//! An empty source is written as the terminator alone.

use std::io::{ErrorKind, Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{FormatError, HuffmanError, Result};
use crate::tree::{Arena, HuffmanTree, Node, NodeId};

/// Size of one serialized node in bytes.
pub const RECORD_LEN: usize = 8;

/// Record marking the end of the tree section.
pub const TERMINATOR: [u8; RECORD_LEN] = [0; RECORD_LEN];

pub const LEAF_WEIGHT_BITS: usize = 55;
pub const INNER_WEIGHT_BITS: usize = 63;
pub const SYMBOL_BITS: usize = 8;

/// Largest weight a leaf record can carry.
pub const MAX_LEAF_WEIGHT: u64 = (1 << LEAF_WEIGHT_BITS) - 1;

/// Largest weight an inner record can carry.
pub const MAX_INNER_WEIGHT: u64 = (1 << INNER_WEIGHT_BITS) - 1;

/// Deepest leaf a 256-symbol tree can have.
pub const MAX_DEPTH: usize = 255;

/// Most nodes a 256-symbol tree can have.
pub const MAX_NODES: usize = 511;

/// One decoded 8-byte record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Leaf { symbol: u8, weight: u64 },
    Inner { weight: u64 },
    Terminator,
}

/// Serialize one node into its 8-byte record.
///
/// # Errors
/// `HuffmanError::WeightOverflow` if the weight does not fit its field.
pub fn encode_record(node: &Node) -> Result<[u8; RECORD_LEN]> {
    let mut writer = BitWriter::with_capacity(RECORD_LEN);

    match *node {
        Node::Leaf { symbol, weight } => {
            check_weight(weight, MAX_LEAF_WEIGHT)?;
            writer.write_bit(true);
            writer.write_bits(weight, LEAF_WEIGHT_BITS)?;
            writer.write_bits(symbol as u64, SYMBOL_BITS)?;
        }
        Node::Inner { weight, .. } => {
            check_weight(weight, MAX_INNER_WEIGHT)?;
            writer.write_bit(false);
            writer.write_bits(weight, INNER_WEIGHT_BITS)?;
        }
    }

    let mut record = [0u8; RECORD_LEN];
    record.copy_from_slice(&writer.finish());
    Ok(record)
}

fn check_weight(weight: u64, max: u64) -> Result<()> {
    if weight > max {
        return Err(HuffmanError::WeightOverflow { weight, max }.into());
    }
    Ok(())
}

/// Decode one 8-byte record.
pub fn decode_record(bytes: &[u8; RECORD_LEN]) -> Result<Record> {
    if *bytes == TERMINATOR {
        return Ok(Record::Terminator);
    }

    let mut reader = BitReader::new(bytes);
    if reader.read_bit()? {
        let weight = reader.read_bits(LEAF_WEIGHT_BITS)?;
        let symbol = reader.read_bits(SYMBOL_BITS)? as u8;
        Ok(Record::Leaf { symbol, weight })
    } else {
        let weight = reader.read_bits(INNER_WEIGHT_BITS)?;
        Ok(Record::Inner { weight })
    }
}

/// Write the tree section: every node in pre-order, then the terminator.
///
/// `None` writes the terminator alone (empty source). Returns the number of
/// node records written, not counting the terminator.
pub fn write_tree<W: Write>(tree: Option<&HuffmanTree>, sink: &mut W) -> Result<usize> {
    let mut records = 0;

    if let Some(tree) = tree {
        for id in tree.preorder() {
            sink.write_all(&encode_record(tree.node(id))?)?;
            records += 1;
        }
    }
    sink.write_all(&TERMINATOR)?;

    tracing::debug!(records, "wrote tree section");
    Ok(records)
}

/// Read a tree section written by [`write_tree`], terminator included.
///
/// Returns `None` for the empty-source section (a lone terminator).
///
/// # Errors
/// - `FormatError::TruncatedTree` if the stream ends inside the section
/// - `FormatError::MissingTerminator` if the tree is not followed by the terminator
/// - `FormatError::UnexpectedTerminator`, `TreeTooDeep`, `TooManyNodes`,
///   `WeightMismatch`, `ZeroLeafWeight` for records that no built tree could produce
pub fn read_tree<R: Read>(source: &mut R) -> Result<Option<HuffmanTree>> {
    let first = match decode_record(&read_record(source)?)? {
        Record::Terminator => return Ok(None),
        record => record,
    };

    let mut arena = Arena::new();
    let root = read_subtree(source, &mut arena, first, 0)?;

    let trailer = read_record(source)?;
    if trailer != TERMINATOR {
        return Err(FormatError::MissingTerminator { actual: trailer }.into());
    }

    let tree = arena.finish(root);
    tracing::debug!(
        nodes = tree.len(),
        root_weight = tree.weight(),
        "read tree section"
    );
    Ok(Some(tree))
}

fn read_subtree<R: Read>(
    source: &mut R,
    arena: &mut Arena,
    record: Record,
    depth: usize,
) -> Result<NodeId> {
    if depth > MAX_DEPTH {
        return Err(FormatError::TreeTooDeep { max: MAX_DEPTH }.into());
    }

    match record {
        Record::Terminator => Err(FormatError::UnexpectedTerminator.into()),
        Record::Leaf { symbol, weight } => {
            if weight == 0 {
                return Err(FormatError::ZeroLeafWeight { symbol }.into());
            }
            check_room(arena)?;
            Ok(arena.leaf(symbol, weight))
        }
        Record::Inner { weight } => {
            let next = decode_record(&read_record(source)?)?;
            let left = read_subtree(source, arena, next, depth + 1)?;
            let next = decode_record(&read_record(source)?)?;
            let right = read_subtree(source, arena, next, depth + 1)?;

            let children = arena.get(left).weight().saturating_add(arena.get(right).weight());
            if children != weight {
                return Err(FormatError::WeightMismatch {
                    expected: children,
                    actual: weight,
                }
                .into());
            }
            check_room(arena)?;
            Ok(arena.inner(weight, left, right))
        }
    }
}

fn check_room(arena: &Arena) -> Result<()> {
    if arena.len() >= MAX_NODES {
        return Err(FormatError::TooManyNodes { max: MAX_NODES }.into());
    }
    Ok(())
}

fn read_record<R: Read>(source: &mut R) -> Result<[u8; RECORD_LEN]> {
    let mut record = [0u8; RECORD_LEN];
    source.read_exact(&mut record).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => FormatError::TruncatedTree.into(),
        _ => crate::Error::from(e),
    })?;
    Ok(record)
}
