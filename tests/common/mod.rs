use proptest::prelude::*;

pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq,
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

pub(super) type SmallIntPairs = Vec<(u16, u16)>;

pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

// Keys from a narrow range, so runs of equal keys are common
pub(super) fn crowded_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..32u16, 0u16..1024u16), 0..512)
}

pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}

/// A mutation applied to a collection and to the model it is checked against
#[derive(Clone, Debug)]
pub(super) enum Op {
    Insert(u16, u16),
    Remove(u16),
    // Erase the element at an index, taken modulo the length
    EraseAt(usize),
    PopFirst,
    PopLast,
}

pub(super) fn op_seqs(keys: u16) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0..keys, 0u16..1024u16).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..keys).prop_map(Op::Remove),
        2 => any::<usize>().prop_map(Op::EraseAt),
        1 => Just(Op::PopFirst),
        1 => Just(Op::PopLast),
    ];
    prop::collection::vec(op, 0..256)
}
