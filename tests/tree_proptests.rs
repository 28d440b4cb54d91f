//! Property-based tests for the generic tree.
//!
//! Random operation sequences are replayed against a small model of the
//! expected shape and every result is compared with it.

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::BTreeMap;
use std::io;

use kary_partition::generic_tree::*;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Tag(Key);

impl Payload for Tag {
    fn key(&self) -> Key {
        self.0
    }

    fn print(&self, _children: &[Option<&Self>], out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "{}", self.0)
    }
}

/// Keys at or above this value are never inserted.
const ABSENT: Key = 1_000_000;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Del(usize),
    Probe(Key),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<usize>().prop_map(Op::Add),
        1 => any::<usize>().prop_map(Op::Del),
        1 => (ABSENT..ABSENT + 100).prop_map(Op::Probe),
    ]
}

#[derive(Default)]
struct Model {
    live: Vec<Key>,
    parent: BTreeMap<Key, Option<Key>>,
    children: BTreeMap<Key, usize>,
    next_key: Key,
}

impl Model {
    fn pick(&self, i: usize) -> Option<Key> {
        (!self.live.is_empty()).then(|| self.live[i % self.live.len()])
    }
}

fn replay<const K: usize>(ops: &[Op]) -> Result<(), TestCaseError> {
    let mut tree = NTree::<Tag, K>::new();
    let mut model = Model::default();
    let (mut added, mut deleted) = (0usize, 0usize);

    for op in ops {
        match op {
            Op::Add(i) => {
                let key = model.next_key;
                model.next_key += 1;
                let result = tree.add_leaf(model.pick(*i).unwrap_or(-1), &Tag(key));
                match model.pick(*i) {
                    None => {
                        prop_assert!(result.is_ok());
                        model.parent.insert(key, None);
                    }
                    Some(parent) if model.children[&parent] == K => {
                        prop_assert_eq!(result.unwrap_err(), TreeError::Full(parent));
                        prop_assert!(!tree.node_is_active(parent).unwrap());
                        continue;
                    }
                    Some(parent) => {
                        prop_assert!(result.is_ok());
                        *model.children.get_mut(&parent).unwrap() += 1;
                        model.parent.insert(key, Some(parent));
                    }
                }
                model.live.push(key);
                model.children.insert(key, 0);
                added += 1;
            }
            Op::Del(i) => {
                let Some(target) = model.pick(*i) else {
                    prop_assert!(tree.del_leaf(0).is_err());
                    continue;
                };
                let result = tree.del_leaf(target);
                if model.children[&target] > 0 {
                    prop_assert_eq!(result.unwrap_err(), TreeError::HasChildren(target));
                    continue;
                }
                prop_assert_eq!(result.unwrap(), Tag(target));
                if let Some(parent) = model.parent.remove(&target).flatten() {
                    *model.children.get_mut(&parent).unwrap() -= 1;
                }
                model.children.remove(&target);
                model.live.retain(|k| *k != target);
                deleted += 1;
            }
            Op::Probe(key) => {
                prop_assert_eq!(tree.get_node(*key).unwrap_err(), TreeError::NotFound(*key));
                prop_assert_eq!(tree.get_children(*key).unwrap_err(), TreeError::NotFound(*key));
                prop_assert_eq!(tree.node_is_leaf(*key).unwrap_err(), TreeError::NotFound(*key));
                prop_assert_eq!(tree.node_is_active(*key).unwrap_err(), TreeError::NotFound(*key));
                prop_assert_eq!(tree.del_leaf(*key).unwrap_err(), TreeError::NotFound(*key));
            }
        }

        prop_assert_eq!(tree.count(), added - deleted);
        prop_assert_eq!(tree.count(), model.live.len());
        prop_assert_eq!(tree.is_empty(), model.live.is_empty());
    }

    for key in &model.live {
        let occupied = tree.get_children(*key).unwrap().iter().flatten().count();
        prop_assert_eq!(occupied, model.children[key]);
        prop_assert_eq!(tree.node_is_leaf(*key).unwrap(), occupied == 0);
        prop_assert_eq!(tree.node_is_active(*key).unwrap(), occupied < K);
        let parent = tree.parent_of(*key).unwrap().map(|p| p.0);
        prop_assert_eq!(parent, model.parent[key]);
    }
    prop_assert_eq!(tree.iter().count(), model.live.len());
    Ok(())
}

fn fill_until_full<const K: usize>(extra: usize) -> Result<(), TestCaseError> {
    let mut tree = NTree::<Tag, K>::new();
    tree.add_leaf(0, &Tag(0)).unwrap();
    // Some unrelated structure first, so the target is not the root.
    let mut parent = 0;
    for key in 1..=extra as Key {
        tree.add_leaf(parent, &Tag(key)).unwrap();
        parent = key;
    }
    let target = parent;
    let already = tree.get_children(target).unwrap().iter().flatten().count();

    for i in already..K {
        prop_assert!(tree.node_is_active(target).unwrap());
        tree.add_leaf(target, &Tag(ABSENT + i as Key)).unwrap();
    }
    prop_assert!(!tree.node_is_active(target).unwrap());
    prop_assert_eq!(
        tree.add_leaf(target, &Tag(2 * ABSENT)).unwrap_err(),
        TreeError::Full(target)
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn count_tracks_adds_minus_deletes(ops in prop::collection::vec(op(), 0..200)) {
        common::init_tracing();
        replay::<3>(&ops)?;
    }

    #[test]
    fn binary_tree_matches_model(ops in prop::collection::vec(op(), 0..200)) {
        replay::<2>(&ops)?;
    }

    #[test]
    fn unary_tree_matches_model(ops in prop::collection::vec(op(), 0..100)) {
        replay::<1>(&ops)?;
    }

    #[test]
    fn any_arity_rejects_the_extra_child(extra in 0usize..8) {
        fill_until_full::<1>(extra)?;
        fill_until_full::<2>(extra)?;
        fill_until_full::<4>(extra)?;
        fill_until_full::<7>(extra)?;
    }
}
