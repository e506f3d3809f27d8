use proptest::prelude::*;
use proptest::sample::Index;
use skilltree::model::{NodeIdAllocator, ROOT_INDEX, SkillTree, SkillType};
use skilltree::parser::SkillTreeParser;
use std::collections::HashSet;

const LEAF_TYPES: [SkillType; 3] = [SkillType::Human, SkillType::Robot, SkillType::Mixed];

/// Builds a tree by attaching each new node below a randomly chosen existing
/// one, then gives every leaf one of the labeled types.
fn build(shape: &[(Index, usize)]) -> SkillTree {
    let mut tree = SkillTree::with_allocator("R", NodeIdAllocator::new());
    for (i, (parent, _)) in shape.iter().enumerate() {
        let parent = parent.index(tree.num_nodes());
        tree.add_child(parent, format!("n{i}"), SkillType::Unlabeled);
    }
    let leaves: Vec<usize> = tree.nodes().filter(|n| n.is_leaf()).map(|n| n.index()).collect();
    for (k, leaf) in leaves.into_iter().enumerate() {
        let choice = shape.get(k).map_or(0, |(_, t)| *t);
        tree.set_skill_type(leaf, LEAF_TYPES[choice % 3]);
    }
    tree
}

/// Writes the tree in the input format (leaf types only).
fn write_text(tree: &SkillTree, index: usize, out: &mut String) {
    let node = &tree[index];
    out.push_str(node.identifier());
    if node.is_leaf() {
        out.push(' ');
        out.push_str(&node.skill_type().to_string());
        out.push(' ');
        return;
    }
    out.push_str(" { ");
    for &child in node.children() {
        write_text(tree, child, out);
    }
    out.push_str("} ");
}

fn shape_strategy() -> impl Strategy<Value = Vec<(Index, usize)>> {
    prop::collection::vec((any::<Index>(), 0..3usize), 1..40)
}

proptest! {
    #[test]
    fn prop_ids_unique_and_shape_valid(shape in shape_strategy()) {
        let tree = build(&shape);
        prop_assert!(tree.is_valid());
        let ids: HashSet<_> = tree.nodes().map(|n| n.id()).collect();
        prop_assert_eq!(ids.len(), tree.num_nodes());

        for node in tree.nodes() {
            match node.parent_index() {
                None => {
                    prop_assert_eq!(node.index(), ROOT_INDEX);
                }
                Some(p) => {
                    let occurrences = tree[p].children().iter().filter(|&&c| c == node.index()).count();
                    prop_assert_eq!(occurrences, 1);
                }
            }
        }
    }

    #[test]
    fn prop_cascade_covers_subtree(shape in shape_strategy(), target in any::<Index>(), t in 0..3usize) {
        let mut tree = build(&shape);
        let start = target.index(tree.num_nodes());
        let outside: Vec<(usize, SkillType)> = {
            let inside: HashSet<usize> = tree.pre_order_iter_from(start).map(|n| n.index()).collect();
            tree.nodes().filter(|n| !inside.contains(&n.index())).map(|n| (n.index(), n.skill_type())).collect()
        };

        tree.set_skill_type(start, LEAF_TYPES[t]);

        for node in tree.pre_order_iter_from(start) {
            prop_assert_eq!(node.skill_type(), LEAF_TYPES[t]);
        }
        for (index, before) in outside {
            prop_assert_eq!(tree[index].skill_type(), before);
        }
    }

    #[test]
    fn prop_propagation_consistent_and_idempotent(shape in shape_strategy()) {
        let mut tree = build(&shape);
        tree.assign_labels().unwrap();
        let first: Vec<SkillType> = tree.nodes().map(|n| n.skill_type()).collect();

        for node in tree.nodes().filter(|n| n.is_internal()) {
            let human = node.children().iter().any(|&c| tree[c].skill_type().has_human());
            let robot = node.children().iter().any(|&c| tree[c].skill_type().has_robot());
            prop_assert_eq!(Some(node.skill_type()), SkillType::combine(human, robot));
        }

        tree.assign_labels().unwrap();
        let second: Vec<SkillType> = tree.nodes().map(|n| n.skill_type()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_parse_rebuilds_structure(shape in shape_strategy()) {
        let tree = build(&shape);
        let mut text = String::new();
        write_text(&tree, ROOT_INDEX, &mut text);

        let parsed = SkillTreeParser::new()
            .with_allocator(NodeIdAllocator::new())
            .parse_str(&text)
            .unwrap();

        let expected: Vec<(String, usize, SkillType)> = tree
            .pre_order_iter()
            .map(|n| (n.identifier().to_string(), n.num_children(), if n.is_leaf() { n.skill_type() } else { SkillType::Unlabeled }))
            .collect();
        let actual: Vec<(String, usize, SkillType)> = parsed
            .pre_order_iter()
            .map(|n| (n.identifier().to_string(), n.num_children(), n.skill_type()))
            .collect();
        prop_assert_eq!(expected, actual);
    }
}
