mod common;

use std::collections::BTreeSet;

use align_editor::{EditOutcome, Session};
use align_protocol::{LayoutConfig, LinkKey, NodeId};
use proptest::prelude::*;

use common::tiny_block;

fn session(top: usize, bottom: usize) -> Session {
    let forms: Vec<String> = (0..top.max(bottom)).map(|i| format!("w{i}")).collect();
    let refs: Vec<&str> = forms.iter().map(String::as_str).collect();

    let mut session = Session::new(LayoutConfig::default());
    session
        .load(&tiny_block(&refs[..top]), &tiny_block(&refs[..bottom]), "")
        .unwrap();
    session
}

/// Sentence sizes, a set of links and a set of markers on tokens without links.
fn annotation() -> impl Strategy<Value = (usize, usize, BTreeSet<LinkKey>, BTreeSet<NodeId>)> {
    (1usize..8, 1usize..8).prop_flat_map(|(top, bottom)| {
        let links = prop::collection::btree_set((1..=top as u32, 1..=bottom as u32), 0..10);
        let marks = prop::collection::btree_set(
            prop_oneof![
                (1..=top as u32).prop_map(NodeId::top),
                (1..=bottom as u32).prop_map(NodeId::bottom),
            ],
            0..6,
        );
        (Just(top), Just(bottom), links, marks).prop_map(|(top, bottom, links, marks)| {
            let links: BTreeSet<LinkKey> = links.into_iter().map(|(t, b)| LinkKey::new(t, b)).collect();
            let marks = marks
                .into_iter()
                .filter(|node| !links.iter().any(|key| key.touches(*node)))
                .collect();
            (top, bottom, links, marks)
        })
    })
}

fn apply(session: &mut Session, links: &BTreeSet<LinkKey>, marks: &BTreeSet<NodeId>) {
    for key in links {
        assert_eq!(
            session.toggle_link(key.top_node(), key.bottom_node()),
            EditOutcome::Linked(*key)
        );
    }
    for node in marks {
        assert!(session.mark_unaligned(*node));
    }
}

fn link_set(session: &Session) -> BTreeSet<LinkKey> {
    session.links().iter().copied().collect()
}

proptest! {
    #[test]
    fn test_encode_decode_round_trip((top, bottom, links, marks) in annotation()) {
        let mut original = session(top, bottom);
        apply(&mut original, &links, &marks);
        let encoded = original.encode_alignment();

        let decoded = {
            let mut s = session(top, bottom);
            s.decode_alignment(&encoded);
            s
        };

        prop_assert_eq!(link_set(&decoded), links);
        prop_assert_eq!(decoded.unaligned(), &marks);
    }

    #[test]
    fn test_double_toggle_restores_state(
        (top, bottom, links, _marks) in annotation(),
        t in 1u32..8,
        b in 1u32..8,
    ) {
        prop_assume!(t as usize <= top && b as usize <= bottom);

        let mut s = session(top, bottom);
        apply(&mut s, &links, &BTreeSet::new());
        let before_links = link_set(&s);
        let before_marks = s.unaligned().clone();

        s.toggle_link(NodeId::top(t), NodeId::bottom(b));
        s.toggle_link(NodeId::top(t), NodeId::bottom(b));

        prop_assert_eq!(link_set(&s), before_links);
        prop_assert_eq!(s.unaligned(), &before_marks);
    }

    #[test]
    fn test_toggle_order_does_not_matter(t in 1u32..6, b in 1u32..6) {
        let mut s = session(5, 5);
        let first = s.toggle_link(NodeId::top(t), NodeId::bottom(b));
        let second = s.toggle_link(NodeId::bottom(b), NodeId::top(t));

        prop_assert_eq!(first, EditOutcome::Linked(LinkKey::new(t, b)));
        prop_assert_eq!(second, EditOutcome::Unlinked(LinkKey::new(t, b)));
        prop_assert!(s.links().is_empty());
    }

    #[test]
    fn test_same_layer_clicks_never_link(a in 1u32..6, b in 1u32..6, bottom_layer in any::<bool>()) {
        let mut s = session(5, 5);
        let node = |o| if bottom_layer { NodeId::bottom(o) } else { NodeId::top(o) };

        s.click(Some(node(a)));
        prop_assert_eq!(s.click(Some(node(b))), EditOutcome::SameLayer);
        prop_assert!(s.links().is_empty());
        prop_assert_eq!(s.pending(), None);
    }
}
