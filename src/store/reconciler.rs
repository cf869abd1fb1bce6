//! Branch reconciler - applies the virtual order to the host tree.
//!
//! Moves only the nodes whose intended index leads their live index, so a
//! single-slot swap costs a single host mutation and an already-converged
//! branch costs none.

use tracing::warn;

use crate::dom::DomAdapter;
use crate::engine::Sk;
use crate::store::Store;

/// Converge one branch: host order, transforms, indicator attributes and
/// grid metrics all end up matching the branch's virtual order.
pub(crate) fn reconcile_branch(store: &mut Store, dom: &mut dyn DomAdapter, sk: &Sk) {
    let ids: Vec<String> = match store.get_branch_by_key(sk) {
        Ok(branch) => branch.to_vec(),
        Err(err) => {
            warn!(%err, "reconcile: skipping unknown branch");
            return;
        }
    };
    if ids.is_empty() {
        return;
    }

    let parent_id = match store.get_container(sk) {
        Ok(container) => container.id.clone(),
        Err(err) => {
            warn!(%err, "reconcile: branch has no container");
            return;
        }
    };

    // End-to-start: every settled suffix stays put while earlier nodes are
    // repositioned in front of it.
    for i in (0..ids.len()).rev() {
        let id = &ids[i];
        let needs_move = match store.get_element(id) {
            Ok(elm) => elm.need_reconciliation(),
            Err(err) => {
                warn!(%err, "reconcile: branch slot without a record");
                continue;
            }
        };

        if needs_move {
            switch_elm_dom_position(store, dom, &parent_id, &ids, id);
        }
    }

    // Transforms are baked into the host order now; clear them, refresh the
    // measured rects and replay the grid in final order.
    if let Ok(container) = store.container_mut(sk) {
        container.reset_indicators(ids.len());
    }

    for id in &ids {
        if let Ok(elm) = store.get_element_mut(id) {
            if elm.has_transformed_from_origin() {
                elm.flush_indicators(dom);
            }
            if let Some(rect) = dom.rect(id) {
                elm.rect = rect;
            }

            debug_assert_eq!(
                elm.vdom_index, elm.dom_index,
                "orders must converge for `{id}` after reconciliation"
            );
        }

        store.set_elm_grid_bridge(sk, id);
    }

    #[cfg(debug_assertions)]
    {
        let live = dom.children(&parent_id);
        if live != ids {
            tracing::error!(
                sk = %sk,
                ?live,
                ?ids,
                "reconcile: host order diverged from virtual order"
            );
        }
    }
}

/// Move one host node to its intended index and settle the recorded live
/// indexes of every sibling it passed over.
fn switch_elm_dom_position(
    store: &mut Store,
    dom: &mut dyn DomAdapter,
    parent_id: &str,
    ids: &[String],
    id: &str,
) {
    let (vdom, old_dom) = match store.get_element(id) {
        Ok(elm) => (elm.vdom_index, elm.dom_index),
        Err(_) => return,
    };
    if vdom == old_dom {
        return;
    }

    let live = dom.children(parent_id);

    // Moving down lands after the node holding the target index; moving up
    // lands in front of it.
    let reference = if vdom > old_dom {
        live.get(vdom + 1)
    } else {
        live.get(vdom)
    };

    match reference {
        Some(before) => dom.insert_before(parent_id, id, before),
        None => dom.append_child(parent_id, id),
    }

    settle_dom_indexes(store, ids, id, old_dom, vdom);
}

/// Siblings between the vacated and claimed slots step one toward the gap.
fn settle_dom_indexes(store: &mut Store, ids: &[String], moved_id: &str, old_dom: usize, vdom: usize) {
    for id in ids {
        if id == moved_id {
            continue;
        }
        let Ok(elm) = store.get_element_mut(id) else {
            continue;
        };

        if vdom > old_dom {
            if elm.dom_index > old_dom && elm.dom_index <= vdom {
                elm.dom_index -= 1;
            }
        } else if elm.dom_index >= vdom && elm.dom_index < old_dom {
            elm.dom_index += 1;
        }
    }

    if let Ok(elm) = store.get_element_mut(moved_id) {
        elm.dom_index = vdom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::mock::MockDom;
    use crate::geometry::Point;
    use crate::store::test_fixtures::*;

    /// Rewrite the branch to `order` and point every element's intended
    /// index at its new slot, as a settled drag gesture would have.
    fn settle_virtual_order(store: &mut Store, sk: &Sk, order: &[&str]) {
        let branch = store.branch_mut(sk).unwrap();
        branch.clear();
        branch.extend(order.iter().map(|id| id.to_string()));

        for (i, id) in order.iter().enumerate() {
            let elm = store.get_element_mut(id).unwrap();
            if elm.vdom_index != i {
                let delta = (i as f64 - elm.vdom_index as f64) * ROW_HEIGHT;
                elm.translate.set_axes(0.0, delta);
            }
            elm.vdom_index = i;
        }
    }

    #[test]
    fn test_swap_costs_one_move() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        settle_virtual_order(&mut store, &sk, &["b", "a"]);
        reconcile_branch(&mut store, &mut dom, &sk);

        assert_eq!(dom.children("list"), vec!["b", "a"]);
        assert_eq!(dom.moves, 1);

        let a = store.get_element("a").unwrap();
        assert_eq!((a.vdom_index, a.dom_index), (1, 1));
        assert!(a.translate.is_zero());
        assert_eq!(dom.transform_of("a"), Point::zero());
    }

    #[test]
    fn test_head_exit_costs_one_move() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b", "c"]);

        // "a" dragged out from the top, siblings lifted up, "a" settled last.
        settle_virtual_order(&mut store, &sk, &["b", "c", "a"]);
        reconcile_branch(&mut store, &mut dom, &sk);

        assert_eq!(dom.children("list"), vec!["b", "c", "a"]);
        assert_eq!(dom.moves, 1);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b", "c"]);

        settle_virtual_order(&mut store, &sk, &["c", "a", "b"]);
        reconcile_branch(&mut store, &mut dom, &sk);
        let moves_after_first = dom.moves;

        reconcile_branch(&mut store, &mut dom, &sk);
        assert_eq!(dom.moves, moves_after_first);
        assert_eq!(dom.children("list"), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_converged_branch_moves_nothing() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b", "c"]);

        reconcile_branch(&mut store, &mut dom, &sk);
        assert_eq!(dom.moves, 0);
    }

    #[test]
    fn test_grid_replayed_in_final_order() {
        let mut store = Store::new();
        let mut dom = MockDom::new();
        let sk = seed_list(&mut store, &mut dom, "list", &["a", "b"]);

        settle_virtual_order(&mut store, &sk, &["b", "a"]);
        // Host rects follow the new order once transforms are gone.
        dom.set_rect("b", crate::geometry::Rect::new(0.0, 0.0, 100.0, ROW_HEIGHT));
        dom.set_rect("a", crate::geometry::Rect::new(ROW_HEIGHT, 0.0, 100.0, ROW_HEIGHT));

        reconcile_branch(&mut store, &mut dom, &sk);

        assert_eq!(store.get_element("b").unwrap().grid, Point::new(1, 1));
        assert_eq!(store.get_element("a").unwrap().grid, Point::new(1, 2));
    }
}
