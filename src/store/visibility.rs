//! Branch visibility - viewport intersection over a monotonic layout.
//!
//! Siblings are laid out in reading order, so the visible ones form one
//! contiguous band. Once the walk leaves the viewport after having entered
//! it, the remainder is invisible without further intersection tests.

use crate::engine::Sk;
use crate::store::Store;

/// Recompute `is_visible` for every sibling of one branch.
///
/// Branches whose scroll container reports no overflow are fully visible.
pub fn update_branch_visibility(store: &mut Store, sk: &Sk) {
    let Some(scroll) = store.get_scroll(sk).ok().cloned() else {
        return;
    };
    let ids: Vec<String> = match store.get_branch_by_key(sk) {
        Ok(branch) => branch.to_vec(),
        Err(_) => return,
    };

    if !scroll.allow_dynamic_visibility {
        for id in &ids {
            if let Ok(elm) = store.get_element_mut(id) {
                elm.change_visibility(true);
            }
        }
        return;
    }

    let mut entered = false;
    let mut exited = false;

    for id in &ids {
        let Ok(elm) = store.get_element_mut(id) else {
            continue;
        };

        let visible = if exited {
            false
        } else {
            scroll.is_rect_visible_viewport(&elm.rect)
        };

        if visible {
            entered = true;
        } else if entered {
            exited = true;
        }

        elm.change_visibility(visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::mock::MockDom;
    use crate::geometry::Rect;
    use crate::store::test_fixtures::*;

    fn visible_ids(store: &Store, ids: &[&str]) -> Vec<String> {
        ids.iter()
            .filter(|id| store.get_element(id).unwrap().is_visible)
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn test_no_overflow_means_all_visible() {
        let mut store = Store::new();
        let mut dom = MockDom::new();

        let ids = ["a", "b", "c"];
        let sk = seed_list(&mut store, &mut dom, "list", &ids);

        update_branch_visibility(&mut store, &sk);
        assert_eq!(visible_ids(&store, &ids), ["a", "b", "c"]);
    }

    #[test]
    fn test_visibility_is_a_contiguous_band() {
        let mut store = Store::new();
        let mut dom = MockDom::new();

        // Viewport shows two of five rows.
        dom.add_node("list", Rect::new(0.0, 0.0, 100.0, 2.0 * ROW_HEIGHT));
        let ids = ["a", "b", "c", "d", "e"];
        let sk = seed_list(&mut store, &mut dom, "list", &ids);

        update_branch_visibility(&mut store, &sk);
        assert_eq!(visible_ids(&store, &ids), ["a", "b"]);

        // Scroll down one viewport: the band slides.
        store
            .scroll_mut(&sk)
            .unwrap()
            .scroll_to(0.0, 2.0 * ROW_HEIGHT);
        update_branch_visibility(&mut store, &sk);
        assert_eq!(visible_ids(&store, &ids), ["c", "d"]);
    }
}
