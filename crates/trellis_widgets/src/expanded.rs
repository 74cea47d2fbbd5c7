//! Flexible children of a Column or Row

use std::rc::Rc;

use trellis_core::{Constraints, Point, Size};
use trellis_layout::prelude::*;
use trellis_platform::PlatformError;

/// Makes its child fill a share of the free main-axis space of the
/// enclosing [`Column`](crate::Column) or [`Row`](crate::Row).
///
/// The free space is split between all `Expanded` siblings in proportion
/// to their `flex`. Outside a flex container it passes its constraints
/// straight through.
#[derive(Clone)]
pub struct Expanded {
    id: Option<WidgetId>,
    child: Option<WidgetRef>,
    flex: i32,
}

impl Default for Expanded {
    fn default() -> Self {
        Self {
            id: None,
            child: None,
            flex: 1,
        }
    }
}

impl Expanded {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<WidgetId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn child(mut self, child: impl Widget) -> Self {
        self.child = Some(Rc::new(child));
        self
    }

    pub fn shared_child(mut self, child: WidgetRef) -> Self {
        self.child = Some(child);
        self
    }

    /// Weight of this child's share. Negative values count as zero.
    pub fn flex(mut self, flex: i32) -> Self {
        self.flex = flex;
        self
    }

    pub(crate) fn weight(&self) -> i32 {
        self.flex.max(0)
    }
}

impl Widget for Expanded {
    fn widget_id(&self) -> Option<&WidgetId> {
        self.id.as_ref()
    }

    fn create_element(&self, _cx: &mut BuildCx<'_>) -> std::result::Result<ElementParts, PlatformError> {
        Ok(ElementParts::new().with_layouter(ExpandedLayouter))
    }

    fn kind(&self) -> WidgetKind<'_> {
        WidgetKind::Container(self)
    }
}

impl Container for Expanded {
    fn num_children(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn child(&self, n: usize) -> WidgetRef {
        match (&self.child, n) {
            (Some(child), 0) => child.clone(),
            _ => panic!("Expanded has no child {n}"),
        }
    }
}

struct ExpandedLayouter;

impl Layouter for ExpandedLayouter {
    fn layout(&mut self, cx: &mut LayoutCx<'_>, constraints: Constraints) -> Result<Size> {
        let Some(&child) = cx.children().first() else {
            return Ok(constraints.min_size());
        };
        let size = cx.layout_child(child, constraints)?;
        cx.check_overflow(child, size, constraints)?;
        Ok(size)
    }

    fn position_at(&mut self, cx: &mut LayoutCx<'_>, position: Point) -> Result<()> {
        for child in cx.children() {
            cx.position_child(child, position)?;
        }
        Ok(())
    }
}

/// Split `available` between weights.
///
/// Returns one entry per weight. When every weight is zero there is nothing
/// to share and every entry is `None`. Otherwise each positive weight gets
/// its rounded-down share, the last positive weight takes whatever rounding
/// left over, and zero weights get zero.
pub(crate) fn distribute(available: i32, weights: impl IntoIterator<Item = i32>) -> Vec<Option<i32>> {
    let weights: Vec<i32> = weights.into_iter().map(|w| w.max(0)).collect();
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    if total == 0 {
        return vec![None; weights.len()];
    }

    let last = weights.iter().rposition(|&w| w > 0);
    let mut remaining = available;
    weights
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let share = if Some(i) == last {
                remaining
            } else {
                (i64::from(w) * i64::from(available) / total) as i32
            };
            remaining -= share;
            Some(share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribute_by_weight() {
        assert_eq!(distribute(90, [1, 2]), vec![Some(30), Some(60)]);
    }

    #[test]
    fn test_last_positive_weight_takes_remainder() {
        assert_eq!(distribute(100, [1, 1, 1]), vec![Some(33), Some(33), Some(34)]);
        assert_eq!(distribute(100, [1, 1, 0]), vec![Some(50), Some(50), Some(0)]);
    }

    #[test]
    fn test_negative_weights_count_as_zero() {
        assert_eq!(distribute(60, [-3, 1]), vec![Some(0), Some(60)]);
    }

    #[test]
    fn test_zero_total_shares_nothing() {
        assert_eq!(distribute(60, [0, -1]), vec![None, None]);
        assert!(distribute(60, []).is_empty());
    }

    #[test]
    fn test_expanded_defaults_to_weight_one() {
        assert_eq!(Expanded::new().weight(), 1);
        assert_eq!(Expanded::new().flex(-4).weight(), 0);
        assert_eq!(Expanded::new().num_children(), 0);
    }
}
