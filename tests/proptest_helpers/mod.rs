#![allow(dead_code)]

use scanlabel::ir::{BoundingBox, BoxClass, Pixel, RawComponent, Rect};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A component somewhere on a `page x page` sheet. Areas span noise,
/// diacritic and primary sizes under the default thresholds.
pub fn arb_component(page: u32) -> BoxedStrategy<RawComponent> {
    (0..page, 0..page, 1u32..=120, 1u32..=120, 0u64..=3000)
        .prop_map(|(left, top, width, height, area)| {
            RawComponent::new(left, top, width, height, area)
        })
        .boxed()
}

pub fn arb_components(page: u32, max: usize) -> BoxedStrategy<Vec<RawComponent>> {
    proptest::collection::vec(arb_component(page), 0..=max).boxed()
}

/// Integer-aligned boxes with ids `1..=n`. Whole-pixel geometry keeps
/// every sum the ordering code takes exact.
pub fn arb_boxes(page: u32, max: usize) -> BoxedStrategy<Vec<BoundingBox>> {
    proptest::collection::vec(
        (0..page, 0..page, 5u32..=60, 5u32..=60, arb_class()),
        0..=max,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .filter_map(|(i, (x, y, w, h, class))| {
                BoundingBox::new(
                    (i + 1) as u64,
                    Rect::new(x as f64, y as f64, w as f64, h as f64),
                    0,
                    class,
                )
            })
            .collect()
    })
    .boxed()
}

/// One primary and the diacritics placed within its default reach.
#[derive(Clone, Debug)]
pub struct GlyphGroup {
    pub primary: RawComponent,
    pub diacritics: Vec<RawComponent>,
}

/// Up to `max_groups` glyph groups, one per 300px grid cell so no two
/// groups can reach each other under the default tolerances. Each
/// diacritic sits above or below its primary, within 14px of the edge.
pub fn arb_glyph_groups(max_groups: usize) -> BoxedStrategy<Vec<GlyphGroup>> {
    let diacritic = (3u32..=10, 3u32..=10, 101u64..=499, any::<bool>(), 0u32..=14, 0u32..=1000);
    let group = (
        30u32..=80,
        20u32..=60,
        501u64..=5000,
        proptest::collection::vec(diacritic, 0..=3),
    );
    proptest::collection::vec(group, 1..=max_groups)
        .prop_map(|groups| {
            groups
                .into_iter()
                .enumerate()
                .map(|(cell, (pw, ph, parea, marks))| {
                    let left = 50 + (cell as u32 % 3) * 300;
                    let top = 50 + (cell as u32 / 3) * 300;
                    let primary = RawComponent::new(left, top, pw, ph, parea);
                    let diacritics = marks
                        .into_iter()
                        .map(|(dw, dh, area, above, gap, slide)| {
                            let dleft = left + slide % (pw - dw + 1);
                            let dtop = if above { top - dh - gap } else { top + ph + gap };
                            RawComponent::new(dleft, dtop, dw, dh, area)
                        })
                        .collect();
                    GlyphGroup {
                        primary,
                        diacritics,
                    }
                })
                .collect()
        })
        .boxed()
}

pub fn arb_class() -> BoxedStrategy<Option<BoxClass>> {
    prop_oneof![
        Just(None),
        Just(Some(BoxClass::PrimarySubject)),
        Just(Some(BoxClass::SecondaryMark)),
        Just(Some(BoxClass::FrameRegion)),
    ]
    .boxed()
}

pub fn ids(boxes: &[BoundingBox]) -> Vec<u64> {
    boxes.iter().map(|b| b.id().as_u64()).collect()
}

/// True if `inner` lies entirely within `outer` (edges may touch).
pub fn encloses(outer: &Rect<Pixel>, inner: &Rect<Pixel>) -> bool {
    outer.x <= inner.x
        && outer.y <= inner.y
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}
