#![cfg(target_arch = "wasm32")]

use market_blur_wasm::application::BlurSink;
use market_blur_wasm::domain::visibility::{BlurTarget, PRICE_BLUR_CLASSES, OVERLAY_CLASSES};
use market_blur_wasm::infrastructure::DomBlurSink;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount(id: &str, class: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("span").unwrap();
    element.set_id(id);
    element.set_class_name(class);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn classes(list: &[&str]) -> Vec<String> {
    list.iter().map(|class| class.to_string()).collect()
}

fn has_markers(id: &str, classes: &[String]) -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
        .map(|element| classes.iter().all(|class| element.class_list().contains(class)))
        .unwrap_or(false)
}

#[wasm_bindgen_test]
fn markers_toggle_on_element_by_id() {
    let element = mount("slvUsdBid", "quote");
    let sink = DomBlurSink::new();
    let target = BlurTarget::element_id("slvUsdBid", &PRICE_BLUR_CLASSES);

    sink.add_markers(&target);
    sink.add_markers(&target);
    assert!(has_markers("slvUsdBid", &classes(&PRICE_BLUR_CLASSES)));
    assert_eq!(element.class_list().length(), 3);

    sink.remove_markers(&target);
    sink.remove_markers(&target);
    assert_eq!(element.class_name(), "quote");
    element.remove();
}

#[wasm_bindgen_test]
fn selector_targets_every_match() {
    let first = mount("timer-a", "sv-event-timer");
    let second = mount("timer-b", "sv-event-timer");
    let sink = DomBlurSink::new();
    let target = BlurTarget::selector(".sv-event-timer", &OVERLAY_CLASSES);

    sink.add_markers(&target);
    assert!(has_markers("timer-a", &classes(&OVERLAY_CLASSES)));
    assert!(has_markers("timer-b", &classes(&OVERLAY_CLASSES)));

    sink.remove_markers(&target);
    assert!(!has_markers("timer-a", &classes(&OVERLAY_CLASSES)));
    first.remove();
    second.remove();
}

#[wasm_bindgen_test]
fn missing_elements_are_skipped() {
    let sink = DomBlurSink::new();
    sink.add_markers(&BlurTarget::element_id("does-not-exist", &PRICE_BLUR_CLASSES));
    sink.remove_markers(&BlurTarget::selector(".nothing-here", &PRICE_BLUR_CLASSES));
}

#[wasm_bindgen_test]
fn invalid_class_token_does_not_block_the_rest() {
    let element = mount("slvKgBid", "quote");
    let sink = DomBlurSink::new();
    let target = BlurTarget::element_id("slvKgBid", &["not a token", "sv-blur-price"]);

    sink.add_markers(&target);
    assert!(element.class_list().contains("sv-blur-price"));
    assert!(!element.class_list().contains("not"));

    sink.remove_markers(&target);
    assert_eq!(element.class_name(), "quote");
    element.remove();
}
