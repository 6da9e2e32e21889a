use gloo::utils::document;
use wasm_bindgen::JsCast;
use web_sys::Element;

use crate::application::reconciliation::BlurSink;
use crate::domain::{
    logging::LogComponent,
    visibility::{BlurTarget, TargetLocator},
};
use crate::{log_debug, log_error};

/// Toggles marker classes on live page elements.
///
/// Elements are looked up on every call, so widgets re-rendered by the host
/// page pick up the current state on the next transition. Missing elements
/// are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomBlurSink;

impl DomBlurSink {
    pub fn new() -> Self {
        Self
    }

    fn resolve(target: &BlurTarget) -> Vec<Element> {
        let document = document();
        match &target.locator {
            TargetLocator::ElementId(id) => match document.get_element_by_id(id) {
                Some(element) => vec![element],
                None => {
                    log_debug!(LogComponent::Infrastructure("DOM"), "Element #{} not found", id);
                    Vec::new()
                }
            },
            TargetLocator::Selector(selector) => match document.query_selector_all(selector) {
                Ok(nodes) => (0..nodes.length())
                    .filter_map(|index| nodes.item(index))
                    .filter_map(|node| node.dyn_into::<Element>().ok())
                    .collect(),
                Err(_) => {
                    log_error!(LogComponent::Infrastructure("DOM"), "Invalid selector {}", selector);
                    Vec::new()
                }
            },
        }
    }
}

impl BlurSink for DomBlurSink {
    fn add_markers(&self, target: &BlurTarget) {
        for element in Self::resolve(target) {
            let classes = element.class_list();
            for class in &target.classes {
                if !classes.contains(class) && classes.add_1(class).is_err() {
                    log_error!(LogComponent::Infrastructure("DOM"), "Cannot add class {:?}", class);
                }
            }
        }
    }

    fn remove_markers(&self, target: &BlurTarget) {
        for element in Self::resolve(target) {
            let classes = element.class_list();
            for class in &target.classes {
                if classes.contains(class) && classes.remove_1(class).is_err() {
                    log_error!(LogComponent::Infrastructure("DOM"), "Cannot remove class {:?}", class);
                }
            }
        }
    }
}
