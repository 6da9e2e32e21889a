use serde::{Deserialize, Serialize};

pub const PRICE_BLUR_CLASSES: [&str; 2] = ["sv-blur-price", "sv-price-blurred"];
pub const OVERLAY_CLASSES: [&str; 2] = ["sv-blur-overlay", "sv-market-closed"];

const SILVER_PRICE_IDS: [&str; 7] = [
    "slvUsdBid",
    "slvUsdOffer",
    "slvKgBid",
    "slvKgOffer",
    "slvKgVat",
    "slvUsdChg",
    "slvKgChg",
];

/// How a target is located on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetLocator {
    /// A single element by id.
    ElementId(String),
    /// Every element matching a CSS selector.
    Selector(String),
}

/// One page target plus the marker classes toggled on it while blurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlurTarget {
    pub locator: TargetLocator,
    pub classes: Vec<String>,
}

impl BlurTarget {
    pub fn element_id(id: &str, classes: &[&str]) -> Self {
        Self { locator: TargetLocator::ElementId(id.to_string()), classes: to_owned(classes) }
    }

    pub fn selector(selector: &str, classes: &[&str]) -> Self {
        Self { locator: TargetLocator::Selector(selector.to_string()), classes: to_owned(classes) }
    }
}

fn to_owned(classes: &[&str]) -> Vec<String> {
    classes.iter().map(|class| class.to_string()).collect()
}

/// Fixed set of elements obscured while the market is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetElementSet(Vec<BlurTarget>);

impl TargetElementSet {
    pub fn new(targets: Vec<BlurTarget>) -> Self {
        Self(targets)
    }

    /// Silver quote page: price fields, VAT labels and event timers.
    pub fn silver_quotes() -> Self {
        let mut targets: Vec<BlurTarget> = SILVER_PRICE_IDS
            .iter()
            .map(|id| BlurTarget::element_id(id, &PRICE_BLUR_CLASSES))
            .collect();
        targets.push(BlurTarget::selector(".sv-vat-label", &PRICE_BLUR_CLASSES));
        targets.push(BlurTarget::selector(".sv-event-timer", &OVERLAY_CLASSES));
        Self(targets)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlurTarget> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TargetElementSet {
    fn default() -> Self {
        Self::silver_quotes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silver_set_covers_prices_labels_and_timers() {
        let set = TargetElementSet::silver_quotes();
        assert_eq!(set.len(), 9);
        let timer = set.iter().last().unwrap();
        assert_eq!(timer.locator, TargetLocator::Selector(".sv-event-timer".to_string()));
        assert_eq!(timer.classes, vec!["sv-blur-overlay", "sv-market-closed"]);
    }

    #[test]
    fn targets_deserialize_from_host_config() {
        let set: TargetElementSet = serde_json::from_str(
            r#"[{"locator":{"elementId":"goldBid"},"classes":["blurred"]},
                {"locator":{"selector":".quote"},"classes":["blurred","dim"]}]"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap().locator, TargetLocator::ElementId("goldBid".to_string()));
    }
}
