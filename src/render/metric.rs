//! Metric card builder.

use crate::content::Metric;
use crate::dom::Element;

/// Build one metric card.
///
/// ```text
/// div.metric-card
/// ├── span.metric-icon         (only with a non-empty icon)
/// ├── span.metric-value
/// ├── span.metric-label
/// └── p.metric-description     (optional)
/// ```
///
/// Every call returns a fresh subtree, so the same metric can appear in the
/// hero strip and in the grid at once.
pub fn create_metric_card(metric: &Metric) -> Element {
    let icon = metric.icon().map(|icon| {
        Element::with_class("span", "metric-icon")
            .attr("data-icon", icon)
            .attr("aria-hidden", "true")
    });
    let description = metric
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| Element::with_class("p", "metric-description").text(d));

    Element::with_class("div", "metric-card")
        .child_opt(icon)
        .child(Element::with_class("span", "metric-value").text(metric.value.clone()))
        .child(Element::with_class("span", "metric-label").text(metric.label.clone()))
        .child_opt(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_structure() {
        let card = create_metric_card(&Metric::new("30%", "faster onboarding"));
        assert_eq!(
            card.to_html(),
            r#"<div class="metric-card"><span class="metric-value">30%</span><span class="metric-label">faster onboarding</span></div>"#
        );
    }

    #[test]
    fn test_icon_and_description() {
        let metric = Metric {
            icon: Some("rocket".into()),
            description: Some("since launch".into()),
            ..Metric::new("x1.5", "throughput")
        };
        let card = create_metric_card(&metric);
        assert_eq!(
            card.find_by_class("metric-icon").and_then(|e| e.get_attr("data-icon")),
            Some("rocket")
        );
        assert_eq!(
            card.find_by_class("metric-description").map(Element::text_content),
            Some("since launch".into())
        );
    }

    #[test]
    fn test_empty_icon_omitted() {
        let metric = Metric {
            icon: Some(String::new()),
            ..Metric::new("CEO", "reported to")
        };
        assert!(create_metric_card(&metric).find_by_class("metric-icon").is_none());
    }

    #[test]
    fn test_cards_are_independent() {
        let metric = Metric::new("30%", "faster onboarding");
        let hero = create_metric_card(&metric);
        let mut grid = create_metric_card(&metric);

        grid.find_by_class_mut("metric-value")
            .unwrap()
            .replace_children(Element::new("b").text("changed"));

        assert_eq!(
            hero.find_by_class("metric-value").map(Element::text_content),
            Some("30%".into())
        );
        assert_eq!(
            grid.find_by_class("metric-value").map(Element::text_content),
            Some("changed".into())
        );
    }
}
