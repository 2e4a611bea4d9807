//! Hero-region story hook.

use crate::content::HeroHook;
use crate::dom::Element;

/// Render the hero hook into a `case-study-hook` element.
///
/// A quote becomes a `<blockquote>` with optional attribution and context;
/// a teaser becomes a single paragraph.
pub fn render_hero_hook(hook: &HeroHook) -> Element {
    match hook {
        HeroHook::Quote(story) => {
            let attribution = story
                .attribution
                .as_deref()
                .filter(|a| !a.trim().is_empty())
                .map(|a| Element::with_class("cite", "hook-attribution").text(a));
            let context = story
                .context
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(|c| Element::with_class("p", "hook-context").text(c));

            let mut quote = Element::with_class("blockquote", "case-study-hook")
                .child(Element::with_class("p", "hook-quote").text(story.quote.clone()))
                .child_opt(attribution)
                .child_opt(context);
            quote.add_class("hook-quote-block");
            quote
        }
        HeroHook::Teaser(text) => {
            let mut teaser = Element::with_class("p", "case-study-hook").text(text.clone());
            teaser.add_class("hook-teaser");
            teaser
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::block::StoryHook;

    #[test]
    fn test_quote_hook() {
        let hook = HeroHook::Quote(StoryHook {
            quote: "How did we get here?".into(),
            attribution: Some("CTO".into()),
            context: None,
        });
        let elem = render_hero_hook(&hook);
        assert_eq!(elem.tag, "blockquote");
        assert!(elem.has_class("case-study-hook"));
        assert!(elem.text_content().contains("How did we get here?"));
        assert!(elem.find_by_class("hook-attribution").is_some());
        assert!(elem.find_by_class("hook-context").is_none());
    }

    #[test]
    fn test_teaser_hook() {
        let elem = render_hero_hook(&HeroHook::Teaser("Short hook".into()));
        assert_eq!(
            elem.to_html(),
            r#"<p class="case-study-hook hook-teaser">Short hook</p>"#
        );
    }
}
