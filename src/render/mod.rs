//! Content-block rendering.
//!
//! [`BlockRegistry`] maps a block tag to a renderer. A renderer decodes its
//! own payload struct and builds one `<section>` subtree. Unknown tags,
//! `story-hook` blocks and blocks that fail to decode all render to `None`;
//! the caller simply omits them.
//!
//! ```ignore
//! let block = ContentBlock::new(json!({"type": "key-insight", "text": "Ship early"}));
//! let section = render_block(&block, &project).unwrap();
//! assert!(section.text_content().contains("Ship early"));
//! ```

mod blocks;
mod hero;
mod metric;

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::content::block::tag;
use crate::content::{BlockPayload, ContentBlock, ProjectEntry, SchemaError};
use crate::debug;
use crate::dom::Element;

pub use hero::render_hero_hook;
pub use metric::create_metric_card;

/// Class carried by every rendered block root.
pub const BLOCK_CLASS: &str = "content-block";

/// Tags whose root carries the project's `theme-*` class.
const ACCENTED: &[&str] = &[
    tag::TIMELINE_PROCESS,
    tag::KEY_INSIGHT,
    tag::METRICS_INLINE,
    tag::BEFORE_AFTER,
];

/// What a renderer sees besides its payload.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub tag: &'a str,
    pub project: &'a ProjectEntry,
}

impl BlockContext<'_> {
    /// Root element of a rendered block.
    ///
    /// `<section class="content-block block-{tag}" data-block-type="{tag}">`,
    /// plus `theme-{name}` for accented tags.
    pub fn section(&self) -> Element {
        let mut section = Element::with_class("section", BLOCK_CLASS)
            .attr("data-block-type", self.tag);
        section.add_class(&format!("block-{}", self.tag));
        if ACCENTED.contains(&self.tag) {
            section.add_class(&self.project.theme.class());
        }
        section
    }
}

type Renderer =
    Box<dyn Fn(&ContentBlock, BlockContext<'_>) -> Result<Element, SchemaError> + Send + Sync>;

/// Tag -> renderer dispatch table.
pub struct BlockRegistry {
    renderers: FxHashMap<String, Renderer>,
}

impl BlockRegistry {
    /// A registry with no renderers; every block renders to `None`.
    pub fn empty() -> Self {
        Self {
            renderers: FxHashMap::default(),
        }
    }

    /// A registry with every built-in block type.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        blocks::register_builtin(&mut registry);
        registry
    }

    /// Register (or replace) the renderer for `tag`.
    ///
    /// The payload is decoded as `T` before `render` is called; a decode
    /// failure skips the block.
    pub fn register<T, F>(&mut self, tag: &str, render: F)
    where
        T: BlockPayload + 'static,
        F: Fn(&T, BlockContext<'_>) -> Element + Send + Sync + 'static,
    {
        let renderer: Renderer = Box::new(move |block: &ContentBlock, ctx: BlockContext<'_>| {
            let payload = block.decode::<T>()?;
            Ok(render(&payload, ctx))
        });
        self.renderers.insert(tag.to_string(), renderer);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    /// Render one block, or `None` when it should be omitted.
    pub fn render(&self, block: &ContentBlock, project: &ProjectEntry) -> Option<Element> {
        let Some(tag) = block.tag() else {
            debug!("render"; "skipping block without `type` in `{}`", project.id);
            return None;
        };
        // shown in the hero, never in the body
        if tag == tag::STORY_HOOK {
            return None;
        }
        let Some(renderer) = self.renderers.get(tag) else {
            debug!("render"; "skipping unknown block type `{}` in `{}`", tag, project.id);
            return None;
        };
        match renderer(block, BlockContext { tag, project }) {
            Ok(element) => Some(element),
            Err(err) => {
                debug!("render"; "skipping block in `{}`: {}", project.id, err);
                None
            }
        }
    }

    /// Render blocks in order, dropping the ones that render to `None`.
    pub fn render_all<'a>(
        &'a self,
        blocks: &'a [ContentBlock],
        project: &'a ProjectEntry,
    ) -> impl Iterator<Item = Element> + 'a {
        blocks.iter().filter_map(move |block| self.render(block, project))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN: LazyLock<BlockRegistry> = LazyLock::new(BlockRegistry::builtin);

/// Render one block with the built-in registry.
pub fn render_block(block: &ContentBlock, project: &ProjectEntry) -> Option<Element> {
    BUILTIN.render(block, project)
}

/// The shared built-in registry.
pub fn builtin_registry() -> &'static BlockRegistry {
    &BUILTIN
}
