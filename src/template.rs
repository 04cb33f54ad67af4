//! # Template Rendering Module
//!
//! Renders the two fixed documents HtmlSift produces with Handlebars: the
//! minimal HTML shell handed to the converter, and the front matter block
//! prefixed to every output document.
//!
//! HTML escaping is disabled. Fragments are already serialized HTML and front
//! matter values are written verbatim, so escaping either would corrupt the
//! output.

use crate::core::error::{HtmlSiftError, Result};
use crate::extract::Fragment;
use crate::frontmatter::FrontMatter;
use handlebars::Handlebars;
use serde_json::json;
use std::fmt;

/// Template name of the HTML shell.
pub const SHELL_TEMPLATE: &str = "shell";

/// Template name of the front matter block.
pub const FRONT_MATTER_TEMPLATE: &str = "front_matter";

const SHELL_SOURCE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
</head>
<body>
{{{body}}}
</body>
</html>"#;

const FRONT_MATTER_SOURCE: &str = r#"---
title: "{{title}}"
description: "{{description}}"
meta_title: "{{meta_title}}"
author: "{{author}}"
date: {{date}}
categories: [{{#each categories}}"{{this}}"{{#unless @last}}, {{/unless}}{{/each}}]
image: "{{image}}"
tags: [{{#each tags}}"{{this}}"{{#unless @last}}, {{/unless}}{{/each}}]
draft: {{draft}}
---

"#;

/// Renderer for the shell and front matter templates.
pub struct ShellRenderer {
    engine: Handlebars<'static>,
}

impl fmt::Debug for ShellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellRenderer")
            .field("templates", &[SHELL_TEMPLATE, FRONT_MATTER_TEMPLATE])
            .finish()
    }
}

impl ShellRenderer {
    /// Creates a renderer with both templates registered in strict mode.
    pub fn new() -> Result<Self> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_escape_fn(handlebars::no_escape);

        for (name, source) in [
            (SHELL_TEMPLATE, SHELL_SOURCE),
            (FRONT_MATTER_TEMPLATE, FRONT_MATTER_SOURCE),
        ] {
            engine.register_template_string(name, source).map_err(|e| {
                HtmlSiftError::template_rendering_error(
                    format!("Failed to register template: {}", e),
                    name,
                )
            })?;
        }

        Ok(Self { engine })
    }

    /// Joins `fragments` with newlines and embeds them in the HTML shell.
    pub fn render_shell(&self, fragments: &[Fragment]) -> Result<String> {
        let body = fragments
            .iter()
            .map(Fragment::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        self.render(SHELL_TEMPLATE, &json!({ "body": body }))
    }

    /// Renders the `---` delimited front matter block, blank line included.
    pub fn render_front_matter(
        &self,
        front_matter: &FrontMatter,
    ) -> Result<String> {
        self.render(FRONT_MATTER_TEMPLATE, front_matter)
    }

    fn render<T: serde::Serialize>(
        &self,
        template: &str,
        data: &T,
    ) -> Result<String> {
        self.engine.render(template, data).map_err(|e| {
            HtmlSiftError::template_rendering_error(e.to_string(), template)
        })
    }
}
