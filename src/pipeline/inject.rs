//! Placeholder injection.
//!
//! Replaces each directive with one rule per image. Ratio 1 rules take the
//! directive's place; retina rules are collected into one media block per
//! ratio, emitted after them.

use crate::asset::{name, Asset};
use crate::config::Config;
use crate::document::{AtRule, Declaration, Node, Placeholder, Raws, Rule, Stylesheet};

use super::extract::{Directive, DIRECTIVE};

/// Media queries matching 2x displays.
pub const RESOLUTIONS_2X: &[&str] = &[
    "only screen and (-webkit-min-device-pixel-ratio: 2)",
    "only screen and (min--moz-device-pixel-ratio: 2)",
    "only screen and (-o-min-device-pixel-ratio: 2/1)",
    "only screen and (min-device-pixel-ratio: 2)",
    "only screen and (min-resolution: 2dppx)",
    "only screen and (min-resolution: 192dpi)",
];

/// Media queries matching 3x displays.
pub const RESOLUTIONS_3X: &[&str] = &[
    "only screen and (-webkit-min-device-pixel-ratio: 3)",
    "only screen and (min-resolution: 3dppx)",
];

/// Media query params for `ratio`, if it has a block of its own.
pub fn media_params(ratio: u32) -> Option<String> {
    match ratio {
        2 => Some(RESOLUTIONS_2X.join(", ")),
        3 => Some(RESOLUTIONS_3X.join(", ")),
        _ => None,
    }
}

/// Container rule shared by every sprite of a directive.
fn extra_css_rule(directive: &Directive, config: &Config) -> Node {
    let nodes = [
        ("display", "inline-block"),
        ("overflow", "hidden"),
        ("font-size", "0"),
        ("line-height", "0"),
    ]
    .into_iter()
    .map(|(prop, value)| Node::Declaration(Declaration::new(prop, value)))
    .collect();

    Node::Rule(Rule::new(
        format!(".{}{}", config.name_space, directive.block_name()),
        nodes,
    ))
}

fn placeholder_rule(asset: &Asset, directive: &Directive, config: &Config) -> Node {
    let block = directive.block.as_deref().unwrap_or(&asset.dir);
    let selector = format!(
        ".{}{}",
        config.name_space,
        name::selector(block, &config.css_separator, &asset.name)
    );

    let mut rule = Rule::new(selector, vec![Node::Placeholder(Placeholder::new(&asset.path))]);
    rule.raws = Raws {
        before: None,
        between: directive.hints.between.clone(),
        // Retina rules sit one level deeper than the neighbour the hint came from.
        after: directive.hints.after.clone().filter(|_| !asset.is_retina()),
    };
    Node::Rule(rule)
}

/// Nodes that replace one directive.
fn expand(directive: &Directive, assets: &[Asset], config: &Config) -> Vec<Node> {
    let mut nodes = Vec::new();
    if config.output_extra_css {
        nodes.push(extra_css_rule(directive, config));
    }

    let mut retina_2x = Vec::new();
    let mut retina_3x = Vec::new();

    for asset in assets.iter().filter(|a| a.source_dir == directive.source_dir) {
        let rule = placeholder_rule(asset, directive, config);
        match asset.ratio {
            2 => retina_2x.push(rule),
            3 => retina_3x.push(rule),
            _ => nodes.push(rule),
        }
    }

    for (ratio, rules) in [(2, retina_2x), (3, retina_3x)] {
        if rules.is_empty() {
            continue;
        }
        if let Some(params) = media_params(ratio) {
            nodes.push(Node::AtRule(AtRule::block("media", params, rules)));
        }
    }

    nodes
}

/// Replace every directive in `sheet` with its placeholder rules.
///
/// `directives` must be in document order, as returned by extraction.
pub fn inject_tokens(sheet: &mut Stylesheet, assets: &[Asset], directives: &[Directive], config: &Config) {
    let mut next = directives.iter();
    sheet.expand_at_rules(DIRECTIVE, |_| match next.next() {
        Some(directive) => expand(directive, assets, config),
        None => Vec::new(),
    });
}
