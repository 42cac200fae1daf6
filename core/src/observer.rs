//! Parser events for callers that want diagnostics. The parsers never log on their own.

use crate::css::Rule;

pub trait ParseObserver {
    fn element_opened(&mut self, _tag_name: &str) {}

    fn element_closed(&mut self, _tag_name: &str) {}

    fn attribute(&mut self, _name: &str, _value: &str) {}

    fn text(&mut self, _value: &str) {}

    /// An element reached end of input without its closing tag.
    fn unterminated(&mut self, _tag_name: &str) {}

    fn rule(&mut self, _rule: &Rule) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ParseObserver for NoopObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn element_opened(&mut self, tag_name: &str) {
        tracing::trace!(tag = tag_name, "open element");
    }

    fn element_closed(&mut self, tag_name: &str) {
        tracing::trace!(tag = tag_name, "close element");
    }

    fn attribute(&mut self, name: &str, value: &str) {
        tracing::trace!(name, value, "attribute");
    }

    fn text(&mut self, value: &str) {
        tracing::trace!(len = value.len(), "text");
    }

    fn unterminated(&mut self, tag_name: &str) {
        tracing::debug!(tag = tag_name, "element not closed before end of input");
    }

    fn rule(&mut self, rule: &Rule) {
        tracing::debug!(
            selectors = rule.selectors.len(),
            declarations = rule.declarations.len(),
            "rule"
        );
    }
}
