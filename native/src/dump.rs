use std::io::{self, Write};

use cascada_core::dom::Node;
use cascada_core::style::{StyledNode, Value, ValueKind};

// ノードごとに一行。プロパティは名前順で、typed なら型付きの解釈も添える
pub fn write_styled_node<W: Write>(out: &mut W, node: &StyledNode<'_>, depth: usize, typed: bool) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match node.node {
        Node::Element(elem) => {
            write!(out, "{}<{}", indent, elem.tag_name)?;
            if let Some(id) = elem.id() {
                write!(out, "#{}", id)?;
            }
            let mut classes: Vec<&str> = elem.classes().into_iter().collect();
            classes.sort_unstable();
            for class in classes {
                write!(out, ".{}", class)?;
            }
            write!(out, ">")?;
        }
        Node::Text(text) => write!(out, "{}{:?}", indent, text)?,
    }

    let mut names: Vec<&String> = node.specified_values.keys().collect();
    names.sort();
    if !names.is_empty() {
        let values: Vec<String> = names
            .iter()
            .map(|name| format_property(name, &node.specified_values[*name], typed))
            .collect();
        write!(out, " {{{}}}", values.join("; "))?;
    }
    writeln!(out)?;

    for child in &node.children {
        write_styled_node(out, child, depth + 1, typed)?;
    }
    Ok(())
}

fn format_property(name: &str, value: &Value, typed: bool) -> String {
    match describe(value.kind()) {
        Some(kind) if typed => format!("{}: {} ({})", name, value, kind),
        _ => format!("{}: {}", name, value),
    }
}

fn describe(kind: &ValueKind) -> Option<String> {
    match kind {
        ValueKind::Keyword => None,
        ValueKind::Number(n) => Some(format!("number {}", n)),
        ValueKind::Length(n, unit) => Some(format!("length {} {:?}", n, unit)),
        ValueKind::Percentage(n) => Some(format!("percentage {}", n)),
        ValueKind::Color(c) => Some(format!("rgba({}, {}, {}, {})", c.r, c.g, c.b, c.a)),
    }
}
