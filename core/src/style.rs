// NOTE: https://limpet.net/mbrubeck/2014/08/23/toy-layout-engine-4-style.html

use std::collections::HashMap;
use std::fmt;

use crate::css::{self, Declaration, Rule, Selector};
use crate::dom::{ElementData, Node, Tree};

pub type PropertyMap = HashMap<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct StyledNode<'a> {
    pub node: &'a Node,
    pub specified_values: PropertyMap,
    pub children: Vec<StyledNode<'a>>,
}

impl<'a> StyledNode<'a> {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.specified_values.get(name)
    }
}

// NOTE: 宣言された文字列をそのまま保持し、型付きの解釈は kind に入れる
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    raw: String,
    kind: ValueKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    Keyword,
    Number(f64),
    Length(f64, Unit),
    Percentage(f64),
    Color(Color),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Px,
    Em,
    Rem,
    Pt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Value {
    pub fn parse(raw: &str) -> Value {
        let raw = raw.trim();
        Value {
            raw: raw.to_string(),
            kind: ValueKind::parse(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }
}

impl ValueKind {
    // 数値・長さ・パーセント・16進カラー以外はキーワード
    fn parse(raw: &str) -> ValueKind {
        if let Some(color) = raw.strip_prefix('#').and_then(Color::from_hex) {
            return ValueKind::Color(color);
        }
        parse_numeric(raw).unwrap_or(ValueKind::Keyword)
    }
}

fn parse_numeric(raw: &str) -> Option<ValueKind> {
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(split);
    let number: f64 = number.parse().ok()?;
    match &*suffix.to_ascii_lowercase() {
        "" => Some(ValueKind::Number(number)),
        "%" => Some(ValueKind::Percentage(number)),
        "px" => Some(ValueKind::Length(number, Unit::Px)),
        "em" => Some(ValueKind::Length(number, Unit::Em)),
        "rem" => Some(ValueKind::Length(number, Unit::Rem)),
        "pt" => Some(ValueKind::Length(number, Unit::Pt)),
        _ => None,
    }
}

impl Color {
    // `rgb` か `rrggbb` (先頭の # は含まない)
    pub fn from_hex(hex: &str) -> Option<Color> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Color { r: short(0)?, g: short(1)?, b: short(2)?, a: 255 })
            }
            6 => Some(Color {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: 255,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

const INHERIT_PROPS: [&str; 4] = ["color", "font-size", "font-weight", "line-height"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Any populated axis matching is enough: `div.warn` matches every `div`
    /// and every `.warn`.
    #[default]
    AnyAxis,
    /// Every populated axis has to match, as a compound selector.
    AllAxes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CascadeOptions {
    pub inheritable: Vec<String>,
    pub matching: MatchPolicy,
}

impl Default for CascadeOptions {
    fn default() -> Self {
        CascadeOptions {
            inheritable: INHERIT_PROPS.iter().map(|p| p.to_string()).collect(),
            matching: MatchPolicy::default(),
        }
    }
}

pub fn resolve<'a>(tree: &'a Tree<Node>, rules: &[Rule]) -> Tree<StyledNode<'a>> {
    resolve_with(tree, rules, &CascadeOptions::default())
}

pub fn resolve_with<'a>(
    tree: &'a Tree<Node>,
    rules: &[Rule],
    options: &CascadeOptions,
) -> Tree<StyledNode<'a>> {
    let cascade = Cascade { rules, options };
    tree.map(|root| cascade.style_node(root, None))
}

pub fn style_tree<'a>(root: &'a Node, rules: &[Rule]) -> StyledNode<'a> {
    let options = CascadeOptions::default();
    let cascade = Cascade {
        rules,
        options: &options,
    };
    cascade.style_node(root, None)
}

struct Cascade<'r> {
    rules: &'r [Rule],
    options: &'r CascadeOptions,
}

impl<'r> Cascade<'r> {
    // 親から子へ順に値を決めていく
    fn style_node<'a>(&self, node: &'a Node, parent: Option<&PropertyMap>) -> StyledNode<'a> {
        let specified_values = match node {
            Node::Element(elem) => self.specified_values(elem, parent),
            Node::Text(_) => self.inherited_values(parent),
        };
        let children = node
            .children()
            .iter()
            .map(|child| self.style_node(child, Some(&specified_values)))
            .collect();
        StyledNode {
            node,
            specified_values,
            children,
        }
    }

    fn inherited_values(&self, parent: Option<&PropertyMap>) -> PropertyMap {
        let mut values = PropertyMap::new();
        if let Some(parent) = parent {
            for prop_name in &self.options.inheritable {
                if let Some(x) = parent.get(prop_name) {
                    values.insert(prop_name.clone(), x.clone());
                }
            }
        }
        values
    }

    // その要素に渡すDeclarationのプロパティ名と値のマップを返す
    fn specified_values(&self, elem: &ElementData, parent: Option<&PropertyMap>) -> PropertyMap {
        let mut values = self.inherited_values(parent);

        // 後に書かれたルールが前のルールを上書きする
        for rule in self.rules {
            if is_match(elem, &rule.selectors, self.options.matching) {
                apply_declarations(&mut values, &rule.declarations, parent);
            }
        }

        if let Some(inline) = elem.inline_style() {
            apply_declarations(&mut values, &css::parse_declarations(inline), parent);
        }
        values
    }
}

fn apply_declarations(values: &mut PropertyMap, declarations: &[Declaration], parent: Option<&PropertyMap>) {
    for declaration in declarations {
        if declaration.value == "inherit" {
            match parent.and_then(|p| p.get(&declaration.name)) {
                Some(x) => {
                    values.insert(declaration.name.clone(), x.clone());
                }
                None => {
                    values.remove(&declaration.name);
                }
            }
        } else {
            values.insert(declaration.name.clone(), Value::parse(&declaration.value));
        }
    }
}

pub fn is_match(elem: &ElementData, selectors: &[Selector], policy: MatchPolicy) -> bool {
    selectors.iter().any(|selector| matches(elem, selector, policy))
}

pub fn matches(elem: &ElementData, selector: &Selector, policy: MatchPolicy) -> bool {
    if selector.is_empty() {
        return false;
    }
    match policy {
        MatchPolicy::AnyAxis => matches_any_axis(elem, selector),
        MatchPolicy::AllAxes => matches_all_axes(elem, selector),
    }
}

fn matches_any_axis(elem: &ElementData, selector: &Selector) -> bool {
    if selector.is_universal() || selector.tag_name.as_deref() == Some(elem.tag_name.as_str()) {
        return true;
    }
    if selector.id.is_some() && selector.id.as_deref() == elem.id() {
        return true;
    }
    let elem_classes = elem.classes();
    selector.classes().any(|class| elem_classes.contains(class))
}

fn matches_all_axes(elem: &ElementData, selector: &Selector) -> bool {
    if selector
        .tag_name
        .iter()
        .any(|name| name != "*" && elem.tag_name != *name)
    {
        return false;
    }

    if selector.id.iter().any(|id| elem.id() != Some(id.as_str())) {
        return false;
    }

    let elem_classes = elem.classes();
    selector.classes().all(|class| elem_classes.contains(class))
}
