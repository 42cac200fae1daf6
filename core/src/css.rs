// NOTE: 参考: https://limpet.net/mbrubeck/2014/08/13/toy-layout-engine-3-css.html

use crate::cursor::{is_identifier_char, Cursor};
use crate::error::{Error, Result};
use crate::observer::{NoopObserver, ParseObserver};

// セレクタ達とdeclaration達の塊
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
}

// NOTE: *, div, .warn, #main や div.warn#main のような組み合わせ。classは `.a.b` => "a b"
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Selector {
    pub tag_name: Option<String>,
    pub id: Option<String>,
    pub class: Option<String>,
}

// NOTE: margin: auto;
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

impl Selector {
    pub fn is_universal(&self) -> bool {
        self.tag_name.as_deref() == Some("*")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class.as_deref().unwrap_or("").split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_name.is_none() && self.id.is_none() && self.class.is_none()
    }
}

pub fn parse(source: &str) -> Vec<Rule> {
    parse_with(source, &mut NoopObserver)
}

pub fn parse_with(source: &str, observer: &mut dyn ParseObserver) -> Vec<Rule> {
    let mut parser = Parser {
        cursor: Cursor::new(source),
        observer,
    };
    parser.parse_rules()
}

pub fn parse_bytes(source: &[u8]) -> Result<Vec<Rule>> {
    parse_bytes_with(source, &mut NoopObserver)
}

pub fn parse_bytes_with(source: &[u8], observer: &mut dyn ParseObserver) -> Result<Vec<Rule>> {
    let source = std::str::from_utf8(source).map_err(|e| Error::invalid_input("stylesheet", e))?;
    Ok(parse_with(source, observer))
}

// NOTE: styles 属性の `name: value;` を読む。`:` のない組や名前のない組は捨てる
pub fn parse_declarations(source: &str) -> Vec<Declaration> {
    let mut observer = NoopObserver;
    let mut parser = Parser {
        cursor: Cursor::new(source),
        observer: &mut observer,
    };
    parser.parse_declaration_list()
}

struct Parser<'a, 'o> {
    cursor: Cursor<'a>,
    observer: &'o mut dyn ParseObserver,
}

impl<'a, 'o> Parser<'a, 'o> {
    fn parse_rules(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        loop {
            self.skip_trivia();
            if self.cursor.eof() {
                break;
            }
            let rule = self.parse_rule();
            self.observer.rule(&rule);
            rules.push(rule);
        }
        rules
    }

    fn parse_rule(&mut self) -> Rule {
        Rule {
            selectors: self.parse_selectors(),
            declarations: self.parse_declaration_list(),
        }
    }

    // `{` までのセレクタを読む。カンマと空白はどちらも区切りとして扱う
    fn parse_selectors(&mut self) -> Vec<Selector> {
        let mut selectors = Vec::new();
        loop {
            self.skip_trivia();
            match self.cursor.next_char() {
                None => break,
                Some('{') => {
                    self.cursor.consume_char();
                    break;
                }
                Some(c) if c == '*' || c == '.' || c == '#' || is_identifier_char(c) => {
                    let selector = self.parse_selector();
                    if !selector.is_empty() {
                        selectors.push(selector);
                    }
                }
                Some(_) => {
                    self.cursor.consume_char();
                }
            }
        }
        selectors
    }

    fn parse_selector(&mut self) -> Selector {
        let mut selector = Selector::default();
        while let Some(c) = self.cursor.next_char() {
            match c {
                '*' => {
                    self.cursor.consume_char();
                    selector.tag_name = Some("*".to_string());
                }
                '.' => {
                    self.cursor.consume_char();
                    let class = self.parse_identifier();
                    if !class.is_empty() {
                        selector.class = Some(match selector.class.take() {
                            Some(list) => format!("{} {}", list, class),
                            None => class.to_string(),
                        });
                    }
                }
                '#' => {
                    self.cursor.consume_char();
                    let id = self.parse_identifier();
                    if !id.is_empty() {
                        selector.id = Some(id.to_string());
                    }
                }
                c if is_identifier_char(c) => {
                    selector.tag_name = Some(self.parse_identifier().to_string());
                }
                _ => break,
            }
        }
        selector
    }

    // `}` か入力の終わりまで declaration を読む
    fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            self.skip_trivia();
            match self.cursor.next_char() {
                None => break,
                Some('}') => {
                    self.cursor.consume_char();
                    break;
                }
                _ => {
                    if let Some(declaration) = self.parse_declaration() {
                        declarations.push(declaration);
                    }
                }
            }
        }
        declarations
    }

    fn parse_declaration(&mut self) -> Option<Declaration> {
        let property_name = self.parse_identifier();
        self.cursor.consume_while(|c| c != ':' && c != ';' && c != '}');
        match self.cursor.next_char() {
            Some(':') => {
                self.cursor.consume_char();
            }
            Some(';') => {
                self.cursor.consume_char();
                return None;
            }
            _ => return None,
        }

        let value = self.cursor.consume_while(|c| c != ';' && c != '}');
        self.cursor.consume_str(";");

        if property_name.is_empty() {
            return None;
        }
        Some(Declaration {
            name: property_name.to_string(),
            value: value.trim().to_string(),
        })
    }

    fn parse_identifier(&mut self) -> &'a str {
        self.cursor.consume_while(is_identifier_char)
    }

    // 空白と /* コメント */ を飛ばす
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.skip_whitespace();
            if !self.cursor.consume_str("/*") {
                break;
            }
            self.cursor.skip_past("*/");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_bytes, parse_declarations, parse_with, Declaration, Rule, Selector};
    use crate::error::Error;
    use crate::observer::ParseObserver;

    fn selector(tag_name: Option<&str>, id: Option<&str>, class: Option<&str>) -> Selector {
        Selector {
            tag_name: tag_name.map(str::to_string),
            id: id.map(str::to_string),
            class: class.map(str::to_string),
        }
    }

    fn declaration(name: &str, value: &str) -> Declaration {
        Declaration {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn parse_id_selector() {
        let parsed_css = parse("#id {margin: auto;}");
        let expected_css = vec![Rule {
            selectors: vec![selector(None, Some("id"), None)],
            declarations: vec![declaration("margin", "auto")],
        }];
        assert_eq!(parsed_css, expected_css);
    }

    #[test]
    fn parse_class_selector() {
        let parsed_css = parse(".class {margin: auto;}");
        assert_eq!(parsed_css[0].selectors, vec![selector(None, None, Some("class"))]);
    }

    #[test]
    fn parse_asterisk_selector() {
        let parsed_css = parse("* {margin: auto;}");
        assert_eq!(parsed_css[0].selectors, vec![selector(Some("*"), None, None)]);
        assert!(parsed_css[0].selectors[0].is_universal());
    }

    #[test]
    fn parse_tag_name_selector() {
        let parsed_css = parse("input {margin: auto;}");
        assert_eq!(parsed_css[0].selectors, vec![selector(Some("input"), None, None)]);
    }

    #[test]
    fn parse_compound_selector() {
        let parsed_css = parse("div.warn.big#main {color: red;}");
        assert_eq!(
            parsed_css[0].selectors,
            vec![selector(Some("div"), Some("main"), Some("warn big"))]
        );
        let classes: Vec<&str> = parsed_css[0].selectors[0].classes().collect();
        assert_eq!(classes, vec!["warn", "big"]);
    }

    #[test]
    fn parse_selector_list_separated_by_commas_and_spaces() {
        let parsed_css = parse("h1, h2 .note\n#x {color: red;}");
        assert_eq!(
            parsed_css[0].selectors,
            vec![
                selector(Some("h1"), None, None),
                selector(Some("h2"), None, None),
                selector(None, None, Some("note")),
                selector(None, Some("x"), None),
            ]
        );
    }

    #[test]
    fn declaration_value_runs_to_semicolon_and_is_trimmed() {
        let parsed_css = parse("p { font-family :  \"Noto Sans\", serif ; margin:0 auto; }");
        assert_eq!(
            parsed_css[0].declarations,
            vec![
                declaration("font-family", "\"Noto Sans\", serif"),
                declaration("margin", "0 auto"),
            ]
        );
    }

    #[test]
    fn parse_multi_rules() {
        let parsed_css = parse("#id {margin: auto;} .class {margin: auto;}");
        let expected_css = vec![
            Rule {
                selectors: vec![selector(None, Some("id"), None)],
                declarations: vec![declaration("margin", "auto")],
            },
            Rule {
                selectors: vec![selector(None, None, Some("class"))],
                declarations: vec![declaration("margin", "auto")],
            },
        ];
        assert_eq!(parsed_css, expected_css);
    }

    #[test]
    fn last_declaration_may_omit_semicolon() {
        let parsed_css = parse("a {color: red} b {color: blue;}");
        assert_eq!(parsed_css.len(), 2);
        assert_eq!(parsed_css[0].declarations, vec![declaration("color", "red")]);
        assert_eq!(parsed_css[1].declarations, vec![declaration("color", "blue")]);
    }

    #[test]
    fn missing_closing_brace_runs_to_end_of_input() {
        let parsed_css = parse("p {color: red; margin: 0;");
        assert_eq!(parsed_css.len(), 1);
        assert_eq!(parsed_css[0].declarations.len(), 2);
    }

    #[test]
    fn declaration_without_colon_is_dropped() {
        let parsed_css = parse("p {color red; margin: 0;}");
        assert_eq!(parsed_css[0].declarations, vec![declaration("margin", "0")]);
    }

    #[test]
    fn comments_are_skipped() {
        let parsed_css = parse("/* head */ p /* sel */ { /* in */ color: red; }");
        assert_eq!(parsed_css.len(), 1);
        assert_eq!(parsed_css[0].selectors, vec![selector(Some("p"), None, None)]);
        assert_eq!(parsed_css[0].declarations, vec![declaration("color", "red")]);
    }

    #[test]
    fn empty_stylesheet_has_no_rules() {
        assert!(parse(" \n ").is_empty());
    }

    #[test]
    fn inline_declarations() {
        assert_eq!(
            parse_declarations("color: green; font-size:12px ;; bogus"),
            vec![declaration("color", "green"), declaration("font-size", "12px")]
        );
        assert!(parse_declarations("   ").is_empty());
    }

    #[test]
    fn observer_sees_every_rule() {
        #[derive(Default)]
        struct Counter(usize);

        impl ParseObserver for Counter {
            fn rule(&mut self, _rule: &Rule) {
                self.0 += 1;
            }
        }

        let mut counter = Counter::default();
        let rules = parse_with("a {} b {} c {}", &mut counter);
        assert_eq!(rules.len(), 3);
        assert_eq!(counter.0, 3);
    }

    #[test]
    fn non_utf8_bytes_are_rejected() {
        assert!(matches!(
            parse_bytes(&[0xc3, 0x28]),
            Err(Error::InvalidInput { what: "stylesheet", .. })
        ));
    }
}
