use crate::cursor::{is_space, is_tag_name_start, Cursor};
use crate::dom::{self, AttrMap, Node, Tree};
use crate::error::{Error, Result};
use crate::observer::{NoopObserver, ParseObserver};

struct Parser<'a, 'o> {
    cursor: Cursor<'a>,
    // 開いているタグ名のスタック
    open_tags: Vec<&'a str>,
    observer: &'o mut dyn ParseObserver,
}

pub fn parse(source: &str) -> Result<Tree<Node>> {
    parse_with(source, &mut NoopObserver)
}

pub fn parse_with(source: &str, observer: &mut dyn ParseObserver) -> Result<Tree<Node>> {
    let mut parser = Parser {
        cursor: Cursor::new(source),
        open_tags: Vec::new(),
        observer,
    };
    let nodes = parser.parse_document()?;
    Ok(Tree::from_nodes(nodes))
}

pub fn parse_bytes(source: &[u8]) -> Result<Tree<Node>> {
    parse_bytes_with(source, &mut NoopObserver)
}

pub fn parse_bytes_with(source: &[u8], observer: &mut dyn ParseObserver) -> Result<Tree<Node>> {
    let source = std::str::from_utf8(source).map_err(|e| Error::invalid_input("markup", e))?;
    parse_with(source, observer)
}

impl<'a, 'o> Parser<'a, 'o> {
    // NOTE: トップレベルでは空白だけの区間はノードにしない
    fn parse_document(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.eof() {
                break;
            }
            if self.at_comment() {
                self.consume_comment();
                continue;
            }
            if self.at_close_tag() {
                self.parse_close_tag()?;
                continue;
            }
            nodes.push(self.parse_node()?);
        }
        Ok(nodes)
    }

    // NOTE: 要素の中では空白も一つのテキストノードとして残す
    fn parse_children(&mut self) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if self.cursor.eof() || self.at_close_tag() {
                break;
            }
            if self.at_comment() {
                self.consume_comment();
                continue;
            }
            nodes.push(self.parse_node()?);
        }
        Ok(nodes)
    }

    fn parse_node(&mut self) -> Result<Node> {
        if self.at_open_tag() {
            self.parse_element()
        } else {
            Ok(self.parse_text())
        }
    }

    // 一つのエレメントノードをパースする
    fn parse_element(&mut self) -> Result<Node> {
        self.cursor.consume_char();
        let tag_name = self.parse_tag_name();
        self.open_tags.push(tag_name);
        self.observer.element_opened(tag_name);

        let attrs = self.parse_attributes();
        if !self.cursor.consume_str(">") {
            self.open_tags.pop();
            self.observer.unterminated(tag_name);
            return Ok(dom::elem(tag_name.to_string(), attrs, Vec::new()));
        }

        let children = self.parse_children()?;
        if self.cursor.eof() {
            self.open_tags.pop();
            self.observer.unterminated(tag_name);
        } else {
            self.parse_close_tag()?;
        }

        Ok(dom::elem(tag_name.to_string(), attrs, children))
    }

    fn parse_close_tag(&mut self) -> Result<()> {
        self.cursor.consume_str("</");
        self.cursor.skip_whitespace();
        let found = self.parse_tag_name();
        let expected = self.open_tags.pop().unwrap_or_default();
        if expected != found {
            return Err(Error::mismatched_tag(expected, found));
        }
        self.cursor.skip_past(">");
        self.observer.element_closed(found);
        Ok(())
    }

    // Parse a tag name: everything up to whitespace or `>`.
    fn parse_tag_name(&mut self) -> &'a str {
        self.cursor.consume_while(|c| !is_space(c) && c != '>')
    }

    fn parse_attributes(&mut self) -> AttrMap {
        let mut attributes = AttrMap::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.next_char() {
                None | Some('>') => break,
                _ => {}
            }
            if let Some((name, value)) = self.parse_attr() {
                self.observer.attribute(name, value);
                attributes.insert(name.to_string(), value.to_string());
            }
        }
        attributes
    }

    fn parse_attr(&mut self) -> Option<(&'a str, &'a str)> {
        let name = self
            .cursor
            .consume_while(|c| c != '=' && c != '>' && !is_space(c));
        self.cursor.skip_whitespace();
        let value = if self.cursor.consume_str("=") {
            self.cursor.skip_whitespace();
            self.parse_attr_value()
        } else {
            ""
        };
        if name.is_empty() {
            return None;
        }
        Some((name, value.trim()))
    }

    fn parse_attr_value(&mut self) -> &'a str {
        match self.cursor.next_char() {
            Some(quote @ ('"' | '\'')) => {
                self.cursor.consume_char();
                let value = self.cursor.consume_while(|c| c != quote);
                self.cursor.consume_char();
                value
            }
            _ => self.cursor.consume_while(|c| !is_space(c) && c != '>'),
        }
    }

    fn parse_text(&mut self) -> Node {
        let start = self.cursor.pos();
        // 最初の文字はタグの境界ではない (parse_node で確認済み)
        self.cursor.consume_char();
        while !self.cursor.eof() && !self.at_tag_boundary() {
            self.cursor.consume_char();
        }
        let value = collapse_whitespace(self.cursor.slice_from(start));
        self.observer.text(&value);
        dom::text(value)
    }

    fn consume_comment(&mut self) {
        self.cursor.consume_str("<!--");
        self.cursor.skip_past("-->");
    }

    fn at_open_tag(&self) -> bool {
        self.cursor.next_char() == Some('<') && self.cursor.peek_second().map_or(false, is_tag_name_start)
    }

    fn at_close_tag(&self) -> bool {
        self.cursor.starts_with("</")
    }

    fn at_comment(&self) -> bool {
        self.cursor.starts_with("<!--")
    }

    // NOTE: タグ・閉じタグ・コメントが始まらない `<` はただの文字
    fn at_tag_boundary(&self) -> bool {
        self.at_open_tag() || self.at_close_tag() || self.at_comment()
    }
}

// a  b  c => a b c
fn collapse_whitespace(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if is_space(c) {
            if !in_space {
                result.push(' ');
                in_space = true;
            }
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}
