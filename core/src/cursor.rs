// NOTE: html と css のパーサで共有する。入力はコピーせず位置(バイト)だけを進める

#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    pub fn next_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        self.remaining().chars().nth(1)
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    pub fn consume_char(&mut self) -> Option<char> {
        let c = self.next_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn consume_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub fn consume_while<F>(&mut self, test: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.next_char() {
            if !test(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.slice_from(start)
    }

    pub fn skip_whitespace(&mut self) {
        self.consume_while(is_space);
    }

    // 見つからなければ入力の最後まで進める
    pub fn skip_past(&mut self, s: &str) -> bool {
        match self.remaining().find(s) {
            Some(offset) => {
                self.pos += offset + s.len();
                true
            }
            None => {
                self.pos = self.input.len();
                false
            }
        }
    }
}

// ASCII の空白だけ。他の Unicode の空白は普通の文字として扱う
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t' | '\r')
}

pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn is_identifier_char(c: char) -> bool {
    is_word_char(c) || c == '-'
}

// タグ名の最初の文字。閉じタグ側は名前を何でも受け付けるので、こちらも Unicode の英数字を許す
pub fn is_tag_name_start(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
