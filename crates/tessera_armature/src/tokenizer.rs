//! HTML tokenizer for Tessera templates.
//!
//! A single pass over the input bytes that reports sections (byte ranges)
//! through [`Callbacks`]. Nothing is copied here; the listener slices the
//! source itself.

use tessera_relief::ErrorCode;

/// Where the tokenizer is inside the markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,

    // `<name ...>` and `</name>`
    TagOpen,
    TagName,
    SelfClosing,
    EndTagOpen,
    EndTagName,
    AfterEndTagName,

    // Attributes
    BeforeAttrName,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValue(QuoteType),

    // `<!...>`, `<?...>` and `<!-- ... -->`
    Declaration,
    BogusDeclaration,
    ProcessingInstruction,
    CommentOpen,
    Comment,

    /// Body of `<script>`, `<style>` and the like
    RawText,
}

/// How an attribute value was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteType {
    /// `hidden`
    NoValue,
    /// `name=value`
    Unquoted,
    /// `name='value'`
    Single,
    /// `name="value"`
    Double,
}

impl QuoteType {
    fn closing_byte(self) -> Option<u8> {
        match self {
            Self::Single => Some(b'\''),
            Self::Double => Some(b'"'),
            Self::NoValue | Self::Unquoted => None,
        }
    }
}

/// Receives the sections found by the [`Tokenizer`]
pub trait Callbacks {
    fn on_text(&mut self, start: usize, end: usize);

    fn on_open_tag_name(&mut self, start: usize, end: usize);
    fn on_open_tag_end(&mut self, end: usize);
    fn on_self_closing_tag(&mut self, end: usize);
    fn on_close_tag(&mut self, start: usize, end: usize);

    fn on_attrib_name(&mut self, start: usize, end: usize);
    fn on_attrib_data(&mut self, start: usize, end: usize);
    fn on_attrib_end(&mut self, quote: QuoteType, end: usize);

    fn on_comment(&mut self, start: usize, end: usize);
    fn on_processing_instruction(&mut self, start: usize, end: usize);

    fn on_end(&mut self);
    fn on_error(&mut self, code: ErrorCode, index: usize);
}

/// `/`, `>` or whitespace: the end of a tag or attribute name
#[inline]
fn ends_name(c: u8) -> bool {
    matches!(c, b'/' | b'>') || c.is_ascii_whitespace()
}

/// Byte-level HTML tokenizer
pub struct Tokenizer<'a, C: Callbacks> {
    bytes: &'a [u8],
    state: State,
    /// Start of the section being scanned
    start: usize,
    pos: usize,
    callbacks: C,
    is_raw_text_tag: fn(&str) -> bool,
    /// Name range of the last open tag
    open_tag: (usize, usize),
    /// Name range of the raw-text element being scanned
    raw_tag: Option<(usize, usize)>,
}

impl<'a, C: Callbacks> Tokenizer<'a, C> {
    pub fn new(input: &'a str, callbacks: C) -> Self {
        Self::with_raw_text_tags(input, callbacks, tessera_carton::is_raw_text_tag)
    }

    /// Tokenizer that treats the tags matched by `is_raw_text_tag` as raw text
    pub fn with_raw_text_tags(
        input: &'a str,
        callbacks: C,
        is_raw_text_tag: fn(&str) -> bool,
    ) -> Self {
        Self {
            bytes: input.as_bytes(),
            state: State::Text,
            start: 0,
            pos: 0,
            callbacks,
            is_raw_text_tag,
            open_tag: (0, 0),
            raw_tag: None,
        }
    }

    /// Give the callbacks back once tokenizing is done
    pub fn into_callbacks(self) -> C {
        self.callbacks
    }

    /// Run over the whole input, then report `on_end`
    pub fn tokenize(&mut self) {
        while let Some(&c) = self.bytes.get(self.pos) {
            self.step(c);
            self.pos += 1;
        }
        self.finish();
        self.callbacks.on_end();
    }

    fn step(&mut self, c: u8) {
        match self.state {
            State::Text => self.text(c),
            State::TagOpen => self.tag_open(c),
            State::TagName => self.tag_name(c),
            State::SelfClosing => self.self_closing(c),
            State::EndTagOpen => self.end_tag_open(c),
            State::EndTagName => self.end_tag_name(c),
            State::AfterEndTagName => {
                if c == b'>' {
                    self.goto(State::Text, self.pos + 1);
                }
            }
            State::BeforeAttrName => self.before_attr_name(c),
            State::AttrName => self.attr_name(c),
            State::AfterAttrName => self.after_attr_name(c),
            State::BeforeAttrValue => self.before_attr_value(c),
            State::AttrValue(quote) => self.attr_value(quote, c),
            State::Declaration => self.declaration(c),
            State::BogusDeclaration => {
                if c == b'>' {
                    self.goto(State::Text, self.pos + 1);
                }
            }
            State::ProcessingInstruction => {
                if c == b'>' {
                    self.callbacks
                        .on_processing_instruction(self.start, self.pos);
                    self.goto(State::Text, self.pos + 1);
                }
            }
            State::CommentOpen => self.comment_open(c),
            State::Comment => self.comment(c),
            State::RawText => self.raw_text(c),
        }
    }

    /// Report whatever the input ended in the middle of
    fn finish(&mut self) {
        match self.state {
            State::Text | State::RawText => self.flush_text(),
            // A lone `<` at the very end is plain text
            State::TagOpen => self.callbacks.on_text(self.start, self.pos),
            State::Comment => {
                self.callbacks.on_error(ErrorCode::EofInComment, self.pos);
                self.callbacks.on_comment(self.start, self.pos);
            }
            State::TagName
            | State::SelfClosing
            | State::EndTagOpen
            | State::EndTagName
            | State::AfterEndTagName
            | State::BeforeAttrName
            | State::AttrName
            | State::AfterAttrName
            | State::BeforeAttrValue
            | State::AttrValue(_) => {
                self.callbacks.on_error(ErrorCode::EofInTag, self.pos);
            }
            State::Declaration
            | State::BogusDeclaration
            | State::ProcessingInstruction
            | State::CommentOpen => {}
        }
    }

    #[inline]
    fn goto(&mut self, state: State, start: usize) {
        self.state = state;
        self.start = start;
    }

    fn flush_text(&mut self) {
        if self.start < self.pos {
            self.callbacks.on_text(self.start, self.pos);
        }
    }

    // ========== Text and tags ==========

    fn text(&mut self, c: u8) {
        if c == b'<' {
            self.flush_text();
            self.goto(State::TagOpen, self.pos);
        }
    }

    fn tag_open(&mut self, c: u8) {
        match c {
            b'!' => self.goto(State::Declaration, self.pos + 1),
            b'?' => self.goto(State::ProcessingInstruction, self.pos + 1),
            b'/' => self.state = State::EndTagOpen,
            c if c.is_ascii_alphabetic() => self.goto(State::TagName, self.pos),
            // Not a tag: the `<` stays in the text section
            _ => {
                self.state = State::Text;
                self.text(c);
            }
        }
    }

    fn tag_name(&mut self, c: u8) {
        if !ends_name(c) {
            return;
        }
        self.callbacks.on_open_tag_name(self.start, self.pos);
        self.open_tag = (self.start, self.pos);
        self.goto(State::BeforeAttrName, self.pos);
        self.before_attr_name(c);
    }

    fn self_closing(&mut self, c: u8) {
        if c == b'>' {
            self.callbacks.on_self_closing_tag(self.pos);
            self.goto(State::Text, self.pos + 1);
        } else if !c.is_ascii_whitespace() {
            // `<a / b>`: the slash was noise
            self.state = State::BeforeAttrName;
            self.before_attr_name(c);
        }
    }

    fn end_tag_open(&mut self, c: u8) {
        match c {
            b'>' => {
                self.callbacks
                    .on_error(ErrorCode::MissingEndTagName, self.pos);
                self.goto(State::Text, self.pos + 1);
            }
            c if c.is_ascii_whitespace() => {}
            _ => self.goto(State::EndTagName, self.pos),
        }
    }

    fn end_tag_name(&mut self, c: u8) {
        if c != b'>' && !c.is_ascii_whitespace() {
            return;
        }
        self.callbacks.on_close_tag(self.start, self.pos);
        let next = if c == b'>' {
            State::Text
        } else {
            State::AfterEndTagName
        };
        self.goto(next, self.pos + 1);
    }

    /// State after `>` of an open tag: raw text for `<script>` and friends
    fn content_state(&mut self) -> State {
        let (start, end) = self.open_tag;
        let is_raw = std::str::from_utf8(&self.bytes[start..end])
            .is_ok_and(|tag| (self.is_raw_text_tag)(tag));
        if is_raw {
            self.raw_tag = Some(self.open_tag);
            State::RawText
        } else {
            State::Text
        }
    }

    // ========== Attributes ==========

    fn before_attr_name(&mut self, c: u8) {
        match c {
            b'>' => {
                self.callbacks.on_open_tag_end(self.pos);
                let next = self.content_state();
                self.goto(next, self.pos + 1);
            }
            b'/' => self.state = State::SelfClosing,
            c if c.is_ascii_whitespace() => {}
            _ => self.goto(State::AttrName, self.pos),
        }
    }

    fn attr_name(&mut self, c: u8) {
        if c != b'=' && !ends_name(c) {
            return;
        }
        self.callbacks.on_attrib_name(self.start, self.pos);
        self.goto(State::AfterAttrName, self.pos);
        self.after_attr_name(c);
    }

    fn after_attr_name(&mut self, c: u8) {
        match c {
            b'=' => self.state = State::BeforeAttrValue,
            b'/' | b'>' => {
                self.callbacks.on_attrib_end(QuoteType::NoValue, self.pos);
                self.state = State::BeforeAttrName;
                self.before_attr_name(c);
            }
            c if c.is_ascii_whitespace() => {}
            _ => {
                self.callbacks.on_attrib_end(QuoteType::NoValue, self.pos);
                self.goto(State::AttrName, self.pos);
            }
        }
    }

    fn before_attr_value(&mut self, c: u8) {
        match c {
            b'"' => self.goto(State::AttrValue(QuoteType::Double), self.pos + 1),
            b'\'' => self.goto(State::AttrValue(QuoteType::Single), self.pos + 1),
            c if c.is_ascii_whitespace() => {}
            _ => {
                self.goto(State::AttrValue(QuoteType::Unquoted), self.pos);
                self.attr_value(QuoteType::Unquoted, c);
            }
        }
    }

    fn attr_value(&mut self, quote: QuoteType, c: u8) {
        if let Some(close) = quote.closing_byte() {
            if c == close {
                self.end_attr_value(quote);
            }
            return;
        }
        if c == b'>' || c.is_ascii_whitespace() {
            self.end_attr_value(quote);
            self.before_attr_name(c);
        } else if c == b'/' {
            self.end_attr_value(quote);
            self.state = State::SelfClosing;
        }
    }

    fn end_attr_value(&mut self, quote: QuoteType) {
        if self.start < self.pos {
            self.callbacks.on_attrib_data(self.start, self.pos);
        }
        self.callbacks.on_attrib_end(quote, self.pos);
        self.goto(State::BeforeAttrName, self.pos + 1);
    }

    // ========== Declarations and comments ==========

    fn declaration(&mut self, c: u8) {
        if c == b'-' {
            self.goto(State::CommentOpen, self.pos + 1);
        } else {
            self.state = State::BogusDeclaration;
            self.step(c);
        }
    }

    fn comment_open(&mut self, c: u8) {
        if c == b'-' {
            self.goto(State::Comment, self.pos + 1);
        } else {
            self.state = State::BogusDeclaration;
            self.step(c);
        }
    }

    fn comment(&mut self, c: u8) {
        if c == b'-' && self.bytes[self.pos + 1..].starts_with(b"->") {
            self.callbacks.on_comment(self.start, self.pos);
            self.pos += 2;
            self.goto(State::Text, self.pos + 1);
        }
    }

    // ========== Raw text ==========

    fn raw_text(&mut self, c: u8) {
        if c != b'<' || !self.at_raw_text_end() {
            return;
        }
        self.flush_text();
        self.raw_tag = None;
        self.goto(State::TagOpen, self.pos);
    }

    /// Whether `</tag` closing the current raw-text element starts here
    fn at_raw_text_end(&self) -> bool {
        let Some((start, end)) = self.raw_tag else {
            return false;
        };
        let name = &self.bytes[start..end];
        let Some(rest) = self.bytes[self.pos + 1..].strip_prefix(b"/") else {
            return false;
        };
        let Some(candidate) = rest.get(..name.len()) else {
            return false;
        };
        candidate.eq_ignore_ascii_case(name)
            && rest.get(name.len()).map_or(true, |&next| ends_name(next))
    }
}
