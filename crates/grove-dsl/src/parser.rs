//! Recursive-descent parser with per-node error recovery.
//!
//! ```text
//! file      := { any token } tree_decl
//! tree_decl := 'tree' IDENT '{' node '}'
//! node      := KEYWORD IDENT '{' ( property | node )* '}'
//! property  := IDENT ':' ( STRING | NUMBER | IDENT )
//! ```
//!
//! A node that fails to parse or resolve is reported through the sink and
//! dropped; its parent keeps parsing after it. Only a failure of the root node
//! fails the whole parse.

use std::fs;
use std::path::Path;

use grove_bt::{
    Inverter, LeafKind, Node, NodeRegistry, Parallel, PropertyValue, Repeat, Retry, Selector,
    Sequence, Timeout,
};
use grove_tools::{LogRecord, LogSink};

use crate::error::{ParseError, Result};
use crate::token::{tokenize, Keyword, Token, TokenKind};

const CATEGORY: &str = "dsl.parse";

/// Parses `source` into a tree whose leaves are resolved through `registry`.
///
/// Every problem is reported to `sink`. Recoverable problems (a bad child, an
/// unregistered leaf) only drop the affected branch.
pub fn parse(
    source: &str,
    registry: &NodeRegistry,
    sink: &mut dyn LogSink,
) -> Result<Box<dyn Node>> {
    Parser::new(tokenize(source), registry, sink).parse_tree()
}

/// Reads and parses the file at `path`.
pub fn parse_file(
    path: impl AsRef<Path>,
    registry: &NodeRegistry,
    sink: &mut dyn LogSink,
) -> Result<Box<dyn Node>> {
    let path = path.as_ref();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(source) => {
            sink.log(LogRecord::error(
                CATEGORY,
                format!("cannot read {}: {source}", path.display()),
            ));
            return Err(ParseError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse(&source, registry, sink)
}

/// Node declaration collected before the node itself is constructed.
struct Declaration {
    keyword: Keyword,
    name: String,
    line: usize,
    properties: Vec<(String, PropertyValue)>,
    children: Vec<Box<dyn Node>>,
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    registry: &'a NodeRegistry,
    sink: &'a mut dyn LogSink,
    errors: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, registry: &'a NodeRegistry, sink: &'a mut dyn LogSink) -> Self {
        Self {
            tokens,
            pos: 0,
            registry,
            sink,
            errors: 0,
        }
    }

    /// Number of problems reported so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn parse_tree(&mut self) -> Result<Box<dyn Node>> {
        let Some(start) = self
            .tokens
            .iter()
            .position(|t| t.kind == TokenKind::Keyword(Keyword::Tree))
        else {
            self.report(None, None, "no `tree` declaration found");
            return Err(ParseError::NoTree);
        };
        let tree_line = self.tokens[start].line;
        self.pos = start + 1;

        let tree_name = match self.peek_kind(0) {
            Some(TokenKind::Identifier) => self.advance_text(),
            _ => return Err(self.syntax(tree_line, "expected a tree name after `tree`")),
        };
        if !self.eat(TokenKind::LBrace) {
            return Err(self.syntax(tree_line, format!("expected `{{` after tree '{tree_name}'")));
        }

        let mut root = match self.peek_kind(0) {
            Some(TokenKind::RBrace) | None => {
                return Err(self.syntax(tree_line, format!("tree '{tree_name}' is empty")));
            }
            Some(_) => match self.parse_node() {
                Some(root) => root,
                None => {
                    return Err(self.syntax(
                        tree_line,
                        format!("tree '{tree_name}' has no valid root node"),
                    ));
                }
            },
        };

        if !self.eat(TokenKind::RBrace) {
            let line = self.current_line().unwrap_or(tree_line);
            return Err(self.syntax(line, format!("expected `}}` to close tree '{tree_name}'")));
        }

        root.set_property("treeName", PropertyValue::Text(tree_name.clone()));
        tracing::debug!(tree = %tree_name, errors = self.errors, "parsed behavior tree");
        Ok(root)
    }

    /// Parses one node declaration starting at the current token. Returns
    /// `None` after reporting and skipping a node that cannot be built.
    fn parse_node(&mut self) -> Option<Box<dyn Node>> {
        let token = self.tokens.get(self.pos)?.clone();
        let keyword = match token.kind {
            TokenKind::Keyword(keyword) if keyword != Keyword::Tree => keyword,
            TokenKind::Identifier => {
                self.report(Some(token.line), None, format!("unknown node type '{}'", token.text));
                self.pos += 1;
                self.recover(false);
                return None;
            }
            other => {
                self.report(Some(token.line), None, format!("expected a node type, found {other}"));
                self.pos += 1;
                self.recover(false);
                return None;
            }
        };
        self.pos += 1;

        let name = match self.peek_kind(0) {
            Some(TokenKind::Identifier) => self.advance_text(),
            _ => {
                self.report(
                    Some(token.line),
                    None,
                    format!("expected a name after `{}`", keyword.as_str()),
                );
                self.recover(false);
                return None;
            }
        };
        if !self.eat(TokenKind::LBrace) {
            self.report(Some(token.line), Some(&name), "expected `{`");
            self.recover(false);
            return None;
        }

        let mut decl = Declaration {
            keyword,
            name,
            line: token.line,
            properties: Vec::new(),
            children: Vec::new(),
        };

        loop {
            match self.peek_kind(0) {
                None => {
                    self.report(
                        Some(decl.line),
                        Some(&decl.name),
                        "unexpected end of input, missing `}`",
                    );
                    return None;
                }
                Some(TokenKind::RBrace) => {
                    self.pos += 1;
                    break;
                }
                Some(TokenKind::Identifier) if self.peek_kind(1) == Some(TokenKind::Colon) => {
                    match self.parse_property() {
                        Some(property) => decl.properties.push(property),
                        None => {
                            self.recover(true);
                            return None;
                        }
                    }
                }
                Some(TokenKind::Identifier) | Some(TokenKind::Keyword(_)) => {
                    if let Some(child) = self.parse_node() {
                        decl.children.push(child);
                    }
                }
                Some(other) => {
                    let line = self.current_line().unwrap_or(decl.line);
                    self.report(Some(line), Some(&decl.name), format!("unexpected {other}"));
                    self.recover(true);
                    return None;
                }
            }
        }

        self.build(decl)
    }

    /// `IDENT ':' value`, with the key and colon already peeked.
    fn parse_property(&mut self) -> Option<(String, PropertyValue)> {
        let key = self.advance_text();
        self.pos += 1;

        let Some(token) = self.tokens.get(self.pos).cloned() else {
            self.report(None, None, format!("property '{key}' has no value"));
            return None;
        };
        let value = match token.kind {
            TokenKind::String | TokenKind::Identifier | TokenKind::Keyword(_) => {
                PropertyValue::Text(token.text)
            }
            TokenKind::Number => match token.text.parse::<f64>() {
                Ok(n) => PropertyValue::Number(n),
                Err(_) => {
                    self.report(
                        Some(token.line),
                        None,
                        format!("property '{key}' has malformed number '{}'", token.text),
                    );
                    return None;
                }
            },
            other => {
                self.report(
                    Some(token.line),
                    None,
                    format!("property '{key}' expects a value, found {other}"),
                );
                return None;
            }
        };
        self.pos += 1;
        Some((key, value))
    }

    fn build(&mut self, decl: Declaration) -> Option<Box<dyn Node>> {
        let Declaration {
            keyword,
            name,
            line,
            properties,
            children,
        } = decl;

        let mut node: Box<dyn Node> = match keyword {
            Keyword::Sequence => Box::new(Sequence::new()),
            Keyword::Selector => Box::new(Selector::new()),
            Keyword::Parallel => Box::new(Parallel::new()),
            Keyword::Inverter => Box::new(Inverter::new()),
            Keyword::Repeat => Box::new(Repeat::new()),
            Keyword::Retry => Box::new(Retry::new()),
            Keyword::Timeout => Box::new(Timeout::new()),
            Keyword::Action | Keyword::Condition => {
                let kind = if keyword == Keyword::Action {
                    LeafKind::Action
                } else {
                    LeafKind::Condition
                };
                let Some(leaf) = self.registry.create(kind, &name) else {
                    self.report(
                        Some(line),
                        Some(&name),
                        format!("no {} registered under '{name}'", kind.as_str().to_lowercase()),
                    );
                    return None;
                };
                leaf
            }
            Keyword::Tree => {
                self.report(Some(line), Some(&name), "`tree` cannot be nested");
                return None;
            }
        };

        let display_name = match keyword {
            Keyword::Action | Keyword::Condition => format!("{}:{name}", keyword.as_str()),
            _ => name,
        };
        node.set_name(display_name);

        for (key, value) in properties {
            node.set_property(&key, value);
        }
        for child in children {
            if let Err(rejected) = node.add_child(child) {
                let message = format!("cannot take child '{}', dropping it", rejected.name());
                let owner = node.name().to_string();
                self.report(Some(line), Some(&owner), message);
            }
        }
        Some(node)
    }

    /// Skips the remainder of a failed node. With `opened`, the node's `{` has
    /// been consumed and tokens are skipped through its matching `}`. Otherwise
    /// the node's block is skipped if one follows before the parent's `}`.
    fn recover(&mut self, opened: bool) {
        if opened {
            self.skip_to_close(1);
            return;
        }
        while let Some(kind) = self.peek_kind(0) {
            match kind {
                TokenKind::RBrace => return,
                TokenKind::LBrace => {
                    self.pos += 1;
                    self.skip_to_close(1);
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_to_close(&mut self, mut depth: usize) {
        while let Some(kind) = self.peek_kind(0) {
            self.pos += 1;
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn current_line(&self) -> Option<usize> {
        self.tokens.get(self.pos).map(|t| t.line)
    }

    fn advance_text(&mut self) -> String {
        let text = self.tokens.get(self.pos).map(|t| t.text.clone()).unwrap_or_default();
        self.pos += 1;
        text
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind(0) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn report(&mut self, line: Option<usize>, node: Option<&str>, message: impl Into<String>) {
        self.errors += 1;
        let mut record = LogRecord::error(CATEGORY, message);
        if let Some(line) = line {
            record = record.with_line(line);
        }
        if let Some(node) = node {
            record = record.with_node(node);
        }
        self.sink.log(record);
    }

    fn syntax(&mut self, line: usize, message: impl Into<String>) -> ParseError {
        let message = message.into();
        self.report(Some(line), None, message.clone());
        ParseError::Syntax { line, message }
    }
}
