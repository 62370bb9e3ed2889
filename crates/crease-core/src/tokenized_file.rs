//! Wrapper around one parse result with node/token navigation
//!
//! A `TokenizedFile` owns the source text, AST, and token stream for
//! exactly one parse and is immutable after construction. All spatial
//! reasoning in rules goes through it: node → covering tokens, token →
//! sequential neighbors, offset → line/column. Offsets are never
//! recomputed mid-pass, so a pass's addressing stays self-consistent.
//!
//! The parent relation is derived here once, at construction time; the
//! arena nodes themselves carry no back-pointers.

use crate::ast::{Ast, Node, NodeId, NodeType};
use crate::error::CreaseError;
use crate::parser::ParseOutput;
use crate::result::Result;
use crate::tokens::{Position, Token};

pub struct TokenizedFile {
    source: String,
    ast: Ast,
    tokens: Vec<Token>,
    parents: Vec<Option<NodeId>>,
    line_starts: Vec<usize>,
}

impl TokenizedFile {
    pub fn new(source: String, output: ParseOutput) -> Self {
        let ParseOutput { ast, tokens } = output;
        debug_assert!(
            tokens
                .windows(2)
                .all(|pair| pair[0].span.end == pair[1].span.start),
            "token stream must be contiguous and ordered"
        );

        let mut parents = vec![None; ast.len()];
        let mut stack = vec![ast.root()];
        while let Some(id) = stack.pop() {
            for child in ast.node(id).kind.children() {
                parents[child.index()] = Some(id);
                stack.push(child);
            }
        }

        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }

        Self {
            source,
            ast,
            tokens,
            parents,
            line_starts,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// The full token stream, trivia included
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.ast.node(id)
    }

    /// Parent of a node, from the index derived at construction
    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.parents[id.index()].map(|parent| self.ast.node(parent))
    }

    /// Visit every node whose type is in `types`, pre-order, in source order
    pub fn iterate_nodes_by_type<F>(&self, types: &[NodeType], mut visit: F)
    where
        F: FnMut(&Node),
    {
        let mut stack = vec![self.ast.root()];
        while let Some(id) = stack.pop() {
            let node = self.ast.node(id);
            if types.contains(&node.node_type()) {
                visit(node);
            }
            let children = node.kind.children();
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
    }

    /// The token covering the node's start offset
    pub fn first_token(&self, node: &Node) -> Result<&Token> {
        let index = self.first_token_index(node)?;
        Ok(&self.tokens[index])
    }

    /// The token covering the node's end offset
    pub fn last_token(&self, node: &Node) -> Result<&Token> {
        let index = self.last_token_index(node)?;
        Ok(&self.tokens[index])
    }

    /// The contiguous token slice spanned by a node, interior trivia included
    pub fn token_range(&self, node: &Node) -> Result<&[Token]> {
        let first = self.first_token_index(node)?;
        let last = self.last_token_index(node)?;
        Ok(&self.tokens[first..=last])
    }

    /// The nearest non-trivia token after `token`, or None at end of file
    pub fn next_token(&self, token: &Token) -> Option<&Token> {
        let index = self.token_index(token)?;
        self.tokens[index + 1..].iter().find(|t| !t.is_trivia())
    }

    /// The nearest non-trivia token before `token`, or None at start of file
    pub fn prev_token(&self, token: &Token) -> Option<&Token> {
        let index = self.token_index(token)?;
        self.tokens[..index].iter().rev().find(|t| !t.is_trivia())
    }

    /// The character span strictly between two tokens
    pub fn text_between(&self, token: &Token, next_token: &Token) -> &str {
        debug_assert!(token.span.end <= next_token.span.start);
        &self.source[token.span.end..next_token.span.start]
    }

    /// 1-based line/column of a byte offset
    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|start| *start <= offset);
        Position::new(line, offset - self.line_starts[line - 1] + 1)
    }

    fn token_index(&self, token: &Token) -> Option<usize> {
        let index = self
            .tokens
            .binary_search_by_key(&token.span.start, |t| t.span.start)
            .ok()?;
        debug_assert_eq!(self.tokens[index].span, token.span, "token from another file");
        Some(index)
    }

    fn first_token_index(&self, node: &Node) -> Result<usize> {
        if node.span.is_empty() {
            return Err(self.no_tokens(node));
        }
        let index = self
            .tokens
            .partition_point(|t| t.span.start < node.span.start);
        if index >= self.tokens.len() || self.tokens[index].span.start >= node.span.end {
            return Err(self.no_tokens(node));
        }
        Ok(index)
    }

    fn last_token_index(&self, node: &Node) -> Result<usize> {
        if node.span.is_empty() {
            return Err(self.no_tokens(node));
        }
        let index = self
            .tokens
            .partition_point(|t| t.span.start < node.span.end);
        if index == 0 {
            return Err(self.no_tokens(node));
        }
        let candidate = &self.tokens[index - 1];
        if candidate.span.start < node.span.start {
            return Err(self.no_tokens(node));
        }
        Ok(index - 1)
    }

    fn no_tokens(&self, node: &Node) -> CreaseError {
        CreaseError::NodeHasNoTokens {
            start: node.span.start,
            end: node.span.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::tokens::{Span, TokenKind};

    /// Builds the parse result for `a (b)` by hand
    fn call_fixture() -> TokenizedFile {
        let source = "a (b)".to_string();
        let specs = [
            (TokenKind::Identifier, "a"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Punctuator, "("),
            (TokenKind::Identifier, "b"),
            (TokenKind::Punctuator, ")"),
        ];
        let mut tokens = Vec::new();
        let mut offset = 0;
        for (kind, text) in specs {
            let span = Span::new(offset, offset + text.len());
            tokens.push(Token::new(
                kind,
                text,
                span,
                Position::new(1, span.start + 1),
                Position::new(1, span.end + 1),
            ));
            offset = span.end;
        }

        let mut ast = Ast::new();
        let callee = ast.alloc(NodeKind::Identifier { name: "a".into() }, Span::new(0, 1));
        let argument = ast.alloc(NodeKind::Identifier { name: "b".into() }, Span::new(3, 4));
        let call = ast.alloc(
            NodeKind::CallExpression {
                callee,
                arguments: vec![argument],
            },
            Span::new(0, 5),
        );
        let statement = ast.alloc(NodeKind::ExpressionStatement { expression: call }, Span::new(0, 5));
        let program = ast.alloc(NodeKind::Program { body: vec![statement] }, Span::new(0, 5));
        ast.set_root(program);

        TokenizedFile::new(source, ParseOutput { ast, tokens })
    }

    #[test]
    fn first_and_last_token() {
        let file = call_fixture();
        let call = file.node(NodeId::new(2));
        assert_eq!(file.first_token(call).unwrap().text, "a");
        assert_eq!(file.last_token(call).unwrap().text, ")");
    }

    #[test]
    fn neighbors_skip_trivia_and_stop_at_boundaries() {
        let file = call_fixture();
        let call = file.node(NodeId::new(2));
        let first = file.first_token(call).unwrap();
        let next = file.next_token(first).unwrap();
        assert_eq!(next.text, "(");
        assert_eq!(file.prev_token(next).unwrap().text, "a");
        assert!(file.prev_token(first).is_none());
        let last = file.last_token(call).unwrap();
        assert!(file.next_token(last).is_none());
    }

    #[test]
    fn token_range_includes_interior_trivia() {
        let file = call_fixture();
        let call = file.node(NodeId::new(2));
        let range = file.token_range(call).unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range[1].kind, TokenKind::Whitespace);
    }

    #[test]
    fn empty_node_has_no_tokens() {
        let file = call_fixture();
        let mut ast = Ast::new();
        let empty = ast.alloc(NodeKind::NullLiteral, Span::new(1, 1));
        let node = ast.node(empty).clone();
        assert!(matches!(
            file.first_token(&node),
            Err(CreaseError::NodeHasNoTokens { start: 1, end: 1 })
        ));
    }

    #[test]
    fn parent_index_resolves_ancestors() {
        let file = call_fixture();
        let argument = file.node(NodeId::new(1));
        let parent = file.parent(argument.id).unwrap();
        assert_eq!(parent.node_type(), NodeType::CallExpression);
        let root = file.node(NodeId::new(4));
        assert!(file.parent(root.id).is_none());
    }

    #[test]
    fn iteration_is_source_ordered() {
        let file = call_fixture();
        let mut names = Vec::new();
        file.iterate_nodes_by_type(&[NodeType::Identifier], |node| {
            names.push(node.identifier_name().unwrap().to_string());
        });
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn positions_are_one_based() {
        let file = call_fixture();
        assert_eq!(file.position(0), Position::new(1, 1));
        assert_eq!(file.position(3), Position::new(1, 4));
    }

    #[test]
    fn text_between_exposes_the_gap() {
        let file = call_fixture();
        let tokens = file.tokens();
        assert_eq!(file.text_between(&tokens[0], &tokens[2]), " ");
        assert_eq!(file.text_between(&tokens[2], &tokens[3]), "");
    }
}
