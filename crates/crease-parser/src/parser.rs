//! Recursive-descent parser over the lexed token stream
//!
//! Covers the ES5 core grammar the style rules inspect: declarations,
//! functions, control flow, and the full expression ladder with object,
//! array, call, and member forms. The ES2015 extensions (spread
//! arguments, method shorthand, shorthand properties, `let`/`const`) are
//! accepted only when `ParseOptions::es_next` is set. Regular-expression
//! literals and statements outside this subset are rejected as syntax
//! failures.
//!
//! The parser operates on the non-trivia tokens; node spans always start
//! and end on token boundaries, which the tokenized-file navigation
//! relies on.

use crease_core::ast::{Ast, DeclarationKind, NodeId, NodeKind, PropertyKind};
use crease_core::parser::{ParseOptions, ParseOutput, SourceParser, SyntaxFailure};
use crease_core::tokens::{Span, Token, TokenKind};
use tracing::trace;

use crate::lexer::lex;

/// JavaScript parser collaborator
#[derive(Debug, Clone, Copy, Default)]
pub struct JsParser;

impl JsParser {
    pub fn new() -> Self {
        Self
    }
}

impl SourceParser for JsParser {
    fn parse(
        &self,
        source: &str,
        options: &ParseOptions,
    ) -> Result<ParseOutput, SyntaxFailure> {
        let tokens = lex(source)?;
        trace!(tokens = tokens.len(), "lexed source");
        let ast = Parser::new(&tokens, *options).parse_program()?;
        Ok(ParseOutput { ast, tokens })
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    /// Indices of the non-trivia tokens
    code: Vec<usize>,
    pos: usize,
    options: ParseOptions,
    ast: Ast,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], options: ParseOptions) -> Self {
        let code = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.is_trivia())
            .map(|(index, _)| index)
            .collect();
        Self {
            tokens,
            code,
            pos: 0,
            options,
            ast: Ast::new(),
        }
    }

    // ---- token cursor -------------------------------------------------

    fn peek(&self) -> Option<&'t Token> {
        self.code.get(self.pos).map(|&index| &self.tokens[index])
    }

    fn peek_ahead(&self, n: usize) -> Option<&'t Token> {
        self.code.get(self.pos + n).map(|&index| &self.tokens[index])
    }

    fn at_end(&self) -> bool {
        self.pos >= self.code.len()
    }

    fn at_punct(&self, text: &str) -> bool {
        self.peek().is_some_and(|token| token.is_punctuator(text))
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(text))
    }

    fn bump(&mut self) -> &'t Token {
        let token = &self.tokens[self.code[self.pos]];
        self.pos += 1;
        token
    }

    fn expect_punct(&mut self, text: &str) -> Result<&'t Token, SyntaxFailure> {
        if self.at_punct(text) {
            Ok(self.bump())
        } else {
            Err(self.failure(format!("expected '{text}'")))
        }
    }

    fn expect_identifier(&mut self) -> Result<&'t Token, SyntaxFailure> {
        if self.peek().is_some_and(|t| t.kind == TokenKind::Identifier) {
            Ok(self.bump())
        } else {
            Err(self.failure("expected identifier"))
        }
    }

    fn eat_semicolon(&mut self) {
        if self.at_punct(";") {
            self.bump();
        }
    }

    /// End offset of the most recently consumed token
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .map(|index| self.tokens[self.code[index]].span.end)
            .unwrap_or(0)
    }

    fn node_span(&self, id: NodeId) -> Span {
        self.ast.node(id).span
    }

    fn span_over(&self, first: NodeId, last: NodeId) -> Span {
        Span::new(self.node_span(first).start, self.node_span(last).end)
    }

    fn failure(&self, message: impl Into<String>) -> SyntaxFailure {
        match self.peek() {
            Some(token) => self.failure_at(token, message),
            None => {
                let (line, column, offset) = self
                    .tokens
                    .last()
                    .map(|t| (t.end.line, t.end.column, t.span.end))
                    .unwrap_or((1, 1, 0));
                SyntaxFailure {
                    message: message.into(),
                    line,
                    column,
                    offset,
                }
            }
        }
    }

    fn failure_at(&self, token: &Token, message: impl Into<String>) -> SyntaxFailure {
        SyntaxFailure {
            message: message.into(),
            line: token.start.line,
            column: token.start.column,
            offset: token.span.start,
        }
    }

    // ---- statements ---------------------------------------------------

    fn parse_program(mut self) -> Result<Ast, SyntaxFailure> {
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.parse_statement()?);
        }
        let span = match (body.first(), body.last()) {
            (Some(&first), Some(&last)) => self.span_over(first, last),
            _ => Span::new(0, 0),
        };
        let root = self.ast.alloc(NodeKind::Program { body }, span);
        self.ast.set_root(root);
        Ok(self.ast)
    }

    fn parse_statement(&mut self) -> Result<NodeId, SyntaxFailure> {
        let token = self
            .peek()
            .ok_or_else(|| self.failure("unexpected end of input"))?;
        match (token.kind, token.text.as_str()) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => {
                let token = self.bump();
                Ok(self.ast.alloc(NodeKind::EmptyStatement, token.span))
            }
            (TokenKind::Keyword, "var" | "let" | "const") => {
                let declaration = self.parse_variable_declaration()?;
                self.eat_semicolon();
                Ok(declaration)
            }
            (TokenKind::Keyword, "function") => self.parse_function_declaration(),
            (TokenKind::Keyword, "return") => self.parse_return(),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "while") => self.parse_while(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            _ => {
                let expression = self.parse_expression()?;
                let span = self.node_span(expression);
                let statement = self
                    .ast
                    .alloc(NodeKind::ExpressionStatement { expression }, span);
                self.eat_semicolon();
                Ok(statement)
            }
        }
    }

    fn parse_block(&mut self) -> Result<NodeId, SyntaxFailure> {
        let open = self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.at_punct("}") {
            if self.at_end() {
                return Err(self.failure("expected '}'"));
            }
            body.push(self.parse_statement()?);
        }
        let close = self.expect_punct("}")?;
        Ok(self.ast.alloc(
            NodeKind::BlockStatement { body },
            Span::new(open.span.start, close.span.end),
        ))
    }

    fn parse_variable_declaration(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        let kind = match keyword.text.as_str() {
            "var" => DeclarationKind::Var,
            "let" => DeclarationKind::Let,
            _ => DeclarationKind::Const,
        };
        if kind != DeclarationKind::Var && !self.options.es_next {
            return Err(self.failure_at(
                keyword,
                format!("'{}' declarations require esnext", keyword.text),
            ));
        }
        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declarator()?);
            if self.at_punct(",") {
                self.bump();
            } else {
                break;
            }
        }
        let end = self.prev_end();
        Ok(self.ast.alloc(
            NodeKind::VariableDeclaration { kind, declarations },
            Span::new(keyword.span.start, end),
        ))
    }

    fn parse_variable_declarator(&mut self) -> Result<NodeId, SyntaxFailure> {
        let name = self.expect_identifier()?;
        let id = self.ast.alloc(
            NodeKind::Identifier {
                name: name.text.clone(),
            },
            name.span,
        );
        let init = if self.at_punct("=") {
            self.bump();
            Some(self.parse_assignment()?)
        } else {
            None
        };
        let end = init.map(|node| self.node_span(node).end).unwrap_or(name.span.end);
        Ok(self.ast.alloc(
            NodeKind::VariableDeclarator { id, init },
            Span::new(name.span.start, end),
        ))
    }

    fn parse_function_declaration(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        let name = self.expect_identifier()?;
        let id = self.ast.alloc(
            NodeKind::Identifier {
                name: name.text.clone(),
            },
            name.span,
        );
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = Span::new(keyword.span.start, self.node_span(body).end);
        Ok(self.ast.alloc(
            NodeKind::FunctionDeclaration {
                id: Some(id),
                params,
                body,
            },
            span,
        ))
    }

    fn parse_params(&mut self) -> Result<Vec<NodeId>, SyntaxFailure> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.at_punct(")") {
            if self.at_end() {
                return Err(self.failure("expected ')'"));
            }
            let name = self.expect_identifier()?;
            params.push(self.ast.alloc(
                NodeKind::Identifier {
                    name: name.text.clone(),
                },
                name.span,
            ));
            if self.at_punct(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(params)
    }

    fn parse_return(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        let argument = if self.at_punct(";") || self.at_punct("}") || self.at_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let end = argument
            .map(|node| self.node_span(node).end)
            .unwrap_or(keyword.span.end);
        let statement = self.ast.alloc(
            NodeKind::ReturnStatement { argument },
            Span::new(keyword.span.start, end),
        );
        self.eat_semicolon();
        Ok(statement)
    }

    fn parse_if(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let consequent = self.parse_statement()?;
        let alternate = if self.at_keyword("else") {
            self.bump();
            Some(self.parse_statement()?)
        } else {
            None
        };
        let end = alternate
            .map(|node| self.node_span(node).end)
            .unwrap_or(self.node_span(consequent).end);
        Ok(self.ast.alloc(
            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            },
            Span::new(keyword.span.start, end),
        ))
    }

    fn parse_while(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        self.expect_punct("(")?;
        let test = self.parse_expression()?;
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        let span = Span::new(keyword.span.start, self.node_span(body).end);
        Ok(self.ast.alloc(NodeKind::WhileStatement { test, body }, span))
    }

    fn parse_for(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        self.expect_punct("(")?;
        let init = if self.at_punct(";") {
            None
        } else if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
            Some(self.parse_variable_declaration()?)
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(";")?;
        let test = if self.at_punct(";") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(";")?;
        let update = if self.at_punct(")") {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_punct(")")?;
        let body = self.parse_statement()?;
        let span = Span::new(keyword.span.start, self.node_span(body).end);
        Ok(self.ast.alloc(
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            },
            span,
        ))
    }

    // ---- expressions --------------------------------------------------

    fn parse_expression(&mut self) -> Result<NodeId, SyntaxFailure> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<NodeId, SyntaxFailure> {
        let left = self.parse_conditional()?;
        let is_assignment_op = self.peek().is_some_and(|token| {
            token.kind == TokenKind::Punctuator
                && matches!(
                    token.text.as_str(),
                    "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>="
                )
        });
        if !is_assignment_op {
            return Ok(left);
        }
        let operator = self.bump().text.clone();
        let right = self.parse_assignment()?;
        let span = self.span_over(left, right);
        Ok(self.ast.alloc(
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            },
            span,
        ))
    }

    fn parse_conditional(&mut self) -> Result<NodeId, SyntaxFailure> {
        let test = self.parse_binary(0)?;
        if !self.at_punct("?") {
            return Ok(test);
        }
        self.bump();
        let consequent = self.parse_assignment()?;
        self.expect_punct(":")?;
        let alternate = self.parse_assignment()?;
        let span = self.span_over(test, alternate);
        Ok(self.ast.alloc(
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            },
            span,
        ))
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<NodeId, SyntaxFailure> {
        let mut left = self.parse_unary()?;
        while let Some(token) = self.peek() {
            let Some((precedence, logical)) = binary_precedence(token) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            let operator = self.bump().text.clone();
            let right = self.parse_binary(precedence + 1)?;
            let span = self.span_over(left, right);
            let kind = if logical {
                NodeKind::LogicalExpression {
                    operator,
                    left,
                    right,
                }
            } else {
                NodeKind::BinaryExpression {
                    operator,
                    left,
                    right,
                }
            };
            left = self.ast.alloc(kind, span);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<NodeId, SyntaxFailure> {
        let Some(token) = self.peek() else {
            return Err(self.failure("unexpected end of input"));
        };
        let is_unary = matches!(
            (token.kind, token.text.as_str()),
            (TokenKind::Punctuator, "!" | "~" | "+" | "-")
                | (TokenKind::Keyword, "typeof" | "void" | "delete")
        );
        if is_unary {
            let operator = self.bump();
            let argument = self.parse_unary()?;
            let span = Span::new(operator.span.start, self.node_span(argument).end);
            return Ok(self.ast.alloc(
                NodeKind::UnaryExpression {
                    operator: operator.text.clone(),
                    argument,
                },
                span,
            ));
        }
        if token.is_punctuator("++") || token.is_punctuator("--") {
            let operator = self.bump();
            let argument = self.parse_unary()?;
            let span = Span::new(operator.span.start, self.node_span(argument).end);
            return Ok(self.ast.alloc(
                NodeKind::UpdateExpression {
                    operator: operator.text.clone(),
                    argument,
                    prefix: true,
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<NodeId, SyntaxFailure> {
        let expression = self.parse_call_member(true)?;
        if self.at_punct("++") || self.at_punct("--") {
            let operator = self.bump();
            let span = Span::new(self.node_span(expression).start, operator.span.end);
            return Ok(self.ast.alloc(
                NodeKind::UpdateExpression {
                    operator: operator.text.clone(),
                    argument: expression,
                    prefix: false,
                },
                span,
            ));
        }
        Ok(expression)
    }

    fn parse_call_member(&mut self, allow_call: bool) -> Result<NodeId, SyntaxFailure> {
        let mut expression = if self.at_keyword("new") {
            let keyword = self.bump();
            let callee = self.parse_call_member(false)?;
            let (arguments, end) = if self.at_punct("(") {
                let arguments = self.parse_arguments()?;
                (arguments, self.prev_end())
            } else {
                (Vec::new(), self.node_span(callee).end)
            };
            self.ast.alloc(
                NodeKind::NewExpression { callee, arguments },
                Span::new(keyword.span.start, end),
            )
        } else {
            self.parse_primary()?
        };

        loop {
            if self.at_punct(".") {
                self.bump();
                let name = self.expect_identifier_name()?;
                let property = self.ast.alloc(
                    NodeKind::Identifier {
                        name: name.text.clone(),
                    },
                    name.span,
                );
                let span = Span::new(self.node_span(expression).start, name.span.end);
                expression = self.ast.alloc(
                    NodeKind::MemberExpression {
                        object: expression,
                        property,
                        computed: false,
                    },
                    span,
                );
            } else if self.at_punct("[") {
                self.bump();
                let property = self.parse_expression()?;
                let close = self.expect_punct("]")?;
                let span = Span::new(self.node_span(expression).start, close.span.end);
                expression = self.ast.alloc(
                    NodeKind::MemberExpression {
                        object: expression,
                        property,
                        computed: true,
                    },
                    span,
                );
            } else if allow_call && self.at_punct("(") {
                let arguments = self.parse_arguments()?;
                let span = Span::new(self.node_span(expression).start, self.prev_end());
                expression = self.ast.alloc(
                    NodeKind::CallExpression {
                        callee: expression,
                        arguments,
                    },
                    span,
                );
            } else {
                break;
            }
        }
        Ok(expression)
    }

    /// Member names may be any identifier-like word, reserved or not
    fn expect_identifier_name(&mut self) -> Result<&'t Token, SyntaxFailure> {
        let is_name = self.peek().is_some_and(|token| {
            matches!(
                token.kind,
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::Boolean | TokenKind::Null
            )
        });
        if is_name {
            Ok(self.bump())
        } else {
            Err(self.failure("expected property name"))
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<NodeId>, SyntaxFailure> {
        self.expect_punct("(")?;
        let mut arguments = Vec::new();
        while !self.at_punct(")") {
            if self.at_end() {
                return Err(self.failure("expected ')'"));
            }
            arguments.push(self.parse_argument()?);
            if self.at_punct(",") {
                self.bump();
            } else {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(arguments)
    }

    fn parse_argument(&mut self) -> Result<NodeId, SyntaxFailure> {
        if !self.at_punct("...") {
            return self.parse_assignment();
        }
        let dots = self.bump();
        if !self.options.es_next {
            return Err(self.failure_at(dots, "spread arguments require esnext"));
        }
        let argument = self.parse_assignment()?;
        let span = Span::new(dots.span.start, self.node_span(argument).end);
        Ok(self.ast.alloc(NodeKind::SpreadElement { argument }, span))
    }

    fn parse_primary(&mut self) -> Result<NodeId, SyntaxFailure> {
        let Some(token) = self.peek() else {
            return Err(self.failure("unexpected end of input"));
        };
        match (token.kind, token.text.as_str()) {
            (TokenKind::Identifier, _) | (TokenKind::Keyword, "this") => {
                let token = self.bump();
                Ok(self.ast.alloc(
                    NodeKind::Identifier {
                        name: token.text.clone(),
                    },
                    token.span,
                ))
            }
            (TokenKind::Keyword, "function") => self.parse_function_expression(),
            (TokenKind::String, _) => {
                let token = self.bump();
                Ok(self.ast.alloc(
                    NodeKind::StringLiteral {
                        value: decode_string(&token.text),
                    },
                    token.span,
                ))
            }
            (TokenKind::Number, _) => {
                let token = self.bump();
                let value = number_value(token).ok_or_else(|| {
                    self.failure_at(token, format!("invalid number '{}'", token.text))
                })?;
                Ok(self.ast.alloc(NodeKind::NumericLiteral { value }, token.span))
            }
            (TokenKind::Boolean, _) => {
                let token = self.bump();
                Ok(self.ast.alloc(
                    NodeKind::BooleanLiteral {
                        value: token.text == "true",
                    },
                    token.span,
                ))
            }
            (TokenKind::Null, _) => {
                let token = self.bump();
                Ok(self.ast.alloc(NodeKind::NullLiteral, token.span))
            }
            (TokenKind::Punctuator, "(") => {
                self.bump();
                let expression = self.parse_assignment()?;
                self.expect_punct(")")?;
                Ok(expression)
            }
            (TokenKind::Punctuator, "{") => self.parse_object_literal(),
            (TokenKind::Punctuator, "[") => self.parse_array_literal(),
            _ => Err(self.failure(format!("unexpected token '{}'", token.text))),
        }
    }

    fn parse_function_expression(&mut self) -> Result<NodeId, SyntaxFailure> {
        let keyword = self.bump();
        let id = if self.peek().is_some_and(|t| t.kind == TokenKind::Identifier) {
            let name = self.bump();
            Some(self.ast.alloc(
                NodeKind::Identifier {
                    name: name.text.clone(),
                },
                name.span,
            ))
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = Span::new(keyword.span.start, self.node_span(body).end);
        Ok(self
            .ast
            .alloc(NodeKind::FunctionExpression { id, params, body }, span))
    }

    fn parse_object_literal(&mut self) -> Result<NodeId, SyntaxFailure> {
        let open = self.expect_punct("{")?;
        let mut properties = Vec::new();
        while !self.at_punct("}") {
            if self.at_end() {
                return Err(self.failure("expected '}'"));
            }
            properties.push(self.parse_property()?);
            if self.at_punct(",") {
                self.bump();
            } else {
                break;
            }
        }
        let close = self.expect_punct("}")?;
        Ok(self.ast.alloc(
            NodeKind::ObjectExpression { properties },
            Span::new(open.span.start, close.span.end),
        ))
    }

    fn parse_property(&mut self) -> Result<NodeId, SyntaxFailure> {
        let token = self
            .peek()
            .ok_or_else(|| self.failure("expected property"))?;

        // `get key() {}` / `set key(v) {}`; a following key distinguishes
        // the accessor form from `get` used as a plain key
        let is_accessor = token.kind == TokenKind::Identifier
            && (token.text == "get" || token.text == "set")
            && self.peek_ahead(1).is_some_and(is_property_key);
        if is_accessor {
            let keyword = self.bump();
            let kind = if keyword.text == "get" {
                PropertyKind::Get
            } else {
                PropertyKind::Set
            };
            let key = self.parse_property_key()?;
            let (value, end) = self.parse_property_function()?;
            return Ok(self.ast.alloc(
                NodeKind::Property {
                    key,
                    value,
                    kind,
                    shorthand: false,
                    method: false,
                },
                Span::new(keyword.span.start, end),
            ));
        }

        let key = self.parse_property_key()?;
        if self.at_punct(":") {
            self.bump();
            let value = self.parse_assignment()?;
            let span = self.span_over(key, value);
            return Ok(self.ast.alloc(
                NodeKind::Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    shorthand: false,
                    method: false,
                },
                span,
            ));
        }
        if self.at_punct("(") {
            if !self.options.es_next {
                return Err(self.failure("method shorthand requires esnext"));
            }
            let (value, end) = self.parse_property_function()?;
            let span = Span::new(self.node_span(key).start, end);
            return Ok(self.ast.alloc(
                NodeKind::Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    shorthand: false,
                    method: true,
                },
                span,
            ));
        }
        if self.at_punct(",") || self.at_punct("}") {
            if !self.options.es_next {
                return Err(self.failure("shorthand properties require esnext"));
            }
            let span = self.node_span(key);
            return Ok(self.ast.alloc(
                NodeKind::Property {
                    key,
                    value: key,
                    kind: PropertyKind::Init,
                    shorthand: true,
                    method: false,
                },
                span,
            ));
        }
        Err(self.failure("expected ':'"))
    }

    /// The parenthesized params and body of an accessor or method; the
    /// function node spans `( ... ) { ... }`
    fn parse_property_function(&mut self) -> Result<(NodeId, usize), SyntaxFailure> {
        let start = self
            .peek()
            .map(|token| token.span.start)
            .unwrap_or_else(|| self.prev_end());
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let end = self.node_span(body).end;
        let value = self.ast.alloc(
            NodeKind::FunctionExpression {
                id: None,
                params,
                body,
            },
            Span::new(start, end),
        );
        Ok((value, end))
    }

    fn parse_property_key(&mut self) -> Result<NodeId, SyntaxFailure> {
        let Some(token) = self.peek() else {
            return Err(self.failure("expected property name"));
        };
        match token.kind {
            TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::Boolean
            | TokenKind::Null => {
                let token = self.bump();
                Ok(self.ast.alloc(
                    NodeKind::Identifier {
                        name: token.text.clone(),
                    },
                    token.span,
                ))
            }
            TokenKind::String => {
                let token = self.bump();
                Ok(self.ast.alloc(
                    NodeKind::StringLiteral {
                        value: decode_string(&token.text),
                    },
                    token.span,
                ))
            }
            TokenKind::Number => {
                let token = self.bump();
                let value = number_value(token).ok_or_else(|| {
                    self.failure_at(token, format!("invalid number '{}'", token.text))
                })?;
                Ok(self.ast.alloc(NodeKind::NumericLiteral { value }, token.span))
            }
            _ => Err(self.failure("expected property name")),
        }
    }

    fn parse_array_literal(&mut self) -> Result<NodeId, SyntaxFailure> {
        let open = self.expect_punct("[")?;
        let mut elements = Vec::new();
        while !self.at_punct("]") {
            if self.at_end() {
                return Err(self.failure("expected ']'"));
            }
            elements.push(self.parse_argument()?);
            if self.at_punct(",") {
                self.bump();
            } else {
                break;
            }
        }
        let close = self.expect_punct("]")?;
        Ok(self.ast.alloc(
            NodeKind::ArrayExpression { elements },
            Span::new(open.span.start, close.span.end),
        ))
    }
}

fn is_property_key(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::Boolean
            | TokenKind::Null
            | TokenKind::String
            | TokenKind::Number
    )
}

fn binary_precedence(token: &Token) -> Option<(u8, bool)> {
    match (token.kind, token.text.as_str()) {
        (TokenKind::Punctuator, "||") => Some((1, true)),
        (TokenKind::Punctuator, "&&") => Some((2, true)),
        (TokenKind::Punctuator, "|") => Some((3, false)),
        (TokenKind::Punctuator, "^") => Some((4, false)),
        (TokenKind::Punctuator, "&") => Some((5, false)),
        (TokenKind::Punctuator, "==" | "!=" | "===" | "!==") => Some((6, false)),
        (TokenKind::Punctuator, "<" | ">" | "<=" | ">=") => Some((7, false)),
        (TokenKind::Keyword, "in" | "instanceof") => Some((7, false)),
        (TokenKind::Punctuator, "<<" | ">>" | ">>>") => Some((8, false)),
        (TokenKind::Punctuator, "+" | "-") => Some((9, false)),
        (TokenKind::Punctuator, "*" | "/" | "%") => Some((10, false)),
        _ => None,
    }
}

/// Strip quotes and resolve escapes; unknown escapes keep the escaped char
fn decode_string(raw: &str) -> String {
    let inner = &raw[1..raw.len().saturating_sub(1).max(1)];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('v') => out.push('\u{000B}'),
            Some('0') => out.push('\0'),
            Some('x') => push_hex_escape(&mut out, &mut chars, 2, 'x'),
            Some('u') => push_hex_escape(&mut out, &mut chars, 4, 'u'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn push_hex_escape(out: &mut String, chars: &mut std::str::Chars<'_>, len: usize, marker: char) {
    let digits: String = chars.by_ref().take(len).collect();
    match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
        Some(ch) if digits.len() == len => out.push(ch),
        _ => {
            out.push(marker);
            out.push_str(&digits);
        }
    }
}

fn number_value(token: &Token) -> Option<f64> {
    let text = token.text.as_str();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    let normalized = if text.starts_with('.') {
        format!("0{text}")
    } else {
        text.to_string()
    };
    normalized.parse::<f64>().ok()
}
