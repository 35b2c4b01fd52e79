//! Recursive-descent parser for the member language.
//!
//! The parser never fails: malformed input produces missing (zero-width)
//! tokens or `SkippedTokens` nodes plus a `ParseDiagnostic`, and a complete
//! tree is always returned. Nodes are assembled with a flat builder that
//! supports checkpoints, so left-recursive shapes (member access, binary
//! expressions, the field/property/method split) are wrapped after the fact.

use crate::green::{GreenElement, GreenNode, GreenToken};
use crate::kind::SyntaxKind;
use crate::scanner::Scanner;
use crate::tree::SyntaxTree;
use propfix_common::TextSpan;
use propfix_common::limits::MAX_PARSER_NESTING;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub span: TextSpan,
    pub message: String,
}

/// Parse source text into a syntax tree.
pub fn parse(text: &str) -> SyntaxTree {
    let tokens = Scanner::new(text).scan_all();
    let mut parser = Parser::new(tokens);
    parser.parse_compilation_unit();
    let (root, diagnostics) = parser.finish();
    trace!(
        len = text.len(),
        diagnostics = diagnostics.len(),
        "parsed compilation unit"
    );
    SyntaxTree::with_diagnostics(Arc::new(root), diagnostics)
}

#[derive(Clone, Copy)]
struct Checkpoint(usize);

#[derive(Default)]
struct Builder {
    children: Vec<GreenElement>,
    parents: Vec<(SyntaxKind, usize)>,
}

impl Builder {
    fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.parents.push((kind, checkpoint.0));
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    fn token(&mut self, token: Arc<GreenToken>) {
        self.children.push(GreenElement::Token(token));
    }

    fn finish_node(&mut self) {
        if let Some((kind, first)) = self.parents.pop() {
            let children = self.children.split_off(first);
            self.children.push(GreenElement::from(GreenNode::new(kind, children)));
        }
    }
}

struct Parser {
    tokens: Vec<Arc<GreenToken>>,
    /// Absolute start of each token's full span, for diagnostics.
    offsets: Vec<u32>,
    pos: usize,
    builder: Builder,
    diagnostics: Vec<ParseDiagnostic>,
    depth: u32,
}

impl Parser {
    fn new(tokens: Vec<GreenToken>) -> Self {
        let mut offsets = Vec::with_capacity(tokens.len());
        let mut offset = 0u32;
        for token in &tokens {
            offsets.push(offset + token.leading_len());
            offset += token.full_len();
        }
        Parser {
            tokens: tokens.into_iter().map(Arc::new).collect(),
            offsets,
            pos: 0,
            builder: Builder::default(),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn finish(mut self) -> (GreenNode, Vec<ParseDiagnostic>) {
        let root = match self.builder.children.pop() {
            Some(GreenElement::Node(node)) => Arc::unwrap_or_clone(node),
            _ => GreenNode::new(SyntaxKind::CompilationUnit, Vec::new()),
        };
        (root, self.diagnostics)
    }

    // -----------------------------------------------------------------------
    // Token cursor
    // -----------------------------------------------------------------------

    fn nth(&self, n: usize) -> SyntaxKind {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens
            .get((self.pos + n).min(last))
            .map_or(SyntaxKind::EndOfFileToken, |t| t.kind())
    }

    fn nth_text(&self, n: usize) -> &str {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens
            .get((self.pos + n).min(last))
            .map_or("", |t| t.text())
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::EndOfFileToken)
    }

    fn at_contextual(&self, n: usize, word: &str) -> bool {
        self.nth(n) == SyntaxKind::IdentifierToken && self.nth_text(n) == word
    }

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(Arc::clone(token));
            if token.kind() != SyntaxKind::EndOfFileToken {
                self.pos += 1;
            }
        }
    }

    /// Consume the current token under a different kind (contextual keywords).
    fn bump_remap(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.tokens.get(self.pos) {
            let remapped = GreenToken::clone(token).with_kind(kind);
            self.builder.token(Arc::new(remapped));
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if !self.eat(kind) {
            self.error(format!("expected {kind:?}, found {:?}", self.current()));
            self.builder.token(Arc::new(GreenToken::missing(kind)));
        }
    }

    fn error(&mut self, message: String) {
        let offset = self.offsets.get(self.pos).copied().unwrap_or(0);
        let len = self
            .tokens
            .get(self.pos)
            .map_or(0, |t| t.text().len() as u32);
        self.diagnostics.push(ParseDiagnostic {
            span: TextSpan::at(offset, len),
            message,
        });
    }

    /// Wrap the current token in a `SkippedTokens` node so loops make progress.
    fn skip_token(&mut self, message: &str) {
        self.error(format!("{message}, found {:?}", self.current()));
        if self.at_eof() {
            return;
        }
        self.builder.start_node(SyntaxKind::SkippedTokens);
        self.bump();
        self.builder.finish_node();
    }

    fn enter(&mut self) -> bool {
        if self.depth >= MAX_PARSER_NESTING {
            self.error("nesting too deep".to_string());
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    fn parse_compilation_unit(&mut self) {
        self.builder.start_node(SyntaxKind::CompilationUnit);
        while self.at(SyntaxKind::UsingKeyword) {
            self.parse_using_directive();
        }
        self.parse_namespace_members(None);
        self.expect(SyntaxKind::EndOfFileToken);
        self.builder.finish_node();
    }

    fn parse_using_directive(&mut self) {
        self.builder.start_node(SyntaxKind::UsingDirective);
        self.bump();
        self.parse_name();
        self.expect(SyntaxKind::SemicolonToken);
        self.builder.finish_node();
    }

    /// Members of a compilation unit or namespace, until `terminator` (or EOF).
    fn parse_namespace_members(&mut self, terminator: Option<SyntaxKind>) {
        loop {
            if self.at_eof() || terminator.is_some_and(|t| self.at(t)) {
                return;
            }
            match self.current() {
                SyntaxKind::NamespaceKeyword => self.parse_namespace(),
                SyntaxKind::UsingKeyword => self.parse_using_directive(),
                _ => self.parse_member(),
            }
        }
    }

    fn parse_namespace(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.bump();
        self.parse_name();
        if self.at(SyntaxKind::SemicolonToken) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::FileScopedNamespaceDeclaration);
            self.bump();
            self.parse_namespace_members(None);
        } else {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::NamespaceDeclaration);
            self.expect(SyntaxKind::OpenBraceToken);
            self.parse_namespace_members(Some(SyntaxKind::CloseBraceToken));
            self.expect(SyntaxKind::CloseBraceToken);
        }
        self.builder.finish_node();
    }

    fn at_modifier(&self) -> bool {
        let kind = self.current();
        if kind.is_modifier() {
            return true;
        }
        // `partial` is only a modifier right before a type or another modifier.
        self.at_contextual(0, "partial")
            && matches!(
                self.nth(1),
                SyntaxKind::ClassKeyword | SyntaxKind::StructKeyword | SyntaxKind::VoidKeyword
            )
    }

    fn parse_modifiers(&mut self) {
        while self.at_modifier() {
            if self.current() == SyntaxKind::IdentifierToken {
                self.bump_remap(SyntaxKind::PartialKeyword);
            } else {
                self.bump();
            }
        }
    }

    fn parse_member(&mut self) {
        let start = self.pos;
        let checkpoint = self.builder.checkpoint();
        self.parse_modifiers();

        match self.current() {
            SyntaxKind::ClassKeyword | SyntaxKind::StructKeyword => {
                self.parse_type_declaration(checkpoint);
                return;
            }
            SyntaxKind::IdentifierToken if self.nth(1) == SyntaxKind::OpenParenToken => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration);
                self.bump();
                self.parse_parameter_list();
                self.parse_method_body();
                self.builder.finish_node();
                return;
            }
            _ => {}
        }

        if !self.at_type_start() {
            if self.pos == start {
                self.skip_token("expected member declaration");
            } else {
                // modifiers with nothing after them
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::SkippedTokens);
                self.error("expected member declaration".to_string());
                self.builder.finish_node();
            }
            return;
        }

        let type_checkpoint = self.builder.checkpoint();
        self.parse_type();

        match (self.current(), self.nth(1)) {
            (SyntaxKind::IdentifierToken, SyntaxKind::OpenParenToken) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::MethodDeclaration);
                self.bump();
                self.parse_parameter_list();
                self.parse_method_body();
            }
            (SyntaxKind::IdentifierToken, SyntaxKind::OpenBraceToken) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
                self.bump();
                self.parse_accessor_list();
                if self.at(SyntaxKind::EqualsToken) {
                    self.parse_equals_value_clause();
                    self.expect(SyntaxKind::SemicolonToken);
                }
            }
            (SyntaxKind::IdentifierToken, SyntaxKind::EqualsGreaterThanToken) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
                self.bump();
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::SemicolonToken);
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::FieldDeclaration);
                self.builder
                    .start_node_at(type_checkpoint, SyntaxKind::VariableDeclaration);
                self.parse_variable_declarators();
                self.builder.finish_node();
                self.expect(SyntaxKind::SemicolonToken);
            }
        }
        self.builder.finish_node();
    }

    fn parse_type_declaration(&mut self, checkpoint: Checkpoint) {
        let kind = if self.at(SyntaxKind::ClassKeyword) {
            SyntaxKind::ClassDeclaration
        } else {
            SyntaxKind::StructDeclaration
        };
        self.builder.start_node_at(checkpoint, kind);
        self.bump();
        self.expect(SyntaxKind::IdentifierToken);
        self.expect(SyntaxKind::OpenBraceToken);
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            self.parse_member();
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.eat(SyntaxKind::SemicolonToken);
        self.builder.finish_node();
    }

    fn parse_variable_declarators(&mut self) {
        loop {
            self.builder.start_node(SyntaxKind::VariableDeclarator);
            self.expect(SyntaxKind::IdentifierToken);
            if self.at(SyntaxKind::EqualsToken) {
                self.parse_equals_value_clause();
            }
            self.builder.finish_node();
            if !self.eat(SyntaxKind::CommaToken) {
                return;
            }
        }
    }

    fn parse_equals_value_clause(&mut self) {
        self.builder.start_node(SyntaxKind::EqualsValueClause);
        self.bump();
        self.parse_expression();
        self.builder.finish_node();
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.builder.start_node(SyntaxKind::ArrowExpressionClause);
        self.bump();
        self.parse_expression();
        self.builder.finish_node();
    }

    fn parse_accessor_list(&mut self) {
        self.builder.start_node(SyntaxKind::AccessorList);
        self.expect(SyntaxKind::OpenBraceToken);
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            self.parse_accessor();
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.builder.finish_node();
    }

    fn parse_accessor(&mut self) {
        let mut n = 0;
        while self.nth(n).is_accessibility_modifier() {
            n += 1;
        }
        let (node_kind, keyword) = match self.nth_text(n) {
            "get" => (SyntaxKind::GetAccessorDeclaration, SyntaxKind::GetKeyword),
            "set" => (SyntaxKind::SetAccessorDeclaration, SyntaxKind::SetKeyword),
            "init" => (SyntaxKind::InitAccessorDeclaration, SyntaxKind::InitKeyword),
            _ => {
                self.skip_token("expected 'get', 'set' or 'init'");
                return;
            }
        };
        if self.nth(n) != SyntaxKind::IdentifierToken {
            self.skip_token("expected accessor keyword");
            return;
        }

        self.builder.start_node(node_kind);
        for _ in 0..n {
            self.bump();
        }
        self.bump_remap(keyword);
        match self.current() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::EqualsGreaterThanToken => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::SemicolonToken);
            }
            _ => self.expect(SyntaxKind::SemicolonToken),
        }
        self.builder.finish_node();
    }

    fn parse_parameter_list(&mut self) {
        self.builder.start_node(SyntaxKind::ParameterList);
        self.expect(SyntaxKind::OpenParenToken);
        if !self.at(SyntaxKind::CloseParenToken) {
            loop {
                self.builder.start_node(SyntaxKind::Parameter);
                if self.at_type_start() {
                    self.parse_type();
                } else {
                    self.error("expected parameter type".to_string());
                }
                self.expect(SyntaxKind::IdentifierToken);
                self.builder.finish_node();
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken);
        self.builder.finish_node();
    }

    fn parse_method_body(&mut self) {
        match self.current() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::EqualsGreaterThanToken => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::SemicolonToken);
            }
            _ => self.expect(SyntaxKind::SemicolonToken),
        }
    }

    // -----------------------------------------------------------------------
    // Types and names
    // -----------------------------------------------------------------------

    fn at_type_start(&self) -> bool {
        self.current().is_predefined_type() || self.at(SyntaxKind::IdentifierToken)
    }

    fn parse_name(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.builder.start_node(SyntaxKind::IdentifierName);
        self.expect(SyntaxKind::IdentifierToken);
        self.builder.finish_node();
        while self.at(SyntaxKind::DotToken) && self.nth(1) == SyntaxKind::IdentifierToken {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::QualifiedName);
            self.bump();
            self.builder.start_node(SyntaxKind::IdentifierName);
            self.bump();
            self.builder.finish_node();
            self.builder.finish_node();
        }
    }

    fn parse_type(&mut self) {
        let checkpoint = self.builder.checkpoint();
        if self.current().is_predefined_type() {
            self.builder.start_node(SyntaxKind::PredefinedType);
            self.bump();
            self.builder.finish_node();
        } else {
            self.parse_name();
        }
        loop {
            match (self.current(), self.nth(1)) {
                (SyntaxKind::QuestionToken, _) => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::NullableType);
                    self.bump();
                    self.builder.finish_node();
                }
                (SyntaxKind::OpenBracketToken, SyntaxKind::CloseBracketToken) => {
                    self.builder.start_node_at(checkpoint, SyntaxKind::ArrayType);
                    self.bump();
                    self.bump();
                    self.builder.finish_node();
                }
                _ => return,
            }
        }
    }

    /// Lookahead: `Type name` followed by `=`, `;` or `,`.
    fn at_local_declaration(&self) -> bool {
        let first = self.nth(0);
        if !first.is_predefined_type() && first != SyntaxKind::IdentifierToken {
            return false;
        }
        let mut n = 1;
        if first == SyntaxKind::IdentifierToken {
            while self.nth(n) == SyntaxKind::DotToken && self.nth(n + 1) == SyntaxKind::IdentifierToken
            {
                n += 2;
            }
        }
        loop {
            match (self.nth(n), self.nth(n + 1)) {
                (SyntaxKind::QuestionToken, _) => n += 1,
                (SyntaxKind::OpenBracketToken, SyntaxKind::CloseBracketToken) => n += 2,
                _ => break,
            }
        }
        self.nth(n) == SyntaxKind::IdentifierToken
            && matches!(
                self.nth(n + 1),
                SyntaxKind::EqualsToken | SyntaxKind::SemicolonToken | SyntaxKind::CommaToken
            )
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::OpenBraceToken);
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            let start = self.pos;
            self.parse_statement();
            if self.pos == start {
                self.skip_token("expected statement");
            }
        }
        self.expect(SyntaxKind::CloseBraceToken);
        self.builder.finish_node();
    }

    fn parse_statement(&mut self) {
        if !self.enter() {
            self.skip_token("statement nesting limit reached");
            return;
        }
        match self.current() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                self.builder.start_node(SyntaxKind::EmptyStatement);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::ReturnKeyword => {
                self.builder.start_node(SyntaxKind::ReturnStatement);
                self.bump();
                if !self.at(SyntaxKind::SemicolonToken) {
                    self.parse_expression();
                }
                self.expect(SyntaxKind::SemicolonToken);
                self.builder.finish_node();
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            _ if self.at_local_declaration() => {
                self.builder
                    .start_node(SyntaxKind::LocalDeclarationStatement);
                self.builder.start_node(SyntaxKind::VariableDeclaration);
                self.parse_type();
                self.parse_variable_declarators();
                self.builder.finish_node();
                self.expect(SyntaxKind::SemicolonToken);
                self.builder.finish_node();
            }
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken => {}
            _ => {
                let start = self.pos;
                self.builder.start_node(SyntaxKind::ExpressionStatement);
                self.parse_expression();
                if self.pos == start {
                    // nothing parsed; let the caller skip the token
                    self.builder.finish_node();
                    self.leave();
                    return;
                }
                self.expect(SyntaxKind::SemicolonToken);
                self.builder.finish_node();
            }
        }
        self.leave();
    }

    fn parse_if_statement(&mut self) {
        self.builder.start_node(SyntaxKind::IfStatement);
        self.bump();
        self.expect(SyntaxKind::OpenParenToken);
        self.parse_expression();
        self.expect(SyntaxKind::CloseParenToken);
        self.parse_embedded_statement();
        if self.at(SyntaxKind::ElseKeyword) {
            self.builder.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.parse_embedded_statement();
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_embedded_statement(&mut self) {
        let start = self.pos;
        self.parse_statement();
        if self.pos == start {
            self.error("expected statement".to_string());
            self.builder.start_node(SyntaxKind::EmptyStatement);
            self.builder
                .token(Arc::new(GreenToken::missing(SyntaxKind::SemicolonToken)));
            self.builder.finish_node();
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn parse_expression(&mut self) {
        if !self.enter() {
            self.missing_expression();
            return;
        }
        let checkpoint = self.builder.checkpoint();
        self.parse_binary(0);
        if matches!(
            self.current(),
            SyntaxKind::EqualsToken | SyntaxKind::PlusEqualsToken | SyntaxKind::MinusEqualsToken
        ) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::AssignmentExpression);
            self.bump();
            self.parse_expression();
            self.builder.finish_node();
        }
        self.leave();
    }

    fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
        use SyntaxKind::*;
        Some(match kind {
            BarBarToken => 1,
            AmpersandAmpersandToken => 2,
            EqualsEqualsToken | ExclamationEqualsToken => 3,
            LessThanToken | GreaterThanToken | LessThanEqualsToken | GreaterThanEqualsToken => 4,
            PlusToken | MinusToken => 5,
            AsteriskToken | SlashToken | PercentToken => 6,
            _ => return None,
        })
    }

    fn parse_binary(&mut self, min_precedence: u8) {
        let checkpoint = self.builder.checkpoint();
        self.parse_unary();
        while let Some(precedence) = Self::binary_precedence(self.current()) {
            if precedence < min_precedence {
                break;
            }
            self.builder
                .start_node_at(checkpoint, SyntaxKind::BinaryExpression);
            self.bump();
            self.parse_binary(precedence + 1);
            self.builder.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        match self.current() {
            SyntaxKind::ExclamationToken
            | SyntaxKind::MinusToken
            | SyntaxKind::PlusToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                if !self.enter() {
                    self.missing_expression();
                    return;
                }
                self.builder.start_node(SyntaxKind::PrefixUnaryExpression);
                self.bump();
                self.parse_unary();
                self.builder.finish_node();
                self.leave();
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.builder.checkpoint();
        if !self.parse_primary() {
            return;
        }
        loop {
            match self.current() {
                SyntaxKind::DotToken => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.builder.start_node(SyntaxKind::IdentifierName);
                    self.expect(SyntaxKind::IdentifierToken);
                    self.builder.finish_node();
                    self.builder.finish_node();
                }
                SyntaxKind::OpenParenToken => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::InvocationExpression);
                    self.parse_argument_list();
                    self.builder.finish_node();
                }
                SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression);
                    self.bump();
                    self.builder.finish_node();
                }
                _ => return,
            }
        }
    }

    /// Returns false when no expression could be started.
    fn parse_primary(&mut self) -> bool {
        match self.current() {
            SyntaxKind::IdentifierToken => {
                self.builder.start_node(SyntaxKind::IdentifierName);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::NumericLiteralToken
            | SyntaxKind::StringLiteralToken
            | SyntaxKind::CharacterLiteralToken
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => {
                self.builder.start_node(SyntaxKind::LiteralExpression);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::ThisKeyword => {
                self.builder.start_node(SyntaxKind::ThisExpression);
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::NewKeyword => {
                self.builder
                    .start_node(SyntaxKind::ObjectCreationExpression);
                self.bump();
                if self.at_type_start() {
                    self.parse_type();
                } else {
                    self.error("expected type after 'new'".to_string());
                }
                if self.at(SyntaxKind::OpenParenToken) {
                    self.parse_argument_list();
                } else {
                    self.error("expected argument list".to_string());
                }
                self.builder.finish_node();
            }
            SyntaxKind::OpenParenToken => {
                self.builder
                    .start_node(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.parse_expression();
                self.expect(SyntaxKind::CloseParenToken);
                self.builder.finish_node();
            }
            kind if kind.is_predefined_type() => {
                // `int.MaxValue`, `string.Empty`
                self.builder.start_node(SyntaxKind::PredefinedType);
                self.bump();
                self.builder.finish_node();
            }
            _ => {
                self.missing_expression();
                return false;
            }
        }
        true
    }

    fn missing_expression(&mut self) {
        self.error("expected expression".to_string());
        self.builder.start_node(SyntaxKind::IdentifierName);
        self.builder
            .token(Arc::new(GreenToken::missing(SyntaxKind::IdentifierToken)));
        self.builder.finish_node();
    }

    fn parse_argument_list(&mut self) {
        self.builder.start_node(SyntaxKind::ArgumentList);
        self.expect(SyntaxKind::OpenParenToken);
        if !self.at(SyntaxKind::CloseParenToken) {
            loop {
                self.builder.start_node(SyntaxKind::Argument);
                self.parse_expression();
                self.builder.finish_node();
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken);
        self.builder.finish_node();
    }
}
