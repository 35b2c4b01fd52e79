//! Two-pass binder.
//!
//! Pass one declares every namespace, type and member across all documents of
//! a project, merging `partial` types by full name. Pass two walks member
//! bodies with a scope stack, declares locals, and binds every name token to
//! the symbols it refers to.
//!
//! Name lookup for a simple name checks, in order: locals and parameters,
//! the implicit `value` of `set`/`init` accessors (which binds to nothing),
//! members of the containing type and its enclosing types, then types.
//! Member access binds through the static type of the receiver. Invocations
//! prefer methods whose parameter count matches the argument count.

use crate::key::SymbolKey;
use crate::symbol::{Declaration, SymbolData, SymbolId, SymbolKind};
use propfix_common::DocumentId;
use propfix_common::limits::MAX_MEMBER_ACCESS_DEPTH;
use propfix_syntax::{NodeId, SyntaxKind, SyntaxNode, SyntaxToken, SyntaxTree, TokenId};
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use tracing::trace;

pub(crate) type Candidates = SmallVec<[SymbolId; 1]>;

#[derive(Default)]
pub(crate) struct BindResult {
    pub symbols: Vec<SymbolData>,
    pub by_key: FxHashMap<SymbolKey, SymbolId>,
    pub declared: FxHashMap<NodeId, SymbolId>,
    pub bindings: FxHashMap<TokenId, Candidates>,
    pub members: FxHashMap<SymbolId, Vec<SymbolId>>,
}

#[derive(Default)]
pub(crate) struct Binder {
    result: BindResult,
    types_by_simple_name: FxHashMap<String, SmallVec<[SymbolId; 2]>>,
}

/// State while binding one member body.
struct BodyContext {
    ty: Option<SymbolId>,
    member: Option<SymbolId>,
    scopes: Vec<Vec<(String, SymbolId)>>,
    /// Inside a `set` or `init` accessor.
    implicit_value: bool,
    local_ordinals: FxHashMap<String, u32>,
}

impl BodyContext {
    fn new(ty: Option<SymbolId>, member: Option<SymbolId>) -> Self {
        BodyContext {
            ty,
            member,
            scopes: Vec::new(),
            implicit_value: false,
            local_ordinals: FxHashMap::default(),
        }
    }
}

fn name_of(token: Option<SyntaxToken<'_>>) -> Option<SyntaxToken<'_>> {
    token.filter(|t| !t.text().is_empty())
}

fn type_child(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    node.child_nodes().find(|n| n.kind().is_type_syntax())
}

fn last_identifier(node: SyntaxNode<'_>) -> Option<SyntaxToken<'_>> {
    node.descendant_tokens()
        .filter(|t| t.kind() == SyntaxKind::IdentifierToken && !t.text().is_empty())
        .last()
}

impl Binder {
    pub fn finish(self) -> BindResult {
        self.result
    }

    fn data(&self, id: SymbolId) -> &SymbolData {
        &self.result.symbols[id.index()]
    }

    fn child_key(&self, container: Option<SymbolId>, kind: SymbolKind, name: &str) -> SymbolKey {
        match container {
            Some(container) => self.data(container).key.child(kind, name),
            None => SymbolKey::new(kind, name),
        }
    }

    fn add_symbol(&mut self, mut data: SymbolData) -> SymbolId {
        // Duplicate members keep distinct keys.
        if self.result.by_key.contains_key(&data.key) {
            let base = data.key.path().to_string();
            let mut n = 1;
            while self.result.by_key.contains_key(&data.key) {
                data.key = SymbolKey::new(data.kind, format!("{base}#{n}"));
                n += 1;
            }
        }

        let id = SymbolId(self.result.symbols.len() as u32);
        trace!(key = %data.key, "declared symbol");
        self.result.by_key.insert(data.key.clone(), id);
        if let Some(container) = data.container
            && (data.kind.is_member() || data.kind == SymbolKind::NamedType)
            && self.data(container).kind == SymbolKind::NamedType
        {
            self.result.members.entry(container).or_default().push(id);
        }
        if data.kind == SymbolKind::NamedType {
            self.types_by_simple_name
                .entry(data.name.clone())
                .or_default()
                .push(id);
        }
        self.result.symbols.push(data);
        id
    }

    /// Namespaces and partial types merge by key.
    fn merge_or_add(&mut self, data: SymbolData) -> SymbolId {
        if let Some(&existing) = self.result.by_key.get(&data.key)
            && self.data(existing).kind == data.kind
        {
            self.result.symbols[existing.index()]
                .declarations
                .extend(data.declarations);
            return existing;
        }
        self.add_symbol(data)
    }

    // -----------------------------------------------------------------------
    // Pass one: declarations
    // -----------------------------------------------------------------------

    pub fn declare_document(&mut self, document: DocumentId, tree: &SyntaxTree) {
        self.declare_members(document, tree.root(), None);
    }

    fn declare_members(
        &mut self,
        document: DocumentId,
        node: SyntaxNode<'_>,
        container: Option<SymbolId>,
    ) {
        let in_type =
            container.is_some_and(|c| self.data(c).kind == SymbolKind::NamedType);
        for child in node.child_nodes() {
            match child.kind() {
                SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration => {
                    let namespace = self.declare_namespace(document, child, container);
                    self.declare_members(document, child, namespace.or(container));
                }
                SyntaxKind::ClassDeclaration | SyntaxKind::StructDeclaration => {
                    self.declare_type(document, child, container);
                }
                _ if !in_type => {}
                SyntaxKind::FieldDeclaration => self.declare_fields(document, child, container),
                SyntaxKind::PropertyDeclaration => {
                    self.declare_property(document, child, container);
                }
                SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
                    self.declare_method(document, child, container);
                }
                _ => {}
            }
        }
    }

    fn declare_namespace(
        &mut self,
        document: DocumentId,
        node: SyntaxNode<'_>,
        container: Option<SymbolId>,
    ) -> Option<SymbolId> {
        let name = node
            .child_nodes()
            .find(|n| matches!(n.kind(), SyntaxKind::IdentifierName | SyntaxKind::QualifiedName))?;
        let mut current = container;
        for segment in name
            .descendant_tokens()
            .filter(|t| t.kind() == SyntaxKind::IdentifierToken && !t.text().is_empty())
        {
            let key = self.child_key(current, SymbolKind::Namespace, segment.text());
            current = Some(self.merge_or_add(SymbolData {
                kind: SymbolKind::Namespace,
                name: segment.text().to_string(),
                container: current,
                type_name: None,
                arity: 0,
                key,
                declarations: vec![Declaration {
                    document,
                    node: node.id(),
                    name_span: segment.span(),
                }],
            }));
        }
        if let Some(namespace) = current {
            self.result.declared.insert(node.id(), namespace);
        }
        current.filter(|_| current != container)
    }

    fn declare_type(
        &mut self,
        document: DocumentId,
        node: SyntaxNode<'_>,
        container: Option<SymbolId>,
    ) {
        let Some(name) = name_of(node.identifier_token()) else {
            return;
        };
        let key = self.child_key(container, SymbolKind::NamedType, name.text());
        let id = self.merge_or_add(SymbolData {
            kind: SymbolKind::NamedType,
            name: name.text().to_string(),
            container,
            type_name: None,
            arity: 0,
            key,
            declarations: vec![Declaration {
                document,
                node: node.id(),
                name_span: name.span(),
            }],
        });
        self.result.declared.insert(node.id(), id);
        self.declare_members(document, node, Some(id));
    }

    fn declare_fields(
        &mut self,
        document: DocumentId,
        node: SyntaxNode<'_>,
        container: Option<SymbolId>,
    ) {
        let Some(declaration) = node.first_child_of_kind(SyntaxKind::VariableDeclaration) else {
            return;
        };
        let type_name = type_child(declaration).map(|t| t.compact_text());
        for declarator in declaration
            .child_nodes()
            .filter(|n| n.kind() == SyntaxKind::VariableDeclarator)
        {
            let Some(name) = name_of(declarator.identifier_token()) else {
                continue;
            };
            let id = self.add_symbol(SymbolData {
                kind: SymbolKind::Field,
                name: name.text().to_string(),
                container,
                type_name: type_name.clone(),
                arity: 0,
                key: self.child_key(container, SymbolKind::Field, name.text()),
                declarations: vec![Declaration {
                    document,
                    node: declarator.id(),
                    name_span: name.span(),
                }],
            });
            self.result.declared.insert(declarator.id(), id);
        }
    }

    fn declare_property(
        &mut self,
        document: DocumentId,
        node: SyntaxNode<'_>,
        container: Option<SymbolId>,
    ) {
        let Some(name) = name_of(node.identifier_token()) else {
            return;
        };
        let id = self.add_symbol(SymbolData {
            kind: SymbolKind::Property,
            name: name.text().to_string(),
            container,
            type_name: type_child(node).map(|t| t.compact_text()),
            arity: 0,
            key: self.child_key(container, SymbolKind::Property, name.text()),
            declarations: vec![Declaration {
                document,
                node: node.id(),
                name_span: name.span(),
            }],
        });
        self.result.declared.insert(node.id(), id);
    }

    fn declare_method(
        &mut self,
        document: DocumentId,
        node: SyntaxNode<'_>,
        container: Option<SymbolId>,
    ) {
        let Some(name_token) = name_of(node.identifier_token()) else {
            return;
        };
        let is_constructor = node.kind() == SyntaxKind::ConstructorDeclaration;
        let name = if is_constructor {
            ".ctor"
        } else {
            name_token.text()
        };
        let parameters: Vec<_> = node
            .first_child_of_kind(SyntaxKind::ParameterList)
            .map(|list| {
                list.child_nodes()
                    .filter(|n| n.kind() == SyntaxKind::Parameter)
                    .collect()
            })
            .unwrap_or_default();
        let arity = parameters.len() as u32;

        let method = self.add_symbol(SymbolData {
            kind: SymbolKind::Method,
            name: name.to_string(),
            container,
            type_name: if is_constructor {
                None
            } else {
                type_child(node).map(|t| t.compact_text())
            },
            arity,
            key: self.child_key(container, SymbolKind::Method, &format!("{name}({arity})")),
            declarations: vec![Declaration {
                document,
                node: node.id(),
                name_span: name_token.span(),
            }],
        });
        self.result.declared.insert(node.id(), method);

        for parameter in parameters {
            let Some(pname) = name_of(parameter.identifier_token()) else {
                continue;
            };
            let id = self.add_symbol(SymbolData {
                kind: SymbolKind::Parameter,
                name: pname.text().to_string(),
                container: Some(method),
                type_name: type_child(parameter).map(|t| t.compact_text()),
                arity: 0,
                key: self.child_key(Some(method), SymbolKind::Parameter, pname.text()),
                declarations: vec![Declaration {
                    document,
                    node: parameter.id(),
                    name_span: pname.span(),
                }],
            });
            self.result.declared.insert(parameter.id(), id);
        }
    }

    // -----------------------------------------------------------------------
    // Pass two: bodies and references
    // -----------------------------------------------------------------------

    pub fn bind_document(&mut self, document: DocumentId, tree: &SyntaxTree) {
        self.bind_declarations(document, tree.root(), None);
    }

    fn bind_declarations(&mut self, document: DocumentId, node: SyntaxNode<'_>, ty: Option<SymbolId>) {
        for child in node.child_nodes() {
            match child.kind() {
                SyntaxKind::NamespaceDeclaration | SyntaxKind::FileScopedNamespaceDeclaration => {
                    self.bind_declarations(document, child, ty);
                }
                SyntaxKind::ClassDeclaration | SyntaxKind::StructDeclaration => {
                    let inner = self.result.declared.get(&child.id()).copied();
                    self.bind_declarations(document, child, inner);
                }
                SyntaxKind::FieldDeclaration => {
                    let mut ctx = BodyContext::new(ty, None);
                    self.bind_member_children(document, &mut ctx, child);
                }
                SyntaxKind::PropertyDeclaration => {
                    let member = self.result.declared.get(&child.id()).copied();
                    let mut ctx = BodyContext::new(ty, member);
                    self.bind_member_children(document, &mut ctx, child);
                }
                SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
                    let member = self.result.declared.get(&child.id()).copied();
                    let mut ctx = BodyContext::new(ty, member);
                    let parameters = self.parameter_scope(child);
                    ctx.scopes.push(parameters);
                    self.bind_member_children(document, &mut ctx, child);
                }
                _ => {}
            }
        }
    }

    fn parameter_scope(&self, method: SyntaxNode<'_>) -> Vec<(String, SymbolId)> {
        let Some(list) = method.first_child_of_kind(SyntaxKind::ParameterList) else {
            return Vec::new();
        };
        list.child_nodes()
            .filter_map(|p| {
                let id = *self.result.declared.get(&p.id())?;
                Some((self.data(id).name.clone(), id))
            })
            .collect()
    }

    /// Bind the type, parameter types, initializers and bodies of a member.
    fn bind_member_children(
        &mut self,
        document: DocumentId,
        ctx: &mut BodyContext,
        member: SyntaxNode<'_>,
    ) {
        for child in member.child_nodes() {
            match child.kind() {
                kind if kind.is_type_syntax() => self.bind_type(ctx, child),
                SyntaxKind::VariableDeclaration => {
                    for part in child.child_nodes() {
                        if part.kind().is_type_syntax() {
                            self.bind_type(ctx, part);
                        } else if let Some(init) =
                            part.first_child_of_kind(SyntaxKind::EqualsValueClause)
                        {
                            self.bind_node(document, ctx, init);
                        }
                    }
                }
                SyntaxKind::ParameterList => {
                    for parameter in child.child_nodes() {
                        if let Some(ty) = type_child(parameter) {
                            self.bind_type(ctx, ty);
                        }
                    }
                }
                SyntaxKind::AccessorList => {
                    for accessor in child.child_nodes() {
                        ctx.implicit_value = matches!(
                            accessor.kind(),
                            SyntaxKind::SetAccessorDeclaration | SyntaxKind::InitAccessorDeclaration
                        );
                        ctx.scopes.push(Vec::new());
                        for body in accessor.child_nodes() {
                            self.bind_node(document, ctx, body);
                        }
                        ctx.scopes.pop();
                        ctx.implicit_value = false;
                    }
                }
                _ => self.bind_node(document, ctx, child),
            }
        }
    }

    fn bind_node(&mut self, document: DocumentId, ctx: &mut BodyContext, node: SyntaxNode<'_>) {
        match node.kind() {
            SyntaxKind::Block => {
                ctx.scopes.push(Vec::new());
                for child in node.child_nodes() {
                    self.bind_node(document, ctx, child);
                }
                ctx.scopes.pop();
            }
            SyntaxKind::LocalDeclarationStatement => self.bind_local_declaration(document, ctx, node),
            SyntaxKind::IdentifierName => {
                self.bind_simple_name(ctx, node, None);
            }
            SyntaxKind::MemberAccessExpression => {
                self.bind_member_access(document, ctx, node, None);
            }
            SyntaxKind::InvocationExpression => self.bind_invocation(document, ctx, node),
            SyntaxKind::ObjectCreationExpression => {
                for child in node.child_nodes() {
                    if child.kind().is_type_syntax() {
                        self.bind_type(ctx, child);
                    } else {
                        self.bind_node(document, ctx, child);
                    }
                }
            }
            _ => {
                for child in node.child_nodes() {
                    self.bind_node(document, ctx, child);
                }
            }
        }
    }

    fn bind_local_declaration(
        &mut self,
        document: DocumentId,
        ctx: &mut BodyContext,
        statement: SyntaxNode<'_>,
    ) {
        let Some(declaration) = statement.first_child_of_kind(SyntaxKind::VariableDeclaration)
        else {
            return;
        };
        let type_syntax = type_child(declaration);
        if let Some(ty) = type_syntax {
            self.bind_type(ctx, ty);
        }
        let written = type_syntax.map(|t| t.compact_text());
        let implicit = written.as_deref() == Some("var")
            && type_syntax.and_then(last_identifier).is_some_and(|t| {
                !self.result.bindings.contains_key(&t.id())
            });

        for declarator in declaration
            .child_nodes()
            .filter(|n| n.kind() == SyntaxKind::VariableDeclarator)
        {
            let init = declarator.first_child_of_kind(SyntaxKind::EqualsValueClause);
            if let Some(init) = init {
                self.bind_node(document, ctx, init);
            }
            let Some(name) = name_of(declarator.identifier_token()) else {
                continue;
            };
            // `var` takes the full name of the initializer's type, which
            // resolves from any scope.
            let type_name = if implicit {
                init.and_then(|init| init.child_nodes().next())
                    .and_then(|value| self.type_of(ctx, value, 0))
                    .map(|ty| self.data(ty).key.path().to_string())
            } else {
                written.clone()
            };
            let ordinal = ctx
                .local_ordinals
                .entry(name.text().to_string())
                .or_insert(0);
            let local_name = format!("{}#{}", name.text(), ordinal);
            *ordinal += 1;

            let container = ctx.member.or(ctx.ty);
            let id = self.add_symbol(SymbolData {
                kind: SymbolKind::Local,
                name: name.text().to_string(),
                container,
                type_name,
                arity: 0,
                key: self.child_key(container, SymbolKind::Local, &local_name),
                declarations: vec![Declaration {
                    document,
                    node: declarator.id(),
                    name_span: name.span(),
                }],
            });
            self.result.declared.insert(declarator.id(), id);
            if let Some(scope) = ctx.scopes.last_mut() {
                scope.push((name.text().to_string(), id));
            }
        }
    }

    fn record(&mut self, token: SyntaxToken<'_>, candidates: &Candidates) {
        if !candidates.is_empty() {
            trace!(
                name = token.text(),
                span = %token.span(),
                candidates = candidates.len(),
                "bound name"
            );
            self.result.bindings.insert(token.id(), candidates.clone());
        }
    }

    fn bind_simple_name(
        &mut self,
        ctx: &BodyContext,
        node: SyntaxNode<'_>,
        arity: Option<u32>,
    ) -> Candidates {
        let Some(token) = name_of(node.identifier_token()) else {
            return Candidates::new();
        };
        let candidates = self.lookup_simple(ctx, token.text(), arity);
        self.record(token, &candidates);
        candidates
    }

    fn bind_member_access(
        &mut self,
        document: DocumentId,
        ctx: &mut BodyContext,
        node: SyntaxNode<'_>,
        arity: Option<u32>,
    ) {
        let mut parts = node.child_nodes();
        let receiver = parts.next();
        let name = parts.last();

        if let Some(receiver) = receiver {
            self.bind_node(document, ctx, receiver);
        }
        let Some(token) = name.and_then(|n| name_of(n.identifier_token())) else {
            return;
        };
        let receiver_type = receiver.and_then(|r| self.type_of(ctx, r, 0));
        let candidates = receiver_type
            .map(|ty| self.lookup_member(ty, token.text(), arity))
            .unwrap_or_default();
        self.record(token, &candidates);
    }

    fn bind_invocation(&mut self, document: DocumentId, ctx: &mut BodyContext, node: SyntaxNode<'_>) {
        let arguments = node.first_child_of_kind(SyntaxKind::ArgumentList);
        let arity = arguments.map_or(0, |list| {
            list.child_nodes()
                .filter(|n| n.kind() == SyntaxKind::Argument)
                .count() as u32
        });
        if let Some(callee) = node.child_nodes().next() {
            match callee.kind() {
                SyntaxKind::IdentifierName => {
                    self.bind_simple_name(ctx, callee, Some(arity));
                }
                SyntaxKind::MemberAccessExpression => {
                    self.bind_member_access(document, ctx, callee, Some(arity));
                }
                SyntaxKind::ArgumentList => {}
                _ => self.bind_node(document, ctx, callee),
            }
        }
        if let Some(arguments) = arguments {
            self.bind_node(document, ctx, arguments);
        }
    }

    fn bind_type(&mut self, ctx: &BodyContext, node: SyntaxNode<'_>) {
        match node.kind() {
            SyntaxKind::NullableType | SyntaxKind::ArrayType => {
                if let Some(inner) = node.child_nodes().next() {
                    self.bind_type(ctx, inner);
                }
            }
            SyntaxKind::IdentifierName | SyntaxKind::QualifiedName => {
                let Some(token) = last_identifier(node) else {
                    return;
                };
                let candidates: Candidates = self
                    .resolve_type_name(&node.compact_text(), ctx.ty)
                    .into_iter()
                    .collect();
                self.record(token, &candidates);
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    fn lookup_simple(&self, ctx: &BodyContext, name: &str, arity: Option<u32>) -> Candidates {
        for scope in ctx.scopes.iter().rev() {
            if let Some((_, id)) = scope.iter().rev().find(|(n, _)| n == name) {
                return smallvec![*id];
            }
        }
        if ctx.implicit_value && name == "value" {
            return Candidates::new();
        }
        let mut ty = ctx.ty;
        while let Some(current) = ty {
            let found = self.lookup_member(current, name, arity);
            if !found.is_empty() {
                return found;
            }
            ty = self
                .data(current)
                .container
                .filter(|c| self.data(*c).kind == SymbolKind::NamedType);
        }
        self.resolve_type_name(name, ctx.ty).into_iter().collect()
    }

    fn lookup_member(&self, ty: SymbolId, name: &str, arity: Option<u32>) -> Candidates {
        let named: Candidates = self
            .result
            .members
            .get(&ty)
            .into_iter()
            .flatten()
            .copied()
            .filter(|m| self.data(*m).name == name)
            .collect();
        if let Some(arity) = arity {
            let matching: Candidates = named
                .iter()
                .copied()
                .filter(|m| {
                    let data = self.data(*m);
                    data.kind == SymbolKind::Method && data.arity == arity
                })
                .collect();
            if !matching.is_empty() {
                return matching;
            }
        }
        named
    }

    /// Resolve a written type name relative to `from` and its containers.
    fn resolve_type_name(&self, text: &str, from: Option<SymbolId>) -> Option<SymbolId> {
        let text = text.trim_end_matches('?');
        if text.is_empty() || text.ends_with(']') {
            return None;
        }
        let is_type = |id: SymbolId| self.data(id).kind == SymbolKind::NamedType;

        let mut scope = from;
        while let Some(current) = scope {
            let data = self.data(current);
            let key = data.key.child(SymbolKind::NamedType, text);
            if let Some(id) = self.result.by_key.get(&key).filter(|id| is_type(**id)) {
                return Some(*id);
            }
            scope = data.container;
        }
        if let Some(id) = self
            .result
            .by_key
            .get(&SymbolKey::new(SymbolKind::NamedType, text))
            .filter(|id| is_type(**id))
        {
            return Some(*id);
        }
        // Brought in by a `using`, or otherwise unique by simple name.
        let simple = text.rsplit('.').next().unwrap_or(text);
        match self.types_by_simple_name.get(simple) {
            Some(ids) if ids.len() == 1 => Some(ids[0]),
            _ => None,
        }
    }

    fn single_binding(&self, token: SyntaxToken<'_>) -> Option<SymbolId> {
        match self.result.bindings.get(&token.id()) {
            Some(candidates) if candidates.len() == 1 => Some(candidates[0]),
            _ => None,
        }
    }

    /// Static type of a symbol: the type itself for types, the declared type
    /// otherwise.
    fn symbol_type(&self, id: SymbolId) -> Option<SymbolId> {
        let data = self.data(id);
        match data.kind {
            SymbolKind::NamedType => Some(id),
            SymbolKind::Namespace => None,
            _ => {
                let written = data.type_name.as_deref()?;
                let mut context = data.container;
                while let Some(c) = context {
                    if matches!(
                        self.data(c).kind,
                        SymbolKind::NamedType | SymbolKind::Namespace
                    ) {
                        break;
                    }
                    context = self.data(c).container;
                }
                self.resolve_type_name(written, context)
            }
        }
    }

    fn name_token<'t>(node: SyntaxNode<'t>) -> Option<SyntaxToken<'t>> {
        match node.kind() {
            SyntaxKind::IdentifierName => name_of(node.identifier_token()),
            SyntaxKind::MemberAccessExpression => node
                .child_nodes()
                .last()
                .and_then(|n| name_of(n.identifier_token())),
            _ => None,
        }
    }

    fn type_of(&self, ctx: &BodyContext, node: SyntaxNode<'_>, depth: u32) -> Option<SymbolId> {
        if depth > MAX_MEMBER_ACCESS_DEPTH {
            return None;
        }
        match node.kind() {
            SyntaxKind::IdentifierName | SyntaxKind::MemberAccessExpression => {
                let token = Self::name_token(node)?;
                self.symbol_type(self.single_binding(token)?)
            }
            SyntaxKind::InvocationExpression => {
                let callee = node.child_nodes().next()?;
                let token = Self::name_token(callee)?;
                self.symbol_type(self.single_binding(token)?)
            }
            SyntaxKind::ThisExpression => ctx.ty,
            SyntaxKind::ObjectCreationExpression => {
                let ty = type_child(node)?;
                self.single_binding(last_identifier(ty)?)
            }
            SyntaxKind::ParenthesizedExpression => {
                self.type_of(ctx, node.child_nodes().next()?, depth + 1)
            }
            _ => None,
        }
    }
}
