//! Structural splice: drop the field, make the property automatic.
//!
//! Both edits for one document go through a single `SyntaxEditor`, so a
//! field and property that share a tree are rewritten in one pass. When they
//! live in different documents each tree gets its own batch; both batches
//! are applied before the solution is touched.

use crate::error::FixError;
use crate::locator::LocatedDeclaration;
use crate::options::FixOptions;
use propfix_common::DocumentId;
use propfix_semantic::Compilation;
use propfix_syntax::{
    EditError, GreenElement, GreenNode, GreenToken, NodeId, RemoveOptions, SyntaxEditor,
    SyntaxElement, SyntaxKind, SyntaxNode, SyntaxTree, Trivia, TriviaKind, collapse_elastic,
};
use propfix_workspace::Solution;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Removal options for the field: directives that still pair with something
/// outside the field stay, and the formatter gets a marker.
const FIELD_REMOVAL: RemoveOptions =
    RemoveOptions::KEEP_UNBALANCED_DIRECTIVES.union(RemoveOptions::ADD_ELASTIC_MARKER);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SplicePath {
    SameDocument,
    CrossDocument,
}

/// What to remove for the field and what it was initialized with.
struct FieldRemoval {
    target: NodeId,
    initializer: Option<Arc<GreenNode>>,
}

impl FieldRemoval {
    /// A lone declarator takes its whole field declaration with it; one of
    /// several only removes itself.
    fn plan(tree: &SyntaxTree, field: &LocatedDeclaration) -> Result<FieldRemoval, FixError> {
        let unexpected = |expected| FixError::UnexpectedSyntax {
            document: field.document,
            span: field.span,
            expected,
        };
        let declarator = tree
            .node(field.node)
            .filter(|node| node.kind() == SyntaxKind::VariableDeclarator)
            .ok_or_else(|| unexpected(SyntaxKind::VariableDeclarator))?;
        let declaration = declarator
            .parent()
            .filter(|node| node.kind() == SyntaxKind::VariableDeclaration)
            .ok_or_else(|| unexpected(SyntaxKind::VariableDeclaration))?;
        let field_declaration = declaration
            .parent()
            .filter(|node| node.kind() == SyntaxKind::FieldDeclaration)
            .ok_or_else(|| unexpected(SyntaxKind::FieldDeclaration))?;

        let siblings = declaration
            .child_nodes()
            .filter(|node| node.kind() == SyntaxKind::VariableDeclarator)
            .count();
        let target = if siblings > 1 {
            declarator.id()
        } else {
            field_declaration.id()
        };
        let initializer = declarator
            .first_child_of_kind(SyntaxKind::EqualsValueClause)
            .and_then(|clause| clause.child_nodes().next())
            .map(|expression| Arc::clone(expression.green()));
        trace!(siblings, has_initializer = initializer.is_some(), "planned field removal");
        Ok(FieldRemoval {
            target,
            initializer,
        })
    }
}

/// Apply the splice to `solution`, whose trees must be the ones
/// `compilation` was built from.
pub fn splice(
    solution: &Solution,
    compilation: &Compilation,
    field: &LocatedDeclaration,
    property: &LocatedDeclaration,
    options: &FixOptions,
) -> Result<(Solution, SplicePath), FixError> {
    let field_tree = current_tree(solution, compilation, field.document)?;
    let property_tree = current_tree(solution, compilation, property.document)?;

    let removal = FieldRemoval::plan(field_tree, field)?;
    let property_node = property_tree
        .node(property.node)
        .filter(|node| node.kind() == SyntaxKind::PropertyDeclaration)
        .ok_or(FixError::UnexpectedSyntax {
            document: property.document,
            span: property.span,
            expected: SyntaxKind::PropertyDeclaration,
        })?;
    let initializer = removal
        .initializer
        .as_ref()
        .filter(|_| options.move_initializer);
    let replacement = rewrite_property(property_node, initializer).ok_or(
        FixError::UnexpectedSyntax {
            document: property.document,
            span: property.span,
            expected: SyntaxKind::AccessorList,
        },
    )?;

    if field.document == property.document {
        let mut editor = SyntaxEditor::new(field_tree);
        editor.remove_node(removal.target, FIELD_REMOVAL);
        editor.replace_node(property.node, replacement);
        let tree = finish(editor.changed_root()?, options);
        debug!(document = %field.document, "spliced field and property in one document");
        let solution = solution.with_document_syntax_root(field.document, tree)?;
        return Ok((solution, SplicePath::SameDocument));
    }

    let mut field_editor = SyntaxEditor::new(field_tree);
    field_editor.remove_node(removal.target, FIELD_REMOVAL);
    let mut property_editor = SyntaxEditor::new(property_tree);
    property_editor.replace_node(property.node, replacement);
    // Both trees are built before either document is replaced.
    let field_root = finish(field_editor.changed_root()?, options);
    let property_root = finish(property_editor.changed_root()?, options);
    debug!(
        field_document = %field.document,
        property_document = %property.document,
        "spliced field and property across documents"
    );
    let solution = solution
        .with_document_syntax_root(field.document, field_root)?
        .with_document_syntax_root(property.document, property_root)?;
    Ok((solution, SplicePath::CrossDocument))
}

/// The compilation's tree for `document`, checked against the solution.
fn current_tree<'c>(
    solution: &Solution,
    compilation: &'c Compilation,
    document: DocumentId,
) -> Result<&'c SyntaxTree, FixError> {
    let tree = compilation
        .tree(document)
        .ok_or(FixError::MissingDocument(document))?;
    let live = solution
        .document(document)
        .ok_or(FixError::MissingDocument(document))?;
    if live.tree().id() != tree.id() {
        return Err(EditError::StaleNode {
            expected: live.tree().id(),
            found: tree.id(),
        }
        .into());
    }
    Ok(tree)
}

fn finish(tree: SyntaxTree, options: &FixOptions) -> SyntaxTree {
    if options.format {
        collapse_elastic(&tree)
    } else {
        tree
    }
}

// ---------------------------------------------------------------------------
// Property rewriting
// ---------------------------------------------------------------------------

/// The property with bodiless accessors, plus `= initializer;` when given
/// and the property has none. `None` when the property has neither an
/// accessor list nor an expression body.
fn rewrite_property(
    property: SyntaxNode<'_>,
    initializer: Option<&Arc<GreenNode>>,
) -> Option<GreenNode> {
    let has_initializer = property
        .first_child_of_kind(SyntaxKind::EqualsValueClause)
        .is_some();
    let mut children: Vec<GreenElement> = Vec::new();
    let mut rewritten = false;
    let mut elements = property.children().peekable();

    while let Some(element) = elements.next() {
        match element.kind() {
            SyntaxKind::AccessorList => {
                children.push(strip_accessor_list(element.as_node()?).into());
                rewritten = true;
            }
            SyntaxKind::ArrowExpressionClause => {
                // `=> expr;` becomes `{ get; }`, which takes over the
                // trailing trivia of the `;`.
                let trailing = match elements.peek().and_then(|e| e.as_token()) {
                    Some(semicolon) if semicolon.kind() == SyntaxKind::SemicolonToken => {
                        elements.next();
                        semicolon.trailing().to_vec()
                    }
                    _ => Vec::new(),
                };
                let space_before = children
                    .last()
                    .and_then(last_green_token)
                    .is_some_and(|token| token.trailing().is_empty());
                children.push(getter_only_list(space_before, trailing).into());
                rewritten = true;
            }
            _ => children.push(element.green()),
        }
    }
    if !rewritten {
        return None;
    }

    if let Some(expression) = initializer
        && !has_initializer
        && let Some(GreenElement::Node(list)) = children.last()
        && list.kind() == SyntaxKind::AccessorList
    {
        // `{ get; set; }<trailing>` -> `{ get; set; } = expr;<trailing>`
        let trailing = list
            .last_token()
            .map(|token| token.trailing().to_vec())
            .unwrap_or_default();
        let list = list.map_last_token(|token| token.clone().with_trailing(Vec::new()));
        children.pop();
        children.push(list.into());
        children.push(equals_value_clause(expression).into());
        children.push(
            GreenToken::punct(SyntaxKind::SemicolonToken)
                .with_trailing(trailing)
                .into(),
        );
    }
    Some(GreenNode::new(property.kind(), children))
}

fn last_green_token(element: &GreenElement) -> Option<&Arc<GreenToken>> {
    match element {
        GreenElement::Token(token) => Some(token),
        GreenElement::Node(node) => node.last_token(),
    }
}

fn strip_accessor_list(list: SyntaxNode<'_>) -> GreenNode {
    let children = list
        .children()
        .map(|element| match element.as_node() {
            Some(accessor) if accessor.kind().is_accessor_declaration() => {
                strip_accessor(accessor)
            }
            _ => element.green(),
        })
        .collect();
    GreenNode::new(SyntaxKind::AccessorList, children)
}

/// `get { return _x; }` and `get => _x;` become `get;`. Modifiers and the
/// keyword are kept; line breaks and whitespace between the keyword and the
/// old body go, and the `;` inherits the old body's trailing trivia.
fn strip_accessor(accessor: SyntaxNode<'_>) -> GreenElement {
    let (head, body): (Vec<SyntaxElement<'_>>, Vec<SyntaxElement<'_>>) = accessor
        .children()
        .partition(|element| element.as_token().is_some_and(|t| is_accessor_head(t.kind())));

    let already_bodiless = body.len() == 1 && body[0].kind() == SyntaxKind::SemicolonToken;
    if body.is_empty() || already_bodiless {
        return element_of(accessor);
    }

    let trailing = match body.last() {
        Some(SyntaxElement::Token(token)) => token.trailing().to_vec(),
        Some(SyntaxElement::Node(node)) => node
            .last_token()
            .map(|token| token.trailing().to_vec())
            .unwrap_or_default(),
        None => Vec::new(),
    };
    let mut kept: Vec<GreenElement> = head.iter().map(SyntaxElement::green).collect();
    let mut semicolon_trailing = Vec::new();
    if let Some(GreenElement::Token(keyword)) = kept.pop() {
        // Comments between the keyword and the body move behind the `;`.
        let comments: Vec<Trivia> = keyword
            .trailing()
            .iter()
            .filter(|t| is_comment(t))
            .cloned()
            .collect();
        if !comments.is_empty() {
            semicolon_trailing.push(Trivia::space());
            semicolon_trailing.extend(comments);
        }
        kept.push(GreenToken::clone(&keyword).with_trailing(Vec::new()).into());
    }
    let ends_in_line_comment = semicolon_trailing
        .last()
        .is_some_and(|t| t.kind == TriviaKind::SingleLineComment);
    if ends_in_line_comment && !trailing.iter().any(Trivia::is_end_of_line) {
        semicolon_trailing.push(Trivia::end_of_line("\n"));
    }
    semicolon_trailing.extend(trailing);
    kept.push(
        GreenToken::punct(SyntaxKind::SemicolonToken)
            .with_trailing(semicolon_trailing)
            .into(),
    );
    trace!(accessor = ?accessor.kind(), "stripped accessor body");
    GreenNode::new(accessor.kind(), kept).into()
}

fn is_comment(trivia: &Trivia) -> bool {
    matches!(
        trivia.kind,
        TriviaKind::SingleLineComment | TriviaKind::MultiLineComment
    )
}

fn element_of(node: SyntaxNode<'_>) -> GreenElement {
    GreenElement::Node(Arc::clone(node.green()))
}

fn is_accessor_head(kind: SyntaxKind) -> bool {
    kind.is_accessibility_modifier()
        || matches!(
            kind,
            SyntaxKind::GetKeyword | SyntaxKind::SetKeyword | SyntaxKind::InitKeyword
        )
}

/// `{ get; }`, as synthesized for an expression-bodied property.
fn getter_only_list(space_before: bool, trailing: Vec<Trivia>) -> GreenNode {
    let open = GreenToken::punct(SyntaxKind::OpenBraceToken).with_trailing(vec![Trivia::space()]);
    let open = if space_before {
        open.with_leading(vec![Trivia::space()])
    } else {
        open
    };
    let getter = GreenNode::new(
        SyntaxKind::GetAccessorDeclaration,
        vec![
            GreenToken::punct(SyntaxKind::GetKeyword).into(),
            GreenToken::punct(SyntaxKind::SemicolonToken)
                .with_trailing(vec![Trivia::space()])
                .into(),
        ],
    );
    let close = GreenToken::punct(SyntaxKind::CloseBraceToken).with_trailing(trailing);
    GreenNode::new(
        SyntaxKind::AccessorList,
        vec![open.into(), getter.into(), close.into()],
    )
}

/// ` = <expression>` with the expression's outer trivia normalized.
fn equals_value_clause(expression: &Arc<GreenNode>) -> GreenNode {
    let expression = expression
        .map_first_token(|token| token.clone().with_leading(Vec::new()))
        .map_last_token(|token| token.clone().with_trailing(Vec::new()));
    GreenNode::new(
        SyntaxKind::EqualsValueClause,
        vec![
            GreenToken::punct(SyntaxKind::EqualsToken)
                .with_leading(vec![Trivia::space()])
                .with_trailing(vec![Trivia::space()])
                .into(),
            expression.into(),
        ],
    )
}

#[cfg(test)]
#[path = "../tests/splice_tests.rs"]
mod splice_tests;
