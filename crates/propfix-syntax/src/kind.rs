//! Token and node kinds.
//!
//! One enum covers both tokens and nodes. Tokens come first; node kinds start
//! at `CompilationUnit`, so `is_token`/`is_node` are a single comparison.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    EndOfFileToken,
    BadToken,
    IdentifierToken,
    NumericLiteralToken,
    StringLiteralToken,
    CharacterLiteralToken,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    SemicolonToken,
    CommaToken,
    DotToken,
    QuestionToken,
    EqualsToken,
    EqualsGreaterThanToken,
    PlusEqualsToken,
    MinusEqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    ExclamationToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    AmpersandAmpersandToken,
    BarBarToken,
    PlusPlusToken,
    MinusMinusToken,

    // Reserved keywords
    UsingKeyword,
    NamespaceKeyword,
    ClassKeyword,
    StructKeyword,
    PublicKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    InternalKeyword,
    StaticKeyword,
    ReadOnlyKeyword,
    VirtualKeyword,
    OverrideKeyword,
    AbstractKeyword,
    SealedKeyword,
    ReturnKeyword,
    IfKeyword,
    ElseKeyword,
    NewKeyword,
    ThisKeyword,
    NullKeyword,
    TrueKeyword,
    FalseKeyword,
    VoidKeyword,
    IntKeyword,
    LongKeyword,
    DoubleKeyword,
    FloatKeyword,
    DecimalKeyword,
    BoolKeyword,
    StringKeyword,
    CharKeyword,
    ObjectKeyword,

    // Contextual keywords. The scanner produces identifiers; the parser
    // remaps them where the grammar gives them meaning.
    GetKeyword,
    SetKeyword,
    InitKeyword,
    PartialKeyword,

    // Nodes
    CompilationUnit,
    UsingDirective,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    ClassDeclaration,
    StructDeclaration,
    FieldDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    EqualsValueClause,
    PropertyDeclaration,
    AccessorList,
    GetAccessorDeclaration,
    SetAccessorDeclaration,
    InitAccessorDeclaration,
    ArrowExpressionClause,
    MethodDeclaration,
    ConstructorDeclaration,
    ParameterList,
    Parameter,
    ArgumentList,
    Argument,
    Block,
    ReturnStatement,
    LocalDeclarationStatement,
    ExpressionStatement,
    IfStatement,
    ElseClause,
    EmptyStatement,
    PredefinedType,
    IdentifierName,
    QualifiedName,
    NullableType,
    ArrayType,
    MemberAccessExpression,
    InvocationExpression,
    ObjectCreationExpression,
    AssignmentExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    ParenthesizedExpression,
    LiteralExpression,
    ThisExpression,
    /// Tokens the parser could not place.
    SkippedTokens,
}

impl SyntaxKind {
    #[inline]
    pub fn is_token(self) -> bool {
        self < SyntaxKind::CompilationUnit
    }

    #[inline]
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::InternalKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::ReadOnlyKeyword
                | SyntaxKind::VirtualKeyword
                | SyntaxKind::OverrideKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::SealedKeyword
                | SyntaxKind::PartialKeyword
        )
    }

    pub fn is_accessibility_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::InternalKeyword
        )
    }

    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::VoidKeyword
                | SyntaxKind::IntKeyword
                | SyntaxKind::LongKeyword
                | SyntaxKind::DoubleKeyword
                | SyntaxKind::FloatKeyword
                | SyntaxKind::DecimalKeyword
                | SyntaxKind::BoolKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::CharKeyword
                | SyntaxKind::ObjectKeyword
        )
    }

    pub fn is_accessor_declaration(self) -> bool {
        matches!(
            self,
            SyntaxKind::GetAccessorDeclaration
                | SyntaxKind::SetAccessorDeclaration
                | SyntaxKind::InitAccessorDeclaration
        )
    }

    /// Nodes that can stand in a type position.
    pub fn is_type_syntax(self) -> bool {
        matches!(
            self,
            SyntaxKind::PredefinedType
                | SyntaxKind::IdentifierName
                | SyntaxKind::QualifiedName
                | SyntaxKind::NullableType
                | SyntaxKind::ArrayType
        )
    }

    /// Fixed text of punctuation and keyword tokens.
    pub fn text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        Some(match self {
            OpenBraceToken => "{",
            CloseBraceToken => "}",
            OpenParenToken => "(",
            CloseParenToken => ")",
            OpenBracketToken => "[",
            CloseBracketToken => "]",
            SemicolonToken => ";",
            CommaToken => ",",
            DotToken => ".",
            QuestionToken => "?",
            EqualsToken => "=",
            EqualsGreaterThanToken => "=>",
            PlusEqualsToken => "+=",
            MinusEqualsToken => "-=",
            PlusToken => "+",
            MinusToken => "-",
            AsteriskToken => "*",
            SlashToken => "/",
            PercentToken => "%",
            ExclamationToken => "!",
            EqualsEqualsToken => "==",
            ExclamationEqualsToken => "!=",
            LessThanToken => "<",
            GreaterThanToken => ">",
            LessThanEqualsToken => "<=",
            GreaterThanEqualsToken => ">=",
            AmpersandAmpersandToken => "&&",
            BarBarToken => "||",
            PlusPlusToken => "++",
            MinusMinusToken => "--",
            UsingKeyword => "using",
            NamespaceKeyword => "namespace",
            ClassKeyword => "class",
            StructKeyword => "struct",
            PublicKeyword => "public",
            PrivateKeyword => "private",
            ProtectedKeyword => "protected",
            InternalKeyword => "internal",
            StaticKeyword => "static",
            ReadOnlyKeyword => "readonly",
            VirtualKeyword => "virtual",
            OverrideKeyword => "override",
            AbstractKeyword => "abstract",
            SealedKeyword => "sealed",
            ReturnKeyword => "return",
            IfKeyword => "if",
            ElseKeyword => "else",
            NewKeyword => "new",
            ThisKeyword => "this",
            NullKeyword => "null",
            TrueKeyword => "true",
            FalseKeyword => "false",
            VoidKeyword => "void",
            IntKeyword => "int",
            LongKeyword => "long",
            DoubleKeyword => "double",
            FloatKeyword => "float",
            DecimalKeyword => "decimal",
            BoolKeyword => "bool",
            StringKeyword => "string",
            CharKeyword => "char",
            ObjectKeyword => "object",
            GetKeyword => "get",
            SetKeyword => "set",
            InitKeyword => "init",
            PartialKeyword => "partial",
            _ => return None,
        })
    }
}

/// Map identifier text to a reserved keyword kind.
///
/// Contextual keywords (`get`, `set`, `init`, `partial`, `var`, `value`) are
/// not reserved and return `None`.
pub fn reserved_keyword(text: &str) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    Some(match text {
        "using" => UsingKeyword,
        "namespace" => NamespaceKeyword,
        "class" => ClassKeyword,
        "struct" => StructKeyword,
        "public" => PublicKeyword,
        "private" => PrivateKeyword,
        "protected" => ProtectedKeyword,
        "internal" => InternalKeyword,
        "static" => StaticKeyword,
        "readonly" => ReadOnlyKeyword,
        "virtual" => VirtualKeyword,
        "override" => OverrideKeyword,
        "abstract" => AbstractKeyword,
        "sealed" => SealedKeyword,
        "return" => ReturnKeyword,
        "if" => IfKeyword,
        "else" => ElseKeyword,
        "new" => NewKeyword,
        "this" => ThisKeyword,
        "null" => NullKeyword,
        "true" => TrueKeyword,
        "false" => FalseKeyword,
        "void" => VoidKeyword,
        "int" => IntKeyword,
        "long" => LongKeyword,
        "double" => DoubleKeyword,
        "float" => FloatKeyword,
        "decimal" => DecimalKeyword,
        "bool" => BoolKeyword,
        "string" => StringKeyword,
        "char" => CharKeyword,
        "object" => ObjectKeyword,
        _ => return None,
    })
}

/// Check whether `name` can be used as a plain identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first.is_alphabetic()) {
        return false;
    }
    if !chars.all(|ch| ch == '_' || ch.is_alphanumeric()) {
        return false;
    }
    reserved_keyword(name).is_none()
}
