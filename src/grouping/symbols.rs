//! Document symbol outlines as reported by language-analysis providers.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::base::Span;
use crate::error::Error;

/// The kind of a symbol in a document outline.
///
/// Mirrors the symbol kinds of the Language Server Protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    File,
    Module,
    Namespace,
    Package,
    Class,
    Method,
    Property,
    Field,
    Constructor,
    Enum,
    Interface,
    Function,
    Variable,
    Constant,
    String,
    Number,
    Boolean,
    Array,
    Object,
    Key,
    Null,
    EnumMember,
    Struct,
    Event,
    Operator,
    TypeParameter,
}

impl SymbolKind {
    /// Every kind, in LSP numbering order.
    pub const ALL: [SymbolKind; 26] = [
        SymbolKind::File,
        SymbolKind::Module,
        SymbolKind::Namespace,
        SymbolKind::Package,
        SymbolKind::Class,
        SymbolKind::Method,
        SymbolKind::Property,
        SymbolKind::Field,
        SymbolKind::Constructor,
        SymbolKind::Enum,
        SymbolKind::Interface,
        SymbolKind::Function,
        SymbolKind::Variable,
        SymbolKind::Constant,
        SymbolKind::String,
        SymbolKind::Number,
        SymbolKind::Boolean,
        SymbolKind::Array,
        SymbolKind::Object,
        SymbolKind::Key,
        SymbolKind::Null,
        SymbolKind::EnumMember,
        SymbolKind::Struct,
        SymbolKind::Event,
        SymbolKind::Operator,
        SymbolKind::TypeParameter,
    ];

    /// The display name, as used in configuration.
    pub const fn display_name(self) -> &'static str {
        match self {
            SymbolKind::File => "File",
            SymbolKind::Module => "Module",
            SymbolKind::Namespace => "Namespace",
            SymbolKind::Package => "Package",
            SymbolKind::Class => "Class",
            SymbolKind::Method => "Method",
            SymbolKind::Property => "Property",
            SymbolKind::Field => "Field",
            SymbolKind::Constructor => "Constructor",
            SymbolKind::Enum => "Enum",
            SymbolKind::Interface => "Interface",
            SymbolKind::Function => "Function",
            SymbolKind::Variable => "Variable",
            SymbolKind::Constant => "Constant",
            SymbolKind::String => "String",
            SymbolKind::Number => "Number",
            SymbolKind::Boolean => "Boolean",
            SymbolKind::Array => "Array",
            SymbolKind::Object => "Object",
            SymbolKind::Key => "Key",
            SymbolKind::Null => "Null",
            SymbolKind::EnumMember => "EnumMember",
            SymbolKind::Struct => "Struct",
            SymbolKind::Event => "Event",
            SymbolKind::Operator => "Operator",
            SymbolKind::TypeParameter => "TypeParameter",
        }
    }

    /// Theme icon id for member nodes of this kind.
    pub const fn icon_id(self) -> &'static str {
        match self {
            SymbolKind::File => "symbol-file",
            SymbolKind::Module => "symbol-module",
            SymbolKind::Namespace => "symbol-namespace",
            SymbolKind::Package => "symbol-package",
            SymbolKind::Class => "symbol-class",
            SymbolKind::Method => "symbol-method",
            SymbolKind::Property => "symbol-property",
            SymbolKind::Field => "symbol-field",
            SymbolKind::Constructor => "symbol-constructor",
            SymbolKind::Enum => "symbol-enum",
            SymbolKind::Interface => "symbol-interface",
            SymbolKind::Function => "symbol-function",
            SymbolKind::Variable => "symbol-variable",
            SymbolKind::Constant => "symbol-constant",
            SymbolKind::String => "symbol-string",
            SymbolKind::Number => "symbol-number",
            SymbolKind::Boolean => "symbol-boolean",
            SymbolKind::Array => "symbol-array",
            SymbolKind::Object => "symbol-object",
            SymbolKind::Key => "symbol-key",
            SymbolKind::Null => "symbol-null",
            SymbolKind::EnumMember => "symbol-enum-member",
            SymbolKind::Struct => "symbol-struct",
            SymbolKind::Event => "symbol-event",
            SymbolKind::Operator => "symbol-operator",
            SymbolKind::TypeParameter => "symbol-type-parameter",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SymbolKind {
    type Err = Error;

    /// Parse a kind name case-insensitively, ignoring `-`/`_` separators
    /// (`enum-member`, `EnumMember` and `enum_member` are the same kind).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        SymbolKind::ALL
            .into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| Error::UnknownSymbolKind(s.trim().to_string()))
    }
}

/// A node of a document's hierarchical symbol outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSymbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    /// The full extent of the symbol, including its body
    pub span: Span,
    pub children: Vec<DocumentSymbol>,
}

impl DocumentSymbol {
    pub fn new(name: impl Into<SmolStr>, kind: SymbolKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
            children: Vec::new(),
        }
    }

    /// Builder-style helper to attach children.
    pub fn with_children(mut self, children: Vec<DocumentSymbol>) -> Self {
        self.children = children;
        self
    }
}
