//! Comment removal for languages built on `//` and `/* */`.
//!
//! Dialects with a bundled tree-sitter grammar are parsed; comments are the
//! `comment`, `line_comment` and `block_comment` nodes of the resulting tree,
//! so comment markers inside strings, template literals and regex literals are
//! never touched. Dialects without a grammar go through the lexical scanner in
//! [`super::c_family`].
//!
//! A JSX expression container holding nothing but block comments
//! (`{/* ... */}`) is removed whole, braces included. Braces anywhere else are
//! code and stay.
//!
//! A tree with any `ERROR` or `MISSING` node is rejected: the caller gets the
//! original text back.

use super::c_family;
use super::common::{CommentKind, CommentMatch, StrategyFailure, StripError, remove_matches_tidy};
use tree_sitter::{Node, Parser, Tree};

const COMMENT_KINDS: &[&str] = &["comment", "line_comment", "block_comment"];
const JSX_EXPRESSION: &str = "jsx_expression";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BraceDialect {
    JavaScript,
    TypeScript,
    Tsx,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    /// No grammar; scanned lexically.
    Lexical,
}

impl BraceDialect {
    pub const fn name(self) -> &'static str {
        match self {
            BraceDialect::JavaScript => "javascript",
            BraceDialect::TypeScript => "typescript",
            BraceDialect::Tsx => "tsx",
            BraceDialect::Java => "java",
            BraceDialect::C => "c",
            BraceDialect::Cpp => "cpp",
            BraceDialect::CSharp => "csharp",
            BraceDialect::Go => "go",
            BraceDialect::Rust => "rust",
            BraceDialect::Lexical => "lexical",
        }
    }

    fn grammar(self) -> Option<tree_sitter::Language> {
        let language = match self {
            BraceDialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            BraceDialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            BraceDialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            BraceDialect::Java => tree_sitter_java::LANGUAGE.into(),
            BraceDialect::C => tree_sitter_c::LANGUAGE.into(),
            BraceDialect::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            BraceDialect::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            BraceDialect::Go => tree_sitter_go::LANGUAGE.into(),
            BraceDialect::Rust => tree_sitter_rust::LANGUAGE.into(),
            BraceDialect::Lexical => return None,
        };
        Some(language)
    }
}

/// Which comment forms a pass removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    Every,
    LineOnly,
    BlockOnly,
}

impl Selection {
    fn keeps(self, kind: CommentKind) -> bool {
        match self {
            Selection::Every => true,
            Selection::LineOnly => kind == CommentKind::Line,
            Selection::BlockOnly => kind == CommentKind::Block,
        }
    }
}

pub(crate) fn remove_comments(dialect: BraceDialect, code: &str) -> Result<String, StripError> {
    strip(dialect, code, Selection::Every)
}

pub(crate) fn remove_single_line(dialect: BraceDialect, code: &str) -> Result<String, StripError> {
    strip(dialect, code, Selection::LineOnly)
}

pub(crate) fn remove_multi_line(dialect: BraceDialect, code: &str) -> Result<String, StripError> {
    strip(dialect, code, Selection::BlockOnly)
}

fn strip(dialect: BraceDialect, code: &str, selection: Selection) -> Result<String, StripError> {
    if !code.contains("//") && !code.contains("/*") {
        return Ok(code.to_string());
    }

    let found = match dialect.grammar() {
        Some(grammar) => {
            let tree = parse(dialect, grammar, code)?;
            collect_comments(&tree, code)
        }
        None => c_family::find_comments(code)?,
    };

    let selected = found
        .into_iter()
        .filter(|m| selection.keeps(m.kind))
        .collect();
    Ok(remove_matches_tidy(code.to_string(), selected)?)
}

fn parse(
    dialect: BraceDialect,
    grammar: tree_sitter::Language,
    code: &str,
) -> Result<Tree, StrategyFailure> {
    let mut parser = Parser::new();
    parser
        .set_language(&grammar)
        .map_err(|e| StrategyFailure::NoGrammar {
            dialect: dialect.name(),
            reason: e.to_string(),
        })?;
    let tree = parser.parse(code, None).ok_or(StrategyFailure::NoTree)?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(StrategyFailure::Syntax {
            row: at.row + 1,
            column: at.column + 1,
        });
    }
    Ok(tree)
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut node = root;
    loop {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let next = node
            .children(&mut cursor)
            .find(|child| child.has_error() || child.is_missing())?;
        node = next;
    }
}

fn collect_comments(tree: &Tree, code: &str) -> Vec<CommentMatch> {
    let mut found = Vec::new();
    let mut cursor = tree.walk();
    loop {
        let node = cursor.node();
        let is_comment = COMMENT_KINDS.contains(&node.kind());
        let is_sentinel = !is_comment && is_sentinel_container(node, code);
        if is_comment {
            found.push(classify(code, node.start_byte(), node.end_byte()));
        } else if is_sentinel {
            found.push(CommentMatch::block(node.start_byte(), node.end_byte()));
        }
        if !is_comment && !is_sentinel && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return found;
            }
        }
    }
}

/// `{/* ... */}` in JSX: a container whose only named children are block
/// comments.
fn is_sentinel_container(node: Node<'_>, code: &str) -> bool {
    if node.kind() != JSX_EXPRESSION || node.named_child_count() == 0 {
        return false;
    }
    let mut cursor = node.walk();
    let only_blocks = node.named_children(&mut cursor).all(|child| {
        COMMENT_KINDS.contains(&child.kind()) && code[child.start_byte()..].starts_with("/*")
    });
    only_blocks
}

fn classify(code: &str, from: usize, to: usize) -> CommentMatch {
    let text = &code[from..to];
    if text.starts_with("/*") {
        return CommentMatch::block(from, to);
    }
    // Some grammars fold the terminating newline into line comments.
    let body = text.trim_end_matches(['\n', '\r']);
    CommentMatch::line(from, from + body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all(dialect: BraceDialect, code: &str) -> String {
        remove_comments(dialect, code).unwrap()
    }

    #[test]
    fn javascript_comments_are_removed() {
        let code = "// header\nconst a = 1; // trailing\n/* block */\nconst b = 2;\n";
        assert_eq!(
            all(BraceDialect::JavaScript, code),
            "const a = 1;\nconst b = 2;\n"
        );
    }

    #[test]
    fn comment_markers_inside_literals_survive() {
        let code = "const url = \"http://example.com\";\nconst t = `/* not ${a} a comment */`;\nconst r = /\\/\\//g;\n";
        assert_eq!(all(BraceDialect::JavaScript, code), code);
    }

    #[test]
    fn inline_block_comment_is_cut_out() {
        let code = "call(a, /* why */ b);\n";
        assert_eq!(all(BraceDialect::JavaScript, code), "call(a,  b);\n");
    }

    #[test]
    fn jsx_sentinel_comment_is_removed() {
        let code = "const el = <div>{/* hidden */}<span>hi</span></div>;\n";
        assert_eq!(
            all(BraceDialect::JavaScript, code),
            "const el = <div><span>hi</span></div>;\n"
        );
    }

    #[test]
    fn tsx_and_typescript_parse() {
        let ts = "interface A { x: number } // shape\n";
        assert_eq!(all(BraceDialect::TypeScript, ts), "interface A { x: number }\n");

        let tsx = "const f = (p: Props) => <b>{/* n */}{p.x}</b>;\n";
        assert_eq!(all(BraceDialect::Tsx, tsx), "const f = (p: Props) => <b>{p.x}</b>;\n");
    }

    #[test]
    fn malformed_input_is_a_syntax_failure() {
        let err = remove_comments(BraceDialect::JavaScript, "function ( { // oops\n").unwrap_err();
        assert!(matches!(
            err,
            StripError::Failure(StrategyFailure::Syntax { .. })
        ));
    }

    #[test]
    fn granularities_select_comment_forms() {
        let code = "int a; // line\nint b; /* block */\n";
        assert_eq!(
            remove_single_line(BraceDialect::C, code).unwrap(),
            "int a;\nint b; /* block */\n"
        );
        assert_eq!(
            remove_multi_line(BraceDialect::C, code).unwrap(),
            "int a; // line\nint b;\n"
        );
    }

    #[test]
    fn rust_doc_comments_and_strings() {
        let code = "/// docs\nfn main() {\n    let s = \"// not\"; // yes\n}\n";
        assert_eq!(
            all(BraceDialect::Rust, code),
            "fn main() {\n    let s = \"// not\";\n}\n"
        );
    }

    #[test]
    fn java_and_go_grammars() {
        let java = "class A {\n    /** doc */\n    int x; // f\n}\n";
        assert_eq!(all(BraceDialect::Java, java), "class A {\n    int x;\n}\n");

        let go = "package main\n\n// Main runs.\nfunc main() {}\n";
        assert_eq!(all(BraceDialect::Go, go), "package main\n\nfunc main() {}\n");
    }

    #[test]
    fn lexical_dialect_uses_the_scanner() {
        let code = "val s = \"//x\" // drop\n";
        assert_eq!(all(BraceDialect::Lexical, code), "val s = \"//x\"\n");
    }

    #[test]
    fn braces_around_a_comment_outside_jsx_are_code() {
        let code = "if (a) {/* noop */}\nfoo();\n";
        assert_eq!(all(BraceDialect::JavaScript, code), "if (a) {}\nfoo();\n");

        let arrow = "const f = () => {/* later */};\n";
        assert_eq!(all(BraceDialect::Tsx, arrow), "const f = () => {};\n");
    }

    #[test]
    fn jsx_container_on_its_own_line_goes_with_the_line() {
        let code = "const el = (\n  <div>\n    {/* note */}\n    <b />\n  </div>\n);\n";
        assert_eq!(
            all(BraceDialect::JavaScript, code),
            "const el = (\n  <div>\n    <b />\n  </div>\n);\n"
        );
        assert_eq!(remove_single_line(BraceDialect::JavaScript, code).unwrap(), code);
    }

    #[test]
    fn lexical_multiline_strings_are_preserved() {
        let code = "val s = \"\"\"\n// keep me\n\"\"\"\n";
        assert_eq!(all(BraceDialect::Lexical, code), code);
    }

    #[test]
    fn lexical_nested_block_comment_is_removed_whole() {
        let code = "/* a /* b */ c */\nval x = 1\n";
        assert_eq!(all(BraceDialect::Lexical, code), "val x = 1\n");
        assert_eq!(all(BraceDialect::Lexical, "val x = 1\n"), "val x = 1\n");
    }

    #[test]
    fn text_without_markers_is_untouched() {
        let code = "let x = a / b;\n";
        assert_eq!(all(BraceDialect::Rust, code), code);
    }

    #[test]
    fn removal_is_idempotent() {
        let code = "/* a */\nlet x = 1; // b\nlet y = `//c`;\n";
        let once = all(BraceDialect::TypeScript, code);
        assert_eq!(all(BraceDialect::TypeScript, &once), once);
    }
}
