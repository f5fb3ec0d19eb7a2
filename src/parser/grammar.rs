use crate::error::ParseError;
use crate::macros::{Argument, Attachment, Macro, RawAttribute};
use crate::syntax::*;
use super::lexer::{Lexer, Located, Token};

/// Modifiers that may precede a member or type declaration.
const MODIFIERS: &[&str] = &[
    "public", "private", "fileprivate", "internal", "open", "package", "static", "final", "lazy",
    "weak", "unowned", "override", "mutating", "nonmutating", "dynamic", "optional", "required",
    "convenience", "indirect", "nonisolated", "isolated", "distributed", "prefix", "postfix",
    "infix", "consuming", "borrowing",
];

/// Keywords after which `class` acts as a `static`-like modifier.
const CLASS_MEMBER_KEYWORDS: &[&str] = &["var", "let", "func", "subscript", "override", "final"];

const ACCESSOR_KEYWORDS: &[&str] = &[
    "get", "set", "willSet", "didSet", "_read", "_modify", "init", "unsafeAddress",
    "unsafeMutableAddress",
];

/// A parsed source file.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Top-level type declarations, with nested declarations in their members.
    pub declarations: Vec<Declaration>,
    /// Spans of every attribute that resolved to one of our macros, on types
    /// and on members, in source order.
    pub macro_attributes: Vec<Span>,
}

/// Parse declaration source text into a tree.
pub fn parse_source(input: &str) -> Result<SourceFile, ParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
        macro_attributes: Vec::new(),
    };

    let mut declarations = Vec::new();
    loop {
        match parser.peek().token {
            Token::Eof => break,
            Token::RBrace => return Err(parser.error("expected declaration")),
            _ => {
                if let Some(MemberItem::Declaration(decl)) = parser.parse_item()? {
                    declarations.push(decl);
                }
            }
        }
    }

    let mut macro_attributes = parser.macro_attributes;
    macro_attributes.sort_by_key(|span| span.start);
    Ok(SourceFile {
        declarations,
        macro_attributes,
    })
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Located>,
    pos: usize,
    macro_attributes: Vec<Span>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Located {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> &Located {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Located {
        let tok = self.tokens[self.pos].clone();
        if tok.token != Token::Eof {
            self.pos += 1;
        }
        tok
    }

    /// End offset of the last consumed token, or `fallback` if none was
    /// consumed since `start_pos`.
    fn consumed_end(&self, start_pos: usize, fallback: usize) -> usize {
        if self.pos > start_pos {
            self.tokens[self.pos - 1].span.end
        } else {
            fallback
        }
    }

    fn is_name(&self, name: &str) -> bool {
        matches!(&self.peek().token, Token::Name(n) if n == name)
    }

    fn error(&self, message: &str) -> ParseError {
        let tok = self.peek();
        ParseError::Syntax {
            line: tok.span.line,
            column: tok.span.column,
            message: format!("{}, found {:?}", message, tok.token),
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<Located, ParseError> {
        if self.peek().token == expected {
            Ok(self.next())
        } else {
            Err(self.error(&format!("expected {}", what)))
        }
    }

    fn expect_name(&mut self) -> Result<(String, Span), ParseError> {
        match &self.peek().token {
            Token::Name(n) => {
                let name = n.clone();
                Ok((name, self.next().span))
            }
            _ => Err(self.error("expected name")),
        }
    }

    fn parse_item(&mut self) -> Result<Option<MemberItem>, ParseError> {
        let start = self.peek().span;
        let attributes = self.parse_attributes()?;
        let is_static = self.parse_modifiers();

        let keyword = match &self.peek().token {
            Token::Semi => {
                self.next();
                return Ok(None);
            }
            Token::Name(n) => n.clone(),
            _ => return Ok(Some(MemberItem::Other(self.skip_other(start)))),
        };
        let named = matches!(self.peek_at(1).token, Token::Name(_));

        if keyword == "let" || keyword == "var" {
            self.parse_variable(start, &attributes, is_static).map(Some)
        } else if let (Some(kind), true) = (DeclKind::from_keyword(&keyword), named) {
            let decl = self.parse_declaration(kind, start, &attributes)?;
            Ok(Some(MemberItem::Declaration(decl)))
        } else {
            Ok(Some(MemberItem::Other(self.skip_other(start))))
        }
    }

    fn parse_attributes(&mut self) -> Result<Vec<RawAttribute>, ParseError> {
        let mut attributes = Vec::new();
        while self.peek().token == Token::At {
            let at = self.next();
            let (name, name_span) = self.expect_name()?;
            let mut end = name_span.end;
            let mut arguments = Vec::new();
            if self.peek().token == Token::LParen && self.peek().span.start == name_span.end {
                self.next();
                arguments = self.parse_arguments()?;
                end = self.expect(Token::RParen, "')'")?.span.end;
            }
            attributes.push(RawAttribute {
                name,
                arguments,
                span: Span { end, ..at.span },
            });
        }
        Ok(attributes)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Argument>, ParseError> {
        let mut arguments = Vec::new();
        while self.peek().token != Token::RParen {
            let label = match (&self.peek().token, &self.peek_at(1).token) {
                (Token::Name(n), Token::Colon) => Some(n.clone()),
                _ => None,
            };
            if label.is_some() {
                self.next();
                self.next();
            }
            let value = self.parse_expr(false)?;
            arguments.push(Argument { label, value });
            match self.peek().token {
                Token::Comma => {
                    self.next();
                }
                Token::RParen => {}
                _ => return Err(self.error("expected ',' or ')' in attribute arguments")),
            }
        }
        Ok(arguments)
    }

    /// Consume modifiers; returns whether one of them makes the member static.
    fn parse_modifiers(&mut self) -> bool {
        let mut is_static = false;
        loop {
            let name = match &self.peek().token {
                Token::Name(n) => n.clone(),
                _ => break,
            };
            let class_modifier = name == "class"
                && matches!(&self.peek_at(1).token, Token::Name(n) if CLASS_MEMBER_KEYWORDS.contains(&n.as_str()));
            if !class_modifier && !MODIFIERS.contains(&name.as_str()) {
                break;
            }
            if class_modifier || name == "static" {
                is_static = true;
            }
            let modifier = self.next();
            // `private(set)`, `unowned(safe)`
            if self.peek().token == Token::LParen && self.peek().span.start == modifier.span.end {
                self.skip_balanced();
            }
        }
        is_static
    }

    fn parse_variable(
        &mut self,
        start: Span,
        attributes: &[RawAttribute],
        is_static: bool,
    ) -> Result<MemberItem, ParseError> {
        let keyword = self.next();
        let mutability = match keyword.token {
            Token::Name(ref n) if n == "let" => Mutability::Immutable,
            _ => Mutability::Mutable,
        };
        if !matches!(self.peek().token, Token::Name(_)) {
            // Tuple patterns are not modelled.
            return Ok(MemberItem::Other(self.skip_other(start)));
        }

        let mut annotations = Vec::with_capacity(attributes.len());
        for attr in attributes {
            let annotation = MemberAnnotation::from_attribute(attr).map_err(|source| ParseError::Argument {
                line: attr.span.line,
                column: attr.span.column,
                source,
            })?;
            if let MemberAnnotation::CodingKey(_) = annotation {
                self.macro_attributes.push(attr.span);
            }
            annotations.push(annotation);
        }

        let mut bindings = Vec::new();
        loop {
            let (name, span) = self.expect_name()?;
            let type_annotation = if self.peek().token == Token::Colon {
                self.next();
                Some(self.parse_type()?)
            } else {
                None
            };
            let initializer = if self.peek().token == Token::Equals {
                self.next();
                Some(self.parse_expr(false)?)
            } else {
                None
            };
            let accessor = if self.peek().token == Token::LBrace {
                self.parse_accessor_block()?
            } else {
                AccessorShape::Stored
            };
            bindings.push(Binding {
                pattern: Pattern { name, span },
                type_annotation,
                initializer,
                accessor,
            });

            if self.peek().token == Token::Comma {
                self.next();
            } else {
                break;
            }
        }

        let end = self.tokens[self.pos - 1].span.end;
        Ok(MemberItem::Variable(Member {
            annotations,
            is_static,
            mutability,
            bindings,
            span: Span { end, ..start },
        }))
    }

    fn parse_declaration(
        &mut self,
        kind: DeclKind,
        start: Span,
        attributes: &[RawAttribute],
    ) -> Result<Declaration, ParseError> {
        self.next();

        let mut attachments = Vec::new();
        for attr in attributes {
            let resolved = Macro::from_attribute(attr).map_err(|source| ParseError::Argument {
                line: attr.span.line,
                column: attr.span.column,
                source,
            })?;
            if let Some(macro_kind) = resolved {
                self.macro_attributes.push(attr.span);
                attachments.push(Attachment {
                    macro_kind,
                    span: attr.span,
                });
            }
        }

        let (mut name, _) = self.expect_name()?;
        while self.peek().token == Token::Dot && matches!(self.peek_at(1).token, Token::Name(_)) {
            self.next();
            let (part, _) = self.expect_name()?;
            name.push('.');
            name.push_str(&part);
        }
        if matches!(&self.peek().token, Token::Operator(op) if op.starts_with('<')) {
            self.skip_generic_clause();
        }

        let mut inherited = Vec::new();
        if self.peek().token == Token::Colon {
            self.next();
            loop {
                inherited.push(self.parse_type()?.text);
                if self.peek().token == Token::Comma {
                    self.next();
                } else {
                    break;
                }
            }
        }
        if self.is_name("where") {
            while !matches!(self.peek().token, Token::LBrace | Token::Eof) {
                self.next();
            }
        }

        let open = self.expect(Token::LBrace, "'{'")?;
        let mut members = Vec::new();
        loop {
            match self.peek().token {
                Token::RBrace => break,
                Token::Eof => return Err(self.error(&format!("expected '}}' to close '{}'", name))),
                _ => {
                    if let Some(item) = self.parse_item()? {
                        members.push(item);
                    }
                }
            }
        }
        let close = self.next();

        Ok(Declaration {
            kind,
            name,
            attachments,
            inherited,
            members,
            span: Span {
                end: close.span.end,
                ..start
            },
            body: Span {
                end: close.span.end,
                ..open.span
            },
        })
    }

    /// Consume a type and keep its source text verbatim.
    fn parse_type(&mut self) -> Result<TypeAnnotation, ParseError> {
        let first = self.peek().span;
        let start_pos = self.pos;
        let mut depth = 0i32;
        loop {
            self.split_trailing_equals();
            let tok = self.peek();
            let top = depth == 0;
            if top && self.pos > start_pos && tok.newline_before {
                break;
            }
            match &tok.token {
                Token::Eof => break,
                Token::Equals | Token::LBrace | Token::RBrace | Token::Semi | Token::Comma | Token::Colon
                    if top =>
                {
                    break
                }
                Token::Name(n) if top && n == "where" => break,
                Token::RParen | Token::RBracket if top => break,
                Token::LParen | Token::LBracket => depth += 1,
                Token::RParen | Token::RBracket => depth -= 1,
                Token::Operator(op) if op != "->" => {
                    let opens = op.matches('<').count() as i32;
                    let closes = op.matches('>').count() as i32;
                    depth = (depth + opens - closes).max(0);
                }
                _ => {}
            }
            self.next();
        }

        if self.pos == start_pos {
            return Err(self.error("expected type"));
        }
        let end = self.consumed_end(start_pos, first.start);
        Ok(TypeAnnotation {
            text: self.input[first.start..end].to_string(),
            span: Span { end, ..first },
        })
    }

    /// Split `?=`, `!=` or `>=` written without spaces after a type into the
    /// postfix part and a separate `=`.
    fn split_trailing_equals(&mut self) {
        let tok = self.peek();
        let prefix = match &tok.token {
            Token::Operator(op)
                if op.len() > 1
                    && op.ends_with('=')
                    && op[..op.len() - 1].bytes().all(|b| matches!(b, b'?' | b'!' | b'>')) =>
            {
                op[..op.len() - 1].to_string()
            }
            _ => return,
        };
        let (span, newline_before) = (tok.span, tok.newline_before);
        let at = span.end - 1;
        self.tokens[self.pos] = Located {
            token: Token::Operator(prefix),
            span: Span { end: at, ..span },
            newline_before,
        };
        self.tokens.insert(
            self.pos + 1,
            Located {
                token: Token::Equals,
                span: Span::new(at, span.end, span.line, span.column + (at - span.start)),
                newline_before: false,
            },
        );
    }

    /// Parse an expression, recognising literal shapes. Anything that is not
    /// a bare literal becomes `ExprKind::Other` with its text kept verbatim.
    fn parse_expr(&mut self, stop_at_colon: bool) -> Result<Expr, ParseError> {
        let first = self.peek().clone();
        let start_pos = self.pos;

        let literal = match &first.token {
            Token::Name(n) if n == "true" || n == "false" => Some(ExprKind::Bool(n == "true")),
            Token::Name(n) if n == "nil" => Some(ExprKind::Nil),
            Token::Integer(_) => Some(ExprKind::Integer),
            Token::Float(_) => Some(ExprKind::Float),
            Token::Str(_) => Some(ExprKind::String),
            _ => None,
        };

        let literal = match (&first.token, literal) {
            (_, Some(kind)) => {
                self.next();
                Some(kind)
            }
            (Token::LBracket, None) => Some(self.parse_collection()?),
            (Token::Dot, None) => {
                let member = self.peek_at(1);
                let name = match &member.token {
                    Token::Name(n) if member.span.start == first.span.end => Some(n.clone()),
                    _ => None,
                };
                if name.is_some() {
                    self.next();
                    self.next();
                }
                name.map(ExprKind::ImplicitMember)
            }
            _ => None,
        };

        let kind = match literal {
            Some(kind) if self.expr_ends_here(stop_at_colon, false) => kind,
            _ => {
                self.consume_expr_rest(stop_at_colon, start_pos);
                ExprKind::Other
            }
        };

        let end = self.consumed_end(start_pos, first.span.start);
        Ok(Expr {
            kind,
            text: self.input[first.span.start..end].to_string(),
            span: Span { end, ..first.span },
        })
    }

    /// Parse `[ ... ]` after deciding between an array and a dictionary.
    fn parse_collection(&mut self) -> Result<ExprKind, ParseError> {
        self.next();
        let mut elements = Vec::new();
        loop {
            match self.peek().token {
                Token::RBracket => {
                    self.next();
                    return Ok(ExprKind::Array(elements));
                }
                Token::Colon => {
                    self.skip_to_close_bracket();
                    return Ok(ExprKind::Other);
                }
                Token::Eof => return Err(self.error("expected ']'")),
                _ => {}
            }
            elements.push(self.parse_expr(true)?);
            match self.peek().token {
                Token::Comma => {
                    self.next();
                }
                Token::RBracket => {}
                Token::Colon => {
                    self.skip_to_close_bracket();
                    return Ok(ExprKind::Other);
                }
                _ => return Err(self.error("expected ',' or ']' in array literal")),
            }
        }
    }

    /// Whether the expression being parsed ends before the next token.
    fn expr_ends_here(&self, stop_at_colon: bool, first: bool) -> bool {
        let tok = self.peek();
        match &tok.token {
            Token::Eof | Token::Comma | Token::Semi | Token::RParen | Token::RBracket | Token::RBrace => true,
            Token::Colon => stop_at_colon,
            Token::LBrace => !first && self.is_observer_block(),
            Token::Dot | Token::Operator(_) | Token::Equals => false,
            _ => tok.newline_before && !first,
        }
    }

    fn consume_expr_rest(&mut self, stop_at_colon: bool, start_pos: usize) {
        let mut depth = 0usize;
        loop {
            if depth == 0 && self.expr_ends_here(stop_at_colon, self.pos == start_pos) {
                break;
            }
            match self.peek().token {
                Token::Eof => break,
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next();
        }
    }

    /// `{ willSet ... }` / `{ didSet ... }` after an initializer.
    fn is_observer_block(&self) -> bool {
        self.peek().token == Token::LBrace
            && matches!(&self.peek_at(1).token, Token::Name(n) if n == "willSet" || n == "didSet")
    }

    /// Classify and consume an accessor block.
    fn parse_accessor_block(&mut self) -> Result<AccessorShape, ParseError> {
        let open = self.next();
        let opens_with_accessor = match &self.peek().token {
            Token::Name(n) => {
                ACCESSOR_KEYWORDS.contains(&n.as_str()) || n == "mutating" || n == "nonmutating"
            }
            Token::At => true,
            _ => false,
        };

        let mut braces = 1usize;
        let mut nested = 0usize;
        let mut keywords = Vec::new();
        loop {
            let tok = self.next();
            match &tok.token {
                Token::Eof => {
                    return Err(ParseError::Syntax {
                        line: open.span.line,
                        column: open.span.column,
                        message: "unterminated accessor block".to_string(),
                    })
                }
                Token::LBrace => braces += 1,
                Token::RBrace => {
                    braces -= 1;
                    if braces == 0 {
                        break;
                    }
                }
                Token::LParen | Token::LBracket => nested += 1,
                Token::RParen | Token::RBracket => nested = nested.saturating_sub(1),
                Token::Name(n) if braces == 1 && nested == 0 && ACCESSOR_KEYWORDS.contains(&n.as_str()) => {
                    keywords.push(n.clone());
                }
                _ => {}
            }
        }

        let observers_only = !keywords.is_empty()
            && keywords.iter().all(|k| k == "willSet" || k == "didSet");
        if opens_with_accessor && observers_only {
            Ok(AccessorShape::Observed)
        } else {
            Ok(AccessorShape::Computed)
        }
    }

    /// Skip a member this reader does not model, e.g. a function or an enum case.
    fn skip_other(&mut self, start: Span) -> Span {
        let start_pos = self.pos;
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            if depth == 0 {
                let ends = match &tok.token {
                    Token::Eof | Token::RBrace | Token::Semi => true,
                    _ if self.pos == start_pos => false,
                    Token::LBrace | Token::Dot | Token::Operator(_) => false,
                    _ => tok.newline_before,
                };
                if ends {
                    break;
                }
            }
            match tok.token {
                Token::Eof => break,
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.next();
        }
        if self.pos == start_pos && self.peek().token == Token::Semi {
            self.next();
        }
        let end = self.consumed_end(start_pos, start.start).max(start.start);
        Span { end, ..start }
    }

    /// Skip `( ... )` including nested groups.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            let tok = self.next();
            match tok.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                Token::Eof => return,
                _ => {}
            }
        }
    }

    /// Skip the rest of a collection literal whose `[` is already consumed.
    fn skip_to_close_bracket(&mut self) {
        let mut depth = 1usize;
        loop {
            let tok = self.next();
            match tok.token {
                Token::LBracket | Token::LParen | Token::LBrace => depth += 1,
                Token::RBracket | Token::RParen | Token::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                Token::Eof => return,
                _ => {}
            }
        }
    }

    /// Skip `<...>` after a type name.
    fn skip_generic_clause(&mut self) {
        let mut depth = 0i32;
        loop {
            let tok = self.next();
            match &tok.token {
                Token::Operator(op) => {
                    depth += op.matches('<').count() as i32;
                    depth -= op.matches('>').count() as i32;
                    if depth <= 0 {
                        return;
                    }
                }
                Token::Eof => return,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding_keys::NamingStrategy;
    use crate::error::ArgumentError;

    fn single(source: &str) -> Declaration {
        let mut file = parse_source(source).unwrap();
        assert_eq!(file.declarations.len(), 1);
        file.declarations.remove(0)
    }

    fn variables(decl: &Declaration) -> Vec<&Member> {
        decl.variables().collect()
    }

    #[test]
    fn test_parse_simple_struct() {
        let decl = single("@PublicInit\npublic struct State {\n    public let id: Int\n}");
        assert_eq!(decl.kind, DeclKind::Struct);
        assert_eq!(decl.name, "State");
        assert_eq!(decl.attachments.len(), 1);
        assert_eq!(decl.attachments[0].macro_kind, Macro::PublicInit);
        assert_eq!((decl.attachments[0].span.line, decl.attachments[0].span.column), (1, 1));

        let members = variables(&decl);
        assert_eq!(members.len(), 1);
        let binding = &members[0].bindings[0];
        assert_eq!(members[0].mutability, Mutability::Immutable);
        assert_eq!(binding.pattern.name, "id");
        assert_eq!(binding.type_annotation.as_ref().unwrap().text, "Int");
        assert!(binding.initializer.is_none());
    }

    #[test]
    fn test_parse_types_verbatim() {
        let decl = single(
            "struct S {\n    var a: Int? = nil\n    var b: [String: [Int]]\n    var c: Dictionary<String, Array<Int>>?\n    let d: (Int) -> Void\n}",
        );
        let types: Vec<_> = variables(&decl)
            .iter()
            .map(|m| m.bindings[0].type_annotation.as_ref().unwrap().text.clone())
            .collect();
        assert_eq!(
            types,
            vec!["Int?", "[String: [Int]]", "Dictionary<String, Array<Int>>?", "(Int) -> Void"]
        );
    }

    #[test]
    fn test_parse_type_followed_by_unspaced_equals() {
        let decl = single("struct S {\n    var x: Int?=nil\n    var y: Array<Int>=[]\n    var z: Int!=0\n}");
        let members = variables(&decl);
        let parts: Vec<_> = members
            .iter()
            .map(|m| {
                let binding = &m.bindings[0];
                (
                    binding.type_annotation.as_ref().unwrap().text.clone(),
                    binding.initializer.as_ref().unwrap().text.clone(),
                )
            })
            .collect();
        assert_eq!(
            parts,
            vec![
                ("Int?".to_string(), "nil".to_string()),
                ("Array<Int>".to_string(), "[]".to_string()),
                ("Int!".to_string(), "0".to_string()),
            ]
        );
        assert_eq!(members[0].bindings[0].initializer.as_ref().unwrap().kind, ExprKind::Nil);
    }

    #[test]
    fn test_parse_literal_shapes() {
        let decl = single(
            "struct S {\n    var a = true\n    var b = 1\n    var c = 0.5\n    var d = \"x\"\n    var e = [1, 2]\n    var f = [:]\n    var g = makeId()\n    var h = 1 + 2\n    var i = -1\n}",
        );
        let kinds: Vec<_> = variables(&decl)
            .iter()
            .map(|m| m.bindings[0].initializer.as_ref().unwrap().kind.clone())
            .collect();
        assert_eq!(kinds[0], ExprKind::Bool(true));
        assert_eq!(kinds[1], ExprKind::Integer);
        assert_eq!(kinds[2], ExprKind::Float);
        assert_eq!(kinds[3], ExprKind::String);
        assert!(matches!(&kinds[4], ExprKind::Array(elements) if elements.len() == 2));
        assert_eq!(kinds[5], ExprKind::Other);
        assert_eq!(kinds[6], ExprKind::Other);
        assert_eq!(kinds[7], ExprKind::Other);
        assert_eq!(kinds[8], ExprKind::Other);

        let texts: Vec<_> = variables(&decl)
            .iter()
            .map(|m| m.bindings[0].initializer.as_ref().unwrap().text.clone())
            .collect();
        assert_eq!(texts[4], "[1, 2]");
        assert_eq!(texts[6], "makeId()");
        assert_eq!(texts[7], "1 + 2");
    }

    #[test]
    fn test_parse_accessor_shapes() {
        let decl = single(
            "class C {\n    var a: Bool {\n        return true\n    }\n    var b: Int { get set }\n    var c: Int = 0 {\n        didSet { print(c) }\n    }\n    var d = 1 { willSet(v) { } didSet { } }\n    var e: Int {\n        get { 1 }\n        set { }\n    }\n}",
        );
        let shapes: Vec<_> = variables(&decl).iter().map(|m| m.bindings[0].accessor).collect();
        assert_eq!(
            shapes,
            vec![
                AccessorShape::Computed,
                AccessorShape::Computed,
                AccessorShape::Observed,
                AccessorShape::Observed,
                AccessorShape::Computed,
            ]
        );
    }

    #[test]
    fn test_parse_modifiers_and_static() {
        let decl = single(
            "class C {\n    public static var shared: Int = 0\n    class var name: String { \"c\" }\n    private(set) var count: Int\n    lazy var cache = [1]\n}",
        );
        let members = variables(&decl);
        assert!(members[0].is_static);
        assert!(members[1].is_static);
        assert!(!members[2].is_static);
        assert_eq!(members[2].bindings[0].pattern.name, "count");
        assert_eq!(members[3].bindings[0].pattern.name, "cache");
    }

    #[test]
    fn test_parse_multi_binding() {
        let decl = single("struct S {\n    let a, b: Int\n    var x = 1, y = 2\n}");
        let members = variables(&decl);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].bindings.len(), 2);
        assert_eq!(members[1].bindings.len(), 2);
        assert_eq!(members[1].bindings[1].initializer.as_ref().unwrap().text, "2");
    }

    #[test]
    fn test_parse_skips_other_members() {
        let decl = single(
            "public enum Action: Equatable {\n    case increment\n    case set(Int), reset\n    func apply(to value: inout Int) {\n        value += 1\n    }\n    init() { self = .reset }\n    static let all: [Action] = []\n}",
        );
        assert_eq!(decl.kind, DeclKind::Enum);
        assert_eq!(decl.inherited, vec!["Equatable"]);
        let others = decl
            .members
            .iter()
            .filter(|m| matches!(m, MemberItem::Other(_)))
            .count();
        assert_eq!(others, 4);
        assert_eq!(variables(&decl).len(), 1);
    }

    #[test]
    fn test_parse_nested_and_generic() {
        let decl = single(
            "struct Outer<T: Equatable>: Codable where T: Hashable {\n    let value: T\n    @CodingKeys\n    struct Inner {\n        let id: Int\n    }\n}",
        );
        assert_eq!(decl.name, "Outer");
        assert_eq!(decl.inherited, vec!["Codable"]);
        let nested: Vec<_> = decl.nested().collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "Inner");
        assert_eq!(
            nested[0].attachments[0].macro_kind,
            Macro::CodingKeys(NamingStrategy::Identity)
        );
    }

    #[test]
    fn test_parse_macro_arguments() {
        let file = parse_source(
            "import Foundation\n\n@CodingKeys(using: .snake_case)\npublic struct State: Codable {\n    @available(*, deprecated)\n    public let id: String\n    @CodingKey(name: \"some last name\")\n    public let lastName: String\n}",
        )
        .unwrap();
        let decl = &file.declarations[0];
        assert_eq!(
            decl.attachments[0].macro_kind,
            Macro::CodingKeys(NamingStrategy::SnakeCase)
        );
        let members = variables(decl);
        assert_eq!(members[0].annotations, vec![MemberAnnotation::Other("available".into())]);
        assert_eq!(
            members[1].coding_key().unwrap().as_source(),
            "\"some last name\""
        );
        assert_eq!(file.macro_attributes.len(), 2);
    }

    #[test]
    fn test_parse_bad_strategy() {
        let err = parse_source("@CodingKeys(using: .kebab)\nstruct S {}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Argument {
                line: 1,
                column: 1,
                source: ArgumentError::UnknownStrategy {
                    strategy: "kebab".into()
                },
            }
        );
    }

    #[test]
    fn test_parse_unclosed_body() {
        assert!(matches!(
            parse_source("struct S {\n    let id: Int\n"),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn test_pattern_span() {
        let decl = single("@PublicInit\npublic struct State {\n    public var id = \"1\"\n}");
        let pattern = &variables(&decl)[0].bindings[0].pattern;
        assert_eq!((pattern.span.line, pattern.span.column), (3, 16));
    }
}
