//! Desugarer: structured statements → flat statements
//!
//! Rewrites `if`/`else`/`while`/`for`/`func` blocks, `break`/`continue`/
//! `return` and function calls into plain instructions, labels and jumps.
//! Open blocks live on a frame stack; closing a block emits the epilogue
//! its frame collected.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace};

use crate::environment::{is_identifier, ERROR_LEVEL, TYPE_NAMES};
use crate::error::{ErrorKind, Result, ScriptError};
use crate::parser::Statement;
use crate::token::{lookup_keyword, Keyword, Token, TokenKind, KEYWORDS};

/// Kind of an open block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    If,
    Else,
    For,
    While,
    Func,
}

impl FrameKind {
    pub fn is_loop(self) -> bool {
        matches!(self, FrameKind::For | FrameKind::While)
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameKind::If => "if",
            FrameKind::Else => "else",
            FrameKind::For => "for",
            FrameKind::While => "while",
            FrameKind::Func => "func",
        };
        write!(f, "{}", name)
    }
}

/// Machine-generated statement queued until a block closes
#[derive(Debug, Clone)]
enum Epilogue {
    Statement(Statement),
    Jump(String),
    Label(String),
    Delete(String),
    Return,
}

#[derive(Debug)]
struct Frame {
    origin_line: usize,
    kind: FrameKind,
    loop_end: Option<String>,
    /// Variables that die with the frame (loop variable, parameters)
    scoped: Vec<String>,
    epilogue: Vec<Epilogue>,
}

impl Frame {
    fn new(kind: FrameKind, origin_line: usize, epilogue: Vec<Epilogue>) -> Self {
        Self {
            origin_line,
            kind,
            loop_end: None,
            scoped: Vec::new(),
            epilogue,
        }
    }
}

/// One entry of the flattened program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatStmt {
    Label { name: String, line: usize },
    Statement(Statement),
}

impl FlatStmt {
    pub fn line(&self) -> usize {
        match self {
            FlatStmt::Label { line, .. } => *line,
            FlatStmt::Statement(stmt) => stmt.line,
        }
    }
}

impl fmt::Display for FlatStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlatStmt::Label { name, .. } => write!(f, "={}", name),
            FlatStmt::Statement(stmt) => write!(f, "{}", stmt),
        }
    }
}

/// Desugarer output
#[derive(Debug, Clone, Default)]
pub struct FlatProgram {
    pub statements: Vec<FlatStmt>,
    /// Function name → parameter count
    pub functions: HashMap<String, usize>,
}

/// A parsed (possibly nested) call expression
#[derive(Debug)]
struct CallExpr {
    name: String,
    args: Vec<CallArg>,
}

#[derive(Debug)]
enum CallArg {
    Operand(String),
    Nested(CallExpr),
}

/// The desugarer state
pub struct Desugarer {
    frames: Vec<Frame>,
    output: Vec<FlatStmt>,
    functions: HashMap<String, usize>,
    reserved: HashSet<String>,
    next_id: usize,
}

impl Desugarer {
    /// `instructions` are the registered instruction names; they may not
    /// be used as function names.
    pub fn new<'n>(instructions: impl IntoIterator<Item = &'n str>) -> Self {
        let mut reserved: HashSet<String> = KEYWORDS
            .iter()
            .chain(TYPE_NAMES)
            .chain(&[ERROR_LEVEL, "true", "false"])
            .map(|s| s.to_string())
            .collect();
        reserved.extend(instructions.into_iter().map(str::to_string));

        Self {
            frames: Vec::new(),
            output: Vec::new(),
            functions: HashMap::new(),
            reserved,
            next_id: 0,
        }
    }

    /// Flatten a whole program
    pub fn desugar(mut self, statements: Vec<Statement>) -> Result<FlatProgram> {
        for stmt in statements {
            let line = stmt.line;
            self.statement(stmt).map_err(|e| e.or_line(line))?;
        }

        if let Some(frame) = self.frames.last() {
            return Err(ScriptError::new(
                ErrorKind::UnterminatedBlock(frame.kind.to_string()),
                Some(frame.origin_line),
            ));
        }

        Ok(FlatProgram {
            statements: self.output,
            functions: self.functions,
        })
    }

    fn statement(&mut self, stmt: Statement) -> Result<()> {
        let Some(head) = stmt.head().cloned() else {
            return Ok(());
        };

        match head.kind {
            TokenKind::Semicolon if stmt.tokens.len() == 1 => Ok(()),
            TokenKind::CloseBlock => {
                if stmt.tokens.get(1).is_some_and(|t| t.is_word("else")) {
                    self.else_branch(&stmt, 2)
                } else {
                    self.close(&stmt, 1)
                }
            }
            TokenKind::Assign => self.label(&stmt),
            TokenKind::Argument => match lookup_keyword(&head.lexeme) {
                Some(Keyword::If) if ends_with_opener(&stmt) => self.if_header(&stmt),
                Some(Keyword::While) => self.while_header(&stmt),
                Some(Keyword::For) => self.for_header(&stmt),
                Some(Keyword::Func) => self.func_header(&stmt),
                Some(Keyword::Else) => self.else_branch(&stmt, 1),
                Some(Keyword::End) => self.close(&stmt, 1),
                Some(Keyword::Break) => self.break_statement(&stmt),
                Some(Keyword::Continue) => self.continue_statement(&stmt),
                Some(Keyword::Return) => self.return_statement(stmt),
                _ if self.functions.contains_key(&head.lexeme) => self.call_statement(&stmt),
                _ => {
                    self.emit(stmt);
                    Ok(())
                }
            },
            _ => {
                self.emit(stmt);
                Ok(())
            }
        }
    }

    // ---- output helpers ----

    fn emit(&mut self, stmt: Statement) {
        trace!(line = stmt.line, "emit {}", stmt);
        self.output.push(FlatStmt::Statement(stmt));
    }

    fn emit_label(&mut self, name: String, line: usize) {
        trace!(line, "emit ={}", name);
        self.output.push(FlatStmt::Label { name, line });
    }

    fn emit_instruction(&mut self, name: &str, args: &[&str], line: usize) {
        self.emit(instruction(name, args, line));
    }

    fn emit_epilogue(&mut self, epilogue: Vec<Epilogue>, line: usize) {
        for item in epilogue {
            match item {
                Epilogue::Statement(stmt) => self.emit(stmt),
                Epilogue::Jump(label) => self.emit_instruction("jump", &[&label], line),
                Epilogue::Label(label) => self.emit_label(label, line),
                Epilogue::Delete(name) => self.emit_instruction("delete", &[&name], line),
                Epilogue::Return => self.emit_instruction("return", &[], line),
            }
        }
    }

    /// Emit `if <condition> , target ;`
    fn emit_guard(&mut self, condition: Vec<Token>, target: &str, line: usize) {
        let mut tokens = vec![Token::argument("if")];
        tokens.extend(condition);
        tokens.push(Token::new(TokenKind::Comma, ","));
        tokens.push(Token::argument(target));
        tokens.push(Token::semicolon());
        self.emit(Statement::new(line, tokens));
    }

    fn fresh_name(&mut self, tag: &str, line: usize) -> String {
        let name = format!("__{}_{}_{}", tag, line, self.next_id);
        self.next_id += 1;
        name
    }

    // ---- block headers ----

    fn if_header(&mut self, stmt: &Statement) -> Result<()> {
        let body = header_body(&stmt.tokens, "if")?;
        let condition = condition(body, "if")?;
        let end = self.fresh_name("endif", stmt.line);

        self.emit_guard(condition, &end, stmt.line);
        self.open(Frame::new(
            FrameKind::If,
            stmt.line,
            vec![Epilogue::Label(end)],
        ));
        Ok(())
    }

    fn while_header(&mut self, stmt: &Statement) -> Result<()> {
        let body = header_body(&stmt.tokens, "while")?;
        let condition = condition(body, "while")?;
        let begin = self.fresh_name("while", stmt.line);
        let end = self.fresh_name("endwhile", stmt.line);

        self.emit_label(begin.clone(), stmt.line);
        self.emit_guard(condition, &end, stmt.line);

        let mut frame = Frame::new(
            FrameKind::While,
            stmt.line,
            vec![Epilogue::Jump(begin), Epilogue::Label(end.clone())],
        );
        frame.loop_end = Some(end);
        self.open(frame);
        Ok(())
    }

    fn for_header(&mut self, stmt: &Statement) -> Result<()> {
        let body = header_body(&stmt.tokens, "for")?;
        let parts: Vec<&[Token]> = body
            .split(|t| matches!(t.kind, TokenKind::Semicolon | TokenKind::Comma))
            .collect();
        let [init, cond, step] = parts.as_slice() else {
            return Err(malformed("for", "expected `init; condition; step`"));
        };

        let variable = match init {
            [] => None,
            [name, eq, value] | [_, name, eq, value]
                if name.is_argument()
                    && eq.kind == TokenKind::Assign
                    && value.is_argument()
                    && (init.len() == 3 || init[0].is_word("var")) =>
            {
                Some((name.lexeme.clone(), value.lexeme.clone()))
            }
            _ => return Err(malformed("for", "initializer must be `name = value`")),
        };

        let condition = condition(cond, "for")?;

        let step_ok = match step {
            [name, op] => {
                name.is_argument()
                    && op.kind == TokenKind::CompoundOp
                    && matches!(op.lexeme.as_str(), "++" | "--")
            }
            [name, op, value] => {
                name.is_argument()
                    && matches!(op.kind, TokenKind::CompoundOp | TokenKind::Assign)
                    && value.is_argument()
            }
            _ => false,
        };
        if !step_ok {
            return Err(malformed("for", "step must be `name++`, `name OP= value` or `name = value`"));
        }
        let mut step_tokens = step.to_vec();
        step_tokens.push(Token::semicolon());

        if let Some((name, value)) = &variable {
            self.emit_instruction_tokens(
                vec![
                    Token::argument("var"),
                    Token::argument(name.as_str()),
                    Token::new(TokenKind::Assign, "="),
                    Token::argument(value.as_str()),
                    Token::semicolon(),
                ],
                stmt.line,
            );
        }

        let begin = self.fresh_name("for", stmt.line);
        let end = self.fresh_name("endfor", stmt.line);
        self.emit_label(begin.clone(), stmt.line);
        self.emit_guard(condition, &end, stmt.line);

        let mut epilogue = vec![
            Epilogue::Statement(Statement::new(stmt.line, step_tokens)),
            Epilogue::Jump(begin),
            Epilogue::Label(end.clone()),
        ];
        let mut frame = Frame::new(FrameKind::For, stmt.line, Vec::new());
        if let Some((name, _)) = variable {
            epilogue.push(Epilogue::Delete(name.clone()));
            frame.scoped.push(name);
        }
        frame.epilogue = epilogue;
        frame.loop_end = Some(end);
        self.open(frame);
        Ok(())
    }

    fn emit_instruction_tokens(&mut self, tokens: Vec<Token>, line: usize) {
        self.emit(Statement::new(line, tokens));
    }

    fn func_header(&mut self, stmt: &Statement) -> Result<()> {
        let tokens = &stmt.tokens;
        let name = tokens.get(1).filter(|t| t.is_argument());

        if !self.frames.is_empty() {
            let name = name.map(|t| t.lexeme.clone()).unwrap_or_default();
            return Err(ErrorKind::NestedFunction(name).into());
        }

        let Some(name) = name.map(|t| t.lexeme.clone()) else {
            return Err(malformed("func", "expected a function name"));
        };
        let n = tokens.len();
        if n < 5
            || tokens[2].kind != TokenKind::OpenParen
            || tokens[n - 2].kind != TokenKind::CloseParen
            || !tokens[n - 1].opens_block()
        {
            return Err(malformed("func", "expected `func name(params) {`"));
        }

        self.check_name(&name)?;
        if self.functions.contains_key(&name) {
            return Err(ErrorKind::FunctionRedefinition(name).into());
        }

        let list = &tokens[3..n - 2];
        let mut params: Vec<String> = Vec::new();
        for (index, token) in list.iter().enumerate() {
            let expect_param = index % 2 == 0;
            match token.kind {
                TokenKind::Argument if expect_param => {
                    self.check_name(&token.lexeme)?;
                    if params.contains(&token.lexeme) {
                        return Err(malformed("func", "duplicate parameter name"));
                    }
                    params.push(token.lexeme.clone());
                }
                TokenKind::Comma if !expect_param => {}
                _ => return Err(malformed("func", "parameters must be separated by commas")),
            }
        }
        if list.last().is_some_and(|t| t.kind == TokenKind::Comma) {
            return Err(malformed("func", "trailing comma in parameter list"));
        }

        debug!(name = %name, arity = params.len(), line = stmt.line, "function defined");
        self.functions.insert(name.clone(), params.len());

        let post = self.fresh_name("endfunc", stmt.line);
        self.emit_instruction("jump", &[&post], stmt.line);
        self.emit_label(name, stmt.line);
        for param in &params {
            self.emit_instruction_tokens(
                vec![
                    Token::argument("var"),
                    Token::argument(param.as_str()),
                    Token::semicolon(),
                ],
                stmt.line,
            );
            self.emit_instruction("pop", &[param], stmt.line);
        }

        let mut epilogue: Vec<Epilogue> = params.iter().cloned().map(Epilogue::Delete).collect();
        epilogue.push(Epilogue::Return);
        epilogue.push(Epilogue::Label(post));

        let mut frame = Frame::new(FrameKind::Func, stmt.line, epilogue);
        frame.scoped = params;
        self.open(frame);
        Ok(())
    }

    /// Function names and parameters must be free identifiers
    fn check_name(&self, name: &str) -> Result<()> {
        if !is_identifier(name) {
            return Err(ErrorKind::InvalidIdentifier(name.to_string()).into());
        }
        if self.reserved.contains(name) {
            return Err(ErrorKind::ReservedName(name.to_string()).into());
        }
        Ok(())
    }

    fn open(&mut self, frame: Frame) {
        debug!(kind = %frame.kind, line = frame.origin_line, depth = self.frames.len() + 1, "open block");
        self.frames.push(frame);
    }

    // ---- block ends ----

    /// `else {` or `} else {`; `offset` is the index of the token after `else`
    fn else_branch(&mut self, stmt: &Statement, offset: usize) -> Result<()> {
        match &stmt.tokens[offset..] {
            [opener] if opener.opens_block() => {}
            [next, ..] if next.is_word("if") => {
                return Err(malformed("else", "else-if is not supported, nest an if block instead"))
            }
            _ => return Err(malformed("else", "expected a block opener after else")),
        }

        let frame = match self.frames.pop() {
            None => return Err(ErrorKind::DanglingElse.into()),
            Some(frame) if frame.kind != FrameKind::If => {
                return Err(ErrorKind::MisplacedElse(frame.kind.to_string()).into())
            }
            Some(frame) => frame,
        };

        let else_end = self.fresh_name("endelse", stmt.line);
        debug!(line = stmt.line, if_line = frame.origin_line, "else branch");
        self.emit_instruction("jump", &[&else_end], stmt.line);
        self.emit_epilogue(frame.epilogue, stmt.line);
        self.open(Frame::new(
            FrameKind::Else,
            stmt.line,
            vec![Epilogue::Label(else_end)],
        ));
        Ok(())
    }

    /// `}` or `end`
    fn close(&mut self, stmt: &Statement, offset: usize) -> Result<()> {
        match &stmt.tokens[offset..] {
            [] => {}
            [t] if t.kind == TokenKind::Semicolon => {}
            [extra, ..] => return Err(ErrorKind::UnexpectedToken(extra.lexeme.clone()).into()),
        }

        let frame = self.frames.pop().ok_or(ErrorKind::HangingClose)?;
        debug!(kind = %frame.kind, line = stmt.line, opened = frame.origin_line, "close block");
        self.emit_epilogue(frame.epilogue, stmt.line);
        Ok(())
    }

    // ---- jumps out of blocks ----

    fn break_statement(&mut self, stmt: &Statement) -> Result<()> {
        expect_bare(stmt)?;
        let end = self
            .frames
            .iter()
            .rev()
            .find(|f| f.kind.is_loop())
            .and_then(|f| f.loop_end.clone())
            .ok_or(ErrorKind::BreakOutsideLoop)?;
        self.emit_instruction("jump", &[&end], stmt.line);
        Ok(())
    }

    fn continue_statement(&mut self, stmt: &Statement) -> Result<()> {
        expect_bare(stmt)?;
        if !self.frames.iter().any(|f| f.kind.is_loop()) {
            return Err(ErrorKind::ContinueOutsideLoop.into());
        }

        let target = self.fresh_name("continue", stmt.line);
        if let Some(frame) = self.frames.iter_mut().rev().find(|f| f.kind.is_loop()) {
            frame.epilogue.insert(0, Epilogue::Label(target.clone()));
        }
        self.emit_instruction("jump", &[&target], stmt.line);
        Ok(())
    }

    fn return_statement(&mut self, stmt: Statement) -> Result<()> {
        if !self.frames.iter().any(|f| f.kind == FrameKind::Func) {
            return Err(ErrorKind::ReturnOutsideFunction.into());
        }

        let returned = match &stmt.tokens[1..] {
            [value, semi] if value.is_argument() && semi.kind == TokenKind::Semicolon => {
                Some(value.lexeme.clone())
            }
            [open, value, close, semi]
                if open.kind == TokenKind::OpenParen
                    && value.is_argument()
                    && close.kind == TokenKind::CloseParen
                    && semi.kind == TokenKind::Semicolon =>
            {
                Some(value.lexeme.clone())
            }
            _ => None,
        };

        let doomed: Vec<String> = self
            .frames
            .iter()
            .rev()
            .flat_map(|f| f.scoped.iter())
            .filter(|name| returned.as_ref() != Some(*name))
            .cloned()
            .collect();
        for name in doomed {
            self.emit_instruction("delete", &[&name], stmt.line);
        }

        self.emit(stmt);
        Ok(())
    }

    fn label(&mut self, stmt: &Statement) -> Result<()> {
        match stmt.tokens.as_slice() {
            [_, name, semi]
                if name.is_argument()
                    && semi.kind == TokenKind::Semicolon
                    && is_identifier(&name.lexeme)
                    && !self.reserved.contains(&name.lexeme) =>
            {
                self.emit_label(name.lexeme.clone(), stmt.line);
                Ok(())
            }
            _ => Err(ErrorKind::InvalidLabel(stmt.to_string()).into()),
        }
    }

    // ---- function calls ----

    fn call_statement(&mut self, stmt: &Statement) -> Result<()> {
        let tokens = &stmt.tokens;
        let (call, next) = self.parse_call(tokens, 0)?;

        let target = match &tokens[next..] {
            [semi] if semi.kind == TokenKind::Semicolon => None,
            [shift, target, semi]
                if shift.kind == TokenKind::RightShift
                    && target.is_argument()
                    && semi.kind == TokenKind::Semicolon =>
            {
                Some(target.lexeme.clone())
            }
            [] => return Err(ErrorKind::MissingSemicolon.into()),
            _ => return Err(ErrorKind::MalformedCall(call.name).into()),
        };

        let mut temporaries = Vec::new();
        self.flatten_call(call, stmt.line, &mut temporaries);

        match target {
            Some(target) => self.emit_instruction("pop", &[&target], stmt.line),
            None => self.emit_instruction("pop", &[], stmt.line),
        }
        for tmp in temporaries {
            self.emit_instruction("delete", &[&tmp], stmt.line);
        }
        Ok(())
    }

    /// Parse `name ( arg , ... )` starting at `pos`; returns the index
    /// after the closing parenthesis.
    fn parse_call(&self, tokens: &[Token], pos: usize) -> Result<(CallExpr, usize)> {
        let name = tokens[pos].lexeme.clone();
        let malformed = || ScriptError::from(ErrorKind::MalformedCall(name.clone()));

        if tokens.get(pos + 1).map(|t| t.kind) != Some(TokenKind::OpenParen) {
            return Err(malformed());
        }

        let mut args = Vec::new();
        let mut i = pos + 2;
        if tokens.get(i).map(|t| t.kind) == Some(TokenKind::CloseParen) {
            i += 1;
        } else {
            loop {
                let token = tokens.get(i).ok_or_else(malformed)?;
                if !token.is_argument() {
                    return Err(malformed());
                }
                let is_nested = self.functions.contains_key(&token.lexeme)
                    && tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::OpenParen);
                if is_nested {
                    let (inner, next) = self.parse_call(tokens, i)?;
                    args.push(CallArg::Nested(inner));
                    i = next;
                } else {
                    args.push(CallArg::Operand(token.lexeme.clone()));
                    i += 1;
                }

                match tokens.get(i).map(|t| t.kind) {
                    Some(TokenKind::Comma) => i += 1,
                    Some(TokenKind::CloseParen) => {
                        i += 1;
                        break;
                    }
                    _ => return Err(malformed()),
                }
            }
        }

        let expected = self.functions.get(&name).copied().unwrap_or_default();
        if args.len() != expected {
            return Err(ErrorKind::ArityMismatch {
                name,
                expected,
                found: args.len(),
            }
            .into());
        }

        Ok((CallExpr { name, args }, i))
    }

    /// Innermost calls first; their results land in temporaries. The
    /// `pop` of a result must directly follow its `call`.
    fn flatten_call(&mut self, call: CallExpr, line: usize, temporaries: &mut Vec<String>) {
        let mut operands = Vec::with_capacity(call.args.len());
        for arg in call.args {
            match arg {
                CallArg::Operand(operand) => operands.push(operand),
                CallArg::Nested(inner) => {
                    let tmp = self.fresh_name("ret", line);
                    self.emit_instruction_tokens(
                        vec![
                            Token::argument("var"),
                            Token::argument(tmp.as_str()),
                            Token::semicolon(),
                        ],
                        line,
                    );
                    self.flatten_call(inner, line, temporaries);
                    self.emit_instruction("pop", &[&tmp], line);
                    temporaries.push(tmp.clone());
                    operands.push(tmp);
                }
            }
        }

        for operand in operands.iter().rev() {
            self.emit_instruction("push", &[operand], line);
        }
        self.emit_instruction("call", &[&call.name], line);
    }
}

/// Build `name ;` or `name ( a , b ) ;`
fn instruction(name: &str, args: &[&str], line: usize) -> Statement {
    let mut tokens = vec![Token::argument(name)];
    if !args.is_empty() {
        tokens.push(Token::new(TokenKind::OpenParen, "("));
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                tokens.push(Token::new(TokenKind::Comma, ","));
            }
            tokens.push(Token::argument(*arg));
        }
        tokens.push(Token::new(TokenKind::CloseParen, ")"));
    }
    tokens.push(Token::semicolon());
    Statement::new(line, tokens)
}

fn malformed(keyword: &str, reason: &'static str) -> ScriptError {
    ErrorKind::MalformedHeader {
        keyword: keyword.to_string(),
        reason,
    }
    .into()
}

fn ends_with_opener(stmt: &Statement) -> bool {
    stmt.tokens.last().is_some_and(Token::opens_block)
}

/// The header tokens between the keyword and the opener: the inside of
/// `kw ( ... ) {`, or with a `:` opener also the bare `kw ... :`
fn header_body<'t>(tokens: &'t [Token], keyword: &str) -> Result<&'t [Token]> {
    let n = tokens.len();
    if n < 3 || !tokens[n - 1].opens_block() {
        return Err(malformed(keyword, "expected a block opener"));
    }
    let parenthesized = n >= 4
        && tokens[1].kind == TokenKind::OpenParen
        && tokens[n - 2].kind == TokenKind::CloseParen;
    if parenthesized {
        return Ok(&tokens[2..n - 2]);
    }
    if tokens[n - 1].kind == TokenKind::Colon {
        return Ok(&tokens[1..n - 1]);
    }
    Err(malformed(keyword, "condition must be parenthesized"))
}

/// `a CMP b`, `a` or `! a`
fn condition(tokens: &[Token], keyword: &str) -> Result<Vec<Token>> {
    let ok = match tokens {
        [lhs, cmp, rhs] => {
            lhs.is_argument() && cmp.kind == TokenKind::Comparison && rhs.is_argument()
        }
        [value] => value.is_argument(),
        [neg, value] => neg.kind == TokenKind::Negation && value.is_argument(),
        _ => false,
    };
    if !ok {
        return Err(malformed(keyword, "condition must be `a OP b`, `a` or `!a`"));
    }
    Ok(tokens.to_vec())
}

/// `break;` and `continue;` take nothing else
fn expect_bare(stmt: &Statement) -> Result<()> {
    match &stmt.tokens[1..] {
        [semi] if semi.kind == TokenKind::Semicolon => Ok(()),
        [] => Err(ErrorKind::MissingSemicolon.into()),
        [extra, ..] => Err(ErrorKind::UnexpectedToken(extra.lexeme.clone()).into()),
    }
}
