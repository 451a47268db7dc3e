//! 分块词法分析器示例
//! 输入按块到达，规则在数据不足时回滚到 token 起点并等待下一块。

use std::cmp::Reverse;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use feed_framework::{Feed, FeedStatus, Position, Stream, Tracked};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

type Input = Tracked<Stream<char>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number { value: f64, position: Position },
    Ident { name: String, position: Position },
    Keyword { word: &'static str, position: Position },
    Operator { op: &'static str, position: Position },
    Whitespace { position: Position },
}

impl Token {
    pub fn position(&self) -> Position {
        match self {
            Token::Number { position, .. }
            | Token::Ident { position, .. }
            | Token::Keyword { position, .. }
            | Token::Operator { position, .. }
            | Token::Whitespace { position } => *position,
        }
    }
}

/// The input ran dry before the token could be decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedMore;

/// 词法规则：匹配成功返回 token，不匹配返回 None，数据不足返回 NeedMore。
pub trait LexingRule {
    fn try_match(&mut self, input: &mut Input) -> Result<Option<Token>, NeedMore>;

    fn priority(&self) -> i32 {
        0
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn consume_while(
    input: &mut Input,
    out: &mut String,
    predicate: impl Fn(char) -> bool,
) -> Result<(), NeedMore> {
    loop {
        match input.peek() {
            Some(&c) if predicate(c) => {
                out.push(c);
                input.advance();
            }
            Some(_) => return Ok(()),
            None if input.is_finished() => return Ok(()),
            None => return Err(NeedMore),
        }
    }
}

fn matches_literal(input: &mut Input, literal: &str) -> Result<bool, NeedMore> {
    for expected in literal.chars() {
        match input.peek() {
            Some(&c) if c == expected => input.advance(),
            Some(_) => return Ok(false),
            None if input.is_finished() => return Ok(false),
            None => return Err(NeedMore),
        }
    }
    Ok(true)
}

/// 匹配数字（整数或小数）
pub struct NumberRule;

impl LexingRule for NumberRule {
    fn try_match(&mut self, input: &mut Input) -> Result<Option<Token>, NeedMore> {
        let position = input.position();
        if !input.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        let mut text = String::new();
        consume_while(input, &mut text, |c| c.is_ascii_digit())?;

        if input.peek() == Some(&'.') {
            let dot = input.checkpoint();
            input.advance();
            let mut fraction = String::new();
            consume_while(input, &mut fraction, |c| c.is_ascii_digit())?;
            if fraction.is_empty() {
                input.rollback(&dot);
            } else {
                text.push('.');
                text.push_str(&fraction);
            }
        }

        Ok(text
            .parse::<f64>()
            .ok()
            .map(|value| Token::Number { value, position }))
    }

    fn priority(&self) -> i32 {
        20
    }
}

/// 关键字：逐个尝试，失败则回滚，让标识符规则接手
pub struct KeywordRule {
    keywords: Vec<&'static str>,
}

impl KeywordRule {
    pub fn new(keywords: &[&'static str]) -> Self {
        Self {
            keywords: keywords.to_vec(),
        }
    }
}

impl LexingRule for KeywordRule {
    fn try_match(&mut self, input: &mut Input) -> Result<Option<Token>, NeedMore> {
        let position = input.position();
        for &word in &self.keywords {
            let cp = input.checkpoint();
            if matches_literal(input, word)? {
                let at_boundary = match input.peek() {
                    Some(&c) => !is_ident_continue(c),
                    None if input.is_finished() => true,
                    None => return Err(NeedMore),
                };
                if at_boundary {
                    return Ok(Some(Token::Keyword { word, position }));
                }
            }
            input.rollback(&cp);
        }
        Ok(None)
    }

    fn priority(&self) -> i32 {
        30
    }
}

pub struct IdentRule;

impl LexingRule for IdentRule {
    fn try_match(&mut self, input: &mut Input) -> Result<Option<Token>, NeedMore> {
        let position = input.position();
        if !input.peek().is_some_and(|&c| is_ident_start(c)) {
            return Ok(None);
        }
        let mut name = String::new();
        consume_while(input, &mut name, is_ident_continue)?;
        Ok(Some(Token::Ident { name, position }))
    }

    fn priority(&self) -> i32 {
        10
    }
}

/// 操作符，按最长匹配优先排列
pub struct OperatorRule;

const OPERATORS: &[&str] = &["==", "=>", "+", "-", "*", "/", "=", "(", ")", ";"];

impl LexingRule for OperatorRule {
    fn try_match(&mut self, input: &mut Input) -> Result<Option<Token>, NeedMore> {
        let position = input.position();
        for &op in OPERATORS {
            let cp = input.checkpoint();
            if matches_literal(input, op)? {
                return Ok(Some(Token::Operator { op, position }));
            }
            input.rollback(&cp);
        }
        Ok(None)
    }

    fn priority(&self) -> i32 {
        15
    }
}

pub struct WhitespaceRule;

impl LexingRule for WhitespaceRule {
    fn try_match(&mut self, input: &mut Input) -> Result<Option<Token>, NeedMore> {
        let position = input.position();
        let mut skipped = String::new();
        consume_while(input, &mut skipped, char::is_whitespace)?;
        if skipped.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Token::Whitespace { position }))
        }
    }

    fn priority(&self) -> i32 {
        1
    }
}

/// Result of one lexing step.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexed {
    Token(Token),
    /// Not enough input yet; call again after the next chunk.
    Pending,
    /// No rule matched; the character was skipped.
    Unknown { ch: char, position: Position },
    Done,
}

pub struct ChunkedLexer {
    input: Input,
    rules: Vec<Box<dyn LexingRule>>,
}

impl ChunkedLexer {
    pub fn new(rules: Vec<Box<dyn LexingRule>>) -> Self {
        let mut sorted_rules = rules;
        sorted_rules.sort_by_key(|rule| Reverse(rule.priority()));
        Self {
            input: Tracked::new(Stream::new()),
            rules: sorted_rules,
        }
    }

    pub fn push(&mut self, chunk: &str) {
        debug!(len = chunk.len(), "pushing chunk");
        self.input.inner_mut().append(chunk.chars().collect());
    }

    pub fn finish(&mut self) {
        self.input.inner_mut().finish();
    }

    pub fn next_token(&mut self) -> Lexed {
        match self.input.status() {
            FeedStatus::Finished => return Lexed::Done,
            FeedStatus::Exhausted => return Lexed::Pending,
            FeedStatus::Ready => {}
        }

        let start = self.input.checkpoint();
        for rule in &mut self.rules {
            match rule.try_match(&mut self.input) {
                Ok(Some(token)) => return Lexed::Token(token),
                Ok(None) => self.input.rollback(&start),
                Err(NeedMore) => {
                    self.input.rollback(&start);
                    return Lexed::Pending;
                }
            }
        }

        let position = self.input.position();
        let ch = *self.input.read();
        self.input.advance();
        warn!(%position, ?ch, "no rule matched");
        Lexed::Unknown { ch, position }
    }

    /// Lexes everything currently decidable.
    pub fn drain(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token() {
                Lexed::Token(token) => tokens.push(token),
                Lexed::Unknown { .. } => continue,
                Lexed::Pending | Lexed::Done => return tokens,
            }
        }
    }
}

fn default_rules() -> Vec<Box<dyn LexingRule>> {
    vec![
        Box::new(KeywordRule::new(&["let", "fn", "if", "else"])),
        Box::new(NumberRule),
        Box::new(OperatorRule),
        Box::new(IdentRule),
        Box::new(WhitespaceRule),
    ]
}

/// Tokenizes `source`, handing it to the lexer `chunk_size` characters at a time.
pub fn lex_in_chunks(source: &str, chunk_size: usize) -> Vec<Token> {
    let mut lexer = ChunkedLexer::new(default_rules());
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();

    for chunk in chars.chunks(chunk_size.max(1)) {
        lexer.push(&chunk.iter().collect::<String>());
        tokens.extend(lexer.drain());
    }
    lexer.finish();
    tokens.extend(lexer.drain());
    tokens
}

#[derive(Debug, Parser)]
#[command(name = "chunked-lexer", about = "Tokenize input delivered in chunks")]
struct Args {
    /// Input file, stdin when omitted
    input: Option<PathBuf>,

    /// Characters per chunk handed to the lexer
    #[arg(long, default_value_t = 8)]
    chunk_size: usize,

    /// Also print whitespace tokens
    #[arg(long)]
    whitespace: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let source = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let tokens = lex_in_chunks(&source, args.chunk_size);
    for token in &tokens {
        if matches!(token, Token::Whitespace { .. }) && !args.whitespace {
            continue;
        }
        println!("{:>6}  {:?}", token.position().to_string(), token);
    }
    info!(tokens = tokens.len(), chunk_size = args.chunk_size, "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace { .. }))
            .collect()
    }

    #[test]
    fn test_chunking_does_not_change_tokens() {
        let source = "let x = 12.5;\nfn f(a) => a == 3\nletter if iffy";
        let whole = lex_in_chunks(source, usize::MAX);
        for size in 1..=7 {
            assert_eq!(lex_in_chunks(source, size), whole, "chunk size {}", size);
        }
    }

    #[test]
    fn test_keyword_split_across_chunks() {
        let mut lexer = ChunkedLexer::new(default_rules());
        lexer.push("le");
        assert_eq!(lexer.next_token(), Lexed::Pending);
        lexer.push("t ");
        assert_eq!(
            lexer.next_token(),
            Lexed::Token(Token::Keyword {
                word: "let",
                position: Position::new(),
            })
        );
    }

    #[test]
    fn test_keyword_prefix_rolls_back_to_ident() {
        let mut lexer = ChunkedLexer::new(default_rules());
        lexer.push("let");
        assert_eq!(lexer.next_token(), Lexed::Pending);
        lexer.push("ter");
        lexer.finish();
        assert_eq!(
            significant(lexer.drain()),
            vec![Token::Ident {
                name: "letter".to_string(),
                position: Position::new(),
            }]
        );
        assert_eq!(lexer.next_token(), Lexed::Done);
    }

    #[test]
    fn test_operator_waits_for_second_char() {
        let mut lexer = ChunkedLexer::new(default_rules());
        lexer.push("=");
        assert_eq!(lexer.next_token(), Lexed::Pending);
        lexer.push("=");
        lexer.finish();
        assert_eq!(
            lexer.drain(),
            vec![Token::Operator {
                op: "==",
                position: Position::new(),
            }]
        );
    }

    #[test]
    fn test_number_completes_at_finish() {
        let mut lexer = ChunkedLexer::new(default_rules());
        lexer.push("3.");
        assert_eq!(lexer.next_token(), Lexed::Pending);
        lexer.push("25");
        assert_eq!(lexer.next_token(), Lexed::Pending);
        lexer.finish();
        assert_eq!(
            lexer.next_token(),
            Lexed::Token(Token::Number {
                value: 3.25,
                position: Position::new(),
            })
        );
        assert_eq!(lexer.next_token(), Lexed::Done);
    }

    #[test]
    fn test_positions_across_lines() {
        let tokens = significant(lex_in_chunks("a\n  b", 2));
        assert_eq!(tokens[0].position(), Position::at(1, 1, 0));
        assert_eq!(tokens[1].position(), Position::at(2, 3, 4));
    }

    #[test]
    fn test_unknown_character_is_skipped() {
        let mut lexer = ChunkedLexer::new(default_rules());
        lexer.push("#a");
        lexer.finish();
        assert_eq!(
            lexer.next_token(),
            Lexed::Unknown {
                ch: '#',
                position: Position::new(),
            }
        );
        assert!(matches!(lexer.next_token(), Lexed::Token(Token::Ident { .. })));
    }
}
