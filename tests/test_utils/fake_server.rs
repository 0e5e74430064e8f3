//! In-memory stand-in for a MySQL server
//!
//! Understands exactly the statements the admin layer issues and answers with
//! the same error codes a real server uses. Every call is recorded so tests
//! can assert that validation failures never reach the backend.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use sqladm::admin::classify::codes;
use sqladm::admin::statements;
use sqladm::admin::GrantKind;
use sqladm::backend::{Backend, BackendError, BackendResult, Datum, Row};

/// Databases every fresh server has
pub const BUILTIN_DATABASES: &[&str] = &["information_schema", "mysql", "performance_schema", "sys"];

/// Extra error code: GRANT for an account that does not exist
pub const ER_CANT_CREATE_USER_WITH_GRANT: u16 = 1410;

#[derive(Debug, Clone)]
struct Account {
    name: String,
    password: String,
    max_connections: u32,
}

#[derive(Debug, Default)]
struct State {
    databases: Vec<String>,
    tables: HashMap<String, Vec<(String, u64)>>,
    accounts: Vec<Account>,
    grants: HashMap<(String, String), BTreeSet<GrantKind>>,
    calls: Vec<String>,
    fail_next: Option<BackendError>,
    closed: bool,
}

/// Fake MySQL server implementing [`Backend`]
pub struct FakeServer {
    state: Mutex<State>,
}

impl FakeServer {
    /// A server with the built-in schemas and a `root` account
    pub fn new() -> Arc<Self> {
        let state = State {
            databases: BUILTIN_DATABASES.iter().map(|s| s.to_string()).collect(),
            accounts: vec![Account {
                name: "root".to_string(),
                password: "password".to_string(),
                max_connections: 0,
            }],
            ..State::default()
        };
        Arc::new(FakeServer {
            state: Mutex::new(state),
        })
    }

    /// Statements and queries received so far
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Make the next call fail with `err`
    pub fn fail_next(&self, err: BackendError) {
        self.state.lock().fail_next = Some(err);
    }

    /// Add a table of `bytes` size to a database
    pub fn add_table(&self, database: &str, table: &str, bytes: u64) {
        self.state
            .lock()
            .tables
            .entry(database.to_string())
            .or_default()
            .push((table.to_string(), bytes));
    }

    /// Create an account directly, bypassing the admin layer
    pub fn add_account(&self, name: &str, password: &str) {
        self.state.lock().accounts.push(Account {
            name: name.to_string(),
            password: password.to_string(),
            max_connections: 0,
        });
    }

    /// Whether a login as `user` could use `database`
    pub fn can_connect(&self, user: &str, password: &str, database: Option<&str>) -> bool {
        let state = self.state.lock();
        let Some(account) = state.accounts.iter().find(|a| a.name == user) else {
            return false;
        };
        if account.password != password {
            return false;
        }
        match database {
            None => true,
            Some(db) => state
                .grants
                .get(&(db.to_string(), user.to_string()))
                .is_some_and(|g| !g.is_empty()),
        }
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

#[async_trait]
impl Backend for FakeServer {
    async fn execute(&self, sql: &str) -> BackendResult<()> {
        let mut state = self.state.lock();
        state.calls.push(sql.to_string());
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        let tokens = tokenize(sql)?;
        state.apply(&tokens)
    }

    async fn query(&self, sql: &str, params: Vec<Datum>) -> BackendResult<Vec<Row>> {
        let mut state = self.state.lock();
        state.calls.push(sql.to_string());
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        state.answer(sql, &params)
    }

    async fn close(&self) -> BackendResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

impl State {
    fn apply(&mut self, tokens: &[Token<'_>]) -> BackendResult<()> {
        use Token::{Ident, Lit, Sym, Word};

        match tokens {
            [Word("CREATE"), Word("DATABASE"), Ident(db)] => {
                if self.databases.contains(db) {
                    return Err(BackendError::server(
                        codes::ER_DB_CREATE_EXISTS,
                        "HY000",
                        format!("Can't create database '{}'; database exists", db),
                    ));
                }
                self.databases.push(db.clone());
                Ok(())
            }
            [Word("DROP"), Word("DATABASE"), Ident(db)] => {
                if !self.databases.contains(db) {
                    return Err(BackendError::server(
                        codes::ER_DB_DROP_EXISTS,
                        "HY000",
                        format!("Can't drop database '{}'; database doesn't exist", db),
                    ));
                }
                self.databases.retain(|d| d != db);
                self.tables.remove(db);
                Ok(())
            }
            [Word("CREATE"), Word("USER"), Lit(user), Sym('@'), Lit(_), Word("IDENTIFIED"), Word("BY"), Lit(password), rest @ ..] =>
            {
                let max_connections = match rest {
                    [] => 0,
                    [Word("WITH"), Word("MAX_USER_CONNECTIONS"), Word(n)] => parse_number(n)?,
                    _ => return Err(syntax_error()),
                };
                if self.account(user).is_some() {
                    return Err(cannot_user("CREATE USER", user));
                }
                self.accounts.push(Account {
                    name: user.clone(),
                    password: password.clone(),
                    max_connections,
                });
                Ok(())
            }
            [Word("ALTER"), Word("USER"), Lit(user), Sym('@'), Lit(_), Word("WITH"), Word("MAX_USER_CONNECTIONS"), Word(n)] =>
            {
                let limit = parse_number(n)?;
                match self.accounts.iter_mut().find(|a| &a.name == user) {
                    Some(account) => {
                        account.max_connections = limit;
                        Ok(())
                    }
                    None => Err(cannot_user("ALTER USER", user)),
                }
            }
            [Word("SET"), Word("PASSWORD"), Word("FOR"), Lit(user), Sym('@'), Lit(_), Sym('='), Lit(password)] =>
            {
                match self.accounts.iter_mut().find(|a| &a.name == user) {
                    Some(account) => {
                        account.password = password.clone();
                        Ok(())
                    }
                    None => Err(BackendError::server(
                        codes::ER_PASSWORD_NO_MATCH,
                        "42000",
                        "Can't find any matching row in the user table",
                    )),
                }
            }
            [Word("DROP"), Word("USER"), Lit(user), Sym('@'), Lit(_)] => {
                if self.account(user).is_none() {
                    return Err(cannot_user("DROP USER", user));
                }
                self.accounts.retain(|a| &a.name != user);
                self.grants.retain(|(_, u), _| u != user);
                Ok(())
            }
            [Word(verb @ ("GRANT" | "REVOKE")), privileges @ .., Word("ON"), Ident(db), Sym('.'), Sym('*'), Word(dir @ ("TO" | "FROM")), Lit(user), Sym('@'), Lit(_)] =>
            {
                let granting = *verb == "GRANT";
                if granting != (*dir == "TO") {
                    return Err(syntax_error());
                }
                let kinds = parse_privileges(privileges)?;
                if granting {
                    self.grant(db, user, kinds)
                } else {
                    self.revoke(db, user, kinds)
                }
            }
            _ => Err(syntax_error()),
        }
    }

    fn grant(&mut self, db: &str, user: &str, kinds: Vec<GrantKind>) -> BackendResult<()> {
        if self.account(user).is_none() {
            return Err(BackendError::server(
                ER_CANT_CREATE_USER_WITH_GRANT,
                "42000",
                "You are not allowed to create a user with GRANT",
            ));
        }
        self.grants
            .entry((db.to_string(), user.to_string()))
            .or_default()
            .extend(kinds);
        Ok(())
    }

    fn revoke(&mut self, db: &str, user: &str, kinds: Vec<GrantKind>) -> BackendResult<()> {
        let key = (db.to_string(), user.to_string());
        let held = self.grants.get_mut(&key).filter(|held| !held.is_empty());
        let Some(held) = held else {
            return Err(BackendError::server(
                codes::ER_NONEXISTING_GRANT,
                "42000",
                format!("There is no such grant defined for user '{}' on host '%'", user),
            ));
        };
        for kind in kinds {
            held.remove(&kind);
        }
        if held.is_empty() {
            self.grants.remove(&key);
        }
        Ok(())
    }

    fn answer(&self, sql: &str, params: &[Datum]) -> BackendResult<Vec<Row>> {
        let param = |i: usize| -> BackendResult<String> {
            params
                .get(i)
                .and_then(Datum::as_str)
                .map(String::from)
                .ok_or_else(|| BackendError::other(format!("missing parameter {}", i)))
        };

        match sql {
            statements::LIST_DATABASES => Ok(self
                .databases
                .iter()
                .map(|d| Row::new(vec![Datum::from(d.as_str())]))
                .collect()),
            statements::DATABASE_EXISTS => {
                let db = param(0)?;
                let count = self.databases.iter().filter(|d| **d == db).count();
                Ok(vec![Row::new(vec![Datum::Int(count as i64)])])
            }
            statements::DATABASE_SIZE => {
                let db = param(0)?;
                let size = match self.tables.get(&db) {
                    Some(tables) if !tables.is_empty() => {
                        let bytes: u64 = tables.iter().map(|(_, b)| b).sum();
                        Datum::String(format!("{}", bytes))
                    }
                    _ => Datum::Null,
                };
                Ok(vec![Row::new(vec![size])])
            }
            statements::LIST_TABLES => {
                let db = param(0)?;
                Ok(self
                    .tables
                    .get(&db)
                    .map(|tables| {
                        tables
                            .iter()
                            .map(|(t, _)| Row::new(vec![Datum::from(t.as_str())]))
                            .collect()
                    })
                    .unwrap_or_default())
            }
            statements::LIST_USERS => Ok(self
                .accounts
                .iter()
                .map(|a| Row::new(vec![Datum::from(a.name.as_str())]))
                .collect()),
            statements::USER_EXISTS => {
                let user = param(0)?;
                let exists = self.account(&user).is_some();
                Ok(vec![Row::new(vec![Datum::Int(i64::from(exists))])])
            }
            statements::GET_CONNECTION_LIMIT => {
                let user = param(0)?;
                Ok(self
                    .account(&user)
                    .map(|a| vec![Row::new(vec![Datum::UInt(u64::from(a.max_connections))])])
                    .unwrap_or_default())
            }
            _ => self.answer_grant_lookup(sql, params),
        }
    }

    fn answer_grant_lookup(&self, sql: &str, params: &[Datum]) -> BackendResult<Vec<Row>> {
        let kind = GrantKind::ALL
            .into_iter()
            .find(|k| sql == statements::grant_exists(*k))
            .ok_or_else(syntax_error)?;

        let (Some(db), Some(user)) = (
            params.first().and_then(Datum::as_str),
            params.get(1).and_then(Datum::as_str),
        ) else {
            return Err(BackendError::other("missing parameters"));
        };

        Ok(self
            .grants
            .get(&(db.to_string(), user.to_string()))
            .map(|held| {
                let flag = if held.contains(&kind) { "Y" } else { "N" };
                vec![Row::new(vec![Datum::from(flag)])]
            })
            .unwrap_or_default())
    }

    fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }
}

fn parse_privileges(words: &[Token<'_>]) -> BackendResult<Vec<GrantKind>> {
    let mut text = Vec::new();
    for token in words {
        match token {
            Token::Word(w) => text.push(*w),
            _ => return Err(syntax_error()),
        }
    }
    let text = text.join(" ");
    if text == "ALL PRIVILEGES" {
        return Ok(GrantKind::ALL.to_vec());
    }
    GrantKind::ALL
        .into_iter()
        .find(|k| k.as_str() == text)
        .map(|k| vec![k])
        .ok_or_else(syntax_error)
}

fn parse_number(word: &str) -> BackendResult<u32> {
    word.parse().map_err(|_| syntax_error())
}

fn cannot_user(op: &str, user: &str) -> BackendError {
    BackendError::server(
        codes::ER_CANNOT_USER,
        "HY000",
        format!("Operation {} failed for '{}'@'%'", op, user),
    )
}

fn syntax_error() -> BackendError {
    BackendError::server(
        1064,
        "42000",
        "You have an error in your SQL syntax",
    )
}

/// Lexical token of an administrative statement
#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    /// Keyword or number
    Word(&'a str),
    /// Backtick-quoted identifier, unescaped
    Ident(String),
    /// Single-quoted literal, unescaped
    Lit(String),
    Sym(char),
}

fn tokenize(sql: &str) -> BackendResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '`' | '\'' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => return Err(syntax_error()),
                        Some((_, ch)) if ch == c => {
                            // Doubled quote is an escaped quote
                            if chars.peek().map(|&(_, n)| n) == Some(c) {
                                chars.next();
                                value.push(c);
                            } else {
                                break;
                            }
                        }
                        Some((_, '\\')) if c == '\'' => match chars.next() {
                            Some((_, '0')) => value.push('\0'),
                            Some((_, escaped)) => value.push(escaped),
                            None => return Err(syntax_error()),
                        },
                        Some((_, ch)) => value.push(ch),
                    }
                }
                tokens.push(if c == '`' {
                    Token::Ident(value)
                } else {
                    Token::Lit(value)
                });
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut end = start;
                while let Some(&(i, ch)) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        end = i + ch.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(&sql[start..end]));
            }
            c => {
                chars.next();
                tokens.push(Token::Sym(c));
            }
        }
    }

    Ok(tokens)
}
