//! sqladm command-line front end
//!
//! Usage: sqladm --url mysql://root:pw@127.0.0.1:3306/ <db|user|grant> <action> [args]
//!
//! Exit codes:
//!   0 - Success
//!   1 - Operation failed
//!   2 - Configuration error

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sqladm::admin::privileges::all_kinds;
use sqladm::{AdminConfig, AdminController, AdminResult};

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage databases, users and grants on a MySQL server")]
struct Cli {
    /// Server URL
    #[arg(long, env = "SQLADM_URL")]
    url: Option<String>,

    /// Extra usernames to protect from create/delete
    #[arg(long = "reserved-user", env = "SQLADM_RESERVED_USERS", value_delimiter = ',')]
    reserved_users: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Database lifecycle
    #[command(subcommand)]
    Db(DbCommand),
    /// User lifecycle
    #[command(subcommand)]
    User(UserCommand),
    /// Privilege grants
    #[command(subcommand)]
    Grant(GrantCommand),
}

#[derive(Subcommand)]
enum DbCommand {
    Create { name: String },
    Delete { name: String },
    Exists { name: String },
    List,
    /// Data + index size in bytes
    Size { name: String },
    Tables { name: String },
}

#[derive(Subcommand)]
enum UserCommand {
    Create {
        username: String,
        password: String,
        /// Maximum simultaneous connections (0 = unlimited)
        #[arg(long)]
        max_connections: Option<u32>,
    },
    Passwd { username: String, password: String },
    Delete { username: String },
    Exists { username: String },
    List,
    GetLimit { username: String },
    SetLimit { username: String, limit: u32 },
}

#[derive(Subcommand)]
enum GrantCommand {
    /// Grant all privileges on a database
    All { database: String, username: String },
    /// Revoke all privileges on a database
    RevokeAll { database: String, username: String },
    /// Grant one privilege, e.g. SELECT or "CREATE VIEW"
    Add {
        privilege: String,
        database: String,
        username: String,
    },
    /// Revoke one privilege
    Remove {
        privilege: String,
        database: String,
        username: String,
    },
    /// Check whether a privilege is held
    Check {
        privilege: String,
        database: String,
        username: String,
    },
    /// List the privileges that can be granted
    Kinds,
}

/// Command result
#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Done,
    Flag(bool),
    Number(u64),
    Names(Vec<String>),
}

impl Output {
    fn print(&self, json: bool) {
        if json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("ERROR: {}", e),
            }
            return;
        }
        match self {
            Output::Done => {}
            Output::Flag(b) => println!("{}", b),
            Output::Number(n) => println!("{}", n),
            Output::Names(names) => names.iter().for_each(|n| println!("{}", n)),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::Grant(GrantCommand::Kinds) = cli.command {
        Output::Names(all_kinds().map(String::from).collect()).print(cli.json);
        return ExitCode::SUCCESS;
    }

    let Some(url) = cli.url else {
        eprintln!("ERROR: no server URL; pass --url or set SQLADM_URL");
        return ExitCode::from(2);
    };
    let config = AdminConfig::new(url).with_reserved_users(cli.reserved_users);

    let controller = match AdminController::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::from(2);
        }
    };

    let result = run(&controller, cli.command).await;

    if let Err(e) = controller.close().await {
        tracing::warn!(error = %e, "failed to close connection cleanly");
    }

    match result {
        Ok(output) => {
            output.print(cli.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(c: &AdminController, command: Command) -> AdminResult<Output> {
    let output = match command {
        Command::Db(cmd) => match cmd {
            DbCommand::Create { name } => {
                c.create_database(&name).await?;
                Output::Done
            }
            DbCommand::Delete { name } => {
                c.delete_database(&name).await?;
                Output::Done
            }
            DbCommand::Exists { name } => Output::Flag(c.database_exists(&name).await?),
            DbCommand::List => Output::Names(c.list_databases().await?),
            DbCommand::Size { name } => Output::Number(c.database_size(&name).await?),
            DbCommand::Tables { name } => Output::Names(c.database_tables(&name).await?),
        },
        Command::User(cmd) => match cmd {
            UserCommand::Create {
                username,
                password,
                max_connections: Some(limit),
            } => {
                c.create_user_with_connection_limit(&username, &password, limit)
                    .await?;
                Output::Done
            }
            UserCommand::Create {
                username, password, ..
            } => {
                c.create_user(&username, &password).await?;
                Output::Done
            }
            UserCommand::Passwd { username, password } => {
                c.update_user_password(&username, &password).await?;
                Output::Done
            }
            UserCommand::Delete { username } => {
                c.delete_user(&username).await?;
                Output::Done
            }
            UserCommand::Exists { username } => Output::Flag(c.user_exists(&username).await?),
            UserCommand::List => Output::Names(c.list_users().await?),
            UserCommand::GetLimit { username } => {
                Output::Number(u64::from(c.get_connection_limit(&username).await?))
            }
            UserCommand::SetLimit { username, limit } => {
                c.set_connection_limit(&username, limit).await?;
                Output::Done
            }
        },
        Command::Grant(cmd) => match cmd {
            GrantCommand::All { database, username } => {
                c.grant_all(&database, &username).await?;
                Output::Done
            }
            GrantCommand::RevokeAll { database, username } => {
                c.revoke_all(&database, &username).await?;
                Output::Done
            }
            GrantCommand::Add {
                privilege,
                database,
                username,
            } => {
                c.grant(&privilege, &database, &username).await?;
                Output::Done
            }
            GrantCommand::Remove {
                privilege,
                database,
                username,
            } => {
                c.revoke(&privilege, &database, &username).await?;
                Output::Done
            }
            GrantCommand::Check {
                privilege,
                database,
                username,
            } => Output::Flag(c.grant_exists(&privilege, &database, &username).await?),
            GrantCommand::Kinds => Output::Names(all_kinds().map(String::from).collect()),
        },
    };
    Ok(output)
}
