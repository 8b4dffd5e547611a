use std::collections::VecDeque;

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use sqlx::postgres::PgPoolOptions;

use adnet_gateway::auth::OwnershipResolver;
use adnet_gateway::domain::Role;
use adnet_gateway::infra::PgOwnerDirectory;
use adnet_gateway::server::gate_from_env;
use adnet_gateway::{migrations, Subject};

fn print_help() {
    eprintln!(
        "\
adnet-gateway-admin

USAGE:
  adnet-gateway-admin <command> [options]

COMMANDS:
  migrate          Run database migrations
  issue-token      Issue a session token for a subject
  check-access     Authorize a token against a resource and method
  hash-password    Produce an argon2 hash for a password

COMMON OPTIONS:
  --database-url <postgres_url>   (defaults to env DATABASE_URL)

issue-token OPTIONS:
  --id <n>                        (required) User id
  --username <name>               (required) Login name
  --role <admin|publisher|advertiser>  (required)
  Reads JWT_SECRET (required), JWT_ISSUER, TOKEN_TTL_SECS from the env.

check-access OPTIONS:
  --token <token>                 (required) Session token
  --resource <name>               (required) Resource name, e.g. campaign
  --method <verb>                 (default: GET)
  --resource-id <n>               (optional) Enables the ownership check
  Reads JWT_SECRET, AUTH_DEFAULT, POLICY_FILE from the env; the ownership
  check connects to the database.

hash-password OPTIONS:
  --password <plaintext>          (required)
"
    );
}

/// Pull `--name value` pairs out of the argument list.
fn take_flag(args: &mut VecDeque<String>, name: &str) -> Option<String> {
    let position = args.iter().position(|a| a == name)?;
    args.remove(position)?;
    args.remove(position)
}

fn require_flag(args: &mut VecDeque<String>, name: &str) -> anyhow::Result<String> {
    take_flag(args, name).ok_or_else(|| anyhow::anyhow!("missing required option {name}"))
}

fn database_url(args: &mut VecDeque<String>) -> anyhow::Result<String> {
    take_flag(args, "--database-url")
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| anyhow::anyhow!("set --database-url or DATABASE_URL"))
}

async fn migrate(mut args: VecDeque<String>) -> anyhow::Result<()> {
    let url = database_url(&mut args)?;
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;
    migrations::run_postgres(&pool).await?;
    println!("migrations applied");
    Ok(())
}

fn issue_token(mut args: VecDeque<String>) -> anyhow::Result<()> {
    let id: i64 = require_flag(&mut args, "--id")?.parse()?;
    let username = require_flag(&mut args, "--username")?;
    let role = require_flag(&mut args, "--role")?;
    let role = Role::parse(&role).ok_or_else(|| anyhow::anyhow!("unknown role {role:?}"))?;

    let gate = gate_from_env()?;
    let token = gate.tokens().issue(Subject::new(id, username, role))?;
    println!("{token}");
    Ok(())
}

async fn check_access(mut args: VecDeque<String>) -> anyhow::Result<()> {
    let token = require_flag(&mut args, "--token")?;
    let resource = require_flag(&mut args, "--resource")?;
    let method = take_flag(&mut args, "--method").unwrap_or_else(|| "GET".to_string());
    let resource_id: Option<i64> = take_flag(&mut args, "--resource-id")
        .map(|v| v.parse())
        .transpose()?;

    let gate = gate_from_env()?;
    let header = format!("Bearer {token}");
    let decision = match gate.authorize(&resource, &method, Some(&header)) {
        Ok(decision) => decision,
        Err(denied) => {
            println!("denied: {denied}");
            return Ok(());
        }
    };

    let Some(subject) = decision.subject() else {
        println!("allowed: endpoint is unprotected");
        return Ok(());
    };

    if let Some(id) = resource_id {
        let url = database_url(&mut args)?;
        let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;
        let resolver = OwnershipResolver::new(std::sync::Arc::new(PgOwnerDirectory::new(pool)));
        if !resolver.can_access_named(subject, &resource, id).await? {
            println!("denied: {} does not own {resource}/{id}", subject.username);
            return Ok(());
        }
    }

    println!(
        "allowed: {} ({}) on {resource} {method}",
        subject.username, subject.role
    );
    Ok(())
}

fn hash_password(mut args: VecDeque<String>) -> anyhow::Result<()> {
    let password = require_flag(&mut args, "--password")?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;
    println!("{hash}");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args: VecDeque<String> = std::env::args().skip(1).collect();
    let Some(command) = args.pop_front() else {
        print_help();
        std::process::exit(2);
    };

    match command.as_str() {
        "migrate" => migrate(args).await,
        "issue-token" => issue_token(args),
        "check-access" => check_access(args).await,
        "hash-password" => hash_password(args),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("unknown command: {other}\n");
            print_help();
            std::process::exit(2);
        }
    }
}
