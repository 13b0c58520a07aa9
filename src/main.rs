//!
//! rolegate binary
//! ---------------
//! One-shot command-line adapter over the library: opens the store once,
//! runs a single operation, prints the result and exits with a code derived
//! from the error kind.

use std::env;
use std::io::{self, Read, Write};

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use rolegate::{AccessPolicy, Cms, CmsConfig, CmsError, Principal};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} register <user> <password> <admin|editor|viewer>\n  {program} login <user> <password>\n  {program} --user <u> --password <p> list\n  {program} --user <u> --password <p> view <file>\n  {program} --user <u> --password <p> create <file>    # content from stdin\n  {program} --user <u> --password <p> edit <file>      # content from stdin\n  {program} --user <u> --password <p> delete <file>\n\nEnvironment:\n  ROLEGATE_ROOT            store directory (default: current directory)\n  ROLEGATE_CONFIG          optional JSON config file\n  ROLEGATE_AUDIT_LOG       audit log file name under the root (default: log.txt)\n  ROLEGATE_AUDIT_ENABLED   attach the file audit logger (default: true)\n  RUST_LOG                 log filter (default: info)"
    );
}

struct Invocation {
    user: Option<String>,
    password: Option<String>,
    command: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut inv = Invocation { user: None, password: None, command: Vec::new() };
    let mut it = args.iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--user" | "-u" => inv.user = Some(it.next().ok_or_else(|| anyhow!("--user needs a value"))?.clone()),
            "--password" | "-p" => inv.password = Some(it.next().ok_or_else(|| anyhow!("--password needs a value"))?.clone()),
            _ => inv.command.push(a.clone()),
        }
    }
    Ok(inv)
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf).context("reading content from stdin")?;
    Ok(buf)
}

fn require_login(cms: &Cms, inv: &Invocation) -> Result<Principal, CmsError> {
    match (&inv.user, &inv.password) {
        (Some(u), Some(p)) => cms.login(u, p),
        _ => Err(CmsError::InvalidCredentials),
    }
}

/// Run one command. Outer `Err` is a usage/IO problem of the adapter itself;
/// inner `Err` is a structured result from the core.
fn run(cms: &Cms, inv: &Invocation) -> Result<Result<(), CmsError>> {
    let mut out = io::stdout().lock();
    let cmd: Vec<&str> = inv.command.iter().map(String::as_str).collect();
    let res = match cmd.as_slice() {
        ["register", user, password, role] => cms.register(user, password, role).map(|()| {
            let _ = writeln!(out, "Registration successful!");
        }),
        ["login", user, password] => cms.login(user, password).map(|p| {
            let _ = writeln!(out, "Login successful! Welcome, {}!", p.username);
            let caps: Vec<&str> = AccessPolicy::capabilities(p.role).iter().map(|op| op.as_str()).collect();
            let _ = writeln!(out, "role: {} ({})", p.role, caps.join(", "));
        }),
        ["list"] => require_login(cms, inv).and_then(|p| cms.list_files(&p)).map(|files| {
            if files.is_empty() {
                let _ = writeln!(out, "No files available.");
            }
            for f in files {
                let _ = writeln!(out, "{}", f);
            }
        }),
        ["view", file] => require_login(cms, inv).and_then(|p| cms.view_content(&p, file)).map(|bytes| {
            let _ = out.write_all(&bytes);
        }),
        ["create", file] => {
            let content = read_stdin()?;
            require_login(cms, inv).and_then(|p| cms.create_file(&p, file, &content)).map(|()| {
                let _ = writeln!(out, "File created successfully!");
            })
        }
        ["edit", file] => {
            let content = read_stdin()?;
            require_login(cms, inv).and_then(|p| cms.edit_file(&p, file, &content)).map(|()| {
                let _ = writeln!(out, "File edited successfully!");
            })
        }
        ["delete", file] => require_login(cms, inv).and_then(|p| cms.delete_file(&p, file)).map(|()| {
            let _ = writeln!(out, "File deleted successfully!");
        }),
        _ => return Err(anyhow!("unrecognized command: {:?}", inv.command)),
    };
    Ok(res)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("building log filter")?;
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "rolegate".to_string());
    if args.len() < 2 || args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage(&program);
        std::process::exit(if args.len() < 2 { 64 } else { 0 });
    }

    let cfg = CmsConfig::load()?;
    info!(target: "rolegate", "rolegate starting: root='{}'", cfg.root.display());
    let cms = Cms::open(&cfg)?;

    let inv = match parse_args(&args[1..]) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("{}", e);
            print_usage(&program);
            std::process::exit(64);
        }
    };
    match run(&cms, &inv) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            eprintln!("{:#}", e);
            print_usage(&program);
            std::process::exit(64);
        }
    }
}
