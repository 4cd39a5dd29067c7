//! CLI for the ghclient release helpers.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use ghclient::github::DEFAULT_API_URL;
use ghclient::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ghclient")]
#[command(author, version, about = "GitHub helpers for release automation", long_about = None)]
struct Cli {
    #[command(flatten)]
    conn: Connection,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Connection {
    /// Repository owner (user or organization)
    #[arg(long, env = "GITHUB_OWNER", global = true)]
    owner: Option<String>,

    /// Repository name
    #[arg(long, env = "GITHUB_REPO", global = true)]
    repo: Option<String>,

    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// API base URL (GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List merged pull requests by milestone or labels
    MergedPrs {
        /// Milestone title
        #[arg(short, long, conflicts_with = "label")]
        milestone: Option<String>,

        /// Required label (repeatable)
        #[arg(short, long)]
        label: Vec<String>,

        /// Print JSON instead of one line per PR
        #[arg(long)]
        json: bool,
    },

    /// Print the merge commit of a pull request
    CommitId {
        /// Pull request number
        number: u64,
    },

    /// List members of an organization
    OrgMembers {
        /// Organization login
        org: String,
    },

    /// Create a branch from the default branch head (no-op if it exists)
    Branch {
        /// Branch name
        name: String,
    },

    /// Open a pull request
    Pr {
        /// Owner of the head branch (defaults to the authenticated user)
        #[arg(long)]
        head_user: Option<String>,

        /// Head branch
        #[arg(long)]
        head: String,

        /// Base branch (defaults to the repository default branch)
        #[arg(long)]
        base: Option<String>,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        body: String,
    },

    /// Create a draft release
    Release {
        /// Tag to create the release at
        #[arg(long)]
        tag: String,

        /// Branch or commit the tag points at
        #[arg(long)]
        target: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, default_value = "")]
        body: String,
    },

    /// Print the login of the authenticated account
    Whoami,

    /// Print the primary email of the authenticated account
    Email,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::MergedPrs {
            milestone,
            label,
            json,
        } => cmd_merged_prs(&cli.conn, milestone, label, json),
        Commands::CommitId { number } => cmd_commit_id(&cli.conn, number),
        Commands::OrgMembers { org } => cmd_org_members(&cli.conn, &org),
        Commands::Branch { name } => {
            repo_client(&cli.conn)?
                .new_branch_from_head(&name)
                .with_context(|| format!("Failed to create branch {}", name))?;
            println!("{}", name);
            Ok(())
        }
        Commands::Pr {
            head_user,
            head,
            base,
            title,
            body,
        } => cmd_pr(&cli.conn, head_user, head, base, title, body),
        Commands::Release {
            tag,
            target,
            title,
            body,
        } => {
            let url = repo_client(&cli.conn)?
                .new_draft_release(&tag, &target, &title, &body)
                .context("Failed to create draft release")?;
            println!("{}", url);
            Ok(())
        }
        Commands::Whoami => {
            println!("{}", transport(&cli.conn)?.login()?);
            Ok(())
        }
        Commands::Email => {
            println!("{}", transport(&cli.conn)?.primary_email()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn transport(conn: &Connection) -> Result<GitHubClient> {
    let token = conn
        .token
        .as_deref()
        .context("No token: pass --token or set GITHUB_TOKEN")?;
    Ok(GitHubClient::with_base_url(token, &conn.api_url)?)
}

fn repo_client(conn: &Connection) -> Result<RepoClient> {
    let (Some(owner), Some(repo)) = (&conn.owner, &conn.repo) else {
        bail!("--owner and --repo (or GITHUB_OWNER and GITHUB_REPO) are required");
    };
    Ok(RepoClient::new(transport(conn)?, owner, repo)?)
}

fn cmd_merged_prs(
    conn: &Connection,
    milestone: Option<String>,
    labels: Vec<String>,
    json: bool,
) -> Result<()> {
    let client = repo_client(conn)?;
    let prs = match milestone {
        Some(ref m) => client
            .merged_prs_for_milestone(m)
            .with_context(|| format!("Failed to list merged PRs for milestone {}", m))?,
        None if !labels.is_empty() => client
            .merged_prs_for_labels(labels.as_slice())
            .context("Failed to list merged PRs for labels")?,
        None => bail!("pass --milestone or at least one --label"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&prs)?);
    } else {
        for pr in &prs {
            let author = pr.user.as_ref().map(|u| u.login.as_str()).unwrap_or("-");
            println!("#{}\t{}\t@{}\t{}", pr.number, pr.title, author, pr.html_url);
        }
    }
    Ok(())
}

fn cmd_commit_id(conn: &Connection, number: u64) -> Result<()> {
    let client = repo_client(conn)?;
    let issue = client
        .issue(number)
        .with_context(|| format!("Failed to fetch #{}", number))?;
    match client.commit_id_for_merged_pr(&issue)? {
        Some(sha) => {
            println!("{}", sha);
            Ok(())
        }
        None => bail!("#{} is not a merged pull request", number),
    }
}

fn cmd_org_members(conn: &Connection, org: &str) -> Result<()> {
    let mut members: Vec<String> = transport(conn)?
        .org_members(org)
        .with_context(|| format!("Failed to list members of {}", org))?
        .into_iter()
        .collect();
    members.sort();
    for login in members {
        println!("{}", login);
    }
    Ok(())
}

fn cmd_pr(
    conn: &Connection,
    head_user: Option<String>,
    head: String,
    base: Option<String>,
    title: String,
    body: String,
) -> Result<()> {
    let client = repo_client(conn)?;
    let head_user = match head_user {
        Some(user) => user,
        None => client.login().context("Failed to look up authenticated user")?,
    };
    let base = match base {
        Some(base) => base,
        None => client.default_branch()?,
    };

    let url = client
        .new_pull_request(&head_user, &head, &base, &title, &body)
        .context("Failed to create pull request")?;
    println!("{}", url);
    Ok(())
}
