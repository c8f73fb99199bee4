use anyhow::Result;
use clap::{Parser, Subcommand};
use kit::areas::repository::Repository;
use kit::commands::porcelain::push::PushOutcome;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A minimal version control engine",
    long_about = "A minimal version control engine keeping snapshots in a \
    content-addressed object store and pushing them to a remote over HTTP. \
    It is not meant to be a full replacement for git, but a compact core \
    exposing init, add, commit, status, and push.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository at the specified path, \
        creating the object store, the heads directory, and a HEAD file pointing at master."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        repo: String,
    },
    #[command(
        name = "add",
        about = "Add files to the staging area",
        long_about = "This command stores the given files as blobs and records them in \
        the index, replacing any previously staged version of the same path."
    )]
    Add {
        #[arg(index = 1, required = true, help = "List of files to add")]
        files: Vec<String>,
        #[arg(long, help = "The path to the repository")]
        repo: Option<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command snapshots the index as a tree and records a commit \
        pointing at it, advancing the master branch. The author is taken from the \
        --author option or from the KIT_AUTHOR_NAME and KIT_AUTHOR_EMAIL environment \
        variables."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "The author of the commit, as \"Name <email>\"")]
        author: Option<String>,
        #[arg(long, help = "The path to the repository")]
        repo: Option<String>,
    },
    #[command(
        name = "status",
        about = "Show the staged files",
        long_about = "This command lists the index entries as octal mode, object id, \
        and path, in staging order."
    )]
    Status {
        #[arg(long, help = "The path to the repository")]
        repo: Option<String>,
    },
    #[command(
        name = "push",
        about = "Push the master branch to a remote repository",
        long_about = "This command sends every object reachable from the local master \
        tip but missing on the remote, then asks the remote to advance its master ref. \
        The remote must speak the smart HTTP receive-pack protocol."
    )]
    Push {
        #[arg(index = 1, help = "The remote repository URL")]
        url: String,
        #[arg(long, help = "Username for authentication")]
        username: String,
        #[arg(long, help = "Password for authentication")]
        password: String,
        #[arg(long, help = "The path to the repository")]
        repo: Option<String>,
    },
}

fn repository_at(path: Option<&String>) -> Result<Repository> {
    match path {
        Some(path) => Repository::new(path, Box::new(std::io::stdout())),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { repo } => {
            let mut repository = Repository::new(repo, Box::new(std::io::stdout()))?;

            repository.init().await?
        }
        Commands::Add { files, repo } => {
            let mut repository = repository_at(repo.as_ref())?;

            repository.add(files).await?
        }
        Commands::Commit {
            message,
            author,
            repo,
        } => {
            let mut repository = repository_at(repo.as_ref())?;

            repository.commit(message.as_str(), author.as_deref()).await?
        }
        Commands::Status { repo } => {
            let mut repository = repository_at(repo.as_ref())?;

            repository.status().await?
        }
        Commands::Push {
            url,
            username,
            password,
            repo,
        } => {
            let mut repository = repository_at(repo.as_ref())?;

            let outcome = repository.push(url, username, password).await?;
            if let PushOutcome::Rejected { .. } = outcome {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
