use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use pit::areas::repository::Repository;
use pit::artifacts::checkout::ResetMode;
use pit::commands::plumbing::cat_file::CatFileOutput;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "PIT_LOG";

#[derive(Parser)]
#[command(
    name = "pit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal git-compatible version control tool",
    long_about = "Pit stores content-addressed objects, a staging index and refs in a \
    .git directory laid out the way git lays it out, and offers the handful of \
    commands needed to stage, commit, inspect and move between snapshots.",
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
        long_about = "This command initializes a new repository in the current directory or at the specified path. \
        Running it again on an existing repository is safe."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the type or content of an object",
        group(ArgGroup::new("output").required(true).args(["kind", "pretty"]))
    )]
    CatFile {
        #[arg(short = 't', help = "Print the object type")]
        kind: bool,
        #[arg(short = 'p', help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(index = 1, help = "The object to inspect")]
        object: String,
    },
    #[command(name = "add", about = "Stage files and directories")]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "Paths to stage")]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Remove a file from the index and working directory")]
    Rm {
        #[arg(index = 1)]
        path: String,
    },
    #[command(name = "write-tree", about = "Write the index as a tree object")]
    WriteTree,
    #[command(name = "commit-tree", about = "Create a commit object from a tree")]
    CommitTree {
        #[arg(index = 1, help = "The tree to commit")]
        tree: String,
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(short, long, help = "The parent commit")]
        parent: Option<String>,
    },
    #[command(
        name = "commit",
        about = "Record the index as a new commit on the current branch"
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command compares HEAD, the index and the working directory and reports \
        staged, unstaged and untracked files."
    )]
    Status {
        #[arg(short, long, help = "Give the output in the short format")]
        short: bool,
    },
    #[command(
        name = "reset",
        about = "Move HEAD to a commit, optionally reloading index and workspace",
        group(ArgGroup::new("mode").args(["soft", "mixed", "hard"]))
    )]
    Reset {
        #[arg(long, help = "Only move HEAD")]
        soft: bool,
        #[arg(long, help = "Move HEAD and reset the index (default)")]
        mixed: bool,
        #[arg(long, help = "Move HEAD and reset the index and working directory")]
        hard: bool,
        #[arg(index = 1, default_value = "HEAD")]
        revision: String,
    },
    #[command(name = "checkout", about = "Switch to a branch or commit")]
    Checkout {
        #[arg(short = 'b', help = "Create a new branch and switch to it")]
        new_branch: Option<String>,
        #[arg(index = 1, help = "Branch or commit to switch to, or start point with -b")]
        target: Option<String>,
    },
    #[command(name = "branch", about = "List branches or create a new one")]
    Branch {
        #[arg(index = 1, help = "The branch to create")]
        name: Option<String>,
        #[arg(index = 2, help = "The commit the branch starts at")]
        start_point: Option<String>,
    },
    #[command(name = "log", about = "Show the commit history of HEAD")]
    Log,
    #[command(name = "rev-parse", about = "Resolve a revision to an object id")]
    RevParse {
        #[arg(index = 1)]
        revision: String,
    },
    #[command(name = "show-ref", about = "List refs with the objects they point at")]
    ShowRef,
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short = 'r', help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1)]
        tree_ish: String,
    },
    #[command(name = "ls-files", about = "List the paths in the index")]
    LsFiles,
}

fn open_repository(path: Option<&str>) -> Result<Repository> {
    match path {
        Some(path) => Repository::new(path, Box::new(std::io::stdout())),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
        }
    }
}

fn install_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    install_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => open_repository(path.as_deref())?.init()?,
        Commands::HashObject { write, file } => open_repository(None)?.hash_object(file, *write)?,
        Commands::CatFile {
            kind,
            pretty,
            object,
        } => {
            let output = match (*kind, *pretty) {
                (true, _) => CatFileOutput::Type,
                (false, _) => CatFileOutput::Pretty,
            };
            open_repository(None)?.cat_file(object, output)?
        }
        Commands::Add { paths } => open_repository(None)?.add(paths)?,
        Commands::Rm { path } => open_repository(None)?.rm(path)?,
        Commands::WriteTree => open_repository(None)?.write_tree()?,
        Commands::CommitTree {
            tree,
            message,
            parent,
        } => open_repository(None)?.commit_tree(tree, message, parent.as_deref())?,
        Commands::Commit { message } => open_repository(None)?.commit(message)?,
        Commands::Status { short } => open_repository(None)?.status(*short)?,
        Commands::Reset {
            soft,
            mixed,
            hard,
            revision,
        } => {
            let mode = match (*soft, *mixed, *hard) {
                (true, _, _) => ResetMode::Soft,
                (_, _, true) => ResetMode::Hard,
                _ => ResetMode::Mixed,
            };
            open_repository(None)?.reset(revision, mode)?
        }
        Commands::Checkout { new_branch, target } => {
            let repository = open_repository(None)?;
            match (new_branch, target) {
                (Some(name), start_point) => {
                    repository.checkout_new_branch(name, start_point.as_deref())?
                }
                (None, Some(target)) => repository.checkout(target)?,
                (None, None) => anyhow::bail!("checkout needs a branch or commit"),
            }
        }
        Commands::Branch { name, start_point } => {
            let repository = open_repository(None)?;
            match name {
                Some(name) => repository.branch(name, start_point.as_deref())?,
                None => repository.list_branches()?,
            }
        }
        Commands::Log => open_repository(None)?.log()?,
        Commands::RevParse { revision } => open_repository(None)?.rev_parse(revision)?,
        Commands::ShowRef => open_repository(None)?.show_ref()?,
        Commands::LsTree {
            recursive,
            tree_ish,
        } => open_repository(None)?.ls_tree(tree_ish, *recursive)?,
        Commands::LsFiles => open_repository(None)?.ls_files()?,
    }

    Ok(())
}
