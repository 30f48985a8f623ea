use crate::error::Result;
use crate::models::{DeleteMode, FilterOptions, IncludeExcludeLists, OutputFormat, ScanOptions};
use crate::utils::validation;
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "k8s-finalizer-scanner")]
#[command(
    author,
    version,
    about = "Find and clean up Kubernetes objects stuck in deletion by finalizers"
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Scan flags accepted without a subcommand
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true, env = "KFS_VERBOSE")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the cluster once and print a report (default)
    Scan(ScanArgs),

    /// Serve scans over HTTP
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "0.0.0.0:3000", env = "KFS_BIND")]
        bind: String,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ScanArgs {
    /// Namespaces to scan, comma separated
    #[arg(long, value_delimiter = ',', env = "KFS_INCLUDE_NAMESPACES")]
    pub include_namespaces: Vec<String>,

    /// Namespaces to skip, comma separated
    #[arg(long, value_delimiter = ',', env = "KFS_EXCLUDE_NAMESPACES")]
    pub exclude_namespaces: Vec<String>,

    /// Label selectors (key=value, key!=value or key) that exclude an object
    #[arg(long, value_delimiter = ',', env = "KFS_EXCLUDE_LABELS")]
    pub exclude_labels: Vec<String>,

    /// Only report objects at least this old (e.g. 1h, 7d)
    #[arg(long, env = "KFS_OLDER_THAN")]
    pub older_than: Option<String>,

    /// Only report objects at most this old (e.g. 1h, 7d)
    #[arg(long, env = "KFS_NEWER_THAN")]
    pub newer_than: Option<String>,

    /// Delete the objects that were found
    #[arg(long, env = "KFS_DELETE")]
    pub delete: bool,

    /// Delete without asking for confirmation
    #[arg(long, env = "KFS_NO_INTERACTIVE")]
    pub no_interactive: bool,

    /// Clear the finalizer list instead of force-deleting
    #[arg(long, env = "KFS_CLEAR_FINALIZERS")]
    pub clear_finalizers: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", env = "KFS_OUTPUT")]
    pub output: OutputFormat,
}

impl ScanArgs {
    pub fn namespace_lists(&self) -> IncludeExcludeLists {
        let clean = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        };
        IncludeExcludeLists {
            include_list: clean(&self.include_namespaces),
            exclude_list: clean(&self.exclude_namespaces),
        }
    }

    pub fn filter_options(&self) -> Result<FilterOptions> {
        Ok(FilterOptions {
            exclude_labels: self.exclude_labels.clone(),
            older_than: self.older_than.as_deref().map(validation::parse_age).transpose()?,
            newer_than: self.newer_than.as_deref().map(validation::parse_age).transpose()?,
        })
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            delete: self.delete,
            no_interactive: self.no_interactive,
            delete_mode: if self.clear_finalizers {
                DeleteMode::ClearFinalizers
            } else {
                DeleteMode::Force
            },
            output: self.output,
        }
    }
}
