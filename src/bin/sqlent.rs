//! sqlent CLI: compile entity queries to SQL from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Select posts by author, MySQL flavour
//! sqlent --schema blog.toml --dialect mysql compile Post --where "authorName = 'sally'"
//!
//! # Count and window statements for a page
//! sqlent compile Post --order "createdOn DESC" --paginate --offset 20 --limit 10
//!
//! # Inspect resolved metadata
//! sqlent describe Post
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlent::config::{self, SchemaConfig};
use sqlent::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlent")]
#[command(version)]
#[command(about = "Compile entity queries to dialect-specific SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlent compile Post --where \"star > 3 AND authorName LIKE 's%'\" --order \"createdOn DESC\"
    sqlent compile Post --op update --set \"star += 1\" --where \"id = 7\"
    sqlent compile Post --op projections --project \"total: count(id), best: max(star)\"
    sqlent describe Post")]
struct Cli {
    /// Schema file (defaults to $SQLENT_SCHEMA, then <config dir>/sqlent/schema.toml)
    #[arg(short, long, global = true)]
    schema: Option<PathBuf>,

    /// SQL dialect, overriding the schema file
    #[arg(short, long, global = true)]
    dialect: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Operation {
    Select,
    Projections,
    Count,
    Exists,
    Insert,
    Update,
    Delete,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile one statement for an entity
    Compile {
        entity: String,

        #[arg(short, long, value_enum, default_value = "select")]
        op: Operation,

        /// Criterion, e.g. "age >= 18 AND name LIKE 'a%'"
        #[arg(short = 'w', long = "where")]
        filter: Option<String>,

        /// Sort keys, e.g. "createdOn DESC, id"
        #[arg(long)]
        order: Option<String>,

        /// Assignments for --op update, e.g. "star += 1, body = NULL"
        #[arg(long)]
        set: Option<String>,

        /// Projections for --op projections, e.g. "total: count(id)"
        #[arg(long)]
        project: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Emit the count and limited statements instead of an inline LIMIT
        #[arg(long)]
        paginate: bool,

        #[arg(long)]
        for_update: bool,
    },
    /// Show the resolved descriptor of an entity
    Describe { entity: String },
    /// List declared entities
    Entities,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sqlent=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let registry = load_registry(cli)?;
    match &cli.command {
        Commands::Compile {
            entity,
            op,
            filter,
            order,
            set,
            project,
            offset,
            limit,
            paginate,
            for_update,
        } => {
            let request = CompileRequest {
                entity,
                op: *op,
                filter: filter.as_deref(),
                order: order.as_deref(),
                set: set.as_deref(),
                project: project.as_deref(),
                offset: *offset,
                limit: *limit,
                paginate: *paginate,
                for_update: *for_update,
            };
            compile(&registry, &request, cli.format)
        }
        Commands::Describe { entity } => describe(&registry, entity, cli.format),
        Commands::Entities => {
            for name in registry.metadata().entity_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn load_registry(cli: &Cli) -> Result<SqlRegistry> {
    let Some(path) = config::schema_path(cli.schema.as_deref()) else {
        bail!("no schema file: pass --schema or set {}", config::SCHEMA_ENV);
    };
    let schema = SchemaConfig::load(&path)
        .with_context(|| format!("loading schema {}", path.display()))?;
    let dialect = cli
        .dialect
        .as_deref()
        .map(str::parse::<Dialect>)
        .transpose()?;
    Ok(schema.build_registry(dialect)?)
}

struct CompileRequest<'a> {
    entity: &'a str,
    op: Operation,
    filter: Option<&'a str>,
    order: Option<&'a str>,
    set: Option<&'a str>,
    project: Option<&'a str>,
    offset: Option<i64>,
    limit: Option<i64>,
    paginate: bool,
    for_update: bool,
}

impl CompileRequest<'_> {
    fn criterion(&self) -> Result<Criterion> {
        Ok(parse_criterion(self.filter.unwrap_or_default()).context("--where")?)
    }

    /// Inline window, only when `--offset` or `--limit` was given.
    fn bounds(&self) -> Option<RowBounds> {
        if self.offset.is_none() && self.limit.is_none() {
            return None;
        }
        Some(self.page())
    }

    /// Window for `--paginate`; unbounded unless narrowed.
    fn page(&self) -> RowBounds {
        RowBounds::new(self.offset.unwrap_or(0), self.limit.unwrap_or(i64::MAX))
    }
}

fn compile(registry: &SqlRegistry, req: &CompileRequest<'_>, format: OutputFormat) -> Result<()> {
    let statement = match req.op {
        Operation::Insert => registry.insert(req.entity)?,
        Operation::Update => {
            let Some(set) = req.set else {
                bail!("--op update needs --set");
            };
            let update = parse_update(set).context("--set")?;
            registry.update(req.entity, update, req.criterion()?)?
        }
        Operation::Delete => registry.delete(req.entity, req.criterion()?)?,
        _ => {
            let mut select = registry.select(req.entity).criterion(req.criterion()?);
            if let Some(order) = req.order {
                select = select.order_by(parse_order_by(order).context("--order")?);
            }
            if let Some(bounds) = req.bounds().filter(|_| !req.paginate) {
                select = select.bounds(bounds);
            }
            if req.for_update {
                select = select.for_update();
            }
            match req.op {
                Operation::Projections => {
                    let Some(project) = req.project else {
                        bail!("--op projections needs --project");
                    };
                    select.projections(parse_projections(project).context("--project")?)?
                }
                Operation::Count => select.count()?,
                Operation::Exists => select.exists()?,
                _ => select.entities()?,
            }
        }
    };

    if !req.paginate {
        print_statements(&[statement], format)?;
        return Ok(());
    }
    let paged = registry.paginate(&statement, req.page())?;
    print_statements(&[paged.count, paged.limited], format)
}

fn print_statements(statements: &[Statement], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = if let [single] = statements {
                serde_json::to_string_pretty(single)?
            } else {
                serde_json::to_string_pretty(statements)?
            };
            println!("{}", json);
        }
        OutputFormat::Text => {
            for (i, stmt) in statements.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{} {}", "--".dimmed(), stmt.id.cyan().bold());
                println!("{}", stmt.sql.white());
                if !stmt.bindings.is_empty() {
                    println!("{}", "Bindings:".cyan());
                    for (n, binding) in stmt.bindings.iter().enumerate() {
                        println!("  {} = {}", (n + 1).to_string().dimmed(), binding.to_string().yellow());
                    }
                }
            }
        }
    }
    Ok(())
}

fn describe(registry: &SqlRegistry, entity: &str, format: OutputFormat) -> Result<()> {
    let descriptor = registry.descriptor(entity)?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(descriptor.as_ref())?);
        return Ok(());
    }

    println!("{} {}", "Entity:".dimmed(), descriptor.name().cyan().bold());
    println!("{} {}", "Table:".dimmed(), descriptor.table_path().join("."));
    if let Some(cache) = descriptor.cache() {
        let cache = match cache {
            CachePolicy::Own(c) => format!("{} ({})", c.implementation, c.eviction),
            CachePolicy::Shared(ns) => format!("shared with {}", ns),
        };
        println!("{} {}", "Cache:".dimmed(), cache);
    }

    if !descriptor.joins().is_empty() {
        println!("{}", "Joins:".green().bold());
        for (i, join) in descriptor.joins().iter().enumerate() {
            println!(
                "  j{} {} -> {} [{:?}] ON {}",
                i + 1,
                join.name.white(),
                join.target.cyan(),
                join.kind,
                join.criterion
            );
        }
    }

    println!("{}", "Properties:".green().bold());
    for property in descriptor.properties() {
        let mut flags = Vec::new();
        if property.id {
            flags.push("id".to_string());
        }
        if property.generated {
            flags.push("generated".to_string());
        }
        if let Some(reference) = &property.reference {
            flags.push(format!("-> {}", reference));
        }
        if !property.aliases.is_empty() {
            let aliases: Vec<_> = property.aliases.iter().map(|a| format!("#{}", a)).collect();
            flags.push(aliases.join(" "));
        }
        println!(
            "  {} {} {}",
            property.name.white(),
            property.column.dimmed(),
            flags.join(", ").yellow()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(offset: Option<i64>, limit: Option<i64>) -> CompileRequest<'static> {
        CompileRequest {
            entity: "Post",
            op: Operation::Select,
            filter: None,
            order: None,
            set: None,
            project: None,
            offset,
            limit,
            paginate: true,
            for_update: false,
        }
    }

    #[test]
    fn test_page_defaults_to_every_row() {
        let page = request(None, None).page();
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), i64::MAX as u64);
        assert!(request(None, None).bounds().is_none());

        let page = request(Some(20), None).page();
        assert_eq!((page.offset(), page.limit()), (20, i64::MAX as u64));
        assert_eq!(request(None, Some(5)).bounds().map(|b| b.limit()), Some(5));
    }
}
