use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use treetrace_config::{
    OutputFormat, SessionConfig, TreeKind, load_config, save_config, validate_config,
};
use treetrace_engine::{Key, Session};
use treetrace_logging::LogLevel;
use treetrace_render_json::{read_steps_jsonl, read_trace_json, trace_to_jsonl, traces_to_json};
use treetrace_render_text::{render_snapshot, render_step, render_trace};
use treetrace_trace::Trace;

#[derive(Parser, Debug)]
#[command(name = "treetrace")]
#[command(about = "Insert keys into a self-balancing tree and print every step.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Tree variant: avl or red-black. Overrides the config file.
    #[arg(long)]
    tree: Option<TreeKind>,
    /// YAML or JSON session config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip invariant checks after each insertion.
    #[arg(long)]
    no_verify: bool,
    /// Minimum level for log lines written to stderr.
    #[arg(long)]
    log_level: Option<LogLevel>,
    /// Keys to insert, in order.
    #[arg(allow_negative_numbers = true)]
    keys: Vec<Key>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert keys and print the trace of each insertion.
    Insert {
        #[command(flatten)]
        session: SessionArgs,
        /// text, json or jsonl.
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Only print the last step of each trace.
        #[arg(long)]
        final_only: bool,
        /// Write the output here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Insert keys and print only the resulting tree.
    Show {
        #[command(flatten)]
        session: SessionArgs,
        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render a trace saved as JSON (one trace) or JSONL (one step per line).
    Replay { path: PathBuf },

    /// Write a default session config.
    InitConfig {
        path: PathBuf,
        #[arg(long, default_value = "avl")]
        tree: TreeKind,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn resolve_config(args: &SessionArgs) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(tree) = args.tree {
        config.tree = tree;
    }
    if args.no_verify {
        config.verify = false;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    Ok(config)
}

/// Build the session and insert the command-line keys. Returns how many
/// traces came from the config's seed keys.
///
/// Logs are flushed before any insertion error is returned, so a failing
/// seed key still leaves its step lines on stderr.
fn run_session(config: SessionConfig, keys: &[Key]) -> Result<(Session, usize)> {
    validate_config(&config)?;
    let seed = config.keys.clone();
    let mut session = Session::new(config);
    let result = insert_keys(&mut session, &seed, keys);
    flush_logs(&mut session);
    let seeded = result?;
    Ok((session, seeded))
}

fn insert_keys(session: &mut Session, seed: &[Key], keys: &[Key]) -> Result<usize> {
    session
        .insert_all(seed.iter().copied())
        .context("seed session from config keys")?;
    let seeded = session.traces().len();
    session.insert_all(keys.iter().copied())?;
    Ok(seeded)
}

fn flush_logs(session: &mut Session) {
    for line in session.logs().render() {
        eprintln!("{line}");
    }
    session.drain_logs();
}

/// `keys[i]` is the key that produced `traces[i]`.
fn render_traces(
    keys: &[Key],
    traces: &[Trace<Key>],
    format: OutputFormat,
    final_only: bool,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let blocks: Vec<String> = keys
                .iter()
                .zip(traces)
                .map(|(key, trace)| {
                    let body = match (final_only, trace.last()) {
                        (true, Some(last)) => render_step(last),
                        _ => render_trace(trace),
                    };
                    format!("== insert {key} ==\n{body}")
                })
                .collect();
            Ok(blocks.join("\n"))
        }
        OutputFormat::Json if final_only => {
            let finals: Vec<_> = traces.iter().filter_map(Trace::last).collect();
            serde_json::to_string_pretty(&finals).context("serialize final steps")
        }
        OutputFormat::Json => traces_to_json(traces),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for trace in traces {
                if final_only {
                    if let Some(last) = trace.last() {
                        out.push_str(&serde_json::to_string(last).context("serialize step")?);
                        out.push('\n');
                    }
                } else {
                    out.push_str(&trace_to_jsonl(trace)?);
                }
            }
            Ok(out)
        }
    }
}

fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write {path:?}"))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Insert {
            session,
            format,
            final_only,
            out,
        } => {
            let mut config = resolve_config(&session)?;
            if let Some(format) = format {
                config.output = format;
            }
            config.final_only |= final_only;
            let (format, final_only) = (config.output, config.final_only);
            let keys = session.keys;
            let (session, seeded) = run_session(config, &keys)?;
            let text = render_traces(&keys, &session.traces()[seeded..], format, final_only)?;
            emit(&text, out.as_deref())?;
        }

        Command::Show { session, json } => {
            let config = resolve_config(&session)?;
            let (session, _) = run_session(config, &session.keys)?;
            let snapshot = session.snapshot();
            if json {
                let text = serde_json::to_string_pretty(&snapshot).context("serialize snapshot")?;
                emit(&text, None)?;
            } else {
                emit(&render_snapshot(&snapshot), None)?;
            }
        }

        Command::Replay { path } => {
            let text = if path.extension().is_some_and(|e| e == "jsonl") {
                let raw = std::fs::read_to_string(&path).with_context(|| format!("read {path:?}"))?;
                let steps = read_steps_jsonl::<Key>(&raw)?;
                steps.iter().map(render_step).collect::<Vec<_>>().join("\n")
            } else {
                render_trace(&read_trace_json::<Key>(&path)?)
            };
            emit(&text, None)?;
        }

        Command::InitConfig { path, tree, force } => {
            if path.exists() && !force {
                bail!("{} already exists; pass --force to replace it", path.display());
            }
            save_config(&SessionConfig::for_tree(tree), &path)?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
