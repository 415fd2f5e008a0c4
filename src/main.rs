use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flowgraph_config::FlowDef;
use flowgraph_runtime::{Runtime, TracingNotifier};
use flowgraph_server::{FlowServer, ServerConfig};
use flowgraph_workflow::validate;

/// Flowgraph - validate and execute node/edge flow graphs
#[derive(Parser)]
#[command(name = "flowgraph")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the config file (default: ~/.flowgraph/config.toml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Execute a flow and print the run result as JSON
  Run {
    /// Path to the flow file, or `-` to read it from stdin
    flow_file: PathBuf,
  },

  /// Check a flow without executing it and print its execution order
  Validate {
    /// Path to the flow file, or `-` to read it from stdin
    flow_file: PathBuf,
  },

  /// Serve the HTTP API
  Serve {
    /// Override `server.bind` from the config file
    #[arg(long)]
    bind: Option<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing();

  let config_path = match cli.config {
    Some(path) => path,
    None => default_config_path()?,
  };

  match cli.command {
    Some(Commands::Run { flow_file }) => {
      let config = load_config(&config_path)?;
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(run_flow(&flow_file, &config))
    }
    Some(Commands::Validate { flow_file }) => validate_flow(&flow_file, &load_config(&config_path)?),
    Some(Commands::Serve { bind }) => {
      let mut config = load_config(&config_path)?;
      if let Some(bind) = bind {
        config.server.bind = bind;
      }
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(serve(config))
    }
    None => {
      println!("flowgraph - use --help to see available commands");
      Ok(())
    }
  }
}

fn init_tracing() {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowgraph=info,warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

fn default_config_path() -> Result<PathBuf> {
  let home = dirs::home_dir().context("could not determine home directory")?;
  Ok(home.join(".flowgraph").join("config.toml"))
}

fn load_config(path: &Path) -> Result<ServerConfig> {
  ServerConfig::load_or_default(path)
    .with_context(|| format!("failed to load config: {}", path.display()))
}

async fn run_flow(flow_file: &Path, config: &ServerConfig) -> Result<()> {
  let flow = read_flow(flow_file)?;

  let runtime = Runtime::with_notifier(config.runtime_config(), TracingNotifier);
  let cancel = CancellationToken::new();
  spawn_ctrl_c(cancel.clone());

  let result = runtime
    .run(&flow, &config.limits, "cli", cancel)
    .await
    .context("flow execution failed")?;

  info!(
    execution_id = %result.execution_id,
    nodes = result.results.len(),
    "execution completed"
  );
  println!("{}", serde_json::to_string_pretty(&result)?);
  Ok(())
}

fn validate_flow(flow_file: &Path, config: &ServerConfig) -> Result<()> {
  let flow = read_flow(flow_file)?;

  match validate(&flow.nodes, &flow.edges, &config.limits) {
    Ok(workflow) => {
      println!("valid: {} nodes, {} edges", workflow.node_count(), workflow.edges().len());
      println!("entry points: {}", workflow.graph().entry_points().join(", "));
      for (position, node_id) in workflow.execution_order().iter().enumerate() {
        match workflow.get_node(node_id) {
          Some(node) => println!("  {}. {} ({})", position + 1, node_id, node.kind),
          None => println!("  {}. {}", position + 1, node_id),
        }
      }
      Ok(())
    }
    Err(e) => {
      println!("invalid [{}]: {}", e.code(), e);
      std::process::exit(1);
    }
  }
}

async fn serve(config: ServerConfig) -> Result<()> {
  let shutdown = CancellationToken::new();
  spawn_ctrl_c(shutdown.clone());
  FlowServer::new(config).run(shutdown).await
}

fn spawn_ctrl_c(token: CancellationToken) {
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("interrupt received, shutting down");
      token.cancel();
    }
  });
}

fn read_flow(flow_file: &Path) -> Result<FlowDef> {
  let content = if flow_file == Path::new("-") {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read flow from stdin")?;
    input
  } else {
    std::fs::read_to_string(flow_file)
      .with_context(|| format!("failed to read flow file: {}", flow_file.display()))?
  };

  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse flow file: {}", flow_file.display()))
}
