//! Command line interface
//!
//! Subcommands map one-to-one onto SDK operations. Resource commands take
//! the registry key of a resource type (`scm resources` lists them) and are
//! dispatched to the matching typed client.

pub mod output;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use output::{job_columns, render_item, render_list, OutputFormat};
use scm_sdk::resource::registry::{get_registry, require_resource};
use scm_sdk::resource::{
    ColumnDef, ConfigObject, ListQuery, Location, NewObject, Resource, ResourceClient,
    ResourceFilter,
};
use scm_sdk::resource::paginator::validate_max_limit;
use scm_sdk::{Config, Scm};
use serde_json::Value;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported resource types
    Resources,

    /// List objects in a container
    List(ListArgs),

    /// Look up one object by name
    Fetch {
        /// Resource type, e.g. `zones`
        kind: String,
        name: String,
        #[command(flatten)]
        container: ContainerArgs,
    },

    /// Get one object by id
    Get { kind: String, id: Uuid },

    /// Create an object from a JSON or YAML file
    Create {
        kind: String,
        /// File holding the object; `name` is required
        #[arg(short, long)]
        file: PathBuf,
        /// Place the object here, overriding the file
        #[command(flatten)]
        container: ContainerArgs,
    },

    /// Replace an object from a JSON or YAML file; `id` is required
    Update {
        kind: String,
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete an object by id
    Delete { kind: String, id: Uuid },

    /// Push staged configuration
    Commit {
        /// Folders to push (repeatable)
        #[arg(long = "folder", required = true)]
        folders: Vec<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Wait for the job to finish
        #[arg(long)]
        sync: bool,
        /// Seconds to wait with --sync
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Show one job
    Job { id: String },

    /// List recent jobs
    Jobs {
        #[arg(short, long, default_value_t = 100)]
        limit: usize,
    },

    /// Show or change the saved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the saved configuration
    Show,

    /// Change saved settings; unspecified settings are kept
    Set(ConfigSetArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigSetArgs {
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long)]
    pub default_folder: Option<String>,
    #[arg(long)]
    pub max_limit: Option<i64>,
    #[arg(long)]
    pub token_env: Option<String>,
}

/// Container selection; at most one may be given
#[derive(Args, Debug, Default, Clone)]
#[group(id = "container", multiple = false)]
pub struct ContainerArgs {
    #[arg(long)]
    pub folder: Option<String>,
    #[arg(long)]
    pub snippet: Option<String>,
    #[arg(long)]
    pub device: Option<String>,
}

impl ContainerArgs {
    /// Selected location, falling back to `default_folder`
    pub fn location(&self, default_folder: Option<&str>) -> Option<Location> {
        if let Some(folder) = &self.folder {
            Some(Location::folder(folder))
        } else if let Some(snippet) = &self.snippet {
            Some(Location::snippet(snippet))
        } else if let Some(device) = &self.device {
            Some(Location::device(device))
        } else {
            default_folder.map(Location::folder)
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource type, e.g. `zones`
    pub kind: String,

    #[command(flatten)]
    pub container: ContainerArgs,

    /// Only objects defined directly in the container
    #[arg(long)]
    pub exact_match: bool,

    #[arg(long = "exclude-folder")]
    pub exclude_folders: Vec<String>,

    #[arg(long = "exclude-snippet")]
    pub exclude_snippets: Vec<String>,

    #[arg(long = "exclude-device")]
    pub exclude_devices: Vec<String>,

    /// Field filter as `field=value[,value...]` (repeatable)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<ResourceFilter>,

    /// Page size for this call
    #[arg(long)]
    pub max_limit: Option<i64>,
}

impl ListArgs {
    pub fn query(&self, default_folder: Option<&str>) -> ListQuery {
        ListQuery {
            container: self.container.location(default_folder),
            exact_match: self.exact_match,
            exclude_folders: self.exclude_folders.clone(),
            exclude_snippets: self.exclude_snippets.clone(),
            exclude_devices: self.exclude_devices.clone(),
            filters: self.filters.clone(),
            max_limit: self.max_limit,
        }
    }
}

/// Parse `field=value[,value...]`
pub fn parse_filter(raw: &str) -> std::result::Result<ResourceFilter, String> {
    let Some((field, values)) = raw.split_once('=') else {
        return Err(format!("expected field=value[,value...], got '{}'", raw));
    };
    let field = field.trim();
    if field.is_empty() {
        return Err("filter field must not be empty".to_string());
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok(ResourceFilter::new(field, values))
}

/// Operation on one resource type
enum Action<'a> {
    List(ListQuery),
    Fetch { name: &'a str, location: Location },
    Get(Uuid),
    Create { file: &'a Path, location: Option<Location> },
    Update { file: &'a Path },
    Delete(Uuid),
}

/// Render the resource registry; needs no API access
pub fn render_resources(format: OutputFormat) -> Result<String> {
    let items: Vec<Value> = get_registry()
        .resources
        .iter()
        .map(|(key, def)| {
            serde_json::json!({
                "kind": key,
                "name": def.display_name,
                "endpoint": def.endpoint(),
                "filters": def.filters,
            })
        })
        .collect();

    let columns: Vec<ColumnDef> = [
        ("KIND", "kind", 26),
        ("NAME", "name", 26),
        ("ENDPOINT", "endpoint", 44),
        ("FILTERS", "filters", 40),
    ]
    .into_iter()
    .map(|(header, path, width)| ColumnDef {
        header: header.to_string(),
        json_path: path.to_string(),
        width,
    })
    .collect();

    render_list(&items, &columns, format)
}

/// Show or update the config file at `path`
pub fn run_config(command: ConfigCommand, path: &Path, format: OutputFormat) -> Result<String> {
    let mut config = Config::load_from(path);

    match command {
        ConfigCommand::Show => {},
        ConfigCommand::Set(args) => {
            if let Some(limit) = args.max_limit {
                validate_max_limit(limit)?;
                config.max_limit = Some(limit);
            }
            if let Some(base_url) = args.base_url {
                url::Url::parse(&base_url)
                    .with_context(|| format!("invalid base URL '{}'", base_url))?;
                config.base_url = Some(base_url);
            }
            if let Some(folder) = args.default_folder {
                config.default_folder = Some(folder);
            }
            if let Some(token_env) = args.token_env {
                config.token_env = Some(token_env);
            }
            config.save_to(path)?;
            tracing::info!("Saved config to {:?}", path);
        },
    }

    render_item(&serde_json::to_value(&config)?, format)
}

/// Run a command that talks to the API
pub async fn run(
    scm: &Scm,
    command: Command,
    format: OutputFormat,
    default_folder: Option<&str>,
) -> Result<String> {
    match command {
        Command::Resources => render_resources(format),
        Command::List(args) => {
            let query = args.query(default_folder);
            dispatch(scm, &args.kind, Action::List(query), format).await
        },
        Command::Fetch { kind, name, container } => {
            let location = container
                .location(default_folder)
                .context("one of --folder, --snippet or --device is required")?;
            dispatch(scm, &kind, Action::Fetch { name: &name, location }, format).await
        },
        Command::Get { kind, id } => dispatch(scm, &kind, Action::Get(id), format).await,
        Command::Create { kind, file, container } => {
            let location = container.location(None);
            dispatch(scm, &kind, Action::Create { file: &file, location }, format).await
        },
        Command::Update { kind, file } => {
            dispatch(scm, &kind, Action::Update { file: &file }, format).await
        },
        Command::Delete { kind, id } => dispatch(scm, &kind, Action::Delete(id), format).await,
        Command::Commit {
            folders,
            description,
            sync,
            timeout,
        } => {
            let result = scm.commit(&folders, &description, sync, timeout).await?;
            render_item(&serde_json::to_value(&result)?, format)
        },
        Command::Job { id } => {
            let job = scm.get_job_status(&id).await?;
            render_item(&serde_json::to_value(&job)?, format)
        },
        Command::Jobs { limit } => {
            let jobs = scm.list_jobs(limit).await?;
            let items = serde_json::to_value(&jobs.data)?;
            let items = items.as_array().cloned().unwrap_or_default();
            render_list(&items, &job_columns(), format)
        },
        Command::Config(_) => anyhow::bail!("config commands do not use the API"),
    }
}

async fn dispatch(scm: &Scm, kind: &str, action: Action<'_>, format: OutputFormat) -> Result<String> {
    match kind {
        "bgp-auth-profiles" => run_action(&scm.bgp_auth_profile, action, format).await,
        "dns-proxies" => run_action(&scm.dns_proxy, action, format).await,
        "ike-crypto-profiles" => run_action(&scm.ike_crypto_profile, action, format).await,
        "ipsec-tunnels" => run_action(&scm.ipsec_tunnel, action, format).await,
        "qos-profiles" => run_action(&scm.qos_profile, action, format).await,
        "zones" => run_action(&scm.security_zone, action, format).await,
        "tunnel-interfaces" => run_action(&scm.tunnel_interface, action, format).await,
        "zone-protection-profiles" => run_action(&scm.zone_protection_profile, action, format).await,
        other => {
            // Reports the supported kinds
            require_resource(other)?;
            anyhow::bail!("no client for resource type '{}'", other)
        },
    }
}

async fn run_action<R: Resource>(
    client: &ResourceClient<R>,
    action: Action<'_>,
    format: OutputFormat,
) -> Result<String> {
    let columns = &client.definition().columns;

    match action {
        Action::List(query) => {
            let objects = client.list(&query).await?;
            let items = objects
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            tracing::info!("Listed {} {}", items.len(), R::KIND);
            render_list(&items, columns, format)
        },
        Action::Fetch { name, location } => {
            let object = client.fetch(name, &location).await?;
            render_item(&serde_json::to_value(&object)?, format)
        },
        Action::Get(id) => {
            let object = client.get(id).await?;
            render_item(&serde_json::to_value(&object)?, format)
        },
        Action::Create { file, location } => {
            let mut data: NewObject<R> = read_document(file)?;
            if let Some(location) = location {
                data = data.at(&location);
            }
            let object = client.create(&data).await?;
            render_item(&serde_json::to_value(&object)?, format)
        },
        Action::Update { file } => {
            let data: ConfigObject<R> = read_document(file)?;
            let object = client.update(&data).await?;
            render_item(&serde_json::to_value(&object)?, format)
        },
        Action::Delete(id) => {
            client.delete(id).await?;
            Ok(format!("Deleted {} {}", R::KIND, id))
        },
    }
}

/// Read a JSON or YAML document
fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {:?}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {:?}", path))
}
