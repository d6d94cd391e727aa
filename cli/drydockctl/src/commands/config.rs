//! `drydock config` subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::CommandContext;
use crate::config::{Config, DEFAULT_CLUSTER_URL, DEFAULT_SSO_URL};
use crate::output;

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the config file as YAML.
    View,

    /// Switch the active context.
    UseContext {
        /// Name of an existing context.
        name: String,
    },

    /// Add a new context with empty credentials.
    NewContext(NewContextArgs),

    /// List all contexts.
    Contexts,
}

#[derive(Debug, Args)]
struct NewContextArgs {
    /// Name for the new context.
    name: String,

    /// Cluster target URL for the new context.
    #[arg(long, default_value = DEFAULT_CLUSTER_URL)]
    cluster_url: String,

    /// SSO login URL for the new context.
    #[arg(long, default_value = DEFAULT_SSO_URL)]
    sso_url: String,
}

#[derive(Tabled)]
struct ContextRow {
    #[tabled(rename = "ACTIVE")]
    active: &'static str,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CLUSTER")]
    cluster: String,
    #[tabled(rename = "SSO")]
    sso: String,
    #[tabled(rename = "USER")]
    user: String,
}

impl ConfigCommand {
    pub fn run(self, mut ctx: CommandContext) -> Result<()> {
        match self.action {
            ConfigAction::View => {
                print!("{}", serde_yaml::to_string(&ctx.config)?);
                Ok(())
            }
            ConfigAction::UseContext { name } => {
                ctx.store.set_current_context(&mut ctx.config, &name)?;
                output::print_success(&format!("Switched to context '{name}'."));
                Ok(())
            }
            ConfigAction::NewContext(args) => {
                ctx.store.add_context(
                    &mut ctx.config,
                    &args.name,
                    &args.sso_url,
                    &args.cluster_url,
                )?;
                output::print_success(&format!(
                    "Added context '{}'. Activate it with `drydock config use-context {}`.",
                    args.name, args.name
                ));
                Ok(())
            }
            ConfigAction::Contexts => {
                println!("{}", contexts_table(&ctx.config));
                Ok(())
            }
        }
    }
}

fn contexts_table(config: &Config) -> String {
    let rows: Vec<ContextRow> = config
        .contexts
        .iter()
        .map(|c| ContextRow {
            active: if c.name == config.current_context { "*" } else { "" },
            name: c.name.clone(),
            cluster: c.cluster.cluster_url.clone(),
            sso: c.cluster.sso_url.clone(),
            user: c.user.username.clone(),
        })
        .collect();

    Table::new(rows).with(Style::blank()).to_string()
}
