//! Command-line front end over a file-backed inventory session.
//!
//! Each invocation opens the named inventory, applies one command and, for
//! mutating commands, saves it again.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use satchel_core::{InventoryName, ItemId, Quantity};
use satchel_infra::config::{DATA_DIR_VAR, NEW_STACK_POLICY_VAR};
use satchel_infra::{InventoryRepository, InventorySession, StoreConfig};
use satchel_inventory::NewStackPolicy;
use satchel_observability::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "satchel", version, about = "Track item quantities in named inventories")]
pub struct Cli {
    /// Directory holding persisted inventories.
    #[arg(long, global = true, env = DATA_DIR_VAR)]
    pub data_dir: Option<PathBuf>,

    /// Inventory to operate on.
    #[arg(long, short, global = true, default_value = "default")]
    pub inventory: InventoryName,

    /// Starting count for stacks created by `add`: `requested` or `single`.
    #[arg(long, global = true, env = NEW_STACK_POLICY_VAR)]
    pub new_stack_policy: Option<NewStackPolicy>,

    #[arg(long, global = true, value_enum, default_value_t = LogStyle::Compact)]
    pub log_format: LogStyle,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add units of an item.
    Add {
        item: ItemId,
        #[arg(long, short, default_value_t = 1)]
        amount: u32,
    },
    /// Remove units of an item; the stack disappears once it reaches zero.
    Remove {
        item: ItemId,
        #[arg(long, short, default_value_t = 1)]
        amount: u32,
    },
    /// Remove every item.
    Reset,
    /// Print `item<TAB>count` lines in inventory order.
    List,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogStyle {
    Json,
    Compact,
}

impl From<LogStyle> for LogFormat {
    fn from(value: LogStyle) -> Self {
        match value {
            LogStyle::Json => LogFormat::Json,
            LogStyle::Compact => LogFormat::Compact,
        }
    }
}

impl Cli {
    /// Environment config with command-line overrides applied.
    fn store_config(&self) -> StoreConfig {
        StoreConfig::with_overrides(self.data_dir.clone(), self.new_stack_policy, |key| {
            std::env::var(key).ok()
        })
    }
}

pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = cli.store_config();
    let repository = InventoryRepository::new(config.open_store());
    let mut session =
        InventorySession::open(repository, cli.inventory.clone(), config.new_stack_policy)
            .with_context(|| format!("failed to open inventory '{}'", cli.inventory))?;

    match cli.command {
        Command::Add { item, amount } => {
            session.add(item, Quantity::new(amount)?);
        }
        Command::Remove { item, amount } => {
            if !session.remove(item, Quantity::new(amount)?) {
                tracing::info!(%item, inventory = %cli.inventory, "item not held; nothing removed");
            }
        }
        Command::Reset => session.reset(),
        Command::List => {
            for (item, count) in session.inventory().entries() {
                writeln!(out, "{item}\t{count}")?;
            }
            return Ok(());
        }
    }

    session
        .close()
        .with_context(|| format!("failed to save inventory '{}'", cli.inventory))?;
    Ok(())
}
