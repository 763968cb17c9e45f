//! Implementation of the `keel archetypes` command.

use keel_core::application::ArchetypeCatalog;

use crate::{
    cli::{ArchetypesArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ArchetypesArgs, output: OutputManager) -> CliResult<()> {
    let archetypes = ArchetypeCatalog::new().list();

    match args.format {
        ListFormat::Table => {
            output.header("Available Archetypes:")?;
            for info in &archetypes {
                output.print(&format!(
                    "  {:<18} {:<22} {}",
                    info.id, info.flavour, info.description
                ))?;
            }
        }
        ListFormat::Json => {
            let value = serde_json::to_value(&archetypes).map_err(std::io::Error::other)?;
            output.json(&value)?;
        }
        ListFormat::List => {
            for info in &archetypes {
                output.print(&info.id)?;
            }
        }
        ListFormat::Csv => {
            output.print("id,flavour,library,owns_build_graph")?;
            for info in &archetypes {
                output.print(&format!(
                    "{},{},{},{}",
                    info.id, info.flavour, info.library, info.owns_build_graph
                ))?;
            }
        }
    }

    Ok(())
}
