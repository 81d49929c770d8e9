//! Command dispatch: load the snapshot, run one operation, optionally save.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::ToTermTree;
use crate::config::{global_config_path, Settings};
use crate::domain::{CategoryId, CategoryUpdate, NewCategory};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `cattree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return execute_config(cli, command),
        _ => {}
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);
    let snapshot = container.snapshot_path(cli.snapshot.as_deref()).to_path_buf();
    container.load_snapshot(&snapshot)?;

    execute_category(&container, command)?;

    if cli.write {
        if command.is_mutation() {
            container.save_snapshot(&snapshot)?;
            output::action("Saved", &snapshot.display());
        } else {
            output::warning("--write ignored: command does not change anything");
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn execute_category(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let categories = &container.categories;
    match command {
        Commands::Add {
            name,
            code,
            parent,
            description,
            sort_order,
            inactive,
        } => {
            let request = NewCategory {
                name: Some(name.clone()),
                code: Some(code.clone()),
                description: description.clone(),
                parent_id: parent.map(CategoryId::from),
                sort_order: *sort_order,
                is_active: Some(!inactive),
            };
            let node = categories.create(request)?;
            output::success(&format!("Created {}", node));
        }
        Commands::Show { id } => {
            output::node_details(&categories.get(CategoryId::from(*id))?);
        }
        Commands::Rename { id, name } => {
            let node = categories.rename(CategoryId::from(*id), name)?;
            output::success(&format!("Renamed {}", node));
        }
        Commands::Update {
            id,
            name,
            description,
            sort_order,
            active,
        } => {
            let update = CategoryUpdate {
                name: name.clone(),
                description: description.clone(),
                sort_order: *sort_order,
                is_active: *active,
            };
            if update.is_empty() {
                return Err(CliError::InvalidArgs(
                    "update needs at least one of --name, --description, --sort-order, --active"
                        .to_string(),
                ));
            }
            let node = categories.update(CategoryId::from(*id), update)?;
            output::success(&format!("Updated {}", node));
        }
        Commands::Move { id, parent } => {
            let node = categories.move_node(CategoryId::from(*id), parent.map(CategoryId::from))?;
            output::success(&format!("Moved {}", node));
        }
        Commands::Delete { id } => {
            let id = CategoryId::from(*id);
            categories.delete(id)?;
            output::success(&format!("Deleted category {}", id));
        }
        Commands::Tree { id } => {
            let rendered = match id {
                Some(id) => categories
                    .subtree(CategoryId::from(*id))?
                    .to_term_tree()
                    .to_string(),
                None => categories.tree()?.to_term_tree().to_string(),
            };
            output::info(&rendered.trim_end());
        }
        Commands::Children { id } => {
            output::node_list(&categories.children(id.map(CategoryId::from))?);
        }
        Commands::Ancestors { id } => {
            output::node_list(&categories.ancestors(CategoryId::from(*id))?);
        }
        Commands::Descendants { id } => {
            output::node_list(&categories.descendants(CategoryId::from(*id))?);
        }
        Commands::Level { level } => {
            output::node_list(&categories.nodes_at_level(*level)?);
        }
        Commands::Search { term } => {
            output::node_list(&categories.search(term)?);
        }
        Commands::Prefix { path } => {
            output::node_list(&categories.find_by_path_prefix(path)?);
        }
        Commands::Stats => {
            let stats = categories.stats()?;
            output::header(&"Category forest");
            output::detail(&format!("total:     {}", stats.total));
            output::detail(&format!("active:    {}", stats.active));
            output::detail(&format!("roots:     {}", stats.roots));
            output::detail(&format!("leaves:    {}", stats.leaves));
            output::detail(&format!("max level: {}", stats.max_level));
        }
        Commands::Config { .. } | Commands::Completion { .. } => {
            debug!("handled before loading the snapshot");
        }
    }
    Ok(())
}

fn execute_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::detail(&format!("global:   {}", global));
            if let Some(path) = &cli.config {
                output::detail(&format!("explicit: {}", path.display()));
            }
            let settings = Settings::load(cli.config.as_deref())?;
            output::detail(&format!("snapshot: {}", settings.snapshot_file.display()));
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            write_template(&RealFileSystem, &path, *force)?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn write_template(fs: &dyn FileSystem, path: &Path, force: bool) -> CliResult<()> {
    if fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_missing_directory_when_writing_template_then_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cattree").join("cattree.toml");

        write_template(&RealFileSystem, &path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, Settings::template());
    }

    #[test]
    fn given_existing_file_when_writing_template_without_force_then_usage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cattree.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        let err = write_template(&RealFileSystem, &path, false).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }

    #[test]
    fn given_existing_file_when_writing_template_with_force_then_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cattree.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        write_template(&RealFileSystem, &path, true).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), Settings::template());
    }
}
