use clap::Parser;
use form_field_state::cli::commands::{build_hooks, cmd_bootstrap, cmd_delete, cmd_save, cmd_state};
use form_field_state::cli::config::{Cli, Commands, load_config, resolve_storage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve storage locations: CLI > config > defaults
    let storage = resolve_storage(&cli, &config.storage);
    let hooks = build_hooks(&config, &storage);

    match &cli.command {
        Commands::Bootstrap {
            form,
            all_in_list_view,
            force,
        } => cmd_bootstrap(&hooks, form, *all_in_list_view, *force, cli.verbose)?,
        Commands::Save { form } => cmd_save(&hooks, form, cli.verbose)?,
        Commands::Delete { form } => cmd_delete(&hooks, form, cli.verbose)?,
        Commands::State { form, format } => cmd_state(&hooks, form, format)?,
    }

    Ok(())
}
