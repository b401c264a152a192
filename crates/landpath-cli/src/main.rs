//! Landpath command-line demo
//!
//! Prints the stage catalog, walks a demo land through every stage in memory
//! and renders the default configuration.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use landpath_core::telemetry::init_tracing;
use landpath_core::{
    Directories, EngagementId, EngagementInfo, EngagementStatus, EngineConfig, InMemoryDirectory,
    InMemoryJourneyStore, JourneyEngine, LandAttributes, LandSizeUnit, NewDocument,
    ProfessionalId, StageCatalog, StageStatusUpdate, UserId,
};
use std::path::PathBuf;
use std::sync::Arc;

fn cli() -> Command {
    Command::new("landpath")
        .version(landpath_core::VERSION)
        .about("Land acquisition journey engine")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("catalog")
                .about("Print the stage catalog")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("walk")
                .about("Walk a demo land from acquisition to ready-to-build")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Engine configuration (TOML)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the final journey view as JSON"),
                ),
        )
        .subcommand(Command::new("config").about("Print the default configuration as TOML"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("catalog", args)) => print_catalog(args.get_flag("json")),
        Some(("walk", args)) => walk(args).await,
        Some(("config", _)) => {
            print!("{}", EngineConfig::default().to_toml_string()?);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn print_catalog(json: bool) -> Result<()> {
    let catalog = StageCatalog::global();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.snapshot())?);
        return Ok(());
    }

    println!("Land Acquisition Journey");
    println!("========================");
    for (index, entry) in catalog.entries().enumerate() {
        let role = entry
            .required_role
            .map_or_else(|| "-".to_string(), |role| role.to_string());
        println!(
            "{index:>2}. {:<22} {:<10} ~{} days",
            entry.stage.as_str(),
            role,
            entry.estimated_days
        );
    }
    println!();
    println!("Total estimated duration: {} days", catalog.total_estimated_days());
    Ok(())
}

async fn walk(args: &ArgMatches) -> Result<()> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    init_tracing(&config.logging)?;
    let json = args.get_flag("json");

    let directory = Arc::new(InMemoryDirectory::new());
    let engine = JourneyEngine::new(
        config,
        Arc::new(InMemoryJourneyStore::new()),
        Directories::uniform(directory.clone()),
    );
    let catalog = StageCatalog::global();

    let owner = UserId::new();
    let attributes = LandAttributes::new("Demo plot", "Ibeju-Lekki, Lagos", 0.5, LandSizeUnit::Acres)
        .with_region("Ibeju-Lekki", "Lagos");
    let journey = engine.register_manually(owner, attributes).await?;
    let land_id = journey.land_id;
    tracing::info!(%land_id, "walking demo land");

    let mut current = journey.current_stage;
    while let Some(next) = current.next() {
        let entry = catalog.lookup(current);

        if let Some(role) = entry.required_role {
            let engagement = EngagementInfo {
                id: EngagementId::new(),
                client_id: owner,
                professional_id: ProfessionalId::new(),
                role,
                status: EngagementStatus::Accepted,
            };
            directory.insert_engagement(engagement.clone());
            engine
                .link_engagement(land_id, current, engagement.id, owner)
                .await?;
        }
        for &kind in &entry.output_documents {
            let name = format!("{}.pdf", kind.as_str().to_ascii_lowercase());
            let locator = format!("memory://{land_id}/{name}");
            engine
                .add_document(land_id, owner, NewDocument::new(current, kind, name, locator))
                .await?;
        }

        engine
            .set_stage_status(land_id, current, owner, StageStatusUpdate::completed())
            .await?;
        let view = engine.journey_detail(land_id, owner).await?;
        if !json {
            println!("[{:>3}%] {current} -> {next}", view.progress);
        }
        current = view.journey.current_stage;
    }

    let view = engine.journey_detail(land_id, owner).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!();
        println!(
            "Land {land_id} is {} with {} documents on file",
            view.journey.current_stage,
            view.document_count()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn walk_accepts_config_path() {
        let matches = cli()
            .try_get_matches_from(["landpath", "walk", "--config", "engine.toml", "--json"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "walk");
        assert_eq!(
            args.get_one::<PathBuf>("config"),
            Some(&PathBuf::from("engine.toml"))
        );
        assert!(args.get_flag("json"));
    }
}
