use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ftradar_core::config::{DigestConfig, MailConfig};
use ftradar_core::delivery::{DigestMailer, MailOutcome, SmtpMailer, publish_digest};
use ftradar_core::models::{NewItem, parse_tags};
use ftradar_core::subsidy::{ProgramCatalog, ProjectParams, estimate_subsidies};
use ftradar_core::{ItemQuery, ItemStore, RadarConfig};

use crate::cli::{AddArgs, Commands, DigestArgs, ListArgs, SubsidyArgs};

mod support;
mod web;

use self::support::{list_line, print_json, subsidy_table};

pub(crate) fn run(config: &RadarConfig, command: Commands) -> Result<()> {
    match command {
        Commands::InitDb => {
            let store = open_store(&config.db_path)?;
            println!("OK: database initialized at {}", store.path().display());
        }
        Commands::Add(args) => {
            let store = open_store(&config.db_path)?;
            let item = store.add(new_item(args)).context("failed to store item")?;
            println!("OK: item stored (id={})", item.id);
        }
        Commands::List(args) => {
            let store = open_store(&config.db_path)?;
            for item in store.query(&list_query(&args)?)? {
                println!("{}", list_line(&item));
            }
        }
        Commands::ImportJson(args) => {
            let store = open_store(&config.db_path)?;
            let count = store
                .import_json(&args.path)
                .with_context(|| format!("failed to import {}", args.path.display()))?;
            println!("OK: {count} items imported");
        }
        Commands::ExportJson(args) => {
            let store = open_store(&config.db_path)?;
            let count = store
                .export_json(&args.path)
                .with_context(|| format!("failed to export to {}", args.path.display()))?;
            println!("OK: {count} items exported -> {}", args.path.display());
        }
        Commands::Digest(args) => run_digest(config, &args)?,
        Commands::Subsidies(args) => run_subsidies(config, args)?,
        Commands::Serve(args) => web::serve(config, &args.host, args.port)?,
    }
    Ok(())
}

fn open_store(path: &Path) -> Result<ItemStore> {
    ItemStore::open(path).with_context(|| format!("failed to open item store at {}", path.display()))
}

fn new_item(args: AddArgs) -> NewItem {
    NewItem {
        id: args.id,
        effective_date: args.effective_date,
        category: args.category,
        region: args.region,
        title: args.title,
        summary: args.summary,
        source_url: args.source_url,
        source_org: args.source_org,
        change_type: args.change_type,
        impact_notes: args.impact_notes,
        tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
    }
}

pub(super) fn list_query(args: &ListArgs) -> Result<ItemQuery> {
    let query = match args.days {
        Some(days) => ItemQuery::last_days(days)?,
        None => ItemQuery::all(),
    };
    Ok(query
        .with_categories(args.category)
        .with_regions(args.region)
        .with_limit(args.limit))
}

fn run_digest(config: &RadarConfig, args: &DigestArgs) -> Result<()> {
    let store = open_store(&config.db_path)?;
    let digest = DigestConfig {
        days: args.days.unwrap_or(config.digest.days),
        ..config.digest.clone()
    };

    let smtp: &dyn DigestMailer = &SmtpMailer;
    let mail: Option<(&MailConfig, &dyn DigestMailer)> =
        (!args.no_mail).then_some((&config.mail, smtp));

    let report = publish_digest(&store, &digest, mail, Utc::now())
        .context("failed to publish digest")?;

    println!(
        "OK: digest written ({} items, last {} days) -> {}, {}",
        report.item_count,
        report.days,
        report.markdown_path.display(),
        report.html_path.display()
    );
    match report.mail {
        MailOutcome::Sent { recipients } => println!("OK: digest mailed to {recipients} recipients"),
        MailOutcome::Skipped { missing } if !missing.is_empty() => {
            println!("mail skipped: missing {}", missing.join(", "));
        }
        MailOutcome::Skipped { .. } => {}
    }
    Ok(())
}

fn run_subsidies(config: &RadarConfig, args: SubsidyArgs) -> Result<()> {
    let catalog_path = args.catalog.as_deref().or(config.programs_path.as_deref());
    let catalog = ProgramCatalog::resolve(catalog_path).context("failed to load program catalog")?;
    let params = ProjectParams {
        jurisdiction: args.jurisdiction,
        sectors: args.sectors.into_iter().collect(),
        technologies: args.technologies.into_iter().collect(),
        investment: args.investment,
        target_year: args.year,
    };
    let estimates = estimate_subsidies(&catalog, &params)?;

    if args.json {
        return print_json(&estimates);
    }
    if estimates.is_empty() {
        println!("No matching programs. Adjust the filters.");
        return Ok(());
    }
    for line in subsidy_table(&estimates) {
        println!("{line}");
    }
    Ok(())
}
