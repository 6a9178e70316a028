use anyhow::{bail, Context, Result};
use serde_json::json;
use splinter_config::SplinterConfig;
use splinter_core::{
    frontmatter, BufferSelection, ExtractError, ExtractOutcome, FilePersistence, FileSelection,
    FsVault, NoteExtractor, SelectionSource, SystemClock,
};
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

use crate::cli::ExtractArgs;
use crate::panes::TerminalPanes;

pub async fn execute(config: SplinterConfig, args: ExtractArgs) -> Result<()> {
    let vault_root = config.vault.path.clone();
    if !vault_root.is_dir() {
        bail!("Vault directory not found: {}", vault_root.display());
    }

    let mut options = config.extract_options();
    if let Some(template) = args.template {
        options.template = template.into();
    }
    if let Some(placement) = args.placement {
        options.pane.placement = placement.into();
    }
    if args.no_activate {
        options.pane.activate = false;
    }

    let editor = args.edit.then(|| config.open.editor_command());
    let vault = Arc::new(FsVault::new(&vault_root));
    let panes = Arc::new(TerminalPanes::new(&vault_root, editor));
    let extractor = NoteExtractor::new(
        options,
        Arc::new(SystemClock),
        vault.clone(),
        vault.clone(),
        panes.clone(),
    );

    if args.stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read selection from stdin")?;
        let buffer = BufferSelection::new(text, args.source_name.clone());

        let outcome = run(&extractor, &buffer).await?;
        if args.json {
            print_json(&outcome, &vault, &panes).await?;
        } else {
            // Only the link goes to stdout so editors can splice it in
            println!("{}", outcome.replacement);
        }
        return Ok(());
    }

    let (Some(source), Some(lines)) = (args.source.clone(), args.lines) else {
        bail!("--source and --lines are required unless --stdin is given");
    };
    debug!(source = %source, start = lines.start, end = lines.end, "extracting from note");

    let selection = FileSelection::from_lines((*vault).clone(), source.clone(), lines.start, lines.end);
    let outcome = run(&extractor, &selection).await?;

    if args.json {
        print_json(&outcome, &vault, &panes).await?;
    } else {
        println!("Created: {}", vault_root.join(&outcome.file.path).display());
        println!("Linked:  {} in {}", outcome.replacement, source);
    }
    Ok(())
}

async fn run(extractor: &NoteExtractor, source: &dyn SelectionSource) -> Result<ExtractOutcome> {
    match extractor.extract(source).await {
        Ok(outcome) => Ok(outcome),
        Err(ExtractError::Unavailable) => {
            bail!("Nothing to extract: the selection has no usable title")
        }
        Err(e) => Err(e).context("Extraction failed"),
    }
}

async fn print_json(
    outcome: &ExtractOutcome,
    vault: &FsVault,
    panes: &TerminalPanes,
) -> Result<()> {
    // Front matter as written, including entries a template rendered inline
    let content = vault
        .read(&outcome.file)
        .await
        .with_context(|| format!("Failed to read {}", outcome.file.path))?;
    let metadata = frontmatter::parse(&content)?;

    let opened = panes.opened();
    let placement = opened.first().map(|(_, options)| options.placement.as_str());
    let selection = panes
        .selection()
        .map(|range| json!({ "start": range.start, "end": range.end }));

    let output = json!({
        "id": outcome.draft.id,
        "path": outcome.file.path,
        "title": outcome.title,
        "replacement": outcome.replacement.to_string(),
        "metadata": metadata,
        "placement": placement,
        "parent_link_selection": selection,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
