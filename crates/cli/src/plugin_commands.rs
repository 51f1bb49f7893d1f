//! CLI commands for plugin management and dispatch debugging.

use std::sync::Arc;

use clap::Subcommand;

use {
    ferrule_dispatch::{events, unfurl},
    ferrule_loader::{
        Loader,
        bundled::bundled_sources,
        discovery::{FsPluginDiscoverer, PluginDiscoverer},
        state::StateStore,
    },
    ferrule_registry::{CapabilityKind, HostEvent, PluginRegistry},
};

#[derive(Subcommand)]
pub enum PluginAction {
    /// List registered capabilities, including disabled ones.
    List {
        /// Only show one capability kind (e.g. "link-unfurler").
        #[arg(long)]
        kind: Option<CapabilityKind>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one registered capability in detail.
    Info {
        /// Plugin id.
        id: String,
    },
    /// Re-enable a disabled plugin.
    Enable {
        id: String,
    },
    /// Disable a plugin without unregistering it.
    Disable {
        id: String,
    },
    /// List PLUGIN.md manifests discovered on the filesystem.
    Installed {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Build the registry the way a host process would: load the bundled
/// sources, then apply persisted enable/disable state.
async fn build_registry() -> anyhow::Result<(Arc<PluginRegistry>, StateStore)> {
    let registry = Arc::new(PluginRegistry::new());
    let loader = Loader::new().with_sources(bundled_sources());
    let report = loader.load_all(&registry).await?;
    for outcome in report.failed() {
        eprintln!("warning: plugin source '{}' did not load", outcome.source);
    }

    let store = StateStore::new(StateStore::default_path());
    let state = store.load()?;
    state.apply(&registry);
    Ok((registry, store))
}

pub async fn handle_plugins(action: PluginAction) -> anyhow::Result<()> {
    match action {
        PluginAction::List { kind, json } => {
            let (registry, _) = build_registry().await?;
            let descriptors: Vec<_> = registry
                .all()
                .into_iter()
                .filter(|d| kind.is_none_or(|k| d.kind() == k))
                .collect();

            if json {
                let infos: Vec<_> = descriptors.iter().map(|d| d.info()).collect();
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else if descriptors.is_empty() {
                println!("No capabilities registered.");
            } else {
                for descriptor in &descriptors {
                    let status = if descriptor.enabled() { "✓" } else { "✗" };
                    println!(
                        "  {status} {id} [{kind}] priority {priority} — {name}",
                        id = descriptor.id(),
                        kind = descriptor.kind(),
                        priority = descriptor.priority(),
                        name = descriptor.name(),
                    );
                    if !descriptor.enabled() {
                        println!("    ↳ disabled");
                    }
                }
            }
        },
        PluginAction::Info { id } => {
            let (registry, _) = build_registry().await?;
            let Ok(descriptor) = registry.get_by_id(&id) else {
                eprintln!("Plugin '{id}' not found.");
                std::process::exit(1);
            };

            println!("Id:          {}", descriptor.id());
            println!("Name:        {}", descriptor.name());
            println!("Description: {}", descriptor.description());
            if let Some(version) = descriptor.version() {
                println!("Version:     {version}");
            }
            println!("Kind:        {}", descriptor.kind());
            println!("Shape:       {:?}", descriptor.kind().dispatch_shape());
            println!("Priority:    {}", descriptor.priority());
            println!("Enabled:     {}", descriptor.enabled());
        },
        PluginAction::Enable { id } => {
            set_enabled(&id, true).await?;
            println!("Plugin '{id}' enabled.");
        },
        PluginAction::Disable { id } => {
            set_enabled(&id, false).await?;
            println!("Plugin '{id}' disabled.");
        },
        PluginAction::Installed { json } => {
            let discoverer = FsPluginDiscoverer::new(FsPluginDiscoverer::default_paths());
            let manifests = discoverer.discover().await?;

            if json {
                let entries: Vec<_> = manifests
                    .iter()
                    .map(|(parsed, origin)| {
                        serde_json::json!({
                            "id": parsed.manifest.id,
                            "name": parsed.manifest.name,
                            "description": parsed.manifest.description,
                            "version": parsed.manifest.version,
                            "priority": parsed.manifest.priority,
                            "capabilities": parsed.manifest.capabilities,
                            "origin": origin,
                            "path": parsed.source_path,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if manifests.is_empty() {
                println!("No plugin manifests found.");
            } else {
                for (parsed, origin) in &manifests {
                    println!(
                        "  {id} — {name} [{origin:?}]",
                        id = parsed.manifest.id,
                        name = parsed.manifest.name,
                    );
                }
            }
        },
    }

    Ok(())
}

async fn set_enabled(id: &str, enabled: bool) -> anyhow::Result<()> {
    let (registry, store) = build_registry().await?;
    if let Err(e) = registry.set_enabled(id, enabled) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let mut state = store.load()?;
    state.set_disabled(id, !enabled);
    store.save(&state)?;
    Ok(())
}

pub async fn handle_emit(kind: String, data: Option<String>) -> anyhow::Result<()> {
    let (registry, _) = build_registry().await?;
    let data = match data {
        Some(raw) => serde_json::from_str(&raw)?,
        None => serde_json::Value::Null,
    };

    let outcomes = events::dispatch_event(&registry, &HostEvent { kind, data }).await;
    if outcomes.is_empty() {
        println!("No event processors registered.");
        return Ok(());
    }
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("  ✓ {}", outcome.plugin_id),
            Err(e) => println!("  ✗ {} — {e}", outcome.plugin_id),
        }
    }
    Ok(())
}

pub async fn handle_unfurl(url: String) -> anyhow::Result<()> {
    let (registry, _) = build_registry().await?;
    match unfurl::resolve_unfurl(&registry, &url).await {
        Some(unfurl) => {
            println!("Title:       {}", unfurl.title);
            if let Some(description) = unfurl.description {
                println!("Description: {description}");
            }
            if let Some(image_url) = unfurl.image_url {
                println!("Image:       {image_url}");
            }
        },
        None => println!("No unfurler matched."),
    }
    Ok(())
}
