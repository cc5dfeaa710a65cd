use access_flow::adapters::http_backend::HttpAccessBackend;
use access_flow::adapters::memory_history::MemoryHistory;
use access_flow::adapters::tracing_listener::TracingListener;
use access_flow::cli::{Cli, Command};
use access_flow::config::Settings;
use access_flow::domain::{NavigationMode, Navigator, StepRegistry};
use access_flow::flow::{FlowController, FlowPorts, Transition};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    match cli.command {
        Command::Steps { create, readonly } => {
            for (index, step) in StepRegistry::visible_steps(readonly, create).iter().enumerate() {
                println!("{}\t{}\t{}", index, step.key.value(), step.label);
            }
        }
        Command::Inspect { group_id } => {
            let route = settings
                .routes
                .step_route(NavigationMode::TabView, Some(&group_id), 0);
            let (flow, _) = open_flow(&settings, &route.to_href())?;
            flow.enrich().await?;

            let context = flow.context();
            println!("group:      {}", context.group_id.unwrap_or_default());
            println!("readonly:   {}", context.readonly);
            println!(
                "middleware: {}",
                context
                    .middleware_type
                    .map(|m| format!("{:?}", m))
                    .unwrap_or_else(|| "-".to_string())
            );
            for step in flow.visible_steps() {
                println!("  - {} ({})", step.label, step.key.value());
            }
        }
        Command::Submit { group_id } => {
            let last = StepRegistry::visible_steps(false, true).len() - 1;
            let route = settings
                .routes
                .step_route(NavigationMode::Wizard, Some(&group_id), last);
            let (flow, history) = open_flow(&settings, &route.to_href())?;
            flow.enrich().await?;

            info!(%group_id, step = flow.current(), "submitting from last step");
            match flow.advance(flow.current()).await? {
                Transition::Submitted => println!("submitted, now at {}", history.current().to_href()),
                Transition::Advanced { route, .. } => println!("advanced to {}", route.to_href()),
            }
        }
    }

    Ok(())
}

fn open_flow(settings: &Settings, href: &str) -> anyhow::Result<(FlowController, Arc<MemoryHistory>)> {
    let history = Arc::new(MemoryHistory::new(href));
    let backend = HttpAccessBackend::from_settings(&settings.manager)?;
    let ports = FlowPorts {
        navigator: history.clone(),
        backend: Arc::new(backend),
        listener: Arc::new(TracingListener),
    };
    Ok((FlowController::new(settings.routes.clone(), ports), history))
}
