//! Handlers behind the `infludash` subcommands

use anyhow::{anyhow, bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use infludash::admin::{self, LookupKind, StatsReport};
use infludash::api::ApiClient;
use infludash::config::Config;
use infludash::export::{self, OutputFormat};
use infludash::forms::{RegistrationConfig, Settings};
use infludash::models::{ActionKind, LoadState, RowAction};
use infludash::resources::Resource;
use infludash::source::{RemoteSource, ResourceSource};
use infludash::{Dispatch, ListEvent, PagedResourceList};

/// Everything a command needs to talk to the API
pub struct Session {
    pub config: Config,
    pub client: ApiClient,
}

pub struct ListOptions {
    pub page: u32,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

fn new_list<R: Resource>(ctx: &Session, resource: R) -> PagedResourceList<R> {
    let resource = Arc::new(resource);
    let source: Arc<dyn ResourceSource<R::Row>> =
        Arc::new(RemoteSource::new(Arc::clone(&resource), ctx.client.clone()));
    PagedResourceList::new(resource, source, ctx.config.list.page_size, ctx.config.notice_ttl())
}

pub async fn list<R: Resource>(ctx: &Session, resource: R, options: ListOptions) -> Result<()> {
    let mut list = new_list(ctx, resource).starting_at(options.page);
    if let Some(page_size) = options.page_size {
        list = list.with_page_size(page_size);
    }
    if let Some(search) = &options.search {
        list = list.with_search(search);
    }
    for (key, value) in &options.filters {
        list = list.with_filter(key, value);
    }

    list.mount();
    let events = list.settle().await;
    if let LoadState::Failed(reason) = list.load_state() {
        bail!("Failed to load {}: {}", list.resource().title(), reason);
    }
    if events.contains(&ListEvent::Refetching) {
        eprintln!(
            "Page {} is out of range, showing page {}",
            options.page,
            list.current_page()
        );
    }

    let rows = list.visible_rows();
    let columns = list.resource().columns();
    let first_number = list.row_number(0);

    match &options.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = std::io::BufWriter::new(file);
            export::write_rows(&mut writer, options.format, &columns, &rows, first_number)?;
            writer.flush()?;
            info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            export::write_rows(&mut writer, options.format, &columns, &rows, first_number)?;
        }
    }

    if options.format == OutputFormat::Table {
        println!();
        println!(
            "{} | Page {} of {} | {} total",
            list.resource().title(),
            list.current_page(),
            list.total_pages(),
            list.total_count()
        );
        println!("Pages: {}", list.window().label());
    }
    Ok(())
}

pub async fn show<R: Resource>(ctx: &Session, resource: R, id: &str) -> Result<()> {
    match admin::fetch_detail(&ctx.client, &resource, id).await? {
        Some(detail) => {
            println!("{}", resource.title());
            println!("{}", "-".repeat(40));
            for column in resource.columns() {
                println!("{:<14} {}", format!("{}:", column.label), column.value(&detail.row));
            }
        }
        None => println!("No record found with id {}", id),
    }
    Ok(())
}

pub async fn action<R: Resource>(ctx: &Session, resource: R, action: &str, id: &str) -> Result<()> {
    let kind = ActionKind::parse(action).ok_or_else(|| {
        anyhow!(
            "Unknown action '{}'. Supported: edit, delete, approve, reject, mark-paid, view",
            action
        )
    })?;

    let mut list = new_list(ctx, resource);
    match list.perform_action(RowAction::new(id, kind)) {
        Dispatch::Navigate(route) => {
            println!("Open {} in the dashboard", route);
            Ok(())
        }
        Dispatch::Rejected => {
            let message = list
                .notice()
                .map(|notice| notice.message.clone())
                .unwrap_or_else(|| format!("{} is not supported", kind.as_str()));
            bail!(message)
        }
        Dispatch::Pending => {
            for event in list.settle().await {
                match event {
                    ListEvent::ActionSucceeded(_) => {
                        let message = list
                            .notice()
                            .map(|notice| notice.message.clone())
                            .unwrap_or_default();
                        println!("✓ {}", message);
                    }
                    ListEvent::ActionFailed(_, reason) => bail!(reason),
                    _ => {}
                }
            }
            Ok(())
        }
    }
}

pub fn print_settings(settings: &Settings) {
    println!("Vendor commission: {}%", settings.vendor_commission);
    println!("Platform fee:      {}%", settings.platform_fee);
    println!("GST:               {}%", settings.gst);
    println!("Delivery fee:      ₹{}", settings.delivery_fee);
}

pub fn print_registration(config: &RegistrationConfig) {
    println!(
        "Paid registration: {}",
        if config.enabled { "enabled" } else { "disabled" }
    );
    println!("Fee:               ₹{}", config.amount_inr);
}

pub async fn lookup(ctx: &Session, kind: LookupKind, term: &str) -> Result<()> {
    let options = admin::lookup(&ctx.client, kind, term).await?;
    if options.is_empty() {
        println!("No matches");
    }
    for option in options {
        println!("{:<26} {}", option.id, option.name);
    }
    Ok(())
}

pub fn print_stats(report: &StatsReport) {
    let overview = &report.overview;
    println!("Influencers:      {}", overview.influencer_count);
    println!("Clients:          {}", overview.client_count);
    println!("Projects:         {}", overview.total_projects);
    println!("Bids:             {}", overview.total_bids);
    println!("Collab requests:  {}", overview.total_requests);

    println!();
    println!("Top projects by bids");
    for row in &report.top_projects {
        println!("  {:<40} {}", row.label(), row.bid_count);
    }

    println!();
    println!("Projects per client");
    for row in &report.client_project_counts {
        println!("  {:<40} {}", row.id.as_deref().unwrap_or("N/A"), row.count);
    }

    println!();
    println!("Requests per influencer");
    for row in &report.requests_per_influencer {
        println!("  {:<40} {}", row.id.as_deref().unwrap_or("N/A"), row.count);
    }

    println!();
    println!("Assigned projects");
    for project in &report.assigned_projects {
        println!(
            "  {:<30} {:<20} {}",
            project.title.as_deref().unwrap_or(&project.id),
            project.client_name(),
            project.influencer_name()
        );
    }
}
