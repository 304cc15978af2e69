use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

mod cli;
mod commands;

use cli::{Cli, Commands, LookupArg, PaymentCommands, RegistrationCommands, SettingsCommands};
use commands::{ListOptions, Session};
use infludash::admin::{self, LookupKind};
use infludash::api::ApiClient;
use infludash::config::Config;
use infludash::credentials::FileCredentialStore;
use infludash::forms::{
    BrandForm, PasswordForm, PaymentForm, RegistrationForm, SettingsForm, TransactionForm,
};
use infludash::resources::ResourceKind;

#[tokio::main]
async fn main() -> Result<()> {
    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "infludash=info");
    }

    // Initialize logging to both console and file
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "infludash.log");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    config.validate()?;

    let store = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
    let client = ApiClient::from_config(&config, store)?;
    let session = Session { config, client };

    if let Err(e) = run(&session, cli.command).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn resource_kind(name: &str, parent: Option<&str>) -> Result<ResourceKind> {
    ResourceKind::parse(name, parent).map_err(|e| anyhow!(e))
}

async fn run(session: &Session, command: Commands) -> Result<()> {
    let client = &session.client;

    match command {
        Commands::Login { email, password } => {
            admin::login(client, &email, &password, session.config.api.token_expiry_days).await?;
            println!("✓ Logged in as {}", email.trim());
        }

        Commands::Logout => {
            admin::logout(client)?;
            println!("✓ Logged out");
        }

        Commands::List {
            resource,
            parent,
            page,
            page_size,
            search,
            filter,
            format,
            output,
        } => {
            let kind = resource_kind(&resource, parent.as_deref())?;
            let options = ListOptions {
                page,
                page_size,
                search,
                filters: cli::parse_filters(&filter)?,
                format,
                output,
            };
            info!("Listing {} (page {})", kind.label(), page);
            infludash::with_resource!(kind, r => commands::list(session, r, options).await)?;
        }

        Commands::Show {
            resource,
            id,
            parent,
        } => {
            let kind = resource_kind(&resource, parent.as_deref())?;
            infludash::with_resource!(kind, r => commands::show(session, r, &id).await)?;
        }

        Commands::Action {
            resource,
            action,
            id,
            parent,
        } => {
            let kind = resource_kind(&resource, parent.as_deref())?;
            infludash::with_resource!(kind, r => commands::action(session, r, &action, &id).await)?;
        }

        Commands::Settings { command } => match command {
            SettingsCommands::Show => {
                let settings = admin::load_settings(client).await?;
                commands::print_settings(&settings);
            }
            SettingsCommands::Set {
                vendor_commission,
                platform_fee,
                gst,
                delivery_fee,
            } => {
                // Unset flags keep the stored value
                let current = admin::load_settings(client).await?;
                let mut form = SettingsForm::from_settings(&current);
                for (field, value) in [
                    (&mut form.vendor_commission, vendor_commission),
                    (&mut form.platform_fee, platform_fee),
                    (&mut form.gst, gst),
                    (&mut form.delivery_fee, delivery_fee),
                ] {
                    if !value.trim().is_empty() {
                        *field = value;
                    }
                }
                let saved = admin::save_settings(client, &form).await?;
                println!("✓ Settings saved");
                commands::print_settings(&saved);
            }
        },

        Commands::Registration { command } => match command {
            RegistrationCommands::Show => {
                let config = admin::load_registration_config(client).await?;
                commands::print_registration(&config);
            }
            RegistrationCommands::Set { enabled, amount } => {
                let form = RegistrationForm {
                    enabled,
                    amount_inr: amount,
                };
                let saved = admin::save_registration_config(client, &form).await?;
                println!("✓ Registration configuration saved");
                commands::print_registration(&saved);
            }
        },

        Commands::Payment { command } => match command {
            PaymentCommands::Create {
                influencer,
                client: client_id,
                project,
                amount,
                currency,
                notes,
            } => {
                let form = PaymentForm {
                    influencer,
                    client: client_id,
                    project,
                    total_amount: amount,
                    currency,
                    notes,
                };
                let created = admin::create_payment(client, &form).await?;
                println!("✓ Payment created");
                println!("{}", serde_json::to_string_pretty(&created)?);
            }
            PaymentCommands::Transaction {
                id,
                amount,
                note,
                reference,
            } => {
                let form = TransactionForm {
                    payment_id: id,
                    amount,
                    note,
                    reference,
                };
                let updated = admin::add_transaction(client, &form).await?;
                println!("✓ Transaction recorded");
                println!("{}", serde_json::to_string_pretty(&updated)?);
            }
            PaymentCommands::Lookup { kind, term } => {
                let kind = match kind {
                    LookupArg::Influencer => LookupKind::Influencer,
                    LookupArg::Client => LookupKind::Client,
                    LookupArg::Project => LookupKind::Project,
                };
                commands::lookup(session, kind, &term).await?;
            }
        },

        Commands::Brand {
            id,
            name,
            description,
            logo_url,
            website,
        } => {
            let form = BrandForm {
                id: id.unwrap_or_default(),
                name,
                description,
                logo_url,
                website,
            };
            admin::save_brand(client, &form).await?;
            if form.editing().is_some() {
                println!("✓ Brand updated");
            } else {
                println!("✓ Brand created");
            }
        }

        Commands::Password {
            user,
            password,
            confirm,
        } => {
            let form = PasswordForm {
                user_id: user,
                password,
                confirm,
            };
            admin::reset_password(client, &form).await?;
            println!("✓ Password updated");
        }

        Commands::Stats => {
            let report = admin::fetch_stats(client).await?;
            commands::print_stats(&report);
        }
    }

    Ok(())
}
