//! Demo binary: discovers the module packages, sets up plans, registers a
//! company and walks one bank-transfer purchase through approval.

use clap::Parser;
use std::path::PathBuf;
use tenant_suite::billing::CheckoutRequest;
use tenant_suite::config::PlatformConfig;
use tenant_suite::framework::ActorClient;
use tenant_suite::lifecycle::{setup_tracing, Platform};
use tenant_suite::model::{BillingCycle, CouponCreate, CouponKind, PlanCreate, UserLimit};
use tracing::{error, info, Instrument};

#[derive(Parser)]
#[command(name = "tenant-suite")]
#[command(about = "Multi-tenant plans, modules and billing")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "tenant-suite.toml")]
    config: PathBuf,

    /// Override the packages directory from the config
    #[arg(long)]
    packages: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let mut config = PlatformConfig::load(&cli.config)?;
    if let Some(packages) = cli.packages {
        config.packages_dir = packages;
    }
    let currency = config.currency.clone();

    info!("Starting platform");
    let platform = Platform::new(config);

    let report = platform.sync_modules().await?;
    info!(
        added = report.added.len(),
        refreshed = report.refreshed.len(),
        "Modules synced"
    );

    // Plans
    let free = platform
        .plans
        .create_plan(PlanCreate::free("Free", UserLimit::Limited(1)))
        .await?;
    let pro = platform
        .plans
        .create_plan(PlanCreate {
            name: "Pro".to_string(),
            price_monthly: 2_900,
            price_yearly: 29_000,
            price_per_user_monthly: 500,
            price_per_user_yearly: 5_000,
            max_users: UserLimit::Limited(5),
            storage_limit_mb: Some(1_024),
            trial_days: 14,
            modules: platform.registry.enabled_modules().await?.into_iter().collect(),
            is_free: false,
        })
        .await?;
    info!(%free, %pro, "Plans created");

    // Tenant
    let span = tracing::info_span!("registration");
    let tenant = async {
        let (tenant, assignment) = platform.register_company("Acme", "owner@acme.io").await?;
        if let Some(assignment) = assignment {
            info!(%tenant, plan = %assignment.plan, "Default plan assigned");
        }
        platform
            .entitlement
            .create_staff(tenant, "Bob", "bob@acme.io")
            .await?;
        platform.settings.set(tenant, "currency", &currency).await?;
        Ok::<_, Box<dyn std::error::Error>>(tenant)
    }
    .instrument(span)
    .await?;

    // Purchase
    platform
        .coupons
        .create_coupon(CouponCreate {
            name: "Launch".to_string(),
            code: "launch20".to_string(),
            kind: CouponKind::Percentage,
            amount: 20,
            usage_limit: 100,
            per_user_limit: 1,
            expires_on: None,
        })
        .await?;

    let request = CheckoutRequest::new(tenant, pro, BillingCycle::Month)
        .with_users(3)
        .with_coupon("LAUNCH20");
    let span = tracing::info_span!("checkout");
    let result = async {
        let preview = platform.billing.preview(&request).await?;
        info!(
            list = preview.quote.total,
            discount = preview.discount.discount,
            total = preview.final_price(),
            currency = %currency,
            "Checkout preview"
        );
        let order = platform
            .billing
            .checkout_bank_transfer(&request, Some("receipt-0001".to_string()))
            .await?;
        platform.billing.approve(order.id).await
    }
    .instrument(span)
    .await;

    match result {
        Ok(approval) => {
            let owner = platform.users.fetch(tenant).await?;
            let modules = platform.entitlement.activated_modules(&owner).await?;
            info!(
                order = %approval.order.id,
                expires_on = ?approval.assignment.expires_on,
                ?modules,
                "Plan purchased"
            );
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    platform.shutdown().await?;
    info!("Done");
    Ok(())
}
