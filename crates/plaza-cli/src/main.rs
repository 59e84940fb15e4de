//! Plaza - Marketplace Deployment Manager
//!
//! Usage:
//!   plaza install       # Clone and configure the marketplace source
//!   plaza deploy        # Apply Kubernetes manifests and wait
//!   plaza setup         # install + deploy
//!   plaza admin-access  # Port-forward to the admin panel
//!   plaza fix-auth      # Patch auth env vars into the backend
//!   plaza test          # Non-interactive install with defaults

mod interactive;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plaza_core::commands::{AdminAccessOptions, BackendConfigureOptions, DeployContext, InstallOptions};
use plaza_core::config::{DeployConfig, DeployPaths};

use crate::interactive::{InstallPlan, InteractiveFlow, PrefilledOptions};

#[derive(Parser)]
#[command(name = "plaza")]
#[command(about = "Marketplace deployment manager", long_about = None)]
#[command(version)]
struct Cli {
    /// Deployment root (defaults to the directory above the executable)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install marketplace source code
    Install(InstallArgs),

    /// Deploy the marketplace to Kubernetes
    Deploy,

    /// Set up admin panel access via port forwarding
    AdminAccess,

    /// Fix admin panel authentication issues
    FixAuth,

    /// Complete setup: install + deploy
    Setup(InstallArgs),

    /// Run the full install non-interactively with defaults
    Test(InstallArgs),
}

#[derive(Args)]
struct InstallArgs {
    /// Project directory name (skips the name prompt)
    #[arg(long)]
    directory: Option<String>,

    /// Skip all prompts, accepting defaults (for CI/CD)
    #[arg(short = 'y', long)]
    yes: bool,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plaza=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("✗").red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = match &cli.root {
        Some(root) => DeployContext::from_paths(DeployPaths::from_deployment_root(root))?,
        None => DeployContext::with_defaults()?,
    };

    match cli.command {
        Commands::Install(args) => {
            run_install(&ctx, &args)?;
        }
        Commands::Deploy => {
            run_deploy(&ctx)?;
        }
        Commands::AdminAccess => {
            run_admin_access(&ctx)?;
        }
        Commands::FixAuth => {
            run_fix_auth(&ctx)?;
        }
        Commands::Setup(args) => {
            run_setup(&ctx, &args)?;
        }
        Commands::Test(args) => {
            run_test(&ctx, &args)?;
        }
    }
    Ok(())
}

fn run_install(ctx: &DeployContext, args: &InstallArgs) -> Result<Option<InstallPlan>> {
    let prefilled = PrefilledOptions {
        directory: args.directory.clone(),
        yes: args.yes,
        ..Default::default()
    };

    let mut flow = InteractiveFlow::new(ctx.config().defaults.clone(), prefilled);
    let plan = flow.collect()?;

    if !plan.confirmed {
        println!("Installation cancelled.");
        return Ok(None);
    }

    execute_install_plan(ctx, &plan)?;
    print_credentials(ctx.config());
    Ok(Some(plan))
}

fn execute_install_plan(ctx: &DeployContext, plan: &InstallPlan) -> Result<()> {
    let config = ctx.config();
    let project_path = config.paths.project_path(&plan.directory);
    println!(
        "{}",
        style(format!("Project will be created at: {}", project_path.display())).yellow()
    );

    let options = InstallOptions::new(&plan.directory)
        .with_storefront(plan.install_storefront)
        .with_vendor_panel(plan.install_vendor_panel);
    let report = ctx.install().execute(&options)?;
    println!("✓ Downloaded {}", report.components.join(", "));

    println!("Configuring backend...");
    let mut backend_options = BackendConfigureOptions::new(&plan.directory);
    if let Some(db) = &plan.database {
        backend_options = backend_options.with_database(db.clone());
    }
    let backend = ctx.configure().backend(&backend_options)?;
    for warning in &backend.warnings {
        println!("  ⚠ {warning}");
    }

    if plan.install_storefront {
        ctx.configure()
            .storefront(&plan.directory, &backend.publishable_key)?;
        println!("✓ Storefront configured");
    }
    if plan.install_vendor_panel {
        ctx.configure().vendor_panel(&plan.directory)?;
        println!("✓ Vendor panel configured");
    }

    println!("{}", style("Marketplace ready!").green().bold());
    Ok(())
}

fn print_credentials(config: &DeployConfig) {
    let creds = &config.credentials;
    println!();
    println!("{}", style("Here are your credentials:").blue());
    println!("  {}", style("Admin panel:").bold());
    println!("    login:    {}", style(&creds.admin.email).cyan());
    println!("    password: {}", style(&creds.admin.password).cyan());
    println!("  {}", style("Vendor panel:").bold());
    println!("    login:    {}", style(&creds.vendor.email).cyan());
    println!("    password: {}", style(&creds.vendor.password).cyan());
}

fn run_deploy(ctx: &DeployContext) -> Result<()> {
    println!("{}", style("Deploying marketplace to Kubernetes...").blue());
    let report = ctx.deploy().execute()?;

    println!("{}", style("✓ Deployment complete!").green());
    println!();
    println!("{}", style("Access URLs:").blue());
    println!("  {}  {}", style("Admin Panel:").bold(), report.admin_url);
    println!("  {}   {}", style("Storefront:").bold(), report.storefront_url);
    println!("  {} {}", style("Vendor Panel:").bold(), report.vendor_panel_url);

    let config = ctx.config();
    println!();
    println!(
        "Login: {} / {}",
        config.credentials.admin.email, config.credentials.admin.password
    );
    println!(
        "Check status: kubectl get pods -n {}",
        config.kubernetes.namespace
    );
    Ok(())
}

fn run_admin_access(ctx: &DeployContext) -> Result<()> {
    println!("{}", style("Setting up admin panel access...").blue());
    let report = ctx.admin_access().execute(&AdminAccessOptions::default())?;

    if report.reachable {
        println!("{}", style("✓ Admin panel is accessible!").green());
    }
    for warning in &report.warnings {
        println!("  ⚠ {warning}");
    }

    let config = ctx.config();
    println!();
    println!("URL: {}", style(&report.url).bold());
    println!("{}", style("Login credentials:").blue());
    println!("  Email:    {}", style(&config.credentials.admin.email).cyan());
    println!("  Password: {}", style(&config.credentials.admin.password).cyan());
    println!("{}", style("Alternative credentials:").blue());
    println!("  Email:    {}", style(&config.credentials.admin_alt.email).cyan());
    println!(
        "  Password: {}",
        style(&config.credentials.admin_alt.password).cyan()
    );
    Ok(())
}

fn run_fix_auth(ctx: &DeployContext) -> Result<()> {
    println!("{}", style("Fixing admin panel authentication...").blue());
    ctx.fix_auth().execute()?;
    println!(
        "{}",
        style("✓ Session fix applied! Try the admin panel now.").green()
    );
    Ok(())
}

fn run_setup(ctx: &DeployContext, args: &InstallArgs) -> Result<()> {
    println!("{}", style("Plaza Marketplace - Complete Setup").blue().bold());
    println!("{}", style("===================================").blue());

    println!("{}", style("Step 1: Installing source code...").blue());
    let Some(_plan) = run_install(ctx, args)? else {
        return Ok(());
    };

    println!();
    println!("{}", style("Step 2: Deploying to Kubernetes...").blue());
    run_deploy(ctx)?;

    let config = ctx.config();
    println!();
    println!("{}", style("Complete setup finished!").green().bold());
    println!(
        "  Source:     {}",
        config.paths.projects_root().join(&config.defaults.project_name).display()
    );
    println!("  Deployment: {}", config.paths.deployment_root().display());
    Ok(())
}

fn run_test(ctx: &DeployContext, args: &InstallArgs) -> Result<()> {
    println!("{}", style("Testing plaza with default settings...").blue());

    let defaults = &ctx.config().defaults;
    let plan = InstallPlan {
        directory: args
            .directory
            .clone()
            .unwrap_or_else(|| defaults.project_name.clone()),
        install_storefront: defaults.install_storefront,
        install_vendor_panel: defaults.install_vendor_panel,
        database: None,
        confirmed: true,
    };

    execute_install_plan(ctx, &plan)?;
    println!("{}", style("✓ CLI test complete!").green());
    Ok(())
}
