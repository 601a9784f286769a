use clap::Parser;
use portal_resolver::utils::error::{ErrorSeverity, PortalError};
use portal_resolver::utils::{logger, validation::Validate};
use portal_resolver::{
    test_connectivity, Cli, Command, PortalAddressResolver, PortalApiClient, PortalSettings,
    ReqwestTransport, TracingObserver,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    if cli.verbose {
        tracing::debug!("Settings: {:?}", settings);
    }

    match run(&cli.command, settings).await {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => exit_with(&e),
    }
}

fn load_settings(path: Option<&str>) -> Result<PortalSettings, PortalError> {
    match path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let settings = PortalSettings::load(path)?;
            tracing::info!("✅ Configuration validated");
            Ok(settings)
        }
        None => Ok(PortalSettings::default()),
    }
}

async fn run(command: &Command, settings: PortalSettings) -> Result<i32, PortalError> {
    let resolver =
        PortalAddressResolver::new(settings.clone()).with_observer(Arc::new(TracingObserver));

    match command {
        Command::Validate { address } => {
            let valid = resolver.is_valid_portal_address(address);
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(if valid { 0 } else { 1 })
        }
        Command::Normalize { address } => {
            println!("{}", resolver.normalize_portal_address(address.as_deref()));
            Ok(0)
        }
        Command::Build { label } => {
            println!("{}", resolver.build_portal_address(label.as_deref()));
            Ok(0)
        }
        Command::Host { address } => match resolver.extract_host(address) {
            Some(host) => {
                println!("{}", host);
                Ok(0)
            }
            None => {
                eprintln!("❌ '{}' is not an absolute URL with a host", address);
                Ok(1)
            }
        },
        Command::Primary { address } => {
            let is_primary = resolver.is_designated_primary(address);
            println!("{}", is_primary);
            Ok(if is_primary { 0 } else { 1 })
        }
        Command::Classify { address } => match resolver.parse_address(address) {
            Ok(parsed) => {
                println!("address: {}", parsed);
                println!("host:    {}", parsed.host());
                println!("path:    {}", parsed.path());
                println!("kind:    {}", parsed.kind());
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                Ok(1)
            }
        },
        Command::Named { name: Some(name) } => {
            println!("{}", resolver.portal_address_for(name));
            Ok(0)
        }
        Command::Named { name: None } => {
            for (name, address) in settings.named_portals() {
                println!("{:<16} {}", name, address);
            }
            Ok(0)
        }
        Command::Info => {
            print_info(&settings);
            Ok(0)
        }
        Command::CheckConfig => {
            settings.validate()?;
            println!("✅ Configuration is valid");
            println!("Primary portal: {}", settings.primary_address());
            Ok(0)
        }
        Command::Connectivity => {
            let client = PortalApiClient::new(ReqwestTransport::new(), settings);
            let report = test_connectivity(&client).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.accessible { 0 } else { 1 })
        }
    }
}

fn print_info(settings: &PortalSettings) {
    let portal = &settings.portal;
    println!("=== {} ===", portal.name);
    println!("Main portal:    {}", portal.primary_address);
    println!("Primary domain: {}", portal.designated_host);
    println!("Portal path:    {}", portal.entry_path);
    println!();
    println!("Address forms:");
    println!("  • {}", portal.primary_address);
    println!(
        "  • https://d-{{id}}.{}{} (organization instances)",
        portal.parent_domain, portal.entry_path
    );
    println!(
        "  • https://{{label}}.{}{} (custom labels)",
        portal.parent_domain, portal.entry_path
    );
    println!();
    println!("Allowed domains:");
    for domain in settings.allowed_domains() {
        println!("  • {}", domain);
    }
    println!();
    println!("API base URL:   {}", settings.api.base_url);
    for (name, path) in settings.api.endpoints.as_map() {
        println!("  {:<13} {}", name, path);
    }
    println!("Documentation:  {}", portal.docs_url);
}

fn exit_with(e: &PortalError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
