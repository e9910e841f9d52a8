//! Domain Appraiser CLI
//!
//! Usage:
//!   domain_appraiser <domain>...
//!
//! Values each argument and prints the attribute breakdown. Exits with a
//! non-zero status when any input could not be parsed.

use domain_appraiser::{AppraiserConfig, DomainEstimator, EstimationResult};

use eyre::Result;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let domains: Vec<String> = std::env::args().skip(1).collect();
    if domains.is_empty() {
        eprintln!("Usage: domain_appraiser <domain>...");
        std::process::exit(2);
    }

    let estimator = DomainEstimator::from_config(&AppraiserConfig::default())?;

    let mut invalid = 0usize;
    for domain in &domains {
        match estimator.estimate(domain).await {
            Ok(result) => print_breakdown(&result),
            Err(e) if e.is_invalid_format() => {
                eprintln!("❌ {}: {}", domain, e);
                invalid += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if invalid > 0 {
        eprintln!("\n{} of {} inputs were not valid domains", invalid, domains.len());
        std::process::exit(1);
    }

    Ok(())
}

fn print_breakdown(result: &EstimationResult) {
    println!("\n💎 {}", result.summary());
    println!("   Estimated: {}", result.estimation_date.format("%Y-%m-%d %H:%M:%S UTC"));

    for (section, attributes) in [
        ("Base attributes", &result.base_attributes),
        ("Other attributes", &result.other_attributes),
    ] {
        if attributes.is_empty() {
            continue;
        }
        println!("   {}:", section);
        for attr in attributes {
            println!(
                "     • {:<28} x{:<6.2} {:+.2}  {}",
                attr.name, attr.price_factor, attr.grade_factor, attr.description
            );
        }
    }

    if result.degraded {
        println!("   ⚠️ Signal sources unavailable, static heuristics applied");
    }
}
