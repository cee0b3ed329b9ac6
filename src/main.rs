use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use distfxn::{
    FamilyRegistry, FunctionSpec, SeededSource, SpecVerificationReport, diagnostics,
    run_render_equivalence_cases,
};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "distfxn")]
#[command(about = "Canonical vs. rendered sampler equivalence gate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every family's edge cases plus randomized specs.
    Gate {
        /// Seed for randomized spec construction.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Randomized specs per family (0 runs edge cases only).
        #[arg(long, default_value_t = 8)]
        random_specs: usize,

        /// Emit reports as JSON instead of text lines.
        #[arg(long)]
        json: bool,
    },

    /// List registered family names.
    Families,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = FamilyRegistry::with_builtin_families()?;

    match cli.cmd {
        Commands::Gate {
            seed,
            random_specs,
            json,
        } => {
            // 1) Collect specs: fixed edge cases, then randomized ones.
            let mut specs = FunctionSpec::edge_cases();
            if random_specs > 0 {
                let mut rng = SeededSource::new(seed);
                specs.extend(
                    FunctionSpec::sample_all_families(&mut rng, random_specs)
                        .context(diagnostics::error_message("sample randomized specs"))?,
                );
            }

            // 2) Round-trip through the registry so every spec passes the
            //    same strict parse a caller's payload would.
            let mut parsed = Vec::with_capacity(specs.len());
            for spec in &specs {
                let payload = spec.to_value()?;
                parsed.push(registry.parse(&payload).with_context(|| {
                    diagnostics::error_message(format!("re-parse spec {}", payload))
                })?);
            }
            diagnostics::info(format!(
                "verifying {} specs across families: {}",
                parsed.len(),
                registry.list_families().join(", ")
            ));

            // 3) Run the default case battery per spec.
            let mut reports: Vec<SpecVerificationReport> = Vec::new();
            for spec in &parsed {
                reports.push(run_render_equivalence_cases(spec, None)?);
            }

            // 4) Print.
            if json {
                let values = reports
                    .iter()
                    .map(SpecVerificationReport::to_value)
                    .collect::<serde_json::Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for report in &reports {
                    for line in report.to_lines() {
                        println!("{}", line);
                    }
                }
            }

            let failed = reports.iter().filter(|r| !r.passed).count();
            if failed > 0 {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "{} of {} specs failed equivalence",
                        failed,
                        reports.len()
                    ))
                );
            }
            diagnostics::info(format!("all {} specs passed", reports.len()));
        }
        Commands::Families => {
            for family in registry.list_families() {
                println!("{}", family);
            }
        }
    }

    Ok(())
}
