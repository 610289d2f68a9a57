use std::{path::PathBuf, time::Instant};

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use itertools::Itertools;
use rand::{rngs::SmallRng, SeedableRng};

use mitosort::{
    align,
    pattern::{
        store::{FileStore, PatternStore},
        PatternLibrary,
    },
    permutation::Permutation,
    runs::RunDecomposition,
    sort::{sort, sort_into, Scenario},
};

const RULE: &str = "*********************************************";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mitosort",
    about = "Compute a minimum-length TDRL/iTDRL sorting scenario for a signed permutation."
)]
struct Cli {
    /// Signed permutation, e.g. "3 -1 2" (omit to generate one with --random).
    permutation: Option<String>,
    /// Generate a uniformly random signed permutation of this size.
    #[arg(long, value_name = "N", conflicts_with = "permutation")]
    random: Option<usize>,
    /// Probability that a generated element is negated.
    #[arg(long, value_name = "P", default_value_t = 0.5)]
    negation_probability: f64,
    /// Seed for the random generator (entropy when omitted).
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Sort into this permutation instead of the canonical identity.
    #[arg(long, value_name = "PERM")]
    target: Option<String>,
    /// Directory for cached pattern files (in-memory cache when omitted).
    #[arg(long, value_name = "DIR")]
    pattern_dir: Option<PathBuf>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    ensure!(
        (0.0..=1.0).contains(&cli.negation_probability),
        "--negation-probability must be between 0 and 1"
    );

    let permutation = match (&cli.permutation, cli.random) {
        (Some(text), _) => text
            .parse::<Permutation>()
            .context("failed to parse the permutation")?,
        (None, Some(n)) => {
            ensure!(n > 0, "--random needs a size of at least 1");
            let mut rng = match cli.seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_entropy(),
            };
            Permutation::random(n, cli.negation_probability, &mut rng)
        }
        (None, None) => bail!("provide a permutation or --random N"),
    };

    let target = cli
        .target
        .as_deref()
        .map(|text| {
            text.parse::<Permutation>()
                .context("failed to parse the target permutation")
        })
        .transpose()?;

    let started = Instant::now();
    let scenario = match cli.pattern_dir {
        Some(dir) => compute(
            &permutation,
            target.as_ref(),
            PatternLibrary::with_store(FileStore::new(dir)),
        )?,
        None => compute(&permutation, target.as_ref(), PatternLibrary::in_memory())?,
    };
    print_scenario(&scenario, target.is_none());
    println!(
        "Sorting scenario calculated in {:.3}s.",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn compute<S: PatternStore>(
    permutation: &Permutation,
    target: Option<&Permutation>,
    mut library: PatternLibrary<S>,
) -> Result<Scenario> {
    match target {
        Some(target) => sort_into(permutation, target, &mut library)
            .context("failed to compute the relabeled sorting scenario"),
        None => sort(permutation, &mut library).context("failed to compute the sorting scenario"),
    }
}

fn print_scenario(scenario: &Scenario, canonical_frame: bool) {
    println!("Input:");
    println!("{}", scenario.input);
    if let Some(pattern) = &scenario.pattern {
        // The chosen pattern aligns with the input's runs only in the
        // canonical frame; under --target it describes the relabeled
        // permutation.
        if canonical_frame {
            let runs = RunDecomposition::of(&scenario.input);
            if let Some(alignment) = align::embed(&runs, pattern) {
                println!("{}", alignment.aligned_encoding(&runs));
            }
        }
        println!("{pattern}");
    }
    println!("Distance: {} TDRL/iTDRL", scenario.distance);
    println!("{RULE}");
    for step in &scenario.steps {
        println!("{}", step.permutation);
        println!("{}", step.residual_encoding());
        println!(
            "{}: ( {} | {} )",
            step.op,
            step.left.iter().join(" "),
            step.right.iter().join(" ")
        );
        println!("{RULE}");
    }
}
