// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{DateTime, Utc};
use nurse_roster_model::prelude::{Instance, InstanceLoader, render_roster};
use nurse_roster_solver::prelude::{
    ConstraintEvaluator, SimulatedAnnealing, SolveMode, SolverConfig,
};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    instance_path: PathBuf,
    iterations: usize,
    seed: u64,
    feasibility: bool,
    out: Option<PathBuf>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <instance.txt> [--iterations N] [--seed S] [--feasibility] [--out FILE]"
    )
}

fn parse_args() -> Result<Args, String> {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "nurse-roster".into());

    let mut instance_path = None;
    let mut iterations = 100_000usize;
    let mut seed = 1u64;
    let mut feasibility = false;
    let mut out = None;

    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--iterations" => {
                let value = argv.next().ok_or_else(|| usage(&program))?;
                iterations = value
                    .parse()
                    .map_err(|_| format!("invalid iteration count {value}"))?;
            }
            "--seed" => {
                let value = argv.next().ok_or_else(|| usage(&program))?;
                seed = value.parse().map_err(|_| format!("invalid seed {value}"))?;
            }
            "--feasibility" => feasibility = true,
            "--out" => {
                let value = argv.next().ok_or_else(|| usage(&program))?;
                out = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(usage(&program)),
            _ if instance_path.is_none() => instance_path = Some(PathBuf::from(arg)),
            other => return Err(format!("unexpected argument {other}\n{}", usage(&program))),
        }
    }

    Ok(Args {
        instance_path: instance_path.ok_or_else(|| usage(&program))?,
        iterations,
        seed,
        feasibility,
        out,
    })
}

#[derive(Serialize)]
struct RunRecord {
    instance: String,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    iterations: usize,
    seed: u64,
    hard_score: i64,
    soft_score: i64,
    feasible: bool,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let instance: Instance = InstanceLoader::new().from_path(&args.instance_path)?;
    tracing::info!(
        "Loaded {}: {} days, {} staff, {} shift types",
        args.instance_path.display(),
        instance.horizon(),
        instance.num_employees(),
        instance.num_shift_types()
    );

    let config = SolverConfig::default()
        .with_max_iterations(args.iterations)
        .with_seed(args.seed);
    let mode = if args.feasibility {
        SolveMode::Feasibility
    } else {
        SolveMode::Optimisation
    };

    let start_ts = Utc::now();
    let t0 = Instant::now();
    let mut solver = SimulatedAnnealing::new(&instance, config);
    let roster = solver.solve(mode);
    let runtime = t0.elapsed();
    let end_ts = Utc::now();

    let evaluator = ConstraintEvaluator::new(&instance);
    let hard_score = evaluator.hard_score(&roster);
    let soft_score = evaluator.soft_score(&roster);
    tracing::info!(
        "Finished in {:?}: hard {}, soft {}, feasible: {}",
        runtime,
        hard_score,
        soft_score,
        hard_score == 0
    );

    let rendered = render_roster(&instance, &roster);
    print!("{rendered}");

    if let Some(out_path) = &args.out {
        let record = RunRecord {
            instance: args.instance_path.display().to_string(),
            start_ts,
            end_ts,
            runtime_ms: runtime.as_millis(),
            iterations: args.iterations,
            seed: args.seed,
            hard_score,
            soft_score,
            feasible: hard_score == 0,
        };

        let mut file = File::create(out_path)?;
        file.write_all(rendered.as_bytes())?;
        writeln!(file)?;
        writeln!(file, "{}", serde_json::to_string_pretty(&record)?)?;
        tracing::info!("Wrote roster and run record to {}", out_path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    enable_tracing();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
