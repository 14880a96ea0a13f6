use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::bail;

use wavemind::{
    load_file, render_summary, resolve, train, PatientInfo, Session, TrainReport,
};

fn main() -> ExitCode {
    env_logger::init();

    match parse_args().and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Every pipeline failure is a recoverable condition with a
            // human-readable cause; report it and let the user retry.
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

struct Args {
    path: PathBuf,
    json: bool,
    patient: Option<PatientInfo>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut argv = std::env::args().skip(1);
    let Some(path) = argv.next().map(PathBuf::from) else {
        bail!("usage: wavemind <recording.{{csv,edf,mat}}> [--json] [--patient <name> <age> <id>]");
    };

    let mut json = false;
    let mut patient = None;
    while let Some(flag) = argv.next() {
        match flag.as_str() {
            "--json" => json = true,
            "--patient" => {
                let (Some(name), Some(age), Some(id)) = (argv.next(), argv.next(), argv.next())
                else {
                    bail!("--patient expects <name> <age> <id>");
                };
                patient = Some(PatientInfo { name, age, id });
            }
            other => bail!("unknown flag: {other}"),
        }
    }
    Ok(Args { path, json, patient })
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut session = Session::new();
    session.set_dataset(load_file(&args.path)?);

    let dataset = session.dataset().expect("dataset was just set");
    let outcome = train(dataset)?;
    let classes = dataset.distinct_labels();
    let diagnosis = resolve(outcome.diagnosis_code);

    if args.json {
        let payload = serde_json::json!({
            "diagnosis_code": outcome.diagnosis_code,
            "diagnosis": diagnosis,
            "classes": classes,
            "report": outcome.report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        match &outcome.report {
            TrainReport::SingleClass { warning } => {
                println!("{warning}");
                println!("Suggested diagnosis: {diagnosis}");
            }
            TrainReport::Evaluated(report) => {
                println!("Model trained successfully.");
                println!("Suggested diagnosis for the first record: {diagnosis}\n");
                print!("{report}");
            }
        }
    }

    if let Some(patient) = &args.patient {
        println!();
        print!("{}", render_summary(patient, &outcome)?);
    }

    session.set_model(outcome.model);
    Ok(())
}
