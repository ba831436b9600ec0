//! TUI-less "analyze" command

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::{AnalysisBackend, HttpBackend};
use crate::core::analysis::AnalysisResult;
use crate::core::app::{apply_action, execute_command, App, AppAction};
use crate::core::config::ResolvedSettings;
use crate::utils::url::resolve_artifact_url;

pub async fn run_analyze(
    settings: ResolvedSettings,
    file: PathBuf,
    questions: Vec<String>,
    save_dir: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let backend = HttpBackend::new(settings.backend_url.clone());
    let mut app = App::new(&settings);
    let mut stdout = io::stdout();

    if let Err(message) = analyze(&backend, &mut app, &file, &questions, &mut stdout).await {
        eprintln!("❌ {message}");
        std::process::exit(1);
    }

    if let (Some(dir), Some(results)) = (save_dir, app.view.results.as_ref()) {
        save_artifacts(&backend, results, &dir).await?;
    }

    Ok(())
}

/// Upload the scan, print the report, then put each question to the
/// assistant in order. The transcript is printed as it grows.
///
/// Only upload problems are fatal; a failed question prints the same
/// fallback reply the interactive session would show.
pub(crate) async fn analyze<W: Write>(
    backend: &dyn AnalysisBackend,
    app: &mut App,
    file: &Path,
    questions: &[String],
    out: &mut W,
) -> Result<(), String> {
    apply_action(
        app,
        AppAction::SelectFile {
            path: file.to_string_lossy().into_owned(),
        },
    );

    if let Some(command) = apply_action(app, AppAction::Submit) {
        let completion = execute_command(backend, command).await;
        let failure = match &completion {
            AppAction::UploadFailed { error } => Some(error.clone()),
            _ => None,
        };
        apply_action(app, completion);
        if let (Some(detail), Some(message)) = (failure, app.view.error.as_ref()) {
            return Err(format!("{message} ({detail})"));
        }
    }

    let Some(results) = app.view.results.clone() else {
        return Err(app
            .view
            .error
            .clone()
            .unwrap_or_else(|| "No analysis result".to_string()));
    };

    write_report(out, app, &results).map_err(|err| err.to_string())?;
    let mut printed = write_new_messages(out, app, 0).map_err(|err| err.to_string())?;

    for question in questions {
        match apply_action(
            app,
            AppAction::SendMessage {
                text: question.clone(),
            },
        ) {
            Some(command) => {
                let completion = execute_command(backend, command).await;
                apply_action(app, completion);
            }
            None => warn!(%question, "skipping blank question"),
        }
        printed = write_new_messages(out, app, printed).map_err(|err| err.to_string())?;
    }

    Ok(())
}

fn write_report<W: Write>(out: &mut W, app: &App, results: &AnalysisResult) -> io::Result<()> {
    let selection = &app.view.selection;
    writeln!(out, "{}", results.prediction_line())?;
    writeln!(
        out,
        "Organ: {} • Image type: {}",
        selection.organ.label(),
        selection.image_type.label()
    )?;
    for (kind, reference) in results.artifacts() {
        writeln!(
            out,
            "{}: {}",
            kind.label(selection.image_type),
            resolve_artifact_url(&app.backend_url, reference)
        )?;
    }
    Ok(())
}

fn write_new_messages<W: Write>(out: &mut W, app: &App, already: usize) -> io::Result<usize> {
    let history = &app.view.chat_history;
    for message in history.iter().skip(already) {
        writeln!(out)?;
        writeln!(out, "{}: {}", message.role.display_prefix(), message.content)?;
    }
    out.flush()?;
    Ok(history.len())
}

async fn save_artifacts(
    backend: &HttpBackend,
    results: &AnalysisResult,
    dir: &Path,
) -> Result<(), Box<dyn Error>> {
    tokio::fs::create_dir_all(dir).await?;
    println!();
    for (kind, reference) in results.artifacts() {
        let dest = dir.join(artifact_file_name(kind.file_stem(), reference));
        let bytes = backend.download_artifact(reference, &dest).await?;
        info!(path = %dest.display(), bytes, "artifact saved");
        println!("💾 Saved {} ({} bytes)", dest.display(), bytes);
    }
    Ok(())
}

/// `enhanced.png` for `/api/images/results/sr_scan.png`; the extension falls
/// back to `png` when the reference has none.
fn artifact_file_name(stem: &str, reference: &str) -> String {
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or("png");
    format!("{stem}.{extension}")
}
