//! Headless mode for the inventory tracker.
//!
//! A line-oriented front end for scripting and automated testing: each input
//! line is one command, and each result is printed as plain text.
//!
//! - Command output is printed as-is, one line per line
//! - Failures are printed as `[ERROR] <message>` and do not stop the run
//! - Blank lines and lines starting with `#` are skipped
//! - The run ends on `quit` or at end of input

use std::io::{self, BufRead, Write};

use tabletop_core::Session;

/// Run commands from `input` until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, mut output: W) -> io::Result<()> {
    if let Some(record) = session.record() {
        writeln!(output, "[LOADED] {}", record.name())?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match session.run_line(line) {
            Ok(outcome) => {
                for text in &outcome.lines {
                    writeln!(output, "{text}")?;
                }
                if outcome.quit {
                    output.flush()?;
                    return Ok(());
                }
            }
            Err(e) => {
                tracing::debug!(command = line, error = %e, "command failed");
                writeln!(output, "[ERROR] {e}")?;
            }
        }
        output.flush()?;
    }

    if session.is_dirty() {
        tracing::warn!("input ended with unsaved changes");
        writeln!(output, "[WARN] End of input; unsaved changes were not saved")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_core::SessionConfig;
    use tempfile::TempDir;

    fn run_script(script: &str) -> (TempDir, Session, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = SessionConfig::new().with_save_dir(temp_dir.path());
        let mut session = Session::new(&config).unwrap();
        let mut output = Vec::new();
        run(&mut session, script.as_bytes(), &mut output).unwrap();
        (temp_dir, session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_script_runs_to_quit() {
        let (_dir, session, output) = run_script(
            "new Thorin\n\
             # comment lines are skipped\n\
             \n\
             add Longsword\n\
             save\n\
             quit\n\
             add Shield\n",
        );

        // Nothing after quit runs
        assert_eq!(session.record().unwrap().items().len(), 1);
        assert!(!session.is_dirty());
        assert!(output.trim_end().ends_with("Farewell."));
        assert!(!output.contains("[ERROR]"));
    }

    #[test]
    fn test_errors_do_not_stop_the_run() {
        let (_dir, session, output) = run_script("add Rope\nnew Kara\nrm 3\nadd Rope\n");

        assert_eq!(output.matches("[ERROR]").count(), 2);
        assert_eq!(session.record().unwrap().items().len(), 1);
        assert!(output.contains("[WARN] End of input"));
    }

    #[test]
    fn test_quit_refused_while_dirty() {
        let (_dir, session, output) = run_script("new Kara\nquit\nquit!\n");
        assert!(output.contains("[ERROR]"));
        assert!(output.trim_end().ends_with("Farewell."));
        assert!(session.is_dirty());
    }
}
