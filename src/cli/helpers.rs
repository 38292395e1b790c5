//! Shared helper functions for the CLI.

use std::io::{self, BufRead, Write};
use std::path::Path;

use console::style;

use crate::pipeline::Outcome;

/// Print `prompt`, then read one line. Returns the trimmed line, or an empty
/// string at end of input.
pub fn prompt_line<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Print the run's result: matches and the no-match notice go to `out`,
/// failures to `err`.
pub fn print_outcome<O: Write, E: Write>(
    outcome: &Outcome,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    match outcome {
        Outcome::Matches(emails) => {
            writeln!(out, "Extracted email(s):")?;
            for email in emails {
                writeln!(out, "{}", email)?;
            }
        }
        Outcome::NoMatches => writeln!(out, "No emails found.")?,
        Outcome::Failed(failure) => writeln!(
            err,
            "{} ({}): {}",
            style("Error").red().for_stderr(),
            failure.stage,
            failure.error
        )?,
    }
    Ok(())
}

/// Save extracted email addresses to a file, one per line.
///
/// Parent directories are created as needed.
pub fn save_emails_to_file(emails: &[String], path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut contents = emails.join("\n");
    contents.push('\n');
    std::fs::write(path, contents)?;

    tracing::info!("Emails saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, Stage, StageError};
    use std::io::Cursor;
    use std::path::PathBuf;

    #[test]
    fn test_prompt_line() {
        let mut input = Cursor::new("  /tmp/card.png  \nignored\n");
        let mut output = Vec::new();
        let line = prompt_line("Enter: ", &mut input, &mut output).unwrap();
        assert_eq!(line, "/tmp/card.png");
        assert_eq!(output, b"Enter: ");
    }

    #[test]
    fn test_prompt_line_eof() {
        let mut input = Cursor::new("");
        let line = prompt_line("Enter: ", &mut input, &mut Vec::new()).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn test_print_matches() {
        let outcome = Outcome::Matches(vec![
            "jane.doe@example.com".to_string(),
            "support@site.org".to_string(),
        ]);
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_outcome(&outcome, &mut out, &mut err).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Extracted email(s):\njane.doe@example.com\nsupport@site.org\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_print_no_matches() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_outcome(&Outcome::NoMatches, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No emails found.\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_print_failure_goes_to_stderr() {
        let outcome = Outcome::Failed(StageError::new(
            Stage::Load,
            ExtractError::NotFound(PathBuf::from("card.png")),
        ));
        let (mut out, mut err) = (Vec::new(), Vec::new());
        print_outcome(&outcome, &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        let err = String::from_utf8(err).unwrap();
        assert!(err.contains("(load): File not found: card.png"));
    }

    #[test]
    fn test_save_emails_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/emails.txt");
        let emails = vec!["a@b.co".to_string(), "c@d.org".to_string()];

        save_emails_to_file(&emails, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a@b.co\nc@d.org\n");
    }

    #[test]
    fn test_save_emails_relative_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emails.txt");
        save_emails_to_file(&["x@y.io".to_string()], &path).unwrap();
        assert!(path.exists());
    }
}
