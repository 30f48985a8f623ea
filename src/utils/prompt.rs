use std::io::{self, BufRead, Write};

/// Asks whether a group of objects may be deleted.
pub trait Confirm: Send + Sync {
    fn confirm(&self, namespace: &str, resource: &str, names: &[String]) -> bool;
}

/// Prompts on stderr and reads the answer from stdin.
///
/// The read goes through `block_in_place`, so this must run on a
/// multi-threaded runtime.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, namespace: &str, resource: &str, names: &[String]) -> bool {
        tokio::task::block_in_place(|| {
            let question = format!(
                "Do you want to delete {} {} in namespace {} ({})? [y/N]: ",
                names.len(),
                resource,
                namespace,
                names.join(", ")
            );
            ask(&mut io::stderr(), &mut io::stdin().lock(), &question)
        })
    }
}

/// Writes `question` to `out` and reads one answer line from `input`.
fn ask(out: &mut impl Write, input: &mut impl BufRead, question: &str) -> bool {
    let _ = write!(out, "{}", question);
    let _ = out.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read confirmation, skipping deletion");
            false
        }
    }
}

/// Approves every group without asking.
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, _namespace: &str, _resource: &str, _names: &[String]) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
